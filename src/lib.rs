//! RustRTOS 环形缓冲区 - 可插拔线程安全策略的静态字节环形缓冲区
//!
//! 本库提供以下核心功能:
//! - 固定容量字节环形缓冲区 (调用方提供存储区，不做堆分配)
//! - 三种内置线程安全策略: 无锁 (SPSC)、关中断、互斥锁
//! - 运行时按策略 ID 选择实现，支持注册自定义策略
//! - 条件编译日志系统
//!
//! # Example
//! ```
//! use rtos_ringbuf::{RingBuffer, RingError, StrategyId};
//!
//! let mut storage = [0u8; 16];
//! let rb = RingBuffer::create(&mut storage, StrategyId::CRITICAL_SECTION).unwrap();
//!
//! assert_eq!(rb.write_multi(b"hello"), 5);
//! let mut out = [0u8; 5];
//! assert_eq!(rb.read_multi(&mut out), 5);
//! assert_eq!(&out, b"hello");
//! assert_eq!(rb.read(), Err(RingError::Empty));
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod buffer;
pub mod error;
pub mod strategy;
pub mod sync;
pub mod util;

// ===== 重导出常用类型 =====
pub use buffer::RingBuffer;
pub use error::RingError;
pub use strategy::{register_strategy, registry, RingOps, RingState, StrategyId, StrategyRegistry};
#[cfg(feature = "statistics")]
pub use sync::RingStats;

// ===== 版本信息 =====
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 系统配置常量
pub mod config {
    /// 存储区最小字节数 (可用容量 = 大小 - 1)
    pub const MIN_SIZE: usize = 2;

    /// 全局注册表可容纳的自定义策略数量
    pub const MAX_CUSTOM_STRATEGIES: usize = 4;

    /// 内置互斥锁策略的锁池大小 (同时存活的互斥锁缓冲区上限)
    pub const MAX_LOCKS: usize = 8;

    /// 环形缓冲区默认大小
    pub const DEFAULT_RINGBUF_SIZE: usize = 256;
}

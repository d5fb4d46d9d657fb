//! 线程安全策略
//!
//! 所有策略实现同一组九个操作 (`RingOps`)，对外语义完全一致，
//! 只在同步方式上不同:
//!
//! | 策略 | 适用场景 | 是否阻塞 |
//! |------|----------|----------|
//! | `LockFree` | ISR → 主循环，单生产者单消费者 | 否 |
//! | `CriticalSection` | 裸机，多个中断源共享 (单核) | 否，但推迟中断 |
//! | `MutexStrategy` | RTOS 多任务 (不可在 ISR 中使用) | 是 |
//!
//! 缓冲区创建时通过 `StrategyRegistry` 把策略 ID 解析成
//! `&'static dyn RingOps`，之后的所有调用都经由该表分发。

use core::fmt;

use crate::error::RingError;
use crate::sync::{LockHandle, RawRing};
#[cfg(feature = "statistics")]
use crate::sync::RingStats;

pub mod critical;
pub mod lockfree;
pub mod mutex;
pub mod registry;

pub use critical::CriticalSection;
#[cfg(feature = "critical-section-strategy")]
pub use critical::CRITICAL_SECTION;
pub use lockfree::LockFree;
#[cfg(feature = "lock-free")]
pub use lockfree::LOCK_FREE;
pub use mutex::MutexStrategy;
#[cfg(feature = "mutex-strategy")]
pub use mutex::MUTEX;
pub use registry::{register_strategy, registry, StrategyRegistry};

/// 策略标识
///
/// 内置策略占用 `0..CUSTOM_BASE`，自定义策略从 `CUSTOM_BASE` 开始
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "log-defmt", derive(defmt::Format))]
pub struct StrategyId(u8);

impl StrategyId {
    /// 无锁模式 (SPSC)
    pub const LOCK_FREE: Self = Self(0);
    /// 关中断模式 (裸机)
    pub const CRITICAL_SECTION: Self = Self(1);
    /// 互斥锁模式 (RTOS)
    pub const MUTEX: Self = Self(2);
    /// 自定义策略起始值
    pub const CUSTOM_BASE: Self = Self(3);

    /// 由原始值构造
    #[inline(always)]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// 第 `offset` 个自定义策略 ID
    #[inline(always)]
    pub const fn custom(offset: u8) -> Self {
        Self(Self::CUSTOM_BASE.0.saturating_add(offset))
    }

    /// 原始值
    #[inline(always)]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// 是否为自定义策略
    #[inline(always)]
    pub const fn is_custom(self) -> bool {
        self.0 >= Self::CUSTOM_BASE.0
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::LOCK_FREE => f.write_str("lock-free"),
            Self::CRITICAL_SECTION => f.write_str("critical-section"),
            Self::MUTEX => f.write_str("mutex"),
            Self(raw) => write!(f, "custom#{}", raw),
        }
    }
}

/// 已绑定策略的缓冲区状态
///
/// 核心环形缓冲区加上策略私有的锁句柄 (仅互斥锁策略使用)
pub struct RingState<'a> {
    core: RawRing<'a>,
    lock: Option<LockHandle>,
}

impl<'a> RingState<'a> {
    pub(crate) fn new(core: RawRing<'a>, lock: Option<LockHandle>) -> Self {
        Self { core, lock }
    }

    /// 核心环形缓冲区
    #[inline(always)]
    pub fn core(&self) -> &RawRing<'a> {
        &self.core
    }

    /// 策略创建的锁句柄
    #[inline(always)]
    pub fn lock(&self) -> Option<LockHandle> {
        self.lock
    }

    /// 统计快照
    #[cfg(feature = "statistics")]
    pub fn stats(&self) -> RingStats {
        self.core.stats()
    }
}

/// 生命周期钩子的调用凭证
///
/// 只能由缓冲区的初始化 / 销毁路径构造。自定义策略可以实现 `attach` / `detach`，
/// 也可以把收到的凭证转交给被委托的策略，但无法在绑定之外调用它们。
///
/// ```compile_fail
/// use rtos_ringbuf::strategy::Lifecycle;
/// use rtos_ringbuf::{RingBuffer, StrategyId};
///
/// let mut storage = [0u8; 8];
/// let rb = RingBuffer::create(&mut storage, StrategyId::MUTEX).unwrap();
/// let lock = rb.state().unwrap().lock();
/// rb.ops().unwrap().detach(Lifecycle { _sealed: () }, lock);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Lifecycle {
    _sealed: (),
}

impl Lifecycle {
    pub(crate) const fn new() -> Self {
        Self { _sealed: () }
    }
}

/// 操作接口 (策略模式)
///
/// 九个操作必须全部实现，且对外可观察语义与核心算法一致。
/// `attach` / `detach` 是可选的生命周期钩子:
/// 工厂在绑定前调用 `attach` 创建策略资源，销毁时调用 `detach` 释放。
/// 两者都需要 `Lifecycle` 凭证，只有缓冲区自身能调用。
///
/// # Example
/// ```
/// use rtos_ringbuf::strategy::{RingOps, RingState, LOCK_FREE};
/// use rtos_ringbuf::RingError;
///
/// /// 只允许写入 ASCII 的策略，其余委托给无锁实现
/// struct AsciiOnly;
///
/// impl RingOps for AsciiOnly {
///     fn write(&self, state: &RingState<'_>, byte: u8) -> Result<(), RingError> {
///         if !byte.is_ascii() {
///             return Err(RingError::InvalidArgument);
///         }
///         LOCK_FREE.write(state, byte)
///     }
///     fn read(&self, state: &RingState<'_>) -> Result<u8, RingError> { LOCK_FREE.read(state) }
///     fn write_multi(&self, state: &RingState<'_>, data: &[u8]) -> usize { LOCK_FREE.write_multi(state, data) }
///     fn read_multi(&self, state: &RingState<'_>, out: &mut [u8]) -> usize { LOCK_FREE.read_multi(state, out) }
///     fn available(&self, state: &RingState<'_>) -> usize { LOCK_FREE.available(state) }
///     fn free_space(&self, state: &RingState<'_>) -> usize { LOCK_FREE.free_space(state) }
///     fn is_empty(&self, state: &RingState<'_>) -> bool { LOCK_FREE.is_empty(state) }
///     fn is_full(&self, state: &RingState<'_>) -> bool { LOCK_FREE.is_full(state) }
///     fn clear(&self, state: &RingState<'_>) { LOCK_FREE.clear(state) }
/// }
/// ```
pub trait RingOps: Sync {
    /// 写入单个字节
    fn write(&self, state: &RingState<'_>, byte: u8) -> Result<(), RingError>;

    /// 读取单个字节
    fn read(&self, state: &RingState<'_>) -> Result<u8, RingError>;

    /// 批量写入，返回实际写入的字节数
    fn write_multi(&self, state: &RingState<'_>, data: &[u8]) -> usize;

    /// 批量读取，返回实际读取的字节数
    fn read_multi(&self, state: &RingState<'_>, out: &mut [u8]) -> usize;

    /// 可读取的数据量
    fn available(&self, state: &RingState<'_>) -> usize;

    /// 剩余可写空间
    fn free_space(&self, state: &RingState<'_>) -> usize;

    /// 是否为空
    fn is_empty(&self, state: &RingState<'_>) -> bool;

    /// 是否已满
    fn is_full(&self, state: &RingState<'_>) -> bool;

    /// 清空 (仅重置指针)
    fn clear(&self, state: &RingState<'_>);

    /// 创建策略资源，返回需要缓冲区保存的锁句柄
    ///
    /// # Errors
    /// 资源创建失败时返回 `ResourceCreationFailed`，缓冲区初始化随之失败
    fn attach(&self, _cx: Lifecycle) -> Result<Option<LockHandle>, RingError> {
        Ok(None)
    }

    /// 释放 `attach` 创建的资源
    fn detach(&self, _cx: Lifecycle, _lock: Option<LockHandle>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_id_layout() {
        assert!(!StrategyId::LOCK_FREE.is_custom());
        assert!(!StrategyId::MUTEX.is_custom());
        assert!(StrategyId::CUSTOM_BASE.is_custom());
        assert_eq!(StrategyId::custom(0), StrategyId::CUSTOM_BASE);
        assert_eq!(StrategyId::custom(2).raw(), 5);
        assert_eq!(StrategyId::custom(u8::MAX).raw(), u8::MAX);
    }

    #[test]
    fn test_strategy_id_display() {
        assert_eq!(StrategyId::LOCK_FREE.to_string(), "lock-free");
        assert_eq!(StrategyId::CRITICAL_SECTION.to_string(), "critical-section");
        assert_eq!(StrategyId::MUTEX.to_string(), "mutex");
        assert_eq!(StrategyId::new(7).to_string(), "custom#7");
    }
}

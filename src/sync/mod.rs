//! 同步原语模块
//!
//! - `RawRing`: 字节环形缓冲区核心算法 (无同步)
//! - `InterruptMask` / `CsInterruptMask`: 中断屏蔽接口与默认实现
//! - `LockProvider` / `LockPool`: 互斥锁接口与默认锁池

pub mod lock_pool;
pub mod primitives;
pub mod ringbuffer;

pub use lock_pool::LockPool;
pub use primitives::{
    CsInterruptMask, InterruptMask, IrqGuard, LockGuard, LockHandle, LockProvider,
};
pub use ringbuffer::{RawRing, RingStats};

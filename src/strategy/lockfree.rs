//! 无锁策略
//!
//! 适用场景:
//! - 单生产者单消费者 (SPSC)
//! - ISR → 主循环
//! - DMA 回调 → 任务处理
//!
//! 直接调用核心算法，从不获取任何资源，从不阻塞，不会造成优先级反转。
//! 可见性由核心算法中 `head` / `tail` 的 Release 存储与 Acquire 加载保证，
//! 单核和多核目标上同样成立。
//!
//! # Warning
//! 生产者操作 (`write` / `write_multi`) 只能来自一个执行上下文，
//! 消费者操作 (`read` / `read_multi` / `clear`) 只能来自另一个 (可以不同的) 执行上下文。
//! 多个生产者或多个消费者属于误用。
//!
//! 批量操作只保证单次调用内的快照一致；与并发的同角色调用之间没有原子性保证。
//!
//! # Safety
//! 违反上述约定不会导致未定义行为: 存储区按 `AtomicU8` 单元读写，
//! 索引始终落在存储区内。后果仅限于数据丢失、重复或读到过期字节，
//! 需要多生产者 / 多消费者时应改用关中断或互斥锁策略。

use crate::error::RingError;

use super::{RingOps, RingState};

/// 无锁操作表
#[derive(Debug, Clone, Copy, Default)]
pub struct LockFree;

/// 内置无锁策略
#[cfg(feature = "lock-free")]
pub static LOCK_FREE: LockFree = LockFree;

impl RingOps for LockFree {
    #[inline]
    fn write(&self, state: &RingState<'_>, byte: u8) -> Result<(), RingError> {
        state.core().push(byte)
    }

    #[inline]
    fn read(&self, state: &RingState<'_>) -> Result<u8, RingError> {
        state.core().pop()
    }

    #[inline]
    fn write_multi(&self, state: &RingState<'_>, data: &[u8]) -> usize {
        state.core().push_slice(data)
    }

    #[inline]
    fn read_multi(&self, state: &RingState<'_>, out: &mut [u8]) -> usize {
        state.core().pop_slice(out)
    }

    #[inline]
    fn available(&self, state: &RingState<'_>) -> usize {
        state.core().available()
    }

    #[inline]
    fn free_space(&self, state: &RingState<'_>) -> usize {
        state.core().free_space()
    }

    #[inline]
    fn is_empty(&self, state: &RingState<'_>) -> bool {
        state.core().is_empty()
    }

    #[inline]
    fn is_full(&self, state: &RingState<'_>) -> bool {
        state.core().is_full()
    }

    #[inline]
    fn clear(&self, state: &RingState<'_>) {
        state.core().clear()
    }
}

//! 关中断策略
//!
//! 适用场景:
//! - 裸机系统 (无 RTOS)
//! - 多个中断源共享缓冲区
//! - 中断与前台任务之间通信
//!
//! 每个操作都在作用域内关中断: 保存中断状态 → 关中断 → 调用核心算法 → 恢复，
//! 任何返回路径 (包括失败提前返回) 都会恢复中断状态。
//!
//! # Warning
//! - 关中断期间所有中断被推迟；大块传输的延迟由调用方分块控制，本层不分块
//! - 只能排除同一核上的并发，不适用于多核共享

use crate::error::RingError;
use crate::sync::{CsInterruptMask, InterruptMask, IrqGuard};

use super::{RingOps, RingState};

/// 关中断操作表
///
/// # Type Parameters
/// * `M` - 中断屏蔽提供者，默认使用 `critical-section` crate
pub struct CriticalSection<M: InterruptMask = CsInterruptMask> {
    mask: M,
}

/// 内置关中断策略
#[cfg(feature = "critical-section-strategy")]
pub static CRITICAL_SECTION: CriticalSection = CriticalSection::new(CsInterruptMask);

impl<M: InterruptMask> CriticalSection<M> {
    /// 使用指定的中断屏蔽提供者
    pub const fn new(mask: M) -> Self {
        Self { mask }
    }

    /// 中断屏蔽提供者
    pub fn mask(&self) -> &M {
        &self.mask
    }

    #[inline(always)]
    fn masked(&self) -> IrqGuard<'_, M> {
        IrqGuard::enter(&self.mask)
    }
}

impl<M: InterruptMask> RingOps for CriticalSection<M> {
    fn write(&self, state: &RingState<'_>, byte: u8) -> Result<(), RingError> {
        let _irq = self.masked();
        state.core().push(byte)
    }

    fn read(&self, state: &RingState<'_>) -> Result<u8, RingError> {
        let _irq = self.masked();
        state.core().pop()
    }

    fn write_multi(&self, state: &RingState<'_>, data: &[u8]) -> usize {
        let _irq = self.masked();
        state.core().push_slice(data)
    }

    fn read_multi(&self, state: &RingState<'_>, out: &mut [u8]) -> usize {
        let _irq = self.masked();
        state.core().pop_slice(out)
    }

    fn available(&self, state: &RingState<'_>) -> usize {
        let _irq = self.masked();
        state.core().available()
    }

    fn free_space(&self, state: &RingState<'_>) -> usize {
        let _irq = self.masked();
        state.core().free_space()
    }

    fn is_empty(&self, state: &RingState<'_>) -> bool {
        let _irq = self.masked();
        state.core().is_empty()
    }

    fn is_full(&self, state: &RingState<'_>) -> bool {
        let _irq = self.masked();
        state.core().is_full()
    }

    fn clear(&self, state: &RingState<'_>) {
        let _irq = self.masked();
        state.core().clear()
    }
}

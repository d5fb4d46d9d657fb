//! 互斥锁策略
//!
//! 适用场景:
//! - FreeRTOS / RT-Thread / μC/OS 等 RTOS 环境
//! - 多线程之间的缓冲区共享
//!
//! 每个操作在作用域内持有互斥锁。锁在缓冲区初始化时创建 (`attach`)，
//! 在销毁时删除 (`detach`)；创建失败则整个初始化失败。
//!
//! 唯一可能挂起调用者的策略，延迟最高。
//!
//! # Warning
//! 不可在 ISR 中使用

use crate::config::MAX_LOCKS;
use crate::error::RingError;
use crate::sync::{LockGuard, LockHandle, LockPool, LockProvider};
use crate::util::log::*;

use super::{Lifecycle, RingOps, RingState};

/// 互斥锁操作表
///
/// # Type Parameters
/// * `P` - 互斥锁提供者 (RTOS 互斥锁封装，或默认的 `LockPool`)
///
/// # Example
/// ```ignore
/// // 接入 RTOS 互斥锁
/// struct FreeRtosLocks;
/// impl LockProvider for FreeRtosLocks { /* xSemaphoreCreateMutex ... */ }
///
/// static RTOS_MUTEX: MutexStrategy<FreeRtosLocks> = MutexStrategy::new(FreeRtosLocks);
/// register_strategy(StrategyId::CUSTOM_BASE, &RTOS_MUTEX)?;
/// ```
pub struct MutexStrategy<P: LockProvider> {
    provider: P,
}

/// 内置互斥锁策略 (默认锁池)
#[cfg(feature = "mutex-strategy")]
pub static MUTEX: MutexStrategy<LockPool<MAX_LOCKS>> = MutexStrategy::new(LockPool::new());

impl<P: LockProvider> MutexStrategy<P> {
    /// 使用指定的互斥锁提供者
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// 互斥锁提供者
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[inline]
    fn locked(&self, state: &RingState<'_>) -> Option<LockGuard<'_, P>> {
        state
            .lock()
            .and_then(|handle| LockGuard::acquire(&self.provider, handle))
    }
}

impl<P: LockProvider> RingOps for MutexStrategy<P> {
    fn write(&self, state: &RingState<'_>, byte: u8) -> Result<(), RingError> {
        let _guard = self.locked(state).ok_or(RingError::Uninitialized)?;
        state.core().push(byte)
    }

    fn read(&self, state: &RingState<'_>) -> Result<u8, RingError> {
        let _guard = self.locked(state).ok_or(RingError::Uninitialized)?;
        state.core().pop()
    }

    fn write_multi(&self, state: &RingState<'_>, data: &[u8]) -> usize {
        if data.is_empty() {
            return 0;
        }
        match self.locked(state) {
            Some(_guard) => state.core().push_slice(data),
            None => 0,
        }
    }

    fn read_multi(&self, state: &RingState<'_>, out: &mut [u8]) -> usize {
        if out.is_empty() {
            return 0;
        }
        match self.locked(state) {
            Some(_guard) => state.core().pop_slice(out),
            None => 0,
        }
    }

    fn available(&self, state: &RingState<'_>) -> usize {
        match self.locked(state) {
            Some(_guard) => state.core().available(),
            None => 0,
        }
    }

    fn free_space(&self, state: &RingState<'_>) -> usize {
        match self.locked(state) {
            Some(_guard) => state.core().free_space(),
            None => 0,
        }
    }

    fn is_empty(&self, state: &RingState<'_>) -> bool {
        match self.locked(state) {
            Some(_guard) => state.core().is_empty(),
            None => true,
        }
    }

    fn is_full(&self, state: &RingState<'_>) -> bool {
        match self.locked(state) {
            Some(_guard) => state.core().is_full(),
            None => false,
        }
    }

    fn clear(&self, state: &RingState<'_>) {
        if let Some(_guard) = self.locked(state) {
            state.core().clear();
        }
    }

    fn attach(&self, _cx: Lifecycle) -> Result<Option<LockHandle>, RingError> {
        match self.provider.create_lock() {
            Some(handle) => Ok(Some(handle)),
            None => {
                log_error!("mutex strategy: lock creation failed");
                Err(RingError::ResourceCreationFailed)
            }
        }
    }

    fn detach(&self, _cx: Lifecycle, lock: Option<LockHandle>) {
        if let Some(handle) = lock {
            self.provider.destroy_lock(handle);
        }
    }
}

//! 平台协作接口
//!
//! 策略层依赖的两类平台能力，由组装应用注入:
//! - `InterruptMask`: 保存并关闭中断 / 恢复中断 (关中断策略)
//! - `LockProvider`: 创建 / 加锁 / 解锁 / 删除互斥锁 (互斥锁策略)
//!
//! 默认的中断屏蔽实现基于 `critical-section` crate，
//! 具体的关中断方式由平台通过 `critical_section::set_impl!` 提供。

use critical_section::RestoreState;

// ===== 中断屏蔽 =====

/// 中断屏蔽提供者
///
/// `enter` 保存当前中断使能状态并关闭中断，返回令牌；
/// `exit` 用该令牌恢复之前的状态。
pub trait InterruptMask: Sync {
    /// 保存的中断状态
    type Token;

    /// 保存当前中断状态并关闭中断
    ///
    /// # Safety
    /// 返回的令牌必须按嵌套顺序 (后进先出) 恰好传给 `exit` 一次
    unsafe fn enter(&self) -> Self::Token;

    /// 恢复 `enter` 保存的中断状态
    ///
    /// # Safety
    /// `token` 必须来自同一提供者最近一次尚未恢复的 `enter`
    unsafe fn exit(&self, token: Self::Token);
}

/// 基于 `critical-section` crate 的中断屏蔽
///
/// 单核 MCU 上即关中断；主机 (`critical-section/std`) 上为全局可重入锁
#[derive(Debug, Clone, Copy, Default)]
pub struct CsInterruptMask;

impl InterruptMask for CsInterruptMask {
    type Token = RestoreState;

    #[inline(always)]
    unsafe fn enter(&self) -> RestoreState {
        critical_section::acquire()
    }

    #[inline(always)]
    unsafe fn exit(&self, token: RestoreState) {
        critical_section::release(token)
    }
}

/// 作用域内的中断屏蔽
///
/// 创建时关中断，drop 时恢复 (所有返回路径均会恢复)
pub struct IrqGuard<'m, M: InterruptMask> {
    mask: &'m M,
    token: Option<M::Token>,
}

impl<'m, M: InterruptMask> IrqGuard<'m, M> {
    /// 关中断并返回守卫
    #[inline(always)]
    pub fn enter(mask: &'m M) -> Self {
        // Safety: 令牌只在 drop 中按嵌套顺序归还
        let token = unsafe { mask.enter() };
        Self { mask, token: Some(token) }
    }
}

impl<M: InterruptMask> Drop for IrqGuard<'_, M> {
    #[inline(always)]
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            // Safety: 令牌来自 `enter`，且守卫按作用域嵌套释放
            unsafe { self.mask.exit(token) };
        }
    }
}

// ===== 互斥锁 =====

/// 互斥锁句柄
///
/// 对策略层不透明，含义由 `LockProvider` 决定 (槽位号、RTOS 句柄等)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "log-defmt", derive(defmt::Format))]
pub struct LockHandle(usize);

impl LockHandle {
    /// 由提供者内部表示构造
    #[inline(always)]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// 提供者内部表示
    #[inline(always)]
    pub const fn into_raw(self) -> usize {
        self.0
    }
}

/// 互斥锁提供者 (通常来自 RTOS 调度器)
///
/// `lock` 可以挂起调用者直到获得锁，理想情况下支持优先级继承。
///
/// # Warning
/// 互斥锁不可在 ISR 中使用；这是调用方的义务，策略层无法检查
pub trait LockProvider: Sync {
    /// 创建互斥锁，资源不足时返回 `None`
    fn create_lock(&self) -> Option<LockHandle>;

    /// 加锁 (可能阻塞)
    ///
    /// `handle` 不是存活的锁 (从未创建或已删除) 时返回 `false`，且不持有任何锁
    fn lock(&self, handle: LockHandle) -> bool;

    /// 解锁
    fn unlock(&self, handle: LockHandle);

    /// 删除互斥锁
    fn destroy_lock(&self, handle: LockHandle);
}

/// 作用域内持有的互斥锁，drop 时解锁
pub struct LockGuard<'p, P: LockProvider + ?Sized> {
    provider: &'p P,
    handle: LockHandle,
}

impl<'p, P: LockProvider + ?Sized> LockGuard<'p, P> {
    /// 加锁并返回守卫，句柄失效时返回 `None`
    #[inline]
    pub fn acquire(provider: &'p P, handle: LockHandle) -> Option<Self> {
        provider
            .lock(handle)
            .then_some(Self { provider, handle })
    }
}

impl<P: LockProvider + ?Sized> Drop for LockGuard<'_, P> {
    #[inline]
    fn drop(&mut self) {
        self.provider.unlock(self.handle);
    }
}

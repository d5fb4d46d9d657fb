//! 固定容量互斥锁池
//!
//! 没有 RTOS 时的默认 `LockProvider`:
//! - 槽位分配使用无锁位图 (O(1) 分配和释放)
//! - 加锁为自旋等待；`std` feature 下等待时让出线程
//! - 池耗尽时 `create_lock` 失败，缓冲区初始化随之失败
//!
//! # 限制
//!
//! 不支持优先级继承。接入 RTOS 时应把原生互斥锁封装成
//! `LockProvider`，再以自定义策略 ID 注册 `MutexStrategy`。

use core::sync::atomic::Ordering;
use portable_atomic::{AtomicBool, AtomicU64};

use super::primitives::{LockHandle, LockProvider};

/// 位图追踪器 (支持最多 64 个槽位)
struct Bitmap64 {
    bits: AtomicU64,
}

impl Bitmap64 {
    const fn new() -> Self {
        Self {
            bits: AtomicU64::new(0),
        }
    }

    /// 在前 `limit` 位中分配一个空闲槽位
    fn alloc(&self, limit: usize) -> Option<usize> {
        loop {
            let current = self.bits.load(Ordering::Acquire);

            // 查找第一个 0 位
            let free_bit = (!current).trailing_zeros() as usize;
            if free_bit >= limit {
                return None; // 全满
            }

            let new_bits = current | (1u64 << free_bit);

            if self
                .bits
                .compare_exchange_weak(current, new_bits, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                return Some(free_bit);
            }
            // CAS 失败，重试
        }
    }

    /// 释放槽位，返回该槽位之前是否已分配
    fn free(&self, index: usize) -> bool {
        let mask = 1u64 << index;
        self.bits.fetch_and(!mask, Ordering::AcqRel) & mask != 0
    }

    /// 获取已分配数量
    fn count(&self) -> usize {
        self.bits.load(Ordering::Relaxed).count_ones() as usize
    }

    /// 检查槽位是否已分配
    fn is_allocated(&self, index: usize) -> bool {
        index < 64 && (self.bits.load(Ordering::Relaxed) & (1u64 << index)) != 0
    }
}

/// 互斥锁池
///
/// # Type Parameters
/// * `N` - 锁数量 (最大 64)
///
/// # Example
/// ```
/// use rtos_ringbuf::sync::{LockPool, LockProvider};
///
/// static LOCKS: LockPool<2> = LockPool::new();
///
/// let a = LOCKS.create_lock().unwrap();
/// let _b = LOCKS.create_lock().unwrap();
/// assert!(LOCKS.create_lock().is_none());
///
/// LOCKS.destroy_lock(a);
/// assert_eq!(LOCKS.allocated_count(), 1);
/// ```
pub struct LockPool<const N: usize> {
    slots: Bitmap64,
    held: [AtomicBool; N],
}

impl<const N: usize> LockPool<N> {
    /// 创建空锁池
    pub const fn new() -> Self {
        assert!(N > 0 && N <= 64, "LockPool size must be in 1..=64");

        const UNLOCKED: AtomicBool = AtomicBool::new(false);
        Self {
            slots: Bitmap64::new(),
            held: [UNLOCKED; N],
        }
    }

    /// 获取总容量
    pub const fn capacity(&self) -> usize {
        N
    }

    /// 获取已创建的锁数量
    pub fn allocated_count(&self) -> usize {
        self.slots.count()
    }

    /// 指定句柄的锁当前是否被持有
    pub fn is_locked(&self, handle: LockHandle) -> bool {
        self.slot(handle)
            .map(|held| held.load(Ordering::Acquire))
            .unwrap_or(false)
    }

    fn slot(&self, handle: LockHandle) -> Option<&AtomicBool> {
        let index = handle.into_raw();
        if self.slots.is_allocated(index) {
            self.held.get(index)
        } else {
            None
        }
    }

    #[inline(always)]
    fn relax() {
        #[cfg(feature = "std")]
        std::thread::yield_now();
        #[cfg(not(feature = "std"))]
        core::hint::spin_loop();
    }
}

impl<const N: usize> Default for LockPool<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LockProvider for LockPool<N> {
    fn create_lock(&self) -> Option<LockHandle> {
        let index = self.slots.alloc(N)?;
        Some(LockHandle::from_raw(index))
    }

    fn lock(&self, handle: LockHandle) -> bool {
        let Some(held) = self.slot(handle) else {
            return false;
        };
        while held
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            while held.load(Ordering::Relaxed) {
                Self::relax();
            }
        }

        // 等待期间锁可能已被删除
        if !self.slots.is_allocated(handle.into_raw()) {
            held.store(false, Ordering::Release);
            return false;
        }
        true
    }

    fn unlock(&self, handle: LockHandle) {
        // 持有标志只由 lock / unlock 改变，删除锁不会释放正在持有的锁
        if let Some(held) = self.held.get(handle.into_raw()) {
            held.store(false, Ordering::Release);
        }
    }

    fn destroy_lock(&self, handle: LockHandle) {
        let index = handle.into_raw();
        if index < N {
            self.slots.free(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap64_alloc_free() {
        let bitmap = Bitmap64::new();

        // 分配
        assert_eq!(bitmap.alloc(64), Some(0));
        assert_eq!(bitmap.alloc(64), Some(1));

        // 释放
        assert!(bitmap.free(0));
        assert!(!bitmap.free(0));

        // 再次分配应该得到 0
        assert_eq!(bitmap.alloc(64), Some(0));
        assert_eq!(bitmap.count(), 2);
    }

    #[test]
    fn test_bitmap64_respects_limit() {
        let bitmap = Bitmap64::new();
        assert_eq!(bitmap.alloc(1), Some(0));
        assert_eq!(bitmap.alloc(1), None);
    }

    #[test]
    fn test_pool_exhaustion_and_reuse() {
        let pool: LockPool<2> = LockPool::new();
        assert_eq!(pool.capacity(), 2);

        let a = pool.create_lock().unwrap();
        let b = pool.create_lock().unwrap();
        assert_ne!(a, b);
        assert!(pool.create_lock().is_none());

        pool.destroy_lock(a);
        assert_eq!(pool.allocated_count(), 1);
        assert_eq!(pool.create_lock(), Some(a));
    }

    #[test]
    fn test_lock_unlock() {
        let pool: LockPool<1> = LockPool::new();
        let handle = pool.create_lock().unwrap();

        assert!(pool.lock(handle));
        assert!(pool.is_locked(handle));
        pool.unlock(handle);
        assert!(!pool.is_locked(handle));

        // 删除后句柄失效
        pool.destroy_lock(handle);
        assert!(!pool.is_locked(handle));
        assert!(!pool.lock(handle));
    }

    #[test]
    fn test_lock_rejects_unknown_handles() {
        let pool: LockPool<2> = LockPool::new();
        let never_created = LockHandle::from_raw(1);
        let out_of_range = LockHandle::from_raw(70);

        assert!(!pool.lock(never_created));
        assert!(!pool.lock(never_created));
        assert!(!pool.lock(out_of_range));
        pool.unlock(out_of_range);
        pool.destroy_lock(out_of_range);
        assert_eq!(pool.allocated_count(), 0);
    }

    #[test]
    fn test_destroy_while_held_keeps_exclusion() {
        let pool: LockPool<1> = LockPool::new();
        let old = pool.create_lock().unwrap();
        assert!(pool.lock(old));

        // 锁在持有期间被删除并重新分配到同一槽位
        pool.destroy_lock(old);
        let new = pool.create_lock().unwrap();
        assert_eq!(new, old);
        assert!(pool.is_locked(new));

        pool.unlock(old);
        assert!(!pool.is_locked(new));
        assert!(pool.lock(new));
        pool.unlock(new);
    }

    #[test]
    fn test_lock_excludes_other_threads() {
        use std::sync::atomic::AtomicU32;

        static POOL: LockPool<1> = LockPool::new();
        static COUNTER: AtomicU32 = AtomicU32::new(0);

        let handle = POOL.create_lock().unwrap();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(move || {
                    for _ in 0..1000 {
                        assert!(POOL.lock(handle));
                        // 非原子的读-改-写，只有互斥时才不会丢失更新
                        let value = COUNTER.load(Ordering::Relaxed);
                        COUNTER.store(value + 1, Ordering::Relaxed);
                        POOL.unlock(handle);
                    }
                });
            }
        });
        assert_eq!(COUNTER.load(Ordering::Relaxed), 4000);
    }
}

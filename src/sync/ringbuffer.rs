//! 环形缓冲区核心算法
//!
//! 单槽牺牲设计 (single-slot sacrifice):
//! - 可用容量 = `size - 1`
//! - 空: `head == tail`
//! - 满: `(head + 1) % size == tail`
//!
//! 本模块只做索引与字节运算，不做任何同步。
//! 生产者只修改 `head`，消费者只修改 `tail`；
//! `head` / `tail` 以 Release 发布、以 Acquire 观察，
//! 保证消费者看到新的 `head` 时，之前写入的数据字节一定可见 (反之亦然)。
//!
//! 存储区按 `AtomicU8` 单元访问 (Relaxed)，顺序完全由 `head` / `tail` 保证。
//! 同一角色的多个调用者若未被上层策略互斥，只会丢失或重复数据，不会产生数据竞争。
//!
//! 每次调用只取一次 `head` / `tail` 快照；多个同角色调用者之间的互斥
//! 由上层策略保证 (关中断 / 互斥锁)，无锁策略下则依赖 SPSC 约定。

use portable_atomic::{AtomicU8, AtomicUsize, Ordering};
#[cfg(feature = "statistics")]
use portable_atomic::AtomicU32;

use crate::config::MIN_SIZE;
use crate::error::RingError;
use crate::util::log::*;

/// 读写统计快照
///
/// 计数单调递增，`clear` 不会重置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "log-defmt", derive(defmt::Format))]
pub struct RingStats {
    /// 成功写入的字节数
    pub writes: u32,
    /// 成功读出的字节数
    pub reads: u32,
    /// 溢出次数 (单字节写入被拒绝、批量写入被拒绝或被截断)
    pub overflows: u32,
}

/// `writes` / `overflows` 由生产者更新，`reads` 由消费者更新
#[cfg(feature = "statistics")]
struct Counters {
    writes: AtomicU32,
    reads: AtomicU32,
    overflows: AtomicU32,
}

#[cfg(feature = "statistics")]
impl Counters {
    const fn new() -> Self {
        Self {
            writes: AtomicU32::new(0),
            reads: AtomicU32::new(0),
            overflows: AtomicU32::new(0),
        }
    }

    fn snapshot(&self) -> RingStats {
        RingStats {
            writes: self.writes.load(Ordering::Relaxed),
            reads: self.reads.load(Ordering::Relaxed),
            overflows: self.overflows.load(Ordering::Relaxed),
        }
    }
}

/// 字节环形缓冲区核心
///
/// 借用调用方提供的存储区 (不拥有)，生命周期 `'a` 内独占该存储区。
///
/// # Example
/// ```
/// use rtos_ringbuf::sync::RawRing;
///
/// let mut storage = [0u8; 8];
/// let ring = RawRing::new(&mut storage).unwrap();
///
/// assert_eq!(ring.push_slice(b"hello"), 5);
/// let mut out = [0u8; 5];
/// assert_eq!(ring.pop_slice(&mut out), 5);
/// assert_eq!(&out, b"hello");
/// ```
pub struct RawRing<'a> {
    /// 数据存储 (调用方所有)
    cells: &'a [AtomicU8],
    /// 存储区总大小
    size: usize,
    /// 写入位置 (生产者更新)
    head: AtomicUsize,
    /// 读取位置 (消费者更新)
    tail: AtomicUsize,
    #[cfg(feature = "statistics")]
    counters: Counters,
}

impl<'a> RawRing<'a> {
    /// 在调用方存储区上创建空环形缓冲区
    ///
    /// # Errors
    /// 存储区长度小于 `config::MIN_SIZE` 时返回 `InvalidArgument`
    pub fn new(storage: &'a mut [u8]) -> Result<Self, RingError> {
        if storage.len() < MIN_SIZE {
            log_warn!("ring storage too small: {} bytes", storage.len());
            return Err(RingError::InvalidArgument);
        }

        let size = storage.len();
        // Safety: AtomicU8 与 u8 大小、对齐相同；独占借用保证 'a 内
        // 不存在对该存储区的其他 (非原子) 访问
        let cells = unsafe { &*(storage as *mut [u8] as *const [AtomicU8]) };

        Ok(Self {
            cells,
            size,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            #[cfg(feature = "statistics")]
            counters: Counters::new(),
        })
    }
    /// 存储区总大小
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    /// 可用容量 (`size - 1`)
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.size - 1
    }

    /// 当前写入位置
    #[inline(always)]
    pub fn head(&self) -> usize {
        self.head.load(Ordering::Acquire)
    }

    /// 当前读取位置
    #[inline(always)]
    pub fn tail(&self) -> usize {
        self.tail.load(Ordering::Acquire)
    }

    #[inline(always)]
    fn span(&self, head: usize, tail: usize) -> usize {
        debug_assert_msg!(
            head < self.size && tail < self.size,
            "ring index out of range: head={} tail={} size={}",
            head,
            tail,
            self.size
        );
        if head >= tail {
            head - tail
        } else {
            self.size - tail + head
        }
    }

    /// 可读取的数据量
    #[inline]
    pub fn available(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        self.span(head, tail)
    }

    /// 剩余可写空间
    #[inline]
    pub fn free_space(&self) -> usize {
        self.size - 1 - self.available()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// 是否已满
    #[inline]
    pub fn is_full(&self) -> bool {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + 1) % self.size == tail
    }

    /// 写入单个字节 (生产者)
    ///
    /// # Errors
    /// 缓冲区已满时返回 `Full`
    #[inline]
    pub fn push(&self, byte: u8) -> Result<(), RingError> {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        let next = (head + 1) % self.size;

        if next == tail {
            #[cfg(feature = "statistics")]
            self.counters.overflows.fetch_add(1, Ordering::Relaxed);
            return Err(RingError::Full);
        }

        self.cells[head].store(byte, Ordering::Relaxed);
        self.head.store(next, Ordering::Release);

        #[cfg(feature = "statistics")]
        self.counters.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// 读取单个字节 (消费者)
    ///
    /// # Errors
    /// 缓冲区为空时返回 `Empty`
    #[inline]
    pub fn pop(&self) -> Result<u8, RingError> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if head == tail {
            return Err(RingError::Empty);
        }

        let byte = self.cells[tail].load(Ordering::Relaxed);
        self.tail.store((tail + 1) % self.size, Ordering::Release);

        #[cfg(feature = "statistics")]
        self.counters.reads.fetch_add(1, Ordering::Relaxed);
        Ok(byte)
    }

    /// 批量写入 (生产者)
    ///
    /// # Returns
    /// 实际写入的字节数 (`min(data.len(), free_space())`)，
    /// 空间不足时部分写入，不视为错误
    pub fn push_slice(&self, data: &[u8]) -> usize {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        let free = self.size - 1 - self.span(head, tail);
        let to_write = data.len().min(free);

        if to_write == 0 {
            #[cfg(feature = "statistics")]
            if !data.is_empty() {
                self.counters.overflows.fetch_add(1, Ordering::Relaxed);
            }
            return 0;
        }

        // [head, size) 与 [0, ...) 两段，第二段可能为空
        let first = to_write.min(self.size - head);
        fill(&self.cells[head..head + first], &data[..first]);
        fill(&self.cells[..to_write - first], &data[first..to_write]);
        let next = (head + to_write) % self.size;
        self.head.store(next, Ordering::Release);

        #[cfg(feature = "statistics")]
        {
            self.counters.writes.fetch_add(to_write as u32, Ordering::Relaxed);
            if to_write < data.len() {
                self.counters.overflows.fetch_add(1, Ordering::Relaxed);
            }
        }
        to_write
    }

    /// 批量读取 (消费者)
    ///
    /// # Returns
    /// 实际读取的字节数 (`min(out.len(), available())`)
    pub fn pop_slice(&self, out: &mut [u8]) -> usize {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        let to_read = out.len().min(self.span(head, tail));

        if to_read == 0 {
            return 0;
        }

        let first = to_read.min(self.size - tail);
        let (front, back) = out[..to_read].split_at_mut(first);
        drain(&self.cells[tail..tail + first], front);
        drain(&self.cells[..to_read - first], back);
        let next = (tail + to_read) % self.size;
        self.tail.store(next, Ordering::Release);

        #[cfg(feature = "statistics")]
        self.counters.reads.fetch_add(to_read as u32, Ordering::Relaxed);
        to_read
    }

    /// 清空缓冲区 (消费者)
    ///
    /// 仅令 `tail = head`，保留生产者写入位置，不擦除存储内容。
    /// 统计计数不受影响 (`writes` 属于生产者，消费者侧不能安全重置)。
    #[inline]
    pub fn clear(&self) {
        let head = self.head.load(Ordering::Acquire);
        self.tail.store(head, Ordering::Release);
    }

    /// 统计快照
    #[cfg(feature = "statistics")]
    pub fn stats(&self) -> RingStats {
        self.counters.snapshot()
    }
}

#[inline]
fn fill(cells: &[AtomicU8], src: &[u8]) {
    for (cell, &byte) in cells.iter().zip(src) {
        cell.store(byte, Ordering::Relaxed);
    }
}

#[inline]
fn drain(cells: &[AtomicU8], dst: &mut [u8]) {
    for (slot, cell) in dst.iter_mut().zip(cells) {
        *slot = cell.load(Ordering::Relaxed);
    }
}

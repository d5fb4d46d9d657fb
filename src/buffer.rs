//! 环形缓冲区 (工厂 + 分发)
//!
//! 创建时按策略 ID 绑定操作表，之后所有操作都经由该表分发。
//! 初始化是原子的: 参数校验、策略解析、策略资源创建任一失败，
//! 缓冲区都保持未初始化状态。
//!
//! # Example
//! ```
//! use rtos_ringbuf::{RingBuffer, StrategyId};
//!
//! let mut storage = [0u8; 16];
//! let rb = RingBuffer::create(&mut storage, StrategyId::LOCK_FREE).unwrap();
//!
//! // ISR 侧
//! rb.write(0x55).unwrap();
//!
//! // 任务侧
//! assert_eq!(rb.read(), Ok(0x55));
//! ```

use crate::error::RingError;
use crate::strategy::{registry, Lifecycle, RingOps, RingState, StrategyId, StrategyRegistry};
#[cfg(feature = "statistics")]
use crate::sync::RingStats;
use crate::sync::RawRing;
use crate::util::log::*;

/// 已绑定的状态与操作表
struct Binding<'a> {
    state: RingState<'a>,
    ops: &'static dyn RingOps,
    id: StrategyId,
}

/// 字节环形缓冲区
///
/// 存储区由调用方分配并持有，缓冲区在生命周期 `'a` 内借用它。
/// 可用容量为存储区大小减一。
///
/// 静态放置时先用 `RingBuffer::new()` 构造未初始化状态，再调用 `init`:
///
/// ```
/// use rtos_ringbuf::{RingBuffer, StrategyId};
/// use static_cell::StaticCell;
///
/// static STORAGE: StaticCell<[u8; 64]> = StaticCell::new();
/// static UART_RX: StaticCell<RingBuffer<'static>> = StaticCell::new();
///
/// let storage = STORAGE.init([0; 64]);
/// let rb = UART_RX.init(RingBuffer::new());
/// rb.init(storage, StrategyId::CRITICAL_SECTION).unwrap();
///
/// let rb: &'static RingBuffer<'static> = rb;
/// assert_eq!(rb.free_space(), 63);
/// ```
pub struct RingBuffer<'a> {
    binding: Option<Binding<'a>>,
}

impl<'a> RingBuffer<'a> {
    /// 未初始化的缓冲区 (所有操作失败，直到 `init` 成功)
    pub const fn new() -> Self {
        Self { binding: None }
    }

    /// 在全局注册表中解析策略并创建缓冲区
    ///
    /// # Errors
    /// - `InvalidArgument`: 存储区小于 `config::MIN_SIZE`
    /// - `StrategyUnavailable`: 策略未编译或未注册
    /// - `ResourceCreationFailed`: 策略资源 (互斥锁) 创建失败
    pub fn create(storage: &'a mut [u8], id: StrategyId) -> Result<Self, RingError> {
        Self::create_in(registry(), storage, id)
    }

    /// 在指定注册表中解析策略并创建缓冲区
    pub fn create_in<const N: usize>(
        registry: &StrategyRegistry<N>,
        storage: &'a mut [u8],
        id: StrategyId,
    ) -> Result<Self, RingError> {
        let mut rb = Self::new();
        rb.init_in(registry, storage, id)?;
        Ok(rb)
    }

    /// 原地初始化 (全局注册表)
    ///
    /// 已初始化的缓冲区会先销毁原有绑定
    pub fn init(&mut self, storage: &'a mut [u8], id: StrategyId) -> Result<(), RingError> {
        self.init_in(registry(), storage, id)
    }

    /// 原地初始化 (指定注册表)
    pub fn init_in<const N: usize>(
        &mut self,
        registry: &StrategyRegistry<N>,
        storage: &'a mut [u8],
        id: StrategyId,
    ) -> Result<(), RingError> {
        self.destroy();

        let core = RawRing::new(storage)?;
        let ops = registry.resolve(id).inspect_err(|_| {
            log_warn!("ring buffer init: strategy {} unavailable", id.raw());
        })?;
        let lock = ops.attach(Lifecycle::new())?;

        log_debug!(
            "ring buffer init: size={} strategy={}",
            core.size(),
            id.raw()
        );
        self.binding = Some(Binding {
            state: RingState::new(core, lock),
            ops,
            id,
        });
        Ok(())
    }

    /// 销毁缓冲区，释放策略资源
    ///
    /// 不释放存储区 (由调用方管理)；之后所有操作失败，直到重新 `init`。
    /// 重复调用无副作用。
    pub fn destroy(&mut self) {
        if let Some(binding) = self.binding.take() {
            binding.ops.detach(Lifecycle::new(), binding.state.lock());
            log_debug!("ring buffer destroyed: strategy={}", binding.id.raw());
        }
    }

    /// 是否已初始化
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.binding.is_some()
    }

    /// 绑定的策略 ID
    #[inline]
    pub fn strategy(&self) -> Option<StrategyId> {
        self.binding.as_ref().map(|b| b.id)
    }

    /// 绑定的操作表 (性能关键场景，如 ISR 中直接调用)
    ///
    /// ```
    /// use rtos_ringbuf::{RingBuffer, StrategyId};
    ///
    /// let mut storage = [0u8; 8];
    /// let rb = RingBuffer::create(&mut storage, StrategyId::LOCK_FREE).unwrap();
    ///
    /// let (ops, state) = (rb.ops().unwrap(), rb.state().unwrap());
    /// ops.write(state, 1).unwrap();
    /// assert_eq!(rb.available(), 1);
    /// ```
    #[inline]
    pub fn ops(&self) -> Option<&'static dyn RingOps> {
        self.binding.as_ref().map(|b| b.ops)
    }

    /// 绑定的状态
    #[inline]
    pub fn state(&self) -> Option<&RingState<'a>> {
        self.binding.as_ref().map(|b| &b.state)
    }

    /// 存储区总大小 (未初始化时为 0)
    #[inline]
    pub fn size(&self) -> usize {
        self.binding.as_ref().map_or(0, |b| b.state.core().size())
    }

    /// 可用容量 (`size - 1`，未初始化时为 0)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.binding.as_ref().map_or(0, |b| b.state.core().capacity())
    }

    /// 写入单个字节
    ///
    /// # Errors
    /// `Full` 或 `Uninitialized`
    #[inline]
    pub fn write(&self, byte: u8) -> Result<(), RingError> {
        match &self.binding {
            Some(b) => b.ops.write(&b.state, byte),
            None => Err(RingError::Uninitialized),
        }
    }

    /// 读取单个字节
    ///
    /// # Errors
    /// `Empty` 或 `Uninitialized`
    #[inline]
    pub fn read(&self) -> Result<u8, RingError> {
        match &self.binding {
            Some(b) => b.ops.read(&b.state),
            None => Err(RingError::Uninitialized),
        }
    }

    /// 批量写入
    ///
    /// # Returns
    /// 实际写入的字节数 (可能小于 `data.len()`)
    #[inline]
    pub fn write_multi(&self, data: &[u8]) -> usize {
        match &self.binding {
            Some(b) => b.ops.write_multi(&b.state, data),
            None => 0,
        }
    }

    /// 批量读取
    ///
    /// # Returns
    /// 实际读取的字节数 (可能小于 `out.len()`)
    #[inline]
    pub fn read_multi(&self, out: &mut [u8]) -> usize {
        match &self.binding {
            Some(b) => b.ops.read_multi(&b.state, out),
            None => 0,
        }
    }

    /// 可读取的数据量
    #[inline]
    pub fn available(&self) -> usize {
        match &self.binding {
            Some(b) => b.ops.available(&b.state),
            None => 0,
        }
    }

    /// 剩余可写空间
    #[inline]
    pub fn free_space(&self) -> usize {
        match &self.binding {
            Some(b) => b.ops.free_space(&b.state),
            None => 0,
        }
    }

    /// 是否为空 (未初始化视为空)
    #[inline]
    pub fn is_empty(&self) -> bool {
        match &self.binding {
            Some(b) => b.ops.is_empty(&b.state),
            None => true,
        }
    }

    /// 是否已满 (未初始化视为未满)
    #[inline]
    pub fn is_full(&self) -> bool {
        match &self.binding {
            Some(b) => b.ops.is_full(&b.state),
            None => false,
        }
    }

    /// 清空缓冲区
    ///
    /// 仅令读指针追上写指针，不清除实际数据
    #[inline]
    pub fn clear(&self) {
        if let Some(b) = &self.binding {
            b.ops.clear(&b.state);
        }
    }

    /// 读写统计 (未初始化时为全零)
    #[cfg(feature = "statistics")]
    pub fn stats(&self) -> RingStats {
        self.binding
            .as_ref()
            .map(|b| b.state.stats())
            .unwrap_or_default()
    }
}

impl Default for RingBuffer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RingBuffer<'_> {
    fn drop(&mut self) {
        self.destroy();
    }
}

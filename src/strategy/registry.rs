//! 策略注册表 / 工厂
//!
//! 把策略 ID 解析成操作表:
//! 1. 内置策略 (已编译) → 对应的静态表
//! 2. `id >= CUSTOM_BASE` → 在有界注册表中查找
//! 3. 其余 → `StrategyUnavailable`
//!
//! 注册表只追加、容量固定、拒绝重复 ID，查找与插入顺序无关。
//!
//! # 前置条件
//!
//! 自定义策略应在系统启动阶段、缓冲区被并发使用之前注册。
//! 注册表内部用临界区保护，启动后注册也是安全的，但会短暂关中断。

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

use crate::config::MAX_CUSTOM_STRATEGIES;
use crate::error::RingError;
use crate::util::log::*;

use super::{RingOps, StrategyId};

type Entry = (StrategyId, &'static dyn RingOps);

/// 有界策略注册表
///
/// # Type Parameters
/// * `N` - 最多可注册的自定义策略数量
pub struct StrategyRegistry<const N: usize> {
    custom: Mutex<CriticalSectionRawMutex, RefCell<Vec<Entry, N>>>,
}

/// 全局注册表 (启动时为空，之后只追加)
static REGISTRY: StrategyRegistry<MAX_CUSTOM_STRATEGIES> = StrategyRegistry::new();

/// 全局策略注册表
#[inline]
pub fn registry() -> &'static StrategyRegistry<MAX_CUSTOM_STRATEGIES> {
    &REGISTRY
}

/// 向全局注册表注册自定义策略
///
/// # Example
/// ```
/// use rtos_ringbuf::strategy::{register_strategy, StrategyId, LOCK_FREE};
/// use rtos_ringbuf::RingError;
///
/// register_strategy(StrategyId::custom(0), &LOCK_FREE).unwrap();
/// assert_eq!(
///     register_strategy(StrategyId::custom(0), &LOCK_FREE),
///     Err(RingError::DuplicateStrategy)
/// );
/// ```
pub fn register_strategy(id: StrategyId, ops: &'static dyn RingOps) -> Result<(), RingError> {
    REGISTRY.register(id, ops)
}

impl<const N: usize> StrategyRegistry<N> {
    /// 创建空注册表
    pub const fn new() -> Self {
        Self {
            custom: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    /// 注册自定义策略
    ///
    /// # Errors
    /// - `InvalidArgument`: `id < CUSTOM_BASE`
    /// - `DuplicateStrategy`: `id` 已注册
    /// - `RegistryFull`: 注册表已满
    pub fn register(&self, id: StrategyId, ops: &'static dyn RingOps) -> Result<(), RingError> {
        if !id.is_custom() {
            log_warn!("refusing to register built-in strategy id {}", id.raw());
            return Err(RingError::InvalidArgument);
        }

        self.custom.lock(|entries| {
            let mut entries = entries.borrow_mut();
            if entries.iter().any(|(existing, _)| *existing == id) {
                log_warn!("strategy {} already registered", id.raw());
                return Err(RingError::DuplicateStrategy);
            }
            entries.push((id, ops)).map_err(|_| {
                log_warn!("strategy registry full ({} entries)", N);
                RingError::RegistryFull
            })?;
            log_info!("registered custom strategy {}", id.raw());
            Ok(())
        })
    }

    /// 解析策略 ID
    ///
    /// # Errors
    /// ID 未知、未编译或未注册时返回 `StrategyUnavailable`
    pub fn resolve(&self, id: StrategyId) -> Result<&'static dyn RingOps, RingError> {
        if let Some(ops) = builtin(id) {
            return Ok(ops);
        }
        if !id.is_custom() {
            return Err(RingError::StrategyUnavailable);
        }

        self.custom
            .lock(|entries| {
                entries
                    .borrow()
                    .iter()
                    .find(|(existing, _)| *existing == id)
                    .map(|(_, ops)| *ops)
            })
            .ok_or(RingError::StrategyUnavailable)
    }

    /// 已注册的自定义策略数量
    pub fn len(&self) -> usize {
        self.custom.lock(|entries| entries.borrow().len())
    }

    /// 是否没有注册任何自定义策略
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 最多可注册的自定义策略数量
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for StrategyRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// 已编译的内置策略
fn builtin(id: StrategyId) -> Option<&'static dyn RingOps> {
    match id {
        #[cfg(feature = "lock-free")]
        StrategyId::LOCK_FREE => Some(&super::LOCK_FREE),
        #[cfg(feature = "critical-section-strategy")]
        StrategyId::CRITICAL_SECTION => Some(&super::CRITICAL_SECTION),
        #[cfg(feature = "mutex-strategy")]
        StrategyId::MUTEX => Some(&super::MUTEX),
        _ => None,
    }
}

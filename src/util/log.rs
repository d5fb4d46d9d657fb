//! 条件编译日志系统
//!
//! 根据 feature 选择不同的日志后端:
//! - `log-defmt`: 使用 defmt (高效二进制日志)
//! - `log-tracing`: 使用 tracing (主机/调试环境)
//! - 默认: 完全禁用日志 (零开销)
//!
//! 只有初始化、销毁和策略注册路径会打日志，
//! 读写热路径 (可能运行在 ISR 中) 从不打日志。
//!
//! # 日志级别
//! - `log_error!`: 错误信息
//! - `log_warn!`: 警告信息
//! - `log_info!`: 一般信息
//! - `log_debug!`: 调试信息
//! - `log_trace!`: 详细跟踪

// ===================================================================
// defmt 后端 (feature = "log-defmt")
// ===================================================================
#[cfg(feature = "log-defmt")]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { defmt::info!($($arg)*) };
}

#[cfg(feature = "log-defmt")]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { defmt::debug!($($arg)*) };
}

#[cfg(feature = "log-defmt")]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { defmt::warn!($($arg)*) };
}

#[cfg(feature = "log-defmt")]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { defmt::error!($($arg)*) };
}

#[cfg(feature = "log-defmt")]
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => { defmt::trace!($($arg)*) };
}

// ===================================================================
// tracing 后端 (feature = "log-tracing")
// ===================================================================
#[cfg(all(feature = "log-tracing", not(feature = "log-defmt")))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { tracing::info!(target: "ringbuf", $($arg)*) };
}

#[cfg(all(feature = "log-tracing", not(feature = "log-defmt")))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { tracing::debug!(target: "ringbuf", $($arg)*) };
}

#[cfg(all(feature = "log-tracing", not(feature = "log-defmt")))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { tracing::warn!(target: "ringbuf", $($arg)*) };
}

#[cfg(all(feature = "log-tracing", not(feature = "log-defmt")))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { tracing::error!(target: "ringbuf", $($arg)*) };
}

#[cfg(all(feature = "log-tracing", not(feature = "log-defmt")))]
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => { tracing::trace!(target: "ringbuf", $($arg)*) };
}

// ===================================================================
// 空实现 (无日志 feature)
// ===================================================================
#[cfg(not(any(feature = "log-defmt", feature = "log-tracing")))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(not(any(feature = "log-defmt", feature = "log-tracing")))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(any(feature = "log-defmt", feature = "log-tracing")))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(any(feature = "log-defmt", feature = "log-tracing")))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}

#[cfg(not(any(feature = "log-defmt", feature = "log-tracing")))]
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {};
}

// ===================================================================
// 便捷重导出
// ===================================================================
pub use log_info;
pub use log_debug;
pub use log_warn;
pub use log_error;
pub use log_trace;

// ===================================================================
// 断言宏 (release 模式下不检查)
// ===================================================================

/// Debug 断言 (仅在 debug 模式下检查)
///
/// 失败时先记录错误日志再 panic，用于核心算法的索引不变量
#[macro_export]
macro_rules! debug_assert_msg {
    ($cond:expr, $($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            if !$cond {
                $crate::log_error!($($arg)*);
                panic!($($arg)*);
            }
        }
    };
}

pub use debug_assert_msg;

//! 环形缓冲区错误类型

use core::fmt;

/// 环形缓冲区错误
///
/// 初始化阶段的错误 (`InvalidArgument` / `StrategyUnavailable` /
/// `ResourceCreationFailed`) 不会留下任何部分初始化的状态；
/// `Full` / `Empty` 是稳态下的正常拒绝，由调用方决定是否重试。
///
/// 批量读写返回的字节数少于请求量不是错误，直接以计数返回。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "log-defmt", derive(defmt::Format))]
pub enum RingError {
    /// 参数无效 (存储区小于 `config::MIN_SIZE`，或注册了内置策略 ID)
    InvalidArgument,
    /// 策略 ID 未知、未编译或未注册
    StrategyUnavailable,
    /// 策略资源 (互斥锁) 创建失败
    ResourceCreationFailed,
    /// 缓冲区已满
    Full,
    /// 缓冲区为空
    Empty,
    /// 缓冲区未初始化或已销毁
    Uninitialized,
    /// 策略 ID 已注册
    DuplicateStrategy,
    /// 策略注册表已满
    RegistryFull,
}

impl fmt::Display for RingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::InvalidArgument => "invalid argument",
            Self::StrategyUnavailable => "strategy unavailable",
            Self::ResourceCreationFailed => "strategy resource creation failed",
            Self::Full => "ring buffer full",
            Self::Empty => "ring buffer empty",
            Self::Uninitialized => "ring buffer not initialized",
            Self::DuplicateStrategy => "strategy id already registered",
            Self::RegistryFull => "strategy registry full",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for RingError {}

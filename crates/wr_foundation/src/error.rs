// crates/wr_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `WrError` 枚举和 `WrResult` 类型别名。各层 crate 定义自己的错误枚举
//! （`FieldError`、`ConfigError`、`RayError` 等），并实现到 `WrError` 的转换，
//! 以便跨层传递。
//!
//! # 示例
//!
//! ```
//! use wr_foundation::error::{WrError, WrResult};
//!
//! fn read_config() -> WrResult<()> {
//!     Err(WrError::config("配置文件格式错误"))
//! }
//! assert!(read_config().is_err());
//! ```

use thiserror::Error;

/// 统一结果类型
pub type WrResult<T> = Result<T, WrError>;

/// WaveRay 错误类型
#[derive(Error, Debug)]
pub enum WrError {
    // ========================================================================
    // IO 相关错误
    // ========================================================================
    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 数据超出范围
    #[error("数据超出范围: {field}={value}, 期望范围=[{min}, {max}]")]
    OutOfRange {
        /// 字段名
        field: &'static str,
        /// 实际值
        value: f64,
        /// 最小允许值
        min: f64,
        /// 最大允许值
        max: f64,
    },

    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    /// 配置值无效
    #[error("配置值无效: {key}={value}, 原因: {reason}")]
    InvalidConfig {
        /// 配置键名
        key: String,
        /// 配置值
        value: String,
        /// 无效原因说明
        reason: String,
    },

    /// 序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        /// 序列化失败原因
        message: String,
    },

    /// 场数据错误
    #[error("场数据错误: {0}")]
    Field(String),

    /// 物理计算错误
    #[error("物理计算错误: {0}")]
    Physics(String),
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl WrError {
    /// 从 IO 错误创建（带源）
    pub fn io_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 数据超出范围
    pub fn out_of_range(field: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            field,
            value,
            min,
            max,
        }
    }

    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 配置值无效
    pub fn invalid_config(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// 序列化错误
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// 场数据错误
    pub fn field(message: impl Into<String>) -> Self {
        Self::Field(message.into())
    }

    /// 物理计算错误
    pub fn physics(message: impl Into<String>) -> Self {
        Self::Physics(message.into())
    }
}

// ========================================================================
// 测试
// ========================================================================

// crates/wr_io/src/error.rs

//! IO 错误类型定义
//!
//! 所有错误最终可转换为 WrError 以实现跨层错误传递。

use thiserror::Error;
use wr_field::FieldError;
use wr_foundation::WrError;

use crate::netcdf::{CfTimeError, NetCdfError};

/// IO 模块结果类型别名
pub type IoResult<T> = Result<T, IoError>;

/// IO 错误枚举
#[derive(Error, Debug)]
pub enum IoError {
    /// 文件系统错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// NetCDF 驱动错误
    #[error("NetCDF 错误: {0}")]
    NetCdf(#[from] NetCdfError),

    /// 时间轴解析错误
    #[error("时间轴解析失败: {0}")]
    Time(#[from] CfTimeError),

    /// 场构建错误
    #[error("场构建失败: {0}")]
    Field(#[from] FieldError),

    /// 变量维度与期望布局不符
    #[error("变量 {variable} 维度不匹配: {reason}")]
    Layout {
        /// 变量名
        variable: String,
        /// 原因
        reason: String,
    },

    /// 序列化失败
    #[error("序列化失败: {0}")]
    Serialization(String),
}

impl IoError {
    /// 构造布局错误
    pub fn layout(variable: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Layout {
            variable: variable.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for IoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<IoError> for WrError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::Io(e) => WrError::io_with_source("文件读写失败", e),
            IoError::NetCdf(e) => WrError::invalid_input(format!("NetCDF: {e}")),
            IoError::Time(e) => WrError::invalid_input(format!("时间轴: {e}")),
            IoError::Field(e) => e.into(),
            IoError::Layout { variable, reason } => {
                WrError::invalid_input(format!("变量 {variable} 维度不匹配: {reason}"))
            }
            IoError::Serialization(msg) => WrError::serialization(msg),
        }
    }
}

// crates/wr_field/src/error.rs

//! 场数据错误类型

use thiserror::Error;
use wr_foundation::WrError;

use crate::axis::AxisKind;

/// 场模块结果类型别名
pub type FieldResult<T> = Result<T, FieldError>;

/// 场错误枚举
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// 坐标轴无效
    #[error("坐标轴 {axis} 无效: {reason}")]
    InvalidAxis {
        /// 坐标轴
        axis: AxisKind,
        /// 原因
        reason: String,
    },

    /// 数组形状与坐标轴不匹配
    #[error("数组 {name} 形状不匹配: 期望 {expected:?}, 实际 {actual:?}")]
    ShapeMismatch {
        /// 数组名称
        name: &'static str,
        /// 期望形状
        expected: [usize; 4],
        /// 实际形状
        actual: [usize; 4],
    },

    /// 查询点超出场覆盖范围
    #[error("查询超出场范围: {axis}={value}, 覆盖范围=[{min}, {max}]")]
    OutOfDomain {
        /// 越界的坐标轴
        axis: AxisKind,
        /// 查询值
        value: f64,
        /// 覆盖下界
        min: f64,
        /// 覆盖上界
        max: f64,
    },

    /// 构建时缺少数据
    #[error("缺少场数据: {0}")]
    Missing(&'static str),
}

impl From<FieldError> for WrError {
    fn from(err: FieldError) -> Self {
        match err {
            FieldError::OutOfDomain { value, min, max, .. } => {
                WrError::out_of_range("field query", value, min, max)
            }
            other => WrError::field(other.to_string()),
        }
    }
}

// crates/wr_field/src/lib.rs

//! 四维海洋场模块
//!
//! 提供对 (经度, 纬度, 深度, 时间) 网格化海洋状态的只读访问：
//!
//! - [`axis`]: 单调坐标轴与最近邻索引
//! - [`volume`]: `FieldVolume`，含交错速度网格与层结数据
//! - [`sampler`]: 积分器消费的 `FieldSampler` trait
//! - [`builder`]: 场构建器与均匀合成场
//! - [`error`]: 场错误类型
//!
//! # 交错网格
//!
//! 速度定义在网格边，标量定义在网格中心：
//!
//! ```text
//! u[lon, center_lat, depth, time]
//! v[center_lon, lat, depth, time]
//! T, S, N²[lon, lat, depth, time]
//! ```
//!
//! 查找只返回最近网格点，不做插值。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod axis;
pub mod builder;
pub mod error;
pub mod sampler;
pub mod volume;

// 重导出常用类型
pub use axis::{AxisKind, GridAxis};
pub use builder::FieldVolumeBuilder;
pub use error::{FieldError, FieldResult};
pub use sampler::{FieldSampler, QueryPoint};
pub use volume::{FieldVolume, GridIndex, Stratification};

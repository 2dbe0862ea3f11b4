// crates/wr_io/src/netcdf/mod.rs

//! NetCDF 驱动模块
//!
//! 读取四维海洋场（satGEM 风格的经纬度、深度、时间网格与错位速度网格）。
//!
//! # 依赖
//!
//! 需要启用 `netcdf` feature 并安装 NetCDF 库；CF 时间解析与
//! 维度重排不依赖该 feature。

mod driver;
mod error;
mod loader;
pub mod time;

pub use driver::*;
pub use error::*;
pub use loader::NetCdfFieldLoader;
pub use time::{datenum_to_epoch_seconds, CfCalendar, CfTimeError, CfTimeUnits, TimeUnit};

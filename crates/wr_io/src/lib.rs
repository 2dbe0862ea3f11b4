// crates/wr_io/src/lib.rs

//! WaveRay IO 模块
//!
//! # 模块
//!
//! - [`netcdf`]: NetCDF 驱动、CF 时间解析与背景场加载
//! - [`source`]: 按配置构建背景场（合成均匀场或 NetCDF）
//! - [`export`]: 轨迹导出 (CSV / JSON)
//! - [`error`]: IO 错误类型
//!
//! # 可选依赖
//!
//! - `netcdf`: 启用 NetCDF 驱动（需要系统安装 NetCDF 库）。
//!   未启用时 [`NetCdfDriver::open`] 返回 [`NetCdfError::NotAvailable`]。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod export;
pub mod netcdf;
pub mod source;

pub use error::{IoError, IoResult};
pub use export::{export_outcome, write_csv, write_json};
pub use self::netcdf::{CfCalendar, CfTimeError, CfTimeUnits, NetCdfDriver, NetCdfError, NetCdfFieldLoader, TimeUnit, Variable};
pub use source::{build_uniform_field, load_field};

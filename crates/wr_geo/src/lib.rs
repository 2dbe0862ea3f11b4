// crates/wr_geo/src/lib.rs
//! WaveRay 地理空间处理模块
//!
//! 射线追踪在局地平面坐标 (x 向东, y 向北, 单位 m) 中推进，
//! 场数据则以经纬度索引。本 crate 负责两者之间的换算。
//!
//! # 示例
//!
//! ```
//! use wr_geo::displacement_to_geo;
//!
//! // 在赤道向东移动 1 km
//! let (lon, lat) = displacement_to_geo(1000.0, 0.0, 0.0, 0.0);
//! assert!(lon > 0.0);
//! assert_eq!(lat, 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod geodesy;

pub use geodesy::{displacement_to_geo, geo_to_displacement, haversine_distance, GeoPoint};

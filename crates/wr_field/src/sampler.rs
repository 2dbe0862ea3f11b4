// crates/wr_field/src/sampler.rs

//! 场采样接口
//!
//! 积分器只依赖 [`FieldSampler`]，`FieldVolume` 是其标准实现。
//! 采样值原样返回，非有限值由调用方解释为终止条件。

use serde::{Deserialize, Serialize};

use crate::axis::AxisKind;
use crate::error::FieldResult;
use crate::volume::{FieldVolume, GridIndex};

/// 时空查询点
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryPoint {
    /// 经度 [deg]
    pub lon: f64,
    /// 纬度 [deg]
    pub lat: f64,
    /// 深度 [m]
    pub depth: f64,
    /// 时间 [s since epoch]
    pub time: f64,
}

impl QueryPoint {
    /// 创建查询点
    pub const fn new(lon: f64, lat: f64, depth: f64, time: f64) -> Self {
        Self {
            lon,
            lat,
            depth,
            time,
        }
    }

    /// 第一个非有限坐标所在的轴
    ///
    /// 非有限坐标没有最近网格点，钳制查找也不能对其采样。
    pub fn non_finite_axis(&self) -> Option<AxisKind> {
        [
            (AxisKind::Lon, self.lon),
            (AxisKind::Lat, self.lat),
            (AxisKind::Depth, self.depth),
            (AxisKind::Time, self.time),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(axis, _)| axis)
    }
}

/// 场采样 trait
pub trait FieldSampler {
    /// 最近网格点（不做越界检查）
    fn locate(&self, point: &QueryPoint) -> GridIndex;

    /// 最近网格点（越界返回错误）
    fn locate_checked(&self, point: &QueryPoint) -> FieldResult<GridIndex>;

    /// 网格单元上、与 `depth` 最近层的 N²
    fn buoyancy_frequency_sq(&self, idx: &GridIndex, depth: f64) -> f64;

    /// 网格单元上的 (u, v)
    fn velocity(&self, idx: &GridIndex) -> (f64, f64);
}

impl FieldSampler for FieldVolume {
    fn locate(&self, point: &QueryPoint) -> GridIndex {
        FieldVolume::locate(self, point)
    }

    fn locate_checked(&self, point: &QueryPoint) -> FieldResult<GridIndex> {
        FieldVolume::locate_checked(self, point)
    }

    fn buoyancy_frequency_sq(&self, idx: &GridIndex, depth: f64) -> f64 {
        self.sample_buoyancy(idx, depth)
    }

    fn velocity(&self, idx: &GridIndex) -> (f64, f64) {
        self.sample_velocity(idx)
    }
}

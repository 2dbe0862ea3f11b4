// crates/wr_field/src/axis.rs

//! 网格坐标轴
//!
//! 坐标轴必须非空、有限且严格单调（升序或降序均可）。
//! 最近邻查找返回绝对差最小的索引，相等时取较小索引；
//! 超出范围的查询钳制到端点。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FieldError, FieldResult};

/// 坐标轴类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    /// 经度 [deg]
    Lon,
    /// 纬度 [deg]
    Lat,
    /// 深度 [m]
    Depth,
    /// 时间 [s since 1970-01-01]
    Time,
    /// 速度网格经度 [deg]
    CenterLon,
    /// 速度网格纬度 [deg]
    CenterLat,
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lon => "lon",
            Self::Lat => "lat",
            Self::Depth => "depth",
            Self::Time => "time",
            Self::CenterLon => "center_lon",
            Self::CenterLat => "center_lat",
        };
        write!(f, "{name}")
    }
}

/// 单调坐标轴
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAxis {
    kind: AxisKind,
    values: Vec<f64>,
}

impl GridAxis {
    /// 创建并验证坐标轴
    pub fn new(kind: AxisKind, values: Vec<f64>) -> FieldResult<Self> {
        if values.is_empty() {
            return Err(FieldError::InvalidAxis {
                axis: kind,
                reason: "坐标轴为空".into(),
            });
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(FieldError::InvalidAxis {
                axis: kind,
                reason: format!("第 {i} 个坐标不是有限数"),
            });
        }
        if values.len() > 1 {
            let ascending = values[1] > values[0];
            let monotonic = values.windows(2).all(|w| {
                if ascending {
                    w[1] > w[0]
                } else {
                    w[1] < w[0]
                }
            });
            if !monotonic {
                return Err(FieldError::InvalidAxis {
                    axis: kind,
                    reason: "坐标不是严格单调".into(),
                });
            }
        }
        Ok(Self { kind, values })
    }

    /// 坐标轴类别
    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    /// 坐标值
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// 坐标数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否为空（构造保证非空）
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 取第 `i` 个坐标
    pub fn get(&self, i: usize) -> Option<f64> {
        self.values.get(i).copied()
    }

    /// (最小值, 最大值)
    pub fn bounds(&self) -> (f64, f64) {
        let first = self.values[0];
        let last = self.values[self.values.len() - 1];
        (first.min(last), first.max(last))
    }

    /// 最近坐标的索引 (argmin |values - value|)
    ///
    /// NaN 查询返回 0，需要区分时使用 [`GridAxis::nearest_checked`]。
    pub fn nearest(&self, value: f64) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, &c) in self.values.iter().enumerate() {
            let d = (c - value).abs();
            if d < best_dist {
                best = i;
                best_dist = d;
            }
        }
        best
    }

    /// 覆盖范围：两端各外扩半个网格间距
    ///
    /// 单点坐标轴没有间距，视为覆盖任意值。
    pub fn coverage(&self) -> (f64, f64) {
        let n = self.values.len();
        if n == 1 {
            return (f64::NEG_INFINITY, f64::INFINITY);
        }
        let (lo, hi) = self.bounds();
        let first_gap = (self.values[1] - self.values[0]).abs();
        let last_gap = (self.values[n - 1] - self.values[n - 2]).abs();
        let (lo_gap, hi_gap) = if self.values[1] > self.values[0] {
            (first_gap, last_gap)
        } else {
            (last_gap, first_gap)
        };
        (lo - 0.5 * lo_gap, hi + 0.5 * hi_gap)
    }

    /// 值是否在覆盖范围内（非有限值一律不在）
    pub fn contains(&self, value: f64) -> bool {
        let (lo, hi) = self.coverage();
        value.is_finite() && value >= lo && value <= hi
    }

    /// 带越界检查的最近邻查找
    pub fn nearest_checked(&self, value: f64) -> FieldResult<usize> {
        if self.contains(value) {
            Ok(self.nearest(value))
        } else {
            let (min, max) = self.coverage();
            Err(FieldError::OutOfDomain {
                axis: self.kind,
                value,
                min,
                max,
            })
        }
    }
}

// crates/wr_field/src/volume.rs

//! 四维场体
//!
//! `FieldVolume` 加载后不可变，可在多个射线之间只读共享。

use ndarray::{s, Array4};
use serde::{Deserialize, Serialize};
use std::fmt;
use wr_physics::buoyancy::{mid_pressure, nearest_level, BuoyancyModel, BuoyancyProfile};
use wr_physics::eos::pressure_from_depth;

use crate::axis::{AxisKind, GridAxis};
use crate::error::{FieldError, FieldResult};
use crate::sampler::QueryPoint;

/// 最近网格点索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridIndex {
    /// 经度索引
    pub lon: usize,
    /// 纬度索引
    pub lat: usize,
    /// 深度索引
    pub depth: usize,
    /// 时间索引
    pub time: usize,
    /// 速度网格经度索引
    pub center_lon: usize,
    /// 速度网格纬度索引
    pub center_lat: usize,
}

/// 层结数据来源
pub enum Stratification {
    /// 温盐场，N² 经 `BuoyancyModel` 派生
    TemperatureSalinity {
        /// 温度 [°C]
        temperature: Array4<f64>,
        /// 盐度 [PSU]
        salinity: Array4<f64>,
        /// 海洋学库
        model: Box<dyn BuoyancyModel>,
    },
    /// 预先计算的 N² [rad²/s²]
    Precomputed {
        /// N² 场
        n2: Array4<f64>,
    },
}

impl Stratification {
    /// 简短描述
    pub fn describe(&self) -> String {
        match self {
            Self::TemperatureSalinity { model, .. } => format!("T/S ({})", model.name()),
            Self::Precomputed { .. } => "N² (precomputed)".to_string(),
        }
    }
}

/// 四维网格化海洋状态
pub struct FieldVolume {
    pub(crate) lon: GridAxis,
    pub(crate) lat: GridAxis,
    pub(crate) depth: GridAxis,
    pub(crate) time: GridAxis,
    pub(crate) center_lon: GridAxis,
    pub(crate) center_lat: GridAxis,
    /// u[lon, center_lat, depth, time]
    pub(crate) u: Array4<f64>,
    /// v[center_lon, lat, depth, time]
    pub(crate) v: Array4<f64>,
    pub(crate) stratification: Stratification,
}

fn check_shape(name: &'static str, array: &Array4<f64>, expected: [usize; 4]) -> FieldResult<()> {
    let (a, b, c, d) = array.dim();
    let actual = [a, b, c, d];
    if actual == expected {
        Ok(())
    } else {
        Err(FieldError::ShapeMismatch {
            name,
            expected,
            actual,
        })
    }
}

impl FieldVolume {
    /// 由坐标轴与数组创建场体并验证形状
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lon: GridAxis,
        lat: GridAxis,
        depth: GridAxis,
        time: GridAxis,
        center_lon: GridAxis,
        center_lat: GridAxis,
        u: Array4<f64>,
        v: Array4<f64>,
        stratification: Stratification,
    ) -> FieldResult<Self> {
        let (nd, nt) = (depth.len(), time.len());
        check_shape("u", &u, [lon.len(), center_lat.len(), nd, nt])?;
        check_shape("v", &v, [center_lon.len(), lat.len(), nd, nt])?;

        let scalar_shape = [lon.len(), lat.len(), nd, nt];
        match &stratification {
            Stratification::TemperatureSalinity {
                temperature,
                salinity,
                ..
            } => {
                check_shape("temperature", temperature, scalar_shape)?;
                check_shape("salinity", salinity, scalar_shape)?;
            }
            Stratification::Precomputed { n2 } => check_shape("n2", n2, scalar_shape)?,
        }

        Ok(Self {
            lon,
            lat,
            depth,
            time,
            center_lon,
            center_lat,
            u,
            v,
            stratification,
        })
    }

    /// 指定类别的坐标轴
    pub fn axis(&self, kind: AxisKind) -> &GridAxis {
        match kind {
            AxisKind::Lon => &self.lon,
            AxisKind::Lat => &self.lat,
            AxisKind::Depth => &self.depth,
            AxisKind::Time => &self.time,
            AxisKind::CenterLon => &self.center_lon,
            AxisKind::CenterLat => &self.center_lat,
        }
    }

    /// 层结数据
    pub fn stratification(&self) -> &Stratification {
        &self.stratification
    }

    /// 最近网格点索引（越界时钳制到端点）
    pub fn locate(&self, point: &QueryPoint) -> GridIndex {
        GridIndex {
            lon: self.lon.nearest(point.lon),
            lat: self.lat.nearest(point.lat),
            depth: self.depth.nearest(point.depth),
            time: self.time.nearest(point.time),
            center_lon: self.center_lon.nearest(point.lon),
            center_lat: self.center_lat.nearest(point.lat),
        }
    }

    /// 最近网格点索引；主网格四轴任一越界时返回 `OutOfDomain`
    pub fn locate_checked(&self, point: &QueryPoint) -> FieldResult<GridIndex> {
        self.lon.nearest_checked(point.lon)?;
        self.lat.nearest_checked(point.lat)?;
        self.depth.nearest_checked(point.depth)?;
        self.time.nearest_checked(point.time)?;
        Ok(self.locate(point))
    }

    /// 指定水平/时间单元上的全深度 N² 剖面
    pub fn sample_buoyancy_profile(
        &self,
        lon_idx: usize,
        lat_idx: usize,
        time_idx: usize,
    ) -> BuoyancyProfile {
        let lat = self.lat.get(lat_idx).unwrap_or(0.0);
        let pressure: Vec<f64> = self
            .depth
            .values()
            .iter()
            .map(|&z| pressure_from_depth(z, lat))
            .collect();

        match &self.stratification {
            Stratification::TemperatureSalinity {
                temperature,
                salinity,
                model,
            } => {
                let t = temperature.slice(s![lon_idx, lat_idx, .., time_idx]).to_vec();
                let sal = salinity.slice(s![lon_idx, lat_idx, .., time_idx]).to_vec();
                model.n2_profile(&t, &sal, &pressure, lat)
            }
            Stratification::Precomputed { n2 } => {
                let column = n2.slice(s![lon_idx, lat_idx, .., time_idx]).to_vec();
                BuoyancyProfile::new(column, pressure)
            }
        }
    }

    /// 单元上与 `depth` 最近层的 N²
    ///
    /// 与 `sample_buoyancy_profile(..).nearest(p)` 结果一致，但只计算选中的一层。
    /// 剖面为空时返回 NaN。
    pub fn sample_buoyancy(&self, idx: &GridIndex, depth: f64) -> f64 {
        let lat = self.lat.get(idx.lat).unwrap_or(0.0);
        let target = pressure_from_depth(depth, lat);
        let levels = self.depth.values();
        let pressure = |k: usize| pressure_from_depth(levels[k], lat);
        let (i, j, t) = (idx.lon, idx.lat, idx.time);

        match &self.stratification {
            Stratification::TemperatureSalinity {
                temperature,
                salinity,
                model,
            } => {
                let mids = (1..levels.len()).map(|k| mid_pressure([pressure(k - 1), pressure(k)]));
                let Some(k) = nearest_level(mids, target) else {
                    return f64::NAN;
                };
                model.n2_layer(
                    [temperature[[i, j, k, t]], temperature[[i, j, k + 1, t]]],
                    [salinity[[i, j, k, t]], salinity[[i, j, k + 1, t]]],
                    [pressure(k), pressure(k + 1)],
                    lat,
                )
            }
            Stratification::Precomputed { n2 } => {
                nearest_level((0..levels.len()).map(pressure), target)
                    .map_or(f64::NAN, |k| n2[[i, j, k, t]])
            }
        }
    }

    /// (u, v) 在各自交错网格上的最近值
    pub fn sample_velocity(&self, idx: &GridIndex) -> (f64, f64) {
        let u = self.u[[idx.lon, idx.center_lat, idx.depth, idx.time]];
        let v = self.v[[idx.center_lon, idx.lat, idx.depth, idx.time]];
        (u, v)
    }

    /// 时间覆盖范围 [s since epoch]
    pub fn time_bounds(&self) -> (f64, f64) {
        self.time.bounds()
    }
}

impl fmt::Debug for FieldVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldVolume")
            .field("lon", &self.lon.len())
            .field("lat", &self.lat.len())
            .field("depth", &self.depth.len())
            .field("time", &self.time.len())
            .field("center_lon", &self.center_lon.len())
            .field("center_lat", &self.center_lat.len())
            .field("stratification", &self.stratification.describe())
            .finish()
    }
}

impl fmt::Display for FieldVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lon0, lon1) = self.lon.bounds();
        let (lat0, lat1) = self.lat.bounds();
        let (z0, z1) = self.depth.bounds();
        let (t0, t1) = self.time.bounds();
        writeln!(
            f,
            "网格: {} x {} x {} x {} (lon x lat x depth x time)",
            self.lon.len(),
            self.lat.len(),
            self.depth.len(),
            self.time.len()
        )?;
        writeln!(f, "经度: [{lon0:.3}, {lon1:.3}]  纬度: [{lat0:.3}, {lat1:.3}]")?;
        writeln!(f, "深度: [{z0:.1}, {z1:.1}] m  时间: [{t0:.0}, {t1:.0}] s")?;
        write!(f, "层结: {}", self.stratification.describe())
    }
}

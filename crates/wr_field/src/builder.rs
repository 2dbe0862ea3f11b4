// crates/wr_field/src/builder.rs

//! 场体构建器
//!
//! ```
//! use ndarray::Array4;
//! use wr_field::{FieldVolumeBuilder, QueryPoint};
//!
//! let field = FieldVolumeBuilder::new()
//!     .lon(vec![-60.0, -59.0])
//!     .lat(vec![-56.0, -55.0])
//!     .depth(vec![0.0, 500.0, 1000.0])
//!     .time(vec![0.0, 86_400.0])
//!     .velocity(Array4::zeros((2, 2, 3, 2)), Array4::zeros((2, 2, 3, 2)))
//!     .n2(Array4::from_elem((2, 2, 3, 2), 1e-5))
//!     .build()
//!     .unwrap();
//!
//! let idx = field.locate(&QueryPoint::new(-59.2, -55.9, 480.0, 100.0));
//! assert_eq!((idx.lon, idx.lat, idx.depth, idx.time), (1, 0, 1, 0));
//! ```

use ndarray::Array4;
use tracing::debug;
use wr_physics::buoyancy::{BuoyancyModel, Eos80Buoyancy};

use crate::axis::{AxisKind, GridAxis};
use crate::error::{FieldError, FieldResult};
use crate::volume::{FieldVolume, Stratification};

/// `FieldVolume` 构建器
///
/// 未指定交错网格 (`center_lon`/`center_lat`) 时沿用主网格坐标。
#[derive(Default)]
pub struct FieldVolumeBuilder {
    lon: Option<Vec<f64>>,
    lat: Option<Vec<f64>>,
    depth: Option<Vec<f64>>,
    time: Option<Vec<f64>>,
    center_lon: Option<Vec<f64>>,
    center_lat: Option<Vec<f64>>,
    u: Option<Array4<f64>>,
    v: Option<Array4<f64>>,
    temperature: Option<Array4<f64>>,
    salinity: Option<Array4<f64>>,
    n2: Option<Array4<f64>>,
    model: Option<Box<dyn BuoyancyModel>>,
}

impl FieldVolumeBuilder {
    /// 创建空构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 经度坐标 [deg]
    pub fn lon(mut self, values: Vec<f64>) -> Self {
        self.lon = Some(values);
        self
    }

    /// 纬度坐标 [deg]
    pub fn lat(mut self, values: Vec<f64>) -> Self {
        self.lat = Some(values);
        self
    }

    /// 深度坐标 [m]
    pub fn depth(mut self, values: Vec<f64>) -> Self {
        self.depth = Some(values);
        self
    }

    /// 时间坐标 [s since epoch]
    pub fn time(mut self, values: Vec<f64>) -> Self {
        self.time = Some(values);
        self
    }

    /// 速度网格经度 [deg]
    pub fn center_lon(mut self, values: Vec<f64>) -> Self {
        self.center_lon = Some(values);
        self
    }

    /// 速度网格纬度 [deg]
    pub fn center_lat(mut self, values: Vec<f64>) -> Self {
        self.center_lat = Some(values);
        self
    }

    /// 速度场 u[lon, center_lat, depth, time], v[center_lon, lat, depth, time]
    pub fn velocity(mut self, u: Array4<f64>, v: Array4<f64>) -> Self {
        self.u = Some(u);
        self.v = Some(v);
        self
    }

    /// 温盐场
    pub fn temperature_salinity(mut self, temperature: Array4<f64>, salinity: Array4<f64>) -> Self {
        self.temperature = Some(temperature);
        self.salinity = Some(salinity);
        self
    }

    /// 预计算 N² 场（优先于温盐场）
    pub fn n2(mut self, n2: Array4<f64>) -> Self {
        self.n2 = Some(n2);
        self
    }

    /// 替换默认的 EOS-80 浮力模型
    pub fn buoyancy_model(mut self, model: Box<dyn BuoyancyModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// 构建并验证
    pub fn build(self) -> FieldResult<FieldVolume> {
        let lon_values = self.lon.ok_or(FieldError::Missing("lon"))?;
        let lat_values = self.lat.ok_or(FieldError::Missing("lat"))?;
        let center_lon = self.center_lon.unwrap_or_else(|| lon_values.clone());
        let center_lat = self.center_lat.unwrap_or_else(|| lat_values.clone());

        let lon = GridAxis::new(AxisKind::Lon, lon_values)?;
        let lat = GridAxis::new(AxisKind::Lat, lat_values)?;
        let depth = GridAxis::new(AxisKind::Depth, self.depth.ok_or(FieldError::Missing("depth"))?)?;
        let time = GridAxis::new(AxisKind::Time, self.time.ok_or(FieldError::Missing("time"))?)?;
        let center_lon = GridAxis::new(AxisKind::CenterLon, center_lon)?;
        let center_lat = GridAxis::new(AxisKind::CenterLat, center_lat)?;

        let u = self.u.ok_or(FieldError::Missing("u"))?;
        let v = self.v.ok_or(FieldError::Missing("v"))?;

        let stratification = match (self.n2, self.temperature, self.salinity) {
            (Some(n2), _, _) => Stratification::Precomputed { n2 },
            (None, Some(temperature), Some(salinity)) => Stratification::TemperatureSalinity {
                temperature,
                salinity,
                model: self
                    .model
                    .unwrap_or_else(|| Box::new(Eos80Buoyancy::default())),
            },
            _ => return Err(FieldError::Missing("n2 或 temperature/salinity")),
        };

        let field = FieldVolume::new(
            lon, lat, depth, time, center_lon, center_lat, u, v, stratification,
        )?;
        debug!("场体构建完成: {:?}", field);
        Ok(field)
    }
}

impl FieldVolume {
    /// 均匀合成场：N²、u、v 在所有网格点上为常数
    pub fn uniform(
        lon: Vec<f64>,
        lat: Vec<f64>,
        depth: Vec<f64>,
        time: Vec<f64>,
        n2: f64,
        u: f64,
        v: f64,
    ) -> FieldResult<Self> {
        let shape = (lon.len(), lat.len(), depth.len(), time.len());
        FieldVolumeBuilder::new()
            .lon(lon)
            .lat(lat)
            .depth(depth)
            .time(time)
            .velocity(Array4::from_elem(shape, u), Array4::from_elem(shape, v))
            .n2(Array4::from_elem(shape, n2))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{FieldSampler, QueryPoint};
    use crate::volume::GridIndex;
    use wr_physics::eos::pressure_from_depth;

    #[test]
    fn test_single_cell_locate_always_zero() {
        let field = FieldVolume::uniform(
            vec![-60.0],
            vec![-55.0],
            vec![500.0],
            vec![0.0],
            1e-5,
            0.0,
            0.0,
        )
        .unwrap();

        for p in [
            QueryPoint::new(-60.0, -55.0, 500.0, 0.0),
            QueryPoint::new(170.0, 80.0, -10.0, -1e9),
            QueryPoint::new(-180.0, -89.0, 9000.0, 1e12),
        ] {
            let idx = field.locate(&p);
            assert_eq!(idx, GridIndex::default(), "point {p:?}");
        }
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let err = FieldVolumeBuilder::new()
            .lon(vec![0.0, 1.0])
            .lat(vec![0.0, 1.0])
            .depth(vec![0.0])
            .time(vec![0.0])
            .velocity(Array4::zeros((2, 2, 1, 1)), Array4::zeros((3, 2, 1, 1)))
            .n2(Array4::zeros((2, 2, 1, 1)))
            .build()
            .unwrap_err();
        assert!(matches!(err, FieldError::ShapeMismatch { name: "v", .. }));
    }

    #[test]
    fn test_missing_stratification_rejected() {
        let err = FieldVolumeBuilder::new()
            .lon(vec![0.0])
            .lat(vec![0.0])
            .depth(vec![0.0])
            .time(vec![0.0])
            .velocity(Array4::zeros((1, 1, 1, 1)), Array4::zeros((1, 1, 1, 1)))
            .build()
            .unwrap_err();
        assert!(matches!(err, FieldError::Missing(_)));
    }

    #[test]
    fn test_staggered_velocity_indexing() {
        // 主网格 3x3，速度网格错开半格且只有 2 个点
        let lon = vec![0.0, 1.0, 2.0];
        let lat = vec![10.0, 11.0, 12.0];
        let center_lon = vec![0.5, 1.5];
        let center_lat = vec![10.5, 11.5];

        // u 值编码 (lon, center_lat)，v 值编码 (center_lon, lat)
        let u = Array4::from_shape_fn((3, 2, 1, 1), |(i, j, _, _)| (10 * i + j) as f64);
        let v = Array4::from_shape_fn((2, 3, 1, 1), |(i, j, _, _)| (100 + 10 * i + j) as f64);

        let field = FieldVolumeBuilder::new()
            .lon(lon)
            .lat(lat)
            .center_lon(center_lon)
            .center_lat(center_lat)
            .depth(vec![0.0])
            .time(vec![0.0])
            .velocity(u, v)
            .n2(Array4::from_elem((3, 3, 1, 1), 1e-5))
            .build()
            .unwrap();

        let idx = field.locate(&QueryPoint::new(1.9, 11.4, 0.0, 0.0));
        assert_eq!((idx.lon, idx.lat), (2, 1));
        assert_eq!((idx.center_lon, idx.center_lat), (1, 1));

        let (u, v) = field.sample_velocity(&idx);
        assert_eq!(u, 21.0); // u[lon=2, center_lat=1]
        assert_eq!(v, 111.0); // v[center_lon=1, lat=1]
    }

    #[test]
    fn test_locate_checked_reports_axis() {
        let field = FieldVolume::uniform(
            vec![-60.0, -59.0, -58.0],
            vec![-56.0, -55.0],
            vec![0.0, 1000.0, 2000.0],
            vec![0.0, 3600.0],
            1e-5,
            0.0,
            0.0,
        )
        .unwrap();

        assert!(field
            .locate_checked(&QueryPoint::new(-59.0, -55.5, 1500.0, 1800.0))
            .is_ok());

        let err = field
            .locate_checked(&QueryPoint::new(-59.0, -55.5, 1500.0, 9000.0))
            .unwrap_err();
        assert!(matches!(err, FieldError::OutOfDomain { axis: AxisKind::Time, .. }));

        let err = field
            .locate_checked(&QueryPoint::new(-50.0, -55.5, 1500.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, FieldError::OutOfDomain { axis: AxisKind::Lon, .. }));
    }

    #[test]
    fn test_precomputed_profile_uses_depth_pressures() {
        let field = FieldVolume::uniform(
            vec![0.0],
            vec![-55.0],
            vec![0.0, 500.0, 1000.0],
            vec![0.0],
            2e-6,
            0.0,
            0.0,
        )
        .unwrap();

        let profile = field.sample_buoyancy_profile(0, 0, 0);
        assert_eq!(profile.len(), 3);
        assert!((profile.pressure[1] - pressure_from_depth(500.0, -55.0)).abs() < 1e-12);

        let idx = field.locate(&QueryPoint::new(0.0, -55.0, 480.0, 0.0));
        assert_eq!(field.buoyancy_frequency_sq(&idx, 480.0), 2e-6);
    }

    #[test]
    fn test_temperature_salinity_profile() {
        // 温度随深度线性递减，稳定层结
        let shape = (1, 1, 4, 1);
        let temperature = Array4::from_shape_fn(shape, |(_, _, k, _)| 10.0 - 2.0 * k as f64);
        let salinity = Array4::from_elem(shape, 34.5);

        let field = FieldVolumeBuilder::new()
            .lon(vec![0.0])
            .lat(vec![-55.0])
            .depth(vec![0.0, 100.0, 200.0, 300.0])
            .time(vec![0.0])
            .velocity(Array4::zeros(shape), Array4::zeros(shape))
            .temperature_salinity(temperature, salinity)
            .build()
            .unwrap();

        let profile = field.sample_buoyancy_profile(0, 0, 0);
        assert_eq!(profile.len(), 3);
        assert!(profile.n2.iter().all(|&n2| n2 > 0.0));

        let idx = field.locate(&QueryPoint::new(0.0, -55.0, 160.0, 0.0));
        let n2 = field.buoyancy_frequency_sq(&idx, 160.0);
        // 中点压力约 50/150/250 dbar，160 m 对应第二层
        assert_eq!(n2, profile.n2[1]);
    }

    #[test]
    fn test_single_layer_buoyancy_matches_full_profile() {
        let shape = (2, 2, 6, 2);
        let temperature = Array4::from_shape_fn(shape, |(i, j, k, t)| {
            12.0 - 1.5 * k as f64 + 0.3 * i as f64 - 0.2 * j as f64 + 0.1 * t as f64
        });
        let salinity = Array4::from_shape_fn(shape, |(_, j, k, _)| 34.2 + 0.05 * k as f64 + 0.01 * j as f64);

        let field = FieldVolumeBuilder::new()
            .lon(vec![-60.0, -59.0])
            .lat(vec![-56.0, -55.0])
            .depth(vec![0.0, 50.0, 150.0, 400.0, 1000.0, 2500.0])
            .time(vec![0.0, 3600.0])
            .velocity(Array4::zeros(shape), Array4::zeros(shape))
            .temperature_salinity(temperature, salinity)
            .build()
            .unwrap();

        for &(lon, lat, time) in &[(-60.0, -56.0, 0.0), (-59.0, -55.0, 3600.0)] {
            for depth in [0.0, 20.0, 90.0, 260.0, 700.0, 1800.0, 4000.0] {
                let idx = field.locate(&QueryPoint::new(lon, lat, depth, time));
                let profile = field.sample_buoyancy_profile(idx.lon, idx.lat, idx.time);
                let expected = profile.nearest(pressure_from_depth(depth, lat));
                assert_eq!(field.buoyancy_frequency_sq(&idx, depth), expected, "depth {depth}");
            }
        }
    }

    #[test]
    fn test_single_level_temperature_salinity_gives_nan() {
        let shape = (1, 1, 1, 1);
        let field = FieldVolumeBuilder::new()
            .lon(vec![0.0])
            .lat(vec![0.0])
            .depth(vec![100.0])
            .time(vec![0.0])
            .velocity(Array4::zeros(shape), Array4::zeros(shape))
            .temperature_salinity(Array4::from_elem(shape, 4.0), Array4::from_elem(shape, 34.0))
            .build()
            .unwrap();
        assert!(field.buoyancy_frequency_sq(&GridIndex::default(), 100.0).is_nan());
    }

    #[test]
    fn test_non_finite_query_point_axis() {
        assert_eq!(QueryPoint::new(-60.0, -55.0, 100.0, 0.0).non_finite_axis(), None);
        assert_eq!(
            QueryPoint::new(-60.0, f64::NAN, f64::NAN, 0.0).non_finite_axis(),
            Some(AxisKind::Lat)
        );
        assert_eq!(
            QueryPoint::new(-60.0, -55.0, 100.0, f64::INFINITY).non_finite_axis(),
            Some(AxisKind::Time)
        );
    }

    #[test]
    fn test_nan_velocity_is_returned_as_is() {
        let field = FieldVolume::uniform(
            vec![0.0],
            vec![0.0],
            vec![0.0],
            vec![0.0],
            1e-5,
            f64::NAN,
            0.0,
        )
        .unwrap();
        let (u, v) = field.velocity(&GridIndex::default());
        assert!(u.is_nan());
        assert_eq!(v, 0.0);
    }
}

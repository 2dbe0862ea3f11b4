// crates/wr_io/src/netcdf/loader.rs

//! 从 NetCDF 文件构建背景场
//!
//! 读取主网格与错位网格坐标、流速以及温盐（或预计算 N²），
//! 重排为 `[lon, lat, depth, time]` 内存顺序后交给 [`FieldVolumeBuilder`]。

use std::path::{Path, PathBuf};

use ndarray::Array4;
use tracing::{debug, info};
use wr_config::{ArrayLayout, FieldNames, TimeEncoding};
use wr_field::{FieldVolume, FieldVolumeBuilder};

use super::driver::{NetCdfDriver, Variable};
use super::time::{datenum_to_epoch_seconds, CfTimeError, CfTimeUnits};
use crate::error::{IoError, IoResult};

/// NetCDF 背景场加载器
#[derive(Debug, Clone)]
pub struct NetCdfFieldLoader {
    path: PathBuf,
    names: FieldNames,
    layout: ArrayLayout,
    time_encoding: TimeEncoding,
    time_units: Option<String>,
}

impl NetCdfFieldLoader {
    /// 以默认 (satGEM) 变量名创建加载器
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            names: FieldNames::default(),
            layout: ArrayLayout::default(),
            time_encoding: TimeEncoding::default(),
            time_units: None,
        }
    }

    /// 变量名
    pub fn with_names(mut self, names: FieldNames) -> Self {
        self.names = names;
        self
    }

    /// 维度顺序
    pub fn with_layout(mut self, layout: ArrayLayout) -> Self {
        self.layout = layout;
        self
    }

    /// 时间编码
    pub fn with_time_encoding(mut self, encoding: TimeEncoding) -> Self {
        self.time_encoding = encoding;
        self
    }

    /// 覆盖文件中的时间 `units`
    pub fn with_time_units(mut self, units: Option<String>) -> Self {
        self.time_units = units;
        self
    }

    /// 文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 加载背景场
    pub fn load(&self) -> IoResult<FieldVolume> {
        info!("读取背景场: {}", self.path.display());
        let driver = NetCdfDriver::open(&self.path)?;
        let names = &self.names;

        let lon = read_axis(&driver, &names.lon)?;
        let lat = read_axis(&driver, &names.lat)?;
        let depth = read_axis(&driver, &names.depth)?;
        let center_lon = read_axis(&driver, &names.center_lon)?;
        let center_lat = read_axis(&driver, &names.center_lat)?;
        let time = self.read_time(&driver)?;

        let (nd, nt) = (depth.len(), time.len());
        debug!(
            "网格: lon={} lat={} depth={} time={} centerlon={} centerlat={}",
            lon.len(),
            lat.len(),
            nd,
            nt,
            center_lon.len(),
            center_lat.len()
        );

        let u = to_field_order(
            driver.read_variable(&names.u)?,
            self.layout,
            [lon.len(), center_lat.len(), nd, nt],
        )?;
        let v = to_field_order(
            driver.read_variable(&names.v)?,
            self.layout,
            [center_lon.len(), lat.len(), nd, nt],
        )?;

        let scalar_shape = [lon.len(), lat.len(), nd, nt];
        let mut builder = FieldVolumeBuilder::new().velocity(u, v);
        builder = match &names.n2 {
            Some(n2_name) => {
                let n2 = to_field_order(driver.read_variable(n2_name)?, self.layout, scalar_shape)?;
                builder.n2(n2)
            }
            None => {
                let temperature = to_field_order(
                    driver.read_variable(&names.temperature)?,
                    self.layout,
                    scalar_shape,
                )?;
                let salinity = to_field_order(
                    driver.read_variable(&names.salinity)?,
                    self.layout,
                    scalar_shape,
                )?;
                builder.temperature_salinity(temperature, salinity)
            }
        };

        let field = builder
            .lon(lon)
            .lat(lat)
            .depth(depth)
            .time(time)
            .center_lon(center_lon)
            .center_lat(center_lat)
            .build()?;
        info!("背景场就绪: {}", field.stratification().describe());
        Ok(field)
    }

    fn read_time(&self, driver: &NetCdfDriver) -> IoResult<Vec<f64>> {
        let raw = read_axis(driver, &self.names.time)?;
        let units = match (&self.time_units, self.time_encoding) {
            (Some(units), _) => Some(units.clone()),
            (None, TimeEncoding::Cf) => Some(driver.attribute_string(&self.names.time, "units")?),
            (None, _) => None,
        };
        let calendar = driver.attribute_string(&self.names.time, "calendar").ok();
        decode_time(&raw, self.time_encoding, units.as_deref(), calendar.as_deref())
    }
}

/// 读取一维坐标变量
fn read_axis(driver: &NetCdfDriver, name: &str) -> IoResult<Vec<f64>> {
    let var = driver.read_variable(name)?;
    if var.effective_rank() > 1 {
        return Err(IoError::layout(
            name,
            format!("坐标变量应为一维，实际维度 {:?}", var.dims),
        ));
    }
    Ok(var.data)
}

/// 把文件中的四维变量重排为 `[lon, lat, depth, time]`
///
/// `expected` 为内存顺序下的形状。
pub(crate) fn to_field_order(
    var: Variable,
    layout: ArrayLayout,
    expected: [usize; 4],
) -> IoResult<Array4<f64>> {
    let file_shape = match layout {
        ArrayLayout::TimeDepthLatLon => [expected[3], expected[2], expected[1], expected[0]],
        ArrayLayout::LonLatDepthTime => expected,
    };
    if var.dims.len() != 4 || var.dims[..] != file_shape[..] {
        return Err(IoError::layout(
            var.name,
            format!("期望 {:?}，实际 {:?}", file_shape, var.dims),
        ));
    }

    let [a, b, c, d] = file_shape;
    let name = var.name;
    let array = Array4::from_shape_vec((a, b, c, d), var.data)
        .map_err(|e| IoError::layout(name, e.to_string()))?;

    Ok(match layout {
        ArrayLayout::TimeDepthLatLon => array.permuted_axes([3, 2, 1, 0]).as_standard_layout().into_owned(),
        ArrayLayout::LonLatDepthTime => array,
    })
}

/// 把原始时间坐标解码为 Unix 纪元秒
pub(crate) fn decode_time(
    values: &[f64],
    encoding: TimeEncoding,
    units: Option<&str>,
    calendar: Option<&str>,
) -> IoResult<Vec<f64>> {
    match encoding {
        TimeEncoding::Cf => {
            let units = units.ok_or_else(|| CfTimeError::InvalidUnits("缺少 units 属性".into()))?;
            let cf = CfTimeUnits::parse_with_calendar(units, calendar)?;
            debug!("时间单位: {}", cf);
            Ok(cf.decode(values)?)
        }
        TimeEncoding::Datenum => Ok(values.iter().map(|&d| datenum_to_epoch_seconds(d)).collect()),
        TimeEncoding::EpochSeconds => match units {
            // 覆盖值存在时仍按 CF 处理
            Some(units) => decode_time(values, TimeEncoding::Cf, Some(units), calendar),
            None => Ok(values.to_vec()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_depth_lat_lon_is_transposed() {
        // file: (time=2, depth=3, lat=1, lon=2)
        let data: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let var = Variable::new("T", data, vec![2, 3, 1, 2]);

        let array = to_field_order(var, ArrayLayout::TimeDepthLatLon, [2, 1, 3, 2]).unwrap();
        assert_eq!(array.dim(), (2, 1, 3, 2));
        assert!(array.is_standard_layout());

        // file[t][d][la][lo] = t*6 + d*2 + lo
        for lo in 0..2 {
            for d in 0..3 {
                for t in 0..2 {
                    let expected = (t * 6 + d * 2 + lo) as f64;
                    assert_eq!(array[[lo, 0, d, t]], expected);
                }
            }
        }
    }

    #[test]
    fn test_lon_lat_depth_time_is_kept() {
        let data: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let var = Variable::new("u", data, vec![2, 2, 2, 1]);
        let array = to_field_order(var, ArrayLayout::LonLatDepthTime, [2, 2, 2, 1]).unwrap();
        assert_eq!(array[[1, 0, 1, 0]], 5.0);
    }

    #[test]
    fn test_shape_mismatch_reports_variable() {
        let var = Variable::new("satGEM_east", vec![0.0; 6], vec![1, 2, 3]);
        let err = to_field_order(var, ArrayLayout::TimeDepthLatLon, [3, 2, 1, 1]).unwrap_err();
        match err {
            IoError::Layout { variable, .. } => assert_eq!(variable, "satGEM_east"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_cf_time() {
        let t = decode_time(&[0.0, 1.0], TimeEncoding::Cf, Some("hours since 2011-01-10 00:00:00"), None).unwrap();
        assert!((t[0] - 1_294_617_600.0).abs() < 1e-6);
        assert!((t[1] - t[0] - 3600.0).abs() < 1e-6);
    }

    #[test]
    fn test_decode_cf_time_requires_units() {
        let err = decode_time(&[0.0], TimeEncoding::Cf, None, None).unwrap_err();
        assert!(matches!(err, IoError::Time(CfTimeError::InvalidUnits(_))));
    }

    #[test]
    fn test_decode_noleap_rejected() {
        let err = decode_time(&[0.0], TimeEncoding::Cf, Some("days since 2000-01-01"), Some("noleap"))
            .unwrap_err();
        assert!(matches!(err, IoError::Time(_)));
    }

    #[test]
    fn test_decode_datenum() {
        // 734513 = 2011-01-10
        let t = decode_time(&[734_513.0], TimeEncoding::Datenum, None, None).unwrap();
        assert!((t[0] - 1_294_617_600.0).abs() < 1e-3);
    }

    #[test]
    fn test_decode_epoch_seconds_passthrough() {
        let t = decode_time(&[1.5e9], TimeEncoding::EpochSeconds, None, None).unwrap();
        assert_eq!(t, vec![1.5e9]);
    }

    #[cfg(not(feature = "netcdf"))]
    #[test]
    fn test_load_without_feature() {
        let err = NetCdfFieldLoader::new("satgem.nc").load().unwrap_err();
        assert!(matches!(err, IoError::NetCdf(super::super::NetCdfError::NotAvailable)));
    }
}

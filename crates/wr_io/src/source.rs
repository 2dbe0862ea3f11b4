// crates/wr_io/src/source.rs

//! 按配置构建背景场

use tracing::info;
use wr_config::{FieldSourceConfig, UniformFieldConfig};
use wr_field::FieldVolume;

use crate::error::IoResult;
use crate::netcdf::NetCdfFieldLoader;

/// 构建均匀合成场
///
/// 时间轴以小时给出，相对 `start_timestamp`（Unix 纪元秒）。
pub fn build_uniform_field(config: &UniformFieldConfig, start_timestamp: f64) -> IoResult<FieldVolume> {
    let time = config
        .time_hours
        .values()
        .into_iter()
        .map(|h| start_timestamp + h * 3600.0)
        .collect();

    let field = FieldVolume::uniform(
        config.lon.values(),
        config.lat.values(),
        config.depth.values(),
        time,
        config.n2,
        config.u,
        config.v,
    )?;
    info!("均匀合成场: N²={:.3e}, u={}, v={}", config.n2, config.u, config.v);
    Ok(field)
}

/// 按来源配置加载背景场
pub fn load_field(source: &FieldSourceConfig, start_timestamp: f64) -> IoResult<FieldVolume> {
    match source {
        FieldSourceConfig::Uniform(uniform) => build_uniform_field(uniform, start_timestamp),
        FieldSourceConfig::NetCdf {
            path,
            names,
            layout,
            time_encoding,
            time_units,
        } => NetCdfFieldLoader::new(path)
            .with_names(names.clone())
            .with_layout(*layout)
            .with_time_encoding(*time_encoding)
            .with_time_units(time_units.clone())
            .load(),
    }
}

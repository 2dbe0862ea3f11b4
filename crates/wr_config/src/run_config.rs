// crates/wr_config/src/run_config.rs

//! RunConfig - 射线追踪运行配置
//!
//! 一次运行的全部输入：初始波参数、积分参数、背景场来源与输出设置。
//! 所有字段都带 serde 默认值，JSON 中只需给出与默认不同的部分。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// 射线追踪运行配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    /// 初始波参数
    #[serde(default)]
    pub wave: WaveConfig,

    /// 积分参数
    #[serde(default)]
    pub run: IntegrationConfig,

    /// 背景场来源
    #[serde(default)]
    pub field: FieldSourceConfig,

    /// 输出配置
    #[serde(default)]
    pub output: OutputConfig,
}

// ============================================================
// 初始波参数
// ============================================================

/// 初始波参数
///
/// 默认值是 Drake Passage 附近的一个背风波 (lee wave) 算例。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// 东向波数 [rad/m]
    #[serde(default = "default_k")]
    pub k: f64,
    /// 北向波数 [rad/m]
    #[serde(default = "default_l")]
    pub l: f64,
    /// 垂向波数 [rad/m]
    #[serde(default = "default_m")]
    pub m: f64,
    /// 本征频率 [rad/s]
    #[serde(default = "default_omega")]
    pub omega: f64,
    /// 初始深度 [m]，向下为正
    #[serde(default = "default_depth")]
    pub depth: f64,
    /// 初始纬度 [deg]
    #[serde(default = "default_lat")]
    pub lat: f64,
    /// 初始经度 [deg]
    #[serde(default = "default_lon")]
    pub lon: f64,
    /// 起始时刻 (RFC 3339)
    #[serde(default = "default_start_time")]
    pub start_time: DateTime<Utc>,
}

fn default_k() -> f64 { 3.24e-4 }
fn default_l() -> f64 { -1.4e-4 }
fn default_m() -> f64 { -9.76e-3 }
fn default_omega() -> f64 { -1.3e-4 }
fn default_depth() -> f64 { 1500.0 }
fn default_lat() -> f64 { -55.0 }
fn default_lon() -> f64 { -62.0 }
fn default_start_time() -> DateTime<Utc> {
    // 2011-01-10T00:00:00Z
    DateTime::<Utc>::from_timestamp(1_294_617_600, 0).unwrap_or_default()
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            l: default_l(),
            m: default_m(),
            omega: default_omega(),
            depth: default_depth(),
            lat: default_lat(),
            lon: default_lon(),
            start_time: default_start_time(),
        }
    }
}

impl WaveConfig {
    /// 波数模平方 K² = k² + l² + m²
    pub fn wavenumber_sq(&self) -> f64 {
        self.k * self.k + self.l * self.l + self.m * self.m
    }

    /// 起始时刻，Unix 纪元秒
    pub fn start_timestamp(&self) -> f64 {
        self.start_time.timestamp() as f64
            + f64::from(self.start_time.timestamp_subsec_nanos()) * 1e-9
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("wave.k", self.k),
            ("wave.l", self.l),
            ("wave.m", self.m),
            ("wave.omega", self.omega),
            ("wave.depth", self.depth),
            ("wave.lat", self.lat),
            ("wave.lon", self.lon),
        ];
        for (key, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::invalid(key, value, "必须为有限值"));
            }
        }

        let k2 = self.wavenumber_sq();
        if k2 <= 0.0 {
            return Err(ConfigError::invalid("wave.m", k2, "波数模平方 K² 必须为正"));
        }
        if self.omega == 0.0 {
            return Err(ConfigError::invalid("wave.omega", self.omega, "频率不能为零"));
        }
        if self.depth < 0.0 {
            return Err(ConfigError::invalid("wave.depth", self.depth, "深度不能为负"));
        }
        if self.lat <= -90.0 || self.lat >= 90.0 {
            return Err(ConfigError::invalid("wave.lat", self.lat, "纬度必须在 (-90, 90) 范围内"));
        }
        Ok(())
    }
}

// ============================================================
// 积分参数
// ============================================================

/// 积分方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// 正向积分
    #[default]
    Forward,
    /// 反向积分（时间步取负）
    Reverse,
}

impl Direction {
    /// 时间步符号
    pub fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Reverse => -1.0,
        }
    }
}

/// 越界查询处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DomainPolicy {
    /// 越界即终止射线
    #[default]
    Terminate,
    /// 静默钳制到最近网格点
    Clamp,
}

/// 积分参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationConfig {
    /// 运行时长 [h]
    #[serde(default = "default_duration")]
    pub duration_hours: f64,

    /// 时间步长 [s]（取绝对值，方向由 `direction` 决定）
    #[serde(default = "default_time_step")]
    pub time_step: f64,

    /// 积分方向
    #[serde(default)]
    pub direction: Direction,

    /// 海底深度 [m]
    #[serde(default = "default_seafloor")]
    pub seafloor_depth: f64,

    /// 进度日志间隔 [h]，0 表示关闭
    #[serde(default = "default_status_interval")]
    pub status_interval_hours: f64,

    /// 越界策略
    #[serde(default)]
    pub out_of_domain: DomainPolicy,
}

fn default_duration() -> f64 { 24.0 }
fn default_time_step() -> f64 { 10.0 }
fn default_seafloor() -> f64 { 4000.0 }
fn default_status_interval() -> f64 { 6.0 }

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            duration_hours: default_duration(),
            time_step: default_time_step(),
            direction: Direction::default(),
            seafloor_depth: default_seafloor(),
            status_interval_hours: default_status_interval(),
            out_of_domain: DomainPolicy::default(),
        }
    }
}

impl IntegrationConfig {
    /// 带符号时间步 [s]
    pub fn signed_time_step(&self) -> f64 {
        self.direction.sign() * self.time_step.abs()
    }

    /// 总步数 ceil(duration·3600 / |Δt|)
    pub fn step_count(&self) -> usize {
        let steps = (self.duration_hours * 3600.0 / self.time_step.abs()).ceil();
        if steps.is_finite() && steps > 0.0 {
            steps as usize
        } else {
            0
        }
    }

    /// 两次进度日志之间的步数，`None` 表示关闭
    pub fn status_every(&self) -> Option<usize> {
        if self.status_interval_hours <= 0.0 {
            return None;
        }
        let every = (self.status_interval_hours * 3600.0 / self.time_step.abs()).round();
        (every >= 1.0).then_some(every as usize)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.duration_hours > 0.0 && self.duration_hours.is_finite()) {
            return Err(ConfigError::invalid("run.duration_hours", self.duration_hours, "运行时长必须为正"));
        }
        if !(self.time_step > 0.0 && self.time_step.is_finite()) {
            return Err(ConfigError::invalid("run.time_step", self.time_step, "时间步长必须为正"));
        }
        if !(self.seafloor_depth > 0.0 && self.seafloor_depth.is_finite()) {
            return Err(ConfigError::invalid("run.seafloor_depth", self.seafloor_depth, "海底深度必须为正"));
        }
        if self.status_interval_hours.is_nan() || self.status_interval_hours < 0.0 {
            return Err(ConfigError::invalid(
                "run.status_interval_hours",
                self.status_interval_hours,
                "进度间隔不能为负",
            ));
        }
        Ok(())
    }
}

// ============================================================
// 背景场来源
// ============================================================

/// 等间距轴定义
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    /// 起点
    pub start: f64,
    /// 终点（含）
    pub end: f64,
    /// 点数
    pub count: usize,
}

impl AxisSpec {
    /// 创建轴定义
    pub const fn new(start: f64, end: f64, count: usize) -> Self {
        Self { start, end, count }
    }

    /// 展开为坐标值
    pub fn values(&self) -> Vec<f64> {
        match self.count {
            0 => Vec::new(),
            1 => vec![self.start],
            n => {
                let step = (self.end - self.start) / (n - 1) as f64;
                (0..n).map(|i| self.start + step * i as f64).collect()
            }
        }
    }

    fn validate(&self, key: &str) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::invalid(key, self.count, "轴至少需要一个点"));
        }
        if !(self.start.is_finite() && self.end.is_finite()) {
            return Err(ConfigError::invalid(key, format!("{}..{}", self.start, self.end), "端点必须为有限值"));
        }
        if self.count > 1 && self.start == self.end {
            return Err(ConfigError::invalid(key, self.start, "多点轴的端点不能相同"));
        }
        Ok(())
    }
}

/// 均匀合成场参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformFieldConfig {
    /// 浮力频率平方 [1/s²]
    #[serde(default = "default_n2")]
    pub n2: f64,
    /// 东向流速 [m/s]
    #[serde(default)]
    pub u: f64,
    /// 北向流速 [m/s]
    #[serde(default)]
    pub v: f64,
    /// 经度轴 [deg]
    #[serde(default = "default_lon_axis")]
    pub lon: AxisSpec,
    /// 纬度轴 [deg]
    #[serde(default = "default_lat_axis")]
    pub lat: AxisSpec,
    /// 深度轴 [m]
    #[serde(default = "default_depth_axis")]
    pub depth: AxisSpec,
    /// 时间轴 [h]，相对 `wave.start_time`
    #[serde(default = "default_time_axis")]
    pub time_hours: AxisSpec,
}

fn default_n2() -> f64 { 1e-5 }
fn default_lon_axis() -> AxisSpec { AxisSpec::new(-66.0, -58.0, 9) }
fn default_lat_axis() -> AxisSpec { AxisSpec::new(-59.0, -51.0, 9) }
fn default_depth_axis() -> AxisSpec { AxisSpec::new(0.0, 5000.0, 51) }
fn default_time_axis() -> AxisSpec { AxisSpec::new(-48.0, 48.0, 9) }

impl Default for UniformFieldConfig {
    fn default() -> Self {
        Self {
            n2: default_n2(),
            u: 0.0,
            v: 0.0,
            lon: default_lon_axis(),
            lat: default_lat_axis(),
            depth: default_depth_axis(),
            time_hours: default_time_axis(),
        }
    }
}

/// 场文件变量名
///
/// 默认值对应 satGEM 产品的命名。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    /// 经度轴
    #[serde(default = "name_lon")]
    pub lon: String,
    /// 纬度轴
    #[serde(default = "name_lat")]
    pub lat: String,
    /// 深度轴
    #[serde(default = "name_depth")]
    pub depth: String,
    /// 时间轴
    #[serde(default = "name_time")]
    pub time: String,
    /// 错位经度轴（v 所在）
    #[serde(default = "name_center_lon")]
    pub center_lon: String,
    /// 错位纬度轴（u 所在）
    #[serde(default = "name_center_lat")]
    pub center_lat: String,
    /// 东向流速
    #[serde(default = "name_u")]
    pub u: String,
    /// 北向流速
    #[serde(default = "name_v")]
    pub v: String,
    /// 温度
    #[serde(default = "name_temperature")]
    pub temperature: String,
    /// 盐度
    #[serde(default = "name_salinity")]
    pub salinity: String,
    /// 预计算 N²；给出时不再读取温盐
    #[serde(default)]
    pub n2: Option<String>,
}

fn name_lon() -> String { "lons".into() }
fn name_lat() -> String { "lats".into() }
fn name_depth() -> String { "depthlvl".into() }
fn name_time() -> String { "time".into() }
fn name_center_lon() -> String { "centerlon".into() }
fn name_center_lat() -> String { "centerlat".into() }
fn name_u() -> String { "satGEM_east".into() }
fn name_v() -> String { "satGEM_north".into() }
fn name_temperature() -> String { "satGEM_temp".into() }
fn name_salinity() -> String { "satGEM_sal".into() }

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            lon: name_lon(),
            lat: name_lat(),
            depth: name_depth(),
            time: name_time(),
            center_lon: name_center_lon(),
            center_lat: name_center_lat(),
            u: name_u(),
            v: name_v(),
            temperature: name_temperature(),
            salinity: name_salinity(),
            n2: None,
        }
    }
}

/// 四维变量在文件中的维度顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArrayLayout {
    /// (time, depth, lat, lon)，CF 惯例
    #[default]
    TimeDepthLatLon,
    /// (lon, lat, depth, time)，与内存布局一致
    LonLatDepthTime,
}

/// 时间轴编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeEncoding {
    /// CF `units` 属性（"<unit> since <reference>"）
    #[default]
    Cf,
    /// MATLAB datenum（自 0000-01-00 起的天数）
    Datenum,
    /// Unix 纪元秒
    EpochSeconds,
}

/// 背景场来源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum FieldSourceConfig {
    /// 均匀合成场
    Uniform(UniformFieldConfig),
    /// NetCDF 文件
    #[serde(rename = "netcdf")]
    NetCdf {
        /// 文件路径
        path: PathBuf,
        /// 变量名
        #[serde(default)]
        names: FieldNames,
        /// 维度顺序
        #[serde(default)]
        layout: ArrayLayout,
        /// 时间编码
        #[serde(default)]
        time_encoding: TimeEncoding,
        /// 覆盖文件中的时间 `units` 属性
        #[serde(default)]
        time_units: Option<String>,
    },
}

impl Default for FieldSourceConfig {
    fn default() -> Self {
        Self::Uniform(UniformFieldConfig::default())
    }
}

impl FieldSourceConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Uniform(uniform) => {
                if !uniform.n2.is_finite() {
                    return Err(ConfigError::invalid("field.n2", uniform.n2, "必须为有限值"));
                }
                if !(uniform.u.is_finite() && uniform.v.is_finite()) {
                    return Err(ConfigError::invalid(
                        "field.u",
                        format!("({}, {})", uniform.u, uniform.v),
                        "流速必须为有限值",
                    ));
                }
                uniform.lon.validate("field.lon")?;
                uniform.lat.validate("field.lat")?;
                uniform.depth.validate("field.depth")?;
                uniform.time_hours.validate("field.time_hours")?;
                Ok(())
            }
            Self::NetCdf { path, .. } => {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::Missing("field.path".into()));
                }
                Ok(())
            }
        }
    }
}

// ============================================================
// 输出
// ============================================================

/// 输出配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 输出目录
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// 文件名（不含扩展名）
    #[serde(default = "default_file_stem")]
    pub file_stem: String,

    /// 输出格式
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_output_dir() -> PathBuf { PathBuf::from("output") }
fn default_file_stem() -> String { "ray".into() }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            file_stem: default_file_stem(),
            format: OutputFormat::default(),
        }
    }
}

impl OutputConfig {
    /// 轨迹输出文件完整路径
    pub fn trajectory_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}.{}", self.file_stem, self.format.extension()))
    }
}

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// CSV 格式
    #[default]
    Csv,
    /// JSON 格式（含运行报告）
    Json,
}

impl OutputFormat {
    /// 文件扩展名
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

// ============================================================
// 加载 / 验证 / 保存
// ============================================================

impl RunConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json(&content)
    }

    /// 从 JSON 字符串解析并验证
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: RunConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.wave.validate()?;
        self.run.validate()?;
        self.field.validate()?;

        if self.wave.depth > self.run.seafloor_depth {
            return Err(ConfigError::invalid(
                "wave.depth",
                self.wave.depth,
                format!("初始深度超过海底深度 {}", self.run.seafloor_depth),
            ));
        }
        Ok(())
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.run.direction, Direction::Forward);
        assert_eq!(config.run.out_of_domain, DomainPolicy::Terminate);
        assert_eq!(config.output.format, OutputFormat::Csv);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = RunConfig::from_json("{}").unwrap();
        assert_eq!(config.wave, WaveConfig::default());
        assert_eq!(config.run, IntegrationConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "wave": { "depth": 500.0, "start_time": "2011-03-01T12:00:00Z" },
            "run": { "direction": "reverse", "time_step": 10.0, "out_of_domain": "clamp" },
            "field": { "source": "netcdf", "path": "satgem.nc", "time_encoding": "datenum" },
            "output": { "format": "json" }
        }"#;
        let config = RunConfig::from_json(json).unwrap();
        assert_eq!(config.wave.depth, 500.0);
        assert_eq!(config.wave.k, default_k());
        assert_eq!(config.run.direction, Direction::Reverse);
        assert_eq!(config.run.out_of_domain, DomainPolicy::Clamp);
        assert!((config.run.signed_time_step() + 10.0).abs() < 1e-12);
        match &config.field {
            FieldSourceConfig::NetCdf { path, names, time_encoding, layout, .. } => {
                assert_eq!(path, &PathBuf::from("satgem.nc"));
                assert_eq!(names.u, "satGEM_east");
                assert_eq!(names.center_lat, "centerlat");
                assert_eq!(*time_encoding, TimeEncoding::Datenum);
                assert_eq!(*layout, ArrayLayout::TimeDepthLatLon);
            }
            other => panic!("unexpected field source: {other:?}"),
        }
        assert!(config.output.trajectory_path().ends_with("ray.json"));
    }

    #[test]
    fn test_start_timestamp() {
        let json = r#"{ "wave": { "start_time": "1970-01-01T01:00:00.5Z" } }"#;
        let config = RunConfig::from_json(json).unwrap();
        assert!((config.wave.start_timestamp() - 3600.5).abs() < 1e-6);
    }

    #[test]
    fn test_step_count() {
        let run = IntegrationConfig {
            duration_hours: 24.0,
            time_step: 10.0,
            ..Default::default()
        };
        assert_eq!(run.step_count(), 8640);

        let run = IntegrationConfig {
            duration_hours: 1.0,
            time_step: 7.0,
            ..Default::default()
        };
        assert_eq!(run.step_count(), 515);
        assert_eq!(run.status_every(), Some(3086));
    }

    #[test]
    fn test_status_disabled() {
        let run = IntegrationConfig {
            status_interval_hours: 0.0,
            ..Default::default()
        };
        assert_eq!(run.status_every(), None);
    }

    #[test]
    fn test_zero_wavenumber_rejected() {
        let mut config = RunConfig::default();
        config.wave.k = 0.0;
        config.wave.l = 0.0;
        config.wave.m = 0.0;
        match config.validate() {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, "wave.m"),
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_values() {
        let mut config = RunConfig::default();
        config.run.time_step = 0.0;
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.wave.omega = 0.0;
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.wave.depth = 5000.0;
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.wave.lat = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_direction_is_parse_error() {
        let result = RunConfig::from_json(r#"{ "run": { "direction": "sideways" } }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_axis_spec_values() {
        let axis = AxisSpec::new(0.0, 100.0, 5);
        assert_eq!(axis.values(), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(AxisSpec::new(3.0, 3.0, 1).values(), vec![3.0]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");

        let mut config = RunConfig::default();
        config.run.direction = Direction::Reverse;
        config.wave.depth = 500.0;
        config.save_to_file(&path).unwrap();

        let loaded = RunConfig::from_file(&path).unwrap();
        assert_eq!(loaded.run.direction, Direction::Reverse);
        assert_eq!(loaded.wave, config.wave);
        assert_eq!(loaded.field, config.field);
    }
}

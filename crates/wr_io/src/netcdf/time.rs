// crates/wr_io/src/netcdf/time.rs

//! CF 时间格式解析
//!
//! 把 NetCDF 时间轴转换为 Unix 纪元秒，供场体的时间轴使用。
//!
//! # CF 时间约定
//!
//! CF (Climate and Forecast) 约定使用 "units since reference_time" 格式：
//! - `seconds since 1970-01-01 00:00:00`
//! - `hours since 2020-01-01`
//! - `days since 1900-01-01T00:00:00Z`
//!
//! # 日历
//!
//! 只有 Standard/Gregorian 与 Proleptic Gregorian 能映射到真实时刻
//! （两者都按预期格里高利历处理）。其余日历可以解析，但转换为纪元秒时
//! 返回 [`CfTimeError::UnsupportedCalendar`]。
//!
//! satGEM 等 MATLAB 产品的时间轴是 datenum，见 [`datenum_to_epoch_seconds`]。

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;
use std::str::FromStr;

// ============================================================
// 错误类型
// ============================================================

/// CF 时间解析错误
#[derive(Debug, Clone, PartialEq)]
pub enum CfTimeError {
    /// 无效的单位字符串
    InvalidUnits(String),
    /// 无效的日期
    InvalidDate(String),
    /// 无效的日历类型
    InvalidCalendar(String),
    /// 日历无法映射到真实时刻
    UnsupportedCalendar(CfCalendar),
    /// 数值溢出
    Overflow(String),
}

impl fmt::Display for CfTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CfTimeError::InvalidUnits(msg) => write!(f, "无效的时间单位: {}", msg),
            CfTimeError::InvalidDate(msg) => write!(f, "无效的日期: {}", msg),
            CfTimeError::InvalidCalendar(msg) => write!(f, "无效的日历类型: {}", msg),
            CfTimeError::UnsupportedCalendar(cal) => {
                write!(f, "日历 {} 无法转换为真实时刻", cal)
            }
            CfTimeError::Overflow(msg) => write!(f, "数值溢出: {}", msg),
        }
    }
}

impl std::error::Error for CfTimeError {}

/// CF 时间解析结果
pub type CfTimeResult<T> = Result<T, CfTimeError>;

// ============================================================
// 日历类型
// ============================================================

/// CF 日历类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CfCalendar {
    /// 标准格里高利历
    #[default]
    Standard,
    /// 预期格里高利历
    Proleptic,
    /// 无闰年（每年365天）
    NoLeap,
    /// 全闰年（每年366天）
    AllLeap,
    /// 360 天历（每月30天）
    Day360,
    /// 儒略历
    Julian,
}

impl CfCalendar {
    /// 是否为格里高利历（可映射到 UTC 时刻）
    pub fn is_gregorian(self) -> bool {
        matches!(self, Self::Standard | Self::Proleptic)
    }
}

impl FromStr for CfCalendar {
    type Err = CfTimeError;

    fn from_str(s: &str) -> CfTimeResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "gregorian" => Ok(Self::Standard),
            "proleptic_gregorian" | "proleptic" => Ok(Self::Proleptic),
            "noleap" | "365_day" | "no_leap" => Ok(Self::NoLeap),
            "all_leap" | "366_day" | "allleap" => Ok(Self::AllLeap),
            "360_day" => Ok(Self::Day360),
            "julian" => Ok(Self::Julian),
            _ => Err(CfTimeError::InvalidCalendar(s.to_string())),
        }
    }
}

impl fmt::Display for CfCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Proleptic => write!(f, "proleptic_gregorian"),
            Self::NoLeap => write!(f, "noleap"),
            Self::AllLeap => write!(f, "all_leap"),
            Self::Day360 => write!(f, "360_day"),
            Self::Julian => write!(f, "julian"),
        }
    }
}

// ============================================================
// 时间单位
// ============================================================

/// 时间单位类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// 秒
    Seconds,
    /// 分钟
    Minutes,
    /// 小时
    Hours,
    /// 天
    Days,
}

impl TimeUnit {
    /// 转换为秒
    pub fn to_seconds(self, value: f64) -> f64 {
        match self {
            Self::Seconds => value,
            Self::Minutes => value * 60.0,
            Self::Hours => value * 3600.0,
            Self::Days => value * 86400.0,
        }
    }

    /// 从秒转换
    pub fn from_seconds(self, seconds: f64) -> f64 {
        match self {
            Self::Seconds => seconds,
            Self::Minutes => seconds / 60.0,
            Self::Hours => seconds / 3600.0,
            Self::Days => seconds / 86400.0,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = CfTimeError;

    fn from_str(s: &str) -> CfTimeResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "second" | "seconds" | "sec" | "secs" | "s" => Ok(Self::Seconds),
            "minute" | "minutes" | "min" | "mins" => Ok(Self::Minutes),
            "hour" | "hours" | "h" | "hr" | "hrs" => Ok(Self::Hours),
            "day" | "days" | "d" => Ok(Self::Days),
            _ => Err(CfTimeError::InvalidUnits(format!("未知时间单位: {}", s))),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds => write!(f, "seconds"),
            Self::Minutes => write!(f, "minutes"),
            Self::Hours => write!(f, "hours"),
            Self::Days => write!(f, "days"),
        }
    }
}

// ============================================================
// 参考时刻解析
// ============================================================

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// 解析参考时刻，接受 `YYYY-MM-DD[( |T)HH:MM[:SS[.f]]][Z| UTC]`
fn parse_reference(s: &str) -> CfTimeResult<NaiveDateTime> {
    let trimmed = s.trim();
    let trimmed = trimmed
        .strip_suffix("UTC")
        .or_else(|| trimmed.strip_suffix('Z'))
        .unwrap_or(trimmed)
        .trim();

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| CfTimeError::InvalidDate(s.to_string()))
}

// ============================================================
// CF 时间单位
// ============================================================

/// CF 时间单位
///
/// 表示 "units since reference_time" 格式
#[derive(Debug, Clone, PartialEq)]
pub struct CfTimeUnits {
    /// 时间单位类型
    pub unit: TimeUnit,
    /// 参考时刻 (UTC)
    pub reference: NaiveDateTime,
    /// 日历类型
    pub calendar: CfCalendar,
}

impl CfTimeUnits {
    /// 从 units 属性解析
    ///
    /// ```
    /// use wr_io::CfTimeUnits;
    ///
    /// let units = CfTimeUnits::parse("hours since 1970-01-02 00:00:00").unwrap();
    /// assert_eq!(units.to_epoch_seconds(1.0).unwrap(), 86_400.0 + 3_600.0);
    /// ```
    pub fn parse(units_str: &str) -> CfTimeResult<Self> {
        let lower = units_str.to_lowercase();
        let since_pos = lower.find(" since ").ok_or_else(|| {
            CfTimeError::InvalidUnits(format!("缺少 'since' 关键字: {}", units_str))
        })?;

        let unit: TimeUnit = units_str[..since_pos].parse()?;
        let reference = parse_reference(&units_str[since_pos + " since ".len()..])?;

        Ok(Self {
            unit,
            reference,
            calendar: CfCalendar::Standard,
        })
    }

    /// 同时解析单位和日历
    pub fn parse_with_calendar(units_str: &str, calendar_str: Option<&str>) -> CfTimeResult<Self> {
        let mut result = Self::parse(units_str)?;
        if let Some(cal) = calendar_str {
            result.calendar = cal.parse()?;
        }
        Ok(result)
    }

    /// 设置日历类型
    pub fn with_calendar(mut self, calendar: CfCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    fn reference_epoch_seconds(&self) -> CfTimeResult<f64> {
        if !self.calendar.is_gregorian() {
            return Err(CfTimeError::UnsupportedCalendar(self.calendar));
        }
        let utc = self.reference.and_utc();
        Ok(utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9)
    }

    /// CF 时间值 → Unix 纪元秒
    pub fn to_epoch_seconds(&self, value: f64) -> CfTimeResult<f64> {
        Ok(self.reference_epoch_seconds()? + self.unit.to_seconds(value))
    }

    /// 批量转换
    pub fn decode(&self, values: &[f64]) -> CfTimeResult<Vec<f64>> {
        let base = self.reference_epoch_seconds()?;
        Ok(values.iter().map(|&v| base + self.unit.to_seconds(v)).collect())
    }

    /// CF 时间值 → UTC 时刻
    pub fn to_datetime(&self, value: f64) -> CfTimeResult<DateTime<Utc>> {
        let secs = self.to_epoch_seconds(value)?;
        let whole = secs.floor();
        let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
        DateTime::<Utc>::from_timestamp(whole as i64, nanos)
            .ok_or_else(|| CfTimeError::Overflow(format!("{} {}", value, self.unit)))
    }

    /// UTC 时刻 → CF 时间值
    pub fn from_datetime(&self, dt: &DateTime<Utc>) -> CfTimeResult<f64> {
        let secs = dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) * 1e-9;
        Ok(self.unit.from_seconds(secs - self.reference_epoch_seconds()?))
    }
}

impl fmt::Display for CfTimeUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} since {}",
            self.unit,
            self.reference.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

// ============================================================
// MATLAB datenum
// ============================================================

/// 1970-01-01 对应的 MATLAB datenum
const DATENUM_UNIX_EPOCH: f64 = 719_529.0;

/// MATLAB datenum（自 0000-01-00 起的天数）→ Unix 纪元秒
pub fn datenum_to_epoch_seconds(datenum: f64) -> f64 {
    (datenum - DATENUM_UNIX_EPOCH) * 86_400.0
}

// ============================================================
// 测试
// ============================================================

// crates/wr_ray/src/state.rs

//! 波状态
//!
//! [`InitialConditions`] 描述射线起点，[`WaveState`] 是积分过程中
//! 每一步被原地更新的状态。位置同时以相对起点的平面位移 (x, y)
//! 和绝对经纬度给出；深度向下为正。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;

use wr_config::WaveConfig;
use wr_field::QueryPoint;
use wr_physics::Wavenumber;

/// 射线初始条件
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialConditions {
    /// 东向波数 [rad/m]
    pub k: f64,
    /// 北向波数 [rad/m]
    pub l: f64,
    /// 垂向波数 [rad/m]
    pub m: f64,
    /// 本征频率 [rad/s]
    pub omega: f64,
    /// 初始深度 [m]
    pub depth: f64,
    /// 初始纬度 [deg]
    pub lat: f64,
    /// 初始经度 [deg]
    pub lon: f64,
    /// 起始时刻 [s since epoch]
    pub start_time: f64,
}

impl InitialConditions {
    /// 波数向量
    pub fn wavenumber(&self) -> Wavenumber {
        Wavenumber::new(self.k, self.l, self.m)
    }

    /// 水平波数 kh = sqrt(k² + l²)
    pub fn horizontal_wavenumber(&self) -> f64 {
        self.wavenumber().horizontal()
    }

    /// 水平波长 [m]，kh = 0 时为无穷大
    pub fn horizontal_wavelength(&self) -> f64 {
        TAU / self.horizontal_wavenumber()
    }

    /// 垂向波长 [m]
    pub fn vertical_wavelength(&self) -> f64 {
        TAU / self.m.abs()
    }

    /// 内禀周期 [s]
    pub fn period(&self) -> f64 {
        TAU / self.omega.abs()
    }
}

impl From<&WaveConfig> for InitialConditions {
    fn from(wave: &WaveConfig) -> Self {
        Self {
            k: wave.k,
            l: wave.l,
            m: wave.m,
            omega: wave.omega,
            depth: wave.depth,
            lat: wave.lat,
            lon: wave.lon,
            start_time: wave.start_timestamp(),
        }
    }
}

impl fmt::Display for InitialConditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "波参数:")?;
        writeln!(f, "  k  = {:.6e} rad/m", self.k)?;
        writeln!(f, "  l  = {:.6e} rad/m", self.l)?;
        writeln!(f, "  m  = {:.6e} rad/m", self.m)?;
        writeln!(f, "  kh = {:.6e} rad/m", self.horizontal_wavenumber())?;
        writeln!(f, "  ω  = {:.6e} rad/s", self.omega)?;
        writeln!(f, "  λh = {:.1} m, λz = {:.1} m", self.horizontal_wavelength(), self.vertical_wavelength())?;
        write!(f, "  T  = {:.2} h", self.period() / 3600.0)
    }
}

/// 单条射线在某一时刻的状态
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveState {
    /// 东向位移 [m]，相对起点
    pub x: f64,
    /// 北向位移 [m]，相对起点
    pub y: f64,
    /// 深度 [m]
    pub z: f64,
    /// 经度 [deg]
    pub lon: f64,
    /// 纬度 [deg]
    pub lat: f64,
    /// 东向波数 [rad/m]
    pub k: f64,
    /// 北向波数 [rad/m]
    pub l: f64,
    /// 垂向波数 [rad/m]
    pub m: f64,
    /// 本征频率 [rad/s]
    pub omega: f64,
    /// 时刻 [s since epoch]
    pub t: f64,
}

impl WaveState {
    /// 由初始条件构造起点状态
    pub fn initial(ic: &InitialConditions) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: ic.depth,
            lon: ic.lon,
            lat: ic.lat,
            k: ic.k,
            l: ic.l,
            m: ic.m,
            omega: ic.omega,
            t: ic.start_time,
        }
    }

    /// 波数向量
    #[inline]
    pub fn wavenumber(&self) -> Wavenumber {
        Wavenumber::new(self.k, self.l, self.m)
    }

    /// 场查询点
    #[inline]
    pub fn query_point(&self) -> QueryPoint {
        QueryPoint::new(self.lon, self.lat, self.z, self.t)
    }

    /// 当前时刻（超出 chrono 表示范围时为 `None`）
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        let secs = self.t.floor();
        let nanos = ((self.t - secs) * 1e9).round().min(999_999_999.0);
        DateTime::<Utc>::from_timestamp(secs as i64, nanos as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lee_wave() -> InitialConditions {
        InitialConditions {
            k: 3.24e-4,
            l: -1.4e-4,
            m: -9.76e-3,
            omega: -1.3e-4,
            depth: 1500.0,
            lat: -55.0,
            lon: -62.0,
            start_time: 1_294_617_600.0,
        }
    }

    #[test]
    fn test_derived_properties() {
        let ic = lee_wave();
        let kh = (3.24e-4f64.powi(2) + 1.4e-4f64.powi(2)).sqrt();
        assert!((ic.horizontal_wavenumber() - kh).abs() < 1e-12);
        assert!((ic.horizontal_wavelength() - TAU / kh).abs() < 1e-6);
        assert!((ic.vertical_wavelength() - TAU / 9.76e-3).abs() < 1e-9);
        assert!((ic.period() - TAU / 1.3e-4).abs() < 1e-6);
    }

    #[test]
    fn test_display_lists_properties() {
        let text = lee_wave().to_string();
        assert!(text.contains("kh"));
        assert!(text.contains("ω"));
    }

    #[test]
    fn test_initial_state() {
        let state = WaveState::initial(&lee_wave());
        assert_eq!(state.x, 0.0);
        assert_eq!(state.y, 0.0);
        assert_eq!(state.z, 1500.0);
        assert_eq!(state.lon, -62.0);
        assert_eq!(state.m, -9.76e-3);

        let q = state.query_point();
        assert_eq!(q.depth, 1500.0);
        assert_eq!(q.time, 1_294_617_600.0);
    }

    #[test]
    fn test_datetime() {
        let state = WaveState::initial(&lee_wave());
        let dt = state.datetime().unwrap();
        assert_eq!(dt.to_rfc3339(), "2011-01-10T00:00:00+00:00");
    }

    #[test]
    fn test_from_wave_config() {
        let wave = WaveConfig::default();
        let ic = InitialConditions::from(&wave);
        assert_eq!(ic.k, wave.k);
        assert_eq!(ic.start_time, wave.start_timestamp());
    }
}

// crates/wr_geo/src/geodesy.rs
//! 球面地球上的位移/经纬度换算
//!
//! 纬度变化使用线性近似 `dy / 111 110 m/deg`，经度变化由反 haversine 公式给出：
//!
//! ```text
//! hav(d/R) = hav(dy/R) + cos φ1 cos φ2 · hav(Δλ)
//! Δλ = acos(1 − 2 hav(Δλ)),  sign(Δλ) = sign(dx)
//! ```
//!
//! 实现中 `acos(1 − 2h)` 写作等价的 `2·asin(√h)`，米级位移下不损失精度。
//!
//! 其中 `d = hypot(dx, dy)`，`R = 6 371 000 m`。反余弦本身不带符号，
//! 经度增量的方向必须显式取自 `dx`。极点附近 (cos φ → 0) 不在适用范围内。

use serde::{Deserialize, Serialize};
use wr_foundation::constants::{EARTH_RADIUS, METERS_PER_DEGREE_LAT};

/// 地理坐标点 (度)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    /// 经度 [deg]
    pub lon: f64,
    /// 纬度 [deg]
    pub lat: f64,
}

impl GeoPoint {
    /// 创建坐标点
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// 沿平面位移 (dx, dy) 移动后的新坐标
    #[must_use]
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        let (lon, lat) = displacement_to_geo(dx, dy, self.lon, self.lat);
        Self { lon, lat }
    }
}

#[inline]
fn hav(theta: f64) -> f64 {
    let s = (0.5 * theta).sin();
    s * s
}

/// 平面位移 → 经纬度
///
/// # 参数
/// - `dx`: 向东位移 [m]
/// - `dy`: 向北位移 [m]
/// - `lon0`, `lat0`: 参考点 [deg]
///
/// # 返回
/// `(lon, lat)` [deg]。`dx == 0` 时经度保持不变，`(0, 0)` 精确返回参考点。
pub fn displacement_to_geo(dx: f64, dy: f64, lon0: f64, lat0: f64) -> (f64, f64) {
    let lat = lat0 + dy / METERS_PER_DEGREE_LAT;
    if dx == 0.0 {
        return (lon0, lat);
    }

    let phi1 = lat0.to_radians();
    let phi2 = lat.to_radians();
    let d = dx.hypot(dy);

    let hav_dlon = (hav(d / EARTH_RADIUS) - hav(dy / EARTH_RADIUS)) / (phi1.cos() * phi2.cos());
    let dlon = (2.0 * hav_dlon.clamp(0.0, 1.0).sqrt().asin()).to_degrees();

    (lon0 + dlon.copysign(dx), lat)
}

/// 经纬度 → 平面位移，[`displacement_to_geo`] 的逆运算
///
/// 返回 `(dx, dy)` [m]，与正变换使用同一线性纬度规则，二者可互逆。
pub fn geo_to_displacement(lon: f64, lat: f64, lon0: f64, lat0: f64) -> (f64, f64) {
    let dy = (lat - lat0) * METERS_PER_DEGREE_LAT;
    let dlon = lon - lon0;
    if dlon == 0.0 {
        return (0.0, dy);
    }

    let phi1 = lat0.to_radians();
    let phi2 = lat.to_radians();
    let h = hav(dy / EARTH_RADIUS) + phi1.cos() * phi2.cos() * hav(dlon.to_radians());
    let d = 2.0 * EARTH_RADIUS * h.sqrt().min(1.0).asin();
    let dx = (d * d - dy * dy).max(0.0).sqrt();

    (dx.copysign(dlon), dy)
}

/// 两点间大圆距离 [m] (haversine)
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let h = hav(phi2 - phi1) + phi1.cos() * phi2.cos() * hav((b.lon - a.lon).to_radians());
    2.0 * EARTH_RADIUS * h.sqrt().min(1.0).asin()
}

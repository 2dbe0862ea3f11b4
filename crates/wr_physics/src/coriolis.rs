// crates/wr_physics/src/coriolis.rs

//! 科里奥利参数
//!
//! f = 2 Ω sin(φ)，Ω = 7.2921e-5 rad/s。南半球 f < 0。

use wr_foundation::constants::EARTH_ANGULAR_VELOCITY;

/// 由纬度 [deg] 计算科里奥利参数 [rad/s]
#[inline]
pub fn coriolis_parameter(lat_deg: f64) -> f64 {
    2.0 * EARTH_ANGULAR_VELOCITY * lat_deg.to_radians().sin()
}

/// 惯性周期 2π/|f| [s]，赤道处为 `None`
pub fn inertial_period(lat_deg: f64) -> Option<f64> {
    let f = coriolis_parameter(lat_deg).abs();
    if f > 0.0 {
        Some(2.0 * std::f64::consts::PI / f)
    } else {
        None
    }
}

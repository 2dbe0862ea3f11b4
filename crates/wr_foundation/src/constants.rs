// crates/wr_foundation/src/constants.rs

//! 地球物理常数

/// 地球自转角速度 [rad/s]
pub const EARTH_ANGULAR_VELOCITY: f64 = 7.2921e-5;

/// 球面地球平均半径 [m]
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// 每度纬度对应的距离 [m/deg]
///
/// 位移换算使用的线性近似，与 [`EARTH_RADIUS`] 推出的 111 194.9 m/deg 略有差异。
pub const METERS_PER_DEGREE_LAT: f64 = 111_110.0;

/// 重力加速度 [m/s²]
pub const GRAVITY: f64 = 9.81;

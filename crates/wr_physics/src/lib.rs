// crates/wr_physics/src/lib.rs

//! 物理公式模块
//!
//! 射线追踪积分器消费的纯函数集合：
//! - 科里奥利参数 (`coriolis`)
//! - UNESCO EOS-80 海水状态方程与压力/深度换算 (`eos`)
//! - 浮力频率剖面 N²(p) (`buoyancy`)
//! - 内重力波色散关系、群速度与折射项 (`dispersion`)
//!
//! 本层不持有状态，也不依赖场数据的存储方式。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buoyancy;
pub mod coriolis;
pub mod dispersion;
pub mod eos;

// 重导出常用类型
pub use buoyancy::{nearest_level, BuoyancyModel, BuoyancyProfile, Eos80Buoyancy};
pub use coriolis::coriolis_parameter;
pub use dispersion::{
    group_velocity, intrinsic_frequency, refraction, vertical_energy, DispersionError,
    GroupVelocity, Wavenumber,
};
pub use eos::{depth_from_pressure, pressure_from_depth, Eos80};

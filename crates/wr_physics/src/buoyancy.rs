// crates/wr_physics/src/buoyancy.rs

//! 浮力频率剖面
//!
//! 由温度、盐度、压力柱计算相邻层中点处的 N²：
//!
//! ```text
//! N²(p_mid) = g / ρ̄ · (ρ_b − ρ_a) / (z_b − z_a)
//! ```
//!
//! 两个水团都在中点压力 `p_mid` 下求密度（局地参考密度），
//! 因此压缩性不会被误当作层结。输出长度比输入少一。

use serde::{Deserialize, Serialize};
use wr_foundation::constants::GRAVITY;

use crate::eos::{depth_from_pressure, Eos80};

/// 单个水平/时间单元上的 N² 剖面
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuoyancyProfile {
    /// 浮力频率平方 [rad²/s²]
    pub n2: Vec<f64>,
    /// 与 `n2` 对应的压力 [dbar]
    pub pressure: Vec<f64>,
}

impl BuoyancyProfile {
    /// 由已知 N² 与压力创建剖面
    pub fn new(n2: Vec<f64>, pressure: Vec<f64>) -> Self {
        debug_assert_eq!(n2.len(), pressure.len());
        Self { n2, pressure }
    }

    /// 剖面层数
    pub fn len(&self) -> usize {
        self.n2.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.n2.is_empty()
    }

    /// 与给定压力最近的层索引
    pub fn nearest_index(&self, pressure: f64) -> Option<usize> {
        nearest_level(self.pressure.iter().copied(), pressure)
    }

    /// 与给定压力最近的 N²；空剖面返回 NaN
    pub fn nearest(&self, pressure: f64) -> f64 {
        self.nearest_index(pressure)
            .map_or(f64::NAN, |i| self.n2[i])
    }
}

/// 与 `target` 最近的层索引，等距时取较小索引；无层时返回 `None`
pub fn nearest_level(levels: impl IntoIterator<Item = f64>, target: f64) -> Option<usize> {
    levels
        .into_iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, p)| {
            let d = (p - target).abs();
            match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((i, d)),
            }
        })
        .map(|(i, _)| i)
}

/// 相邻两层的中点压力 [dbar]
#[inline]
pub fn mid_pressure(pressure: [f64; 2]) -> f64 {
    0.5 * (pressure[0] + pressure[1])
}

/// 由 T/S/p 柱计算 N² 剖面的海洋学库接口
///
/// 积分器只通过该 trait 消费 N²，便于替换为其它状态方程实现。
pub trait BuoyancyModel: Send + Sync {
    /// 模型名称
    fn name(&self) -> &'static str;

    /// 相邻两层之间（中点压力处）的 N²
    ///
    /// # 参数
    /// - `temperature`: 上、下层温度 [°C]
    /// - `salinity`: 上、下层盐度 [PSU]
    /// - `pressure`: 上、下层压力 [dbar]
    /// - `lat_deg`: 所在纬度，用于压力与深度换算
    fn n2_layer(
        &self,
        temperature: [f64; 2],
        salinity: [f64; 2],
        pressure: [f64; 2],
        lat_deg: f64,
    ) -> f64;

    /// 计算整柱 N² 剖面
    ///
    /// `temperature`、`salinity`、`pressure` 等长，压力单调递增。
    /// 少于两层时返回空剖面。
    fn n2_profile(
        &self,
        temperature: &[f64],
        salinity: &[f64],
        pressure: &[f64],
        lat_deg: f64,
    ) -> BuoyancyProfile {
        let n = temperature.len().min(salinity.len()).min(pressure.len());
        if n < 2 {
            return BuoyancyProfile::default();
        }

        let (n2, p_mid): (Vec<f64>, Vec<f64>) = (0..n - 1)
            .map(|i| {
                let p = [pressure[i], pressure[i + 1]];
                let value = self.n2_layer(
                    [temperature[i], temperature[i + 1]],
                    [salinity[i], salinity[i + 1]],
                    p,
                    lat_deg,
                );
                (value, mid_pressure(p))
            })
            .unzip();

        BuoyancyProfile::new(n2, p_mid)
    }
}

/// 基于 EOS-80 的 N² 计算
#[derive(Debug, Clone, Copy)]
pub struct Eos80Buoyancy {
    eos: Eos80,
    g: f64,
}

impl Default for Eos80Buoyancy {
    fn default() -> Self {
        Self::new(GRAVITY)
    }
}

impl Eos80Buoyancy {
    /// 指定重力加速度创建
    pub fn new(g: f64) -> Self {
        Self { eos: Eos80, g }
    }
}

impl BuoyancyModel for Eos80Buoyancy {
    fn name(&self) -> &'static str {
        "EOS-80"
    }

    fn n2_layer(
        &self,
        temperature: [f64; 2],
        salinity: [f64; 2],
        pressure: [f64; 2],
        lat_deg: f64,
    ) -> f64 {
        let p = mid_pressure(pressure);
        let rho_a = self.eos.density(salinity[0], temperature[0], p);
        let rho_b = self.eos.density(salinity[1], temperature[1], p);
        let dz = depth_from_pressure(pressure[1], lat_deg) - depth_from_pressure(pressure[0], lat_deg);
        let rho_mean = 0.5 * (rho_a + rho_b);

        self.g * (rho_b - rho_a) / (rho_mean * dz)
    }
}

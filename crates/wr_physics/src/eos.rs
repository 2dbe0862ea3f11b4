// crates/wr_physics/src/eos.rs

//! UNESCO EOS-80 海水状态方程
//!
//! ρ(S, T, p) = ρ(S, T, 0) / (1 − P / K(S, T, P))
//!
//! 其中 K 为割线体积模量，P 以 bar 计。对外接口统一使用 dbar（≈ m 深度）。
//!
//! # 单位
//!
//! - 温度: °C
//! - 盐度: PSU
//! - 压力: dbar
//! - 密度: kg/m³
//!
//! # 参考
//!
//! - Fofonoff & Millard (1983), UNESCO Tech. Pap. Mar. Sci. 44
//! - Saunders (1981), Practical conversion of pressure to depth

/// EOS-80 状态方程
#[derive(Debug, Clone, Copy, Default)]
pub struct Eos80;

impl Eos80 {
    /// 一个大气压下的海水密度 ρ(S, T, 0)
    pub fn density_surface(&self, salinity: f64, temperature: f64) -> f64 {
        let t = temperature;
        let s = salinity;

        // 标准平均海洋水 (Bigg 1967)
        let rho_w = 999.842594 + 6.793952e-2 * t - 9.095290e-3 * t.powi(2)
            + 1.001685e-4 * t.powi(3)
            - 1.120083e-6 * t.powi(4)
            + 6.536336e-9 * t.powi(5);

        let a = 8.24493e-1 - 4.0899e-3 * t + 7.6438e-5 * t.powi(2) - 8.2467e-7 * t.powi(3)
            + 5.3875e-9 * t.powi(4);
        let b = -5.72466e-3 + 1.0227e-4 * t - 1.6546e-6 * t.powi(2);
        let c = 4.8314e-4;

        rho_w + a * s + b * s.powf(1.5) + c * s * s
    }

    /// 割线体积模量 K(S, T, P)，P 以 bar 计
    fn secant_bulk_modulus(&self, salinity: f64, temperature: f64, p_bar: f64) -> f64 {
        let t = temperature;
        let s = salinity;
        let p = p_bar;

        let kw = 19652.21 + 148.4206 * t - 2.327105 * t.powi(2) + 1.360477e-2 * t.powi(3)
            - 5.155288e-5 * t.powi(4);
        let k0 = kw
            + s * (54.6746 - 0.603459 * t + 1.09987e-2 * t.powi(2) - 6.1670e-5 * t.powi(3))
            + s.powf(1.5) * (7.944e-2 + 1.6483e-2 * t - 5.3009e-4 * t.powi(2));

        let aw = 3.239908 + 1.43713e-3 * t + 1.16092e-4 * t.powi(2) - 5.77905e-7 * t.powi(3);
        let a = aw
            + s * (2.2838e-3 - 1.0981e-5 * t - 1.6078e-6 * t.powi(2))
            + 1.91075e-4 * s.powf(1.5);

        let bw = 8.50935e-5 - 6.12293e-6 * t + 5.2787e-8 * t.powi(2);
        let b = bw + s * (-9.9348e-7 + 2.0816e-8 * t + 9.1697e-10 * t.powi(2));

        k0 + p * (a + b * p)
    }

    /// 现场密度 ρ(S, T, p)
    ///
    /// # 参数
    /// - `salinity`: 盐度 [PSU]
    /// - `temperature`: 温度 [°C]
    /// - `pressure`: 海压 [dbar]
    pub fn density(&self, salinity: f64, temperature: f64, pressure: f64) -> f64 {
        let rho_0 = self.density_surface(salinity, temperature);
        let p_bar = pressure / 10.0;
        if p_bar == 0.0 {
            return rho_0;
        }
        rho_0 / (1.0 - p_bar / self.secant_bulk_modulus(salinity, temperature, p_bar))
    }
}

#[inline]
fn saunders_c1(lat_deg: f64) -> f64 {
    let s = lat_deg.to_radians().sin();
    (5.92 + 5.25 * s * s) * 1e-3
}

/// 深度 [m, 向下为正] → 海压 [dbar] (Saunders 1981)
pub fn pressure_from_depth(depth: f64, lat_deg: f64) -> f64 {
    let c1 = saunders_c1(lat_deg);
    let a = 1.0 - c1;
    (a - (a * a - 8.84e-6 * depth).sqrt()) / 4.42e-6
}

/// 海压 [dbar] → 深度 [m]，[`pressure_from_depth`] 的逆
pub fn depth_from_pressure(pressure: f64, lat_deg: f64) -> f64 {
    let c1 = saunders_c1(lat_deg);
    (1.0 - c1) * pressure - 2.21e-6 * pressure * pressure
}

// crates/wr_physics/src/dispersion.rs

//! 内重力波色散关系与射线方程
//!
//! # 公式
//!
//! ```text
//! K²  = k² + l² + m²
//! ω²  = (f² m² + N² (k² + l²)) / K²
//! Cgx = k m² (N² − f²) / (K² ω) + U
//! Cgy = l m² (N² − f²) / (K² ω) + V
//! Cgz = −(k² + l²) m (N² − f²) / (K² ω)
//! r_s = N (k² + l²) / (K² ω) · ∂N/∂s        (s ∈ {x, y, z})
//! ```
//!
//! 群速度使用调用方传入的 ω（状态变量），不在每步由色散关系重新求出。

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wr_foundation::WrError;

/// 色散关系计算错误
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DispersionError {
    /// 波数向量为零 (K² = 0)
    #[error("波数向量退化: K² = 0")]
    DegenerateWavenumber,

    /// 频率为零，群速度无定义
    #[error("频率为零，群速度无定义")]
    ZeroFrequency,

    /// 色散关系给出非实数频率
    #[error("色散关系无实数解: ω² = {radicand:e}")]
    NonReal {
        /// 被开方数
        radicand: f64,
    },
}

impl From<DispersionError> for WrError {
    fn from(err: DispersionError) -> Self {
        WrError::physics(err.to_string())
    }
}

/// 波数向量 (k, l, m) [rad/m]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wavenumber {
    /// 东向分量
    pub k: f64,
    /// 北向分量
    pub l: f64,
    /// 垂向分量
    pub m: f64,
}

impl Wavenumber {
    /// 创建波数向量
    pub const fn new(k: f64, l: f64, m: f64) -> Self {
        Self { k, l, m }
    }

    /// 水平波数平方 k² + l²
    #[inline]
    pub fn horizontal_sq(&self) -> f64 {
        self.k * self.k + self.l * self.l
    }

    /// 水平波数 kh
    #[inline]
    pub fn horizontal(&self) -> f64 {
        self.horizontal_sq().sqrt()
    }

    /// 模长平方 K²
    #[inline]
    pub fn magnitude_sq(&self) -> f64 {
        self.horizontal_sq() + self.m * self.m
    }

    /// 检查 K² > 0 并返回
    pub fn checked_magnitude_sq(&self) -> Result<f64, DispersionError> {
        let k2 = self.magnitude_sq();
        if k2 > 0.0 {
            Ok(k2)
        } else {
            Err(DispersionError::DegenerateWavenumber)
        }
    }
}

/// 群速度 [m/s]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupVelocity {
    /// 东向
    pub cgx: f64,
    /// 北向
    pub cgy: f64,
    /// 垂向（向下为正）
    pub cgz: f64,
}

impl GroupVelocity {
    /// 速度大小
    pub fn magnitude(&self) -> f64 {
        (self.cgx * self.cgx + self.cgy * self.cgy + self.cgz * self.cgz).sqrt()
    }
}

/// 色散关系给出的内禀频率 |ω| [rad/s]
pub fn intrinsic_frequency(f: f64, n2: f64, wn: &Wavenumber) -> Result<f64, DispersionError> {
    let k2 = wn.checked_magnitude_sq()?;
    let radicand = (f * f * wn.m * wn.m + n2 * wn.horizontal_sq()) / k2;
    if radicand >= 0.0 {
        Ok(radicand.sqrt())
    } else {
        Err(DispersionError::NonReal { radicand })
    }
}

/// 群速度（含背景流平流）
///
/// # 参数
/// - `f`: 科氏参数 [rad/s]
/// - `n2`: 浮力频率平方 [rad²/s²]
/// - `wn`: 波数向量
/// - `omega`: 当前频率 [rad/s]（状态变量）
/// - `u`, `v`: 背景流 [m/s]
pub fn group_velocity(
    f: f64,
    n2: f64,
    wn: &Wavenumber,
    omega: f64,
    u: f64,
    v: f64,
) -> Result<GroupVelocity, DispersionError> {
    let k2 = wn.checked_magnitude_sq()?;
    if omega == 0.0 {
        return Err(DispersionError::ZeroFrequency);
    }

    let coef = (n2 - f * f) / (k2 * omega);
    let m2 = wn.m * wn.m;

    Ok(GroupVelocity {
        cgx: wn.k * m2 * coef + u,
        cgy: wn.l * m2 * coef + v,
        cgz: -wn.horizontal_sq() * wn.m * coef,
    })
}

/// 层结梯度引起的折射项
///
/// 由 ω² = (N²(k²+l²) + f²m²)/K² 得 ∂ω/∂N = N(k²+l²)/(K²ω)，
/// 本函数返回 ∂ω/∂N · dN/ds：
///
/// ```text
/// r = N (k² + l²) / (K² ω) · dn / ds
/// ```
///
/// `n` 为浮力频率 N（非平方），`dn` 为两点间 N 的差值，`ds` 为对应位移。
/// 零位移上的梯度取零。
pub fn refraction(n: f64, wn: &Wavenumber, dn: f64, ds: f64, omega: f64) -> f64 {
    if ds == 0.0 {
        return 0.0;
    }
    n * wn.horizontal_sq() / (wn.magnitude_sq() * omega) * (dn / ds)
}

/// 仅垂向变化时的射线能量 (Olbers 1981)
///
/// ```text
/// E = ω² (N² − f²) / ((ω² − f²)^{3/2} (N² − ω²)^{1/2})
/// ```
///
/// 要求 f² < ω² < N²，否则返回 `None`。
pub fn vertical_energy(n2: f64, omega: f64, f: f64) -> Option<f64> {
    let w2 = omega * omega;
    let f2 = f * f;
    if !(w2 > f2 && n2 > w2) {
        return None;
    }
    let e = w2 * (n2 - f2) / ((w2 - f2).powf(1.5) * (n2 - w2).sqrt());
    e.is_finite().then_some(e)
}

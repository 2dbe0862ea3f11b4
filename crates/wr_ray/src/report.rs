// crates/wr_ray/src/report.rs

//! 运行报告

use serde::{Deserialize, Serialize};
use std::fmt;

use wr_geo::geo_to_displacement;

use crate::integrator::TerminationReason;
use crate::state::WaveState;
use crate::trajectory::Trajectory;

/// 提前终止时的局部变量快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 终止发生的步序号
    pub step: usize,
    /// 东向位移 [m]
    pub x: f64,
    /// 北向位移 [m]
    pub y: f64,
    /// 深度 [m]
    pub z: f64,
    /// 浮力频率平方
    pub n2: f64,
    /// 东向流速
    pub u: f64,
    /// 北向流速
    pub v: f64,
    /// 垂向波数
    pub m: f64,
    /// 说明
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (step {})", self.message, self.step)?;
        writeln!(f, "  x  = {}", self.x)?;
        writeln!(f, "  y  = {}", self.y)?;
        writeln!(f, "  z  = {}", self.z)?;
        writeln!(f, "  N2 = {}", self.n2)?;
        writeln!(f, "  U  = {}", self.u)?;
        writeln!(f, "  V  = {}", self.v)?;
        write!(f, "  m  = {}", self.m)
    }
}

/// 起点到终点的净位移
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NetDisplacement {
    /// 东向 [m]
    pub dx: f64,
    /// 北向 [m]
    pub dy: f64,
    /// 垂向 [m]，向下为正
    pub dz: f64,
}

impl NetDisplacement {
    /// 水平距离 [m]
    pub fn horizontal(&self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

/// 运行报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// 终止原因
    pub reason: TerminationReason,
    /// 完成并记录的步数
    pub steps: usize,
    /// 已积分的模型时长 [s]
    pub elapsed_model_seconds: f64,
    /// 最后计算出的状态（越过海面/海底时为越界状态，不在轨迹中）
    pub final_state: WaveState,
    /// 起点到最终状态的净位移
    pub net_displacement: NetDisplacement,
    /// 轨迹深度范围 (min, max) [m]
    pub depth_range: (f64, f64),
    /// 提前终止时的诊断
    pub diagnostic: Option<Diagnostic>,
}

impl RunReport {
    pub(crate) fn new(
        reason: TerminationReason,
        initial: &WaveState,
        final_state: WaveState,
        trajectory: &Trajectory,
        diagnostic: Option<Diagnostic>,
    ) -> Self {
        let steps = trajectory.len().saturating_sub(1);
        let elapsed_model_seconds = trajectory
            .last()
            .map_or(0.0, |r| (r.time - initial.t).abs());
        let (dx, dy) = geo_to_displacement(final_state.lon, final_state.lat, initial.lon, initial.lat);

        Self {
            reason,
            steps,
            elapsed_model_seconds,
            final_state,
            net_displacement: NetDisplacement {
                dx,
                dy,
                dz: final_state.z - initial.z,
            },
            depth_range: trajectory.depth_range().unwrap_or((initial.z, initial.z)),
            diagnostic,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.final_state;
        writeln!(f, "运行报告:")?;
        writeln!(f, "  终止原因: {}", self.reason)?;
        writeln!(f, "  完成步数: {}", self.steps)?;
        writeln!(f, "  模型时长: {:.2} h", self.elapsed_model_seconds / 3600.0)?;
        writeln!(
            f,
            "  净位移: dx={:.1} m, dy={:.1} m, dz={:.1} m (水平 {:.1} m)",
            self.net_displacement.dx,
            self.net_displacement.dy,
            self.net_displacement.dz,
            self.net_displacement.horizontal()
        )?;
        writeln!(f, "  深度范围: {:.1} - {:.1} m", self.depth_range.0, self.depth_range.1)?;
        write!(
            f,
            "  最终状态: lon={:.4}, lat={:.4}, z={:.1}, k={:.4e}, l={:.4e}, m={:.4e}, ω={:.4e}",
            s.lon, s.lat, s.z, s.k, s.l, s.m, s.omega
        )?;
        if let Some(diag) = &self.diagnostic {
            write!(f, "\n诊断: {diag}")?;
        }
        Ok(())
    }
}

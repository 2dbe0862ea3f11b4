// crates/wr_ray/src/integrator.rs

//! 射线积分器
//!
//! 显式一阶时间推进。每一步：
//!
//! 1. 由纬度求 f，|ω| ≤ |f| 时终止
//! 2. 使用当前位置的 N²、u、v 计算群速度（使用状态中的 ω）
//! 3. 按群速度推进位置与时间，经纬度由平面位移增量换算
//! 4. 越过海面或海底时终止，越界状态不写入轨迹
//! 5. 在新位置重新采样，按 N 与背景流的差分更新 k、l、m、ω
//!
//! 采样无效（非有限 N²、u、v）或查询越界都是终止原因而非错误，
//! [`RayTracer::run`] 总是返回轨迹与终止原因。

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

use wr_config::{ConfigError, DomainPolicy, IntegrationConfig, RunConfig};
use wr_field::{AxisKind, FieldError, FieldSampler};
use wr_foundation::WrError;
use wr_geo::displacement_to_geo;
use wr_physics::{
    coriolis_parameter, group_velocity, intrinsic_frequency, refraction, vertical_energy,
    DispersionError, GroupVelocity,
};

use crate::report::{Diagnostic, RunReport};
use crate::state::{InitialConditions, WaveState};
use crate::trajectory::{Environment, Trajectory, TrajectoryRecord};

/// 预分配的轨迹记录上限，超出部分按需增长
const MAX_RESERVED_RECORDS: usize = 1 << 16;

const UNKNOWN_CG: GroupVelocity = GroupVelocity {
    cgx: f64::NAN,
    cgy: f64::NAN,
    cgz: f64::NAN,
};

// ============================================================
// 终止原因 / 错误
// ============================================================

/// 射线终止原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerminationReason {
    /// 运行时长耗尽
    ReachedDuration,
    /// 到达海面 (z < 0)
    SurfaceHit,
    /// 到达海底 (z > seafloor_depth)
    SeafloorHit,
    /// N² 采样非有限
    InvalidBuoyancy,
    /// 流速采样非有限
    InvalidVelocity,
    /// 查询点超出场覆盖范围
    OutOfDomain {
        /// 越界的坐标轴
        axis: AxisKind,
    },
    /// |ω| ≤ |f|
    SubInertialFrequency,
    /// K² = 0
    DegenerateWavenumber,
}

impl TerminationReason {
    /// 是否在运行时长耗尽前终止
    pub fn is_early(&self) -> bool {
        !matches!(self, Self::ReachedDuration)
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReachedDuration => write!(f, "达到运行时长"),
            Self::SurfaceHit => write!(f, "射线到达海面"),
            Self::SeafloorHit => write!(f, "射线到达海底"),
            Self::InvalidBuoyancy => write!(f, "N² 无效"),
            Self::InvalidVelocity => write!(f, "流速无效"),
            Self::OutOfDomain { axis } => write!(f, "超出场范围 ({axis})"),
            Self::SubInertialFrequency => write!(f, "频率低于惯性频率"),
            Self::DegenerateWavenumber => write!(f, "波数向量退化"),
        }
    }
}

impl From<DispersionError> for TerminationReason {
    fn from(err: DispersionError) -> Self {
        match err {
            DispersionError::DegenerateWavenumber => Self::DegenerateWavenumber,
            // ω = 0 时 |ω| ≤ |f| 恒成立
            DispersionError::ZeroFrequency => Self::SubInertialFrequency,
            DispersionError::NonReal { .. } => Self::InvalidBuoyancy,
        }
    }
}

/// 积分器构建错误
#[derive(Debug, Error)]
pub enum RayError {
    /// 配置无效
    #[error("射线配置无效: {0}")]
    Config(#[from] ConfigError),
}

impl From<RayError> for WrError {
    fn from(err: RayError) -> Self {
        match err {
            RayError::Config(e) => e.into(),
        }
    }
}

/// 一次运行的结果
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// 轨迹（至少包含初始状态）
    pub trajectory: Trajectory,
    /// 终止原因
    pub reason: TerminationReason,
    /// 运行报告
    pub report: RunReport,
}

// ============================================================
// 单步内部类型
// ============================================================

/// 成功推进一步
struct Advance {
    state: WaveState,
    env: Environment,
    cg: GroupVelocity,
}

/// 推进中止
struct Stop {
    step: usize,
    reason: TerminationReason,
    state: WaveState,
    env: Environment,
    cg: Option<GroupVelocity>,
    message: String,
}

impl Stop {
    fn new(reason: TerminationReason, state: WaveState, env: Environment, message: String) -> Self {
        Self {
            step: 0,
            reason,
            state,
            env,
            cg: None,
            message,
        }
    }

    fn with_cg(mut self, cg: GroupVelocity) -> Self {
        self.cg = Some(cg);
        self
    }
}

#[inline]
fn gradient(delta: f64, ds: f64) -> f64 {
    if ds == 0.0 {
        0.0
    } else {
        delta / ds
    }
}

// ============================================================
// RayTracer
// ============================================================

/// 射线积分器
///
/// 对场只做只读访问，可在同一个场上构建多个积分器。
pub struct RayTracer<'a, F: FieldSampler + ?Sized> {
    field: &'a F,
    initial: InitialConditions,
    run: IntegrationConfig,
    dt: f64,
}

impl<'a, F: FieldSampler + ?Sized> RayTracer<'a, F> {
    /// 创建积分器，配置在此处完整验证
    pub fn new(config: &RunConfig, field: &'a F) -> Result<Self, RayError> {
        config.validate()?;
        Ok(Self {
            field,
            initial: InitialConditions::from(&config.wave),
            run: config.run.clone(),
            dt: config.run.signed_time_step(),
        })
    }

    /// 初始条件
    pub fn initial_conditions(&self) -> &InitialConditions {
        &self.initial
    }

    /// 带符号时间步 [s]
    pub fn time_step(&self) -> f64 {
        self.dt
    }

    /// 运行到终止
    pub fn run(&self) -> RunOutcome {
        let initial = WaveState::initial(&self.initial);
        let steps = self.run.step_count();
        let status_every = self.run.status_every();

        info!("=== 射线追踪启动 ===");
        for line in self.initial.to_string().lines() {
            info!("{}", line);
        }
        info!(
            "方向: {:?}, Δt = {} s, 步数 = {}, 海底 = {} m",
            self.run.direction, self.dt, steps, self.run.seafloor_depth
        );

        let reserved = steps.min(MAX_RESERVED_RECORDS).saturating_add(1);
        let mut trajectory = Trajectory::with_capacity(reserved);

        let mut env = match self.sample(&initial) {
            Ok(env) => env,
            Err(stop) => {
                trajectory.push(self.record(0, &initial, &stop.env));
                return self.finish(initial, trajectory, Err(stop));
            }
        };
        trajectory.push(self.record(0, &initial, &env));

        let f0 = coriolis_parameter(initial.lat);
        match intrinsic_frequency(f0, env.n2, &initial.wavenumber()) {
            Ok(w) => info!("色散关系频率: {:.4e} rad/s, 初始 |ω| = {:.4e} rad/s", w, initial.omega.abs()),
            Err(e) => warn!("起点色散关系无解: {}", e),
        }

        let mut state = initial;
        for step in 1..=steps {
            match self.step(&state, &env) {
                Ok(next) => {
                    if let Some(last) = trajectory.last_mut() {
                        last.set_group_velocity(&next.cg);
                    }
                    state = next.state;
                    env = next.env;
                    trajectory.push(self.record(step, &state, &env));

                    debug!(
                        "step {}: x={:.2}, y={:.2}, z={:.3}, k={:.4e}, l={:.4e}, m={:.4e}, ω={:.4e}",
                        step, state.x, state.y, state.z, state.k, state.l, state.m, state.omega
                    );
                    if status_every.is_some_and(|n| step % n == 0) {
                        info!(
                            "t = {:.1} h: lon={:.4}, lat={:.4}, z={:.1} m, m={:.4e}",
                            step as f64 * self.dt.abs() / 3600.0,
                            state.lon,
                            state.lat,
                            state.z,
                            state.m
                        );
                    }
                }
                Err(stop) => {
                    if let (Some(cg), Some(last)) = (stop.cg, trajectory.last_mut()) {
                        last.set_group_velocity(&cg);
                    }
                    return self.finish(initial, trajectory, Err(Stop { step, ..stop }));
                }
            }
        }

        // 末状态的群速度只用于记录
        let f = coriolis_parameter(state.lat);
        if let (Ok(cg), Some(last)) = (
            group_velocity(f, env.n2, &state.wavenumber(), state.omega, env.u, env.v),
            trajectory.last_mut(),
        ) {
            last.set_group_velocity(&cg);
        }

        self.finish(initial, trajectory, Ok(state))
    }

    fn finish(
        &self,
        initial: WaveState,
        trajectory: Trajectory,
        end: Result<WaveState, Stop>,
    ) -> RunOutcome {
        let (reason, final_state, diagnostic) = match end {
            Ok(state) => (TerminationReason::ReachedDuration, state, None),
            Err(stop) => {
                let diag = Diagnostic {
                    step: stop.step,
                    x: stop.state.x,
                    y: stop.state.y,
                    z: stop.state.z,
                    n2: stop.env.n2,
                    u: stop.env.u,
                    v: stop.env.v,
                    m: stop.state.m,
                    message: stop.message,
                };
                warn!("射线提前终止: {}", stop.reason);
                for line in diag.to_string().lines() {
                    warn!("{}", line);
                }
                (stop.reason, stop.state, Some(diag))
            }
        };

        let report = RunReport::new(reason, &initial, final_state, &trajectory, diagnostic);
        info!("=== 射线追踪结束: {} ===", reason);
        info!("完成步数: {}, 模型时长: {:.2} h", report.steps, report.elapsed_model_seconds / 3600.0);

        RunOutcome {
            trajectory,
            reason,
            report,
        }
    }

    fn record(&self, step: usize, state: &WaveState, env: &Environment) -> TrajectoryRecord {
        let f = coriolis_parameter(state.lat);
        let energy = vertical_energy(env.n2, state.omega, f);
        TrajectoryRecord::new(step, state, &UNKNOWN_CG, env, energy)
    }

    /// 在状态所在位置采样 N²、u、v
    fn sample(&self, state: &WaveState) -> Result<Environment, Stop> {
        let point = state.query_point();
        if let Some(axis) = point.non_finite_axis() {
            return Err(Stop::new(
                TerminationReason::OutOfDomain { axis },
                *state,
                Environment::MISSING,
                format!("{axis} 坐标非有限"),
            ));
        }
        let idx = match self.run.out_of_domain {
            DomainPolicy::Clamp => self.field.locate(&point),
            DomainPolicy::Terminate => match self.field.locate_checked(&point) {
                Ok(idx) => idx,
                Err(err @ FieldError::OutOfDomain { axis, .. }) => {
                    return Err(Stop::new(
                        TerminationReason::OutOfDomain { axis },
                        *state,
                        Environment::MISSING,
                        err.to_string(),
                    ));
                }
                Err(err) => {
                    debug!("定位失败，退回钳制查找: {}", err);
                    self.field.locate(&point)
                }
            },
        };

        let n2 = self.field.buoyancy_frequency_sq(&idx, state.z);
        let (u, v) = self.field.velocity(&idx);
        let env = Environment { n2, u, v };

        if !n2.is_finite() {
            return Err(Stop::new(
                TerminationReason::InvalidBuoyancy,
                *state,
                env,
                format!("N² = {n2} (索引 {idx:?})"),
            ));
        }
        if !(u.is_finite() && v.is_finite()) {
            return Err(Stop::new(
                TerminationReason::InvalidVelocity,
                *state,
                env,
                format!("(u, v) = ({u}, {v}) (索引 {idx:?})"),
            ));
        }
        Ok(env)
    }

    /// 推进一步
    fn step(&self, state: &WaveState, env: &Environment) -> Result<Advance, Stop> {
        let dt = self.dt;

        let f = coriolis_parameter(state.lat);
        if state.omega.abs() <= f.abs() {
            return Err(Stop::new(
                TerminationReason::SubInertialFrequency,
                *state,
                *env,
                format!("|ω| = {:.4e} ≤ |f| = {:.4e}", state.omega.abs(), f.abs()),
            ));
        }

        let wn = state.wavenumber();
        let cg = group_velocity(f, env.n2, &wn, state.omega, env.u, env.v)
            .map_err(|e| Stop::new(e.into(), *state, *env, e.to_string()))?;

        // 位置
        let (dx, dy, dz) = (dt * cg.cgx, dt * cg.cgy, dt * cg.cgz);
        let (lon, lat) = displacement_to_geo(dx, dy, state.lon, state.lat);
        let mut next = WaveState {
            x: state.x + dx,
            y: state.y + dy,
            z: state.z + dz,
            lon,
            lat,
            t: state.t + dt,
            ..*state
        };

        if next.z < 0.0 {
            return Err(Stop::new(
                TerminationReason::SurfaceHit,
                next,
                *env,
                format!("z = {:.3} m", next.z),
            )
            .with_cg(cg));
        }
        if next.z > self.run.seafloor_depth {
            return Err(Stop::new(
                TerminationReason::SeafloorHit,
                next,
                *env,
                format!("z = {:.3} m > {} m", next.z, self.run.seafloor_depth),
            )
            .with_cg(cg));
        }

        // 新位置环境
        let env_next = self.sample(&next).map_err(|stop| stop.with_cg(cg))?;

        let n = env.n2.abs().sqrt();
        let dn = env_next.n2.abs().sqrt() - n;
        let du = env_next.u - env.u;
        let dv = env_next.v - env.v;

        let rx = refraction(n, &wn, dn, dx, state.omega);
        let ry = refraction(n, &wn, dn, dy, state.omega);
        let rz = refraction(n, &wn, dn, dz, state.omega);

        let (k, l) = (state.k, state.l);
        next.k = k - dt * (rx + k * gradient(du, dx) + l * gradient(dv, dx));
        next.l = l - dt * (ry + k * gradient(du, dy) + l * gradient(dv, dy));
        next.m = state.m - dt * (rz + k * gradient(du, dz) + l * gradient(dv, dz));
        next.omega = state.omega + dt * (rx + ry + rz + k * du + l * dv);

        Ok(Advance {
            state: next,
            env: env_next,
            cg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wr_config::Direction;
    use wr_field::{FieldResult, GridIndex, QueryPoint};

    /// 常数环境，覆盖全空间
    struct Constant {
        n2: f64,
        u: f64,
        v: f64,
    }

    impl FieldSampler for Constant {
        fn locate(&self, _point: &QueryPoint) -> GridIndex {
            GridIndex::default()
        }

        fn locate_checked(&self, _point: &QueryPoint) -> FieldResult<GridIndex> {
            Ok(GridIndex::default())
        }

        fn buoyancy_frequency_sq(&self, _idx: &GridIndex, _depth: f64) -> f64 {
            self.n2
        }

        fn velocity(&self, _idx: &GridIndex) -> (f64, f64) {
            (self.u, self.v)
        }
    }

    /// N² 随深度线性增加
    struct LinearN2 {
        n2_surface: f64,
        gradient: f64,
    }

    impl FieldSampler for LinearN2 {
        fn locate(&self, _point: &QueryPoint) -> GridIndex {
            GridIndex::default()
        }

        fn locate_checked(&self, point: &QueryPoint) -> FieldResult<GridIndex> {
            Ok(self.locate(point))
        }

        fn buoyancy_frequency_sq(&self, _idx: &GridIndex, depth: f64) -> f64 {
            self.n2_surface + self.gradient * depth
        }

        fn velocity(&self, _idx: &GridIndex) -> (f64, f64) {
            (0.0, 0.0)
        }
    }

    fn config(duration_hours: f64) -> RunConfig {
        let mut config = RunConfig::default();
        config.run.duration_hours = duration_hours;
        config.run.time_step = 10.0;
        config.run.status_interval_hours = 0.0;
        config
    }

    #[test]
    fn test_invalid_config_rejected() {
        let field = Constant { n2: 1e-5, u: 0.0, v: 0.0 };
        let mut cfg = config(1.0);
        cfg.wave.k = 0.0;
        cfg.wave.l = 0.0;
        cfg.wave.m = 0.0;
        assert!(matches!(RayTracer::new(&cfg, &field), Err(RayError::Config(_))));
    }

    #[test]
    fn test_reverse_time_step_is_negative() {
        let field = Constant { n2: 1e-5, u: 0.0, v: 0.0 };
        let mut cfg = config(1.0);
        cfg.run.direction = Direction::Reverse;
        let tracer = RayTracer::new(&cfg, &field).unwrap();
        assert_eq!(tracer.time_step(), -10.0);

        let outcome = tracer.run();
        let last = outcome.trajectory.last().unwrap();
        assert!((last.time - (tracer.initial_conditions().start_time - 3600.0)).abs() < 1e-6);
    }

    #[test]
    fn test_constant_field_runs_full_duration() {
        let field = Constant { n2: 1e-5, u: 0.0, v: 0.0 };
        let outcome = RayTracer::new(&config(2.0), &field).unwrap().run();

        assert_eq!(outcome.reason, TerminationReason::ReachedDuration);
        assert_eq!(outcome.trajectory.len(), 721);
        assert_eq!(outcome.report.steps, 720);
        assert!(outcome.report.diagnostic.is_none());
        assert!((outcome.report.elapsed_model_seconds - 7200.0).abs() < 1e-6);

        // 每条记录的群速度都已填写
        assert!(outcome.trajectory.iter().all(|r| r.cgz.is_finite()));
    }

    #[test]
    fn test_background_flow_advects_ray() {
        let field = Constant { n2: 1e-5, u: 0.1, v: 0.0 };
        let still = Constant { n2: 1e-5, u: 0.0, v: 0.0 };

        let moving = RayTracer::new(&config(1.0), &field).unwrap().run();
        let resting = RayTracer::new(&config(1.0), &still).unwrap().run();

        let dx = moving.trajectory.last().unwrap().x - resting.trajectory.last().unwrap().x;
        assert!((dx - 360.0).abs() < 1e-6);
        assert!(moving.trajectory.last().unwrap().lon > resting.trajectory.last().unwrap().lon);
    }

    #[test]
    fn test_nan_buoyancy_on_first_sample() {
        let field = Constant { n2: f64::NAN, u: 0.0, v: 0.0 };
        let outcome = RayTracer::new(&config(1.0), &field).unwrap().run();

        assert_eq!(outcome.reason, TerminationReason::InvalidBuoyancy);
        assert_eq!(outcome.trajectory.len(), 1);
        let diag = outcome.report.diagnostic.unwrap();
        assert_eq!(diag.step, 0);
        assert!(diag.n2.is_nan());
        assert_eq!(diag.z, 1500.0);
    }

    #[test]
    fn test_vertical_refraction_keeps_l() {
        let field = LinearN2 {
            n2_surface: 1e-6,
            gradient: 1e-8,
        };
        let mut cfg = config(1.0);
        cfg.wave.l = 0.0;
        let outcome = RayTracer::new(&cfg, &field).unwrap().run();

        assert_eq!(outcome.reason, TerminationReason::ReachedDuration);
        let first = outcome.trajectory.first().unwrap();
        let last = outcome.trajectory.last().unwrap();
        assert_ne!(first.m, last.m);
        assert_ne!(first.omega, last.omega);
        assert_eq!(last.l, 0.0);
    }

    #[test]
    fn test_seafloor_hit() {
        let field = Constant { n2: 1e-4, u: 0.0, v: 0.0 };
        let mut cfg = config(2.0);
        // m < 0, ω > 0: Cgz > 0，射线向下
        // Cgz ≈ 0.25 m/s，约 2.5 m/步
        cfg.wave.k = 1.0;
        cfg.wave.l = 0.0;
        cfg.wave.m = -1.0;
        cfg.wave.omega = 2e-4;
        cfg.wave.depth = 3990.0;
        cfg.run.seafloor_depth = 4000.0;

        let outcome = RayTracer::new(&cfg, &field).unwrap().run();
        assert_eq!(outcome.reason, TerminationReason::SeafloorHit);
        assert!(outcome.report.final_state.z > 4000.0);
        assert!(outcome.trajectory.iter().all(|r| r.z <= 4000.0));
        assert_eq!(outcome.report.steps, 4);
        assert_eq!(outcome.report.diagnostic.unwrap().step, 5);
    }

    #[test]
    fn test_very_long_duration_does_not_preallocate() {
        let field = Constant { n2: 1e-4, u: 0.0, v: 0.0 };
        for hours in [1e9, 1e300] {
            let mut cfg = config(hours);
            cfg.run.time_step = 1.0;
            cfg.wave.k = 1.0;
            cfg.wave.l = 0.0;
            cfg.wave.m = -1.0;
            cfg.wave.omega = 2e-4;
            cfg.wave.depth = 3990.0;
            cfg.run.seafloor_depth = 4000.0;

            let tracer = RayTracer::new(&cfg, &field).unwrap();
            let outcome = tracer.run();
            assert_eq!(outcome.reason, TerminationReason::SeafloorHit);
            assert!(outcome.trajectory.len() < 100);
        }
        assert_eq!(config(1e300).run.step_count(), usize::MAX);
    }

    #[test]
    fn test_single_step_refraction_in_linear_stratification() {
        let (a, b) = (1e-6, 1e-8);
        let field = LinearN2 {
            n2_surface: a,
            gradient: b,
        };
        let cfg = config(1.0);
        let outcome = RayTracer::new(&cfg, &field).unwrap().run();
        assert!(outcome.trajectory.len() >= 2);

        // 默认波的 k、l、m 均非零，三个方向的折射项都参与 ω 更新
        let w = &cfg.wave;
        let dt = 10.0;
        let f = coriolis_parameter(w.lat);
        let kh2 = w.k * w.k + w.l * w.l;
        let k2 = kh2 + w.m * w.m;

        let n2_0 = a + b * w.depth;
        let coef = (n2_0 - f * f) / (k2 * w.omega);
        let dx = dt * (w.k * w.m * w.m * coef);
        let dy = dt * (w.l * w.m * w.m * coef);
        let dz = dt * (-kh2 * w.m * coef);

        let n0 = n2_0.sqrt();
        let dn = (a + b * (w.depth + dz)).sqrt() - n0;
        let r = |ds: f64| n0 * kh2 / (k2 * w.omega) * dn / ds;
        let (rx, ry, rz) = (r(dx), r(dy), r(dz));

        let rec = &outcome.trajectory.records()[1];
        let close = |got: f64, want: f64| (got - want).abs() <= 1e-6 * want.abs();
        assert!(close(rec.x, dx));
        assert!(close(rec.y, dy));
        assert!(close(rec.z - w.depth, dz));
        assert!(close(rec.k - w.k, -dt * rx));
        assert!(close(rec.l - w.l, -dt * ry));
        assert!(close(rec.m - w.m, -dt * rz));
        assert!(close(rec.omega - w.omega, dt * (rx + ry + rz)));
    }

    #[test]
    fn test_non_finite_position_is_out_of_domain() {
        let field = Constant { n2: 1e-5, u: 0.0, v: 0.0 };
        for policy in [DomainPolicy::Clamp, DomainPolicy::Terminate] {
            let mut cfg = config(1.0);
            cfg.run.out_of_domain = policy;
            let tracer = RayTracer::new(&cfg, &field).unwrap();

            let mut state = WaveState::initial(tracer.initial_conditions());
            state.lat = f64::NAN;
            let stop = tracer.sample(&state).unwrap_err();
            assert_eq!(stop.reason, TerminationReason::OutOfDomain { axis: AxisKind::Lat });
            assert!(stop.env.n2.is_nan());
        }
    }

    #[test]
    fn test_termination_reason_serde() {
        let reason = TerminationReason::OutOfDomain { axis: AxisKind::Time };
        let json = serde_json::to_string(&reason).unwrap();
        assert_eq!(json, r#"{"kind":"out_of_domain","axis":"time"}"#);
        assert!(reason.is_early());
        assert!(!TerminationReason::ReachedDuration.is_early());
    }
}

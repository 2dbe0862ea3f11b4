// crates/wr_ray/src/lib.rs

//! WaveRay Ray Layer
//!
//! 内重力波射线积分器。
//!
//! 给定初始波参数与一个 [`FieldSampler`](wr_field::FieldSampler)，
//! [`RayTracer`] 以固定步长显式推进波状态，直到运行时长耗尽或
//! 触发终止条件（海面、海底、无效采样、越界、亚惯性频率）。
//!
//! # 模块概览
//!
//! - [`state`]: 初始条件与波状态
//! - [`trajectory`]: 轨迹记录
//! - [`integrator`]: 射线积分器与终止原因
//! - [`report`]: 运行报告与诊断
//!
//! # 示例
//!
//! ```
//! use wr_config::RunConfig;
//! use wr_field::FieldVolume;
//! use wr_ray::{RayTracer, TerminationReason};
//!
//! let mut config = RunConfig::default();
//! config.run.duration_hours = 1.0;
//!
//! let t0 = config.wave.start_timestamp();
//! let field = FieldVolume::uniform(
//!     vec![-62.0],
//!     vec![-55.0],
//!     vec![0.0, 1000.0, 2000.0, 3000.0],
//!     vec![t0, t0 + 7200.0],
//!     1e-5,
//!     0.0,
//!     0.0,
//! )
//! .unwrap();
//!
//! let outcome = RayTracer::new(&config, &field).unwrap().run();
//! assert_eq!(outcome.reason, TerminationReason::ReachedDuration);
//! assert_eq!(outcome.trajectory.len(), 361);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod integrator;
pub mod report;
pub mod state;
pub mod trajectory;

pub use integrator::{RayError, RayTracer, RunOutcome, TerminationReason};
pub use report::{Diagnostic, NetDisplacement, RunReport};
pub use state::{InitialConditions, WaveState};
pub use trajectory::{Trajectory, TrajectoryRecord};

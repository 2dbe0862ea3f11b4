// crates/wr_ray/tests/ray_scenarios.rs

//! 射线积分器场景测试：在合成场上检查终止条件与守恒性质

use wr_config::{Direction, DomainPolicy, RunConfig};
use wr_field::{AxisKind, FieldVolume};
use wr_ray::{RayTracer, TerminationReason};

/// 覆盖 Drake Passage 附近、从 t0 - 48h 到 t0 + 48h 的均匀场
fn uniform_field(t0: f64, n2: f64, u: f64, v: f64) -> FieldVolume {
    let lon = (0..9).map(|i| -66.0 + i as f64).collect();
    let lat = (0..9).map(|i| -59.0 + i as f64).collect();
    let depth = (0..=50).map(|i| i as f64 * 100.0).collect();
    let time = (0..=8).map(|i| t0 - 48.0 * 3600.0 + i as f64 * 12.0 * 3600.0).collect();
    FieldVolume::uniform(lon, lat, depth, time, n2, u, v).unwrap()
}

fn lee_wave_config() -> RunConfig {
    let mut config = RunConfig::default();
    config.wave.k = 3.24e-4;
    config.wave.l = -1.4e-4;
    config.wave.m = -9.76e-3;
    config.wave.omega = -1.3e-4;
    config.wave.depth = 500.0;
    config.wave.lat = -55.0;
    config.wave.lon = -62.0;
    config.run.duration_hours = 24.0;
    config.run.time_step = 10.0;
    config.run.direction = Direction::Reverse;
    config
}

#[test]
fn test_reverse_lee_wave_in_uniform_field() {
    let config = lee_wave_config();
    let field = uniform_field(config.wave.start_timestamp(), 1e-5, 0.0, 0.0);

    let outcome = RayTracer::new(&config, &field).unwrap().run();

    assert_eq!(outcome.reason, TerminationReason::ReachedDuration);
    assert_eq!(outcome.trajectory.len(), 8641);

    let first = outcome.trajectory.first().unwrap();
    for r in &outcome.trajectory {
        assert_eq!(r.k, first.k);
        assert_eq!(r.l, first.l);
        assert_eq!(r.m, first.m);
        assert_eq!(r.omega, first.omega);
    }

    // 反向积分中 Cgz < 0，深度单调增加且步长恒定
    let records = outcome.trajectory.records();
    let dz0 = records[1].z - records[0].z;
    assert!(dz0 > 0.0);
    for pair in records.windows(2) {
        let dz = pair[1].z - pair[0].z;
        assert!(dz > 0.0);
        assert!((dz - dz0).abs() <= 1e-6 * dz0.abs());
    }

    let last = outcome.trajectory.last().unwrap();
    assert!((last.time - (config.wave.start_timestamp() - 86_400.0)).abs() < 1e-6);
    assert!((outcome.report.elapsed_model_seconds - 86_400.0).abs() < 1e-6);
    assert!(outcome.report.net_displacement.dz > 0.0);
}

#[test]
fn test_surface_hit_within_step_bound() {
    let mut config = RunConfig::default();
    // m > 0, ω > 0: Cgz ≈ −0.25 m/s，四步后越过海面
    config.wave.k = 1.0;
    config.wave.l = 0.0;
    config.wave.m = 1.0;
    config.wave.omega = 2e-4;
    config.wave.depth = 10.0;
    config.run.duration_hours = 1.0;
    config.run.time_step = 10.0;

    let n2 = 1e-4;
    let field = uniform_field(config.wave.start_timestamp(), n2, 0.0, 0.0);
    let outcome = RayTracer::new(&config, &field).unwrap().run();

    assert_eq!(outcome.reason, TerminationReason::SurfaceHit);

    let cgz = outcome.trajectory.first().unwrap().cgz;
    assert!(cgz < 0.0);
    let bound = (10.0 / (cgz.abs() * 10.0)).ceil() as usize;
    assert_eq!(bound, 5);
    assert!(outcome.report.steps <= bound);
    assert!(outcome.report.diagnostic.as_ref().unwrap().step <= bound);

    // 越过海面的状态只在报告中
    assert!(outcome.report.final_state.z < 0.0);
    assert!(outcome.trajectory.iter().all(|r| r.z >= 0.0));
    assert!(outcome.report.diagnostic.is_some());
}

#[test]
fn test_nan_velocity_stops_on_first_step() {
    let config = lee_wave_config();
    let field = uniform_field(config.wave.start_timestamp(), 1e-5, f64::NAN, 0.0);

    let outcome = RayTracer::new(&config, &field).unwrap().run();

    assert_eq!(outcome.reason, TerminationReason::InvalidVelocity);
    assert_eq!(outcome.trajectory.len(), 1);
    assert_eq!(outcome.report.steps, 0);
    assert!(outcome.report.diagnostic.unwrap().u.is_nan());
}

#[test]
fn test_out_of_time_domain_terminates() {
    let mut config = lee_wave_config();
    config.run.direction = Direction::Forward;
    let t0 = config.wave.start_timestamp();
    let field = FieldVolume::uniform(
        vec![-63.0, -62.0, -61.0],
        vec![-56.0, -55.0, -54.0],
        vec![0.0, 500.0, 1000.0],
        vec![t0, t0 + 3600.0],
        1e-5,
        0.0,
        0.0,
    )
    .unwrap();

    let outcome = RayTracer::new(&config, &field).unwrap().run();
    assert_eq!(
        outcome.reason,
        TerminationReason::OutOfDomain { axis: AxisKind::Time }
    );
    // 时间轴覆盖到 t0 + 1.5h
    assert_eq!(outcome.report.steps, 540);

    config.run.out_of_domain = DomainPolicy::Clamp;
    let outcome = RayTracer::new(&config, &field).unwrap().run();
    assert_eq!(outcome.reason, TerminationReason::ReachedDuration);
}

#[test]
fn test_sub_inertial_wave_terminates() {
    let mut config = lee_wave_config();
    // |f(-55°)| ≈ 1.19e-4
    config.wave.omega = -1.0e-4;
    let field = uniform_field(config.wave.start_timestamp(), 1e-5, 0.0, 0.0);

    let outcome = RayTracer::new(&config, &field).unwrap().run();
    assert_eq!(outcome.reason, TerminationReason::SubInertialFrequency);
    assert_eq!(outcome.trajectory.len(), 1);
}

#[test]
fn test_report_serializes() {
    let mut config = lee_wave_config();
    config.run.duration_hours = 0.5;
    let field = uniform_field(config.wave.start_timestamp(), 1e-5, 0.0, 0.0);
    let outcome = RayTracer::new(&config, &field).unwrap().run();

    let json = serde_json::to_value(&outcome.report).unwrap();
    assert_eq!(json["reason"]["kind"], "reached_duration");
    assert_eq!(json["steps"], 180);
    assert!(outcome.report.to_string().contains("运行报告"));
}

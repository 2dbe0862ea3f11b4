// crates/wr_ray/src/trajectory.rs

//! 射线轨迹
//!
//! 只追加的记录序列。第 0 条记录总是初始状态；此后每条记录是一步
//! 积分后的状态。记录中的群速度与环境采样值都取自记录自身所在位置，
//! 群速度在下一步求出后回填，无法求出时为 NaN。

use serde::{Deserialize, Serialize};
use wr_physics::GroupVelocity;

use crate::state::WaveState;

/// 某一位置上的环境采样
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub(crate) struct Environment {
    pub n2: f64,
    pub u: f64,
    pub v: f64,
}

impl Environment {
    /// 无法采样时的占位值
    pub(crate) const MISSING: Self = Self {
        n2: f64::NAN,
        u: f64::NAN,
        v: f64::NAN,
    };
}

/// 单条轨迹记录
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    /// 步序号（初始状态为 0）
    pub step: usize,
    /// 时刻 [s since epoch]
    pub time: f64,
    /// 东向位移 [m]
    pub x: f64,
    /// 北向位移 [m]
    pub y: f64,
    /// 深度 [m]
    pub z: f64,
    /// 经度 [deg]
    pub lon: f64,
    /// 纬度 [deg]
    pub lat: f64,
    /// 东向波数 [rad/m]
    pub k: f64,
    /// 北向波数 [rad/m]
    pub l: f64,
    /// 垂向波数 [rad/m]
    pub m: f64,
    /// 本征频率 [rad/s]
    pub omega: f64,
    /// 东向群速度 [m/s]
    pub cgx: f64,
    /// 北向群速度 [m/s]
    pub cgy: f64,
    /// 垂向群速度 [m/s]
    pub cgz: f64,
    /// 浮力频率平方 [1/s²]
    pub n2: f64,
    /// 东向流速 [m/s]
    pub u: f64,
    /// 北向流速 [m/s]
    pub v: f64,
    /// 仅垂向传播假设下的波能诊断
    pub energy: Option<f64>,
}

impl TrajectoryRecord {
    pub(crate) fn new(
        step: usize,
        state: &WaveState,
        cg: &GroupVelocity,
        env: &Environment,
        energy: Option<f64>,
    ) -> Self {
        Self {
            step,
            time: state.t,
            x: state.x,
            y: state.y,
            z: state.z,
            lon: state.lon,
            lat: state.lat,
            k: state.k,
            l: state.l,
            m: state.m,
            omega: state.omega,
            cgx: cg.cgx,
            cgy: cg.cgy,
            cgz: cg.cgz,
            n2: env.n2,
            u: env.u,
            v: env.v,
            energy,
        }
    }

    pub(crate) fn set_group_velocity(&mut self, cg: &GroupVelocity) {
        self.cgx = cg.cgx;
        self.cgy = cg.cgy;
        self.cgz = cg.cgz;
    }

    /// 记录对应的波状态
    pub fn state(&self) -> WaveState {
        WaveState {
            x: self.x,
            y: self.y,
            z: self.z,
            lon: self.lon,
            lat: self.lat,
            k: self.k,
            l: self.l,
            m: self.m,
            omega: self.omega,
            t: self.time,
        }
    }

    /// 群速度
    pub fn group_velocity(&self) -> GroupVelocity {
        GroupVelocity {
            cgx: self.cgx,
            cgy: self.cgy,
            cgz: self.cgz,
        }
    }
}

/// 射线轨迹
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory {
    records: Vec<TrajectoryRecord>,
}

impl Trajectory {
    /// 创建空轨迹
    pub fn new() -> Self {
        Self::default()
    }

    /// 预分配容量
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    /// 追加记录
    pub fn push(&mut self, record: TrajectoryRecord) {
        self.records.push(record);
    }

    /// 记录数
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 全部记录
    pub fn records(&self) -> &[TrajectoryRecord] {
        &self.records
    }

    /// 首条记录
    pub fn first(&self) -> Option<&TrajectoryRecord> {
        self.records.first()
    }

    /// 末条记录
    pub fn last(&self) -> Option<&TrajectoryRecord> {
        self.records.last()
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut TrajectoryRecord> {
        self.records.last_mut()
    }

    /// 迭代记录
    pub fn iter(&self) -> std::slice::Iter<'_, TrajectoryRecord> {
        self.records.iter()
    }

    /// 深度范围 (min, max)
    pub fn depth_range(&self) -> Option<(f64, f64)> {
        let first = self.records.first()?.z;
        Some(
            self.records
                .iter()
                .fold((first, first), |(lo, hi), r| (lo.min(r.z), hi.max(r.z))),
        )
    }

    /// 取出记录
    pub fn into_records(self) -> Vec<TrajectoryRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a TrajectoryRecord;
    type IntoIter = std::slice::Iter<'a, TrajectoryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_at(z: f64) -> WaveState {
        WaveState {
            x: 0.0,
            y: 0.0,
            z,
            lon: -60.0,
            lat: -55.0,
            k: 1e-4,
            l: 0.0,
            m: 1e-3,
            omega: 2e-4,
            t: 0.0,
        }
    }

    #[test]
    fn test_depth_range() {
        let mut traj = Trajectory::new();
        assert!(traj.depth_range().is_none());

        for (i, z) in [500.0, 480.0, 520.0, 510.0].into_iter().enumerate() {
            traj.push(TrajectoryRecord::new(
                i,
                &state_at(z),
                &GroupVelocity::default(),
                &Environment::default(),
                None,
            ));
        }
        assert_eq!(traj.len(), 4);
        assert_eq!(traj.depth_range(), Some((480.0, 520.0)));
    }

    #[test]
    fn test_record_state_roundtrip() {
        let state = state_at(42.0);
        let record = TrajectoryRecord::new(3, &state, &GroupVelocity::default(), &Environment::MISSING, None);
        assert_eq!(record.state(), state);
        assert!(record.n2.is_nan());
    }

    #[test]
    fn test_serializes_as_array() {
        let mut traj = Trajectory::new();
        traj.push(TrajectoryRecord::new(
            0,
            &state_at(10.0),
            &GroupVelocity::default(),
            &Environment::default(),
            Some(1.5),
        ));
        let json = serde_json::to_string(&traj).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"energy\":1.5"));
    }
}

// crates/wr_io/src/export.rs

//! 轨迹导出
//!
//! - CSV：每条记录一行，列顺序固定
//! - JSON：`{ "report": ..., "records": [...] }`

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;
use wr_config::{OutputConfig, OutputFormat};
use wr_ray::{RunOutcome, RunReport, Trajectory};

use crate::error::IoResult;

/// CSV 列
pub const CSV_HEADER: &str = "step,time,x,y,z,lon,lat,k,l,m,omega,cgx,cgy,cgz,n2,u,v,energy";

fn create_writer(path: &Path) -> IoResult<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// 写出 CSV 轨迹
pub fn write_csv(path: impl AsRef<Path>, trajectory: &Trajectory) -> IoResult<()> {
    let mut w = create_writer(path.as_ref())?;

    writeln!(w, "{}", CSV_HEADER)?;
    for r in trajectory {
        write!(
            w,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},",
            r.step,
            r.time,
            r.x,
            r.y,
            r.z,
            r.lon,
            r.lat,
            r.k,
            r.l,
            r.m,
            r.omega,
            r.cgx,
            r.cgy,
            r.cgz,
            r.n2,
            r.u,
            r.v
        )?;
        // 无能量诊断时留空
        match r.energy {
            Some(e) => writeln!(w, "{}", e)?,
            None => writeln!(w)?,
        }
    }
    w.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    report: &'a RunReport,
    records: &'a Trajectory,
}

/// 写出 JSON 轨迹与运行报告
pub fn write_json(path: impl AsRef<Path>, trajectory: &Trajectory, report: &RunReport) -> IoResult<()> {
    let mut w = create_writer(path.as_ref())?;
    serde_json::to_writer_pretty(
        &mut w,
        &JsonDocument {
            report,
            records: trajectory,
        },
    )?;
    writeln!(w)?;
    w.flush()?;
    Ok(())
}

/// 按输出配置导出一次运行结果，返回写出的文件路径
pub fn export_outcome(config: &OutputConfig, outcome: &RunOutcome) -> IoResult<PathBuf> {
    let path = config.trajectory_path();
    match config.format {
        OutputFormat::Csv => write_csv(&path, &outcome.trajectory)?,
        OutputFormat::Json => write_json(&path, &outcome.trajectory, &outcome.report)?,
    }
    info!("轨迹已写出: {} ({} 条记录)", path.display(), outcome.trajectory.len());
    Ok(path)
}

// apps/wr_cli/src/commands/run.rs

//! 射线追踪命令
//!
//! 加载配置与背景场，积分一条射线并导出轨迹。

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use wr_config::{Direction, OutputFormat, RunConfig};
use wr_foundation::WrResult;
use wr_io::{export_outcome, load_field};
use wr_ray::{RayTracer, RunOutcome};

/// 输出格式
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// CSV
    Csv,
    /// JSON（含运行报告）
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// 射线追踪参数
#[derive(Args)]
pub struct RunArgs {
    /// 配置文件路径（缺省使用内置的 Drake Passage 背风波算例）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 输出目录
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 输出格式
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// 积分时长 [h]
    #[arg(long)]
    pub hours: Option<f64>,

    /// 时间步长 [s]
    #[arg(long)]
    pub dt: Option<f64>,

    /// 反向积分
    #[arg(long)]
    pub reverse: bool,
}

impl RunArgs {
    fn apply(&self, config: &mut RunConfig) {
        if let Some(dir) = &self.output {
            config.output.directory = dir.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format.into();
        }
        if let Some(hours) = self.hours {
            config.run.duration_hours = hours;
        }
        if let Some(dt) = self.dt {
            config.run.time_step = dt;
        }
        if self.reverse {
            config.run.direction = Direction::Reverse;
        }
    }
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== WaveRay 启动 ===");

    let mut config = match &args.config {
        Some(path) => RunConfig::from_file(path)
            .with_context(|| format!("无法加载配置文件: {}", path.display()))?,
        None => {
            info!("未指定配置文件，使用默认算例");
            RunConfig::default()
        }
    };
    args.apply(&mut config);

    let (outcome, path) = trace(&config).context("射线追踪失败")?;
    println!("{}", outcome.report);

    info!("=== 完成 ===");
    info!("终止原因: {}", outcome.reason);
    info!("轨迹文件: {}", path.display());

    Ok(())
}

/// 验证配置、加载背景场、积分一条射线并导出轨迹
///
/// 配置、IO 与积分器各层的错误统一转换为 `WrError`。
fn trace(config: &RunConfig) -> WrResult<(RunOutcome, PathBuf)> {
    config.validate()?;

    let field = load_field(&config.field, config.wave.start_timestamp())?;
    for line in field.to_string().lines() {
        info!("{}", line);
    }

    let tracer = RayTracer::new(config, &field)?;

    let start = Instant::now();
    let outcome = tracer.run();
    info!("计算时间: {:.3} s", start.elapsed().as_secs_f64());

    let path = export_outcome(&config.output, &outcome)?;
    Ok((outcome, path))
}

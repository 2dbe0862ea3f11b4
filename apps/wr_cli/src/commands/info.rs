// apps/wr_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示版本、默认配置以及波参数的物理量。

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;
use wr_config::RunConfig;
use wr_physics::coriolis::inertial_period;
use wr_physics::{coriolis_parameter, intrinsic_frequency};
use wr_ray::InitialConditions;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 以 JSON 打印默认配置
    #[arg(long)]
    pub defaults: bool,

    /// 假定的 N² [1/s²]，用于色散关系检查
    #[arg(long, default_value = "1e-5")]
    pub n2: f64,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== WaveRay 信息 ===");

    println!("WaveRay CLI 版本: {}", env!("CARGO_PKG_VERSION"));
    println!("NetCDF 支持: {}", if cfg!(feature = "netcdf") { "✓" } else { "✗" });

    if args.defaults {
        let json = serde_json::to_string_pretty(&RunConfig::default())?;
        println!("\n=== 默认配置 ===\n{}", json);
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => RunConfig::from_file(path)
            .with_context(|| format!("无法加载配置文件: {}", path.display()))?,
        None => RunConfig::default(),
    };

    print_wave_summary(&config, args.n2);
    Ok(())
}

fn print_wave_summary(config: &RunConfig, n2: f64) {
    let initial = InitialConditions::from(&config.wave);
    println!();
    print!("{}", initial);

    let f = coriolis_parameter(initial.lat);
    println!("\n=== 环境 ===");
    println!("科氏参数 f: {:.4e} rad/s", f);
    if let Some(period) = inertial_period(initial.lat) {
        println!("惯性周期: {:.2} h", period / 3600.0);
    }
    println!("假定 N²: {:.3e} 1/s²", n2);

    match intrinsic_frequency(f, n2, &initial.wavenumber()) {
        Ok(omega) => {
            println!("色散关系频率: {:.4e} rad/s", omega);
            println!("配置 |ω|:     {:.4e} rad/s", initial.omega.abs());
        }
        Err(e) => println!("色散关系无解: {}", e),
    }
    if initial.omega.abs() <= f.abs() {
        println!("⚠ |ω| ≤ |f|：次惯性频率，射线会在第一步终止");
    }

    println!("\n=== 积分 ===");
    println!("方向: {:?}", config.run.direction);
    println!("步长: {} s, 步数: {}", config.run.time_step, config.run.step_count());
    println!("海底深度: {} m", config.run.seafloor_depth);
}

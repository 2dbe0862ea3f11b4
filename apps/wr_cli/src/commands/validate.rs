// apps/wr_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 检查配置文件，可选地加载背景场并确认初始点位于场内。

use anyhow::{bail, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use wr_config::{FieldSourceConfig, RunConfig};
use wr_field::{FieldSampler, QueryPoint};
use wr_io::load_field;
use wr_physics::coriolis_parameter;

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 加载背景场并检查初始点
    #[arg(long)]
    pub field: bool,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self, strict: bool) -> bool {
        self.errors.is_empty() && (!strict || self.warnings.is_empty())
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== WaveRay 配置验证 ===");

    let Some(path) = &args.config else {
        println!("用法: wr_cli validate --config <配置文件> [--field] [--strict]");
        return Ok(());
    };

    let mut result = ValidationResult::default();
    if let Some(config) = validate_config(path, &mut result) {
        check_physics(&config, &mut result);
        check_field_source(&config, &mut result);
        if args.field {
            check_field_coverage(&config, &mut result);
        }
    }

    print_validation_result(&result, args.strict)
}

fn validate_config(path: &Path, result: &mut ValidationResult) -> Option<RunConfig> {
    println!("\n检查配置文件: {}", path.display());

    if !path.exists() {
        result.add_error(format!("配置文件不存在: {}", path.display()));
        return None;
    }

    match RunConfig::from_file(path) {
        Ok(config) => {
            println!("  ✓ 配置文件格式有效");
            Some(config)
        }
        Err(e) => {
            result.add_error(e.to_string());
            None
        }
    }
}

fn check_physics(config: &RunConfig, result: &mut ValidationResult) {
    let f = coriolis_parameter(config.wave.lat);
    if config.wave.omega.abs() <= f.abs() {
        result.add_warning(format!(
            "|ω| = {:.3e} ≤ |f| = {:.3e}，射线会立即终止",
            config.wave.omega.abs(),
            f.abs()
        ));
    }

    let hours = config.run.duration_hours;
    if config.run.status_interval_hours > hours {
        result.add_warning(format!(
            "状态输出间隔 {} h 超过积分时长 {} h",
            config.run.status_interval_hours, hours
        ));
    }
    if config.run.time_step > 600.0 {
        result.add_warning(format!("时间步长 {} s 较大，可能影响精度", config.run.time_step));
    }
}

fn check_field_source(config: &RunConfig, result: &mut ValidationResult) {
    if let FieldSourceConfig::NetCdf { path, .. } = &config.field {
        if !cfg!(feature = "netcdf") {
            result.add_error("配置使用 NetCDF 背景场，但当前构建未启用 `netcdf` feature");
        }
        if !path.exists() {
            result.add_error(format!("背景场文件不存在: {}", path.display()));
        }
    }
}

fn check_field_coverage(config: &RunConfig, result: &mut ValidationResult) {
    println!("\n加载背景场...");
    let field = match load_field(&config.field, config.wave.start_timestamp()) {
        Ok(field) => field,
        Err(e) => {
            result.add_error(format!("背景场加载失败: {}", e));
            return;
        }
    };

    let wave = &config.wave;
    let point = QueryPoint::new(wave.lon, wave.lat, wave.depth, wave.start_timestamp());
    match field.locate_checked(&point) {
        Ok(idx) => {
            let n2 = field.buoyancy_frequency_sq(&idx, wave.depth);
            if !n2.is_finite() || n2 <= 0.0 {
                result.add_warning(format!("初始点 N² = {:.3e}，射线会立即终止", n2));
            }
            println!("  ✓ 初始点位于背景场内 (N² = {:.3e})", n2);
        }
        Err(e) => result.add_error(format!("初始点不在背景场内: {}", e)),
    }
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    if result.is_ok(strict) {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}

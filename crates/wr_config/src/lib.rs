// crates/wr_config/src/lib.rs

//! WaveRay Config Layer
//!
//! 配置层，提供射线追踪运行所需的全部参数，使用 JSON 序列化。
//!
//! # 模块概览
//!
//! - [`run_config`]: `RunConfig` 及其子配置
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: wr_cli      ─> 读取 RunConfig
//! Layer 4: wr_ray      ─> 消费 WaveConfig, IntegrationConfig
//! Layer 4: wr_io       ─> 消费 FieldSourceConfig, OutputConfig
//! Layer 3: wr_config   ─> 本层
//! Layer 1: wr_foundation
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod run_config;

// 重导出核心类型
pub use error::ConfigError;
pub use run_config::{
    ArrayLayout, AxisSpec, Direction, DomainPolicy, FieldNames, FieldSourceConfig,
    IntegrationConfig, OutputConfig, OutputFormat, RunConfig, TimeEncoding, UniformFieldConfig,
    WaveConfig,
};

// crates/wr_foundation/src/lib.rs

//! WaveRay Foundation Layer
//!
//! 零业务依赖的基础层，提供整个工作区共享的抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型 `WrError` 与 `WrResult`
//! - [`constants`]: 地球物理常数
//!
//! # 示例
//!
//! ```
//! use wr_foundation::{WrError, WrResult};
//!
//! fn check_depth(z: f64) -> WrResult<()> {
//!     if (0.0..=6000.0).contains(&z) {
//!         Ok(())
//!     } else {
//!         Err(WrError::out_of_range("depth", z, 0.0, 6000.0))
//!     }
//! }
//!
//! assert!(check_depth(500.0).is_ok());
//! assert!(check_depth(-1.0).is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod constants;
pub mod error;

pub use error::{WrError, WrResult};

//! Common types and utilities shared across Lim crates.
//!
//! Kept deliberately small so every crate in the workspace can depend on it:
//!
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`APP_NAME`]: the logical application name used for log files, config
//!   directories, and window titles
//!
//! ```rust
//! use lim_common::observability::{LogConfig, LogFormat};
//!
//! let cfg = LogConfig::default();
//! assert_eq!(cfg.app_name, lim_common::APP_NAME);
//! assert!(matches!(cfg.format, LogFormat::Text));
//! ```

pub mod observability;

/// Logical application name.
pub const APP_NAME: &str = "lim";

/// Human-facing product name, as shown in titles.
pub const DISPLAY_NAME: &str = "Lim";

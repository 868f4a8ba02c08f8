//! # statpush-core
//!
//! statpush domain models, port (trait) definitions and error types.
//! Shared by the network adapters and the collector binary.
//!
//! ## Layout
//!
//! - [`models`]: metric components, the metric request and its wire envelope
//! - [`ports`]: adapter interfaces (async_trait)
//! - [`error`]: core error type (thiserror)
//! - [`config`]: application configuration structs
//! - [`config_manager`]: config file loading

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;

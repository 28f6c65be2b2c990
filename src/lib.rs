//! bizdir - business directory registration and profile management
//!
//! The library exposes the registration wizard, the profile editor model and
//! the remote service adapters so the binary and integration tests share them.

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod profile;
pub mod registration;
pub mod session;
pub mod templates;
pub mod ui;

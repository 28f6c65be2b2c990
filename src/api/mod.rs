//! Adapters for the remote directory services
//!
//! - `registration`: account + business registration
//! - `profile`: profile read and bulk update
//! - `parameters`: system parameter option lists
//!
//! Each adapter sits behind an async trait so the wizard and editor can be
//! driven by in-memory fakes.

pub mod client;
pub mod error;
pub mod parameters;
pub mod profile;
pub mod registration;

pub use client::build_http_client;
pub use error::ApiError;
pub use parameters::{HttpParameterApi, ParameterApi};
pub use profile::{HttpProfileApi, ProfileApi, ProfileDocument, ProfileUpdateRequest};
pub use registration::{HttpRegistrationApi, RegisterRequest, RegistrationApi, SuccessToken};

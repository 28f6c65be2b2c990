//! Multi-step business registration
//!
//! Pages commit typed payloads that are merged into one accumulated record; the
//! record is submitted once after the last page.

pub mod controller;
pub mod record;
pub mod steps;
pub mod validate;

pub use controller::{Advance, CompletionTimer, WizardController, WizardError, WizardState, WizardVariant};
pub use record::{
    BasicDetailsPatch, CompanySize, CredentialsPatch, LocationsPatch, RegistrationRecord,
    ServicesPatch, StepKind, StepPayload,
};
pub use steps::{SelectionDraft, SelectionKind, StepDraft};
pub use validate::{ValidationError, ValidationErrors};

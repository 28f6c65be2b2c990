//! Wizard controller: step sequencing, record accumulation and deferred submission

use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::record::{RegistrationRecord, StepKind, StepPayload};
use crate::api::registration::{RegistrationApi, SuccessToken, GENERIC_FAILURE};

/// Which sequence of pages the wizard walks through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardVariant {
    /// Account credentials first, then the business profile pages
    #[default]
    CredentialsFirst,
    /// Business profile pages only
    ProfileOnly,
}

impl WizardVariant {
    pub fn steps(&self) -> &'static [StepKind] {
        match self {
            WizardVariant::CredentialsFirst => &[
                StepKind::Credentials,
                StepKind::BasicDetails,
                StepKind::Services,
                StepKind::CompanySize,
                StepKind::Locations,
            ],
            WizardVariant::ProfileOnly => &[
                StepKind::BasicDetails,
                StepKind::Services,
                StepKind::CompanySize,
                StepKind::Locations,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    /// Editing page `n` (1-based)
    Step(usize),
    Submitting,
    Success,
    /// Submission failed; the user is back on the last page with this message
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("a submission is already in flight")]
    Busy,
    #[error("registration already completed")]
    Finished,
    #[error("expected {expected:?} details, got {got:?}")]
    WrongStep { expected: StepKind, got: StepKind },
    #[error("nothing to submit")]
    NotSubmitting,
}

/// Outcome of a successful `advance`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to page `n`
    Moved(usize),
    /// Last page committed; the record is ready for `submit`
    ReadyToSubmit(RegistrationRecord),
}

#[derive(Debug, Clone)]
pub struct WizardController {
    variant: WizardVariant,
    record: RegistrationRecord,
    current: usize,
    state: WizardState,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new(WizardVariant::default())
    }
}

impl WizardController {
    pub fn new(variant: WizardVariant) -> Self {
        Self {
            variant,
            record: RegistrationRecord::default(),
            current: 1,
            state: WizardState::Step(1),
        }
    }

    pub fn variant(&self) -> WizardVariant {
        self.variant
    }

    /// 1-based index of the page being shown
    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn step_count(&self) -> usize {
        self.variant.steps().len()
    }

    pub fn current_kind(&self) -> StepKind {
        self.variant.steps()[self.current - 1]
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn record(&self) -> &RegistrationRecord {
        &self.record
    }

    /// Submission controls are disabled while this is true
    pub fn is_busy(&self) -> bool {
        matches!(self.state, WizardState::Submitting)
    }

    pub fn failure_message(&self) -> Option<&str> {
        match &self.state {
            WizardState::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn progress_percent(&self) -> u8 {
        if matches!(self.state, WizardState::Success) {
            return 100;
        }
        ((self.current * 100) / self.step_count()) as u8
    }

    /// Merge the current page's payload and move forward.
    ///
    /// On the last page this enters `Submitting` instead and hands back the
    /// fully merged record.
    pub fn advance(&mut self, payload: StepPayload) -> Result<Advance, WizardError> {
        match self.state {
            WizardState::Submitting => return Err(WizardError::Busy),
            WizardState::Success => return Err(WizardError::Finished),
            WizardState::Step(_) | WizardState::Failed { .. } => {}
        }

        let expected = self.current_kind();
        if payload.kind() != expected {
            return Err(WizardError::WrongStep {
                expected,
                got: payload.kind(),
            });
        }

        self.record = std::mem::take(&mut self.record).merge(payload);

        if self.current < self.step_count() {
            self.current += 1;
            self.state = WizardState::Step(self.current);
            debug!(step = self.current, "wizard advanced");
            Ok(Advance::Moved(self.current))
        } else {
            self.state = WizardState::Submitting;
            debug!("wizard submitting");
            Ok(Advance::ReadyToSubmit(self.record.clone()))
        }
    }

    /// Step back one page. No-op on the first page and while submitting or done.
    pub fn retreat(&mut self) {
        if self.current <= 1 || matches!(self.state, WizardState::Submitting | WizardState::Success) {
            return;
        }
        self.current -= 1;
        self.state = WizardState::Step(self.current);
    }

    /// Send the merged record. Only valid in `Submitting`.
    pub async fn submit(&mut self, api: &dyn RegistrationApi) -> Result<&WizardState, WizardError> {
        if !self.is_busy() {
            return Err(WizardError::NotSubmitting);
        }
        let result = api.submit(&self.record).await;
        self.finish(result);
        Ok(&self.state)
    }

    fn finish(&mut self, result: Result<SuccessToken, crate::api::ApiError>) {
        match result {
            Ok(_) => {
                info!(company = %self.record.company_name, "registration completed");
                self.state = WizardState::Success;
            }
            Err(e) => {
                warn!(error = %e, "registration submission failed");
                self.state = WizardState::Failed {
                    message: e.user_message(GENERIC_FAILURE),
                };
            }
        }
    }
}

/// Single-shot timer fired after a successful registration.
///
/// Dropping the timer aborts the pending callback.
#[derive(Debug)]
pub struct CompletionTimer {
    handle: JoinHandle<()>,
}

impl CompletionTimer {
    /// Must be called from within a tokio runtime
    pub fn start<F>(delay: Duration, on_fire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire();
        });
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CompletionTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

//! Registration wizard screen
//!
//! Owns the controller and the draft of the mounted page. Network work is
//! handed back to the app loop as a `WizardAction`.

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use ratatui::widgets::ListState;
use tracing::{debug, warn};

use crate::api::RegistrationApi;
use crate::registration::{
    Advance, CompanySize, CompletionTimer, SelectionKind, StepDraft, StepKind, WizardController,
    WizardState, WizardVariant,
};
use crate::ui::form_field::{Form, FormField};

mod pages;

#[cfg(test)]
mod tests;

/// What the app loop has to do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    None,
    Quit,
    /// A selection page was mounted; fetch its options
    LoadOptions(SelectionKind),
    /// Last page committed; call `submit`
    Submit,
    /// Success acknowledged; leave the wizard
    Finished,
}

/// Focus region on the services/locations pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionFocus {
    Options,
    Custom,
    Selected,
}

impl SelectionFocus {
    fn next(self) -> Self {
        match self {
            Self::Options => Self::Custom,
            Self::Custom => Self::Selected,
            Self::Selected => Self::Options,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Options => Self::Selected,
            Self::Custom => Self::Options,
            Self::Selected => Self::Custom,
        }
    }
}

pub struct WizardScreen {
    pub(crate) controller: WizardController,
    pub(crate) draft: StepDraft,
    /// Inputs for the credentials and basic details pages
    pub(crate) form: Form,
    /// Free-text entry on the selection pages
    pub(crate) custom: FormField,
    pub(crate) focus: SelectionFocus,
    pub(crate) options_state: ListState,
    pub(crate) selected_state: ListState,
    pub(crate) size_state: ListState,
    pub(crate) options_loading: bool,
    redirect_after: Duration,
    success_at: Option<Instant>,
    timer: Option<CompletionTimer>,
}

impl WizardScreen {
    pub fn new(variant: WizardVariant, redirect_after: Duration) -> Self {
        let controller = WizardController::new(variant);
        let draft = StepDraft::seed(controller.current_kind(), controller.record());
        let mut screen = Self {
            controller,
            draft,
            form: Form::new(),
            custom: FormField::text(""),
            focus: SelectionFocus::Options,
            options_state: ListState::default(),
            selected_state: ListState::default(),
            size_state: ListState::default(),
            options_loading: false,
            redirect_after,
            success_at: None,
            timer: None,
        };
        screen.mount_current();
        screen
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub fn draft(&self) -> &StepDraft {
        &self.draft
    }

    /// Rebuild page-local state from the record for the current page
    fn mount_current(&mut self) -> WizardAction {
        let kind = self.controller.current_kind();
        self.draft = StepDraft::seed(kind, self.controller.record());
        self.form = Form::new();
        self.focus = SelectionFocus::Options;
        self.options_state = ListState::default();
        self.selected_state = ListState::default();
        self.options_loading = false;

        match &self.draft {
            StepDraft::Credentials(d) => {
                self.form = Form::new()
                    .with("username", "Username", FormField::text("At least 4 characters"))
                    .with("password", "Password", FormField::password("At least 6 characters"));
                self.form.set_value("username", &d.username);
                self.form.set_value("password", &d.password);
                WizardAction::None
            }
            StepDraft::BasicDetails(d) => {
                self.form = Form::new()
                    .with("companyName", "Company Name *", FormField::text("Acme Roofing"))
                    .with("website", "Website", FormField::text("www.acme.com"))
                    .with(
                        "description",
                        "Description *",
                        FormField::text("Tell customers what you do (10-500 characters)"),
                    );
                self.form.set_value("companyName", &d.company_name);
                self.form.set_value("website", &d.website);
                self.form.set_value("description", &d.description);
                WizardAction::None
            }
            StepDraft::Services(d) | StepDraft::Locations(d) => {
                self.custom = FormField::text(match d.kind() {
                    SelectionKind::Services => "Add a custom service",
                    SelectionKind::Locations => "Add a location",
                });
                self.custom.set_value(&d.custom_input);
                self.options_loading = true;
                WizardAction::LoadOptions(d.kind())
            }
            StepDraft::CompanySize(d) => {
                let index = d
                    .selected
                    .and_then(|s| CompanySize::all().iter().position(|c| *c == s))
                    .unwrap_or(0);
                self.size_state.select(Some(index));
                WizardAction::None
            }
        }
    }

    /// Options fetched for a selection page; stale kinds are ignored
    pub fn set_options(&mut self, kind: SelectionKind, options: Vec<String>) {
        let Some(selection) = self.draft.selection_mut() else {
            return;
        };
        if selection.kind() != kind {
            debug!(?kind, "dropping options for unmounted page");
            return;
        }
        let empty = options.is_empty();
        selection.set_options(options);
        self.options_loading = false;
        self.options_state.select(if empty { None } else { Some(0) });
    }

    fn sync_draft(&mut self) {
        match &mut self.draft {
            StepDraft::Credentials(d) => {
                d.username = self.form.value("username");
                d.password = self.form.value("password");
            }
            StepDraft::BasicDetails(d) => {
                d.company_name = self.form.value("companyName");
                d.website = self.form.value("website");
                d.description = self.form.value("description");
            }
            StepDraft::Services(d) | StepDraft::Locations(d) => {
                d.custom_input = self.custom.value();
            }
            StepDraft::CompanySize(_) => {}
        }
    }

    /// Validate the page and hand its payload to the controller
    fn commit_page(&mut self) -> WizardAction {
        self.sync_draft();
        let payload = match self.draft.commit() {
            Ok(payload) => payload,
            Err(errors) => {
                debug!(
                    fields = ?errors.iter().map(|e| e.field).collect::<Vec<_>>(),
                    "page has validation errors"
                );
                return WizardAction::None;
            }
        };
        match self.controller.advance(payload) {
            Ok(Advance::Moved(_)) => self.mount_current(),
            Ok(Advance::ReadyToSubmit(_)) => WizardAction::Submit,
            Err(e) => {
                warn!(error = %e, "page commit refused");
                WizardAction::None
            }
        }
    }

    fn go_back(&mut self) -> WizardAction {
        if self.controller.current_step() <= 1 {
            return WizardAction::Quit;
        }
        self.sync_draft();
        self.controller.retreat();
        self.mount_current()
    }

    pub fn handle_key(&mut self, key: KeyCode) -> WizardAction {
        match self.controller.state() {
            WizardState::Submitting => return WizardAction::None,
            WizardState::Success => {
                return match key {
                    KeyCode::Enter | KeyCode::Esc => WizardAction::Finished,
                    _ => WizardAction::None,
                };
            }
            WizardState::Step(_) | WizardState::Failed { .. } => {}
        }

        if key == KeyCode::Esc {
            return self.go_back();
        }

        match self.controller.current_kind() {
            StepKind::Credentials | StepKind::BasicDetails => self.handle_form_key(key),
            StepKind::Services | StepKind::Locations => self.handle_selection_key(key),
            StepKind::CompanySize => self.handle_size_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) -> WizardAction {
        match key {
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Enter => {
                if self.form.is_last_field() {
                    return self.commit_page();
                }
                self.form.next_field();
            }
            _ => {
                if let Some(field) = self.form.focused_field_mut() {
                    field.handle_key(key);
                }
                self.sync_draft();
            }
        }
        WizardAction::None
    }

    fn handle_selection_key(&mut self, key: KeyCode) -> WizardAction {
        match key {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return WizardAction::None;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return WizardAction::None;
            }
            _ => {}
        }

        let Some(selection) = self.draft.selection_mut() else {
            return WizardAction::None;
        };

        match self.focus {
            SelectionFocus::Options => match key {
                KeyCode::Up => move_selection(&mut self.options_state, selection.options().len(), -1),
                KeyCode::Down => move_selection(&mut self.options_state, selection.options().len(), 1),
                KeyCode::Char(' ') => {
                    if let Some(option) = self
                        .options_state
                        .selected()
                        .and_then(|i| selection.options().get(i).cloned())
                    {
                        selection.pick(&option);
                    }
                }
                KeyCode::Enter => return self.commit_page(),
                _ => {}
            },
            SelectionFocus::Custom => match key {
                KeyCode::Enter => {
                    selection.custom_input = self.custom.value();
                    if selection.add_custom() {
                        self.custom.set_value("");
                    }
                }
                _ => {
                    self.custom.handle_key(key);
                    selection.custom_input = self.custom.value();
                }
            },
            SelectionFocus::Selected => match key {
                KeyCode::Up => move_selection(&mut self.selected_state, selection.selected().len(), -1),
                KeyCode::Down => move_selection(&mut self.selected_state, selection.selected().len(), 1),
                KeyCode::Delete | KeyCode::Backspace => {
                    let Some(index) = self.selected_state.selected() else {
                        return WizardAction::None;
                    };
                    if let Some(value) = selection.selected().get(index).cloned() {
                        selection.remove(&value);
                        let len = selection.selected().len();
                        self.selected_state
                            .select(if len == 0 { None } else { Some(index.min(len - 1)) });
                    }
                }
                KeyCode::Enter => return self.commit_page(),
                _ => {}
            },
        }
        WizardAction::None
    }

    fn handle_size_key(&mut self, key: KeyCode) -> WizardAction {
        let sizes = CompanySize::all();
        match key {
            KeyCode::Up => move_selection(&mut self.size_state, sizes.len(), -1),
            KeyCode::Down => move_selection(&mut self.size_state, sizes.len(), 1),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let (StepDraft::CompanySize(d), Some(i)) = (&mut self.draft, self.size_state.selected()) {
                    d.select(sizes[i]);
                }
                if key == KeyCode::Enter {
                    return self.commit_page();
                }
            }
            _ => {}
        }
        WizardAction::None
    }

    /// Send the record; the controller lands in `Success` or `Failed`
    pub async fn submit(&mut self, api: &dyn RegistrationApi) {
        if let Err(e) = self.controller.submit(api).await {
            warn!(error = %e, "submit skipped");
            return;
        }
        if matches!(self.controller.state(), WizardState::Success) {
            self.success_at = Some(Instant::now());
        }
    }

    /// Arm the post-success redirect; `on_fire` runs once after the delay
    pub fn start_redirect<F>(&mut self, on_fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.timer = Some(CompletionTimer::start(self.redirect_after, on_fire));
    }

    /// Whole seconds left on the success screen
    pub fn redirect_remaining(&self) -> u64 {
        let elapsed = self
            .success_at
            .map(|at| at.elapsed())
            .unwrap_or_default();
        self.redirect_after.saturating_sub(elapsed).as_secs_f64().ceil() as u64
    }
}

/// Step a list highlight by `delta`, clamped to `len`
fn move_selection(state: &mut ListState, len: usize, delta: isize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let next = match state.selected() {
        None => 0,
        Some(current) => (current as isize + delta).clamp(0, len as isize - 1) as usize,
    };
    state.select(Some(next));
}

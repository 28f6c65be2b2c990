//! Tests for the registration wizard screen

use super::*;
use crate::api::{ApiError, SuccessToken};
use crate::registration::{RegistrationRecord, StepKind};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

struct FakeRegistrationApi {
    result: Result<SuccessToken, ApiError>,
    submitted: Mutex<Vec<RegistrationRecord>>,
}

impl FakeRegistrationApi {
    fn accepting() -> Self {
        Self {
            result: Ok(SuccessToken::default()),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RegistrationApi for FakeRegistrationApi {
    async fn submit(&self, record: &RegistrationRecord) -> Result<SuccessToken, ApiError> {
        self.submitted.lock().unwrap().push(record.clone());
        self.result.clone()
    }
}

fn screen() -> WizardScreen {
    WizardScreen::new(WizardVariant::ProfileOnly, Duration::from_millis(10))
}

fn type_text(screen: &mut WizardScreen, text: &str) -> WizardAction {
    let mut last = WizardAction::None;
    for c in text.chars() {
        last = screen.handle_key(KeyCode::Char(c));
    }
    last
}

/// Fill the basic details page and commit it
fn complete_basics(screen: &mut WizardScreen) -> WizardAction {
    type_text(screen, "Acme");
    screen.handle_key(KeyCode::Enter);
    screen.handle_key(KeyCode::Enter);
    type_text(screen, "We build roofs");
    screen.handle_key(KeyCode::Enter)
}

#[test]
fn test_starts_on_first_page_of_variant() {
    let screen = screen();
    assert_eq!(screen.controller().current_kind(), StepKind::BasicDetails);
    assert_eq!(screen.form.focused_key(), Some("companyName"));

    let credentials = WizardScreen::new(WizardVariant::CredentialsFirst, Duration::ZERO);
    assert_eq!(credentials.form.focused_key(), Some("username"));
}

#[test]
fn test_escape_on_first_page_quits() {
    let mut screen = screen();
    assert_eq!(screen.handle_key(KeyCode::Esc), WizardAction::Quit);
}

#[test]
fn test_invalid_page_stays_put_with_errors() {
    let mut screen = screen();
    type_text(&mut screen, "Acme");
    screen.handle_key(KeyCode::Enter);
    screen.handle_key(KeyCode::Enter);
    type_text(&mut screen, "short");

    assert_eq!(screen.handle_key(KeyCode::Enter), WizardAction::None);
    assert_eq!(screen.controller().current_step(), 1);
    match screen.draft() {
        StepDraft::BasicDetails(d) => assert_eq!(
            d.errors.for_field("description"),
            Some("Please provide at least 10 characters")
        ),
        other => panic!("unexpected draft: {other:?}"),
    }
}

#[test]
fn test_selection_page_requests_options_on_mount() {
    let mut screen = screen();
    assert_eq!(
        complete_basics(&mut screen),
        WizardAction::LoadOptions(SelectionKind::Services)
    );
    assert!(screen.options_loading);

    screen.set_options(SelectionKind::Services, vec!["Roofing".to_string()]);
    assert!(!screen.options_loading);
    assert_eq!(screen.options_state.selected(), Some(0));
}

#[test]
fn test_options_for_another_page_are_ignored() {
    let mut screen = screen();
    complete_basics(&mut screen);

    screen.set_options(SelectionKind::Locations, vec!["USA".to_string()]);
    assert!(screen.options_loading);
    match screen.draft() {
        StepDraft::Services(d) => assert!(d.options().is_empty()),
        other => panic!("unexpected draft: {other:?}"),
    }
}

#[test]
fn test_back_restores_previous_values() {
    let mut screen = screen();
    complete_basics(&mut screen);

    assert_eq!(screen.handle_key(KeyCode::Esc), WizardAction::None);
    assert_eq!(screen.controller().current_kind(), StepKind::BasicDetails);
    assert_eq!(screen.form.value("companyName"), "Acme");
    assert_eq!(screen.form.value("description"), "We build roofs");
}

#[test]
fn test_custom_entry_duplicate_keeps_input() {
    let mut screen = screen();
    complete_basics(&mut screen);
    screen.set_options(SelectionKind::Services, vec![]);

    screen.handle_key(KeyCode::Tab);
    type_text(&mut screen, "Plumbing");
    screen.handle_key(KeyCode::Enter);
    assert_eq!(screen.custom.value(), "");

    type_text(&mut screen, "Plumbing");
    screen.handle_key(KeyCode::Enter);
    assert_eq!(screen.custom.value(), "Plumbing");
    match screen.draft() {
        StepDraft::Services(d) => {
            assert_eq!(d.selected(), ["Plumbing".to_string()]);
            assert_eq!(d.error(), Some("This service is already selected"));
        }
        other => panic!("unexpected draft: {other:?}"),
    }
}

#[test]
fn test_remove_from_selected_list() {
    let mut screen = screen();
    complete_basics(&mut screen);
    screen.set_options(
        SelectionKind::Services,
        vec!["Roofing".to_string(), "Siding".to_string()],
    );
    screen.handle_key(KeyCode::Char(' '));
    screen.handle_key(KeyCode::Down);
    screen.handle_key(KeyCode::Char(' '));

    screen.handle_key(KeyCode::BackTab);
    screen.handle_key(KeyCode::Down);
    screen.handle_key(KeyCode::Delete);

    match screen.draft() {
        StepDraft::Services(d) => assert_eq!(d.selected(), ["Siding".to_string()]),
        other => panic!("unexpected draft: {other:?}"),
    }
    assert_eq!(screen.selected_state.selected(), Some(0));
}

#[tokio::test]
async fn test_full_walk_submits_once_and_finishes() {
    let api = FakeRegistrationApi::accepting();
    let mut screen = screen();

    complete_basics(&mut screen);
    screen.set_options(
        SelectionKind::Services,
        vec!["Roofing".to_string(), "Siding".to_string()],
    );
    screen.handle_key(KeyCode::Char(' '));
    assert_eq!(screen.handle_key(KeyCode::Enter), WizardAction::None);
    assert_eq!(screen.controller().current_kind(), StepKind::CompanySize);

    assert_eq!(
        screen.handle_key(KeyCode::Enter),
        WizardAction::LoadOptions(SelectionKind::Locations)
    );
    screen.set_options(
        SelectionKind::Locations,
        vec!["USA".to_string(), "Canada".to_string()],
    );
    screen.handle_key(KeyCode::Char(' '));
    assert_eq!(screen.handle_key(KeyCode::Enter), WizardAction::Submit);

    // Busy while the request is outstanding
    assert_eq!(screen.handle_key(KeyCode::Enter), WizardAction::None);

    screen.submit(&api).await;
    assert_eq!(screen.controller().state(), &WizardState::Success);
    assert_eq!(screen.controller().progress_percent(), 100);

    let submitted = api.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].company_name, "Acme");
    assert_eq!(submitted[0].services, vec!["Roofing".to_string()]);
    assert_eq!(submitted[0].company_size, Some(CompanySize::Tiny));
    assert_eq!(submitted[0].locations, vec!["USA".to_string()]);
    drop(submitted);

    assert_eq!(screen.handle_key(KeyCode::Enter), WizardAction::Finished);
}

#[tokio::test]
async fn test_redirect_fires_after_delay() {
    let fired = Arc::new(AtomicBool::new(false));
    let mut screen = screen();

    let flag = fired.clone();
    screen.start_redirect(move || flag.store(true, Ordering::SeqCst));
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(fired.load(Ordering::SeqCst));
}

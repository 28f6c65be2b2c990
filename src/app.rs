use anyhow::{bail, Context, Result};
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use crate::api::{
    build_http_client, HttpParameterApi, HttpProfileApi, HttpRegistrationApi, ParameterApi,
    ProfileApi, RegistrationApi,
};
use crate::config::Config;
use crate::profile::{EditorError, ProfileEditor};
use crate::registration::{SelectionKind, WizardState, WizardVariant};
use crate::session::{self, Session, SessionStore};
use crate::templates::TemplateRenderer;
use crate::ui::dialogs::centered_rect;
use crate::ui::editor::{EditorAction, ProfileScreen};
use crate::ui::terminal_guard::Tui;
use crate::ui::wizard::{WizardAction, WizardScreen};

pub const REGISTERED_MESSAGE: &str =
    "Registration complete. Sign in with `bizdir login --token <TOKEN>`, then run `bizdir profile`.";
pub const SESSION_EXPIRED_MESSAGE: &str =
    "Your session has expired. Sign in again with `bizdir login --token <TOKEN>`.";

/// Remote adapters the screens talk to
#[derive(Clone)]
pub struct Services {
    pub registration: Arc<dyn RegistrationApi>,
    pub parameters: Arc<dyn ParameterApi>,
    /// Only present when a valid session was found
    pub profile: Option<Arc<dyn ProfileApi>>,
}

impl Services {
    /// One HTTP client shared by every adapter
    pub fn from_config(config: &Config, session: Option<Session>) -> Result<Self> {
        let client = build_http_client(config.request_timeout())
            .context("Failed to build HTTP client")?;
        let registration =
            HttpRegistrationApi::new(client.clone(), config.api.registration_url.clone());
        let parameters = HttpParameterApi::new(client.clone(), config.api.parameters_url.clone());

        let profile: Option<Arc<dyn ProfileApi>> = if session::is_valid(session.as_ref(), Utc::now())
        {
            let api = HttpProfileApi::new(
                client,
                config.api.profile_url.clone(),
                config.api.profile_id.clone(),
                session,
            )
            .context("Profile service is not configured")?;
            Some(Arc::new(api))
        } else {
            None
        };

        Ok(Self {
            registration: Arc::new(registration),
            parameters: Arc::new(parameters),
            profile,
        })
    }

    /// Like `from_config`, but the registration endpoint must be set
    pub fn for_registration(config: &Config) -> Result<Self> {
        if config.api.registration_url.trim().is_empty() {
            bail!("Registration service is not configured (api.registration_url)");
        }
        Self::from_config(config, None)
    }
}

pub enum Screen {
    Registration(Box<WizardScreen>),
    Profile(Box<ProfileScreen>),
    SessionExpired,
}

/// Messages from background tasks back into the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    RegistrationComplete,
}

/// Network work queued by a key press, run after the next draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingTask {
    LoadOptions(SelectionKind),
    SubmitRegistration,
    LoadProfile,
    SaveProfile,
}

pub struct App {
    config: Config,
    services: Services,
    screen: Screen,
    pending: Option<PendingTask>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    should_quit: bool,
    /// Printed after the terminal is restored
    exit_message: Option<String>,
}

impl App {
    fn with_screen(config: Config, services: Services, screen: Screen) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            config,
            services,
            screen,
            pending: None,
            events_tx,
            events_rx,
            should_quit: false,
            exit_message: None,
        }
    }

    /// Start on the registration wizard
    pub fn registration(config: Config, services: Services, variant: WizardVariant) -> Self {
        let redirect = Duration::from_millis(config.ui.success_redirect_ms);
        let wizard = WizardScreen::new(variant, redirect);
        Self::with_screen(config, services, Screen::Registration(Box::new(wizard)))
    }

    /// Start on the profile editor, or the expired-session notice without a valid session
    pub fn profile(config: Config, services: Services) -> Result<Self> {
        if services.profile.is_none() {
            warn!("profile requested without a valid session");
            return Ok(Self::with_screen(config, services, Screen::SessionExpired));
        }
        let renderer = TemplateRenderer::new().context("Failed to compile profile templates")?;
        let screen = ProfileScreen::new(ProfileEditor::new(), renderer);
        let mut app = Self::with_screen(config, services, Screen::Profile(Box::new(screen)));
        app.pending = Some(PendingTask::LoadProfile);
        Ok(app)
    }

    pub fn exit_message(&self) -> Option<&str> {
        self.exit_message.as_deref()
    }

    pub async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        let tick_rate = Duration::from_millis(self.config.ui.refresh_rate_ms);

        while !self.should_quit {
            terminal.draw(|f| self.render(f))?;

            // Drawn once in the busy state before blocking on the request
            if let Some(task) = self.pending.take() {
                self.perform(task).await;
                continue;
            }

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if key.modifiers.contains(KeyModifiers::CONTROL)
                            && key.code == KeyCode::Char('c')
                        {
                            self.should_quit = true;
                        } else {
                            self.handle_key(key.code);
                        }
                    }
                }
            }

            self.drain_events();
        }

        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match &mut self.screen {
            Screen::Registration(wizard) => match wizard.handle_key(code) {
                WizardAction::None => {}
                WizardAction::Quit => self.should_quit = true,
                WizardAction::LoadOptions(kind) => {
                    self.pending = Some(PendingTask::LoadOptions(kind))
                }
                WizardAction::Submit => self.pending = Some(PendingTask::SubmitRegistration),
                WizardAction::Finished => self.finish_registration(),
            },
            Screen::Profile(editor) => match editor.handle_key(code) {
                EditorAction::None => {}
                EditorAction::Quit => self.should_quit = true,
                EditorAction::Save => self.pending = Some(PendingTask::SaveProfile),
                EditorAction::Reload => self.pending = Some(PendingTask::LoadProfile),
            },
            Screen::SessionExpired => {
                self.exit_message = Some(SESSION_EXPIRED_MESSAGE.to_string());
                self.should_quit = true;
            }
        }
    }

    async fn perform(&mut self, task: PendingTask) {
        match task {
            PendingTask::LoadOptions(kind) => {
                let code = match kind {
                    SelectionKind::Services => &self.config.api.services_param,
                    SelectionKind::Locations => &self.config.api.locations_param,
                };
                let options = self.services.parameters.options(code).await;
                if let Screen::Registration(wizard) = &mut self.screen {
                    wizard.set_options(kind, options);
                }
            }
            PendingTask::SubmitRegistration => {
                let Screen::Registration(wizard) = &mut self.screen else {
                    return;
                };
                wizard.submit(self.services.registration.as_ref()).await;
                if matches!(wizard.controller().state(), WizardState::Success) {
                    let tx = self.events_tx.clone();
                    wizard.start_redirect(move || {
                        let _ = tx.send(AppEvent::RegistrationComplete);
                    });
                }
            }
            PendingTask::LoadProfile => {
                let (Screen::Profile(editor), Some(api)) = (&mut self.screen, &self.services.profile)
                else {
                    return;
                };
                if let Err(e) = editor.load(api.as_ref()).await {
                    self.on_editor_error(e);
                }
            }
            PendingTask::SaveProfile => {
                let (Screen::Profile(editor), Some(api)) = (&mut self.screen, &self.services.profile)
                else {
                    return;
                };
                if let Err(e) = editor.save(api.as_ref()).await {
                    self.on_editor_error(e);
                }
            }
        }
    }

    fn on_editor_error(&mut self, error: EditorError) {
        match error {
            EditorError::AuthExpired => self.expire_session(),
            // Load and save failures are already shown by the editor
            other => warn!(error = %other, "profile operation failed"),
        }
    }

    /// Drop the editor and any stored token
    fn expire_session(&mut self) {
        warn!("session rejected by profile service");
        self.screen = Screen::SessionExpired;
        self.services.profile = None;
        let store = SessionStore::new(self.config.session_path());
        if let Err(e) = store.clear() {
            warn!(error = %e, "failed to clear stored session");
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                AppEvent::RegistrationComplete => self.finish_registration(),
            }
        }
    }

    fn finish_registration(&mut self) {
        info!("leaving registration wizard");
        self.exit_message = Some(REGISTERED_MESSAGE.to_string());
        self.should_quit = true;
    }

    fn render(&mut self, frame: &mut Frame) {
        match &mut self.screen {
            Screen::Registration(wizard) => wizard.render(frame),
            Screen::Profile(editor) => editor.render(frame),
            Screen::SessionExpired => render_session_expired(frame),
        }
    }
}

fn render_session_expired(frame: &mut Frame) {
    let area = centered_rect(60, 30, frame.area());
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(Span::styled(
            "Session Expired",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(SESSION_EXPIRED_MESSAGE),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to exit",
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            ),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ProfileDocument, ProfileUpdateRequest, SuccessToken};
    use crate::registration::RegistrationRecord;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct StaticRegistration;

    #[async_trait]
    impl RegistrationApi for StaticRegistration {
        async fn submit(&self, _record: &RegistrationRecord) -> Result<SuccessToken, ApiError> {
            Ok(SuccessToken::default())
        }
    }

    struct StaticParameters;

    #[async_trait]
    impl ParameterApi for StaticParameters {
        async fn fetch(&self, code: &str) -> Result<Vec<String>, ApiError> {
            Ok(vec![format!("{code}-1"), format!("{code}-2")])
        }
    }

    struct ExpiredProfile;

    #[async_trait]
    impl ProfileApi for ExpiredProfile {
        async fn fetch(&self) -> Result<ProfileDocument, ApiError> {
            Err(ApiError::unauthorized("profile"))
        }

        async fn update(&self, _request: &ProfileUpdateRequest) -> Result<(), ApiError> {
            Err(ApiError::unauthorized("profile"))
        }
    }

    fn services(profile: Option<Arc<dyn ProfileApi>>) -> Services {
        Services {
            registration: Arc::new(StaticRegistration),
            parameters: Arc::new(StaticParameters),
            profile,
        }
    }

    fn config(temp_dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.paths.state = temp_dir.path().to_string_lossy().to_string();
        config.ui.success_redirect_ms = 10;
        config
    }

    #[test]
    fn test_profile_without_session_shows_expired_notice() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = App::profile(config(&temp_dir), services(None)).unwrap();
        assert!(matches!(app.screen, Screen::SessionExpired));

        app.handle_key(KeyCode::Enter);
        assert!(app.should_quit);
        assert_eq!(app.exit_message(), Some(SESSION_EXPIRED_MESSAGE));
    }

    #[tokio::test]
    async fn test_rejected_profile_load_discards_editor() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir);
        let store = SessionStore::new(config.session_path());
        store
            .save(&Session::new(crate::session::token_with_claims(r#"{"exp":1}"#)))
            .unwrap();

        let mut app = App::profile(config, services(Some(Arc::new(ExpiredProfile)))).unwrap();
        let task = app.pending.take().unwrap();
        assert_eq!(task, PendingTask::LoadProfile);
        app.perform(task).await;

        assert!(matches!(app.screen, Screen::SessionExpired));
        assert!(app.services.profile.is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_selection_options_use_configured_codes() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = App::registration(
            config(&temp_dir),
            services(None),
            WizardVariant::ProfileOnly,
        );

        for c in "Acme".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Enter);
        for c in "We build roofs".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);

        let task = app.pending.take().unwrap();
        assert_eq!(task, PendingTask::LoadOptions(SelectionKind::Services));
        app.perform(task).await;

        let Screen::Registration(wizard) = &app.screen else {
            panic!("expected wizard");
        };
        match wizard.draft() {
            crate::registration::StepDraft::Services(d) => assert_eq!(
                d.options(),
                ["SERVICE_EXPERTISES-1".to_string(), "SERVICE_EXPERTISES-2".to_string()]
            ),
            other => panic!("unexpected draft: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_success_timer_ends_registration() {
        use crate::registration::{
            BasicDetailsPatch, CompanySize, LocationsPatch, ServicesPatch, StepPayload,
        };

        let temp_dir = TempDir::new().unwrap();
        let mut app = App::registration(
            config(&temp_dir),
            services(None),
            WizardVariant::ProfileOnly,
        );
        let Screen::Registration(wizard) = &mut app.screen else {
            panic!("expected wizard");
        };
        for payload in [
            StepPayload::BasicDetails(BasicDetailsPatch {
                company_name: "Acme".to_string(),
                website: String::new(),
                description: "We build roofs".to_string(),
            }),
            StepPayload::Services(ServicesPatch {
                services: vec!["Roofing".to_string()],
                custom_services: String::new(),
            }),
            StepPayload::CompanySize(CompanySize::Tiny),
            StepPayload::Locations(LocationsPatch {
                locations: vec!["USA".to_string()],
            }),
        ] {
            wizard.controller.advance(payload).unwrap();
        }

        app.perform(PendingTask::SubmitRegistration).await;
        app.drain_events();
        assert!(!app.should_quit);

        tokio::time::sleep(Duration::from_millis(100)).await;
        app.drain_events();
        assert!(app.should_quit);
        assert_eq!(app.exit_message(), Some(REGISTERED_MESSAGE));
    }

    #[test]
    fn test_profile_services_do_not_need_registration_endpoint() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config(&temp_dir);
        config.api.registration_url = String::new();
        config.api.profile_id = "p1".to_string();
        let session = Session::new(crate::session::token_with_claims(r#"{"exp":4102444800}"#));

        let services = Services::from_config(&config, Some(session)).unwrap();
        assert!(services.profile.is_some());
        assert!(Services::for_registration(&config).is_err());
    }
}

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;
use crate::profile::{CompanyInfo, Expertise, ServiceDraft, TeamMemberDraft, WorkDraft};
use crate::ui::form_field::{Form, FormField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Company,
    Work,
    Service,
    TeamMember,
}

impl EntityKind {
    fn title(&self) -> &'static str {
        match self {
            EntityKind::Company => " Edit Company Info ",
            EntityKind::Work => " Add Work ",
            EntityKind::Service => " Add Service ",
            EntityKind::TeamMember => " Add Team Member ",
        }
    }

    fn form(&self) -> Form {
        match self {
            EntityKind::Company => Form::new()
                .with("companyName", "Company Name", FormField::text("Acme Roofing"))
                .with("about", "About", FormField::text_area("What your company does"))
                .with("phone", "Phone", FormField::text("+1 555 0100"))
                .with("address", "Address", FormField::text("Street, City")),
            EntityKind::Work => Form::new()
                .with("title", "Title *", FormField::text("Warehouse re-roof"))
                .with("category", "Category", FormField::text("Commercial"))
                .with("location", "Location", FormField::text("Denver, CO"))
                .with("cost", "Project Cost", FormField::text("$120,000"))
                .with("deadline", "Completion Date", FormField::date())
                .with("description", "Description", FormField::text_area("Scope of the project"))
                .with("images", "Images (comma separated)", FormField::text("front.jpg, roof.png"))
                .with("videos", "Videos (comma separated)", FormField::text("walkthrough.mp4")),
            EntityKind::Service => Form::new()
                .with("name", "Service Name *", FormField::text("Roof repair"))
                .with("description", "Description", FormField::text_area("What is included"))
                .with(
                    "expertise",
                    "Expertise Level",
                    FormField::select(
                        Expertise::all()
                            .iter()
                            .map(|e| e.label().to_string())
                            .collect(),
                    ),
                )
                .with("active", "Visibility", FormField::toggle(true, "Active", "Hidden")),
            EntityKind::TeamMember => Form::new()
                .with("name", "Name *", FormField::text("Dana Smith"))
                .with("role", "Role *", FormField::text("Estimator"))
                .with("email", "Email", FormField::text("dana@acme.io"))
                .with("phone", "Phone", FormField::text("+1 555 0101"))
                .with("department", "Department", FormField::text("Sales"))
                .with("active", "Visibility", FormField::toggle(true, "Active", "Hidden")),
        }
    }
}

/// What the dialog collected, ready for the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityInput {
    Company(CompanyInfo),
    Work(WorkDraft),
    Service(ServiceDraft),
    TeamMember(TeamMemberDraft),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityDialogResult {
    /// Stays open until the caller hides it, so a rejection can be shown inline
    Submitted(EntityInput),
    Cancelled,
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn optional(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Form popup for adding an entity or editing company info
pub struct EntityDialog {
    pub visible: bool,
    pub kind: EntityKind,
    pub form: Form,
    pub error: Option<String>,
}

impl EntityDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            kind: EntityKind::Work,
            form: Form::new(),
            error: None,
        }
    }

    pub fn show(&mut self, kind: EntityKind) {
        self.kind = kind;
        self.form = kind.form();
        self.error = None;
        self.visible = true;
    }

    /// Open the company form prefilled with the current values
    pub fn show_company(&mut self, info: &CompanyInfo) {
        self.show(EntityKind::Company);
        self.form.set_value("companyName", &info.company_name);
        self.form.set_value("about", &info.about);
        self.form.set_value("phone", &info.phone);
        self.form.set_value("address", &info.address);
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.error = None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<EntityDialogResult> {
        match key {
            KeyCode::Esc => {
                self.hide();
                Some(EntityDialogResult::Cancelled)
            }
            KeyCode::Tab => {
                self.form.next_field();
                None
            }
            KeyCode::BackTab => {
                self.form.prev_field();
                None
            }
            KeyCode::Enter => {
                if self.form.is_last_field() {
                    Some(EntityDialogResult::Submitted(self.collect()))
                } else {
                    let captured = self
                        .form
                        .focused_field_mut()
                        .is_some_and(|f| f.captures_enter());
                    if captured {
                        if let Some(field) = self.form.focused_field_mut() {
                            field.handle_key(key);
                        }
                    } else {
                        self.form.next_field();
                    }
                    None
                }
            }
            _ => {
                if let Some(field) = self.form.focused_field_mut() {
                    field.handle_key(key);
                }
                None
            }
        }
    }

    fn collect(&self) -> EntityInput {
        let v = |key: &str| self.form.value(key);
        let active = self.form.field("active").map_or(true, |f| f.is_on());
        match self.kind {
            EntityKind::Company => EntityInput::Company(CompanyInfo {
                company_name: v("companyName").trim().to_string(),
                phone: v("phone").trim().to_string(),
                address: v("address").trim().to_string(),
                about: v("about"),
            }),
            EntityKind::Work => EntityInput::Work(WorkDraft {
                title: v("title"),
                description: v("description"),
                location: v("location"),
                cost: v("cost"),
                deadline: v("deadline"),
                category: v("category"),
                images: split_list(&v("images")),
                videos: split_list(&v("videos")),
            }),
            EntityKind::Service => EntityInput::Service(ServiceDraft {
                name: v("name"),
                description: v("description"),
                expertise: Expertise::parse(&v("expertise")).unwrap_or_default(),
                is_active: active,
            }),
            EntityKind::TeamMember => EntityInput::TeamMember(TeamMemberDraft {
                name: v("name"),
                role: v("role"),
                email: optional(v("email")),
                phone: optional(v("phone")),
                department: optional(v("department")),
                is_active: active,
            }),
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        if !self.visible {
            return;
        }

        let area = centered_rect(60, 80, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(self.kind.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // Fields
                Constraint::Length(1), // Error
                Constraint::Length(1), // Instructions
            ])
            .margin(1)
            .split(inner);

        self.form.render(frame, chunks[0], |_| None);

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
                chunks[1],
            );
        }

        let instructions = Line::from(vec![
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::raw(" next field  "),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" on last field to save  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" cancel"),
        ]);
        frame.render_widget(
            Paragraph::new(instructions).alignment(Alignment::Center),
            chunks[2],
        );
    }
}

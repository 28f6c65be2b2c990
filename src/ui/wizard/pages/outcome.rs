//! Submitting, success and failure states

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::ui::wizard::WizardScreen;

impl WizardScreen {
    pub(crate) fn render_submitting(&self, frame: &mut Frame, area: Rect) {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Submitting your registration...",
                Style::default().fg(Color::Yellow),
            )),
        ];
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
    }

    pub(crate) fn render_success(&self, frame: &mut Frame, area: Rect) {
        let company = &self.controller.record().company_name;
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Registration Successful!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("{} is now listed in the directory.", company)),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "Continuing in {}s. Press Enter to continue now.",
                    self.redirect_remaining()
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
    }

    pub(crate) fn render_failure(&self, frame: &mut Frame, area: Rect) {
        if let Some(message) = self.controller.failure_message() {
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(
                        "Error: ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(message, Style::default().fg(Color::Red)),
                ])),
                area,
            );
        }
    }
}

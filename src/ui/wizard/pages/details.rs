//! Credentials and basic details pages

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};

use crate::registration::StepDraft;
use crate::ui::wizard::WizardScreen;

impl WizardScreen {
    pub(crate) fn render_details_page(&mut self, frame: &mut Frame, area: Rect) {
        let (errors, remaining) = match &self.draft {
            StepDraft::Credentials(d) => (d.errors.clone(), None),
            StepDraft::BasicDetails(d) => (d.errors.clone(), Some(d.remaining_chars())),
            _ => return,
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(1)])
            .split(area);

        self.form
            .render(frame, chunks[0], |key| errors.for_field(key).map(str::to_string));

        if let Some(remaining) = remaining {
            let style = if remaining < 0 {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("{} characters remaining", remaining),
                    style,
                )),
                chunks[1],
            );
        }
    }
}

//! Wizard page rendering

mod company_size;
mod details;
mod outcome;
mod selection;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use super::WizardScreen;
use crate::registration::{StepKind, WizardState};
use crate::ui::dialogs::centered_rect;

impl WizardScreen {
    pub fn render(&mut self, frame: &mut Frame) {
        let area = centered_rect(70, 85, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    "Business Registration",
                    Style::default()
                        .fg(Color::LightBlue)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
            ]))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1), // Step title
                Constraint::Length(1), // Progress
                Constraint::Length(1), // Spacer
                Constraint::Min(8),    // Page
                Constraint::Length(1), // Failure banner
                Constraint::Length(1), // Footer
            ])
            .split(inner);

        self.render_header(frame, chunks[0], chunks[1]);

        match self.controller.state() {
            WizardState::Submitting => self.render_submitting(frame, chunks[3]),
            WizardState::Success => self.render_success(frame, chunks[3]),
            WizardState::Step(_) | WizardState::Failed { .. } => {
                match self.controller.current_kind() {
                    StepKind::Credentials | StepKind::BasicDetails => {
                        self.render_details_page(frame, chunks[3])
                    }
                    StepKind::Services | StepKind::Locations => {
                        self.render_selection_page(frame, chunks[3])
                    }
                    StepKind::CompanySize => self.render_company_size_page(frame, chunks[3]),
                }
                self.render_failure(frame, chunks[4]);
                self.render_footer(frame, chunks[5]);
            }
        }
    }

    fn render_header(&self, frame: &mut Frame, title_area: Rect, gauge_area: Rect) {
        let title = Line::from(vec![
            Span::styled(
                format!(
                    "Step {} of {}: ",
                    self.controller.current_step(),
                    self.controller.step_count()
                ),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                self.controller.current_kind().title(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(title), title_area);

        let percent = self.controller.progress_percent();
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
            .percent(percent as u16)
            .label(format!("{}%", percent));
        frame.render_widget(gauge, gauge_area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let back = if self.controller.current_step() > 1 {
            " back  "
        } else {
            " quit  "
        };
        let mut spans = vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" continue  "),
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::raw(" next field  "),
        ];
        if matches!(
            self.controller.current_kind(),
            StepKind::Services | StepKind::Locations
        ) {
            spans.push(Span::styled("Space", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" select  "));
        }
        spans.push(Span::styled("Esc", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(back));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

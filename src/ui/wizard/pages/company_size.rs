use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::registration::{CompanySize, StepDraft};
use crate::ui::wizard::WizardScreen;

impl WizardScreen {
    pub(crate) fn render_company_size_page(&mut self, frame: &mut Frame, area: Rect) {
        let StepDraft::CompanySize(draft) = &self.draft else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(7), Constraint::Length(1)])
            .split(area);

        let items: Vec<ListItem> = CompanySize::all()
            .iter()
            .map(|size| {
                let chosen = draft.selected == Some(*size);
                let marker = if chosen { "(*) " } else { "( ) " };
                let label_style = if chosen {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, label_style),
                    Span::styled(format!("{:<20}", size.label()), label_style),
                    Span::styled(size.description(), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(" How big is your team? ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let error = draft.error().map(str::to_string);
        frame.render_stateful_widget(list, chunks[0], &mut self.size_state);

        if let Some(error) = error {
            frame.render_widget(
                Paragraph::new(Span::styled(error, Style::default().fg(Color::Red))),
                chunks[1],
            );
        }
    }
}

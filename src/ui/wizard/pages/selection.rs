//! Services and locations pages

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::registration::SelectionKind;
use crate::ui::wizard::{SelectionFocus, WizardScreen};

fn focus_style(focused: bool) -> Style {
    Style::default().fg(if focused { Color::Cyan } else { Color::Gray })
}

impl WizardScreen {
    pub(crate) fn render_selection_page(&mut self, frame: &mut Frame, area: Rect) {
        let Some(selection) = self.draft.selection_mut() else {
            return;
        };
        let (options_title, selected_title) = match selection.kind() {
            SelectionKind::Services => (" Available Services ", " Your Services "),
            SelectionKind::Locations => (" Operational Locations ", " Selected Locations "),
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(4),    // Lists
                Constraint::Length(3), // Custom input
                Constraint::Length(1), // Error
            ])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[0]);

        // Fetched options with selection markers
        let options_block = Block::default()
            .title(options_title)
            .borders(Borders::ALL)
            .border_style(focus_style(self.focus == SelectionFocus::Options));
        if self.options_loading {
            frame.render_widget(
                Paragraph::new(Span::styled("Loading...", Style::default().fg(Color::DarkGray)))
                    .block(options_block),
                columns[0],
            );
        } else if selection.options().is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "No options available. Add your own below.",
                    Style::default().fg(Color::DarkGray),
                ))
                .block(options_block),
                columns[0],
            );
        } else {
            let items: Vec<ListItem> = selection
                .options()
                .iter()
                .map(|option| {
                    let (marker, style) = if selection.is_selected(option) {
                        ("[x] ", Style::default().fg(Color::Green))
                    } else {
                        ("[ ] ", Style::default())
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(marker, style),
                        Span::styled(option.as_str(), style),
                    ]))
                })
                .collect();
            let list = List::new(items)
                .block(options_block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");
            frame.render_stateful_widget(list, columns[0], &mut self.options_state);
        }

        // Current picks, in the order they were added
        let selected_items: Vec<ListItem> = selection
            .selected()
            .iter()
            .map(|value| ListItem::new(Span::raw(value.as_str())))
            .collect();
        let selected_list = List::new(selected_items)
            .block(
                Block::default()
                    .title(selected_title)
                    .borders(Borders::ALL)
                    .border_style(focus_style(self.focus == SelectionFocus::Selected)),
            )
            .highlight_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .highlight_symbol("x ");
        frame.render_stateful_widget(selected_list, columns[1], &mut self.selected_state);

        let custom_focused = self.focus == SelectionFocus::Custom;
        let custom_block = Block::default()
            .title(" Add (Enter) ")
            .borders(Borders::ALL)
            .border_style(focus_style(custom_focused));
        let custom_area = custom_block.inner(chunks[1]);
        frame.render_widget(custom_block, chunks[1]);
        self.custom.render(frame, custom_area, custom_focused);

        if let Some(error) = selection.error() {
            frame.render_widget(
                Paragraph::new(Span::styled(error, Style::default().fg(Color::Red))),
                chunks[2],
            );
        }
    }
}

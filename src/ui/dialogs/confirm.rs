use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crossterm::event::KeyCode;

use super::centered_rect;

/// Yes/No prompt guarding destructive list actions
pub struct ConfirmDialog {
    pub visible: bool,
    pub title: String,
    pub message: String,
    /// true while "Yes" is highlighted
    pub yes_selected: bool,
}

impl ConfirmDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            title: String::new(),
            message: String::new(),
            yes_selected: false,
        }
    }

    pub fn show(&mut self, title: &str, message: impl Into<String>) {
        self.title = title.to_string();
        self.message = message.into();
        self.yes_selected = false;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// `Some(answer)` once the user decides; the dialog hides itself
    pub fn handle_key(&mut self, key: KeyCode) -> Option<bool> {
        let answer = match key {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                self.yes_selected = !self.yes_selected;
                None
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(false),
            KeyCode::Enter => Some(self.yes_selected),
            _ => None,
        };
        if answer.is_some() {
            self.hide();
        }
        answer
    }

    pub fn render(&self, frame: &mut Frame) {
        if !self.visible {
            return;
        }

        let area = centered_rect(50, 25, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(2), Constraint::Length(1)])
            .margin(1)
            .split(inner);

        frame.render_widget(
            Paragraph::new(self.message.as_str())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            chunks[0],
        );

        let selected = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let normal = Style::default().fg(Color::Gray);
        let buttons = Line::from(vec![
            Span::styled(" Yes ", if self.yes_selected { selected } else { normal }),
            Span::raw("   "),
            Span::styled(" No ", if self.yes_selected { normal } else { selected }),
        ]);
        frame.render_widget(
            Paragraph::new(buttons).alignment(Alignment::Center),
            chunks[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_no() {
        let mut dialog = ConfirmDialog::new();
        dialog.show("Remove Service", "Remove Roofing?");
        assert!(dialog.visible);
        assert_eq!(dialog.handle_key(KeyCode::Enter), Some(false));
        assert!(!dialog.visible);
    }

    #[test]
    fn test_toggle_then_confirm() {
        let mut dialog = ConfirmDialog::new();
        dialog.show("Remove Service", "Remove Roofing?");
        assert_eq!(dialog.handle_key(KeyCode::Left), None);
        assert_eq!(dialog.handle_key(KeyCode::Enter), Some(true));
    }

    #[test]
    fn test_shortcut_keys() {
        let mut dialog = ConfirmDialog::new();
        dialog.show("t", "m");
        assert_eq!(dialog.handle_key(KeyCode::Char('y')), Some(true));
        dialog.show("t", "m");
        assert_eq!(dialog.handle_key(KeyCode::Esc), Some(false));
    }
}

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;
use crate::templates::TemplateId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewAction {
    None,
    Close,
    Activate(TemplateId),
}

/// Read-only view of a rendered template
pub struct PreviewDialog {
    pub visible: bool,
    pub template: Option<TemplateId>,
    pub content: String,
    pub scroll: u16,
}

impl PreviewDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            template: None,
            content: String::new(),
            scroll: 0,
        }
    }

    pub fn show(&mut self, template: TemplateId, content: String) {
        self.template = Some(template);
        self.content = content;
        self.scroll = 0;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.template = None;
        self.content.clear();
    }

    pub fn handle_key(&mut self, key: KeyCode) -> PreviewAction {
        match key {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.hide();
                PreviewAction::Close
            }
            KeyCode::Enter | KeyCode::Char('a') => match self.template {
                Some(template) => {
                    self.hide();
                    PreviewAction::Activate(template)
                }
                None => PreviewAction::None,
            },
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                PreviewAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.content.lines().count().saturating_sub(1) as u16;
                self.scroll = (self.scroll + 1).min(max);
                PreviewAction::None
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
                PreviewAction::None
            }
            KeyCode::PageDown => {
                let max = self.content.lines().count().saturating_sub(1) as u16;
                self.scroll = (self.scroll + 10).min(max);
                PreviewAction::None
            }
            _ => PreviewAction::None,
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        if !self.visible {
            return;
        }
        let Some(template) = self.template else {
            return;
        };

        let area = centered_rect(80, 85, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(format!(" Preview: {} ", template))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(inner);

        let lines: Vec<Line> = self
            .content
            .lines()
            .map(|line| {
                if let Some(heading) = line.strip_prefix('#') {
                    Line::from(Span::styled(
                        heading.trim_start_matches('#').trim().to_string(),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(line.to_string())
                }
            })
            .collect();

        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0)),
            chunks[0],
        );

        let instructions = Line::from(vec![
            Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
            Span::raw(" scroll  "),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" activate  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" close"),
        ]);
        frame.render_widget(
            Paragraph::new(instructions).alignment(Alignment::Center),
            chunks[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_returns_previewed_template() {
        let mut dialog = PreviewDialog::new();
        dialog.show(TemplateId::Modern, "# Acme\nline".to_string());
        assert_eq!(
            dialog.handle_key(KeyCode::Enter),
            PreviewAction::Activate(TemplateId::Modern)
        );
        assert!(!dialog.visible);
    }

    #[test]
    fn test_close_does_not_activate() {
        let mut dialog = PreviewDialog::new();
        dialog.show(TemplateId::Modern, String::new());
        assert_eq!(dialog.handle_key(KeyCode::Esc), PreviewAction::Close);
        assert_eq!(dialog.template, None);
    }

    #[test]
    fn test_scroll_is_clamped_to_content() {
        let mut dialog = PreviewDialog::new();
        dialog.show(TemplateId::Classic, "a\nb\nc".to_string());
        for _ in 0..5 {
            dialog.handle_key(KeyCode::Down);
        }
        assert_eq!(dialog.scroll, 2);
        dialog.handle_key(KeyCode::PageUp);
        assert_eq!(dialog.scroll, 0);
    }
}

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;

/// Profile editor shortcuts: (key, description)
pub(crate) const EDITOR_SHORTCUTS: &[(&str, &str)] = &[
    ("Tab/Shift+Tab", "Switch section"),
    ("↑/↓", "Move selection"),
    ("a", "Add item to section"),
    ("d", "Delete selected item"),
    ("Space", "Toggle service or member visibility"),
    ("e", "Edit company info"),
    ("p", "Preview selected template"),
    ("Enter", "Activate selected template"),
    ("s", "Save profile"),
    ("?", "Toggle this help"),
    ("q", "Quit"),
];

pub struct HelpDialog {
    pub visible: bool,
}

impl HelpDialog {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn render(&self, frame: &mut Frame) {
        if !self.visible {
            return;
        }

        let area = centered_rect(60, 70, frame.area());
        frame.render_widget(Clear, area);

        let mut help_text = vec![
            Line::from(Span::styled(
                "Keyboard Shortcuts",
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(Color::Cyan),
            )),
            Line::from(""),
        ];

        for (key, description) in EDITOR_SHORTCUTS {
            help_text.push(Line::from(vec![
                Span::styled(format!("{:<16}", key), Style::default().fg(Color::Yellow)),
                Span::raw(*description),
            ]));
        }

        help_text.push(Line::from(""));
        help_text.push(Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::Gray),
        )));

        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .alignment(Alignment::Left);

        frame.render_widget(help, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_dialog_toggle() {
        let mut dialog = HelpDialog::new();
        assert!(!dialog.visible);

        dialog.toggle();
        assert!(dialog.visible);

        dialog.toggle();
        assert!(!dialog.visible);
    }

    #[test]
    fn test_every_shortcut_has_a_description() {
        assert!(EDITOR_SHORTCUTS.iter().all(|(k, d)| !k.is_empty() && !d.is_empty()));
    }
}

//! Reusable form field widgets for wizard pages and editor dialogs

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

/// A form field widget that can handle different input types
pub enum FormField {
    /// Single-line text input; `cursor` counts characters, not bytes
    TextInput {
        value: String,
        cursor: usize,
        placeholder: String,
        max_length: Option<usize>,
        masked: bool,
    },
    /// Multi-line text input using tui-textarea
    TextArea {
        textarea: Box<TextArea<'static>>,
        placeholder: String,
    },
    /// Selection from predefined options
    EnumSelect {
        options: Vec<String>,
        selected: usize,
        list_state: ListState,
    },
    /// Boolean toggle
    Toggle {
        value: bool,
        true_label: String,
        false_label: String,
    },
    /// Date input (YYYY-MM-DD format)
    DateInput { value: String, cursor: usize },
}

fn byte_index(value: &str, char_pos: usize) -> usize {
    value
        .char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(value.len())
}

impl FormField {
    pub fn text(placeholder: &str) -> Self {
        FormField::TextInput {
            value: String::new(),
            cursor: 0,
            placeholder: placeholder.to_string(),
            max_length: None,
            masked: false,
        }
    }

    pub fn password(placeholder: &str) -> Self {
        FormField::TextInput {
            value: String::new(),
            cursor: 0,
            placeholder: placeholder.to_string(),
            max_length: None,
            masked: true,
        }
    }

    /// Text input showing a `(n/max)` counter
    pub fn limited_text(placeholder: &str, max_length: usize) -> Self {
        FormField::TextInput {
            value: String::new(),
            cursor: 0,
            placeholder: placeholder.to_string(),
            max_length: Some(max_length),
            masked: false,
        }
    }

    pub fn text_area(placeholder: &str) -> Self {
        FormField::TextArea {
            textarea: Box::new(TextArea::default()),
            placeholder: placeholder.to_string(),
        }
    }

    pub fn select(options: Vec<String>) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        FormField::EnumSelect {
            options,
            selected: 0,
            list_state,
        }
    }

    pub fn toggle(value: bool, true_label: &str, false_label: &str) -> Self {
        FormField::Toggle {
            value,
            true_label: true_label.to_string(),
            false_label: false_label.to_string(),
        }
    }

    pub fn date() -> Self {
        FormField::DateInput {
            value: String::new(),
            cursor: 0,
        }
    }

    /// Get the current value as a string
    pub fn value(&self) -> String {
        match self {
            FormField::TextInput { value, .. } => value.clone(),
            FormField::TextArea { textarea, .. } => textarea.lines().join("\n"),
            FormField::EnumSelect {
                options, selected, ..
            } => options.get(*selected).cloned().unwrap_or_default(),
            FormField::Toggle { value, .. } => value.to_string(),
            FormField::DateInput { value, .. } => value.clone(),
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, FormField::Toggle { value: true, .. })
    }

    /// Set the value from a string
    pub fn set_value(&mut self, new_value: &str) {
        match self {
            FormField::TextInput { value, cursor, .. } | FormField::DateInput { value, cursor } => {
                *value = new_value.to_string();
                *cursor = value.chars().count();
            }
            FormField::TextArea { textarea, .. } => {
                textarea.select_all();
                textarea.cut();
                textarea.insert_str(new_value);
            }
            FormField::EnumSelect {
                options,
                selected,
                list_state,
            } => {
                if let Some(idx) = options.iter().position(|o| o == new_value) {
                    *selected = idx;
                    list_state.select(Some(idx));
                }
            }
            FormField::Toggle { value, .. } => {
                *value = new_value == "true" || new_value == "yes";
            }
        }
    }

    /// Whether Enter is consumed by the field itself (newline in a text area)
    pub fn captures_enter(&self) -> bool {
        matches!(self, FormField::TextArea { .. })
    }

    /// Handle a key event, returns true if the key was consumed
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match self {
            FormField::TextInput {
                value,
                cursor,
                max_length,
                ..
            } => edit_line(value, cursor, key, |value, c| {
                max_length.map(|m| value.chars().count() < m).unwrap_or(true) && !c.is_control()
            }),
            FormField::DateInput { value, cursor } => edit_line(value, cursor, key, |value, c| {
                (c.is_ascii_digit() || c == '-') && value.len() < 10
            }),
            FormField::TextArea { textarea, .. } => {
                textarea.input(KeyEvent::new(key, KeyModifiers::NONE));
                true
            }
            FormField::EnumSelect {
                options,
                selected,
                list_state,
            } => match key {
                KeyCode::Up => {
                    if *selected > 0 {
                        *selected -= 1;
                        list_state.select(Some(*selected));
                    }
                    true
                }
                KeyCode::Down => {
                    if *selected < options.len().saturating_sub(1) {
                        *selected += 1;
                        list_state.select(Some(*selected));
                    }
                    true
                }
                _ => false,
            },
            FormField::Toggle { value, .. } => match key {
                KeyCode::Char(' ') => {
                    *value = !*value;
                    true
                }
                KeyCode::Left => {
                    *value = true;
                    true
                }
                KeyCode::Right => {
                    *value = false;
                    true
                }
                _ => false,
            },
        }
    }

    /// Get the height needed to render this field
    pub fn render_height(&self) -> u16 {
        match self {
            FormField::TextArea { .. } => 5,
            FormField::EnumSelect { options, .. } => (options.len() as u16).clamp(1, 5),
            _ => 1,
        }
    }

    /// Render the field
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_color = if focused { Color::Cyan } else { Color::Gray };
        let text_style = Style::default().fg(if focused { Color::White } else { Color::Gray });

        match self {
            FormField::TextInput {
                value,
                cursor,
                placeholder,
                max_length,
                masked,
            } => {
                if value.is_empty() && !focused {
                    let line = Line::from(Span::styled(
                        placeholder.as_str(),
                        Style::default().fg(Color::DarkGray),
                    ));
                    frame.render_widget(Paragraph::new(line), area);
                    return;
                }

                let mut text = if *masked {
                    "*".repeat(value.chars().count())
                } else {
                    value.clone()
                };
                if focused {
                    text.insert(byte_index(&text, *cursor), '|');
                }

                let suffix = max_length
                    .map(|m| format!(" ({}/{})", value.chars().count(), m))
                    .unwrap_or_default();

                let line = Line::from(vec![
                    Span::raw(text),
                    Span::styled(suffix, Style::default().fg(Color::DarkGray)),
                ]);
                frame.render_widget(Paragraph::new(line).style(text_style), area);
            }
            FormField::TextArea {
                textarea,
                placeholder,
            } => {
                textarea.set_cursor_line_style(Style::default());
                textarea.set_cursor_style(if focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                });
                textarea.set_block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border_color)),
                );

                if textarea.lines().iter().all(|l| l.is_empty()) && !focused {
                    textarea.set_placeholder_text(placeholder.clone());
                    textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));
                }

                frame.render_widget(&**textarea, area);
            }
            FormField::EnumSelect {
                options,
                selected,
                list_state,
            } => {
                let items: Vec<ListItem> = options
                    .iter()
                    .enumerate()
                    .map(|(i, opt)| {
                        let style = if i == *selected {
                            Style::default().add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(Color::Gray)
                        };
                        ListItem::new(Span::styled(opt.as_str(), style))
                    })
                    .collect();

                let mut list = List::new(items);
                if focused {
                    list = list
                        .highlight_style(
                            Style::default()
                                .add_modifier(Modifier::REVERSED)
                                .fg(Color::Cyan),
                        )
                        .highlight_symbol("> ");
                }
                frame.render_stateful_widget(list, area, list_state);
            }
            FormField::Toggle {
                value,
                true_label,
                false_label,
            } => {
                let on_style = if *value {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                let off_style = if !*value {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };

                let line = Line::from(vec![
                    Span::styled(format!("[{}]", true_label), on_style),
                    Span::raw(" / "),
                    Span::styled(format!("[{}]", false_label), off_style),
                ]);
                frame.render_widget(Paragraph::new(line), area);
            }
            FormField::DateInput { value, cursor } => {
                let display = if value.is_empty() && !focused {
                    Line::from(Span::styled(
                        "YYYY-MM-DD",
                        Style::default().fg(Color::DarkGray),
                    ))
                } else {
                    let mut text = value.clone();
                    if focused {
                        text.insert(byte_index(&text, *cursor), '|');
                    }
                    Line::from(text)
                };
                frame.render_widget(Paragraph::new(display).style(text_style), area);
            }
        }
    }
}

/// Shared single-line editing; `accept` decides whether a typed char is inserted
fn edit_line(
    value: &mut String,
    cursor: &mut usize,
    key: KeyCode,
    accept: impl Fn(&str, char) -> bool,
) -> bool {
    let len = value.chars().count();
    match key {
        KeyCode::Char(c) => {
            if accept(value, c) {
                value.insert(byte_index(value, *cursor), c);
                *cursor += 1;
            }
            true
        }
        KeyCode::Backspace => {
            if *cursor > 0 {
                *cursor -= 1;
                value.remove(byte_index(value, *cursor));
            }
            true
        }
        KeyCode::Delete => {
            if *cursor < len {
                value.remove(byte_index(value, *cursor));
            }
            true
        }
        KeyCode::Left => {
            *cursor = cursor.saturating_sub(1);
            true
        }
        KeyCode::Right => {
            if *cursor < len {
                *cursor += 1;
            }
            true
        }
        KeyCode::Home => {
            *cursor = 0;
            true
        }
        KeyCode::End => {
            *cursor = len;
            true
        }
        _ => false,
    }
}

/// One labelled entry in a `Form`
pub struct FormEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub field: FormField,
}

/// Ordered labelled fields with a focus cursor
#[derive(Default)]
pub struct Form {
    pub entries: Vec<FormEntry>,
    pub focused_index: usize,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, label: &'static str, field: FormField) -> Self {
        self.entries.push(FormEntry { key, label, field });
        self
    }

    pub fn value(&self, key: &str) -> String {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.field.value())
            .unwrap_or_default()
    }

    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.field)
    }

    pub fn set_value(&mut self, key: &str, value: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.field.set_value(value);
        }
    }

    pub fn focused_key(&self) -> Option<&'static str> {
        self.entries.get(self.focused_index).map(|e| e.key)
    }

    pub fn focused_field_mut(&mut self) -> Option<&mut FormField> {
        self.entries.get_mut(self.focused_index).map(|e| &mut e.field)
    }

    pub fn next_field(&mut self) {
        if self.focused_index < self.entries.len().saturating_sub(1) {
            self.focused_index += 1;
        }
    }

    pub fn prev_field(&mut self) {
        if self.focused_index > 0 {
            self.focused_index -= 1;
        }
    }

    pub fn is_last_field(&self) -> bool {
        self.focused_index >= self.entries.len().saturating_sub(1)
    }

    /// Render label + field rows; `error_for` supplies inline messages by key
    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        error_for: impl Fn(&str) -> Option<String>,
    ) {
        let mut constraints = Vec::new();
        for entry in &self.entries {
            constraints.push(Constraint::Length(1));
            constraints.push(Constraint::Length(entry.field.render_height()));
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Min(0));

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let focused_index = self.focused_index;
        for (i, entry) in self.entries.iter_mut().enumerate() {
            let focused = i == focused_index;
            let label_style = if focused {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            frame.render_widget(
                Paragraph::new(Span::styled(entry.label, label_style)),
                rows[i * 3],
            );
            entry.field.render(frame, rows[i * 3 + 1], focused);
            if let Some(message) = error_for(entry.key) {
                frame.render_widget(
                    Paragraph::new(Span::styled(message, Style::default().fg(Color::Red))),
                    rows[i * 3 + 2],
                );
            }
        }
    }
}

//! Profile editor rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use super::{EditorTab, ProfileScreen};
use crate::profile::{LoadState, NoticeKind};
use crate::templates::{format_deadline, TemplateId};

fn visibility(active: bool) -> Span<'static> {
    if active {
        Span::styled("[Active] ", Style::default().fg(Color::Green))
    } else {
        Span::styled("[Hidden] ", Style::default().fg(Color::DarkGray))
    }
}

fn field_line(label: &str, value: &str) -> Line<'static> {
    let shown = if value.trim().is_empty() {
        Span::styled("(not set)", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(value.to_string())
    };
    Line::from(vec![
        Span::styled(format!("{:<14}", label), Style::default().fg(Color::Yellow)),
        shown,
    ])
}

impl ProfileScreen {
    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Min(5),    // Body
                Constraint::Length(3), // Status
            ])
            .split(frame.area());

        let titles: Vec<Line> = EditorTab::all()
            .iter()
            .map(|t| Line::from(t.label()))
            .collect();
        let selected_tab = EditorTab::all()
            .iter()
            .position(|t| *t == self.tab)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .title(" Business Profile ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .select(selected_tab)
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, chunks[0]);

        match self.editor.state().clone() {
            LoadState::Loading => {
                frame.render_widget(
                    Paragraph::new("Loading profile...").alignment(Alignment::Center),
                    chunks[1],
                );
            }
            LoadState::Failed(message) => {
                let text = vec![
                    Line::from(Span::styled(message, Style::default().fg(Color::Red))),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Press r to retry or q to quit",
                        Style::default().fg(Color::Gray),
                    )),
                ];
                frame.render_widget(
                    Paragraph::new(text).alignment(Alignment::Center),
                    chunks[1],
                );
            }
            LoadState::Ready => match self.tab {
                EditorTab::Company => self.render_company(frame, chunks[1]),
                EditorTab::Services => self.render_services(frame, chunks[1]),
                EditorTab::Portfolio => self.render_portfolio(frame, chunks[1]),
                EditorTab::Team => self.render_team(frame, chunks[1]),
                EditorTab::Templates => self.render_templates(frame, chunks[1]),
            },
        }

        self.render_status(frame, chunks[2]);

        self.entity_dialog.render(frame);
        self.confirm.render(frame);
        self.preview.render(frame);
        self.help.render(frame);
    }

    fn render_company(&self, frame: &mut Frame, area: Rect) {
        let company = &self.editor.data().company;
        let mut lines = vec![
            field_line("Company Name", &company.company_name),
            field_line("Phone", &company.phone),
            field_line("Address", &company.address),
            Line::from(""),
            Line::from(Span::styled("About", Style::default().fg(Color::Yellow))),
        ];
        lines.extend(company.about.lines().map(|l| Line::from(l.to_string())));

        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .title(" Company Info (e to edit) ")
                        .borders(Borders::ALL),
                ),
            area,
        );
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect, title: &str, items: Vec<ListItem>) {
        if items.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Nothing here yet. Press a to add one.",
                    Style::default().fg(Color::DarkGray),
                ))
                .block(Block::default().title(title.to_string()).borders(Borders::ALL)),
                area,
            );
            return;
        }
        let list = List::new(items)
            .block(Block::default().title(title.to_string()).borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_services(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .editor
            .data()
            .services
            .iter()
            .map(|s| {
                ListItem::new(Line::from(vec![
                    visibility(s.is_active),
                    Span::styled(s.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(
                        format!(" ({})", s.expertise.label()),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(if s.description.is_empty() {
                        String::new()
                    } else {
                        format!("  {}", s.description)
                    }),
                ]))
            })
            .collect();
        self.render_list(frame, area, " Services ", items);
    }

    fn render_portfolio(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .editor
            .data()
            .works
            .iter()
            .map(|w| {
                let mut details = Vec::new();
                for part in [&w.category, &w.location] {
                    if !part.is_empty() {
                        details.push(part.clone());
                    }
                }
                if !w.deadline.is_empty() {
                    details.push(format_deadline(&w.deadline));
                }
                details.push(format!("{} images, {} videos", w.images.len(), w.videos.len()));
                ListItem::new(Line::from(vec![
                    Span::styled(w.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(
                        format!("  {}", details.join(" | ")),
                        Style::default().fg(Color::Gray),
                    ),
                ]))
            })
            .collect();
        self.render_list(frame, area, " Portfolio ", items);
    }

    fn render_team(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .editor
            .data()
            .team_members
            .iter()
            .map(|m| {
                let contact = [&m.email, &m.phone, &m.department]
                    .into_iter()
                    .flatten()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ");
                ListItem::new(Line::from(vec![
                    visibility(m.is_active),
                    Span::styled(m.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(format!(", {}", m.role)),
                    Span::styled(
                        if contact.is_empty() {
                            String::new()
                        } else {
                            format!("  {}", contact)
                        },
                        Style::default().fg(Color::Gray),
                    ),
                ]))
            })
            .collect();
        self.render_list(frame, area, " Team ", items);
    }

    fn render_templates(&mut self, frame: &mut Frame, area: Rect) {
        let active = self.editor.data().active_template;
        let items: Vec<ListItem> = TemplateId::all()
            .iter()
            .map(|t| {
                let marker = if *t == active {
                    Span::styled("(active) ", Style::default().fg(Color::Green))
                } else {
                    Span::raw("         ")
                };
                ListItem::new(Line::from(vec![
                    marker,
                    Span::styled(
                        format!("{:<24}", t.to_string()),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(t.description(), Style::default().fg(Color::Gray)),
                ]))
            })
            .collect();
        self.render_list(
            frame,
            area,
            " Templates (p preview, Enter activate) ",
            items,
        );
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = if self.editor.is_saving() {
            Line::from(Span::styled("Saving...", Style::default().fg(Color::Yellow)))
        } else if let Some(status) = &self.status {
            Line::from(Span::styled(status.clone(), Style::default().fg(Color::Red)))
        } else if let Some(notice) = self.editor.latest_notice() {
            let color = match notice.kind {
                NoticeKind::Info => Color::Green,
                NoticeKind::Error => Color::Red,
            };
            Line::from(vec![
                Span::styled(
                    format!("{}: ", notice.title),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(notice.description.clone()),
            ])
        } else {
            Line::from(vec![
                Span::styled("?", Style::default().fg(Color::Yellow)),
                Span::raw(" help  "),
                Span::styled("s", Style::default().fg(Color::Yellow)),
                Span::raw(" save  "),
                Span::styled("q", Style::default().fg(Color::Yellow)),
                Span::raw(" quit"),
            ])
        };
        frame.render_widget(
            Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
            area,
        );
    }
}

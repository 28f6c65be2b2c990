//! Profile editor screen: tabbed lists over `ProfileEditor` with popup forms

use crossterm::event::KeyCode;
use ratatui::widgets::ListState;
use tracing::warn;

use crate::api::ProfileApi;
use crate::profile::{EditorError, EntityId, ProfileEditor};
use crate::templates::{TemplateId, TemplateRenderer};
use crate::ui::dialogs::{
    ConfirmDialog, EntityDialog, EntityDialogResult, EntityInput, EntityKind, HelpDialog,
    PreviewAction, PreviewDialog,
};

mod render;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorTab {
    Company,
    Services,
    Portfolio,
    Team,
    Templates,
}

impl EditorTab {
    pub fn all() -> &'static [EditorTab] {
        &[
            EditorTab::Company,
            EditorTab::Services,
            EditorTab::Portfolio,
            EditorTab::Team,
            EditorTab::Templates,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            EditorTab::Company => "Company",
            EditorTab::Services => "Services",
            EditorTab::Portfolio => "Portfolio",
            EditorTab::Team => "Team",
            EditorTab::Templates => "Templates",
        }
    }

    fn index(&self) -> usize {
        Self::all().iter().position(|t| t == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::all()[(self.index() + 1) % Self::all().len()]
    }

    fn prev(self) -> Self {
        let len = Self::all().len();
        Self::all()[(self.index() + len - 1) % len]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    Quit,
    Save,
    Reload,
}

pub struct ProfileScreen {
    pub(crate) editor: ProfileEditor,
    renderer: TemplateRenderer,
    pub(crate) tab: EditorTab,
    pub(crate) list_state: ListState,
    pub(crate) entity_dialog: EntityDialog,
    pub(crate) confirm: ConfirmDialog,
    pub(crate) preview: PreviewDialog,
    pub(crate) help: HelpDialog,
    /// Screen-local problems that are not editor notices (template errors)
    pub(crate) status: Option<String>,
    pending_delete: Option<EntityId>,
}

impl ProfileScreen {
    pub fn new(editor: ProfileEditor, renderer: TemplateRenderer) -> Self {
        Self {
            editor,
            renderer,
            tab: EditorTab::Company,
            list_state: ListState::default(),
            entity_dialog: EntityDialog::new(),
            confirm: ConfirmDialog::new(),
            preview: PreviewDialog::new(),
            help: HelpDialog::new(),
            status: None,
            pending_delete: None,
        }
    }

    pub fn editor(&self) -> &ProfileEditor {
        &self.editor
    }

    pub async fn load(&mut self, api: &dyn ProfileApi) -> Result<(), EditorError> {
        let result = self.editor.load(api).await;
        self.reset_selection();
        result
    }

    pub async fn save(&mut self, api: &dyn ProfileApi) -> Result<(), EditorError> {
        self.editor.save(api).await
    }

    fn item_count(&self) -> usize {
        let data = self.editor.data();
        match self.tab {
            EditorTab::Company => 0,
            EditorTab::Services => data.services.len(),
            EditorTab::Portfolio => data.works.len(),
            EditorTab::Team => data.team_members.len(),
            EditorTab::Templates => TemplateId::all().len(),
        }
    }

    fn reset_selection(&mut self) {
        let selected = if self.tab == EditorTab::Templates {
            let active = self.editor.data().active_template;
            TemplateId::all().iter().position(|t| *t == active)
        } else if self.item_count() > 0 {
            Some(0)
        } else {
            None
        };
        self.list_state.select(selected);
    }

    fn clamp_selection(&mut self) {
        let count = self.item_count();
        match self.list_state.selected() {
            Some(_) if count == 0 => self.list_state.select(None),
            Some(i) if i >= count => self.list_state.select(Some(count - 1)),
            None if count > 0 => self.list_state.select(Some(0)),
            _ => {}
        }
    }

    /// Id of the highlighted row on the current list tab
    fn selected_id(&self) -> Option<EntityId> {
        let index = self.list_state.selected()?;
        let data = self.editor.data();
        match self.tab {
            EditorTab::Services => data.services.get(index).map(|s| s.id.clone()),
            EditorTab::Portfolio => data.works.get(index).map(|w| w.id.clone()),
            EditorTab::Team => data.team_members.get(index).map(|m| m.id.clone()),
            EditorTab::Company | EditorTab::Templates => None,
        }
    }

    fn selected_template(&self) -> TemplateId {
        self.list_state
            .selected()
            .and_then(|i| TemplateId::all().get(i).copied())
            .unwrap_or(self.editor.data().active_template)
    }

    pub fn handle_key(&mut self, key: KeyCode) -> EditorAction {
        if self.help.visible {
            self.help.toggle();
            return EditorAction::None;
        }
        if self.preview.visible {
            match self.preview.handle_key(key) {
                PreviewAction::Activate(template) => self.editor.activate_template(template),
                PreviewAction::Close => self.editor.close_preview(),
                PreviewAction::None => {}
            }
            return EditorAction::None;
        }
        if self.confirm.visible {
            if self.confirm.handle_key(key) == Some(true) {
                self.delete_pending();
            } else if !self.confirm.visible {
                self.pending_delete = None;
            }
            return EditorAction::None;
        }
        if self.entity_dialog.visible {
            if let Some(EntityDialogResult::Submitted(input)) = self.entity_dialog.handle_key(key) {
                self.apply(input);
            }
            return EditorAction::None;
        }

        if !self.editor.is_ready() {
            return match key {
                KeyCode::Char('q') | KeyCode::Esc => EditorAction::Quit,
                KeyCode::Char('r') => EditorAction::Reload,
                _ => EditorAction::None,
            };
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => return EditorAction::Quit,
            KeyCode::Char('s') => {
                if !self.editor.is_saving() {
                    return EditorAction::Save;
                }
            }
            KeyCode::Char('?') => self.help.toggle(),
            KeyCode::Tab | KeyCode::Right => {
                self.tab = self.tab.next();
                self.reset_selection();
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.tab = self.tab.prev();
                self.reset_selection();
            }
            KeyCode::Up => {
                if let Some(i) = self.list_state.selected() {
                    self.list_state.select(Some(i.saturating_sub(1)));
                }
            }
            KeyCode::Down => {
                let count = self.item_count();
                if let Some(i) = self.list_state.selected() {
                    if i + 1 < count {
                        self.list_state.select(Some(i + 1));
                    }
                }
            }
            KeyCode::Char('e') => self.entity_dialog.show_company(&self.editor.data().company),
            KeyCode::Char('a') => match self.tab {
                EditorTab::Company => self.entity_dialog.show_company(&self.editor.data().company),
                EditorTab::Services => self.entity_dialog.show(EntityKind::Service),
                EditorTab::Portfolio => self.entity_dialog.show(EntityKind::Work),
                EditorTab::Team => self.entity_dialog.show(EntityKind::TeamMember),
                EditorTab::Templates => {}
            },
            KeyCode::Char('d') | KeyCode::Delete => self.ask_delete(),
            KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('p') => {
                let template = if self.tab == EditorTab::Templates {
                    self.selected_template()
                } else {
                    self.editor.data().active_template
                };
                self.open_preview(template);
            }
            KeyCode::Enter => {
                if self.tab == EditorTab::Templates {
                    let template = self.selected_template();
                    self.editor.activate_template(template);
                }
            }
            _ => {}
        }
        EditorAction::None
    }

    fn apply(&mut self, input: EntityInput) {
        let result = match input {
            EntityInput::Company(info) => self.editor.set_company_info(info),
            EntityInput::Work(draft) => self.editor.add_work(draft).map(|_| ()),
            EntityInput::Service(draft) => self.editor.add_service(draft).map(|_| ()),
            EntityInput::TeamMember(draft) => self.editor.add_member(draft).map(|_| ()),
        };
        match result {
            Ok(()) => {
                self.entity_dialog.hide();
                self.clamp_selection();
            }
            Err(EditorError::Invalid(e)) => self.entity_dialog.set_error(e.message),
            Err(e) => {
                warn!(error = %e, "entity change refused");
                self.entity_dialog.set_error(e.to_string());
            }
        }
    }

    fn ask_delete(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let data = self.editor.data();
        let (title, name) = match self.tab {
            EditorTab::Services => (
                "Remove Service",
                data.services.iter().find(|s| s.id == id).map(|s| s.name.clone()),
            ),
            EditorTab::Portfolio => (
                "Remove Work",
                data.works.iter().find(|w| w.id == id).map(|w| w.title.clone()),
            ),
            EditorTab::Team => (
                "Remove Team Member",
                data.team_members.iter().find(|m| m.id == id).map(|m| m.name.clone()),
            ),
            EditorTab::Company | EditorTab::Templates => return,
        };
        self.confirm.show(
            title,
            format!("Remove {}?", name.unwrap_or_else(|| id.to_string())),
        );
        self.pending_delete = Some(id);
    }

    fn delete_pending(&mut self) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        match self.tab {
            EditorTab::Services => self.editor.remove_service(&id),
            EditorTab::Portfolio => self.editor.remove_work(&id),
            EditorTab::Team => self.editor.remove_member(&id),
            EditorTab::Company | EditorTab::Templates => false,
        };
        self.clamp_selection();
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let data = self.editor.data();
        match self.tab {
            EditorTab::Services => {
                let active = data.services.iter().find(|s| s.id == id).map(|s| s.is_active);
                if let Some(active) = active {
                    self.editor.toggle_service(&id, !active);
                }
            }
            EditorTab::Team => {
                let active = data.team_members.iter().find(|m| m.id == id).map(|m| m.is_active);
                if let Some(active) = active {
                    self.editor.toggle_member(&id, !active);
                }
            }
            _ => {}
        }
    }

    fn open_preview(&mut self, template: TemplateId) {
        match self.editor.preview_template(&self.renderer, template) {
            Ok(content) => {
                self.status = None;
                self.preview.show(template, content);
            }
            Err(e) => {
                warn!(error = %e, template = template.as_str(), "template preview failed");
                self.status = Some(format!("Could not render {}", template.display_name()));
            }
        }
    }
}

//! Tests for the profile editor screen

use super::*;
use crate::profile::{ProfileData, ServiceDraft};

fn screen() -> ProfileScreen {
    ProfileScreen::new(
        ProfileEditor::with_data(ProfileData::default()),
        TemplateRenderer::new().unwrap(),
    )
}

fn type_text(screen: &mut ProfileScreen, text: &str) {
    for c in text.chars() {
        screen.handle_key(KeyCode::Char(c));
    }
}

fn goto(screen: &mut ProfileScreen, tab: EditorTab) {
    while screen.tab != tab {
        screen.handle_key(KeyCode::Tab);
    }
}

fn with_service(screen: &mut ProfileScreen, name: &str) {
    screen
        .editor
        .add_service(ServiceDraft {
            name: name.to_string(),
            ..ServiceDraft::default()
        })
        .unwrap();
}

#[test]
fn test_tabs_wrap_around() {
    let mut screen = screen();
    screen.handle_key(KeyCode::BackTab);
    assert_eq!(screen.tab, EditorTab::Templates);
    screen.handle_key(KeyCode::Tab);
    assert_eq!(screen.tab, EditorTab::Company);
}

#[test]
fn test_add_service_through_dialog() {
    let mut screen = screen();
    goto(&mut screen, EditorTab::Services);

    screen.handle_key(KeyCode::Char('a'));
    assert!(screen.entity_dialog.visible);
    type_text(&mut screen, "Roofing");
    for _ in 0..3 {
        screen.handle_key(KeyCode::Tab);
    }
    screen.handle_key(KeyCode::Enter);

    assert!(!screen.entity_dialog.visible);
    assert_eq!(screen.editor().data().services.len(), 1);
    assert_eq!(screen.editor().data().services[0].name, "Roofing");
    assert_eq!(screen.list_state.selected(), Some(0));
}

#[test]
fn test_invalid_entity_keeps_dialog_open() {
    let mut screen = screen();
    goto(&mut screen, EditorTab::Team);

    screen.handle_key(KeyCode::Char('a'));
    type_text(&mut screen, "Dana");
    screen.entity_dialog.form.focused_index = screen.entity_dialog.form.entries.len() - 1;
    screen.handle_key(KeyCode::Enter);

    assert!(screen.entity_dialog.visible);
    assert_eq!(screen.entity_dialog.error.as_deref(), Some("Role is required"));
    assert!(screen.editor().data().team_members.is_empty());
}

#[test]
fn test_delete_requires_confirmation() {
    let mut screen = screen();
    with_service(&mut screen, "Roofing");
    goto(&mut screen, EditorTab::Services);

    screen.handle_key(KeyCode::Char('d'));
    assert!(screen.confirm.visible);
    screen.handle_key(KeyCode::Char('n'));
    assert_eq!(screen.editor().data().services.len(), 1);

    screen.handle_key(KeyCode::Char('d'));
    screen.handle_key(KeyCode::Char('y'));
    assert!(screen.editor().data().services.is_empty());
    assert_eq!(screen.list_state.selected(), None);
}

#[test]
fn test_space_toggles_service_visibility() {
    let mut screen = screen();
    with_service(&mut screen, "Roofing");
    goto(&mut screen, EditorTab::Services);

    screen.handle_key(KeyCode::Char(' '));
    assert!(!screen.editor().data().services[0].is_active);
    screen.handle_key(KeyCode::Char(' '));
    assert!(screen.editor().data().services[0].is_active);
}

#[test]
fn test_preview_then_activate_template() {
    let mut screen = screen();
    goto(&mut screen, EditorTab::Templates);
    assert_eq!(screen.list_state.selected(), Some(0));

    screen.handle_key(KeyCode::Down);
    screen.handle_key(KeyCode::Char('p'));
    assert!(screen.preview.visible);
    assert_eq!(screen.editor().preview(), Some(TemplateId::Modern));
    assert_eq!(screen.editor().data().active_template, TemplateId::Classic);

    screen.handle_key(KeyCode::Enter);
    assert!(!screen.preview.visible);
    assert_eq!(screen.editor().data().active_template, TemplateId::Modern);
}

#[test]
fn test_closing_preview_keeps_active_template() {
    let mut screen = screen();
    goto(&mut screen, EditorTab::Templates);
    screen.handle_key(KeyCode::Down);
    screen.handle_key(KeyCode::Char('p'));
    screen.handle_key(KeyCode::Esc);

    assert_eq!(screen.editor().preview(), None);
    assert_eq!(screen.editor().data().active_template, TemplateId::Classic);
}

#[test]
fn test_edit_company_info() {
    let mut screen = screen();
    screen.handle_key(KeyCode::Char('e'));
    type_text(&mut screen, "Acme");
    screen.entity_dialog.form.focused_index = screen.entity_dialog.form.entries.len() - 1;
    screen.handle_key(KeyCode::Enter);

    assert_eq!(screen.editor().data().company.company_name, "Acme");
}

#[test]
fn test_save_key_and_quit() {
    let mut screen = screen();
    assert_eq!(screen.handle_key(KeyCode::Char('s')), EditorAction::Save);
    assert_eq!(screen.handle_key(KeyCode::Char('q')), EditorAction::Quit);
}

#[test]
fn test_unloaded_editor_only_offers_reload_and_quit() {
    let mut screen = ProfileScreen::new(ProfileEditor::new(), TemplateRenderer::new().unwrap());
    assert_eq!(screen.handle_key(KeyCode::Char('s')), EditorAction::None);
    assert_eq!(screen.handle_key(KeyCode::Char('r')), EditorAction::Reload);
    assert_eq!(screen.handle_key(KeyCode::Esc), EditorAction::Quit);
}

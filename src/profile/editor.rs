//! Profile editor: non-linear CRUD over the loaded profile, flushed by one save

use thiserror::Error;
use tracing::{info, warn};

use super::ids::{EntityId, IdGenerator};
use super::model::{
    CompanyInfo, ProfileData, ServiceDraft, TeamMemberDraft, WorkDraft,
};
use crate::api::profile::{ProfileApi, ProfileUpdateRequest};
use crate::registration::validate::ValidationError;
use crate::templates::{TemplateError, TemplateId, TemplateRenderer};

pub const LOAD_FAILED: &str = "Failed to load profile data.";
pub const SAVE_FAILED: &str = "Failed to update profile. Please try again.";

/// Oldest notices are dropped past this many
const MAX_NOTICES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// Session rejected by the service; the caller drops the editor
    #[error("session expired")]
    AuthExpired,
    #[error("{0}")]
    LoadFailed(String),
    #[error("{0}")]
    SaveFailed(String),
    #[error("profile is not loaded")]
    NotReady,
    #[error("a save is already in progress")]
    Busy,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Short user-facing confirmation of a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ProfileEditor {
    state: LoadState,
    data: ProfileData,
    ids: IdGenerator,
    preview: Option<TemplateId>,
    saving: bool,
    notices: Vec<Notice>,
}

impl ProfileEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor over data that is already in memory
    pub fn with_data(data: ProfileData) -> Self {
        Self {
            state: LoadState::Ready,
            data,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == LoadState::Ready
    }

    pub fn data(&self) -> &ProfileData {
        &self.data
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    fn notify(&mut self, notice: Notice) {
        if self.notices.len() >= MAX_NOTICES {
            self.notices.remove(0);
        }
        self.notices.push(notice);
    }

    /// Hydrate from the profile service
    pub async fn load(&mut self, api: &dyn ProfileApi) -> Result<(), EditorError> {
        self.state = LoadState::Loading;
        self.notices.clear();
        self.fetch(api).await
    }

    async fn fetch(&mut self, api: &dyn ProfileApi) -> Result<(), EditorError> {
        match api.fetch().await {
            Ok(document) => {
                self.data = document.into_profile(&mut self.ids);
                self.state = LoadState::Ready;
                info!(
                    works = self.data.works.len(),
                    services = self.data.services.len(),
                    team = self.data.team_members.len(),
                    "profile loaded"
                );
                Ok(())
            }
            Err(e) if e.is_auth_error() => {
                warn!(error = %e, "profile load rejected");
                self.state = LoadState::Failed(LOAD_FAILED.to_string());
                Err(EditorError::AuthExpired)
            }
            Err(e) => {
                warn!(error = %e, "profile load failed");
                self.state = LoadState::Failed(LOAD_FAILED.to_string());
                Err(EditorError::LoadFailed(LOAD_FAILED.to_string()))
            }
        }
    }

    fn ensure_ready(&self) -> Result<(), EditorError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(EditorError::NotReady)
        }
    }

    pub fn set_company_info(&mut self, info: CompanyInfo) -> Result<(), EditorError> {
        self.ensure_ready()?;
        self.data.company = info;
        Ok(())
    }

    pub fn add_work(&mut self, draft: WorkDraft) -> Result<EntityId, EditorError> {
        self.ensure_ready()?;
        draft.validate()?;
        let id = self.ids.next();
        let work = draft.into_work(id.clone());
        self.notify(Notice::info(
            "Work Added",
            format!("{} has been added to your portfolio.", work.title),
        ));
        self.data.works.push(work);
        Ok(id)
    }

    pub fn remove_work(&mut self, id: &EntityId) -> bool {
        let before = self.data.works.len();
        self.data.works.retain(|w| &w.id != id);
        let removed = self.data.works.len() != before;
        if removed {
            self.notify(Notice::info(
                "Work Removed",
                "Work has been removed from your portfolio.",
            ));
        }
        removed
    }

    pub fn add_service(&mut self, draft: ServiceDraft) -> Result<EntityId, EditorError> {
        self.ensure_ready()?;
        draft.validate()?;
        let id = self.ids.next();
        let service = draft.into_service(id.clone());
        self.notify(Notice::info(
            "Service Added",
            format!("{} has been added to your profile.", service.name),
        ));
        self.data.services.push(service);
        Ok(id)
    }

    pub fn remove_service(&mut self, id: &EntityId) -> bool {
        let before = self.data.services.len();
        self.data.services.retain(|s| &s.id != id);
        let removed = self.data.services.len() != before;
        if removed {
            self.notify(Notice::info(
                "Service Removed",
                "Service has been removed from your profile.",
            ));
        }
        removed
    }

    /// Set visibility; every other field of the service is left as is
    pub fn toggle_service(&mut self, id: &EntityId, active: bool) -> bool {
        let Some(service) = self.data.services.iter_mut().find(|s| &s.id == id) else {
            return false;
        };
        service.is_active = active;
        let name = service.name.clone();
        self.notify(if active {
            Notice::info(
                "Service Activated",
                format!("{name} is now visible to the public."),
            )
        } else {
            Notice::info(
                "Service Deactivated",
                format!("{name} is now hidden from public view."),
            )
        });
        true
    }

    pub fn add_member(&mut self, draft: TeamMemberDraft) -> Result<EntityId, EditorError> {
        self.ensure_ready()?;
        draft.validate()?;
        let id = self.ids.next();
        let member = draft.into_member(id.clone());
        self.notify(Notice::info(
            "Team Member Added",
            format!("{} has been added to your team.", member.name),
        ));
        self.data.team_members.push(member);
        Ok(id)
    }

    pub fn remove_member(&mut self, id: &EntityId) -> bool {
        let Some(position) = self.data.team_members.iter().position(|m| &m.id == id) else {
            return false;
        };
        let member = self.data.team_members.remove(position);
        self.notify(Notice::info(
            "Team Member Removed",
            format!("{} has been removed from your team.", member.name),
        ));
        true
    }

    pub fn toggle_member(&mut self, id: &EntityId, active: bool) -> bool {
        let Some(member) = self.data.team_members.iter_mut().find(|m| &m.id == id) else {
            return false;
        };
        member.is_active = active;
        let name = member.name.clone();
        self.notify(if active {
            Notice::info(
                "Team Member Activated",
                format!("{name} is now visible in your public team directory."),
            )
        } else {
            Notice::info(
                "Team Member Deactivated",
                format!("{name} is now hidden from public view."),
            )
        });
        true
    }

    /// Template currently open for preview, if any
    pub fn preview(&self) -> Option<TemplateId> {
        self.preview
    }

    /// Render `template` read-only. Never changes the active template.
    pub fn preview_template(
        &mut self,
        renderer: &TemplateRenderer,
        template: TemplateId,
    ) -> Result<String, TemplateError> {
        let rendered = renderer.render(&self.data, template)?;
        self.preview = Some(template);
        Ok(rendered)
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }

    /// Make `template` the public layout and close any preview
    pub fn activate_template(&mut self, template: TemplateId) {
        self.data.active_template = template;
        self.preview = None;
        self.notify(Notice::info(
            "Template Activated",
            format!("{} is now your public profile layout.", template.display_name()),
        ));
    }

    /// Send the whole profile in one update
    pub async fn save(&mut self, api: &dyn ProfileApi) -> Result<(), EditorError> {
        self.ensure_ready()?;
        if self.saving {
            return Err(EditorError::Busy);
        }
        self.saving = true;
        let request = ProfileUpdateRequest::from(&self.data);
        let result = api.update(&request).await;
        self.saving = false;

        match result {
            Ok(()) => {
                self.notify(Notice::info(
                    "Profile Updated",
                    "Your profile has been successfully updated.",
                ));
                // Picks up the ids the service assigned to new entities
                self.fetch(api).await
            }
            Err(e) if e.is_auth_error() => {
                warn!(error = %e, "profile save rejected");
                Err(EditorError::AuthExpired)
            }
            Err(e) => {
                warn!(error = %e, "profile save failed");
                let message = e.user_message(SAVE_FAILED);
                self.notify(Notice::error("Update Failed", message.clone()));
                Err(EditorError::SaveFailed(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::profile::{
        ProfileDocument, ServiceDetailDocument, ServiceGroupDocument, WireFlag, WireId,
    };
    use crate::api::ApiError;
    use crate::profile::model::Expertise;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Serves a fixed document and records update bodies
    struct FakeProfileApi {
        document: Result<ProfileDocument, ApiError>,
        update_result: Result<(), ApiError>,
        updates: Mutex<Vec<ProfileUpdateRequest>>,
    }

    impl FakeProfileApi {
        fn with_company(name: &str) -> Self {
            Self {
                document: Ok(ProfileDocument {
                    company_name: name.to_string(),
                    ..ProfileDocument::default()
                }),
                update_result: Ok(()),
                updates: Mutex::new(Vec::new()),
            }
        }

        fn failing_fetch(error: ApiError) -> Self {
            Self {
                document: Err(error),
                ..Self::with_company("")
            }
        }
    }

    #[async_trait]
    impl ProfileApi for FakeProfileApi {
        async fn fetch(&self) -> Result<ProfileDocument, ApiError> {
            self.document.clone()
        }

        async fn update(&self, request: &ProfileUpdateRequest) -> Result<(), ApiError> {
            self.updates.lock().unwrap().push(request.clone());
            self.update_result.clone()
        }
    }

    /// Keeps what was saved and hands out ids for new services, like the service does
    struct StoringProfileApi {
        document: Mutex<ProfileDocument>,
        updates: Mutex<Vec<ProfileUpdateRequest>>,
    }

    impl StoringProfileApi {
        fn new() -> Self {
            Self {
                document: Mutex::new(ProfileDocument {
                    company_name: "Acme".to_string(),
                    ..ProfileDocument::default()
                }),
                updates: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ProfileApi for StoringProfileApi {
        async fn fetch(&self) -> Result<ProfileDocument, ApiError> {
            Ok(self.document.lock().unwrap().clone())
        }

        async fn update(&self, request: &ProfileUpdateRequest) -> Result<(), ApiError> {
            let mut updates = self.updates.lock().unwrap();
            updates.push(request.clone());
            let details = request
                .services
                .iter()
                .enumerate()
                .map(|(i, s)| ServiceDetailDocument {
                    id: Some(WireId::Text(
                        s.id.clone().unwrap_or_else(|| format!("srv-{}-{}", updates.len(), i)),
                    )),
                    title: s.title.clone(),
                    description: s.description.clone(),
                    expertise_level: serde_json::to_value(s.expertise_level)
                        .ok()
                        .and_then(|v| v.as_str().map(str::to_string)),
                    active: WireFlag::Bool(s.active),
                })
                .collect();
            let mut document = self.document.lock().unwrap();
            document.company_name = request.company_name.clone();
            document.services = vec![ServiceGroupDocument {
                service_details_response: details,
            }];
            Ok(())
        }
    }

    fn service(name: &str) -> ServiceDraft {
        ServiceDraft {
            name: name.to_string(),
            description: "Full tear-off".to_string(),
            expertise: Expertise::Expert,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_load_success() {
        let api = FakeProfileApi::with_company("Acme");
        let mut editor = ProfileEditor::new();
        assert_eq!(editor.state(), &LoadState::Loading);

        editor.load(&api).await.unwrap();
        assert!(editor.is_ready());
        assert_eq!(editor.data().company.company_name, "Acme");
    }

    #[tokio::test]
    async fn test_load_failure_message() {
        let api = FakeProfileApi::failing_fetch(ApiError::network("profile", "refused"));
        let mut editor = ProfileEditor::new();

        let err = editor.load(&api).await.unwrap_err();
        assert_eq!(err, EditorError::LoadFailed(LOAD_FAILED.to_string()));
        assert_eq!(editor.state(), &LoadState::Failed(LOAD_FAILED.to_string()));
    }

    #[tokio::test]
    async fn test_load_unauthorized_is_auth_expired() {
        let api = FakeProfileApi::failing_fetch(ApiError::unauthorized("profile"));
        let mut editor = ProfileEditor::new();
        assert_eq!(editor.load(&api).await.unwrap_err(), EditorError::AuthExpired);
    }

    #[test]
    fn test_mutations_require_loaded_profile() {
        let mut editor = ProfileEditor::new();
        assert_eq!(
            editor.add_service(service("Roofing")).unwrap_err(),
            EditorError::NotReady
        );
    }

    #[test]
    fn test_add_assigns_unique_local_ids() {
        let mut editor = ProfileEditor::with_data(ProfileData::default());
        let a = editor.add_service(service("Roofing")).unwrap();
        let b = editor.add_service(service("Siding")).unwrap();
        assert_ne!(a, b);
        assert!(a.is_local());
        assert_eq!(editor.data().services.len(), 2);
        assert_eq!(editor.latest_notice().unwrap().title, "Service Added");
    }

    #[test]
    fn test_add_rejects_incomplete_drafts() {
        let mut editor = ProfileEditor::with_data(ProfileData::default());
        assert!(matches!(
            editor.add_work(WorkDraft::default()),
            Err(EditorError::Invalid(_))
        ));
        assert!(matches!(
            editor.add_member(TeamMemberDraft {
                name: "Dana".to_string(),
                ..TeamMemberDraft::default()
            }),
            Err(EditorError::Invalid(_))
        ));
        assert!(editor.data().works.is_empty());
        assert!(editor.data().team_members.is_empty());
    }

    #[test]
    fn test_toggle_service_only_changes_visibility() {
        let mut editor = ProfileEditor::with_data(ProfileData::default());
        let id = editor.add_service(service("Roofing")).unwrap();
        let before = editor.data().services[0].clone();

        assert!(editor.toggle_service(&id, false));
        let after = &editor.data().services[0];
        assert!(!after.is_active);
        assert_eq!(after.id, before.id);
        assert_eq!(after.name, before.name);
        assert_eq!(after.description, before.description);
        assert_eq!(after.expertise, before.expertise);
        assert_eq!(editor.latest_notice().unwrap().title, "Service Deactivated");

        assert!(!editor.toggle_service(&EntityId::Local(0), true));
    }

    #[test]
    fn test_remove_filters_by_id() {
        let mut editor = ProfileEditor::with_data(ProfileData::default());
        let keep = editor.add_service(service("Roofing")).unwrap();
        let gone = editor.add_service(service("Siding")).unwrap();

        assert!(editor.remove_service(&gone));
        assert!(!editor.remove_service(&gone));
        assert_eq!(editor.data().services.len(), 1);
        assert_eq!(editor.data().services[0].id, keep);
    }

    #[test]
    fn test_team_member_lifecycle_notices() {
        let mut editor = ProfileEditor::with_data(ProfileData::default());
        let id = editor
            .add_member(TeamMemberDraft {
                name: "Dana".to_string(),
                role: "Estimator".to_string(),
                ..TeamMemberDraft::default()
            })
            .unwrap();
        editor.toggle_member(&id, false);
        editor.toggle_member(&id, true);
        editor.remove_member(&id);

        let titles: Vec<&str> = editor.notices().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Team Member Added",
                "Team Member Deactivated",
                "Team Member Activated",
                "Team Member Removed"
            ]
        );
    }

    #[test]
    fn test_preview_never_changes_active_template() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut editor = ProfileEditor::with_data(ProfileData::default());

        let output = editor
            .preview_template(&renderer, TemplateId::Creative)
            .unwrap();
        assert!(output.contains("Something Amazing is Coming"));
        assert_eq!(editor.preview(), Some(TemplateId::Creative));
        assert_eq!(editor.data().active_template, TemplateId::Classic);

        editor.activate_template(TemplateId::Creative);
        assert_eq!(editor.data().active_template, TemplateId::Creative);
        assert_eq!(editor.preview(), None);
    }

    #[tokio::test]
    async fn test_save_sends_whole_profile_with_null_ids_for_new_entities() {
        let api = FakeProfileApi::with_company("Acme");
        let mut editor = ProfileEditor::new();
        editor.load(&api).await.unwrap();
        editor.add_service(service("Roofing")).unwrap();
        editor
            .add_work(WorkDraft {
                title: "Warehouse roof".to_string(),
                ..WorkDraft::default()
            })
            .unwrap();
        editor.activate_template(TemplateId::Agency);

        editor.save(&api).await.unwrap();
        assert!(!editor.is_saving());

        let updates = api.updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        let body = &updates[0];
        assert_eq!(body.company_name, "Acme");
        assert_eq!(body.services[0].id, None);
        assert_eq!(body.portfolio[0].id, None);
        assert_eq!(body.template_activation.template_id, 7);
        assert_eq!(editor.latest_notice().unwrap().title, "Profile Updated");
    }

    #[tokio::test]
    async fn test_save_failure_reports_one_message() {
        let api = FakeProfileApi {
            update_result: Err(ApiError::http("profile", 500, "")),
            ..FakeProfileApi::with_company("Acme")
        };
        let mut editor = ProfileEditor::new();
        editor.load(&api).await.unwrap();

        let err = editor.save(&api).await.unwrap_err();
        assert_eq!(err, EditorError::SaveFailed(SAVE_FAILED.to_string()));
        assert_eq!(editor.latest_notice().unwrap().kind, NoticeKind::Error);
        // Local data survives a failed save
        assert_eq!(editor.data().company.company_name, "Acme");
        assert!(!editor.is_saving());
    }

    #[tokio::test]
    async fn test_save_failure_prefers_server_message() {
        let api = FakeProfileApi {
            update_result: Err(ApiError::rejected("profile", Some("Profile locked".to_string()))),
            ..FakeProfileApi::with_company("Acme")
        };
        let mut editor = ProfileEditor::new();
        editor.load(&api).await.unwrap();
        assert_eq!(
            editor.save(&api).await.unwrap_err(),
            EditorError::SaveFailed("Profile locked".to_string())
        );
    }

    #[tokio::test]
    async fn test_second_save_keeps_ids_assigned_by_first() {
        let api = StoringProfileApi::new();
        let mut editor = ProfileEditor::new();
        editor.load(&api).await.unwrap();
        editor.add_service(service("Roofing")).unwrap();

        editor.save(&api).await.unwrap();
        assert_eq!(
            editor.data().services[0].id,
            EntityId::Remote("srv-1-0".to_string())
        );
        editor.save(&api).await.unwrap();

        let updates = api.updates.lock().unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].services[0].id, None);
        assert_eq!(updates[1].services.len(), 1);
        assert_eq!(updates[1].services[0].id.as_deref(), Some("srv-1-0"));
        assert_eq!(updates[1].services[0].expertise_level, Expertise::Expert);
    }

    #[tokio::test]
    async fn test_failed_refresh_after_save_blocks_editing() {
        let api = FakeProfileApi::with_company("Acme");
        let mut editor = ProfileEditor::new();
        editor.load(&api).await.unwrap();
        let api = FakeProfileApi::failing_fetch(ApiError::network("profile", "refused"));

        assert_eq!(
            editor.save(&api).await.unwrap_err(),
            EditorError::LoadFailed(LOAD_FAILED.to_string())
        );
        assert_eq!(api.updates.lock().unwrap().len(), 1);
        assert!(!editor.is_ready());
        assert_eq!(editor.save(&api).await.unwrap_err(), EditorError::NotReady);
    }

    #[tokio::test]
    async fn test_notices_are_capped_and_cleared_on_load() {
        let mut editor = ProfileEditor::with_data(ProfileData::default());
        let id = editor.add_service(service("Roofing")).unwrap();
        for i in 0..MAX_NOTICES * 2 {
            editor.toggle_service(&id, i % 2 == 0);
        }
        assert_eq!(editor.notices().len(), MAX_NOTICES);
        assert_eq!(editor.latest_notice().unwrap().title, "Service Deactivated");

        editor.load(&FakeProfileApi::with_company("Acme")).await.unwrap();
        assert!(editor.notices().is_empty());
    }
}

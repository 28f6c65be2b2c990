//! Step drafts: the private input state each wizard page edits.
//!
//! A draft is seeded from the accumulated record, so going back to a page shows
//! what was entered before. `commit` validates and yields the page's payload.

use super::record::{
    BasicDetailsPatch, CompanySize, CredentialsPatch, LocationsPatch, RegistrationRecord,
    ServicesPatch, StepKind, StepPayload,
};
use super::validate::{self, ValidationError, ValidationErrors};

#[derive(Debug, Clone, Default)]
pub struct CredentialsDraft {
    pub username: String,
    pub password: String,
    pub errors: ValidationErrors,
}

impl CredentialsDraft {
    pub fn seed(record: &RegistrationRecord) -> Self {
        Self {
            username: record.username.clone().unwrap_or_default(),
            password: record.password.clone().unwrap_or_default(),
            errors: ValidationErrors::default(),
        }
    }

    pub fn commit(&mut self) -> Result<StepPayload, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if let Err(e) = validate::username(&self.username) {
            errors.push(e);
        }
        if let Err(e) = validate::password(&self.password) {
            errors.push(e);
        }
        self.errors = errors.clone();
        errors.into_result(StepPayload::Credentials(CredentialsPatch {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        }))
    }
}

#[derive(Debug, Clone, Default)]
pub struct BasicDetailsDraft {
    pub company_name: String,
    pub website: String,
    pub description: String,
    pub errors: ValidationErrors,
}

impl BasicDetailsDraft {
    pub fn seed(record: &RegistrationRecord) -> Self {
        Self {
            company_name: record.company_name.clone(),
            website: record.website.clone(),
            description: record.description.clone(),
            errors: ValidationErrors::default(),
        }
    }

    pub fn remaining_chars(&self) -> i64 {
        validate::description_remaining(&self.description)
    }

    pub fn commit(&mut self) -> Result<StepPayload, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for check in [
            validate::company_name(&self.company_name),
            validate::website(&self.website),
            validate::description(&self.description),
        ] {
            if let Err(e) = check {
                errors.push(e);
            }
        }
        self.errors = errors.clone();
        errors.into_result(StepPayload::BasicDetails(BasicDetailsPatch {
            company_name: self.company_name.trim().to_string(),
            website: self.website.trim().to_string(),
            description: self.description.clone(),
        }))
    }
}

/// Which multi-select page a `SelectionDraft` backs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Services,
    Locations,
}

impl SelectionKind {
    fn duplicate_message(&self) -> &'static str {
        match self {
            SelectionKind::Services => "This service is already selected",
            SelectionKind::Locations => "This location is already selected",
        }
    }

    fn empty_message(&self) -> &'static str {
        match self {
            SelectionKind::Services => "Please select at least one service",
            SelectionKind::Locations => "Please select at least one location",
        }
    }

    fn field(&self) -> &'static str {
        match self {
            SelectionKind::Services => "services",
            SelectionKind::Locations => "locations",
        }
    }
}

/// Fetched options plus a free-text entry, collected into an ordered unique list
#[derive(Debug, Clone)]
pub struct SelectionDraft {
    kind: SelectionKind,
    options: Vec<String>,
    selected: Vec<String>,
    /// Free text typed into the "add custom" input; only committed on `add_custom`
    pub custom_input: String,
    error: Option<String>,
}

impl SelectionDraft {
    pub fn services(record: &RegistrationRecord) -> Self {
        Self {
            kind: SelectionKind::Services,
            options: Vec::new(),
            selected: record.services.clone(),
            custom_input: record.custom_services.clone(),
            error: None,
        }
    }

    pub fn locations(record: &RegistrationRecord) -> Self {
        Self {
            kind: SelectionKind::Locations,
            options: Vec::new(),
            selected: record.locations.clone(),
            custom_input: String::new(),
            error: None,
        }
    }

    pub fn kind(&self) -> SelectionKind {
        self.kind
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn set_options(&mut self, options: Vec<String>) {
        self.options = options;
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.iter().any(|s| s == value)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Click on a fetched option.
    ///
    /// Services toggle membership; locations are add-only and report duplicates.
    pub fn pick(&mut self, option: &str) -> bool {
        match self.kind {
            SelectionKind::Services => {
                if self.is_selected(option) {
                    self.selected.retain(|s| s != option);
                } else {
                    self.selected.push(option.to_string());
                }
                self.error = None;
                true
            }
            SelectionKind::Locations => self.try_add(option),
        }
    }

    /// Explicit "add" on the free-text input (Enter or the + button)
    pub fn add_custom(&mut self) -> bool {
        let input = std::mem::take(&mut self.custom_input);
        let added = self.try_add(&input);
        if !added {
            self.custom_input = input;
        }
        added
    }

    fn try_add(&mut self, raw: &str) -> bool {
        let value = raw.trim();
        if value.is_empty() {
            return false;
        }
        if self.is_selected(value) {
            self.error = Some(self.kind.duplicate_message().to_string());
            return false;
        }
        self.selected.push(value.to_string());
        self.error = None;
        true
    }

    pub fn remove(&mut self, value: &str) {
        self.selected.retain(|s| s != value);
    }

    pub fn commit(&mut self) -> Result<StepPayload, ValidationErrors> {
        if self.selected.is_empty() {
            let message = self.kind.empty_message();
            self.error = Some(message.to_string());
            return Err(ValidationError::new(self.kind.field(), message).into());
        }
        self.error = None;
        Ok(match self.kind {
            SelectionKind::Services => StepPayload::Services(ServicesPatch {
                services: self.selected.clone(),
                custom_services: self.custom_input.clone(),
            }),
            SelectionKind::Locations => StepPayload::Locations(LocationsPatch {
                locations: self.selected.clone(),
            }),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompanySizeDraft {
    pub selected: Option<CompanySize>,
    error: Option<String>,
}

impl CompanySizeDraft {
    pub fn seed(record: &RegistrationRecord) -> Self {
        Self {
            selected: record.company_size,
            error: None,
        }
    }

    pub fn select(&mut self, size: CompanySize) {
        self.selected = Some(size);
        self.error = None;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn commit(&mut self) -> Result<StepPayload, ValidationErrors> {
        match self.selected {
            Some(size) => Ok(StepPayload::CompanySize(size)),
            None => {
                let message = "Please select your company size";
                self.error = Some(message.to_string());
                Err(ValidationError::new("companySize", message).into())
            }
        }
    }
}

/// The draft behind whichever page is mounted
#[derive(Debug, Clone)]
pub enum StepDraft {
    Credentials(CredentialsDraft),
    BasicDetails(BasicDetailsDraft),
    Services(SelectionDraft),
    CompanySize(CompanySizeDraft),
    Locations(SelectionDraft),
}

impl StepDraft {
    pub fn seed(kind: StepKind, record: &RegistrationRecord) -> Self {
        match kind {
            StepKind::Credentials => StepDraft::Credentials(CredentialsDraft::seed(record)),
            StepKind::BasicDetails => StepDraft::BasicDetails(BasicDetailsDraft::seed(record)),
            StepKind::Services => StepDraft::Services(SelectionDraft::services(record)),
            StepKind::CompanySize => StepDraft::CompanySize(CompanySizeDraft::seed(record)),
            StepKind::Locations => StepDraft::Locations(SelectionDraft::locations(record)),
        }
    }

    pub fn kind(&self) -> StepKind {
        match self {
            StepDraft::Credentials(_) => StepKind::Credentials,
            StepDraft::BasicDetails(_) => StepKind::BasicDetails,
            StepDraft::Services(_) => StepKind::Services,
            StepDraft::CompanySize(_) => StepKind::CompanySize,
            StepDraft::Locations(_) => StepKind::Locations,
        }
    }

    /// The selection list, for pages that fetch options at mount
    pub fn selection_mut(&mut self) -> Option<&mut SelectionDraft> {
        match self {
            StepDraft::Services(s) | StepDraft::Locations(s) => Some(s),
            _ => None,
        }
    }

    pub fn commit(&mut self) -> Result<StepPayload, ValidationErrors> {
        match self {
            StepDraft::Credentials(d) => d.commit(),
            StepDraft::BasicDetails(d) => d.commit(),
            StepDraft::Services(d) | StepDraft::Locations(d) => d.commit(),
            StepDraft::CompanySize(d) => d.commit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_custom_service_is_rejected() {
        let mut draft = SelectionDraft::services(&RegistrationRecord::default());

        draft.custom_input = "Plumbing".to_string();
        assert!(draft.add_custom());
        assert_eq!(draft.selected().len(), 1);
        assert!(draft.custom_input.is_empty());

        draft.custom_input = "Plumbing".to_string();
        assert!(!draft.add_custom());
        assert_eq!(draft.selected().len(), 1);
        assert_eq!(draft.error(), Some("This service is already selected"));
    }

    #[test]
    fn test_custom_entry_is_trimmed_before_duplicate_check() {
        let mut draft = SelectionDraft::locations(&RegistrationRecord::default());
        draft.custom_input = "  Brazil ".to_string();
        assert!(draft.add_custom());
        assert_eq!(draft.selected(), &["Brazil".to_string()]);

        draft.custom_input = "Brazil".to_string();
        assert!(!draft.add_custom());
        assert_eq!(draft.error(), Some("This location is already selected"));
        // Rejected text stays in the input for correction
        assert_eq!(draft.custom_input, "Brazil");
    }

    #[test]
    fn test_duplicate_check_is_case_sensitive() {
        let mut draft = SelectionDraft::services(&RegistrationRecord::default());
        draft.custom_input = "Plumbing".to_string();
        draft.add_custom();
        draft.custom_input = "plumbing".to_string();
        assert!(draft.add_custom());
        assert_eq!(draft.selected().len(), 2);
    }

    #[test]
    fn test_blank_custom_entry_is_ignored_silently() {
        let mut draft = SelectionDraft::services(&RegistrationRecord::default());
        draft.custom_input = "   ".to_string();
        assert!(!draft.add_custom());
        assert!(draft.selected().is_empty());
        assert_eq!(draft.error(), None);
    }

    #[test]
    fn test_service_option_toggles() {
        let mut draft = SelectionDraft::services(&RegistrationRecord::default());
        draft.set_options(vec!["Roofing".to_string(), "Plumbing".to_string()]);

        draft.pick("Roofing");
        assert!(draft.is_selected("Roofing"));
        draft.pick("Roofing");
        assert!(!draft.is_selected("Roofing"));
    }

    #[test]
    fn test_location_option_does_not_toggle_off() {
        let mut draft = SelectionDraft::locations(&RegistrationRecord::default());
        assert!(draft.pick("USA"));
        assert!(!draft.pick("USA"));
        assert_eq!(draft.selected(), &["USA".to_string()]);
        assert_eq!(draft.error(), Some("This location is already selected"));

        draft.remove("USA");
        assert!(draft.selected().is_empty());
    }

    #[test]
    fn test_empty_selection_blocks_commit() {
        let mut draft = SelectionDraft::services(&RegistrationRecord::default());
        let errors = draft.commit().unwrap_err();
        assert_eq!(
            errors.for_field("services"),
            Some("Please select at least one service")
        );
        assert_eq!(draft.error(), Some("Please select at least one service"));
    }

    #[test]
    fn test_services_commit_carries_pending_custom_text() {
        let mut draft = SelectionDraft::services(&RegistrationRecord::default());
        draft.pick("Roofing");
        draft.custom_input = "Gutters".to_string();

        let payload = draft.commit().unwrap();
        assert_eq!(
            payload,
            StepPayload::Services(ServicesPatch {
                services: vec!["Roofing".to_string()],
                custom_services: "Gutters".to_string(),
            })
        );
    }

    #[test]
    fn test_drafts_seed_from_record() {
        let record = RegistrationRecord {
            company_name: "Acme".to_string(),
            description: "Roofing since 1999".to_string(),
            services: vec!["Roofing".to_string()],
            custom_services: "Gutters".to_string(),
            company_size: Some(CompanySize::Small),
            locations: vec!["USA".to_string()],
            ..RegistrationRecord::default()
        };

        let basics = BasicDetailsDraft::seed(&record);
        assert_eq!(basics.company_name, "Acme");

        let services = SelectionDraft::services(&record);
        assert_eq!(services.selected(), &["Roofing".to_string()]);
        assert_eq!(services.custom_input, "Gutters");

        let locations = SelectionDraft::locations(&record);
        assert_eq!(locations.selected(), &["USA".to_string()]);
        assert!(locations.custom_input.is_empty());

        assert_eq!(
            CompanySizeDraft::seed(&record).selected,
            Some(CompanySize::Small)
        );
    }

    #[test]
    fn test_basic_details_reports_every_failing_field() {
        let mut draft = BasicDetailsDraft {
            website: "acme".to_string(),
            description: "too short".to_string(),
            ..BasicDetailsDraft::default()
        };

        let errors = draft.commit().unwrap_err();
        assert_eq!(errors.for_field("companyName"), Some("Company name is required"));
        assert!(errors.for_field("website").is_some());
        assert_eq!(
            errors.for_field("description"),
            Some("Please provide at least 10 characters")
        );
        assert_eq!(draft.errors, errors);
    }

    #[test]
    fn test_basic_details_commit_clears_previous_errors() {
        let mut draft = BasicDetailsDraft::default();
        assert!(draft.commit().is_err());

        draft.company_name = " Acme ".to_string();
        draft.description = "We fix roofs fast.".to_string();
        let payload = draft.commit().unwrap();
        assert!(draft.errors.is_empty());
        match payload {
            StepPayload::BasicDetails(p) => assert_eq!(p.company_name, "Acme"),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_company_size_required() {
        let mut draft = CompanySizeDraft::default();
        assert!(draft.commit().is_err());
        assert_eq!(draft.error(), Some("Please select your company size"));

        draft.select(CompanySize::Tiny);
        assert_eq!(draft.error(), None);
        assert_eq!(
            draft.commit().unwrap(),
            StepPayload::CompanySize(CompanySize::Tiny)
        );
    }

    #[test]
    fn test_credentials_validation() {
        let mut draft = CredentialsDraft {
            username: "bob".to_string(),
            password: "secret".to_string(),
            ..CredentialsDraft::default()
        };
        let errors = draft.commit().unwrap_err();
        assert!(errors.for_field("username").is_some());
        assert!(errors.for_field("password").is_none());

        draft.username = "bobby".to_string();
        assert!(draft.commit().is_ok());
    }

    #[test]
    fn test_step_draft_dispatch() {
        let record = RegistrationRecord::default();
        let mut draft = StepDraft::seed(StepKind::Locations, &record);
        assert_eq!(draft.kind(), StepKind::Locations);
        assert!(draft.selection_mut().is_some());

        let mut draft = StepDraft::seed(StepKind::CompanySize, &record);
        assert!(draft.selection_mut().is_none());
        assert!(draft.commit().is_err());
    }
}

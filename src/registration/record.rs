//! The accumulated registration record and the typed step payloads merged into it

use serde::{Deserialize, Serialize};
use std::fmt;

/// Company headcount buckets offered by the company-size step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanySize {
    #[serde(rename = "1-10")]
    Tiny,
    #[serde(rename = "11-50")]
    Small,
    #[serde(rename = "51-200")]
    Medium,
    #[serde(rename = "201-500")]
    Large,
    #[serde(rename = "500+")]
    Enterprise,
}

impl CompanySize {
    pub fn all() -> &'static [CompanySize] {
        &[
            CompanySize::Tiny,
            CompanySize::Small,
            CompanySize::Medium,
            CompanySize::Large,
            CompanySize::Enterprise,
        ]
    }

    /// Bucket value as sent to and stored by the service
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanySize::Tiny => "1-10",
            CompanySize::Small => "11-50",
            CompanySize::Medium => "51-200",
            CompanySize::Large => "201-500",
            CompanySize::Enterprise => "500+",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompanySize::Tiny => "1-10 Employees",
            CompanySize::Small => "11-50 Employees",
            CompanySize::Medium => "51-200 Employees",
            CompanySize::Large => "201-500 Employees",
            CompanySize::Enterprise => "500+ Employees",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CompanySize::Tiny => "Small team, big ambitions",
            CompanySize::Small => "Growing and scaling",
            CompanySize::Medium => "Mid-size company",
            CompanySize::Large => "Large organization",
            CompanySize::Enterprise => "Enterprise scale",
        }
    }

    pub fn from_bucket(value: &str) -> Option<CompanySize> {
        Self::all().iter().copied().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for CompanySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the wizard has collected so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    pub username: Option<String>,
    pub password: Option<String>,
    pub official_email: Option<String>,
    pub phone_number: Option<String>,
    pub company_name: String,
    pub website: String,
    pub description: String,
    pub services: Vec<String>,
    pub custom_services: String,
    pub company_size: Option<CompanySize>,
    pub locations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialsPatch {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicDetailsPatch {
    pub company_name: String,
    pub website: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicesPatch {
    pub services: Vec<String>,
    pub custom_services: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationsPatch {
    pub locations: Vec<String>,
}

/// The slice of the record one step owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepPayload {
    Credentials(CredentialsPatch),
    BasicDetails(BasicDetailsPatch),
    Services(ServicesPatch),
    CompanySize(CompanySize),
    Locations(LocationsPatch),
}

impl StepPayload {
    pub fn kind(&self) -> StepKind {
        match self {
            StepPayload::Credentials(_) => StepKind::Credentials,
            StepPayload::BasicDetails(_) => StepKind::BasicDetails,
            StepPayload::Services(_) => StepKind::Services,
            StepPayload::CompanySize(_) => StepKind::CompanySize,
            StepPayload::Locations(_) => StepKind::Locations,
        }
    }
}

/// Wizard pages, in the order the credential-first flow shows them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Credentials,
    BasicDetails,
    Services,
    CompanySize,
    Locations,
}

impl StepKind {
    pub fn title(&self) -> &'static str {
        match self {
            StepKind::Credentials => "Credentials",
            StepKind::BasicDetails => "Basic Details",
            StepKind::Services => "Services",
            StepKind::CompanySize => "Company Size",
            StepKind::Locations => "Locations",
        }
    }
}

impl RegistrationRecord {
    /// Fold one step's payload into the record.
    ///
    /// Only the fields carried by `payload` are written; everything else is
    /// left exactly as earlier steps set it.
    pub fn merge(mut self, payload: StepPayload) -> Self {
        match payload {
            StepPayload::Credentials(p) => {
                self.username = Some(p.username);
                self.password = Some(p.password);
            }
            StepPayload::BasicDetails(p) => {
                self.company_name = p.company_name;
                self.website = p.website;
                self.description = p.description;
            }
            StepPayload::Services(p) => {
                self.services = p.services;
                self.custom_services = p.custom_services;
            }
            StepPayload::CompanySize(size) => {
                self.company_size = Some(size);
            }
            StepPayload::Locations(p) => {
                self.locations = p.locations;
            }
        }
        self
    }
}

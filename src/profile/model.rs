//! In-memory profile data owned by the editor

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::EntityId;
use crate::registration::validate::{self, ValidationError};
use crate::templates::TemplateId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Expertise {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl Expertise {
    pub fn all() -> &'static [Expertise] {
        &[Expertise::Beginner, Expertise::Intermediate, Expertise::Expert]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Expertise::Beginner => "beginner",
            Expertise::Intermediate => "intermediate",
            Expertise::Expert => "expert",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Expertise::Beginner => "Beginner",
            Expertise::Intermediate => "Intermediate",
            Expertise::Expert => "Expert",
        }
    }

    /// Case-insensitive parse of the service's level names
    pub fn parse(value: &str) -> Option<Expertise> {
        Self::all()
            .iter()
            .copied()
            .find(|e| e.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for Expertise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompanyInfo {
    pub company_name: String,
    pub phone: String,
    pub address: String,
    pub about: String,
}

/// A portfolio entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Work {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub cost: String,
    /// `YYYY-MM-DD` when set
    pub deadline: String,
    pub category: String,
    pub images: Vec<String>,
    pub videos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub expertise: Expertise,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMember {
    pub id: EntityId,
    pub name: String,
    pub role: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileData {
    pub company: CompanyInfo,
    pub works: Vec<Work>,
    pub services: Vec<Service>,
    pub team_members: Vec<TeamMember>,
    pub active_template: TemplateId,
}

impl ProfileData {
    pub fn active_services(&self) -> impl Iterator<Item = &Service> {
        self.services.iter().filter(|s| s.is_active)
    }

    pub fn active_team(&self) -> impl Iterator<Item = &TeamMember> {
        self.team_members.iter().filter(|m| m.is_active)
    }
}

/// A work before it has an id
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub cost: String,
    pub deadline: String,
    pub category: String,
    pub images: Vec<String>,
    pub videos: Vec<String>,
}

impl WorkDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::required("title", &self.title, "Work title is required")
    }

    pub fn into_work(self, id: EntityId) -> Work {
        Work {
            id,
            title: self.title.trim().to_string(),
            description: self.description,
            location: self.location,
            cost: self.cost,
            deadline: self.deadline,
            category: self.category,
            images: self.images,
            videos: self.videos,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDraft {
    pub name: String,
    pub description: String,
    pub expertise: Expertise,
    pub is_active: bool,
}

impl Default for ServiceDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            expertise: Expertise::Beginner,
            is_active: true,
        }
    }
}

impl ServiceDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::required("name", &self.name, "Service name is required")
    }

    pub fn into_service(self, id: EntityId) -> Service {
        Service {
            id,
            name: self.name.trim().to_string(),
            description: self.description,
            expertise: self.expertise,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMemberDraft {
    pub name: String,
    pub role: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub is_active: bool,
}

impl Default for TeamMemberDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            role: String::new(),
            email: None,
            phone: None,
            department: None,
            is_active: true,
        }
    }
}

impl TeamMemberDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::required("name", &self.name, "Name is required")?;
        validate::required("role", &self.role, "Role is required")
    }

    pub fn into_member(self, id: EntityId) -> TeamMember {
        fn non_blank(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }
        TeamMember {
            id,
            name: self.name.trim().to_string(),
            role: self.role.trim().to_string(),
            email: non_blank(self.email),
            phone: non_blank(self.phone),
            department: non_blank(self.department),
            is_active: self.is_active,
        }
    }
}

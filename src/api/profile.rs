//! Profile read/update adapter
//!
//! Reads come back as a loosely-typed document that is mapped onto
//! `ProfileData`; saves send the whole profile in one PUT.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use super::client::{join_url, send_json, with_bearer};
use super::error::ApiError;
use crate::profile::ids::{EntityId, IdGenerator};
use crate::profile::model::{CompanyInfo, Expertise, ProfileData, Service, TeamMember, Work};
use crate::session::Session;
use crate::templates::TemplateId;

const SERVICE: &str = "profile";

#[async_trait]
pub trait ProfileApi: Send + Sync {
    async fn fetch(&self) -> Result<ProfileDocument, ApiError>;
    async fn update(&self, request: &ProfileUpdateRequest) -> Result<(), ApiError>;
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ids arrive as strings or numbers depending on the entity
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(i64),
}

impl WireId {
    fn into_entity(self) -> Option<EntityId> {
        match self {
            WireId::Text(s) if s.trim().is_empty() => None,
            WireId::Text(s) => Some(EntityId::Remote(s)),
            WireId::Number(n) => Some(EntityId::Remote(n.to_string())),
        }
    }
}

/// `active` is a boolean on some deployments and `"true"`/`"false"` on others
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireFlag {
    Bool(bool),
    Text(String),
}

impl Default for WireFlag {
    fn default() -> Self {
        WireFlag::Bool(false)
    }
}

impl WireFlag {
    fn is_true(&self) -> bool {
        match self {
            WireFlag::Bool(b) => *b,
            WireFlag::Text(s) => s == "true",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProfileEnvelope {
    data: ProfileDocument,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileDocument {
    #[serde(deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub official_phone_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub official_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company_description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub portfolio: Vec<PortfolioDocument>,
    pub template_activation: Option<TemplateActivationDocument>,
    #[serde(deserialize_with = "null_as_default")]
    pub team_members: Vec<TeamMemberDocument>,
    #[serde(deserialize_with = "null_as_default")]
    pub services: Vec<ServiceGroupDocument>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioDocument {
    pub id: Option<WireId>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub project_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub project_cost: String,
    #[serde(deserialize_with = "null_as_default")]
    pub project_medias: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TemplateActivationDocument {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMemberDocument {
    pub id: Option<WireId>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    /// Absent on older profiles, which show every member
    pub active: Option<WireFlag>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceGroupDocument {
    #[serde(deserialize_with = "null_as_default")]
    pub service_details_response: Vec<ServiceDetailDocument>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceDetailDocument {
    pub id: Option<WireId>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub expertise_level: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub active: WireFlag,
}

fn is_image(path: &str) -> bool {
    path.ends_with(".jpg") || path.ends_with(".png")
}

fn is_video(path: &str) -> bool {
    path.ends_with(".mp4") || path.ends_with(".mov")
}

impl ProfileDocument {
    /// Map onto editor data. Entities the service sent without an id get a
    /// local one, so they are recreated on the next save.
    pub fn into_profile(self, ids: &mut IdGenerator) -> ProfileData {
        let works = self
            .portfolio
            .into_iter()
            .map(|item| {
                let images = item
                    .project_medias
                    .iter()
                    .filter(|m| is_image(m))
                    .cloned()
                    .collect();
                let videos = item
                    .project_medias
                    .iter()
                    .filter(|m| is_video(m))
                    .cloned()
                    .collect();
                Work {
                    id: item
                        .id
                        .and_then(WireId::into_entity)
                        .unwrap_or_else(|| ids.next()),
                    title: item.title,
                    description: item.description,
                    location: item.location,
                    cost: item.project_cost,
                    deadline: item.project_date,
                    category: item.category,
                    images,
                    videos,
                }
            })
            .collect();

        let services = self
            .services
            .into_iter()
            .flat_map(|group| group.service_details_response)
            .map(|detail| {
                let expertise = match detail.expertise_level.as_deref() {
                    Some(level) => Expertise::parse(level).unwrap_or_else(|| {
                        warn!(expertise_level = level, "unknown expertise level, using beginner");
                        Expertise::Beginner
                    }),
                    None => Expertise::Beginner,
                };
                Service {
                    id: detail
                        .id
                        .and_then(WireId::into_entity)
                        .unwrap_or_else(|| ids.next()),
                    name: detail.title,
                    description: detail.description,
                    expertise,
                    is_active: detail.active.is_true(),
                }
            })
            .collect();

        let team_members = self
            .team_members
            .into_iter()
            .map(|member| TeamMember {
                id: member
                    .id
                    .and_then(WireId::into_entity)
                    .unwrap_or_else(|| ids.next()),
                name: member.name,
                role: member.role,
                email: non_blank(member.email),
                phone: non_blank(member.phone),
                department: non_blank(member.department),
                is_active: member.active.map_or(true, |flag| flag.is_true()),
            })
            .collect();

        let active_template = self
            .template_activation
            .and_then(|t| t.name)
            .map(|name| TemplateId::from_activation_name(&name))
            .unwrap_or_default();

        ProfileData {
            company: CompanyInfo {
                company_name: self.company_name,
                phone: self.official_phone_number,
                address: self.official_address,
                about: self.company_description,
            },
            works,
            services,
            team_members,
            active_template,
        }
    }
}

/// Body of the bulk profile PUT
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub company_name: String,
    pub official_phone_number: String,
    pub official_address: String,
    pub company_description: String,
    pub services: Vec<ServiceUpdate>,
    pub portfolio: Vec<PortfolioUpdate>,
    pub template_activation: TemplateActivationUpdate,
    pub team_members: Vec<TeamMemberUpdate>,
    pub is_from_registration: bool,
}

/// `id: null` marks an entity the service should create
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUpdate {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub expertise_level: Expertise,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioUpdate {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub project_cost: String,
    pub project_date: Option<String>,
    pub project_medias: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateActivationUpdate {
    pub template_id: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberUpdate {
    pub id: Option<String>,
    pub name: String,
    pub role: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub active: bool,
    pub profile_image_url: Option<String>,
}

impl From<&ProfileData> for ProfileUpdateRequest {
    fn from(data: &ProfileData) -> Self {
        Self {
            company_name: data.company.company_name.clone(),
            official_phone_number: data.company.phone.clone(),
            official_address: data.company.address.clone(),
            company_description: data.company.about.clone(),
            services: data
                .services
                .iter()
                .map(|s| ServiceUpdate {
                    id: s.id.wire_id().map(str::to_string),
                    title: s.name.clone(),
                    description: s.description.clone(),
                    expertise_level: s.expertise,
                    active: s.is_active,
                })
                .collect(),
            portfolio: data
                .works
                .iter()
                .map(|w| PortfolioUpdate {
                    id: w.id.wire_id().map(str::to_string),
                    title: w.title.clone(),
                    description: w.description.clone(),
                    category: w.category.clone(),
                    location: w.location.clone(),
                    project_cost: w.cost.clone(),
                    project_date: Some(w.deadline.clone()).filter(|d| !d.is_empty()),
                    project_medias: w.images.iter().chain(&w.videos).cloned().collect(),
                })
                .collect(),
            template_activation: TemplateActivationUpdate {
                template_id: data.active_template.number(),
            },
            team_members: data
                .team_members
                .iter()
                .map(|m| TeamMemberUpdate {
                    id: m.id.wire_id().map(str::to_string),
                    name: m.name.clone(),
                    role: m.role.clone(),
                    email: m.email.clone(),
                    phone: m.phone.clone(),
                    department: m.department.clone(),
                    active: m.is_active,
                    profile_image_url: None,
                })
                .collect(),
            is_from_registration: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// REST implementation scoped to one profile and one session
pub struct HttpProfileApi {
    client: Client,
    base_url: String,
    profile_id: String,
    session: Option<Session>,
}

impl HttpProfileApi {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        profile_id: impl Into<String>,
        session: Option<Session>,
    ) -> Result<Self, ApiError> {
        let profile_id = profile_id.into();
        if profile_id.trim().is_empty() {
            return Err(ApiError::not_configured(SERVICE, "api.profile_id"));
        }
        Ok(Self {
            client,
            base_url: base_url.into(),
            profile_id,
            session,
        })
    }
}

#[async_trait]
impl ProfileApi for HttpProfileApi {
    async fn fetch(&self) -> Result<ProfileDocument, ApiError> {
        let url = join_url(&self.base_url, &format!("details/{}", self.profile_id));
        debug!(%url, "fetching profile");
        let request = with_bearer(self.client.get(url), self.session.as_ref());
        let envelope: ProfileEnvelope = send_json(SERVICE, request).await?;
        Ok(envelope.data)
    }

    async fn update(&self, body: &ProfileUpdateRequest) -> Result<(), ApiError> {
        let url = join_url(&self.base_url, &self.profile_id);
        let request = with_bearer(self.client.put(url).json(body), self.session.as_ref());
        let response: UpdateResponse = send_json(SERVICE, request).await?;
        if !response.success {
            return Err(ApiError::rejected(SERVICE, response.message));
        }
        info!(profile_id = %self.profile_id, "profile updated");
        Ok(())
    }
}

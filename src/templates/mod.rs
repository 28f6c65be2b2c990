//! Public profile layouts
//!
//! Rendering is a pure function of the profile data and a template id. Layouts
//! are embedded handlebars files; inactive services and team members are
//! dropped before the data reaches a layout.

use chrono::NaiveDate;
use handlebars::Handlebars;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::warn;

use crate::profile::model::ProfileData;

/// Shown in place of a blank company name
pub const PLACEHOLDER_COMPANY: &str = "Your Company";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("invalid template {0}")]
    Compile(#[from] Box<handlebars::TemplateError>),
    #[error("failed to render template {template}: {source}")]
    Render {
        template: TemplateId,
        #[source]
        source: Box<handlebars::RenderError>,
    },
}

/// Layout selector, numbered 1..=8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemplateId {
    #[default]
    Classic,
    Modern,
    Premium,
    Showcase,
    Creative,
    Construction,
    Agency,
    Enterprise,
}

impl TemplateId {
    pub fn all() -> &'static [TemplateId] {
        &[
            TemplateId::Classic,
            TemplateId::Modern,
            TemplateId::Premium,
            TemplateId::Showcase,
            TemplateId::Creative,
            TemplateId::Construction,
            TemplateId::Agency,
            TemplateId::Enterprise,
        ]
    }

    pub fn number(&self) -> u8 {
        match self {
            TemplateId::Classic => 1,
            TemplateId::Modern => 2,
            TemplateId::Premium => 3,
            TemplateId::Showcase => 4,
            TemplateId::Creative => 5,
            TemplateId::Construction => 6,
            TemplateId::Agency => 7,
            TemplateId::Enterprise => 8,
        }
    }

    pub fn from_number(number: u8) -> Option<TemplateId> {
        Self::all().iter().copied().find(|t| t.number() == number)
    }

    /// Registry key
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Classic => "classic",
            TemplateId::Modern => "modern",
            TemplateId::Premium => "premium",
            TemplateId::Showcase => "showcase",
            TemplateId::Creative => "creative",
            TemplateId::Construction => "construction",
            TemplateId::Agency => "agency",
            TemplateId::Enterprise => "enterprise",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TemplateId::Classic => "Classic",
            TemplateId::Modern => "Modern",
            TemplateId::Premium => "Premium",
            TemplateId::Showcase => "Showcase",
            TemplateId::Creative => "Creative",
            TemplateId::Construction => "Construction",
            TemplateId::Agency => "Agency",
            TemplateId::Enterprise => "Enterprise",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TemplateId::Classic => "Clean and professional",
            TemplateId::Modern => "Sidebar layout design",
            TemplateId::Premium => "Hero section with gradient",
            TemplateId::Showcase => "Stats and specializations up front",
            TemplateId::Creative => "Bold studio portfolio",
            TemplateId::Construction => "Project log for builders",
            TemplateId::Agency => "Split screen with services and team",
            TemplateId::Enterprise => "Full company overview",
        }
    }

    /// Map the service's `templateActivation.name`.
    ///
    /// Names are matched case-insensitively; anything unrecognised falls back
    /// to Premium, which is what the service assigns by default.
    pub fn from_activation_name(name: &str) -> TemplateId {
        let name = name.trim();
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
            .unwrap_or_else(|| {
                warn!(template = name, "unknown template name, using premium");
                TemplateId::Premium
            })
    }

    fn source(&self) -> &'static str {
        match self {
            TemplateId::Classic => include_str!("profile/classic.hbs"),
            TemplateId::Modern => include_str!("profile/modern.hbs"),
            TemplateId::Premium => include_str!("profile/premium.hbs"),
            TemplateId::Showcase => include_str!("profile/showcase.hbs"),
            TemplateId::Creative => include_str!("profile/creative.hbs"),
            TemplateId::Construction => include_str!("profile/construction.hbs"),
            TemplateId::Agency => include_str!("profile/agency.hbs"),
            TemplateId::Enterprise => include_str!("profile/enterprise.hbs"),
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.number())
    }
}

/// `YYYY-MM-DD` (optionally followed by a time) as `Mar 05, 2025`; other
/// strings pass through untouched
pub fn format_deadline(raw: &str) -> String {
    let date_part = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format("%b %d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[derive(Serialize)]
struct WorkView<'a> {
    number: usize,
    title: &'a str,
    description: &'a str,
    location: &'a str,
    cost: &'a str,
    deadline: String,
    category: &'a str,
    image_count: usize,
    video_count: usize,
}

#[derive(Serialize)]
struct ServiceView<'a> {
    number: usize,
    name: &'a str,
    description: &'a str,
    expertise: &'static str,
}

#[derive(Serialize)]
struct MemberView<'a> {
    name: &'a str,
    role: &'a str,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    department: Option<&'a str>,
}

#[derive(Serialize)]
struct ProfileView<'a> {
    company_name: &'a str,
    phone: &'a str,
    address: &'a str,
    about: &'a str,
    works: Vec<WorkView<'a>>,
    work_count: usize,
    specializations: Vec<&'a str>,
    services: Vec<ServiceView<'a>>,
    service_count: usize,
    team: Vec<MemberView<'a>>,
    team_count: usize,
}

impl<'a> ProfileView<'a> {
    fn new(data: &'a ProfileData) -> Self {
        let works: Vec<WorkView> = data
            .works
            .iter()
            .enumerate()
            .map(|(i, w)| WorkView {
                number: i + 1,
                title: &w.title,
                description: &w.description,
                location: &w.location,
                cost: &w.cost,
                deadline: format_deadline(&w.deadline),
                category: &w.category,
                image_count: w.images.len(),
                video_count: w.videos.len(),
            })
            .collect();

        let services: Vec<ServiceView> = data
            .active_services()
            .enumerate()
            .map(|(i, s)| ServiceView {
                number: i + 1,
                name: &s.name,
                description: &s.description,
                expertise: s.expertise.label(),
            })
            .collect();

        let team: Vec<MemberView> = data
            .active_team()
            .map(|m| MemberView {
                name: &m.name,
                role: &m.role,
                email: m.email.as_deref(),
                phone: m.phone.as_deref(),
                department: m.department.as_deref(),
            })
            .collect();

        let specializations = data
            .works
            .iter()
            .take(5)
            .map(|w| w.category.as_str())
            .filter(|c| !c.is_empty())
            .collect();

        let company_name = match data.company.company_name.trim() {
            "" => PLACEHOLDER_COMPANY,
            name => name,
        };

        Self {
            company_name,
            phone: &data.company.phone,
            address: &data.company.address,
            about: &data.company.about,
            work_count: works.len(),
            works,
            specializations,
            service_count: services.len(),
            services,
            team_count: team.len(),
            team,
        }
    }
}

/// Compiled registry of every layout
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        // Output is terminal text, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(false);
        for template in TemplateId::all() {
            handlebars
                .register_template_string(template.as_str(), template.source())
                .map_err(Box::new)?;
        }
        Ok(Self { handlebars })
    }

    pub fn render(&self, data: &ProfileData, template: TemplateId) -> Result<String, TemplateError> {
        let view = ProfileView::new(data);
        self.handlebars
            .render(template.as_str(), &view)
            .map_err(|e| TemplateError::Render {
                template,
                source: Box::new(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ids::EntityId;
    use crate::profile::model::{
        CompanyInfo, Expertise, ServiceDraft, TeamMemberDraft, WorkDraft,
    };

    fn empty_placeholder(template: TemplateId) -> &'static str {
        match template {
            TemplateId::Classic => "Portfolio items will appear here",
            TemplateId::Modern => "No portfolio items to display",
            TemplateId::Premium => "Projects will be showcased here soon.",
            TemplateId::Showcase => "Portfolio Coming Soon",
            TemplateId::Creative => "Something Amazing is Coming",
            TemplateId::Construction => "Portfolio in Progress",
            TemplateId::Agency => "No projects published yet.",
            TemplateId::Enterprise => "Our showcase is being curated.",
        }
    }

    fn sample() -> ProfileData {
        ProfileData {
            company: CompanyInfo {
                company_name: "Acme Roofing".to_string(),
                phone: "555-0100".to_string(),
                address: "1 Main St".to_string(),
                about: "Roofs since 1999".to_string(),
            },
            works: vec![WorkDraft {
                title: "Warehouse roof".to_string(),
                description: "Full replacement".to_string(),
                category: "Commercial".to_string(),
                deadline: "2025-03-05".to_string(),
                ..WorkDraft::default()
            }
            .into_work(EntityId::Local(1))],
            services: vec![
                ServiceDraft {
                    name: "Shingle repair".to_string(),
                    expertise: Expertise::Expert,
                    ..ServiceDraft::default()
                }
                .into_service(EntityId::Local(2)),
                ServiceDraft {
                    name: "Chimney sweeping".to_string(),
                    is_active: false,
                    ..ServiceDraft::default()
                }
                .into_service(EntityId::Local(3)),
            ],
            team_members: vec![
                TeamMemberDraft {
                    name: "Dana Reyes".to_string(),
                    role: "Estimator".to_string(),
                    ..TeamMemberDraft::default()
                }
                .into_member(EntityId::Local(4)),
                TeamMemberDraft {
                    name: "Former Employee".to_string(),
                    role: "Crew".to_string(),
                    is_active: false,
                    ..TeamMemberDraft::default()
                }
                .into_member(EntityId::Local(5)),
            ],
            active_template: TemplateId::Classic,
        }
    }

    #[test]
    fn test_template_numbers_round_trip() {
        for template in TemplateId::all() {
            assert_eq!(TemplateId::from_number(template.number()), Some(*template));
        }
        assert_eq!(TemplateId::from_number(0), None);
        assert_eq!(TemplateId::from_number(9), None);
    }

    #[test]
    fn test_activation_name_mapping() {
        assert_eq!(TemplateId::from_activation_name("Classic"), TemplateId::Classic);
        assert_eq!(TemplateId::from_activation_name("MODERN"), TemplateId::Modern);
        assert_eq!(TemplateId::from_activation_name("agency"), TemplateId::Agency);
        assert_eq!(TemplateId::from_activation_name("Gold"), TemplateId::Premium);
    }

    #[test]
    fn test_every_template_renders_empty_portfolio_branch() {
        let renderer = TemplateRenderer::new().unwrap();
        let data = ProfileData {
            works: Vec::new(),
            ..sample()
        };
        for template in TemplateId::all() {
            let output = renderer.render(&data, *template).unwrap();
            assert!(
                output.contains(empty_placeholder(*template)),
                "{template} missing empty placeholder:\n{output}"
            );
        }
    }

    #[test]
    fn test_placeholders_are_distinct() {
        let mut seen: Vec<&str> = TemplateId::all().iter().map(|t| empty_placeholder(*t)).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), TemplateId::all().len());
    }

    #[test]
    fn test_populated_portfolio_hides_placeholder() {
        let renderer = TemplateRenderer::new().unwrap();
        let data = sample();
        for template in TemplateId::all() {
            let output = renderer.render(&data, *template).unwrap();
            assert!(output.contains("Warehouse roof"), "{template}:\n{output}");
            assert!(!output.contains(empty_placeholder(*template)));
        }
    }

    #[test]
    fn test_inactive_entities_are_never_rendered() {
        let renderer = TemplateRenderer::new().unwrap();
        let data = sample();
        for template in TemplateId::all() {
            let output = renderer.render(&data, *template).unwrap();
            assert!(!output.contains("Chimney sweeping"), "{template}");
            assert!(!output.contains("Former Employee"), "{template}");
        }

        let agency = renderer.render(&data, TemplateId::Agency).unwrap();
        assert!(agency.contains("Shingle repair (Expert)"));
        assert!(agency.contains("Dana Reyes, Estimator"));

        let enterprise = renderer.render(&data, TemplateId::Enterprise).unwrap();
        assert!(enterprise.contains("Our Services"));
        assert!(enterprise.contains("Meet Our Team"));
        assert!(enterprise.contains("1 projects | 1 services | 1 team members"));
    }

    #[test]
    fn test_blank_company_name_uses_placeholder() {
        let renderer = TemplateRenderer::new().unwrap();
        let data = ProfileData::default();
        for template in TemplateId::all() {
            let output = renderer.render(&data, *template).unwrap();
            assert!(output.contains(PLACEHOLDER_COMPANY), "{template}");
        }
    }

    #[test]
    fn test_text_is_not_html_escaped() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut data = sample();
        data.company.company_name = "Smith & Sons".to_string();
        let output = renderer.render(&data, TemplateId::Classic).unwrap();
        assert!(output.contains("Smith & Sons"));
    }

    #[test]
    fn test_deadline_formatting() {
        assert_eq!(format_deadline("2025-03-05"), "Mar 05, 2025");
        assert_eq!(format_deadline("2025-12-31T00:00:00Z"), "Dec 31, 2025");
        assert_eq!(format_deadline("next spring"), "next spring");
        assert_eq!(format_deadline(""), "");

        let renderer = TemplateRenderer::new().unwrap();
        let output = renderer.render(&sample(), TemplateId::Modern).unwrap();
        assert!(output.contains("Mar 05, 2025"));
    }
}

//! Authenticated profile editing

pub mod editor;
pub mod ids;
pub mod model;

pub use editor::{EditorError, LoadState, Notice, NoticeKind, ProfileEditor};
pub use ids::{EntityId, IdGenerator};
pub use model::{
    CompanyInfo, Expertise, ProfileData, Service, ServiceDraft, TeamMember, TeamMemberDraft, Work,
    WorkDraft,
};

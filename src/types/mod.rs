// src/types/mod.rs
//! Wire and domain types shared by the API surface and the managers.

pub mod post;
pub mod search;
pub mod user;

pub use post::{ApplicationTrack, Comment, Post, PostDraft, PostType};
pub use search::{SearchKind, SearchQuery, SearchResult};
pub use user::{
    EducationEntry, ExperienceEntry, LoginResponse, PhotoUpload, ProfileUpdate, RegisterForm,
    User, UserSummary,
};

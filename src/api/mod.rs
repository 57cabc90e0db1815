// src/api/mod.rs
//! The REST boundary. `JobBoardApi` is the seam the managers talk through;
//! `HttpApi` is the reqwest-backed implementation, and tests substitute
//! scripted fakes that record the calls they receive.

pub mod http;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Comment, EducationEntry, ExperienceEntry, LoginResponse, PhotoUpload, Post, PostDraft,
    ProfileUpdate, RegisterForm, SearchQuery, SearchResult, User, UserSummary,
};

pub use http::HttpApi;

#[async_trait]
pub trait JobBoardApi: Send + Sync {
    // ===== Session bootstrap =====
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse>;
    async fn register(&self, form: &RegisterForm) -> Result<()>;

    // ===== Profile =====
    async fn get_user(&self, user_id: &str) -> Result<User>;
    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<()>;
    /// Returns the new photo URL.
    async fn upload_photo(&self, user_id: &str, photo: &PhotoUpload) -> Result<String>;
    /// Returns the server-assigned entry id when the response echoes one.
    async fn add_education(&self, user_id: &str, entry: &EducationEntry) -> Result<Option<String>>;
    async fn delete_education(&self, user_id: &str, entry_id: &str) -> Result<()>;
    async fn add_experience(
        &self,
        user_id: &str,
        entry: &ExperienceEntry,
    ) -> Result<Option<String>>;
    async fn delete_experience(&self, user_id: &str, entry_id: &str) -> Result<()>;

    // ===== Posts =====
    async fn create_post(&self, draft: &PostDraft) -> Result<String>;
    async fn update_post(&self, post_id: &str, draft: &PostDraft) -> Result<()>;
    async fn delete_post(&self, post_id: &str) -> Result<()>;
    async fn user_posts(&self) -> Result<Vec<Post>>;
    async fn other_posts(&self) -> Result<Vec<Post>>;
    async fn user_interactions(&self) -> Result<Vec<Post>>;
    async fn working_posts(&self) -> Result<Vec<Post>>;

    // ===== Per-post relationships =====
    async fn apply(&self, post_id: &str) -> Result<()>;
    async fn interest(&self, post_id: &str) -> Result<()>;
    async fn remove_application(&self, post_id: &str) -> Result<()>;
    async fn approve(&self, post_id: &str, user_id: &str) -> Result<()>;
    async fn decline(&self, post_id: &str, user_id: &str) -> Result<()>;
    async fn applicants(&self, post_id: &str) -> Result<Vec<UserSummary>>;
    async fn interested_users(&self, post_id: &str) -> Result<Vec<UserSummary>>;
    async fn working_users(&self, post_id: &str) -> Result<Vec<UserSummary>>;

    // ===== Search =====
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>>;

    // ===== Comments =====
    async fn comments(&self, post_id: &str) -> Result<Vec<Comment>>;
    async fn add_comment(&self, post_id: &str, text: &str) -> Result<()>;

    // ===== Social graph =====
    /// Flips the follow edge; returns the new "viewer follows them" state.
    async fn follow(&self, user_id: &str) -> Result<bool>;
    async fn follow_status(&self, user_id: &str) -> Result<bool>;
    async fn followers(&self, user_id: &str) -> Result<Vec<UserSummary>>;
    async fn following(&self, user_id: &str) -> Result<Vec<UserSummary>>;
}

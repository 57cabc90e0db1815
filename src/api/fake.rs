// src/api/fake.rs
//! Scripted in-memory backend for manager tests. Records every call it
//! receives so tests can assert which requests were (or were not) issued.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::types::{
    ApplicationTrack, Comment, EducationEntry, ExperienceEntry, LoginResponse, PhotoUpload, Post,
    PostDraft, ProfileUpdate, RegisterForm, SearchQuery, SearchResult, User, UserSummary,
};

use super::JobBoardApi;

#[derive(Default)]
pub(crate) struct FakeApi {
    pub calls: Mutex<Vec<String>>,
    pub fail: Mutex<bool>,
    pub user: Mutex<User>,
    pub owned: Mutex<Vec<Post>>,
    pub other: Mutex<Vec<Post>>,
    pub interactions: Mutex<Vec<Post>>,
    pub working: Mutex<Vec<Post>>,
    pub list_users: Mutex<Vec<UserSummary>>,
    pub comment_log: Mutex<Vec<Comment>>,
    pub follow_map: Mutex<HashMap<String, bool>>,
    pub accepted_login: Mutex<Option<(String, String)>>,
    pub echo_entry_id: Mutex<Option<String>>,
    pub search_results: Mutex<Vec<SearchResult>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    fn record(&self, call: impl Into<String>) -> Result<()> {
        self.calls.lock().unwrap().push(call.into());
        if *self.fail.lock().unwrap() {
            return Err(Error::remote(Some(500), "backend unavailable"));
        }
        Ok(())
    }

    fn each_collection(&self, mut f: impl FnMut(&mut Post)) {
        for collection in [&self.owned, &self.other, &self.interactions, &self.working] {
            for post in collection.lock().unwrap().iter_mut() {
                f(post);
            }
        }
    }
}

#[async_trait]
impl JobBoardApi for FakeApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        self.record(format!("login {email}"))?;
        let accepted = self.accepted_login.lock().unwrap().clone();
        match accepted {
            Some((e, p)) if e == email && p == password => Ok(LoginResponse {
                token: "tok-fake".into(),
                user_id: self.user.lock().unwrap().id.clone(),
                role: "User".into(),
            }),
            _ => Err(Error::remote(Some(401), "Invalid email or password")),
        }
    }

    async fn register(&self, form: &RegisterForm) -> Result<()> {
        self.record(format!("register {}", form.email))
    }

    async fn get_user(&self, user_id: &str) -> Result<User> {
        self.record(format!("get_user {user_id}"))?;
        Ok(self.user.lock().unwrap().clone())
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<()> {
        self.record(format!("update_profile {user_id}"))?;
        let mut user = self.user.lock().unwrap();
        user.first_name = update.first_name.clone();
        user.last_name = update.last_name.clone();
        user.country = update.country.clone();
        user.bio = update.bio.clone();
        user.skills = update.skills.clone();
        Ok(())
    }

    async fn upload_photo(&self, user_id: &str, photo: &PhotoUpload) -> Result<String> {
        self.record(format!("upload_photo {user_id} {}", photo.file_name))?;
        let url = format!("http://cdn.test/{}", photo.file_name);
        self.user.lock().unwrap().profile_photo = Some(url.clone());
        Ok(url)
    }

    async fn add_education(&self, user_id: &str, entry: &EducationEntry) -> Result<Option<String>> {
        self.record(format!("add_education {user_id} {}", entry.school))?;
        Ok(self.echo_entry_id.lock().unwrap().clone())
    }

    async fn delete_education(&self, user_id: &str, entry_id: &str) -> Result<()> {
        self.record(format!("delete_education {user_id} {entry_id}"))
    }

    async fn add_experience(
        &self,
        user_id: &str,
        entry: &ExperienceEntry,
    ) -> Result<Option<String>> {
        self.record(format!("add_experience {user_id} {}", entry.company))?;
        Ok(self.echo_entry_id.lock().unwrap().clone())
    }

    async fn delete_experience(&self, user_id: &str, entry_id: &str) -> Result<()> {
        self.record(format!("delete_experience {user_id} {entry_id}"))
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<String> {
        self.record(format!("create_post {}", draft.job_title))?;
        Ok("p-new".into())
    }

    async fn update_post(&self, post_id: &str, _draft: &PostDraft) -> Result<()> {
        self.record(format!("update_post {post_id}"))
    }

    async fn delete_post(&self, post_id: &str) -> Result<()> {
        self.record(format!("delete_post {post_id}"))?;
        self.owned.lock().unwrap().retain(|p| p.id != post_id);
        Ok(())
    }

    async fn user_posts(&self) -> Result<Vec<Post>> {
        self.record("user_posts")?;
        Ok(self.owned.lock().unwrap().clone())
    }

    async fn other_posts(&self) -> Result<Vec<Post>> {
        self.record("other_posts")?;
        Ok(self.other.lock().unwrap().clone())
    }

    async fn user_interactions(&self) -> Result<Vec<Post>> {
        self.record("user_interactions")?;
        Ok(self.interactions.lock().unwrap().clone())
    }

    async fn working_posts(&self) -> Result<Vec<Post>> {
        self.record("working_posts")?;
        Ok(self.working.lock().unwrap().clone())
    }

    async fn apply(&self, post_id: &str) -> Result<()> {
        self.record(format!("apply {post_id}"))?;
        self.each_collection(|post| {
            if post.id == post_id {
                post.track = match post.track {
                    ApplicationTrack::None => ApplicationTrack::Applied,
                    ApplicationTrack::Applied => ApplicationTrack::None,
                    other => other,
                };
            }
        });
        Ok(())
    }

    async fn interest(&self, post_id: &str) -> Result<()> {
        self.record(format!("interest {post_id}"))?;
        self.each_collection(|post| {
            if post.id == post_id {
                post.interested = !post.interested;
            }
        });
        Ok(())
    }

    async fn remove_application(&self, post_id: &str) -> Result<()> {
        self.record(format!("remove_application {post_id}"))?;
        self.each_collection(|post| {
            if post.id == post_id {
                post.track = ApplicationTrack::None;
            }
        });
        Ok(())
    }

    async fn approve(&self, post_id: &str, user_id: &str) -> Result<()> {
        self.record(format!("approve {post_id} {user_id}"))
    }

    async fn decline(&self, post_id: &str, user_id: &str) -> Result<()> {
        self.record(format!("decline {post_id} {user_id}"))
    }

    async fn applicants(&self, post_id: &str) -> Result<Vec<UserSummary>> {
        self.record(format!("applicants {post_id}"))?;
        Ok(self.list_users.lock().unwrap().clone())
    }

    async fn interested_users(&self, post_id: &str) -> Result<Vec<UserSummary>> {
        self.record(format!("interested_users {post_id}"))?;
        Ok(self.list_users.lock().unwrap().clone())
    }

    async fn working_users(&self, post_id: &str) -> Result<Vec<UserSummary>> {
        self.record(format!("working_users {post_id}"))?;
        Ok(self.list_users.lock().unwrap().clone())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        self.record(format!(
            "search {} {}",
            query.kind.as_param(),
            query.keyword
        ))?;
        Ok(self.search_results.lock().unwrap().clone())
    }

    async fn comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        self.record(format!("comments {post_id}"))?;
        Ok(self.comment_log.lock().unwrap().clone())
    }

    async fn add_comment(&self, post_id: &str, text: &str) -> Result<()> {
        self.record(format!("add_comment {post_id}"))?;
        let mut log = self.comment_log.lock().unwrap();
        let id = format!("c-{}", log.len() + 1);
        log.push(Comment {
            id,
            user_id: self.user.lock().unwrap().id.clone(),
            user_name: "Fake User".into(),
            text: text.to_string(),
            created_at: Some(Utc::now()),
        });
        Ok(())
    }

    async fn follow(&self, user_id: &str) -> Result<bool> {
        self.record(format!("follow {user_id}"))?;
        let mut map = self.follow_map.lock().unwrap();
        let entry = map.entry(user_id.to_string()).or_insert(false);
        *entry = !*entry;
        Ok(*entry)
    }

    async fn follow_status(&self, user_id: &str) -> Result<bool> {
        self.record(format!("follow_status {user_id}"))?;
        Ok(self
            .follow_map
            .lock()
            .unwrap()
            .get(user_id)
            .copied()
            .unwrap_or(false))
    }

    async fn followers(&self, user_id: &str) -> Result<Vec<UserSummary>> {
        self.record(format!("followers {user_id}"))?;
        Ok(self.list_users.lock().unwrap().clone())
    }

    async fn following(&self, user_id: &str) -> Result<Vec<UserSummary>> {
        self.record(format!("following {user_id}"))?;
        Ok(self.list_users.lock().unwrap().clone())
    }
}

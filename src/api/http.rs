// src/api/http.rs
//! reqwest-backed implementation of the REST boundary. All JSON, bearer
//! token attached per request from the injected session store. A 401 on an
//! authenticated request tears the session down globally; a 401 from the
//! login endpoint itself is just a failed login.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::session::SessionStore;
use crate::types::{
    Comment, EducationEntry, ExperienceEntry, LoginResponse, PhotoUpload, Post, PostDraft,
    ProfileUpdate, RegisterForm, SearchQuery, SearchResult, User, UserSummary,
};

use super::JobBoardApi;

const LOGIN_ENDPOINT: &str = "/users/login";
const REGISTER_ENDPOINT: &str = "/users/register";
const CREATE_POST_ENDPOINT: &str = "/posts/create";
const USER_POSTS_ENDPOINT: &str = "/posts/user-posts";
const OTHER_POSTS_ENDPOINT: &str = "/posts/other-posts";
const INTERACTIONS_ENDPOINT: &str = "/posts/user-interactions";
const WORKING_POSTS_ENDPOINT: &str = "/posts/working-posts";
const SEARCH_ENDPOINT: &str = "/search";

/// Whether a request carries the bearer token. Login and register are
/// anonymous by contract, so a 401 from them never invalidates a stored
/// session; everything else runs in bearer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Bearer,
    Anonymous,
}

pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

#[derive(Deserialize)]
struct CreatePostResponse {
    post_id: String,
}

#[derive(Deserialize)]
struct PhotoResponse {
    photo_url: String,
}

#[derive(Deserialize)]
struct CreatedEntryResponse {
    #[serde(rename = "_id", alias = "id")]
    id: Option<String>,
}

#[derive(Deserialize)]
struct FollowResponse {
    #[serde(alias = "is_following")]
    following: bool,
}

impl HttpApi {
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionStore>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::remote(None, format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach credentials per the call's auth mode, send, and map failures
    /// onto the error taxonomy.
    async fn send(&self, request: reqwest::RequestBuilder, auth: Auth) -> Result<reqwest::Response> {
        let request = match auth {
            Auth::Bearer => match self.session.load() {
                Some(session) => request.bearer_auth(session.token),
                None => request,
            },
            Auth::Anonymous => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| Error::remote(None, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.failure(status, auth, &body));
        }
        Ok(response)
    }

    /// Map a non-2xx response onto the error taxonomy. A 401 from a
    /// bearer-mode endpoint means the stored credentials are stale, so the
    /// session is cleared; anonymous endpoints surface the same status as
    /// an ordinary remote failure and leave any stored session alone.
    fn failure(&self, status: StatusCode, auth: Auth, body: &str) -> Error {
        if status == StatusCode::UNAUTHORIZED && auth == Auth::Bearer {
            warn!("Received 401 on an authenticated request; clearing session");
            self.session.clear();
            return Error::session("credentials rejected, sign in again");
        }
        Error::remote(Some(status.as_u16()), extract_message(body, status))
    }

    async fn decode<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| Error::remote(None, format!("failed to decode response: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!("GET {}", path);
        let response = self
            .send(self.client.get(self.url(path)), Auth::Bearer)
            .await?;
        self.decode(response).await
    }

    async fn post_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        debug!("POST {}", path);
        let response = self
            .send(self.client.post(self.url(path)).json(body), Auth::Bearer)
            .await?;
        self.decode(response).await
    }

    async fn post_empty(&self, path: &str) -> Result<()> {
        debug!("POST {}", path);
        self.send(self.client.post(self.url(path)), Auth::Bearer)
            .await?;
        Ok(())
    }

    async fn put_json<B: serde::Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        debug!("PUT {}", path);
        self.send(self.client.put(self.url(path)).json(body), Auth::Bearer)
            .await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        debug!("DELETE {}", path);
        self.send(self.client.delete(self.url(path)), Auth::Bearer)
            .await?;
        Ok(())
    }
}

/// Prefer the server-provided detail (`error` or `message` field), fall
/// back to something generic but status-bearing.
fn extract_message(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }
    format!("request failed with status {status}")
}

#[async_trait]
impl JobBoardApi for HttpApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        debug!("POST {}", LOGIN_ENDPOINT);
        let response = self
            .send(
                self.client
                    .post(self.url(LOGIN_ENDPOINT))
                    .json(&json!({ "email": email, "password": password })),
                Auth::Anonymous,
            )
            .await?;
        self.decode(response).await
    }

    async fn register(&self, form: &RegisterForm) -> Result<()> {
        debug!("POST {}", REGISTER_ENDPOINT);
        self.send(
            self.client.post(self.url(REGISTER_ENDPOINT)).json(form),
            Auth::Anonymous,
        )
        .await?;
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<User> {
        self.get_json(&format!("/users/{user_id}")).await
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<()> {
        self.put_json(&format!("/users/{user_id}/profile"), update)
            .await
    }

    async fn upload_photo(&self, user_id: &str, photo: &PhotoUpload) -> Result<String> {
        let path = format!("/users/{user_id}/photo");
        debug!("POST {} (multipart, {} bytes)", path, photo.bytes.len());

        let part = Part::bytes(photo.bytes.clone())
            .file_name(photo.file_name.clone())
            .mime_str(&photo.mime_type)
            .map_err(|e| Error::validation(format!("invalid MIME type: {e}")))?;
        let form = Form::new().part("photo", part);

        let response = self
            .send(self.client.post(self.url(&path)).multipart(form), Auth::Bearer)
            .await?;
        let photo: PhotoResponse = self.decode(response).await?;
        Ok(photo.photo_url)
    }

    async fn add_education(&self, user_id: &str, entry: &EducationEntry) -> Result<Option<String>> {
        let response = self
            .send(
                self.client
                    .post(self.url(&format!("/users/{user_id}/education")))
                    .json(entry),
                Auth::Bearer,
            )
            .await?;
        let created: CreatedEntryResponse = self.decode(response).await.unwrap_or(
            // the backend historically answered with a bare message
            CreatedEntryResponse { id: None },
        );
        Ok(created.id)
    }

    async fn delete_education(&self, user_id: &str, entry_id: &str) -> Result<()> {
        self.delete(&format!("/users/{user_id}/education/{entry_id}"))
            .await
    }

    async fn add_experience(
        &self,
        user_id: &str,
        entry: &ExperienceEntry,
    ) -> Result<Option<String>> {
        let response = self
            .send(
                self.client
                    .post(self.url(&format!("/users/{user_id}/experience")))
                    .json(entry),
                Auth::Bearer,
            )
            .await?;
        let created: CreatedEntryResponse = self
            .decode(response)
            .await
            .unwrap_or(CreatedEntryResponse { id: None });
        Ok(created.id)
    }

    async fn delete_experience(&self, user_id: &str, entry_id: &str) -> Result<()> {
        self.delete(&format!("/users/{user_id}/experience/{entry_id}"))
            .await
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<String> {
        let created: CreatePostResponse = self.post_json(CREATE_POST_ENDPOINT, draft).await?;
        Ok(created.post_id)
    }

    async fn update_post(&self, post_id: &str, draft: &PostDraft) -> Result<()> {
        self.put_json(&format!("/posts/{post_id}"), draft).await
    }

    async fn delete_post(&self, post_id: &str) -> Result<()> {
        self.delete(&format!("/posts/{post_id}")).await
    }

    async fn user_posts(&self) -> Result<Vec<Post>> {
        self.get_json(USER_POSTS_ENDPOINT).await
    }

    async fn other_posts(&self) -> Result<Vec<Post>> {
        self.get_json(OTHER_POSTS_ENDPOINT).await
    }

    async fn user_interactions(&self) -> Result<Vec<Post>> {
        self.get_json(INTERACTIONS_ENDPOINT).await
    }

    async fn working_posts(&self) -> Result<Vec<Post>> {
        self.get_json(WORKING_POSTS_ENDPOINT).await
    }

    async fn apply(&self, post_id: &str) -> Result<()> {
        self.post_empty(&format!("/posts/{post_id}/apply")).await
    }

    async fn interest(&self, post_id: &str) -> Result<()> {
        self.post_empty(&format!("/posts/{post_id}/interest")).await
    }

    async fn remove_application(&self, post_id: &str) -> Result<()> {
        self.post_empty(&format!("/posts/{post_id}/remove-application"))
            .await
    }

    async fn approve(&self, post_id: &str, user_id: &str) -> Result<()> {
        self.post_empty(&format!("/posts/{post_id}/approve/{user_id}"))
            .await
    }

    async fn decline(&self, post_id: &str, user_id: &str) -> Result<()> {
        self.post_empty(&format!("/posts/{post_id}/decline/{user_id}"))
            .await
    }

    async fn applicants(&self, post_id: &str) -> Result<Vec<UserSummary>> {
        self.get_json(&format!("/posts/{post_id}/applicants")).await
    }

    async fn interested_users(&self, post_id: &str) -> Result<Vec<UserSummary>> {
        self.get_json(&format!("/posts/{post_id}/interested")).await
    }

    async fn working_users(&self, post_id: &str) -> Result<Vec<UserSummary>> {
        self.get_json(&format!("/posts/{post_id}/working-users"))
            .await
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        debug!("GET {} ({})", SEARCH_ENDPOINT, query.kind.as_param());
        let response = self
            .send(
                self.client
                    .get(self.url(SEARCH_ENDPOINT))
                    .query(&query.to_params()),
                Auth::Bearer,
            )
            .await?;
        self.decode(response).await
    }

    async fn comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        self.get_json(&format!("/posts/{post_id}/comments")).await
    }

    async fn add_comment(&self, post_id: &str, text: &str) -> Result<()> {
        let path = format!("/posts/{post_id}/comments");
        debug!("POST {}", path);
        self.send(
            self.client
                .post(self.url(&path))
                .json(&json!({ "text": text })),
            Auth::Bearer,
        )
        .await?;
        Ok(())
    }

    async fn follow(&self, user_id: &str) -> Result<bool> {
        let response = self
            .send(
                self.client.post(self.url(&format!("/users/{user_id}/follow"))),
                Auth::Bearer,
            )
            .await?;
        let follow: FollowResponse = self.decode(response).await?;
        Ok(follow.following)
    }

    async fn follow_status(&self, user_id: &str) -> Result<bool> {
        let follow: FollowResponse = self
            .get_json(&format!("/users/{user_id}/follow-status"))
            .await?;
        Ok(follow.following)
    }

    async fn followers(&self, user_id: &str) -> Result<Vec<UserSummary>> {
        self.get_json(&format!("/users/{user_id}/followers")).await
    }

    async fn following(&self, user_id: &str) -> Result<Vec<UserSummary>> {
        self.get_json(&format!("/users/{user_id}/following")).await
    }
}

// src/social.rs
//! Social Graph Manager: follow/unfollow plus the lazily filled per-user
//! follow-status cache the post cards read from.

use std::sync::Arc;
use tracing::debug;

use crate::api::JobBoardApi;
use crate::state::{DashboardState, Notice, UserListKind, UserListModal};

pub struct SocialGraphManager {
    api: Arc<dyn JobBoardApi>,
}

impl SocialGraphManager {
    pub fn new(api: Arc<dyn JobBoardApi>) -> Self {
        Self { api }
    }

    /// Whether the viewer follows `user_id`, resolved lazily the first
    /// time the id is encountered. The cache is display-only; a lookup
    /// failure renders as "not following" and is not cached, so the next
    /// encounter retries.
    pub async fn follow_status(&self, state: &mut DashboardState, user_id: &str) -> bool {
        if let Some(&status) = state.follow_status.get(user_id) {
            return status;
        }
        match self.api.follow_status(user_id).await {
            Ok(status) => {
                state.follow_status.insert(user_id.to_string(), status);
                status
            }
            Err(e) => {
                debug!("Follow status lookup failed for {}: {}", user_id, e);
                false
            }
        }
    }

    /// Flip the follow edge. Only the one cache entry is updated; if a
    /// followers/following modal is open it is refreshed afterwards.
    pub async fn toggle_follow(&self, state: &mut DashboardState, user_id: &str) {
        state.loading = true;
        let result = self.api.follow(user_id).await;
        state.loading = false;

        match result {
            Ok(now_following) => {
                state
                    .follow_status
                    .insert(user_id.to_string(), now_following);

                let open_follow_list = state.user_list.as_ref().and_then(|m| match m.kind {
                    UserListKind::Followers | UserListKind::Following => {
                        Some((m.kind, m.subject_id.clone()))
                    }
                    _ => None,
                });
                if let Some((kind, subject_id)) = open_follow_list {
                    self.open_list(state, kind, &subject_id).await;
                }
            }
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }

    pub async fn list_followers(&self, state: &mut DashboardState, user_id: &str) {
        self.open_list(state, UserListKind::Followers, user_id).await;
    }

    pub async fn list_following(&self, state: &mut DashboardState, user_id: &str) {
        self.open_list(state, UserListKind::Following, user_id).await;
    }

    /// Fetch-and-display into the shared modal, then resolve follow status
    /// for every listed user individually (bounded by the list size).
    async fn open_list(&self, state: &mut DashboardState, kind: UserListKind, user_id: &str) {
        state.loading = true;
        let result = match kind {
            UserListKind::Followers => self.api.followers(user_id).await,
            UserListKind::Following => self.api.following(user_id).await,
            _ => {
                state.loading = false;
                return;
            }
        };
        state.loading = false;

        match result {
            Ok(users) => {
                for user in &users {
                    let id = user.id.clone();
                    self.follow_status(state, &id).await;
                }
                state.user_list = Some(UserListModal {
                    kind,
                    subject_id: user_id.to_string(),
                    users,
                });
            }
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }
}

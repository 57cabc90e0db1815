// src/posts.rs
//! Post Interaction Manager: the three-plus-one post collections, post CRUD
//! for recruiters, and the per-post relationship workflows for seekers.
//!
//! Mutations never patch collections in place. Every mutating operation
//! declares which collections it invalidates and the manager refetches
//! exactly those, so server-computed fields (counts, relationship lists)
//! cannot diverge from local state.

use std::sync::Arc;
use tracing::{debug, info};

use crate::api::JobBoardApi;
use crate::state::{
    CollectionTab, CommentThread, DashboardState, Notice, UserListKind, UserListModal,
};
use crate::types::{ApplicationTrack, PostDraft};

/// Which remote call `apply_to_post` resolves to for a given track state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApplyCall {
    Toggle,
    Withdraw,
}

pub struct PostManager {
    api: Arc<dyn JobBoardApi>,
}

impl PostManager {
    pub fn new(api: Arc<dyn JobBoardApi>) -> Self {
        Self { api }
    }

    /// Activate a tab and load its collection. Single-select: the other
    /// collections stop being visible by construction.
    pub async fn show_tab(&self, state: &mut DashboardState, tab: CollectionTab) {
        state.tab = Some(tab);
        self.reload(state, tab).await;
    }

    /// Replace one collection wholesale. On failure the prior contents are
    /// left intact and the error is surfaced as a transient banner.
    async fn reload(&self, state: &mut DashboardState, tab: CollectionTab) {
        state.loading = true;
        let result = match tab {
            CollectionTab::Owned => self.api.user_posts().await,
            CollectionTab::Other => self.api.other_posts().await,
            CollectionTab::Interactions => self.api.user_interactions().await,
            CollectionTab::Working => self.api.working_posts().await,
        };
        state.loading = false;

        match result {
            Ok(posts) => {
                debug!("Loaded {} posts for {:?}", posts.len(), tab);
                *state.collection_mut(tab) = posts;
            }
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }

    /// Refetch the invalidated collections, but only the one currently
    /// visible -- hidden collections reload when their tab is next shown.
    async fn refetch_visible(&self, state: &mut DashboardState, invalidated: &[CollectionTab]) {
        if let Some(tab) = state.tab {
            if invalidated.contains(&tab) {
                self.reload(state, tab).await;
            }
        }
    }

    /// Create a post. Success and failure both surface transient banners;
    /// the new post is never inserted optimistically.
    pub async fn create_post(&self, state: &mut DashboardState, draft: &PostDraft) {
        if let Err(e) = draft.validate() {
            state.set_notice(Notice::error(e.to_string()));
            return;
        }

        state.loading = true;
        let result = self.api.create_post(draft).await;
        state.loading = false;

        match result {
            Ok(post_id) => {
                info!("Created post {}", post_id);
                state.show_post_form = false;
                state.set_notice(Notice::success("Post created successfully"));
            }
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }

    pub async fn update_post(&self, state: &mut DashboardState, post_id: &str, draft: &PostDraft) {
        if let Err(e) = draft.validate() {
            state.set_notice(Notice::error(e.to_string()));
            return;
        }

        state.loading = true;
        let result = self.api.update_post(post_id, draft).await;
        state.loading = false;

        match result {
            Ok(()) => {
                state.set_notice(Notice::success("Post updated successfully"));
                self.reload(state, CollectionTab::Owned).await;
            }
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }

    pub async fn delete_post(&self, state: &mut DashboardState, post_id: &str) {
        state.loading = true;
        let result = self.api.delete_post(post_id).await;
        state.loading = false;

        match result {
            Ok(()) => {
                state.set_notice(Notice::success("Post deleted"));
                self.reload(state, CollectionTab::Owned).await;
            }
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }

    /// Apply, un-apply, or withdraw, depending on the viewer's current
    /// application track for the post. A declined application withdraws
    /// through a distinct call rather than the toggle; an approved post
    /// offers no action at all.
    pub async fn apply_to_post(&self, state: &mut DashboardState, post_id: &str) {
        let Some(track) = state.find_post(post_id).map(|p| p.track) else {
            state.set_notice(Notice::error("Post is no longer available"));
            return;
        };

        let call = match track {
            ApplicationTrack::None | ApplicationTrack::Applied => ApplyCall::Toggle,
            ApplicationTrack::Declined => ApplyCall::Withdraw,
            ApplicationTrack::Approved => return,
        };

        state.loading = true;
        let result = match call {
            ApplyCall::Toggle => self.api.apply(post_id).await,
            ApplyCall::Withdraw => self.api.remove_application(post_id).await,
        };
        state.loading = false;

        match result {
            Ok(()) => {
                self.refetch_visible(state, &[CollectionTab::Other, CollectionTab::Interactions])
                    .await;
            }
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }

    /// Toggle interest. Two calls in a row restore the original state.
    pub async fn mark_interest(&self, state: &mut DashboardState, post_id: &str) {
        state.loading = true;
        let result = self.api.interest(post_id).await;
        state.loading = false;

        match result {
            Ok(()) => {
                self.refetch_visible(state, &[CollectionTab::Other, CollectionTab::Interactions])
                    .await;
            }
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }

    pub async fn list_applicants(&self, state: &mut DashboardState, post_id: &str) {
        self.open_user_list(state, UserListKind::Applicants, post_id)
            .await;
    }

    pub async fn list_interested(&self, state: &mut DashboardState, post_id: &str) {
        self.open_user_list(state, UserListKind::Interested, post_id)
            .await;
    }

    pub async fn list_working(&self, state: &mut DashboardState, post_id: &str) {
        self.open_user_list(state, UserListKind::Working, post_id)
            .await;
    }

    /// Fetch-and-display into the shared modal; whatever list was showing
    /// before is replaced, title included.
    async fn open_user_list(&self, state: &mut DashboardState, kind: UserListKind, post_id: &str) {
        state.loading = true;
        let result = match kind {
            UserListKind::Applicants => self.api.applicants(post_id).await,
            UserListKind::Interested => self.api.interested_users(post_id).await,
            UserListKind::Working => self.api.working_users(post_id).await,
            _ => {
                state.loading = false;
                return;
            }
        };
        state.loading = false;

        match result {
            Ok(users) => {
                state.user_list = Some(UserListModal {
                    kind,
                    subject_id: post_id.to_string(),
                    users,
                });
            }
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }

    pub async fn approve_applicant(&self, state: &mut DashboardState, post_id: &str, user_id: &str) {
        self.resolve_applicant(state, post_id, user_id, true).await;
    }

    pub async fn decline_applicant(&self, state: &mut DashboardState, post_id: &str, user_id: &str) {
        self.resolve_applicant(state, post_id, user_id, false).await;
    }

    /// Approve or decline, then refetch only the open applicants list for
    /// that post -- the post collections themselves are not invalidated.
    async fn resolve_applicant(
        &self,
        state: &mut DashboardState,
        post_id: &str,
        user_id: &str,
        approve: bool,
    ) {
        state.loading = true;
        let result = if approve {
            self.api.approve(post_id, user_id).await
        } else {
            self.api.decline(post_id, user_id).await
        };
        state.loading = false;

        match result {
            Ok(()) => {
                state.set_notice(Notice::success(if approve {
                    "Applicant approved"
                } else {
                    "Applicant declined"
                }));
                let applicants_open = state.user_list.as_ref().is_some_and(|m| {
                    m.kind == UserListKind::Applicants && m.subject_id == post_id
                });
                if applicants_open {
                    self.open_user_list(state, UserListKind::Applicants, post_id)
                        .await;
                }
            }
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }

    /// Open the comment thread for a post, fetching it in full. The stored
    /// sort preference is re-applied to the fresh list.
    pub async fn open_comments(&self, state: &mut DashboardState, post_id: &str) {
        state.loading = true;
        let result = self.api.comments(post_id).await;
        state.loading = false;

        match result {
            Ok(mut comments) => {
                state.comment_sort.apply(&mut comments);
                state.comments = Some(CommentThread {
                    post_id: post_id.to_string(),
                    comments,
                });
            }
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }

    /// Post a comment, then fetch the thread in full again. Blank text is
    /// rejected locally with no network traffic.
    pub async fn add_comment(&self, state: &mut DashboardState, post_id: &str, text: &str) {
        if text.trim().is_empty() {
            state.set_notice(Notice::error("Comment cannot be empty"));
            return;
        }

        state.loading = true;
        let result = self.api.add_comment(post_id, text.trim()).await;
        state.loading = false;

        match result {
            Ok(()) => self.open_comments(state, post_id).await,
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }

    /// Flip the sort order and reorder the in-memory thread. No network.
    pub fn toggle_comment_sort(&self, state: &mut DashboardState) {
        state.comment_sort = state.comment_sort.toggled();
        if let Some(thread) = &mut state.comments {
            state.comment_sort.apply(&mut thread.comments);
        }
    }

    pub fn close_user_list(&self, state: &mut DashboardState) {
        state.user_list = None;
    }

    pub fn close_comments(&self, state: &mut DashboardState) {
        state.comments = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::state::NoticeKind;
    use crate::types::{Post, PostType, UserSummary};
    use chrono::{TimeZone, Utc};

    fn post(id: &str, track: ApplicationTrack) -> Post {
        Post {
            id: id.into(),
            user_id: "owner".into(),
            job_title: format!("job {id}"),
            track,
            ..Post::default()
        }
    }

    fn draft() -> PostDraft {
        PostDraft {
            job_title: "Rust Developer".into(),
            description: "Build things".into(),
            required_skills: "Rust".into(),
            required_time: "Full-time".into(),
            location: "Remote".into(),
            post_type: PostType::Remote,
            salary: "$100k".into(),
        }
    }

    fn manager() -> (Arc<FakeApi>, PostManager) {
        let api = Arc::new(FakeApi::new());
        (api.clone(), PostManager::new(api))
    }

    #[tokio::test]
    async fn test_show_tab_replaces_collection_wholesale() {
        let (api, manager) = manager();
        *api.other.lock().unwrap() = vec![post("p1", ApplicationTrack::None)];
        let mut state = DashboardState::new();
        state.other_posts = vec![post("stale", ApplicationTrack::None)];

        manager.show_tab(&mut state, CollectionTab::Other).await;

        assert_eq!(state.tab, Some(CollectionTab::Other));
        assert_eq!(state.other_posts.len(), 1);
        assert_eq!(state.other_posts[0].id, "p1");
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_prior_state() {
        let (api, manager) = manager();
        let mut state = DashboardState::new();
        state.owned_posts = vec![post("keep", ApplicationTrack::None)];
        api.set_fail(true);

        manager.show_tab(&mut state, CollectionTab::Owned).await;

        assert_eq!(state.owned_posts[0].id, "keep");
        assert!(!state.loading, "loading cleared even on failure");
        assert_eq!(state.notice.as_ref().unwrap().kind, NoticeKind::Error);
    }

    #[tokio::test]
    async fn test_create_post_rejects_blank_fields_without_network() {
        let (api, manager) = manager();
        let mut state = DashboardState::new();
        let mut blank = draft();
        blank.description = String::new();

        manager.create_post(&mut state, &blank).await;

        assert_eq!(api.call_count(), 0);
        assert_eq!(state.notice.as_ref().unwrap().kind, NoticeKind::Error);
    }

    #[tokio::test]
    async fn test_create_post_closes_form_and_notifies() {
        let (api, manager) = manager();
        let mut state = DashboardState::new();
        state.show_post_form = true;

        manager.create_post(&mut state, &draft()).await;

        assert!(!state.show_post_form);
        assert_eq!(state.notice.as_ref().unwrap().kind, NoticeKind::Success);
        // no optimistic insert and no refetch
        assert_eq!(api.recorded_calls(), vec!["create_post Rust Developer"]);
        assert!(state.owned_posts.is_empty());
    }

    #[tokio::test]
    async fn test_update_post_refetches_owned_collection() {
        let (api, manager) = manager();
        *api.owned.lock().unwrap() = vec![post("p1", ApplicationTrack::None)];
        let mut state = DashboardState::new();

        manager.update_post(&mut state, "p1", &draft()).await;

        assert_eq!(
            api.recorded_calls(),
            vec!["update_post p1", "user_posts"]
        );
        assert_eq!(state.owned_posts.len(), 1);
    }

    #[tokio::test]
    async fn test_apply_on_declined_post_withdraws_instead_of_toggling() {
        let (api, manager) = manager();
        *api.interactions.lock().unwrap() = vec![post("p1", ApplicationTrack::Declined)];
        let mut state = DashboardState::new();
        manager.show_tab(&mut state, CollectionTab::Interactions).await;

        manager.apply_to_post(&mut state, "p1").await;

        let calls = api.recorded_calls();
        assert!(calls.contains(&"remove_application p1".to_string()));
        assert!(!calls.iter().any(|c| c == "apply p1"));
        // after the refetch the post is gone from the applied filter
        assert!(!state.interaction_posts.iter().any(|p| p.track.is_applied()));
    }

    #[tokio::test]
    async fn test_apply_on_approved_post_is_a_no_op() {
        let (api, manager) = manager();
        *api.working.lock().unwrap() = vec![post("p1", ApplicationTrack::Approved)];
        let mut state = DashboardState::new();
        manager.show_tab(&mut state, CollectionTab::Working).await;
        let before = api.call_count();

        manager.apply_to_post(&mut state, "p1").await;

        assert_eq!(api.call_count(), before);
    }

    #[tokio::test]
    async fn test_apply_refetches_only_visible_collection() {
        let (api, manager) = manager();
        *api.other.lock().unwrap() = vec![post("p1", ApplicationTrack::None)];
        let mut state = DashboardState::new();
        manager.show_tab(&mut state, CollectionTab::Other).await;

        manager.apply_to_post(&mut state, "p1").await;

        assert_eq!(
            api.recorded_calls(),
            vec!["other_posts", "apply p1", "other_posts"]
        );
        assert!(state.other_posts[0].track.is_applied());
    }

    #[tokio::test]
    async fn test_mark_interest_twice_is_involution() {
        let (api, manager) = manager();
        *api.other.lock().unwrap() = vec![post("p1", ApplicationTrack::None)];
        let mut state = DashboardState::new();
        manager.show_tab(&mut state, CollectionTab::Other).await;
        assert!(!state.other_posts[0].interested);

        manager.mark_interest(&mut state, "p1").await;
        assert!(state.other_posts[0].interested);

        manager.mark_interest(&mut state, "p1").await;
        assert!(!state.other_posts[0].interested);
    }

    #[tokio::test]
    async fn test_user_list_modal_replaces_previous_list() {
        let (api, manager) = manager();
        *api.list_users.lock().unwrap() = vec![UserSummary {
            id: "u-2".into(),
            first_name: "Ann".into(),
            ..UserSummary::default()
        }];
        let mut state = DashboardState::new();

        manager.list_applicants(&mut state, "p1").await;
        let modal = state.user_list.as_ref().unwrap();
        assert_eq!(modal.kind, UserListKind::Applicants);
        assert_eq!(modal.kind.title(), "Applicants");
        assert_eq!(modal.subject_id, "p1");

        manager.list_interested(&mut state, "p2").await;
        let modal = state.user_list.as_ref().unwrap();
        assert_eq!(modal.kind, UserListKind::Interested);
        assert_eq!(modal.subject_id, "p2");
    }

    #[tokio::test]
    async fn test_approve_refetches_open_applicants_list_only() {
        let (api, manager) = manager();
        let mut state = DashboardState::new();
        manager.list_applicants(&mut state, "p1").await;

        manager.approve_applicant(&mut state, "p1", "u-2").await;

        assert_eq!(
            api.recorded_calls(),
            vec!["applicants p1", "approve p1 u-2", "applicants p1"]
        );
        assert_eq!(state.notice.as_ref().unwrap().kind, NoticeKind::Success);
    }

    #[tokio::test]
    async fn test_decline_without_open_list_skips_refetch() {
        let (api, manager) = manager();
        let mut state = DashboardState::new();

        manager.decline_applicant(&mut state, "p1", "u-2").await;

        assert_eq!(api.recorded_calls(), vec!["decline p1 u-2"]);
    }

    #[tokio::test]
    async fn test_empty_thread_issues_get_but_no_post() {
        let (api, manager) = manager();
        let mut state = DashboardState::new();

        manager.open_comments(&mut state, "p1").await;

        let thread = state.comments.as_ref().unwrap();
        assert!(thread.comments.is_empty());
        assert_eq!(api.recorded_calls(), vec!["comments p1"]);
    }

    #[tokio::test]
    async fn test_blank_comment_rejected_without_network() {
        let (api, manager) = manager();
        let mut state = DashboardState::new();

        manager.add_comment(&mut state, "p1", "   ").await;

        assert_eq!(api.call_count(), 0);
        assert_eq!(state.notice.as_ref().unwrap().kind, NoticeKind::Error);
    }

    #[tokio::test]
    async fn test_add_comment_refetches_full_thread() {
        let (api, manager) = manager();
        let mut state = DashboardState::new();

        manager.add_comment(&mut state, "p1", "nice role").await;

        assert_eq!(
            api.recorded_calls(),
            vec!["add_comment p1", "comments p1"]
        );
        assert_eq!(state.comments.as_ref().unwrap().comments.len(), 1);
    }

    #[tokio::test]
    async fn test_sort_preference_survives_refetch() {
        let (api, manager) = manager();
        {
            let mut log = api.comment_log.lock().unwrap();
            for (i, text) in ["a", "b"].iter().enumerate() {
                log.push(crate::types::Comment {
                    id: format!("c{i}"),
                    text: (*text).to_string(),
                    created_at: Some(Utc.timestamp_opt(100 + i as i64, 0).unwrap()),
                    ..crate::types::Comment::default()
                });
            }
        }
        let mut state = DashboardState::new();

        manager.open_comments(&mut state, "p1").await;
        // default newest-first
        assert_eq!(state.comments.as_ref().unwrap().comments[0].text, "b");

        let calls_before = api.call_count();
        manager.toggle_comment_sort(&mut state);
        assert_eq!(api.call_count(), calls_before, "sort toggle is local");
        assert_eq!(state.comments.as_ref().unwrap().comments[0].text, "a");

        // refetch keeps the toggled preference
        manager.open_comments(&mut state, "p1").await;
        assert_eq!(state.comments.as_ref().unwrap().comments[0].text, "a");
    }
}

// src/state.rs
//! The shared view-state bag. One instance backs the dashboard view; the
//! three managers mutate it and a renderer reads it. Nothing here is a
//! source of truth -- every collection is a display cache replaced wholesale
//! by its loader.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::profile::ProfileView;
use crate::types::{Comment, Post, SearchResult, UserSummary};

/// Transient banners live this long before a renderer drops them.
pub const NOTICE_TTL_SECS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A short-lived success/error banner. Not queued: a new notice replaces an
/// unexpired one. Expiry is checked against a caller-supplied `now` so the
/// core needs no timers.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub posted_at: DateTime<Utc>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            posted_at: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            posted_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.posted_at >= Duration::seconds(NOTICE_TTL_SECS)
    }
}

/// Single-select tab over the four post collections. Activating one implies
/// the others are hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionTab {
    Owned,
    Other,
    Interactions,
    Working,
}

/// What the shared user-list modal is currently showing. One variant type
/// instead of five near-identical modals; opening any list replaces the
/// previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserListKind {
    Applicants,
    Interested,
    Working,
    Followers,
    Following,
}

impl UserListKind {
    pub fn title(self) -> &'static str {
        match self {
            UserListKind::Applicants => "Applicants",
            UserListKind::Interested => "Interested Users",
            UserListKind::Working => "Working Users",
            UserListKind::Followers => "Followers",
            UserListKind::Following => "Following",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserListModal {
    pub kind: UserListKind,
    /// Post id for the post-side lists, user id for the follow lists.
    pub subject_id: String,
    pub users: Vec<UserSummary>,
}

/// Presentation-side comment ordering; the preference outlives refetches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommentSort {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl CommentSort {
    pub fn toggled(self) -> Self {
        match self {
            CommentSort::NewestFirst => CommentSort::OldestFirst,
            CommentSort::OldestFirst => CommentSort::NewestFirst,
        }
    }

    pub fn apply(self, comments: &mut [Comment]) {
        match self {
            CommentSort::NewestFirst => {
                comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
            CommentSort::OldestFirst => {
                comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentThread {
    pub post_id: String,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Default)]
pub struct DashboardState {
    pub tab: Option<CollectionTab>,
    pub owned_posts: Vec<Post>,
    pub other_posts: Vec<Post>,
    pub interaction_posts: Vec<Post>,
    pub working_posts: Vec<Post>,
    /// One shared flag per view, not per operation.
    pub loading: bool,
    pub notice: Option<Notice>,
    pub user_list: Option<UserListModal>,
    pub comments: Option<CommentThread>,
    pub comment_sort: CommentSort,
    pub show_post_form: bool,
    /// Replaced wholesale by each search; cleared when the view closes.
    pub search_results: Vec<SearchResult>,
    pub profile: ProfileView,
    /// Lazy follow-status cache keyed by user id. Display-only; never
    /// consulted for authorization.
    pub follow_status: HashMap<String, bool>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any unexpired notice; banners are never queued.
    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear_expired_notice(&mut self, now: DateTime<Utc>) {
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
    }

    pub fn collection(&self, tab: CollectionTab) -> &[Post] {
        match tab {
            CollectionTab::Owned => &self.owned_posts,
            CollectionTab::Other => &self.other_posts,
            CollectionTab::Interactions => &self.interaction_posts,
            CollectionTab::Working => &self.working_posts,
        }
    }

    pub fn collection_mut(&mut self, tab: CollectionTab) -> &mut Vec<Post> {
        match tab {
            CollectionTab::Owned => &mut self.owned_posts,
            CollectionTab::Other => &mut self.other_posts,
            CollectionTab::Interactions => &mut self.interaction_posts,
            CollectionTab::Working => &mut self.working_posts,
        }
    }

    /// The collection the active tab is showing, if any.
    pub fn visible_posts(&self) -> &[Post] {
        match self.tab {
            Some(tab) => self.collection(tab),
            None => &[],
        }
    }

    /// First occurrence of a post across all collections.
    pub fn find_post(&self, post_id: &str) -> Option<&Post> {
        [
            CollectionTab::Owned,
            CollectionTab::Other,
            CollectionTab::Interactions,
            CollectionTab::Working,
        ]
        .into_iter()
        .flat_map(|tab| self.collection(tab).iter())
        .find(|p| p.id == post_id)
    }
}

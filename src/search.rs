// src/search.rs
//! Keyword/filter search over posts and people, the one dashboard feature
//! that reads beyond the viewer's own collections.

use std::sync::Arc;
use tracing::debug;

use crate::api::JobBoardApi;
use crate::state::{DashboardState, Notice};
use crate::types::SearchQuery;

pub struct SearchManager {
    api: Arc<dyn JobBoardApi>,
}

impl SearchManager {
    pub fn new(api: Arc<dyn JobBoardApi>) -> Self {
        Self { api }
    }

    /// Run the query and replace the result list wholesale. A failed
    /// search keeps the previous results and surfaces the error as a
    /// transient banner.
    pub async fn search(&self, state: &mut DashboardState, query: &SearchQuery) {
        state.loading = true;
        let result = self.api.search(query).await;
        state.loading = false;

        match result {
            Ok(results) => {
                debug!("Search returned {} results", results.len());
                state.search_results = results;
            }
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }

    pub fn clear_results(&self, state: &mut DashboardState) {
        state.search_results.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::state::NoticeKind;
    use crate::types::SearchResult;

    fn result(id: &str, title: &str) -> SearchResult {
        SearchResult {
            id: id.into(),
            title: title.into(),
            description: String::new(),
        }
    }

    fn manager() -> (Arc<FakeApi>, SearchManager) {
        let api = Arc::new(FakeApi::new());
        (api.clone(), SearchManager::new(api))
    }

    #[tokio::test]
    async fn test_search_replaces_results_wholesale() {
        let (api, manager) = manager();
        *api.search_results.lock().unwrap() = vec![result("p1", "Rust Developer")];
        let mut state = DashboardState::new();
        state.search_results = vec![result("stale", "old")];

        manager.search(&mut state, &SearchQuery::posts("rust")).await;

        assert_eq!(state.search_results.len(), 1);
        assert_eq!(state.search_results[0].id, "p1");
        assert_eq!(api.recorded_calls(), vec!["search post rust"]);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_people_search_issues_person_query() {
        let (api, manager) = manager();
        let mut state = DashboardState::new();

        manager.search(&mut state, &SearchQuery::people("jo")).await;

        assert_eq!(api.recorded_calls(), vec!["search person jo"]);
    }

    #[tokio::test]
    async fn test_failed_search_keeps_prior_results() {
        let (api, manager) = manager();
        let mut state = DashboardState::new();
        state.search_results = vec![result("keep", "kept")];
        api.set_fail(true);

        manager.search(&mut state, &SearchQuery::posts("rust")).await;

        assert_eq!(state.search_results[0].id, "keep");
        assert!(!state.loading);
        assert_eq!(state.notice.as_ref().unwrap().kind, NoticeKind::Error);
    }
}

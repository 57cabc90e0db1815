// src/types/search.rs
use serde::Deserialize;

use crate::types::PostType;

/// What the search runs over. Post searches accept the extra task-type,
/// location and category filters; people searches use keyword, skills and
/// location only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchKind {
    #[default]
    Post,
    Person,
}

impl SearchKind {
    pub fn as_param(self) -> &'static str {
        match self {
            SearchKind::Post => "post",
            SearchKind::Person => "person",
        }
    }
}

/// Filter set for the search endpoint. Blank fields are omitted from the
/// query string; skills repeat as one parameter per token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub kind: SearchKind,
    pub keyword: String,
    pub skills: Vec<String>,
    pub location: String,
    pub task_type: Option<PostType>,
    pub category: String,
}

impl SearchQuery {
    pub fn posts(keyword: impl Into<String>) -> Self {
        Self {
            kind: SearchKind::Post,
            keyword: keyword.into(),
            ..Self::default()
        }
    }

    pub fn people(keyword: impl Into<String>) -> Self {
        Self {
            kind: SearchKind::Person,
            keyword: keyword.into(),
            ..Self::default()
        }
    }

    /// Query-string pairs in the backend's parameter names.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("type", self.kind.as_param().to_string())];
        if !self.keyword.trim().is_empty() {
            params.push(("keyword", self.keyword.trim().to_string()));
        }
        for skill in &self.skills {
            if !skill.trim().is_empty() {
                params.push(("skills", skill.trim().to_string()));
            }
        }
        if !self.location.trim().is_empty() {
            params.push(("location", self.location.trim().to_string()));
        }
        if self.kind == SearchKind::Post {
            if let Some(task_type) = self.task_type {
                let value = match task_type {
                    PostType::Remote => "remote",
                    PostType::Onsite => "onsite",
                    PostType::Hybrid => "hybrid",
                };
                params.push(("task_type", value.to_string()));
            }
            if !self.category.trim().is_empty() {
                params.push(("category", self.category.trim().to_string()));
            }
        }
        params
    }
}

/// One search hit. The backend answers `{id, title, description}` for
/// posts and `{id, name, email}` for people; the aliases fold both shapes
/// into one display row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(alias = "email")]
    pub description: String,
}

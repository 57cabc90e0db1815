// src/types/post.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    Remote,
    Onsite,
    Hybrid,
}

/// The viewer's application-track phase for one post. The wire carries
/// independent booleans; they collapse here so that applied, declined and
/// approved can never be represented at the same time. Interest is a
/// separate, orthogonal flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApplicationTrack {
    #[default]
    None,
    Applied,
    Declined,
    Approved,
}

impl ApplicationTrack {
    /// Collapse the wire booleans. Approved wins over declined wins over
    /// applied: the server grants working status last and it is the most
    /// specific phase.
    pub fn from_flags(applied: bool, declined: bool, working: bool) -> Self {
        if working {
            ApplicationTrack::Approved
        } else if declined {
            ApplicationTrack::Declined
        } else if applied {
            ApplicationTrack::Applied
        } else {
            ApplicationTrack::None
        }
    }

    pub fn is_applied(self) -> bool {
        self == ApplicationTrack::Applied
    }

    pub fn is_declined(self) -> bool {
        self == ApplicationTrack::Declined
    }

    pub fn is_working(self) -> bool {
        self == ApplicationTrack::Approved
    }
}

/// A job post as seen by the current viewer. Relationship fields are
/// viewer-relative and never survive a collection reload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "PostWire")]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub job_title: String,
    pub description: String,
    pub required_skills: String,
    pub required_time: String,
    pub location: String,
    pub post_type: PostType,
    pub salary: String,
    pub created_at: Option<DateTime<Utc>>,
    pub track: ApplicationTrack,
    pub interested: bool,
    pub applicant_count: u32,
    pub interested_count: u32,
    pub comment_count: u32,
}

/// Raw wire shape. The backend mixes camelCase post fields with snake_case
/// bookkeeping fields, so renames are explicit.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PostWire {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    user_id: String,
    #[serde(rename = "jobTitle")]
    job_title: String,
    description: String,
    #[serde(rename = "requiredSkills")]
    required_skills: String,
    #[serde(rename = "requiredTime")]
    required_time: String,
    location: String,
    #[serde(rename = "type")]
    post_type: PostType,
    salary: String,
    created_at: Option<DateTime<Utc>>,
    #[serde(rename = "hasApplied")]
    has_applied: bool,
    #[serde(rename = "isDeclined")]
    is_declined: bool,
    #[serde(rename = "isWorking")]
    is_working: bool,
    #[serde(rename = "isInterested")]
    is_interested: bool,
    #[serde(rename = "applicantCount")]
    applicant_count: u32,
    #[serde(rename = "interestedCount")]
    interested_count: u32,
    #[serde(rename = "commentCount")]
    comment_count: u32,
}

impl From<PostWire> for Post {
    fn from(wire: PostWire) -> Self {
        Post {
            id: wire.id,
            user_id: wire.user_id,
            job_title: wire.job_title,
            description: wire.description,
            required_skills: wire.required_skills,
            required_time: wire.required_time,
            location: wire.location,
            post_type: wire.post_type,
            salary: wire.salary,
            created_at: wire.created_at,
            track: ApplicationTrack::from_flags(
                wire.has_applied,
                wire.is_declined,
                wire.is_working,
            ),
            interested: wire.is_interested,
            applicant_count: wire.applicant_count,
            interested_count: wire.interested_count,
            comment_count: wire.comment_count,
        }
    }
}

/// Create/update payload. All text fields are required by the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub job_title: String,
    pub description: String,
    pub required_skills: String,
    pub required_time: String,
    pub location: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub salary: String,
}

impl PostDraft {
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("job title", &self.job_title),
            ("description", &self.description),
            ("required skills", &self.required_skills),
            ("required time", &self.required_time),
            ("location", &self.location),
            ("salary", &self.salary),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::validation(format!("{name} is required")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Comment {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub user_id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_collapses_conflicting_flags() {
        assert_eq!(
            ApplicationTrack::from_flags(true, true, true),
            ApplicationTrack::Approved
        );
        assert_eq!(
            ApplicationTrack::from_flags(true, true, false),
            ApplicationTrack::Declined
        );
        assert_eq!(
            ApplicationTrack::from_flags(true, false, false),
            ApplicationTrack::Applied
        );
        assert_eq!(
            ApplicationTrack::from_flags(false, false, false),
            ApplicationTrack::None
        );
    }

    #[test]
    fn test_post_deserializes_wire_booleans_into_track() {
        let post: Post = serde_json::from_str(
            r#"{
                "_id": "p1",
                "user_id": "u9",
                "jobTitle": "Senior React Developer",
                "description": "desc",
                "requiredSkills": "react, node",
                "requiredTime": "Full-time",
                "location": "Toronto",
                "type": "hybrid",
                "salary": "90,000",
                "hasApplied": true,
                "isDeclined": true,
                "isInterested": true
            }"#,
        )
        .unwrap();

        assert_eq!(post.post_type, PostType::Hybrid);
        assert_eq!(post.track, ApplicationTrack::Declined);
        assert!(post.interested);
        // at most one application-track phase is representable
        assert!(!post.track.is_applied());
        assert!(!post.track.is_working());
    }

    #[test]
    fn test_draft_validation_requires_all_text_fields() {
        let mut draft = PostDraft {
            job_title: "Title".into(),
            description: "Desc".into(),
            required_skills: "Rust".into(),
            required_time: "Part-time".into(),
            location: "Remote".into(),
            post_type: PostType::Remote,
            salary: "$40/hour".into(),
        };
        assert!(draft.validate().is_ok());

        draft.location = "   ".into();
        let err = draft.validate().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "location is required");
    }
}

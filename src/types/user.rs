// src/types/user.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ===== Account / profile =====

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub country: String,
    pub role: String,
    pub bio: String,
    /// Ordered, duplicate-free; order is insertion order.
    pub skills: Vec<String>,
    pub profile_photo: Option<String>,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    #[serde(rename = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationEntry {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_year: String,
    pub end_year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperienceEntry {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub company: String,
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
}

/// The full editable slice of a profile, sent as one payload on save.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub bio: String,
    pub skills: Vec<String>,
}

/// A photo picked for upload. Validation happens client-side before any
/// network traffic; see `profile::validate_photo`.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

// ===== Auth =====

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub country: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub role: String,
}

// ===== User list entries =====

/// Denormalized display fields for the shared user-list modal
/// (applicants, interested, working, followers, following).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub country: String,
}

impl UserSummary {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

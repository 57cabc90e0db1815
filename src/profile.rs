// src/profile.rs
//! Profile State Manager: loads, edits, and persists the signed-in user's
//! profile. The view walks `Hidden -> Loading -> Viewing <-> Editing`;
//! while editing, at most one of the base form and the add-education /
//! add-experience sub-forms is open.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::JobBoardApi;
use crate::error::{Error, Result};
use crate::session::SessionStore;
use crate::state::{DashboardState, Notice};
use crate::types::{EducationEntry, ExperienceEntry, PhotoUpload, ProfileUpdate, User};

pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ProfileView {
    #[default]
    Hidden,
    Loading,
    Viewing(User),
    Editing {
        /// Canonical profile as last loaded; the draft diverges from it.
        profile: User,
        draft: ProfileDraft,
        section: EditSection,
    },
}

impl ProfileView {
    /// The profile being displayed, regardless of edit mode.
    pub fn user(&self) -> Option<&User> {
        match self {
            ProfileView::Viewing(user) => Some(user),
            ProfileView::Editing { profile, .. } => Some(profile),
            _ => None,
        }
    }

    pub fn user_mut(&mut self) -> Option<&mut User> {
        match self {
            ProfileView::Viewing(user) => Some(user),
            ProfileView::Editing { profile, .. } => Some(profile),
            _ => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, ProfileView::Editing { .. })
    }
}

/// Which part of the edit view is open. The sub-forms are mutually
/// exclusive and entered/exited explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditSection {
    #[default]
    Base,
    AddingEducation,
    AddingExperience,
}

/// Editable snapshot of the profile. Skill mutations are purely local
/// until the whole draft is saved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDraft {
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub bio: String,
    pub skills: Vec<String>,
    /// Token being typed; committed to `skills` on an explicit gesture.
    pub pending_skill: String,
}

impl ProfileDraft {
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            country: user.country.clone(),
            bio: user.bio.clone(),
            skills: user.skills.clone(),
            pending_skill: String::new(),
        }
    }

    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            country: self.country.clone(),
            bio: self.bio.clone(),
            skills: self.skills.clone(),
        }
    }

    /// Commit the pending token to the skill list. Blank tokens and
    /// duplicates are silently ignored; the pending token is cleared
    /// either way.
    pub fn commit_skill(&mut self) {
        let token = std::mem::take(&mut self.pending_skill);
        let token = token.trim();
        if !token.is_empty() && !self.skills.iter().any(|s| s == token) {
            self.skills.push(token.to_string());
        }
    }

    pub fn remove_skill(&mut self, token: &str) {
        self.skills.retain(|s| s != token);
    }

    /// Single-step undo: with nothing pending, drop the last skill.
    pub fn retract_skill(&mut self) -> Option<String> {
        if self.pending_skill.is_empty() {
            self.skills.pop()
        } else {
            None
        }
    }
}

/// Client-side photo constraints; violations never reach the network.
pub fn validate_photo(photo: &PhotoUpload) -> Result<()> {
    if !photo.mime_type.starts_with("image/") {
        return Err(Error::validation(format!(
            "{} is not an image",
            photo.file_name
        )));
    }
    if photo.bytes.len() > MAX_PHOTO_BYTES {
        return Err(Error::validation(format!(
            "Image is too large ({:.1} MB, max 5 MB)",
            photo.bytes.len() as f64 / 1024.0 / 1024.0
        )));
    }
    Ok(())
}

fn temp_entry_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

pub struct ProfileManager {
    api: Arc<dyn JobBoardApi>,
    session: Arc<dyn SessionStore>,
}

impl ProfileManager {
    pub fn new(api: Arc<dyn JobBoardApi>, session: Arc<dyn SessionStore>) -> Self {
        Self { api, session }
    }

    /// Load the session user's full profile. A missing session id is a
    /// user-visible error with the loading state cleared.
    pub async fn load_profile(&self, state: &mut DashboardState) {
        let Some(session) = self.session.load() else {
            state.profile = ProfileView::Hidden;
            state.loading = false;
            state.set_notice(Notice::error("No active session. Please sign in again."));
            return;
        };

        state.profile = ProfileView::Loading;
        state.loading = true;
        let result = self.api.get_user(&session.user_id).await;
        state.loading = false;

        match result {
            Ok(user) => {
                debug!("Loaded profile for {}", user.id);
                state.profile = ProfileView::Viewing(user);
            }
            Err(e) => {
                state.profile = ProfileView::Hidden;
                state.set_notice(Notice::error(e.to_string()));
            }
        }
    }

    /// Snapshot the profile into a draft. Pure local transition.
    pub fn begin_edit(&self, state: &mut DashboardState) {
        state.profile = match std::mem::take(&mut state.profile) {
            ProfileView::Viewing(user) => {
                let draft = ProfileDraft::from_user(&user);
                ProfileView::Editing {
                    profile: user,
                    draft,
                    section: EditSection::Base,
                }
            }
            other => other,
        };
    }

    /// Discard the draft and close any open sub-form.
    pub fn cancel_edit(&self, state: &mut DashboardState) {
        state.profile = match std::mem::take(&mut state.profile) {
            ProfileView::Editing { profile, .. } => ProfileView::Viewing(profile),
            other => other,
        };
    }

    /// Switch between the base form and the add-entry sub-forms.
    pub fn open_section(&self, state: &mut DashboardState, section: EditSection) {
        if let ProfileView::Editing { section: current, .. } = &mut state.profile {
            *current = section;
        }
    }

    /// Send the full draft. Success merges the accepted fields into the
    /// canonical profile and exits edit mode; failure keeps the draft open.
    pub async fn save_profile(&self, state: &mut DashboardState) {
        let (user_id, update) = match &state.profile {
            ProfileView::Editing { profile, draft, .. } => (profile.id.clone(), draft.to_update()),
            _ => return,
        };

        state.loading = true;
        let result = self.api.update_profile(&user_id, &update).await;
        state.loading = false;

        match result {
            Ok(()) => {
                if let ProfileView::Editing { mut profile, draft, .. } =
                    std::mem::take(&mut state.profile)
                {
                    profile.first_name = draft.first_name;
                    profile.last_name = draft.last_name;
                    profile.country = draft.country;
                    profile.bio = draft.bio;
                    profile.skills = draft.skills;
                    state.profile = ProfileView::Viewing(profile);
                }
                state.set_notice(Notice::success("Profile updated successfully"));
            }
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }

    /// Validate locally, then upload as multipart. Passing validation is a
    /// precondition for any network traffic.
    pub async fn upload_photo(&self, state: &mut DashboardState, photo: &PhotoUpload) {
        if let Err(e) = validate_photo(photo) {
            state.set_notice(Notice::error(e.to_string()));
            return;
        }
        let Some(user_id) = state.profile.user().map(|u| u.id.clone()) else {
            return;
        };

        state.loading = true;
        let result = self.api.upload_photo(&user_id, photo).await;
        state.loading = false;

        match result {
            Ok(url) => {
                info!("Profile photo updated");
                if let Some(user) = state.profile.user_mut() {
                    user.profile_photo = Some(url);
                }
                state.set_notice(Notice::success("Photo uploaded successfully"));
            }
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }

    /// Remote create, then a local append rather than a refetch. The entry
    /// keeps a time-based temporary id until the server echoes one.
    pub async fn add_education(&self, state: &mut DashboardState, mut entry: EducationEntry) {
        let Some(user_id) = state.profile.user().map(|u| u.id.clone()) else {
            return;
        };

        state.loading = true;
        let result = self.api.add_education(&user_id, &entry).await;
        state.loading = false;

        match result {
            Ok(echoed_id) => {
                entry.id = echoed_id.unwrap_or_else(temp_entry_id);
                if let Some(user) = state.profile.user_mut() {
                    user.education.push(entry);
                }
                self.open_section(state, EditSection::Base);
            }
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }

    pub async fn delete_education(&self, state: &mut DashboardState, entry_id: &str) {
        let Some(user_id) = state.profile.user().map(|u| u.id.clone()) else {
            return;
        };

        state.loading = true;
        let result = self.api.delete_education(&user_id, entry_id).await;
        state.loading = false;

        match result {
            Ok(()) => {
                if let Some(user) = state.profile.user_mut() {
                    user.education.retain(|e| e.id != entry_id);
                }
            }
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }

    pub async fn add_experience(&self, state: &mut DashboardState, mut entry: ExperienceEntry) {
        let Some(user_id) = state.profile.user().map(|u| u.id.clone()) else {
            return;
        };

        state.loading = true;
        let result = self.api.add_experience(&user_id, &entry).await;
        state.loading = false;

        match result {
            Ok(echoed_id) => {
                entry.id = echoed_id.unwrap_or_else(temp_entry_id);
                if let Some(user) = state.profile.user_mut() {
                    user.experience.push(entry);
                }
                self.open_section(state, EditSection::Base);
            }
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }

    pub async fn delete_experience(&self, state: &mut DashboardState, entry_id: &str) {
        let Some(user_id) = state.profile.user().map(|u| u.id.clone()) else {
            return;
        };

        state.loading = true;
        let result = self.api.delete_experience(&user_id, entry_id).await;
        state.loading = false;

        match result {
            Ok(()) => {
                if let Some(user) = state.profile.user_mut() {
                    user.experience.retain(|e| e.id != entry_id);
                }
            }
            Err(e) => state.set_notice(Notice::error(e.to_string())),
        }
    }

    // Skill edits are draft-local; nothing is sent until save_profile.

    pub fn stage_skill(&self, state: &mut DashboardState, token: &str) {
        if let ProfileView::Editing { draft, .. } = &mut state.profile {
            draft.pending_skill = token.to_string();
        }
    }

    pub fn commit_skill(&self, state: &mut DashboardState) {
        if let ProfileView::Editing { draft, .. } = &mut state.profile {
            draft.commit_skill();
        }
    }

    pub fn remove_skill(&self, state: &mut DashboardState, token: &str) {
        if let ProfileView::Editing { draft, .. } = &mut state.profile {
            draft.remove_skill(token);
        }
    }

    pub fn retract_skill(&self, state: &mut DashboardState) {
        if let ProfileView::Editing { draft, .. } = &mut state.profile {
            draft.retract_skill();
        }
    }
}

// src/cli.rs
//! Command-line driver for the client core. Each subcommand maps onto one
//! dashboard action; the session persists between invocations through a
//! JSON file next to the working directory.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::HttpApi;
use crate::auth::AuthManager;
use crate::config::ClientConfig;
use crate::posts::PostManager;
use crate::profile::{EditSection, ProfileManager, ProfileView};
use crate::search::SearchManager;
use crate::session::{FileSessionStore, SessionStore};
use crate::social::SocialGraphManager;
use crate::state::{CollectionTab, DashboardState, NoticeKind};
use crate::types::{
    EducationEntry, ExperienceEntry, PhotoUpload, Post, PostDraft, PostType, RegisterForm,
    SearchQuery, UserSummary,
};

#[derive(Parser)]
#[command(name = "hireme")]
#[command(about = "Command-line client for the hireme job marketplace")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// API base URL; overrides config file and HIREME_API_URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Optional TOML config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "hireme-session.json")]
    pub session_file: PathBuf,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum TabArg {
    Owned,
    #[default]
    Other,
    Interactions,
    Working,
}

impl From<TabArg> for CollectionTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Owned => CollectionTab::Owned,
            TabArg::Other => CollectionTab::Other,
            TabArg::Interactions => CollectionTab::Interactions,
            TabArg::Working => CollectionTab::Working,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum TypeArg {
    #[default]
    Remote,
    Onsite,
    Hybrid,
}

impl From<TypeArg> for PostType {
    fn from(t: TypeArg) -> Self {
        match t {
            TypeArg::Remote => PostType::Remote,
            TypeArg::Onsite => PostType::Onsite,
            TypeArg::Hybrid => PostType::Hybrid,
        }
    }
}

#[derive(clap::Args, Clone, Debug)]
pub struct PostFields {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub skills: String,
    #[arg(long)]
    pub time: String,
    #[arg(long)]
    pub location: String,
    #[arg(long, value_enum, default_value_t)]
    pub job_type: TypeArg,
    #[arg(long)]
    pub salary: String,
}

impl From<PostFields> for PostDraft {
    fn from(fields: PostFields) -> Self {
        PostDraft {
            job_title: fields.title,
            description: fields.description,
            required_skills: fields.skills,
            required_time: fields.time,
            location: fields.location,
            post_type: fields.job_type.into(),
            salary: fields.salary,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an account
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        country: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in and persist the session
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Drop the persisted session
    Logout,
    /// Show the signed-in user's profile
    Profile,
    /// Edit profile fields; omitted flags keep their current value
    EditProfile {
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        country: Option<String>,
        /// May be given multiple times; duplicates are ignored
        #[arg(long)]
        skill: Vec<String>,
    },
    /// Upload a profile photo
    UploadPhoto { path: PathBuf },
    AddEducation {
        #[arg(long)]
        school: String,
        #[arg(long)]
        degree: String,
        #[arg(long, default_value = "")]
        field: String,
        #[arg(long, default_value = "")]
        start_year: String,
        #[arg(long, default_value = "")]
        end_year: String,
    },
    DeleteEducation { id: String },
    AddExperience {
        #[arg(long)]
        company: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        start_date: String,
        #[arg(long, default_value = "")]
        end_date: String,
    },
    DeleteExperience { id: String },
    /// List one of the post collections
    Posts {
        #[arg(long, value_enum, default_value_t)]
        tab: TabArg,
    },
    CreatePost {
        #[command(flatten)]
        fields: PostFields,
    },
    UpdatePost {
        id: String,
        #[command(flatten)]
        fields: PostFields,
    },
    DeletePost { id: String },
    /// Apply to (or withdraw from) a post
    Apply { post_id: String },
    /// Toggle interest in a post
    Interest { post_id: String },
    Applicants { post_id: String },
    Approve { post_id: String, user_id: String },
    Decline { post_id: String, user_id: String },
    Comments { post_id: String },
    Comment { post_id: String, text: String },
    /// Search posts or people
    Search {
        keyword: String,
        /// Search people instead of posts
        #[arg(long)]
        people: bool,
        /// May be given multiple times
        #[arg(long)]
        skill: Vec<String>,
        #[arg(long)]
        location: Option<String>,
        /// Post searches only
        #[arg(long, value_enum)]
        task_type: Option<TypeArg>,
        /// Post searches only
        #[arg(long)]
        category: Option<String>,
    },
    /// Toggle following a user
    Follow { user_id: String },
    Followers { user_id: String },
    Following { user_id: String },
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!(e.to_string()))
        .context("failed to load configuration")?;
    if let Some(url) = &cli.base_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }

    let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(cli.session_file.clone()));
    let api = Arc::new(
        HttpApi::new(&config, session.clone()).map_err(|e| anyhow::anyhow!(e.to_string()))?,
    );

    let auth = AuthManager::new(api.clone(), session.clone());
    let profile = ProfileManager::new(api.clone(), session.clone());
    let posts = PostManager::new(api.clone());
    let social = SocialGraphManager::new(api.clone());
    let search = SearchManager::new(api.clone());

    let mut state = DashboardState::new();

    match cli.command {
        Command::Register {
            first_name,
            last_name,
            email,
            country,
            password,
        } => {
            let form = RegisterForm {
                first_name,
                last_name,
                email: email.clone(),
                country,
                password,
                role: None,
            };
            auth.register(&form)
                .await
                .map_err(|e| anyhow::anyhow!(e.to_string()))?;
            println!("Registered {email}. You can now log in.");
        }

        Command::Login { email, password } => {
            let session = auth
                .login(&email, &password)
                .await
                .map_err(|e| anyhow::anyhow!(e.to_string()))?;
            println!("Logged in as {} ({})", email, session.role);
        }

        Command::Logout => {
            auth.logout();
            println!("Logged out.");
        }

        Command::Profile => {
            profile.load_profile(&mut state).await;
            print_profile(&state);
        }

        Command::EditProfile { bio, country, skill } => {
            profile.load_profile(&mut state).await;
            profile.begin_edit(&mut state);
            if let ProfileView::Editing { draft, .. } = &mut state.profile {
                if let Some(bio) = bio {
                    draft.bio = bio;
                }
                if let Some(country) = country {
                    draft.country = country;
                }
                for token in skill {
                    draft.pending_skill = token;
                    draft.commit_skill();
                }
            }
            profile.save_profile(&mut state).await;
            print_profile(&state);
        }

        Command::UploadPhoto { path } => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("photo")
                .to_string();
            let photo = PhotoUpload {
                mime_type: guess_mime(&file_name).to_string(),
                file_name,
                bytes,
            };
            profile.load_profile(&mut state).await;
            profile.upload_photo(&mut state, &photo).await;
        }

        Command::AddEducation {
            school,
            degree,
            field,
            start_year,
            end_year,
        } => {
            profile.load_profile(&mut state).await;
            profile.begin_edit(&mut state);
            profile.open_section(&mut state, EditSection::AddingEducation);
            profile
                .add_education(
                    &mut state,
                    EducationEntry {
                        id: String::new(),
                        school,
                        degree,
                        field_of_study: field,
                        start_year,
                        end_year,
                    },
                )
                .await;
        }

        Command::DeleteEducation { id } => {
            profile.load_profile(&mut state).await;
            profile.delete_education(&mut state, &id).await;
        }

        Command::AddExperience {
            company,
            title,
            description,
            start_date,
            end_date,
        } => {
            profile.load_profile(&mut state).await;
            profile.begin_edit(&mut state);
            profile.open_section(&mut state, EditSection::AddingExperience);
            profile
                .add_experience(
                    &mut state,
                    ExperienceEntry {
                        id: String::new(),
                        company,
                        title,
                        description,
                        start_date,
                        end_date,
                    },
                )
                .await;
        }

        Command::DeleteExperience { id } => {
            profile.load_profile(&mut state).await;
            profile.delete_experience(&mut state, &id).await;
        }

        Command::Posts { tab } => {
            posts.show_tab(&mut state, tab.into()).await;
            print_posts(state.visible_posts());
        }

        Command::CreatePost { fields } => {
            posts.create_post(&mut state, &fields.into()).await;
        }

        Command::UpdatePost { id, fields } => {
            posts.update_post(&mut state, &id, &fields.into()).await;
        }

        Command::DeletePost { id } => {
            posts.delete_post(&mut state, &id).await;
        }

        Command::Apply { post_id } => {
            posts.show_tab(&mut state, CollectionTab::Other).await;
            if state.find_post(&post_id).is_none() {
                // declined applications live in the interactions collection
                posts.show_tab(&mut state, CollectionTab::Interactions).await;
            }
            posts.apply_to_post(&mut state, &post_id).await;
        }

        Command::Interest { post_id } => {
            posts.show_tab(&mut state, CollectionTab::Other).await;
            posts.mark_interest(&mut state, &post_id).await;
        }

        Command::Applicants { post_id } => {
            posts.list_applicants(&mut state, &post_id).await;
            print_user_list(&state);
        }

        Command::Approve { post_id, user_id } => {
            posts.approve_applicant(&mut state, &post_id, &user_id).await;
        }

        Command::Decline { post_id, user_id } => {
            posts.decline_applicant(&mut state, &post_id, &user_id).await;
        }

        Command::Comments { post_id } => {
            posts.open_comments(&mut state, &post_id).await;
            print_comments(&state);
        }

        Command::Comment { post_id, text } => {
            posts.add_comment(&mut state, &post_id, &text).await;
            print_comments(&state);
        }

        Command::Search {
            keyword,
            people,
            skill,
            location,
            task_type,
            category,
        } => {
            let mut query = if people {
                SearchQuery::people(keyword)
            } else {
                SearchQuery::posts(keyword)
            };
            query.skills = skill;
            query.location = location.unwrap_or_default();
            query.task_type = task_type.map(Into::into);
            query.category = category.unwrap_or_default();

            search.search(&mut state, &query).await;
            print_search_results(&state);
        }

        Command::Follow { user_id } => {
            social.toggle_follow(&mut state, &user_id).await;
            if let Some(&following) = state.follow_status.get(&user_id) {
                println!(
                    "{}",
                    if following { "Now following." } else { "Unfollowed." }
                );
            }
        }

        Command::Followers { user_id } => {
            social.list_followers(&mut state, &user_id).await;
            print_user_list(&state);
        }

        Command::Following { user_id } => {
            social.list_following(&mut state, &user_id).await;
            print_user_list(&state);
        }
    }

    print_notice(&state);
    Ok(())
}

/// Extension-based MIME lookup for the upload path; unknown extensions
/// fall through to a type the validator will reject.
fn guess_mime(file_name: &str) -> &'static str {
    let ext = file_name.rsplit('.').next().unwrap_or_default();
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

fn print_notice(state: &DashboardState) {
    if let Some(notice) = &state.notice {
        match notice.kind {
            NoticeKind::Success => println!("{}", notice.message),
            NoticeKind::Error => eprintln!("Error: {}", notice.message),
        }
    }
}

fn print_profile(state: &DashboardState) {
    let Some(user) = state.profile.user() else {
        return;
    };
    println!("{} <{}>", user.display_name(), user.email);
    println!("  country: {}", user.country);
    if !user.bio.is_empty() {
        println!("  bio: {}", user.bio);
    }
    if !user.skills.is_empty() {
        println!("  skills: {}", user.skills.join(", "));
    }
    for edu in &user.education {
        println!("  education [{}]: {} - {}", edu.id, edu.school, edu.degree);
    }
    for exp in &user.experience {
        println!("  experience [{}]: {} - {}", exp.id, exp.company, exp.title);
    }
    println!(
        "  followers: {}  following: {}",
        user.followers.len(),
        user.following.len()
    );
}

fn print_posts(posts: &[Post]) {
    if posts.is_empty() {
        println!("No posts.");
        return;
    }
    for post in posts {
        println!(
            "[{}] {} ({:?}, {}) - {}",
            post.id, post.job_title, post.post_type, post.location, post.salary
        );
        println!(
            "    applied: {}  interested: {}  working: {}",
            post.track.is_applied(),
            post.interested,
            post.track.is_working()
        );
    }
}

fn print_search_results(state: &DashboardState) {
    if state.search_results.is_empty() {
        println!("No results.");
        return;
    }
    for result in &state.search_results {
        println!("[{}] {}", result.id, result.title);
        if !result.description.is_empty() {
            println!("    {}", result.description);
        }
    }
}

fn print_user_list(state: &DashboardState) {
    let Some(modal) = &state.user_list else {
        return;
    };
    println!("{}:", modal.kind.title());
    if modal.users.is_empty() {
        println!("  (none)");
    }
    for user in &modal.users {
        print_user_row(user, state);
    }
}

fn print_user_row(user: &UserSummary, state: &DashboardState) {
    let following = state.follow_status.get(&user.id).copied().unwrap_or(false);
    println!(
        "  [{}] {} <{}>{}",
        user.id,
        user.display_name(),
        user.email,
        if following { " (following)" } else { "" }
    );
}

fn print_comments(state: &DashboardState) {
    let Some(thread) = &state.comments else {
        return;
    };
    if thread.comments.is_empty() {
        println!("No comments yet.");
        return;
    }
    for comment in &thread.comments {
        let when = comment
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("  {} {}: {}", when, comment.user_name, comment.text);
    }
}

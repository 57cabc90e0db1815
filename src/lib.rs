// src/lib.rs
//! Headless client core for the hireme job marketplace.
//!
//! Everything the dashboard needs short of rendering: a typed REST surface
//! ([`api::JobBoardApi`] / [`api::HttpApi`]), an injectable session store,
//! one shared view-state bag ([`state::DashboardState`]), and the
//! managers that mutate it through request/refetch cycles:
//! [`profile::ProfileManager`], [`posts::PostManager`],
//! [`social::SocialGraphManager`], and [`search::SearchManager`].

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod posts;
pub mod profile;
pub mod search;
pub mod session;
pub mod social;
pub mod state;
pub mod types;

pub use api::{HttpApi, JobBoardApi};
pub use auth::AuthManager;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use posts::PostManager;
pub use profile::{ProfileManager, ProfileView};
pub use search::SearchManager;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
pub use social::SocialGraphManager;
pub use state::DashboardState;

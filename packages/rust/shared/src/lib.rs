//! Shared types, error model, and configuration for StudyBuddy.
//!
//! This crate is the foundation depended on by all other StudyBuddy crates.
//! It provides:
//! - [`StudyBuddyError`], the unified error type
//! - Domain types ([`UploadedFile`], [`SyllabusAnalysis`], [`SessionId`])
//! - The [`Notifier`] channel for user-facing messages
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod notify;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, OpenRouterConfig, api_key, config_dir, config_file_path, init_config, load_config,
    load_config_from, validate_api_key,
};
pub use error::{Result, StudyBuddyError};
pub use notify::{Notifier, RecordingNotifier, Severity, SilentNotifier};
pub use types::{DocumentKind, SessionId, SyllabusAnalysis, UploadedFile};

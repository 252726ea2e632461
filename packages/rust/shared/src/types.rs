//! Core domain types for StudyBuddy sessions.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{Result, StudyBuddyError};

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one interactive session (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new session identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// DocumentKind
// ---------------------------------------------------------------------------

/// Document families the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    /// `.doc` or `.docx`.
    Word,
}

impl DocumentKind {
    /// Classify a filename by its suffix. Matching is case-sensitive, so
    /// `NOTES.PDF` is not a PDF.
    pub fn from_filename(name: &str) -> Option<Self> {
        if name.ends_with(".pdf") {
            Some(Self::Pdf)
        } else if name.ends_with(".doc") || name.ends_with(".docx") {
            Some(Self::Word)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// UploadedFile
// ---------------------------------------------------------------------------

/// A course document held in session memory. Identity is the filename.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as uploaded (no directory part).
    pub name: String,
    /// Raw file bytes.
    pub content: Vec<u8>,
    /// When the file entered the session.
    pub uploaded_at: DateTime<Utc>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
            uploaded_at: Utc::now(),
        }
    }

    /// Read a file from disk, naming it after the final path component.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                StudyBuddyError::validation(format!("'{}' is not a file path", path.display()))
            })?;
        let content = std::fs::read(path).map_err(|e| StudyBuddyError::io(path, e))?;
        Ok(Self::new(name, content))
    }

    /// Declared size in bytes.
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_filename(&self.name)
    }
}

// ---------------------------------------------------------------------------
// SyllabusAnalysis
// ---------------------------------------------------------------------------

/// Structured syllabus summary decoded from the model's JSON answer.
///
/// All four course keys are required, but their values are kept exactly as
/// the model wrote them: a name may be `null`, topics may be strings or
/// objects, and the grading breakdown may be a map, a list or prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyllabusAnalysis {
    pub course_name: Value,
    pub course_objectives: Value,
    pub main_topics: Value,
    pub grading_breakdown: Value,
    /// Keys the model added beyond the four requested ones.
    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl SyllabusAnalysis {
    /// Strictly decode a model response. The error carries the decode reason
    /// and the raw text.
    pub fn from_response(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| StudyBuddyError::malformed(e, raw))
    }

    /// The course name when the model gave it as a string.
    pub fn course_title(&self) -> Option<&str> {
        self.course_name.as_str()
    }

    /// Number of main topics: list length, zero for `null`, one otherwise.
    pub fn topic_count(&self) -> usize {
        match &self.main_topics {
            Value::Array(items) => items.len(),
            Value::Null => 0,
            _ => 1,
        }
    }
}

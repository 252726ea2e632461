//! Core study-assistant logic for StudyBuddy.
//!
//! This crate ties together document extraction, corpus aggregation and the
//! model-backed study operations into the session actions a front end drives
//! (upload, analyze syllabus, create chatbot, ask).

pub mod corpus;
pub mod orchestrator;
pub mod prompts;
pub mod session;

#[cfg(test)]
mod testing;

pub use corpus::Corpus;
pub use orchestrator::StudyAssistant;
pub use session::{Activity, Controller, ProgressReporter, Session, SilentProgress};

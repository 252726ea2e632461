//! Session state and the user-action handlers that drive it.
//!
//! [`Session`] is plain state owned by one interaction context. The
//! [`Controller`] borrows it mutably for each action and reports outcomes
//! through a [`Notifier`]; nothing here returns an error to the caller.

use tracing::{debug, info, instrument, warn};

use studybuddy_extract::extract_text;
use studybuddy_llm::TextGenerator;
use studybuddy_shared::{Notifier, SessionId, SyllabusAnalysis, UploadedFile};

use crate::corpus::Corpus;
use crate::orchestrator::StudyAssistant;

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Long-running steps a front end may want to show a spinner for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    AnalyzingSyllabus,
    CreatingChatbot,
    GeneratingRoadmap,
    Thinking,
}

impl Activity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AnalyzingSyllabus => "Analyzing syllabus...",
            Self::CreatingChatbot => "Creating your chatbot...",
            Self::GeneratingRoadmap => "Generating roadmap...",
            Self::Thinking => "Thinking...",
        }
    }
}

/// Progress callback for session actions.
pub trait ProgressReporter: Send + Sync {
    /// Called when an activity begins.
    fn started(&self, activity: Activity);
    /// Called when the most recently started activity ends, successfully or not.
    fn finished(&self, activity: Activity);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn started(&self, _activity: Activity) {}
    fn finished(&self, _activity: Activity) {}
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Everything one user has uploaded and produced so far.
#[derive(Debug, Default)]
pub struct Session {
    id: SessionId,
    files: Vec<UploadedFile>,
    syllabus_analysis: Option<SyllabusAnalysis>,
    roadmap: Option<String>,
    corpus: Option<Corpus>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Course materials in upload order.
    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn syllabus_analysis(&self) -> Option<&SyllabusAnalysis> {
        self.syllabus_analysis.as_ref()
    }

    pub fn roadmap(&self) -> Option<&str> {
        self.roadmap.as_deref()
    }

    /// Corpus from the last chatbot build, if it is still current.
    pub fn corpus(&self) -> Option<&Corpus> {
        self.corpus.as_ref()
    }

    /// Add files whose name is not already in the session. The first upload
    /// of a name wins; later files with the same name are ignored even if
    /// their content differs. Returns how many files were added.
    #[instrument(skip_all, fields(session = %self.id))]
    pub fn upload(&mut self, files: impl IntoIterator<Item = UploadedFile>) -> usize {
        let mut added = 0;
        for file in files {
            if self.files.iter().any(|f| f.name == file.name) {
                debug!(file = %file.name, "already uploaded, skipping");
                continue;
            }
            debug!(file = %file.name, size = file.size(), "file uploaded");
            self.files.push(file);
            added += 1;
        }
        if added > 0 {
            // New material makes the previous corpus stale.
            self.corpus = None;
        }
        added
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

const UPLOAD_REQUIRED: &str = "Please upload at least one course material file.";

/// Runs user actions against a [`Session`].
pub struct Controller<'a, G> {
    assistant: &'a StudyAssistant<G>,
    notifier: &'a dyn Notifier,
    progress: &'a dyn ProgressReporter,
}

impl<'a, G: TextGenerator> Controller<'a, G> {
    pub fn new(
        assistant: &'a StudyAssistant<G>,
        notifier: &'a dyn Notifier,
        progress: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            assistant,
            notifier,
            progress,
        }
    }

    /// Extract and analyze a syllabus, storing the result on success.
    ///
    /// A syllabus that yields no text is skipped without a model call; the
    /// extractor has already told the user why. Returns `true` when a new
    /// analysis was stored.
    #[instrument(skip_all, fields(session = %session.id, file = %syllabus.name))]
    pub async fn upload_syllabus(&self, session: &mut Session, syllabus: &UploadedFile) -> bool {
        let text = extract_text(syllabus, self.notifier).into_text();
        if text.is_empty() {
            debug!("syllabus has no text, skipping analysis");
            return false;
        }

        self.progress.started(Activity::AnalyzingSyllabus);
        let result = self.assistant.analyze_syllabus(&text).await;
        self.progress.finished(Activity::AnalyzingSyllabus);

        match result {
            Ok(analysis) => {
                session.syllabus_analysis = Some(analysis);
                self.notifier.info("Syllabus analyzed!");
                true
            }
            Err(e) => {
                warn!(error = %e, "syllabus analysis failed");
                self.notifier
                    .error(&format!("An error occurred while analyzing the syllabus: {e}"));
                false
            }
        }
    }

    /// Build the corpus and, when a syllabus analysis exists, a roadmap.
    ///
    /// Returns `false` only when there are no course files; a failed roadmap
    /// still leaves the chatbot ready.
    #[instrument(skip_all, fields(session = %session.id, files = session.files.len()))]
    pub async fn create_chatbot(&self, session: &mut Session) -> bool {
        if session.files.is_empty() {
            self.notifier.info(UPLOAD_REQUIRED);
            return false;
        }

        self.progress.started(Activity::CreatingChatbot);
        let corpus = Corpus::build(&session.files, self.notifier);
        self.progress.finished(Activity::CreatingChatbot);

        if let Some(analysis) = &session.syllabus_analysis {
            self.progress.started(Activity::GeneratingRoadmap);
            let result = self
                .assistant
                .generate_roadmap(analysis, corpus.as_str())
                .await;
            self.progress.finished(Activity::GeneratingRoadmap);

            match result {
                Ok(roadmap) => {
                    session.roadmap = Some(roadmap);
                    self.notifier.info("Roadmap generated!");
                }
                Err(e) => {
                    warn!(error = %e, "roadmap generation failed");
                    self.notifier
                        .error(&format!("An error occurred while generating the roadmap: {e}"));
                }
            }
        }

        session.corpus = Some(corpus);
        info!("chatbot ready");
        self.notifier.info("Chatbot ready!");
        true
    }

    /// Answer a question against the whole corpus, building the corpus first
    /// if no chatbot has been created since the last upload.
    ///
    /// Blank questions are ignored, and without course files the user is
    /// asked to upload some. Returns the model's answer unchanged.
    #[instrument(skip_all, fields(session = %session.id))]
    pub async fn ask(&self, session: &mut Session, question: &str) -> Option<String> {
        if question.trim().is_empty() {
            return None;
        }
        if session.files.is_empty() {
            self.notifier.info(UPLOAD_REQUIRED);
            return None;
        }

        let corpus = session
            .corpus
            .get_or_insert_with(|| Corpus::build(&session.files, self.notifier));

        self.progress.started(Activity::Thinking);
        let result = self
            .assistant
            .answer_question(question, corpus.as_str())
            .await;
        self.progress.finished(Activity::Thinking);

        match result {
            Ok(answer) => Some(answer),
            Err(e) => {
                warn!(error = %e, "question answering failed");
                self.notifier
                    .error(&format!("An error occurred while processing your question: {e}"));
                None
            }
        }
    }
}

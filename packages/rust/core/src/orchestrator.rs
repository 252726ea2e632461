//! Prompt orchestration: render a template, make one model call, post-process.

use tracing::{info, instrument};

use studybuddy_llm::TextGenerator;
use studybuddy_shared::{Result, StudyBuddyError, SyllabusAnalysis};

use crate::prompts;

/// The three model-backed study operations. Each makes exactly one request
/// and never retries; failures go back to the caller untouched.
#[derive(Debug)]
pub struct StudyAssistant<G> {
    generator: G,
}

impl<G: TextGenerator> StudyAssistant<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Ask the model for a structured syllabus summary and strictly decode it.
    #[instrument(skip_all, fields(model = %self.generator.model(), syllabus_chars = syllabus.len()))]
    pub async fn analyze_syllabus(&self, syllabus: &str) -> Result<SyllabusAnalysis> {
        let raw = self
            .generator
            .generate(&prompts::syllabus_analysis(syllabus))
            .await?;
        let analysis = SyllabusAnalysis::from_response(&raw)?;
        info!(
            course = analysis.course_title().unwrap_or("<unnamed>"),
            topics = analysis.topic_count(),
            "syllabus analyzed"
        );
        Ok(analysis)
    }

    /// Produce a study plan from a prior analysis and the whole corpus.
    #[instrument(skip_all, fields(model = %self.generator.model(), corpus_chars = corpus.len()))]
    pub async fn generate_roadmap(
        &self,
        analysis: &SyllabusAnalysis,
        corpus: &str,
    ) -> Result<String> {
        let analysis_json = serde_json::to_string_pretty(analysis).map_err(|e| {
            StudyBuddyError::validation(format!("failed to render syllabus analysis: {e}"))
        })?;
        let roadmap = self
            .generator
            .generate(&prompts::roadmap(&analysis_json, corpus))
            .await?;
        info!(roadmap_chars = roadmap.len(), "roadmap generated");
        Ok(roadmap)
    }

    /// Answer from the corpus only. When the corpus does not cover the
    /// question the model is told to reply with [`prompts::NOT_SURE_ANSWER`].
    #[instrument(skip_all, fields(model = %self.generator.model(), corpus_chars = corpus.len()))]
    pub async fn answer_question(&self, question: &str, corpus: &str) -> Result<String> {
        self.generator
            .generate(&prompts::question_answer(question, corpus))
            .await
    }
}

//! In-process [`TextGenerator`] fakes for unit tests.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

use studybuddy_llm::TextGenerator;
use studybuddy_shared::{Result, StudyBuddyError};

/// Replays queued replies in order and records every prompt it receives.
#[derive(Default)]
pub(crate) struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, text: &str) -> Self {
        self.push(Ok(text.to_string()))
    }

    pub(crate) fn fail(self, err: StudyBuddyError) -> Self {
        self.push(Err(err))
    }

    fn push(self, reply: Result<String>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn model(&self) -> &str {
        "scripted"
    }

    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(StudyBuddyError::Network("no scripted reply left".into())));
        async move { reply }
    }
}

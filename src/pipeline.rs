//! The question pipeline: classify, analyze, interpret, remember.
//!
//! Each question is handled to completion before the next one is accepted.

use crate::analysis::{dispatch, Category, FreelancerAnalyzer};
use crate::error::PipelineError;
use crate::llm::{classify, interpret, ChatModel};
use crate::memory::{SessionHistory, DEFAULT_HISTORY_WINDOW};
use tracing::{info, warn};

/// Prefix of every answer produced for a failed question.
pub const PIPELINE_ERROR_PREFIX: &str = "Произошла ошибка при обработке вопроса";

pub struct AnalysisPipeline<M: ChatModel> {
    analyzer: FreelancerAnalyzer,
    model: M,
    history: SessionHistory,
    history_window: usize,
}

impl<M: ChatModel> AnalysisPipeline<M> {
    pub fn new(analyzer: FreelancerAnalyzer, model: M) -> Self {
        Self {
            analyzer,
            model,
            history: SessionHistory::new(),
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    pub fn with_history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    pub fn analyzer(&self) -> &FreelancerAnalyzer {
        &self.analyzer
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    /// Answer a question. Never fails: any error becomes the answer text.
    pub async fn analyze_question(&mut self, question: &str) -> String {
        match self.try_analyze_question(question).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Question failed: {}", e);
                format!("{}: {}", PIPELINE_ERROR_PREFIX, e)
            }
        }
    }

    async fn try_analyze_question(&mut self, question: &str) -> Result<String, PipelineError> {
        let label = classify(&self.model, question)
            .await
            .map_err(PipelineError::Classification)?;
        let category = Category::from(label.as_str());
        if !category.is_recognized() {
            info!("Label '{}' matches no analysis, using fallback", category);
        }

        let results = dispatch(&self.analyzer, &category, question);
        let formatted = serde_json::to_string_pretty(&results)?;

        let context = self.history.format_context(self.history_window);
        let answer = interpret(&self.model, question, &formatted, context.as_deref())
            .await
            .map_err(PipelineError::Interpretation)?;

        self.history.append(question, answer.as_str());
        Ok(answer)
    }
}

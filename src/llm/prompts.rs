//! Prompt templates and the two model-backed steps: classification and
//! interpretation.

use crate::analysis::Category;
use crate::error::LlmError;
use crate::llm::{ChatMessage, ChatModel};
use tracing::{debug, info};

const CLASSIFICATION_SYSTEM_PROMPT: &str = r#"You route questions about a dataset of freelancer earnings to an analysis.
Reply with exactly one label from the list and nothing else."#;

const INTERPRETATION_SYSTEM_PROMPT: &str = r#"You are a data analyst explaining statistics about freelancer earnings.
Answer the user's question using only the analysis results provided.
Quote concrete numbers, compare groups where it helps, and keep the answer short.
If the results contain an "error" key, explain that the analysis could not be completed.
If the results contain a "message" key, say that the question needs a more detailed
analysis and describe what the general dataset statistics show.
Answer in the language of the question and format the answer as Markdown."#;

/// Describe each category for the classifier.
fn category_description(category: &Category) -> &'static str {
    match category {
        Category::PaymentMethod => "earnings by payment method (which payment methods pay best)",
        Category::Region => "earnings, success rate and client rating by client region",
        Category::Expert => "expert-level freelancers and how many completed fewer than 100 projects",
        Category::CryptoComparison => "freelancers paid in cryptocurrency compared with all other payment methods",
        Category::GeneralInfo => "general information about the dataset: size, columns, data types",
        Category::Unrecognized(_) => "",
    }
}

/// Build the classification request for a question.
pub fn classification_messages(question: &str) -> Vec<ChatMessage> {
    let mut prompt = String::from("Labels:\n");
    for category in Category::KNOWN.iter() {
        prompt.push_str(&format!(
            "- {}: {}\n",
            category.label(),
            category_description(category)
        ));
    }
    prompt.push_str("- other: anything that fits none of the above\n\n");
    prompt.push_str(&format!("Question: {}\n\nLabel:", question));

    vec![
        ChatMessage::system(CLASSIFICATION_SYSTEM_PROMPT),
        ChatMessage::user(prompt),
    ]
}

/// Build the interpretation request from the serialized analysis results.
pub fn interpretation_messages(
    question: &str,
    analysis_results: &str,
    context: Option<&str>,
) -> Vec<ChatMessage> {
    let mut prompt = String::new();

    if let Some(context) = context.filter(|c| !c.is_empty()) {
        prompt.push_str("=== PREVIOUS CONVERSATION ===\n");
        prompt.push_str(context);
        prompt.push_str("\n\n");
    }

    prompt.push_str(&format!("Question: {}\n\n", question));
    prompt.push_str("=== ANALYSIS RESULTS (JSON) ===\n");
    prompt.push_str(analysis_results);
    prompt.push_str("\n=== END OF RESULTS ===\n\nAnswer:");

    vec![
        ChatMessage::system(INTERPRETATION_SYSTEM_PROMPT),
        ChatMessage::user(prompt),
    ]
}

/// Ask the model which analysis a question needs.
///
/// Returns the raw label text; parsing into a [`Category`] happens at the
/// caller so unknown labels stay visible.
pub async fn classify<M: ChatModel>(model: &M, question: &str) -> Result<String, LlmError> {
    let label = model.complete(&classification_messages(question)).await?;
    info!("Question classified as '{}'", label.trim());
    Ok(label)
}

/// Ask the model to narrate analysis results as an answer to the question.
pub async fn interpret<M: ChatModel>(
    model: &M,
    question: &str,
    analysis_results: &str,
    context: Option<&str>,
) -> Result<String, LlmError> {
    debug!(
        "Interpreting {} bytes of results (context: {})",
        analysis_results.len(),
        context.is_some()
    );
    model
        .complete(&interpretation_messages(question, analysis_results, context))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_prompt_lists_every_label() {
        let messages = classification_messages("Какой регион лучше?");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");

        let prompt = &messages[1].content;
        for category in Category::KNOWN.iter() {
            assert!(prompt.contains(category.label()));
        }
        assert!(prompt.contains("Какой регион лучше?"));
    }

    #[test]
    fn test_interpretation_prompt_context() {
        let without = interpretation_messages("q", "{}", None);
        assert!(!without[1].content.contains("PREVIOUS CONVERSATION"));

        let empty = interpretation_messages("q", "{}", Some(""));
        assert!(!empty[1].content.contains("PREVIOUS CONVERSATION"));

        let with = interpretation_messages("q", "{\"a\": 1}", Some("Q: x\nA: y"));
        assert!(with[1].content.contains("PREVIOUS CONVERSATION"));
        assert!(with[1].content.contains("Q: x\nA: y"));
        assert!(with[1].content.contains("{\"a\": 1}"));
    }
}

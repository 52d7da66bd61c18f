//! Routes a category to its aggregation and shapes the result as JSON.
//!
//! Aggregation failures are reported inside the payload under an `error`
//! key so that the interpreter always has something to narrate.

use crate::analysis::analyzer::FreelancerAnalyzer;
use crate::analysis::category::Category;
use crate::error::AnalysisError;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

pub const FALLBACK_MESSAGE: &str = "Для данного типа вопроса требуется дополнительный анализ";
pub const ANALYSIS_ERROR_PREFIX: &str = "Ошибка при анализе данных";

/// Run the analysis for `category` and return its result payload.
pub fn dispatch(analyzer: &FreelancerAnalyzer, category: &Category, question: &str) -> Value {
    debug!("Dispatching '{}' as {}", question, category);

    let outcome = match category {
        Category::PaymentMethod => to_payload(analyzer.payment_method_breakdown()),
        Category::Region => to_payload(analyzer.region_breakdown()),
        Category::Expert => to_payload(analyzer.expert_analysis()),
        Category::CryptoComparison => to_payload(analyzer.crypto_vs_other()),
        Category::GeneralInfo => to_payload(Ok(analyzer.dataset_info())),
        Category::Unrecognized(label) => {
            debug!("Unrecognized category '{}', falling back to dataset info", label);
            to_payload(Ok(analyzer.dataset_info())).map(|general_stats| {
                json!({
                    "message": FALLBACK_MESSAGE,
                    "general_stats": general_stats,
                })
            })
        }
    };

    outcome.unwrap_or_else(|e| {
        warn!("Analysis for {} failed: {}", category, e);
        json!({ "error": format!("{}: {}", ANALYSIS_ERROR_PREFIX, e) })
    })
}

/// Serialize an aggregation result. An absent result becomes `{}`.
fn to_payload<T: Serialize>(result: Result<T, AnalysisError>) -> Result<Value, String> {
    let value = result.map_err(|e| e.to_string())?;
    match serde_json::to_value(value).map_err(|e| e.to_string())? {
        Value::Null => Ok(Value::Object(Map::new())),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::tests::{mock_table, table_from};
    use crate::data::Table;

    fn analyzer() -> FreelancerAnalyzer {
        FreelancerAnalyzer::new(mock_table())
    }

    #[test]
    fn test_dispatch_payment_method() {
        let payload = dispatch(&analyzer(), &Category::PaymentMethod, "q");
        assert_eq!(payload["Crypto"]["avg_earnings"], json!(1100.0));
        assert_eq!(payload["Crypto"]["total_freelancers"], json!(2));
    }

    #[test]
    fn test_dispatch_region_and_expert() {
        let analyzer = analyzer();

        let regions = dispatch(&analyzer, &Category::Region, "q");
        assert_eq!(regions["EU"]["total_freelancers"], json!(2));

        let experts = dispatch(&analyzer, &Category::Expert, "q");
        assert_eq!(experts["percentage"], json!(66.67));
    }

    #[test]
    fn test_dispatch_crypto_and_general_info() {
        let analyzer = analyzer();

        let crypto = dispatch(&analyzer, &Category::CryptoComparison, "q");
        assert_eq!(crypto["crypto_stats"]["count"], json!(2));

        let info = dispatch(&analyzer, &Category::GeneralInfo, "q");
        assert_eq!(info["total_records"], json!(4));
    }

    #[test]
    fn test_unrecognized_category_falls_back() {
        let payload = dispatch(
            &analyzer(),
            &Category::Unrecognized("weather".to_string()),
            "Какая сегодня погода?",
        );

        assert_eq!(payload["message"], json!(FALLBACK_MESSAGE));
        assert_eq!(payload["general_stats"]["total_records"], json!(4));
        assert!(payload.get("error").is_none());
    }

    #[test]
    fn test_analysis_error_becomes_payload() {
        let table = table_from(&[["Bank", "800", "40", "US", "Beginner", "10", "95", "4.8"]]);
        let payload = dispatch(&FreelancerAnalyzer::new(table), &Category::Expert, "q");

        let error = payload["error"].as_str().unwrap();
        assert!(error.starts_with(ANALYSIS_ERROR_PREFIX));
        assert!(error.contains("Division by zero"));
    }

    #[test]
    fn test_missing_column_becomes_payload() {
        let table = Table::from_rows(&["Other"], vec![vec!["x".to_string()]]);
        let payload = dispatch(&FreelancerAnalyzer::new(table), &Category::Region, "q");
        assert!(payload["error"].as_str().unwrap().contains("Client_Region"));
    }

    #[test]
    fn test_empty_table_gives_empty_mapping() {
        let analyzer = FreelancerAnalyzer::new(table_from(&[]));

        for category in Category::KNOWN.iter() {
            assert_eq!(dispatch(&analyzer, category, "q"), json!({}));
        }
    }
}

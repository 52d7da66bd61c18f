//! Analysis categories produced by the question classifier.

use std::fmt;

/// The closed set of analyses a question can be routed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    PaymentMethod,
    Region,
    Expert,
    CryptoComparison,
    GeneralInfo,
    /// Any label the classifier produced that is not one of the above.
    Unrecognized(String),
}

impl Category {
    /// Every routable category, in the order they are offered to the classifier.
    pub const KNOWN: [Category; 5] = [
        Category::PaymentMethod,
        Category::Region,
        Category::Expert,
        Category::CryptoComparison,
        Category::GeneralInfo,
    ];

    /// The wire label the classifier is asked to answer with.
    pub fn label(&self) -> &str {
        match self {
            Category::PaymentMethod => "payment_method",
            Category::Region => "region",
            Category::Expert => "expert",
            Category::CryptoComparison => "crypto_comparison",
            Category::GeneralInfo => "general_info",
            Category::Unrecognized(label) => label,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Category::Unrecognized(_))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parse free classifier output. Surrounding whitespace, quotes and
/// backticks are ignored, as is letter case.
impl From<&str> for Category {
    fn from(s: &str) -> Self {
        let cleaned = s
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c == '.')
            .trim();

        match cleaned.to_lowercase().as_str() {
            "payment_method" => Category::PaymentMethod,
            "region" => Category::Region,
            "expert" => Category::Expert,
            "crypto_comparison" => Category::CryptoComparison,
            "general_info" => Category::GeneralInfo,
            _ => Category::Unrecognized(cleaned.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str() {
        assert_eq!(Category::from("payment_method"), Category::PaymentMethod);
        assert_eq!(Category::from("  region\n"), Category::Region);
        assert_eq!(Category::from("`EXPERT`"), Category::Expert);
        assert_eq!(
            Category::from("\"crypto_comparison\""),
            Category::CryptoComparison
        );
        assert_eq!(Category::from("general_info."), Category::GeneralInfo);
        assert_eq!(
            Category::from(" other "),
            Category::Unrecognized("other".to_string())
        );
    }

    #[test]
    fn test_label_round_trip_for_known() {
        for category in Category::KNOWN.iter() {
            assert_eq!(&Category::from(category.label()), category);
            assert!(category.is_recognized());
        }
        assert!(!Category::from("weather").is_recognized());
    }
}

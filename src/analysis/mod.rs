//! Aggregations over the earnings table and the category dispatcher.

pub mod analyzer;
pub mod category;
pub mod dispatcher;
pub mod models;
pub mod stats;

pub use analyzer::FreelancerAnalyzer;
pub use category::Category;
pub use dispatcher::dispatch;

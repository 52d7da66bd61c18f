//! Result records produced by the aggregations.
//!
//! Every record serializes to plain JSON numbers and strings. Absent
//! statistics (mean of an empty group) serialize as `null`.

use crate::data::{CellValue, ColumnType};
use serde::Serialize;
use std::collections::BTreeMap;

/// Overview of the loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetInfo {
    pub total_records: usize,
    pub columns: Vec<String>,
    pub data_types: BTreeMap<String, ColumnType>,
    pub missing_values: BTreeMap<String, usize>,
    pub sample_data: Vec<BTreeMap<String, Option<CellValue>>>,
}

/// Earnings statistics for one payment method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentMethodStats {
    pub avg_earnings: Option<f64>,
    pub median_earnings: Option<f64>,
    pub total_freelancers: usize,
    pub total_earnings: f64,
    pub avg_hourly_rate: Option<f64>,
    pub median_hourly_rate: Option<f64>,
}

/// Earnings and quality statistics for one client region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionStats {
    pub avg_earnings: Option<f64>,
    pub median_earnings: Option<f64>,
    pub total_freelancers: usize,
    pub total_earnings: f64,
    pub avg_hourly_rate: Option<f64>,
    pub median_hourly_rate: Option<f64>,
    pub avg_success_rate: Option<f64>,
    pub avg_client_rating: Option<f64>,
}

/// Share of experts with fewer than 100 completed jobs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpertSummary {
    pub total_experts: usize,
    pub experts_under_100_projects: usize,
    pub percentage: f64,
    pub avg_earnings_under_100: Option<f64>,
    pub avg_earnings_all_experts: Option<f64>,
}

/// Statistics for one side of the crypto / other split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionStats {
    pub count: usize,
    pub avg_earnings: Option<f64>,
    pub median_earnings: Option<f64>,
    pub avg_hourly_rate: Option<f64>,
}

/// Crypto minus other.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarningsDifference {
    pub earnings_difference: Option<f64>,
    pub hourly_rate_difference: Option<f64>,
    pub percentage_difference: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CryptoComparison {
    pub crypto_stats: PartitionStats,
    pub other_stats: PartitionStats,
    pub difference: EarningsDifference,
}

//! Category-specific aggregations over the freelancer earnings table.

use crate::analysis::models::{
    CryptoComparison, DatasetInfo, EarningsDifference, ExpertSummary, PartitionStats,
    PaymentMethodStats, RegionStats,
};
use crate::analysis::stats::{self, round2, round2_opt};
use crate::data::{self, Table};
use crate::error::{AnalysisError, DataError};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

pub const PAYMENT_METHOD: &str = "Payment_Method";
pub const EARNINGS: &str = "Earnings_USD";
pub const HOURLY_RATE: &str = "Hourly_Rate";
pub const CLIENT_REGION: &str = "Client_Region";
pub const EXPERIENCE_LEVEL: &str = "Experience_Level";
pub const JOBS_COMPLETED: &str = "Job_Completed";
pub const JOB_SUCCESS_RATE: &str = "Job_Success_Rate";
pub const CLIENT_RATING: &str = "Client_Rating";

const EXPERT_LEVEL: &str = "Expert";
const CRYPTO_METHOD: &str = "Crypto";
const PROJECT_THRESHOLD: f64 = 100.0;

/// Default number of leading records included in [`DatasetInfo::sample_data`].
pub const DEFAULT_SAMPLE_ROWS: usize = 5;

/// Owns the record table and answers the fixed set of aggregation queries.
///
/// The table is loaded once at construction and never modified. Every
/// operation returns an empty result for a table without records, and a
/// [`AnalysisError`] when a required column is missing or has the wrong type.
#[derive(Debug, Clone)]
pub struct FreelancerAnalyzer {
    table: Table,
    sample_rows: usize,
}

impl FreelancerAnalyzer {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            sample_rows: DEFAULT_SAMPLE_ROWS,
        }
    }

    /// Load the dataset eagerly. A missing file fails here, not on first use.
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let table = data::load(path)?;
        Ok(Self::new(table))
    }

    pub fn with_sample_rows(mut self, sample_rows: usize) -> Self {
        self.sample_rows = sample_rows;
        self
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Record count, column names and types, missing values and a sample.
    pub fn dataset_info(&self) -> Option<DatasetInfo> {
        if self.table.is_empty() {
            return None;
        }

        let summaries = self.table.summaries();
        Some(DatasetInfo {
            total_records: self.table.len(),
            columns: self.table.column_names(),
            data_types: summaries
                .iter()
                .map(|c| (c.name.clone(), c.column_type))
                .collect(),
            missing_values: summaries
                .iter()
                .map(|c| (c.name.clone(), c.missing))
                .collect(),
            sample_data: self.table.head(self.sample_rows),
        })
    }

    /// Earnings and hourly rate statistics per payment method.
    pub fn payment_method_breakdown(
        &self,
    ) -> Result<BTreeMap<String, PaymentMethodStats>, AnalysisError> {
        if self.table.is_empty() {
            return Ok(BTreeMap::new());
        }

        let methods = self.table.labels(PAYMENT_METHOD)?;
        let earnings = self.table.numbers(EARNINGS)?;
        let rates = self.table.numbers(HOURLY_RATE)?;

        let results: BTreeMap<_, _> = stats::group_rows(&methods)
            .into_iter()
            .map(|(method, rows)| {
                let group_earnings = stats::select(&earnings, &rows);
                let group_rates = stats::select(&rates, &rows);
                let group = PaymentMethodStats {
                    avg_earnings: round2_opt(stats::mean(&group_earnings)),
                    median_earnings: round2_opt(stats::median(&group_earnings)),
                    total_freelancers: rows.len(),
                    total_earnings: round2(stats::sum(&group_earnings)),
                    avg_hourly_rate: round2_opt(stats::mean(&group_rates)),
                    median_hourly_rate: round2_opt(stats::median(&group_rates)),
                };
                (method, group)
            })
            .collect();

        debug!("Payment method breakdown: {} groups", results.len());
        Ok(results)
    }

    /// Earnings, rate, success rate and rating statistics per client region.
    pub fn region_breakdown(&self) -> Result<BTreeMap<String, RegionStats>, AnalysisError> {
        if self.table.is_empty() {
            return Ok(BTreeMap::new());
        }

        let regions = self.table.labels(CLIENT_REGION)?;
        let earnings = self.table.numbers(EARNINGS)?;
        let rates = self.table.numbers(HOURLY_RATE)?;
        let success = self.table.numbers(JOB_SUCCESS_RATE)?;
        let ratings = self.table.numbers(CLIENT_RATING)?;

        let results: BTreeMap<_, _> = stats::group_rows(&regions)
            .into_iter()
            .map(|(region, rows)| {
                let group_earnings = stats::select(&earnings, &rows);
                let group_rates = stats::select(&rates, &rows);
                let group = RegionStats {
                    avg_earnings: round2_opt(stats::mean(&group_earnings)),
                    median_earnings: round2_opt(stats::median(&group_earnings)),
                    total_freelancers: rows.len(),
                    total_earnings: round2(stats::sum(&group_earnings)),
                    avg_hourly_rate: round2_opt(stats::mean(&group_rates)),
                    median_hourly_rate: round2_opt(stats::median(&group_rates)),
                    avg_success_rate: round2_opt(stats::mean(&stats::select(&success, &rows))),
                    avg_client_rating: round2_opt(stats::mean(&stats::select(&ratings, &rows))),
                };
                (region, group)
            })
            .collect();

        debug!("Region breakdown: {} groups", results.len());
        Ok(results)
    }

    /// How many experts have completed fewer than 100 jobs.
    ///
    /// Fails with [`AnalysisError::DivisionByZero`] when the table holds no
    /// expert-level records.
    pub fn expert_analysis(&self) -> Result<Option<ExpertSummary>, AnalysisError> {
        if self.table.is_empty() {
            return Ok(None);
        }

        let levels = self.table.labels(EXPERIENCE_LEVEL)?;
        let jobs = self.table.numbers(JOBS_COMPLETED)?;
        let earnings = self.table.numbers(EARNINGS)?;

        let experts: Vec<usize> = levels
            .iter()
            .enumerate()
            .filter(|(_, level)| level.as_deref() == Some(EXPERT_LEVEL))
            .map(|(row, _)| row)
            .collect();

        let under_100: Vec<usize> = experts
            .iter()
            .copied()
            .filter(|&row| matches!(jobs[row], Some(n) if n < PROJECT_THRESHOLD))
            .collect();

        let percentage = stats::percentage(under_100.len() as f64, experts.len() as f64)
            .ok_or(AnalysisError::DivisionByZero(
                "no expert-level freelancers to compute a percentage of",
            ))?;

        Ok(Some(ExpertSummary {
            total_experts: experts.len(),
            experts_under_100_projects: under_100.len(),
            percentage: round2(percentage),
            avg_earnings_under_100: stats::mean(&stats::select(&earnings, &under_100)),
            avg_earnings_all_experts: stats::mean(&stats::select(&earnings, &experts)),
        }))
    }

    /// Crypto payments against every other payment method.
    ///
    /// Records with a missing payment method count as "other", so the two
    /// partitions always cover the whole table. Differences are absent when
    /// either side has no earnings. Fails with
    /// [`AnalysisError::DivisionByZero`] when the "other" mean earnings is zero.
    pub fn crypto_vs_other(&self) -> Result<Option<CryptoComparison>, AnalysisError> {
        if self.table.is_empty() {
            return Ok(None);
        }

        let methods = self.table.labels(PAYMENT_METHOD)?;
        let earnings = self.table.numbers(EARNINGS)?;
        let rates = self.table.numbers(HOURLY_RATE)?;

        let (crypto, other): (Vec<usize>, Vec<usize>) =
            (0..methods.len()).partition(|&row| methods[row].as_deref() == Some(CRYPTO_METHOD));

        let crypto_stats = partition_stats(&crypto, &earnings, &rates);
        let other_stats = partition_stats(&other, &earnings, &rates);

        let percentage_difference = match (crypto_stats.avg_earnings, other_stats.avg_earnings) {
            (_, Some(other_mean)) if other_mean == 0.0 => {
                return Err(AnalysisError::DivisionByZero(
                    "mean earnings of non-crypto freelancers is zero",
                ))
            }
            (Some(crypto_mean), Some(other_mean)) => {
                stats::percentage(crypto_mean - other_mean, other_mean).map(round2)
            }
            _ => None,
        };

        let difference = EarningsDifference {
            earnings_difference: difference(crypto_stats.avg_earnings, other_stats.avg_earnings),
            hourly_rate_difference: difference(
                crypto_stats.avg_hourly_rate,
                other_stats.avg_hourly_rate,
            ),
            percentage_difference,
        };

        Ok(Some(CryptoComparison {
            crypto_stats,
            other_stats,
            difference,
        }))
    }
}

fn partition_stats(rows: &[usize], earnings: &[Option<f64>], rates: &[Option<f64>]) -> PartitionStats {
    let group_earnings = stats::select(earnings, rows);
    PartitionStats {
        count: rows.len(),
        avg_earnings: stats::mean(&group_earnings),
        median_earnings: stats::median(&group_earnings),
        avg_hourly_rate: stats::mean(&stats::select(rates, rows)),
    }
}

fn difference(left: Option<f64>, right: Option<f64>) -> Option<f64> {
    Some(left? - right?)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    const HEADERS: [&str; 8] = [
        PAYMENT_METHOD,
        EARNINGS,
        HOURLY_RATE,
        CLIENT_REGION,
        EXPERIENCE_LEVEL,
        JOBS_COMPLETED,
        JOB_SUCCESS_RATE,
        CLIENT_RATING,
    ];

    pub(crate) fn table_from(rows: &[[&str; 8]]) -> Table {
        Table::from_rows(
            &HEADERS,
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    /// Four freelancers: two paid in crypto, three experts.
    pub(crate) fn mock_table() -> Table {
        table_from(&[
            ["Crypto", "1000", "50", "EU", "Expert", "120", "98", "4.9"],
            ["Bank", "800", "40", "US", "Expert", "80", "95", "4.8"],
            ["Crypto", "1200", "60", "EU", "Intermediate", "50", "90", "4.7"],
            ["PayPal", "700", "35", "Asia", "Expert", "30", "85", "4.6"],
        ])
    }

    fn analyzer() -> FreelancerAnalyzer {
        FreelancerAnalyzer::new(mock_table())
    }

    fn empty_analyzer() -> FreelancerAnalyzer {
        FreelancerAnalyzer::new(table_from(&[]))
    }

    #[test]
    fn test_dataset_info() {
        let info = analyzer().dataset_info().unwrap();
        assert_eq!(info.total_records, 4);
        assert!(info.columns.contains(&PAYMENT_METHOD.to_string()));
        assert_eq!(info.data_types[JOBS_COMPLETED], crate::data::ColumnType::Integer);
        assert_eq!(info.data_types[CLIENT_RATING], crate::data::ColumnType::Float);
        assert_eq!(info.missing_values[EARNINGS], 0);
        assert_eq!(info.sample_data.len(), 4);
    }

    #[test]
    fn test_dataset_info_sample_rows() {
        let info = analyzer().with_sample_rows(2).dataset_info().unwrap();
        assert_eq!(info.sample_data.len(), 2);
    }

    #[test]
    fn test_payment_method_breakdown() {
        let stats = analyzer().payment_method_breakdown().unwrap();

        let crypto = &stats["Crypto"];
        assert_eq!(crypto.avg_earnings, Some(1100.0));
        assert_eq!(crypto.median_earnings, Some(1100.0));
        assert_eq!(crypto.total_freelancers, 2);
        assert_eq!(crypto.total_earnings, 2200.0);
        assert_eq!(crypto.avg_hourly_rate, Some(55.0));
        assert_eq!(stats["Bank"].total_freelancers, 1);
    }

    #[test]
    fn test_payment_method_breakdown_is_partition() {
        let table = mock_table();
        let total = table.len();
        let stats = FreelancerAnalyzer::new(table).payment_method_breakdown().unwrap();

        let counted: usize = stats.values().map(|s| s.total_freelancers).sum();
        assert_eq!(counted, total);
    }

    #[test]
    fn test_missing_group_keys_form_their_own_group() {
        let table = table_from(&[
            ["Crypto", "1000", "50", "EU", "Expert", "120", "98", "4.9"],
            ["", "800", "40", "US", "Expert", "80", "95", "4.8"],
            ["Bank", "700", "35", "", "Expert", "30", "85", "4.6"],
        ]);
        let total = table.len();
        let analyzer = FreelancerAnalyzer::new(table);

        let methods = analyzer.payment_method_breakdown().unwrap();
        let counted: usize = methods.values().map(|s| s.total_freelancers).sum();
        assert_eq!(counted, total);
        assert_eq!(methods[stats::MISSING_GROUP].total_freelancers, 1);
        assert_eq!(methods[stats::MISSING_GROUP].avg_earnings, Some(800.0));

        let regions = analyzer.region_breakdown().unwrap();
        let counted: usize = regions.values().map(|s| s.total_freelancers).sum();
        assert_eq!(counted, total);
        assert_eq!(regions[stats::MISSING_GROUP].avg_earnings, Some(700.0));
    }

    #[test]
    fn test_region_breakdown() {
        let stats = analyzer().region_breakdown().unwrap();

        assert_eq!(stats.len(), 3);
        let eu = &stats["EU"];
        assert_eq!(eu.total_freelancers, 2);
        assert_eq!(eu.avg_success_rate, Some(94.0));
        assert_eq!(eu.avg_client_rating, Some(4.8));
        assert_eq!(stats["Asia"].avg_earnings, Some(700.0));
    }

    #[test]
    fn test_breakdown_rounds_to_two_decimals() {
        let table = table_from(&[
            ["Bank", "100", "10", "EU", "Expert", "1", "90", "4.0"],
            ["Bank", "100", "10", "EU", "Expert", "1", "90", "4.0"],
            ["Bank", "101", "11", "EU", "Expert", "1", "91", "4.1"],
        ]);
        let stats = FreelancerAnalyzer::new(table).payment_method_breakdown().unwrap();

        assert_eq!(stats["Bank"].avg_earnings, Some(100.33));
        assert_eq!(stats["Bank"].avg_hourly_rate, Some(10.33));
    }

    #[test]
    fn test_expert_analysis() {
        let result = analyzer().expert_analysis().unwrap().unwrap();

        assert_eq!(result.total_experts, 3);
        assert_eq!(result.experts_under_100_projects, 2);
        assert_eq!(result.percentage, 66.67);
        assert_eq!(result.avg_earnings_under_100, Some(750.0));
        assert!(result.experts_under_100_projects <= result.total_experts);
    }

    #[test]
    fn test_expert_analysis_without_experts() {
        let table = table_from(&[["Bank", "800", "40", "US", "Beginner", "10", "95", "4.8"]]);
        let err = FreelancerAnalyzer::new(table).expert_analysis().unwrap_err();
        assert!(matches!(err, AnalysisError::DivisionByZero(_)));
    }

    #[test]
    fn test_crypto_vs_other() {
        let result = analyzer().crypto_vs_other().unwrap().unwrap();

        assert_eq!(result.crypto_stats.count, 2);
        assert_eq!(result.other_stats.count, 2);
        assert_eq!(result.crypto_stats.avg_earnings, Some(1100.0));
        assert_eq!(result.other_stats.avg_earnings, Some(750.0));
        assert_eq!(result.difference.earnings_difference, Some(350.0));
        assert_eq!(result.difference.hourly_rate_difference, Some(17.5));
        assert_eq!(result.difference.percentage_difference, Some(46.67));
    }

    #[test]
    fn test_crypto_vs_other_counts_missing_method_as_other() {
        let table = table_from(&[
            ["Crypto", "1000", "50", "EU", "Expert", "120", "98", "4.9"],
            ["", "800", "40", "US", "Expert", "80", "95", "4.8"],
        ]);
        let total = table.len();
        let result = FreelancerAnalyzer::new(table).crypto_vs_other().unwrap().unwrap();

        assert_eq!(result.crypto_stats.count + result.other_stats.count, total);
    }

    #[test]
    fn test_crypto_vs_other_zero_other_mean() {
        let table = table_from(&[
            ["Crypto", "1000", "50", "EU", "Expert", "120", "98", "4.9"],
            ["Bank", "0", "40", "US", "Expert", "80", "95", "4.8"],
        ]);
        let err = FreelancerAnalyzer::new(table).crypto_vs_other().unwrap_err();
        assert!(matches!(err, AnalysisError::DivisionByZero(_)));
    }

    #[test]
    fn test_crypto_vs_other_only_crypto() {
        let table = table_from(&[
            ["Crypto", "1000", "50", "EU", "Expert", "120", "98", "4.9"],
            ["Crypto", "1200", "60", "US", "Expert", "80", "95", "4.8"],
        ]);
        let result = FreelancerAnalyzer::new(table).crypto_vs_other().unwrap().unwrap();

        assert_eq!(result.crypto_stats.count, 2);
        assert_eq!(result.crypto_stats.avg_earnings, Some(1100.0));
        assert_eq!(result.other_stats.count, 0);
        assert_eq!(result.other_stats.avg_earnings, None);
        assert_eq!(result.difference.earnings_difference, None);
        assert_eq!(result.difference.percentage_difference, None);
    }

    #[test]
    fn test_empty_table_returns_empty_results() {
        let analyzer = empty_analyzer();

        assert!(analyzer.dataset_info().is_none());
        assert!(analyzer.payment_method_breakdown().unwrap().is_empty());
        assert!(analyzer.region_breakdown().unwrap().is_empty());
        assert!(analyzer.expert_analysis().unwrap().is_none());
        assert!(analyzer.crypto_vs_other().unwrap().is_none());
    }

    #[test]
    fn test_missing_column_fails_loudly() {
        let table = Table::from_rows(
            &[PAYMENT_METHOD, EARNINGS],
            vec![vec!["Crypto".to_string(), "100".to_string()]],
        );
        let err = FreelancerAnalyzer::new(table)
            .payment_method_breakdown()
            .unwrap_err();
        assert_eq!(err, AnalysisError::MissingColumn(HOURLY_RATE.to_string()));
    }

    #[test]
    fn test_text_earnings_column_is_type_error() {
        let table = table_from(&[["Crypto", "lots", "50", "EU", "Expert", "120", "98", "4.9"]]);
        let err = FreelancerAnalyzer::new(table)
            .payment_method_breakdown()
            .unwrap_err();
        assert!(matches!(err, AnalysisError::ColumnType { .. }));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = FreelancerAnalyzer::from_path(Path::new("not_exists.csv")).unwrap_err();
        assert!(matches!(err, DataError::DataFileNotFound(_)));
    }
}

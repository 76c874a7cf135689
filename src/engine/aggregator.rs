//! Dashboard and fraud-metric aggregation over a normalized snapshot.

use crate::engine::format::{group_thousands, round_one_decimal, ALERT_DATE_FORMAT};
use crate::engine::normalizer::{midnight_utc, normalize, NormalizedRecord};
use crate::engine::policy::RiskPolicy;
use crate::types::dashboard::{DashboardSummary, FraudMetrics, RecentAlert};
use crate::types::transaction::TransactionRecord;
use chrono::{DateTime, Days, NaiveDate, Utc};
use std::collections::HashSet;
use tracing::debug;

/// Both metric sets computed from one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskReport {
    pub summary: DashboardSummary,
    pub metrics: FraudMetrics,
    /// Records whose date fell back to the sentinel
    pub sentinel_dates: usize,
}

/// Stateless aggregator; every call is a pure function of its inputs and the policy.
#[derive(Debug, Clone, Default)]
pub struct RiskAggregator {
    policy: RiskPolicy,
}

impl RiskAggregator {
    pub fn new(policy: RiskPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RiskPolicy {
        &self.policy
    }

    /// Normalize raw records once and compute both metric sets.
    pub fn build_report(&self, records: &[TransactionRecord], reference: DateTime<Utc>) -> RiskReport {
        let normalized = normalize(records, reference);
        let sentinel_dates = normalized.iter().filter(|r| r.used_sentinel).count();

        let report = RiskReport {
            summary: self.summarize(&normalized, reference),
            metrics: self.metrics(&normalized),
            sentinel_dates,
        };

        debug!(
            records = records.len(),
            sentinel_dates,
            alerts_today = report.summary.total_alerts_today,
            flagged = report.metrics.flagged_suspicious,
            "Risk report built"
        );

        report
    }

    /// Dashboard summary relative to `reference`.
    pub fn summarize(&self, records: &[NormalizedRecord<'_>], reference: DateTime<Utc>) -> DashboardSummary {
        let today = reference.date_naive();

        let alerts_today = records
            .iter()
            .filter(|r| {
                r.parsed_date.date_naive() == today
                    && r.risk_score() >= self.policy.alert_today_threshold
            })
            .count();

        let recent_alerts = self
            .rank_recent(records)
            .into_iter()
            .map(|r| self.recent_alert(r))
            .collect();

        DashboardSummary {
            total_alerts_today: alerts_today,
            flagged_today: alerts_today,
            active_customers: self.active_customers(records, reference),
            system_health: self.policy.system_health,
            ai_accuracy: self.policy.ai_accuracy,
            recent_alerts,
        }
    }

    /// Fraud KPIs over the whole snapshot; no date windowing.
    pub fn metrics(&self, records: &[NormalizedRecord<'_>]) -> FraudMetrics {
        if records.is_empty() {
            return FraudMetrics::default();
        }

        let flagged_suspicious = records
            .iter()
            .filter(|r| r.risk_score() >= self.policy.flagged_suspicious_threshold)
            .count();

        let high_risk_clients: HashSet<&str> = records
            .iter()
            .filter(|r| r.risk_score() >= self.policy.high_risk_client_threshold)
            .map(|r| r.customer())
            .collect();

        let total_score: f64 = records.iter().map(|r| r.raw_risk_score() as f64).sum();

        FraudMetrics {
            total_transactions: records.len(),
            flagged_suspicious,
            high_risk_clients: high_risk_clients.len(),
            average_risk_score: round_one_decimal(total_score / records.len() as f64),
        }
    }

    /// Highest risk first, most recent first among equal scores, input order last.
    pub fn rank_recent<'r, 'a>(&self, records: &'r [NormalizedRecord<'a>]) -> Vec<&'r NormalizedRecord<'a>> {
        let mut ranked: Vec<&NormalizedRecord<'a>> = records.iter().collect();
        ranked.sort_by(|a, b| {
            b.raw_risk_score()
                .cmp(&a.raw_risk_score())
                .then_with(|| b.parsed_date.cmp(&a.parsed_date))
        });
        ranked.truncate(self.policy.recent_alert_limit);
        ranked
    }

    /// Distinct customers with activity on or after the window start.
    fn active_customers(&self, records: &[NormalizedRecord<'_>], reference: DateTime<Utc>) -> usize {
        let window_start = reference
            .date_naive()
            .checked_sub_days(Days::new(self.policy.active_window_days))
            .unwrap_or(NaiveDate::MIN);
        let window_start = midnight_utc(window_start);

        records
            .iter()
            .filter(|r| r.parsed_date >= window_start)
            .filter(|r| self.policy.include_future_records || r.parsed_date <= reference)
            .map(|r| r.customer())
            .collect::<HashSet<_>>()
            .len()
    }

    fn recent_alert(&self, record: &NormalizedRecord<'_>) -> RecentAlert {
        RecentAlert {
            transaction_id: record.record.id.clone(),
            message: format!(
                "High-risk transaction detected – {}{}",
                self.policy.currency_symbol,
                group_thousands(record.record.amount)
            ),
            date: record.parsed_date.format(ALERT_DATE_FORMAT).to_string(),
            risk_score: record.raw_risk_score(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 4, 15, 45, 0).unwrap()
    }

    fn record(id: &str, date: &str, customer: &str, amount: f64, score: i64) -> TransactionRecord {
        TransactionRecord::new(id, date, customer, amount, score)
    }

    fn report(records: &[TransactionRecord]) -> RiskReport {
        RiskAggregator::default().build_report(records, reference())
    }

    #[test]
    fn test_empty_input() {
        let report = report(&[]);

        assert_eq!(report.summary.total_alerts_today, 0);
        assert_eq!(report.summary.flagged_today, 0);
        assert_eq!(report.summary.active_customers, 0);
        assert!(report.summary.recent_alerts.is_empty());
        assert_eq!(report.metrics, FraudMetrics::default());
    }

    #[test]
    fn test_single_high_risk_record_today() {
        let records = vec![record("TXN0001", "2025-12-04 10:05", "A", 125000.0, 92)];
        let report = report(&records);

        assert_eq!(report.summary.total_alerts_today, 1);
        assert_eq!(report.summary.flagged_today, 1);
        assert_eq!(report.summary.active_customers, 1);
        assert_eq!(
            report.summary.recent_alerts,
            vec![RecentAlert {
                transaction_id: "TXN0001".to_string(),
                message: "High-risk transaction detected – ₹125,000".to_string(),
                date: "2025-12-04 10:05".to_string(),
                risk_score: 92,
            }]
        );

        assert_eq!(report.metrics.total_transactions, 1);
        assert_eq!(report.metrics.flagged_suspicious, 1);
        assert_eq!(report.metrics.high_risk_clients, 1);
        assert_eq!(report.metrics.average_risk_score, 92.0);
    }

    #[test]
    fn test_unparseable_date_counts_in_totals_only() {
        let records = vec![
            record("TXN0001", "not-a-date", "A", 10.0, 90),
            record("TXN0002", "2025-12-04 09:00", "B", 10.0, 30),
        ];
        let report = report(&records);

        assert_eq!(report.sentinel_dates, 1);
        assert_eq!(report.summary.total_alerts_today, 0);
        assert_eq!(report.summary.active_customers, 1);
        assert_eq!(report.metrics.total_transactions, 2);
        assert_eq!(report.metrics.average_risk_score, 60.0);
        assert_eq!(report.metrics.high_risk_clients, 1);
    }

    #[test]
    fn test_recent_alerts_tie_break_by_date() {
        let records = vec![
            record("TXN0001", "2025-12-01 10:00", "A", 1.0, 80),
            record("TXN0002", "2025-12-02 10:00", "B", 1.0, 95),
            record("TXN0003", "2025-12-03 10:00", "C", 1.0, 80),
            record("TXN0004", "2025-12-04 10:00", "D", 1.0, 95),
        ];
        let ids: Vec<String> = report(&records)
            .summary
            .recent_alerts
            .into_iter()
            .map(|a| a.transaction_id)
            .collect();

        assert_eq!(ids, vec!["TXN0004", "TXN0002", "TXN0003"]);
    }

    #[test]
    fn test_recent_alerts_full_tie_keeps_input_order() {
        let records = vec![
            record("TXN0001", "2025-12-01 10:00", "A", 1.0, 70),
            record("TXN0002", "2025-12-01 10:00", "B", 1.0, 70),
        ];
        let ids: Vec<String> = report(&records)
            .summary
            .recent_alerts
            .into_iter()
            .map(|a| a.transaction_id)
            .collect();

        assert_eq!(ids, vec!["TXN0001", "TXN0002"]);
    }

    #[test]
    fn test_active_customers_deduplicated() {
        let records: Vec<TransactionRecord> = (1..=10)
            .map(|day| record(&format!("TXN{day:04}"), &format!("2025-11-{:02} 12:00", day + 10), "A", 5.0, 20))
            .collect();

        assert_eq!(report(&records).summary.active_customers, 1);
    }

    #[test]
    fn test_active_window_is_inclusive_at_midnight() {
        let records = vec![
            record("TXN0001", "2025-11-04 00:00", "A", 1.0, 10),
            record("TXN0002", "2025-11-03 23:59", "B", 1.0, 10),
        ];

        assert_eq!(report(&records).summary.active_customers, 1);
    }

    #[test]
    fn test_future_records_follow_policy() {
        let records = vec![record("TXN0001", "2026-01-15 08:00", "A", 1.0, 10)];

        assert_eq!(report(&records).summary.active_customers, 1);

        let policy = RiskPolicy {
            include_future_records: false,
            ..RiskPolicy::default()
        };
        let summary = RiskAggregator::new(policy).build_report(&records, reference()).summary;
        assert_eq!(summary.active_customers, 0);
    }

    #[test]
    fn test_threshold_boundaries() {
        let records = vec![
            record("TXN0001", "2025-12-04 08:00", "A", 1.0, 59),
            record("TXN0002", "2025-12-04 08:00", "B", 1.0, 60),
            record("TXN0003", "2025-12-03 08:00", "C", 1.0, 69),
            record("TXN0004", "2025-12-03 08:00", "D", 1.0, 70),
            record("TXN0005", "2025-12-03 08:00", "E", 1.0, 79),
            record("TXN0006", "2025-12-03 08:00", "F", 1.0, 80),
        ];
        let report = report(&records);

        // 60 today; 70/79/80 are on a previous day
        assert_eq!(report.summary.total_alerts_today, 1);
        assert_eq!(report.metrics.flagged_suspicious, 3);
        assert_eq!(report.metrics.high_risk_clients, 1);
    }

    #[test]
    fn test_high_risk_clients_are_distinct() {
        let records = vec![
            record("TXN0001", "2025-12-01 08:00", "A", 1.0, 85),
            record("TXN0002", "2025-12-02 08:00", "A", 1.0, 99),
            record("TXN0003", "2025-12-03 08:00", "B", 1.0, 81),
        ];

        assert_eq!(report(&records).metrics.high_risk_clients, 2);
    }

    #[test]
    fn test_out_of_range_scores_fail_thresholds() {
        let mut missing = record("TXN0003", "2025-12-04 08:00", "C", 1.0, 0);
        missing.risk_score = None;
        let records = vec![
            record("TXN0001", "2025-12-04 08:00", "A", 1.0, 250),
            record("TXN0002", "2025-12-04 08:00", "B", 1.0, -40),
            missing,
            record("TXN0004", "2025-12-04 08:00", "D", 1.0, 90),
        ];
        let report = report(&records);

        // Thresholds only see the 90; the average and display keep raw values
        assert_eq!(report.summary.total_alerts_today, 1);
        assert_eq!(report.metrics.flagged_suspicious, 1);
        assert_eq!(report.metrics.high_risk_clients, 1);
        assert_eq!(report.metrics.average_risk_score, 75.0);
        assert_eq!(report.summary.recent_alerts[0].transaction_id, "TXN0001");
        assert_eq!(report.summary.recent_alerts[0].risk_score, 250);
        assert_eq!(report.summary.recent_alerts[1].transaction_id, "TXN0004");
    }

    #[test]
    fn test_average_stays_within_out_of_range_scores() {
        let records = vec![
            record("TXN0001", "2025-12-04 08:00", "A", 1.0, 150),
            record("TXN0002", "2025-12-04 09:00", "B", 1.0, 150),
        ];
        let report = report(&records);

        assert_eq!(report.metrics.average_risk_score, 150.0);
        assert_eq!(report.metrics.flagged_suspicious, 0);
        assert_eq!(report.metrics.high_risk_clients, 0);
        assert_eq!(report.summary.total_alerts_today, 0);
        assert_eq!(report.summary.recent_alerts[0].risk_score, 150);
        assert_eq!(report.summary.recent_alerts[0].transaction_id, "TXN0002");
    }

    #[test]
    fn test_average_rounding_and_bounds() {
        let records = vec![
            record("TXN0001", "2025-12-01 08:00", "A", 1.0, 33),
            record("TXN0002", "2025-12-01 08:00", "B", 1.0, 34),
            record("TXN0003", "2025-12-01 08:00", "C", 1.0, 34),
        ];
        let metrics = report(&records).metrics;

        assert_eq!(metrics.average_risk_score, 33.7);
        assert!(metrics.average_risk_score >= 33.0 && metrics.average_risk_score <= 34.0);
    }

    #[test]
    fn test_custom_policy_thresholds() {
        let policy = RiskPolicy {
            alert_today_threshold: 40,
            flagged_suspicious_threshold: 40,
            high_risk_client_threshold: 40,
            recent_alert_limit: 1,
            system_health: 50.0,
            ai_accuracy: 75.5,
            currency_symbol: "$".to_string(),
            ..RiskPolicy::default()
        };
        let records = vec![
            record("TXN0001", "2025-12-04 08:00", "A", 2500.0, 45),
            record("TXN0002", "2025-12-04 09:00", "B", 10.0, 20),
        ];
        let report = RiskAggregator::new(policy).build_report(&records, reference());

        assert_eq!(report.summary.total_alerts_today, 1);
        assert_eq!(report.metrics.flagged_suspicious, 1);
        assert_eq!(report.metrics.high_risk_clients, 1);
        assert_eq!(report.summary.system_health, 50.0);
        assert_eq!(report.summary.ai_accuracy, 75.5);
        assert_eq!(report.summary.recent_alerts.len(), 1);
        assert_eq!(
            report.summary.recent_alerts[0].message,
            "High-risk transaction detected – $2,500"
        );
    }

    #[test]
    fn test_invariants_and_idempotence() {
        let records = vec![
            record("TXN0001", "2025-12-04 08:00", "A", 1.0, 61),
            record("TXN0002", "2025-12-04 11:00", "A", 1.0, 88),
            record("TXN0003", "garbage", "B", 1.0, 12),
            record("TXN0004", "2025-10-01 08:00", "C", 1.0, 75),
            record("TXN0005", "2025-12-02T08:00:00Z", "D", 1.0, 44),
        ];
        let aggregator = RiskAggregator::default();

        let first = aggregator.build_report(&records, reference());
        let second = aggregator.build_report(&records, reference());

        assert_eq!(first.summary.total_alerts_today, first.summary.flagged_today);
        assert!(first.summary.recent_alerts.len() <= 3);
        assert!(first.summary.active_customers <= first.metrics.total_transactions);
        assert!(first.metrics.average_risk_score >= 12.0 && first.metrics.average_risk_score <= 88.0);

        let scores: Vec<i64> = first.summary.recent_alerts.iter().map(|a| a.risk_score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));

        assert_eq!(
            serde_json::to_string(&first.summary).unwrap(),
            serde_json::to_string(&second.summary).unwrap()
        );
        assert_eq!(
            serde_json::to_string(&first.metrics).unwrap(),
            serde_json::to_string(&second.metrics).unwrap()
        );
    }

    #[test]
    fn test_recent_alerts_include_records_outside_today() {
        let records = vec![
            record("TXN0001", "not-a-date", "A", 1.0, 99),
            record("TXN0002", "2025-12-04 08:00", "B", 1.0, 10),
        ];
        let alerts = report(&records).summary.recent_alerts;

        assert_eq!(alerts[0].transaction_id, "TXN0001");
        assert_eq!(alerts[0].date, "2015-12-04 00:00");
        assert_eq!(alerts[1].transaction_id, "TXN0002");
    }
}

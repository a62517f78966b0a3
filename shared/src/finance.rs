//! Financial ledger rules
//!
//! Pure derivations over transactions and billable clients: effective
//! status, report filtering, and aggregate metrics. Stored status is
//! only ever changed by explicit operations in the backend; everything
//! here is read-time computation with an explicit `today`.

use crate::models::{Client, Transaction, TransactionStatus};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Read-time status of a transaction.
///
/// A pending transaction whose due date has passed is treated as overdue
/// for display, filtering, and metrics, even though its stored status
/// still says pending. Every other status is reported as stored.
pub fn effective_status(tx: &Transaction, today: NaiveDate) -> TransactionStatus {
    if tx.status == TransactionStatus::Pending && tx.due_date < today {
        TransactionStatus::Overdue
    } else {
        tx.status
    }
}

/// Status filter for ledger reports
///
/// `Overdue` matches both stored-overdue transactions and pending ones
/// past their due date.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Paid,
    Pending,
    Overdue,
    Cancelled,
}

impl StatusFilter {
    pub fn matches(&self, tx: &Transaction, today: NaiveDate) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Paid => tx.status == TransactionStatus::Paid,
            StatusFilter::Pending => tx.status == TransactionStatus::Pending,
            StatusFilter::Overdue => effective_status(tx, today) == TransactionStatus::Overdue,
            StatusFilter::Cancelled => tx.status == TransactionStatus::Cancelled,
        }
    }
}

/// Report filter: due date range, status, and exact plan name
#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: StatusFilter,
    /// `None` means all plans
    pub plan_name: Option<String>,
}

impl LedgerFilter {
    pub fn matches(&self, tx: &Transaction, today: NaiveDate) -> bool {
        if let Some(from) = self.from {
            if tx.due_date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if tx.due_date > to {
                return false;
            }
        }
        if let Some(plan) = &self.plan_name {
            if tx.plan_name.as_deref() != Some(plan.as_str()) {
                return false;
            }
        }
        self.status.matches(tx, today)
    }
}

/// Aggregate report over a filtered transaction set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceMetrics {
    /// Sum of paid transaction amounts
    pub total_revenue: Decimal,
    /// Sum of stored-pending transaction amounts (including those
    /// effectively overdue; stored and derived stay separate)
    pub total_pending: Decimal,
    /// Sum of effectively overdue amounts
    pub total_overdue: Decimal,
    /// Monthly recurring revenue: each billable client's plan value
    /// normalized to one month
    pub mrr: Decimal,
    /// MRR divided by the number of active clients, zero when there are
    /// none
    pub avg_ticket: Decimal,
    pub transaction_count: usize,
    pub active_clients: usize,
}

impl FinanceMetrics {
    pub fn zero() -> Self {
        Self {
            total_revenue: Decimal::ZERO,
            total_pending: Decimal::ZERO,
            total_overdue: Decimal::ZERO,
            mrr: Decimal::ZERO,
            avg_ticket: Decimal::ZERO,
            transaction_count: 0,
            active_clients: 0,
        }
    }
}

/// Compute aggregate metrics for a filtered transaction set and the
/// current client roster.
///
/// `clients` is the full roster; only active clients contribute to MRR
/// and the average ticket. An empty input produces all-zero metrics.
pub fn compute_metrics(
    transactions: &[Transaction],
    clients: &[Client],
    today: NaiveDate,
) -> FinanceMetrics {
    let mut metrics = FinanceMetrics::zero();
    metrics.transaction_count = transactions.len();

    for tx in transactions {
        match tx.status {
            TransactionStatus::Paid => metrics.total_revenue += tx.amount,
            TransactionStatus::Pending => metrics.total_pending += tx.amount,
            _ => {}
        }
        if effective_status(tx, today) == TransactionStatus::Overdue {
            metrics.total_overdue += tx.amount;
        }
    }

    for client in clients {
        if client.status != crate::models::ClientStatus::Active {
            continue;
        }
        metrics.active_clients += 1;
        if let Some(plan) = &client.plan {
            // duration_months > 0 is enforced at assignment time
            if plan.duration_months > 0 {
                metrics.mrr += plan.value / Decimal::from(plan.duration_months);
            }
        }
    }

    if metrics.active_clients > 0 {
        metrics.avg_ticket = metrics.mrr / Decimal::from(metrics.active_clients);
    }

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Client, ClientStatus, PlanCycle};
    use chrono::Utc;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(status: TransactionStatus, due: NaiveDate, amount: i64) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: Uuid::new_v4(),
            trainer_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            plan_name: Some("Mensal".to_string()),
            amount: Decimal::from(amount),
            due_date: due,
            status,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn client(status: ClientStatus, plan: Option<(i64, i32)>) -> Client {
        let now = Utc::now();
        Client {
            id: Uuid::new_v4(),
            trainer_id: Uuid::new_v4(),
            name: "Bruno".to_string(),
            email: None,
            phone: None,
            status,
            weight_kg: None,
            height_cm: None,
            target_weight_kg: None,
            notes: None,
            plan: plan.map(|(value, months)| PlanCycle {
                name: "Mensal".to_string(),
                value: Decimal::from(value),
                duration_months: months,
                start_date: date(2024, 1, 1),
                end_date: date(2024, 2, 1),
            }),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_pending_past_due_is_effectively_overdue() {
        let today = date(2024, 5, 10);
        let t = tx(TransactionStatus::Pending, date(2024, 5, 9), 100);
        assert_eq!(effective_status(&t, today), TransactionStatus::Overdue);
        // Stored status is untouched
        assert_eq!(t.status, TransactionStatus::Pending);
    }

    #[test]
    fn test_pending_due_today_is_not_overdue() {
        let today = date(2024, 5, 10);
        let t = tx(TransactionStatus::Pending, today, 100);
        assert_eq!(effective_status(&t, today), TransactionStatus::Pending);
    }

    #[test]
    fn test_paid_and_cancelled_never_become_overdue() {
        let today = date(2024, 5, 10);
        let long_past = date(2023, 1, 1);
        let paid = tx(TransactionStatus::Paid, long_past, 100);
        let cancelled = tx(TransactionStatus::Cancelled, long_past, 100);
        assert_eq!(effective_status(&paid, today), TransactionStatus::Paid);
        assert_eq!(
            effective_status(&cancelled, today),
            TransactionStatus::Cancelled
        );
    }

    #[test]
    fn test_overdue_filter_matches_stored_and_derived() {
        let today = date(2024, 5, 10);
        let stored = tx(TransactionStatus::Overdue, date(2024, 5, 20), 100);
        let derived = tx(TransactionStatus::Pending, date(2024, 5, 1), 100);
        let current = tx(TransactionStatus::Pending, date(2024, 5, 20), 100);

        assert!(StatusFilter::Overdue.matches(&stored, today));
        assert!(StatusFilter::Overdue.matches(&derived, today));
        assert!(!StatusFilter::Overdue.matches(&current, today));
    }

    #[test]
    fn test_ledger_filter_date_range_and_plan() {
        let today = date(2024, 5, 10);
        let t = tx(TransactionStatus::Paid, date(2024, 5, 5), 100);

        let mut filter = LedgerFilter {
            from: Some(date(2024, 5, 1)),
            to: Some(date(2024, 5, 31)),
            status: StatusFilter::All,
            plan_name: None,
        };
        assert!(filter.matches(&t, today));

        filter.plan_name = Some("Trimestral".to_string());
        assert!(!filter.matches(&t, today));

        filter.plan_name = Some("Mensal".to_string());
        assert!(filter.matches(&t, today));

        filter.from = Some(date(2024, 5, 6));
        assert!(!filter.matches(&t, today));
    }

    #[test]
    fn test_empty_inputs_yield_zero_metrics() {
        let metrics = compute_metrics(&[], &[], date(2024, 5, 10));
        assert_eq!(metrics, FinanceMetrics::zero());
        assert_eq!(metrics.avg_ticket, Decimal::ZERO);
    }

    #[test]
    fn test_metrics_buckets() {
        let today = date(2024, 5, 10);
        let txs = vec![
            tx(TransactionStatus::Paid, date(2024, 5, 1), 300),
            tx(TransactionStatus::Pending, date(2024, 5, 20), 150),
            // Pending past due: counted in both pending and overdue
            tx(TransactionStatus::Pending, date(2024, 5, 1), 100),
            tx(TransactionStatus::Overdue, date(2024, 4, 1), 50),
            tx(TransactionStatus::Cancelled, date(2024, 5, 1), 999),
        ];
        let metrics = compute_metrics(&txs, &[], today);

        assert_eq!(metrics.total_revenue, Decimal::from(300));
        assert_eq!(metrics.total_pending, Decimal::from(250));
        assert_eq!(metrics.total_overdue, Decimal::from(150));
        assert_eq!(metrics.transaction_count, 5);
    }

    #[test]
    fn test_mrr_normalizes_to_monthly_rate() {
        let today = date(2024, 5, 10);
        let clients = vec![
            client(ClientStatus::Active, Some((300, 3))), // 100/month
            client(ClientStatus::Active, Some((150, 1))), // 150/month
            client(ClientStatus::Active, None),           // no plan, no MRR
            client(ClientStatus::Inactive, Some((500, 1))), // inactive, ignored
        ];
        let metrics = compute_metrics(&[], &clients, today);

        assert_eq!(metrics.mrr, Decimal::from(250));
        assert_eq!(metrics.active_clients, 3);
        // 250 / 3 active clients
        assert_eq!(
            metrics.avg_ticket,
            Decimal::from(250) / Decimal::from(3)
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Revenue, pending, and stored-cancelled amounts never overlap,
        /// and overdue is a subset of pending plus stored-overdue.
        #[test]
        fn prop_metrics_bucket_bounds(
            amounts in prop::collection::vec(1i64..10_000, 0..40),
            statuses in prop::collection::vec(0u8..4, 0..40),
            due_offsets in prop::collection::vec(-60i64..60, 0..40),
        ) {
            let today = date(2024, 6, 1);
            let n = amounts.len().min(statuses.len()).min(due_offsets.len());
            let txs: Vec<Transaction> = (0..n)
                .map(|i| {
                    let status = match statuses[i] {
                        0 => TransactionStatus::Paid,
                        1 => TransactionStatus::Pending,
                        2 => TransactionStatus::Overdue,
                        _ => TransactionStatus::Cancelled,
                    };
                    tx(status, today + chrono::Duration::days(due_offsets[i]), amounts[i])
                })
                .collect();

            let metrics = compute_metrics(&txs, &[], today);

            let total: Decimal = txs.iter().map(|t| t.amount).sum();
            prop_assert!(metrics.total_revenue + metrics.total_pending <= total);

            let overdue_cap: Decimal = txs
                .iter()
                .filter(|t| t.status != TransactionStatus::Paid
                    && t.status != TransactionStatus::Cancelled)
                .map(|t| t.amount)
                .sum();
            prop_assert!(metrics.total_overdue <= overdue_cap);
        }

        /// The effective status differs from the stored one only for
        /// pending transactions past their due date.
        #[test]
        fn prop_effective_status_only_promotes_pending(
            status_idx in 0u8..4,
            due_offset in -60i64..60,
        ) {
            let today = date(2024, 6, 1);
            let status = match status_idx {
                0 => TransactionStatus::Paid,
                1 => TransactionStatus::Pending,
                2 => TransactionStatus::Overdue,
                _ => TransactionStatus::Cancelled,
            };
            let t = tx(status, today + chrono::Duration::days(due_offset), 100);
            let effective = effective_status(&t, today);

            if effective != t.status {
                prop_assert_eq!(t.status, TransactionStatus::Pending);
                prop_assert_eq!(effective, TransactionStatus::Overdue);
                prop_assert!(t.due_date < today);
            }
        }
    }
}

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use trainerdesk_shared::models::Transaction;
use uuid::Uuid;

/// Transaction record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub client_id: Uuid,
    pub plan_name: Option<String>,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn into_model(self) -> Result<Transaction> {
        Ok(Transaction {
            id: self.id,
            trainer_id: self.trainer_id,
            client_id: self.client_id,
            plan_name: self.plan_name,
            amount: self.amount,
            due_date: self.due_date,
            status: self
                .status
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Input for creating a transaction
#[derive(Debug, Clone)]
pub struct CreateTransaction {
    pub trainer_id: Uuid,
    pub client_id: Uuid,
    pub plan_name: Option<String>,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: String,
    pub description: Option<String>,
}

const TRANSACTION_COLUMNS: &str = "id, trainer_id, client_id, plan_name, amount, due_date, \
     status, description, created_at, updated_at";

/// Transaction repository for database operations
pub struct TransactionRepository;

impl TransactionRepository {
    /// Insert a transaction. Takes an executor so plan assignment and
    /// renewal can run it inside their own SQL transaction.
    pub async fn insert(
        executor: impl PgExecutor<'_>,
        input: CreateTransaction,
    ) -> Result<TransactionRecord> {
        let record = sqlx::query_as::<_, TransactionRecord>(&format!(
            r#"
            INSERT INTO transactions (trainer_id, client_id, plan_name, amount, due_date, status, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {TRANSACTION_COLUMNS}
            "#,
        ))
        .bind(input.trainer_id)
        .bind(input.client_id)
        .bind(&input.plan_name)
        .bind(input.amount)
        .bind(input.due_date)
        .bind(&input.status)
        .bind(&input.description)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }

    /// Create a standalone transaction (one-off charges)
    pub async fn create(pool: &PgPool, input: CreateTransaction) -> Result<TransactionRecord> {
        Self::insert(pool, input).await
    }

    /// Get a transaction by ID, scoped to the trainer
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
        trainer_id: Uuid,
    ) -> Result<Option<TransactionRecord>> {
        let record = sqlx::query_as::<_, TransactionRecord>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions
            WHERE id = $1 AND trainer_id = $2
            "#,
        ))
        .bind(id)
        .bind(trainer_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// List transactions for a trainer, newest due date first.
    ///
    /// Date bounds are applied in SQL; status and plan-name filters are
    /// applied in the service layer because overdue is a derived state
    /// the database does not store.
    pub async fn list(
        pool: &PgPool,
        trainer_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        client_id: Option<Uuid>,
    ) -> Result<Vec<TransactionRecord>> {
        let records = sqlx::query_as::<_, TransactionRecord>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions
            WHERE trainer_id = $1
                AND ($2::DATE IS NULL OR due_date >= $2)
                AND ($3::DATE IS NULL OR due_date <= $3)
                AND ($4::UUID IS NULL OR client_id = $4)
            ORDER BY due_date DESC, created_at DESC
            "#,
        ))
        .bind(trainer_id)
        .bind(from)
        .bind(to)
        .bind(client_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Mark a transaction paid. Idempotent.
    pub async fn mark_paid(
        pool: &PgPool,
        id: Uuid,
        trainer_id: Uuid,
    ) -> Result<Option<TransactionRecord>> {
        let record = sqlx::query_as::<_, TransactionRecord>(&format!(
            r#"
            UPDATE transactions SET
                status = 'paid',
                updated_at = NOW()
            WHERE id = $1 AND trainer_id = $2
            RETURNING {TRANSACTION_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(trainer_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Move a transaction's due date
    pub async fn update_due_date(
        pool: &PgPool,
        id: Uuid,
        trainer_id: Uuid,
        due_date: NaiveDate,
    ) -> Result<Option<TransactionRecord>> {
        let record = sqlx::query_as::<_, TransactionRecord>(&format!(
            r#"
            UPDATE transactions SET
                due_date = $3,
                updated_at = NOW()
            WHERE id = $1 AND trainer_id = $2
            RETURNING {TRANSACTION_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(trainer_id)
        .bind(due_date)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Cancel a transaction. Cancelled rows stay in the ledger but are
    /// excluded from every metric.
    pub async fn cancel(
        pool: &PgPool,
        id: Uuid,
        trainer_id: Uuid,
    ) -> Result<Option<TransactionRecord>> {
        let record = sqlx::query_as::<_, TransactionRecord>(&format!(
            r#"
            UPDATE transactions SET
                status = 'cancelled',
                updated_at = NOW()
            WHERE id = $1 AND trainer_id = $2
            RETURNING {TRANSACTION_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(trainer_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Find the charge created for a plan cycle: the client's
    /// transaction whose due date matches the cycle start. Renewal uses
    /// this to decide whether the archived cycle was paid.
    pub async fn find_cycle_charge(
        pool: &PgPool,
        client_id: Uuid,
        due_date: NaiveDate,
    ) -> Result<Option<TransactionRecord>> {
        let record = sqlx::query_as::<_, TransactionRecord>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions
            WHERE client_id = $1 AND due_date = $2 AND status != 'cancelled'
            ORDER BY created_at
            LIMIT 1
            "#,
        ))
        .bind(client_id)
        .bind(due_date)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_model_parses_status() {
        let now = Utc::now();
        let record = TransactionRecord {
            id: Uuid::new_v4(),
            trainer_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            plan_name: Some("Mensal".to_string()),
            amount: Decimal::new(15000, 2),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            status: "pending".to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        };
        let tx = record.into_model().unwrap();
        assert_eq!(tx.status, trainerdesk_shared::models::TransactionStatus::Pending);
    }

    #[test]
    fn test_into_model_rejects_unknown_status() {
        let now = Utc::now();
        let record = TransactionRecord {
            id: Uuid::new_v4(),
            trainer_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            plan_name: None,
            amount: Decimal::ZERO,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            status: "refunded".to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        };
        assert!(record.into_model().is_err());
    }
}

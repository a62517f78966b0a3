//! Financial ledger service
//!
//! The database only stores explicit statuses; overdue derivation and
//! the report filters run in memory over the trainer's transaction set,
//! which keeps the filter policy in one place (the shared crate) for
//! both listing and metrics.

use crate::error::ApiError;
use crate::repositories::{
    ClientRepository, CreateTransaction, TransactionRecord, TransactionRepository,
};
use chrono::NaiveDate;
use sqlx::PgPool;
use trainerdesk_shared::finance::{self, LedgerFilter};
use trainerdesk_shared::models::{Client, Transaction, TransactionStatus};
use trainerdesk_shared::types::{
    CreateTransactionRequest, MetricsQuery, MetricsResponse, TransactionListQuery,
    TransactionResponse,
};
use trainerdesk_shared::validation;
use uuid::Uuid;

/// Ledger service for billing operations and reports
pub struct LedgerService;

impl LedgerService {
    /// Create a one-off transaction outside the plan cycle flow
    pub async fn create_transaction(
        pool: &PgPool,
        trainer_id: Uuid,
        request: CreateTransactionRequest,
        today: NaiveDate,
    ) -> Result<TransactionResponse, ApiError> {
        validation::validate_amount(request.amount).map_err(ApiError::Validation)?;

        // The client must belong to this trainer
        ClientRepository::find_by_id(pool, request.client_id, trainer_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;

        let record = TransactionRepository::create(
            pool,
            CreateTransaction {
                trainer_id,
                client_id: request.client_id,
                plan_name: request.plan_name,
                amount: request.amount,
                due_date: request.due_date,
                status: TransactionStatus::Pending.as_str().to_string(),
                description: request.description,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        Self::to_response(record, today)
    }

    /// List transactions under the report filter policy.
    ///
    /// Date bounds and client scoping go to SQL; status and plan-name
    /// filtering happen here because overdue is derived, not stored.
    pub async fn list_transactions(
        pool: &PgPool,
        trainer_id: Uuid,
        query: TransactionListQuery,
        today: NaiveDate,
    ) -> Result<Vec<TransactionResponse>, ApiError> {
        let records =
            TransactionRepository::list(pool, trainer_id, query.from, query.to, query.client_id)
                .await
                .map_err(ApiError::Internal)?;

        let filter = LedgerFilter {
            from: query.from,
            to: query.to,
            status: query.status,
            plan_name: query.plan,
        };

        let mut responses = Vec::with_capacity(records.len());
        for record in records {
            let tx = record.into_model().map_err(ApiError::Internal)?;
            if filter.matches(&tx, today) {
                responses.push(Self::model_to_response(tx, today));
            }
        }
        Ok(responses)
    }

    /// Mark a transaction paid. Idempotent; already-paid rows are
    /// returned unchanged.
    pub async fn mark_paid(
        pool: &PgPool,
        trainer_id: Uuid,
        transaction_id: Uuid,
        today: NaiveDate,
    ) -> Result<TransactionResponse, ApiError> {
        let current = TransactionRepository::find_by_id(pool, transaction_id, trainer_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Transaction not found".to_string()))?;

        if current.status == TransactionStatus::Cancelled.as_str() {
            return Err(ApiError::BadRequest(
                "Cancelled transactions cannot be marked paid".to_string(),
            ));
        }

        let record = TransactionRepository::mark_paid(pool, transaction_id, trainer_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Transaction not found".to_string()))?;

        Self::to_response(record, today)
    }

    /// Move a transaction's due date. Moving it into the future clears
    /// derived overdue on the next read; nothing is stored.
    pub async fn update_due_date(
        pool: &PgPool,
        trainer_id: Uuid,
        transaction_id: Uuid,
        due_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<TransactionResponse, ApiError> {
        let record =
            TransactionRepository::update_due_date(pool, transaction_id, trainer_id, due_date)
                .await
                .map_err(ApiError::Internal)?
                .ok_or_else(|| ApiError::NotFound("Transaction not found".to_string()))?;

        Self::to_response(record, today)
    }

    /// Cancel a transaction; it stays visible but leaves every metric
    pub async fn cancel(
        pool: &PgPool,
        trainer_id: Uuid,
        transaction_id: Uuid,
        today: NaiveDate,
    ) -> Result<TransactionResponse, ApiError> {
        let current = TransactionRepository::find_by_id(pool, transaction_id, trainer_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Transaction not found".to_string()))?;

        if current.status == TransactionStatus::Paid.as_str() {
            return Err(ApiError::BadRequest(
                "Paid transactions cannot be cancelled".to_string(),
            ));
        }

        let record = TransactionRepository::cancel(pool, transaction_id, trainer_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Transaction not found".to_string()))?;

        Self::to_response(record, today)
    }

    /// Aggregate metrics over the filtered transaction set and the
    /// current roster
    pub async fn metrics(
        pool: &PgPool,
        trainer_id: Uuid,
        query: MetricsQuery,
        today: NaiveDate,
    ) -> Result<MetricsResponse, ApiError> {
        let records = TransactionRepository::list(pool, trainer_id, query.from, query.to, None)
            .await
            .map_err(ApiError::Internal)?;

        let filter = LedgerFilter {
            from: query.from,
            to: query.to,
            status: Default::default(),
            plan_name: query.plan.clone(),
        };

        let mut transactions = Vec::with_capacity(records.len());
        for record in records {
            let tx = record.into_model().map_err(ApiError::Internal)?;
            if filter.matches(&tx, today) {
                transactions.push(tx);
            }
        }

        // MRR and average ticket always reflect the full current roster
        let clients = Self::load_roster(pool, trainer_id).await?;
        let metrics = finance::compute_metrics(&transactions, &clients, today);

        Ok(MetricsResponse {
            from: query.from,
            to: query.to,
            metrics,
        })
    }

    async fn load_roster(pool: &PgPool, trainer_id: Uuid) -> Result<Vec<Client>, ApiError> {
        let records = ClientRepository::list(pool, trainer_id, None)
            .await
            .map_err(ApiError::Internal)?;

        records
            .into_iter()
            .map(|r| r.into_model().map_err(ApiError::Internal))
            .collect()
    }

    fn to_response(record: TransactionRecord, today: NaiveDate) -> Result<TransactionResponse, ApiError> {
        let tx = record.into_model().map_err(ApiError::Internal)?;
        Ok(Self::model_to_response(tx, today))
    }

    fn model_to_response(tx: Transaction, today: NaiveDate) -> TransactionResponse {
        let effective = finance::effective_status(&tx, today);
        TransactionResponse {
            id: tx.id.to_string(),
            client_id: tx.client_id.to_string(),
            plan_name: tx.plan_name,
            amount: tx.amount,
            due_date: tx.due_date,
            status: tx.status,
            effective_status: effective,
            description: tx.description,
            created_at: tx.created_at,
        }
    }
}

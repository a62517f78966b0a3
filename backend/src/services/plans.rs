//! Plan lifecycle service
//!
//! Assignment overwrites the client's current cycle and opens a pending
//! charge. Renewal archives the outgoing cycle first, then does the
//! same overwrite, all in one database transaction. Status is derived
//! from the stored end date and the caller-supplied reference date, so
//! no background job ever has to flip plans to expired.

use crate::error::ApiError;
use crate::repositories::{
    ClientRepository, NewHistoryEntry, PlanCatalogRepository, PlanCycleFields,
    TransactionRepository,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use trainerdesk_shared::models::{PaymentStatus, PlanCycle, TransactionStatus};
use trainerdesk_shared::plan_cycle;
use trainerdesk_shared::types::{
    AssignPlanRequest, ClientResponse, PlanHistoryEntryResponse, PlanStatusResponse,
    RenewPlanRequest,
};
use trainerdesk_shared::validation;
use uuid::Uuid;

use super::clients::ClientService;

/// The name/value/duration triple a new cycle is built from, before
/// dates are attached
#[derive(Debug, Clone, PartialEq)]
struct CycleTerms {
    name: String,
    value: Decimal,
    duration_months: i32,
}

/// Plan lifecycle service
pub struct PlanService;

impl PlanService {
    /// Assign a plan cycle to a client, replacing any current one.
    ///
    /// Replacement does not archive: only renewal writes history. A
    /// pending charge for the full cycle value is created with the due
    /// date on the cycle start.
    pub async fn assign_plan(
        pool: &PgPool,
        trainer_id: Uuid,
        client_id: Uuid,
        request: AssignPlanRequest,
        today: NaiveDate,
    ) -> Result<ClientResponse, ApiError> {
        let terms = match request.template_id {
            Some(template_id) => {
                if request.name.is_some()
                    || request.value.is_some()
                    || request.duration_months.is_some()
                {
                    return Err(ApiError::BadRequest(
                        "Provide either template_id or custom plan fields, not both".to_string(),
                    ));
                }
                let template = PlanCatalogRepository::find_by_id(pool, template_id, trainer_id)
                    .await
                    .map_err(ApiError::Internal)?
                    .ok_or_else(|| ApiError::NotFound("Plan template not found".to_string()))?;
                CycleTerms {
                    name: template.name,
                    value: template.value,
                    duration_months: template.duration_months,
                }
            }
            None => custom_terms(&request)?,
        };

        validate_terms(&terms)?;

        let start_date = request.start_date.unwrap_or(today);
        let (cycle, description) = build_cycle(terms, start_date)?;

        let record = ClientRepository::assign_plan(pool, client_id, trainer_id, cycle, description)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;

        ClientService::to_response(record, today)
    }

    /// Renew a client's plan.
    ///
    /// The outgoing cycle is snapshotted to history with a payment
    /// status taken from its cycle charge, then the current cycle is
    /// overwritten and a new pending charge opened. Atomic.
    pub async fn renew_plan(
        pool: &PgPool,
        trainer_id: Uuid,
        client_id: Uuid,
        request: RenewPlanRequest,
        today: NaiveDate,
    ) -> Result<ClientResponse, ApiError> {
        let client = ClientService::load_model(pool, trainer_id, client_id).await?;
        let current = client.plan.ok_or_else(|| {
            ApiError::BadRequest("Client has no plan to renew".to_string())
        })?;

        let terms = renewal_terms(&current, &request)?;
        validate_terms(&terms)?;

        let history = NewHistoryEntry {
            plan_name: current.name.clone(),
            plan_value: current.value,
            start_date: current.start_date,
            end_date: current.end_date,
            payment_status: Self::cycle_payment_status(pool, client_id, current.start_date)
                .await?
                .as_str()
                .to_string(),
        };

        let start_date = request.start_date.unwrap_or(today);
        let (cycle, description) = build_cycle(terms, start_date)?;

        let record =
            ClientRepository::renew_plan(pool, client_id, trainer_id, history, cycle, description)
                .await
                .map_err(ApiError::Internal)?
                .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;

        ClientService::to_response(record, today)
    }

    /// Whether the cycle charge opened at assignment or renewal was
    /// paid. A missing or unpaid charge archives as pending.
    async fn cycle_payment_status(
        pool: &PgPool,
        client_id: Uuid,
        cycle_start: NaiveDate,
    ) -> Result<PaymentStatus, ApiError> {
        let charge = TransactionRepository::find_cycle_charge(pool, client_id, cycle_start)
            .await
            .map_err(ApiError::Internal)?;

        let paid = charge
            .map(|c| c.status == TransactionStatus::Paid.as_str())
            .unwrap_or(false);

        Ok(if paid {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Pending
        })
    }

    /// Derived plan status for a client
    pub async fn plan_status(
        pool: &PgPool,
        trainer_id: Uuid,
        client_id: Uuid,
        today: NaiveDate,
    ) -> Result<PlanStatusResponse, ApiError> {
        let client = ClientService::load_model(pool, trainer_id, client_id).await?;
        let end_date = client.plan.as_ref().map(|p| p.end_date);
        let status = plan_cycle::plan_status(end_date, today);

        Ok(PlanStatusResponse {
            status,
            days_remaining: end_date.map(|end| (end - today).num_days()),
            plan: client.plan,
        })
    }

    /// Archived plan cycles for a client, oldest first
    pub async fn plan_history(
        pool: &PgPool,
        trainer_id: Uuid,
        client_id: Uuid,
    ) -> Result<Vec<PlanHistoryEntryResponse>, ApiError> {
        // Scope check before reading history rows
        ClientService::load_model(pool, trainer_id, client_id).await?;

        let records = ClientRepository::plan_history(pool, client_id)
            .await
            .map_err(ApiError::Internal)?;

        records
            .into_iter()
            .map(|r| {
                let entry = r.into_model().map_err(ApiError::Internal)?;
                Ok(PlanHistoryEntryResponse {
                    id: entry.id.to_string(),
                    plan_name: entry.plan_name,
                    plan_value: entry.plan_value,
                    start_date: entry.start_date,
                    end_date: entry.end_date,
                    payment_status: entry.payment_status.as_str().to_string(),
                    recorded_at: entry.recorded_at,
                })
            })
            .collect()
    }
}

fn custom_terms(request: &AssignPlanRequest) -> Result<CycleTerms, ApiError> {
    match (&request.name, request.value, request.duration_months) {
        (Some(name), Some(value), Some(duration_months)) => Ok(CycleTerms {
            name: name.clone(),
            value,
            duration_months,
        }),
        _ => Err(ApiError::BadRequest(
            "Custom plans require name, value and duration_months".to_string(),
        )),
    }
}

fn renewal_terms(current: &PlanCycle, request: &RenewPlanRequest) -> Result<CycleTerms, ApiError> {
    if request.keep_conditions {
        if request.value.is_some() || request.duration_months.is_some() {
            return Err(ApiError::BadRequest(
                "keep_conditions cannot be combined with new terms".to_string(),
            ));
        }
        return Ok(CycleTerms {
            name: current.name.clone(),
            value: current.value,
            duration_months: current.duration_months,
        });
    }

    match (request.value, request.duration_months) {
        // The plan name always carries over; only terms change
        (Some(value), Some(duration_months)) => Ok(CycleTerms {
            name: current.name.clone(),
            value,
            duration_months,
        }),
        _ => Err(ApiError::BadRequest(
            "Renewal with new terms requires value and duration_months".to_string(),
        )),
    }
}

fn validate_terms(terms: &CycleTerms) -> Result<(), ApiError> {
    validation::validate_name(&terms.name).map_err(ApiError::Validation)?;
    validation::validate_amount(terms.value).map_err(ApiError::Validation)?;
    validation::validate_duration_months(terms.duration_months).map_err(ApiError::Validation)
}

fn build_cycle(
    terms: CycleTerms,
    start_date: NaiveDate,
) -> Result<(PlanCycleFields, String), ApiError> {
    let end_date = plan_cycle::cycle_end_date(start_date, terms.duration_months)
        .ok_or_else(|| ApiError::BadRequest("Invalid plan duration".to_string()))?;

    let description = format!("Plan cycle: {} starting {}", terms.name, start_date);

    Ok((
        PlanCycleFields {
            name: terms.name,
            value: terms.value,
            duration_months: terms.duration_months,
            start_date,
            end_date,
        },
        description,
    ))
}

//! Client registry service
//!
//! Derives the plan lifecycle status at read time; the database never
//! stores "expiring_soon" or "expired".

use crate::error::ApiError;
use crate::repositories::{ClientRecord, ClientRepository, CreateClient, UpdateClientFields};
use chrono::NaiveDate;
use sqlx::PgPool;
use trainerdesk_shared::models::Client;
use trainerdesk_shared::plan_cycle;
use trainerdesk_shared::types::{
    ClientResponse, CreateClientRequest, SelfRegisterClientRequest, UpdateClientRequest,
};
use trainerdesk_shared::validation;
use uuid::Uuid;

/// Client service for registry operations
pub struct ClientService;

impl ClientService {
    /// Create a client (staff-entered, full field set)
    pub async fn create_client(
        pool: &PgPool,
        trainer_id: Uuid,
        request: CreateClientRequest,
        today: NaiveDate,
    ) -> Result<ClientResponse, ApiError> {
        validation::validate_name(&request.name).map_err(ApiError::Validation)?;
        if let Some(email) = &request.email {
            validation::validate_email(email).map_err(ApiError::Validation)?;
        }
        if let Some(weight) = request.weight_kg {
            validation::validate_weight_kg(weight).map_err(ApiError::Validation)?;
        }
        if let Some(height) = request.height_cm {
            validation::validate_height_cm(height).map_err(ApiError::Validation)?;
        }
        if let Some(target) = request.target_weight_kg {
            validation::validate_weight_kg(target).map_err(ApiError::Validation)?;
        }

        let record = ClientRepository::create(
            pool,
            CreateClient {
                trainer_id,
                name: request.name,
                email: request.email,
                phone: request.phone,
                weight_kg: request.weight_kg,
                height_cm: request.height_cm,
                target_weight_kg: request.target_weight_kg,
                notes: request.notes,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        Self::to_response(record, today)
    }

    /// Public self-registration with a reduced field set. The client
    /// lands active with no plan; the trainer assigns one later.
    pub async fn self_register(
        pool: &PgPool,
        trainer_id: Uuid,
        request: SelfRegisterClientRequest,
        today: NaiveDate,
    ) -> Result<ClientResponse, ApiError> {
        Self::create_client(
            pool,
            trainer_id,
            CreateClientRequest {
                name: request.name,
                email: request.email,
                phone: request.phone,
                weight_kg: None,
                height_cm: None,
                target_weight_kg: None,
                notes: None,
            },
            today,
        )
        .await
    }

    /// List the trainer's clients, optionally filtered by status
    pub async fn list_clients(
        pool: &PgPool,
        trainer_id: Uuid,
        status: Option<trainerdesk_shared::models::ClientStatus>,
        today: NaiveDate,
    ) -> Result<Vec<ClientResponse>, ApiError> {
        let records = ClientRepository::list(pool, trainer_id, status.map(|s| s.as_str()))
            .await
            .map_err(ApiError::Internal)?;

        records
            .into_iter()
            .map(|r| Self::to_response(r, today))
            .collect()
    }

    /// Get a single client
    pub async fn get_client(
        pool: &PgPool,
        trainer_id: Uuid,
        client_id: Uuid,
        today: NaiveDate,
    ) -> Result<ClientResponse, ApiError> {
        let record = ClientRepository::find_by_id(pool, client_id, trainer_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;

        Self::to_response(record, today)
    }

    /// Load the domain model for a client; used by the plan and ledger
    /// services
    pub async fn load_model(
        pool: &PgPool,
        trainer_id: Uuid,
        client_id: Uuid,
    ) -> Result<Client, ApiError> {
        let record = ClientRepository::find_by_id(pool, client_id, trainer_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;

        record.into_model().map_err(ApiError::Internal)
    }

    /// Partial update. Archiving is a status flip to inactive here; it
    /// never deletes history or ledger rows.
    pub async fn update_client(
        pool: &PgPool,
        trainer_id: Uuid,
        client_id: Uuid,
        request: UpdateClientRequest,
        today: NaiveDate,
    ) -> Result<ClientResponse, ApiError> {
        if let Some(name) = &request.name {
            validation::validate_name(name).map_err(ApiError::Validation)?;
        }
        if let Some(email) = &request.email {
            validation::validate_email(email).map_err(ApiError::Validation)?;
        }
        if let Some(weight) = request.weight_kg {
            validation::validate_weight_kg(weight).map_err(ApiError::Validation)?;
        }
        if let Some(height) = request.height_cm {
            validation::validate_height_cm(height).map_err(ApiError::Validation)?;
        }
        if let Some(target) = request.target_weight_kg {
            validation::validate_weight_kg(target).map_err(ApiError::Validation)?;
        }

        let record = ClientRepository::update(
            pool,
            client_id,
            trainer_id,
            UpdateClientFields {
                name: request.name,
                email: request.email,
                phone: request.phone,
                status: request.status.map(|s| s.as_str().to_string()),
                weight_kg: request.weight_kg,
                height_cm: request.height_cm,
                target_weight_kg: request.target_weight_kg,
                notes: request.notes,
            },
        )
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;

        Self::to_response(record, today)
    }

    /// Hard-delete a client and, via cascade, their history and ledger
    pub async fn delete_client(
        pool: &PgPool,
        trainer_id: Uuid,
        client_id: Uuid,
    ) -> Result<(), ApiError> {
        let deleted = ClientRepository::delete(pool, client_id, trainer_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Client not found".to_string()));
        }
        Ok(())
    }

    pub(crate) fn to_response(
        record: ClientRecord,
        today: NaiveDate,
    ) -> Result<ClientResponse, ApiError> {
        let client = record.into_model().map_err(ApiError::Internal)?;
        let plan_status =
            plan_cycle::plan_status(client.plan.as_ref().map(|p| p.end_date), today);

        Ok(ClientResponse {
            id: client.id.to_string(),
            name: client.name,
            email: client.email,
            phone: client.phone,
            status: client.status,
            weight_kg: client.weight_kg,
            height_cm: client.height_cm,
            target_weight_kg: client.target_weight_kg,
            notes: client.notes,
            plan: client.plan,
            plan_status,
            created_at: client.created_at,
        })
    }
}

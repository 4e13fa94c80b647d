//! Registration repository for the hospital_registrations table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hospireg_core::models::{DocumentLocations, HospitalRegistrationRecord, NewRegistration};
use hospireg_core::AppError;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Document store for registrations.
///
/// Every `insert` creates a new record with a fresh id; there is no uniqueness key, so
/// re-sending the same submission yields a second record.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Persist a registration, assigning its id and insertion time.
    async fn insert(&self, registration: NewRegistration)
        -> Result<HospitalRegistrationRecord, AppError>;

    /// Cheap round-trip used by the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Row type for hospital_registrations table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct RegistrationRow {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub documents: Json<DocumentLocations>,
    pub upload_time: DateTime<Utc>,
}

impl RegistrationRow {
    pub fn into_record(self) -> HospitalRegistrationRecord {
        HospitalRegistrationRecord {
            id: self.id,
            name: self.name,
            address: self.address,
            documents: self.documents.0,
            upload_time: self.upload_time,
        }
    }
}

/// PostgreSQL implementation of `RegistrationStore`.
#[derive(Clone)]
pub struct PgRegistrationRepository {
    pool: PgPool,
}

impl PgRegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationStore for PgRegistrationRepository {
    #[tracing::instrument(
        skip(self, registration),
        fields(db.table = "hospital_registrations", db.operation = "insert")
    )]
    async fn insert(
        &self,
        registration: NewRegistration,
    ) -> Result<HospitalRegistrationRecord, AppError> {
        let id = Uuid::new_v4();
        let upload_time = Utc::now();

        let row: RegistrationRow = sqlx::query_as::<Postgres, RegistrationRow>(
            r#"
            INSERT INTO hospital_registrations (id, name, address, documents, upload_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, address, documents, upload_time
            "#,
        )
        .bind(id)
        .bind(&registration.name)
        .bind(&registration.address)
        .bind(Json(&registration.documents))
        .bind(upload_time)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            registration_id = %row.id,
            documents = row.documents.0.present_count(),
            "Registration inserted"
        );

        Ok(row.into_record())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

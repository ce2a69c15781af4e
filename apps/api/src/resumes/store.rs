use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{Resume, ResumePatch, ResumeRow};

/// Persistence seam for resumes. Every owner-scoped method matches on owner AND id, so a
/// record owned by someone else is indistinguishable from a missing one.
///
/// Carried in `AppState` as `Arc<dyn ResumeStore>`.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn insert(&self, resume: &Resume) -> Result<(), AppError>;

    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Resume>, AppError>;

    async fn find_public(&self, id: Uuid) -> Result<Option<Resume>, AppError>;

    /// Applies `patch` atomically. With `expected_version` set, a stale version fails with
    /// `AppError::Conflict`; without it the last write wins.
    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: ResumePatch,
        expected_version: Option<i32>,
    ) -> Result<Option<Resume>, AppError>;

    /// Returns false when nothing matched.
    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

pub fn check_expected_version(current: i32, expected: Option<i32>) -> Result<(), AppError> {
    match expected {
        Some(expected) if expected != current => Err(AppError::Conflict(format!(
            "Resume was modified by another save (expected version {expected}, found {current})"
        ))),
        _ => Ok(()),
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, title, public, content, version, created_at, updated_at FROM resumes";

/// PostgreSQL-backed store. Content is a JSONB document per row.
#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn insert(&self, resume: &Resume) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO resumes
                (id, user_id, title, public, content, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(resume.id)
        .bind(resume.user_id)
        .bind(&resume.title)
        .bind(resume.public)
        .bind(Json(&resume.content))
        .bind(resume.version)
        .bind(resume.created_at)
        .bind(resume.updated_at)
        .execute(&self.pool)
        .await?;

        info!("Inserted resume {} for user {}", resume.id, resume.user_id);
        Ok(())
    }

    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Resume>, AppError> {
        let row: Option<ResumeRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = $1 AND user_id = $2"))
                .bind(id)
                .bind(owner)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Resume::from))
    }

    async fn find_public(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        let row: Option<ResumeRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = $1 AND public"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Resume::from))
    }

    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: ResumePatch,
        expected_version: Option<i32>,
    ) -> Result<Option<Resume>, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<ResumeRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE id = $1 AND user_id = $2 FOR UPDATE"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping `tx` without commit rolls back.
        let Some(row) = row else {
            return Ok(None);
        };
        let mut resume = Resume::from(row);
        check_expected_version(resume.version, expected_version)?;
        patch.apply_to(&mut resume, Utc::now());

        sqlx::query(
            r#"
            UPDATE resumes
            SET title = $1, public = $2, content = $3, version = $4, updated_at = $5
            WHERE id = $6 AND user_id = $7
            "#,
        )
        .bind(&resume.title)
        .bind(resume.public)
        .bind(Json(&resume.content))
        .bind(resume.version)
        .bind(resume.updated_at)
        .bind(id)
        .bind(owner)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Updated resume {id} to version {}", resume.version);
        Ok(Some(resume))
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

//! Repository for the `exam_entries` table.

use campus_core::enrollment::{self, LifecycleFlags};
use campus_core::error::CoreError;
use campus_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::exam_entry::{CreateExamEntry, ExamEntry, UpdateExamEntry};
use crate::repositories::enrollment_repo::EnrollmentRepo;

const COLUMNS: &str = "id, enrollment_id, exam_name, exam_type, exam_date, note";

/// Provides CRUD operations for exam entries under an enrollment.
pub struct ExamEntryRepo;

impl ExamEntryRepo {
    /// Record an exam under an enrollment.
    ///
    /// The enrollment must exist, be active, and not be complete.
    pub async fn create(
        pool: &PgPool,
        enrollment_id: DbId,
        input: &CreateExamEntry,
    ) -> RepoResult<ExamEntry> {
        let mut tx = pool.begin().await?;

        let enrollment = EnrollmentRepo::lock(&mut tx, enrollment_id).await?;
        enrollment::ensure_active(LifecycleFlags {
            is_active: enrollment.is_active,
            is_complete: enrollment.is_complete,
        })?;

        let query = format!(
            "INSERT INTO exam_entries (enrollment_id, exam_name, exam_type, exam_date, note)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, ExamEntry>(&query)
            .bind(enrollment_id)
            .bind(&input.exam_name)
            .bind(&input.exam_type)
            .bind(input.exam_date)
            .bind(&input.note)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Patch an exam entry belonging to the given enrollment.
    pub async fn update(
        pool: &PgPool,
        enrollment_id: DbId,
        entry_id: DbId,
        input: &UpdateExamEntry,
    ) -> RepoResult<ExamEntry> {
        let query = format!(
            "UPDATE exam_entries SET
                exam_name = COALESCE($1, exam_name),
                exam_type = COALESCE($2, exam_type),
                exam_date = COALESCE($3, exam_date),
                note = COALESCE($4, note)
             WHERE id = $5 AND enrollment_id = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ExamEntry>(&query)
            .bind(&input.exam_name)
            .bind(&input.exam_type)
            .bind(input.exam_date)
            .bind(&input.note)
            .bind(entry_id)
            .bind(enrollment_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "ExamEntry", id: entry_id }.into())
    }

    /// Delete an exam entry belonging to the given enrollment.
    pub async fn delete(
        pool: &PgPool,
        enrollment_id: DbId,
        entry_id: DbId,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            "DELETE FROM exam_entries WHERE id = $1 AND enrollment_id = $2",
        )
        .bind(entry_id)
        .bind(enrollment_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound { entity: "ExamEntry", id: entry_id }.into());
        }
        Ok(())
    }

    /// List an enrollment's exam entries, by exam date.
    pub async fn list_for_enrollment(
        pool: &PgPool,
        enrollment_id: DbId,
    ) -> Result<Vec<ExamEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM exam_entries
             WHERE enrollment_id = $1
             ORDER BY exam_date"
        );
        sqlx::query_as::<_, ExamEntry>(&query)
            .bind(enrollment_id)
            .fetch_all(pool)
            .await
    }
}

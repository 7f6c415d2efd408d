//! Repository for the `classrooms` table.

use campus_core::error::CoreError;
use campus_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::classroom::{Classroom, CreateClassroom, UpdateClassroom};

const COLUMNS: &str = "id, name, is_active";

/// Provides CRUD operations for classrooms.
pub struct ClassroomRepo;

impl ClassroomRepo {
    /// Insert a new classroom, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateClassroom,
    ) -> Result<Classroom, sqlx::Error> {
        let query = format!(
            "INSERT INTO classrooms (name, is_active)
             VALUES ($1, COALESCE($2, TRUE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Classroom>(&query)
            .bind(&input.name)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a classroom by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Classroom>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM classrooms WHERE id = $1");
        sqlx::query_as::<_, Classroom>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all classrooms, by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Classroom>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM classrooms ORDER BY name");
        sqlx::query_as::<_, Classroom>(&query).fetch_all(pool).await
    }

    /// Patch a classroom. Returns the updated row, or `None` if not found.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClassroom,
    ) -> Result<Option<Classroom>, sqlx::Error> {
        let query = format!(
            "UPDATE classrooms SET
                name = COALESCE($1, name),
                is_active = COALESCE($2, is_active)
             WHERE id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Classroom>(&query)
            .bind(&input.name)
            .bind(input.is_active)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a classroom.
    ///
    /// Blocked while sections exist under it unless `force` is set.
    pub async fn delete(pool: &PgPool, id: DbId, force: bool) -> RepoResult<()> {
        let mut tx = pool.begin().await?;

        let exists: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM classrooms WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(CoreError::NotFound { entity: "Classroom", id }.into());
        }

        let (section_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM class_sections WHERE classroom_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if section_count > 0 && !force {
            return Err(CoreError::StateConflict(
                "Classroom has sections; pass force to delete them as well".into(),
            )
            .into());
        }

        sqlx::query("DELETE FROM classrooms WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

//! Repository for the `class_sections` table.

use campus_core::error::CoreError;
use campus_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::class_section::{
    ClassSection, CreateClassSection, SectionRosterEntry, UpdateClassSection,
};

const COLUMNS: &str = "id, classroom_id, name, is_active, default_fee, subjects";

/// Provides CRUD operations and the roster view for classroom sections.
pub struct ClassSectionRepo;

impl ClassSectionRepo {
    /// Create a section under a classroom.
    ///
    /// Fails with `NotFound` when the classroom does not exist; duplicate
    /// (classroom, name) pairs surface as a unique-constraint violation.
    pub async fn create(
        pool: &PgPool,
        classroom_id: DbId,
        input: &CreateClassSection,
    ) -> RepoResult<ClassSection> {
        let classroom: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM classrooms WHERE id = $1")
                .bind(classroom_id)
                .fetch_optional(pool)
                .await?;
        if classroom.is_none() {
            return Err(CoreError::NotFound { entity: "Classroom", id: classroom_id }.into());
        }

        let query = format!(
            "INSERT INTO class_sections (classroom_id, name, is_active, default_fee, subjects)
             VALUES ($1, $2, COALESCE($3, TRUE), $4, COALESCE($5, '[]'::jsonb))
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, ClassSection>(&query)
            .bind(classroom_id)
            .bind(&input.name)
            .bind(input.is_active)
            .bind(input.default_fee)
            .bind(&input.subjects)
            .fetch_one(pool)
            .await?;
        Ok(created)
    }

    /// Find a section by its primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ClassSection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM class_sections WHERE id = $1");
        sqlx::query_as::<_, ClassSection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a classroom's sections, by name.
    pub async fn list_by_classroom(
        pool: &PgPool,
        classroom_id: DbId,
    ) -> Result<Vec<ClassSection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM class_sections
             WHERE classroom_id = $1
             ORDER BY name"
        );
        sqlx::query_as::<_, ClassSection>(&query)
            .bind(classroom_id)
            .fetch_all(pool)
            .await
    }

    /// Patch a section. Returns the updated row, or `None` if not found.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClassSection,
    ) -> Result<Option<ClassSection>, sqlx::Error> {
        let query = format!(
            "UPDATE class_sections SET
                name = COALESCE($1, name),
                default_fee = COALESCE($2, default_fee),
                subjects = COALESCE($3, subjects),
                is_active = COALESCE($4, is_active)
             WHERE id = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClassSection>(&query)
            .bind(&input.name)
            .bind(input.default_fee)
            .bind(&input.subjects)
            .bind(input.is_active)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a section.
    ///
    /// The section must belong to the claimed classroom. Blocked while
    /// enrollments reference it unless `force` is set.
    pub async fn delete(
        pool: &PgPool,
        classroom_id: DbId,
        section_id: DbId,
        force: bool,
    ) -> RepoResult<()> {
        let mut tx = pool.begin().await?;

        let section: Option<(DbId,)> =
            sqlx::query_as("SELECT classroom_id FROM class_sections WHERE id = $1 FOR UPDATE")
                .bind(section_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (owner,) = section
            .ok_or(CoreError::NotFound { entity: "ClassSection", id: section_id })?;
        if owner != classroom_id {
            return Err(CoreError::Forbidden(
                "Section does not belong to the specified classroom".into(),
            )
            .into());
        }

        let (enrollment_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM enrollments WHERE section_id = $1")
                .bind(section_id)
                .fetch_one(&mut *tx)
                .await?;
        if enrollment_count > 0 && !force {
            return Err(CoreError::StateConflict(
                "Section has enrollments; pass force to delete them as well".into(),
            )
            .into());
        }

        sqlx::query("DELETE FROM class_sections WHERE id = $1")
            .bind(section_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(section_id, classroom_id, force, "Section deleted");
        Ok(())
    }

    /// Roster of a section: each enrolled student with their session window.
    pub async fn roster(
        pool: &PgPool,
        section_id: DbId,
    ) -> Result<Vec<SectionRosterEntry>, sqlx::Error> {
        sqlx::query_as::<_, SectionRosterEntry>(
            "SELECT s.id AS student_id, s.name AS student_name,
                    e.id AS enrollment_id, e.session_start, e.session_end,
                    e.is_active, e.is_complete
             FROM enrollments e
             JOIN students s ON s.id = e.student_id
             WHERE e.section_id = $1
             ORDER BY s.name, e.session_start",
        )
        .bind(section_id)
        .fetch_all(pool)
        .await
    }
}

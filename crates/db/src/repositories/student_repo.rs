//! Repository for the `students` table.

use campus_core::error::CoreError;
use campus_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::student::{CreateStudent, Student, UpdateStudent};

/// Column list for students queries.
pub(crate) const STUDENT_COLUMNS: &str = "id, name, search_name, address, date_of_birth, \
    father_name, mother_name, father_phone, mother_phone, is_active, \
    identity_documents, created_at, updated_at";

/// Provides CRUD and directory search for students.
pub struct StudentRepo;

impl StudentRepo {
    /// Register a new student, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateStudent) -> Result<Student, sqlx::Error> {
        let query = format!(
            "INSERT INTO students
                (name, search_name, address, date_of_birth, father_name,
                 mother_name, father_phone, mother_phone, identity_documents)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, '[]'::jsonb))
             RETURNING {STUDENT_COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(&input.name)
            .bind(&input.search_name)
            .bind(&input.address)
            .bind(input.date_of_birth)
            .bind(&input.father_name)
            .bind(&input.mother_name)
            .bind(&input.father_phone)
            .bind(&input.mother_phone)
            .bind(&input.identity_documents)
            .fetch_one(pool)
            .await
    }

    /// Find a student by their primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Student>, sqlx::Error> {
        let query = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1");
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Patch a student. Returns the updated row, or `None` if not found.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStudent,
    ) -> Result<Option<Student>, sqlx::Error> {
        let query = format!(
            "UPDATE students SET
                name = COALESCE($1, name),
                search_name = COALESCE($2, search_name),
                address = COALESCE($3, address),
                date_of_birth = COALESCE($4, date_of_birth),
                father_name = COALESCE($5, father_name),
                mother_name = COALESCE($6, mother_name),
                father_phone = COALESCE($7, father_phone),
                mother_phone = COALESCE($8, mother_phone),
                is_active = COALESCE($9, is_active),
                identity_documents = COALESCE($10, identity_documents),
                updated_at = NOW()
             WHERE id = $11
             RETURNING {STUDENT_COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(&input.name)
            .bind(&input.search_name)
            .bind(&input.address)
            .bind(input.date_of_birth)
            .bind(&input.father_name)
            .bind(&input.mother_name)
            .bind(&input.father_phone)
            .bind(&input.mother_phone)
            .bind(input.is_active)
            .bind(&input.identity_documents)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a student.
    ///
    /// Blocked while the student has enrollments unless `force` is set;
    /// enrollments (and their ledgers and receipts) cascade with the row.
    pub async fn delete(pool: &PgPool, id: DbId, force: bool) -> RepoResult<()> {
        let mut tx = pool.begin().await?;

        let exists: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM students WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(CoreError::NotFound { entity: "Student", id }.into());
        }

        let (enrollment_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM enrollments WHERE student_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if enrollment_count > 0 && !force {
            return Err(CoreError::StateConflict(
                "Student has enrollments; pass force to delete them as well".into(),
            )
            .into());
        }

        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(student_id = id, force, "Student deleted");
        Ok(())
    }

    /// Case-insensitive directory search across names, parents, phones,
    /// address, and identity documents. Returns one page plus the total
    /// match count.
    pub async fn search(
        pool: &PgPool,
        term: &str,
        limit: i64,
        offset: i64,
        ascending: bool,
    ) -> Result<(Vec<Student>, i64), sqlx::Error> {
        let pattern = format!("%{}%", term.to_lowercase());
        let condition = "name ILIKE $1
                OR search_name ILIKE $1
                OR address ILIKE $1
                OR father_name ILIKE $1
                OR mother_name ILIKE $1
                OR father_phone ILIKE $1
                OR mother_phone ILIKE $1
                OR identity_documents::text ILIKE $1";

        let order = if ascending { "ASC" } else { "DESC" };
        let query = format!(
            "SELECT {STUDENT_COLUMNS} FROM students
             WHERE {condition}
             ORDER BY name {order}
             LIMIT $2 OFFSET $3"
        );
        let students = sqlx::query_as::<_, Student>(&query)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM students WHERE {condition}");
        let (total,): (i64,) = sqlx::query_as(&count_query)
            .bind(&pattern)
            .fetch_one(pool)
            .await?;

        Ok((students, total))
    }
}

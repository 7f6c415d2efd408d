//! Repository for the `enrollments` table: creation with overlap checking,
//! lifecycle updates, and guarded deletion.

use campus_core::enrollment::{self, SessionInterval};
use campus_core::error::CoreError;
use campus_core::types::DbId;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::error::{RepoError, RepoResult};
use crate::models::class_section::ClassSection;
use crate::models::classroom::Classroom;
use crate::models::enrollment::{
    CreateEnrollment, Enrollment, EnrollmentDetails, UpdateEnrollment,
};
use crate::models::exam_entry::ExamEntry;
use crate::models::student::Student;
use crate::repositories::fee_ledger_repo::FEE_COLUMNS;
use crate::repositories::student_repo::STUDENT_COLUMNS;

/// Column list for enrollments queries.
pub(crate) const ENROLLMENT_COLUMNS: &str = "id, student_id, classroom_id, section_id, \
    session_start, session_end, monthly_fee, one_time_fee, subjects, \
    is_active, is_complete, created_at";

/// Provides operations on student enrollments.
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Enroll a student into a section.
    ///
    /// Runs in one transaction: verifies the student exists, the section and
    /// its classroom exist and are active, and that the proposed session does
    /// not overlap an existing enrollment of the same (student, section) by
    /// more than the tolerated month. `monthly_fee` and `subjects` are
    /// snapshotted onto the new row.
    pub async fn create(
        pool: &PgPool,
        student_id: DbId,
        input: &CreateEnrollment,
    ) -> RepoResult<Enrollment> {
        let session = SessionInterval::new(input.session_start, input.session_end)?;

        let mut tx = pool.begin().await?;

        let student: Option<(bool,)> =
            sqlx::query_as("SELECT is_active FROM students WHERE id = $1")
                .bind(student_id)
                .fetch_optional(&mut *tx)
                .await?;
        if student.is_none() {
            return Err(CoreError::NotFound { entity: "Student", id: student_id }.into());
        }

        let section = sqlx::query_as::<_, ClassSection>(
            "SELECT id, classroom_id, name, is_active, default_fee, subjects
             FROM class_sections WHERE id = $1",
        )
        .bind(input.section_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CoreError::NotFound { entity: "ClassSection", id: input.section_id })?;

        let classroom = sqlx::query_as::<_, Classroom>(
            "SELECT id, name, is_active FROM classrooms WHERE id = $1",
        )
        .bind(section.classroom_id)
        .fetch_one(&mut *tx)
        .await?;

        if !classroom.is_active {
            return Err(CoreError::StateConflict(
                "Classroom is not active; activate it first".into(),
            )
            .into());
        }
        if !section.is_active {
            return Err(CoreError::StateConflict(
                "Classroom section is not active; activate it first".into(),
            )
            .into());
        }

        // Existing sessions of the same (student, section) that share any
        // time with the proposed one.
        let existing: Vec<(NaiveDate, NaiveDate)> = sqlx::query_as(
            "SELECT session_start, session_end FROM enrollments
             WHERE student_id = $1 AND section_id = $2
               AND session_start < $3 AND session_end > $4",
        )
        .bind(student_id)
        .bind(input.section_id)
        .bind(session.end)
        .bind(session.start)
        .fetch_all(&mut *tx)
        .await?;

        let intervals: Vec<SessionInterval> = existing
            .into_iter()
            .map(|(start, end)| SessionInterval { start, end })
            .collect();
        enrollment::check_overlap(&session, &intervals)?;

        let monthly_fee = input.monthly_fee.unwrap_or(section.default_fee);
        let query = format!(
            "INSERT INTO enrollments
                (student_id, classroom_id, section_id, session_start,
                 session_end, monthly_fee, subjects, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {ENROLLMENT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Enrollment>(&query)
            .bind(student_id)
            .bind(section.classroom_id)
            .bind(section.id)
            .bind(session.start)
            .bind(session.end)
            .bind(monthly_fee)
            .bind(&section.subjects)
            .bind(input.is_active.unwrap_or(true))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            enrollment_id = created.id,
            student_id,
            section_id = section.id,
            "Enrollment created"
        );
        Ok(created)
    }

    /// Find an enrollment by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!("SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = $1");
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a student's enrollments, newest session first.
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments
             WHERE student_id = $1
             ORDER BY session_start DESC"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }

    /// Load an enrollment with its student, placement, fee ledger, and exams.
    pub async fn details(
        pool: &PgPool,
        student_id: DbId,
        enrollment_id: DbId,
    ) -> RepoResult<EnrollmentDetails> {
        let query = format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = $1 AND student_id = $2"
        );
        let enrollment = sqlx::query_as::<_, Enrollment>(&query)
            .bind(enrollment_id)
            .bind(student_id)
            .fetch_optional(pool)
            .await?
            .ok_or(CoreError::NotFound { entity: "Enrollment", id: enrollment_id })?;

        let student_query = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1");
        let student = sqlx::query_as::<_, Student>(&student_query)
            .bind(enrollment.student_id)
            .fetch_one(pool)
            .await?;

        let classroom = sqlx::query_as::<_, Classroom>(
            "SELECT id, name, is_active FROM classrooms WHERE id = $1",
        )
        .bind(enrollment.classroom_id)
        .fetch_one(pool)
        .await?;

        let section = sqlx::query_as::<_, ClassSection>(
            "SELECT id, classroom_id, name, is_active, default_fee, subjects
             FROM class_sections WHERE id = $1",
        )
        .bind(enrollment.section_id)
        .fetch_one(pool)
        .await?;

        let fee_query = format!(
            "SELECT {FEE_COLUMNS} FROM monthly_fees WHERE enrollment_id = $1 ORDER BY due_date"
        );
        let monthly_fees = sqlx::query_as(&fee_query)
            .bind(enrollment.id)
            .fetch_all(pool)
            .await?;

        let exam_entries = sqlx::query_as::<_, ExamEntry>(
            "SELECT id, enrollment_id, exam_name, exam_type, exam_date, note
             FROM exam_entries WHERE enrollment_id = $1
             ORDER BY exam_date",
        )
        .bind(enrollment.id)
        .fetch_all(pool)
        .await?;

        Ok(EnrollmentDetails {
            enrollment,
            student,
            classroom,
            section,
            monthly_fees,
            exam_entries,
        })
    }

    /// Apply a lifecycle patch to an enrollment.
    ///
    /// The enrollment must belong to the claimed student. Flipping
    /// `is_complete` back to `false` reopens an archived enrollment.
    pub async fn update(
        pool: &PgPool,
        student_id: DbId,
        enrollment_id: DbId,
        input: &UpdateEnrollment,
    ) -> RepoResult<Enrollment> {
        let mut tx = pool.begin().await?;

        let enrollment = Self::lock(&mut tx, enrollment_id).await?;
        if enrollment.student_id != student_id {
            return Err(CoreError::Forbidden(
                "Enrollment does not belong to the specified student".into(),
            )
            .into());
        }

        let query = format!(
            "UPDATE enrollments SET
                is_active = COALESCE($1, is_active),
                is_complete = COALESCE($2, is_complete),
                one_time_fee = COALESCE($3, one_time_fee)
             WHERE id = $4
             RETURNING {ENROLLMENT_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Enrollment>(&query)
            .bind(input.is_active)
            .bind(input.is_complete)
            .bind(input.one_time_fee)
            .bind(enrollment_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete an enrollment.
    ///
    /// Blocked while payment receipts exist unless `force` is set; the fee
    /// ledger, exam entries, and receipts cascade with the row.
    pub async fn delete(
        pool: &PgPool,
        student_id: DbId,
        enrollment_id: DbId,
        force: bool,
    ) -> RepoResult<()> {
        let mut tx = pool.begin().await?;

        let enrollment = Self::lock(&mut tx, enrollment_id).await?;
        if enrollment.student_id != student_id {
            return Err(CoreError::Forbidden(
                "Enrollment does not belong to the specified student".into(),
            )
            .into());
        }

        let (payment_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM fee_payments WHERE enrollment_id = $1")
                .bind(enrollment_id)
                .fetch_one(&mut *tx)
                .await?;
        if payment_count > 0 && !force {
            return Err(CoreError::StateConflict(
                "Enrollment has payment history; pass force to delete it anyway".into(),
            )
            .into());
        }

        sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(enrollment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(enrollment_id, student_id, force, "Enrollment deleted");
        Ok(())
    }

    /// Fetch an enrollment `FOR UPDATE` inside `tx`, or fail with `NotFound`.
    pub(crate) async fn lock(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        enrollment_id: DbId,
    ) -> Result<Enrollment, RepoError> {
        let query =
            format!("SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(enrollment_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound { entity: "Enrollment", id: enrollment_id }.into()
            })
    }
}

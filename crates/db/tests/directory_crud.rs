//! Integration tests for the directory and fleet repositories:
//! - Student CRUD, guarded delete, and search
//! - Classroom/section unique constraints and delete guards
//! - Vehicle driver assignment rules
//! - Attendance stamping

use assert_matches::assert_matches;
use campus_core::error::CoreError;
use chrono::NaiveDate;
use sqlx::PgPool;

use campus_db::error::RepoError;
use campus_db::models::attendance::UpsertAttendance;
use campus_db::models::class_section::CreateClassSection;
use campus_db::models::classroom::CreateClassroom;
use campus_db::models::employee::CreateEmployee;
use campus_db::models::enrollment::CreateEnrollment;
use campus_db::models::student::{CreateStudent, UpdateStudent};
use campus_db::models::vehicle::{CreateDriver, CreateVehicle};
use campus_db::repositories::{
    AttendanceRepo, ClassSectionRepo, ClassroomRepo, DriverRepo, EmployeeRepo, EnrollmentRepo,
    StudentRepo, VehicleRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn new_student(name: &str, father_phone: Option<&str>) -> CreateStudent {
    CreateStudent {
        name: name.to_string(),
        search_name: name.to_lowercase(),
        address: "9 Temple Street".to_string(),
        date_of_birth: d(2013, 8, 21),
        father_name: "Hari".to_string(),
        mother_name: "Maya".to_string(),
        father_phone: father_phone.map(str::to_string),
        mother_phone: None,
        identity_documents: Some(serde_json::json!([
            { "doc_name": "birth_certificate", "doc_value": "BC-4471" }
        ])),
    }
}

fn new_employee(name: &str) -> CreateEmployee {
    CreateEmployee {
        name: name.to_string(),
        role: "driver".to_string(),
        phone: None,
        monthly_salary: 18_000.0,
    }
}

// ---------------------------------------------------------------------------
// Test: student CRUD and guarded delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_student_crud_roundtrip(pool: PgPool) {
    let student = StudentRepo::create(&pool, &new_student("Anita", None)).await.unwrap();
    assert!(student.is_active);

    let updated = StudentRepo::update(
        &pool,
        student.id,
        &UpdateStudent {
            name: None,
            search_name: None,
            address: Some("New Colony 3".to_string()),
            date_of_birth: None,
            father_name: None,
            mother_name: None,
            father_phone: None,
            mother_phone: None,
            is_active: Some(false),
            identity_documents: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.address, "New Colony 3");
    assert!(!updated.is_active);

    StudentRepo::delete(&pool, student.id, false).await.unwrap();
    assert!(StudentRepo::find_by_id(&pool, student.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_student_delete_blocked_by_enrollments(pool: PgPool) {
    let student = StudentRepo::create(&pool, &new_student("Bikash", None)).await.unwrap();
    let classroom = ClassroomRepo::create(
        &pool,
        &CreateClassroom { name: "Grade 3".to_string(), is_active: None },
    )
    .await
    .unwrap();
    let section = ClassSectionRepo::create(
        &pool,
        classroom.id,
        &CreateClassSection {
            name: "A".to_string(),
            default_fee: 80.0,
            subjects: None,
            is_active: None,
        },
    )
    .await
    .unwrap();
    EnrollmentRepo::create(
        &pool,
        student.id,
        &CreateEnrollment {
            section_id: section.id,
            session_start: d(2024, 1, 1),
            session_end: d(2024, 7, 1),
            monthly_fee: None,
            is_active: None,
        },
    )
    .await
    .unwrap();

    let err = StudentRepo::delete(&pool, student.id, false).await.unwrap_err();
    assert_matches!(err, RepoError::Domain(CoreError::StateConflict(_)));

    StudentRepo::delete(&pool, student.id, true).await.unwrap();
    assert!(StudentRepo::find_by_id(&pool, student.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: directory search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_matches_phone_and_documents_case_insensitively(pool: PgPool) {
    StudentRepo::create(&pool, &new_student("Chandra", Some("9812345678"))).await.unwrap();
    StudentRepo::create(&pool, &new_student("Deepak", None)).await.unwrap();

    // Phone fragment.
    let (by_phone, total) = StudentRepo::search(&pool, "12345", 10, 0, true).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(by_phone[0].name, "Chandra");

    // Uppercased name fragment.
    let (by_name, _) = StudentRepo::search(&pool, "DEEP", 10, 0, true).await.unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "Deepak");

    // Identity document value (both students share the seeded document).
    let (by_doc, _) = StudentRepo::search(&pool, "bc-4471", 10, 0, true).await.unwrap();
    assert_eq!(by_doc.len(), 2);

    let (none, _) = StudentRepo::search(&pool, "zzz", 10, 0, true).await.unwrap();
    assert!(none.is_empty());
}

// ---------------------------------------------------------------------------
// Test: classroom and section constraints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_section_name_within_classroom_rejected(pool: PgPool) {
    let classroom = ClassroomRepo::create(
        &pool,
        &CreateClassroom { name: "Grade 1".to_string(), is_active: None },
    )
    .await
    .unwrap();

    let input = CreateClassSection {
        name: "A".to_string(),
        default_fee: 60.0,
        subjects: None,
        is_active: None,
    };
    ClassSectionRepo::create(&pool, classroom.id, &input).await.unwrap();
    let result = ClassSectionRepo::create(&pool, classroom.id, &input).await;
    assert!(result.is_err(), "Duplicate section name should fail");

    // The same name under another classroom is fine.
    let other = ClassroomRepo::create(
        &pool,
        &CreateClassroom { name: "Grade 2".to_string(), is_active: None },
    )
    .await
    .unwrap();
    ClassSectionRepo::create(&pool, other.id, &input).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_section_delete_blocked_by_enrollments_unless_forced(pool: PgPool) {
    let student = StudentRepo::create(&pool, &new_student("Esha", None)).await.unwrap();
    let classroom = ClassroomRepo::create(
        &pool,
        &CreateClassroom { name: "Grade 8".to_string(), is_active: None },
    )
    .await
    .unwrap();
    let section = ClassSectionRepo::create(
        &pool,
        classroom.id,
        &CreateClassSection {
            name: "A".to_string(),
            default_fee: 150.0,
            subjects: None,
            is_active: None,
        },
    )
    .await
    .unwrap();
    let enrollment = EnrollmentRepo::create(
        &pool,
        student.id,
        &CreateEnrollment {
            section_id: section.id,
            session_start: d(2024, 1, 1),
            session_end: d(2024, 7, 1),
            monthly_fee: None,
            is_active: None,
        },
    )
    .await
    .unwrap();

    let err = ClassSectionRepo::delete(&pool, classroom.id, section.id, false)
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Domain(CoreError::StateConflict(_)));

    ClassSectionRepo::delete(&pool, classroom.id, section.id, true).await.unwrap();
    assert!(EnrollmentRepo::find_by_id(&pool, enrollment.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_section_delete_checks_classroom_ownership(pool: PgPool) {
    let classroom = ClassroomRepo::create(
        &pool,
        &CreateClassroom { name: "Grade 4".to_string(), is_active: None },
    )
    .await
    .unwrap();
    let other = ClassroomRepo::create(
        &pool,
        &CreateClassroom { name: "Grade 6".to_string(), is_active: None },
    )
    .await
    .unwrap();
    let section = ClassSectionRepo::create(
        &pool,
        classroom.id,
        &CreateClassSection {
            name: "A".to_string(),
            default_fee: 90.0,
            subjects: None,
            is_active: None,
        },
    )
    .await
    .unwrap();

    let err = ClassSectionRepo::delete(&pool, other.id, section.id, false)
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Domain(CoreError::Forbidden(_)));
}

// ---------------------------------------------------------------------------
// Test: vehicles and drivers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_driver_cannot_be_assigned_to_two_vehicles(pool: PgPool) {
    let employee = EmployeeRepo::create(&pool, &new_employee("Farid")).await.unwrap();
    let driver = DriverRepo::create(
        &pool,
        employee.id,
        &CreateDriver { license_number: "DL-7741".to_string() },
    )
    .await
    .unwrap();

    VehicleRepo::create(
        &pool,
        &CreateVehicle { vehicle_number: "BA 12 KA 1001".to_string(), driver_id: Some(driver.id) },
    )
    .await
    .unwrap();

    let err = VehicleRepo::create(
        &pool,
        &CreateVehicle { vehicle_number: "BA 12 KA 1002".to_string(), driver_id: Some(driver.id) },
    )
    .await
    .unwrap_err();
    assert_matches!(err, RepoError::Domain(CoreError::StateConflict(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delink_frees_the_driver_for_reassignment(pool: PgPool) {
    let employee = EmployeeRepo::create(&pool, &new_employee("Gopal")).await.unwrap();
    let driver = DriverRepo::create(
        &pool,
        employee.id,
        &CreateDriver { license_number: "DL-9921".to_string() },
    )
    .await
    .unwrap();
    let vehicle = VehicleRepo::create(
        &pool,
        &CreateVehicle { vehicle_number: "BA 07 PA 2001".to_string(), driver_id: Some(driver.id) },
    )
    .await
    .unwrap();

    let delinked = VehicleRepo::delink_driver(&pool, vehicle.id).await.unwrap();
    assert!(delinked.driver_id.is_none());

    // The fleet listing shows the vehicle as driverless.
    let fleet = VehicleRepo::list_with_drivers(&pool).await.unwrap();
    assert_eq!(fleet.len(), 1);
    assert!(fleet[0].driver_name.is_none());

    VehicleRepo::create(
        &pool,
        &CreateVehicle { vehicle_number: "BA 07 PA 2002".to_string(), driver_id: Some(driver.id) },
    )
    .await
    .unwrap();
}

// ---------------------------------------------------------------------------
// Test: attendance stamping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attendance_upsert_overwrites_the_day(pool: PgPool) {
    let employee = EmployeeRepo::create(&pool, &new_employee("Hira")).await.unwrap();
    let day = d(2024, 5, 6);

    AttendanceRepo::upsert(
        &pool,
        employee.id,
        &UpsertAttendance { day, status: "present".to_string(), note: None },
    )
    .await
    .unwrap();

    let entry = AttendanceRepo::upsert(
        &pool,
        employee.id,
        &UpsertAttendance {
            day,
            status: "half_day".to_string(),
            note: Some("left early".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(entry.status, "half_day");

    let month = AttendanceRepo::month_for_employee(&pool, employee.id, d(2024, 5, 1))
        .await
        .unwrap();
    assert_eq!(month.len(), 1);
    assert_eq!(month[0].note.as_deref(), Some("left early"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attendance_rejects_unknown_status(pool: PgPool) {
    let employee = EmployeeRepo::create(&pool, &new_employee("Indra")).await.unwrap();

    let err = AttendanceRepo::upsert(
        &pool,
        employee.id,
        &UpsertAttendance { day: d(2024, 5, 6), status: "vacationing".to_string(), note: None },
    )
    .await
    .unwrap_err();
    assert_matches!(err, RepoError::Domain(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_holiday_stamps_every_active_employee(pool: PgPool) {
    EmployeeRepo::create(&pool, &new_employee("Jeevan")).await.unwrap();
    EmployeeRepo::create(&pool, &new_employee("Kamal")).await.unwrap();
    let inactive = EmployeeRepo::create(&pool, &new_employee("Laxmi")).await.unwrap();
    sqlx::query("UPDATE employees SET is_active = FALSE WHERE id = $1")
        .bind(inactive.id)
        .execute(&pool)
        .await
        .unwrap();

    let day = d(2024, 5, 10);
    let stamped = AttendanceRepo::mark_holiday(&pool, day).await.unwrap();
    assert_eq!(stamped, 2);

    let sheet = AttendanceRepo::for_day(&pool, day).await.unwrap();
    assert_eq!(sheet.len(), 2);
    assert!(sheet.iter().all(|entry| entry.status == "holiday"));
}

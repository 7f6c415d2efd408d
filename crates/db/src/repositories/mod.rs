//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-step operations open a
//! transaction, re-check domain guards via `campus-core`, and roll back on
//! any error.

pub mod attendance_repo;
pub mod class_section_repo;
pub mod classroom_repo;
pub mod dashboard_repo;
pub mod driver_repo;
pub mod employee_repo;
pub mod enrollment_repo;
pub mod exam_entry_repo;
pub mod fee_ledger_repo;
pub mod fee_payment_repo;
pub mod student_repo;
pub mod vehicle_repo;

pub use attendance_repo::AttendanceRepo;
pub use class_section_repo::ClassSectionRepo;
pub use classroom_repo::ClassroomRepo;
pub use dashboard_repo::DashboardRepo;
pub use driver_repo::DriverRepo;
pub use employee_repo::EmployeeRepo;
pub use enrollment_repo::EnrollmentRepo;
pub use exam_entry_repo::ExamEntryRepo;
pub use fee_ledger_repo::FeeLedgerRepo;
pub use fee_payment_repo::FeePaymentRepo;
pub use student_repo::StudentRepo;
pub use vehicle_repo::VehicleRepo;

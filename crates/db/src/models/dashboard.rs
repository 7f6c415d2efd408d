//! Dashboard aggregation payload.

use serde::Serialize;

/// Counts and money totals shown on the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub active_employees: i64,
    pub registered_students: i64,
    pub active_students: i64,
    pub enrollments_last_thirty_days: i64,
    pub active_enrollments: i64,
    pub vehicles: i64,
    /// Outstanding balance across all fee rows due through the end of the
    /// reference month.
    pub total_due_payment: f64,
    /// Receipts collected during the reference month.
    pub fees_collected_this_month: f64,
}

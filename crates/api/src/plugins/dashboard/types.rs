use serde::{Deserialize, Serialize};

use schoolhouse_core::types::{GradeRecord, OrganizationOverview};

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    #[serde(rename = "organizationId")]
    pub organization_id: Option<String>,
}

/// Organization-scoped dashboard card set.
#[derive(Debug, Serialize)]
pub struct OrganizationStats {
    #[serde(rename = "totalStudents")]
    pub total_students: usize,
    #[serde(rename = "totalTeachers")]
    pub total_teachers: usize,
    #[serde(rename = "totalClasses")]
    pub total_classes: usize,
    #[serde(rename = "totalAssignments")]
    pub total_assignments: usize,
    #[serde(rename = "recentGrades")]
    pub recent_grades: Vec<GradeRecord>,
}

/// Cross-tenant billing roll-up for the platform owner.
#[derive(Debug, Serialize)]
pub struct PlatformStats {
    pub organizations: Vec<OrganizationOverview>,
    #[serde(rename = "totalRevenue")]
    pub total_revenue: u64,
    #[serde(rename = "totalStudents")]
    pub total_students: usize,
    #[serde(rename = "totalTeachers")]
    pub total_teachers: usize,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slug::slugify;

/// Subscription tier of an organization. Drives per-student billing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionTier {
    #[default]
    Basic,
    Premium,
    Enterprise,
}

impl SubscriptionTier {
    /// Monthly billing rate per enrolled student, in currency units.
    pub fn monthly_rate_per_student(&self) -> u64 {
        match self {
            Self::Basic => 5,
            Self::Premium => 8,
            Self::Enterprise => 12,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "BASIC" => Some(Self::Basic),
            "PREMIUM" => Some(Self::Premium),
            "ENTERPRISE" => Some(Self::Enterprise),
            _ => None,
        }
    }
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "BASIC"),
            Self::Premium => write!(f, "PREMIUM"),
            Self::Enterprise => write!(f, "ENTERPRISE"),
        }
    }
}

/// Organization lifecycle status.
///
/// An organization is created `Pending` by an invitation request and flips to
/// `Active` exactly once, when the bound invitation is redeemed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganizationStatus {
    #[default]
    Pending,
    Active,
    Suspended,
}

impl OrganizationStatus {
    pub fn is_pending(&self) -> bool {
        *self == Self::Pending
    }
}

impl std::fmt::Display for OrganizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Suspended => write!(f, "SUSPENDED"),
        }
    }
}

/// User role within the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    PlatformOwner,
    OrgAdmin,
    SchoolPrincipal,
    Teacher,
    Student,
    Parent,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlatformOwner => write!(f, "PLATFORM_OWNER"),
            Self::OrgAdmin => write!(f, "ORG_ADMIN"),
            Self::SchoolPrincipal => write!(f, "SCHOOL_PRINCIPAL"),
            Self::Teacher => write!(f, "TEACHER"),
            Self::Student => write!(f, "STUDENT"),
            Self::Parent => write!(f, "PARENT"),
        }
    }
}

/// Organization preference bag. Additive, never schema-migrated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgSettings {
    pub timezone: String,
    pub currency: String,
    #[serde(rename = "dateFormat")]
    pub date_format: String,
    pub language: String,
    /// Marks the platform operator's own organization. Excluded from
    /// platform billing roll-ups.
    #[serde(rename = "isPlatformOrg", default)]
    pub is_platform_org: bool,
}

impl Default for OrgSettings {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            currency: "USD".to_string(),
            date_format: "YYYY-MM-DD".to_string(),
            language: "en".to_string(),
            is_platform_org: false,
        }
    }
}

impl OrgSettings {
    pub fn platform() -> Self {
        Self {
            is_platform_org: true,
            ..Default::default()
        }
    }
}

/// Organization (tenant) entity.
///
/// `name` and the derived `slug` are unique across all organizations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub subscription: SubscriptionTier,
    pub status: OrganizationStatus,
    pub settings: OrgSettings,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Organization creation data.
#[derive(Debug, Clone)]
pub struct CreateOrganization {
    pub id: Option<String>,
    pub name: String,
    pub slug: String,
    pub subscription: SubscriptionTier,
    pub status: OrganizationStatus,
    pub settings: OrgSettings,
}

impl CreateOrganization {
    /// A pending organization awaiting invitation redemption.
    pub fn pending(name: impl Into<String>, subscription: SubscriptionTier) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            id: Some(Uuid::new_v4().to_string()),
            name,
            slug,
            subscription,
            status: OrganizationStatus::Pending,
            settings: OrgSettings::default(),
        }
    }

    /// An already-active organization (seed or admin provisioning).
    pub fn active(name: impl Into<String>, subscription: SubscriptionTier) -> Self {
        Self {
            status: OrganizationStatus::Active,
            ..Self::pending(name, subscription)
        }
    }

    pub fn with_settings(mut self, settings: OrgSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl Organization {
    pub fn from_create(id: String, create: &CreateOrganization, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: create.name.clone(),
            slug: create.slug.clone(),
            subscription: create.subscription,
            status: create.status,
            settings: create.settings.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Durable audit record of an issued invitation.
///
/// The token itself is a bearer credential; this row exists so the issuance
/// and redemption of an invitation can be traced after the fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationRecord {
    pub id: String,
    #[serde(rename = "organizationId")]
    pub organization_id: String,
    pub email: String,
    pub token: String,
    #[serde(rename = "invitedAt")]
    pub invited_at: DateTime<Utc>,
    #[serde(rename = "completedAt")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Invitation creation data.
#[derive(Debug, Clone)]
pub struct CreateInvitation {
    pub organization_id: String,
    pub email: String,
    pub token: String,
}

impl CreateInvitation {
    pub fn new(
        organization_id: impl Into<String>,
        email: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            organization_id: organization_id.into(),
            email: email.into(),
            token: token.into(),
        }
    }
}

/// Platform user, always owned by exactly one organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: UserRole,
    #[serde(rename = "organizationId")]
    pub organization_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// User creation data.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub organization_id: String,
}

impl CreateUser {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: UserRole,
        organization_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(Uuid::new_v4().to_string()),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            organization_id: organization_id.into(),
        }
    }
}

impl User {
    pub fn from_create(id: String, create: &CreateUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: create.name.clone(),
            email: create.email.clone(),
            password_hash: create.password_hash.clone(),
            role: create.role,
            organization_id: create.organization_id.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Minimal user projection for related-entity responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl UserSummary {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

// ─── Hierarchy entities ─────────────────────────────────────────────────
//
// Each carries its owning `organization_id` and, where applicable, the parent
// school/campus/class foreign keys. Read scoping cascades through that chain.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct School {
    pub id: String,
    #[serde(rename = "organizationId")]
    pub organization_id: String,
    pub name: String,
    pub slug: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl School {
    pub fn new(organization_id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.into(),
            slug: slugify(&name),
            name,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campus {
    pub id: String,
    #[serde(rename = "organizationId")]
    pub organization_id: String,
    #[serde(rename = "schoolId")]
    pub school_id: String,
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Campus {
    pub fn new(
        organization_id: impl Into<String>,
        school_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.into(),
            school_id: school_id.into(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    #[serde(rename = "organizationId")]
    pub organization_id: String,
    #[serde(rename = "schoolId")]
    pub school_id: String,
    #[serde(rename = "campusId")]
    pub campus_id: Option<String>,
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Student {
    pub fn new(
        organization_id: impl Into<String>,
        school_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.into(),
            school_id: school_id.into(),
            campus_id: None,
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    pub fn at_campus(mut self, campus_id: impl Into<String>) -> Self {
        self.campus_id = Some(campus_id.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    #[serde(rename = "organizationId")]
    pub organization_id: String,
    #[serde(rename = "schoolId")]
    pub school_id: String,
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Subject {
    pub fn new(
        organization_id: impl Into<String>,
        school_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.into(),
            school_id: school_id.into(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub id: String,
    #[serde(rename = "organizationId")]
    pub organization_id: String,
    #[serde(rename = "schoolId")]
    pub school_id: String,
    #[serde(rename = "campusId")]
    pub campus_id: Option<String>,
    #[serde(rename = "subjectId")]
    pub subject_id: String,
    #[serde(rename = "teacherId")]
    pub teacher_id: String,
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Class {
    pub fn new(
        organization_id: impl Into<String>,
        school_id: impl Into<String>,
        subject_id: impl Into<String>,
        teacher_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.into(),
            school_id: school_id.into(),
            campus_id: None,
            subject_id: subject_id.into(),
            teacher_id: teacher_id.into(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    pub fn at_campus(mut self, campus_id: impl Into<String>) -> Self {
        self.campus_id = Some(campus_id.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: String,
    #[serde(rename = "organizationId")]
    pub organization_id: String,
    #[serde(rename = "classId")]
    pub class_id: String,
    #[serde(rename = "studentId")]
    pub student_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn new(
        organization_id: impl Into<String>,
        class_id: impl Into<String>,
        student_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.into(),
            class_id: class_id.into(),
            student_id: student_id.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    #[serde(rename = "organizationId")]
    pub organization_id: String,
    #[serde(rename = "schoolId")]
    pub school_id: String,
    #[serde(rename = "classId")]
    pub class_id: String,
    #[serde(rename = "teacherId")]
    pub teacher_id: String,
    pub title: String,
    #[serde(rename = "dueAt")]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    pub fn new(
        organization_id: impl Into<String>,
        school_id: impl Into<String>,
        class_id: impl Into<String>,
        teacher_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.into(),
            school_id: school_id.into(),
            class_id: class_id.into(),
            teacher_id: teacher_id.into(),
            title: title.into(),
            due_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn due(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    pub id: String,
    #[serde(rename = "organizationId")]
    pub organization_id: String,
    #[serde(rename = "studentId")]
    pub student_id: String,
    #[serde(rename = "classId")]
    pub class_id: String,
    #[serde(rename = "assignmentId")]
    pub assignment_id: String,
    #[serde(rename = "teacherId")]
    pub teacher_id: Option<String>,
    pub score: f64,
    #[serde(rename = "gradedAt")]
    pub graded_at: DateTime<Utc>,
}

impl Grade {
    pub fn new(
        organization_id: impl Into<String>,
        student_id: impl Into<String>,
        class_id: impl Into<String>,
        assignment_id: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.into(),
            student_id: student_id.into(),
            class_id: class_id.into(),
            assignment_id: assignment_id.into(),
            teacher_id: None,
            score,
            graded_at: Utc::now(),
        }
    }

    pub fn by_teacher(mut self, teacher_id: impl Into<String>) -> Self {
        self.teacher_id = Some(teacher_id.into());
        self
    }

    pub fn graded_at(mut self, at: DateTime<Utc>) -> Self {
        self.graded_at = at;
        self
    }
}

// ─── Composite read records ─────────────────────────────────────────────
//
// Entities plus the immediate related entities the dashboards consume.

/// A student's enrollment in a class, with the class context resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentEnrollment {
    pub class: Class,
    pub subject: Option<Subject>,
    pub teacher: Option<UserSummary>,
}

/// A grade from the student's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentGrade {
    pub grade: Grade,
    pub assignment: Option<Assignment>,
    pub class: Option<Class>,
}

/// Student with resolved relations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student: Student,
    pub school: Option<School>,
    pub campus: Option<Campus>,
    pub enrollments: Vec<StudentEnrollment>,
    pub grades: Vec<StudentGrade>,
}

/// Class with resolved relations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRecord {
    pub class: Class,
    pub subject: Option<Subject>,
    pub teacher: Option<UserSummary>,
    pub students: Vec<Student>,
    pub assignments: Vec<Assignment>,
}

/// Grade with resolved relations, as served in recent-grade samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeRecord {
    pub grade: Grade,
    pub student: Option<Student>,
    pub assignment: Option<Assignment>,
    pub class: Option<Class>,
    pub subject: Option<Subject>,
}

/// Organization with its school/student counts, as listed by the directory
/// and the platform dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationOverview {
    pub organization: Organization,
    #[serde(rename = "schoolCount")]
    pub school_count: usize,
    #[serde(rename = "studentCount")]
    pub student_count: usize,
}

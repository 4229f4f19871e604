//! Tenant data store abstraction.
//!
//! All durable state lives behind [`TenantStore`]. The handle is opened at
//! process start and injected into every component explicitly.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::types::{
    Assignment, Campus, Class, ClassRecord, CreateInvitation, CreateOrganization, CreateUser,
    Enrollment, Grade, GradeRecord, InvitationRecord, Organization, OrganizationOverview, School,
    Student, StudentRecord, Subject, User, UserRole,
};

/// Hierarchical read filter.
///
/// Omitted identifiers impose no constraint; present identifiers are
/// conjunctive. Each read applies the subset of fields that exists on the
/// entity it targets, so a filter scoped to an organization can be narrowed
/// by school, campus, class, teacher, or student without ever widening.
#[derive(Debug, Clone, Default)]
pub struct TenantFilter {
    pub organization_id: Option<String>,
    pub school_id: Option<String>,
    pub campus_id: Option<String>,
    pub class_id: Option<String>,
    pub teacher_id: Option<String>,
    pub student_id: Option<String>,
}

impl TenantFilter {
    pub fn in_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn in_school(mut self, school_id: impl Into<String>) -> Self {
        self.school_id = Some(school_id.into());
        self
    }

    pub fn in_campus(mut self, campus_id: impl Into<String>) -> Self {
        self.campus_id = Some(campus_id.into());
        self
    }

    pub fn in_class(mut self, class_id: impl Into<String>) -> Self {
        self.class_id = Some(class_id.into());
        self
    }

    pub fn taught_by(mut self, teacher_id: impl Into<String>) -> Self {
        self.teacher_id = Some(teacher_id.into());
        self
    }

    pub fn for_student(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    fn constrains(field: &Option<String>, value: &str) -> bool {
        field.as_deref().map(|f| f == value).unwrap_or(true)
    }

    fn constrains_opt(field: &Option<String>, value: Option<&str>) -> bool {
        match field.as_deref() {
            Some(f) => value == Some(f),
            None => true,
        }
    }

    /// Student match: organization, school, campus, and student id apply.
    pub fn matches_student(&self, student: &Student) -> bool {
        Self::constrains(&self.organization_id, &student.organization_id)
            && Self::constrains(&self.school_id, &student.school_id)
            && Self::constrains_opt(&self.campus_id, student.campus_id.as_deref())
            && Self::constrains(&self.student_id, &student.id)
    }

    /// Class match: organization, school, campus, teacher, and class id apply.
    pub fn matches_class(&self, class: &Class) -> bool {
        Self::constrains(&self.organization_id, &class.organization_id)
            && Self::constrains(&self.school_id, &class.school_id)
            && Self::constrains_opt(&self.campus_id, class.campus_id.as_deref())
            && Self::constrains(&self.teacher_id, &class.teacher_id)
            && Self::constrains(&self.class_id, &class.id)
    }

    /// Assignment match: organization, school, class, and teacher apply.
    pub fn matches_assignment(&self, assignment: &Assignment) -> bool {
        Self::constrains(&self.organization_id, &assignment.organization_id)
            && Self::constrains(&self.school_id, &assignment.school_id)
            && Self::constrains(&self.class_id, &assignment.class_id)
            && Self::constrains(&self.teacher_id, &assignment.teacher_id)
    }

    /// Grade match: organization, student, and class apply.
    pub fn matches_grade(&self, grade: &Grade) -> bool {
        Self::constrains(&self.organization_id, &grade.organization_id)
            && Self::constrains(&self.student_id, &grade.student_id)
            && Self::constrains(&self.class_id, &grade.class_id)
    }
}

/// Persistence operations for the tenant data model.
#[async_trait]
pub trait TenantStore: Send + Sync + 'static {
    // ── Organization operations ──

    async fn create_organization(&self, org: CreateOrganization) -> AppResult<Organization>;
    async fn get_organization_by_id(&self, id: &str) -> AppResult<Option<Organization>>;
    async fn get_organization_by_slug(&self, slug: &str) -> AppResult<Option<Organization>>;

    /// Duplicate detection for invitations: matches either the exact name
    /// (case-insensitive) or the derived slug. This is the one disjunctive
    /// lookup in the data layer.
    async fn find_organization_by_name_or_slug(
        &self,
        name: &str,
        slug: &str,
    ) -> AppResult<Option<Organization>>;

    /// The organization a signup completion targets: exact name match with
    /// status still PENDING.
    async fn get_pending_organization_by_name(
        &self,
        name: &str,
    ) -> AppResult<Option<Organization>>;

    /// Atomically convert a pending organization into an active one while
    /// creating its administrator.
    ///
    /// The status check and both writes happen under one store-level
    /// transaction: of two racing calls, exactly one commits; the other
    /// observes a not-found (no longer pending) or conflict (email taken)
    /// error. The matching invitation record is stamped `completed_at`.
    async fn activate_organization(
        &self,
        organization_id: &str,
        admin: CreateUser,
    ) -> AppResult<(User, Organization)>;

    /// All organizations with their school and student counts.
    async fn list_organization_overviews(&self) -> AppResult<Vec<OrganizationOverview>>;

    // ── User operations ──

    async fn create_user(&self, user: CreateUser) -> AppResult<User>;
    async fn get_user_by_id(&self, id: &str) -> AppResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn count_users(
        &self,
        organization_id: Option<&str>,
        role: Option<UserRole>,
    ) -> AppResult<usize>;

    // ── Invitation audit operations ──

    async fn record_invitation(&self, invitation: CreateInvitation)
    -> AppResult<InvitationRecord>;
    async fn list_organization_invitations(
        &self,
        organization_id: &str,
    ) -> AppResult<Vec<InvitationRecord>>;

    // ── Hierarchy inserts (seed / admin provisioning) ──

    async fn insert_school(&self, school: School) -> AppResult<School>;
    async fn insert_campus(&self, campus: Campus) -> AppResult<Campus>;
    async fn insert_student(&self, student: Student) -> AppResult<Student>;
    async fn insert_subject(&self, subject: Subject) -> AppResult<Subject>;
    async fn insert_class(&self, class: Class) -> AppResult<Class>;
    async fn insert_enrollment(&self, enrollment: Enrollment) -> AppResult<Enrollment>;
    async fn insert_assignment(&self, assignment: Assignment) -> AppResult<Assignment>;
    async fn insert_grade(&self, grade: Grade) -> AppResult<Grade>;

    // ── Scoped reads ──

    async fn list_students(&self, filter: &TenantFilter) -> AppResult<Vec<StudentRecord>>;
    async fn list_classes(&self, filter: &TenantFilter) -> AppResult<Vec<ClassRecord>>;

    /// Grades matching the filter, newest first, at most `limit`.
    async fn recent_grades(
        &self,
        filter: &TenantFilter,
        limit: usize,
    ) -> AppResult<Vec<GradeRecord>>;

    async fn count_students(&self, filter: &TenantFilter) -> AppResult<usize>;
    async fn count_classes(&self, filter: &TenantFilter) -> AppResult<usize>;
    async fn count_assignments(&self, filter: &TenantFilter) -> AppResult<usize>;
}

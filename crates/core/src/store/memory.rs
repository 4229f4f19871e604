use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::types::{
    Assignment, Campus, Class, ClassRecord, CreateInvitation, CreateOrganization, CreateUser,
    Enrollment, Grade, GradeRecord, InvitationRecord, Organization, OrganizationOverview,
    OrganizationStatus, School, Student, StudentEnrollment, StudentGrade, StudentRecord, Subject,
    User, UserRole, UserSummary,
};

use super::{TenantFilter, TenantStore};

#[derive(Default)]
struct StoreInner {
    organizations: HashMap<String, Organization>,
    users: HashMap<String, User>,
    /// Lowercased email → user id.
    email_index: HashMap<String, String>,
    invitations: HashMap<String, InvitationRecord>,
    schools: HashMap<String, School>,
    campuses: HashMap<String, Campus>,
    students: HashMap<String, Student>,
    subjects: HashMap<String, Subject>,
    classes: HashMap<String, Class>,
    enrollments: HashMap<String, Enrollment>,
    assignments: HashMap<String, Assignment>,
    grades: HashMap<String, Grade>,
}

/// In-memory tenant store for testing and development.
///
/// All state sits behind one mutex, which is what makes
/// [`activate_organization`](TenantStore::activate_organization) a genuine
/// compare-and-swap: the pending check and both writes happen in a single
/// critical section. A SQL-backed store would use a transaction with a
/// unique constraint instead.
pub struct MemoryStore {
    inner: Mutex<StoreInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
        }
    }
}

impl StoreInner {
    fn teacher_summary(&self, teacher_id: &str) -> Option<UserSummary> {
        self.users.get(teacher_id).map(UserSummary::from_user)
    }

    fn student_record(&self, student: &Student) -> StudentRecord {
        let enrollments = self
            .enrollments
            .values()
            .filter(|e| e.student_id == student.id)
            .filter_map(|e| self.classes.get(&e.class_id))
            .map(|class| StudentEnrollment {
                class: class.clone(),
                subject: self.subjects.get(&class.subject_id).cloned(),
                teacher: self.teacher_summary(&class.teacher_id),
            })
            .collect();

        let mut grades: Vec<StudentGrade> = self
            .grades
            .values()
            .filter(|g| g.student_id == student.id)
            .map(|grade| StudentGrade {
                grade: grade.clone(),
                assignment: self.assignments.get(&grade.assignment_id).cloned(),
                class: self.classes.get(&grade.class_id).cloned(),
            })
            .collect();
        grades.sort_by(|a, b| b.grade.graded_at.cmp(&a.grade.graded_at));

        StudentRecord {
            student: student.clone(),
            school: self.schools.get(&student.school_id).cloned(),
            campus: student
                .campus_id
                .as_ref()
                .and_then(|id| self.campuses.get(id).cloned()),
            enrollments,
            grades,
        }
    }

    fn class_record(&self, class: &Class) -> ClassRecord {
        let students = self
            .enrollments
            .values()
            .filter(|e| e.class_id == class.id)
            .filter_map(|e| self.students.get(&e.student_id).cloned())
            .collect();

        let assignments = self
            .assignments
            .values()
            .filter(|a| a.class_id == class.id)
            .cloned()
            .collect();

        ClassRecord {
            class: class.clone(),
            subject: self.subjects.get(&class.subject_id).cloned(),
            teacher: self.teacher_summary(&class.teacher_id),
            students,
            assignments,
        }
    }

    fn grade_record(&self, grade: &Grade) -> GradeRecord {
        let class = self.classes.get(&grade.class_id).cloned();
        let subject = class
            .as_ref()
            .and_then(|c| self.subjects.get(&c.subject_id).cloned());

        GradeRecord {
            grade: grade.clone(),
            student: self.students.get(&grade.student_id).cloned(),
            assignment: self.assignments.get(&grade.assignment_id).cloned(),
            class,
            subject,
        }
    }
}

#[async_trait]
impl TenantStore for MemoryStore {
    // ── Organization operations ──

    async fn create_organization(&self, create: CreateOrganization) -> AppResult<Organization> {
        let mut inner = self.inner.lock().unwrap();

        let name_lower = create.name.to_lowercase();
        let duplicate = inner
            .organizations
            .values()
            .any(|o| o.name.to_lowercase() == name_lower || o.slug == create.slug);
        if duplicate {
            return Err(AppError::conflict(
                "An organization with this name already exists",
            ));
        }

        let id = create
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let organization = Organization::from_create(id.clone(), &create, Utc::now());
        inner.organizations.insert(id, organization.clone());

        Ok(organization)
    }

    async fn get_organization_by_id(&self, id: &str) -> AppResult<Option<Organization>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.organizations.get(id).cloned())
    }

    async fn get_organization_by_slug(&self, slug: &str) -> AppResult<Option<Organization>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.organizations.values().find(|o| o.slug == slug).cloned())
    }

    async fn find_organization_by_name_or_slug(
        &self,
        name: &str,
        slug: &str,
    ) -> AppResult<Option<Organization>> {
        let inner = self.inner.lock().unwrap();
        let name_lower = name.to_lowercase();
        Ok(inner
            .organizations
            .values()
            .find(|o| o.name.to_lowercase() == name_lower || o.slug == slug)
            .cloned())
    }

    async fn get_pending_organization_by_name(
        &self,
        name: &str,
    ) -> AppResult<Option<Organization>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .organizations
            .values()
            .find(|o| o.name == name && o.status.is_pending())
            .cloned())
    }

    async fn activate_organization(
        &self,
        organization_id: &str,
        admin: CreateUser,
    ) -> AppResult<(User, Organization)> {
        let mut inner = self.inner.lock().unwrap();

        // Compare-and-swap on the status: everything below happens in one
        // critical section, so a racing activation observes ACTIVE and fails.
        let status = inner
            .organizations
            .get(organization_id)
            .map(|o| o.status)
            .ok_or_else(|| {
                AppError::not_found("Organization not found or invitation already completed")
            })?;
        if status != OrganizationStatus::Pending {
            return Err(AppError::not_found(
                "Organization not found or invitation already completed",
            ));
        }

        let email_key = admin.email.to_lowercase();
        if inner.email_index.contains_key(&email_key) {
            return Err(AppError::conflict("User already exists with this email"));
        }

        let now = Utc::now();
        let user_id = admin
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let user = User::from_create(user_id.clone(), &admin, now);
        inner.users.insert(user_id.clone(), user.clone());
        inner.email_index.insert(email_key, user_id);

        let organization = {
            let org = inner.organizations.get_mut(organization_id).ok_or_else(|| {
                AppError::not_found("Organization not found or invitation already completed")
            })?;
            org.status = OrganizationStatus::Active;
            org.updated_at = now;
            org.clone()
        };

        for invitation in inner.invitations.values_mut() {
            if invitation.organization_id == organization_id && invitation.completed_at.is_none() {
                invitation.completed_at = Some(now);
            }
        }

        Ok((user, organization))
    }

    async fn list_organization_overviews(&self) -> AppResult<Vec<OrganizationOverview>> {
        let inner = self.inner.lock().unwrap();

        let mut overviews: Vec<OrganizationOverview> = inner
            .organizations
            .values()
            .map(|org| OrganizationOverview {
                school_count: inner
                    .schools
                    .values()
                    .filter(|s| s.organization_id == org.id)
                    .count(),
                student_count: inner
                    .students
                    .values()
                    .filter(|s| s.organization_id == org.id)
                    .count(),
                organization: org.clone(),
            })
            .collect();
        overviews.sort_by(|a, b| {
            a.organization
                .created_at
                .cmp(&b.organization.created_at)
                .then_with(|| a.organization.id.cmp(&b.organization.id))
        });

        Ok(overviews)
    }

    // ── User operations ──

    async fn create_user(&self, create: CreateUser) -> AppResult<User> {
        let mut inner = self.inner.lock().unwrap();

        let email_key = create.email.to_lowercase();
        if inner.email_index.contains_key(&email_key) {
            return Err(AppError::conflict("A user with this email already exists"));
        }

        let id = create
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let user = User::from_create(id.clone(), &create, Utc::now());
        inner.users.insert(id.clone(), user.clone());
        inner.email_index.insert(email_key, id);

        Ok(user)
    }

    async fn get_user_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.get(id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.lock().unwrap();
        let user = inner
            .email_index
            .get(&email.to_lowercase())
            .and_then(|id| inner.users.get(id))
            .cloned();
        Ok(user)
    }

    async fn count_users(
        &self,
        organization_id: Option<&str>,
        role: Option<UserRole>,
    ) -> AppResult<usize> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .values()
            .filter(|u| organization_id.map(|id| u.organization_id == id).unwrap_or(true))
            .filter(|u| role.map(|r| u.role == r).unwrap_or(true))
            .count())
    }

    // ── Invitation audit operations ──

    async fn record_invitation(
        &self,
        create: CreateInvitation,
    ) -> AppResult<InvitationRecord> {
        let mut inner = self.inner.lock().unwrap();

        let record = InvitationRecord {
            id: Uuid::new_v4().to_string(),
            organization_id: create.organization_id,
            email: create.email,
            token: create.token,
            invited_at: Utc::now(),
            completed_at: None,
        };
        inner.invitations.insert(record.id.clone(), record.clone());

        Ok(record)
    }

    async fn list_organization_invitations(
        &self,
        organization_id: &str,
    ) -> AppResult<Vec<InvitationRecord>> {
        let inner = self.inner.lock().unwrap();
        let mut invitations: Vec<InvitationRecord> = inner
            .invitations
            .values()
            .filter(|i| i.organization_id == organization_id)
            .cloned()
            .collect();
        invitations.sort_by(|a, b| b.invited_at.cmp(&a.invited_at));
        Ok(invitations)
    }

    // ── Hierarchy inserts ──

    async fn insert_school(&self, school: School) -> AppResult<School> {
        let mut inner = self.inner.lock().unwrap();
        inner.schools.insert(school.id.clone(), school.clone());
        Ok(school)
    }

    async fn insert_campus(&self, campus: Campus) -> AppResult<Campus> {
        let mut inner = self.inner.lock().unwrap();
        inner.campuses.insert(campus.id.clone(), campus.clone());
        Ok(campus)
    }

    async fn insert_student(&self, student: Student) -> AppResult<Student> {
        let mut inner = self.inner.lock().unwrap();
        inner.students.insert(student.id.clone(), student.clone());
        Ok(student)
    }

    async fn insert_subject(&self, subject: Subject) -> AppResult<Subject> {
        let mut inner = self.inner.lock().unwrap();
        inner.subjects.insert(subject.id.clone(), subject.clone());
        Ok(subject)
    }

    async fn insert_class(&self, class: Class) -> AppResult<Class> {
        let mut inner = self.inner.lock().unwrap();
        inner.classes.insert(class.id.clone(), class.clone());
        Ok(class)
    }

    async fn insert_enrollment(&self, enrollment: Enrollment) -> AppResult<Enrollment> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .enrollments
            .insert(enrollment.id.clone(), enrollment.clone());
        Ok(enrollment)
    }

    async fn insert_assignment(&self, assignment: Assignment) -> AppResult<Assignment> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .assignments
            .insert(assignment.id.clone(), assignment.clone());
        Ok(assignment)
    }

    async fn insert_grade(&self, grade: Grade) -> AppResult<Grade> {
        let mut inner = self.inner.lock().unwrap();
        inner.grades.insert(grade.id.clone(), grade.clone());
        Ok(grade)
    }

    // ── Scoped reads ──

    async fn list_students(&self, filter: &TenantFilter) -> AppResult<Vec<StudentRecord>> {
        let inner = self.inner.lock().unwrap();

        let mut students: Vec<&Student> = inner
            .students
            .values()
            .filter(|s| filter.matches_student(s))
            .collect();
        students.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        Ok(students
            .into_iter()
            .map(|s| inner.student_record(s))
            .collect())
    }

    async fn list_classes(&self, filter: &TenantFilter) -> AppResult<Vec<ClassRecord>> {
        let inner = self.inner.lock().unwrap();

        let mut classes: Vec<&Class> = inner
            .classes
            .values()
            .filter(|c| filter.matches_class(c))
            .collect();
        classes.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        Ok(classes.into_iter().map(|c| inner.class_record(c)).collect())
    }

    async fn recent_grades(
        &self,
        filter: &TenantFilter,
        limit: usize,
    ) -> AppResult<Vec<GradeRecord>> {
        let inner = self.inner.lock().unwrap();

        let mut grades: Vec<&Grade> = inner
            .grades
            .values()
            .filter(|g| filter.matches_grade(g))
            .collect();
        grades.sort_by(|a, b| b.graded_at.cmp(&a.graded_at).then_with(|| a.id.cmp(&b.id)));
        grades.truncate(limit);

        Ok(grades.into_iter().map(|g| inner.grade_record(g)).collect())
    }

    async fn count_students(&self, filter: &TenantFilter) -> AppResult<usize> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .students
            .values()
            .filter(|s| filter.matches_student(s))
            .count())
    }

    async fn count_classes(&self, filter: &TenantFilter) -> AppResult<usize> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .classes
            .values()
            .filter(|c| filter.matches_class(c))
            .count())
    }

    async fn count_assignments(&self, filter: &TenantFilter) -> AppResult<usize> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .assignments
            .values()
            .filter(|a| filter.matches_assignment(a))
            .count())
    }
}

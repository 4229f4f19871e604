use std::sync::Arc;

use schoolhouse_core::authz::Principal;
use schoolhouse_core::config::AppConfig;
use schoolhouse_core::plugin::AppContext;
use schoolhouse_core::store::{MemoryStore, TenantStore};
use schoolhouse_core::types::{
    Class, CreateOrganization, CreateUser, Enrollment, Organization, School, Student, Subject,
    SubscriptionTier, User, UserRole,
};

use super::handlers::{list_classes_core, list_students_core};
use super::types::{ClassQuery, StudentQuery};

const SECRET: &str = "test-secret-key-that-is-at-least-32-characters-long";

fn test_context() -> AppContext<MemoryStore> {
    AppContext::new(
        Arc::new(AppConfig::new(SECRET)),
        Arc::new(MemoryStore::new()),
    )
}

async fn seed_organization(
    ctx: &AppContext<MemoryStore>,
    name: &str,
) -> (Organization, School, User) {
    let organization = ctx
        .store
        .create_organization(CreateOrganization::active(name, SubscriptionTier::Basic))
        .await
        .unwrap();
    let school = ctx
        .store
        .insert_school(School::new(&organization.id, "Main School"))
        .await
        .unwrap();
    let teacher = ctx
        .store
        .create_user(CreateUser::new(
            "Teacher",
            format!("teacher@{}.example", organization.slug),
            "hash",
            UserRole::Teacher,
            &organization.id,
        ))
        .await
        .unwrap();

    let subject = ctx
        .store
        .insert_subject(Subject::new(&organization.id, &school.id, "Math"))
        .await
        .unwrap();
    let class = ctx
        .store
        .insert_class(Class::new(
            &organization.id,
            &school.id,
            &subject.id,
            &teacher.id,
            "Math 101",
        ))
        .await
        .unwrap();

    let student = ctx
        .store
        .insert_student(Student::new(&organization.id, &school.id, "Ada"))
        .await
        .unwrap();
    ctx.store
        .insert_enrollment(Enrollment::new(&organization.id, &class.id, &student.id))
        .await
        .unwrap();

    (organization, school, teacher)
}

fn principal_for(user: &User) -> Principal {
    Principal::from_user(user)
}

fn platform_owner(organization_id: &str) -> Principal {
    Principal {
        user_id: "owner".to_string(),
        role: UserRole::PlatformOwner,
        organization_id: organization_id.to_string(),
    }
}

#[tokio::test]
async fn students_scoped_to_one_organization_never_leak_another() {
    let ctx = test_context();
    let (org_a, _, _) = seed_organization(&ctx, "Org A").await;
    let (org_b, _, _) = seed_organization(&ctx, "Org B").await;

    let owner = platform_owner("platform");
    let query = StudentQuery {
        organization_id: Some(org_a.id.clone()),
        ..Default::default()
    };
    let records = list_students_core(&query, &owner, &ctx).await.unwrap();

    assert!(!records.is_empty());
    assert!(records.iter().all(|r| r.student.organization_id == org_a.id));
    assert!(records.iter().all(|r| r.student.organization_id != org_b.id));
}

#[tokio::test]
async fn non_platform_principals_are_clamped_to_their_organization() {
    let ctx = test_context();
    let (org_a, _, teacher_a) = seed_organization(&ctx, "Org A").await;
    let (org_b, _, _) = seed_organization(&ctx, "Org B").await;

    let principal = principal_for(&teacher_a);

    // Omitted organization id means "my organization".
    let records = list_students_core(&StudentQuery::default(), &principal, &ctx)
        .await
        .unwrap();
    assert!(records.iter().all(|r| r.student.organization_id == org_a.id));

    // An explicit foreign organization id is refused.
    let query = StudentQuery {
        organization_id: Some(org_b.id.clone()),
        ..Default::default()
    };
    let err = list_students_core(&query, &principal, &ctx)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn student_records_resolve_their_relations() {
    let ctx = test_context();
    let (org, school, teacher) = seed_organization(&ctx, "Org A").await;

    let owner = platform_owner("platform");
    let query = StudentQuery {
        organization_id: Some(org.id.clone()),
        school_id: Some(school.id.clone()),
        ..Default::default()
    };
    let records = list_students_core(&query, &owner, &ctx).await.unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.school.as_ref().unwrap().id, school.id);
    assert_eq!(record.enrollments.len(), 1);
    let enrollment = &record.enrollments[0];
    assert_eq!(enrollment.class.name, "Math 101");
    assert_eq!(enrollment.subject.as_ref().unwrap().name, "Math");
    assert_eq!(enrollment.teacher.as_ref().unwrap().id, teacher.id);
}

#[tokio::test]
async fn classes_filter_by_teacher_within_the_tenant() {
    let ctx = test_context();
    let (org, school, teacher) = seed_organization(&ctx, "Org A").await;

    // A second class taught by someone else.
    let other_teacher = ctx
        .store
        .create_user(CreateUser::new(
            "Other",
            "other@org-a.example",
            "hash",
            UserRole::Teacher,
            &org.id,
        ))
        .await
        .unwrap();
    let subject = ctx
        .store
        .insert_subject(Subject::new(&org.id, &school.id, "History"))
        .await
        .unwrap();
    ctx.store
        .insert_class(Class::new(
            &org.id,
            &school.id,
            &subject.id,
            &other_teacher.id,
            "History 101",
        ))
        .await
        .unwrap();

    let owner = platform_owner("platform");
    let query = ClassQuery {
        organization_id: Some(org.id.clone()),
        teacher_id: Some(teacher.id.clone()),
        ..Default::default()
    };
    let records = list_classes_core(&query, &owner, &ctx).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].class.name, "Math 101");
    assert_eq!(records[0].students.len(), 1);
    assert_eq!(records[0].assignments.len(), 0);
}

#[tokio::test]
async fn students_and_parents_cannot_browse_the_directory() {
    let ctx = test_context();
    let (org, _, _) = seed_organization(&ctx, "Org A").await;

    for role in [UserRole::Student, UserRole::Parent] {
        let principal = Principal {
            user_id: "u".to_string(),
            role,
            organization_id: org.id.clone(),
        };
        let err = list_students_core(&StudentQuery::default(), &principal, &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}

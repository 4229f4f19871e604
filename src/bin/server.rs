//! Demo server: in-memory store seeded with a platform owner and one
//! customer organization, served over Axum.
//!
//! ```sh
//! SCHOOLHOUSE_SECRET=... cargo run --bin schoolhouse-server
//! ```

use std::sync::Arc;

use schoolhouse::plugins::{DashboardPlugin, DirectoryPlugin, OnboardingPlugin};
use schoolhouse::types::{
    Class, CreateOrganization, CreateUser, Enrollment, Grade, OrgSettings, School, Student,
    Subject, SubscriptionTier, UserRole,
};
use schoolhouse::password::hash_password;
use schoolhouse::{
    AppBuilder, AppConfig, Argon2Config, AxumIntegration, ConsoleEmailProvider, MemoryStore,
    TenantStore,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let secret = std::env::var("SCHOOLHOUSE_SECRET")
        .unwrap_or_else(|_| "dev-only-secret-change-me-in-production!!".to_string());
    let base_url =
        std::env::var("APP_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let config = AppConfig::new(secret)
        .app_name("Schoolhouse")
        .base_url(base_url);

    let store = MemoryStore::new();
    seed(&store).await?;

    let app = AppBuilder::new(config)
        .email_provider(ConsoleEmailProvider)
        .store(store)
        .plugin(OnboardingPlugin::new())
        .plugin(DirectoryPlugin::new())
        .plugin(DashboardPlugin::new())
        .build()
        .await?;

    let router = Arc::new(app).axum_router();
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;

    Ok(())
}

/// Seed the platform organization, its owner, and one demo tenant.
async fn seed(store: &MemoryStore) -> Result<(), Box<dyn std::error::Error>> {
    let platform = store
        .create_organization(
            CreateOrganization::active("Schoolhouse HQ", SubscriptionTier::Enterprise)
                .with_settings(OrgSettings::platform()),
        )
        .await?;
    let owner = store
        .create_user(CreateUser::new(
            "Platform Owner",
            "owner@schoolhouse.dev",
            hash_password("owner-password", &Argon2Config::default())?,
            UserRole::PlatformOwner,
            &platform.id,
        ))
        .await?;
    tracing::info!("seeded platform owner {} (x-user-id: {})", owner.email, owner.id);

    let org = store
        .create_organization(CreateOrganization::active(
            "Riverdale District",
            SubscriptionTier::Premium,
        ))
        .await?;
    let school = store.insert_school(School::new(&org.id, "Riverdale High")).await?;
    let teacher = store
        .create_user(CreateUser::new(
            "Grace Weather",
            "g.weather@riverdale.edu",
            hash_password("teacher-password", &Argon2Config::default())?,
            UserRole::Teacher,
            &org.id,
        ))
        .await?;

    let subject = store
        .insert_subject(Subject::new(&org.id, &school.id, "Mathematics"))
        .await?;
    let class = store
        .insert_class(Class::new(
            &org.id,
            &school.id,
            &subject.id,
            &teacher.id,
            "Algebra I",
        ))
        .await?;

    let assignment = store
        .insert_assignment(schoolhouse::types::Assignment::new(
            &org.id,
            &school.id,
            &class.id,
            &teacher.id,
            "Unit 1 Quiz",
        ))
        .await?;

    for (name, score) in [("Avery Hill", 91.0), ("Blake Munro", 84.5), ("Casey Roe", 77.0)] {
        let student = store
            .insert_student(Student::new(&org.id, &school.id, name))
            .await?;
        store
            .insert_enrollment(Enrollment::new(&org.id, &class.id, &student.id))
            .await?;
        store
            .insert_grade(
                Grade::new(&org.id, &student.id, &class.id, &assignment.id, score)
                    .by_teacher(&teacher.id),
            )
            .await?;
    }

    Ok(())
}

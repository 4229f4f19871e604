//! # Schoolhouse
//!
//! A multi-tenant school-management platform core: organizations are
//! onboarded through signed email invitations, activated through an atomic
//! signup transaction, and served role-scoped directory and dashboard reads.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use schoolhouse::{AppBuilder, AppConfig, ConsoleEmailProvider, MemoryStore};
//! use schoolhouse::plugins::{DashboardPlugin, DirectoryPlugin, OnboardingPlugin};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::new("your-secret-key-that-is-at-least-32-chars");
//!
//!     let app = AppBuilder::new(config)
//!         .email_provider(ConsoleEmailProvider)
//!         .store(MemoryStore::new())
//!         .plugin(OnboardingPlugin::new())
//!         .plugin(DirectoryPlugin::new())
//!         .plugin(DashboardPlugin::new())
//!         .build()
//!         .await?;
//!
//!     let _ = app;
//!     Ok(())
//! }
//! ```

// Core module — the Schoolhouse struct lives here in the root crate because
// it orchestrates plugins (from schoolhouse-api) + core (from schoolhouse-core)
pub mod core;
pub mod handlers;

// Re-export core abstractions
pub use schoolhouse_core::password;
pub use schoolhouse_core::{
    ApiPlugin, ApiRequest, ApiResponse, ApiRoute, AppConfig, AppContext, AppError, AppResult,
    Argon2Config, Capability, ConsoleEmailProvider, DispatchReceipt, EmailProvider,
    HealthCheckResponse, HttpMethod, InvitationClaims, InvitationConfig, InvitationTokenService,
    Logger, MemoryStore, PRINCIPAL_HEADER, PasswordConfig, Principal, StoreError, TenantFilter,
    TenantStore, TracingLogger, slugify,
};

// Re-export the tenant data model under `types`
pub mod types {
    pub use schoolhouse_core::types::{
        ApiRequest, ApiResponse, Assignment, Campus, Class, ClassRecord, CreateInvitation,
        CreateOrganization, CreateUser, Enrollment, Grade, GradeRecord, HttpMethod,
        InvitationRecord, OrgSettings, Organization, OrganizationOverview, OrganizationStatus,
        School, Student, StudentEnrollment, StudentGrade, StudentRecord, Subject,
        SubscriptionTier, User, UserRole, UserSummary,
    };
}

pub use types::{
    CreateOrganization, CreateUser, Organization, OrganizationStatus, SubscriptionTier, User,
    UserRole,
};

// Re-export plugins
pub mod plugins {
    pub use schoolhouse_api::plugins::*;
}

// Re-export the main application struct
pub use self::core::{AppBuilder, Schoolhouse, TypedAppBuilder};

#[cfg(feature = "axum")]
pub use handlers::axum::AxumIntegration;

//! # Schoolhouse Core
//!
//! Core abstractions for the Schoolhouse multi-tenant school platform.
//! Contains the tenant data model, store trait, invitation token service,
//! configuration, and error handling.

pub mod authz;
pub mod config;
pub mod email;
pub mod error;
pub mod logger;
pub mod password;
pub mod plugin;
pub mod slug;
pub mod store;
pub mod token;
pub mod types;
pub mod types_tenant;

// Re-export commonly used items
pub use authz::{Capability, PRINCIPAL_HEADER, Principal, capabilities, require_principal};
pub use config::{AppConfig, Argon2Config, InvitationConfig, PasswordConfig};
pub use email::{ConsoleEmailProvider, DispatchReceipt, EmailProvider};
pub use error::{AppError, AppResult, StoreError, validate_request_body};
pub use logger::{Logger, TracingLogger};
pub use plugin::{ApiPlugin, ApiRoute, AppContext};
pub use slug::slugify;
pub use store::{MemoryStore, TenantFilter, TenantStore};
pub use token::{INVITATION_TOKEN_TYPE, InvitationClaims, InvitationTokenService};
pub use types::{
    ApiRequest, ApiResponse, Assignment, Campus, Class, ClassRecord, CreateInvitation,
    CreateOrganization, CreateUser, Enrollment, ErrorMessageResponse, Grade, GradeRecord,
    HealthCheckResponse, HttpMethod, InvitationRecord, OrgSettings, Organization,
    OrganizationOverview, OrganizationStatus, School, Student, StudentEnrollment, StudentGrade,
    StudentRecord, Subject, SubscriptionTier, User, UserRole, UserSummary,
};

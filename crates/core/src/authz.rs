//! Capability-based authorization.
//!
//! Capabilities are derived server-side from the caller's stored role; the
//! request never carries role flags of its own. Every read entry point
//! (directory, dashboards) and the invitation endpoint resolve a
//! [`Principal`] first and check capabilities against it.

use crate::error::{AppError, AppResult};
use crate::plugin::AppContext;
use crate::store::TenantStore;
use crate::types::{ApiRequest, User, UserRole};

/// Header carrying the authenticated caller's user id.
///
/// Populated by the fronting session layer; requests arriving without it are
/// treated as unauthenticated.
pub const PRINCIPAL_HEADER: &str = "x-user-id";

/// Things a caller may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Invite a new organization onto the platform.
    InviteOrganizations,
    /// View the cross-tenant billing dashboard.
    ViewPlatformDashboard,
    /// View an organization-scoped dashboard.
    ViewDashboard,
    /// List tenant directory data (organizations, students, classes).
    ViewDirectory,
}

/// Capability set granted to a role.
pub fn capabilities(role: UserRole) -> &'static [Capability] {
    match role {
        UserRole::PlatformOwner => &[
            Capability::InviteOrganizations,
            Capability::ViewPlatformDashboard,
            Capability::ViewDashboard,
            Capability::ViewDirectory,
        ],
        UserRole::OrgAdmin | UserRole::SchoolPrincipal | UserRole::Teacher => {
            &[Capability::ViewDashboard, Capability::ViewDirectory]
        }
        UserRole::Student | UserRole::Parent => &[],
    }
}

/// The authenticated caller, as resolved from the store.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: String,
    pub role: UserRole,
    pub organization_id: String,
}

impl Principal {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            role: user.role,
            organization_id: user.organization_id.clone(),
        }
    }

    pub fn is_platform_owner(&self) -> bool {
        self.role == UserRole::PlatformOwner
    }

    pub fn has(&self, capability: Capability) -> bool {
        capabilities(self.role).contains(&capability)
    }

    pub fn require(&self, capability: Capability) -> AppResult<()> {
        if self.has(capability) {
            Ok(())
        } else {
            Err(AppError::forbidden("Insufficient permissions"))
        }
    }

    /// Check that the principal may read data belonging to `organization_id`.
    ///
    /// Platform owners may read any tenant; everyone else only their own.
    pub fn require_organization(&self, organization_id: &str) -> AppResult<()> {
        if self.is_platform_owner() || self.organization_id == organization_id {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "You don't have access to this organization",
            ))
        }
    }
}

/// Resolve the caller from the request, or fail with 401.
pub async fn require_principal<S: TenantStore>(
    req: &ApiRequest,
    ctx: &AppContext<S>,
) -> AppResult<Principal> {
    let user_id = req
        .header(PRINCIPAL_HEADER)
        .ok_or(AppError::Unauthenticated)?;

    let user = ctx
        .store
        .get_user_by_id(user_id)
        .await?
        .ok_or(AppError::Unauthenticated)?;

    Ok(Principal::from_user(&user))
}

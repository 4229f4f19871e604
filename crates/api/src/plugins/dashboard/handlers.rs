use schoolhouse_core::authz::{Capability, require_principal};
use schoolhouse_core::error::AppResult;
use schoolhouse_core::plugin::AppContext;
use schoolhouse_core::store::{TenantFilter, TenantStore};
use schoolhouse_core::types::{ApiRequest, ApiResponse, UserRole};

use super::types::{OrganizationStats, PlatformStats, StatsQuery};
use crate::plugins::helpers::parse_query;

/// Size of the recent-grade sample on the organization dashboard.
const RECENT_GRADES_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

pub(crate) async fn organization_stats_core<S: TenantStore>(
    organization_id: &str,
    ctx: &AppContext<S>,
) -> AppResult<OrganizationStats> {
    let filter = TenantFilter::default().in_organization(organization_id);

    let total_students = ctx.store.count_students(&filter).await?;
    let total_teachers = ctx
        .store
        .count_users(Some(organization_id), Some(UserRole::Teacher))
        .await?;
    let total_classes = ctx.store.count_classes(&filter).await?;
    let total_assignments = ctx.store.count_assignments(&filter).await?;
    let recent_grades = ctx.store.recent_grades(&filter, RECENT_GRADES_LIMIT).await?;

    Ok(OrganizationStats {
        total_students,
        total_teachers,
        total_classes,
        total_assignments,
        recent_grades,
    })
}

pub(crate) async fn platform_stats_core<S: TenantStore>(
    ctx: &AppContext<S>,
) -> AppResult<PlatformStats> {
    let overviews: Vec<_> = ctx
        .store
        .list_organization_overviews()
        .await?
        .into_iter()
        .filter(|o| !o.organization.settings.is_platform_org)
        .collect();

    let total_revenue = overviews
        .iter()
        .map(|o| {
            o.student_count as u64 * o.organization.subscription.monthly_rate_per_student()
        })
        .sum();
    let total_students = overviews.iter().map(|o| o.student_count).sum();

    Ok(PlatformStats {
        organizations: overviews,
        total_revenue,
        total_students,
        // Teacher totals are not aggregated in the platform view; the field
        // is fixed at 0.
        total_teachers: 0,
    })
}

// ---------------------------------------------------------------------------
// HTTP handlers
// ---------------------------------------------------------------------------

/// Handle `GET /dashboard/stats`.
///
/// A platform owner with no `organizationId` gets the cross-tenant billing
/// view; any other combination resolves to one organization's card set,
/// clamped to the caller's own tenant unless the caller is the platform
/// owner.
pub async fn handle_dashboard_stats<S: TenantStore>(
    req: &ApiRequest,
    ctx: &AppContext<S>,
) -> AppResult<ApiResponse> {
    let principal = require_principal(req, ctx).await?;
    let query: StatsQuery = parse_query(&req.query);

    if principal.is_platform_owner() && query.organization_id.is_none() {
        principal.require(Capability::ViewPlatformDashboard)?;
        let stats = platform_stats_core(ctx).await?;
        return Ok(ApiResponse::json(200, &stats)?);
    }

    principal.require(Capability::ViewDashboard)?;
    let organization_id = query
        .organization_id
        .unwrap_or_else(|| principal.organization_id.clone());
    principal.require_organization(&organization_id)?;

    let stats = organization_stats_core(&organization_id, ctx).await?;
    Ok(ApiResponse::json(200, &stats)?)
}

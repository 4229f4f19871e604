use schoolhouse_core::authz::{Capability, Principal, require_principal};
use schoolhouse_core::error::AppResult;
use schoolhouse_core::plugin::AppContext;
use schoolhouse_core::store::{TenantFilter, TenantStore};
use schoolhouse_core::types::{ApiRequest, ApiResponse, ClassRecord, StudentRecord};

use super::types::{ClassQuery, StudentQuery};
use crate::plugins::helpers::parse_query;

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Compose the organization scope for a read.
///
/// A platform owner may target any organization, or none for a cross-tenant
/// read. Everyone else is clamped to their own organization: an explicit
/// foreign id is a 403, an omitted id means "my organization".
pub(crate) fn organization_scope(
    principal: &Principal,
    requested: Option<String>,
) -> AppResult<TenantFilter> {
    match requested {
        Some(organization_id) => {
            principal.require_organization(&organization_id)?;
            Ok(TenantFilter::default().in_organization(organization_id))
        }
        None if principal.is_platform_owner() => Ok(TenantFilter::default()),
        None => Ok(TenantFilter::default().in_organization(principal.organization_id.clone())),
    }
}

pub(crate) async fn list_students_core<S: TenantStore>(
    query: &StudentQuery,
    principal: &Principal,
    ctx: &AppContext<S>,
) -> AppResult<Vec<StudentRecord>> {
    principal.require(Capability::ViewDirectory)?;

    let mut filter = organization_scope(principal, query.organization_id.clone())?;
    if let Some(school_id) = &query.school_id {
        filter = filter.in_school(school_id.clone());
    }
    if let Some(campus_id) = &query.campus_id {
        filter = filter.in_campus(campus_id.clone());
    }

    ctx.store.list_students(&filter).await
}

pub(crate) async fn list_classes_core<S: TenantStore>(
    query: &ClassQuery,
    principal: &Principal,
    ctx: &AppContext<S>,
) -> AppResult<Vec<ClassRecord>> {
    principal.require(Capability::ViewDirectory)?;

    let mut filter = organization_scope(principal, query.organization_id.clone())?;
    if let Some(school_id) = &query.school_id {
        filter = filter.in_school(school_id.clone());
    }
    if let Some(campus_id) = &query.campus_id {
        filter = filter.in_campus(campus_id.clone());
    }
    if let Some(teacher_id) = &query.teacher_id {
        filter = filter.taught_by(teacher_id.clone());
    }

    ctx.store.list_classes(&filter).await
}

// ---------------------------------------------------------------------------
// HTTP handlers
// ---------------------------------------------------------------------------

/// Handle `GET /organizations`.
///
/// The listing spans every tenant, so it is reserved for the platform owner.
pub async fn handle_list_organizations<S: TenantStore>(
    req: &ApiRequest,
    ctx: &AppContext<S>,
) -> AppResult<ApiResponse> {
    let principal = require_principal(req, ctx).await?;
    principal.require(Capability::ViewPlatformDashboard)?;

    let overviews = ctx.store.list_organization_overviews().await?;
    Ok(ApiResponse::json(200, &overviews)?)
}

/// Handle `GET /students`.
pub async fn handle_list_students<S: TenantStore>(
    req: &ApiRequest,
    ctx: &AppContext<S>,
) -> AppResult<ApiResponse> {
    let principal = require_principal(req, ctx).await?;
    let query: StudentQuery = parse_query(&req.query);

    let records = list_students_core(&query, &principal, ctx).await?;
    Ok(ApiResponse::json(200, &records)?)
}

/// Handle `GET /classes`.
pub async fn handle_list_classes<S: TenantStore>(
    req: &ApiRequest,
    ctx: &AppContext<S>,
) -> AppResult<ApiResponse> {
    let principal = require_principal(req, ctx).await?;
    let query: ClassQuery = parse_query(&req.query);

    let records = list_classes_core(&query, &principal, ctx).await?;
    Ok(ApiResponse::json(200, &records)?)
}

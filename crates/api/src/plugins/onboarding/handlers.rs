use schoolhouse_core::authz::{Capability, require_principal};
use schoolhouse_core::error::{AppError, AppResult, validate_request_body};
use schoolhouse_core::password;
use schoolhouse_core::plugin::AppContext;
use schoolhouse_core::slug::slugify;
use schoolhouse_core::store::TenantStore;
use schoolhouse_core::types::{
    ApiRequest, ApiResponse, CreateInvitation, CreateOrganization, CreateUser, UserRole,
};

use super::OnboardingConfig;
use super::templates;
use super::types::{
    ActivatedUser, CompleteSignupRequest, CompleteSignupResponse, InviteOrganizationRequest,
    InviteOrganizationResponse, OrganizationRef, PendingOrganization, VerifyInvitationResponse,
};

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// NONE → PENDING.
///
/// Every precondition is checked before any side effect; email dispatch is
/// the commit point — only after it succeeds is the pending organization
/// created, so a dispatch failure leaves no state behind. Token issuance by
/// itself commits nothing.
pub(crate) async fn invite_organization_core<S: TenantStore>(
    body: &InviteOrganizationRequest,
    config: &OnboardingConfig,
    ctx: &AppContext<S>,
) -> AppResult<InviteOrganizationResponse> {
    let slug = slugify(&body.organization_name);

    if ctx
        .store
        .find_organization_by_name_or_slug(&body.organization_name, &slug)
        .await?
        .is_some()
    {
        return Err(AppError::conflict(
            "An organization with this name already exists",
        ));
    }

    if ctx.store.get_user_by_email(&body.email).await?.is_some() {
        return Err(AppError::conflict("A user with this email already exists"));
    }

    let token = ctx.tokens.issue(&body.email, &body.organization_name)?;
    let invite_link = format!("{}/signup?token={}", ctx.config.base_url, token);
    let content =
        templates::invitation_email(&ctx.config.app_name, &body.organization_name, &invite_link);

    let receipt = ctx
        .email_provider()?
        .send(&body.email, &content.subject, &content.html, &content.text)
        .await
        .map_err(|err| {
            ctx.logger()
                .error(&format!("invitation email to {} failed: {}", body.email, err));
            AppError::email("Failed to send invitation email")
        })?;

    let subscription = body.subscription.unwrap_or(config.default_subscription);
    let organization = ctx
        .store
        .create_organization(CreateOrganization::pending(
            &body.organization_name,
            subscription,
        ))
        .await?;

    ctx.store
        .record_invitation(CreateInvitation::new(&organization.id, &body.email, &token))
        .await?;

    ctx.logger().info(&format!(
        "invited {} to administer organization {}",
        body.email, organization.name
    ));

    Ok(InviteOrganizationResponse {
        message: "Invitation sent successfully".to_string(),
        email: body.email.clone(),
        organization_name: body.organization_name.clone(),
        message_id: receipt.message_id,
    })
}

/// Token preview for the signup page.
///
/// Distinguishes a dead token (400) from a completed invitation (410): the
/// latter is decided at the query layer, never by re-decoding token state.
pub(crate) async fn verify_invitation_core<S: TenantStore>(
    token: &str,
    ctx: &AppContext<S>,
) -> AppResult<VerifyInvitationResponse> {
    let claims = ctx.tokens.verify(token).ok_or(AppError::InvalidToken)?;

    let organization = ctx
        .store
        .get_pending_organization_by_name(&claims.organization_name)
        .await?
        .ok_or_else(|| AppError::gone("Invitation has already been completed or expired"))?;

    Ok(VerifyInvitationResponse {
        valid: true,
        email: claims.email,
        organization_name: claims.organization_name,
        created_at: claims.created_at,
        organization: PendingOrganization {
            id: organization.id,
            name: organization.name,
            subscription: organization.subscription,
        },
    })
}

/// PENDING → ACTIVE.
///
/// All business-rule checks run before any write; the user creation and
/// status flip commit together inside `activate_organization`. The welcome
/// notification runs after the commit and its failure is only logged.
pub(crate) async fn complete_signup_core<S: TenantStore>(
    body: &CompleteSignupRequest,
    config: &OnboardingConfig,
    ctx: &AppContext<S>,
) -> AppResult<CompleteSignupResponse> {
    if body.password.len() < ctx.config.password.min_length {
        return Err(AppError::bad_request(format!(
            "Password must be at least {} characters long",
            ctx.config.password.min_length
        )));
    }

    let claims = ctx.tokens.verify(&body.token).ok_or(AppError::InvalidToken)?;

    // Re-redemption is decided here, at the query layer: once the
    // organization left PENDING, the same token maps to nothing.
    let organization = ctx
        .store
        .get_pending_organization_by_name(&claims.organization_name)
        .await?
        .ok_or_else(|| {
            AppError::not_found("Organization not found or invitation already completed")
        })?;

    if ctx.store.get_user_by_email(&claims.email).await?.is_some() {
        return Err(AppError::conflict("User already exists with this email"));
    }

    let password_hash = password::hash_password(&body.password, &ctx.config.password.argon2)?;
    let admin = CreateUser::new(
        &body.name,
        &claims.email,
        &password_hash,
        UserRole::OrgAdmin,
        &organization.id,
    );

    let (user, organization) = ctx
        .store
        .activate_organization(&organization.id, admin)
        .await?;

    ctx.logger().info(&format!(
        "organization {} activated by {}",
        organization.name, user.email
    ));

    if config.send_welcome_email {
        send_welcome_notification(ctx, &user.email, &organization.name).await;
    }

    Ok(CompleteSignupResponse {
        message: "Account created successfully".to_string(),
        user: ActivatedUser {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            organization: OrganizationRef {
                id: organization.id,
                name: organization.name,
                slug: organization.slug,
            },
        },
    })
}

/// Post-commit welcome notification. Failures never roll anything back and
/// are reported only at log level.
async fn send_welcome_notification<S: TenantStore>(
    ctx: &AppContext<S>,
    email: &str,
    organization_name: &str,
) {
    let provider = match ctx.email_provider() {
        Ok(provider) => provider,
        Err(_) => {
            ctx.logger()
                .warn("welcome email skipped: no email provider configured");
            return;
        }
    };

    let content =
        templates::welcome_email(&ctx.config.app_name, organization_name, &ctx.config.base_url);
    if let Err(err) = provider
        .send(email, &content.subject, &content.html, &content.text)
        .await
    {
        ctx.logger()
            .warn(&format!("welcome email to {} failed: {}", email, err));
    }
}

// ---------------------------------------------------------------------------
// HTTP handlers
// ---------------------------------------------------------------------------

/// Handle `POST /organizations/invite`.
pub async fn handle_invite_organization<S: TenantStore>(
    req: &ApiRequest,
    ctx: &AppContext<S>,
    config: &OnboardingConfig,
) -> AppResult<ApiResponse> {
    let principal = require_principal(req, ctx).await?;
    principal.require(Capability::InviteOrganizations)?;

    let body: InviteOrganizationRequest = validate_request_body(req)?;
    let response = invite_organization_core(&body, config, ctx).await?;
    Ok(ApiResponse::json(200, &response)?)
}

/// Handle `GET /signup?token=`.
pub async fn handle_verify_invitation<S: TenantStore>(
    req: &ApiRequest,
    ctx: &AppContext<S>,
) -> AppResult<ApiResponse> {
    let token = req
        .query
        .get("token")
        .ok_or_else(|| AppError::bad_request("Token is required"))?;

    let response = verify_invitation_core(token, ctx).await?;
    Ok(ApiResponse::json(200, &response)?)
}

/// Handle `POST /signup`.
pub async fn handle_complete_signup<S: TenantStore>(
    req: &ApiRequest,
    ctx: &AppContext<S>,
    config: &OnboardingConfig,
) -> AppResult<ApiResponse> {
    let body: CompleteSignupRequest = validate_request_body(req)?;
    let response = complete_signup_core(&body, config, ctx).await?;
    Ok(ApiResponse::json(200, &response)?)
}

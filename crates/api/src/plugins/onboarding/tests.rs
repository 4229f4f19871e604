use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use schoolhouse_core::config::AppConfig;
use schoolhouse_core::email::{DispatchReceipt, EmailProvider};
use schoolhouse_core::error::{AppError, AppResult};
use schoolhouse_core::plugin::AppContext;
use schoolhouse_core::store::{MemoryStore, TenantStore};
use schoolhouse_core::types::{
    ApiRequest, CreateUser, HttpMethod, OrganizationStatus, UserRole,
};

use super::OnboardingConfig;
use super::handlers::{
    complete_signup_core, handle_invite_organization, invite_organization_core,
    verify_invitation_core,
};
use super::types::{CompleteSignupRequest, InviteOrganizationRequest};

const SECRET: &str = "test-secret-key-that-is-at-least-32-characters-long";

#[derive(Debug, Clone)]
struct SentEmail {
    to: String,
    subject: String,
    text: String,
}

/// Email provider that records every send.
struct RecordingEmailProvider {
    sent: Arc<Mutex<Vec<SentEmail>>>,
}

impl RecordingEmailProvider {
    fn new() -> (Self, Arc<Mutex<Vec<SentEmail>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        (Self { sent: sent.clone() }, sent)
    }
}

#[async_trait]
impl EmailProvider for RecordingEmailProvider {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        _html: &str,
        text: &str,
    ) -> AppResult<DispatchReceipt> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            text: text.to_string(),
        });
        Ok(DispatchReceipt {
            message_id: format!("msg-{}", sent.len()),
        })
    }
}

/// Email provider whose every dispatch fails.
struct FailingEmailProvider;

#[async_trait]
impl EmailProvider for FailingEmailProvider {
    async fn send(&self, _: &str, _: &str, _: &str, _: &str) -> AppResult<DispatchReceipt> {
        Err(AppError::email("smtp connection refused"))
    }
}

fn test_context<E: EmailProvider + 'static>(provider: E) -> AppContext<MemoryStore> {
    let config = AppConfig::new(SECRET)
        .base_url("http://localhost:3000")
        .email_provider(provider);
    AppContext::new(Arc::new(config), Arc::new(MemoryStore::new()))
}

fn invite_request(email: &str, organization_name: &str) -> InviteOrganizationRequest {
    InviteOrganizationRequest {
        email: email.to_string(),
        organization_name: organization_name.to_string(),
        subscription: None,
    }
}

async fn issued_token<S: TenantStore>(ctx: &AppContext<S>, organization_id: &str) -> String {
    ctx.store
        .list_organization_invitations(organization_id)
        .await
        .unwrap()
        .first()
        .expect("invitation record should exist")
        .token
        .clone()
}

#[tokio::test]
async fn invite_creates_pending_organization_with_audit_record() {
    let (provider, sent) = RecordingEmailProvider::new();
    let ctx = test_context(provider);
    let config = OnboardingConfig::default();

    let response = invite_organization_core(
        &invite_request("admin@school.edu", "Lincoln High"),
        &config,
        &ctx,
    )
    .await
    .unwrap();

    assert_eq!(response.message, "Invitation sent successfully");
    assert_eq!(response.email, "admin@school.edu");
    assert_eq!(response.message_id, "msg-1");

    let organization = ctx
        .store
        .get_organization_by_slug("lincoln-high")
        .await
        .unwrap()
        .expect("organization should exist");
    assert_eq!(organization.status, OrganizationStatus::Pending);
    assert_eq!(organization.name, "Lincoln High");

    let invitations = ctx
        .store
        .list_organization_invitations(&organization.id)
        .await
        .unwrap();
    assert_eq!(invitations.len(), 1);
    assert_eq!(invitations[0].email, "admin@school.edu");
    assert!(invitations[0].completed_at.is_none());

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "admin@school.edu");
    assert!(sent[0].text.contains("/signup?token="));
    assert!(sent[0].text.contains(&invitations[0].token));
}

#[tokio::test]
async fn duplicate_invite_is_rejected_before_any_side_effect() {
    let (provider, sent) = RecordingEmailProvider::new();
    let ctx = test_context(provider);
    let config = OnboardingConfig::default();

    invite_organization_core(&invite_request("a@b.com", "X"), &config, &ctx)
        .await
        .unwrap();

    // Same name, second invitee — and a slug-colliding variant.
    for name in ["X", "x"] {
        let err = invite_organization_core(&invite_request("c@d.com", name), &config, &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    assert_eq!(sent.lock().unwrap().len(), 1, "no email for rejected invites");
}

#[tokio::test]
async fn invite_is_rejected_when_the_email_belongs_to_a_user() {
    let (provider, _) = RecordingEmailProvider::new();
    let ctx = test_context(provider);

    ctx.store
        .create_user(CreateUser::new(
            "Existing",
            "taken@school.edu",
            "hash",
            UserRole::Teacher,
            "some-org",
        ))
        .await
        .unwrap();

    let err = invite_organization_core(
        &invite_request("taken@school.edu", "New Org"),
        &OnboardingConfig::default(),
        &ctx,
    )
    .await
    .unwrap_err();
    assert_eq!(err.status_code(), 409);
}

#[tokio::test]
async fn failed_dispatch_leaves_no_organization_behind() {
    let ctx = test_context(FailingEmailProvider);

    let err = invite_organization_core(
        &invite_request("admin@school.edu", "Lincoln High"),
        &OnboardingConfig::default(),
        &ctx,
    )
    .await
    .unwrap_err();

    assert_eq!(err.status_code(), 500);
    assert_eq!(err.to_string(), "Failed to send invitation email");
    assert!(
        ctx.store
            .find_organization_by_name_or_slug("Lincoln High", "lincoln-high")
            .await
            .unwrap()
            .is_none(),
        "dispatch failure must not commit an organization row"
    );
}

#[tokio::test]
async fn signup_round_trip_activates_the_organization() {
    let (provider, sent) = RecordingEmailProvider::new();
    let ctx = test_context(provider);
    let config = OnboardingConfig::default();

    invite_organization_core(
        &invite_request("admin@school.edu", "Lincoln High"),
        &config,
        &ctx,
    )
    .await
    .unwrap();

    let organization = ctx
        .store
        .get_organization_by_slug("lincoln-high")
        .await
        .unwrap()
        .unwrap();
    let token = issued_token(&ctx, &organization.id).await;

    // Preview is valid while pending.
    let preview = verify_invitation_core(&token, &ctx).await.unwrap();
    assert!(preview.valid);
    assert_eq!(preview.email, "admin@school.edu");
    assert_eq!(preview.organization.name, "Lincoln High");

    let signup = CompleteSignupRequest {
        token: token.clone(),
        password: "longenough1".to_string(),
        name: "A Admin".to_string(),
    };
    let completed = complete_signup_core(&signup, &config, &ctx).await.unwrap();

    assert_eq!(completed.user.role, UserRole::OrgAdmin);
    assert_eq!(completed.user.organization.slug, "lincoln-high");

    let organization = ctx
        .store
        .get_organization_by_id(&organization.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(organization.status, OrganizationStatus::Active);

    let invitations = ctx
        .store
        .list_organization_invitations(&organization.id)
        .await
        .unwrap();
    assert!(invitations[0].completed_at.is_some());

    // Invitation email + welcome email.
    assert_eq!(sent.lock().unwrap().len(), 2);

    // Stored credential is an Argon2 hash, never the plaintext.
    let user = ctx
        .store
        .get_user_by_email("admin@school.edu")
        .await
        .unwrap()
        .unwrap();
    assert!(user.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn reusing_a_redeemed_token_fails_at_the_query_layer() {
    let (provider, _) = RecordingEmailProvider::new();
    let ctx = test_context(provider);
    let config = OnboardingConfig::default();

    invite_organization_core(&invite_request("admin@school.edu", "X"), &config, &ctx)
        .await
        .unwrap();
    let organization = ctx
        .store
        .get_organization_by_slug("x")
        .await
        .unwrap()
        .unwrap();
    let token = issued_token(&ctx, &organization.id).await;

    let signup = CompleteSignupRequest {
        token: token.clone(),
        password: "longenough1".to_string(),
        name: "A Admin".to_string(),
    };
    complete_signup_core(&signup, &config, &ctx).await.unwrap();

    // The token still decodes, but the organization is no longer pending.
    let second = CompleteSignupRequest {
        token: token.clone(),
        password: "longenough1".to_string(),
        name: "B Admin".to_string(),
    };
    let err = complete_signup_core(&second, &config, &ctx).await.unwrap_err();
    assert_eq!(err.status_code(), 404);

    // The preview endpoint reports the completed invitation as gone.
    let err = verify_invitation_core(&token, &ctx).await.unwrap_err();
    assert_eq!(err.status_code(), 410);
}

#[tokio::test]
async fn signup_rejects_garbage_tokens_and_short_passwords() {
    let (provider, _) = RecordingEmailProvider::new();
    let ctx = test_context(provider);
    let config = OnboardingConfig::default();

    let garbage = CompleteSignupRequest {
        token: "not-a-token".to_string(),
        password: "longenough1".to_string(),
        name: "A".to_string(),
    };
    let err = complete_signup_core(&garbage, &config, &ctx).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.to_string(), "Invalid or expired invitation token");

    let short = CompleteSignupRequest {
        token: "whatever".to_string(),
        password: "short".to_string(),
        name: "A".to_string(),
    };
    let err = complete_signup_core(&short, &config, &ctx).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(err.to_string().contains("Password must be at least"));
}

#[tokio::test]
async fn racing_signups_commit_exactly_one_admin() {
    let (provider, _) = RecordingEmailProvider::new();
    let ctx = Arc::new(test_context(provider));
    let config = OnboardingConfig::default();

    invite_organization_core(&invite_request("admin@school.edu", "X"), &config, &ctx)
        .await
        .unwrap();
    let organization = ctx
        .store
        .get_organization_by_slug("x")
        .await
        .unwrap()
        .unwrap();
    let token = issued_token(&ctx, &organization.id).await;

    let spawn_signup = |name: &str| {
        let ctx = ctx.clone();
        let config = config.clone();
        let body = CompleteSignupRequest {
            token: token.clone(),
            password: "longenough1".to_string(),
            name: name.to_string(),
        };
        tokio::spawn(async move { complete_signup_core(&body, &config, &ctx).await })
    };

    let (a, b) = (spawn_signup("A"), spawn_signup("B"));
    let (a, b) = (a.await.unwrap(), b.await.unwrap());

    assert_eq!(
        [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(),
        1,
        "exactly one signup must win"
    );
    let loser = if a.is_ok() { b } else { a };
    let status = loser.unwrap_err().status_code();
    assert!(status == 404 || status == 409);

    assert_eq!(
        ctx.store
            .count_users(Some(&organization.id), None)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn invite_endpoint_requires_the_invite_capability() {
    let (provider, _) = RecordingEmailProvider::new();
    let ctx = test_context(provider);
    let config = OnboardingConfig::default();

    let body = serde_json::json!({
        "email": "admin@school.edu",
        "organizationName": "Lincoln High",
    });
    let mut req = ApiRequest::new(HttpMethod::Post, "/organizations/invite");
    req.body = Some(body.to_string().into_bytes());

    // No principal header at all.
    let err = handle_invite_organization(&req, &ctx, &config)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 401);

    // An org admin is authenticated but lacks the capability.
    let admin = ctx
        .store
        .create_user(CreateUser::new(
            "Admin",
            "org-admin@school.edu",
            "hash",
            UserRole::OrgAdmin,
            "some-org",
        ))
        .await
        .unwrap();
    req.headers
        .insert("x-user-id".to_string(), admin.id.clone());
    let err = handle_invite_organization(&req, &ctx, &config)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn invite_endpoint_rejects_malformed_email() {
    let (provider, _) = RecordingEmailProvider::new();
    let ctx = test_context(provider);
    let config = OnboardingConfig::default();

    let owner = ctx
        .store
        .create_user(CreateUser::new(
            "Owner",
            "owner@platform.io",
            "hash",
            UserRole::PlatformOwner,
            "platform",
        ))
        .await
        .unwrap();

    let body = serde_json::json!({
        "email": "not-an-email",
        "organizationName": "Lincoln High",
    });
    let mut req = ApiRequest::new(HttpMethod::Post, "/organizations/invite");
    req.body = Some(body.to_string().into_bytes());
    req.headers.insert("x-user-id".to_string(), owner.id);

    let err = handle_invite_organization(&req, &ctx, &config)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}

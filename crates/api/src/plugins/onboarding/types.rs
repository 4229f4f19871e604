use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use schoolhouse_core::types::{SubscriptionTier, UserRole};

#[derive(Debug, Deserialize, Validate)]
pub struct InviteOrganizationRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(rename = "organizationName")]
    #[validate(length(min = 1, message = "Email and organization name are required"))]
    pub organization_name: String,
    pub subscription: Option<SubscriptionTier>,
}

#[derive(Debug, Serialize)]
pub struct InviteOrganizationResponse {
    pub message: String,
    pub email: String,
    #[serde(rename = "organizationName")]
    pub organization_name: String,
    #[serde(rename = "messageId")]
    pub message_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyInvitationQuery {
    pub token: Option<String>,
}

/// Organization details shown on the signup page.
#[derive(Debug, Serialize)]
pub struct PendingOrganization {
    pub id: String,
    pub name: String,
    pub subscription: SubscriptionTier,
}

#[derive(Debug, Serialize)]
pub struct VerifyInvitationResponse {
    pub valid: bool,
    pub email: String,
    #[serde(rename = "organizationName")]
    pub organization_name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub organization: PendingOrganization,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompleteSignupRequest {
    #[validate(length(min = 1, message = "Token, password, and name are required"))]
    pub token: String,
    #[validate(length(min = 1, message = "Token, password, and name are required"))]
    pub password: String,
    #[validate(length(min = 1, message = "Token, password, and name are required"))]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct OrganizationRef {
    pub id: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct ActivatedUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub organization: OrganizationRef,
}

#[derive(Debug, Serialize)]
pub struct CompleteSignupResponse {
    pub message: String,
    pub user: ActivatedUser,
}

//! Email templates for the onboarding flow.

/// Rendered email content.
pub struct EmailContent {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Invitation email sent to the prospective organization administrator.
///
/// The text body carries the bare invite link on its own line so plain-text
/// clients keep it clickable.
pub fn invitation_email(app_name: &str, organization_name: &str, invite_link: &str) -> EmailContent {
    let subject = format!("Welcome to {organization_name} - Complete Your Setup");

    let html = format!(
        r#"<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto;">
  <h1>Welcome to {app_name}</h1>
  <p>You've been selected as the administrator for <strong>{organization_name}</strong>.</p>
  <p>Complete your setup by creating a password:</p>
  <p><a href="{invite_link}">Complete Setup</a></p>
  <p>This invitation link will expire in 7 days.</p>
  <p>If you didn't expect this invitation, please ignore this email.</p>
</div>"#
    );

    let text = format!(
        "Welcome to {organization_name}!\n\
         \n\
         You've been invited to manage {organization_name} on {app_name}.\n\
         \n\
         Complete your setup:\n\
         {invite_link}\n\
         \n\
         This invitation will expire in 7 days.\n\
         \n\
         If you didn't expect this invitation, please ignore this email.\n"
    );

    EmailContent {
        subject,
        html,
        text,
    }
}

/// Welcome email sent after successful signup. Best-effort only.
pub fn welcome_email(app_name: &str, organization_name: &str, login_url: &str) -> EmailContent {
    let subject = format!("Welcome to {organization_name} - You're All Set!");

    let html = format!(
        r#"<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto;">
  <h1>Welcome to {organization_name}!</h1>
  <p>Your administrator account for <strong>{organization_name}</strong> is now active.</p>
  <p><a href="{login_url}">Access Dashboard</a></p>
</div>"#
    );

    let text = format!(
        "Welcome to {organization_name}!\n\
         \n\
         Your administrator account on {app_name} is now active.\n\
         \n\
         Access your dashboard:\n\
         {login_url}\n"
    );

    EmailContent {
        subject,
        html,
        text,
    }
}

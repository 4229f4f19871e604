//! Shared fixtures for integration tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use schoolhouse::plugins::{DashboardPlugin, DirectoryPlugin, OnboardingPlugin};
use schoolhouse::types::{CreateOrganization, CreateUser, OrgSettings, SubscriptionTier, UserRole};
use schoolhouse::{
    ApiRequest, ApiResponse, AppBuilder, AppConfig, AppResult, DispatchReceipt, EmailProvider,
    HttpMethod, MemoryStore, Schoolhouse, TenantStore,
};

pub const SECRET: &str = "test-secret-key-that-is-at-least-32-characters-long";

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Email provider that records every send.
pub struct RecordingEmailProvider {
    sent: Arc<Mutex<Vec<SentEmail>>>,
}

impl RecordingEmailProvider {
    pub fn new() -> (Self, Arc<Mutex<Vec<SentEmail>>>) {
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

pub struct TestApp {
    pub app: Schoolhouse<MemoryStore>,
    pub sent: Arc<Mutex<Vec<SentEmail>>>,
    /// Seeded platform owner's user id.
    pub owner_id: String,
}

/// Build an app with all plugins, a recording email provider, and a seeded
/// platform organization + owner.
pub async fn build_app() -> TestApp {
    let (provider, sent) = RecordingEmailProvider::new();

    let config = AppConfig::new(SECRET).base_url("http://localhost:3000");
    let app = AppBuilder::new(config)
        .email_provider(provider)
        .store(MemoryStore::new())
        .plugin(OnboardingPlugin::new())
        .plugin(DirectoryPlugin::new())
        .plugin(DashboardPlugin::new())
        .build()
        .await
        .expect("Failed to create test app instance");

    let platform = app
        .store()
        .create_organization(
            CreateOrganization::active("Platform HQ", SubscriptionTier::Enterprise)
                .with_settings(OrgSettings::platform()),
        )
        .await
        .unwrap();
    let owner = app
        .store()
        .create_user(CreateUser::new(
            "Platform Owner",
            "owner@platform.io",
            "hash",
            UserRole::PlatformOwner,
            &platform.id,
        ))
        .await
        .unwrap();

    TestApp {
        app,
        sent,
        owner_id: owner.id,
    }
}

pub async fn post_json(
    app: &Schoolhouse<MemoryStore>,
    path: &str,
    user_id: Option<&str>,
    body: serde_json::Value,
) -> ApiResponse {
    let mut req = ApiRequest::new(HttpMethod::Post, path);
    req.headers
        .insert("content-type".to_string(), "application/json".to_string());
    if let Some(user_id) = user_id {
        req.headers.insert("x-user-id".to_string(), user_id.to_string());
    }
    req.body = Some(body.to_string().into_bytes());

    app.handle_request(req).await
}

pub async fn get(
    app: &Schoolhouse<MemoryStore>,
    path: &str,
    user_id: Option<&str>,
    query: &[(&str, &str)],
) -> ApiResponse {
    let mut req = ApiRequest::new(HttpMethod::Get, path);
    if let Some(user_id) = user_id {
        req.headers.insert("x-user-id".to_string(), user_id.to_string());
    }
    req.query = query
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<HashMap<_, _>>();

    app.handle_request(req).await
}

pub fn body_json(response: &ApiResponse) -> serde_json::Value {
    serde_json::from_slice(&response.body).expect("response body should be JSON")
}

/// Pull the invitation token out of the recorded invite email's text body.
pub fn token_from_email(email: &SentEmail) -> String {
    let line = email
        .text
        .lines()
        .find(|line| line.contains("token="))
        .expect("invite email should carry the signup link");
    line.trim()
        .split("token=")
        .nth(1)
        .expect("link should have a token parameter")
        .to_string()
}

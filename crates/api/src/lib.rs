//! # Schoolhouse API
//!
//! Request-handling plugins for the Schoolhouse platform.

pub mod plugins;

pub use plugins::dashboard::DashboardPlugin;
pub use plugins::directory::DirectoryPlugin;
pub use plugins::onboarding::{OnboardingConfig, OnboardingPlugin};

pub mod dashboard;
pub mod directory;
pub mod helpers;
pub mod onboarding;

pub use dashboard::DashboardPlugin;
pub use directory::DirectoryPlugin;
pub use onboarding::{OnboardingConfig, OnboardingPlugin};

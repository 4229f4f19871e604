mod app;

pub use app::{AppBuilder, Schoolhouse, TypedAppBuilder};

pub mod fashions;
pub mod health;

pub use fashions::{create_fashion, get_fashion, index, list_fashions};
pub use health::{health_check, metrics_endpoint, readiness_check};

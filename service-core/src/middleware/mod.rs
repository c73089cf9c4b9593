pub mod metrics;
pub mod tracing;

pub use metrics::metrics_middleware;
pub use self::tracing::{REQUEST_ID_HEADER, request_id_middleware};

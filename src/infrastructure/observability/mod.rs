mod init_tracing;
mod request_id;
mod text_sanitizer;
mod tracing_config;

pub use init_tracing::init_tracing;
pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use text_sanitizer::sanitize_for_log;
pub use tracing_config::TracingConfig;

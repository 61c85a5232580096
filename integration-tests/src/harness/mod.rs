mod config;
pub mod ingest;
pub mod log_line;
pub mod tracing;

pub use config::{TestBackend, render_config};
pub use ingest::TestIngest;
pub use log_line::log_line;
pub use tracing::{CapturedEvent, captured_events, init_test_tracing};

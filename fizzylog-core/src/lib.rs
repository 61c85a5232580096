pub mod cli;
pub mod conf;
pub mod ingest;
pub mod logging;
pub mod query;
pub mod store;

mod range;
mod report;
mod validate;

pub use range::*;
pub use report::*;
pub use validate::validate_config;

pub mod conf;
mod load;
pub mod run;
pub mod series;


pub use load::load_config_reporting;

pub mod config;
pub mod quiz;
pub mod wizard;

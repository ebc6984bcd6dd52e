pub mod analysis;
pub mod collector;
pub mod config;
pub mod inference;
pub mod logging;
pub mod output;
pub mod scoring;

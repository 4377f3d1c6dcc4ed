pub mod config;
pub mod finding;
pub mod report;
pub mod scoring;

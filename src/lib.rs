// safemind - rule-based mental health support assistant
// Library exports

pub mod cli;
pub mod config;
pub mod engine;
pub mod keywords;
pub mod metrics;
pub mod report;
pub mod screening;
pub mod sentiment;
pub mod server;

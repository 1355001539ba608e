// Common library for shared code across the dispatcher binary and its tests

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod notify;
pub mod reminder;
pub mod schedule;
pub mod telemetry;

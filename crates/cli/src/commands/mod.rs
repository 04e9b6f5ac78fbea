//! CLI command implementations

pub mod models;
pub mod predict;
pub mod run;
pub mod service;
pub mod teach;

// src/services/mod.rs
pub mod comps;
pub mod metrics;
pub mod money;
pub mod scoring;
pub mod zillow;

// src/handlers/mod.rs
pub mod analyze;
pub mod error;
pub mod health;
pub mod property;
pub mod similar_homes;

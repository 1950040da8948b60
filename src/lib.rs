pub mod api;
pub mod config;
pub mod entities;
pub mod error;
pub mod migrator;
pub mod telemetry;
pub mod validation;

pub use sea_orm;

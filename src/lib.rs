pub mod actions;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod query;
pub mod store;
pub mod totals;
pub mod validation;

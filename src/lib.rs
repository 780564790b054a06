pub mod config;
pub mod control;
pub mod engine;
pub mod history;
pub mod notify;
pub mod store;
pub mod together;

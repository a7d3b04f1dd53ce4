//! Database models and configuration shared across the mailing service.

pub mod client;
pub mod config;
pub mod mailing;
pub mod mailing_log;
pub mod message;
pub mod task;

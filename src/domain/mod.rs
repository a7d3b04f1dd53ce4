//! Domain aggregates exposed by the mailing service layer.

pub mod client;
pub mod mailing;
pub mod mailing_log;
pub mod message;
pub mod scope;
pub mod task;
pub mod types;

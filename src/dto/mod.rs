//! DTO modules that bridge services with templates and APIs.

pub mod api;
pub mod clients;
pub mod logs;
pub mod mailings;
pub mod messages;

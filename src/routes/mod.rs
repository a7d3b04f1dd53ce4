//! HTTP handlers. Rendering, redirects and role checks come from
//! `pushkind_common::routes`.

pub mod api;
pub mod clients;
pub mod logs;
pub mod mailings;
pub mod main;
pub mod messages;

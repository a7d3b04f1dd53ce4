//! Framework-free workflows behind the HTTP routes and the worker.

use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};

pub mod api;
pub mod clients;
pub mod dispatch;
pub mod errors;
pub mod logs;
pub mod mailings;
pub mod messages;
#[cfg(all(test, feature = "test-mocks"))]
mod test_support;
pub mod visibility;

pub use pushkind_common::services::errors::{ServiceError, ServiceResult};

/// Highest page number a listing accepts; larger requests are clamped.
pub const MAX_PAGE: usize = i32::MAX as usize;

/// Normalizes a requested page number into `1..=MAX_PAGE`.
pub fn page_number(page: Option<usize>) -> usize {
    page.unwrap_or(1).clamp(1, MAX_PAGE)
}

/// Wraps one page of `items` out of `total` matching rows.
pub fn paginate<T>(items: Vec<T>, page: usize, total: usize) -> Paginated<T> {
    Paginated::new(items, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE))
}

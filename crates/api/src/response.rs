//! JSON response envelopes.
//!
//! Every endpoint responds with the status envelope
//! `{"status":"success","data":...,"message":...}`; listing endpoints wrap
//! their data in the pagination envelope
//! `{"data":[...],"pagination":{"page","limit","total","totalPages"}}`.
//! Errors use the same status envelope with `"status":"error"` (see
//! [`crate::error::AppError`]).

use axum::Json;
use serde::{Deserialize, Serialize};

/// Default page size for listing endpoints.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Hard cap on page size; larger requests are clamped.
pub const MAX_PAGE_SIZE: i64 = 100;

/// The success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// A success envelope carrying data.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            status: "success",
            data: Some(data),
            message: None,
        })
    }

    /// A success envelope carrying data and a human-readable message.
    pub fn success_with_message(data: T, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            status: "success",
            data: Some(data),
            message: Some(message.into()),
        })
    }
}

impl ApiResponse<()> {
    /// A success envelope carrying only a message.
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            status: "success",
            data: None,
            message: Some(message.into()),
        })
    }
}

/// Query-string pagination parameters (`?page=2&limit=20`).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// The requested page, at least 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// The requested page size, clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn limit_or(&self, default: i64) -> i64 {
        self.limit.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
    }

    /// Row offset for the requested page.
    #[must_use]
    pub fn offset(&self, default_limit: i64) -> i64 {
        (self.page() - 1) * self.limit_or(default_limit)
    }
}

/// Pagination metadata attached to listing responses.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    /// Compute pagination metadata for a page of a `total`-row result set.
    #[must_use]
    pub const fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// The pagination envelope: a page of rows plus metadata.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    /// Wrap a page of rows with its pagination metadata.
    #[must_use]
    pub const fn new(data: Vec<T>, page: i64, limit: i64, total: i64) -> Self {
        Self {
            data,
            pagination: Pagination::new(page, limit, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let q = PageQuery::default();
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit_or(20), 20);
        assert_eq!(q.offset(20), 0);
    }

    #[test]
    fn test_page_query_clamps() {
        let q = PageQuery {
            page: Some(0),
            limit: Some(10_000),
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit_or(20), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_page_query_offset() {
        let q = PageQuery {
            page: Some(3),
            limit: Some(10),
        };
        assert_eq!(q.offset(20), 20);
    }

    #[test]
    fn test_pagination_total_pages() {
        assert_eq!(Pagination::new(1, 20, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 20, 20).total_pages, 1);
        assert_eq!(Pagination::new(1, 20, 21).total_pages, 2);
        assert_eq!(Pagination::new(1, 10, 95).total_pages, 10);
    }

    #[test]
    fn test_success_envelope_shape() {
        let Json(envelope) = ApiResponse::success(serde_json::json!({"ok": true}));
        let value = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(value["status"], "success");
        assert_eq!(value["data"]["ok"], true);
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_message_envelope_shape() {
        let Json(envelope) = ApiResponse::message("Item removed from cart");
        let value = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(value["status"], "success");
        assert_eq!(value["message"], "Item removed from cart");
    }
}

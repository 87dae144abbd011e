//! Shared Types
//!
//! Common types used across the application

use serde::Deserialize;

/// Pagination query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PaginationParams {
    /// Calculate offset for queries
    pub fn offset(&self) -> u32 {
        (self.page.max(1) - 1) * self.limit()
    }

    /// Get limit for queries (capped at 100)
    pub fn limit(&self) -> u32 {
        self.page_size.clamp(1, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let p = PaginationParams::default();
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), 20);
    }

    #[test]
    fn test_pagination_caps() {
        let p = PaginationParams {
            page: 3,
            page_size: 500,
        };
        assert_eq!(p.limit(), 100);
        assert_eq!(p.offset(), 200);
    }
}

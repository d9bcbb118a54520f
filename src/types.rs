use serde::{Deserialize, Serialize};

// Re-export UserRole and Permission from the permission module
pub use crate::domains::permission::{Permission, UserRole};

/// Pagination parameters for list queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationParams {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self { page: 1, per_page: 20 }
    }
}

impl PaginationParams {
    /// Page size with a floor of one, so a zero input cannot produce
    /// LIMIT 0 queries or a division by zero downstream.
    pub fn effective_per_page(&self) -> u32 {
        self.per_page.max(1)
    }

    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * self.effective_per_page() as i64
    }

    pub fn limit(&self) -> i64 {
        self.effective_per_page() as i64
    }
}

/// Paginated result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, params: PaginationParams) -> Self {
        let per_page = params.effective_per_page();
        let total_pages = total.div_ceil(per_page as u64) as u32;
        Self {
            items,
            total,
            page: params.page,
            per_page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_per_page_is_treated_as_one() {
        let params = PaginationParams { page: 1, per_page: 0 };
        assert_eq!(params.limit(), 1);
        assert_eq!(params.offset(), 0);

        let page = PaginatedResult::<u32>::new(Vec::new(), 5, params);
        assert_eq!(page.per_page, 1);
        assert_eq!(page.total_pages, 5);
    }

    #[test]
    fn total_pages_rounds_up() {
        let params = PaginationParams { page: 2, per_page: 2 };
        assert_eq!(params.offset(), 2);

        let page = PaginatedResult::<u32>::new(Vec::new(), 3, params);
        assert_eq!(page.total_pages, 2);
    }
}

//! Offset pagination shared by the paginated list endpoints.

use serde::{Deserialize, Serialize};

use crate::error::PageError;

pub const MAX_PAGE_SIZE: i64 = 100;

/// A 1-based page request. Construct through [`PageRequest::new`] to get
/// the range checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: i64,
    size: i64,
}

impl PageRequest {
    pub fn new(number: i64, size: i64) -> Result<Self, PageError> {
        if number < 1 {
            return Err(PageError::InvalidPageNumber);
        }
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(PageError::InvalidPageSize);
        }
        Ok(Self { number, size })
    }

    pub fn number(&self) -> i64 {
        self.number
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.size
    }

    pub fn limit(&self) -> i64 {
        self.size
    }
}

/// One page of results plus the totals needed to render a pager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_count: i64) -> Self {
        let size = request.size();
        Self {
            items,
            current_page: request.number(),
            page_size: size,
            total_count,
            total_pages: (total_count + size - 1) / size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_bounds() {
        assert_eq!(PageRequest::new(0, 10), Err(PageError::InvalidPageNumber));
        assert_eq!(PageRequest::new(1, 0), Err(PageError::InvalidPageSize));
        assert_eq!(PageRequest::new(1, 101), Err(PageError::InvalidPageSize));
        assert!(PageRequest::new(1, 100).is_ok());
    }

    #[test]
    fn test_offset() {
        let req = PageRequest::new(3, 20).unwrap();
        assert_eq!(req.offset(), 40);
        assert_eq!(req.limit(), 20);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let req = PageRequest::new(1, 10).unwrap();
        assert_eq!(Page::new(Vec::<i32>::new(), req, 0).total_pages, 0);
        assert_eq!(Page::new(Vec::<i32>::new(), req, 10).total_pages, 1);
        assert_eq!(Page::new(Vec::<i32>::new(), req, 11).total_pages, 2);
    }
}

//! Paged listings.

use serde::{Deserialize, Serialize};

/// One page of a listing, as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub content: Vec<T>,
    /// Zero-based page number.
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Paged<T> {
    /// Check if a later page exists.
    pub fn has_next(&self) -> bool {
        self.number.saturating_add(1) < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::PlacedOrder;

    #[test]
    fn test_paged() {
        let page: Paged<PlacedOrder> = serde_json::from_str(
            r#"{"content": [{"id": 1}], "number": 0, "size": 1, "totalElements": 2, "totalPages": 2}"#,
        )
        .unwrap();
        assert_eq!(page.content.len(), 1);
        assert!(page.has_next());
    }

    #[test]
    fn test_last_page_has_no_next() {
        let page: Paged<u32> = serde_json::from_str(
            r#"{"content": [], "number": 0, "size": 20, "totalElements": 0, "totalPages": 0}"#,
        )
        .unwrap();
        assert!(!page.has_next());
    }
}

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::constants::DEFAULT_PAGE_SIZE;

/// Sort direction for list endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// Pagination and sorting parameters for list endpoints.
#[derive(Debug, Clone)]
pub struct PageParams {
    /// Page number, 1-based.
    pub page: u32,
    pub page_size: u32,
    pub sort_by: Option<String>,
    pub order: Option<SortOrder>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            order: None,
        }
    }
}

impl PageParams {
    /// Render as query parameters in the backend's expected names.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];
        if let Some(ref sort_by) = self.sort_by {
            query.push(("sort_by", sort_by.clone()));
        }
        if let Some(order) = self.order {
            query.push(("order", order.to_string()));
        }
        query
    }
}

/// Pagination metadata returned beside list data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params() {
        let params = PageParams::default();
        assert_eq!(params.page, 1);
        assert_eq!(params.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(params.to_query().len(), 2);
    }

    #[test]
    fn query_includes_sort_when_set() {
        let params = PageParams {
            sort_by: Some("uploaded_at".to_string()),
            order: Some(SortOrder::Desc),
            ..PageParams::default()
        };
        let query = params.to_query();
        assert!(query.contains(&("sort_by", "uploaded_at".to_string())));
        assert!(query.contains(&("order", "desc".to_string())));
    }
}

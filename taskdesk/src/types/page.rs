use serde::{Deserialize, Serialize};

/// Parameters of one page fetch. Two requests are the same logical fetch
/// exactly when they compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
    /// Free-text search; empty means no search.
    pub search: String,
    /// Entity-specific secondary filter (task status code).
    pub filter: Option<String>,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            search: String::new(),
            filter: None,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    /// Query-string pairs; empty search and filter are left out.
    pub fn query(&self, filter_key: &'static str) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", self.page.to_string()),
            ("limit", self.page_size.to_string()),
        ];
        if !self.search.is_empty() {
            query.push(("search", self.search.clone()));
        }
        if let Some(f) = self.filter.as_deref().filter(|f| !f.is_empty()) {
            query.push((filter_key, f.to_string()));
        }
        query
    }
}

/// One page of entities plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub current_page: u32,
    /// Never below 1, even for an empty result.
    pub total_pages: u32,
    pub page_size: u32,
}

impl<T> PageResult<T> {
    pub fn empty(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
            current_page: 1,
            total_pages: 1,
            page_size,
        }
    }

    /// Normalise a wire envelope, filling gaps from the request that
    /// produced it.
    pub fn from_envelope(envelope: PageEnvelope<T>, request: &PageRequest) -> Self {
        let pagination = envelope.pagination.unwrap_or_default();
        let total_items = pagination.total.unwrap_or(0);
        let page_size = pagination
            .limit
            .filter(|&l| l > 0)
            .unwrap_or(request.page_size);
        let total_pages = if total_items == 0 {
            1
        } else {
            pagination
                .total_pages
                .filter(|&p| p > 0)
                .unwrap_or_else(|| page_count(total_items, page_size))
        };
        let items = if total_items == 0 {
            Vec::new()
        } else {
            envelope.data.unwrap_or_default()
        };

        Self {
            items,
            total_items,
            current_page: pagination
                .page
                .filter(|&p| p > 0)
                .unwrap_or(request.page),
            total_pages,
            page_size,
        }
    }
}

/// Paginated list body as sent by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct PageEnvelope<T> {
    pub data: Option<Vec<T>>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: Option<u64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub total_pages: Option<u32>,
}

/// Number of pages needed for `total_items` rows; at least one.
pub fn page_count(total_items: u64, page_size: u32) -> u32 {
    if total_items == 0 || page_size == 0 {
        return 1;
    }
    total_items.div_ceil(page_size as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(23, 10), 3);
    }

    #[test]
    fn test_query_omits_empty_search_and_filter() {
        let req = PageRequest::new(2, 10);
        assert_eq!(
            req.query("status"),
            vec![("page", "2".to_string()), ("limit", "10".to_string())]
        );

        let req = PageRequest::new(1, 10)
            .with_search("TSK-1")
            .with_filter(Some("I".into()));
        let q = req.query("status");
        assert!(q.contains(&("search", "TSK-1".to_string())));
        assert!(q.contains(&("status", "I".to_string())));
    }

    #[test]
    fn test_new_clamps_to_first_page() {
        assert_eq!(PageRequest::new(0, 0).page, 1);
        assert_eq!(PageRequest::new(0, 0).page_size, 1);
    }

    #[test]
    fn test_envelope_defaults_fill_from_request() {
        let env: PageEnvelope<u32> = serde_json::from_str(r#"{"data": null}"#).unwrap();
        let page = PageResult::from_envelope(env, &PageRequest::new(3, 10));
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page_size, 10);
    }

    #[test]
    fn test_envelope_without_total_pages_derives_them() {
        let env: PageEnvelope<u32> = serde_json::from_str(
            r#"{"data": [21, 22, 23], "pagination": {"total": 23, "page": 3, "limit": 10}}"#,
        )
        .unwrap();
        let page = PageResult::from_envelope(env, &PageRequest::new(3, 10));
        assert_eq!(page.total_items, 23);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.total_pages, 3);
        assert!(page.current_page <= page.total_pages);

        // No limit either: the requested page size is used.
        let env: PageEnvelope<u32> =
            serde_json::from_str(r#"{"data": [1], "pagination": {"total": 41}}"#).unwrap();
        let page = PageResult::from_envelope(env, &PageRequest::new(1, 20));
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_envelope_zero_total_reports_one_page() {
        let env: PageEnvelope<u32> = serde_json::from_str(
            r#"{"data": [], "pagination": {"total": 0, "page": 1, "limit": 10, "totalPages": 0}}"#,
        )
        .unwrap();
        let page = PageResult::from_envelope(env, &PageRequest::new(1, 10));
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }
}

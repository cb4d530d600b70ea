//! Cursor pagination for the guild member list
//!
//! Discord pages members by user id: each request asks for up to
//! `limit` members whose id is greater than `after`.

/// Maximum page size Discord accepts for the member list.
pub const MAX_MEMBER_PAGE_SIZE: usize = 1000;

/// Cursor state for walking the member list.
#[derive(Debug, Clone)]
pub struct MemberCursor {
    /// Items per page
    pub limit: usize,
    /// Highest user id seen so far
    pub after: Option<String>,
    done: bool,
}

impl Default for MemberCursor {
    fn default() -> Self {
        Self::new(MAX_MEMBER_PAGE_SIZE)
    }
}

impl MemberCursor {
    /// Create a cursor with the given page size (clamped to 1..=1000).
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.clamp(1, MAX_MEMBER_PAGE_SIZE),
            after: None,
            done: false,
        }
    }

    /// Query parameters for the next request.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("limit", self.limit.to_string())];
        if let Some(ref after) = self.after {
            params.push(("after", after.clone()));
        }
        params
    }

    /// Record a fetched page.
    ///
    /// `last_id` is the id of the last member in the page. A short page
    /// (fewer than `limit` items) ends the walk.
    pub fn advance(&mut self, page_len: usize, last_id: Option<&str>) {
        match last_id {
            Some(id) if page_len >= self.limit => self.after = Some(id.to_string()),
            _ => self.done = true,
        }
    }

    /// Whether another request is needed.
    pub fn has_more(&self) -> bool {
        !self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_params() {
        let cursor = MemberCursor::default();
        assert_eq!(cursor.to_query_params(), vec![("limit", "1000".to_string())]);
        assert!(cursor.has_more());
    }

    #[test]
    fn test_full_page_advances_cursor() {
        let mut cursor = MemberCursor::new(2);
        cursor.advance(2, Some("200"));

        assert!(cursor.has_more());
        assert_eq!(
            cursor.to_query_params(),
            vec![("limit", "2".to_string()), ("after", "200".to_string())]
        );
    }

    #[test]
    fn test_short_page_finishes() {
        let mut cursor = MemberCursor::new(2);
        cursor.advance(1, Some("300"));
        assert!(!cursor.has_more());
    }

    #[test]
    fn test_empty_page_finishes() {
        let mut cursor = MemberCursor::new(2);
        cursor.advance(0, None);
        assert!(!cursor.has_more());
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(MemberCursor::new(0).limit, 1);
        assert_eq!(MemberCursor::new(5000).limit, MAX_MEMBER_PAGE_SIZE);
    }
}

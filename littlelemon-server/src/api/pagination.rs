//! Page-number pagination
//!
//! Active only when a page size is configured. Pages are 1-based and
//! selected with `?page=N` (`?page=last` picks the final page).

use serde::Serialize;

use super::extract::RequestContext;
use crate::AppError;
use crate::db::repository::ListQuery;

pub const PAGE_PARAM: &str = "page";
pub const INVALID_PAGE: &str = "Invalid page.";

/// Paginated list envelope
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// A resolved, in-range page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u32,
    pub num_pages: u64,
}

impl Page {
    /// Resolve the `page` parameter against a result count
    ///
    /// An empty result still has one (empty) page.
    pub fn resolve(raw: Option<&str>, size: u32, count: i64) -> Result<Self, AppError> {
        let count = u64::try_from(count).unwrap_or(0);
        let num_pages = count.div_ceil(u64::from(size)).max(1);
        let number = match raw.map(str::trim) {
            None | Some("") => 1,
            Some("last") => num_pages,
            Some(n) => n
                .parse::<u64>()
                .map_err(|_| AppError::not_found(INVALID_PAGE))?,
        };
        if number == 0 || number > num_pages {
            return Err(AppError::not_found(INVALID_PAGE));
        }
        Ok(Self {
            number,
            size,
            num_pages,
        })
    }

    /// Narrow a list query to this page's window
    pub fn window(&self, query: ListQuery) -> ListQuery {
        ListQuery {
            limit: Some(i64::from(self.size)),
            offset: (self.number as i64 - 1) * i64::from(self.size),
            ..query
        }
    }

    pub fn paginate<T>(
        self,
        count: i64,
        results: Vec<T>,
        ctx: &RequestContext,
    ) -> PaginatedResponse<T> {
        let next = (self.number < self.num_pages).then(|| page_link(ctx, Some(self.number + 1)));
        let previous = (self.number > 1).then(|| {
            // The first page is addressed without a page parameter
            let previous = self.number - 1;
            page_link(ctx, (previous > 1).then_some(previous))
        });
        PaginatedResponse {
            count,
            next,
            previous,
            results,
        }
    }
}

/// This request's URL with the page parameter replaced (or dropped)
fn page_link(ctx: &RequestContext, page: Option<u64>) -> String {
    let mut pairs: Vec<String> = ctx
        .query
        .as_deref()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some(PAGE_PARAM))
        .map(str::to_owned)
        .collect();
    if let Some(page) = page {
        pairs.push(format!("{PAGE_PARAM}={page}"));
    }
    ctx.with_query(&pairs.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(query: Option<&str>) -> RequestContext {
        RequestContext {
            base_url: "http://testserver".to_string(),
            path: "/api/menu".to_string(),
            query: query.map(str::to_owned),
        }
    }

    #[test]
    fn test_resolve_pages() {
        assert_eq!(Page::resolve(None, 2, 5).unwrap().number, 1);
        assert_eq!(Page::resolve(Some("3"), 2, 5).unwrap().number, 3);
        assert_eq!(Page::resolve(Some("last"), 2, 5).unwrap().number, 3);
        assert_eq!(Page::resolve(None, 2, 0).unwrap().num_pages, 1);
    }

    #[test]
    fn test_invalid_pages() {
        for raw in ["0", "4", "-1", "two"] {
            let err = Page::resolve(Some(raw), 2, 5).unwrap_err();
            assert!(matches!(err, AppError::NotFound(msg) if msg == INVALID_PAGE), "{raw}");
        }
    }

    #[test]
    fn test_window() {
        let page = Page::resolve(Some("2"), 10, 25).unwrap();
        let query = page.window(ListQuery::search("salad"));
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.offset, 10);
        assert_eq!(query.search.as_deref(), Some("salad"));
    }

    #[test]
    fn test_links_keep_other_parameters() {
        let page = Page::resolve(Some("2"), 1, 3).unwrap();
        let response = page.paginate(3, vec![()], &ctx(Some("search=a&page=2")));
        assert_eq!(
            response.next.as_deref(),
            Some("http://testserver/api/menu/?search=a&page=3")
        );
        assert_eq!(
            response.previous.as_deref(),
            Some("http://testserver/api/menu/?search=a")
        );
    }

    #[test]
    fn test_last_page_has_no_next() {
        let page = Page::resolve(Some("3"), 1, 3).unwrap();
        let response = page.paginate(3, vec![()], &ctx(Some("page=3")));
        assert_eq!(response.next, None);
        assert_eq!(
            response.previous.as_deref(),
            Some("http://testserver/api/menu/?page=2")
        );
    }
}

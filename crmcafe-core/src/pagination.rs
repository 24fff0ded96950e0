use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Client-supplied paging parameters. Any of them may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page,
            limit,
            offset: None,
        }
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Build a request from raw query-string values. Anything that is not
    /// a finite number is treated as missing.
    pub fn from_params(page: Option<&str>, limit: Option<&str>, offset: Option<&str>) -> Self {
        Self {
            page: page.and_then(parse_param),
            limit: limit.and_then(parse_param),
            offset: offset.and_then(parse_param),
        }
    }
}

fn parse_param(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    // `as` saturates at the i64 bounds
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
}

/// Normalised `LIMIT` / `OFFSET` pair, safe to hand to the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageBounds {
    pub limit: i64,
    pub offset: i64,
}

/// Clamp a page request into bounds: `limit` in `[1, MAX_LIMIT]`, and an
/// `offset` that is never negative. A missing offset is derived from the
/// page number and the clamped limit.
pub fn build_pagination(request: PageRequest) -> PageBounds {
    let page = request.page.unwrap_or(DEFAULT_PAGE);
    let limit = request.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = match request.offset {
        Some(offset) => offset,
        None => page.saturating_sub(1).saturating_mul(limit),
    };
    PageBounds {
        limit,
        offset: offset.max(0),
    }
}

/// Paging summary returned alongside list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl PageInfo {
    pub fn new(bounds: PageBounds, total: i64) -> Self {
        let total = total.max(0);
        let limit = bounds.limit.max(1);
        Self {
            page: (bounds.offset / limit).saturating_add(1),
            limit,
            total,
            pages: total / limit + i64::from(total % limit != 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(page: Option<i64>, limit: Option<i64>) -> PageBounds {
        build_pagination(PageRequest::new(page, limit))
    }

    #[test]
    fn defaults_to_first_page_of_twenty() {
        assert_eq!(
            build_pagination(PageRequest::default()),
            PageBounds { limit: 20, offset: 0 }
        );
        assert_eq!(bounds(Some(1), Some(20)), PageBounds { limit: 20, offset: 0 });
    }

    #[test]
    fn offset_follows_page_number() {
        assert_eq!(bounds(Some(3), Some(10)), PageBounds { limit: 10, offset: 20 });
        assert_eq!(bounds(Some(2), None), PageBounds { limit: 20, offset: 20 });
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(bounds(None, Some(500)), PageBounds { limit: 100, offset: 0 });
        assert_eq!(bounds(None, Some(0)).limit, 1);
        assert_eq!(bounds(None, Some(-7)).limit, 1);
        assert_eq!(bounds(None, Some(i64::MAX)).limit, MAX_LIMIT);
        assert_eq!(bounds(None, Some(i64::MIN)).limit, 1);
    }

    #[test]
    fn derived_offset_uses_clamped_limit() {
        assert_eq!(bounds(Some(2), Some(1000)), PageBounds { limit: 100, offset: 100 });
        assert_eq!(bounds(Some(4), Some(0)), PageBounds { limit: 1, offset: 3 });
    }

    #[test]
    fn limit_stays_in_range_for_any_input() {
        for limit in [-1_000_000, -1, 0, 1, 2, 50, 99, 100, 101, 1_000_000] {
            let b = bounds(Some(1), Some(limit));
            assert!((1..=MAX_LIMIT).contains(&b.limit), "limit {limit}");
        }
    }

    #[test]
    fn offset_never_negative() {
        assert_eq!(bounds(Some(0), Some(10)).offset, 0);
        assert_eq!(bounds(Some(-5), Some(10)).offset, 0);
        assert_eq!(bounds(Some(i64::MIN), Some(10)).offset, 0);
        let explicit = build_pagination(PageRequest::new(Some(3), Some(10)).with_offset(-4));
        assert_eq!(explicit.offset, 0);
    }

    #[test]
    fn explicit_offset_wins_over_page() {
        let b = build_pagination(PageRequest::new(Some(3), Some(10)).with_offset(5));
        assert_eq!(b, PageBounds { limit: 10, offset: 5 });
    }

    #[test]
    fn huge_page_saturates() {
        assert_eq!(bounds(Some(i64::MAX), Some(100)).offset, i64::MAX);
    }

    #[test]
    fn raw_params_fall_back_to_defaults() {
        let req = PageRequest::from_params(Some("abc"), Some("NaN"), Some("inf"));
        assert_eq!(req, PageRequest::default());
        assert_eq!(build_pagination(req), PageBounds { limit: 20, offset: 0 });
    }

    #[test]
    fn raw_params_are_parsed() {
        let req = PageRequest::from_params(Some(" 3 "), Some("10.9"), None);
        assert_eq!(req, PageRequest::new(Some(3), Some(10)));
        let huge = PageRequest::from_params(None, Some("1e300"), None);
        assert_eq!(build_pagination(huge).limit, MAX_LIMIT);
    }

    #[test]
    fn same_input_same_bounds() {
        let req = PageRequest::new(Some(7), Some(13));
        assert_eq!(build_pagination(req), build_pagination(req));
    }

    #[test]
    fn page_info_summarises_bounds() {
        let info = PageInfo::new(PageBounds { limit: 10, offset: 20 }, 45);
        assert_eq!(
            info,
            PageInfo {
                page: 3,
                limit: 10,
                total: 45,
                pages: 5
            }
        );
        assert_eq!(PageInfo::new(PageBounds { limit: 20, offset: 0 }, 0).pages, 0);
        assert_eq!(PageInfo::new(PageBounds { limit: 20, offset: 0 }, 40).pages, 2);
    }

    #[test]
    fn page_info_saturates_on_huge_offset() {
        let req = PageRequest::from_params(None, Some("1"), Some("9223372036854775807"));
        let bounds = build_pagination(req);
        assert_eq!(bounds, PageBounds { limit: 1, offset: i64::MAX });

        let info = PageInfo::new(bounds, 0);
        assert_eq!(info.page, i64::MAX);
        assert_eq!(info.pages, 0);
    }
}

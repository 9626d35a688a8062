use super::types::PaginationParams;

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 100;

pub fn validate_pagination(page: Option<u32>, limit: Option<u32>) -> PaginationParams {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
    PaginationParams { page, limit }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_is_clamped() {
        assert_eq!(
            validate_pagination(Some(0), Some(1000)),
            PaginationParams { page: 1, limit: 100 }
        );
        assert_eq!(
            validate_pagination(None, None),
            PaginationParams { page: 1, limit: 20 }
        );
    }
}

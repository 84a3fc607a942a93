//! Pagination and sorting primitives for catalog reads.
//!
//! A `PageRequest` constrains page index (>= 0 by type), page size (> 0,
//! checked at construction) and an optional sort key/direction. A `Page<T>`
//! is a bounded slice of the result set plus index/size/total metadata.
//! Defaults mirror the wire contract: page 0, size 20, sort by id
//! descending.

use crate::core::error::ShelfError;
use clap::ValueEnum;
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Id,
    Name,
    Price,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortKey {
    /// Column backing this sort key. Prices sort by their exact
    /// minor-unit representation.
    pub(crate) fn column(self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::Price => "price_cents",
        }
    }
}

impl SortDirection {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Parse a wire-style sort spec: `"id,desc"`, `"name,asc"`, or a bare key
/// (`"price"`), which sorts ascending.
pub fn parse_sort(spec: &str) -> Result<(SortKey, SortDirection), ShelfError> {
    let mut parts = spec.splitn(2, ',');
    let key = match parts.next().unwrap_or("").trim() {
        "id" => SortKey::Id,
        "name" => SortKey::Name,
        "price" => SortKey::Price,
        other => {
            return Err(ShelfError::ValidationError(format!(
                "unknown sort key '{}' (expected id, name, or price)",
                other
            )));
        }
    };
    let direction = match parts.next().map(str::trim) {
        None => SortDirection::Asc,
        Some("asc") => SortDirection::Asc,
        Some("desc") => SortDirection::Desc,
        Some(other) => {
            return Err(ShelfError::ValidationError(format!(
                "unknown sort direction '{}' (expected asc or desc)",
                other
            )));
        }
    };
    Ok((key, direction))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: SortKey,
    pub direction: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: SortKey::Id,
            direction: SortDirection::Desc,
        }
    }
}

impl PageRequest {
    pub fn new(
        page: u32,
        size: u32,
        sort: SortKey,
        direction: SortDirection,
    ) -> Result<Self, ShelfError> {
        if size == 0 {
            return Err(ShelfError::ValidationError(
                "page size must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            page,
            size,
            sort,
            direction,
        })
    }

    /// Row offset of the first element of this page.
    pub(crate) fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// A bounded slice of a larger ordered result set plus metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: &PageRequest, total_items: u64) -> Self {
        let size = u64::from(request.size);
        let total_pages = total_items.div_ceil(size).min(u64::from(u32::MAX)) as u32;
        Self {
            items,
            page: request.page,
            size: request.size,
            total_items,
            total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Project every element, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort_key_and_direction() {
        assert_eq!(parse_sort("id,desc").unwrap(), (SortKey::Id, SortDirection::Desc));
        assert_eq!(parse_sort("name,asc").unwrap(), (SortKey::Name, SortDirection::Asc));
        assert_eq!(parse_sort("price").unwrap(), (SortKey::Price, SortDirection::Asc));
    }

    #[test]
    fn test_parse_sort_rejects_unknown() {
        assert!(parse_sort("sku,desc").is_err());
        assert!(parse_sort("id,sideways").is_err());
        assert!(parse_sort("").is_err());
    }

    #[test]
    fn test_page_request_rejects_zero_size() {
        let err = PageRequest::new(0, 0, SortKey::Id, SortDirection::Desc).unwrap_err();
        assert!(err.to_string().contains("page size"));
    }

    #[test]
    fn test_page_metadata() {
        let req = PageRequest::new(1, 10, SortKey::Id, SortDirection::Desc).unwrap();
        let page: Page<u32> = Page::new(vec![1, 2, 3], &req, 23);
        assert_eq!(page.page, 1);
        assert_eq!(page.size, 10);
        assert_eq!(page.total_items, 23);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_empty_result_has_zero_pages() {
        let page: Page<u32> = Page::new(vec![], &PageRequest::default(), 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.is_empty());
    }
}

//! Page slicing for collection reads.
//!
//! Collections are cached whole; a page is cut from the cached or freshly
//! loaded list on every request.

use libris_http::AppError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Raw `?page=&pageSize=` query. Kept as text so bad values get our own 400.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

impl PageParams {
    pub fn resolve(&self) -> Result<PageRequest, AppError> {
        Ok(PageRequest {
            page: positive(self.page.as_deref(), DEFAULT_PAGE, "Invalid page number")?,
            page_size: positive(
                self.page_size.as_deref(),
                DEFAULT_PAGE_SIZE,
                "Invalid page size",
            )?,
        })
    }
}

fn positive(raw: Option<&str>, default: usize, message: &str) -> Result<usize, AppError> {
    match raw {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(AppError::bad_request(message)),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    pub fn slice<T>(self, records: Vec<T>) -> Page<T> {
        let total = records.len();
        let start = (self.page - 1).saturating_mul(self.page_size).min(total);
        let end = start.saturating_add(self.page_size).min(total);

        Page {
            page: self.page,
            page_size: self.page_size,
            total,
            total_pages: total.div_ceil(self.page_size),
            data: records.into_iter().skip(start).take(end - start).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, page_size: Option<&str>) -> PageParams {
        PageParams {
            page: page.map(str::to_string),
            page_size: page_size.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(
            PageParams::default().resolve().unwrap(),
            PageRequest {
                page: 1,
                page_size: 5
            }
        );
    }

    #[test]
    fn test_rejects_non_positive_and_non_numeric() {
        for (page, size) in [
            (Some("0"), None),
            (Some("-1"), None),
            (Some("two"), None),
            (None, Some("0")),
            (None, Some("")),
        ] {
            assert!(params(page, size).resolve().is_err(), "{page:?} {size:?}");
        }
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        for (total, size, pages) in [(0, 5, 0), (1, 5, 1), (5, 5, 1), (6, 5, 2), (11, 3, 4)] {
            let page = PageRequest {
                page: 1,
                page_size: size,
            }
            .slice((0..total).collect::<Vec<_>>());
            assert_eq!(page.total, total);
            assert_eq!(page.total_pages, pages, "{total}/{size}");
        }
    }

    #[test]
    fn test_slices_requested_page() {
        let records: Vec<u32> = (1..=12).collect();

        let second = PageRequest {
            page: 2,
            page_size: 5,
        }
        .slice(records.clone());
        assert_eq!(second.data, vec![6, 7, 8, 9, 10]);

        let last = PageRequest {
            page: 3,
            page_size: 5,
        }
        .slice(records.clone());
        assert_eq!(last.data, vec![11, 12]);

        let beyond = PageRequest {
            page: 40,
            page_size: 5,
        }
        .slice(records);
        assert!(beyond.data.is_empty());
        assert_eq!(beyond.total, 12);
    }

    #[test]
    fn test_envelope_uses_camel_case() {
        let page = PageRequest {
            page: 1,
            page_size: 2,
        }
        .slice(vec!["a", "b", "c"]);
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["pageSize"], 2);
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["data"], serde_json::json!(["a", "b"]));
    }
}

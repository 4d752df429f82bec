//! Client-side filtering and pagination of a fetched record set

use serde::Serialize;

use crate::resource::Resource;

/// Rows shown per page
pub const PAGE_SIZE: usize = 10;

/// One visible page of a filtered record set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, R> {
    /// Records on this page, in source order
    pub items: Vec<&'a R>,
    /// 1-based page actually shown, after clamping
    pub page: usize,
    /// Zero when nothing matches
    pub total_pages: usize,
    /// Records matching the search term across all pages
    pub total_matches: usize,
}

impl<R> Page<'_, R> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Number of pages needed for `count` records
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Clamp a requested 1-based page into the valid range
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Records whose search fields contain `term`, case-insensitively.
///
/// The term is matched as typed, surrounding whitespace included.
pub fn filter<'a, R: Resource>(records: &'a [R], term: &str) -> Vec<&'a R> {
    let needle = term.to_lowercase();
    records.iter().filter(|r| r.matches(&needle)).collect()
}

/// Filter `records` by `term` and cut out the requested page.
///
/// A page past the end is clamped to the last page rather than producing an
/// empty slice; page 0 is treated as page 1.
pub fn paginate<'a, R: Resource>(
    records: &'a [R],
    term: &str,
    page: usize,
    page_size: usize,
) -> Page<'a, R> {
    let filtered = filter(records, term);
    let total_matches = filtered.len();
    let total_pages = total_pages(total_matches, page_size);
    let page = clamp_page(page, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_matches);
    let items = if start < end {
        filtered[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items,
        page,
        total_pages,
        total_matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Airport, Flight};

    fn airports(n: usize) -> Vec<Airport> {
        (1..=n)
            .map(|i| Airport {
                name: format!("Airport {i:02}"),
            })
            .collect()
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(23, 10), 3);
    }

    #[test]
    fn test_third_page_of_23() {
        let records = airports(23);
        let page = paginate(&records, "", 3, PAGE_SIZE);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 3);
        let names: Vec<_> = page.items.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Airport 21", "Airport 22", "Airport 23"]);
        assert!(!page.has_next());
        assert!(page.has_prev());
    }

    #[test]
    fn test_pages_partition_the_set() {
        for n in [0, 1, 9, 10, 11, 20, 37] {
            let records = airports(n);
            let pages = total_pages(n, PAGE_SIZE);
            assert_eq!(paginate(&records, "", 1, PAGE_SIZE).total_pages, pages);

            let mut seen = Vec::new();
            for p in 1..=pages {
                let page = paginate(&records, "", p, PAGE_SIZE);
                assert!(!page.is_empty());
                seen.extend(page.items.into_iter().cloned());
            }
            assert_eq!(seen, records, "pages of {n} records must be disjoint and ordered");
        }
    }

    #[test]
    fn test_page_past_end_is_clamped() {
        let records = airports(23);
        let page = paginate(&records, "Airport 0", 3, PAGE_SIZE);
        assert_eq!(page.total_matches, 9);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 9);
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let records = airports(5);
        let page = paginate(&records, "", 0, PAGE_SIZE);
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 5);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let records = vec![
            Airport {
                name: "Heathrow".to_string(),
            },
            Airport {
                name: "Gatwick".to_string(),
            },
            Airport {
                name: "heathrow terminal 5".to_string(),
            },
        ];
        let page = paginate(&records, "HEATH", 1, PAGE_SIZE);
        assert_eq!(page.total_matches, 2);
        assert!(page.items.iter().all(|a| a.name.to_lowercase().contains("heath")));
    }

    #[test]
    fn test_filter_keeps_whitespace_in_term() {
        let records = vec![
            Airport {
                name: "Newark".to_string(),
            },
            Airport {
                name: "New York JFK".to_string(),
            },
        ];
        let page = paginate(&records, "New ", 1, PAGE_SIZE);
        assert_eq!(page.total_matches, 1);
        assert_eq!(page.items[0].name, "New York JFK");
    }

    #[test]
    fn test_no_match_yields_empty_page() {
        let records = vec![Flight {
            date: "2024-01-01".to_string(),
            duration: 60,
            distance: 300,
            airline: "Lufthansa".to_string(),
            origin: None,
            destination: None,
        }];
        let page = paginate(&records, "JFK", 1, PAGE_SIZE);
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 1);
    }
}

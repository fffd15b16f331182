//! Search and pagination for the list pages.

use mercantil_common::{Customer, Supplier};
use serde::Serialize;

/// Text fields a list query is matched against.
pub trait Searchable {
    fn search_fields(&self) -> Vec<String>;
}

impl Searchable for Customer {
    fn search_fields(&self) -> Vec<String> {
        vec![
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone().unwrap_or_default(),
        ]
    }
}

impl Searchable for Supplier {
    fn search_fields(&self) -> Vec<String> {
        vec![self.company_name.clone(), self.email.clone().unwrap_or_default()]
    }
}

/// Case-insensitive substring filter. A blank query keeps everything.
pub fn filter<T: Searchable>(items: Vec<T>, query: &str) -> Vec<T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| {
            item.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev: usize,
    pub next: usize,
    pub pages: Vec<usize>,
}

/// Slice out one page. `page` is 1-based and clamped into range.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);
    let page = page.clamp(1, total_pages.max(1));

    let start = ((page - 1) * page_size).min(total_items);
    let end = (page * page_size).min(total_items);
    let items: Vec<T> = items.into_iter().skip(start).take(end - start).collect();

    Page {
        items,
        page,
        total_pages,
        total_items,
        has_prev: page > 1,
        has_next: page < total_pages,
        prev: page.saturating_sub(1).max(1),
        next: (page + 1).min(total_pages.max(1)),
        pages: (1..=total_pages).collect(),
    }
}

/// Lenient `page` query parameter: anything unparseable means page 1.
pub fn page_param(raw: Option<&str>) -> usize {
    raw.and_then(|p| p.trim().parse().ok()).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Row(&'static str, &'static str);

    impl Searchable for Row {
        fn search_fields(&self) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row("Maria Anders", "maria@alfreds.de"),
            Row("Ana Trujillo", "ana@trujillo.mx"),
            Row("Thomas Hardy", "thomas@around.uk"),
        ]
    }

    #[test]
    fn test_filter_is_case_insensitive_over_any_field() {
        let found = filter(rows(), "  TRUJILLO ");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, "Ana Trujillo");

        let by_email = filter(rows(), "around.uk");
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].0, "Thomas Hardy");
    }

    #[test]
    fn test_blank_query_keeps_all() {
        assert_eq!(filter(rows(), "   ").len(), 3);
    }

    #[test]
    fn test_customer_matches_email() {
        let customer = Customer {
            id: 1,
            first_name: "Hanna".into(),
            last_name: "Moos".into(),
            email: Some("hanna@blauer-see.de".into()),
            ..Default::default()
        };
        assert_eq!(filter(vec![customer], "blauer").len(), 1);
    }

    #[test]
    fn test_paginate_middle_page() {
        let page = paginate((1..=25).collect::<Vec<_>>(), 2, 10);
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert!(page.has_prev);
        assert!(page.has_next);
        assert_eq!(page.pages, vec![1, 2, 3]);
    }

    #[test]
    fn test_paginate_clamps_out_of_range() {
        let last = paginate((1..=25).collect::<Vec<_>>(), 99, 10);
        assert_eq!(last.page, 3);
        assert_eq!(last.items, vec![21, 22, 23, 24, 25]);
        assert!(!last.has_next);

        let first = paginate((1..=25).collect::<Vec<_>>(), 0, 10);
        assert_eq!(first.page, 1);
        assert!(!first.has_prev);
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate(Vec::<u8>::new(), 4, 10);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
        assert!(!page.has_next);
    }

    #[test]
    fn test_page_param() {
        assert_eq!(page_param(Some("3")), 3);
        assert_eq!(page_param(Some("abc")), 1);
        assert_eq!(page_param(None), 1);
    }
}

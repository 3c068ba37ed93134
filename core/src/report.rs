//! Report page construction and pagination math.
//!
//! A successful lookup becomes an ordered sequence of text pages, one page
//! per source database. Pages are bounded in size; a page that does not fit
//! is truncated with an explicit marker rather than spilling a field's text
//! onto a second page.

use serde_json::Value;

use crate::envelope::DatabaseSection;

/// Maximum page size, in characters.
pub const PAGE_CHAR_LIMIT: usize = 3500;

/// Appended to a page whose content exceeded [`PAGE_CHAR_LIMIT`].
pub const TRUNCATION_MARKER: &str = "\n\n...Some data did not fit this message";

/// Build the page sequence for a set of result sections.
///
/// Each section yields exactly one page: a header line with the database
/// name, the attribution line, then one line per field per record with a
/// blank line between records.
#[must_use]
pub fn build_pages(sections: &[DatabaseSection]) -> Vec<String> {
    sections.iter().map(build_page).collect()
}

fn build_page(section: &DatabaseSection) -> String {
    let mut lines = vec![section.name.clone(), String::new()];
    lines.push(format!("{}\n", section.info_leak));

    for record in &section.records {
        for (field, value) in record {
            lines.push(format!("{field}:  {}", render_value(value)));
        }
        lines.push(String::new());
    }

    truncate_page(lines.join("\n"))
}

/// Render a record field value as display text.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Cut a page down to [`PAGE_CHAR_LIMIT`] characters, marking the cut.
fn truncate_page(text: String) -> String {
    if text.chars().count() <= PAGE_CHAR_LIMIT {
        return text;
    }
    let mut truncated: String = text.chars().take(PAGE_CHAR_LIMIT).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

/// Resolve a requested page index against a page count, wrapping circularly.
///
/// A negative request wraps to the last page; a request past the end wraps
/// to the first. `count` must be non-zero.
#[must_use]
pub fn wrap_page_index(requested: i64, count: usize) -> usize {
    debug_assert!(count > 0);
    match usize::try_from(requested) {
        Ok(idx) if idx < count => idx,
        // Past the end wraps to the first page.
        Ok(_) => 0,
        // Negative wraps to the last page.
        Err(_) => count - 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn section(name: &str, records: Vec<serde_json::Map<String, Value>>) -> DatabaseSection {
        DatabaseSection {
            name: name.into(),
            info_leak: format!("{name} attribution"),
            records,
        }
    }

    fn record(fields: &[(&str, &str)]) -> serde_json::Map<String, Value> {
        fields
            .iter()
            .map(|(k, v)| ((*k).to_string(), Value::String((*v).to_string())))
            .collect()
    }

    #[test]
    fn one_page_per_section() {
        let sections = vec![
            section("A", vec![record(&[("Email", "a@x.com")])]),
            section("B", vec![record(&[("Phone", "123")])]),
            section("C", vec![]),
        ];
        let pages = build_pages(&sections);
        assert_eq!(pages.len(), 3);
        assert!(pages[0].starts_with("A\n"));
        assert!(pages[1].contains("Phone:  123"));
    }

    #[test]
    fn page_layout_has_header_attribution_and_fields() {
        let pages = build_pages(&[section(
            "SomeDB",
            vec![
                record(&[("Email", "a@x.com")]),
                record(&[("Email", "b@x.com")]),
            ],
        )]);
        let page = &pages[0];
        assert!(page.starts_with("SomeDB\n\nSomeDB attribution\n"));
        // Blank line between records.
        assert!(page.contains("Email:  a@x.com\n\nEmail:  b@x.com"));
    }

    #[test]
    fn non_string_values_render_as_json() {
        let mut rec = serde_json::Map::new();
        rec.insert("Count".into(), json!(7));
        let pages = build_pages(&[section("D", vec![rec])]);
        assert!(pages[0].contains("Count:  7"));
    }

    #[test]
    fn oversized_page_is_truncated_with_marker() {
        let big = "x".repeat(5000);
        let mut rec = serde_json::Map::new();
        rec.insert("Blob".into(), Value::String(big));
        let pages = build_pages(&[section("Big", vec![rec])]);
        assert!(pages[0].ends_with(TRUNCATION_MARKER));
        assert_eq!(
            pages[0].chars().count(),
            PAGE_CHAR_LIMIT + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn small_page_is_untouched() {
        let pages = build_pages(&[section("Small", vec![record(&[("K", "v")])])]);
        assert!(!pages[0].contains(TRUNCATION_MARKER));
    }

    #[test]
    fn wrap_negative_to_last() {
        assert_eq!(wrap_page_index(-1, 3), 2);
    }

    #[test]
    fn wrap_past_end_to_first() {
        assert_eq!(wrap_page_index(3, 3), 0);
    }

    #[test]
    fn in_range_is_identity() {
        assert_eq!(wrap_page_index(0, 3), 0);
        assert_eq!(wrap_page_index(2, 3), 2);
    }

    #[test]
    fn single_page_always_resolves_to_zero() {
        assert_eq!(wrap_page_index(-1, 1), 0);
        assert_eq!(wrap_page_index(0, 1), 0);
        assert_eq!(wrap_page_index(1, 1), 0);
    }
}

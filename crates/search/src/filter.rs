//! OData filter expressions for the search index.

/// Build a filter that excludes one category: `category ne '<value>'`.
///
/// Embedded single quotes are escaped by doubling them, so the expression
/// stays well-formed for any category value.
pub fn exclude_category(category: &str) -> String {
    format!("category ne '{}'", category.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclude_category() {
        assert_eq!(exclude_category("internal"), "category ne 'internal'");
    }

    #[test]
    fn test_exclude_category_escapes_quotes() {
        assert_eq!(
            exclude_category("Bob's docs"),
            "category ne 'Bob''s docs'"
        );
        // Every quote is doubled, not just the first
        assert_eq!(exclude_category("a'b'c"), "category ne 'a''b''c'");
    }
}

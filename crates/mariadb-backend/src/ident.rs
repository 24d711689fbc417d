//! MariaDB identifier quoting.
//!
//! Identifiers are wrapped in backticks; an embedded backtick is escaped by
//! doubling it. [`unquote_identifier`] only strips surrounding backticks and
//! does **not** collapse doubled ones, so a name containing a backtick does not
//! survive a quote/unquote round trip.
//!
//! # Example
//! ```
//! use mariadb_backend::{quote_identifier, unquote_identifier};
//!
//! assert_eq!(quote_identifier("order"), "`order`");
//! assert_eq!(unquote_identifier("`order`"), "order");
//! ```

/// The quote character used for identifiers.
pub const QUOTE: char = '`';

/// Quote an identifier so it can be used in a query.
pub fn quote_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    write_quoted(name, &mut out);
    out
}

/// Remove one surrounding quote character from each end of an identifier.
///
/// Used when a quoted table name has to be compared against catalog values.
pub fn unquote_identifier(quoted: &str) -> String {
    let inner = quoted.strip_prefix(QUOTE).unwrap_or(quoted);
    inner.strip_suffix(QUOTE).unwrap_or(inner).to_string()
}

/// Quote a `schema.table` pair, each part separately.
pub fn quote_qualified(schema: &str, name: &str) -> String {
    let mut out = String::with_capacity(schema.len() + name.len() + 5);
    write_quoted(schema, &mut out);
    out.push('.');
    write_quoted(name, &mut out);
    out
}

pub(crate) fn write_quoted(name: &str, out: &mut String) {
    out.push(QUOTE);
    for ch in name.chars() {
        if ch == QUOTE {
            out.push(QUOTE);
            out.push(QUOTE);
        } else {
            out.push(ch);
        }
    }
    out.push(QUOTE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_simple() {
        assert_eq!(quote_identifier("users"), "`users`");
    }

    #[test]
    fn quote_keeps_spaces_and_dots() {
        assert_eq!(quote_identifier("my table"), "`my table`");
        assert_eq!(quote_identifier("a.b"), "`a.b`");
    }

    #[test]
    fn quote_doubles_embedded_quote() {
        assert_eq!(quote_identifier("we`ird"), "`we``ird`");
        assert_eq!(quote_identifier("``"), "``````");
    }

    #[test]
    fn unquote_strips_surrounding_quotes() {
        assert_eq!(unquote_identifier("`users`"), "users");
        assert_eq!(unquote_identifier("users"), "users");
        assert_eq!(unquote_identifier("`users"), "users");
    }

    #[test]
    fn unquote_strips_only_one_quote_per_side() {
        assert_eq!(unquote_identifier("``a``"), "`a`");
        assert_eq!(unquote_identifier("`"), "");
    }

    #[test]
    fn unquote_does_not_collapse_doubled_quotes() {
        let quoted = quote_identifier("we`ird");
        assert_eq!(unquote_identifier(&quoted), "we``ird");
    }

    #[test]
    fn qualified_name() {
        assert_eq!(quote_qualified("shop", "orders"), "`shop`.`orders`");
    }
}

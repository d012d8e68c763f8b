//! PostgREST query-string builder and `Content-Range` parsing.

use std::fmt::Display;

use crate::domain::PageRequest;

/// Characters with meaning inside PostgREST filter values.
const RESERVED: [char; 7] = [',', '(', ')', '"', '*', '%', '\\'];

/// Sort direction for [`Query::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Direction {
    Asc,
    Desc,
}

impl Direction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Query parameters for one PostgREST request.
///
/// Filters accumulate; the same column may appear more than once (for
/// example a price range).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct Query {
    pairs: Vec<(String, String)>,
    order: Vec<String>,
}

impl Query {
    /// Start a query selecting `columns` (PostgREST select syntax).
    pub(super) fn select(columns: &str) -> Self {
        Self::default().param("select", columns)
    }

    /// A query with filters only, for writes and counts.
    pub(super) fn filter() -> Self {
        Self::default()
    }

    fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.pairs.push((key.to_owned(), value.into()));
        self
    }

    pub(super) fn eq(self, column: &str, value: impl Display) -> Self {
        self.param(column, format!("eq.{value}"))
    }

    pub(super) fn gte(self, column: &str, value: impl Display) -> Self {
        self.param(column, format!("gte.{value}"))
    }

    pub(super) fn lte(self, column: &str, value: impl Display) -> Self {
        self.param(column, format!("lte.{value}"))
    }

    /// Case-insensitive substring match on one column.
    pub(super) fn ilike(self, column: &str, needle: &str) -> Self {
        let pattern = format!("ilike.*{}*", sanitise(needle));
        self.param(column, pattern)
    }

    /// Case-insensitive substring match on any of `columns`.
    pub(super) fn any_ilike(self, columns: &[&str], needle: &str) -> Self {
        let needle = sanitise(needle);
        let alternatives = columns
            .iter()
            .map(|column| format!("{column}.ilike.*{needle}*"))
            .collect::<Vec<_>>()
            .join(",");
        self.param("or", format!("({alternatives})"))
    }

    /// Rows owned by `owner` or flagged public.
    pub(super) fn owned_or_public(self, owner: impl Display) -> Self {
        self.param("or", format!("(user_id.eq.{owner},is_public.eq.true)"))
    }

    /// Column value within `values`.
    pub(super) fn one_of<T: Display>(self, column: &str, values: &[T]) -> Self {
        let list = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.param(column, format!("in.({list})"))
    }

    /// Append a sort key. Earlier keys take precedence.
    pub(super) fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order.push(format!("{column}.{}", direction.as_str()));
        self
    }

    pub(super) fn limit(self, limit: u32) -> Self {
        self.param("limit", limit.to_string())
    }

    /// Apply a page window.
    pub(super) fn page(self, page: PageRequest) -> Self {
        self.limit(page.limit())
            .param("offset", page.offset().to_string())
    }

    /// Final key/value pairs in insertion order, sort keys last.
    pub(super) fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.pairs.clone();
        if !self.order.is_empty() {
            pairs.push(("order".to_owned(), self.order.join(",")));
        }
        pairs
    }
}

fn sanitise(raw: &str) -> String {
    raw.trim().chars().filter(|c| !RESERVED.contains(c)).collect()
}

/// Total row count from a `Content-Range` header such as `0-19/42` or
/// `*/0`. Returns `None` when the total is unknown (`*`) or malformed.
pub(super) fn content_range_total(header: Option<&str>) -> Option<u64> {
    let (_, total) = header?.rsplit_once('/')?;
    total.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rendered(query: &Query) -> Vec<(&str, &str)> {
        query
            .pairs
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect()
    }

    #[rstest]
    fn filters_render_postgrest_operators() {
        let query = Query::select("*")
            .eq("type_id", "abc")
            .gte("price", 10.5)
            .lte("price", 40);
        assert_eq!(
            rendered(&query),
            [
                ("select", "*"),
                ("type_id", "eq.abc"),
                ("price", "gte.10.5"),
                ("price", "lte.40"),
            ]
        );
    }

    #[rstest]
    fn search_terms_are_stripped_of_reserved_characters() {
        let query = Query::filter().any_ilike(&["name", "country"], " Lis(bon),* ");
        assert_eq!(
            rendered(&query),
            [("or", "(name.ilike.*Lisbon*,country.ilike.*Lisbon*)")]
        );
    }

    #[rstest]
    fn sort_keys_are_combined_into_one_order_parameter() {
        let pairs = Query::select("*")
            .order("like_count", Direction::Desc)
            .order("created_at", Direction::Desc)
            .pairs();
        assert_eq!(
            pairs.last(),
            Some(&("order".to_owned(), "like_count.desc,created_at.desc".to_owned()))
        );
    }

    #[rstest]
    fn page_window_sets_limit_and_offset() {
        let page = PageRequest::new(Some(5), Some(10)).expect("valid page");
        let query = Query::filter().page(page);
        assert_eq!(rendered(&query), [("limit", "5"), ("offset", "10")]);
    }

    #[rstest]
    fn membership_lists_are_parenthesised() {
        let query = Query::filter().one_of("user_id", &["a", "b"]);
        assert_eq!(rendered(&query), [("user_id", "in.(a,b)")]);
    }

    #[rstest]
    #[case(Some("0-19/42"), Some(42))]
    #[case(Some("*/0"), Some(0))]
    #[case(Some("0-9/*"), None)]
    #[case(Some("garbage"), None)]
    #[case(None, None)]
    fn parses_content_range_totals(#[case] header: Option<&str>, #[case] expected: Option<u64>) {
        assert_eq!(content_range_total(header), expected);
    }
}

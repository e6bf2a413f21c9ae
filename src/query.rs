//! Query-string building for authorized requests.
//!
//! Values are written with their plain string form and are NOT
//! percent-encoded: `{a: "x y"}` becomes `?a=x y`. Callers that need
//! reserved characters in a value must encode it themselves.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl QueryValue {
    /// Parses command-line input: integer, then float, then bool, else string.
    pub fn parse_lossy(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i64>() {
            QueryValue::Int(i)
        } else if let Ok(f) = raw.parse::<f64>() {
            QueryValue::Float(f)
        } else if let Ok(b) = raw.parse::<bool>() {
            QueryValue::Bool(b)
        } else {
            QueryValue::Str(raw.to_string())
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Str(s) => f.write_str(s),
            QueryValue::Int(i) => write!(f, "{}", i),
            QueryValue::Float(x) => write!(f, "{}", x),
            QueryValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Int(value.into())
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Int(value.into())
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

/// Insertion-ordered parameter map. Re-inserting a key keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for QueryParams
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Filters accepted by the guestlist endpoint.
#[derive(Debug, Clone, Default)]
pub struct GuestlistFilter {
    /// Max 1000, server default 100.
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// ISO8601 timestamp; only documents updated/created after it.
    pub since: Option<String>,
    pub event_id: Option<String>,
    pub listing_id: Option<String>,
}

impl From<GuestlistFilter> for QueryParams {
    fn from(filter: GuestlistFilter) -> Self {
        let mut params = QueryParams::new();
        if let Some(limit) = filter.limit {
            params.insert("limit", limit);
        }
        if let Some(offset) = filter.offset {
            params.insert("offset", offset);
        }
        if let Some(since) = filter.since {
            params.insert("since", since);
        }
        if let Some(event_id) = filter.event_id {
            params.insert("event_id", event_id);
        }
        if let Some(listing_id) = filter.listing_id {
            params.insert("listing_id", listing_id);
        }
        params
    }
}

pub fn serialize(params: &QueryParams) -> String {
    let joined = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    if joined.is_empty() {
        String::new()
    } else {
        format!("?{}", joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_params_serialize_to_nothing() {
        assert_eq!(serialize(&QueryParams::new()), "");
    }

    #[test]
    fn pairs_keep_insertion_order() {
        let params = QueryParams::from([("a", 1), ("b", 2)]);
        assert_eq!(serialize(&params), "?a=1&b=2");

        let params = QueryParams::new().with("b", 2).with("a", 1);
        assert_eq!(serialize(&params), "?b=2&a=1");
    }

    #[test]
    fn values_are_not_encoded() {
        let params = QueryParams::new().with("a", "x y").with("q", "a&b=c");
        assert_eq!(serialize(&params), "?a=x y&q=a&b=c");
    }

    #[test]
    fn scalars_use_plain_string_form() {
        let params = QueryParams::new()
            .with("f", 1.5)
            .with("whole", 2.0)
            .with("flag", true)
            .with("neg", -3);
        assert_eq!(serialize(&params), "?f=1.5&whole=2&flag=true&neg=-3");
    }

    #[test]
    fn reinsert_replaces_in_place() {
        let mut params = QueryParams::from([("limit", 10), ("offset", 0)]);
        params.insert("limit", 50);
        assert_eq!(params.len(), 2);
        assert_eq!(serialize(&params), "?limit=50&offset=0");
    }

    #[test]
    fn guestlist_filter_skips_unset_fields() {
        let filter = GuestlistFilter {
            limit: Some(100),
            event_id: Some("e1".to_string()),
            ..Default::default()
        };
        assert_eq!(serialize(&filter.into()), "?limit=100&event_id=e1");
    }

    #[test]
    fn parse_lossy_picks_narrowest_scalar() {
        assert_eq!(QueryValue::parse_lossy("10"), QueryValue::Int(10));
        assert_eq!(QueryValue::parse_lossy("0.5"), QueryValue::Float(0.5));
        assert_eq!(QueryValue::parse_lossy("false"), QueryValue::Bool(false));
        assert_eq!(
            QueryValue::parse_lossy("2019-05-27T00:00:00Z"),
            QueryValue::Str("2019-05-27T00:00:00Z".to_string())
        );
    }
}

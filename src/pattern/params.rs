//! Capture extraction, query parsing and argument preparation.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::pattern::compiler::{Capture, RoutePattern};

/// Parsed `key=value` query mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Query(BTreeMap<String, String>);

impl Query {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Named parameters delivered as a single argument, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: Vec<(String, Option<String>)>,
    query: Option<Query>,
}

impl Params {
    /// Value of a parameter. `None` if the name is unknown or its optional
    /// group did not participate in the match.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Parameter names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(key, _)| key.as_str())
    }

    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = usize::from(self.query.is_some());
        let mut map = serializer.serialize_map(Some(self.values.len() + extra))?;
        for (key, value) in &self.values {
            map.serialize_entry(key, value)?;
        }
        if let Some(query) = &self.query {
            map.serialize_entry("query", query)?;
        }
        map.end()
    }
}

/// One prepared handler argument.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum Argument {
    /// Named delivery: every parameter in one mapping.
    Params(Params),
    /// Positional delivery: one captured value.
    Value(Option<String>),
    /// Positional delivery: the trailing query mapping, if any.
    Query(Option<Query>),
}

fn decode(component: &str) -> String {
    percent_decode_str(component).decode_utf8_lossy().into_owned()
}

/// Run the matcher and collect captures, whole match excluded.
///
/// Every value except the last is percent-decoded. The last one is the raw
/// query string, `None` when absent or empty. A fragment that does not match
/// yields an empty list.
pub fn extract_params(pattern: &RoutePattern, fragment: &str) -> Vec<Option<String>> {
    let Some(captures) = pattern.raw_captures(fragment) else {
        return Vec::new();
    };
    let last = captures.len().saturating_sub(1);

    captures
        .into_iter()
        .enumerate()
        .map(|(i, capture)| match capture {
            Some(raw) if i == last => (!raw.is_empty()).then(|| raw.to_string()),
            Some(raw) => Some(decode(raw)),
            None => None,
        })
        .collect()
}

/// Parse `a=1&b=2`. Absent or empty input yields no mapping at all.
pub fn parse_query(raw: Option<&str>) -> Option<Query> {
    let raw = raw.filter(|raw| !raw.is_empty())?;

    let pairs = raw
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect();

    Some(Query(pairs))
}

fn query_of(raw: Option<&str>) -> Option<Query> {
    parse_query(raw.filter(|raw| raw.contains('=')))
}

/// Shape extracted captures into handler arguments.
///
/// `names` is `Some` in named-delivery mode. When the pattern declares at
/// least one `:name`, the result is a single [`Argument::Params`]; splat
/// values join the mapping under their own name. Otherwise each capture
/// becomes an [`Argument::Value`], followed by an [`Argument::Query`].
pub fn prepare_arguments(mut params: Vec<Option<String>>, names: Option<&[Capture]>) -> Vec<Argument> {
    // Only the default pattern has no query capture.
    let Some(raw_query) = params.pop() else {
        return Vec::new();
    };
    let query = query_of(raw_query.as_deref());

    match names {
        Some(names) if names.iter().any(|c| matches!(c, Capture::Named(_))) => {
            let values = names
                .iter()
                .map(|capture| capture.name().to_string())
                .zip(params)
                .collect();
            vec![Argument::Params(Params { values, query })]
        }
        _ => {
            let mut arguments: Vec<Argument> = params.into_iter().map(Argument::Value).collect();
            arguments.push(Argument::Query(query));
            arguments
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::compiler::{compile, RoutePattern};

    fn prepare(pattern: &str, fragment: &str, keys: bool) -> Vec<Argument> {
        let pattern = compile(pattern);
        let params = extract_params(&pattern, fragment);
        prepare_arguments(params, keys.then(|| pattern.captures()))
    }

    #[test]
    fn test_extract_decodes_all_but_query() {
        let pattern = compile("/user/:name");
        let params = extract_params(&pattern, "/user/J%C3%BCrgen?q=a%20b");
        assert_eq!(params, vec![Some("Jürgen".to_string()), Some("q=a%20b".to_string())]);
    }

    #[test]
    fn test_extract_empty_query_is_none() {
        let pattern = compile("/about");
        assert_eq!(extract_params(&pattern, "/about"), vec![None]);
        assert_eq!(extract_params(&pattern, "/about?"), vec![None]);
    }

    #[test]
    fn test_parse_query() {
        let query = parse_query(Some("first=5&second=6&name=a%26b")).unwrap();
        assert_eq!(query.get("first"), Some("5"));
        assert_eq!(query.get("second"), Some("6"));
        assert_eq!(query.get("name"), Some("a&b"));

        assert_eq!(parse_query(None), None);
        assert_eq!(parse_query(Some("")), None);
    }

    #[test]
    fn test_named_delivery() {
        let args = prepare("/about/:id/:number", "/about/16/18?first=5&second=6", true);
        assert_eq!(args.len(), 1);
        let Argument::Params(params) = &args[0] else {
            panic!("expected named params, got {args:?}");
        };
        assert_eq!(params.names().collect::<Vec<_>>(), vec!["id", "number"]);
        assert_eq!(params.get("id"), Some("16"));
        assert_eq!(params.get("number"), Some("18"));
        assert_eq!(params.query().and_then(|q| q.get("second")), Some("6"));
    }

    #[test]
    fn test_named_delivery_without_query() {
        let args = prepare("/about/:id", "/about/16", true);
        let Argument::Params(params) = &args[0] else {
            panic!("expected named params");
        };
        assert!(params.query().is_none());
    }

    #[test]
    fn test_named_mode_without_keys_is_positional() {
        let args = prepare("/about", "/about?first=5&second=6", true);
        assert_eq!(args.len(), 1);
        let Argument::Query(Some(query)) = &args[0] else {
            panic!("expected parsed query");
        };
        assert_eq!(query.get("first"), Some("5"));
    }

    #[test]
    fn test_positional_delivery() {
        let args = prepare("/about/:id/:number", "/about/16/18?first=1", false);
        assert_eq!(args.len(), 3);
        assert_eq!(args[0], Argument::Value(Some("16".into())));
        assert_eq!(args[1], Argument::Value(Some("18".into())));
        assert!(matches!(&args[2], Argument::Query(Some(q)) if q.get("first") == Some("1")));
    }

    #[test]
    fn test_query_without_equals_is_absent() {
        let args = prepare("/about", "/about?flag", false);
        assert_eq!(args, vec![Argument::Query(None)]);
    }

    #[test]
    fn test_splat_joins_named_mapping() {
        let args = prepare("/repo/:owner/*path", "/repo/ferris/src/lib.rs", true);
        let Argument::Params(params) = &args[0] else {
            panic!("expected named params");
        };
        assert_eq!(params.get("owner"), Some("ferris"));
        assert_eq!(params.get("path"), Some("src/lib.rs"));
    }

    #[test]
    fn test_unmatched_optional_group_is_none() {
        let args = prepare("/docs/:section(/:subsection)", "/docs/1", true);
        let Argument::Params(params) = &args[0] else {
            panic!("expected named params");
        };
        assert_eq!(params.get("section"), Some("1"));
        assert_eq!(params.get("subsection"), None);
    }

    #[test]
    fn test_default_pattern_has_no_arguments() {
        let params = extract_params(&RoutePattern::any(), "/whatever?x=1");
        assert!(prepare_arguments(params, None).is_empty());
    }

    #[test]
    fn test_params_serialize_in_declaration_order() {
        let args = prepare("/b/:zeta/:alpha", "/b/1/2?k=v", true);
        let json = serde_json::to_string(&args[0]).unwrap();
        assert_eq!(json, r#"{"zeta":"1","alpha":"2","query":{"k":"v"}}"#);
    }
}

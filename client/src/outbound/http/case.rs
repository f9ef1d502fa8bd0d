//! Key conversion for API responses.
//!
//! The API speaks snake_case; the in-memory model uses camelCase except for
//! ballots, which keep their wire field names wherever they appear.

use serde_json::{Map, Value};

const BALLOT_FIELDS: [&str; 4] = ["rated_by", "user_id", "ranking", "ranking_type"];

/// Convert a snake_case identifier to camelCase.
///
/// Leading underscores are kept; a run of underscores upper-cases the next
/// character once.
///
/// # Examples
/// ```
/// use inhouse_client::outbound::http::camelize;
///
/// assert_eq!(camelize("preferred_roles_league"), "preferredRolesLeague");
/// assert_eq!(camelize("id"), "id");
/// ```
pub fn camelize(key: &str) -> String {
    let trimmed = key.trim_start_matches('_');
    let mut camel = String::with_capacity(key.len());
    camel.extend(std::iter::repeat_n('_', key.len() - trimmed.len()));

    let mut upper_next = false;
    for ch in trimmed.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            camel.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            camel.push(ch);
        }
    }
    if upper_next {
        camel.push('_');
    }
    camel
}

fn is_ballot(object: &Map<String, Value>) -> bool {
    BALLOT_FIELDS.iter().all(|field| object.contains_key(*field))
}

/// Recursively camelise object keys, copying ballot-shaped objects verbatim.
///
/// # Examples
/// ```
/// use inhouse_client::outbound::http::camelize_keys;
/// use serde_json::json;
///
/// let converted = camelize_keys(json!({ "valorant_accounts": ["Faker#KR1"] }));
/// assert_eq!(converted, json!({ "valorantAccounts": ["Faker#KR1"] }));
/// ```
pub fn camelize_keys(value: Value) -> Value {
    match value {
        Value::Object(object) if is_ballot(&object) => Value::Object(object),
        Value::Object(object) => Value::Object(
            object
                .into_iter()
                .map(|(key, nested)| (camelize(&key), camelize_keys(nested)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(camelize_keys).collect()),
        other => other,
    }
}

//! Feed page parser
//!
//! A feed page carries two independently shaped maps:
//! - a stream index (`stream`), keyed by an internal key, whose entries hold
//!   the stream `id` and its `broadcasterId`
//! - broadcaster profiles (`basicProfile`), keyed by broadcaster id
//!
//! Every stream must have its broadcaster's profile on the same page. The
//! profile map may list broadcasters in any order, so profiles are looked up
//! by key. A page where the two maps differ in size or a profile is missing is
//! rejected as a whole rather than risk attributing a stream to the wrong
//! broadcaster.

use crate::model::{Category, StreamRef};
use crate::{DecodeError, DecodeResult};
use serde_json::{Map, Value};

const STREAM_FRAGMENT: &str = "stream";
const PROFILE_FRAGMENT: &str = "basicProfile";

/// Parses one feed page into stream references
///
/// # Arguments
///
/// * `body` - Raw response body of the feed request
/// * `category` - The category that produced the page
/// * `page_size` - Maximum number of references to return
///
/// # Returns
///
/// * `Ok(Vec<StreamRef>)` - References in feed order, at most `page_size`
/// * `Err(DecodeError)` - A fragment is missing, malformed, or misaligned
///
/// # Example
///
/// ```
/// use gifter_radar::crawler::parse_feed_page;
/// use gifter_radar::model::Category;
///
/// let body = r#"{
///     "stream": {"k1": {"id": "S1", "broadcasterId": "B1"}},
///     "basicProfile": {"B1": {"firstName": "Host"}}
/// }"#;
/// let refs = parse_feed_page(body, Category::Popular, 50).unwrap();
/// assert_eq!(refs[0].stream_id, "S1");
/// assert_eq!(refs[0].broadcaster_name.as_deref(), Some("Host"));
/// ```
pub fn parse_feed_page(body: &str, category: Category, page_size: usize) -> DecodeResult<Vec<StreamRef>> {
    let document: Value = serde_json::from_str(body)?;

    let streams = fragment(&document, STREAM_FRAGMENT)?;
    let profiles = fragment(&document, PROFILE_FRAGMENT)?;

    if streams.len() != profiles.len() {
        return Err(DecodeError::LengthMismatch {
            streams: streams.len(),
            profiles: profiles.len(),
        });
    }

    let mut refs = Vec::with_capacity(streams.len().min(page_size));
    for (key, entry) in streams {
        let stream_id = id_field(entry, "id")
            .ok_or_else(|| DecodeError::Shape(format!("stream entry '{}' has no id", key)))?;
        let broadcaster_id = id_field(entry, "broadcasterId").ok_or_else(|| {
            DecodeError::Shape(format!("stream entry '{}' has no broadcasterId", key))
        })?;

        let profile = profiles.get(&broadcaster_id).ok_or_else(|| DecodeError::MissingProfile {
            stream: stream_id.clone(),
            broadcaster: broadcaster_id.clone(),
        })?;

        if refs.len() < page_size {
            refs.push(StreamRef {
                stream_id,
                broadcaster_id,
                broadcaster_name: text_field(profile, "firstName"),
                category,
            });
        }
    }

    Ok(refs)
}

/// Locates a named map anywhere in the document
///
/// The search is depth-first in document order and stops at the first key
/// with the given name, mirroring where the fragment sits in the raw text.
fn fragment<'a>(document: &'a Value, name: &'static str) -> DecodeResult<&'a Map<String, Value>> {
    match find_key(document, name) {
        Some(Value::Object(map)) => Ok(map),
        Some(Value::Null) | None => Err(DecodeError::MissingFragment(name)),
        Some(other) => Err(DecodeError::Shape(format!(
            "`{}` is {}, expected an object",
            name,
            kind(other)
        ))),
    }
}

fn find_key<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == name {
                    return Some(child);
                }
                if let Some(found) = find_key(child, name) {
                    return Some(found);
                }
            }
            None
        }
        Value::Array(items) => items.iter().find_map(|item| find_key(item, name)),
        _ => None,
    }
}

/// Reads an identifier that may be sent as a string or a number
pub(crate) fn id_field(value: &Value, name: &str) -> Option<String> {
    match value.get(name)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a scalar field as display text
pub(crate) fn text_field(value: &Value, name: &str) -> Option<String> {
    match value.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

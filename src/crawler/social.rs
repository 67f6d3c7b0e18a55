//! Stream social list parser
//!
//! The social endpoint returns the top gifters of a stream and, when asked,
//! its viewers. Both arrays share one entry shape:
//!
//! ```json
//! {
//!   "account": {"encryptedAccountId": "...", "firstName": "...", "vipConfigId": 3, "gender": "..."},
//!   "creditsInStream": 1200,
//!   "isSubscriber": false,
//!   "subscriptionLevel": 0,
//!   "incognito": false
//! }
//! ```

use crate::crawler::parser::text_field;
use crate::model::{Credits, Participant, Role};
use crate::DecodeResult;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
struct SocialPayload {
    #[serde(default)]
    gifters: Option<Vec<SocialEntry>>,
    #[serde(default)]
    viewers: Option<Vec<SocialEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SocialEntry {
    account: Value,
    credits_in_stream: Option<Value>,
    is_subscriber: Option<Value>,
    subscription_level: Option<Value>,
    incognito: Option<Value>,
}

/// Participants of one stream, split by role
///
/// Each list keeps payload order and holds every account at most once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocialList {
    pub gifters: Vec<Participant>,
    pub viewers: Vec<Participant>,
}

impl SocialList {
    /// All participants, gifters first
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.gifters.iter().chain(self.viewers.iter())
    }

    pub fn len(&self) -> usize {
        self.gifters.len() + self.viewers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gifters.is_empty() && self.viewers.is_empty()
    }
}

/// Parses a stream's social list response
///
/// # Returns
///
/// * `Ok(SocialList)` - The decoded gifters and viewers
/// * `Err(DecodeError)` - The body is not a JSON social list
///
/// Entries without an account id are dropped; the rest of the list is kept.
pub fn parse_social_list(body: &str) -> DecodeResult<SocialList> {
    let payload: SocialPayload = serde_json::from_str(body)?;

    Ok(SocialList {
        gifters: decode_entries(payload.gifters.unwrap_or_default(), Role::Gifter),
        viewers: decode_entries(payload.viewers.unwrap_or_default(), Role::Viewer),
    })
}

fn decode_entries(entries: Vec<SocialEntry>, role: Role) -> Vec<Participant> {
    let mut seen = HashSet::new();
    let mut participants = Vec::with_capacity(entries.len());

    for (position, entry) in entries.into_iter().enumerate() {
        let Some(participant) = decode_entry(entry, role) else {
            tracing::debug!("Skipping {} #{} without account id", role, position);
            continue;
        };

        if seen.insert(participant.account_id.clone()) {
            participants.push(participant);
        }
    }

    participants
}

fn decode_entry(entry: SocialEntry, role: Role) -> Option<Participant> {
    let account_id = match entry.account.get("encryptedAccountId")? {
        Value::String(id) if !id.is_empty() => id.clone(),
        _ => return None,
    };

    Some(Participant {
        account_id,
        role,
        display_name: text_field(&entry.account, "firstName"),
        credits: credits(entry.credits_in_stream.as_ref()),
        vip_status: text_field(&entry.account, "vipConfigId"),
        gender: text_field(&entry.account, "gender"),
        is_subscriber: entry.is_subscriber.as_ref().and_then(Value::as_bool),
        fan_level: entry.subscription_level.as_ref().and_then(Value::as_i64),
        incognito: entry.incognito.as_ref().and_then(Value::as_bool),
    })
}

/// Converts `creditsInStream` into credits; absent or unreadable means viewer
fn credits(value: Option<&Value>) -> Credits {
    let amount = match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    amount.map(Credits::Amount).unwrap_or(Credits::Viewer)
}

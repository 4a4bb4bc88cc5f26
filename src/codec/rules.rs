// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The standard Twitter rule set.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::DecodeRule;

/// The field `EntityKindRule` writes its discriminator to.
pub const ENTITY_KIND_FIELD: &str = "entity_kind";

/// Fields that carry timestamps.
const DATE_FIELDS: &[&str] = &["created_at"];

/// The format Twitter uses for timestamps, as in `Wed Aug 27 13:08:45 +0000 2008`.
const TWITTER_DATE_FORMAT: &str = "%a %b %d %T %z %Y";

/// Rewrites numeric IDs that arrived as strings into JSON numbers.
///
/// Applies to `id`, to any field ending in `_id`, and to the elements of an `ids` array or any
/// array field ending in `_ids`. Only strings made entirely of ASCII digits that fit in a `u64`
/// are converted; the companion `id_str` fields are left as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericIdRule;

impl NumericIdRule {
    fn normalize(value: &mut Value) {
        let number = match value {
            Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                s.parse::<u64>().ok()
            }
            _ => None,
        };

        if let Some(number) = number {
            *value = Value::from(number);
        }
    }
}

impl DecodeRule for NumericIdRule {
    fn name(&self) -> &'static str {
        "numeric-id"
    }

    fn apply(&self, object: &mut Map<String, Value>) {
        for (key, value) in object.iter_mut() {
            if key == "id" || key.ends_with("_id") {
                NumericIdRule::normalize(value);
            } else if key == "ids" || key.ends_with("_ids") {
                if let Value::Array(items) = value {
                    items.iter_mut().for_each(NumericIdRule::normalize);
                }
            }
        }
    }
}

/// Rewrites Twitter's timestamps into RFC 3339, which `chrono`'s `serde` support reads directly.
///
/// Understands the format used throughout the REST API (`Wed Aug 27 13:08:45 +0000 2008`) and the
/// RFC 2822 form the older search API used (`Wed, 27 Aug 2008 13:08:45 +0000`). Anything else,
/// RFC 3339 included, is left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateFormatRule;

impl DateFormatRule {
    /// Parses a timestamp in either of Twitter's formats.
    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_str(s, TWITTER_DATE_FORMAT)
            .or_else(|_| DateTime::parse_from_rfc2822(s))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl DecodeRule for DateFormatRule {
    fn name(&self) -> &'static str {
        "date-format"
    }

    fn apply(&self, object: &mut Map<String, Value>) {
        for field in DATE_FIELDS {
            if let Some(Value::String(s)) = object.get_mut(*field) {
                if let Some(date) = DateFormatRule::parse(s) {
                    *s = date.to_rfc3339();
                }
            }
        }
    }
}

/// Tags objects with the kind of entity they hold, so polymorphic values can be decoded as
/// `models::Entity`.
///
/// The kind is decided by which fields are present, checked in this order:
///
/// | kind             | recognized by                                            |
/// |------------------|----------------------------------------------------------|
/// | `retweet`        | a `retweeted_status` object                              |
/// | `error`          | an `errors` array or an `error` string                   |
/// | `direct_message` | `sender_id` and `recipient_id`                           |
/// | `status`         | `text` or `full_text`, plus `created_at`                 |
/// | `list`           | `slug` and `mode`                                        |
/// | `user`           | `screen_name`                                            |
///
/// Objects that already carry an `entity_kind`, or that match none of the above, are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityKindRule;

impl EntityKindRule {
    fn classify(object: &Map<String, Value>) -> Option<&'static str> {
        let has = |key: &str| object.get(key).map_or(false, |v| !v.is_null());

        if object.get("retweeted_status").map_or(false, Value::is_object) {
            Some("retweet")
        } else if object.get("errors").map_or(false, Value::is_array)
            || object.get("error").map_or(false, Value::is_string)
        {
            Some("error")
        } else if has("sender_id") && has("recipient_id") {
            Some("direct_message")
        } else if (has("text") || has("full_text")) && has("created_at") {
            Some("status")
        } else if has("slug") && has("mode") {
            Some("list")
        } else if has("screen_name") {
            Some("user")
        } else {
            None
        }
    }
}

impl DecodeRule for EntityKindRule {
    fn name(&self) -> &'static str {
        "entity-kind"
    }

    fn apply(&self, object: &mut Map<String, Value>) {
        if object.contains_key(ENTITY_KIND_FIELD) {
            return;
        }

        if let Some(kind) = EntityKindRule::classify(object) {
            object.insert(ENTITY_KIND_FIELD.to_string(), Value::from(kind));
        }
    }
}

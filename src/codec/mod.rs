// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The decoding registry: rules that teach the JSON decoder about Twitter's shapes.
//!
//! Twitter's JSON doesn't always line up with what `serde` expects out of the box. Timestamps use
//! their own format, numeric IDs sometimes show up as strings, and several endpoints return values
//! whose shape depends on which fields are present. Rather than scattering `deserialize_with`
//! glue over every model type, a `Decoder` carries a set of `DecodeRule`s that rewrite the parsed
//! JSON tree into a canonical form before the typed decode runs.
//!
//! A `Decoder` is assembled once with a `DecoderBuilder` and never changes afterwards, which is
//! what lets a single instance be shared by every call a client makes, from any number of
//! threads.
//!
//! ```rust
//! use birdhouse::codec::{Decoder, DecoderBuilder};
//!
//! let decoder = DecoderBuilder::new()
//!     .with_twitter_rules()
//!     .with_twitter_rules() // already installed, so this changes nothing
//!     .build();
//!
//! assert_eq!(decoder.rule_names(), Decoder::twitter().rule_names());
//! ```
//!
//! Rules only run on JSON responses. A response that arrived with a different content type is
//! decoded by plain `serde_json`, and if that fails the pipeline reports it as an `ApiError` like
//! any other undecodable body.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

mod rules;

pub use self::rules::{DateFormatRule, EntityKindRule, NumericIdRule, ENTITY_KIND_FIELD};

/// The version of the rule set installed by `DecoderBuilder::with_twitter_rules`.
///
/// Bumped whenever a rule is added to the set or changes what it produces.
pub const RULESET_VERSION: u32 = 1;

/// A rewrite applied to every JSON object in a response before it is decoded.
///
/// Rules must be idempotent: applying one to an object it has already rewritten must leave the
/// object unchanged.
pub trait DecodeRule: Send + Sync {
    /// A name unique to this rule. Registering a second rule under a name that's already
    /// installed is a no-op.
    fn name(&self) -> &'static str;

    /// Rewrites the given object in place.
    fn apply(&self, object: &mut Map<String, Value>);
}

/// Assembles a `Decoder` from a set of rules.
#[derive(Default)]
pub struct DecoderBuilder {
    rules: Vec<Box<dyn DecodeRule>>,
}

impl DecoderBuilder {
    /// Creates a builder with no rules installed.
    pub fn new() -> DecoderBuilder {
        DecoderBuilder::default()
    }

    /// Installs the given rule, unless a rule with the same name is already installed.
    pub fn rule<R: DecodeRule + 'static>(mut self, rule: R) -> DecoderBuilder {
        if self.rules.iter().any(|r| r.name() == rule.name()) {
            return self;
        }

        self.rules.push(Box::new(rule));
        self
    }

    /// Installs the standard Twitter rule set, version `RULESET_VERSION`.
    pub fn with_twitter_rules(self) -> DecoderBuilder {
        self.rule(NumericIdRule)
            .rule(DateFormatRule)
            .rule(EntityKindRule)
    }

    /// Freezes the installed rules into a `Decoder`.
    pub fn build(self) -> Decoder {
        Decoder {
            rules: Arc::new(self.rules),
        }
    }
}

/// A JSON decoder with a fixed set of `DecodeRule`s.
///
/// Cloning a `Decoder` is cheap; clones share the same rules.
#[derive(Clone)]
pub struct Decoder {
    rules: Arc<Vec<Box<dyn DecodeRule>>>,
}

impl Decoder {
    /// Returns a decoder with the standard Twitter rule set installed.
    pub fn twitter() -> Decoder {
        DecoderBuilder::new().with_twitter_rules().build()
    }

    /// Returns a decoder without any rules, which behaves like plain `serde_json`.
    pub fn plain() -> Decoder {
        DecoderBuilder::new().build()
    }

    /// The names of the installed rules, in the order they run.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Returns whether a response with the given `Content-Type` should go through the rules.
    ///
    /// A missing content type is treated as JSON, since that's all the API serves.
    pub fn handles_content_type(content_type: Option<&str>) -> bool {
        let content_type = match content_type {
            Some(ct) => ct,
            None => return true,
        };

        match content_type.parse::<mime::Mime>() {
            Ok(mime) => {
                mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON)
            }
            Err(_) => false,
        }
    }

    /// Parses the given body and applies every installed rule to each object in it.
    pub fn decode_value(&self, body: &[u8]) -> serde_json::Result<Value> {
        let mut value: Value = serde_json::from_slice(body)?;
        self.apply_rules(&mut value);
        Ok(value)
    }

    /// Decodes the given body into `T`.
    ///
    /// JSON bodies are rewritten by the installed rules first. Any other content type is handed
    /// straight to `serde_json`.
    pub fn decode<T: DeserializeOwned>(
        &self,
        content_type: Option<&str>,
        body: &[u8],
    ) -> serde_json::Result<T> {
        if !Decoder::handles_content_type(content_type) || self.rules.is_empty() {
            return serde_json::from_slice(body);
        }

        let value = self.decode_value(body)?;
        serde_json::from_value(value)
    }

    fn apply_rules(&self, value: &mut Value) {
        match value {
            Value::Object(object) => {
                for child in object.values_mut() {
                    self.apply_rules(child);
                }
                for rule in self.rules.iter() {
                    rule.apply(object);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.apply_rules(item);
                }
            }
            _ => (),
        }
    }
}

impl Default for Decoder {
    fn default() -> Decoder {
        Decoder::twitter()
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("rules", &self.rule_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entity, Tweet};

    const TIMELINE: &str = r#"[
        {
            "created_at": "Wed Aug 27 13:08:45 +0000 2008",
            "id": "12345",
            "id_str": "12345",
            "text": "just setting up my twttr",
            "in_reply_to_status_id": null,
            "user": {"id": 12, "screen_name": "jack", "name": "jack"}
        },
        {
            "created_at": "Thu Aug 28 10:00:00 +0000 2008",
            "id": 12346,
            "text": "RT @jack: just setting up my twttr",
            "retweeted_status": {
                "created_at": "Wed Aug 27 13:08:45 +0000 2008",
                "id": 12345,
                "text": "just setting up my twttr"
            }
        },
        {"id": "12", "screen_name": "jack", "name": "jack"},
        {"errors": [{"code": 34, "message": "Sorry, that page does not exist"}]}
    ]"#;

    #[test]
    fn registration_is_idempotent() {
        let once = DecoderBuilder::new().with_twitter_rules().build();
        let twice = DecoderBuilder::new()
            .with_twitter_rules()
            .with_twitter_rules()
            .rule(DateFormatRule)
            .build();

        assert_eq!(once.rule_names(), twice.rule_names());
        assert_eq!(
            once.decode_value(TIMELINE.as_bytes()).unwrap(),
            twice.decode_value(TIMELINE.as_bytes()).unwrap()
        );
    }

    #[test]
    fn rules_are_stable_under_reapplication() {
        let decoder = Decoder::twitter();
        let first = decoder.decode_value(TIMELINE.as_bytes()).unwrap();
        let again = decoder
            .decode_value(serde_json::to_string(&first).unwrap().as_bytes())
            .unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn polymorphic_entities() {
        let entities: Vec<Entity> = Decoder::twitter()
            .decode(Some("application/json; charset=utf-8"), TIMELINE.as_bytes())
            .unwrap();

        match &entities[0] {
            Entity::Status(tweet) => {
                assert_eq!(tweet.id, 12345);
                assert_eq!(tweet.created_at.to_rfc3339(), "2008-08-27T13:08:45+00:00");
                assert_eq!(tweet.user.as_ref().map(|u| u.screen_name.as_str()), Some("jack"));
            }
            other => panic!("expected a status, got {:?}", other),
        }
        match &entities[1] {
            Entity::Retweet(tweet) => {
                assert_eq!(tweet.retweeted_status.as_ref().map(|t| t.id), Some(12345));
            }
            other => panic!("expected a retweet, got {:?}", other),
        }
        match &entities[2] {
            Entity::User(user) => assert_eq!(user.id, 12),
            other => panic!("expected a user, got {:?}", other),
        }
        match &entities[3] {
            Entity::Error(err) => assert_eq!(err.errors[0].code, 34),
            other => panic!("expected an error, got {:?}", other),
        }
    }

    #[test]
    fn plain_decoder_skips_rules() {
        let result = Decoder::plain().decode::<Vec<Entity>>(None, TIMELINE.as_bytes());
        assert!(result.is_err());

        let result = Decoder::plain().decode::<Tweet>(
            None,
            br#"{"created_at": "Wed Aug 27 13:08:45 +0000 2008", "id": 1, "text": "x"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn non_json_content_skips_rules() {
        let body = br#"{"created_at": "Wed Aug 27 13:08:45 +0000 2008", "id": "1", "text": "x"}"#;
        assert!(Decoder::twitter().decode::<Tweet>(Some("application/json"), body).is_ok());
        assert!(Decoder::twitter().decode::<Tweet>(Some("text/html"), body).is_err());
    }

    #[test]
    fn content_types() {
        assert!(Decoder::handles_content_type(None));
        assert!(Decoder::handles_content_type(Some("application/json")));
        assert!(Decoder::handles_content_type(Some("application/json;charset=utf-8")));
        assert!(Decoder::handles_content_type(Some("text/json")));
        assert!(Decoder::handles_content_type(Some("application/problem+json")));
        assert!(!Decoder::handles_content_type(Some("text/html")));
        assert!(!Decoder::handles_content_type(Some("image/png")));
        assert!(!Decoder::handles_content_type(Some("not a mime type")));
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Set of structs and methods that act as a sort of internal prelude.
//!
//! The elements available in this module and its children are fairly basic building blocks that
//! the other modules all import to make available as a common language.
//!
//! # Module contents
//!
//! ## `ParamList`
//!
//! `ParamList` is the collection of parameters handed to a web call, used both for query strings
//! and for form-encoded POST bodies. It keeps its pairs in insertion order, so the URI built from
//! it is deterministic, and it offers two ways to add a pair: `add_param` replaces any earlier
//! value under the same key, `append_param` keeps both (form bodies may repeat a key).
//!
//! `add_user_param` provides some special handling for the `UserID` enum, since Twitter always
//! handles user parameters the same way: either as a `"user_id"` parameter with the ID, or as a
//! `"screen_name"` parameter with the screen name. `multiple_names_param` splits a mixed set of
//! `UserID`s into the comma-separated `user_id` and `screen_name` lists lookup endpoints take.
//!
//! `require_authorization` is the local check the resource operations run before calling an
//! endpoint that only answers for an authorized user.
//!
//! `percent_encode` implements Twitter's flavor of percent-encoding, which is used both on the wire
//! and while building OAuth signatures.
//!
//! ## `response`
//!
//! The child module `response` holds the error translator: the one function every response goes
//! through before the caller sees it, plus the helpers that read Twitter's rate-limit headers.

use std::borrow::Cow;

use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode};

use crate::error::{Error, Result};
use crate::user;

pub(crate) mod response;

pub(crate) use self::response::*;

pub type CowStr = Cow<'static, str>;

// n.b. this type is re-exported at the crate root - these docs are public!
/// Represents a list of parameters to a Twitter API call.
///
/// This type is a wrapper around a `Vec<(Cow<'static, str>, Cow<'static, str>)>` to collect a set
/// of parameter key/value pairs in the order they were added. These are then used to assemble and
/// sign a Twitter API request. The `Cow` type is used to avoid having to allocate a `String` if a
/// string literal is used for a parameter. All the functions that add parameters to this
/// `ParamList` accept `impl Into<Cow<'static, str>>`, meaning that either a string literal or an
/// owned `String` may be used.
///
/// Most of the functions to add parameters follow a builder pattern, so that you can assemble a
/// `ParamList` in a single statement:
///
/// ```
/// use birdhouse::ParamList;
///
/// let params = ParamList::new()
///     .add_param("q", "rustlang")
///     .add_opt_param("count", Some(20.to_string()));
///
/// assert_eq!(params.to_urlencoded(), "q=rustlang&count=20");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_more::Deref, derive_more::From)]
pub struct ParamList(Vec<(CowStr, CowStr)>);

impl ParamList {
    /// Creates a new, empty `ParamList`.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds the given key/value parameter to this `ParamList`.
    ///
    /// If the key was already present, its value is replaced in place, keeping the position of
    /// the original pair.
    pub fn add_param(
        mut self,
        key: impl Into<CowStr>,
        value: impl Into<CowStr>,
    ) -> Self {
        self.add_param_ref(key, value);
        self
    }

    /// Adds the given key/value parameter to this `ParamList` only if the given value is `Some`.
    ///
    /// This can be a convenient wrapper to use in case you may or may not want to include
    /// something based on some condition. If the given value is `None`, then the `ParamList` is
    /// returned unmodified.
    pub fn add_opt_param(
        self,
        key: impl Into<CowStr>,
        value: Option<impl Into<CowStr>>,
    ) -> Self {
        match value {
            Some(val) => self.add_param(key.into(), val.into()),
            None => self,
        }
    }

    /// Adds the given key/value to this `ParamList` by mutating it in place, rather than consuming
    /// it as in `add_param`.
    pub fn add_param_ref(
        &mut self,
        key: impl Into<CowStr>,
        value: impl Into<CowStr>,
    ) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Adds the given key/value parameter without replacing earlier values under the same key.
    ///
    /// This is only meaningful for form-encoded bodies, where a key may carry several values.
    pub fn append_param(
        mut self,
        key: impl Into<CowStr>,
        value: impl Into<CowStr>,
    ) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    /// Adds the given `UserID` as a parameter to this `ParamList` by adding either a `user_id` or
    /// `screen_name` parameter as appropriate.
    pub fn add_user_param(self, id: user::UserID) -> Self {
        match id {
            user::UserID::ID(id) => self.add_param("user_id", id.to_string()),
            user::UserID::ScreenName(name) => self.add_param("screen_name", name),
        }
    }

    /// Removes every value stored under the given key.
    pub fn remove(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }

    /// Returns the first value stored under the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_ref())
    }

    /// Merge the parameters from the given `ParamList` into this one.
    pub(crate) fn combine(&mut self, other: &ParamList) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Renders this `ParamList` as an `application/x-www-form-urlencoded` string.
    ///
    /// The key/value pairs are printed as `key1=value1&key2=value2`, in insertion order, with all
    /// keys and values being percent-encoded according to Twitter's requirements.
    pub fn to_urlencoded(&self) -> String {
        self.0.iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K, V> std::iter::FromIterator<(K, V)> for ParamList
where
    K: Into<CowStr>,
    V: Into<CowStr>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = ParamList::new();
        for (k, v) in iter {
            params.add_param_ref(k, v);
        }
        params
    }
}

pub fn multiple_names_param<T, I>(accts: I) -> (String, String)
where
    T: Into<user::UserID>,
    I: IntoIterator<Item = T>,
{
    let mut ids = Vec::new();
    let mut names = Vec::new();

    for x in accts {
        match x.into() {
            user::UserID::ID(id) => ids.push(id.to_string()),
            user::UserID::ScreenName(name) => names.push(name),
        }
    }

    (ids.join(","), names.join(","))
}

/// Fails with `Error::BadCredentials` unless the caller is authorized for a user.
pub fn require_authorization(authorized: bool) -> Result<()> {
    if authorized {
        Ok(())
    } else {
        Err(Error::BadCredentials)
    }
}

// Helper trait to stringify the contents of an Option
pub(crate) trait MapString {
    fn map_string(&self) -> Option<String>;
}

impl<T: std::fmt::Display> MapString for Option<T> {
    fn map_string(&self) -> Option<String> {
        self.as_ref().map(|v| v.to_string())
    }
}

/// Percent-encodes the given string based on the Twitter API specification.
///
/// Twitter bases its encoding scheme on RFC 3986, Section 2.1. They describe the process in full
/// [in their documentation][twitter-percent], but the process can be summarized by saying that
/// every *byte* that is not an ASCII number or letter, or the ASCII characters `-`, `.`, `_`, or
/// `~` must be replaced with a percent sign (`%`) and the byte value in hexadecimal.
///
/// [twitter-percent]: https://developer.twitter.com/en/docs/basics/authentication/oauth-1-0a/percent-encoding-parameters
pub fn percent_encode(src: &str) -> PercentEncode {
    lazy_static::lazy_static! {
        static ref ENCODER: AsciiSet = percent_encoding::NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');
    }
    utf8_percent_encode(src, &*ENCODER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_keep_insertion_order() {
        let params = ParamList::new()
            .add_param("zeta", "1")
            .add_param("alpha", "2")
            .add_param("mid", "3");

        assert_eq!(params.to_urlencoded(), "zeta=1&alpha=2&mid=3");
    }

    #[test]
    fn add_param_replaces_in_place() {
        let params = ParamList::new()
            .add_param("count", "10")
            .add_param("q", "rust")
            .add_param("count", "20");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("count"), Some("20"));
        assert_eq!(params.to_urlencoded(), "count=20&q=rust");
    }

    #[test]
    fn append_param_keeps_duplicates() {
        let params = ParamList::new()
            .append_param("user_id", "1")
            .append_param("user_id", "2");

        assert_eq!(params.to_urlencoded(), "user_id=1&user_id=2");
        assert_eq!(params.get("user_id"), Some("1"));
    }

    #[test]
    fn opt_param_skips_none() {
        let params = ParamList::new()
            .add_opt_param("since_id", None::<String>)
            .add_opt_param("max_id", Some("99"));

        assert_eq!(params.to_urlencoded(), "max_id=99");
    }

    #[test]
    fn user_params() {
        let params = ParamList::new().add_user_param(783214u64.into());
        assert_eq!(params.to_urlencoded(), "user_id=783214");

        let params = ParamList::new().add_user_param("rustlang".into());
        assert_eq!(params.to_urlencoded(), "screen_name=rustlang");
    }

    #[test]
    fn mixed_names() {
        let accts: Vec<user::UserID> = vec![1u64.into(), "rustlang".into(), 2u64.into()];
        let (ids, names) = multiple_names_param(accts);
        assert_eq!(ids, "1,2");
        assert_eq!(names, "rustlang");
    }

    #[test]
    fn authorization_check() {
        assert!(require_authorization(true).is_ok());
        assert!(matches!(require_authorization(false), Err(Error::BadCredentials)));
    }

    #[test]
    fn twitter_percent_encoding() {
        let encoded = percent_encode("Ladies + Gentlemen").to_string();
        assert_eq!(encoded, "Ladies%20%2B%20Gentlemen");

        let encoded = percent_encode("An encoded string!").to_string();
        assert_eq!(encoded, "An%20encoded%20string%21");

        let encoded = percent_encode("Dogs, Cats & Mice").to_string();
        assert_eq!(encoded, "Dogs%2C%20Cats%20%26%20Mice");

        let encoded = percent_encode("☃").to_string();
        assert_eq!(encoded, "%E2%98%83");

        let encoded = percent_encode("-._~").to_string();
        assert_eq!(encoded, "-._~");
    }
}

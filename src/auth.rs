// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Types and methods used to authenticate calls to Twitter.
//!
//! # Identities
//!
//! A client talks to Twitter as one of two identities, chosen when the client is built and never
//! changed afterwards:
//!
//! * `Identity::Anonymous` sends requests without any `Authorization` header. A handful of
//!   endpoints (searching, for example) answer such requests; every endpoint that acts on behalf of
//!   a user rejects them, and that rejection reaches the caller as `Error::BadCredentials`.
//! * `Identity::AuthenticatedForUser` signs every request with OAuth 1.0a, using the consumer
//!   key/secret that identifies the application and the access token/secret that identifies the
//!   user who authorized it.
//!
//! Obtaining the access token (the three-legged "sign in with Twitter" flow) is outside the scope
//! of this library; the four strings are handed over fully formed.
//!
//! ```rust
//! use birdhouse::auth::{Credentials, Identity};
//!
//! let identity = Identity::from(Credentials::new(
//!     "consumer key", "consumer secret",
//!     "access token", "access token secret",
//! ));
//! assert!(identity.is_authorized_for_user());
//!
//! assert!(!Identity::Anonymous.is_authorized_for_user());
//! ```

use std::borrow::Cow;
use std::fmt;

pub(crate) mod raw;

/// A key/secret pair representing an OAuth token.
///
/// The `Debug` implementation prints the key but never the secret.
#[derive(Clone)]
pub struct KeyPair {
    /// A key used to identify an application or user.
    pub key: Cow<'static, str>,
    /// A private key used to sign messages from an application or user.
    pub secret: Cow<'static, str>,
}

impl KeyPair {
    /// Creates a KeyPair with the given key and secret.
    ///
    /// This can be called with either `&'static str` (a string literal) or `String` for either
    /// parameter.
    pub fn new<K, S>(key: K, secret: S) -> KeyPair
    where
        K: Into<Cow<'static, str>>,
        S: Into<Cow<'static, str>>,
    {
        KeyPair {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Internal function to create an empty KeyPair. Not meant to be used from user code.
    fn empty() -> KeyPair {
        KeyPair {
            key: "".into(),
            secret: "".into(),
        }
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// The four strings needed to sign requests on behalf of a user.
#[derive(Clone, Debug)]
pub struct Credentials {
    /// The key pair that identifies the application making the calls.
    pub consumer: KeyPair,
    /// The key pair that identifies the user who authorized the application.
    pub access: KeyPair,
}

impl Credentials {
    /// Assembles credentials from the application's consumer key and secret and the user's
    /// access token and secret.
    pub fn new<A, B, C, D>(
        consumer_key: A,
        consumer_secret: B,
        access_token: C,
        access_token_secret: D,
    ) -> Credentials
    where
        A: Into<Cow<'static, str>>,
        B: Into<Cow<'static, str>>,
        C: Into<Cow<'static, str>>,
        D: Into<Cow<'static, str>>,
    {
        Credentials {
            consumer: KeyPair::new(consumer_key, consumer_secret),
            access: KeyPair::new(access_token, access_token_secret),
        }
    }
}

/// The identity a client uses to talk to Twitter.
#[derive(Clone, Debug)]
pub enum Identity {
    /// No credentials. Requests are sent unsigned.
    Anonymous,
    /// Requests are signed with the given user's credentials.
    AuthenticatedForUser(Credentials),
}

impl Identity {
    /// Returns whether requests made with this identity are signed on behalf of a user.
    pub fn is_authorized_for_user(&self) -> bool {
        matches!(self, Identity::AuthenticatedForUser(_))
    }

    /// Returns the credentials of this identity, if it has any.
    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            Identity::Anonymous => None,
            Identity::AuthenticatedForUser(creds) => Some(creds),
        }
    }
}

impl Default for Identity {
    fn default() -> Identity {
        Identity::Anonymous
    }
}

impl From<Credentials> for Identity {
    fn from(creds: Credentials) -> Identity {
        Identity::AuthenticatedForUser(creds)
    }
}

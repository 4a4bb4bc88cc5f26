// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A composite error type for errors that can occur while interacting with Twitter.
//!
//! Every call made through the request pipeline either returns its decoded value or one of the
//! variants of [`Error`]. Raw HTTP status codes never reach the caller: a response that Twitter
//! marked as failed is translated into `BadCredentials`, `RateLimitExceeded`,
//! `ResourceNotFound`, `UnsupportedRedirect`, or the catch-all `ApiError`, and anything that went
//! wrong before Twitter could answer at all is reported as `TransportFailure`.
//!
//! The translation itself lives in `common::response`; this module only defines the shapes.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// Convenient alias to a Result containing a local Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a collection of errors returned from a Twitter API call.
///
/// This is returned as part of [`Error::ApiError`] whenever Twitter has rejected a call, and is
/// also used internally to recognize authentication and rate-limit failures reported in the
/// response body rather than through the status code.
#[derive(Debug, Clone, Deserialize)]
pub struct TwitterErrors {
    /// A collection of errors.
    pub errors: Vec<TwitterErrorCode>,
}

impl fmt::Display for TwitterErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for e in &self.errors {
            if first {
                first = false;
            } else {
                writeln!(f, ",")?;
            }

            write!(f, "{}", e)?;
        }

        Ok(())
    }
}

/// Represents a specific error returned from a Twitter API call.
#[derive(Debug, Clone, Deserialize)]
pub struct TwitterErrorCode {
    /// The error message returned by Twitter.
    pub message: String,
    /// The numeric error code returned by Twitter. A list of possible error codes can be found
    /// in the [API documentation][error-codes].
    ///
    /// [error-codes]: https://developer.twitter.com/en/docs/basics/response-codes
    pub code: i32,
}

impl fmt::Display for TwitterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}: {}", self.code, self.message)
    }
}

/// The older, single-message error body some endpoints still return.
///
/// Looks like `{"error": "Not authorized", "request": "/1/statuses/home_timeline.json"}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LegacyTwitterError {
    pub error: String,
    #[serde(default)]
    pub request: Option<String>,
}

/// A failure that happened before Twitter produced a response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The underlying HTTP client failed to complete the exchange: the host could not be
    /// resolved, the connection was refused or reset, or the TLS handshake failed.
    #[error("{0}")]
    Hyper(#[from] hyper::Error),
    /// The request could not be assembled from its parts.
    #[error("could not assemble request: {0}")]
    Request(#[from] http::Error),
    /// The configured transport timeout elapsed before the response was fully read.
    #[error("request timed out after {0:?}")]
    TimedOut(Duration),
    /// The runtime that drives requests could not be started.
    #[error("could not start the request runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Represents an error that can occur during a Twitter API call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Twitter rejected the credentials used to sign the request, or an anonymous client tried
    /// to call an endpoint that requires a user's authorization.
    BadCredentials,
    /// The rate limit for the called endpoint has been reached. If Twitter reported when the
    /// current window resets, the UTC Unix timestamp is given here.
    RateLimitExceeded {
        /// The UTC Unix timestamp at which the rate window resets, when known.
        reset: Option<i64>,
    },
    /// The requested resource does not exist.
    ResourceNotFound,
    /// Twitter returned a failure that doesn't fit any of the more specific variants, or the
    /// response body could not be decoded into the requested type.
    ApiError {
        /// The HTTP status code of the response.
        status: u16,
        /// The error code given by Twitter, if the response body carried one.
        code: Option<i32>,
        /// The error message given by Twitter, or a description built from the status.
        message: String,
    },
    /// The request never reached Twitter, or its response could not be read.
    TransportFailure(#[from] TransportError),
    /// The response was a redirect, and the transport is not configured to follow redirects.
    UnsupportedRedirect {
        /// The HTTP status code of the redirect.
        status: u16,
        /// The `Location` header of the redirect, if one was given.
        location: Option<String>,
    },
    /// The request URI could not be assembled from the API base, the path and the parameters.
    MalformedUri(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::BadCredentials => {
                write!(f, "Bad credentials: the request requires an authorized user")
            }
            Error::RateLimitExceeded { reset: Some(reset) } => {
                write!(f, "Rate limit reached, hold until {}", reset)
            }
            Error::RateLimitExceeded { reset: None } => write!(f, "Rate limit reached"),
            Error::ResourceNotFound => write!(f, "Resource not found"),
            Error::ApiError { status, code: Some(code), message } => {
                write!(f, "API error (HTTP {}) #{}: {}", status, code, message)
            }
            Error::ApiError { status, code: None, message } => {
                write!(f, "API error (HTTP {}): {}", status, message)
            }
            Error::TransportFailure(err) => write!(f, "Network error: {}", err),
            Error::UnsupportedRedirect { status, location } => write!(
                f,
                "Received a redirect (HTTP {}) to {} which cannot be followed",
                status,
                location.as_deref().unwrap_or("an unknown location")
            ),
            Error::MalformedUri(msg) => write!(f, "Malformed request URI: {}", msg),
        }
    }
}

impl From<hyper::Error> for Error {
    fn from(err: hyper::Error) -> Error {
        Error::TransportFailure(err.into())
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Error {
        Error::TransportFailure(err.into())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::MalformedUri(err.to_string())
    }
}

impl Error {
    /// Returns whether this error was produced before any request reached Twitter.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Error::TransportFailure(_))
    }
}

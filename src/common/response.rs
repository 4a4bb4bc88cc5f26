// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error translation for responses received from Twitter.
//!
//! Every response the pipeline receives is handed to `translate` before anything else looks at it.
//! Successful responses pass through untouched; everything else becomes one of the domain errors
//! in `crate::error`, so callers never have to look at a status code themselves.

use hyper::header::{HeaderMap, HeaderValue, LOCATION};
use hyper::StatusCode;

use crate::error::{Error, LegacyTwitterError, Result, TwitterErrors};

/// A set of headers returned with a response.
pub type Headers = HeaderMap<HeaderValue>;

const X_RATE_LIMIT_LIMIT: &str = "x-rate-limit-limit";
const X_RATE_LIMIT_REMAINING: &str = "x-rate-limit-remaining";
const X_RATE_LIMIT_RESET: &str = "x-rate-limit-reset";

/// Twitter's error code for "Rate limit exceeded".
const RATE_LIMIT_CODE: i32 = 88;

/// Error codes Twitter uses when a request couldn't be authenticated: "Could not authenticate
/// you", "Invalid or expired token", "Unable to verify your credentials", "Timestamp out of
/// bounds", and "Bad Authentication data".
const AUTHENTICATION_CODES: &[i32] = &[32, 89, 99, 135, 215];

/// "Enhance Your Calm", returned by the version 1 API when an application was being rate-limited.
const ENHANCE_YOUR_CALM: u16 = 420;

/// A complete response from Twitter, with its body fully read.
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Returns the value of the `Content-Type` header, if present and readable.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(hyper::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

/// Inspects the given response and converts any failure into the matching domain error.
///
/// A 2xx response is returned unmodified. Redirects become `UnsupportedRedirect`, since the
/// transport never follows them. For every other status, the status code decides first (401, 404,
/// 429/420), then any error codes Twitter put in the body, and finally the response falls into
/// the generic `ApiError`.
pub fn translate(resp: RawResponse) -> Result<RawResponse> {
    let status = resp.status;
    if status.is_success() {
        return Ok(resp);
    }

    if is_followable_redirect(status) {
        let location = resp
            .headers
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        return Err(Error::UnsupportedRedirect {
            status: status.as_u16(),
            location,
        });
    }

    match status {
        StatusCode::UNAUTHORIZED => return Err(Error::BadCredentials),
        StatusCode::NOT_FOUND => return Err(Error::ResourceNotFound),
        StatusCode::TOO_MANY_REQUESTS => {
            return Err(Error::RateLimitExceeded {
                reset: rate_limit_reset(&resp.headers),
            })
        }
        s if s.as_u16() == ENHANCE_YOUR_CALM => {
            return Err(Error::RateLimitExceeded {
                reset: rate_limit_reset(&resp.headers),
            })
        }
        _ => (),
    }

    if let Ok(errors) = serde_json::from_slice::<TwitterErrors>(&resp.body) {
        if errors.errors.iter().any(|e| AUTHENTICATION_CODES.contains(&e.code)) {
            return Err(Error::BadCredentials);
        }
        if errors.errors.iter().any(|e| e.code == RATE_LIMIT_CODE) {
            return Err(Error::RateLimitExceeded {
                reset: rate_limit_reset(&resp.headers),
            });
        }
        if let Some(first) = errors.errors.first() {
            return Err(Error::ApiError {
                status: status.as_u16(),
                code: Some(first.code),
                message: first.message.clone(),
            });
        }
    }

    if let Ok(legacy) = serde_json::from_slice::<LegacyTwitterError>(&resp.body) {
        let message = match legacy.request {
            Some(request) => format!("{} ({})", legacy.error, request),
            None => legacy.error,
        };
        return Err(Error::ApiError {
            status: status.as_u16(),
            code: None,
            message,
        });
    }

    Err(Error::ApiError {
        status: status.as_u16(),
        code: None,
        message: describe_status(status),
    })
}

/// Builds the generic description used when Twitter didn't explain a failure.
pub fn describe_status(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

fn is_followable_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

fn header_i64(headers: &Headers, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

/// Reads the UTC Unix timestamp at which the current rate window resets.
pub fn rate_limit_reset(headers: &Headers) -> Option<i64> {
    header_i64(headers, X_RATE_LIMIT_RESET)
}

/// Reads the rate-limit ceiling and the number of calls left in the current window.
pub fn rate_limit_status(headers: &Headers) -> Option<(i64, i64)> {
    Some((
        header_i64(headers, X_RATE_LIMIT_LIMIT)?,
        header_i64(headers, X_RATE_LIMIT_REMAINING)?,
    ))
}

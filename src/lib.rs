// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A library for interacting with Twitter.
//!
//! # Getting started
//!
//! Everything starts with a `Twitter` client. Build one anonymously to read public data, or with
//! the four OAuth strings of a user who has authorized your application to act on their behalf:
//!
//! ```rust,no_run
//! use birdhouse::Twitter;
//!
//! let public = Twitter::anonymous()?;
//! let results = public.search().search("rustlang")?;
//!
//! let user = Twitter::new(
//!     "consumer key", "consumer secret",
//!     "access token", "access token secret",
//! )?;
//! user.timeline().update_status("Hello from Rust!")?;
//! # Ok::<(), birdhouse::Error>(())
//! ```
//!
//! The client exposes one group of operations per area of the API: `timeline`, `users`,
//! `friends`, `lists`, `search` and `direct_messages`. Calls that act on behalf of a user fail
//! with `Error::BadCredentials` on an anonymous client, without a request being sent.
//!
//! # Under the hood
//!
//! Every call goes through a single `Pipeline`, which builds the request URI, signs the request
//! when the client has credentials, sends it and translates whatever came back into either the
//! requested type or an `Error`. Responses are decoded by a `codec::Decoder` whose rules smooth
//! over Twitter's date format, its string-or-number IDs and its polymorphic payloads before
//! `serde` sees them.
//!
//! Calls block the current thread until the response has arrived or the configured timeout has
//! passed. There is no retrying, no rate-limit scheduling and no response caching: a failure is
//! reported once, as it happened.
//!
//! For endpoints without a wrapper, use the pipeline directly, with a path relative to the API
//! base:
//!
//! ```rust,no_run
//! use birdhouse::{ParamList, Pipeline, Twitter};
//!
//! let twitter = Twitter::anonymous()?;
//! let params = ParamList::new().add_param("id", "20");
//! let retweets: Vec<birdhouse::models::Tweet> =
//!     twitter.pipeline().fetch("statuses/retweets/20.json", Some(&params))?;
//! # Ok::<(), birdhouse::Error>(())
//! ```
//!
//! # Logging
//!
//! The pipeline reports each request through `tracing`, inside a `twitter_request` span carrying
//! the method and path. Credentials are never logged.

mod common;
pub mod auth;
mod client;
pub mod codec;
pub mod config;
pub mod direct;
pub mod error;
pub mod friend;
mod links;
pub mod list;
pub mod models;
pub mod pipeline;
pub mod raw;
pub mod search;
pub mod timeline;
mod uri;
pub mod user;

pub use crate::auth::{Credentials, Identity, KeyPair};
pub use crate::client::Twitter;
pub use crate::common::ParamList;
pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Error, Result};
pub use crate::pipeline::{Pipeline, RestPipeline};
pub use crate::user::UserID;

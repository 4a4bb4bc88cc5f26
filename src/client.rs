// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The `Twitter` entry point.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::debug;

use crate::auth::{Credentials, Identity};
use crate::codec::Decoder;
use crate::config::Config;
use crate::direct::DirectMessageOperations;
use crate::error::Result;
use crate::friend::FriendOperations;
use crate::list::ListOperations;
use crate::pipeline::RestPipeline;
use crate::search::SearchOperations;
use crate::timeline::TimelineOperations;
use crate::user::UserOperations;

/// A client for the Twitter REST API.
///
/// A `Twitter` is built once, either anonymously or with a user's credentials, and cannot change
/// identity afterwards. It owns a single `RestPipeline` that every one of its operation groups
/// shares; the groups are handed out by reference and can be cloned cheaply if they need to
/// outlive the client borrow.
///
/// ```rust,no_run
/// use birdhouse::Twitter;
///
/// let twitter = Twitter::new(
///     "consumer key", "consumer secret",
///     "access token", "access token secret",
/// )?;
///
/// let tweet = twitter.timeline().update_status("Hello from Rust!")?;
/// println!("posted {}", tweet.id);
/// # Ok::<(), birdhouse::Error>(())
/// ```
///
/// `Twitter` is `Send` and `Sync`: share it behind an `Arc` to issue calls from several threads
/// at once.
#[derive(Debug)]
pub struct Twitter {
    pipeline: Arc<RestPipeline>,
    timeline: TimelineOperations<RestPipeline>,
    users: UserOperations<RestPipeline>,
    friends: FriendOperations<RestPipeline>,
    lists: ListOperations<RestPipeline>,
    search: SearchOperations<RestPipeline>,
    direct: DirectMessageOperations<RestPipeline>,
}

impl Twitter {
    /// Creates a client that sends its requests unsigned.
    ///
    /// Only the endpoints that don't act on behalf of a user are usable; everything else fails
    /// with `Error::BadCredentials`.
    pub fn anonymous() -> Result<Twitter> {
        Twitter::with_config(Identity::Anonymous, Config::default())
    }

    /// Creates a client that signs its requests with the given application and user credentials.
    pub fn new<A, B, C, D>(
        consumer_key: A,
        consumer_secret: B,
        access_token: C,
        access_token_secret: D,
    ) -> Result<Twitter>
    where
        A: Into<Cow<'static, str>>,
        B: Into<Cow<'static, str>>,
        C: Into<Cow<'static, str>>,
        D: Into<Cow<'static, str>>,
    {
        let creds = Credentials::new(consumer_key, consumer_secret, access_token, access_token_secret);
        Twitter::with_config(creds.into(), Config::default())
    }

    /// Creates a client with the given identity and configuration.
    ///
    /// Fails with `Error::MalformedUri` if `config.api_base` isn't an absolute URL, or with
    /// `Error::TransportFailure` if the transport could not be started.
    pub fn with_config(identity: Identity, config: Config) -> Result<Twitter> {
        let authorized = identity.is_authorized_for_user();
        let pipeline = Arc::new(RestPipeline::new(identity, config, Decoder::twitter())?);
        debug!(
            authorized,
            api_base = %pipeline.api_base(),
            rules = ?pipeline.decoder().rule_names(),
            "created client"
        );

        let users = UserOperations::new(pipeline.clone(), authorized);
        Ok(Twitter {
            timeline: TimelineOperations::new(pipeline.clone(), authorized),
            friends: FriendOperations::new(pipeline.clone(), authorized),
            lists: ListOperations::new(pipeline.clone(), users.clone(), authorized),
            search: SearchOperations::new(pipeline.clone(), authorized),
            direct: DirectMessageOperations::new(pipeline.clone(), authorized),
            users,
            pipeline,
        })
    }

    /// Returns whether this client signs its requests on behalf of a user.
    pub fn is_authorized_for_user(&self) -> bool {
        self.pipeline.is_authorized_for_user()
    }

    /// The request pipeline, for calling endpoints the operation groups don't cover.
    pub fn pipeline(&self) -> &Arc<RestPipeline> {
        &self.pipeline
    }

    pub fn timeline(&self) -> &TimelineOperations<RestPipeline> {
        &self.timeline
    }

    pub fn users(&self) -> &UserOperations<RestPipeline> {
        &self.users
    }

    pub fn friends(&self) -> &FriendOperations<RestPipeline> {
        &self.friends
    }

    pub fn lists(&self) -> &ListOperations<RestPipeline> {
        &self.lists
    }

    pub fn search(&self) -> &SearchOperations<RestPipeline> {
        &self.search
    }

    pub fn direct_messages(&self) -> &DirectMessageOperations<RestPipeline> {
        &self.direct
    }
}

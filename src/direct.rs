// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Structs and methods for working with direct messages.
//!
//! Every call in this module acts on behalf of the authenticated user, so all of them fail with
//! `Error::BadCredentials` on an anonymous client.

use std::fmt;
use std::sync::Arc;

use crate::common::*;
use crate::error::Result;
use crate::links;
use crate::models::DirectMessage;
use crate::pipeline::Pipeline;
use crate::timeline::Page;
use crate::user::UserID;

/// Operations on direct messages.
pub struct DirectMessageOperations<P> {
    pipeline: Arc<P>,
    authorized: bool,
}

impl<P> Clone for DirectMessageOperations<P> {
    fn clone(&self) -> Self {
        DirectMessageOperations {
            pipeline: self.pipeline.clone(),
            authorized: self.authorized,
        }
    }
}

impl<P: Pipeline> DirectMessageOperations<P> {
    pub fn new(pipeline: Arc<P>, authorized: bool) -> Self {
        DirectMessageOperations {
            pipeline,
            authorized,
        }
    }

    /// Load the messages sent to the authenticated user, newest first.
    pub fn received(&self, page: Page) -> Result<Vec<DirectMessage>> {
        self.list(links::direct::RECEIVED, page)
    }

    /// Load the messages the authenticated user has sent, newest first.
    pub fn sent(&self, page: Page) -> Result<Vec<DirectMessage>> {
        self.list(links::direct::SENT, page)
    }

    /// Load a single message by ID.
    pub fn show(&self, id: u64) -> Result<DirectMessage> {
        require_authorization(self.authorized)?;
        let params = ParamList::new().add_param("id", id.to_string());
        self.pipeline.fetch(links::direct::SHOW, Some(&params))
    }

    /// Send a message to the given user.
    pub fn send<T: Into<UserID>>(&self, to: T, text: &str) -> Result<DirectMessage> {
        require_authorization(self.authorized)?;
        let data = ParamList::new()
            .add_user_param(to.into())
            .add_param("text", text.to_string());
        self.pipeline.publish(links::direct::NEW, &data, None)
    }

    /// Delete a message from the authenticated user's inbox or outbox.
    pub fn delete(&self, id: u64) -> Result<()> {
        require_authorization(self.authorized)?;
        let params = ParamList::new().add_param("id", id.to_string());
        self.pipeline.remove(links::direct::DESTROY, Some(&params))
    }

    fn list(&self, path: &str, page: Page) -> Result<Vec<DirectMessage>> {
        require_authorization(self.authorized)?;
        let params = ParamList::new()
            .add_opt_param("count", page.count.map_string())
            .add_opt_param("since_id", page.since_id.map_string())
            .add_opt_param("max_id", page.max_id.map_string());
        self.pipeline.fetch(path, Some(&params))
    }
}

impl<P> fmt::Debug for DirectMessageOperations<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DirectMessageOperations")
            .field("authorized", &self.authorized)
            .finish()
    }
}

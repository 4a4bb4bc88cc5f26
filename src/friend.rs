// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Structs and methods for following and unfollowing accounts.
//!
//! The ID listings are cursored: pass `-1` to start at the first page, then keep handing back the
//! `next_cursor` of each page until it comes back as `0`.

use std::fmt;
use std::sync::Arc;

use crate::common::*;
use crate::error::Result;
use crate::links;
use crate::models::{CursoredIds, Relationship, TwitterProfile};
use crate::pipeline::Pipeline;
use crate::user::UserID;

/// Operations on the follow graph.
pub struct FriendOperations<P> {
    pipeline: Arc<P>,
    authorized: bool,
}

impl<P> Clone for FriendOperations<P> {
    fn clone(&self) -> Self {
        FriendOperations {
            pipeline: self.pipeline.clone(),
            authorized: self.authorized,
        }
    }
}

impl<P: Pipeline> FriendOperations<P> {
    pub fn new(pipeline: Arc<P>, authorized: bool) -> Self {
        FriendOperations {
            pipeline,
            authorized,
        }
    }

    /// Load a page of the IDs of the accounts the given user follows.
    pub fn friend_ids<T: Into<UserID>>(&self, acct: T, cursor: i64) -> Result<CursoredIds> {
        let params = ParamList::new()
            .add_user_param(acct.into())
            .add_param("cursor", cursor.to_string());
        self.pipeline.fetch(links::friends::FRIENDS_IDS, Some(&params))
    }

    /// Load a page of the IDs of the accounts that follow the given user.
    pub fn follower_ids<T: Into<UserID>>(&self, acct: T, cursor: i64) -> Result<CursoredIds> {
        let params = ParamList::new()
            .add_user_param(acct.into())
            .add_param("cursor", cursor.to_string());
        self.pipeline.fetch(links::friends::FOLLOWERS_IDS, Some(&params))
    }

    /// Follow the given account, returning its profile.
    ///
    /// Following a protected account sends a follow request instead.
    pub fn follow<T: Into<UserID>>(&self, acct: T) -> Result<TwitterProfile> {
        require_authorization(self.authorized)?;
        let data = ParamList::new()
            .add_user_param(acct.into())
            .add_param("follow", "true");
        self.pipeline.publish(links::friends::FOLLOW, &data, None)
    }

    /// Unfollow the given account, returning its profile.
    pub fn unfollow<T: Into<UserID>>(&self, acct: T) -> Result<TwitterProfile> {
        require_authorization(self.authorized)?;
        let data = ParamList::new().add_user_param(acct.into());
        self.pipeline.publish(links::friends::UNFOLLOW, &data, None)
    }

    /// Returns whether `source` follows `target`.
    pub fn friendship_exists<S, T>(&self, source: S, target: T) -> Result<bool>
    where
        S: Into<UserID>,
        T: Into<UserID>,
    {
        let mut params = ParamList::new();
        match source.into() {
            UserID::ID(id) => params.add_param_ref("source_id", id.to_string()),
            UserID::ScreenName(name) => params.add_param_ref("source_screen_name", name),
        }
        match target.into() {
            UserID::ID(id) => params.add_param_ref("target_id", id.to_string()),
            UserID::ScreenName(name) => params.add_param_ref("target_screen_name", name),
        }

        let relation: Relationship = self.pipeline.fetch(links::friends::SHOW, Some(&params))?;
        Ok(relation.relationship.source.following)
    }
}

impl<P> fmt::Debug for FriendOperations<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FriendOperations")
            .field("authorized", &self.authorized)
            .finish()
    }
}

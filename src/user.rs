// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Structs and methods for pulling user information from Twitter.
//!
//! Everything in this module hangs off `UserOperations`, which `Twitter::users` hands out. All
//! the calls that take a user accept anything that converts into a `UserID`, so you can pass
//! either a numeric ID or a screen name:
//!
//! ```rust,no_run
//! let twitter = birdhouse::Twitter::anonymous()?;
//!
//! let rustlang = twitter.users().show("rustlang")?;
//! let same = twitter.users().show(rustlang.id)?;
//! # Ok::<(), birdhouse::Error>(())
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::common::*;
use crate::error::Result;
use crate::links;
use crate::models::TwitterProfile;
use crate::pipeline::Pipeline;

/// Convenience enum to generalize between referring to an account by numeric ID or by screen
/// name.
///
/// Many API calls ask for a user either by either screen name (e.g. `rustlang`) or by a numeric ID
/// assigned to the account (e.g. `165262228`). This enum has `From` implementations for the
/// following types:
///
/// * `u64`
/// * `&u64` (convenient when used with iterators)
/// * `&'static str`
/// * `String`
/// * `&String` (to counteract the fact that deref coercion doesn't work with generics)
/// * `&UserID` (convenient when used with iterators)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserID {
    /// Referring via the account's numeric ID.
    ID(u64),
    /// Referring via the account's screen name.
    ScreenName(CowStr),
}

impl From<u64> for UserID {
    fn from(id: u64) -> UserID {
        UserID::ID(id)
    }
}

impl From<&u64> for UserID {
    fn from(id: &u64) -> UserID {
        UserID::ID(*id)
    }
}

impl From<&'static str> for UserID {
    fn from(name: &'static str) -> UserID {
        UserID::ScreenName(name.into())
    }
}

impl From<String> for UserID {
    fn from(name: String) -> UserID {
        UserID::ScreenName(name.into())
    }
}

impl From<&String> for UserID {
    fn from(name: &String) -> UserID {
        UserID::ScreenName(name.clone().into())
    }
}

impl From<&UserID> for UserID {
    fn from(id: &UserID) -> UserID {
        id.clone()
    }
}

impl fmt::Display for UserID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UserID::ID(id) => write!(f, "{}", id),
            UserID::ScreenName(name) => write!(f, "@{}", name),
        }
    }
}

/// The sizes Twitter renders a profile image in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ImageSize {
    /// 24x24 pixels.
    Mini,
    /// 48x48 pixels.
    Normal,
    /// 73x73 pixels.
    Bigger,
    /// The image as it was uploaded.
    Original,
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ImageSize::Mini => write!(f, "mini"),
            ImageSize::Normal => write!(f, "normal"),
            ImageSize::Bigger => write!(f, "bigger"),
            ImageSize::Original => write!(f, "original"),
        }
    }
}

#[derive(Deserialize)]
struct AccountIds {
    id: u64,
    screen_name: String,
}

/// Operations on user profiles.
pub struct UserOperations<P> {
    pipeline: Arc<P>,
    authorized: bool,
}

impl<P> Clone for UserOperations<P> {
    fn clone(&self) -> Self {
        UserOperations {
            pipeline: self.pipeline.clone(),
            authorized: self.authorized,
        }
    }
}

impl<P: Pipeline> UserOperations<P> {
    /// Creates a set of user operations over the given pipeline.
    ///
    /// `authorized` says whether the pipeline signs its requests on behalf of a user; when it
    /// doesn't, the calls that need one fail with `Error::BadCredentials` without a round trip.
    pub fn new(pipeline: Arc<P>, authorized: bool) -> Self {
        UserOperations {
            pipeline,
            authorized,
        }
    }

    /// Returns the numeric ID of the authenticated user.
    pub fn profile_id(&self) -> Result<u64> {
        self.account_ids().map(|ids| ids.id)
    }

    /// Returns the screen name of the authenticated user.
    pub fn screen_name(&self) -> Result<String> {
        self.account_ids().map(|ids| ids.screen_name)
    }

    /// Returns the full profile of the authenticated user.
    pub fn user_profile(&self) -> Result<TwitterProfile> {
        require_authorization(self.authorized)?;
        self.pipeline.fetch(links::account::VERIFY_CREDENTIALS, None)
    }

    /// Look up a single user by ID or screen name.
    pub fn show<T: Into<UserID>>(&self, acct: T) -> Result<TwitterProfile> {
        let params = ParamList::new().add_user_param(acct.into());
        self.pipeline.fetch(links::users::SHOW, Some(&params))
    }

    /// Look up profile information for several users at once.
    ///
    /// Twitter accepts up to 100 accounts per call; the IDs and screen names can be mixed. Users
    /// that don't exist (or are suspended) are left out of the result.
    pub fn lookup<T, I>(&self, accts: I) -> Result<Vec<TwitterProfile>>
    where
        T: Into<UserID>,
        I: IntoIterator<Item = T>,
    {
        let (ids, names) = multiple_names_param(accts);
        let mut params = ParamList::new();
        if !ids.is_empty() {
            params.add_param_ref("user_id", ids);
        }
        if !names.is_empty() {
            params.add_param_ref("screen_name", names);
        }

        self.pipeline.fetch(links::users::LOOKUP, Some(&params))
    }

    /// Search for users matching the given query. `page` starts at 1.
    pub fn search(&self, query: &str, page: u32, count: Option<u32>) -> Result<Vec<TwitterProfile>> {
        require_authorization(self.authorized)?;
        let params = ParamList::new()
            .add_param("q", query.to_string())
            .add_param("page", page.to_string())
            .add_opt_param("count", count.map_string());

        self.pipeline.fetch(links::users::SEARCH, Some(&params))
    }

    /// Download the profile image of the given screen name, in the given size.
    ///
    /// Twitter answers this endpoint with a redirect to the image itself, which the pipeline will
    /// not follow: expect `Error::UnsupportedRedirect` from Twitter's production servers, with the
    /// image location attached.
    pub fn profile_image(&self, screen_name: &str, size: ImageSize) -> Result<Vec<u8>> {
        let path = links::with_id(links::users::PROFILE_IMAGE_STEM, screen_name);
        let params = ParamList::new().add_param("size", size.to_string());
        self.pipeline.fetch_binary(&path, Some(&params))
    }

    fn account_ids(&self) -> Result<AccountIds> {
        require_authorization(self.authorized)?;
        self.pipeline.fetch(links::account::VERIFY_CREDENTIALS, None)
    }
}

impl<P> fmt::Debug for UserOperations<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("UserOperations")
            .field("authorized", &self.authorized)
            .finish()
    }
}

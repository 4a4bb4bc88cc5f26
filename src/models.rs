// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Data types returned by the resource operations.
//!
//! These types expect to be decoded by a `Decoder` carrying the Twitter rule set: timestamps are
//! plain `DateTime<Utc>` and IDs are plain `u64`, because the rules have already normalized them
//! by the time `serde` sees the data. Only the fields this library uses are modelled; everything
//! else Twitter sends is ignored.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::TwitterErrorCode;

/// A single tweet.
#[derive(Debug, Clone, Deserialize)]
pub struct Tweet {
    /// Numeric ID for this tweet.
    pub id: u64,
    /// UTC timestamp from when the tweet was posted.
    pub created_at: DateTime<Utc>,
    /// The text of the tweet. Tweets loaded in extended mode deliver it as `full_text`.
    #[serde(alias = "full_text")]
    pub text: String,
    /// The user who posted this tweet. Absent when the tweet was loaded as part of a user's own
    /// timeline with `trim_user` set.
    pub user: Option<Box<TwitterProfile>>,
    /// If this tweet is a reply, the ID of the tweet it replies to.
    pub in_reply_to_status_id: Option<u64>,
    /// If this tweet is a reply, the ID of the user it replies to.
    pub in_reply_to_user_id: Option<u64>,
    /// If this tweet is a reply, the screen name of the user it replies to.
    pub in_reply_to_screen_name: Option<String>,
    /// The number of times this tweet has been retweeted.
    #[serde(default)]
    pub retweet_count: i64,
    /// Whether the authenticated user has liked this tweet.
    pub favorited: Option<bool>,
    /// The tweet this one retweets, if it is a retweet.
    pub retweeted_status: Option<Box<Tweet>>,
    /// The application used to post this tweet, as an HTML anchor.
    pub source: Option<String>,
    /// The machine-detected language of the tweet.
    pub lang: Option<String>,
}

/// A Twitter user account.
#[derive(Debug, Clone, Deserialize)]
pub struct TwitterProfile {
    /// Unique identifier for this user.
    pub id: u64,
    /// The screen name, handle, or alias the user identifies themselves with.
    pub screen_name: String,
    /// The user-entered display name.
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub profile_image_url: Option<String>,
    pub profile_image_url_https: Option<String>,
    #[serde(default)]
    pub followers_count: i64,
    #[serde(default)]
    pub friends_count: i64,
    #[serde(default)]
    pub statuses_count: i64,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub verified: bool,
    /// When the account was created.
    pub created_at: Option<DateTime<Utc>>,
}

/// A direct message between two users.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectMessage {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub text: String,
    pub sender_id: u64,
    pub recipient_id: u64,
    pub sender_screen_name: Option<String>,
    pub recipient_screen_name: Option<String>,
}

/// A curated list of users.
#[derive(Debug, Clone, Deserialize)]
pub struct UserList {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub full_name: Option<String>,
    pub description: Option<String>,
    /// Either `public` or `private`.
    pub mode: String,
    #[serde(default)]
    pub member_count: i64,
    #[serde(default)]
    pub subscriber_count: i64,
    /// The owner of the list.
    pub user: Option<Box<TwitterProfile>>,
}

/// A page of tweets matching a search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    pub statuses: Vec<Tweet>,
    #[serde(default)]
    pub search_metadata: SearchMetadata,
}

/// Paging information attached to a page of search results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchMetadata {
    #[serde(default)]
    pub max_id: u64,
    #[serde(default)]
    pub since_id: u64,
    #[serde(default)]
    pub count: u32,
    pub query: Option<String>,
    /// The query string for the next (older) page, if there is one.
    pub next_results: Option<String>,
}

/// A page of user IDs from a cursored endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CursoredIds {
    pub ids: Vec<u64>,
    /// Cursor for the next page; `0` when this is the last page.
    #[serde(default)]
    pub next_cursor: i64,
    /// Cursor for the previous page; `0` when this is the first page.
    #[serde(default)]
    pub previous_cursor: i64,
}

/// A page of lists from a cursored endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CursoredLists {
    pub lists: Vec<UserList>,
    #[serde(default)]
    pub next_cursor: i64,
    #[serde(default)]
    pub previous_cursor: i64,
}

/// The relationship between two users, as returned by `friendships/show`.
#[derive(Debug, Clone, Deserialize)]
pub struct Relationship {
    pub relationship: RelationshipPair,
}

/// Both sides of a `Relationship`.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipPair {
    pub source: RelationshipSide,
    pub target: RelationshipSide,
}

/// How one user in a `Relationship` relates to the other.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipSide {
    pub id: u64,
    pub screen_name: String,
    #[serde(default)]
    pub following: bool,
    #[serde(default)]
    pub followed_by: bool,
}

/// An error carried inside an otherwise successful response.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityError {
    #[serde(default)]
    pub errors: Vec<TwitterErrorCode>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A value whose shape depends on which fields Twitter included.
///
/// Decoding an `Entity` relies on the `entity_kind` tag that `codec::EntityKindRule` adds, so it
/// only works through a `Decoder` with that rule installed.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "entity_kind", rename_all = "snake_case")]
pub enum Entity {
    /// A tweet that retweets another tweet.
    Retweet(Tweet),
    /// An ordinary tweet.
    Status(Tweet),
    /// A user account.
    User(TwitterProfile),
    /// A direct message.
    DirectMessage(DirectMessage),
    /// A list.
    List(UserList),
    /// An error report.
    Error(EntityError),
}

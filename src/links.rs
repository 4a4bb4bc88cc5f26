// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Endpoint paths, relative to the API base.

pub const API_URL_BASE: &str = "https://api.twitter.com/1.1/";

pub mod account {
    pub const VERIFY_CREDENTIALS: &str = "account/verify_credentials.json";
}

pub mod statuses {
    pub const HOME_TIMELINE: &str = "statuses/home_timeline.json";
    pub const USER_TIMELINE: &str = "statuses/user_timeline.json";
    pub const MENTIONS_TIMELINE: &str = "statuses/mentions_timeline.json";
    pub const SHOW_STEM: &str = "statuses/show";
    pub const UPDATE: &str = "statuses/update.json";
    pub const DESTROY_STEM: &str = "statuses/destroy";
    pub const RETWEET_STEM: &str = "statuses/retweet";
    pub const LIKE: &str = "favorites/create.json";
    pub const UNLIKE: &str = "favorites/destroy.json";
}

pub mod users {
    pub const SHOW: &str = "users/show.json";
    pub const LOOKUP: &str = "users/lookup.json";
    pub const SEARCH: &str = "users/search.json";
    pub const PROFILE_IMAGE_STEM: &str = "users/profile_image";
}

pub mod friends {
    pub const FRIENDS_IDS: &str = "friends/ids.json";
    pub const FOLLOWERS_IDS: &str = "followers/ids.json";
    pub const FOLLOW: &str = "friendships/create.json";
    pub const UNFOLLOW: &str = "friendships/destroy.json";
    pub const SHOW: &str = "friendships/show.json";
}

pub mod lists {
    pub const LIST: &str = "lists/list.json";
    pub const OWNERSHIPS: &str = "lists/ownerships.json";
    pub const SHOW: &str = "lists/show.json";
    pub const STATUSES: &str = "lists/statuses.json";
    pub const CREATE: &str = "lists/create.json";
    pub const DESTROY: &str = "lists/destroy.json";
    pub const ADD_MEMBER: &str = "lists/members/create.json";
}

pub mod search {
    pub const TWEETS: &str = "search/tweets.json";
}

pub mod direct {
    pub const RECEIVED: &str = "direct_messages.json";
    pub const SENT: &str = "direct_messages/sent.json";
    pub const SHOW: &str = "direct_messages/show.json";
    pub const NEW: &str = "direct_messages/new.json";
    pub const DESTROY: &str = "direct_messages/destroy.json";
}

/// Path prefixes of endpoints that only answer requests signed on behalf of a user.
const AUTHORIZED_ONLY: &[&str] = &[
    "account/",
    "blocks/",
    "direct_messages",
    "favorites/create",
    "favorites/destroy",
    "friendships/create",
    "friendships/destroy",
    "friendships/update",
    "friendships/incoming",
    "friendships/outgoing",
    "lists/create",
    "lists/destroy",
    "lists/update",
    "lists/members/create",
    "lists/members/destroy",
    "lists/subscribers/create",
    "lists/subscribers/destroy",
    "mutes/",
    "saved_searches/",
    "statuses/destroy",
    "statuses/home_timeline",
    "statuses/mentions_timeline",
    "statuses/retweet/",
    "statuses/retweets_of_me",
    "statuses/update",
];

/// Returns whether the endpoint at the given path is known to require an authorized user.
///
/// Paths that aren't listed are assumed to be public; if Twitter disagrees, its rejection is
/// reported as `Error::BadCredentials` all the same.
pub fn requires_authorization(path: &str) -> bool {
    let path = path.trim_start_matches('/');
    AUTHORIZED_ONLY.iter().any(|prefix| path.starts_with(prefix))
}

/// Builds the path of an endpoint that takes an ID as its last segment, like `statuses/show/:id`.
pub fn with_id(stem: &str, id: impl std::fmt::Display) -> String {
    format!("{}/{}.json", stem, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_classification() {
        assert!(requires_authorization(account::VERIFY_CREDENTIALS));
        assert!(requires_authorization("/account/verify_credentials.json"));
        assert!(requires_authorization(statuses::UPDATE));
        assert!(requires_authorization(statuses::HOME_TIMELINE));
        assert!(requires_authorization(&with_id(statuses::DESTROY_STEM, 20)));
        assert!(requires_authorization(direct::RECEIVED));
        assert!(requires_authorization(direct::SENT));
        assert!(requires_authorization(lists::CREATE));

        assert!(!requires_authorization(search::TWEETS));
        assert!(!requires_authorization("search.json"));
        assert!(!requires_authorization(statuses::USER_TIMELINE));
        assert!(!requires_authorization(users::SHOW));
        assert!(!requires_authorization(lists::STATUSES));
        assert!(!requires_authorization("statuses/retweets/20.json"));
    }

    #[test]
    fn id_paths() {
        assert_eq!(with_id(statuses::SHOW_STEM, 20), "statuses/show/20.json");
    }
}

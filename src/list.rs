// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Structs and methods for working with lists.
//!
//! Lists are referred to by their numeric ID, or by the screen name of their owner together with
//! the list's "slug", the lowercased, URL-safe form of its name. The calls on `ListOperations`
//! that work on the authenticated user's own lists look up that user first, so they cost one extra
//! request.

use std::fmt;
use std::sync::Arc;

use crate::common::*;
use crate::error::Result;
use crate::links;
use crate::models::{CursoredLists, Tweet, UserList};
use crate::pipeline::Pipeline;
use crate::timeline::Page;
use crate::user::{UserID, UserOperations};

/// Whether a list is visible to other users.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ListMode {
    Public,
    Private,
}

impl fmt::Display for ListMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ListMode::Public => write!(f, "public"),
            ListMode::Private => write!(f, "private"),
        }
    }
}

/// Operations on lists.
pub struct ListOperations<P> {
    pipeline: Arc<P>,
    users: UserOperations<P>,
    authorized: bool,
}

impl<P> Clone for ListOperations<P> {
    fn clone(&self) -> Self {
        ListOperations {
            pipeline: self.pipeline.clone(),
            users: self.users.clone(),
            authorized: self.authorized,
        }
    }
}

impl<P: Pipeline> ListOperations<P> {
    /// Creates a set of list operations, using `users` to find out who the authenticated user is.
    pub fn new(pipeline: Arc<P>, users: UserOperations<P>, authorized: bool) -> Self {
        ListOperations {
            pipeline,
            users,
            authorized,
        }
    }

    /// Load the lists the given user owns or subscribes to.
    pub fn lists<T: Into<UserID>>(&self, acct: T) -> Result<Vec<UserList>> {
        let params = ParamList::new().add_user_param(acct.into());
        self.pipeline.fetch(links::lists::LIST, Some(&params))
    }

    /// Load a page of the lists the given user owns. Pass `-1` as the cursor for the first page.
    pub fn ownerships<T: Into<UserID>>(&self, acct: T, cursor: i64) -> Result<CursoredLists> {
        let params = ParamList::new()
            .add_user_param(acct.into())
            .add_param("cursor", cursor.to_string());
        self.pipeline.fetch(links::lists::OWNERSHIPS, Some(&params))
    }

    /// Load the lists the authenticated user owns or subscribes to.
    pub fn own_lists(&self) -> Result<Vec<UserList>> {
        let me = self.users.profile_id()?;
        self.lists(me)
    }

    /// Load a list by ID.
    pub fn show(&self, list_id: u64) -> Result<UserList> {
        let params = ParamList::new().add_param("list_id", list_id.to_string());
        self.pipeline.fetch(links::lists::SHOW, Some(&params))
    }

    /// Load one of the authenticated user's lists by its slug.
    pub fn own_list(&self, slug: &str) -> Result<UserList> {
        let owner = self.users.screen_name()?;
        let params = ParamList::new()
            .add_param("slug", slug.to_string())
            .add_param("owner_screen_name", owner);
        self.pipeline.fetch(links::lists::SHOW, Some(&params))
    }

    /// Load the timeline of tweets posted by the members of a list.
    pub fn statuses(&self, list_id: u64, page: Page) -> Result<Vec<Tweet>> {
        let params = ParamList::new()
            .add_param("list_id", list_id.to_string())
            .add_opt_param("count", page.count.map_string())
            .add_opt_param("since_id", page.since_id.map_string())
            .add_opt_param("max_id", page.max_id.map_string());
        self.pipeline.fetch(links::lists::STATUSES, Some(&params))
    }

    /// Create a new list owned by the authenticated user.
    pub fn create(&self, name: &str, description: Option<&str>, mode: ListMode) -> Result<UserList> {
        require_authorization(self.authorized)?;
        let data = ParamList::new()
            .add_param("name", name.to_string())
            .add_param("mode", mode.to_string())
            .add_opt_param("description", description.map(str::to_string));
        self.pipeline.publish(links::lists::CREATE, &data, None)
    }

    /// Delete one of the authenticated user's lists.
    pub fn delete(&self, list_id: u64) -> Result<()> {
        require_authorization(self.authorized)?;
        let params = ParamList::new().add_param("list_id", list_id.to_string());
        self.pipeline.remove(links::lists::DESTROY, Some(&params))
    }

    /// Add an account to one of the authenticated user's lists.
    pub fn add_member<T: Into<UserID>>(&self, list_id: u64, acct: T) -> Result<UserList> {
        require_authorization(self.authorized)?;
        let data = ParamList::new()
            .add_param("list_id", list_id.to_string())
            .add_user_param(acct.into());
        self.pipeline.publish(links::lists::ADD_MEMBER, &data, None)
    }
}

impl<P> fmt::Debug for ListOperations<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ListOperations")
            .field("authorized", &self.authorized)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pipeline::testing::*;

    fn ops(pipeline: MockPipeline, authorized: bool) -> (Arc<MockPipeline>, ListOperations<MockPipeline>) {
        let pipeline = Arc::new(pipeline);
        let users = UserOperations::new(pipeline.clone(), authorized);
        (pipeline.clone(), ListOperations::new(pipeline, users, authorized))
    }

    fn list_json(id: u64, slug: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "id_str": id.to_string(),
            "name": slug,
            "slug": slug,
            "full_name": format!("@me/{}", slug),
            "mode": "public",
            "member_count": 3,
            "user": user_json(42, "me"),
        })
    }

    #[test]
    fn own_lists_resolve_the_current_user() {
        let mock = MockPipeline::new()
            .respond_with(user_json(42, "me"))
            .respond_with(serde_json::json!([list_json(1, "rust"), list_json(2, "news")]));
        let (mock, lists) = ops(mock, true);

        let found = lists.own_lists().unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].slug, "rust");

        let calls = mock.calls();
        assert_eq!(calls[0].path, "account/verify_credentials.json");
        assert_eq!(calls[1].path, "lists/list.json");
        assert_eq!(calls[1].params.to_urlencoded(), "user_id=42");
    }

    #[test]
    fn ownerships_are_cursored() {
        let mock = MockPipeline::new().respond_with(serde_json::json!({
            "lists": [list_json(1, "rust")],
            "next_cursor": 0,
            "previous_cursor": 0,
        }));
        let (mock, lists) = ops(mock, false);

        let page = lists.ownerships("me", -1).unwrap();
        assert_eq!(page.lists[0].slug, "rust");
        assert_eq!(page.next_cursor, 0);

        let call = mock.last_call();
        assert_eq!(call.path, "lists/ownerships.json");
        assert_eq!(call.params.to_urlencoded(), "screen_name=me&cursor=-1");
    }

    #[test]
    fn own_list_by_slug() {
        let mock = MockPipeline::new()
            .respond_with(user_json(42, "me"))
            .respond_with(list_json(1, "rust"));
        let (mock, lists) = ops(mock, true);

        assert_eq!(lists.own_list("rust").unwrap().id, 1);
        assert_eq!(
            mock.last_call().params.to_urlencoded(),
            "slug=rust&owner_screen_name=me"
        );
    }

    #[test]
    fn anonymous_list_management_is_refused() {
        let (mock, lists) = ops(MockPipeline::new(), false);

        assert!(matches!(lists.own_lists(), Err(Error::BadCredentials)));
        assert!(matches!(lists.create("rust", None, ListMode::Public), Err(Error::BadCredentials)));
        assert!(matches!(lists.delete(1), Err(Error::BadCredentials)));
        assert!(matches!(lists.add_member(1, "rustlang"), Err(Error::BadCredentials)));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn create_and_delete() {
        let mock = MockPipeline::new().respond_with(list_json(7, "rust"));
        let (mock, lists) = ops(mock, true);

        lists.create("rust", Some("All things Rust"), ListMode::Private).unwrap();
        lists.delete(7).unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].method, "POST");
        assert_eq!(
            calls[0].data.as_ref().unwrap().to_urlencoded(),
            "name=rust&mode=private&description=All%20things%20Rust"
        );
        assert_eq!(calls[1].method, "DELETE");
        assert_eq!(calls[1].path, "lists/destroy.json");
        assert_eq!(calls[1].params.to_urlencoded(), "list_id=7");
    }

    #[test]
    fn list_statuses_are_public() {
        let mock = MockPipeline::new().respond_with(serde_json::json!([tweet_json(5, "hi")]));
        let (mock, lists) = ops(mock, false);

        let tweets = lists.statuses(7, Page::default().count(1)).unwrap();
        assert_eq!(tweets[0].id, 5);
        assert_eq!(mock.last_call().params.to_urlencoded(), "list_id=7&count=1");
    }
}

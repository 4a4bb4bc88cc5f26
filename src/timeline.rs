// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Structs and methods for working with timelines and individual tweets.
//!
//! The timeline calls all take a `Page`, which carries the paging parameters Twitter accepts on
//! every timeline endpoint. `Page::default()` asks for the most recent page with Twitter's default
//! size:
//!
//! ```rust,no_run
//! use birdhouse::timeline::Page;
//!
//! let twitter = birdhouse::Twitter::anonymous()?;
//!
//! let tweets = twitter.timeline().user_timeline("rustlang", Page::default().count(20))?;
//! if let Some(oldest) = tweets.last() {
//!     let older = twitter.timeline().user_timeline("rustlang", Page::default().max_id(oldest.id - 1))?;
//! }
//! # Ok::<(), birdhouse::Error>(())
//! ```

use std::fmt;
use std::sync::Arc;

use crate::common::*;
use crate::error::Result;
use crate::links;
use crate::models::{Entity, Tweet};
use crate::pipeline::Pipeline;
use crate::user::UserID;

/// Paging parameters for a timeline call.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// How many tweets to ask for. Twitter caps this at 200.
    pub count: Option<u32>,
    /// Only return tweets newer than this ID.
    pub since_id: Option<u64>,
    /// Only return tweets with an ID at or below this one.
    pub max_id: Option<u64>,
}

impl Page {
    pub fn count(self, count: u32) -> Self {
        Page {
            count: Some(count),
            ..self
        }
    }

    pub fn since_id(self, since_id: u64) -> Self {
        Page {
            since_id: Some(since_id),
            ..self
        }
    }

    pub fn max_id(self, max_id: u64) -> Self {
        Page {
            max_id: Some(max_id),
            ..self
        }
    }

    fn to_params(self) -> ParamList {
        ParamList::new()
            .add_opt_param("count", self.count.map_string())
            .add_opt_param("since_id", self.since_id.map_string())
            .add_opt_param("max_id", self.max_id.map_string())
    }
}

/// Operations on timelines and tweets.
pub struct TimelineOperations<P> {
    pipeline: Arc<P>,
    authorized: bool,
}

impl<P> Clone for TimelineOperations<P> {
    fn clone(&self) -> Self {
        TimelineOperations {
            pipeline: self.pipeline.clone(),
            authorized: self.authorized,
        }
    }
}

impl<P: Pipeline> TimelineOperations<P> {
    pub fn new(pipeline: Arc<P>, authorized: bool) -> Self {
        TimelineOperations {
            pipeline,
            authorized,
        }
    }

    /// Load the authenticated user's home timeline: their own tweets and those of the accounts
    /// they follow.
    pub fn home_timeline(&self, page: Page) -> Result<Vec<Tweet>> {
        require_authorization(self.authorized)?;
        self.pipeline
            .fetch(links::statuses::HOME_TIMELINE, Some(&page.to_params()))
    }

    /// Load the home timeline as `Entity` values, telling retweets apart from ordinary tweets.
    pub fn home_entities(&self, page: Page) -> Result<Vec<Entity>> {
        require_authorization(self.authorized)?;
        self.pipeline
            .fetch(links::statuses::HOME_TIMELINE, Some(&page.to_params()))
    }

    /// Load the tweets posted by the given user.
    pub fn user_timeline<T: Into<UserID>>(&self, acct: T, page: Page) -> Result<Vec<Tweet>> {
        let params = page.to_params().add_user_param(acct.into());
        self.pipeline
            .fetch(links::statuses::USER_TIMELINE, Some(&params))
    }

    /// Load the tweets that mention the authenticated user.
    pub fn mentions(&self, page: Page) -> Result<Vec<Tweet>> {
        require_authorization(self.authorized)?;
        self.pipeline
            .fetch(links::statuses::MENTIONS_TIMELINE, Some(&page.to_params()))
    }

    /// Load a single tweet by ID.
    pub fn show(&self, id: u64) -> Result<Tweet> {
        self.pipeline
            .fetch(&links::with_id(links::statuses::SHOW_STEM, id), None)
    }

    /// Post a new tweet.
    pub fn update_status(&self, status: &str) -> Result<Tweet> {
        self.update(status, None)
    }

    /// Post a new tweet in reply to the given one.
    ///
    /// Twitter only threads the reply if `status` mentions the author of the tweet it replies to.
    pub fn reply(&self, status: &str, in_reply_to: u64) -> Result<Tweet> {
        self.update(status, Some(in_reply_to))
    }

    /// Delete one of the authenticated user's tweets.
    pub fn delete_status(&self, id: u64) -> Result<()> {
        require_authorization(self.authorized)?;
        self.pipeline
            .remove(&links::with_id(links::statuses::DESTROY_STEM, id), None)
    }

    /// Retweet the given tweet.
    pub fn retweet(&self, id: u64) -> Result<Tweet> {
        require_authorization(self.authorized)?;
        let data = ParamList::new();
        self.pipeline
            .publish(&links::with_id(links::statuses::RETWEET_STEM, id), &data, None)
    }

    /// Like the given tweet.
    pub fn favorite(&self, id: u64) -> Result<Tweet> {
        require_authorization(self.authorized)?;
        let data = ParamList::new().add_param("id", id.to_string());
        self.pipeline.publish(links::statuses::LIKE, &data, None)
    }

    /// Clear a like from the given tweet.
    pub fn unfavorite(&self, id: u64) -> Result<Tweet> {
        require_authorization(self.authorized)?;
        let data = ParamList::new().add_param("id", id.to_string());
        self.pipeline.publish(links::statuses::UNLIKE, &data, None)
    }

    fn update(&self, status: &str, in_reply_to: Option<u64>) -> Result<Tweet> {
        require_authorization(self.authorized)?;
        let data = ParamList::new()
            .add_param("status", status.to_string())
            .add_opt_param("in_reply_to_status_id", in_reply_to.map_string());
        self.pipeline.publish(links::statuses::UPDATE, &data, None)
    }
}

impl<P> fmt::Debug for TimelineOperations<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TimelineOperations")
            .field("authorized", &self.authorized)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pipeline::testing::*;

    fn ops(pipeline: MockPipeline, authorized: bool) -> (Arc<MockPipeline>, TimelineOperations<MockPipeline>) {
        let pipeline = Arc::new(pipeline);
        (pipeline.clone(), TimelineOperations::new(pipeline, authorized))
    }

    #[test]
    fn paging_params() {
        let page = Page::default().count(20).max_id(99);
        assert_eq!(page.to_params().to_urlencoded(), "count=20&max_id=99");
        assert!(Page::default().to_params().is_empty());
    }

    #[test]
    fn user_timeline_is_public() {
        let mock = MockPipeline::new().respond_with(serde_json::json!([
            tweet_json(2, "newer"),
            tweet_json(1, "older"),
        ]));
        let (mock, timeline) = ops(mock, false);

        let tweets = timeline.user_timeline("rustlang", Page::default().count(2)).unwrap();
        assert_eq!(tweets.len(), 2);
        assert_eq!(tweets[0].text, "newer");

        let call = mock.last_call();
        assert_eq!(call.method, "GET");
        assert_eq!(call.path, "statuses/user_timeline.json");
        assert_eq!(call.params.to_urlencoded(), "count=2&screen_name=rustlang");
    }

    #[test]
    fn anonymous_writes_never_reach_the_pipeline() {
        let (mock, timeline) = ops(MockPipeline::new(), false);

        assert!(matches!(timeline.home_timeline(Page::default()), Err(Error::BadCredentials)));
        assert!(matches!(timeline.mentions(Page::default()), Err(Error::BadCredentials)));
        assert!(matches!(timeline.update_status("hello"), Err(Error::BadCredentials)));
        assert!(matches!(timeline.delete_status(1), Err(Error::BadCredentials)));
        assert!(matches!(timeline.retweet(1), Err(Error::BadCredentials)));
        assert!(matches!(timeline.favorite(1), Err(Error::BadCredentials)));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn update_posts_form_data() {
        let mock = MockPipeline::new()
            .respond_with(tweet_json(10, "hello"))
            .respond_with(tweet_json(11, "@twitter hi"));
        let (mock, timeline) = ops(mock, true);

        let tweet = timeline.update_status("hello").unwrap();
        assert_eq!(tweet.id, 10);
        timeline.reply("@twitter hi", 10).unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].method, "POST");
        assert_eq!(calls[0].path, "statuses/update.json");
        assert_eq!(calls[0].data.as_ref().unwrap().to_urlencoded(), "status=hello");
        assert_eq!(
            calls[1].data.as_ref().unwrap().to_urlencoded(),
            "status=%40twitter%20hi&in_reply_to_status_id=10"
        );
    }

    #[test]
    fn status_paths() {
        let mock = MockPipeline::new()
            .respond_with(tweet_json(20, "show"))
            .respond_with(tweet_json(21, "retweet"));
        let (mock, timeline) = ops(mock, true);

        timeline.show(20).unwrap();
        timeline.retweet(20).unwrap();
        timeline.delete_status(20).unwrap();

        let calls: Vec<_> = mock.calls().into_iter().map(|c| (c.method, c.path)).collect();
        assert_eq!(
            calls,
            vec![
                ("GET", "statuses/show/20.json".to_string()),
                ("POST", "statuses/retweet/20.json".to_string()),
                ("DELETE", "statuses/destroy/20.json".to_string()),
            ]
        );
    }

    #[test]
    fn home_entities_tell_retweets_apart() {
        let mut retweet = tweet_json(31, "RT @twitter: original");
        retweet["retweeted_status"] = tweet_json(30, "original");
        let mock = MockPipeline::new()
            .respond_with(serde_json::json!([retweet, tweet_json(29, "plain")]));
        let (_, timeline) = ops(mock, true);

        let entities = timeline.home_entities(Page::default()).unwrap();
        assert!(matches!(&entities[0], Entity::Retweet(t) if t.id == 31));
        assert!(matches!(&entities[1], Entity::Status(t) if t.id == 29));
    }
}

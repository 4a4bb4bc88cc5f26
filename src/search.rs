// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Structs and methods for searching for tweets.
//!
//! Since there are several optional parameters for searches, this is handled with a builder
//! pattern. To begin, call `search::query` with your requested search term. Additional parameters
//! can be added onto the `SearchBuilder` struct that is returned. When you're ready to load the
//! first page of results, hand it to `SearchOperations::search`.
//!
//! ```rust,no_run
//! use birdhouse::search::{self, ResultType};
//!
//! let twitter = birdhouse::Twitter::anonymous()?;
//! let results = twitter.search().search(
//!     search::query("rustlang").result_type(ResultType::Recent).count(20),
//! )?;
//!
//! for tweet in &results.statuses {
//!     println!("{}", tweet.text);
//! }
//!
//! let older = twitter.search().older(&results)?;
//! # Ok::<(), birdhouse::Error>(())
//! ```
//!
//! Once you have a `SearchResult`, you can navigate the search results by handing it to `older`
//! and `newer` to get the next and previous pages, respectively. The result keeps the parameters
//! of the search that produced it, so the next page asks for the same thing.

use std::fmt;
use std::sync::Arc;

use crate::common::*;
use crate::error::Result;
use crate::links;
use crate::models::{SearchMetadata, SearchResults, Tweet};
use crate::pipeline::Pipeline;

/// Begin setting up a tweet search with the given query.
pub fn query(query: impl Into<CowStr>) -> SearchBuilder {
    SearchBuilder {
        query: query.into(),
        lang: None,
        result_type: None,
        count: None,
        since_id: None,
        max_id: None,
    }
}

/// Represents what kind of tweets should be included in search results.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResultType {
    /// Return only the most recent tweets in the response.
    Recent,
    /// Return only the most popular tweets in the response.
    Popular,
    /// Include both popular and real-time results in the response.
    Mixed,
}

/// Display impl that turns the variants into strings that can be used as search parameters.
impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ResultType::Recent => write!(f, "recent"),
            ResultType::Popular => write!(f, "popular"),
            ResultType::Mixed => write!(f, "mixed"),
        }
    }
}

/// Represents a tweet search query before being sent.
#[must_use = "SearchBuilder is lazy and won't do anything unless it is handed to `search`"]
#[derive(Debug, Clone)]
pub struct SearchBuilder {
    query: CowStr,
    lang: Option<CowStr>,
    result_type: Option<ResultType>,
    count: Option<u32>,
    since_id: Option<u64>,
    max_id: Option<u64>,
}

impl SearchBuilder {
    /// Restrict search results to those that have been machine-parsed as the given two-letter
    /// language code.
    pub fn lang(self, lang: impl Into<CowStr>) -> Self {
        SearchBuilder {
            lang: Some(lang.into()),
            ..self
        }
    }

    /// Specify the type of search results to include. The default is `Mixed`.
    pub fn result_type(self, result_type: ResultType) -> Self {
        SearchBuilder {
            result_type: Some(result_type),
            ..self
        }
    }

    /// Set the number of tweets to return per-page, up to a maximum of 100. The default is 15.
    pub fn count(self, count: u32) -> Self {
        SearchBuilder {
            count: Some(count),
            ..self
        }
    }

    /// Restricts results to those with higher IDs than (i.e. that were posted after) the given
    /// tweet ID.
    pub fn since_tweet(self, since_id: u64) -> Self {
        SearchBuilder {
            since_id: Some(since_id),
            ..self
        }
    }

    /// Restricts results to those with IDs no higher than (i.e. were posted earlier than) the given
    /// tweet ID. Will include the given tweet in search results.
    pub fn max_tweet(self, max_id: u64) -> Self {
        SearchBuilder {
            max_id: Some(max_id),
            ..self
        }
    }

    fn to_params(&self) -> ParamList {
        ParamList::new()
            .add_param("q", self.query.clone())
            .add_opt_param("lang", self.lang.clone())
            .add_opt_param("result_type", self.result_type.map_string())
            .add_opt_param("count", self.count.map_string())
            .add_opt_param("since_id", self.since_id.map_string())
            .add_opt_param("max_id", self.max_id.map_string())
    }
}

impl From<&'static str> for SearchBuilder {
    fn from(q: &'static str) -> SearchBuilder {
        query(q)
    }
}

impl From<String> for SearchBuilder {
    fn from(q: String) -> SearchBuilder {
        query(q)
    }
}

/// Represents a page of search results, along with metadata to request the next or previous page.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The list of statuses in this page of results.
    pub statuses: Vec<Tweet>,
    /// What Twitter reported about this page.
    pub metadata: SearchMetadata,
    params: ParamList,
}

/// Operations on the tweet search endpoint.
pub struct SearchOperations<P> {
    pipeline: Arc<P>,
    authorized: bool,
}

impl<P> Clone for SearchOperations<P> {
    fn clone(&self) -> Self {
        SearchOperations {
            pipeline: self.pipeline.clone(),
            authorized: self.authorized,
        }
    }
}

impl<P: Pipeline> SearchOperations<P> {
    pub fn new(pipeline: Arc<P>, authorized: bool) -> Self {
        SearchOperations {
            pipeline,
            authorized,
        }
    }

    /// Run the given search and return the first page of results.
    ///
    /// Plain strings convert into a `SearchBuilder` with no other options set.
    pub fn search(&self, search: impl Into<SearchBuilder>) -> Result<SearchResult> {
        self.load(search.into().to_params())
    }

    /// Load the next page of search results for the same query.
    pub fn older(&self, page: &SearchResult) -> Result<SearchResult> {
        let mut params = page.params.clone();
        params.remove("since_id");

        match page.statuses.iter().map(|t| t.id).min() {
            Some(min_id) => params.add_param_ref("max_id", min_id.saturating_sub(1).to_string()),
            None => params.remove("max_id"),
        }

        self.load(params)
    }

    /// Load the previous page of search results for the same query.
    pub fn newer(&self, page: &SearchResult) -> Result<SearchResult> {
        let mut params = page.params.clone();
        params.remove("max_id");

        match page.statuses.iter().map(|t| t.id).max() {
            Some(max_id) => params.add_param_ref("since_id", max_id.to_string()),
            None => params.remove("since_id"),
        }

        self.load(params)
    }

    fn load(&self, params: ParamList) -> Result<SearchResult> {
        let results: SearchResults = self.pipeline.fetch(links::search::TWEETS, Some(&params))?;
        Ok(SearchResult {
            statuses: results.statuses,
            metadata: results.search_metadata,
            params,
        })
    }
}

impl<P> fmt::Debug for SearchOperations<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SearchOperations")
            .field("authorized", &self.authorized)
            .finish()
    }
}

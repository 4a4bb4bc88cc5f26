// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Client configuration types.

use std::time::Duration;

use crate::links;

/// Default transport timeout for a single call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the request pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// The absolute URL every request path is resolved against.
    pub api_base: String,
    /// How long a single call may take, from dispatch until its body has been read. `None`
    /// waits indefinitely.
    pub timeout: Option<Duration>,
    /// The `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: links::API_URL_BASE.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            user_agent: concat!("birdhouse/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Create a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    api_base: Option<String>,
    timeout: Option<Option<Duration>>,
    user_agent: Option<String>,
}

impl ConfigBuilder {
    /// Set the API base URL.
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set the transport timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(Some(timeout));
        self
    }

    /// Disable the transport timeout.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = Some(None);
        self
    }

    /// Set the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Config {
        let defaults = Config::default();
        Config {
            api_base: self.api_base.unwrap_or(defaults.api_base),
            timeout: self.timeout.unwrap_or(defaults.timeout),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = Config::builder().build();
        assert_eq!(config.api_base, "https://api.twitter.com/1.1/");
        assert_eq!(config.timeout, Some(DEFAULT_TIMEOUT));
        assert!(config.user_agent.starts_with("birdhouse/"));
    }

    #[test]
    fn builder_overrides() {
        let config = Config::builder()
            .api_base("http://localhost:8080/1/")
            .timeout(Duration::from_secs(5))
            .user_agent("test-agent")
            .build();
        assert_eq!(config.api_base, "http://localhost:8080/1/");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.user_agent, "test-agent");

        let config = Config::builder().no_timeout().build();
        assert_eq!(config.timeout, None);
    }
}

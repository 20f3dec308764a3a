use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::model::Event;
use crate::scraper;
use crate::timeline::{ParserOptions, TimelineParser};

/// The `action=parse` API endpoint rendering the StarCraft II match ticker.
pub const MATCHES_API_URL: &str = "https://liquipedia.net/starcraft2/api.php?action=parse&format=json&page=Liquipedia:Upcoming_and_ongoing_matches";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetches the match timeline from liquipedia.net.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> liquipedia_timeline::Result<()> {
/// use liquipedia_timeline::{ParserOptions, TimelineClient};
///
/// let client = TimelineClient::new();
/// let events = client.get_events(&ParserOptions::new()).await?;
/// println!("Found {} matches", events.len());
/// # Ok(())
/// # }
/// ```
pub struct TimelineClient {
    http: reqwest::Client,
    url: String,
}

impl TimelineClient {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "falling back to a client without user agent");
                reqwest::Client::new()
            });
        Self::with_client(http)
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure timeouts, proxies, headers, etc.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            http: client,
            url: MATCHES_API_URL.to_string(),
        }
    }

    /// Point the client at another `action=parse` endpoint, e.g. another wiki.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Fetch the page and build a parser over it, without parsing yet.
    #[instrument(skip(self, options), fields(url = %self.url))]
    pub async fn get_timeline(&self, options: &ParserOptions) -> Result<TimelineParser> {
        let body = scraper::get_body(&self.http, &self.url).await?;
        TimelineParser::from_reader(body.as_bytes(), options)
    }

    /// Fetch and parse the page.
    #[instrument(skip(self, options), fields(url = %self.url))]
    pub async fn get_events(&self, options: &ParserOptions) -> Result<Vec<Event>> {
        let mut parser = self.get_timeline(options).await?;
        parser.parse()?;
        let events = parser.into_events();
        debug!(count = events.len(), "fetched timeline");
        Ok(events)
    }
}

impl Default for TimelineClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires network access to liquipedia.net"]
    async fn test_get_events() {
        let client = TimelineClient::new();
        let events = client.get_events(&ParserOptions::new()).await;
        assert!(events.is_ok());
    }

    #[test]
    fn test_default_client_keeps_user_agent() {
        assert!(reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .is_ok());
        assert!(USER_AGENT.starts_with("liquipedia-timeline/"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        let client = TimelineClient::with_client(http).with_url("http://127.0.0.1:9/api.php");
        let err = client.get_events(&ParserOptions::new()).await.unwrap_err();
        assert!(matches!(err, crate::TimelineError::Http { .. }));
    }
}

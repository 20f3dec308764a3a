pub(crate) mod timeline;

use ::scraper::{ElementRef, Selector};
use tracing::debug;
use url::Url;

use crate::error::{Result, TimelineError};

pub(crate) const BASE_URL: &str = "https://liquipedia.net";

/// Fetch a URL and return the response body as text.
pub(crate) async fn get_body(client: &reqwest::Client, url: &str) -> Result<String> {
    debug!(url, "fetching page");

    let response = client.get(url).send().await.map_err(|e| TimelineError::Http {
        url: url.to_owned(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(TimelineError::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    response.text().await.map_err(|e| TimelineError::ResponseBody {
        url: url.to_owned(),
        source: e,
    })
}

/// Concatenated text of every element matching `selector` inside `element`,
/// in document order. Returns an empty string if nothing matches.
pub(crate) fn select_all_text(element: &ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .flat_map(|e| e.text())
        .collect::<String>()
}

/// Trim surrounding whitespace and drop embedded newlines.
pub(crate) fn clean_text(text: &str) -> String {
    text.trim().replace('\n', "")
}

/// Resolve a site-relative link against the wiki origin.
pub(crate) fn absolute_url(href: &str) -> Result<Url> {
    Ok(Url::parse(&format!("{BASE_URL}{href}"))?)
}

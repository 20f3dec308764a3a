use ::scraper::error::SelectorErrorKind;

/// All errors that can occur while fetching or parsing the match timeline.
#[derive(thiserror::Error, Debug)]
pub enum TimelineError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// The wiki API response could not be decoded as a parse envelope.
    #[error("failed to decode parse envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    /// The parsed events could not be serialized to JSON.
    #[error("failed to serialize events: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A time zone name could not be resolved against the IANA database.
    #[error("unknown time zone {name:?}: {reason}")]
    Timezone { name: String, reason: String },

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// Failed to parse a date/time from scraped text.
    #[error("failed to parse date: {0}")]
    DateParse(#[from] chrono::ParseError),

    /// Timer text is not in the `Month D, YYYY - HH:MM UTC` form.
    #[error("unexpected timer text {text:?}")]
    TimeFormat { text: String },

    /// Failed to build an absolute URL from a scraped link.
    #[error("failed to parse url: {0}")]
    UrlParse(#[from] url::ParseError),

    /// An expected HTML element was not found on the page.
    #[error("expected element not found: {context}")]
    ElementNotFound { context: &'static str },

    /// An element was found but lacks a required attribute.
    #[error("{context} has no {attr} attribute")]
    MissingAttribute {
        context: &'static str,
        attr: &'static str,
    },
}

impl<'a> From<SelectorErrorKind<'a>> for TimelineError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        TimelineError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TimelineError>;

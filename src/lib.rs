//! Scraper for the liquipedia.net "Upcoming and ongoing matches" timeline.
//!
//! [`TimelineParser`] turns the rendered HTML of the page into a list of
//! [`Event`]s, and [`TimelineClient`] fetches that HTML from the wiki API.

pub use client::{TimelineClient, MATCHES_API_URL};
pub use error::{Result, TimelineError};
pub use logging::enable_debug_logging;
pub use model::*;
pub use timeline::{
    ParserOptions, TimelineParser, DEFAULT_MAX_COUNTDOWN_MINUTES, DEFAULT_TIMEZONE,
};

mod client;
mod error;
mod logging;
mod model;
pub(crate) mod scraper;
mod timeline;

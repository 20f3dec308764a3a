use std::io::Read;

use ::scraper::{Html, Selector};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{debug, instrument};

use crate::error::{Result, TimelineError};
use crate::model::{Event, MatchPage, MatchState, PageMeta};
use crate::scraper::timeline::{self, MATCH_CONTAINER_SELECTOR};

/// Zone applied the first time a countdown is computed if none was configured.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Shanghai;

/// Matches that started less than this long ago still count as upcoming.
pub const DEFAULT_MAX_COUNTDOWN_MINUTES: i64 = 20;

/// Optional overrides for a [`TimelineParser`].
///
/// Options can be applied at construction and again right before
/// [`TimelineParser::to_json`]; each set field replaces the parser's
/// current value, unset fields leave it alone.
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use liquipedia_timeline::ParserOptions;
///
/// let now = chrono_tz::Asia::Shanghai
///     .with_ymd_and_hms(2019, 9, 13, 17, 0, 0)
///     .unwrap();
/// let options = ParserOptions::new().with_now(now).with_timezone("Europe/Berlin");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    now: Option<DateTime<Utc>>,
    timezone: Option<String>,
    max_countdown: Option<TimeDelta>,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference instant countdowns are computed against.
    pub fn with_now<Z: TimeZone>(mut self, now: DateTime<Z>) -> Self {
        self.now = Some(now.with_timezone(&Utc));
        self
    }

    /// IANA time zone name, e.g. `Asia/Shanghai`.
    pub fn with_timezone(mut self, name: impl Into<String>) -> Self {
        self.timezone = Some(name.into());
        self
    }

    /// Width of the window after a match start during which it is still upcoming.
    pub fn with_max_countdown(mut self, max_countdown: TimeDelta) -> Self {
        self.max_countdown = Some(max_countdown);
        self
    }
}

/// Parses the "Upcoming and ongoing matches" timeline of one page.
///
/// # Examples
///
/// ```
/// use liquipedia_timeline::{ParserOptions, TimelineParser};
///
/// # fn example() -> liquipedia_timeline::Result<()> {
/// let html = "<div class='infobox_matches_content'></div>";
/// let mut parser = TimelineParser::new(html, &ParserOptions::new())?;
/// parser.parse()?;
/// assert_eq!(parser.to_json(&ParserOptions::new())?, "[]");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct TimelineParser {
    body: String,
    page: Option<PageMeta>,
    timezone: Option<Tz>,
    now: DateTime<Utc>,
    max_countdown: TimeDelta,
    events: Vec<Event>,
}

impl TimelineParser {
    /// Create a parser over a raw HTML fragment.
    pub fn new(html: impl Into<String>, options: &ParserOptions) -> Result<Self> {
        let mut parser = Self {
            body: html.into(),
            page: None,
            timezone: None,
            now: Utc::now(),
            max_countdown: TimeDelta::minutes(DEFAULT_MAX_COUNTDOWN_MINUTES),
            events: Vec::new(),
        };
        parser.configure(options)?;
        Ok(parser)
    }

    /// Create a parser from a wiki `action=parse` JSON response.
    pub fn from_reader<R: Read>(reader: R, options: &ParserOptions) -> Result<Self> {
        let page: MatchPage = serde_json::from_reader(reader).map_err(TimelineError::Envelope)?;
        let (meta, html) = page.into_parts();
        debug!(title = %meta.title, revid = meta.revid, "decoded parse envelope");

        let mut parser = Self::new(html, options)?;
        parser.page = Some(meta);
        Ok(parser)
    }

    /// Apply `options` on top of the current configuration.
    pub fn configure(&mut self, options: &ParserOptions) -> Result<()> {
        if let Some(now) = options.now {
            self.now = now;
        }
        if let Some(name) = &options.timezone {
            self.set_timezone(name)?;
        }
        if let Some(max_countdown) = options.max_countdown {
            self.max_countdown = max_countdown;
        }
        Ok(())
    }

    pub fn set_timezone(&mut self, name: &str) -> Result<()> {
        let tz = name.parse::<Tz>().map_err(|e| TimelineError::Timezone {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        self.timezone = Some(tz);
        Ok(())
    }

    pub fn timezone(&self) -> Option<Tz> {
        self.timezone
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Revision metadata, when built with [`TimelineParser::from_reader`].
    pub fn page(&self) -> Option<&PageMeta> {
        self.page.as_ref()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Extract every match of the page into [`TimelineParser::events`].
    ///
    /// Match blocks with a missing or malformed timer are skipped, and a
    /// broken detail link only leaves `detail_url` unset; neither is an error.
    #[instrument(skip(self), fields(now = %self.now))]
    pub fn parse(&mut self) -> Result<()> {
        let document = Html::parse_fragment(&self.body);
        let selector = Selector::parse(MATCH_CONTAINER_SELECTOR)?;

        let mut events = Vec::new();
        for (index, element) in document.select(&selector).enumerate() {
            let start_at = match timeline::parse_start_at(&element) {
                Ok(start_at) => start_at,
                Err(e) => {
                    debug!(index, error = %e, "skipping match without usable timer");
                    continue;
                }
            };
            let mut event = Event::new(start_at, timeline::parse_versus(&element)?);

            let countdown = timeline::countdown(self.now, start_at, self.resolve_timezone());
            let Some(state) = timeline::classify(countdown, self.max_countdown) else {
                debug!(index, %start_at, "skipping match past the countdown window");
                continue;
            };

            match state {
                MatchState::Upcoming => {
                    event.series = timeline::parse_series(&element, timeline::TOURNAMENT_SELECTOR)?;
                    event.time_counting_down = Some(timeline::format_duration(countdown));
                }
                MatchState::Finished => {
                    event.series =
                        timeline::parse_series(&element, timeline::MATCH_FILLER_SELECTOR)?;
                    match timeline::parse_detail_url(&element) {
                        Ok(url) => event.detail_url = Some(url),
                        Err(e) => debug!(index, error = %e, "match has no detail page"),
                    }
                }
            }
            debug!(index, %state, versus = %event.versus, "parsed match");
            events.push(event);
        }

        debug!(count = events.len(), "parsed timeline");
        self.events = events;
        Ok(())
    }

    /// Serialize the parsed events as a JSON array, after applying `options`
    /// the same way [`TimelineParser::configure`] does.
    pub fn to_json(&mut self, options: &ParserOptions) -> Result<String> {
        self.configure(options)?;
        serde_json::to_string(&self.events).map_err(TimelineError::Serialize)
    }

    fn resolve_timezone(&mut self) -> Tz {
        *self.timezone.get_or_insert(DEFAULT_TIMEZONE)
    }
}

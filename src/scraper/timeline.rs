use std::fmt::Write;

use ::scraper::{ElementRef, Selector};
use chrono::{DateTime, Month, NaiveDateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use itertools::Itertools;
use url::Url;

use crate::error::{Result, TimelineError};
use crate::model::{MatchState, Versus};
use crate::scraper::{absolute_url, clean_text, select_all_text};

/// Format of the start time rendered inside countdown timers,
/// e.g. `September 13, 2019 - 09:00 UTC`.
pub(crate) const TIME_FORMAT: &str = "%B %d, %Y - %H:%M UTC";

pub(crate) const MATCH_CONTAINER_SELECTOR: &str = ".infobox_matches_content";
pub(crate) const COUNTDOWN_SELECTOR: &str = ".timer-object-countdown-only";
pub(crate) const TEAM_LEFT_SELECTOR: &str = ".team-left";
pub(crate) const TEAM_RIGHT_SELECTOR: &str = ".team-right";
pub(crate) const VERSUS_SELECTOR: &str = ".versus";
pub(crate) const TOURNAMENT_SELECTOR: &str = ".matchticker-tournament-wrapper";
pub(crate) const MATCH_FILLER_SELECTOR: &str = ".match-filler > div";
pub(crate) const DETAIL_LINK_SELECTOR: &str = ".match-filler > div > div > a";

/// Start time of the match in `element`, read from its countdown timer.
///
/// The timer text must match [`TIME_FORMAT`] exactly: a full month name and
/// no surrounding whitespace.
pub(crate) fn parse_start_at(element: &ElementRef) -> Result<DateTime<Utc>> {
    let selector = Selector::parse(COUNTDOWN_SELECTOR)?;
    let raw = select_all_text(element, &selector);
    if raw.is_empty() {
        return Err(TimelineError::ElementNotFound {
            context: "countdown timer (.timer-object-countdown-only)",
        });
    }
    if !starts_with_month_name(&raw) || raw.ends_with(char::is_whitespace) {
        return Err(TimelineError::TimeFormat { text: raw });
    }
    Ok(NaiveDateTime::parse_from_str(&raw, TIME_FORMAT)?.and_utc())
}

// chrono's %B also takes abbreviations, which the page never renders.
fn starts_with_month_name(raw: &str) -> bool {
    let token = raw.split(' ').next().unwrap_or_default();
    token
        .parse::<Month>()
        .is_ok_and(|month| month.name().eq_ignore_ascii_case(token))
}

pub(crate) fn parse_versus(element: &ElementRef) -> Result<Versus> {
    let left = select_all_text(element, &Selector::parse(TEAM_LEFT_SELECTOR)?);
    let right = select_all_text(element, &Selector::parse(TEAM_RIGHT_SELECTOR)?);
    let versus = select_all_text(element, &Selector::parse(VERSUS_SELECTOR)?);
    Ok(build_versus(&left, &right, &versus))
}

/// Combine the raw team and versus texts. A versus block mentioning `vs`
/// is an unplayed match; anything else is read as a `S1:S2` score.
pub(crate) fn build_versus(left: &str, right: &str, versus: &str) -> Versus {
    let player1 = clean_text(left);
    let player2 = clean_text(right);

    if versus.replace('\n', "").contains("vs") {
        return Versus {
            player1,
            player2,
            ..Default::default()
        };
    }

    let (score1, score2) = versus
        .split(':')
        .map(clean_text)
        .next_tuple()
        .unwrap_or_else(|| ("0".to_string(), "0".to_string()));

    Versus {
        player1,
        player2,
        score1,
        score2,
    }
}

pub(crate) fn parse_series(element: &ElementRef, selector: &str) -> Result<String> {
    let selector = Selector::parse(selector)?;
    Ok(select_all_text(element, &selector).trim().to_string())
}

/// Absolute URL of the match detail page linked from the match filler.
pub(crate) fn parse_detail_url(element: &ElementRef) -> Result<Url> {
    let selector = Selector::parse(DETAIL_LINK_SELECTOR)?;
    let link = element
        .select(&selector)
        .next()
        .ok_or(TimelineError::ElementNotFound {
            context: "match detail link (.match-filler > div > div > a)",
        })?;
    let href = link
        .value()
        .attr("href")
        .ok_or(TimelineError::MissingAttribute {
            context: "match detail link",
            attr: "href",
        })?;
    absolute_url(href)
}

/// Signed time elapsed since `start_at`; negative while the match is still ahead.
pub(crate) fn countdown(now: DateTime<Utc>, start_at: DateTime<Utc>, tz: Tz) -> TimeDelta {
    now.with_timezone(&tz)
        .signed_duration_since(start_at.with_timezone(&tz))
}

/// `None` means the match started too long ago to be listed.
pub(crate) fn classify(countdown: TimeDelta, max_countdown: TimeDelta) -> Option<MatchState> {
    if TimeDelta::zero() < countdown && countdown < max_countdown {
        Some(MatchState::Upcoming)
    } else if countdown <= TimeDelta::zero() {
        Some(MatchState::Finished)
    } else {
        None
    }
}

/// Render a duration as `72h3m0.5s`, `5m0s`, `1.5µs` or `0s`.
pub(crate) fn format_duration(delta: TimeDelta) -> String {
    let negative = delta < TimeDelta::zero();
    let magnitude = if negative { -delta } else { delta };
    let magnitude = magnitude.to_std().unwrap_or_default();

    let mut out = String::new();
    if negative {
        out.push('-');
    }

    let total_nanos = magnitude.as_nanos();
    if total_nanos == 0 {
        return "0s".to_string();
    }

    if total_nanos < 1_000_000_000 {
        let (unit, digits) = match total_nanos {
            n if n < 1_000 => ("ns", 0),
            n if n < 1_000_000 => ("µs", 3),
            _ => ("ms", 6),
        };
        let scale = 10u128.pow(digits);
        out.push_str(&fraction(total_nanos / scale, total_nanos % scale, digits));
        out.push_str(unit);
        return out;
    }

    let secs = magnitude.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, secs / 60 % 60, secs % 60);
    if hours > 0 {
        let _ = write!(out, "{hours}h");
    }
    if secs >= 60 {
        let _ = write!(out, "{minutes}m");
    }
    out.push_str(&fraction(
        u128::from(seconds),
        u128::from(magnitude.subsec_nanos()),
        9,
    ));
    out.push('s');
    out
}

fn fraction(whole: u128, frac: u128, digits: u32) -> String {
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:0width$}", width = digits as usize);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use ::scraper::Html;
    use chrono::TimeZone;

    use super::*;

    fn container(inner: &str) -> Html {
        Html::parse_fragment(&format!(
            "<table class='infobox_matches_content'><tbody>{inner}</tbody></table>"
        ))
    }

    fn first_container(html: &Html) -> ElementRef<'_> {
        let selector = Selector::parse(MATCH_CONTAINER_SELECTOR).unwrap();
        html.select(&selector).next().unwrap()
    }

    #[test]
    fn test_parse_start_at() {
        let html = container(
            "<tr><td><span class='timer-object timer-object-countdown-only'>\
             September 3, 2019 - 09:05 UTC</span></td></tr>",
        );
        let start_at = parse_start_at(&first_container(&html)).unwrap();
        assert_eq!(start_at, Utc.with_ymd_and_hms(2019, 9, 3, 9, 5, 0).unwrap());
    }

    #[test]
    fn test_parse_start_at_rejects_missing_and_foreign_formats() {
        let html = container("<tr><td class='team-left'>Serral</td></tr>");
        assert!(matches!(
            parse_start_at(&first_container(&html)),
            Err(TimelineError::ElementNotFound { .. })
        ));

        let html = container(
            "<tr><td><span class='timer-object-countdown-only'>2019-09-13 09:00</span></td></tr>",
        );
        assert!(matches!(
            parse_start_at(&first_container(&html)),
            Err(TimelineError::DateParse(_))
        ));
    }

    #[test]
    fn test_parse_start_at_is_strict() {
        for text in [
            "Sep 13, 2019 - 09:00 UTC",
            "  September 13, 2019 - 09:00 UTC",
            "September 13, 2019 - 09:00 UTC  ",
            "\nSeptember 13, 2019 - 09:00 UTC\n",
        ] {
            let html = container(&format!(
                "<tr><td><span class='timer-object-countdown-only'>{text}</span></td></tr>"
            ));
            assert!(
                matches!(
                    parse_start_at(&first_container(&html)),
                    Err(TimelineError::TimeFormat { .. })
                ),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_build_versus_unplayed() {
        let vs = build_versus("\n Serral \n", " Reynor", "\nvs\n");
        assert_eq!(vs.player1, "Serral");
        assert_eq!(vs.player2, "Reynor");
        assert_eq!(vs.score1, "");
        assert_eq!(vs.score2, "");

        // "vs" anywhere wins over a score separator
        let vs = build_versus("A", "B", "1:0 vs");
        assert!(!vs.has_score());
    }

    #[test]
    fn test_build_versus_scores() {
        let vs = build_versus("Maru", "Dark", "\n3:2\n");
        assert_eq!((vs.score1.as_str(), vs.score2.as_str()), ("3", "2"));

        let vs = build_versus("Maru", "Dark", "W:FF");
        assert_eq!((vs.score1.as_str(), vs.score2.as_str()), ("W", "FF"));

        let vs = build_versus("Maru", "Dark", "");
        assert_eq!((vs.score1.as_str(), vs.score2.as_str()), ("0", "0"));
    }

    #[test]
    fn test_parse_versus_from_markup() {
        let html = container(
            "<tr><td class='team-left'><span><a href='/starcraft2/Maru'>Maru</a></span></td>\
             <td class='versus'>1:0</td>\
             <td class='team-right'><span><a href='/starcraft2/Dark'>Dark</a></span></td></tr>",
        );
        let vs = parse_versus(&first_container(&html)).unwrap();
        assert_eq!(vs.render(), "Maru vs Dark (1:0)");
    }

    #[test]
    fn test_parse_detail_url() {
        let html = container(
            "<tr><td class='match-filler'><div><div>\
             <a href='/starcraft2/2019_WCS_Montreal'>WCS Montreal</a></div></div></td></tr>",
        );
        let element = first_container(&html);
        let url = parse_detail_url(&element).unwrap();
        assert_eq!(
            url.as_str(),
            "https://liquipedia.net/starcraft2/2019_WCS_Montreal"
        );
        assert_eq!(
            parse_series(&element, MATCH_FILLER_SELECTOR).unwrap(),
            "WCS Montreal"
        );
    }

    #[test]
    fn test_parse_detail_url_missing() {
        let html = container("<tr><td class='match-filler'><div>King of Battle</div></td></tr>");
        assert!(matches!(
            parse_detail_url(&first_container(&html)),
            Err(TimelineError::ElementNotFound { .. })
        ));

        let html = container(
            "<tr><td class='match-filler'><div><div><a>No page</a></div></div></td></tr>",
        );
        assert!(matches!(
            parse_detail_url(&first_container(&html)),
            Err(TimelineError::MissingAttribute { attr: "href", .. })
        ));
    }

    #[test]
    fn test_countdown_is_zone_independent() {
        let start_at = Utc.with_ymd_and_hms(2019, 9, 13, 9, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2019, 9, 13, 9, 5, 0).unwrap();
        let shanghai = countdown(now, start_at, chrono_tz::Asia::Shanghai);
        let la = countdown(now, start_at, chrono_tz::America::Los_Angeles);
        assert_eq!(shanghai, TimeDelta::minutes(5));
        assert_eq!(shanghai, la);
        assert_eq!(
            countdown(start_at, now, chrono_tz::UTC),
            TimeDelta::minutes(-5)
        );
    }

    #[test]
    fn test_classify_boundaries() {
        let max = TimeDelta::minutes(20);
        assert_eq!(classify(TimeDelta::zero(), max), Some(MatchState::Finished));
        assert_eq!(classify(TimeDelta::hours(-3), max), Some(MatchState::Finished));
        assert_eq!(classify(TimeDelta::seconds(1), max), Some(MatchState::Upcoming));
        assert_eq!(
            classify(max - TimeDelta::nanoseconds(1), max),
            Some(MatchState::Upcoming)
        );
        assert_eq!(classify(max, max), None);
        assert_eq!(classify(TimeDelta::hours(2), max), None);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(TimeDelta::zero()), "0s");
        assert_eq!(format_duration(TimeDelta::minutes(5)), "5m0s");
        assert_eq!(format_duration(TimeDelta::seconds(90)), "1m30s");
        assert_eq!(format_duration(TimeDelta::seconds(3723)), "1h2m3s");
        assert_eq!(format_duration(TimeDelta::hours(1)), "1h0m0s");
        assert_eq!(format_duration(TimeDelta::milliseconds(1500)), "1.5s");
        assert_eq!(format_duration(TimeDelta::milliseconds(250)), "250ms");
        assert_eq!(format_duration(TimeDelta::microseconds(1500)), "1.5ms");
        assert_eq!(format_duration(TimeDelta::nanoseconds(1500)), "1.5µs");
        assert_eq!(format_duration(TimeDelta::nanoseconds(7)), "7ns");
        assert_eq!(format_duration(TimeDelta::minutes(-5)), "-5m0s");
    }
}

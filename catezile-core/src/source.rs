//! Translation of external feed items into countdown targets.
//!
//! Feeds (event listings, TMDB releases, fixture lists, holiday tables) arrive
//! as JSON of varying shape. Each shape is a variant of [`FeedItem`], and
//! [`FeedItem::into_target`] is the only place they become internal values.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::countdown::Countdown;
use crate::error::{CateZileError, CateZileResult};
use crate::ics::CalendarEvent;
use crate::instant::{InstantInput, SITE_TIMEZONE, local_midnight};

/// Running time assumed for a fixture without an explicit duration.
pub const DEFAULT_MATCH_MINUTES: i64 = 120;

/// A feed item as received, tagged by `"kind"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedItem {
    Event {
        title: String,
        starts_at: InstantInput,
        #[serde(default)]
        ends_at: Option<InstantInput>,
        #[serde(default)]
        url: Option<String>,
    },
    Movie {
        title: String,
        release_date: NaiveDate,
        #[serde(default)]
        tmdb_id: Option<u64>,
    },
    Match {
        home: String,
        away: String,
        kickoff: InstantInput,
        #[serde(default)]
        competition: Option<String>,
        #[serde(default)]
        duration_minutes: Option<i64>,
    },
    Holiday {
        name: String,
        date: NaiveDate,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Event,
    Movie,
    Match,
    Holiday,
}

/// Site settings needed to translate feed items.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub timezone: Tz,
    pub site_url: String,
}

impl Default for SourceContext {
    fn default() -> Self {
        SourceContext {
            timezone: SITE_TIMEZONE,
            site_url: "https://catezile.ro".to_string(),
        }
    }
}

/// Internal shape of anything the site counts down to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountdownTarget {
    pub title: String,
    pub kind: TargetKind,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub live_capable: bool,
}

impl CountdownTarget {
    pub fn countdown(&self, live_window: Duration) -> Countdown {
        Countdown::new(self.start, self.live_capable).with_live_window(live_window)
    }

    pub fn to_calendar_event(&self) -> CateZileResult<CalendarEvent> {
        CalendarEvent::new(self.title.clone(), self.start, self.end, self.url.clone())
    }
}

impl FeedItem {
    pub fn into_target(self, ctx: &SourceContext) -> CateZileResult<CountdownTarget> {
        let target = match self {
            FeedItem::Event {
                title,
                starts_at,
                ends_at,
                url,
            } => CountdownTarget {
                title,
                kind: TargetKind::Event,
                start: starts_at.resolve_in(ctx.timezone)?,
                end: ends_at.map(|e| e.resolve_in(ctx.timezone)).transpose()?,
                url,
                live_capable: false,
            },
            FeedItem::Movie {
                title,
                release_date,
                tmdb_id,
            } => CountdownTarget {
                title,
                kind: TargetKind::Movie,
                start: local_midnight(release_date, ctx.timezone)?,
                end: None,
                url: tmdb_id
                    .map(|id| format!("{}/filme/{}", ctx.site_url.trim_end_matches('/'), id)),
                live_capable: false,
            },
            FeedItem::Match {
                home,
                away,
                kickoff,
                competition,
                duration_minutes,
            } => {
                let minutes = duration_minutes.unwrap_or(DEFAULT_MATCH_MINUTES);
                if minutes <= 0 {
                    return Err(CateZileError::invalid(format!(
                        "Match duration must be positive, got {} minutes",
                        minutes
                    )));
                }
                let start = kickoff.resolve_in(ctx.timezone)?;
                let end = Duration::try_minutes(minutes)
                    .and_then(|span| start.checked_add_signed(span))
                    .ok_or_else(|| {
                        CateZileError::invalid(format!(
                            "Match duration of {} minutes runs past the supported date range",
                            minutes
                        ))
                    })?;
                let title = match competition {
                    Some(c) if !c.trim().is_empty() => {
                        format!("{}: {} – {}", c.trim(), home, away)
                    }
                    _ => format!("{} – {}", home, away),
                };
                CountdownTarget {
                    title,
                    kind: TargetKind::Match,
                    start,
                    end: Some(end),
                    url: None,
                    live_capable: true,
                }
            }
            FeedItem::Holiday { name, date } => {
                let next_day = date
                    .succ_opt()
                    .ok_or_else(|| CateZileError::invalid(format!("Date out of range: {}", date)))?;
                CountdownTarget {
                    title: name,
                    kind: TargetKind::Holiday,
                    start: local_midnight(date, ctx.timezone)?,
                    end: Some(local_midnight(next_day, ctx.timezone)?),
                    url: None,
                    live_capable: false,
                }
            }
        };

        target.validate()?;
        Ok(target)
    }
}

impl CountdownTarget {
    fn validate(&self) -> CateZileResult<()> {
        if self.title.trim().is_empty() {
            return Err(CateZileError::invalid("Target has an empty title"));
        }
        if self.end.is_some_and(|end| end < self.start) {
            return Err(CateZileError::invalid(format!(
                "'{}' ends before it starts",
                self.title
            )));
        }
        Ok(())
    }
}

/// A translated feed, sorted by start time.
#[derive(Debug, Default)]
pub struct Catalog {
    pub targets: Vec<CountdownTarget>,
    /// Items dropped because they failed to deserialize or translate
    pub skipped: usize,
}

impl Catalog {
    /// Parse a JSON array of feed items. Bad items are skipped, not fatal.
    pub fn from_json(json: &str, ctx: &SourceContext) -> CateZileResult<Self> {
        let raw: Vec<serde_json::Value> =
            serde_json::from_str(json).map_err(|e| CateZileError::Serialization(e.to_string()))?;

        let mut catalog = Catalog::default();
        for (index, value) in raw.into_iter().enumerate() {
            let result = serde_json::from_value::<FeedItem>(value)
                .map_err(|e| CateZileError::Serialization(e.to_string()))
                .and_then(|item| item.into_target(ctx));

            match result {
                Ok(target) => catalog.targets.push(target),
                Err(e) => {
                    warn!(index, error = %e, "Skipping feed item");
                    catalog.skipped += 1;
                }
            }
        }

        catalog.targets.sort_by_key(|t| t.start);
        Ok(catalog)
    }

    /// Targets that have not elapsed at `now`.
    pub fn upcoming(
        &self,
        now: DateTime<Utc>,
        live_window: Duration,
    ) -> impl Iterator<Item = &CountdownTarget> {
        self.targets
            .iter()
            .filter(move |t| !t.countdown(live_window).state_at(now).is_elapsed())
    }
}

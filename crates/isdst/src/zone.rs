//! Zone rule tables and the providers that resolve them by name.
//!
//! The classifier only ever talks to a zone through [`ZoneRules`]: an offset
//! oracle plus a way to turn a wall-clock tuple back into an instant. Three
//! implementations ship with the crate:
//!
//! - [`IanaZone`] — IANA zones compiled into `chrono-tz`
//! - [`FixedZone`] — a constant offset (UTC, `+05:30`, ...)
//! - [`TransitionZone`] — an explicit, caller-supplied transition table
//!
//! Zones are looked up by name through a [`ZoneProvider`], so callers (and
//! tests) decide which rule database backs a lookup.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, ZoneResolutionError};

/// Offsets must stay strictly inside one day, matching `chrono::FixedOffset`.
const MAX_OFFSET_SECONDS: i32 = 86_400;

// ── Offsets ─────────────────────────────────────────────────────────────────

/// The UTC offset in effect at some instant, with its abbreviation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneOffset {
    /// Seconds east of UTC (negative west of Greenwich).
    pub seconds: i32,
    /// Zone abbreviation (e.g., "PDT", "AEST", "+0530").
    pub abbreviation: String,
}

impl ZoneOffset {
    /// Build an offset, rejecting anything a day or more away from UTC.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneResolutionError::InvalidOffset`] if `|seconds| >= 86400`.
    pub fn new(seconds: i32, abbreviation: impl Into<String>) -> Result<Self> {
        if seconds.unsigned_abs() >= MAX_OFFSET_SECONDS.unsigned_abs() {
            return Err(ZoneResolutionError::InvalidOffset(seconds));
        }
        Ok(Self {
            seconds,
            abbreviation: abbreviation.into(),
        })
    }
}

/// Format an offset as `+HH:MM` / `-HH:MM`.
pub(crate) fn format_offset(offset_secs: i32) -> String {
    let sign = if offset_secs >= 0 { "+" } else { "-" };
    let abs_secs = offset_secs.unsigned_abs();
    let hours = abs_secs / 3600;
    let minutes = (abs_secs % 3600) / 60;
    format!("{sign}{hours:02}:{minutes:02}")
}

// ── Zone rules ──────────────────────────────────────────────────────────────

/// A named zone: the offset oracle consulted by the classifier.
pub trait ZoneRules {
    /// The identifier this zone was resolved from.
    fn name(&self) -> &str;

    /// The offset in effect at `instant`.
    fn offset_at(&self, instant: DateTime<Utc>) -> Result<ZoneOffset>;

    /// The instant at which the zone's clocks read `local`.
    ///
    /// Ambiguous readings (clocks moved back) resolve to the earliest
    /// instant. A reading inside a gap (clocks moved forward) is first taken
    /// as UTC to find a candidate offset, then shifted by the offset in effect
    /// at the reading minus that candidate. 02:30 on a Los Angeles
    /// spring-forward night becomes 01:30 standard time; on a Sydney one it
    /// becomes 03:30 daylight time.
    fn resolve_local(&self, local: NaiveDateTime) -> Result<DateTime<Utc>>;
}

/// `local - offset`, as an instant.
fn shift(local: NaiveDateTime, offset_secs: i32) -> Result<DateTime<Utc>> {
    local
        .checked_sub_signed(Duration::seconds(i64::from(offset_secs)))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            ZoneResolutionError::OutOfRange(format!("'{local}' at offset {offset_secs}s"))
        })
}

/// Resolve a wall-clock reading that falls in a gap.
///
/// `local` is first read as UTC to find a candidate offset. No offset is
/// consistent inside a gap, so the offset in effect at `local - candidate`
/// is used instead. West of UTC this lands just before the jump, east of UTC
/// just after it.
fn resolve_gap<F>(zone: &str, local: NaiveDateTime, offset_secs_at: F) -> Result<DateTime<Utc>>
where
    F: Fn(DateTime<Utc>) -> i32,
{
    let candidate = offset_secs_at(local.and_utc());
    let settled = offset_secs_at(shift(local, candidate)?);

    debug!(zone, %local, candidate, settled, "wall-clock time falls in a gap");
    shift(local, settled)
}

// ── IANA zones ──────────────────────────────────────────────────────────────

/// An IANA zone from the `chrono-tz` database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IanaZone {
    tz: Tz,
}

impl IanaZone {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    fn offset_secs(&self, instant: DateTime<Utc>) -> i32 {
        self.tz
            .offset_from_utc_datetime(&instant.naive_utc())
            .fix()
            .local_minus_utc()
    }
}

impl From<Tz> for IanaZone {
    fn from(tz: Tz) -> Self {
        Self::new(tz)
    }
}

impl FromStr for IanaZone {
    type Err = ZoneResolutionError;

    /// Parse an IANA name. The empty string is UTC.
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if name.is_empty() {
            return Ok(Self::new(Tz::UTC));
        }
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| ZoneResolutionError::InvalidTimezone(format!("'{}'", s)))
    }
}

impl ZoneRules for IanaZone {
    fn name(&self) -> &str {
        self.tz.name()
    }

    fn offset_at(&self, instant: DateTime<Utc>) -> Result<ZoneOffset> {
        let offset = self.tz.offset_from_utc_datetime(&instant.naive_utc());
        Ok(ZoneOffset {
            seconds: offset.fix().local_minus_utc(),
            abbreviation: offset.to_string(),
        })
    }

    fn resolve_local(&self, local: NaiveDateTime) -> Result<DateTime<Utc>> {
        match self.tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
            LocalResult::None => resolve_gap(self.name(), local, |utc| self.offset_secs(utc)),
        }
    }
}

// ── Fixed offsets ───────────────────────────────────────────────────────────

/// A zone pinned to one offset. Never observes DST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedZone {
    name: String,
    offset: ZoneOffset,
}

impl FixedZone {
    pub fn utc() -> Self {
        Self {
            name: "UTC".to_string(),
            offset: ZoneOffset {
                seconds: 0,
                abbreviation: "UTC".to_string(),
            },
        }
    }

    /// A zone `seconds` east of UTC, named and abbreviated like `+05:30`.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneResolutionError::InvalidOffset`] if `|seconds| >= 86400`.
    pub fn east(seconds: i32) -> Result<Self> {
        let name = format_offset(seconds);
        Ok(Self {
            offset: ZoneOffset::new(seconds, name.clone())?,
            name,
        })
    }

    pub fn with_abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        self.offset.abbreviation = abbreviation.into();
        self
    }

    pub fn offset(&self) -> &ZoneOffset {
        &self.offset
    }
}

impl ZoneRules for FixedZone {
    fn name(&self) -> &str {
        &self.name
    }

    fn offset_at(&self, _instant: DateTime<Utc>) -> Result<ZoneOffset> {
        Ok(self.offset.clone())
    }

    fn resolve_local(&self, local: NaiveDateTime) -> Result<DateTime<Utc>> {
        shift(local, self.offset.seconds)
    }
}

// ── Transition tables ───────────────────────────────────────────────────────

/// One entry of a [`TransitionZone`] table: from `at` onwards, `offset` applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub at: DateTime<Utc>,
    pub offset: ZoneOffset,
}

/// A zone described by an explicit rule table.
///
/// `initial` applies before the first transition. Transitions are kept
/// sorted; adding one at an instant that already has a transition replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionZone {
    name: String,
    initial: ZoneOffset,
    transitions: Vec<Transition>,
}

impl TransitionZone {
    pub fn new(name: impl Into<String>, initial: ZoneOffset) -> Result<Self> {
        let initial = ZoneOffset::new(initial.seconds, initial.abbreviation)?;
        Ok(Self {
            name: name.into(),
            initial,
            transitions: Vec::new(),
        })
    }

    /// Add a transition (builder style).
    ///
    /// # Errors
    ///
    /// Returns [`ZoneResolutionError::InvalidOffset`] for an offset a day or
    /// more away from UTC.
    pub fn with_transition(mut self, at: DateTime<Utc>, offset: ZoneOffset) -> Result<Self> {
        self.add_transition(at, offset)?;
        Ok(self)
    }

    pub fn add_transition(&mut self, at: DateTime<Utc>, offset: ZoneOffset) -> Result<()> {
        let offset = ZoneOffset::new(offset.seconds, offset.abbreviation)?;
        let idx = self.transitions.partition_point(|t| t.at < at);
        match self.transitions.get_mut(idx) {
            Some(existing) if existing.at == at => existing.offset = offset,
            _ => self.transitions.insert(idx, Transition { at, offset }),
        }
        Ok(())
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    fn lookup(&self, instant: DateTime<Utc>) -> &ZoneOffset {
        match self.transitions.partition_point(|t| t.at <= instant) {
            0 => &self.initial,
            idx => &self.transitions[idx - 1].offset,
        }
    }
}

impl ZoneRules for TransitionZone {
    fn name(&self) -> &str {
        &self.name
    }

    fn offset_at(&self, instant: DateTime<Utc>) -> Result<ZoneOffset> {
        Ok(self.lookup(instant).clone())
    }

    fn resolve_local(&self, local: NaiveDateTime) -> Result<DateTime<Utc>> {
        // Largest offset first: the first consistent reading is the earliest instant.
        let mut offsets: Vec<i32> = std::iter::once(&self.initial)
            .chain(self.transitions.iter().map(|t| &t.offset))
            .map(|o| o.seconds)
            .collect();
        offsets.sort_unstable_by(|a, b| b.cmp(a));
        offsets.dedup();

        for seconds in offsets {
            let utc = shift(local, seconds)?;
            if self.lookup(utc).seconds == seconds {
                return Ok(utc);
            }
        }
        resolve_gap(&self.name, local, |utc| self.lookup(utc).seconds)
    }
}

// ── Providers ───────────────────────────────────────────────────────────────

/// Resolves zone identifiers to rule tables.
pub trait ZoneProvider {
    type Zone: ZoneRules;

    /// # Errors
    ///
    /// Returns [`ZoneResolutionError::InvalidTimezone`] for unknown names.
    fn resolve(&self, name: &str) -> Result<Self::Zone>;
}

/// The IANA database compiled into `chrono-tz`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IanaProvider;

impl ZoneProvider for IanaProvider {
    type Zone = IanaZone;

    fn resolve(&self, name: &str) -> Result<IanaZone> {
        name.parse()
    }
}

/// An in-memory set of [`TransitionZone`]s keyed by name.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    zones: HashMap<String, TransitionZone>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(mut self, zone: TransitionZone) -> Self {
        self.insert(zone);
        self
    }

    /// Register `zone` under its own name, returning any zone it replaced.
    pub fn insert(&mut self, zone: TransitionZone) -> Option<TransitionZone> {
        self.zones.insert(zone.name.clone(), zone)
    }
}

impl ZoneProvider for StaticProvider {
    type Zone = TransitionZone;

    fn resolve(&self, name: &str) -> Result<TransitionZone> {
        self.zones
            .get(name)
            .cloned()
            .ok_or_else(|| ZoneResolutionError::InvalidTimezone(format!("'{}'", name)))
    }
}

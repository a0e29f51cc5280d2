//! Point-in-time views of a zone: local time, offset, abbreviation and DST flag.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::classify::is_daylight_saving;
use crate::error::{Result, ZoneResolutionError};
use crate::zone::{format_offset, IanaProvider, ZoneProvider, ZoneRules};

/// An instant as seen from one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneSnapshot {
    /// The instant in UTC (RFC 3339).
    pub utc: String,
    /// The instant in the zone (RFC 3339 with offset).
    pub local: String,
    /// The zone name used.
    pub timezone: String,
    /// The UTC offset at this instant (e.g., "-07:00").
    pub utc_offset: String,
    /// The zone abbreviation at this instant (e.g., "PDT").
    pub abbreviation: String,
    /// Whether Daylight Saving Time is active at this instant.
    pub dst_active: bool,
}

/// Describe an RFC 3339 datetime as seen from an IANA zone.
///
/// # Errors
///
/// Returns [`ZoneResolutionError::InvalidDatetime`] if the datetime string cannot be parsed,
/// or [`ZoneResolutionError::InvalidTimezone`] if the timezone name is not a valid IANA timezone.
///
/// # Examples
///
/// ```
/// use isdst::describe;
///
/// let result = describe("2026-03-15T14:00:00Z", "America/New_York").unwrap();
/// assert_eq!(result.timezone, "America/New_York");
/// assert!(result.local.contains("10:00:00"));
/// assert!(result.dst_active);
/// ```
pub fn describe(datetime: &str, timezone: &str) -> Result<ZoneSnapshot> {
    let instant = parse_rfc3339(datetime)?;
    let zone = IanaProvider.resolve(timezone)?;
    describe_instant(instant, &zone)
}

/// Describe `instant` as seen from `zone`.
///
/// # Errors
///
/// Propagates any error from the zone.
pub fn describe_instant<Z: ZoneRules + ?Sized>(
    instant: DateTime<Utc>,
    zone: &Z,
) -> Result<ZoneSnapshot> {
    let offset = zone.offset_at(instant)?;
    let fixed = FixedOffset::east_opt(offset.seconds)
        .ok_or(ZoneResolutionError::InvalidOffset(offset.seconds))?;
    let dst_active = is_daylight_saving(instant, zone)?;

    Ok(ZoneSnapshot {
        utc: instant.to_rfc3339(),
        local: instant.with_timezone(&fixed).to_rfc3339(),
        timezone: zone.name().to_string(),
        utc_offset: format_offset(offset.seconds),
        abbreviation: offset.abbreviation,
        dst_active,
    })
}

/// Parse an RFC 3339 datetime string into `DateTime<Utc>`.
pub fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ZoneResolutionError::InvalidDatetime(format!("'{}': {}", s, e)))
}

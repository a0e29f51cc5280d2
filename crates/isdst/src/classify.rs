//! Daylight-saving classification by seasonal offset sampling.
//!
//! A zone is sampled at local midnight on January 1 and July 1. Whichever of
//! the two offsets is larger is the daylight offset, and an instant is in
//! DST when its own offset is that one. This works in both hemispheres
//! without knowing when a zone's summer is.
//!
//! # Reference years
//!
//! July is always taken from the instant's own local year. January is taken
//! from the *next* year once the instant is in July or later, so the January
//! sample is the one closest to the instant. For a zone that changed its rules
//! mid-year (e.g., abolished DST in the autumn), this picks up the rules in
//! force after the change rather than those of the previous winter.
//!
//! # Offsets matching neither reference
//!
//! If the instant's offset equals the January sample, the answer is whether
//! January is ahead of July. In every other case, including an offset that
//! matches neither sample, the answer is whether July is ahead of January.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::trace;

use crate::error::{Result, ZoneResolutionError};
use crate::zone::{IanaZone, ZoneProvider, ZoneRules};

/// The offsets a zone has at its two seasonal reference instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeasonalOffsets {
    /// Offset at local midnight, January 1 (seconds east of UTC).
    pub january: i32,
    /// Offset at local midnight, July 1 (seconds east of UTC).
    pub july: i32,
}

impl SeasonalOffsets {
    /// Sample `zone` at the reference instants for the civil date `local`.
    ///
    /// # Errors
    ///
    /// Propagates any error from the zone, and returns
    /// [`ZoneResolutionError::OutOfRange`] if a reference date cannot be built.
    pub fn sample<Z: ZoneRules + ?Sized>(zone: &Z, local: NaiveDate) -> Result<Self> {
        let jan_year = if local.month() >= 7 {
            local.year() + 1
        } else {
            local.year()
        };

        let jan_ref = zone.resolve_local(first_of_month(jan_year, 1)?)?;
        let january = zone.offset_at(jan_ref)?.seconds;

        let jul_ref = zone.resolve_local(first_of_month(local.year(), 7)?)?;
        let july = zone.offset_at(jul_ref)?.seconds;

        Ok(Self { january, july })
    }

    /// Whether `offset` is the zone's daylight offset.
    pub fn is_daylight(&self, offset: i32) -> bool {
        if offset == self.january {
            self.january > self.july
        } else {
            self.july > self.january
        }
    }

    /// Whether the two samples differ at all.
    pub fn observes_dst(&self) -> bool {
        self.january != self.july
    }
}

/// Midnight on the first of `month`.
fn first_of_month(year: i32, month: u32) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ZoneResolutionError::OutOfRange(format!("{year}-{month:02}-01T00:00:00")))
}

/// The civil time read off a clock `offset_secs` east of UTC at `instant`.
pub(crate) fn local_datetime(instant: DateTime<Utc>, offset_secs: i32) -> Result<NaiveDateTime> {
    instant
        .naive_utc()
        .checked_add_signed(Duration::seconds(i64::from(offset_secs)))
        .ok_or_else(|| {
            ZoneResolutionError::OutOfRange(format!("'{instant}' at offset {offset_secs}s"))
        })
}

/// Determine whether `instant` falls in `zone`'s daylight-saving period.
///
/// The zone's offset oracle is consulted exactly three times: at `instant`,
/// at the January reference and at the July reference.
///
/// # Errors
///
/// Any error from the zone is returned unchanged; the first failing lookup
/// aborts the call.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use isdst::{is_daylight_saving, IanaZone};
///
/// let la: IanaZone = "America/Los_Angeles".parse().unwrap();
/// let september = Utc.timestamp_opt(1_221_681_866, 0).unwrap();
/// assert!(is_daylight_saving(september, &la).unwrap());
///
/// let new_years_eve = Utc.timestamp_opt(0, 0).unwrap();
/// assert!(!is_daylight_saving(new_years_eve, &la).unwrap());
/// ```
pub fn is_daylight_saving<Z: ZoneRules + ?Sized>(instant: DateTime<Utc>, zone: &Z) -> Result<bool> {
    let current = zone.offset_at(instant)?;
    let local = local_datetime(instant, current.seconds)?;
    let seasons = SeasonalOffsets::sample(zone, local.date())?;
    let dst = seasons.is_daylight(current.seconds);

    trace!(
        zone = zone.name(),
        %instant,
        offset = current.seconds,
        january = seasons.january,
        july = seasons.july,
        dst,
        "classified instant"
    );
    Ok(dst)
}

/// Resolve `zone_name` through `provider`, then classify `instant`.
///
/// # Errors
///
/// Returns [`ZoneResolutionError::InvalidTimezone`] if the provider does not
/// know the zone, otherwise as [`is_daylight_saving`].
pub fn is_daylight_saving_in<P: ZoneProvider + ?Sized>(
    provider: &P,
    instant: DateTime<Utc>,
    zone_name: &str,
) -> Result<bool> {
    let zone = provider.resolve(zone_name)?;
    is_daylight_saving(instant, &zone)
}

/// Classify a `chrono-tz` datetime in its own zone.
///
/// ```
/// use chrono::TimeZone;
/// use chrono_tz::Australia::Broken_Hill;
///
/// let summer = Broken_Hill.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
/// assert!(isdst::is_dst(&summer).unwrap());
///
/// let winter = Broken_Hill.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap();
/// assert!(!isdst::is_dst(&winter).unwrap());
/// ```
pub fn is_dst(datetime: &DateTime<Tz>) -> Result<bool> {
    let zone = IanaZone::new(datetime.timezone());
    is_daylight_saving(datetime.with_timezone(&Utc), &zone)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::zone::{FixedZone, IanaProvider};
    use chrono::TimeZone;
    use proptest::prelude::*;

    const ZONES: [&str; 4] = [
        "America/Los_Angeles",
        "Australia/Sydney",
        "Europe/London",
        "UTC",
    ];

    proptest! {
        /// Repeated calls agree.
        #[test]
        fn deterministic(secs in -4_000_000_000i64..4_000_000_000i64, zone_idx in 0usize..4) {
            let zone = IanaProvider.resolve(ZONES[zone_idx]).unwrap();
            let instant = Utc.timestamp_opt(secs, 0).single().unwrap();
            prop_assert_eq!(
                is_daylight_saving(instant, &zone).unwrap(),
                is_daylight_saving(instant, &zone).unwrap()
            );
        }

        /// A fixed offset is never daylight time.
        #[test]
        fn fixed_offsets_never_dst(
            secs in -10_000_000_000i64..10_000_000_000i64,
            offset in -86_399i32..86_400i32,
        ) {
            let zone = FixedZone::east(offset).unwrap();
            let instant = Utc.timestamp_opt(secs, 0).single().unwrap();
            prop_assert!(!is_daylight_saving(instant, &zone).unwrap());
        }

        /// Since 1970 Los Angeles only uses PST and PDT: DST is exactly "on PDT".
        #[test]
        fn los_angeles_dst_is_pdt(secs in 0i64..2_000_000_000i64) {
            let zone = IanaProvider.resolve("America/Los_Angeles").unwrap();
            let instant = Utc.timestamp_opt(secs, 0).single().unwrap();
            let on_pdt = zone.offset_at(instant).unwrap().seconds == -25_200;
            prop_assert_eq!(is_daylight_saving(instant, &zone).unwrap(), on_pdt);
        }
    }
}

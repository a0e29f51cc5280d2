//! # isdst
//!
//! Daylight-saving classification for instants in a time zone.
//!
//! An instant is in DST when the zone's offset at that instant is the larger
//! of the offsets the zone has on January 1 and July 1. No hemisphere or
//! transition dates need to be known: the zone's own rule table is sampled.
//!
//! ## Modules
//!
//! - [`classify`] — The DST classifier and its seasonal reference sampling
//! - [`zone`] — Zone rule tables (IANA, fixed, transition tables) and providers
//! - [`snapshot`] — Local time, offset, abbreviation and DST flag for one instant
//! - [`error`] — Error types

pub mod classify;
pub mod error;
pub mod snapshot;
pub mod zone;

pub use classify::{is_daylight_saving, is_daylight_saving_in, is_dst, SeasonalOffsets};
pub use error::{Result, ZoneResolutionError};
pub use snapshot::{describe, describe_instant, parse_rfc3339, ZoneSnapshot};
pub use zone::{
    FixedZone, IanaProvider, IanaZone, StaticProvider, Transition, TransitionZone, ZoneOffset,
    ZoneProvider, ZoneRules,
};

//! # Validity Window
//!
//! Pure temporal comparison with clock-skew tolerance. The skew value comes
//! from enrollment key material and absorbs drift between the terminal's
//! clock and the issuance server's.

use shared_types::Timestamp;

/// Whether `now` falls inside `[valid_from - skew, valid_to + skew]`.
///
/// Both boundaries are inclusive. `skew_minutes` widens the window on both
/// ends; the subtraction saturates so windows near the epoch stay sound.
pub fn is_within_window(
    valid_from: Timestamp,
    valid_to: Timestamp,
    now: Timestamp,
    skew_minutes: u32,
) -> bool {
    let skew_secs = u64::from(skew_minutes) * 60;
    now >= valid_from.saturating_sub(skew_secs) && now <= valid_to.saturating_add(skew_secs)
}

use crate::model::DisplayMode;
use crate::model::Format;
use crate::model::Rational;
use crate::model::Scaling;
use crate::model::ScanlineOrder;

/// Picks the listed mode nearest to `desired`.
///
/// Candidates must share the requested format. Among them the winner has the
/// smallest resolution distance, then refresh distance, then scanline
/// mismatch, then scaling mismatch; the earliest wins a tie. Unspecified
/// fields match anything. The answer is always a member of `modes`, so
/// asking again with the answer returns the answer.
pub(crate) fn closest_mode(modes: &[DisplayMode], desired: &DisplayMode) -> Option<DisplayMode> {
    modes
        .iter()
        .filter(|mode| mode.format == desired.format)
        .min_by_key(|mode| distance(mode, desired))
        .copied()
}

/// The first format in `modes` order, used when the request leaves it open.
pub(crate) fn preferred_format(modes: &[DisplayMode]) -> Option<Format> {
    modes.first().map(|mode| mode.format)
}

fn distance(mode: &DisplayMode, desired: &DisplayMode) -> (u64, u64, u8, u8) {
    let width = dimension_distance(mode.width, desired.width);
    let height = dimension_distance(mode.height, desired.height);
    let refresh = refresh_distance(mode.refresh_rate, desired.refresh_rate);
    let scanline = u8::from(
        desired.scanline_order != ScanlineOrder::Unspecified
            && mode.scanline_order != desired.scanline_order,
    );
    let scaling =
        u8::from(desired.scaling != Scaling::Unspecified && mode.scaling != desired.scaling);
    (width + height, refresh, scanline, scaling)
}

fn dimension_distance(actual: u32, desired: u32) -> u64 {
    if desired == 0 {
        0
    } else {
        u64::from(actual.abs_diff(desired))
    }
}

/// Distance in millihertz, computed exactly so equal rates always score zero.
fn refresh_distance(actual: Rational, desired: Rational) -> u64 {
    if desired.is_unspecified() || actual.is_unspecified() {
        return 0;
    }
    let lhs = u128::from(actual.numerator) * u128::from(desired.denominator);
    let rhs = u128::from(desired.numerator) * u128::from(actual.denominator);
    let scale = u128::from(actual.denominator) * u128::from(desired.denominator);
    let millihertz = lhs.abs_diff(rhs) * 1000;
    // Round up so distinct rates never collapse to zero.
    u64::try_from(millihertz.div_ceil(scale)).unwrap_or(u64::MAX)
}

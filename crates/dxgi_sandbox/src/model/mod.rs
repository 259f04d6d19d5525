//! Plain-data snapshots of what the platform reports.
//!
//! Every value here is produced by a query, owned by the caller and never
//! updated in place. Re-query to observe a change.

mod adapter;
mod mode;
mod resource;
mod swap_chain;

pub use adapter::*;
pub use mode::*;
pub use resource::*;
pub use swap_chain::*;

use std::fmt;

use widestring::U16CStr;
use widestring::U16Str;

use crate::error::DxgiError;
use crate::error::DxgiResult;

/// Decodes a fixed-size, NUL-padded UTF-16 field such as
/// `DXGI_ADAPTER_DESC::Description`.
pub fn wide_to_string(wide: &[u16]) -> String {
    match U16CStr::from_slice_truncate(wide) {
        Ok(terminated) => terminated.to_string_lossy(),
        Err(_) => U16Str::from_slice(wide).to_string_lossy(),
    }
}

/// Identifies a platform window without owning it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WindowId(pub isize);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

/// Desktop-space rectangle; `right` and `bottom` are exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// A rectangle at the origin. Sizes past `i32::MAX` do not fit the
    /// platform's signed coordinates and are rejected.
    pub fn from_size(width: u32, height: u32) -> DxgiResult<Self> {
        let extent = |what: &'static str, value: u32| {
            i32::try_from(value)
                .map_err(|_| DxgiError::range(what, value.into(), 0, i32::MAX.into()))
        };
        Ok(Self {
            left: 0,
            top: 0,
            right: extent("rect width", width)?,
            bottom: extent("rect height", height)?,
        })
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] - [{}, {}] ({}x{})",
            self.left,
            self.top,
            self.right,
            self.bottom,
            self.width(),
            self.height()
        )
    }
}

/// Key under which private data is attached to a platform object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PrivateDataKey(pub u128);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_sizes_must_fit_signed_coordinates() {
        let rect = Rect::from_size(i32::MAX as u32, 1).unwrap();
        assert_eq!(rect.width(), i32::MAX);
        assert!(matches!(
            Rect::from_size(1, u32::MAX),
            Err(DxgiError::Range {
                what: "rect height",
                ..
            })
        ));
    }

    #[test]
    fn wide_strings_stop_at_the_first_nul() {
        let mut field = [0u16; 32];
        for (slot, unit) in field.iter_mut().zip("\\\\.\\DISPLAY1".encode_utf16()) {
            *slot = unit;
        }
        assert_eq!(wide_to_string(&field), "\\\\.\\DISPLAY1");
    }

    #[test]
    fn wide_strings_without_terminator_are_kept_whole() {
        let field: Vec<u16> = "GPU".encode_utf16().collect();
        assert_eq!(wide_to_string(&field), "GPU");
    }

    #[test]
    fn rect_reports_its_size() {
        let rect = Rect {
            left: 1920,
            top: 0,
            right: 3840,
            bottom: 1080,
        };
        assert_eq!(rect.width(), 1920);
        assert_eq!(rect.height(), 1080);
        assert_eq!(rect.to_string(), "[1920, 0] - [3840, 1080] (1920x1080)");
    }
}

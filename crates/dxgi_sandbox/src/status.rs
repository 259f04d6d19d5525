use std::fmt;

/// A raw result code as returned by a DXGI or Direct3D call.
///
/// Follows HRESULT conventions: negative values are failures, everything else
/// is success. DXGI uses non-zero success codes (`DXGI_STATUS_*`) to report
/// conditions that are not errors, so `is_success` alone is not enough to
/// decide what a caller should do; see [`Status::class`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Status(pub i32);

/// Coarse interpretation of a [`Status`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    /// Index-based enumeration ran past the last item.
    EndOfSequence,
    /// Not an error; the same call should be retried later.
    Transient,
    /// The rendering device is unusable and must be rebuilt.
    DeviceLost,
    Failure,
}

const fn code(value: u32) -> Status {
    Status(value as i32)
}

impl Status {
    pub const OK: Status = code(0);
    pub const E_FAIL: Status = code(0x8000_4005);
    pub const E_INVALIDARG: Status = code(0x8007_0057);

    pub const DXGI_ERROR_INVALID_CALL: Status = code(0x887A_0001);
    pub const DXGI_ERROR_NOT_FOUND: Status = code(0x887A_0002);
    pub const DXGI_ERROR_MORE_DATA: Status = code(0x887A_0003);
    pub const DXGI_ERROR_UNSUPPORTED: Status = code(0x887A_0004);
    pub const DXGI_ERROR_DEVICE_REMOVED: Status = code(0x887A_0005);
    pub const DXGI_ERROR_DEVICE_HUNG: Status = code(0x887A_0006);
    pub const DXGI_ERROR_DEVICE_RESET: Status = code(0x887A_0007);
    pub const DXGI_ERROR_WAS_STILL_DRAWING: Status = code(0x887A_000A);
    pub const DXGI_ERROR_FRAME_STATISTICS_DISJOINT: Status = code(0x887A_000B);
    pub const DXGI_ERROR_DRIVER_INTERNAL_ERROR: Status = code(0x887A_0020);
    pub const DXGI_ERROR_NOT_CURRENTLY_AVAILABLE: Status = code(0x887A_0022);

    pub const DXGI_STATUS_OCCLUDED: Status = code(0x087A_0001);
    pub const DXGI_STATUS_MODE_CHANGED: Status = code(0x087A_0007);
    pub const DXGI_STATUS_MODE_CHANGE_IN_PROGRESS: Status = code(0x087A_0008);

    /// Reported by the kernel-mode driver layer after a driver upgrade.
    pub const D3DDDIERR_DEVICEREMOVED: Status = code(0x8876_0870);

    pub const fn is_success(self) -> bool {
        self.0 >= 0
    }

    pub const fn is_failure(self) -> bool {
        self.0 < 0
    }

    pub fn class(self) -> StatusClass {
        match self {
            Self::DXGI_ERROR_NOT_FOUND => StatusClass::EndOfSequence,
            Self::DXGI_STATUS_OCCLUDED
            | Self::DXGI_STATUS_MODE_CHANGE_IN_PROGRESS
            | Self::DXGI_ERROR_NOT_CURRENTLY_AVAILABLE
            | Self::DXGI_ERROR_WAS_STILL_DRAWING => StatusClass::Transient,
            Self::DXGI_ERROR_DEVICE_REMOVED
            | Self::DXGI_ERROR_DEVICE_HUNG
            | Self::DXGI_ERROR_DEVICE_RESET
            | Self::DXGI_ERROR_DRIVER_INTERNAL_ERROR
            | Self::D3DDDIERR_DEVICEREMOVED => StatusClass::DeviceLost,
            other if other.is_success() => StatusClass::Success,
            _ => StatusClass::Failure,
        }
    }

    /// Turns the code into a `Result`, keeping success codes on the `Ok` side.
    pub fn ok(self) -> Result<Status, Status> {
        if self.is_success() { Ok(self) } else { Err(self) }
    }

    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::OK => "S_OK",
            Self::E_FAIL => "E_FAIL",
            Self::E_INVALIDARG => "E_INVALIDARG",
            Self::DXGI_ERROR_INVALID_CALL => "DXGI_ERROR_INVALID_CALL",
            Self::DXGI_ERROR_NOT_FOUND => "DXGI_ERROR_NOT_FOUND",
            Self::DXGI_ERROR_MORE_DATA => "DXGI_ERROR_MORE_DATA",
            Self::DXGI_ERROR_UNSUPPORTED => "DXGI_ERROR_UNSUPPORTED",
            Self::DXGI_ERROR_DEVICE_REMOVED => "DXGI_ERROR_DEVICE_REMOVED",
            Self::DXGI_ERROR_DEVICE_HUNG => "DXGI_ERROR_DEVICE_HUNG",
            Self::DXGI_ERROR_DEVICE_RESET => "DXGI_ERROR_DEVICE_RESET",
            Self::DXGI_ERROR_WAS_STILL_DRAWING => "DXGI_ERROR_WAS_STILL_DRAWING",
            Self::DXGI_ERROR_FRAME_STATISTICS_DISJOINT => "DXGI_ERROR_FRAME_STATISTICS_DISJOINT",
            Self::DXGI_ERROR_DRIVER_INTERNAL_ERROR => "DXGI_ERROR_DRIVER_INTERNAL_ERROR",
            Self::DXGI_ERROR_NOT_CURRENTLY_AVAILABLE => "DXGI_ERROR_NOT_CURRENTLY_AVAILABLE",
            Self::DXGI_STATUS_OCCLUDED => "DXGI_STATUS_OCCLUDED",
            Self::DXGI_STATUS_MODE_CHANGED => "DXGI_STATUS_MODE_CHANGED",
            Self::DXGI_STATUS_MODE_CHANGE_IN_PROGRESS => "DXGI_STATUS_MODE_CHANGE_IN_PROGRESS",
            Self::D3DDDIERR_DEVICEREMOVED => "D3DDDIERR_DEVICEREMOVED",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} (0x{:08X})", self.0 as u32),
            None => write!(f, "0x{:08X}", self.0 as u32),
        }
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Result of a single platform call. The error side carries the failing code.
pub type RawResult<T> = Result<T, Status>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_codes_are_not_failures() {
        assert!(Status::OK.is_success());
        assert!(Status::DXGI_STATUS_OCCLUDED.is_success());
        assert!(Status::DXGI_STATUS_MODE_CHANGE_IN_PROGRESS.is_success());
        assert!(Status::DXGI_ERROR_NOT_FOUND.is_failure());
        assert!(Status::E_INVALIDARG.is_failure());
    }

    #[test]
    fn classification_follows_the_taxonomy() {
        assert_eq!(Status::OK.class(), StatusClass::Success);
        assert_eq!(Status::DXGI_STATUS_MODE_CHANGED.class(), StatusClass::Success);
        assert_eq!(Status::DXGI_ERROR_NOT_FOUND.class(), StatusClass::EndOfSequence);
        assert_eq!(Status::DXGI_STATUS_OCCLUDED.class(), StatusClass::Transient);
        assert_eq!(
            Status::DXGI_STATUS_MODE_CHANGE_IN_PROGRESS.class(),
            StatusClass::Transient
        );
        assert_eq!(Status::DXGI_ERROR_DEVICE_RESET.class(), StatusClass::DeviceLost);
        assert_eq!(Status::D3DDDIERR_DEVICEREMOVED.class(), StatusClass::DeviceLost);
        assert_eq!(Status::DXGI_ERROR_INVALID_CALL.class(), StatusClass::Failure);
        assert_eq!(Status(-1).class(), StatusClass::Failure);
    }

    #[test]
    fn display_names_known_codes() {
        assert_eq!(
            Status::DXGI_ERROR_NOT_FOUND.to_string(),
            "DXGI_ERROR_NOT_FOUND (0x887A0002)"
        );
        assert_eq!(Status(0x1234).to_string(), "0x00001234");
    }

    #[test]
    fn ok_keeps_informational_success() {
        assert_eq!(
            Status::DXGI_STATUS_OCCLUDED.ok(),
            Ok(Status::DXGI_STATUS_OCCLUDED)
        );
        assert_eq!(
            Status::DXGI_ERROR_DEVICE_HUNG.ok(),
            Err(Status::DXGI_ERROR_DEVICE_HUNG)
        );
    }
}

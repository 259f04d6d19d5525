use std::fmt;

use crate::status::Status;

/// Why a device stopped being usable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceLostKind {
    /// The device failed and must be re-created.
    Reset,
    /// The adapter was physically removed or disabled.
    Removed,
    Hung,
    /// The driver was upgraded underneath the application.
    DriverUpgraded,
    DriverInternal,
}

impl DeviceLostKind {
    pub fn from_status(status: Status) -> Option<Self> {
        let kind = match status {
            Status::DXGI_ERROR_DEVICE_RESET => Self::Reset,
            Status::DXGI_ERROR_DEVICE_REMOVED => Self::Removed,
            Status::DXGI_ERROR_DEVICE_HUNG => Self::Hung,
            Status::D3DDDIERR_DEVICEREMOVED => Self::DriverUpgraded,
            Status::DXGI_ERROR_DRIVER_INTERNAL_ERROR => Self::DriverInternal,
            _ => return None,
        };
        Some(kind)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reset => "device-reset",
            Self::Removed => "device-removed",
            Self::Hung => "device-hung",
            Self::DriverUpgraded => "driver-upgraded",
            Self::DriverInternal => "driver-internal-error",
        }
    }
}

impl fmt::Display for DeviceLostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DxgiError {
    /// An indexed query ran past the end of the sequence.
    #[error("no {what} at index {index}")]
    NotFound { what: &'static str, index: u32 },

    #[error("{call} failed with {status}")]
    Platform { call: &'static str, status: Status },

    #[error("{what} {value} is outside [{min}, {max}]")]
    Range {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{call} reported {kind}: {status}")]
    DeviceLost {
        call: &'static str,
        kind: DeviceLostKind,
        status: Status,
    },

    /// The requested backend cannot run on this host.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DxgiErrorClass {
    EndOfSequence,
    InvalidInput,
    DeviceLost,
    Fatal,
}

impl DxgiError {
    /// Maps a failing status from `call` to the matching error.
    ///
    /// Device-loss codes become [`DxgiError::DeviceLost`]; everything else,
    /// including `DXGI_ERROR_NOT_FOUND` outside of enumeration, is surfaced as
    /// [`DxgiError::Platform`] with the raw code.
    pub fn from_status(call: &'static str, status: Status) -> Self {
        match DeviceLostKind::from_status(status) {
            Some(kind) => Self::DeviceLost { call, kind, status },
            None => Self::Platform { call, status },
        }
    }

    pub fn range(what: &'static str, value: i64, min: i64, max: i64) -> Self {
        Self::Range {
            what,
            value,
            min,
            max,
        }
    }

    pub fn class(&self) -> DxgiErrorClass {
        match self {
            Self::NotFound { .. } => DxgiErrorClass::EndOfSequence,
            Self::Range { .. } => DxgiErrorClass::InvalidInput,
            Self::DeviceLost { .. } => DxgiErrorClass::DeviceLost,
            Self::Platform { .. } | Self::BackendUnavailable(_) => DxgiErrorClass::Fatal,
        }
    }

    /// The device, its adapter binding and every swap chain built on it
    /// have to be torn down and rebuilt.
    pub fn is_device_lost(&self) -> bool {
        matches!(self, Self::DeviceLost { .. })
    }

    pub fn status(&self) -> Option<Status> {
        match self {
            Self::Platform { status, .. } | Self::DeviceLost { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type DxgiResult<T> = Result<T, DxgiError>;

/// Attaches the name of the platform call to a raw failure.
pub(crate) trait StatusContext<T> {
    fn call(self, call: &'static str) -> DxgiResult<T>;
}

impl<T> StatusContext<T> for Result<T, Status> {
    fn call(self, call: &'static str) -> DxgiResult<T> {
        self.map_err(|status| DxgiError::from_status(call, status))
    }
}

use std::fmt;

use super::Rect;

/// Locally unique adapter identifier, valid until the next reboot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Luid {
    pub low_part: u32,
    pub high_part: i32,
}

impl Luid {
    pub fn as_u64(&self) -> u64 {
        ((self.high_part as u32 as u64) << 32) | self.low_part as u64
    }
}

impl fmt::Display for Luid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.high_part, self.low_part)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdapterDescriptor {
    pub description: String,
    pub vendor_id: u32,
    pub device_id: u32,
    pub sub_sys_id: u32,
    pub revision: u32,
    pub dedicated_video_memory: u64,
    pub dedicated_system_memory: u64,
    pub shared_system_memory: u64,
    pub luid: Luid,
}

/// Device interfaces an adapter can be asked about.
///
/// Only Direct3D 10 interfaces are answered; asking about later versions
/// yields `DXGI_ERROR_UNSUPPORTED`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceInterface {
    D3D10Device,
}

/// User-mode driver version packed as four 16-bit parts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct DriverVersion(pub u64);

impl DriverVersion {
    pub const fn from_parts(product: u16, version: u16, sub_version: u16, build: u16) -> Self {
        Self(
            (product as u64) << 48
                | (version as u64) << 32
                | (sub_version as u64) << 16
                | build as u64,
        )
    }

    pub const fn parts(&self) -> [u16; 4] {
        [
            (self.0 >> 48) as u16,
            (self.0 >> 32) as u16,
            (self.0 >> 16) as u16,
            self.0 as u16,
        ]
    }
}

impl fmt::Display for DriverVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [product, version, sub_version, build] = self.parts();
        write!(f, "{product}.{version}.{sub_version}.{build}")
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    Unspecified,
    Identity,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl Rotation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "unspecified",
            Self::Identity => "identity",
            Self::Rotate90 => "rotate-90",
            Self::Rotate180 => "rotate-180",
            Self::Rotate270 => "rotate-270",
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputDescriptor {
    pub device_name: String,
    pub attached_to_desktop: bool,
    pub rotation: Rotation,
    pub desktop_coordinates: Rect,
}

/// Extra details the window manager keeps about the monitor behind an output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonitorInfo {
    pub device: String,
    pub monitor: Rect,
    /// Monitor area minus task bars and docked tool windows.
    pub work_area: Rect,
    pub is_primary: bool,
}

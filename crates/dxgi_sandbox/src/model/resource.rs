use std::fmt;
use std::ops::RangeInclusive;

use bitflags::bitflags;

use super::Format;
use super::SampleDesc;

/// Valid GPU thread priorities; zero is normal.
pub const GPU_PRIORITY_RANGE: RangeInclusive<i32> = -7..=7;

/// Where the memory backing a resource currently lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResidencyStatus {
    FullyResident,
    ResidentInSharedMemory,
    EvictedToDisk,
}

impl ResidencyStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullyResident => "fully-resident",
            Self::ResidentInSharedMemory => "in-shared-memory",
            Self::EvictedToDisk => "evicted-to-disk",
        }
    }
}

impl fmt::Display for ResidencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How eagerly the memory manager may evict a resource.
///
/// Any value between [`EvictionPriority::MINIMUM`] and
/// [`EvictionPriority::MAXIMUM`] is allowed, not just the named levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EvictionPriority(pub u32);

impl EvictionPriority {
    pub const MINIMUM: EvictionPriority = EvictionPriority(0x2800_0000);
    pub const LOW: EvictionPriority = EvictionPriority(0x5000_0000);
    pub const NORMAL: EvictionPriority = EvictionPriority(0x7800_0000);
    pub const HIGH: EvictionPriority = EvictionPriority(0xa000_0000);
    pub const MAXIMUM: EvictionPriority = EvictionPriority(0xc800_0000);
}

impl Default for EvictionPriority {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for EvictionPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::MINIMUM => "minimum",
            Self::LOW => "low",
            Self::NORMAL => "normal",
            Self::HIGH => "high",
            Self::MAXIMUM => "maximum",
            _ => return write!(f, "0x{:08X}", self.0),
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriverType {
    #[default]
    Hardware,
    /// The software rasterizer.
    Warp,
    Reference,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeviceOptions {
    pub driver: DriverType,
    /// Ask for the debug layer.
    pub debug: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextureUsage {
    /// GPU read and write.
    #[default]
    Default,
    /// CPU-writable copy source, never bound to the pipeline.
    Staging,
}

/// A single-mip, single-slice 2D texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: Format,
    pub usage: TextureUsage,
}

impl TextureDesc {
    pub const fn staging(width: u32, height: u32, format: Format) -> Self {
        Self {
            width,
            height,
            format,
            usage: TextureUsage::Staging,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceDescription {
    pub width: u32,
    pub height: u32,
    pub format: Format,
    pub sample: SampleDesc,
}

bitflags! {
    /// `DXGI_MAP_*`: CPU access requested when mapping a surface.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MapFlags: u32 {
        const READ = 0x1;
        const WRITE = 0x2;
        /// Throw away the previous contents.
        const DISCARD = 0x4;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_range_is_symmetric() {
        assert!(GPU_PRIORITY_RANGE.contains(&-7));
        assert!(GPU_PRIORITY_RANGE.contains(&7));
        assert!(!GPU_PRIORITY_RANGE.contains(&8));
    }

    #[test]
    fn eviction_priority_names() {
        assert_eq!(EvictionPriority::NORMAL.to_string(), "normal");
        assert_eq!(EvictionPriority(0x7000_0000).to_string(), "0x70000000");
    }

    #[test]
    fn residency_labels() {
        assert_eq!(
            ResidencyStatus::ResidentInSharedMemory.to_string(),
            "in-shared-memory"
        );
    }
}

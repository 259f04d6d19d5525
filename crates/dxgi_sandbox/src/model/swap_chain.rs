use std::fmt;

use bitflags::bitflags;

use super::DisplayMode;
use super::Format;
use super::Rational;
use super::Scaling;
use super::ScanlineOrder;
use super::WindowId;

bitflags! {
    /// `DXGI_USAGE`: how a surface or back buffer may be used.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Usage: u32 {
        const SHADER_INPUT = 0x010;
        const RENDER_TARGET_OUTPUT = 0x020;
        const BACK_BUFFER = 0x040;
        const SHARED = 0x080;
        const READ_ONLY = 0x100;
        const DISCARD_ON_PRESENT = 0x200;
        const UNORDERED_ACCESS = 0x400;
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABELS: [(Usage, &str); 7] = [
            (Usage::BACK_BUFFER, "[back-buffer]"),
            (Usage::DISCARD_ON_PRESENT, "[discard-on-present]"),
            (Usage::READ_ONLY, "[read-only]"),
            (Usage::RENDER_TARGET_OUTPUT, "[render-target-output]"),
            (Usage::SHADER_INPUT, "[shader-input]"),
            (Usage::SHARED, "[shared]"),
            (Usage::UNORDERED_ACCESS, "[unordered-access]"),
        ];
        for (flag, label) in LABELS {
            if self.contains(flag) {
                f.write_str(label)?;
            }
        }
        Ok(())
    }
}

bitflags! {
    /// `DXGI_SWAP_CHAIN_FLAG`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SwapChainFlags: u32 {
        const NONPREROTATED = 0x1;
        const ALLOW_MODE_SWITCH = 0x2;
        const GDI_COMPATIBLE = 0x4;
    }
}

bitflags! {
    /// `DXGI_PRESENT` flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PresentFlags: u32 {
        /// Only report occlusion, do not present.
        const TEST = 0x1;
        const DO_NOT_SEQUENCE = 0x2;
        const RESTART = 0x4;
    }
}

bitflags! {
    /// `DXGI_MWA_*`: which window messages DXGI listens to.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct WindowAssociation: u32 {
        const NO_WINDOW_CHANGES = 0x1;
        const NO_ALT_ENTER = 0x2;
        const NO_PRINT_SCREEN = 0x4;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SampleDesc {
    pub count: u32,
    pub quality: u32,
}

impl Default for SampleDesc {
    fn default() -> Self {
        Self {
            count: 1,
            quality: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SwapEffect {
    #[default]
    Discard,
    Sequential,
    FlipSequential,
    FlipDiscard,
}

impl SwapEffect {
    pub const fn is_flip_model(self) -> bool {
        matches!(self, Self::FlipSequential | Self::FlipDiscard)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Discard => "discard",
            Self::Sequential => "sequential",
            Self::FlipSequential => "flip-sequential",
            Self::FlipDiscard => "flip-discard",
        }
    }
}

impl fmt::Display for SwapEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to create a swap chain except the device and window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SwapChainConfig {
    pub buffer_count: u32,
    /// Zero takes the width of the window's client area.
    pub width: u32,
    /// Zero takes the height of the window's client area.
    pub height: u32,
    pub format: Format,
    pub refresh_rate: Rational,
    pub scaling: Scaling,
    pub scanline_order: ScanlineOrder,
    pub usage: Usage,
    pub sample: SampleDesc,
    pub swap_effect: SwapEffect,
    pub windowed: bool,
    pub flags: SwapChainFlags,
}

impl SwapChainConfig {
    /// Two flip-sequential render-target buffers at 60 Hz, starting windowed.
    pub fn windowed(width: u32, height: u32, format: Format) -> Self {
        Self {
            buffer_count: 2,
            width,
            height,
            format,
            refresh_rate: Rational::new(60, 1),
            scaling: Scaling::Unspecified,
            scanline_order: ScanlineOrder::Unspecified,
            usage: Usage::RENDER_TARGET_OUTPUT,
            sample: SampleDesc::default(),
            swap_effect: SwapEffect::FlipSequential,
            windowed: true,
            flags: SwapChainFlags::empty(),
        }
    }

    /// The buffer part of the configuration as a display mode.
    pub fn buffer_mode(&self) -> DisplayMode {
        DisplayMode {
            width: self.width,
            height: self.height,
            refresh_rate: self.refresh_rate,
            format: self.format,
            scaling: self.scaling,
            scanline_order: self.scanline_order,
        }
    }
}

/// What the platform reports back about a live swap chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapChainDescription {
    pub config: SwapChainConfig,
    pub window: WindowId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayState {
    Windowed,
    Fullscreen,
}

impl DisplayState {
    pub const fn from_windowed(windowed: bool) -> Self {
        if windowed {
            Self::Windowed
        } else {
            Self::Fullscreen
        }
    }

    pub const fn is_fullscreen(self) -> bool {
        matches!(self, Self::Fullscreen)
    }
}

/// Arguments of `ResizeBuffers`. Zero or `Format::UNKNOWN` keep the current value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResizeBuffers {
    pub buffer_count: u32,
    pub width: u32,
    pub height: u32,
    pub format: Format,
    pub flags: SwapChainFlags,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStatistics {
    pub present_count: u32,
    pub present_refresh_count: u32,
    pub sync_refresh_count: u32,
    pub sync_qpc_time: i64,
    pub sync_gpu_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_labels_follow_flag_order() {
        let usage = Usage::RENDER_TARGET_OUTPUT | Usage::BACK_BUFFER;
        assert_eq!(usage.to_string(), "[back-buffer][render-target-output]");
        assert_eq!(Usage::empty().to_string(), "");
    }

    #[test]
    fn usage_bits_the_labels_do_not_name_are_kept() {
        let usage = Usage::from_bits_retain(0x1040);
        assert!(usage.contains(Usage::BACK_BUFFER));
        assert_eq!(usage.bits(), 0x1040);
        assert_eq!(usage.to_string(), "[back-buffer]");
    }

    #[test]
    fn flag_sets_combine() {
        let mut flags = WindowAssociation::NO_ALT_ENTER;
        flags |= WindowAssociation::NO_PRINT_SCREEN;
        assert!(flags.contains(WindowAssociation::NO_ALT_ENTER));
        assert!(!flags.contains(WindowAssociation::NO_WINDOW_CHANGES));
        assert_eq!(flags.bits(), 0x6);
    }

    #[test]
    fn windowed_config_defaults() {
        let config = SwapChainConfig::windowed(800, 600, Format::R8G8B8A8_UNORM);
        assert_eq!(config.buffer_count, 2);
        assert!(config.windowed);
        assert!(config.swap_effect.is_flip_model());
        assert_eq!(config.refresh_rate, Rational::new(60, 1));
        assert_eq!(config.buffer_mode().width, 800);
    }
}

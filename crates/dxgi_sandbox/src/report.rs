//! Console layout for what the tour finds: blocks of aligned `label: value`
//! lines, each block opened by a rule.

use std::fmt::Display;
use std::fmt::Write;

use crate::model::AdapterDescriptor;
use crate::model::DisplayMode;
use crate::model::DisplayState;
use crate::model::DriverVersion;
use crate::model::EvictionPriority;
use crate::model::Format;
use crate::model::FrameStatistics;
use crate::model::MonitorInfo;
use crate::model::OutputDescriptor;
use crate::model::ResidencyStatus;
use crate::model::SurfaceDescription;
use crate::model::SwapChainDescription;
use crate::model::Usage;
use crate::presentation_loop::LoopExit;
use crate::presentation_loop::LoopSummary;

pub const RULE: &str = "==============================================================";

/// Lines whose values start in the same column.
struct Block {
    text: String,
    width: usize,
}

impl Block {
    fn new(labels: &[&str]) -> Self {
        let width = labels.iter().map(|label| label.len()).max().unwrap_or(0) + 2;
        Self {
            text: String::new(),
            width,
        }
    }

    fn ruled(labels: &[&str]) -> Self {
        let mut block = Self::new(labels);
        block.text.push_str(RULE);
        block.text.push('\n');
        block
    }

    fn field(mut self, label: &str, value: impl Display) -> Self {
        let label = format!("{label}:");
        // Writing into a String cannot fail.
        _ = writeln!(self.text, "{label:<width$}{value}", width = self.width);
        self
    }

    fn finish(self) -> String {
        self.text
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn bool_label(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

pub fn adapter(desc: &AdapterDescriptor, driver: Option<DriverVersion>) -> String {
    const LABELS: &[&str] = &[
        "description",
        "vendor-id",
        "device-id",
        "sub-sys-id",
        "revision",
        "video-memory",
        "system-memory",
        "shared-memory",
        "luid",
        "d3d10-driver",
    ];
    let block = Block::ruled(LABELS)
        .field("description", &desc.description)
        .field("vendor-id", format_args!("0x{:04X}", desc.vendor_id))
        .field("device-id", format_args!("0x{:04X}", desc.device_id))
        .field("sub-sys-id", format_args!("0x{:08X}", desc.sub_sys_id))
        .field("revision", desc.revision)
        .field("video-memory", desc.dedicated_video_memory)
        .field("system-memory", desc.dedicated_system_memory)
        .field("shared-memory", desc.shared_system_memory)
        .field("luid", desc.luid);
    match driver {
        Some(version) => block.field("d3d10-driver", version),
        None => block.field("d3d10-driver", "unsupported"),
    }
    .finish()
}

pub fn output(desc: &OutputDescriptor, monitor: Option<&MonitorInfo>) -> String {
    const LABELS: &[&str] = &[
        "name",
        "has-desktop",
        "rotation",
        "desktop-coords",
        "device",
        "monitor-coords",
        "work-coords",
        "is-primary",
    ];
    let block = Block::ruled(LABELS)
        .field("name", &desc.device_name)
        .field("has-desktop", bool_label(desc.attached_to_desktop))
        .field("rotation", desc.rotation)
        .field("desktop-coords", desc.desktop_coordinates);
    match monitor {
        Some(info) => block
            .field("device", &info.device)
            .field("monitor-coords", info.monitor)
            .field("work-coords", info.work_area)
            .field("is-primary", bool_label(info.is_primary)),
        None => block,
    }
    .finish()
}

pub fn display_modes(format: Format, modes: &[DisplayMode]) -> String {
    let mut text = format!("display modes for format {format}:\n");
    for mode in modes {
        _ = writeln!(text, "  {mode}");
    }
    text
}

pub fn closest_mode(desired: &DisplayMode, closest: &DisplayMode) -> String {
    format!(
        "closest matching mode for {} {}x{}:\n  {closest}\n",
        desired.format, desired.width, desired.height
    )
}

pub fn device(
    adapter: Option<&AdapterDescriptor>,
    gpu_priority: i32,
    residency: &[ResidencyStatus],
) -> String {
    let residency = residency
        .iter()
        .copied()
        .map(ResidencyStatus::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    Block::new(&["device-adapter", "device-gpu-priority", "resource-residency"])
        .field(
            "device-adapter",
            adapter.map_or("none", |desc| desc.description.as_str()),
        )
        .field("device-gpu-priority", gpu_priority)
        .field("resource-residency", residency)
        .finish()
}

pub fn resource(has_shared_handle: bool, usage: Usage, eviction: EvictionPriority) -> String {
    Block::new(&["has-shared-handle", "usage", "eviction-priority"])
        .field("has-shared-handle", yes_no(has_shared_handle))
        .field("usage", usage)
        .field("eviction-priority", eviction)
        .finish()
}

pub fn surface(desc: &SurfaceDescription) -> String {
    Block::ruled(&["format", "width", "height", "sample"])
        .field("format", desc.format)
        .field("width", desc.width)
        .field("height", desc.height)
        .field(
            "sample",
            format_args!("{}:{}", desc.sample.count, desc.sample.quality),
        )
        .finish()
}

pub fn swap_chain(desc: &SwapChainDescription) -> String {
    const LABELS: &[&str] = &[
        "buffer-count",
        "buffer-usage",
        "buffer-format",
        "buffer-width",
        "buffer-height",
        "buffer-scaling",
        "buffer-scanline",
        "flags",
        "sample-count",
        "sample-quality",
        "windowed",
        "swap-effect",
        "window",
    ];
    let config = &desc.config;
    Block::ruled(LABELS)
        .field("buffer-count", config.buffer_count)
        .field("buffer-usage", config.usage)
        .field("buffer-format", config.format)
        .field("buffer-width", config.width)
        .field("buffer-height", config.height)
        .field("buffer-scaling", config.scaling)
        .field("buffer-scanline", config.scanline_order)
        .field("flags", config.flags.bits())
        .field("sample-count", config.sample.count)
        .field("sample-quality", config.sample.quality)
        .field("windowed", bool_label(config.windowed))
        .field("swap-effect", config.swap_effect)
        .field("window", desc.window)
        .finish()
}

pub fn fullscreen(state: DisplayState, present_count: u32) -> String {
    Block::new(&["is-fullscreen", "present-count"])
        .field("is-fullscreen", bool_label(state.is_fullscreen()))
        .field("present-count", present_count)
        .finish()
}

pub fn frame_statistics(stats: &FrameStatistics) -> String {
    const LABELS: &[&str] = &[
        "present-count",
        "present-refresh-count",
        "sync-gpu-time",
        "sync-qpc-time",
        "sync-refresh-count",
    ];
    Block::new(LABELS)
        .field("present-count", stats.present_count)
        .field("present-refresh-count", stats.present_refresh_count)
        .field("sync-gpu-time", stats.sync_gpu_time)
        .field("sync-qpc-time", stats.sync_qpc_time)
        .field("sync-refresh-count", stats.sync_refresh_count)
        .finish()
}

pub fn presentation(summary: &LoopSummary) -> String {
    let exit = match summary.exit {
        LoopExit::Quit => "quit".to_owned(),
        LoopExit::DeviceLost(kind) => kind.to_string(),
    };
    Block::ruled(&["events", "presented", "occluded", "exit"])
        .field("events", summary.events)
        .field("presented", summary.presented)
        .field("occluded", summary.occluded)
        .field("exit", exit)
        .finish()
}

//! Plain-data conversions between the crate's model and the DXGI structs.

use windows::Win32::Foundation::HWND;
use windows::Win32::Foundation::LUID;
use windows::Win32::Foundation::RECT;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;

use crate::model::AdapterDescriptor;
use crate::model::DisplayMode;
use crate::model::Format;
use crate::model::FrameStatistics;
use crate::model::Luid;
use crate::model::OutputDescriptor;
use crate::model::Rational;
use crate::model::Rect;
use crate::model::ResidencyStatus;
use crate::model::Rotation;
use crate::model::SampleDesc;
use crate::model::Scaling;
use crate::model::ScanlineOrder;
use crate::model::SurfaceDescription;
use crate::model::SwapChainConfig;
use crate::model::SwapChainDescription;
use crate::model::SwapChainFlags;
use crate::model::SwapEffect;
use crate::model::Usage;
use crate::model::WindowId;
use crate::model::wide_to_string;

pub(crate) fn format_to_native(format: Format) -> DXGI_FORMAT {
    DXGI_FORMAT(format.0 as i32)
}

pub(crate) fn format_from_native(format: DXGI_FORMAT) -> Format {
    Format(format.0 as u32)
}

pub(crate) fn window_to_native(window: WindowId) -> HWND {
    HWND(window.0 as *mut _)
}

pub(crate) fn window_from_native(window: HWND) -> WindowId {
    WindowId(window.0 as isize)
}

pub(crate) fn rect_from_native(rect: &RECT) -> Rect {
    Rect {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

fn luid_from_native(luid: LUID) -> Luid {
    Luid {
        low_part: luid.LowPart,
        high_part: luid.HighPart,
    }
}

fn scaling_to_native(scaling: Scaling) -> DXGI_MODE_SCALING {
    match scaling {
        Scaling::Unspecified => DXGI_MODE_SCALING_UNSPECIFIED,
        Scaling::Centered => DXGI_MODE_SCALING_CENTERED,
        Scaling::Stretched => DXGI_MODE_SCALING_STRETCHED,
    }
}

fn scaling_from_native(scaling: DXGI_MODE_SCALING) -> Scaling {
    match scaling {
        DXGI_MODE_SCALING_CENTERED => Scaling::Centered,
        DXGI_MODE_SCALING_STRETCHED => Scaling::Stretched,
        _ => Scaling::Unspecified,
    }
}

fn scanline_to_native(order: ScanlineOrder) -> DXGI_MODE_SCANLINE_ORDER {
    match order {
        ScanlineOrder::Unspecified => DXGI_MODE_SCANLINE_ORDER_UNSPECIFIED,
        ScanlineOrder::Progressive => DXGI_MODE_SCANLINE_ORDER_PROGRESSIVE,
        ScanlineOrder::UpperFieldFirst => DXGI_MODE_SCANLINE_ORDER_UPPER_FIELD_FIRST,
        ScanlineOrder::LowerFieldFirst => DXGI_MODE_SCANLINE_ORDER_LOWER_FIELD_FIRST,
    }
}

fn scanline_from_native(order: DXGI_MODE_SCANLINE_ORDER) -> ScanlineOrder {
    match order {
        DXGI_MODE_SCANLINE_ORDER_PROGRESSIVE => ScanlineOrder::Progressive,
        DXGI_MODE_SCANLINE_ORDER_UPPER_FIELD_FIRST => ScanlineOrder::UpperFieldFirst,
        DXGI_MODE_SCANLINE_ORDER_LOWER_FIELD_FIRST => ScanlineOrder::LowerFieldFirst,
        _ => ScanlineOrder::Unspecified,
    }
}

fn rotation_from_native(rotation: DXGI_MODE_ROTATION) -> Rotation {
    match rotation {
        DXGI_MODE_ROTATION_IDENTITY => Rotation::Identity,
        DXGI_MODE_ROTATION_ROTATE90 => Rotation::Rotate90,
        DXGI_MODE_ROTATION_ROTATE180 => Rotation::Rotate180,
        DXGI_MODE_ROTATION_ROTATE270 => Rotation::Rotate270,
        _ => Rotation::Unspecified,
    }
}

fn swap_effect_to_native(effect: SwapEffect) -> DXGI_SWAP_EFFECT {
    match effect {
        SwapEffect::Discard => DXGI_SWAP_EFFECT_DISCARD,
        SwapEffect::Sequential => DXGI_SWAP_EFFECT_SEQUENTIAL,
        SwapEffect::FlipSequential => DXGI_SWAP_EFFECT_FLIP_SEQUENTIAL,
        SwapEffect::FlipDiscard => DXGI_SWAP_EFFECT_FLIP_DISCARD,
    }
}

fn swap_effect_from_native(effect: DXGI_SWAP_EFFECT) -> SwapEffect {
    match effect {
        DXGI_SWAP_EFFECT_SEQUENTIAL => SwapEffect::Sequential,
        DXGI_SWAP_EFFECT_FLIP_SEQUENTIAL => SwapEffect::FlipSequential,
        DXGI_SWAP_EFFECT_FLIP_DISCARD => SwapEffect::FlipDiscard,
        _ => SwapEffect::Discard,
    }
}

pub(crate) fn mode_to_native(mode: &DisplayMode) -> DXGI_MODE_DESC {
    DXGI_MODE_DESC {
        Width: mode.width,
        Height: mode.height,
        RefreshRate: DXGI_RATIONAL {
            Numerator: mode.refresh_rate.numerator,
            Denominator: mode.refresh_rate.denominator,
        },
        Format: format_to_native(mode.format),
        ScanlineOrdering: scanline_to_native(mode.scanline_order),
        Scaling: scaling_to_native(mode.scaling),
    }
}

pub(crate) fn mode_from_native(mode: &DXGI_MODE_DESC) -> DisplayMode {
    DisplayMode {
        width: mode.Width,
        height: mode.Height,
        refresh_rate: Rational::new(mode.RefreshRate.Numerator, mode.RefreshRate.Denominator),
        format: format_from_native(mode.Format),
        scaling: scaling_from_native(mode.Scaling),
        scanline_order: scanline_from_native(mode.ScanlineOrdering),
    }
}

fn sample_to_native(sample: SampleDesc) -> DXGI_SAMPLE_DESC {
    DXGI_SAMPLE_DESC {
        Count: sample.count,
        Quality: sample.quality,
    }
}

fn sample_from_native(sample: DXGI_SAMPLE_DESC) -> SampleDesc {
    SampleDesc {
        count: sample.Count,
        quality: sample.Quality,
    }
}

pub(crate) fn adapter_from_native(desc: &DXGI_ADAPTER_DESC) -> AdapterDescriptor {
    AdapterDescriptor {
        description: wide_to_string(&desc.Description),
        vendor_id: desc.VendorId,
        device_id: desc.DeviceId,
        sub_sys_id: desc.SubSysId,
        revision: desc.Revision,
        dedicated_video_memory: desc.DedicatedVideoMemory as u64,
        dedicated_system_memory: desc.DedicatedSystemMemory as u64,
        shared_system_memory: desc.SharedSystemMemory as u64,
        luid: luid_from_native(desc.AdapterLuid),
    }
}

pub(crate) fn output_from_native(desc: &DXGI_OUTPUT_DESC) -> OutputDescriptor {
    OutputDescriptor {
        device_name: wide_to_string(&desc.DeviceName),
        attached_to_desktop: desc.AttachedToDesktop.as_bool(),
        rotation: rotation_from_native(desc.Rotation),
        desktop_coordinates: rect_from_native(&desc.DesktopCoordinates),
    }
}

pub(crate) fn swap_chain_to_native(config: &SwapChainConfig, window: HWND) -> DXGI_SWAP_CHAIN_DESC {
    DXGI_SWAP_CHAIN_DESC {
        BufferDesc: mode_to_native(&config.buffer_mode()),
        SampleDesc: sample_to_native(config.sample),
        BufferUsage: DXGI_USAGE(config.usage.bits()),
        BufferCount: config.buffer_count,
        OutputWindow: window,
        Windowed: config.windowed.into(),
        SwapEffect: swap_effect_to_native(config.swap_effect),
        Flags: config.flags.bits(),
    }
}

pub(crate) fn swap_chain_from_native(desc: &DXGI_SWAP_CHAIN_DESC) -> SwapChainDescription {
    let mode = mode_from_native(&desc.BufferDesc);
    SwapChainDescription {
        config: SwapChainConfig {
            buffer_count: desc.BufferCount,
            width: mode.width,
            height: mode.height,
            format: mode.format,
            refresh_rate: mode.refresh_rate,
            scaling: mode.scaling,
            scanline_order: mode.scanline_order,
            usage: Usage::from_bits_retain(desc.BufferUsage.0),
            sample: sample_from_native(desc.SampleDesc),
            swap_effect: swap_effect_from_native(desc.SwapEffect),
            windowed: desc.Windowed.as_bool(),
            flags: SwapChainFlags::from_bits_retain(desc.Flags),
        },
        window: window_from_native(desc.OutputWindow),
    }
}

pub(crate) fn surface_from_native(desc: &DXGI_SURFACE_DESC) -> SurfaceDescription {
    SurfaceDescription {
        width: desc.Width,
        height: desc.Height,
        format: format_from_native(desc.Format),
        sample: sample_from_native(desc.SampleDesc),
    }
}

pub(crate) fn residency_from_native(residency: DXGI_RESIDENCY) -> ResidencyStatus {
    match residency {
        DXGI_RESIDENCY_RESIDENT_IN_SHARED_MEMORY => ResidencyStatus::ResidentInSharedMemory,
        DXGI_RESIDENCY_EVICTED_TO_DISK => ResidencyStatus::EvictedToDisk,
        _ => ResidencyStatus::FullyResident,
    }
}

pub(crate) fn statistics_from_native(stats: &DXGI_FRAME_STATISTICS) -> FrameStatistics {
    FrameStatistics {
        present_count: stats.PresentCount,
        present_refresh_count: stats.PresentRefreshCount,
        sync_refresh_count: stats.SyncRefreshCount,
        sync_qpc_time: stats.SyncQPCTime,
        sync_gpu_time: stats.SyncGPUTime,
    }
}

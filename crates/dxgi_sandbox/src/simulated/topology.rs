use crate::model::AdapterDescriptor;
use crate::model::DisplayMode;
use crate::model::DriverVersion;
use crate::model::Format;
use crate::model::Luid;
use crate::model::MonitorInfo;
use crate::model::OutputDescriptor;
use crate::model::Rational;
use crate::model::Rect;
use crate::model::Rotation;
use crate::model::Scaling;
use crate::model::ScanlineOrder;

const STANDARD_RESOLUTIONS: [(u32, u32); 8] = [
    (640, 480),
    (800, 600),
    (1024, 768),
    (1280, 720),
    (1280, 1024),
    (1600, 900),
    (1920, 1080),
    (2560, 1440),
];

const STANDARD_REFRESH_RATES: [Rational; 2] = [Rational::new(60000, 1001), Rational::new(60, 1)];

/// Height of the simulated task bar carved out of the primary work area.
const TASK_BAR_HEIGHT: i32 = 40;

/// A monitor attached to a simulated adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputSpec {
    pub device_name: String,
    pub attached_to_desktop: bool,
    pub rotation: Rotation,
    pub desktop_coordinates: Rect,
    pub is_primary: bool,
    /// Every supported mode, all formats, in the order they are reported.
    pub modes: Vec<DisplayMode>,
}

impl OutputSpec {
    /// A desktop monitor whose native resolution is the size of `desktop`.
    pub fn monitor(device_name: impl Into<String>, desktop: Rect, is_primary: bool) -> Self {
        let native = (desktop.width() as u32, desktop.height() as u32);
        Self {
            device_name: device_name.into(),
            attached_to_desktop: true,
            rotation: Rotation::Identity,
            desktop_coordinates: desktop,
            is_primary,
            modes: standard_modes(native, &[Format::R8G8B8A8_UNORM, Format::B8G8R8A8_UNORM]),
        }
    }

    pub fn descriptor(&self) -> OutputDescriptor {
        OutputDescriptor {
            device_name: self.device_name.clone(),
            attached_to_desktop: self.attached_to_desktop,
            rotation: self.rotation,
            desktop_coordinates: self.desktop_coordinates,
        }
    }

    pub fn monitor_info(&self) -> MonitorInfo {
        let mut work_area = self.desktop_coordinates;
        if self.is_primary {
            work_area.bottom -= TASK_BAR_HEIGHT;
        }
        MonitorInfo {
            device: self.device_name.clone(),
            monitor: self.desktop_coordinates,
            work_area,
            is_primary: self.is_primary,
        }
    }
}

/// Modes for every standard resolution up to `native`, ordered by format,
/// size, refresh rate and then scaling with `Unspecified` first.
pub fn standard_modes(native: (u32, u32), formats: &[Format]) -> Vec<DisplayMode> {
    let mut modes = Vec::new();
    for &format in formats {
        let mut resolutions: Vec<(u32, u32)> = STANDARD_RESOLUTIONS
            .iter()
            .copied()
            .filter(|&(width, height)| width <= native.0 && height <= native.1)
            .collect();
        if !resolutions.contains(&native) {
            resolutions.push(native);
        }
        resolutions.sort_unstable();

        for (width, height) in resolutions {
            let scalings: &[Scaling] = if (width, height) == native {
                &[Scaling::Unspecified]
            } else {
                &[Scaling::Unspecified, Scaling::Centered, Scaling::Stretched]
            };
            for refresh_rate in STANDARD_REFRESH_RATES {
                for &scaling in scalings {
                    modes.push(DisplayMode {
                        width,
                        height,
                        refresh_rate,
                        format,
                        scaling,
                        scanline_order: ScanlineOrder::Progressive,
                    });
                }
            }
        }
    }
    modes
}

/// A simulated graphics adapter and the monitors wired to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterSpec {
    pub description: String,
    pub vendor_id: u32,
    pub device_id: u32,
    pub sub_sys_id: u32,
    pub revision: u32,
    pub dedicated_video_memory: u64,
    pub dedicated_system_memory: u64,
    pub shared_system_memory: u64,
    /// Left at the default, a unique value is assigned when the adapter is installed.
    pub luid: Luid,
    pub software: bool,
    pub driver_version: DriverVersion,
    pub outputs: Vec<OutputSpec>,
}

impl AdapterSpec {
    pub fn hardware(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            vendor_id: 0x1002,
            device_id: 0x73BF,
            sub_sys_id: 0x0E3A_1002,
            revision: 0xC1,
            dedicated_video_memory: 8 << 30,
            dedicated_system_memory: 0,
            shared_system_memory: 16 << 30,
            luid: Luid::default(),
            software: false,
            driver_version: DriverVersion::from_parts(31, 0, 21912, 14),
            outputs: Vec::new(),
        }
    }

    /// The software rasterizer every system exposes.
    pub fn basic_render_driver() -> Self {
        Self {
            description: "Microsoft Basic Render Driver".into(),
            vendor_id: 0x1414,
            device_id: 0x008C,
            sub_sys_id: 0,
            revision: 0,
            dedicated_video_memory: 0,
            dedicated_system_memory: 0,
            shared_system_memory: 16 << 30,
            luid: Luid::default(),
            software: true,
            driver_version: DriverVersion::from_parts(10, 0, 22621, 1),
            outputs: Vec::new(),
        }
    }

    pub fn with_output(mut self, output: OutputSpec) -> Self {
        self.outputs.push(output);
        self
    }

    pub fn descriptor(&self) -> AdapterDescriptor {
        AdapterDescriptor {
            description: self.description.clone(),
            vendor_id: self.vendor_id,
            device_id: self.device_id,
            sub_sys_id: self.sub_sys_id,
            revision: self.revision,
            dedicated_video_memory: self.dedicated_video_memory,
            dedicated_system_memory: self.dedicated_system_memory,
            shared_system_memory: self.shared_system_memory,
            luid: self.luid,
        }
    }
}

/// One hardware adapter driving two monitors side by side, plus the
/// software adapter.
pub fn default_topology() -> Vec<AdapterSpec> {
    let primary = OutputSpec::monitor(
        r"\\.\DISPLAY1",
        Rect {
            left: 0,
            top: 0,
            right: 1920,
            bottom: 1080,
        },
        true,
    );
    let secondary = OutputSpec::monitor(
        r"\\.\DISPLAY2",
        Rect {
            left: 1920,
            top: 0,
            right: 3200,
            bottom: 1024,
        },
        false,
    );
    vec![
        AdapterSpec::hardware("Sandbox Hardware Adapter")
            .with_output(primary)
            .with_output(secondary),
        AdapterSpec::basic_render_driver(),
    ]
}

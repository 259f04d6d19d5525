use std::fmt;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use dxgi_sandbox::model::DeviceOptions;
use dxgi_sandbox::model::DriverType;
use dxgi_sandbox::model::Format;
use dxgi_sandbox::tour::TourOptions;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// The DXGI runtime of this machine (Windows only).
    Native,
    /// An in-process model of DXGI with two monitors and a software adapter.
    Simulated,
}

impl Default for Backend {
    fn default() -> Self {
        if cfg!(windows) {
            Self::Native
        } else {
            Self::Simulated
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Native => "native",
            Self::Simulated => "simulated",
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List adapters and their outputs.
    Adapters,
    /// List the display modes of every output and the closest match.
    Modes,
    /// Create a device and a staging texture and inspect them.
    Device,
    /// Create a swap chain and toggle fullscreen.
    SwapChain,
    /// All of the above, then present until the window closes.
    #[default]
    Tour,
}

#[derive(Debug, Parser)]
#[command(name = "dxgi_sandbox", version)]
#[command(about = "Walks the DXGI object graph and prints what it finds")]
pub struct SampleCommandLine {
    #[arg(long, value_enum, env = "DXGI_SANDBOX_BACKEND", default_value_t = Backend::default())]
    pub backend: Backend,

    /// Use the WARP software rasterizer instead of a hardware adapter.
    #[arg(long, env = "DXGI_SANDBOX_WARP")]
    pub warp: bool,

    #[arg(long, env = "DXGI_SANDBOX_WIDTH", default_value_t = 800)]
    pub width: u32,

    #[arg(long, env = "DXGI_SANDBOX_HEIGHT", default_value_t = 600)]
    pub height: u32,

    /// Pixel format, by name (`r8g8b8a8-unorm`) or number.
    #[arg(long, env = "DXGI_SANDBOX_FORMAT", default_value = "r8g8b8a8-unorm")]
    pub format: Format,

    /// Paint events the simulated window delivers before it closes.
    #[arg(long, env = "DXGI_SANDBOX_FRAMES", default_value_t = 60)]
    pub frames: usize,

    #[arg(long, env = "DXGI_SANDBOX_FULLSCREEN_ATTEMPTS", default_value_t = 3)]
    pub fullscreen_attempts: u32,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl SampleCommandLine {
    pub fn command(&self) -> Command {
        self.command.unwrap_or_default()
    }

    pub fn window_title(&self) -> &'static str {
        if self.warp {
            "DXGI Sandbox (WARP)"
        } else {
            "DXGI Sandbox"
        }
    }

    pub fn tour_options(&self) -> TourOptions {
        TourOptions {
            width: self.width,
            height: self.height,
            format: self.format,
            device: DeviceOptions {
                driver: if self.warp {
                    DriverType::Warp
                } else {
                    DriverType::Hardware
                },
                debug: cfg!(debug_assertions),
            },
            fullscreen_attempts: self.fullscreen_attempts,
            ..TourOptions::default()
        }
    }
}

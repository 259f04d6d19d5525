use std::ops::Deref;
use std::ops::RangeInclusive;

use tracing::info;
use tracing::warn;

use crate::adapter_enumerator::Output;
use crate::error::DxgiError;
use crate::error::DxgiResult;
use crate::error::StatusContext;
use crate::model::DisplayMode;
use crate::model::DisplayState;
use crate::model::FrameStatistics;
use crate::model::PresentFlags;
use crate::model::ResizeBuffers;
use crate::model::SwapChainConfig;
use crate::model::SwapChainDescription;
use crate::platform::RawSwapChain;
use crate::platform::Subsystem;
use crate::resource_inspector::Resource;
use crate::status::Status;
use crate::status::StatusClass;

/// Vertical blanks `Present` may wait for; zero presents immediately.
pub const SYNC_INTERVAL_RANGE: RangeInclusive<u32> = 0..=4;

/// Result of a fullscreen toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Completed,
    /// The platform postponed the change; try again later.
    Deferred(Status),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresentOutcome {
    Presented,
    /// Nothing is visible; keep going and present again next frame.
    Occluded,
}

/// A presentation surface bound to one device and one window.
///
/// Tracks the windowed/fullscreen state. Only `enter_fullscreen` and
/// `exit_fullscreen` move between the two, and only when the platform
/// completes the change.
pub struct SwapChain<S: Subsystem> {
    raw: S::SwapChain,
    config: SwapChainConfig,
    state: DisplayState,
}

impl<S: Subsystem> SwapChain<S> {
    /// Starts from what the platform reports, which differs from
    /// `config.windowed` when a fullscreen start was deferred.
    pub fn from_raw(raw: S::SwapChain, config: &SwapChainConfig) -> DxgiResult<Self> {
        let (fullscreen, _) = raw.fullscreen_state().call("GetFullscreenState")?;
        if fullscreen == config.windowed {
            warn!(
                requested_windowed = config.windowed,
                "swap chain started in a different display state than requested"
            );
        }
        Ok(Self {
            raw,
            config: *config,
            state: DisplayState::from_windowed(!fullscreen),
        })
    }

    pub fn raw(&self) -> &S::SwapChain {
        &self.raw
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// The configuration as last requested through this handle.
    pub fn config(&self) -> &SwapChainConfig {
        &self.config
    }

    /// What the platform currently reports for this swap chain.
    pub fn describe(&self) -> DxgiResult<SwapChainDescription> {
        self.raw.desc().call("IDXGISwapChain::GetDesc")
    }

    /// Re-reads the fullscreen state, which the platform may have changed on
    /// its own (for example when the window lost focus).
    pub fn refresh_state(&mut self) -> DxgiResult<DisplayState> {
        let (fullscreen, _) = self
            .raw
            .fullscreen_state()
            .call("GetFullscreenState")?;
        self.state = DisplayState::from_windowed(!fullscreen);
        Ok(self.state)
    }

    /// The output fullscreen is (or would be) shown on, if any.
    pub fn fullscreen_output(&self) -> DxgiResult<Option<Output<S>>> {
        let (_, output) = self
            .raw
            .fullscreen_state()
            .call("GetFullscreenState")?;
        Ok(output.map(|raw| Output::from_raw(raw, None)))
    }

    /// `None` lets the platform pick the output containing most of the window.
    pub fn enter_fullscreen(&mut self, output: Option<&Output<S>>) -> DxgiResult<Transition> {
        self.transition(true, output)
    }

    pub fn exit_fullscreen(&mut self) -> DxgiResult<Transition> {
        self.transition(false, None)
    }

    fn transition(&mut self, fullscreen: bool, output: Option<&Output<S>>) -> DxgiResult<Transition> {
        let status = self
            .raw
            .set_fullscreen_state(fullscreen, output.map(Output::raw));
        let target = DisplayState::from_windowed(!fullscreen);
        match status.class() {
            StatusClass::Success => {
                self.state = target;
                info!(state = ?target, "fullscreen transition completed");
                Ok(Transition::Completed)
            }
            StatusClass::Transient => {
                info!(state = ?target, %status, "fullscreen transition deferred");
                Ok(Transition::Deferred(status))
            }
            _ => Err(DxgiError::from_status("SetFullscreenState", status)),
        }
    }

    /// Issues one present. Occlusion is reported, not raised; device loss is
    /// raised as [`DxgiError::DeviceLost`].
    pub fn present(&mut self, sync_interval: u32, flags: PresentFlags) -> DxgiResult<PresentOutcome> {
        if !SYNC_INTERVAL_RANGE.contains(&sync_interval) {
            return Err(DxgiError::range(
                "sync interval",
                sync_interval.into(),
                (*SYNC_INTERVAL_RANGE.start()).into(),
                (*SYNC_INTERVAL_RANGE.end()).into(),
            ));
        }
        let status = self.raw.present(sync_interval, flags);
        match status {
            Status::DXGI_STATUS_OCCLUDED => Ok(PresentOutcome::Occluded),
            status if status.is_success() => Ok(PresentOutcome::Presented),
            status => {
                let error = DxgiError::from_status("Present", status);
                if error.is_device_lost() {
                    warn!(%status, "device lost while presenting");
                }
                Err(error)
            }
        }
    }

    /// Borrows back buffer `index`. While any `BackBuffer` is alive the swap
    /// chain cannot be resized.
    pub fn buffer(&self, index: u32) -> DxgiResult<BackBuffer<'_, S>> {
        let raw = self.raw.buffer(index).call("IDXGISwapChain::GetBuffer")?;
        Ok(BackBuffer {
            resource: Resource::from_raw(raw),
            index,
            _swap_chain: self,
        })
    }

    /// Recreates the buffers. Taking `&mut self` means no [`BackBuffer`]
    /// borrowed from this swap chain can still exist.
    pub fn resize_buffers(&mut self, resize: ResizeBuffers) -> DxgiResult<()> {
        self.raw
            .resize_buffers(&resize)
            .call("ResizeBuffers")?;
        let description = self.describe()?;
        self.config = description.config;
        info!(
            width = self.config.width,
            height = self.config.height,
            buffers = self.config.buffer_count,
            "swap chain buffers resized"
        );
        Ok(())
    }

    /// Resizes the window, or changes the display mode while fullscreen.
    pub fn resize_target(&mut self, mode: &DisplayMode) -> DxgiResult<()> {
        self.raw.resize_target(mode).call("ResizeTarget")
    }

    pub fn containing_output(&self) -> DxgiResult<Output<S>> {
        let raw = self
            .raw
            .containing_output()
            .call("GetContainingOutput")?;
        Ok(Output::from_raw(raw, None))
    }

    /// How many times `Present` has been called on this swap chain.
    pub fn last_present_count(&self) -> DxgiResult<u32> {
        self.raw
            .last_present_count()
            .call("GetLastPresentCount")
    }

    /// Only meaningful for flip-model or fullscreen swap chains, and even then
    /// some platforms answer `DXGI_ERROR_FRAME_STATISTICS_DISJOINT`.
    pub fn frame_statistics(&self) -> DxgiResult<FrameStatistics> {
        self.raw
            .frame_statistics()
            .call("GetFrameStatistics")
    }
}

/// A back buffer borrowed from a [`SwapChain`].
pub struct BackBuffer<'s, S: Subsystem> {
    resource: Resource<S>,
    index: u32,
    _swap_chain: &'s SwapChain<S>,
}

impl<S: Subsystem> BackBuffer<'_, S> {
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl<S: Subsystem> Deref for BackBuffer<'_, S> {
    type Target = Resource<S>;

    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}

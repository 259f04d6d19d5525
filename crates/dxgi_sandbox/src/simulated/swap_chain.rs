use std::cell::Cell;
use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use super::SimCall;
use super::SimDevice;
use super::SimOutput;
use super::SimResource;
use super::SimWindow;
use super::Simulated;
use super::WindowState;
use super::World;
use super::device::DeviceState;
use crate::model::DisplayMode;
use crate::model::Format;
use crate::model::FrameStatistics;
use crate::model::PresentFlags;
use crate::model::ResidencyStatus;
use crate::model::ResizeBuffers;
use crate::model::SurfaceDescription;
use crate::model::SwapChainConfig;
use crate::model::SwapChainDescription;
use crate::model::SwapEffect;
use crate::model::Usage;
use crate::platform::RawSwapChain;
use crate::status::RawResult;
use crate::status::Status;
use crate::status::StatusClass;

const MAX_BUFFER_COUNT: u32 = 16;

/// Simulated ticks between vertical blanks, as a 60 Hz monitor on a 1 MHz counter.
const TICKS_PER_REFRESH: i64 = 16_667;

pub struct SimSwapChain {
    world: Rc<World>,
    id: u64,
    device: Rc<DeviceState>,
    window: Rc<WindowState>,
    config: Cell<SwapChainConfig>,
    fullscreen: Cell<bool>,
    target: RefCell<Option<SimOutput>>,
    present_count: Cell<u32>,
    buffers: RefCell<Vec<SimResource>>,
}

impl SimSwapChain {
    pub(crate) fn create(
        world: Rc<World>,
        device: &SimDevice,
        config: &SwapChainConfig,
        window: &SimWindow,
    ) -> RawResult<Self> {
        world.check(SimCall::CreateSwapChain)?;
        if let Some(status) = device.state.lost() {
            return Err(status);
        }
        let mut config = *config;
        let (window_width, window_height) = window.state.size.get();
        if config.width == 0 {
            config.width = window_width;
        }
        if config.height == 0 {
            config.height = window_height;
        }
        validate(&config)?;

        let swap_chain = Self {
            id: world.next_id(),
            world,
            device: Rc::clone(&device.state),
            window: Rc::clone(&window.state),
            config: Cell::new(config),
            fullscreen: Cell::new(false),
            target: RefCell::default(),
            present_count: Cell::new(0),
            buffers: RefCell::new(make_buffers(&config)),
        };
        if !config.windowed {
            let status = swap_chain.set_fullscreen_state(true, None);
            if status.is_failure() {
                return Err(status);
            }
        }
        debug!(
            id = swap_chain.id,
            window = %swap_chain.window.id,
            width = config.width,
            height = config.height,
            "simulated swap chain created"
        );
        Ok(swap_chain)
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.get()
    }

    fn buffers_outstanding(&self) -> bool {
        self.buffers
            .borrow()
            .iter()
            .any(|buffer| Rc::strong_count(&buffer.state) > 1)
    }

    fn accessible_buffers(&self) -> u32 {
        let config = self.config.get();
        if config.swap_effect.is_flip_model() {
            config.buffer_count
        } else {
            1
        }
    }

    fn default_output(&self) -> RawResult<SimOutput> {
        SimOutput::new(&self.world, &self.device.adapter, 0).ok_or(Status::DXGI_ERROR_UNSUPPORTED)
    }
}

fn validate(config: &SwapChainConfig) -> RawResult<()> {
    let minimum_buffers = if config.swap_effect.is_flip_model() { 2 } else { 1 };
    if !(minimum_buffers..=MAX_BUFFER_COUNT).contains(&config.buffer_count) {
        return Err(Status::DXGI_ERROR_INVALID_CALL);
    }
    if config.swap_effect.is_flip_model() && config.sample.count != 1 {
        return Err(Status::DXGI_ERROR_INVALID_CALL);
    }
    if config.format.bytes_per_pixel().is_none() || config.width == 0 || config.height == 0 {
        return Err(Status::DXGI_ERROR_INVALID_CALL);
    }
    Ok(())
}

fn make_buffers(config: &SwapChainConfig) -> Vec<SimResource> {
    let mut usage = config.usage | Usage::BACK_BUFFER;
    if config.swap_effect == SwapEffect::Discard {
        usage |= Usage::DISCARD_ON_PRESENT;
    }
    let desc = SurfaceDescription {
        width: config.width,
        height: config.height,
        format: config.format,
        sample: config.sample,
    };
    (0..config.buffer_count)
        .map(|_| SimResource::new(desc, usage, None, ResidencyStatus::FullyResident))
        .collect()
}

impl RawSwapChain<Simulated> for SimSwapChain {
    fn desc(&self) -> RawResult<SwapChainDescription> {
        let mut config = self.config.get();
        config.windowed = !self.fullscreen.get();
        Ok(SwapChainDescription {
            config,
            window: self.window.id,
        })
    }

    fn buffer(&self, index: u32) -> RawResult<SimResource> {
        if index >= self.accessible_buffers() {
            return Err(Status::DXGI_ERROR_INVALID_CALL);
        }
        self.buffers
            .borrow()
            .get(index as usize)
            .cloned()
            .ok_or(Status::DXGI_ERROR_INVALID_CALL)
    }

    fn containing_output(&self) -> RawResult<SimOutput> {
        match self.target.borrow().as_ref() {
            Some(target) => Ok(target.clone()),
            None => self.default_output(),
        }
    }

    fn set_fullscreen_state(&self, fullscreen: bool, target: Option<&SimOutput>) -> Status {
        if let Some(status) = self.world.take_fault(SimCall::SetFullscreenState) {
            if status != Status::OK {
                return status;
            }
        }
        if let Some(status) = self.device.lost() {
            return status;
        }

        if !fullscreen {
            self.world.release_fullscreen(self.id);
            self.fullscreen.set(false);
            *self.target.borrow_mut() = None;
            return Status::OK;
        }

        let output = match target {
            Some(output) => output.clone(),
            None => match self.default_output() {
                Ok(output) => output,
                Err(status) => return status,
            },
        };
        if output.adapter.spec.luid != self.device.adapter.spec.luid {
            return Status::DXGI_ERROR_INVALID_CALL;
        }
        if !self.world.claim_fullscreen(self.id) {
            return Status::DXGI_ERROR_NOT_CURRENTLY_AVAILABLE;
        }
        self.fullscreen.set(true);
        *self.target.borrow_mut() = Some(output);
        Status::OK
    }

    fn fullscreen_state(&self) -> RawResult<(bool, Option<SimOutput>)> {
        Ok((self.fullscreen.get(), self.target.borrow().clone()))
    }

    fn present(&self, sync_interval: u32, flags: PresentFlags) -> Status {
        if sync_interval > 4 {
            return Status::DXGI_ERROR_INVALID_CALL;
        }
        if let Some(status) = self.device.lost() {
            return status;
        }
        if let Some(status) = self.world.take_fault(SimCall::Present) {
            if status.class() == StatusClass::DeviceLost {
                self.device.mark_lost(status);
            }
            if status != Status::OK {
                return status;
            }
        }
        if flags.contains(PresentFlags::TEST) {
            return Status::OK;
        }
        self.present_count.set(self.present_count.get() + 1);
        Status::OK
    }

    fn resize_buffers(&self, resize: &ResizeBuffers) -> RawResult<()> {
        self.world.check(SimCall::ResizeBuffers)?;
        if self.buffers_outstanding() {
            return Err(Status::DXGI_ERROR_INVALID_CALL);
        }
        let (window_width, window_height) = self.window.size.get();
        let mut config = self.config.get();
        if resize.buffer_count != 0 {
            config.buffer_count = resize.buffer_count;
        }
        config.width = if resize.width == 0 { window_width } else { resize.width };
        config.height = if resize.height == 0 { window_height } else { resize.height };
        if resize.format != Format::UNKNOWN {
            config.format = resize.format;
        }
        config.flags = resize.flags;
        validate(&config)?;

        self.config.set(config);
        *self.buffers.borrow_mut() = make_buffers(&config);
        Ok(())
    }

    fn resize_target(&self, mode: &DisplayMode) -> RawResult<()> {
        let (width, height) = self.window.size.get();
        let width = if mode.width == 0 { width } else { mode.width };
        let height = if mode.height == 0 { height } else { mode.height };
        self.window.size.set((width, height));
        debug!(window = %self.window.id, width, height, "target resized");
        Ok(())
    }

    fn last_present_count(&self) -> RawResult<u32> {
        Ok(self.present_count.get())
    }

    fn frame_statistics(&self) -> RawResult<FrameStatistics> {
        let config = self.config.get();
        if !config.swap_effect.is_flip_model() && !self.fullscreen.get() {
            return Err(Status::DXGI_ERROR_INVALID_CALL);
        }
        let presents = self.present_count.get();
        if presents == 0 {
            return Err(Status::DXGI_ERROR_FRAME_STATISTICS_DISJOINT);
        }
        Ok(FrameStatistics {
            present_count: presents,
            present_refresh_count: presents,
            sync_refresh_count: presents,
            sync_qpc_time: i64::from(presents) * TICKS_PER_REFRESH,
            sync_gpu_time: 0,
        })
    }
}

impl Drop for SimSwapChain {
    fn drop(&mut self) {
        self.world.release_fullscreen(self.id);
    }
}

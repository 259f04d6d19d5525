use windows::Win32::Graphics::Dxgi::*;
use windows::core::BOOL;

use super::Native;
use super::NativeOutput;
use super::NativeResource;
use super::convert::format_to_native;
use super::convert::mode_to_native;
use super::convert::statistics_from_native;
use super::convert::swap_chain_from_native;
use crate::model::DisplayMode;
use crate::model::FrameStatistics;
use crate::model::PresentFlags;
use crate::model::ResizeBuffers;
use crate::model::SwapChainDescription;
use crate::platform::RawSwapChain;
use crate::status::RawResult;
use crate::status::Status;

pub struct NativeSwapChain {
    swap_chain: IDXGISwapChain,
}

impl NativeSwapChain {
    pub(crate) fn new(swap_chain: IDXGISwapChain) -> Self {
        Self { swap_chain }
    }

    pub fn interface(&self) -> &IDXGISwapChain {
        &self.swap_chain
    }
}

impl RawSwapChain<Native> for NativeSwapChain {
    fn desc(&self) -> RawResult<SwapChainDescription> {
        let desc = unsafe { self.swap_chain.GetDesc() }?;
        Ok(swap_chain_from_native(&desc))
    }

    fn buffer(&self, index: u32) -> RawResult<NativeResource> {
        let buffer: IDXGISurface = unsafe { self.swap_chain.GetBuffer(index) }?;
        NativeResource::new(&buffer)
    }

    fn containing_output(&self) -> RawResult<NativeOutput> {
        let output = unsafe { self.swap_chain.GetContainingOutput() }?;
        Ok(NativeOutput::new(output))
    }

    fn set_fullscreen_state(&self, fullscreen: bool, target: Option<&NativeOutput>) -> Status {
        let target = target.map(NativeOutput::interface);
        if let Err(error) = unsafe { self.swap_chain.SetFullscreenState(fullscreen, target) } {
            return error.into();
        }
        // The success code is swallowed by the binding, so a postponed change
        // only shows up as a state that did not move.
        match self.fullscreen_state() {
            Ok((now, _)) if now != fullscreen => Status::DXGI_STATUS_MODE_CHANGE_IN_PROGRESS,
            Ok(_) => Status::OK,
            Err(status) => status,
        }
    }

    fn fullscreen_state(&self) -> RawResult<(bool, Option<NativeOutput>)> {
        let mut fullscreen = BOOL::default();
        let mut target: Option<IDXGIOutput> = None;
        unsafe {
            self.swap_chain
                .GetFullscreenState(Some(&mut fullscreen), Some(&mut target))
        }?;
        Ok((fullscreen.as_bool(), target.map(NativeOutput::new)))
    }

    fn present(&self, sync_interval: u32, flags: PresentFlags) -> Status {
        unsafe { self.swap_chain.Present(sync_interval, DXGI_PRESENT(flags.bits())) }.into()
    }

    fn resize_buffers(&self, resize: &ResizeBuffers) -> RawResult<()> {
        unsafe {
            self.swap_chain.ResizeBuffers(
                resize.buffer_count,
                resize.width,
                resize.height,
                format_to_native(resize.format),
                DXGI_SWAP_CHAIN_FLAG(resize.flags.bits() as i32),
            )
        }?;
        Ok(())
    }

    fn resize_target(&self, mode: &DisplayMode) -> RawResult<()> {
        unsafe { self.swap_chain.ResizeTarget(&mode_to_native(mode)) }?;
        Ok(())
    }

    fn last_present_count(&self) -> RawResult<u32> {
        Ok(unsafe { self.swap_chain.GetLastPresentCount() }?)
    }

    fn frame_statistics(&self) -> RawResult<FrameStatistics> {
        let mut stats = DXGI_FRAME_STATISTICS::default();
        unsafe { self.swap_chain.GetFrameStatistics(&mut stats) }?;
        Ok(statistics_from_native(&stats))
    }
}

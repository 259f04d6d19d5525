//! The seam between this crate and a graphics subsystem.
//!
//! Each `Raw*` method stands for exactly one platform call and reports the
//! platform's own result code on failure. Handles release themselves when
//! dropped, so ownership of a handle is ownership of one platform reference.

use std::ops::DerefMut;

use crate::model::AdapterDescriptor;
use crate::model::DeviceInterface;
use crate::model::DeviceOptions;
use crate::model::DisplayMode;
use crate::model::DriverVersion;
use crate::model::EvictionPriority;
use crate::model::Format;
use crate::model::FrameStatistics;
use crate::model::MapFlags;
use crate::model::MonitorInfo;
use crate::model::OutputDescriptor;
use crate::model::PresentFlags;
use crate::model::PrivateDataKey;
use crate::model::ResidencyStatus;
use crate::model::ResizeBuffers;
use crate::model::SurfaceDescription;
use crate::model::SwapChainConfig;
use crate::model::SwapChainDescription;
use crate::model::TextureDesc;
use crate::model::Usage;
use crate::model::WindowAssociation;
use crate::model::WindowId;
use crate::status::RawResult;
use crate::status::Status;

/// A family of handle types that belong to one graphics subsystem.
pub trait Subsystem: Sized + 'static {
    type Factory: RawFactory<Self>;
    type Adapter: RawAdapter<Self>;
    type Output: RawOutput<Self>;
    type Device: RawDevice<Self>;
    type Resource: RawResource;
    type SwapChain: RawSwapChain<Self>;
    type Window: RawWindow;
}

/// Obtains the root enumeration object.
pub trait FactoryLocator {
    type Subsystem: Subsystem;

    fn locate(&self) -> RawResult<<Self::Subsystem as Subsystem>::Factory>;
}

pub trait RawWindow {
    fn id(&self) -> WindowId;
}

pub trait RawFactory<S: Subsystem> {
    /// `DXGI_ERROR_NOT_FOUND` once `index` is past the last adapter.
    fn enum_adapter(&self, index: u32) -> RawResult<S::Adapter>;

    /// `None` picks the default adapter for the driver type.
    fn create_device(
        &self,
        adapter: Option<&S::Adapter>,
        options: DeviceOptions,
    ) -> RawResult<S::Device>;

    fn create_swap_chain(
        &self,
        device: &S::Device,
        config: &SwapChainConfig,
        window: &S::Window,
    ) -> RawResult<S::SwapChain>;

    fn make_window_association(
        &self,
        window: &S::Window,
        flags: WindowAssociation,
    ) -> RawResult<()>;

    fn window_association(&self) -> RawResult<Option<WindowId>>;

    /// Whether both handles reference the same factory object.
    fn is_same(&self, other: &Self) -> bool;
}

pub trait RawAdapter<S: Subsystem> {
    fn desc(&self) -> RawResult<AdapterDescriptor>;

    /// `DXGI_ERROR_NOT_FOUND` once `index` is past the last output.
    fn enum_output(&self, index: u32) -> RawResult<S::Output>;

    fn check_interface_support(&self, interface: DeviceInterface) -> RawResult<DriverVersion>;

    fn set_private_data(&self, key: PrivateDataKey, data: &[u8]) -> RawResult<()>;

    /// `DXGI_ERROR_NOT_FOUND` when nothing is stored under `key`.
    fn private_data(&self, key: PrivateDataKey) -> RawResult<Vec<u8>>;

    /// `SetPrivateDataInterface`: the adapter keeps a reference to `factory`
    /// until the key is overwritten or cleared with `None`. Keys must not be
    /// shared with byte data.
    fn set_private_factory(&self, key: PrivateDataKey, factory: Option<&S::Factory>) -> RawResult<()>;

    /// A new reference to the factory stored under `key`.
    fn private_factory(&self, key: PrivateDataKey) -> RawResult<S::Factory>;

    /// `GetParent`: the factory that enumerated this adapter.
    fn parent(&self) -> RawResult<S::Factory>;
}

pub trait RawOutput<S: Subsystem> {
    fn desc(&self) -> RawResult<OutputDescriptor>;

    fn monitor_info(&self) -> RawResult<Option<MonitorInfo>>;

    fn display_modes(&self, format: Format) -> RawResult<Vec<DisplayMode>>;

    fn find_closest_matching_mode(
        &self,
        desired: &DisplayMode,
        concerned_device: Option<&S::Device>,
    ) -> RawResult<DisplayMode>;

    fn wait_for_vblank(&self) -> RawResult<()>;
}

pub trait RawDevice<S: Subsystem> {
    fn adapter(&self) -> RawResult<S::Adapter>;

    fn gpu_thread_priority(&self) -> RawResult<i32>;

    fn set_gpu_thread_priority(&self, priority: i32) -> RawResult<()>;

    /// One status per resource, in the same order.
    fn query_resource_residency(
        &self,
        resources: &[&S::Resource],
    ) -> RawResult<Vec<ResidencyStatus>>;

    fn create_texture(&self, desc: &TextureDesc) -> RawResult<S::Resource>;
}

/// CPU view of a mapped surface. `bits` spans `pitch` times the surface height.
#[derive(Debug)]
pub struct MappedRect<B> {
    pub pitch: u32,
    pub bits: B,
}

pub trait RawResource {
    /// Mapped bytes. The view keeps the resource borrowed and must be
    /// dropped before a fresh map can succeed.
    type Bytes<'a>: DerefMut<Target = [u8]>
    where
        Self: 'a;

    fn usage(&self) -> RawResult<Usage>;

    fn eviction_priority(&self) -> RawResult<EvictionPriority>;

    fn set_eviction_priority(&self, priority: EvictionPriority) -> RawResult<()>;

    fn has_shared_handle(&self) -> RawResult<bool>;

    fn surface_desc(&self) -> RawResult<SurfaceDescription>;

    fn map(&self, flags: MapFlags) -> RawResult<MappedRect<Self::Bytes<'_>>>;

    fn unmap(&self) -> RawResult<()>;
}

pub trait RawSwapChain<S: Subsystem> {
    fn desc(&self) -> RawResult<SwapChainDescription>;

    fn buffer(&self, index: u32) -> RawResult<S::Resource>;

    fn containing_output(&self) -> RawResult<S::Output>;

    /// May answer with `DXGI_STATUS_MODE_CHANGE_IN_PROGRESS`, which is not a failure.
    fn set_fullscreen_state(&self, fullscreen: bool, target: Option<&S::Output>) -> Status;

    fn fullscreen_state(&self) -> RawResult<(bool, Option<S::Output>)>;

    /// May answer with `DXGI_STATUS_OCCLUDED`, which is not a failure.
    fn present(&self, sync_interval: u32, flags: PresentFlags) -> Status;

    /// Fails while any buffer obtained through [`RawSwapChain::buffer`] is alive.
    fn resize_buffers(&self, resize: &ResizeBuffers) -> RawResult<()>;

    fn resize_target(&self, mode: &DisplayMode) -> RawResult<()>;

    fn last_present_count(&self) -> RawResult<u32>;

    fn frame_statistics(&self) -> RawResult<FrameStatistics>;
}

use tracing::debug;
use tracing::info;

use crate::adapter_enumerator::Adapter;
use crate::adapter_enumerator::Adapters;
use crate::error::DxgiError;
use crate::error::DxgiResult;
use crate::error::StatusContext;
use crate::model::DeviceOptions;
use crate::model::SwapChainConfig;
use crate::model::WindowAssociation;
use crate::model::WindowId;
use crate::platform::FactoryLocator;
use crate::platform::RawFactory;
use crate::platform::RawWindow;
use crate::platform::Subsystem;
use crate::resource_inspector::Device;
use crate::status::Status;
use crate::swap_chain_manager::SwapChain;

/// Root of every query. What it enumerates is fixed when it is located;
/// locate a new factory to observe adapter changes.
pub struct Factory<S: Subsystem> {
    raw: S::Factory,
}

impl<S: Subsystem> Factory<S> {
    pub fn locate<L>(locator: &L) -> DxgiResult<Self>
    where
        L: FactoryLocator<Subsystem = S>,
    {
        let raw = locator.locate().call("CreateDXGIFactory")?;
        debug!("DXGI factory located");
        Ok(Self { raw })
    }

    pub fn from_raw(raw: S::Factory) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &S::Factory {
        &self.raw
    }

    /// Identity, not equality of contents: two factories located separately
    /// are different objects even when they list the same adapters.
    pub fn is_same_object(&self, other: &Factory<S>) -> bool {
        self.raw.is_same(&other.raw)
    }

    /// Walks the adapters in platform order.
    pub fn list_adapters(&self) -> Adapters<'_, S> {
        Adapters::new(&self.raw)
    }

    pub fn adapter(&self, index: u32) -> DxgiResult<Adapter<S>> {
        match self.raw.enum_adapter(index) {
            Ok(raw) => Ok(Adapter::from_raw(raw, Some(index))),
            Err(Status::DXGI_ERROR_NOT_FOUND) => Err(DxgiError::NotFound {
                what: "adapter",
                index,
            }),
            Err(status) => Err(DxgiError::from_status("EnumAdapters", status)),
        }
    }

    pub fn create_device(
        &self,
        adapter: Option<&Adapter<S>>,
        options: DeviceOptions,
    ) -> DxgiResult<Device<S>> {
        let raw = self
            .raw
            .create_device(adapter.map(Adapter::raw), options)
            .call("D3D10CreateDevice")?;
        info!(driver = ?options.driver, debug = options.debug, "Direct3D 10 device created");
        Ok(Device::from_raw(raw))
    }

    /// Binds a new swap chain to `device` and `window`.
    pub fn create_swap_chain(
        &self,
        config: &SwapChainConfig,
        device: &Device<S>,
        window: &S::Window,
    ) -> DxgiResult<SwapChain<S>> {
        let raw = self
            .raw
            .create_swap_chain(device.raw(), config, window)
            .call("CreateSwapChain")?;
        info!(
            width = config.width,
            height = config.height,
            buffers = config.buffer_count,
            effect = %config.swap_effect,
            windowed = config.windowed,
            window = %window.id(),
            "swap chain created"
        );
        SwapChain::from_raw(raw, config)
    }

    /// Replaces any previous association; only the last window is monitored.
    pub fn make_window_association(
        &self,
        window: &S::Window,
        flags: WindowAssociation,
    ) -> DxgiResult<()> {
        self.raw
            .make_window_association(window, flags)
            .call("MakeWindowAssociation")
    }

    /// Some platform versions report no window even after an association was made.
    pub fn window_association(&self) -> DxgiResult<Option<WindowId>> {
        self.raw.window_association().call("GetWindowAssociation")
    }
}

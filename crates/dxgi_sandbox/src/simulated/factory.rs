use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use super::AdapterState;
use super::PrivateData;
use super::OutputSpec;
use super::SimCall;
use super::SimDevice;
use super::SimSwapChain;
use super::SimWindow;
use super::Simulated;
use super::World;
use super::mode_matching::closest_mode;
use super::mode_matching::preferred_format;
use super::topology::AdapterSpec;
use crate::model::AdapterDescriptor;
use crate::model::DeviceInterface;
use crate::model::DeviceOptions;
use crate::model::DisplayMode;
use crate::model::DriverType;
use crate::model::DriverVersion;
use crate::model::Format;
use crate::model::MonitorInfo;
use crate::model::OutputDescriptor;
use crate::model::PrivateDataKey;
use crate::model::SwapChainConfig;
use crate::model::WindowAssociation;
use crate::model::WindowId;
use crate::platform::RawAdapter;
use crate::platform::RawFactory;
use crate::platform::RawOutput;
use crate::platform::RawWindow;
use crate::status::RawResult;
use crate::status::Status;

pub(crate) struct FactoryState {
    world: Rc<World>,
    adapters: Vec<Rc<AdapterState>>,
    association: RefCell<Option<WindowId>>,
}

impl FactoryState {
    pub(crate) fn world(&self) -> Rc<World> {
        Rc::clone(&self.world)
    }
}

/// A located factory. Clones, adapters and devices from it are all further
/// references to the same object.
#[derive(Clone)]
pub struct SimFactory {
    state: Rc<FactoryState>,
}

impl SimFactory {
    pub(crate) fn new(world: Rc<World>) -> Self {
        let adapters = world.adapters();
        debug!(adapters = adapters.len(), "simulated factory created");
        Self {
            state: Rc::new(FactoryState {
                world,
                adapters,
                association: RefCell::default(),
            }),
        }
    }

    /// Live references to this factory object.
    pub fn references(&self) -> usize {
        Rc::strong_count(&self.state)
    }

    fn software_adapter(&self) -> Rc<AdapterState> {
        self.state
            .adapters
            .iter()
            .find(|adapter| adapter.spec.software)
            .cloned()
            .unwrap_or_else(|| {
                Rc::new(AdapterState {
                    spec: AdapterSpec::basic_render_driver(),
                    private_data: RefCell::default(),
                })
            })
    }
}

impl RawFactory<Simulated> for SimFactory {
    fn enum_adapter(&self, index: u32) -> RawResult<SimAdapter> {
        self.state.world.check(SimCall::EnumAdapters)?;
        let state = self
            .state
            .adapters
            .get(index as usize)
            .ok_or(Status::DXGI_ERROR_NOT_FOUND)?;
        Ok(SimAdapter::new(&self.state, state))
    }

    fn create_device(
        &self,
        adapter: Option<&SimAdapter>,
        options: DeviceOptions,
    ) -> RawResult<SimDevice> {
        self.state.world.check(SimCall::CreateDevice)?;
        let state = match (adapter, options.driver) {
            (Some(adapter), DriverType::Hardware) => Rc::clone(&adapter.state),
            // An explicit adapter only makes sense for a hardware device.
            (Some(_), _) => return Err(Status::E_INVALIDARG),
            (None, DriverType::Hardware) => self
                .state
                .adapters
                .iter()
                .find(|adapter| !adapter.spec.software)
                .cloned()
                .ok_or(Status::DXGI_ERROR_UNSUPPORTED)?,
            (None, DriverType::Warp) => self.software_adapter(),
            (None, DriverType::Reference) => return Err(Status::DXGI_ERROR_UNSUPPORTED),
        };
        Ok(SimDevice::new(&self.state, state, options))
    }

    fn create_swap_chain(
        &self,
        device: &SimDevice,
        config: &SwapChainConfig,
        window: &SimWindow,
    ) -> RawResult<SimSwapChain> {
        SimSwapChain::create(Rc::clone(&self.state.world), device, config, window)
    }

    fn make_window_association(
        &self,
        window: &SimWindow,
        flags: WindowAssociation,
    ) -> RawResult<()> {
        debug!(window = %window.id(), flags = flags.bits(), "window associated");
        *self.state.association.borrow_mut() = Some(window.id());
        Ok(())
    }

    fn window_association(&self) -> RawResult<Option<WindowId>> {
        Ok(*self.state.association.borrow())
    }

    fn is_same(&self, other: &SimFactory) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

#[derive(Clone)]
pub struct SimAdapter {
    factory: Rc<FactoryState>,
    pub(crate) state: Rc<AdapterState>,
}

impl SimAdapter {
    pub(crate) fn new(factory: &Rc<FactoryState>, state: &Rc<AdapterState>) -> Self {
        Self {
            factory: Rc::clone(factory),
            state: Rc::clone(state),
        }
    }

    pub fn spec(&self) -> &AdapterSpec {
        &self.state.spec
    }
}

impl RawAdapter<Simulated> for SimAdapter {
    fn desc(&self) -> RawResult<AdapterDescriptor> {
        Ok(self.state.spec.descriptor())
    }

    fn enum_output(&self, index: u32) -> RawResult<SimOutput> {
        self.factory.world.check(SimCall::EnumOutputs)?;
        SimOutput::new(&self.factory.world, &self.state, index as usize)
            .ok_or(Status::DXGI_ERROR_NOT_FOUND)
    }

    fn check_interface_support(&self, interface: DeviceInterface) -> RawResult<DriverVersion> {
        match interface {
            DeviceInterface::D3D10Device => Ok(self.state.spec.driver_version),
        }
    }

    fn set_private_data(&self, key: PrivateDataKey, data: &[u8]) -> RawResult<()> {
        let mut private_data = self.state.private_data.borrow_mut();
        if data.is_empty() {
            private_data.remove(&key);
        } else {
            private_data.insert(key, PrivateData::Bytes(data.to_vec()));
        }
        Ok(())
    }

    fn private_data(&self, key: PrivateDataKey) -> RawResult<Vec<u8>> {
        match self.state.private_data.borrow().get(&key) {
            Some(PrivateData::Bytes(data)) => Ok(data.clone()),
            Some(PrivateData::Factory(_)) => Err(Status::DXGI_ERROR_INVALID_CALL),
            None => Err(Status::DXGI_ERROR_NOT_FOUND),
        }
    }

    fn set_private_factory(&self, key: PrivateDataKey, factory: Option<&SimFactory>) -> RawResult<()> {
        let mut private_data = self.state.private_data.borrow_mut();
        match factory {
            Some(factory) => private_data.insert(key, PrivateData::Factory(factory.clone())),
            None => private_data.remove(&key),
        };
        Ok(())
    }

    fn private_factory(&self, key: PrivateDataKey) -> RawResult<SimFactory> {
        match self.state.private_data.borrow().get(&key) {
            Some(PrivateData::Factory(factory)) => Ok(factory.clone()),
            Some(PrivateData::Bytes(_)) => Err(Status::DXGI_ERROR_INVALID_CALL),
            None => Err(Status::DXGI_ERROR_NOT_FOUND),
        }
    }

    fn parent(&self) -> RawResult<SimFactory> {
        Ok(SimFactory {
            state: Rc::clone(&self.factory),
        })
    }
}

#[derive(Clone)]
pub struct SimOutput {
    world: Rc<World>,
    pub(crate) adapter: Rc<AdapterState>,
    index: usize,
}

impl SimOutput {
    pub(crate) fn new(world: &Rc<World>, adapter: &Rc<AdapterState>, index: usize) -> Option<Self> {
        (index < adapter.spec.outputs.len()).then(|| Self {
            world: Rc::clone(world),
            adapter: Rc::clone(adapter),
            index,
        })
    }

    pub fn spec(&self) -> &OutputSpec {
        &self.adapter.spec.outputs[self.index]
    }

    /// Same monitor on the same adapter.
    pub fn same_as(&self, other: &SimOutput) -> bool {
        self.adapter.spec.luid == other.adapter.spec.luid && self.index == other.index
    }
}

impl RawOutput<Simulated> for SimOutput {
    fn desc(&self) -> RawResult<OutputDescriptor> {
        Ok(self.spec().descriptor())
    }

    fn monitor_info(&self) -> RawResult<Option<MonitorInfo>> {
        Ok(Some(self.spec().monitor_info()))
    }

    fn display_modes(&self, format: Format) -> RawResult<Vec<DisplayMode>> {
        Ok(self
            .spec()
            .modes
            .iter()
            .filter(|mode| mode.format == format)
            .copied()
            .collect())
    }

    fn find_closest_matching_mode(
        &self,
        desired: &DisplayMode,
        concerned_device: Option<&SimDevice>,
    ) -> RawResult<DisplayMode> {
        self.world.check(SimCall::FindClosestMatchingMode)?;
        let modes = &self.spec().modes;
        let mut wanted = *desired;
        if wanted.format == Format::UNKNOWN {
            if concerned_device.is_none() {
                return Err(Status::DXGI_ERROR_INVALID_CALL);
            }
            wanted.format = preferred_format(modes).ok_or(Status::DXGI_ERROR_NOT_FOUND)?;
        }
        closest_mode(modes, &wanted).ok_or(Status::DXGI_ERROR_NOT_FOUND)
    }

    fn wait_for_vblank(&self) -> RawResult<()> {
        self.world.check(SimCall::WaitForVBlank)
    }
}

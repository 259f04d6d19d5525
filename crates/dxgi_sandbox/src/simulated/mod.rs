//! A deterministic in-process graphics subsystem.
//!
//! Everything lives in one [`SimulatedSystem`]. Its adapter topology can be
//! edited after factories exist (factories keep the list they were located
//! with) and any call can be told to fail or succeed with a status of your
//! choosing through [`SimulatedSystem::inject`]. Handles are single-threaded.

mod device;
mod events;
mod factory;
mod mode_matching;
mod swap_chain;
mod topology;

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::debug;

pub use device::SimDevice;
pub use device::SimResource;
pub use events::ScriptedEvents;
pub use events::SimEvent;
pub use factory::SimAdapter;
pub use factory::SimFactory;
pub use factory::SimOutput;
pub use swap_chain::SimSwapChain;
pub use topology::AdapterSpec;
pub use topology::OutputSpec;
pub use topology::default_topology;
pub use topology::standard_modes;

use crate::model::Luid;
use crate::model::PrivateDataKey;
use crate::model::WindowId;
use crate::platform::FactoryLocator;
use crate::platform::RawWindow;
use crate::platform::Subsystem;
use crate::status::RawResult;
use crate::status::Status;

/// Marker for the simulated handle family.
pub enum Simulated {}

impl Subsystem for Simulated {
    type Factory = SimFactory;
    type Adapter = SimAdapter;
    type Output = SimOutput;
    type Device = SimDevice;
    type Resource = SimResource;
    type SwapChain = SimSwapChain;
    type Window = SimWindow;
}

/// Platform calls that accept injected results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SimCall {
    CreateFactory,
    EnumAdapters,
    EnumOutputs,
    CreateDevice,
    CreateSwapChain,
    FindClosestMatchingMode,
    WaitForVBlank,
    QueryResourceResidency,
    SetFullscreenState,
    Present,
    ResizeBuffers,
}

/// Private data entries; an attached factory is held as a reference until
/// it is replaced or removed.
pub(crate) enum PrivateData {
    Bytes(Vec<u8>),
    Factory(SimFactory),
}

pub(crate) struct AdapterState {
    pub(crate) spec: AdapterSpec,
    pub(crate) private_data: RefCell<HashMap<PrivateDataKey, PrivateData>>,
}

pub(crate) struct WindowState {
    pub(crate) id: WindowId,
    pub(crate) size: Cell<(u32, u32)>,
}

#[derive(Default)]
pub(crate) struct World {
    adapters: RefCell<Vec<Rc<AdapterState>>>,
    faults: RefCell<HashMap<SimCall, VecDeque<Status>>>,
    fullscreen_owner: Cell<Option<u64>>,
    next_id: Cell<u64>,
}

impl World {
    pub(crate) fn next_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    /// The next injected result for `call`, if one is queued.
    pub(crate) fn take_fault(&self, call: SimCall) -> Option<Status> {
        let status = self.faults.borrow_mut().get_mut(&call)?.pop_front();
        if let Some(status) = status {
            debug!(?call, %status, "injected result");
        }
        status
    }

    /// Fails with the next injected failure for `call`. Injected success
    /// codes are consumed and ignored.
    pub(crate) fn check(&self, call: SimCall) -> RawResult<()> {
        match self.take_fault(call) {
            Some(status) if status.is_failure() => Err(status),
            _ => Ok(()),
        }
    }

    pub(crate) fn adapters(&self) -> Vec<Rc<AdapterState>> {
        self.adapters.borrow().clone()
    }

    pub(crate) fn fullscreen_owner(&self) -> Option<u64> {
        self.fullscreen_owner.get()
    }

    pub(crate) fn claim_fullscreen(&self, swap_chain: u64) -> bool {
        match self.fullscreen_owner.get() {
            Some(owner) if owner != swap_chain => false,
            _ => {
                self.fullscreen_owner.set(Some(swap_chain));
                true
            }
        }
    }

    pub(crate) fn release_fullscreen(&self, swap_chain: u64) {
        if self.fullscreen_owner.get() == Some(swap_chain) {
            self.fullscreen_owner.set(None);
        }
    }
}

/// The simulated machine: adapters, monitors, windows and pending faults.
#[derive(Clone)]
pub struct SimulatedSystem {
    world: Rc<World>,
}

impl Default for SimulatedSystem {
    fn default() -> Self {
        Self::with_adapters(default_topology())
    }
}

impl SimulatedSystem {
    /// One dual-monitor hardware adapter plus the software adapter.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_adapters(adapters: impl IntoIterator<Item = AdapterSpec>) -> Self {
        let system = Self {
            world: Rc::new(World::default()),
        };
        for adapter in adapters {
            system.install_adapter(adapter);
        }
        system
    }

    /// Plugs in an adapter after the current ones. Factories located earlier
    /// do not see it.
    pub fn install_adapter(&self, mut spec: AdapterSpec) {
        if spec.luid == Luid::default() {
            let id = self.world.next_id();
            spec.luid = Luid {
                low_part: 0x0001_0000 | (id as u32),
                high_part: 0,
            };
        }
        debug!(adapter = %spec.description, luid = %spec.luid, "adapter installed");
        self.world.adapters.borrow_mut().push(Rc::new(AdapterState {
            spec,
            private_data: RefCell::default(),
        }));
    }

    /// Unplugs the adapter at `index`. Factories located earlier still list it.
    pub fn remove_adapter(&self, index: usize) -> Option<AdapterSpec> {
        let mut adapters = self.world.adapters.borrow_mut();
        if index >= adapters.len() {
            return None;
        }
        let removed = adapters.remove(index);
        debug!(adapter = %removed.spec.description, "adapter removed");
        Some(removed.spec.clone())
    }

    pub fn adapter_count(&self) -> usize {
        self.world.adapters.borrow().len()
    }

    /// Queues `status` as the result of the next `call`. Several injections
    /// for the same call are consumed in order.
    pub fn inject(&self, call: SimCall, status: Status) {
        self.world
            .faults
            .borrow_mut()
            .entry(call)
            .or_default()
            .push_back(status);
    }

    /// Injections for `call` that have not been consumed yet.
    pub fn pending(&self, call: SimCall) -> usize {
        self.world
            .faults
            .borrow()
            .get(&call)
            .map_or(0, VecDeque::len)
    }

    /// Whether some swap chain currently owns a display in fullscreen.
    pub fn fullscreen_claimed(&self) -> bool {
        self.world.fullscreen_owner().is_some()
    }

    pub fn create_window(&self, width: u32, height: u32) -> SimWindow {
        let id = self.world.next_id();
        SimWindow {
            state: Rc::new(WindowState {
                id: WindowId(0x1_0000 + id as isize * 0x10),
                size: Cell::new((width, height)),
            }),
        }
    }
}

impl FactoryLocator for SimulatedSystem {
    type Subsystem = Simulated;

    fn locate(&self) -> RawResult<SimFactory> {
        self.world.check(SimCall::CreateFactory)?;
        Ok(SimFactory::new(Rc::clone(&self.world)))
    }
}

/// A window that exists only as an id and a client size.
#[derive(Clone)]
pub struct SimWindow {
    pub(crate) state: Rc<WindowState>,
}

impl SimWindow {
    pub fn client_size(&self) -> (u32, u32) {
        self.state.size.get()
    }
}

impl RawWindow for SimWindow {
    fn id(&self) -> WindowId {
        self.state.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installed_adapters_get_distinct_luids() {
        let system = SimulatedSystem::new();
        let luids: Vec<Luid> = system
            .world
            .adapters()
            .iter()
            .map(|adapter| adapter.spec.luid)
            .collect();
        assert_eq!(luids.len(), 2);
        assert_ne!(luids[0], luids[1]);
        assert!(luids.iter().all(|luid| *luid != Luid::default()));
    }

    #[test]
    fn injections_are_consumed_in_order() {
        let system = SimulatedSystem::new();
        system.inject(SimCall::Present, Status::DXGI_STATUS_OCCLUDED);
        system.inject(SimCall::Present, Status::DXGI_ERROR_DEVICE_RESET);
        assert_eq!(system.pending(SimCall::Present), 2);
        assert_eq!(
            system.world.take_fault(SimCall::Present),
            Some(Status::DXGI_STATUS_OCCLUDED)
        );
        assert_eq!(
            system.world.check(SimCall::Present),
            Err(Status::DXGI_ERROR_DEVICE_RESET)
        );
        assert_eq!(system.pending(SimCall::Present), 0);
    }

    #[test]
    fn removing_past_the_end_is_a_no_op() {
        let system = SimulatedSystem::new();
        assert!(system.remove_adapter(5).is_none());
        assert_eq!(system.adapter_count(), 2);
    }

    #[test]
    fn only_one_swap_chain_owns_fullscreen() {
        let world = World::default();
        assert!(world.claim_fullscreen(1));
        assert!(world.claim_fullscreen(1));
        assert!(!world.claim_fullscreen(2));
        world.release_fullscreen(2);
        assert_eq!(world.fullscreen_owner(), Some(1));
        world.release_fullscreen(1);
        assert!(world.claim_fullscreen(2));
    }
}

use std::cell::Cell;
use std::cell::RefCell;
use std::cell::RefMut;
use std::rc::Rc;

use tracing::debug;
use tracing::warn;

use super::AdapterState;
use super::SimAdapter;
use super::SimCall;
use super::Simulated;
use super::World;
use super::factory::FactoryState;
use crate::model::DeviceOptions;
use crate::model::EvictionPriority;
use crate::model::GPU_PRIORITY_RANGE;
use crate::model::MapFlags;
use crate::model::ResidencyStatus;
use crate::model::SampleDesc;
use crate::model::SurfaceDescription;
use crate::model::TextureDesc;
use crate::model::TextureUsage;
use crate::model::Usage;
use crate::platform::MappedRect;
use crate::platform::RawDevice;
use crate::platform::RawResource;
use crate::status::RawResult;
use crate::status::Status;

const MAX_TEXTURE_DIMENSION: u32 = 8192;

pub(crate) struct DeviceState {
    factory: Rc<FactoryState>,
    pub(crate) adapter: Rc<AdapterState>,
    pub(crate) options: DeviceOptions,
    priority: Cell<i32>,
    lost: Cell<Option<Status>>,
}

impl DeviceState {
    /// The removal reason once the device is gone. Stays set for good.
    pub(crate) fn lost(&self) -> Option<Status> {
        self.lost.get()
    }

    pub(crate) fn mark_lost(&self, status: Status) {
        if self.lost.get().is_none() {
            warn!(%status, "simulated device lost");
            self.lost.set(Some(status));
        }
    }
}

pub struct SimDevice {
    world: Rc<World>,
    pub(crate) state: Rc<DeviceState>,
}

impl SimDevice {
    pub(crate) fn new(
        factory: &Rc<FactoryState>,
        adapter: Rc<AdapterState>,
        options: DeviceOptions,
    ) -> Self {
        debug!(
            adapter = %adapter.spec.description,
            driver = ?options.driver,
            debug_layer = options.debug,
            "simulated device created"
        );
        Self {
            world: factory.world(),
            state: Rc::new(DeviceState {
                factory: Rc::clone(factory),
                adapter,
                options,
                priority: Cell::new(0),
                lost: Cell::new(None),
            }),
        }
    }

    pub fn options(&self) -> DeviceOptions {
        self.state.options
    }

    /// Pulls the device out from under its users, as a driver crash would.
    pub fn remove(&self, status: Status) {
        self.state.mark_lost(status);
    }

    fn ensure_alive(&self) -> RawResult<()> {
        match self.state.lost() {
            Some(status) => Err(status),
            None => Ok(()),
        }
    }
}

impl RawDevice<Simulated> for SimDevice {
    fn adapter(&self) -> RawResult<SimAdapter> {
        Ok(SimAdapter::new(&self.state.factory, &self.state.adapter))
    }

    fn gpu_thread_priority(&self) -> RawResult<i32> {
        Ok(self.state.priority.get())
    }

    fn set_gpu_thread_priority(&self, priority: i32) -> RawResult<()> {
        if !GPU_PRIORITY_RANGE.contains(&priority) {
            return Err(Status::E_INVALIDARG);
        }
        self.state.priority.set(priority);
        Ok(())
    }

    fn query_resource_residency(
        &self,
        resources: &[&SimResource],
    ) -> RawResult<Vec<ResidencyStatus>> {
        self.world.check(SimCall::QueryResourceResidency)?;
        self.ensure_alive()?;
        Ok(resources
            .iter()
            .map(|resource| resource.state.residency.get())
            .collect())
    }

    fn create_texture(&self, desc: &TextureDesc) -> RawResult<SimResource> {
        self.ensure_alive()?;
        let in_range = |size: u32| (1..=MAX_TEXTURE_DIMENSION).contains(&size);
        if !in_range(desc.width) || !in_range(desc.height) {
            return Err(Status::E_INVALIDARG);
        }
        let bytes_per_pixel = desc.format.bytes_per_pixel().ok_or(Status::E_INVALIDARG)?;
        let surface = SurfaceDescription {
            width: desc.width,
            height: desc.height,
            format: desc.format,
            sample: SampleDesc::default(),
        };
        Ok(match desc.usage {
            TextureUsage::Default => SimResource::new(
                surface,
                Usage::SHADER_INPUT | Usage::RENDER_TARGET_OUTPUT,
                None,
                ResidencyStatus::FullyResident,
            ),
            TextureUsage::Staging => SimResource::new(
                surface,
                Usage::empty(),
                Some(bytes_per_pixel),
                ResidencyStatus::ResidentInSharedMemory,
            ),
        })
    }
}

pub(crate) struct ResourceState {
    desc: SurfaceDescription,
    usage: Usage,
    /// Row pitch for CPU-accessible resources; `None` cannot be mapped.
    cpu_pitch: Option<u32>,
    eviction: Cell<EvictionPriority>,
    residency: Cell<ResidencyStatus>,
    data: RefCell<Vec<u8>>,
    mapped: Cell<bool>,
}

/// A texture or back buffer. Clones share one underlying resource.
#[derive(Clone)]
pub struct SimResource {
    pub(crate) state: Rc<ResourceState>,
}

impl SimResource {
    pub(crate) fn new(
        desc: SurfaceDescription,
        usage: Usage,
        bytes_per_pixel: Option<u32>,
        residency: ResidencyStatus,
    ) -> Self {
        let cpu_pitch = bytes_per_pixel.map(|bytes| desc.width * bytes);
        let len = cpu_pitch.map_or(0, |pitch| pitch as usize * desc.height as usize);
        Self {
            state: Rc::new(ResourceState {
                desc,
                usage,
                cpu_pitch,
                eviction: Cell::new(EvictionPriority::NORMAL),
                residency: Cell::new(residency),
                data: RefCell::new(vec![0; len]),
                mapped: Cell::new(false),
            }),
        }
    }

    /// Moves the resource, as the memory manager would under pressure.
    pub fn set_residency(&self, residency: ResidencyStatus) {
        self.state.residency.set(residency);
    }

    /// A copy of the CPU-visible bytes. Empty for GPU-only resources, and
    /// `None` while a mapped view still holds them.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.state.data.try_borrow().ok().map(|data| data.clone())
    }

    pub fn is_mapped(&self) -> bool {
        self.state.mapped.get()
    }
}

impl RawResource for SimResource {
    type Bytes<'a> = RefMut<'a, [u8]>;

    fn usage(&self) -> RawResult<Usage> {
        Ok(self.state.usage)
    }

    fn eviction_priority(&self) -> RawResult<EvictionPriority> {
        Ok(self.state.eviction.get())
    }

    fn set_eviction_priority(&self, priority: EvictionPriority) -> RawResult<()> {
        self.state.eviction.set(priority);
        Ok(())
    }

    fn has_shared_handle(&self) -> RawResult<bool> {
        Ok(self.state.usage.contains(Usage::SHARED))
    }

    fn surface_desc(&self) -> RawResult<SurfaceDescription> {
        Ok(self.state.desc)
    }

    fn map(&self, flags: MapFlags) -> RawResult<MappedRect<Self::Bytes<'_>>> {
        let pitch = self.state.cpu_pitch.ok_or(Status::DXGI_ERROR_INVALID_CALL)?;
        if !flags.contains(MapFlags::READ) && !flags.contains(MapFlags::WRITE) {
            return Err(Status::E_INVALIDARG);
        }
        if self.state.mapped.get() {
            return Err(Status::DXGI_ERROR_INVALID_CALL);
        }
        // A view kept past its unmap still owns the bytes.
        let mut data = self
            .state
            .data
            .try_borrow_mut()
            .map_err(|_| Status::DXGI_ERROR_INVALID_CALL)?;
        if flags.contains(MapFlags::DISCARD) {
            data.fill(0);
        }
        self.state.mapped.set(true);
        Ok(MappedRect {
            pitch,
            bits: RefMut::map(data, Vec::as_mut_slice),
        })
    }

    fn unmap(&self) -> RawResult<()> {
        if !self.state.mapped.replace(false) {
            return Err(Status::DXGI_ERROR_INVALID_CALL);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Format;
    use crate::platform::FactoryLocator;
    use crate::platform::RawFactory;
    use crate::simulated::SimulatedSystem;

    fn device() -> SimDevice {
        let factory = SimulatedSystem::new().locate().unwrap();
        factory.create_device(None, DeviceOptions::default()).unwrap()
    }

    #[test]
    fn priority_outside_range_is_invalid_argument() {
        let device = device();
        assert_eq!(device.set_gpu_thread_priority(8), Err(Status::E_INVALIDARG));
        device.set_gpu_thread_priority(-7).unwrap();
        assert_eq!(device.gpu_thread_priority().unwrap(), -7);
    }

    #[test]
    fn staging_textures_live_in_shared_memory() {
        let device = device();
        let staging = device
            .create_texture(&TextureDesc::staging(800, 600, Format::R8G8B8A8_UNORM))
            .unwrap();
        let gpu = device
            .create_texture(&TextureDesc {
                usage: TextureUsage::Default,
                ..TextureDesc::staging(64, 64, Format::R8G8B8A8_UNORM)
            })
            .unwrap();
        let residency = device.query_resource_residency(&[&staging, &gpu]).unwrap();
        assert_eq!(
            residency,
            vec![
                ResidencyStatus::ResidentInSharedMemory,
                ResidencyStatus::FullyResident
            ]
        );
    }

    #[test]
    fn map_is_exclusive_and_staging_only() {
        let device = device();
        let staging = device
            .create_texture(&TextureDesc::staging(4, 2, Format::R8G8B8A8_UNORM))
            .unwrap();
        let rect = staging.map(MapFlags::WRITE).unwrap();
        assert_eq!(rect.pitch, 16);
        assert_eq!(rect.bits.len(), 32);
        assert_eq!(staging.map(MapFlags::WRITE).err(), Some(Status::DXGI_ERROR_INVALID_CALL));
        staging.unmap().unwrap();
        assert_eq!(staging.unmap(), Err(Status::DXGI_ERROR_INVALID_CALL));

        // The view outlived its unmap, so the bytes are still taken.
        assert_eq!(staging.map(MapFlags::READ).err(), Some(Status::DXGI_ERROR_INVALID_CALL));
        assert_eq!(staging.contents(), None);
        drop(rect);
        assert_eq!(staging.contents(), Some(vec![0; 32]));

        let gpu = device
            .create_texture(&TextureDesc {
                usage: TextureUsage::Default,
                ..TextureDesc::staging(4, 2, Format::R8G8B8A8_UNORM)
            })
            .unwrap();
        assert_eq!(gpu.map(MapFlags::READ).err(), Some(Status::DXGI_ERROR_INVALID_CALL));
    }

    #[test]
    fn removed_device_refuses_new_work() {
        let device = device();
        device.remove(Status::DXGI_ERROR_DEVICE_REMOVED);
        assert_eq!(
            device
                .create_texture(&TextureDesc::staging(4, 4, Format::R8G8B8A8_UNORM))
                .err(),
            Some(Status::DXGI_ERROR_DEVICE_REMOVED)
        );
        assert_eq!(
            device.query_resource_residency(&[]).err(),
            Some(Status::DXGI_ERROR_DEVICE_REMOVED)
        );
    }
}

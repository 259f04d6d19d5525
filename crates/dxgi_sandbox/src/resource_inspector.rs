use tracing::debug;
use tracing::warn;

use crate::adapter_enumerator::Adapter;
use crate::error::DxgiError;
use crate::error::DxgiResult;
use crate::error::StatusContext;
use crate::model::EvictionPriority;
use crate::model::GPU_PRIORITY_RANGE;
use crate::model::MapFlags;
use crate::model::ResidencyStatus;
use crate::model::SurfaceDescription;
use crate::model::TextureDesc;
use crate::model::Usage;
use crate::platform::MappedRect;
use crate::platform::RawDevice;
use crate::platform::RawResource;
use crate::platform::Subsystem;
use crate::status::Status;

/// A rendering device. Every query goes to the live platform.
pub struct Device<S: Subsystem> {
    raw: S::Device,
}

impl<S: Subsystem> Device<S> {
    pub fn from_raw(raw: S::Device) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &S::Device {
        &self.raw
    }

    /// The adapter this device runs on.
    pub fn adapter(&self) -> DxgiResult<Adapter<S>> {
        let raw = self.raw.adapter().call("IDXGIDevice::GetAdapter")?;
        Ok(Adapter::from_raw(raw, None))
    }

    pub fn gpu_priority(&self) -> DxgiResult<i32> {
        self.raw
            .gpu_thread_priority()
            .call("GetGPUThreadPriority")
    }

    /// Accepts `-7..=7`; anything else is rejected before reaching the platform.
    pub fn set_gpu_priority(&self, priority: i32) -> DxgiResult<()> {
        let out_of_range = || {
            DxgiError::range(
                "GPU thread priority",
                priority.into(),
                (*GPU_PRIORITY_RANGE.start()).into(),
                (*GPU_PRIORITY_RANGE.end()).into(),
            )
        };
        if !GPU_PRIORITY_RANGE.contains(&priority) {
            return Err(out_of_range());
        }
        match self.raw.set_gpu_thread_priority(priority) {
            Ok(()) => Ok(()),
            Err(Status::E_INVALIDARG) => Err(out_of_range()),
            Err(status) => Err(DxgiError::from_status("SetGPUThreadPriority", status)),
        }
    }

    /// One status per resource, positionally matched to `resources`.
    pub fn query_residency(&self, resources: &[&Resource<S>]) -> DxgiResult<Vec<ResidencyStatus>> {
        if resources.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<&S::Resource> = resources.iter().map(|resource| resource.raw()).collect();
        let residency = self
            .raw
            .query_resource_residency(&raw)
            .call("QueryResourceResidency")?;
        debug_assert_eq!(residency.len(), resources.len());
        Ok(residency)
    }

    pub fn create_texture(&self, desc: &TextureDesc) -> DxgiResult<Resource<S>> {
        let raw = self.raw.create_texture(desc).call("CreateTexture2D")?;
        debug!(
            width = desc.width,
            height = desc.height,
            format = %desc.format,
            usage = ?desc.usage,
            "texture created"
        );
        Ok(Resource::from_raw(raw))
    }
}

/// A GPU resource viewed through its DXGI interfaces.
pub struct Resource<S: Subsystem> {
    raw: S::Resource,
}

impl<S: Subsystem> Resource<S> {
    pub fn from_raw(raw: S::Resource) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &S::Resource {
        &self.raw
    }

    pub fn usage(&self) -> DxgiResult<Usage> {
        self.raw.usage().call("GetUsage")
    }

    pub fn eviction_priority(&self) -> DxgiResult<EvictionPriority> {
        self.raw.eviction_priority().call("GetEvictionPriority")
    }

    pub fn set_eviction_priority(&self, priority: EvictionPriority) -> DxgiResult<()> {
        if !(EvictionPriority::MINIMUM..=EvictionPriority::MAXIMUM).contains(&priority) {
            return Err(DxgiError::range(
                "eviction priority",
                priority.0.into(),
                EvictionPriority::MINIMUM.0.into(),
                EvictionPriority::MAXIMUM.0.into(),
            ));
        }
        self.raw
            .set_eviction_priority(priority)
            .call("SetEvictionPriority")
    }

    pub fn has_shared_handle(&self) -> DxgiResult<bool> {
        self.raw.has_shared_handle().call("GetSharedHandle")
    }

    pub fn surface_desc(&self) -> DxgiResult<SurfaceDescription> {
        self.raw.surface_desc().call("IDXGISurface::GetDesc")
    }

    /// Locks the surface for CPU access until the guard is dropped.
    pub fn map(&mut self, flags: MapFlags) -> DxgiResult<MappedSurface<'_, S>> {
        let raw = &self.raw;
        let rect = raw.map(flags).call("IDXGISurface::Map")?;
        Ok(MappedSurface {
            raw,
            rect,
            released: false,
        })
    }
}

/// CPU access to a mapped surface. The GPU cannot touch the surface while
/// this guard is alive; dropping it unmaps.
pub struct MappedSurface<'r, S: Subsystem>
where
    S::Resource: 'r,
{
    raw: &'r S::Resource,
    rect: MappedRect<<S::Resource as RawResource>::Bytes<'r>>,
    released: bool,
}

impl<'r, S: Subsystem> MappedSurface<'r, S>
where
    S::Resource: 'r,
{
    /// Bytes between the starts of two rows.
    pub fn pitch(&self) -> u32 {
        self.rect.pitch
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.rect.bits
    }

    /// Unmaps now, reporting a failure instead of logging it.
    pub fn unmap(mut self) -> DxgiResult<()> {
        self.released = true;
        self.raw.unmap().call("IDXGISurface::Unmap")
    }
}

impl<'r, S: Subsystem> Drop for MappedSurface<'r, S>
where
    S::Resource: 'r,
{
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(status) = self.raw.unmap() {
            warn!(%status, "IDXGISurface::Unmap failed while dropping a mapping");
        }
    }
}

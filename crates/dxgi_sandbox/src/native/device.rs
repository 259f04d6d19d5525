use windows::Win32::Graphics::Direct3D10::*;
use windows::Win32::Graphics::Dxgi::Common::DXGI_SAMPLE_DESC;
use windows::Win32::Graphics::Dxgi::*;
use windows::core::IUnknown;
use windows::core::Interface;

use super::Native;
use super::NativeAdapter;
use super::convert::format_to_native;
use super::convert::residency_from_native;
use super::convert::surface_from_native;
use crate::model::EvictionPriority;
use crate::model::MapFlags;
use crate::model::ResidencyStatus;
use crate::model::SurfaceDescription;
use crate::model::TextureDesc;
use crate::model::TextureUsage;
use crate::model::Usage;
use crate::platform::MappedRect;
use crate::platform::RawDevice;
use crate::platform::RawResource;
use crate::status::RawResult;
use crate::status::Status;

/// A Direct3D 10 device and its DXGI face.
pub struct NativeDevice {
    d3d: ID3D10Device,
    dxgi: IDXGIDevice,
}

impl NativeDevice {
    pub(crate) fn new(d3d: ID3D10Device) -> RawResult<Self> {
        let dxgi = d3d.cast::<IDXGIDevice>()?;
        Ok(Self { d3d, dxgi })
    }

    pub fn d3d(&self) -> &ID3D10Device {
        &self.d3d
    }
}

impl RawDevice<Native> for NativeDevice {
    fn adapter(&self) -> RawResult<NativeAdapter> {
        let adapter = unsafe { self.dxgi.GetAdapter() }?;
        Ok(NativeAdapter::new(adapter))
    }

    fn gpu_thread_priority(&self) -> RawResult<i32> {
        Ok(unsafe { self.dxgi.GetGPUThreadPriority() }?)
    }

    fn set_gpu_thread_priority(&self, priority: i32) -> RawResult<()> {
        unsafe { self.dxgi.SetGPUThreadPriority(priority) }?;
        Ok(())
    }

    fn query_resource_residency(
        &self,
        resources: &[&NativeResource],
    ) -> RawResult<Vec<ResidencyStatus>> {
        let unknowns = resources
            .iter()
            .map(|resource| resource.resource.cast::<IUnknown>().map(Some))
            .collect::<windows::core::Result<Vec<Option<IUnknown>>>>()?;
        let mut residency = vec![DXGI_RESIDENCY::default(); unknowns.len()];
        unsafe {
            self.dxgi.QueryResourceResidency(
                unknowns.as_ptr(),
                residency.as_mut_ptr(),
                unknowns.len() as u32,
            )
        }?;
        Ok(residency.into_iter().map(residency_from_native).collect())
    }

    fn create_texture(&self, desc: &TextureDesc) -> RawResult<NativeResource> {
        let (usage, bind_flags, cpu_access_flags) = match desc.usage {
            TextureUsage::Default => (
                D3D10_USAGE_DEFAULT,
                D3D10_BIND_SHADER_RESOURCE.0 as u32,
                0,
            ),
            TextureUsage::Staging => (
                D3D10_USAGE_STAGING,
                0,
                (D3D10_CPU_ACCESS_WRITE.0 | D3D10_CPU_ACCESS_READ.0) as u32,
            ),
        };
        let native = D3D10_TEXTURE2D_DESC {
            Width: desc.width,
            Height: desc.height,
            MipLevels: 1,
            ArraySize: 1,
            Format: format_to_native(desc.format),
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            Usage: usage,
            BindFlags: bind_flags,
            CPUAccessFlags: cpu_access_flags,
            MiscFlags: 0,
        };
        let mut texture: Option<ID3D10Texture2D> = None;
        unsafe { self.d3d.CreateTexture2D(&native, None, Some(&mut texture)) }?;
        NativeResource::new(&texture.ok_or(Status::E_FAIL)?)
    }
}

/// A resource seen through `IDXGIResource` and, when it is one, `IDXGISurface`.
#[derive(Clone)]
pub struct NativeResource {
    resource: IDXGIResource,
    surface: Option<IDXGISurface>,
}

impl NativeResource {
    pub(crate) fn new(object: &impl Interface) -> RawResult<Self> {
        Ok(Self {
            resource: object.cast()?,
            surface: object.cast().ok(),
        })
    }

    fn surface(&self) -> RawResult<&IDXGISurface> {
        self.surface.as_ref().ok_or(Status::DXGI_ERROR_UNSUPPORTED)
    }
}

impl RawResource for NativeResource {
    type Bytes<'a> = &'a mut [u8];

    fn usage(&self) -> RawResult<Usage> {
        let usage = unsafe { self.resource.GetUsage() }?;
        Ok(Usage::from_bits_retain(usage.0))
    }

    fn eviction_priority(&self) -> RawResult<EvictionPriority> {
        let priority = unsafe { self.resource.GetEvictionPriority() }?;
        Ok(EvictionPriority(priority.0))
    }

    fn set_eviction_priority(&self, priority: EvictionPriority) -> RawResult<()> {
        unsafe {
            self.resource
                .SetEvictionPriority(DXGI_RESOURCE_PRIORITY(priority.0))
        }?;
        Ok(())
    }

    fn has_shared_handle(&self) -> RawResult<bool> {
        let handle = unsafe { self.resource.GetSharedHandle() }?;
        Ok(!handle.is_invalid())
    }

    fn surface_desc(&self) -> RawResult<SurfaceDescription> {
        let desc = unsafe { self.surface()?.GetDesc() }?;
        Ok(surface_from_native(&desc))
    }

    fn map(&self, flags: MapFlags) -> RawResult<MappedRect<Self::Bytes<'_>>> {
        let surface = self.surface()?;
        let desc = unsafe { surface.GetDesc() }?;
        let mut rect = DXGI_MAPPED_RECT::default();
        unsafe { surface.Map(&mut rect, flags.bits()) }?;
        if rect.pBits.is_null() {
            unsafe { surface.Unmap() }?;
            return Err(Status::E_FAIL);
        }
        let pitch = rect.Pitch as u32;
        let len = pitch as usize * desc.Height as usize;
        // SAFETY: the runtime keeps `Pitch * Height` bytes at `pBits` until
        // Unmap, and the view cannot outlive the borrow of `self`.
        let bits = unsafe { std::slice::from_raw_parts_mut(rect.pBits, len) };
        Ok(MappedRect { pitch, bits })
    }

    fn unmap(&self) -> RawResult<()> {
        unsafe { self.surface()?.Unmap() }?;
        Ok(())
    }
}

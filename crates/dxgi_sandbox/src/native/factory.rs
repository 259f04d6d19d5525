use std::ffi::c_void;

use windows::Win32::Foundation::HMODULE;
use windows::Win32::Graphics::Direct3D10::*;
use windows::Win32::Graphics::Dxgi::*;
use windows::Win32::Graphics::Gdi::GetMonitorInfoW;
use windows::Win32::Graphics::Gdi::MONITORINFO;
use windows::Win32::Graphics::Gdi::MONITORINFOEXW;
use windows::Win32::Graphics::Gdi::MONITORINFOF_PRIMARY;
use windows::core::GUID;
use windows::core::IUnknown;
use windows::core::Interface;

use super::Native;
use super::NativeDevice;
use super::NativeSwapChain;
use super::NativeWindow;
use super::convert::adapter_from_native;
use super::convert::format_to_native;
use super::convert::mode_from_native;
use super::convert::mode_to_native;
use super::convert::output_from_native;
use super::convert::rect_from_native;
use super::convert::swap_chain_to_native;
use super::convert::window_from_native;
use super::last_error;
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
use crate::model::wide_to_string;
use crate::platform::RawAdapter;
use crate::platform::RawFactory;
use crate::platform::RawOutput;
use crate::status::RawResult;
use crate::status::Status;

pub struct NativeFactory {
    factory: IDXGIFactory,
}

impl NativeFactory {
    pub(crate) fn new(factory: IDXGIFactory) -> Self {
        Self { factory }
    }

    pub fn interface(&self) -> &IDXGIFactory {
        &self.factory
    }
}

impl RawFactory<Native> for NativeFactory {
    fn enum_adapter(&self, index: u32) -> RawResult<NativeAdapter> {
        let adapter = unsafe { self.factory.EnumAdapters(index) }?;
        Ok(NativeAdapter { adapter })
    }

    fn create_device(
        &self,
        adapter: Option<&NativeAdapter>,
        options: DeviceOptions,
    ) -> RawResult<NativeDevice> {
        let driver = match (adapter.is_some(), options.driver) {
            (_, DriverType::Hardware) => D3D10_DRIVER_TYPE_HARDWARE,
            (false, DriverType::Warp) => D3D10_DRIVER_TYPE_WARP,
            (false, DriverType::Reference) => D3D10_DRIVER_TYPE_REFERENCE,
            (true, _) => return Err(Status::E_INVALIDARG),
        };
        let mut flags = 0u32;
        if options.debug {
            flags |= D3D10_CREATE_DEVICE_DEBUG.0 as u32;
        }
        let mut device: Option<ID3D10Device> = None;
        unsafe {
            D3D10CreateDevice(
                adapter.map(|adapter| &adapter.adapter),
                driver,
                HMODULE::default(),
                flags,
                D3D10_SDK_VERSION,
                Some(&mut device),
            )
        }?;
        NativeDevice::new(device.ok_or(Status::E_FAIL)?)
    }

    fn create_swap_chain(
        &self,
        device: &NativeDevice,
        config: &SwapChainConfig,
        window: &NativeWindow,
    ) -> RawResult<NativeSwapChain> {
        let desc = swap_chain_to_native(config, window.hwnd());
        let mut swap_chain: Option<IDXGISwapChain> = None;
        unsafe {
            self.factory
                .CreateSwapChain(device.d3d(), &desc, &mut swap_chain)
        }
        .ok()?;
        Ok(NativeSwapChain::new(swap_chain.ok_or(Status::E_FAIL)?))
    }

    fn make_window_association(
        &self,
        window: &NativeWindow,
        flags: WindowAssociation,
    ) -> RawResult<()> {
        unsafe {
            self.factory
                .MakeWindowAssociation(window.hwnd(), DXGI_MWA_FLAGS(flags.bits()))
        }?;
        Ok(())
    }

    fn window_association(&self) -> RawResult<Option<WindowId>> {
        let hwnd = unsafe { self.factory.GetWindowAssociation() }?;
        Ok((!hwnd.is_invalid()).then(|| window_from_native(hwnd)))
    }

    fn is_same(&self, other: &NativeFactory) -> bool {
        self.factory == other.factory
    }
}

#[derive(Clone)]
pub struct NativeAdapter {
    adapter: IDXGIAdapter,
}

impl NativeAdapter {
    pub(crate) fn new(adapter: IDXGIAdapter) -> Self {
        Self { adapter }
    }

    pub fn interface(&self) -> &IDXGIAdapter {
        &self.adapter
    }
}

impl RawAdapter<Native> for NativeAdapter {
    fn desc(&self) -> RawResult<AdapterDescriptor> {
        let desc = unsafe { self.adapter.GetDesc() }?;
        Ok(adapter_from_native(&desc))
    }

    fn enum_output(&self, index: u32) -> RawResult<NativeOutput> {
        let output = unsafe { self.adapter.EnumOutputs(index) }?;
        Ok(NativeOutput { output })
    }

    fn check_interface_support(&self, interface: DeviceInterface) -> RawResult<DriverVersion> {
        let iid = match interface {
            DeviceInterface::D3D10Device => ID3D10Device::IID,
        };
        let version = unsafe { self.adapter.CheckInterfaceSupport(&iid) }?;
        Ok(DriverVersion(version as u64))
    }

    fn set_private_data(&self, key: PrivateDataKey, data: &[u8]) -> RawResult<()> {
        let name = GUID::from_u128(key.0);
        let pointer = if data.is_empty() {
            std::ptr::null()
        } else {
            data.as_ptr().cast::<c_void>()
        };
        unsafe { self.adapter.SetPrivateData(&name, data.len() as u32, pointer) }?;
        Ok(())
    }

    fn private_data(&self, key: PrivateDataKey) -> RawResult<Vec<u8>> {
        let name = GUID::from_u128(key.0);
        let mut size = 0u32;
        // A size query first; DXGI_ERROR_NOT_FOUND when the key is absent.
        unsafe {
            self.adapter
                .GetPrivateData(&name, &mut size, std::ptr::null_mut())
        }?;
        let mut data = vec![0u8; size as usize];
        unsafe {
            self.adapter
                .GetPrivateData(&name, &mut size, data.as_mut_ptr().cast())
        }?;
        data.truncate(size as usize);
        Ok(data)
    }

    fn set_private_factory(
        &self,
        key: PrivateDataKey,
        factory: Option<&NativeFactory>,
    ) -> RawResult<()> {
        let name = GUID::from_u128(key.0);
        let unknown = factory
            .map(|factory| factory.factory.cast::<IUnknown>())
            .transpose()?;
        unsafe { self.adapter.SetPrivateDataInterface(&name, unknown.as_ref()) }?;
        Ok(())
    }

    fn private_factory(&self, key: PrivateDataKey) -> RawResult<NativeFactory> {
        let name = GUID::from_u128(key.0);
        let mut pointer: *mut c_void = std::ptr::null_mut();
        let mut size = size_of::<*mut c_void>() as u32;
        unsafe {
            self.adapter
                .GetPrivateData(&name, &mut size, (&raw mut pointer).cast())
        }?;
        if pointer.is_null() || size as usize != size_of::<*mut c_void>() {
            return Err(Status::DXGI_ERROR_INVALID_CALL);
        }
        // The runtime added a reference for us; the IUnknown now owns it.
        let unknown = unsafe { IUnknown::from_raw(pointer) };
        Ok(NativeFactory::new(unknown.cast()?))
    }

    fn parent(&self) -> RawResult<NativeFactory> {
        let factory: IDXGIFactory = unsafe { self.adapter.GetParent() }?;
        Ok(NativeFactory::new(factory))
    }
}

#[derive(Clone)]
pub struct NativeOutput {
    output: IDXGIOutput,
}

impl NativeOutput {
    pub(crate) fn new(output: IDXGIOutput) -> Self {
        Self { output }
    }

    pub fn interface(&self) -> &IDXGIOutput {
        &self.output
    }
}

impl RawOutput<Native> for NativeOutput {
    fn desc(&self) -> RawResult<OutputDescriptor> {
        let desc = unsafe { self.output.GetDesc() }?;
        Ok(output_from_native(&desc))
    }

    fn monitor_info(&self) -> RawResult<Option<MonitorInfo>> {
        let desc = unsafe { self.output.GetDesc() }?;
        if desc.Monitor.is_invalid() {
            return Ok(None);
        }
        let mut info = MONITORINFOEXW {
            monitorInfo: MONITORINFO {
                cbSize: std::mem::size_of::<MONITORINFOEXW>() as u32,
                ..Default::default()
            },
            ..Default::default()
        };
        if !unsafe { GetMonitorInfoW(desc.Monitor, (&mut info as *mut MONITORINFOEXW).cast()) }
            .as_bool()
        {
            return Err(last_error());
        }
        Ok(Some(MonitorInfo {
            device: wide_to_string(&info.szDevice),
            monitor: rect_from_native(&info.monitorInfo.rcMonitor),
            work_area: rect_from_native(&info.monitorInfo.rcWork),
            is_primary: info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY != 0,
        }))
    }

    fn display_modes(&self, format: Format) -> RawResult<Vec<DisplayMode>> {
        let format = format_to_native(format);
        let flags = DXGI_ENUM_MODES::default();
        let mut count = 0u32;
        unsafe { self.output.GetDisplayModeList(format, flags, &mut count, None) }?;
        let mut modes = vec![DXGI_MODE_DESC::default(); count as usize];
        unsafe {
            self.output
                .GetDisplayModeList(format, flags, &mut count, Some(modes.as_mut_ptr()))
        }?;
        modes.truncate(count as usize);
        Ok(modes.iter().map(mode_from_native).collect())
    }

    fn find_closest_matching_mode(
        &self,
        desired: &DisplayMode,
        concerned_device: Option<&NativeDevice>,
    ) -> RawResult<DisplayMode> {
        let desired = mode_to_native(desired);
        let concerned: Option<IUnknown> = concerned_device
            .map(|device| device.d3d().cast())
            .transpose()?;
        let mut closest = DXGI_MODE_DESC::default();
        unsafe {
            self.output
                .FindClosestMatchingMode(&desired, &mut closest, concerned.as_ref())
        }?;
        Ok(mode_from_native(&closest))
    }

    fn wait_for_vblank(&self) -> RawResult<()> {
        unsafe { self.output.WaitForVBlank() }?;
        Ok(())
    }
}

//! DXGI 1.0 and Direct3D 10 through the `windows` crate.
//!
//! Every handle is a COM reference; dropping it releases the reference.

mod convert;
mod device;
mod factory;
mod message_pump;
mod swap_chain;
mod window;
mod window_class;
mod window_class_id;

use windows::Win32::Foundation::GetLastError;
use windows::Win32::Graphics::Dxgi::CreateDXGIFactory;
use windows::Win32::Graphics::Dxgi::IDXGIFactory;
use windows::core::HRESULT;

pub use device::NativeDevice;
pub use device::NativeResource;
pub use factory::NativeAdapter;
pub use factory::NativeFactory;
pub use factory::NativeOutput;
pub use message_pump::MessagePump;
pub use swap_chain::NativeSwapChain;
pub use window::NativeWindow;

use crate::error::DxgiResult;
use crate::error::StatusContext;
use crate::platform::FactoryLocator;
use crate::platform::Subsystem;
use crate::status::RawResult;
use crate::status::Status;

/// Marker for the DXGI handle family.
pub enum Native {}

impl Subsystem for Native {
    type Factory = NativeFactory;
    type Adapter = NativeAdapter;
    type Output = NativeOutput;
    type Device = NativeDevice;
    type Resource = NativeResource;
    type SwapChain = NativeSwapChain;
    type Window = NativeWindow;
}

/// Finds the system DXGI factory through `CreateDXGIFactory`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeLocator;

impl FactoryLocator for NativeLocator {
    type Subsystem = Native;

    fn locate(&self) -> RawResult<NativeFactory> {
        let factory: IDXGIFactory = unsafe { CreateDXGIFactory() }?;
        Ok(NativeFactory::new(factory))
    }
}

impl From<HRESULT> for Status {
    fn from(result: HRESULT) -> Self {
        Status(result.0)
    }
}

impl From<windows::core::Error> for Status {
    fn from(error: windows::core::Error) -> Self {
        error.code().into()
    }
}

impl<T> StatusContext<T> for windows::core::Result<T> {
    fn call(self, call: &'static str) -> DxgiResult<T> {
        self.map_err(Status::from).call(call)
    }
}

/// The calling thread's last Win32 error as a status.
pub(crate) fn last_error() -> Status {
    unsafe { GetLastError() }.to_hresult().into()
}

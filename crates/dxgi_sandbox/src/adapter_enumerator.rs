use std::iter::FusedIterator;

use tracing::debug;

use crate::error::DxgiError;
use crate::error::DxgiResult;
use crate::error::StatusContext;
use crate::factory::Factory;
use crate::model::AdapterDescriptor;
use crate::model::DeviceInterface;
use crate::model::DriverVersion;
use crate::model::MonitorInfo;
use crate::model::OutputDescriptor;
use crate::model::PrivateDataKey;
use crate::platform::RawAdapter;
use crate::platform::RawFactory;
use crate::platform::RawOutput;
use crate::platform::Subsystem;
use crate::status::RawResult;
use crate::status::Status;

/// Index-until-sentinel walk shared by the adapter and output sequences.
struct SentinelCursor {
    what: &'static str,
    call: &'static str,
    next: u32,
    finished: bool,
}

impl SentinelCursor {
    const fn new(what: &'static str, call: &'static str) -> Self {
        Self {
            what,
            call,
            next: 0,
            finished: false,
        }
    }

    fn advance<T>(
        &mut self,
        query: impl FnOnce(u32) -> RawResult<T>,
    ) -> Option<DxgiResult<(u32, T)>> {
        if self.finished {
            return None;
        }
        let index = self.next;
        match query(index) {
            Ok(item) => {
                self.next += 1;
                Some(Ok((index, item)))
            }
            Err(Status::DXGI_ERROR_NOT_FOUND) => {
                debug!(what = self.what, count = index, "enumeration finished");
                self.finished = true;
                None
            }
            Err(status) => {
                self.finished = true;
                Some(Err(DxgiError::from_status(self.call, status)))
            }
        }
    }
}

/// Adapters in platform order. Ends at the first "not found"; a failure is
/// yielded once and also ends the sequence. Cannot be rewound.
pub struct Adapters<'f, S: Subsystem> {
    factory: &'f S::Factory,
    cursor: SentinelCursor,
}

impl<'f, S: Subsystem> Adapters<'f, S> {
    pub(crate) fn new(factory: &'f S::Factory) -> Self {
        Self {
            factory,
            cursor: SentinelCursor::new("adapter", "EnumAdapters"),
        }
    }
}

impl<S: Subsystem> Iterator for Adapters<'_, S> {
    type Item = DxgiResult<Adapter<S>>;

    fn next(&mut self) -> Option<Self::Item> {
        let factory = self.factory;
        self.cursor
            .advance(|index| factory.enum_adapter(index))
            .map(|step| step.map(|(index, raw)| Adapter::from_raw(raw, Some(index))))
    }
}

impl<S: Subsystem> FusedIterator for Adapters<'_, S> {}

pub struct Adapter<S: Subsystem> {
    raw: S::Adapter,
    index: Option<u32>,
}

impl<S: Subsystem> Adapter<S> {
    pub fn from_raw(raw: S::Adapter, index: Option<u32>) -> Self {
        Self { raw, index }
    }

    pub fn raw(&self) -> &S::Adapter {
        &self.raw
    }

    /// Position in the factory's enumeration, when it came from one.
    pub fn index(&self) -> Option<u32> {
        self.index
    }

    pub fn describe(&self) -> DxgiResult<AdapterDescriptor> {
        self.raw.desc().call("IDXGIAdapter::GetDesc")
    }

    pub fn list_outputs(&self) -> Outputs<'_, S> {
        Outputs {
            adapter: &self.raw,
            cursor: SentinelCursor::new("output", "EnumOutputs"),
        }
    }

    pub fn output(&self, index: u32) -> DxgiResult<Output<S>> {
        match self.raw.enum_output(index) {
            Ok(raw) => Ok(Output::from_raw(raw, Some(index))),
            Err(Status::DXGI_ERROR_NOT_FOUND) => Err(DxgiError::NotFound {
                what: "output",
                index,
            }),
            Err(status) => Err(DxgiError::from_status("EnumOutputs", status)),
        }
    }

    /// Only Direct3D 10 interfaces can be checked this way.
    pub fn check_interface_support(&self, interface: DeviceInterface) -> DxgiResult<DriverVersion> {
        self.raw
            .check_interface_support(interface)
            .call("CheckInterfaceSupport")
    }

    pub fn set_private_data(&self, key: PrivateDataKey, data: &[u8]) -> DxgiResult<()> {
        self.raw.set_private_data(key, data).call("SetPrivateData")
    }

    pub fn private_data(&self, key: PrivateDataKey) -> DxgiResult<Option<Vec<u8>>> {
        match self.raw.private_data(key) {
            Ok(data) => Ok(Some(data)),
            Err(Status::DXGI_ERROR_NOT_FOUND) => Ok(None),
            Err(status) => Err(DxgiError::from_status("GetPrivateData", status)),
        }
    }

    /// Stores a reference to `factory` under `key`; `None` drops it again.
    pub fn set_private_factory(
        &self,
        key: PrivateDataKey,
        factory: Option<&Factory<S>>,
    ) -> DxgiResult<()> {
        self.raw
            .set_private_factory(key, factory.map(Factory::raw))
            .call("SetPrivateDataInterface")
    }

    pub fn private_factory(&self, key: PrivateDataKey) -> DxgiResult<Option<Factory<S>>> {
        match self.raw.private_factory(key) {
            Ok(raw) => Ok(Some(Factory::from_raw(raw))),
            Err(Status::DXGI_ERROR_NOT_FOUND) => Ok(None),
            Err(status) => Err(DxgiError::from_status("GetPrivateData", status)),
        }
    }

    /// The factory this adapter was enumerated from.
    pub fn parent(&self) -> DxgiResult<Factory<S>> {
        let raw = self.raw.parent().call("IDXGIObject::GetParent")?;
        Ok(Factory::from_raw(raw))
    }
}

/// Outputs of one adapter, with the same contract as [`Adapters`].
pub struct Outputs<'a, S: Subsystem> {
    adapter: &'a S::Adapter,
    cursor: SentinelCursor,
}

impl<S: Subsystem> Iterator for Outputs<'_, S> {
    type Item = DxgiResult<Output<S>>;

    fn next(&mut self) -> Option<Self::Item> {
        let adapter = self.adapter;
        self.cursor
            .advance(|index| adapter.enum_output(index))
            .map(|step| step.map(|(index, raw)| Output::from_raw(raw, Some(index))))
    }
}

impl<S: Subsystem> FusedIterator for Outputs<'_, S> {}

pub struct Output<S: Subsystem> {
    raw: S::Output,
    index: Option<u32>,
}

impl<S: Subsystem> Output<S> {
    pub fn from_raw(raw: S::Output, index: Option<u32>) -> Self {
        Self { raw, index }
    }

    pub fn raw(&self) -> &S::Output {
        &self.raw
    }

    pub fn index(&self) -> Option<u32> {
        self.index
    }

    pub fn describe(&self) -> DxgiResult<OutputDescriptor> {
        self.raw.desc().call("IDXGIOutput::GetDesc")
    }

    pub fn monitor_info(&self) -> DxgiResult<Option<MonitorInfo>> {
        self.raw.monitor_info().call("GetMonitorInfo")
    }

    /// Blocks until the next vertical blank of this output.
    pub fn wait_for_vblank(&self) -> DxgiResult<()> {
        self.raw.wait_for_vblank().call("WaitForVBlank")
    }
}

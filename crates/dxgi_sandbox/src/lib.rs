//! Walks the DXGI 1.0 object graph (factory, adapters, outputs, devices,
//! resources, swap chains) and narrates what the platform reports.
//!
//! The walk is written once against [`platform::Subsystem`] and runs on the
//! real DXGI runtime (`native`, Windows only) or on a deterministic model of it
//! ([`simulated`]).

pub mod adapter_enumerator;
pub mod display_mode_matcher;
pub mod error;
pub mod factory;
pub mod model;
pub mod platform;
pub mod presentation_loop;
pub mod report;
pub mod resource_inspector;
pub mod simulated;
pub mod status;
pub mod swap_chain_manager;
pub mod tour;

#[cfg(windows)]
pub mod native;

pub use adapter_enumerator::Adapter;
pub use adapter_enumerator::Adapters;
pub use adapter_enumerator::Output;
pub use adapter_enumerator::Outputs;
pub use error::DeviceLostKind;
pub use error::DxgiError;
pub use error::DxgiResult;
pub use factory::Factory;
pub use presentation_loop::EventSource;
pub use presentation_loop::LoopExit;
pub use presentation_loop::LoopOptions;
pub use presentation_loop::LoopSummary;
pub use presentation_loop::run_presentation_loop;
pub use resource_inspector::Device;
pub use resource_inspector::MappedSurface;
pub use resource_inspector::Resource;
pub use status::Status;
pub use swap_chain_manager::BackBuffer;
pub use swap_chain_manager::PresentOutcome;
pub use swap_chain_manager::SwapChain;
pub use swap_chain_manager::Transition;

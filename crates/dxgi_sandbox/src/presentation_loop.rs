use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::error::DeviceLostKind;
use crate::error::DxgiError;
use crate::error::DxgiResult;
use crate::model::PresentFlags;
use crate::platform::Subsystem;
use crate::swap_chain_manager::PresentOutcome;
use crate::swap_chain_manager::SwapChain;

/// A blocking source of window-system events.
pub trait EventSource {
    type Event;

    /// Blocks until the next event. `None` means the application is exiting.
    fn next_event(&mut self) -> DxgiResult<Option<Self::Event>>;

    fn dispatch(&mut self, event: &Self::Event);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopOptions {
    pub sync_interval: u32,
    pub flags: PresentFlags,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            sync_interval: 0,
            flags: PresentFlags::empty(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopExit {
    /// The event source signalled application exit.
    Quit,
    /// The device is gone; rebuild the device and swap chain before presenting again.
    DeviceLost(DeviceLostKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopSummary {
    pub events: u64,
    pub presented: u64,
    pub occluded: u64,
    pub exit: LoopExit,
}

/// Waits for an event, dispatches it, presents once; repeats until the
/// event source runs dry or the device is lost.
pub fn run_presentation_loop<S, E>(
    events: &mut E,
    swap_chain: &mut SwapChain<S>,
    options: LoopOptions,
) -> DxgiResult<LoopSummary>
where
    S: Subsystem,
    E: EventSource,
{
    let mut summary = LoopSummary {
        events: 0,
        presented: 0,
        occluded: 0,
        exit: LoopExit::Quit,
    };

    while let Some(event) = events.next_event()? {
        events.dispatch(&event);
        summary.events += 1;

        match swap_chain.present(options.sync_interval, options.flags) {
            Ok(PresentOutcome::Presented) => summary.presented += 1,
            Ok(PresentOutcome::Occluded) => {
                debug!(event = summary.events, "window occluded, presenting again next event");
                summary.occluded += 1;
            }
            Err(DxgiError::DeviceLost { kind, status, .. }) => {
                warn!(%kind, %status, "leaving presentation loop, device lost");
                summary.exit = LoopExit::DeviceLost(kind);
                return Ok(summary);
            }
            Err(error) => return Err(error),
        }
    }

    info!(
        events = summary.events,
        presented = summary.presented,
        occluded = summary.occluded,
        "presentation loop finished"
    );
    Ok(summary)
}

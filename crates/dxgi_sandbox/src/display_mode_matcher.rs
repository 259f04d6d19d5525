//! Display mode queries. The platform does the matching; nothing here
//! second-guesses its answer.

use tracing::debug;

use crate::adapter_enumerator::Output;
use crate::error::DxgiResult;
use crate::error::StatusContext;
use crate::model::DisplayMode;
use crate::model::Format;
use crate::platform::RawOutput;
use crate::platform::Subsystem;
use crate::resource_inspector::Device;

impl<S: Subsystem> Output<S> {
    /// Modes this output supports for `format`, in platform order.
    pub fn display_modes(&self, format: Format) -> DxgiResult<Vec<DisplayMode>> {
        let modes = self
            .raw()
            .display_modes(format)
            .call("GetDisplayModeList")?;
        debug!(%format, count = modes.len(), "display modes listed");
        Ok(modes)
    }

    /// Asks the output for the supported mode closest to `desired`.
    ///
    /// `concerned` restricts matching to what that device's adapter can
    /// scan out and is required when `desired.format` is `Format::UNKNOWN`.
    /// Zero sizes, a `0/0` refresh rate and unspecified scaling or scanline
    /// order leave those fields to the platform.
    pub fn find_closest_mode(
        &self,
        desired: &DisplayMode,
        concerned: Option<&Device<S>>,
    ) -> DxgiResult<DisplayMode> {
        let closest = self
            .raw()
            .find_closest_matching_mode(desired, concerned.map(Device::raw))
            .call("FindClosestMatchingMode")?;
        debug!(desired = %desired, closest = %closest, "closest display mode");
        Ok(closest)
    }
}

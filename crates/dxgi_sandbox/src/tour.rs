//! The console walk through the object graph. Every step prints what the
//! platform answered through [`crate::report`].

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::error::DxgiResult;
use crate::factory::Factory;
use crate::model::DeviceInterface;
use crate::model::DeviceOptions;
use crate::model::DisplayMode;
use crate::model::DriverType;
use crate::model::Format;
use crate::model::MapFlags;
use crate::model::PrivateDataKey;
use crate::model::ResizeBuffers;
use crate::model::Scaling;
use crate::model::ScanlineOrder;
use crate::model::SwapChainConfig;
use crate::model::TextureDesc;
use crate::model::WindowAssociation;
use crate::platform::FactoryLocator;
use crate::platform::Subsystem;
use crate::presentation_loop::EventSource;
use crate::presentation_loop::LoopExit;
use crate::presentation_loop::LoopOptions;
use crate::presentation_loop::LoopSummary;
use crate::presentation_loop::run_presentation_loop;
use crate::report;
use crate::resource_inspector::Device;
use crate::resource_inspector::Resource;
use crate::status::Status;
use crate::swap_chain_manager::SwapChain;
use crate::swap_chain_manager::Transition;

/// Key the tour stores its private data under.
const TOUR_DATA_KEY: PrivateDataKey = PrivateDataKey(0x6478_6769_2d73_616e_6462_6f78_2d74_6f75);
const TOUR_DATA: &[u8] = b"foobar";
const TOUR_FACTORY_KEY: PrivateDataKey = PrivateDataKey(0x6478_6769_2d73_616e_6462_6f78_2d66_6163);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TourOptions {
    pub width: u32,
    pub height: u32,
    pub format: Format,
    pub device: DeviceOptions,
    /// Tries per fullscreen transition before giving up and staying put.
    pub fullscreen_attempts: u32,
    /// How many times a lost device is rebuilt before the loop gives up.
    pub rebuilds: u32,
    pub presentation: LoopOptions,
}

impl Default for TourOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            format: Format::R8G8B8A8_UNORM,
            device: DeviceOptions {
                driver: DriverType::Hardware,
                debug: cfg!(debug_assertions),
            },
            fullscreen_attempts: 3,
            rebuilds: 1,
            presentation: LoopOptions::default(),
        }
    }
}

impl TourOptions {
    /// The mode the tour asks every output about.
    pub fn desired_mode(&self) -> DisplayMode {
        DisplayMode {
            scaling: Scaling::Centered,
            scanline_order: ScanlineOrder::Progressive,
            ..DisplayMode::sized(self.width, self.height, self.format)
        }
    }
}

/// Prints every adapter and its outputs. Returns how many adapters were found.
pub fn list_adapters<S: Subsystem>(factory: &Factory<S>) -> DxgiResult<usize> {
    let mut count = 0;
    for adapter in factory.list_adapters() {
        let adapter = adapter?;
        let desc = adapter.describe()?;
        let driver = match adapter.check_interface_support(DeviceInterface::D3D10Device) {
            Ok(version) => Some(version),
            Err(error) if error.status() == Some(Status::DXGI_ERROR_UNSUPPORTED) => None,
            Err(error) => return Err(error),
        };
        print!("{}", report::adapter(&desc, driver));

        for output in adapter.list_outputs() {
            let output = output?;
            let monitor = output.monitor_info()?;
            print!("{}", report::output(&output.describe()?, monitor.as_ref()));
            output.wait_for_vblank()?;
        }
        count += 1;
    }
    info!(count, "adapters listed");
    Ok(count)
}

/// Prints the modes of every output for the configured format, and the one
/// closest to the configured size.
pub fn list_modes<S: Subsystem>(factory: &Factory<S>, options: &TourOptions) -> DxgiResult<()> {
    let desired = options.desired_mode();
    for adapter in factory.list_adapters() {
        let adapter = adapter?;
        for output in adapter.list_outputs() {
            let output = output?;
            let modes = output.display_modes(options.format)?;
            println!("{}", output.describe()?.device_name);
            print!("{}", report::display_modes(options.format, &modes));
            if modes.is_empty() {
                continue;
            }
            let closest = output.find_closest_mode(&desired, None)?;
            print!("{}", report::closest_mode(&desired, &closest));
        }
    }
    Ok(())
}

/// Creates the device and a CPU-writable texture, then pokes at the adapter,
/// the device, the resource and the surface in turn.
pub fn inspect_device<S: Subsystem>(
    factory: &Factory<S>,
    options: &TourOptions,
) -> DxgiResult<(Device<S>, Resource<S>)> {
    let device = factory.create_device(None, options.device)?;
    let mut texture =
        device.create_texture(&TextureDesc::staging(options.width, options.height, options.format))?;

    let adapter = device.adapter()?;
    adapter.set_private_data(TOUR_DATA_KEY, TOUR_DATA)?;
    let data = adapter.private_data(TOUR_DATA_KEY)?.unwrap_or_default();
    println!("data: {}", String::from_utf8_lossy(&data));

    adapter.set_private_factory(TOUR_FACTORY_KEY, Some(factory))?;
    let attached = adapter.private_factory(TOUR_FACTORY_KEY)?;
    let same = attached.is_some_and(|attached| attached.is_same_object(factory));
    println!("same-interface: {}", if same { "yes" } else { "no" });
    adapter.set_private_factory(TOUR_FACTORY_KEY, None)?;

    // Devices made without an explicit adapter may sit under a factory of
    // their own.
    let parent = adapter.parent()?;
    println!(
        "parent-factory: {}",
        if parent.is_same_object(factory) { "located" } else { "other" }
    );

    let priority = device.gpu_priority()?;
    device.set_gpu_priority(priority)?;
    let residency = device.query_residency(&[&texture])?;
    print!(
        "{}",
        report::device(Some(&adapter.describe()?), priority, &residency)
    );

    let eviction = texture.eviction_priority()?;
    texture.set_eviction_priority(eviction)?;
    print!(
        "{}",
        report::resource(texture.has_shared_handle()?, texture.usage()?, eviction)
    );

    print!("{}", report::surface(&texture.surface_desc()?));
    let mut mapped = texture.map(MapFlags::WRITE)?;
    let pitch = mapped.pitch() as usize;
    // One opaque white row is enough to prove the CPU can write.
    mapped.bytes_mut()[..pitch].fill(0xFF);
    mapped.unmap()?;

    Ok((device, texture))
}

/// Calls `attempt` until the transition completes or `attempts` run out.
/// Returns the last outcome; a still-deferred transition is not an error.
pub fn retry_transition(
    attempts: u32,
    mut attempt: impl FnMut() -> DxgiResult<Transition>,
) -> DxgiResult<Transition> {
    let mut outcome = attempt()?;
    for retry in 1..attempts {
        let Transition::Deferred(status) = outcome else {
            break;
        };
        debug!(retry, %status, "retrying deferred fullscreen transition");
        outcome = attempt()?;
    }
    Ok(outcome)
}

/// Creates a swap chain for `window` and runs it through fullscreen and back.
pub fn exercise_swap_chain<S: Subsystem>(
    factory: &Factory<S>,
    device: &Device<S>,
    window: &S::Window,
    options: &TourOptions,
) -> DxgiResult<SwapChain<S>> {
    let config = SwapChainConfig::windowed(options.width, options.height, options.format);
    let mut swap_chain = factory.create_swap_chain(&config, device, window)?;

    factory.make_window_association(window, WindowAssociation::NO_ALT_ENTER)?;
    let associated = factory.window_association()?;
    println!("found-window: {}", if associated.is_some() { "yes" } else { "no" });

    let desc = swap_chain.describe()?;
    print!("{}", report::swap_chain(&desc));
    {
        let buffer = swap_chain.buffer(0)?;
        debug!(index = buffer.index(), usage = %buffer.usage()?, "back buffer borrowed");
    }

    let output = swap_chain.containing_output()?;
    let entered = retry_transition(options.fullscreen_attempts, || {
        swap_chain.enter_fullscreen(Some(&output))
    })?;
    if let Transition::Deferred(status) = entered {
        warn!(%status, "fullscreen stayed out of reach, carrying on windowed");
    }

    match swap_chain.frame_statistics() {
        Ok(stats) => print!("{}", report::frame_statistics(&stats)),
        Err(error) => info!(%error, "frame statistics unavailable"),
    }
    let state = swap_chain.refresh_state()?;
    print!(
        "{}",
        report::fullscreen(state, swap_chain.last_present_count()?)
    );

    if state.is_fullscreen() {
        let left = retry_transition(options.fullscreen_attempts, || swap_chain.exit_fullscreen())?;
        if let Transition::Deferred(status) = left {
            warn!(%status, "could not leave fullscreen yet");
        }
    }

    let target = DisplayMode {
        width: 1024,
        height: 768,
        ..desc.config.buffer_mode()
    };
    swap_chain.resize_target(&target)?;
    // Zero sizes pick up the new client area.
    swap_chain.resize_buffers(ResizeBuffers::default())?;
    Ok(swap_chain)
}

/// The whole walk: device, enumeration, swap chain, then presenting once per
/// event until the events run out. A lost device is rebuilt up to
/// `options.rebuilds` times, each time from a freshly located factory.
pub fn run<L, E>(
    locator: &L,
    window: &<L::Subsystem as Subsystem>::Window,
    events: &mut E,
    options: &TourOptions,
) -> DxgiResult<LoopSummary>
where
    L: FactoryLocator,
    E: EventSource,
{
    let factory = Factory::locate(locator)?;
    let (device, texture) = inspect_device(&factory, options)?;
    list_adapters(&factory)?;
    list_modes(&factory, options)?;
    let mut swap_chain = exercise_swap_chain(&factory, &device, window, options)?;
    drop(texture);
    drop(device);

    let mut total = LoopSummary {
        events: 0,
        presented: 0,
        occluded: 0,
        exit: LoopExit::Quit,
    };
    let mut rebuilds = 0;
    loop {
        let summary = run_presentation_loop(events, &mut swap_chain, options.presentation)?;
        total.events += summary.events;
        total.presented += summary.presented;
        total.occluded += summary.occluded;
        total.exit = summary.exit;

        let LoopExit::DeviceLost(kind) = summary.exit else {
            break;
        };
        if rebuilds == options.rebuilds {
            warn!(%kind, rebuilds, "device lost again, giving up");
            break;
        }
        rebuilds += 1;
        info!(%kind, rebuilds, "rebuilding factory, device and swap chain");
        // The swap chain is the last holder of the lost device.
        drop(swap_chain);
        swap_chain = rebuild(locator, window, options)?;
    }

    print!("{}", report::presentation(&total));
    Ok(total)
}

/// Binds to whatever adapters the system has now, not the ones the previous
/// factory saw.
fn rebuild<L: FactoryLocator>(
    locator: &L,
    window: &<L::Subsystem as Subsystem>::Window,
    options: &TourOptions,
) -> DxgiResult<SwapChain<L::Subsystem>> {
    let factory = Factory::locate(locator)?;
    let device = factory.create_device(None, options.device)?;
    let adapter = device.adapter()?.describe()?;
    debug!(adapter = %adapter.description, "device rebuilt");
    let config = SwapChainConfig::windowed(options.width, options.height, options.format);
    let swap_chain = factory.create_swap_chain(&config, &device, window)?;
    factory.make_window_association(window, WindowAssociation::NO_ALT_ENTER)?;
    Ok(swap_chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeviceLostKind;
    use crate::error::DxgiError;
    use crate::simulated::AdapterSpec;
    use crate::simulated::ScriptedEvents;
    use crate::simulated::SimEvent;
    use crate::simulated::SimCall;
    use crate::simulated::Simulated;
    use crate::simulated::SimulatedSystem;

    fn locate(system: &SimulatedSystem) -> Factory<Simulated> {
        Factory::locate(system).unwrap()
    }

    #[test]
    fn retry_stops_at_the_first_completion() {
        let mut calls = 0;
        let outcome = retry_transition(5, || {
            calls += 1;
            Ok(if calls < 3 {
                Transition::Deferred(Status::DXGI_STATUS_MODE_CHANGE_IN_PROGRESS)
            } else {
                Transition::Completed
            })
        })
        .unwrap();
        assert_eq!(outcome, Transition::Completed);
        assert_eq!(calls, 3);
    }

    #[test]
    fn retry_gives_back_the_last_deferral() {
        let mut calls = 0;
        let outcome = retry_transition(2, || {
            calls += 1;
            Ok(Transition::Deferred(Status::DXGI_ERROR_NOT_CURRENTLY_AVAILABLE))
        })
        .unwrap();
        assert_eq!(
            outcome,
            Transition::Deferred(Status::DXGI_ERROR_NOT_CURRENTLY_AVAILABLE)
        );
        assert_eq!(calls, 2);
    }

    #[test]
    fn retry_always_makes_one_attempt() {
        let mut calls = 0;
        retry_transition(0, || {
            calls += 1;
            Ok(Transition::Completed)
        })
        .unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn adapters_are_counted() {
        let system = SimulatedSystem::new();
        assert_eq!(list_adapters(&locate(&system)).unwrap(), system.adapter_count());
    }

    #[test]
    fn device_inspection_writes_the_texture() {
        let system = SimulatedSystem::new();
        let factory = locate(&system);
        let (device, texture) = inspect_device(&factory, &TourOptions::default()).unwrap();
        let contents = texture.raw().contents().unwrap();
        assert_eq!(contents[0], 0xFF);
        assert!(!texture.raw().is_mapped());

        let adapter = device.adapter().unwrap();
        assert_eq!(adapter.private_data(TOUR_DATA_KEY).unwrap().as_deref(), Some(TOUR_DATA));
        assert!(adapter.private_factory(TOUR_FACTORY_KEY).unwrap().is_none());
    }

    #[test]
    fn swap_chain_ends_windowed_at_the_new_size() {
        let system = SimulatedSystem::new();
        let factory = locate(&system);
        let window = system.create_window(800, 600);
        let options = TourOptions::default();
        let (device, _texture) = inspect_device(&factory, &options).unwrap();
        let swap_chain = exercise_swap_chain(&factory, &device, &window, &options).unwrap();

        assert!(!swap_chain.state().is_fullscreen());
        assert!(!system.fullscreen_claimed());
        assert_eq!(window.client_size(), (1024, 768));
        let desc = swap_chain.describe().unwrap();
        assert_eq!((desc.config.width, desc.config.height), (1024, 768));
    }

    #[test]
    fn contended_fullscreen_is_retried() {
        let system = SimulatedSystem::new();
        let factory = locate(&system);
        let window = system.create_window(800, 600);
        let options = TourOptions::default();
        let (device, _texture) = inspect_device(&factory, &options).unwrap();
        system.inject(
            SimCall::SetFullscreenState,
            Status::DXGI_STATUS_MODE_CHANGE_IN_PROGRESS,
        );
        exercise_swap_chain(&factory, &device, &window, &options).unwrap();
        assert_eq!(system.pending(SimCall::SetFullscreenState), 0);
    }

    #[test]
    fn the_tour_presents_once_per_event() {
        let system = SimulatedSystem::new();
        let window = system.create_window(800, 600);
        let mut events = ScriptedEvents::frames(4);
        let summary = run(&system, &window, &mut events, &TourOptions::default()).unwrap();
        assert_eq!(summary.exit, LoopExit::Quit);
        assert_eq!(summary.events, 5);
        assert_eq!(summary.presented, 5);
    }

    #[test]
    fn a_lost_device_is_rebuilt_once() {
        let system = SimulatedSystem::new();
        let window = system.create_window(800, 600);
        let mut events = ScriptedEvents::frames(4);
        system.inject(SimCall::Present, Status::DXGI_ERROR_DEVICE_REMOVED);
        let summary = run(&system, &window, &mut events, &TourOptions::default()).unwrap();
        assert_eq!(summary.exit, LoopExit::Quit);
        assert_eq!(summary.events, 5);
        assert_eq!(summary.presented, 4);

        let mut events = ScriptedEvents::frames(4);
        system.inject(SimCall::Present, Status::DXGI_ERROR_DEVICE_RESET);
        system.inject(SimCall::Present, Status::DXGI_ERROR_DEVICE_RESET);
        let summary = run(&system, &window, &mut events, &TourOptions::default()).unwrap();
        assert_eq!(summary.exit, LoopExit::DeviceLost(DeviceLostKind::Reset));
    }

    /// Unplugs the first adapter while the first event is dispatched.
    struct UnplugOnFirstEvent<'a> {
        system: &'a SimulatedSystem,
        events: ScriptedEvents,
    }

    impl EventSource for UnplugOnFirstEvent<'_> {
        type Event = SimEvent;

        fn next_event(&mut self) -> DxgiResult<Option<SimEvent>> {
            self.events.next_event()
        }

        fn dispatch(&mut self, event: &SimEvent) {
            if self.events.dispatched().is_empty() {
                self.system.remove_adapter(0);
            }
            self.events.dispatch(event);
        }
    }

    #[test]
    fn a_rebuild_sees_the_adapters_present_now() {
        let system = SimulatedSystem::new();
        let window = system.create_window(800, 600);
        let mut events = UnplugOnFirstEvent {
            system: &system,
            events: ScriptedEvents::frames(4),
        };
        system.inject(SimCall::Present, Status::DXGI_ERROR_DEVICE_REMOVED);

        // Only the software adapter is left, so no hardware device can be made.
        let error = run(&system, &window, &mut events, &TourOptions::default()).unwrap_err();
        match error {
            DxgiError::Platform { call, status } => {
                assert_eq!(call, "D3D10CreateDevice");
                assert_eq!(status, Status::DXGI_ERROR_UNSUPPORTED);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn a_rebuild_moves_to_a_replacement_adapter() {
        let system = SimulatedSystem::new();
        let window = system.create_window(800, 600);
        let mut events = UnplugOnFirstEvent {
            system: &system,
            events: ScriptedEvents::frames(4),
        };
        system.install_adapter(AdapterSpec::hardware("Replacement GPU"));
        system.inject(SimCall::Present, Status::DXGI_ERROR_DEVICE_REMOVED);

        let summary = run(&system, &window, &mut events, &TourOptions::default()).unwrap();
        assert_eq!(summary.exit, LoopExit::Quit);
        assert_eq!(summary.presented, 4);
        assert_eq!(system.adapter_count(), 2);
    }
}

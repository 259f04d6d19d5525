use dxgi_sandbox::DxgiError;
use dxgi_sandbox::DxgiResult;
use dxgi_sandbox::EventSource;
use dxgi_sandbox::Factory;
use dxgi_sandbox::LoopExit;
use dxgi_sandbox::LoopOptions;
use dxgi_sandbox::Status;
use dxgi_sandbox::SwapChain;
use dxgi_sandbox::error::DeviceLostKind;
use dxgi_sandbox::model::DeviceOptions;
use dxgi_sandbox::model::Format;
use dxgi_sandbox::model::SwapChainConfig;
use dxgi_sandbox::run_presentation_loop;
use dxgi_sandbox::simulated::ScriptedEvents;
use dxgi_sandbox::simulated::SimCall;
use dxgi_sandbox::simulated::SimEvent;
use dxgi_sandbox::simulated::Simulated;
use dxgi_sandbox::simulated::SimulatedSystem;

fn swap_chain(system: &SimulatedSystem) -> SwapChain<Simulated> {
    let factory = Factory::locate(system).unwrap();
    let device = factory.create_device(None, DeviceOptions::default()).unwrap();
    let window = system.create_window(640, 480);
    let config = SwapChainConfig::windowed(0, 0, Format::B8G8R8A8_UNORM);
    factory.create_swap_chain(&config, &device, &window).unwrap()
}

#[test]
fn one_present_per_event_until_quit() {
    let system = SimulatedSystem::new();
    let mut swap_chain = swap_chain(&system);
    let mut events = ScriptedEvents::new([SimEvent::Paint, SimEvent::Key(0x20), SimEvent::Close]);

    let summary = run_presentation_loop(&mut events, &mut swap_chain, LoopOptions::default()).unwrap();
    assert_eq!(summary.exit, LoopExit::Quit);
    assert_eq!(summary.events, 3);
    assert_eq!(summary.presented, 3);
    assert_eq!(summary.occluded, 0);
    assert_eq!(events.dispatched().len(), 3);
    assert_eq!(swap_chain.last_present_count().unwrap(), 3);
}

#[test]
fn occlusion_does_not_stop_the_loop() {
    let system = SimulatedSystem::new();
    let mut swap_chain = swap_chain(&system);
    system.inject(SimCall::Present, Status::DXGI_STATUS_OCCLUDED);
    system.inject(SimCall::Present, Status::DXGI_STATUS_OCCLUDED);
    let mut events = ScriptedEvents::frames(4);

    let summary = run_presentation_loop(&mut events, &mut swap_chain, LoopOptions::default()).unwrap();
    assert_eq!(summary.exit, LoopExit::Quit);
    assert_eq!(summary.events, 5);
    assert_eq!(summary.occluded, 2);
    assert_eq!(summary.presented, 3);
}

#[test]
fn device_loss_ends_the_loop_for_a_rebuild() {
    let system = SimulatedSystem::new();
    let mut swap_chain = swap_chain(&system);
    system.inject(SimCall::Present, Status::OK);
    system.inject(SimCall::Present, Status::DXGI_ERROR_DEVICE_RESET);
    let mut events = ScriptedEvents::frames(10);

    let summary = run_presentation_loop(&mut events, &mut swap_chain, LoopOptions::default()).unwrap();
    assert_eq!(summary.exit, LoopExit::DeviceLost(DeviceLostKind::Reset));
    assert_eq!(summary.events, 2);
    assert_eq!(summary.presented, 1);
}

#[test]
fn other_present_failures_are_returned() {
    let system = SimulatedSystem::new();
    let mut swap_chain = swap_chain(&system);
    system.inject(SimCall::Present, Status::E_FAIL);
    let mut events = ScriptedEvents::frames(2);

    let error = run_presentation_loop(&mut events, &mut swap_chain, LoopOptions::default())
        .unwrap_err();
    assert!(matches!(error, DxgiError::Platform { call: "Present", .. }));
}

#[test]
fn an_out_of_range_sync_interval_fails_the_first_frame() {
    let system = SimulatedSystem::new();
    let mut swap_chain = swap_chain(&system);
    let mut events = ScriptedEvents::frames(1);
    let options = LoopOptions {
        sync_interval: 9,
        ..LoopOptions::default()
    };
    let error = run_presentation_loop(&mut events, &mut swap_chain, options).unwrap_err();
    assert!(matches!(error, DxgiError::Range { .. }));
}

/// Fails the way a broken message queue would.
struct BrokenQueue;

impl EventSource for BrokenQueue {
    type Event = ();

    fn next_event(&mut self) -> DxgiResult<Option<()>> {
        Err(DxgiError::from_status("GetMessageW", Status::E_FAIL))
    }

    fn dispatch(&mut self, _event: &()) {}
}

#[test]
fn event_source_failures_propagate() {
    let system = SimulatedSystem::new();
    let mut swap_chain = swap_chain(&system);
    let error = run_presentation_loop(&mut BrokenQueue, &mut swap_chain, LoopOptions::default())
        .unwrap_err();
    assert_eq!(error.status(), Some(Status::E_FAIL));
    assert_eq!(swap_chain.last_present_count().unwrap(), 0);
}

use dxgi_sandbox::Device;
use dxgi_sandbox::DxgiError;
use dxgi_sandbox::Factory;
use dxgi_sandbox::PresentOutcome;
use dxgi_sandbox::Status;
use dxgi_sandbox::SwapChain;
use dxgi_sandbox::Transition;
use dxgi_sandbox::error::DeviceLostKind;
use dxgi_sandbox::model::DeviceOptions;
use dxgi_sandbox::model::DisplayState;
use dxgi_sandbox::model::Format;
use dxgi_sandbox::model::PresentFlags;
use dxgi_sandbox::model::Rational;
use dxgi_sandbox::model::ResizeBuffers;
use dxgi_sandbox::model::SwapChainConfig;
use dxgi_sandbox::model::SwapEffect;
use dxgi_sandbox::model::Usage;
use dxgi_sandbox::model::WindowAssociation;
use dxgi_sandbox::platform::RawSwapChain;
use dxgi_sandbox::platform::RawWindow;
use dxgi_sandbox::simulated::SimCall;
use dxgi_sandbox::simulated::SimWindow;
use dxgi_sandbox::simulated::Simulated;
use dxgi_sandbox::simulated::SimulatedSystem;

struct Rig {
    system: SimulatedSystem,
    factory: Factory<Simulated>,
    device: Device<Simulated>,
    window: SimWindow,
}

impl Rig {
    fn new() -> Self {
        let system = SimulatedSystem::new();
        let factory = Factory::locate(&system).unwrap();
        let device = factory.create_device(None, DeviceOptions::default()).unwrap();
        let window = system.create_window(800, 600);
        Self {
            system,
            factory,
            device,
            window,
        }
    }

    fn swap_chain(&self, config: &SwapChainConfig) -> SwapChain<Simulated> {
        self.factory
            .create_swap_chain(config, &self.device, &self.window)
            .unwrap()
    }
}

fn sample_config() -> SwapChainConfig {
    SwapChainConfig {
        buffer_count: 2,
        refresh_rate: Rational::new(60, 1),
        swap_effect: SwapEffect::FlipSequential,
        windowed: true,
        ..SwapChainConfig::windowed(800, 600, Format::R8G8B8A8_UNORM)
    }
}

#[test]
fn describe_echoes_the_requested_buffers() {
    let rig = Rig::new();
    let swap_chain = rig.swap_chain(&sample_config());
    let desc = swap_chain.describe().unwrap();
    assert_eq!(desc.config.width, 800);
    assert_eq!(desc.config.height, 600);
    assert_eq!(desc.config.buffer_count, 2);
    assert_eq!(desc.window, rig.window.id());
}

#[test]
fn fullscreen_round_trip_keeps_the_buffers() {
    let rig = Rig::new();
    let mut swap_chain = rig.swap_chain(&sample_config());
    assert_eq!(swap_chain.state(), DisplayState::Windowed);
    let before = swap_chain.describe().unwrap().config;

    assert_eq!(swap_chain.enter_fullscreen(None).unwrap(), Transition::Completed);
    assert_eq!(swap_chain.state(), DisplayState::Fullscreen);
    assert!(rig.system.fullscreen_claimed());

    assert_eq!(swap_chain.exit_fullscreen().unwrap(), Transition::Completed);
    assert_eq!(swap_chain.state(), DisplayState::Windowed);
    assert_eq!(swap_chain.describe().unwrap().config, before);
    assert!(!rig.system.fullscreen_claimed());
}

#[test]
fn a_fullscreen_config_starts_fullscreen() {
    let rig = Rig::new();
    let config = SwapChainConfig {
        windowed: false,
        ..sample_config()
    };
    let mut swap_chain = rig.swap_chain(&config);
    assert_eq!(swap_chain.state(), DisplayState::Fullscreen);
    assert_eq!(swap_chain.refresh_state().unwrap(), DisplayState::Fullscreen);
    assert!(swap_chain.fullscreen_output().unwrap().is_some());
}

#[test]
fn a_deferred_fullscreen_start_is_tracked_as_windowed() {
    let rig = Rig::new();
    rig.system.inject(
        SimCall::SetFullscreenState,
        Status::DXGI_STATUS_MODE_CHANGE_IN_PROGRESS,
    );
    let config = SwapChainConfig {
        windowed: false,
        ..sample_config()
    };
    let mut swap_chain = rig.swap_chain(&config);
    assert_eq!(swap_chain.state(), DisplayState::Windowed);
    assert_eq!(swap_chain.refresh_state().unwrap(), DisplayState::Windowed);
    assert!(!rig.system.fullscreen_claimed());
}

#[test]
fn a_deferred_transition_leaves_the_state_alone() {
    let rig = Rig::new();
    let mut swap_chain = rig.swap_chain(&sample_config());
    rig.system.inject(
        SimCall::SetFullscreenState,
        Status::DXGI_STATUS_MODE_CHANGE_IN_PROGRESS,
    );
    assert_eq!(
        swap_chain.enter_fullscreen(None).unwrap(),
        Transition::Deferred(Status::DXGI_STATUS_MODE_CHANGE_IN_PROGRESS)
    );
    assert_eq!(swap_chain.state(), DisplayState::Windowed);
    assert_eq!(swap_chain.enter_fullscreen(None).unwrap(), Transition::Completed);
}

#[test]
fn only_one_swap_chain_owns_fullscreen() {
    let rig = Rig::new();
    let mut first = rig.swap_chain(&sample_config());
    let other_window = rig.system.create_window(640, 480);
    let mut second = rig
        .factory
        .create_swap_chain(&sample_config(), &rig.device, &other_window)
        .unwrap();

    assert_eq!(first.enter_fullscreen(None).unwrap(), Transition::Completed);
    assert_eq!(
        second.enter_fullscreen(None).unwrap(),
        Transition::Deferred(Status::DXGI_ERROR_NOT_CURRENTLY_AVAILABLE)
    );
    drop(first);
    assert_eq!(second.enter_fullscreen(None).unwrap(), Transition::Completed);
}

#[test]
fn fullscreen_on_another_adapters_output_is_refused() {
    let rig = Rig::new();
    let warp = rig
        .factory
        .create_device(
            None,
            DeviceOptions {
                driver: dxgi_sandbox::model::DriverType::Warp,
                debug: false,
            },
        )
        .unwrap();
    let mut swap_chain = rig
        .factory
        .create_swap_chain(&sample_config(), &warp, &rig.window)
        .unwrap();
    let output = rig.factory.adapter(0).unwrap().output(0).unwrap();
    let error = swap_chain.enter_fullscreen(Some(&output)).unwrap_err();
    assert_eq!(error.status(), Some(Status::DXGI_ERROR_INVALID_CALL));
    assert_eq!(swap_chain.state(), DisplayState::Windowed);
}

#[test]
fn resizing_waits_for_back_buffers_to_be_released() {
    let rig = Rig::new();
    let mut swap_chain = rig.swap_chain(&sample_config());
    {
        let buffer = swap_chain.buffer(1).unwrap();
        assert!(buffer.usage().unwrap().contains(Usage::BACK_BUFFER));
        assert_eq!(buffer.index(), 1);
    }
    swap_chain
        .resize_buffers(ResizeBuffers {
            width: 1280,
            height: 720,
            ..ResizeBuffers::default()
        })
        .unwrap();
    assert_eq!((swap_chain.config().width, swap_chain.config().height), (1280, 720));
    assert_eq!(swap_chain.buffer(0).unwrap().surface_desc().unwrap().width, 1280);
}

#[test]
fn the_platform_refuses_a_resize_while_raw_buffers_live() {
    let rig = Rig::new();
    let swap_chain = rig.swap_chain(&sample_config());
    let raw_buffer = swap_chain.raw().buffer(0).unwrap();
    assert_eq!(
        swap_chain.raw().resize_buffers(&ResizeBuffers::default()),
        Err(Status::DXGI_ERROR_INVALID_CALL)
    );
    drop(raw_buffer);
    assert_eq!(swap_chain.raw().resize_buffers(&ResizeBuffers::default()), Ok(()));
}

#[test]
fn resize_target_moves_the_window() {
    let rig = Rig::new();
    let mut swap_chain = rig.swap_chain(&sample_config());
    let mode = dxgi_sandbox::model::DisplayMode {
        width: 1024,
        height: 768,
        ..swap_chain.config().buffer_mode()
    };
    swap_chain.resize_target(&mode).unwrap();
    assert_eq!(rig.window.client_size(), (1024, 768));
}

#[test]
fn presents_are_counted_and_classified() {
    let rig = Rig::new();
    let mut swap_chain = rig.swap_chain(&sample_config());
    assert_eq!(
        swap_chain.present(0, PresentFlags::empty()).unwrap(),
        PresentOutcome::Presented
    );
    assert_eq!(
        swap_chain.present(1, PresentFlags::TEST).unwrap(),
        PresentOutcome::Presented
    );
    rig.system.inject(SimCall::Present, Status::DXGI_STATUS_OCCLUDED);
    assert_eq!(
        swap_chain.present(0, PresentFlags::empty()).unwrap(),
        PresentOutcome::Occluded
    );
    assert_eq!(swap_chain.last_present_count().unwrap(), 1);
    assert!(matches!(
        swap_chain.present(5, PresentFlags::empty()),
        Err(DxgiError::Range { .. })
    ));

    rig.system.inject(SimCall::Present, Status::DXGI_ERROR_DEVICE_HUNG);
    match swap_chain.present(0, PresentFlags::empty()) {
        Err(DxgiError::DeviceLost { kind, .. }) => assert_eq!(kind, DeviceLostKind::Hung),
        other => panic!("unexpected {other:?}"),
    }
    // Device loss sticks until the device is rebuilt.
    assert!(swap_chain.present(0, PresentFlags::empty()).unwrap_err().is_device_lost());
}

#[test]
fn frame_statistics_need_a_present_first() {
    let rig = Rig::new();
    let mut swap_chain = rig.swap_chain(&sample_config());
    assert_eq!(
        swap_chain.frame_statistics().unwrap_err().status(),
        Some(Status::DXGI_ERROR_FRAME_STATISTICS_DISJOINT)
    );
    swap_chain.present(0, PresentFlags::empty()).unwrap();
    assert_eq!(swap_chain.frame_statistics().unwrap().present_count, 1);

    let blt = rig.swap_chain(&SwapChainConfig {
        buffer_count: 1,
        swap_effect: SwapEffect::Discard,
        ..sample_config()
    });
    assert_eq!(
        blt.frame_statistics().unwrap_err().status(),
        Some(Status::DXGI_ERROR_INVALID_CALL)
    );
}

#[test]
fn invalid_configs_are_rejected() {
    let rig = Rig::new();
    let one_flip_buffer = SwapChainConfig {
        buffer_count: 1,
        ..sample_config()
    };
    let error = rig
        .factory
        .create_swap_chain(&one_flip_buffer, &rig.device, &rig.window)
        .err()
        .unwrap();
    assert_eq!(error.status(), Some(Status::DXGI_ERROR_INVALID_CALL));
}

#[test]
fn the_last_associated_window_wins() {
    let rig = Rig::new();
    let _swap_chain = rig.swap_chain(&sample_config());
    assert_eq!(rig.factory.window_association().unwrap(), None);
    let other = rig.system.create_window(320, 240);
    rig.factory
        .make_window_association(&rig.window, WindowAssociation::NO_ALT_ENTER)
        .unwrap();
    rig.factory
        .make_window_association(&other, WindowAssociation::NO_WINDOW_CHANGES)
        .unwrap();
    assert_eq!(rig.factory.window_association().unwrap(), Some(other.id()));
}

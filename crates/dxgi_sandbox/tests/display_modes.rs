use dxgi_sandbox::DxgiError;
use dxgi_sandbox::Factory;
use dxgi_sandbox::Output;
use dxgi_sandbox::Status;
use dxgi_sandbox::model::DeviceOptions;
use dxgi_sandbox::model::DisplayMode;
use dxgi_sandbox::model::Format;
use dxgi_sandbox::model::Rational;
use dxgi_sandbox::model::Scaling;
use dxgi_sandbox::model::ScanlineOrder;
use dxgi_sandbox::simulated::Simulated;
use dxgi_sandbox::simulated::SimulatedSystem;
use proptest::prelude::*;

fn primary_output(factory: &Factory<Simulated>) -> Output<Simulated> {
    factory.adapter(0).unwrap().output(0).unwrap()
}

fn scaling() -> impl Strategy<Value = Scaling> {
    prop_oneof![
        Just(Scaling::Unspecified),
        Just(Scaling::Centered),
        Just(Scaling::Stretched),
    ]
}

fn scanline_order() -> impl Strategy<Value = ScanlineOrder> {
    prop_oneof![
        Just(ScanlineOrder::Unspecified),
        Just(ScanlineOrder::Progressive),
        Just(ScanlineOrder::UpperFieldFirst),
    ]
}

fn desired_mode() -> impl Strategy<Value = DisplayMode> {
    (
        0u32..4000,
        0u32..3000,
        prop_oneof![
            Just(Rational::UNSPECIFIED),
            Just(Rational::new(60, 1)),
            Just(Rational::new(60000, 1001)),
            (1u32..240).prop_map(|hz| Rational::new(hz, 1)),
        ],
        prop_oneof![Just(Format::R8G8B8A8_UNORM), Just(Format::B8G8R8A8_UNORM)],
        scaling(),
        scanline_order(),
    )
        .prop_map(
            |(width, height, refresh_rate, format, scaling, scanline_order)| DisplayMode {
                width,
                height,
                refresh_rate,
                format,
                scaling,
                scanline_order,
            },
        )
}

proptest! {
    #[test]
    fn closest_mode_is_idempotent(desired in desired_mode()) {
        let system = SimulatedSystem::new();
        let factory = Factory::locate(&system).unwrap();
        let output = primary_output(&factory);

        let closest = output.find_closest_mode(&desired, None).unwrap();
        let again = output.find_closest_mode(&closest, None).unwrap();
        prop_assert_eq!(closest, again);
        prop_assert_eq!(closest.format, desired.format);
        prop_assert!(output.display_modes(desired.format).unwrap().contains(&closest));
    }
}

#[test]
fn an_exact_request_is_answered_with_itself() {
    let system = SimulatedSystem::new();
    let factory = Factory::locate(&system).unwrap();
    let output = primary_output(&factory);
    let desired = DisplayMode {
        refresh_rate: Rational::new(60, 1),
        scaling: Scaling::Centered,
        scanline_order: ScanlineOrder::Progressive,
        ..DisplayMode::sized(800, 600, Format::R8G8B8A8_UNORM)
    };
    assert_eq!(output.find_closest_mode(&desired, None).unwrap(), desired);
}

#[test]
fn unknown_format_needs_a_concerned_device() {
    let system = SimulatedSystem::new();
    let factory = Factory::locate(&system).unwrap();
    let output = primary_output(&factory);
    let desired = DisplayMode::sized(1024, 768, Format::UNKNOWN);

    match output.find_closest_mode(&desired, None) {
        Err(DxgiError::Platform { status, .. }) => {
            assert_eq!(status, Status::DXGI_ERROR_INVALID_CALL)
        }
        other => panic!("unexpected {other:?}"),
    }

    let device = factory.create_device(None, DeviceOptions::default()).unwrap();
    let closest = output.find_closest_mode(&desired, Some(&device)).unwrap();
    assert_ne!(closest.format, Format::UNKNOWN);
    assert_eq!((closest.width, closest.height), (1024, 768));
}

#[test]
fn modes_only_come_in_the_requested_format() {
    let system = SimulatedSystem::new();
    let factory = Factory::locate(&system).unwrap();
    let output = primary_output(&factory);
    let modes = output.display_modes(Format::B8G8R8A8_UNORM).unwrap();
    assert!(!modes.is_empty());
    assert!(modes.iter().all(|mode| mode.format == Format::B8G8R8A8_UNORM));
    assert!(output.display_modes(Format::R16G16B16A16_FLOAT).unwrap().is_empty());
}

use dxgi_sandbox::Device;
use dxgi_sandbox::DxgiError;
use dxgi_sandbox::Factory;
use dxgi_sandbox::Resource;
use dxgi_sandbox::Status;
use dxgi_sandbox::error::DxgiErrorClass;
use dxgi_sandbox::model::DeviceOptions;
use dxgi_sandbox::model::DriverType;
use dxgi_sandbox::model::EvictionPriority;
use dxgi_sandbox::model::Format;
use dxgi_sandbox::model::MapFlags;
use dxgi_sandbox::model::ResidencyStatus;
use dxgi_sandbox::model::TextureDesc;
use dxgi_sandbox::model::TextureUsage;
use dxgi_sandbox::model::Usage;
use dxgi_sandbox::platform::RawResource;
use dxgi_sandbox::simulated::SimCall;
use dxgi_sandbox::simulated::Simulated;
use dxgi_sandbox::simulated::SimulatedSystem;
use proptest::prelude::*;

fn hardware_device(system: &SimulatedSystem) -> Device<Simulated> {
    Factory::locate(system)
        .unwrap()
        .create_device(None, DeviceOptions::default())
        .unwrap()
}

fn texture(device: &Device<Simulated>, usage: TextureUsage) -> Resource<Simulated> {
    device
        .create_texture(&TextureDesc {
            width: 64,
            height: 32,
            format: Format::R8G8B8A8_UNORM,
            usage,
        })
        .unwrap()
}

proptest! {
    #[test]
    fn residency_has_one_entry_per_resource(count in 0usize..24) {
        let system = SimulatedSystem::new();
        let device = hardware_device(&system);
        let textures: Vec<_> = (0..count)
            .map(|index| {
                let usage = if index % 2 == 0 { TextureUsage::Default } else { TextureUsage::Staging };
                texture(&device, usage)
            })
            .collect();
        let borrowed: Vec<_> = textures.iter().collect();

        let residency = device.query_residency(&borrowed).unwrap();
        prop_assert_eq!(residency.len(), count);
        for (index, status) in residency.iter().enumerate() {
            let expected = if index % 2 == 0 {
                ResidencyStatus::FullyResident
            } else {
                ResidencyStatus::ResidentInSharedMemory
            };
            prop_assert_eq!(*status, expected);
        }
    }

    #[test]
    fn priorities_inside_the_range_round_trip(priority in -7i32..=7) {
        let system = SimulatedSystem::new();
        let device = hardware_device(&system);
        device.set_gpu_priority(priority).unwrap();
        prop_assert_eq!(device.gpu_priority().unwrap(), priority);
    }

    #[test]
    fn priorities_outside_the_range_are_rejected(
        priority in prop_oneof![i32::MIN..-7, 8..=i32::MAX]
    ) {
        let system = SimulatedSystem::new();
        let device = hardware_device(&system);
        let error = device.set_gpu_priority(priority).unwrap_err();
        let is_range = matches!(error, DxgiError::Range { min: -7, max: 7, .. });
        prop_assert!(is_range, "unexpected error {error:?}");
        prop_assert_eq!(device.gpu_priority().unwrap(), 0);
    }
}

#[test]
fn an_empty_residency_query_never_reaches_the_platform() {
    let system = SimulatedSystem::new();
    let device = hardware_device(&system);
    system.inject(SimCall::QueryResourceResidency, Status::E_FAIL);
    assert!(device.query_residency(&[]).unwrap().is_empty());
    assert_eq!(system.pending(SimCall::QueryResourceResidency), 1);
}

#[test]
fn residency_is_read_live() {
    let system = SimulatedSystem::new();
    let device = hardware_device(&system);
    let resource = texture(&device, TextureUsage::Default);
    assert_eq!(
        device.query_residency(&[&resource]).unwrap(),
        [ResidencyStatus::FullyResident]
    );
    resource.raw().set_residency(ResidencyStatus::EvictedToDisk);
    assert_eq!(
        device.query_residency(&[&resource]).unwrap(),
        [ResidencyStatus::EvictedToDisk]
    );
}

#[test]
fn residency_fails_once_the_device_is_removed() {
    let system = SimulatedSystem::new();
    let device = hardware_device(&system);
    let resource = texture(&device, TextureUsage::Default);
    device.raw().remove(Status::DXGI_ERROR_DEVICE_REMOVED);
    let error = device.query_residency(&[&resource]).unwrap_err();
    assert_eq!(error.class(), DxgiErrorClass::DeviceLost);
}

#[test]
fn warp_devices_run_on_the_software_adapter() {
    let system = SimulatedSystem::new();
    let factory = Factory::locate(&system).unwrap();
    let device = factory
        .create_device(
            None,
            DeviceOptions {
                driver: DriverType::Warp,
                debug: false,
            },
        )
        .unwrap();
    let desc = device.adapter().unwrap().describe().unwrap();
    assert_eq!(desc.description, "Microsoft Basic Render Driver");
}

#[test]
fn an_explicit_adapter_needs_a_hardware_driver() {
    let system = SimulatedSystem::new();
    let factory = Factory::locate(&system).unwrap();
    let adapter = factory.adapter(0).unwrap();
    let options = DeviceOptions {
        driver: DriverType::Reference,
        debug: false,
    };
    let error = factory.create_device(Some(&adapter), options).err().unwrap();
    assert_eq!(error.status(), Some(Status::E_INVALIDARG));
}

#[test]
fn staging_textures_are_cpu_writable() {
    let system = SimulatedSystem::new();
    let device = hardware_device(&system);
    let mut staging = texture(&device, TextureUsage::Staging);
    assert_eq!(staging.usage().unwrap(), Usage::empty());
    assert!(!staging.has_shared_handle().unwrap());

    let mut mapped = staging.map(MapFlags::WRITE).unwrap();
    assert_eq!(mapped.pitch(), 64 * 4);
    mapped.bytes_mut()[4..8].copy_from_slice(&[1, 2, 3, 4]);
    drop(mapped);

    assert!(!staging.raw().is_mapped());
    assert_eq!(&staging.raw().contents().unwrap()[4..8], &[1, 2, 3, 4]);
}

#[test]
fn mapped_bytes_stay_borrowed_until_the_guard_drops() {
    let system = SimulatedSystem::new();
    let device = hardware_device(&system);
    let mut staging = texture(&device, TextureUsage::Staging);
    let shared = staging.raw().clone();

    let mut mapped = staging.map(MapFlags::WRITE | MapFlags::DISCARD).unwrap();
    mapped.bytes_mut()[0] = 0x7F;
    assert!(shared.is_mapped());
    assert_eq!(shared.contents(), None);

    // Unmapping behind the guard's back leaves the bytes with the guard.
    shared.unmap().unwrap();
    assert!(shared.map(MapFlags::READ).is_err());
    assert_eq!(shared.contents(), None);

    drop(mapped);
    assert_eq!(shared.contents().unwrap()[0], 0x7F);
    assert!(shared.map(MapFlags::READ).is_ok());
}

#[test]
fn gpu_only_textures_cannot_be_mapped() {
    let system = SimulatedSystem::new();
    let device = hardware_device(&system);
    let mut resource = texture(&device, TextureUsage::Default);
    assert!(resource.map(MapFlags::READ).is_err());
}

#[test]
fn eviction_priority_is_range_checked() {
    let system = SimulatedSystem::new();
    let device = hardware_device(&system);
    let resource = texture(&device, TextureUsage::Default);
    resource.set_eviction_priority(EvictionPriority::HIGH).unwrap();
    assert_eq!(resource.eviction_priority().unwrap(), EvictionPriority::HIGH);
    assert!(matches!(
        resource.set_eviction_priority(EvictionPriority(0x1000)),
        Err(DxgiError::Range { .. })
    ));
}

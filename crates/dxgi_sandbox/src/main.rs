pub mod command_line;
pub mod sandbox_error;

use clap::Parser;
use command_line::Backend;
use command_line::Command;
use command_line::SampleCommandLine;
use dxgi_sandbox::EventSource;
use dxgi_sandbox::Factory;
use dxgi_sandbox::LoopExit;
use dxgi_sandbox::platform::FactoryLocator;
use dxgi_sandbox::platform::Subsystem;
use dxgi_sandbox::simulated::ScriptedEvents;
use dxgi_sandbox::simulated::SimulatedSystem;
use dxgi_sandbox::tour;
use sandbox_error::MyResult;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub fn main() -> MyResult<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::SubscriberBuilder::default()
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .with_target(false)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let args = SampleCommandLine::parse();
    info!(backend = %args.backend, command = ?args.command(), "Ahoy, DXGI!");

    match args.backend {
        Backend::Simulated => run_simulated(&args),
        Backend::Native => run_native(&args),
    }
}

fn run_simulated(args: &SampleCommandLine) -> MyResult<()> {
    let system = SimulatedSystem::new();
    let window = system.create_window(args.width, args.height);
    let mut events = ScriptedEvents::frames(args.frames);
    run_command(args, &system, &window, &mut events)
}

#[cfg(windows)]
fn run_native(args: &SampleCommandLine) -> MyResult<()> {
    use dxgi_sandbox::native::MessagePump;
    use dxgi_sandbox::native::NativeLocator;
    use dxgi_sandbox::native::NativeWindow;

    let window = NativeWindow::create(args.window_title(), args.width, args.height)?;
    let mut pump = MessagePump;
    run_command(args, &NativeLocator, &window, &mut pump)
}

#[cfg(not(windows))]
fn run_native(_args: &SampleCommandLine) -> MyResult<()> {
    Err(dxgi_sandbox::DxgiError::BackendUnavailable(
        "the native backend needs Windows, try --backend simulated".to_owned(),
    )
    .into())
}

fn run_command<L, E>(
    args: &SampleCommandLine,
    locator: &L,
    window: &<L::Subsystem as Subsystem>::Window,
    events: &mut E,
) -> MyResult<()>
where
    L: FactoryLocator,
    E: EventSource,
{
    let options = args.tour_options();
    match args.command() {
        Command::Adapters => {
            tour::list_adapters(&Factory::locate(locator)?)?;
        }
        Command::Modes => tour::list_modes(&Factory::locate(locator)?, &options)?,
        Command::Device => {
            tour::inspect_device(&Factory::locate(locator)?, &options)?;
        }
        Command::SwapChain => {
            let factory = Factory::locate(locator)?;
            let device = factory.create_device(None, options.device)?;
            tour::exercise_swap_chain(&factory, &device, window, &options)?;
        }
        Command::Tour => {
            let summary = tour::run(locator, window, events, &options)?;
            if let LoopExit::DeviceLost(kind) = summary.exit {
                return Err(eyre::eyre!("gave up after the device was lost ({kind})").into());
            }
        }
    }
    Ok(())
}

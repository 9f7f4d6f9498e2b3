use clap::{Parser, Subcommand};
use spindle::config;
use spindle::render::FixedSurface;
use spindle_cli::driver::{Driver, Flow};
use spindle_cli::events::DriverEvent;
use spindle_cli::script;
use spindle_cli::sys::runtime;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "spindle", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Number of items on the wheel
    #[arg(long, default_value_t = 5, global = true)]
    items: usize,

    /// Height of each item, px
    #[arg(long, default_value_t = 40.0, global = true)]
    item_height: f64,

    /// Height of the visible container, px
    #[arg(long, default_value_t = 200.0, global = true)]
    height: f64,

    /// Item selected at start (overrides `initial_index` from the config)
    #[arg(long, global = true)]
    index: Option<usize>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Run a gesture script and print where the wheel settles
    Replay { script: PathBuf },
    /// Read commands from stdin and animate in real time
    Interactive,
    /// Write the default config file if none exists
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::InitConfig => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Replay { script } => replay(build_driver(&cli)?, script),
        Commands::Interactive => interactive(build_driver(&cli)?),
    }
}

fn build_driver(cli: &Cli) -> anyhow::Result<Driver> {
    let mut config = config::load_or_default();
    if let Some(index) = cli.index {
        config.initial_index = index;
    }
    let surface = FixedSurface::uniform(cli.height, cli.items, cli.item_height);
    Ok(Driver::new(surface, config)?)
}

fn replay(mut driver: Driver, path: &Path) -> anyhow::Result<()> {
    let source = fs_err::read_to_string(path)?;
    let commands = script::parse(&source)?;

    for command in &commands {
        let flow = driver.apply(command)?;
        report_changes(&driver);
        if flow == Flow::Quit {
            break;
        }
    }

    let frames = driver.settle();
    report_changes(&driver);
    log::debug!("final settle took {} frames", frames);
    report_final(&driver);
    Ok(())
}

fn interactive(mut driver: Driver) -> anyhow::Result<()> {
    let (tx, rx) = async_channel::bounded(64);
    runtime::start_background_services(tx, driver.wheel().config().frame_rate);

    while let Ok(event) = rx.recv_blocking() {
        match event {
            DriverEvent::Command(command) => match driver.apply(&command) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => log::error!("{}", e),
            },
            DriverEvent::Frame => {
                driver.tick();
            }
            DriverEvent::ConfigReload => match config::load_config() {
                Ok(config) => {
                    if let Err(e) = driver.reload(config) {
                        log::error!("Failed to apply reloaded config: {}", e);
                    }
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            DriverEvent::Closed => {
                driver.settle();
                report_changes(&driver);
                break;
            }
        }
        report_changes(&driver);
    }

    report_final(&driver);
    Ok(())
}

fn report_changes(driver: &Driver) {
    for index in driver.take_changes() {
        println!("change {}", index);
    }
}

fn report_final(driver: &Driver) {
    let wheel = driver.wheel();
    println!(
        "index {} angle {} frames {}",
        wheel.index(),
        wheel.angle(),
        wheel.renderer().frames()
    );
}

//! Webcam-probe binary: print what a capture device reports.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use webcam_probe::{probe, CameraError, Probe};

/// Query a V4L2 capture device and print its capabilities and formats
#[derive(Parser)]
#[command(name = "webcam-probe")]
#[command(version)]
#[command(about = "Query a V4L2 capture device and print its capabilities and formats")]
struct Cli {
    /// Device node to probe
    #[arg(short, long, default_value = "/dev/video0")]
    device: PathBuf,

    /// Requested frame width
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Requested frame height
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Enable verbose logging (use `RUST_LOG=debug` for more)
    #[arg(short, long)]
    verbose: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match probe(&cli.device, cli.width, cli.height) {
        Ok(probe) => {
            if !cli.quiet {
                print_probe(&probe);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            exit_code(&err)
        }
    }
}

fn exit_code(err: &CameraError) -> ExitCode {
    match err {
        CameraError::NotFound(_) | CameraError::NotADevice(_) => ExitCode::from(2),
        CameraError::NotCaptureDevice(_) => ExitCode::from(3),
        CameraError::Open { .. } | CameraError::Query { .. } => ExitCode::from(1),
    }
}

fn print_probe(probe: &Probe) {
    let caps = &probe.capabilities;
    let (major, minor, patch) = caps.kernel_version();

    println!("Device: {}", probe.path.display());
    println!("  Card: {}", caps.card);
    println!("  Driver: {} {major}.{minor}.{patch}", caps.driver);
    println!("  Bus: {}", caps.bus_info);
    println!("  Streaming: {}", if caps.can_stream { "yes" } else { "no" });

    println!("Formats:");
    for (index, desc) in probe.formats.iter().enumerate() {
        let compressed = if desc.compressed { " (compressed)" } else { "" };
        println!(
            "  [{index}] {} {}{compressed}",
            desc.pixelformat, desc.description
        );
    }

    let format = &probe.format;
    println!(
        "Format: {}x{} {} {}",
        format.width, format.height, format.pixelformat, format.colorspace
    );
}

/// Initialize `env_logger` based on verbosity flags
fn init_logging(verbose: bool, quiet: bool) {
    let env = env_logger::Env::default();

    let env = if quiet {
        env.default_filter_or("error")
    } else if verbose {
        env.default_filter_or("debug")
    } else {
        env.default_filter_or("warn")
    };

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .init();

    log::debug!("Logging initialized");
}

//! Headless SwiftBoy runner.
//!
//! Loads a ROM, steps a bounded number of frames, forwards anything the
//! ROM printed through the serial test-print convention to stdout, and
//! optionally dumps the last completed frame as a PPM. This is the thin
//! shell that knows about file I/O and CLI parsing so `swiftboy` doesn't
//! have to.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use swiftboy::SwiftBoy;
use swiftboy_support::logging::{LogCategory, LogConfig, LogLevel};
use swiftboy_support::ppu::DMG_SHADES;
use swiftboy_support::types::Frame;
use swiftboy_support::log;

/// Run a Game Boy ROM headlessly for a fixed number of frames.
#[derive(Parser)]
#[command(name = "swiftboy-cli")]
struct Args {
    /// Path to a raw DMG cartridge image.
    rom: PathBuf,

    /// Number of frames to step before exiting.
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Core logging verbosity: off, error, warn, info, debug, trace.
    #[arg(long, default_value = "off")]
    log_level: String,

    /// Write the final frame to this path as a binary PPM (P6).
    #[arg(long)]
    ppm: Option<PathBuf>,
}

fn write_ppm(path: &PathBuf, frame: &Frame) -> Result<()> {
    let mut file = fs::File::create(path)
        .with_context(|| format!("creating PPM output at {}", path.display()))?;
    writeln!(file, "P6\n{} {}\n255", frame.width, frame.height)?;
    for &index in &frame.pixels {
        let argb = DMG_SHADES[(index & 0x03) as usize];
        file.write_all(&[(argb >> 16) as u8, (argb >> 8) as u8, argb as u8])?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(level) = LogLevel::from_str(&args.log_level) {
        LogConfig::global().set_global_level(level);
    } else {
        anyhow::bail!("unrecognized --log-level {:?}", args.log_level);
    }
    log::debug!("starting swiftboy-cli on {}", args.rom.display());

    let rom = fs::read(&args.rom)
        .with_context(|| format!("reading cartridge image at {}", args.rom.display()))?;

    let mut gb = SwiftBoy::new();
    gb.load_cartridge(rom)
        .context("loading cartridge image")?;

    let mut last_frame = None;
    for frame_num in 1..=args.frames {
        let frame = gb.run_frame().with_context(|| {
            format!("executing instructions while producing frame {frame_num}")
        })?;
        last_frame = Some(frame);

        let serial = gb.take_serial_output();
        if !serial.is_empty() {
            std::io::stdout().write_all(&serial)?;
        }
    }

    log!(
        LogCategory::Cpu,
        LogLevel::Info,
        "ran {} frame(s) from {}",
        args.frames,
        args.rom.display()
    );

    if let Some(ppm_path) = args.ppm {
        let frame = last_frame.context("no frame was produced; --frames was 0")?;
        write_ppm(&ppm_path, &frame)?;
    }

    Ok(())
}

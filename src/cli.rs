// ============================================================================
// SignPad CLI — headless replay of recorded signature input
// ============================================================================
//
// Usage examples:
//   signpad --replay strokes.json --output signature.png
//   signpad -r strokes.json --data-url              (prints data:image/png;base64,...)
//   signpad -r strokes.json --width 480 --settings pad.cfg -o sig.png -v
//
// No window is opened in CLI mode. The script is run through the same pad
// the GUI uses and the final capture is what gets written.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use crate::capture;
use crate::replay::{self, ReplayOutcome};
use crate::settings::PadSettings;

/// SignPad headless signature renderer.
///
/// Replay pointer/touch events from a JSON script and export the captured signature.
#[derive(Parser, Debug)]
#[command(
    name = "signpad",
    about = "SignPad headless signature renderer",
    long_about = "Replay recorded pointer and touch events through the signature pad\n\
                  without opening a window, then export the captured PNG.\n\n\
                  Example:\n  \
                  signpad --replay strokes.json --output signature.png\n  \
                  signpad -r strokes.json --data-url"
)]
pub struct CliArgs {
    /// JSON event script to replay.
    #[arg(short, long, value_name = "SCRIPT.json")]
    pub replay: PathBuf,

    /// Write the final capture as a PNG file.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the final capture as a data URL on stdout.
    #[arg(long)]
    pub data_url: bool,

    /// Override the container width given in the script.
    #[arg(short, long, value_name = "PX")]
    pub width: Option<u32>,

    /// Settings file (key=value). Defaults are used when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Print every capture emission and timing information.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Returns `true` when the replay flag is present in the real process arguments.
    /// Used by `main()` to route before creating an eframe window.
    pub fn is_cli_mode() -> bool {
        std::env::args().any(|a| a == "--replay" || a == "-r" || a.starts_with("--replay="))
    }
}

/// Run the replay and return an OS exit code.
/// `0` = a capture was produced and written, `1` = anything else.
pub fn run(args: CliArgs) -> ExitCode {
    if args.output.is_none() && !args.data_url {
        eprintln!("error: nothing to do; pass --output FILE and/or --data-url.");
        return ExitCode::FAILURE;
    }

    let start = Instant::now();
    match run_replay(&args) {
        Ok(outcome) => {
            if args.verbose {
                for (i, emission) in outcome.emissions.iter().enumerate() {
                    match emission {
                        Some(url) => println!("  [{}] capture ({} bytes)", i + 1, url.len()),
                        None => println!("  [{}] cleared", i + 1),
                    }
                }
                println!(
                    "  → done ({:.0}ms)",
                    start.elapsed().as_secs_f64() * 1000.0
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_replay(args: &CliArgs) -> Result<ReplayOutcome, String> {
    let settings = match &args.settings {
        Some(path) => PadSettings::load_from(path)?,
        None => PadSettings::default(),
    };

    let source = std::fs::read_to_string(&args.replay)
        .map_err(|e| format!("could not read script '{}': {}", args.replay.display(), e))?;
    let mut script = replay::parse_script(&source)?;
    if let Some(w) = args.width {
        script.width = w;
    }

    let outcome = replay::replay(&script, &settings);
    let capture = outcome
        .capture()
        .ok_or_else(|| "script finished without a captured signature".to_string())?;

    if let Some(path) = &args.output {
        write_png(capture, path)?;
        if args.verbose {
            println!("{}", path.display());
        }
    }
    if args.data_url {
        println!("{}", capture);
    }
    Ok(outcome)
}

/// Write a capture to disk as the exact PNG bytes it carries.
pub fn write_png(capture: &str, path: &Path) -> Result<(), String> {
    let bytes = capture::decode_png_bytes(capture)?;
    std::fs::write(path, bytes)
        .map_err(|e| format!("could not write '{}': {}", path.display(), e))
}

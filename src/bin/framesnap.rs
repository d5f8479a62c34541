use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use framesnap::{
    DEFAULT_OUTPUT_DIRECTORY, DEFAULT_TIMESTAMPS, ExtractOptions, ExtractionReport,
    FfmpegLogLevel, FrameStatus,
};
use log::LevelFilter;
use serde_json::{Value, json};

const CLI_AFTER_HELP: &str = "Examples:\n  framesnap input.mp4\n  framesnap input.mp4 --out stills --at 1,30,90\n  framesnap input.mp4 --json --log-level quiet";

#[derive(Debug, Parser)]
#[command(
    name = "framesnap",
    version,
    about = "Save still frames from a video at fixed timestamps as PNG images",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Input video path.
    input: PathBuf,

    /// Output directory for the images (created if missing).
    #[arg(long, default_value = DEFAULT_OUTPUT_DIRECTORY)]
    out: PathBuf,

    /// Comma-separated seconds to grab, in order.
    #[arg(long = "at", value_delimiter = ',', default_values_t = DEFAULT_TIMESTAMPS.to_vec())]
    timestamps: Vec<u64>,

    /// Print a JSON summary after the run.
    #[arg(long)]
    json: bool,

    /// Show diagnostic logging.
    #[arg(long)]
    verbose: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    log_level: Option<FfmpegLogLevel>,
}

impl Cli {
    fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::new(&self.input)
            .with_output_directory(&self.out)
            .with_timestamps(self.timestamps.iter().copied())
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Error
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn report_json(report: &ExtractionReport) -> Value {
    let frames: Vec<Value> = report
        .outcomes
        .iter()
        .map(|outcome| match &outcome.status {
            FrameStatus::Saved { path } => json!({
                "seconds": outcome.seconds,
                "frame_index": outcome.frame_index,
                "saved": true,
                "path": path.display().to_string(),
            }),
            FrameStatus::Failed { reason } => json!({
                "seconds": outcome.seconds,
                "frame_index": outcome.frame_index,
                "saved": false,
                "error": reason,
            }),
        })
        .collect();

    json!({
        "fps": report.frames_per_second,
        "saved": report.saved_count(),
        "failed": report.failed_count(),
        "frames": frames,
    })
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Some(level) = cli.log_level {
        framesnap::set_ffmpeg_log_level(level);
    }

    let options = cli.extract_options();
    let report = framesnap::run(
        &options,
        |extractor| println!("FPS: {}", extractor.frames_per_second()),
        |outcome| match &outcome.status {
            FrameStatus::Saved { path } => println!("Saved {}", path.display()),
            FrameStatus::Failed { .. } => println!(
                "{}",
                format!("Could not read frame at {}s", outcome.seconds).yellow()
            ),
        },
    )?;
    println!("Done.");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report_json(&report))?);
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use framesnap::FrameOutcome;

    use super::*;

    #[test]
    fn defaults_match_library() {
        let cli = Cli::try_parse_from(["framesnap", "clip.mp4"]).unwrap();
        let options = cli.extract_options();
        assert_eq!(options.video_path(), Path::new("clip.mp4"));
        assert_eq!(options.output_directory(), Path::new("temp_frames"));
        assert_eq!(options.timestamps(), &DEFAULT_TIMESTAMPS);
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn timestamps_are_comma_separated() {
        let cli =
            Cli::try_parse_from(["framesnap", "clip.mp4", "--at", "3,1,3", "--out", "stills"])
                .unwrap();
        assert_eq!(cli.timestamps, vec![3, 1, 3]);
        assert_eq!(cli.out, PathBuf::from("stills"));
    }

    #[test]
    fn negative_or_fractional_seconds_are_rejected() {
        assert!(Cli::try_parse_from(["framesnap", "clip.mp4", "--at", "-1"]).is_err());
        assert!(Cli::try_parse_from(["framesnap", "clip.mp4", "--at", "1.5"]).is_err());
    }

    #[test]
    fn log_level_parses() {
        let cli = Cli::try_parse_from(["framesnap", "clip.mp4", "--log-level", "quiet"]).unwrap();
        assert_eq!(cli.log_level, Some(FfmpegLogLevel::Quiet));
        assert!(Cli::try_parse_from(["framesnap", "clip.mp4", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn json_summary_lists_every_outcome() {
        let report = ExtractionReport {
            frames_per_second: 30.0,
            outcomes: vec![
                FrameOutcome {
                    seconds: 0,
                    frame_index: 0,
                    status: FrameStatus::Saved {
                        path: PathBuf::from("out/frame_0s.png"),
                    },
                },
                FrameOutcome {
                    seconds: 6,
                    frame_index: 180,
                    status: FrameStatus::Failed {
                        reason: "out of range".to_string(),
                    },
                },
            ],
        };

        let value = report_json(&report);
        assert_eq!(value["saved"], 1);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["frames"][0]["path"], "out/frame_0s.png");
        assert_eq!(value["frames"][1]["saved"], false);
        assert_eq!(value["frames"][1]["frame_index"], 180);
    }
}

//! Command line interface built on clap.
//!
//! [`Cli`] carries the subcommands in [`Command`] (analyze, classify,
//! thresholds) plus global flags (--config, --seed, --delay-ms, --verbose).

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

/// Endometrium thickness and receptivity classifier.
#[derive(Debug, Parser)]
#[command(name = "garbha", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a config file (defaults to ./garbha.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed for the simulated measurement, for reproducible runs.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Simulated processing delay in milliseconds.
    #[arg(long, global = true)]
    pub delay_ms: Option<u64>,

    /// Enable verbose (debug) logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze an ultrasound image (jpg, jpeg or png).
    Analyze {
        /// Image to analyze.
        image: PathBuf,

        /// Where to write the segmentation overlay.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Skip writing the overlay image.
        #[arg(long, conflicts_with = "output")]
        no_overlay: bool,

        /// Also write the JSON report to this path.
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print the JSON report instead of the styled summary.
        #[arg(long)]
        json: bool,

        /// Use this thickness, unrounded, instead of a simulated one.
        #[arg(long, allow_negative_numbers = true)]
        thickness: Option<f64>,
    },

    /// Classify a thickness value in millimeters; omit it to see the N/A case.
    Classify {
        #[arg(allow_negative_numbers = true)]
        thickness_mm: Option<f64>,
    },

    /// Print the receptivity threshold table.
    Thresholds,
}

impl Cli {
    /// Rejects flag combinations clap cannot express across the global and
    /// subcommand levels.
    pub fn check_conflicts(&self) -> Result<(), clap::Error> {
        if let Command::Analyze {
            thickness: Some(_), ..
        } = self.command
            && self.seed.is_some()
        {
            return Err(Cli::command().error(
                ErrorKind::ArgumentConflict,
                "the argument '--thickness <THICKNESS>' cannot be used with '--seed <SEED>'",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_analyze_subcommand() {
        let cli = Cli::parse_from(["garbha", "analyze", "scan.png", "-o", "out.png"]);
        match cli.command {
            Command::Analyze {
                image,
                output,
                no_overlay,
                json,
                thickness,
                ..
            } => {
                assert_eq!(image, PathBuf::from("scan.png"));
                assert_eq!(output, Some(PathBuf::from("out.png")));
                assert!(!no_overlay);
                assert!(!json);
                assert!(thickness.is_none());
            }
            _ => panic!("expected Analyze command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "garbha",
            "--seed",
            "42",
            "--delay-ms",
            "0",
            "--verbose",
            "thresholds",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.delay_ms, Some(0));
        assert!(matches!(cli.command, Command::Thresholds));
    }

    #[test]
    fn cli_parses_classify_with_and_without_value() {
        let cli = Cli::parse_from(["garbha", "classify", "8.25"]);
        assert!(matches!(cli.command, Command::Classify { thickness_mm: Some(t) } if t == 8.25));

        let cli = Cli::parse_from(["garbha", "classify"]);
        assert!(matches!(cli.command, Command::Classify { thickness_mm: None }));

        let cli = Cli::parse_from(["garbha", "classify", "-5"]);
        assert!(matches!(cli.command, Command::Classify { thickness_mm: Some(t) } if t == -5.0));
    }

    #[test]
    fn output_conflicts_with_no_overlay() {
        let result = Cli::try_parse_from([
            "garbha",
            "analyze",
            "scan.png",
            "--output",
            "o.png",
            "--no-overlay",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn thickness_conflicts_with_seed() {
        let cli = Cli::parse_from([
            "garbha",
            "--seed",
            "3",
            "analyze",
            "scan.png",
            "--thickness",
            "8.5",
        ]);
        let err = cli.check_conflicts().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);

        let cli = Cli::parse_from(["garbha", "--seed", "3", "analyze", "scan.png"]);
        assert!(cli.check_conflicts().is_ok());

        let cli = Cli::parse_from(["garbha", "analyze", "scan.png", "--thickness", "8.999"]);
        assert!(cli.check_conflicts().is_ok());
        assert!(matches!(
            cli.command,
            Command::Analyze { thickness: Some(t), .. } if t == 8.999
        ));
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}

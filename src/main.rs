mod analysis;
mod classifier;
mod cli;
mod config;
mod error;
mod measurement;
mod segmentation;
mod ui;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use console::Style;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use analysis::{Analysis, Analyzer, OverlayTarget};
use cli::{Cli, Command};
use config::GarbhaConfig;
use measurement::{FixedGauge, SimulatedGauge, ThicknessGauge};
use ui::AnalysisProgress;

fn init_logging(verbose: bool) {
    let default = if verbose { "garbha=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = cli.check_conflicts() {
        e.exit();
    }
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", Style::new().red().bold().apply_to("error:"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Classify { thickness_mm } => {
            let classification = classifier::classify(thickness_mm);
            if let Some(t) = thickness_mm {
                println!("{}", ui::format_thickness(t));
            }
            ui::print_classification(&classification);
        }
        Command::Thresholds => {
            ui::print_thresholds(&classifier::thresholds());
        }
        Command::Analyze {
            image,
            output,
            no_overlay,
            report,
            json,
            thickness,
        } => {
            let mut config = GarbhaConfig::load(cli.config.as_deref())?;
            config.apply_cli(cli.delay_ms);
            debug!(?config, "effective configuration");

            let analyzer = Analyzer::new(&config);

            let analysis = match (thickness, cli.seed) {
                (Some(t), _) => analyze(&analyzer, &image, &mut FixedGauge(t), json)?,
                (None, Some(seed)) => {
                    let mut gauge = SimulatedGauge::seeded(seed, &config.measurement)?;
                    analyze(&analyzer, &image, &mut gauge, json)?
                }
                (None, None) => {
                    let mut gauge = SimulatedGauge::from_entropy(&config.measurement)?;
                    analyze(&analyzer, &image, &mut gauge, json)?
                }
            };

            let record = analysis.persist(
                &OverlayTarget::from_flags(no_overlay, output),
                config.output_dir.as_deref(),
                report.as_deref(),
            )?;

            if json {
                println!("{}", record.to_json()?);
            } else {
                ui::print_results(&analysis, record.overlay.as_deref());
            }
        }
    }

    Ok(())
}

fn analyze(
    analyzer: &Analyzer,
    image: &std::path::Path,
    gauge: &mut impl ThicknessGauge,
    quiet: bool,
) -> Result<Analysis> {
    // The spinner is skipped when stdout carries the JSON report.
    let progress = (!quiet).then(AnalysisProgress::start);
    let result = analyzer.run(image, gauge);
    if let Some(progress) = progress {
        match &result {
            Ok(_) => progress.succeed(),
            Err(_) => progress.fail(),
        }
    }
    result.context("Error loading or processing image")
}

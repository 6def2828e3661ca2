//! Terminal presentation: spinner while an image is analyzed, then the
//! thickness and a color-coded receptivity label.
//!
//! Uses `indicatif` for the spinner and `console` for styling.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::analysis::Analysis;
use crate::classifier::{Classification, Severity, ThresholdRow};

/// Spinner shown for the duration of an analysis.
pub struct AnalysisProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
}

impl AnalysisProgress {
    pub fn start() -> Self {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message("Running segmentation and thickness measurement...");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
        }
    }

    pub fn succeed(&self) {
        self.pb.finish_and_clear();
        println!("  {} Analysis complete!", self.green.apply_to("✓"));
    }

    pub fn fail(&self) {
        self.pb.finish_and_clear();
        eprintln!("  {} Analysis failed", self.red.apply_to("✗"));
    }
}

/// Console style for a severity. Orange has no basic ANSI color, so warnings
/// render yellow.
pub fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Informational => Style::new().dim(),
        Severity::Normal => Style::new().green().bold(),
        Severity::Warning => Style::new().yellow().bold(),
        Severity::Critical => Style::new().red().bold(),
    }
}

pub fn format_thickness(thickness_mm: f64) -> String {
    format!("{thickness_mm:.2} mm")
}

pub fn print_classification(classification: &Classification) {
    let style = severity_style(classification.severity);
    println!("{}", style.apply_to(classification.label));
    if let Some(hint) = classification.hint() {
        println!("{}", Style::new().dim().apply_to(hint));
    }
}

/// Prints the results block for a finished analysis.
pub fn print_results(analysis: &Analysis, overlay: Option<&std::path::Path>) {
    let heading = Style::new().cyan().bold();
    let muted = Style::new().dim();
    let classification = analysis.classification();

    println!();
    println!("{}", heading.apply_to("─── Analysis Results ───"));
    println!(
        "  {:<34} {}",
        muted.apply_to("Estimated Endometrial Thickness"),
        format_thickness(analysis.measurement.thickness_mm)
    );
    println!(
        "  {:<34} {}",
        muted.apply_to("Classification"),
        severity_style(classification.severity).apply_to(classification.label)
    );
    println!(
        "  {:<34} {}x{}",
        muted.apply_to("Image"),
        analysis.width,
        analysis.height
    );
    if let Some(path) = overlay {
        println!(
            "  {:<34} {}",
            muted.apply_to("Segmented Endometrium (simulated)"),
            path.display()
        );
    }
}

pub fn print_thresholds(rows: &[ThresholdRow]) {
    let heading = Style::new().cyan().bold();
    println!("{}", heading.apply_to("─── Receptivity Thresholds ───"));
    for row in rows {
        println!(
            "  {:<22} {}",
            row.condition,
            severity_style(row.severity).apply_to(row.label)
        );
    }
}

//! Terminal output with colors.
//!
//! Colors come from the `colored` crate, which honors `NO_COLOR` and TTY
//! detection.

use std::fmt::Write;

use colored::Colorize;

use slcosmo_core::GaussianPrior;

use crate::result::{Histogram, InferenceResult};

/// Separator line used in output.
pub const SEPARATOR: &str = "──────────────────────────────────────────────────────────────";

const UNITS: &str = "km/s/Mpc";

/// Widest histogram bar, in characters.
const BAR_WIDTH: usize = 40;

/// One-line `H0 = mean +/- sd km/s/Mpc` summary.
pub fn format_summary_line(result: &InferenceResult) -> String {
    let (mean, sd) = result.h0();
    format!("H0 = {:.1} +/- {:.1} {}", mean, sd, UNITS)
}

/// Format an `InferenceResult` for human-readable terminal output.
pub fn format_result(result: &InferenceResult) -> String {
    let mut out = String::new();

    writeln!(out, "slcosmo").unwrap();
    writeln!(out, "{}", SEPARATOR).unwrap();
    writeln!(out).unwrap();

    writeln!(out, "  {}", format_summary_line(result).bold().green()).unwrap();

    if let Some(truth) = result.true_h0 {
        let sd = result.estimate.standard_deviation;
        if sd > 0.0 {
            let pull = (truth - result.estimate.mean) / sd;
            let line = format!("True H0 = {} {} ({:+.1}σ)", truth, UNITS, pull);
            if pull.abs() < 3.0 {
                writeln!(out, "  {}", line).unwrap();
            } else {
                writeln!(out, "  {}", line.yellow()).unwrap();
            }
        } else {
            // One sample carries all the weight; a pull is meaningless.
            let line = format!("True H0 = {} {} (posterior collapsed)", truth, UNITS);
            writeln!(out, "  {}", line.yellow()).unwrap();
        }
    }
    writeln!(out).unwrap();

    writeln!(out, "  {}", "Inputs".bold()).unwrap();
    writeln!(out, "    Lenses:         {}", result.num_lenses).unwrap();
    writeln!(
        out,
        "    Prior:          N({:.1}, {:.1}) {}",
        result.prior.mean(),
        result.prior.width(),
        UNITS
    )
    .unwrap();
    writeln!(out, "    Prior samples:  {}", result.prior_samples.len()).unwrap();
    writeln!(out).unwrap();

    let d = &result.diagnostics;
    writeln!(out, "  {}", "Importance weights".bold()).unwrap();
    let ess = format!(
        "{:.1} ({:.1}%)",
        d.effective_sample_size,
        d.efficiency() * 100.0
    );
    if result.is_weight_starved() {
        writeln!(out, "    Effective size: {}", ess.yellow()).unwrap();
    } else {
        writeln!(out, "    Effective size: {}", ess).unwrap();
    }
    writeln!(out, "    Non-zero:       {}/{}", d.num_nonzero, d.num_samples).unwrap();
    writeln!(out, "    Max weight:     {:.3}", d.max_normalized_weight).unwrap();
    writeln!(out, "    Runtime:        {:.2}s", result.elapsed_secs).unwrap();

    if let Some(hist) = &result.histogram {
        writeln!(out).unwrap();
        writeln!(out, "  {} (· prior)", "Posterior".bold()).unwrap();
        out.push_str(&format_histogram_with_prior(hist, &result.prior));
    }

    writeln!(out).unwrap();
    write!(out, "{}", SEPARATOR).unwrap();
    out
}

/// Horizontal bar chart of a posterior histogram, one line per bin.
pub fn format_histogram(hist: &Histogram) -> String {
    render_histogram(hist, None)
}

/// Like [`format_histogram`], with the prior density marked by `·` on the
/// same scale as the bars.
pub fn format_histogram_with_prior(hist: &Histogram, prior: &GaussianPrior) -> String {
    render_histogram(hist, Some(prior))
}

fn render_histogram(hist: &Histogram, prior: Option<&GaussianPrior>) -> String {
    let mut out = String::new();
    let peak = hist.densities.iter().copied().fold(0.0_f64, f64::max);
    if peak <= 0.0 {
        return out;
    }
    let scale = |density: f64| ((density / peak) * BAR_WIDTH as f64).round() as usize;

    for (i, &density) in hist.densities.iter().enumerate() {
        let center = hist.bin_center(i);
        let len = scale(density);
        let mut line = format!("    {:>6.1} │{}", center, "█".repeat(len).red());
        if let Some(prior) = prior {
            let mark = scale(prior.density(center)).min(BAR_WIDTH);
            if mark > len {
                line.push_str(&" ".repeat(mark - len - 1));
                line.push('·');
            }
        }
        writeln!(out, "{}", line).unwrap();
    }
    out
}

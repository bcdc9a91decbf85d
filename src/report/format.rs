//! Terminal run summaries.

use crate::domain::{DatasetStats, FitDiagnostics, FormulaStyle, Score};
use crate::models::PolynomialRegression;
use crate::report::formula::format_number;

/// Everything printed by `polyfit fit`.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary<'a> {
    pub stats: &'a DatasetStats,
    pub model: &'a PolynomialRegression,
    pub diagnostics: &'a FitDiagnostics,
    pub score: &'a Score,
    pub precision: Option<usize>,
    pub style: FormulaStyle,
}

/// Format the full run summary (dataset stats + solver diagnostics + model + score).
pub fn format_run_summary(summary: &RunSummary<'_>) -> String {
    let RunSummary {
        stats,
        model,
        diagnostics,
        score,
        precision,
        style,
    } = *summary;

    let mut out = String::new();

    out.push_str("=== polyfit - polynomial least squares ===\n");
    out.push_str(&format!(
        "Samples: n={} | x=[{:.4}, {:.4}] | y=[{:.4}, {:.4}]\n",
        stats.n_points, stats.x_min, stats.x_max, stats.y_min, stats.y_max
    ));
    out.push_str(&format!(
        "Solver: {} | rank={}/{}\n",
        diagnostics.method.display_name(),
        diagnostics.rank,
        diagnostics.n_terms
    ));
    if diagnostics.n_samples < diagnostics.n_terms {
        out.push_str(&format!(
            "Warning: {} samples for {} terms; coefficients are not unique.\n",
            diagnostics.n_samples, diagnostics.n_terms
        ));
    }

    out.push_str("\nModel:\n");
    out.push_str(&format!("{}\n", model.to_formula(precision, style)));
    out.push_str(&format!("degree: {}\n", model.degree()));

    out.push_str("\nCoefficients:\n");
    out.push_str(&format_coefficient_table(model, precision));

    out.push_str("\nScore:\n");
    out.push_str(&format!("r    = {}\n", fmt_stat(score.r)));
    out.push_str(&format!("r2   = {}\n", fmt_stat(score.r2)));
    out.push_str(&format!("chi2 = {}\n", fmt_stat(score.chi2)));
    out.push_str(&format!("rmsd = {}\n", fmt_stat(score.rmsd)));

    out
}

/// Two-column power/coefficient table in declaration order.
pub fn format_coefficient_table(model: &PolynomialRegression, precision: Option<usize>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>6} {:>24}\n", "power", "coefficient"));
    out.push_str(&format!("{:->6} {:->24}\n", "", ""));
    for (p, c) in model.powers().iter().zip(model.coefficients()) {
        let value = if *c < 0.0 {
            format!("-{}", format_number(c.abs(), precision))
        } else {
            format_number(*c, precision)
        };
        out.push_str(&format!("{p:>6} {value:>24}\n"));
    }
    out
}

fn fmt_stat(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.6}")
    } else {
        "undefined".to_string()
    }
}

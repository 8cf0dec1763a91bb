//! Terminal output for the tracker and the dataset summaries.
//!
//! Formatting lives here so the analytics stay free of presentation concerns.
//! Absent indicators print as `n/a`; masses are shown to the ton and rates or
//! day counts to one decimal.

use crate::analytics::summary::{Co2Summary, GenerationSummary, NetZeroSummary};
use crate::domain::{BaseYearSource, GoalTrackerOutcome, Pathway, TargetPoint};

const NA: &str = "n/a";

pub fn format_goal_tracker(outcome: &GoalTrackerOutcome) -> String {
    let mut out = String::new();
    out.push_str("=== nzt - Net-Zero Goal Tracker ===\n");

    let Some(result) = outcome.result() else {
        out.push_str("Insufficient data: need at least one intensity and one generation sample.\n");
        return out;
    };

    let ctx = &result.context;
    out.push_str(&format!(
        "Year: {} | Base year: {} ({})\n",
        ctx.current_year,
        ctx.base_year,
        base_year_label(ctx.base_year_source)
    ));
    out.push_str(&format!(
        "Intensity: latest {:.1} | base {:.1} | target {} g/kWh\n",
        ctx.latest_intensity,
        ctx.base_intensity,
        fmt_opt(ctx.target_intensity, 1)
    ));

    out.push('\n');
    out.push_str(&format!(
        "Alignment index: {}\n",
        result
            .alignment_index_pct
            .map(|v| format!("{v:.1}%"))
            .unwrap_or_else(|| NA.to_string())
    ));

    match &result.budget {
        Some(b) => {
            let status = if b.days_ahead >= 0.0 { "ahead" } else { "behind" };
            out.push_str(&format!(
                "Carbon budget (YTD): emitted {:.0} t | budget {:.0} t | {:.1} days {status}\n",
                b.ytd_emitted_tons,
                b.ytd_budget_tons,
                b.days_ahead.abs()
            ));
        }
        None => out.push_str(&format!("Carbon budget (YTD): {NA}\n")),
    }

    match &result.velocity {
        Some(v) => out.push_str(&format!(
            "Velocity: actual {:.1} | required {:.1} g/kWh per year | on track: {}\n",
            v.actual_rate,
            v.required_rate,
            if v.on_track { "yes" } else { "no" }
        )),
        None => out.push_str(&format!("Velocity: {NA}\n")),
    }

    match &result.pathway {
        Some(p) => out.push_str(&format_pathway(p)),
        None => out.push_str(&format!("Pathway: {NA}\n")),
    }

    out
}

fn format_pathway(pathway: &Pathway) -> String {
    let mut out = format!(
        "Pathway: net-zero ETA {}\n",
        pathway.eta_year.map(|y| y.to_string()).unwrap_or_else(|| NA.to_string())
    );
    if !pathway.target_series.is_empty() {
        out.push_str(&format_target_table(&pathway.target_series));
    }
    out
}

fn format_target_table(points: &[TargetPoint]) -> String {
    let mut out = String::new();
    out.push_str(&format!("  {:<6} {:>14}\n", "year", "target_t"));
    out.push_str(&format!("  {:-<6} {:-<14}\n", "", ""));
    for p in points {
        out.push_str(&format!("  {:<6} {:>14.0}\n", p.year, p.target_tons));
    }
    out
}

pub fn format_summaries(co2: &Co2Summary, generation: &GenerationSummary, netzero: &NetZeroSummary) -> String {
    let mut out = String::new();
    out.push_str("=== nzt - Dataset summary ===\n");
    out.push_str(&format!(
        "CO2 intensity: n={} | min {} | max {} | avg {} g/kWh\n",
        co2.count,
        fmt_opt(co2.min_g_per_kwh, 1),
        fmt_opt(co2.max_g_per_kwh, 1),
        fmt_opt(co2.avg_g_per_kwh, 1)
    ));
    out.push_str(&format!(
        "Generation mix: n={} | avg total {} MW | avg renewable share {}%\n",
        generation.count,
        fmt_opt(generation.avg_total_mw, 1),
        fmt_opt(generation.avg_renewable_share_pct, 1)
    ));
    out.push_str(&format!(
        "Net-zero alignment: n={} | latest {}\n",
        netzero.count,
        match (netzero.latest_year, netzero.latest_alignment_pct) {
            (Some(year), Some(pct)) => format!("{pct:.0}% ({year})"),
            _ => NA.to_string(),
        }
    ));
    out
}

fn base_year_label(source: BaseYearSource) -> &'static str {
    match source {
        BaseYearSource::Targets => "earliest target year",
        BaseYearSource::Series => "earliest observed year",
        BaseYearSource::CurrentYear => "current year",
    }
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format!("{v:.decimals$}"),
        None => NA.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CarbonBudget, GoalTrackerResult, TrackerContext, Velocity};

    fn context() -> TrackerContext {
        TrackerContext {
            current_year: 2025,
            base_year: 2020,
            base_year_source: BaseYearSource::Targets,
            latest_intensity: 300.0,
            base_intensity: 400.0,
            target_intensity: Some(322.58),
        }
    }

    #[test]
    fn insufficient_data_prints_a_single_notice() {
        let text = format_goal_tracker(&GoalTrackerOutcome::InsufficientData);
        assert!(text.contains("Insufficient data"));
        assert!(!text.contains("Velocity"));
    }

    #[test]
    fn absent_indicators_print_na() {
        let outcome = GoalTrackerOutcome::Computed(GoalTrackerResult {
            alignment_index_pct: None,
            budget: None,
            velocity: None,
            pathway: None,
            context: TrackerContext { target_intensity: None, ..context() },
        });
        let text = format_goal_tracker(&outcome);
        assert!(text.contains("Alignment index: n/a"), "{text}");
        assert!(text.contains("Carbon budget (YTD): n/a"), "{text}");
        assert!(text.contains("Velocity: n/a"), "{text}");
        assert!(text.contains("Pathway: n/a"), "{text}");
        assert!(text.contains("target n/a g/kWh"), "{text}");
    }

    #[test]
    fn present_indicators_are_rounded_for_display() {
        let outcome = GoalTrackerOutcome::Computed(GoalTrackerResult {
            alignment_index_pct: Some(107.5),
            budget: Some(CarbonBudget {
                ytd_emitted_tons: 14_447.4,
                ytd_budget_tons: 11_335_616.44,
                days_ahead: -12.345,
            }),
            velocity: Some(Velocity {
                actual_rate: 365.04,
                required_rate: 0.0,
                on_track: true,
            }),
            pathway: Some(Pathway {
                eta_year: Some(2025),
                target_series: vec![
                    TargetPoint { year: 2025, target_tons: 25e6 },
                    TargetPoint { year: 2050, target_tons: 0.0 },
                ],
            }),
            context: context(),
        });
        let text = format_goal_tracker(&outcome);
        assert!(text.contains("Alignment index: 107.5%"), "{text}");
        assert!(text.contains("emitted 14447 t | budget 11335616 t | 12.3 days behind"), "{text}");
        assert!(text.contains("actual 365.0 | required 0.0"), "{text}");
        assert!(text.contains("net-zero ETA 2025"), "{text}");
        assert!(text.contains("2050"), "{text}");
        assert!(text.contains("25000000"), "{text}");
    }

    #[test]
    fn summaries_render_missing_values_as_na() {
        let text = format_summaries(
            &Co2Summary { count: 0, min_g_per_kwh: None, max_g_per_kwh: None, avg_g_per_kwh: None },
            &GenerationSummary { count: 2, avg_total_mw: Some(7_012.25), avg_renewable_share_pct: None },
            &NetZeroSummary { count: 1, latest_year: Some(2025), latest_alignment_pct: Some(98.0) },
        );
        assert!(text.contains("CO2 intensity: n=0 | min n/a"), "{text}");
        assert!(text.contains("avg total 7012.2 MW") || text.contains("avg total 7012.3 MW"), "{text}");
        assert!(text.contains("latest 98% (2025)"), "{text}");
    }
}

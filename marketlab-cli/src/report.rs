//! Text rendering of an `AnalysisReport`.
//!
//! Formatting only: every number printed here was computed by the core.
//! Strategy guidance is looked up by keyword in the market state tag.

use marketlab_core::detectors::BarFlags;
use marketlab_core::{AnalysisReport, MarketState};
use std::fmt::Write;

/// Guidance per state keyword, first match wins.
const GUIDANCE: &[(&str, &[&str])] = &[
    (
        "Premium",
        &[
            "Price trades above the premium band: favour shorts on weakness.",
            "Wait for the fast average to turn down before selling.",
        ],
    ),
    (
        "Discount",
        &[
            "Price trades below the discount band: favour longs on strength.",
            "Wait for the fast average to turn up before buying.",
        ],
    ),
    (
        "Narrow",
        &[
            "Averages are converged: trade breakouts of the previous bar's range.",
            "Volume-heavy ranges tend to resolve with force; size accordingly.",
        ],
    ),
    (
        "Trending",
        &[
            "Averages agree and both slope with the trend: buy dips / sell rallies",
            "while price holds on the trend side of the fast average.",
        ],
    ),
    (
        "Wide",
        &[
            "Averages are apart but not both sloping: trade pullbacks against the",
            "fast average two bars back, with reduced size.",
        ],
    ),
    (
        "Equilibrium",
        &["No directional edge: stand aside until the state changes."],
    ),
];

const NO_GUIDANCE: &[&str] = &["Not enough data for a strategy recommendation."];

/// Guidance lines for a state tag.
pub fn strategy_guidance(state: MarketState) -> &'static [&'static str] {
    let tag = state.as_str();
    GUIDANCE
        .iter()
        .find(|(keyword, _)| tag.contains(keyword))
        .map(|(_, lines)| *lines)
        .unwrap_or(NO_GUIDANCE)
}

pub fn render(report: &AnalysisReport) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "=== Market Analysis ===")?;
    writeln!(out, "Dataset:        {}", report.dataset_hash.short())?;
    match (report.first_timestamp, report.last_timestamp) {
        (Some(first), Some(last)) => writeln!(out, "Period:         {first} to {last}")?,
        _ => writeln!(out, "Period:         (empty)")?,
    }
    match report.interval {
        Some(interval) => writeln!(out, "Bars:           {} ({interval})", report.bar_count)?,
        None => writeln!(out, "Bars:           {}", report.bar_count)?,
    }
    writeln!(out, "State:          {}", report.market_state)?;
    writeln!(out, "Enhanced:       {}", report.enhanced_state)?;

    if let Some(levels) = &report.levels {
        writeln!(out)?;
        writeln!(out, "--- Levels ---")?;
        writeln!(out, "Current:        {:.2}", levels.current_price)?;
        writeln!(out, "Resistance:     {:.2}", levels.resistance)?;
        writeln!(out, "Equilibrium:    {:.2}", levels.equilibrium)?;
        writeln!(out, "Support:        {:.2}", levels.support)?;
        writeln!(
            out,
            "Gaps:           bullish={} bearish={} order_block={}",
            levels.bullish_fvg, levels.bearish_fvg, levels.order_block
        )?;
    }

    if let Some(flags) = &report.last_flags {
        let active = active_flags(flags);
        writeln!(out)?;
        writeln!(out, "--- Last Bar ---")?;
        if active.is_empty() {
            writeln!(out, "Flags:          none")?;
        } else {
            writeln!(out, "Flags:          {}", active.join(", "))?;
        }
        match flags.volatility_regime {
            Some(regime) => writeln!(out, "Volatility:     {regime}")?,
            None => writeln!(out, "Volatility:     undefined")?,
        }
    }

    writeln!(out)?;
    writeln!(out, "--- Strategy ---")?;
    for line in strategy_guidance(report.market_state) {
        writeln!(out, "{line}")?;
    }

    writeln!(out)?;
    writeln!(out, "--- Signals ({}) ---", report.signals.len())?;
    for s in &report.signals {
        writeln!(
            out,
            "{}  #{:<6} {:<5} {:<30} @ {:.2}  strength {:.2}",
            s.timestamp, s.bar_index, s.direction, s.strategy, s.entry_price, s.strength
        )?;
    }
    if !report.signals.is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            "NOTE: every signal uses the state classified at the final bar ({}).",
            report.market_state
        )?;
    }
    Ok(())
}

fn active_flags(flags: &BarFlags) -> Vec<&'static str> {
    [
        (flags.bullish_fvg, "bullish_fvg"),
        (flags.bearish_fvg, "bearish_fvg"),
        (flags.order_block, "order_block"),
        (flags.swing_high, "swing_high"),
        (flags.swing_low, "swing_low"),
        (flags.higher_high, "higher_high"),
        (flags.lower_low, "lower_low"),
        (flags.consolidation, "consolidation"),
        (flags.absorption, "absorption"),
        (flags.volume_climax, "volume_climax"),
        (flags.upper_rejection, "upper_rejection"),
        (flags.lower_rejection, "lower_rejection"),
        (flags.volatility_breakout, "volatility_breakout"),
    ]
    .into_iter()
    .filter_map(|(set, name)| set.then_some(name))
    .collect()
}

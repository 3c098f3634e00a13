use std::fmt::Write as _;

use serde::Serialize;

use shopodds_core::format::to_pct;
use shopodds_core::{Distribution, Level, OddsReport, RarityClass};

const PCT_DIGITS: usize = 2;

/// Everything printed for one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Item name when the target was looked up in the roster.
    pub target: Option<String>,
    pub level: Level,
    pub rarity: RarityClass,
    pub rolls: u32,
    pub odds: OddsReport,
    /// `P(bought >= 1)` after each roll.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trajectory: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monte_carlo: Option<MonteCarloSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloSummary {
    pub trials: usize,
    pub seed: u64,
    pub distribution: Distribution,
}

impl RunReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_text(&self) -> String {
        let odds = &self.odds;
        let k = odds.desired_count;
        let mut out = String::new();

        let title = match self.target.as_deref() {
            Some(name) => format!("{name}, {}", self.rarity),
            None => self.rarity.to_string(),
        };
        let _ = writeln!(out, "Target: {title}, level {}", self.level);
        let _ = writeln!(out, "Remaining copies of target: {}", odds.unit_remaining);
        let _ = writeln!(out, "Remaining copies in tier:   {}", odds.tier_remaining);
        let _ = writeln!(out, "Per-slot hit chance:        {}", pct(odds.p_slot_hit));
        let _ = writeln!(out, "Per-shop hit chance (est.): {}", pct(odds.p_shop_hit));
        let _ = writeln!(
            out,
            "Seen at least once in {} rolls (est.): {}",
            self.rolls,
            pct(odds.p_rolls_hit)
        );
        let _ = writeln!(
            out,
            "Bought at least {k} in {} rolls: {}",
            self.rolls,
            pct(odds.p_at_least_k)
        );
        let _ = writeln!(
            out,
            "Bought exactly {k} in {} rolls:  {}",
            self.rolls,
            pct(odds.p_exactly_k)
        );
        let _ = writeln!(out, "Expected copies bought: {:.3}", odds.expected_copies);

        out.push_str("\nCopies  P(exactly)  P(at least)\n");
        for (copies, p) in odds.distribution.iter() {
            if p < 5e-5 && copies > k as usize {
                break;
            }
            let _ = writeln!(
                out,
                "{copies:>6}  {:>10}  {:>11}",
                pct(p),
                pct(odds.distribution.at_least(copies))
            );
        }

        if let Some(trajectory) = self.trajectory.as_ref() {
            out.push_str("\nRoll  P(at least 1)\n");
            for (idx, p) in trajectory.iter().enumerate() {
                let _ = writeln!(out, "{:>4}  {:>13}", idx + 1, pct(*p));
            }
        }

        if let Some(mc) = self.monte_carlo.as_ref() {
            let _ = writeln!(
                out,
                "\nMonte Carlo ({} trials, seed {}): at least {k} = {}, exact model = {}",
                mc.trials,
                mc.seed,
                pct(mc.distribution.at_least(k as usize)),
                pct(odds.p_at_least_k)
            );
        }

        out
    }
}

fn pct(p: f64) -> String {
    to_pct(p, PCT_DIGITS)
}

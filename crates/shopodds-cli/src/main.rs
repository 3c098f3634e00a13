use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{ArgGroup, Parser};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use shopodds_core::evidence::{ContestedTally, ObservedUnit};
use shopodds_core::montecarlo::sample_bought_distribution;
use shopodds_core::simulate::{SimulationParams, simulate_trajectory};
use shopodds_core::{OddsRequest, ShopOddsEngine, Tier};
use shopodds_cli::config::ShopConfig;
use shopodds_cli::logging::init_logging;
use shopodds_cli::plot::render_distribution;
use shopodds_cli::report::{MonteCarloSummary, RunReport};

/// Odds of finding a shop item over a run of refreshes.
#[derive(Debug, Parser)]
#[command(
    name = "shopodds",
    author,
    version,
    about = "Shop roll probabilities with pool depletion"
)]
#[command(group(ArgGroup::new("target").required(true).args(["item", "tier"])))]
struct Cli {
    /// Optional YAML configuration (game data, defaults, logging).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Target item, looked up in the roster ignoring case and punctuation.
    #[arg(long, value_name = "NAME")]
    item: Option<String>,

    /// Target an anonymous item of this tier instead of a named one.
    #[arg(long, value_name = "TIER")]
    tier: Option<Tier>,

    /// Number of distinct items in the tier (defaults to the roster count).
    #[arg(long, value_name = "COUNT")]
    items_in_tier: Option<u32>,

    /// Player level selecting the rarity rates.
    #[arg(short, long, value_name = "LEVEL")]
    level: Option<u8>,

    /// Number of shop refreshes.
    #[arg(short, long, value_name = "ROLLS")]
    rolls: Option<u32>,

    /// Copies wanted (K in "at least K").
    #[arg(short, long, value_name = "K")]
    want: Option<u32>,

    /// Copies of the target already out of the pool.
    #[arg(long, value_name = "COPIES", allow_hyphen_values = true)]
    contested: Option<i64>,

    /// Copies of the whole tier already out of the pool.
    #[arg(long, value_name = "COPIES", allow_hyphen_values = true)]
    tier_contested: Option<i64>,

    /// Subtract the target's contested copies from --tier-contested.
    #[arg(long)]
    exclude_target: bool,

    /// Observed board unit as NAME or NAME:STAR; adds its copies to the contested counts.
    #[arg(long = "board", value_name = "UNIT", value_parser = parse_board_unit)]
    board: Vec<ObservedUnit>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Write a PNG chart of the bought-count distribution.
    #[arg(long, value_name = "FILE")]
    plot: Option<PathBuf>,

    /// Include P(at least one) after every roll.
    #[arg(long)]
    trajectory: bool,

    /// Cross-check the exact answer with this many sampled runs.
    #[arg(long, value_name = "TRIALS")]
    monte_carlo: Option<usize>,

    /// RNG seed for --monte-carlo.
    #[arg(long, value_name = "SEED", default_value_t = 20251019)]
    seed: u64,

    /// Override the tracing level (trace, debug, info, warn, error).
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn parse_board_unit(raw: &str) -> Result<ObservedUnit, String> {
    match raw.rsplit_once(':') {
        Some((name, star)) => {
            let star = star
                .trim()
                .parse::<u8>()
                .map_err(|_| format!("invalid star level in '{raw}'"))?;
            Ok(ObservedUnit::new(name.trim(), star))
        }
        None => Ok(ObservedUnit::new(raw.trim(), 1)),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => ShopConfig::from_path(path)?,
        None => ShopConfig::default(),
    };

    if let Some(level) = cli.log_level.clone() {
        config.logging.tracing_level = level;
    }
    config.validate()?;

    let _logging_guard = init_logging(&config.logging)?;
    let engine = ShopOddsEngine::new(config.game_data());
    let defaults = &config.defaults;

    let level = cli.level.unwrap_or(defaults.level);
    let rolls = cli.rolls.unwrap_or(defaults.rolls);
    let desired = cli.want.unwrap_or(defaults.desired);
    if !engine.rates().contains_level(level) {
        warn!(level, "level has no rates configured; every tier rate is zero");
    }

    let (target, rarity) = match (cli.item.as_deref(), cli.tier) {
        (Some(name), _) => {
            let info = engine
                .data()
                .find_item(name)
                .with_context(|| format!("item not recognized: {}", name.trim()))?;
            let rarity = engine.rarity_for_tier(info.tier, cli.items_in_tier)?;
            (Some(info.name.clone()), rarity)
        }
        (None, Some(tier)) => (None, engine.rarity_for_tier(tier, cli.items_in_tier)?),
        (None, None) => bail!("either --item or --tier is required"),
    };

    let mut target_consumed = cli.contested.unwrap_or(0);
    let mut tier_consumed = cli.tier_contested;
    if !cli.board.is_empty() {
        let mut tally = ContestedTally::new(engine.data());
        let counted = tally.observe_all(&cli.board);
        info!(
            counted,
            skipped = tally.skipped(),
            "tallied board units"
        );
        // Without an explicit tier total the manual target copies still count
        // against the tier, as they do when no board is given.
        let tier_base = tier_consumed.unwrap_or(target_consumed);
        if let Some(name) = target.as_deref() {
            target_consumed = target_consumed.saturating_add(tally.target_consumed(name));
        }
        tier_consumed = Some(tier_base.saturating_add(tally.tier_consumed(rarity.tier)));
    }

    let mut request =
        OddsRequest::new(level, rarity, target_consumed, rolls).with_desired_count(desired);
    if let Some(total) = tier_consumed {
        request = request.with_tier_consumed(total, cli.exclude_target);
    }

    let odds = engine.evaluate(&request);
    let params = SimulationParams::from_snapshot(level, rarity.tier, odds.snapshot(), rolls);

    let trajectory = cli
        .trajectory
        .then(|| simulate_trajectory(engine.rates(), &params));

    let monte_carlo = cli.monte_carlo.map(|trials| {
        let mut rng = StdRng::seed_from_u64(cli.seed);
        MonteCarloSummary {
            trials,
            seed: cli.seed,
            distribution: sample_bought_distribution(engine.rates(), &params, trials, &mut rng),
        }
    });

    let report = RunReport {
        target,
        level,
        rarity,
        rolls,
        odds,
        trajectory,
        monte_carlo,
    };

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text());
    }

    if let Some(path) = cli.plot.as_ref() {
        let caption = format!("Copies bought in {rolls} rolls at level {level}");
        match render_distribution(path, &report.odds.distribution, desired as usize, &caption) {
            Ok(written) => {
                if !cli.json {
                    println!("Distribution plot: {}", written.display());
                }
            }
            Err(err) => warn!(error = %err, "skipping distribution plot"),
        }
    }

    Ok(())
}

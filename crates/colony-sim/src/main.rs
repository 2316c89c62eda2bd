//! Headless colony simulation entry point.
mod courier;

use anyhow::{Context, Result};
use colony::{ColonyPackageManager, ColonyView, PackageManager, PlayerId};
use colony_ai::{DesiredActivity, SchedulerConfig, TaskSet, WorkerAi};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use courier::{Citizen, Courier};

const DEFAULT_TICKS: u64 = 40;

/// Ticks during which the courier sleeps.
const NIGHT: std::ops::Range<u64> = 24..30;

/// A delivery request arrives on every multiple of this tick.
const DELIVERY_INTERVAL: u64 = 12;

const OWNER: PlayerId = PlayerId(1);

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging()?;

    let config = SchedulerConfig::from_env();
    let ticks = read_env::<u64>("COLONY_SIM_TICKS").unwrap_or(DEFAULT_TICKS);
    info!(
        ticks,
        mutex_bits = config.mutex_bits.bits(),
        level_delay = config.level_delay,
        "starting colony simulation"
    );

    let citizen = Citizen::default();
    let mut ai = WorkerAi::with_config(Courier::new(&citizen), config)
        .context("failed to build the courier AI")?;
    ai.register_targets(courier::targets());

    let mut tasks = TaskSet::new();
    let handle = tasks.add_task(3, ai);

    let mut packages = PackageManager::new(|player: PlayerId, view: ColonyView| {
        info!(target: "colony_sim::views", %player, %view, "view sent");
    });
    packages.add_subscriber(OWNER);

    let mut requests = 0u64;
    for tick in 0..ticks {
        citizen.set_activity(if NIGHT.contains(&tick) {
            DesiredActivity::Sleep
        } else {
            DesiredActivity::Work
        });

        let ai = tasks.get_mut(handle).context("courier task disappeared")?;
        if tick > 0 && tick % DELIVERY_INTERVAL == 0 {
            ai.job_mut().request_delivery();
            requests += 1;
        }
        let before = ai.state();

        tasks.tick();

        let ai = tasks.get(handle).context("courier task disappeared")?;
        if ai.state() != before {
            info!(tick, from = %before, to = %ai.state(), "courier changed state");
            packages.set_dirty();
        }
        packages.update_subscribers();
    }

    let ai = tasks.get(handle).context("courier task disappeared")?;
    let metrics = ai.metrics().snapshot();
    info!(
        ticks = metrics.ticks,
        transitions = metrics.transitions,
        faults = metrics.faults(),
        resets = metrics.resets,
        requests,
        stored = ai.job().stored(),
        "simulation finished"
    );

    Ok(())
}

/// Logs to stderr; `RUST_LOG` overrides the default `info` level.
fn setup_logging() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
        .context("invalid log filter")?;

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .context("failed to install the tracing subscriber")?;

    Ok(())
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    std::env::var(key).ok()?.parse().ok()
}

use std::path::PathBuf;
use std::time::{Duration, Instant};

use charged_particles::{feed, utils, RunConfig, Scheduler, Simulation, SnapshotFeed};
use clap::Parser;

/// Headless charged particle simulation.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Run configuration (JSON); defaults are used when omitted.
    config: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> charged_particles::Result<()> {
    let config = match args.config {
        Some(path) => {
            log::info!("loading {}", path.display());
            RunConfig::load(path)?
        }
        None => RunConfig::default(),
    };

    let scheduler = Scheduler::new(config.execution, config.workers)?;
    let mut simulation = Simulation::new(config.parameters.clone(), scheduler);

    let mut rng = fastrand::Rng::with_seed(config.seed);
    simulation.extend(utils::triplet_cloud(
        config.seed_triplets,
        config.parameters.half_extent,
        &mut rng,
    ));
    log::info!(
        "{} bodies, {:?} on {} worker(s)",
        simulation.len(),
        simulation.scheduler().execution(),
        simulation.scheduler().workers()
    );

    let feed = match &config.feed_address {
        Some(addr) if addr.is_empty() => Some(SnapshotFeed::bind(feed::DEFAULT_ADDRESS)?),
        Some(addr) => Some(SnapshotFeed::bind(addr.as_str())?),
        None => None,
    };

    let frame = Duration::from_secs_f64(1.0 / config.tick_rate);
    let mut busy = Duration::ZERO;
    let mut collisions = 0;

    loop {
        if config.max_ticks.is_some_and(|max| simulation.ticks() >= max) {
            break;
        }

        let started = Instant::now();
        let report = simulation.tick();
        let elapsed = started.elapsed();
        busy += elapsed;
        collisions += report.collisions;

        if let Some(feed) = &feed {
            match simulation.snapshot().to_line() {
                Ok(line) => {
                    feed.publish(line);
                }
                Err(err) => log::warn!("snapshot encoding failed: {err}"),
            }
        }

        let ticks = simulation.ticks();
        if config.report_every > 0 && ticks % config.report_every == 0 {
            log::info!(
                "tick {ticks}: {:.3} ms/tick, {collisions} collisions, kinetic energy {:.3e}",
                busy.as_secs_f64() * 1e3 / config.report_every as f64,
                simulation.kinetic_energy()
            );
            busy = Duration::ZERO;
            collisions = 0;
        }

        if let Some(rest) = frame.checked_sub(elapsed) {
            std::thread::sleep(rest);
        }
    }

    log::info!("stopped after {} ticks", simulation.ticks());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_line_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn config_path_is_optional() {
        let args = Args::try_parse_from(["charged-particles"]).unwrap();
        assert_eq!(args.config, None);

        let args = Args::try_parse_from(["charged-particles", "runs/dense.json"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("runs/dense.json")));

        assert!(Args::try_parse_from(["charged-particles", "a.json", "b.json"]).is_err());
    }
}

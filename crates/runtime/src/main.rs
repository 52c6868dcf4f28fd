#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

mod cli;
mod eval;
mod rollout;
mod watcher;

use anyhow::Result;
use profile::{EnvProfile, ProfileStore};
use rl::{ContinuousRobotEnv, CurriculumEnv, DiscreteAction, Env, RobotEnv, VisitedGridWrapper};

use crate::rollout::{Driver, EpisodeReport, Policy};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = cli::parse(std::env::args().skip(1))?;
    let store = ProfileStore::new(config.store_path.clone());

    if config.list {
        for summary in store.list() {
            println!("{}", serde_json::to_string(&summary)?);
        }
        return Ok(());
    }

    let profile = store.get(&config.profile);
    tracing::info!("profile `{}` ({})", config.profile, profile.label);

    if config.eval {
        let policy_obs_dim = std::env::var("ARENA_POLICY_OBS_DIM")
            .ok()
            .and_then(|v| v.parse().ok());
        let options = eval::EvalOptions {
            episodes: config.episodes,
            seed: config.seed.unwrap_or(0),
            policy_obs_dim,
        };
        let report = eval::run_eval(&config.profile, &profile, &options)?;
        report.log();
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    let _watcher = if config.watch {
        Some(watcher::start(&config.store_path, &config.profile)?)
    } else {
        None
    };

    let reports = run_rollouts(&config, &profile)?;
    for report in &reports {
        println!("{}", serde_json::to_string(report)?);
    }
    summarize(&reports);

    if config.watch {
        tracing::info!("watch mode active, press Ctrl-C to stop");
        loop {
            std::thread::sleep(std::time::Duration::from_secs(3600));
        }
    }
    Ok(())
}

fn run_rollouts(config: &cli::RunConfig, profile: &EnvProfile) -> Result<Vec<EpisodeReport>> {
    let key = config.profile.clone();
    if config.continuous {
        let env = ContinuousRobotEnv::new(key, profile)?;
        Ok(if config.memory_grid {
            drive_continuous(VisitedGridWrapper::new(env), config)
        } else {
            drive_continuous(env, config)
        })
    } else if config.curriculum {
        let env = CurriculumEnv::new(key, profile)?;
        Ok(if config.memory_grid {
            drive_discrete(VisitedGridWrapper::new(env), config)
        } else {
            drive_discrete(env, config)
        })
    } else {
        let env = RobotEnv::new(key, profile)?;
        Ok(if config.memory_grid {
            drive_discrete(VisitedGridWrapper::new(env), config)
        } else {
            drive_discrete(env, config)
        })
    }
}

fn drive_discrete<E>(mut env: E, config: &cli::RunConfig) -> Vec<EpisodeReport>
where
    E: Env<Action = DiscreteAction>,
{
    let mut driver = Driver::new(Policy::SeekClearance, config.seed.unwrap_or(0));
    rollout::run_batch(config.episodes, config.seed, |seed| {
        rollout::run_discrete_episode(&mut env, &mut driver, seed)
    })
}

fn drive_continuous<E>(mut env: E, config: &cli::RunConfig) -> Vec<EpisodeReport>
where
    E: Env<Action = [f32; 2]>,
{
    let mut driver = Driver::new(Policy::SeekClearance, config.seed.unwrap_or(0));
    rollout::run_batch(config.episodes, config.seed, |seed| {
        rollout::run_continuous_episode(&mut env, &mut driver, seed)
    })
}

fn summarize(reports: &[EpisodeReport]) {
    let n = reports.len().max(1) as f32;
    let avg_reward = reports.iter().map(|r| r.total_reward).sum::<f32>() / n;
    let avg_steps = reports.iter().map(|r| r.steps).sum::<u32>() as f32 / n;
    let goals = reports.iter().filter(|r| r.goal_reached).count();
    let collisions = reports.iter().filter(|r| r.collided).count();
    tracing::info!(
        "{} episodes, avg reward {avg_reward:.2}, avg steps {avg_steps:.0}, \
         {goals} reached the goal, {collisions} collided",
        reports.len()
    );
}

//! Hot-reload watcher for the custom profile store.
//!
//! Whenever the store file changes on disk the active profile is re-read
//! and a short preview episode reports whether it still behaves.

use std::path::{Path, PathBuf};

use anyhow::Result;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use profile::ProfileStore;
use tracing::info;

use crate::rollout::{self, Driver, Policy};

fn preview(store: &ProfileStore, key: &str) {
    let profile = store.get(key);
    match rl::RobotEnv::new(key, &profile) {
        Ok(mut env) => {
            let mut driver = Driver::new(Policy::Wander, 0);
            let report = rollout::run_discrete_episode(&mut env, &mut driver, Some(0));
            info!(
                "profile `{key}` reloaded: {} steps, reward {:.2}, goal {}",
                report.steps, report.total_reward, report.goal_reached
            );
        }
        Err(e) => tracing::error!("profile `{key}` no longer builds: {e}"),
    }
}

/// Watch the store file's directory and preview `profile_key` on changes.
pub fn start(store_path: &Path, profile_key: &str) -> Result<RecommendedWatcher> {
    info!("watching {} for profile edits", store_path.display());

    let store = ProfileStore::new(store_path.to_path_buf());
    let key = profile_key.to_owned();
    let target: PathBuf = store_path.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            if event.kind.is_modify() || event.kind.is_create() {
                for path in &event.paths {
                    if path.extension().map_or(false, |ext| ext == "json")
                        && path.file_name() == target.file_name()
                    {
                        preview(&store, &key);
                    }
                }
            }
        }
        Err(e) => tracing::error!("profile watch error: {e:?}"),
    })?;

    // The store file may not exist yet, so watch its directory instead.
    let dir = store_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

//! Minimal argument parsing for the rollout binary.

use std::path::PathBuf;

use anyhow::{bail, Result};
use profile::catalog;

/// Store file consulted for custom profiles, overridable through the
/// `ARENA_PROFILE_STORE` environment variable.
pub const DEFAULT_STORE: &str = "custom_profiles.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub profile: String,
    pub episodes: u32,
    pub continuous: bool,
    pub memory_grid: bool,
    pub curriculum: bool,
    pub seed: Option<u64>,
    pub eval: bool,
    pub watch: bool,
    pub list: bool,
    pub store_path: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            profile: catalog::DEFAULT_PROFILE.to_owned(),
            episodes: 5,
            continuous: false,
            memory_grid: false,
            curriculum: false,
            seed: None,
            eval: false,
            watch: false,
            list: false,
            store_path: store_path_from_env(),
        }
    }
}

fn store_path_from_env() -> PathBuf {
    std::env::var("ARENA_PROFILE_STORE")
        .map_or_else(|_| PathBuf::from(DEFAULT_STORE), PathBuf::from)
}

/// Parse command-line arguments (without the program name).
///
/// # Errors
///
/// Fails on unknown flags, missing or malformed flag values, more than one
/// positional profile key, or flag combinations that cannot run together.
pub fn parse<I>(args: I) -> Result<RunConfig>
where
    I: IntoIterator<Item = String>,
{
    let mut config = RunConfig::default();
    let mut saw_profile = false;
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--episodes" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--episodes needs a value"))?;
                config.episodes = value.parse()?;
            }
            "--seed" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed needs a value"))?;
                config.seed = Some(value.parse()?);
            }
            "--continuous" => config.continuous = true,
            "--memory-grid" => config.memory_grid = true,
            "--curriculum" => config.curriculum = true,
            "--eval" => config.eval = true,
            "--watch" => config.watch = true,
            "--list" => config.list = true,
            flag if flag.starts_with("--") => bail!("unknown flag `{flag}`"),
            key => {
                if saw_profile {
                    bail!("more than one profile key given: `{key}`");
                }
                config.profile = key.to_owned();
                saw_profile = true;
            }
        }
    }

    if config.curriculum && config.continuous {
        bail!("--curriculum drives the discrete environment; drop --continuous");
    }
    if config.episodes == 0 {
        bail!("--episodes must be at least 1");
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn defaults_without_arguments() {
        let config = parse(args(&[])).unwrap();
        assert_eq!(config.profile, "arena_basic");
        assert_eq!(config.episodes, 5);
        assert!(!config.continuous);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn positional_profile_and_flags_combine() {
        let config = parse(args(&[
            "goal_chase",
            "--episodes",
            "12",
            "--seed",
            "42",
            "--memory-grid",
        ]))
        .unwrap();
        assert_eq!(config.profile, "goal_chase");
        assert_eq!(config.episodes, 12);
        assert_eq!(config.seed, Some(42));
        assert!(config.memory_grid);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(parse(args(&["--frobnicate"])).is_err());
    }

    #[test]
    fn flag_values_must_parse() {
        assert!(parse(args(&["--episodes", "many"])).is_err());
        assert!(parse(args(&["--seed"])).is_err());
        assert!(parse(args(&["--episodes", "0"])).is_err());
    }

    #[test]
    fn curriculum_and_continuous_conflict() {
        assert!(parse(args(&["--curriculum", "--continuous"])).is_err());
    }

    #[test]
    fn second_positional_is_rejected() {
        assert!(parse(args(&["goal_chase", "apple_field"])).is_err());
    }
}

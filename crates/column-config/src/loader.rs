// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, applied in order:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ColumnConfig, ConfigError, ConfigResult, CONFIG_FILE_NAME};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Find the configuration file
///
/// Search order:
/// 1. `COLUMN_CONFIG_PATH` environment variable
/// 2. Current working directory: `./column_configuration.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("COLUMN_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by COLUMN_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet COLUMN_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from a TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, the file is searched for.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if the file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<ColumnConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: ColumnConfig = toml::from_str(&content)?;
    info!("[CONFIG] Loaded {}", config_file.display());

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Like [`load_config`], but falls back to built-in defaults when no file can be found.
///
/// An explicit `config_path` that does not exist is still an error.
pub fn load_config_or_default(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<ColumnConfig> {
    if config_path.is_some() {
        return load_config(config_path, cli_args);
    }

    match find_config_file() {
        Ok(path) => load_config(Some(&path), cli_args),
        Err(ConfigError::FileNotFound(searched)) => {
            debug!("[CONFIG] No config file, using defaults. {}", searched);
            let mut config = ColumnConfig::default();
            apply_environment_overrides(&mut config);
            if let Some(cli) = cli_args {
                apply_cli_overrides(&mut config, cli);
            }
            Ok(config)
        }
        Err(e) => Err(e),
    }
}

fn parse_flag(value: &str) -> bool {
    let lowered = value.to_lowercase();
    lowered == "true" || lowered == "1" || lowered == "yes"
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `COLUMN_LOG_LEVEL` -> `system.log_level`
/// - `COLUMN_PHASE_DWELL_MS` -> `animation.phase_dwell_ms`
/// - `COLUMN_FRAME_RATE_HZ` -> `animation.frame_rate_hz`
/// - `COLUMN_PARTICLE_STEP` -> `particles.step_per_frame`
/// - `COLUMN_PARTICLE_SEED` -> `particles.seed`
/// - `COLUMN_TOPOLOGY_PATH` -> `topology.path`
/// - `COLUMN_INITIAL_PHASE` -> `controls.initial_phase`
/// - `COLUMN_AUTOPLAY` -> `controls.autoplay`
/// - `COLUMN_OUTPUT_DIR` -> `render.output_dir`
pub fn apply_environment_overrides(config: &mut ColumnConfig) {
    if let Ok(value) = env::var("COLUMN_LOG_LEVEL") {
        config.system.log_level = value;
    }

    if let Ok(value) = env::var("COLUMN_PHASE_DWELL_MS") {
        if let Ok(ms) = value.parse::<u64>() {
            config.animation.phase_dwell_ms = ms;
        }
    }
    if let Ok(value) = env::var("COLUMN_FRAME_RATE_HZ") {
        if let Ok(hz) = value.parse::<f64>() {
            config.animation.frame_rate_hz = hz;
        }
    }

    if let Ok(value) = env::var("COLUMN_PARTICLE_STEP") {
        if let Ok(step) = value.parse::<f64>() {
            config.particles.step_per_frame = step;
        }
    }
    if let Ok(value) = env::var("COLUMN_PARTICLE_SEED") {
        if let Ok(seed) = value.parse::<u64>() {
            config.particles.seed = Some(seed);
        }
    }

    if let Ok(value) = env::var("COLUMN_TOPOLOGY_PATH") {
        config.topology.path = Some(PathBuf::from(value));
    }

    if let Ok(value) = env::var("COLUMN_INITIAL_PHASE") {
        config.controls.initial_phase = value.to_lowercase();
    }
    if let Ok(value) = env::var("COLUMN_AUTOPLAY") {
        config.controls.autoplay = parse_flag(&value);
    }

    if let Ok(value) = env::var("COLUMN_OUTPUT_DIR") {
        config.render.output_dir = PathBuf::from(value);
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - Map of CLI arguments (e.g., `{"phase_dwell_ms": "900", "autoplay": "true"}`)
pub fn apply_cli_overrides(config: &mut ColumnConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("log_level") {
        config.system.log_level = value.clone();
    }

    if let Some(value) = cli_args.get("phase_dwell_ms") {
        if let Ok(ms) = value.parse::<u64>() {
            config.animation.phase_dwell_ms = ms;
        }
    }
    if let Some(value) = cli_args.get("frame_rate_hz") {
        if let Ok(hz) = value.parse::<f64>() {
            config.animation.frame_rate_hz = hz;
        }
    }

    if let Some(value) = cli_args.get("particle_step") {
        if let Ok(step) = value.parse::<f64>() {
            config.particles.step_per_frame = step;
        }
    }
    if let Some(value) = cli_args.get("particle_seed") {
        if let Ok(seed) = value.parse::<u64>() {
            config.particles.seed = Some(seed);
        }
    }

    if let Some(value) = cli_args.get("topology_path") {
        config.topology.path = Some(PathBuf::from(value));
    }

    if let Some(value) = cli_args.get("initial_phase") {
        config.controls.initial_phase = value.to_lowercase();
    }
    if let Some(value) = cli_args.get("autoplay") {
        config.controls.autoplay = parse_flag(value);
    }

    if let Some(value) = cli_args.get("output_dir") {
        config.render.output_dir = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("snapshot_every") {
        if let Ok(every) = value.parse::<u64>() {
            config.render.snapshot_every = every;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_config.toml");
        File::create(&config_path).unwrap();

        env::set_var("COLUMN_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("COLUMN_CONFIG_PATH");

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        env::set_var("COLUMN_CONFIG_PATH", missing.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("COLUMN_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::remove_var("COLUMN_PHASE_DWELL_MS");
        env::remove_var("COLUMN_FRAME_RATE_HZ");
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[animation]").unwrap();
        writeln!(file, "phase_dwell_ms = 900").unwrap();
        writeln!(file, "[particles]").unwrap();
        writeln!(file, "seed = 42").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.animation.phase_dwell_ms, 900);
        assert_eq!(config.animation.frame_rate_hz, 60.0);
        assert_eq!(config.particles.seed, Some(42));
    }

    #[test]
    fn test_load_config_or_default_with_explicit_missing_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let result = load_config_or_default(Some(&missing), None);
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = ColumnConfig::default();

        env::set_var("COLUMN_PHASE_DWELL_MS", "700");
        env::set_var("COLUMN_AUTOPLAY", "yes");
        env::set_var("COLUMN_INITIAL_PHASE", "Predict");

        apply_environment_overrides(&mut config);

        env::remove_var("COLUMN_PHASE_DWELL_MS");
        env::remove_var("COLUMN_AUTOPLAY");
        env::remove_var("COLUMN_INITIAL_PHASE");

        assert_eq!(config.animation.phase_dwell_ms, 700);
        assert!(config.controls.autoplay);
        assert_eq!(config.controls.initial_phase, "predict");
    }

    #[test]
    fn test_unparseable_env_value_is_ignored() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = ColumnConfig::default();

        env::set_var("COLUMN_FRAME_RATE_HZ", "fast");
        apply_environment_overrides(&mut config);
        env::remove_var("COLUMN_FRAME_RATE_HZ");

        assert_eq!(config.animation.frame_rate_hz, 60.0);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = ColumnConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("particle_seed".to_string(), "7".to_string());
        cli_args.insert("snapshot_every".to_string(), "5".to_string());
        cli_args.insert("topology_path".to_string(), "column.json".to_string());

        apply_cli_overrides(&mut config, &cli_args);

        assert_eq!(config.particles.seed, Some(7));
        assert_eq!(config.render.snapshot_every, 5);
        assert_eq!(config.topology.path, Some(PathBuf::from("column.json")));
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[animation]").unwrap();
        writeln!(file, "phase_dwell_ms = 1000").unwrap();
        writeln!(file, "frame_rate_hz = 30.0").unwrap();

        env::set_var("COLUMN_PHASE_DWELL_MS", "2000");
        env::set_var("COLUMN_FRAME_RATE_HZ", "120");

        let mut cli_args = HashMap::new();
        cli_args.insert("phase_dwell_ms".to_string(), "3000".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();

        env::remove_var("COLUMN_PHASE_DWELL_MS");
        env::remove_var("COLUMN_FRAME_RATE_HZ");

        // CLI wins for dwell, env wins for frame rate (no CLI override)
        assert_eq!(config.animation.phase_dwell_ms, 3000);
        assert_eq!(config.animation.frame_rate_hz, 120.0);
    }
}

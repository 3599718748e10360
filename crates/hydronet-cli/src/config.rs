mod defaults;

use self::defaults::DefaultsConfig;
use crate::cli::Cli;
use crate::error::{CliError, Result};
use hydronet::core::models::water::WaterModel;
use hydronet::engine::config::{DisorderConfig, DisorderConfigBuilder};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSearchConfig {
    cutoff: Option<f64>,
    #[serde(rename = "dipole-target")]
    dipole_target: Option<f64>,
    nshakes: Option<usize>,
    #[serde(rename = "max-repair-iterations")]
    max_repair_iterations: Option<usize>,
    #[serde(rename = "max-round-retries")]
    max_round_retries: Option<usize>,
    seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialStopConfig {
    #[serde(rename = "max-rounds")]
    max_rounds: Option<u64>,
    /// Seconds.
    #[serde(rename = "time-limit")]
    time_limit: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    #[serde(rename = "water-model")]
    water_model: Option<WaterModel>,
    checkpoint: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRunConfig {
    search: Option<PartialSearchConfig>,
    stop: Option<PartialStopConfig>,
    output: Option<PartialOutputConfig>,
}

/// Everything a run needs once file, `--set` and command-line values are merged.
#[derive(Debug)]
pub struct RunSettings {
    pub disorder: DisorderConfig,
    pub output_path: PathBuf,
    pub water_model: WaterModel,
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the file named by `--config`, or starts from an empty configuration.
    pub fn load(args: &Cli) -> Result<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_with_cli(mut self, args: &Cli) -> Result<RunSettings> {
        self.apply_set_values(&args.set_values)?;
        let defaults = DefaultsConfig::default();

        let search = self.search.take().unwrap_or_default();
        let stop = self.stop.take().unwrap_or_default();
        let output = self.output.take().unwrap_or_default();

        let output_path = args
            .output_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults.output_file));

        let water_model = if args.tip3p {
            WaterModel::Tip3p
        } else {
            output.water_model.unwrap_or(defaults.water_model)
        };

        let mut builder = DisorderConfigBuilder::new()
            .cutoff(search.cutoff.unwrap_or(defaults.cutoff))
            .dipole_target(
                args.dipole_target
                    .or(search.dipole_target)
                    .unwrap_or(defaults.dipole_target),
            )
            .max_repair_iterations(
                args.max_repair_iterations
                    .or(search.max_repair_iterations)
                    .unwrap_or(defaults.max_repair_iterations),
            )
            .max_round_retries(
                args.max_round_retries
                    .or(search.max_round_retries)
                    .unwrap_or(defaults.max_round_retries),
            )
            .max_rounds(
                args.max_rounds
                    .or(stop.max_rounds)
                    .unwrap_or(defaults.max_rounds),
            );

        if let Some(nshakes) = args.nshakes.or(search.nshakes) {
            builder = builder.nshakes(nshakes);
        }
        if let Some(seed) = args.seed.or(search.seed) {
            builder = builder.seed(seed);
        }
        if let Some(seconds) = args.time_limit.or(stop.time_limit) {
            let limit = Duration::try_from_secs_f64(seconds).map_err(|e| {
                CliError::Config(format!("Invalid time limit of {seconds} seconds: {e}"))
            })?;
            builder = builder.time_limit(limit);
        }
        if !args.no_checkpoint {
            let path = args
                .checkpoint
                .clone()
                .or(output.checkpoint)
                .unwrap_or_else(|| with_suffix(&output_path, defaults.checkpoint_suffix));
            builder = builder.checkpoint_path(path);
        }
        if let Some(path) = &args.resume {
            builder = builder.resume_from(path.clone());
        }

        let disorder = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(RunSettings {
            disorder,
            output_path,
            water_model,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "search.cutoff" => {
                    let search = self.search.get_or_insert_with(Default::default);
                    search.cutoff = Some(parse(key, value)?);
                }
                "search.dipole-target" => {
                    let search = self.search.get_or_insert_with(Default::default);
                    search.dipole_target = Some(parse(key, value)?);
                }
                "search.nshakes" => {
                    let search = self.search.get_or_insert_with(Default::default);
                    search.nshakes = Some(parse(key, value)?);
                }
                "search.max-repair-iterations" => {
                    let search = self.search.get_or_insert_with(Default::default);
                    search.max_repair_iterations = Some(parse(key, value)?);
                }
                "search.max-round-retries" => {
                    let search = self.search.get_or_insert_with(Default::default);
                    search.max_round_retries = Some(parse(key, value)?);
                }
                "search.seed" => {
                    let search = self.search.get_or_insert_with(Default::default);
                    search.seed = Some(parse(key, value)?);
                }
                "stop.max-rounds" => {
                    let stop = self.stop.get_or_insert_with(Default::default);
                    stop.max_rounds = Some(parse(key, value)?);
                }
                "stop.time-limit" => {
                    let stop = self.stop.get_or_insert_with(Default::default);
                    stop.time_limit = Some(parse(key, value)?);
                }
                "output.water-model" => {
                    let model = match value.to_ascii_lowercase().as_str() {
                        "tip3p" => WaterModel::Tip3p,
                        "tip4p" => WaterModel::Tip4p,
                        _ => {
                            return Err(CliError::Config(format!(
                                "Invalid value for {}: {} (expected tip3p or tip4p)",
                                key, value
                            )));
                        }
                    };
                    self.output.get_or_insert_with(Default::default).water_model = Some(model);
                }
                "output.checkpoint" => {
                    let output = self.output.get_or_insert_with(Default::default);
                    output.checkpoint = Some(PathBuf::from(value));
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("hydronet.toml");
        fs::write(&path, content).unwrap();
        path
    }

    fn cli(extra: &[&str]) -> Cli {
        let mut args = vec!["hydronet", "-i", "ice.csv"];
        args.extend_from_slice(extra);
        Cli::parse_from(args)
    }

    #[test]
    fn defaults_apply_without_a_config_file() {
        let args = cli(&[]);
        let settings = PartialRunConfig::load(&args)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(settings.output_path, PathBuf::from("ice.xyz"));
        assert_eq!(settings.water_model, WaterModel::Tip4p);
        assert_eq!(settings.disorder.search.dipole_target, 0.1);
        assert_eq!(settings.disorder.search.cutoff, 3.0);
        assert!(settings.disorder.search.nshakes.is_none());
        assert_eq!(
            settings.disorder.checkpoint_path,
            Some(PathBuf::from("ice.xyz.chk"))
        );
        assert!(settings.disorder.resume_from.is_none());
        assert_eq!(settings.disorder.stop.max_rounds, Some(1_000_000));
        assert!(settings.disorder.stop.time_limit.is_none());
    }

    #[test]
    fn file_values_are_used_when_no_flag_is_given() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [search]
            cutoff = 3.2
            dipole-target = 0.05
            nshakes = 4
            seed = 17

            [stop]
            max-rounds = 500
            time-limit = 2.5

            [output]
            water-model = "tip3p"
            checkpoint = "runs/ice.chk"
            "#,
        );
        let args = cli(&["-c", path.to_str().unwrap()]);
        let settings = PartialRunConfig::load(&args)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        let search = &settings.disorder.search;
        assert_eq!(search.cutoff, 3.2);
        assert_eq!(search.dipole_target, 0.05);
        assert_eq!(search.nshakes, Some(4));
        assert_eq!(search.seed, Some(17));
        assert_eq!(settings.disorder.stop.max_rounds, Some(500));
        assert_eq!(
            settings.disorder.stop.time_limit,
            Some(Duration::from_millis(2500))
        );
        assert_eq!(settings.water_model, WaterModel::Tip3p);
        assert_eq!(
            settings.disorder.checkpoint_path,
            Some(PathBuf::from("runs/ice.chk"))
        );
    }

    #[test]
    fn precedence_is_flag_then_set_then_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [search]
            dipole-target = 0.5
            nshakes = 4
            seed = 1
            "#,
        );
        let args = cli(&[
            "-c",
            path.to_str().unwrap(),
            "-d",
            "0.01",
            "-S",
            "search.dipole-target=0.2",
            "-S",
            "search.nshakes=9",
        ]);
        let settings = PartialRunConfig::load(&args)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(settings.disorder.search.dipole_target, 0.01);
        assert_eq!(settings.disorder.search.nshakes, Some(9));
        assert_eq!(settings.disorder.search.seed, Some(1));
    }

    #[test]
    fn no_checkpoint_disables_checkpointing() {
        let args = cli(&["-o", "out.pdb", "--no-checkpoint", "--resume", "old.chk"]);
        let settings = PartialRunConfig::default().merge_with_cli(&args).unwrap();
        assert!(settings.disorder.checkpoint_path.is_none());
        assert_eq!(settings.disorder.resume_from, Some(PathBuf::from("old.chk")));
        assert_eq!(settings.output_path, PathBuf::from("out.pdb"));
    }

    #[test]
    fn checkpoint_defaults_next_to_the_output() {
        let args = cli(&["-o", "runs/ice.pdb"]);
        let settings = PartialRunConfig::default().merge_with_cli(&args).unwrap();
        assert_eq!(
            settings.disorder.checkpoint_path,
            Some(PathBuf::from("runs/ice.pdb.chk"))
        );
    }

    #[test]
    fn tip3p_flag_overrides_file_model() {
        let args = cli(&["-t", "-S", "output.water-model=tip4p"]);
        let settings = PartialRunConfig::default().merge_with_cli(&args).unwrap();
        assert_eq!(settings.water_model, WaterModel::Tip3p);
    }

    #[test]
    fn invalid_set_values_are_rejected() {
        let mut config = PartialRunConfig::default();
        assert!(matches!(
            config.apply_set_values(&["search.cutoff".to_string()]),
            Err(CliError::Config(_))
        ));
        assert!(matches!(
            config.apply_set_values(&["search.unknown=1".to_string()]),
            Err(CliError::Config(_))
        ));
        assert!(matches!(
            config.apply_set_values(&["search.nshakes=many".to_string()]),
            Err(CliError::Config(_))
        ));
        assert!(matches!(
            config.apply_set_values(&["output.water-model=spc".to_string()]),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[search]\ntemperature = 300.0\n");
        assert!(matches!(
            PartialRunConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn invalid_core_values_surface_as_config_errors() {
        let args = cli(&["--dipole-target=-1.0", "--no-checkpoint"]);
        assert!(matches!(
            PartialRunConfig::default().merge_with_cli(&args),
            Err(CliError::Config(_))
        ));

        let args = cli(&["--time-limit=-3", "--no-checkpoint"]);
        assert!(matches!(
            PartialRunConfig::default().merge_with_cli(&args),
            Err(CliError::Config(_))
        ));
    }
}

use hydronet::core::models::water::WaterModel;
use hydronet::engine::config::{
    DEFAULT_CUTOFF, DEFAULT_MAX_REPAIR_ITERATIONS, DEFAULT_MAX_ROUND_RETRIES,
};

pub struct DefaultsConfig {
    pub cutoff: f64,
    pub dipole_target: f64,
    pub max_repair_iterations: usize,
    pub max_round_retries: usize,
    pub max_rounds: u64,
    pub output_file: &'static str,
    pub checkpoint_suffix: &'static str,
    pub water_model: WaterModel,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            dipole_target: 0.1,
            max_repair_iterations: DEFAULT_MAX_REPAIR_ITERATIONS,
            max_round_retries: DEFAULT_MAX_ROUND_RETRIES,
            max_rounds: 1_000_000,
            output_file: "ice.xyz",
            checkpoint_suffix: ".chk",
            water_model: WaterModel::Tip4p,
        }
    }
}

use crate::cli::Cli;
use crate::config::PartialRunConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use hydronet::core::io::{self, Format, error::FormatError};
use hydronet::core::models::water::WaterStructure;
use hydronet::engine::progress::ProgressReporter;
use hydronet::workflows;
use indicatif::ProgressDrawTarget;
use tracing::{info, warn};

pub fn run(args: &Cli) -> Result<()> {
    let settings = PartialRunConfig::load(args)?.merge_with_cli(args)?;

    // Reject an unwritable output before spending time on the search.
    let output_format = Format::for_output(&settings.output_path)?;
    info!(
        path = ?settings.output_path,
        format = %output_format,
        model = %settings.water_model,
        "Output target resolved."
    );

    info!("Loading oxygen table from {:?}", &args.input_file);
    let lattice = io::read_lattice(&args.input_file)?;

    let progress_handler = if args.quiet {
        CliProgressHandler::with_draw_target(ProgressDrawTarget::hidden())
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting proton disordering of {} oxygens...", lattice.len());
    info!("Invoking the core disorder workflow...");
    let result = workflows::disorder::run(&lattice, &settings.disorder, &reporter)?;

    if !result.anomalies.is_empty() {
        warn!(
            count = result.anomalies.len(),
            "Some oxygens do not have four neighbors; the lattice may be defective."
        );
        println!(
            "Warning: {} oxygen(s) do not have exactly four neighbors.",
            result.anomalies.len()
        );
    }

    let structure = WaterStructure::build(
        &lattice,
        &result.network,
        &result.best.configuration,
        settings.water_model,
    )
    .map_err(FormatError::from)?;
    io::write_structure(&settings.output_path, &structure)?;

    info!(
        atoms = structure.len(),
        path = ?settings.output_path,
        "Structure written."
    );
    println!(
        "Final dipole {:.5} after {} round(s) ({}, seed {}). Wrote {} atoms to {}.",
        result.best.dipole,
        result.rounds,
        result.termination,
        result.seed,
        structure.len(),
        settings.output_path.display()
    );
    Ok(())
}

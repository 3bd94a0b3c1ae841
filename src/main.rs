use clap::Parser;
use env_logger::Env;
use fibersim::{
    config::SimulationConfig,
    console::{show_intro, Args, PartialArgs},
    error::FiberResult,
    experiment::{DispersionComparison, DispersionResult},
    propagation::PropagationMode,
    reporter::{write_comparison, ReportGenerator},
};
use log::info;

fn load_config(args: &Args) -> FiberResult<SimulationConfig> {
    let mut config = match &args.config_path {
        Some(path) => SimulationConfig::from_file(path)?,
        None => {
            info!("No configuration given. Using reference setup.");
            SimulationConfig::default()
        }
    };
    if let Some(modes) = &args.modes {
        config.modes.clone_from(modes);
    }
    Ok(config)
}

fn find_result(results: &[DispersionResult], mode: PropagationMode) -> Option<&DispersionResult> {
    results.iter().find(|r| r.mode() == mode)
}

fn main() -> FiberResult<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let args = Args::try_from(PartialArgs::parse())?;
    show_intro();
    let config = load_config(&args)?;
    let mut results = Vec::new();
    for experiment in config.experiments()? {
        let result = if args.parallel {
            experiment.run_parallel()
        } else {
            experiment.run()
        };
        ReportGenerator::new(&result).write_all(&args.report_directory)?;
        results.push(result);
    }
    if let (Some(step), Some(graded)) = (
        find_result(&results, PropagationMode::Step),
        find_result(&results, PropagationMode::Graded),
    ) {
        let comparison = DispersionComparison::new(step, graded)?;
        info!(
            "Pulse spread step-index: {:.4} ps, graded-index: {:.4} ps",
            comparison.step_spread(),
            comparison.graded_spread()
        );
        if let Some(factor) = comparison.reduction_factor() {
            info!("Graded-index profile reduces the pulse spread to {:.1} %", factor * 100.0);
        }
        write_comparison(&args.report_directory, &comparison)?;
    }
    Ok(())
}

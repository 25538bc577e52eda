use std::borrow::Cow;

use clap::Parser;
use tracing::debug;

mod cli;
mod error;
mod locations;
mod logging;
mod output;
mod yield_calc;

use cli::Args;
use locations::LocationCatalog;
use output::Report;
use yield_calc::{SystemParameters, compute_yield, rank_locations};

// ===================== MAIN =====================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init_logger(args.verbose);

    let catalog: Cow<'static, LocationCatalog> = match &args.locations_file {
        Some(path) => Cow::Owned(LocationCatalog::load(path)?),
        None => Cow::Borrowed(LocationCatalog::builtin()),
    };

    if args.list_locations {
        output::print_locations(&catalog);
        return Ok(());
    }

    // Tilt is filled in per location below
    let base = SystemParameters::default()
        .with_system_size(args.system_size)
        .with_panel_efficiency(args.panel_efficiency)
        .with_orientation(args.orientation)
        .with_losses(args.losses);

    if args.compare {
        let estimates = rank_locations(catalog.iter(), &base, args.tilt);
        if args.json {
            let reports: Vec<Report<'_>> = estimates
                .iter()
                .map(|e| Report::new(e.profile, &e.params, &e.result))
                .collect();
            println!("{}", output::to_json(&reports)?);
        } else {
            output::print_comparison(&estimates);
        }
        return Ok(());
    }

    let profile = catalog.get(&args.location)?;
    let params = match args.tilt {
        Some(deg) => base.with_tilt(deg),
        None => base.with_default_tilt(profile),
    };
    debug!(?params, "system parameters");

    let result = compute_yield(profile, &params);

    if args.json {
        println!("{}", output::to_json(&Report::new(profile, &params, &result))?);
    } else {
        output::print_report(profile, &params, &result);
    }

    Ok(())
}

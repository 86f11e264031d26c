//! # Drypoint CLI Application
//!
//! Terminal front-end for the estimation engine.
//!
//! ```text
//! drypoint_cli              prompt for a new job, optionally save it
//! drypoint_cli job.dpj      report on a saved job
//! ```
//!
//! Set `DRYPOINT_CONFIG` to a JSON file to override rates, markups and
//! pricing; `RUST_LOG` controls log output on stderr.

mod config;
mod logging;

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use drypoint_core::classification::{SystemType, WaterClass};
use drypoint_core::costing::{CostBucket, CostRollup, LabourRole};
use drypoint_core::equipment::EquipmentCatalog;
use drypoint_core::errors::{EstimateError, EstimateResult};
use drypoint_core::file_io::{load_job_with_lock_check, save_job, FileLock};
use drypoint_core::job::Job;
use drypoint_core::scope::ScopeArea;
use drypoint_core::units::Celsius;

use config::CliConfig;

fn prompt_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok()?;
    Some(input.trim().to_string())
}

fn prompt_string(prompt: &str, default: &str) -> String {
    match prompt_line(prompt) {
        Some(s) if !s.is_empty() => s,
        _ => default.to_string(),
    }
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    prompt_line(prompt)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn prompt_water_class() -> WaterClass {
    let input = prompt_string("Water class 1-4 [2]: ", "2");
    WaterClass::from_str_flexible(&input).unwrap_or_else(|e| {
        eprintln!("  {} - using Class 2", e);
        WaterClass::Class2
    })
}

fn prompt_system_type() -> SystemType {
    match prompt_string("System type open/closed [closed]: ", "closed")
        .to_lowercase()
        .as_str()
    {
        "open" | "o" => SystemType::Open,
        _ => SystemType::Closed,
    }
}

fn prompt_job(config: &CliConfig) -> Job {
    let technician = prompt_string("Technician [Technician]: ", "Technician");
    let claim = prompt_string("Claim number [CLM-0001]: ", "CLM-0001");
    let client = prompt_string("Client [Client]: ", "Client");

    let mut job = Job::new(technician, claim, client);
    job.settings = config.job_settings();
    job.settings.water_class = prompt_water_class();
    job.settings.system_type = prompt_system_type();
    job.settings.drying_days = prompt_f64(
        &format!("Drying days [{}]: ", config.default_drying_days),
        config.default_drying_days,
    );

    let rooms = prompt_f64("Number of rooms [1]: ", 1.0).max(0.0) as usize;
    for n in 1..=rooms {
        println!();
        let default_name = format!("Room {}", n);
        let name = prompt_string(&format!("Room {} name [{}]: ", n, default_name), &default_name);
        let length = prompt_f64("  Length (m) [4.0]: ", 4.0);
        let width = prompt_f64("  Width (m) [3.0]: ", 3.0);
        let height = prompt_f64("  Height (m) [2.4]: ", 2.4);
        let wet = prompt_f64("  Wet floor (%) [100]: ", 100.0);

        let area = ScopeArea::new(name, length, width, height, wet);
        if let Err(e) = area.validate() {
            eprintln!("  Warning: {}", e);
        }
        job.add_area(area);
    }

    println!();
    let temperature = prompt_f64("Site temperature (°C) [20.0]: ", 20.0);
    let humidity = prompt_f64("Site relative humidity (%) [60.0]: ", 60.0);
    job.record_environment(Celsius(temperature), humidity);

    let hours = prompt_f64("Technician hours [0]: ", 0.0);
    if hours > 0.0 {
        let item = job.settings.rates.labour_item(LabourRole::Technician, hours, false);
        job.add_line_item(item);
    }

    job
}

fn save_prompted(job: &Job) -> EstimateResult<()> {
    let path = prompt_string("Save job to (.dpj) [skip]: ", "");
    if path.is_empty() {
        return Ok(());
    }
    let path = Path::new(&path);
    let _lock = FileLock::acquire(path, job.meta.technician.clone())?;
    save_job(job, path)?;
    println!("Saved {}", path.display());
    Ok(())
}

fn print_report(job: &Job, rollup: &CostRollup) {
    let catalog = EquipmentCatalog::standard();
    let scope = job.scope_totals();
    let targets = job.targets();

    println!("═══════════════════════════════════════");
    println!("  DRYING ESTIMATE - {}", job.meta.claim_number);
    println!("═══════════════════════════════════════");
    println!();
    println!("Scope ({} rooms, {}):", job.areas.len(), job.settings.water_class);
    println!("  Volume:        {:.1} m³", scope.total_volume.0);
    println!("  Wet floor:     {:.1} m²", scope.total_affected_area.0);
    println!("  Water removal: {:.0} L/day", targets.water_removal_target.0);
    println!("  Air movers:    {}", targets.air_movers_required);

    if let Some(potential) = job.drying_potential() {
        println!();
        println!("Drying potential ({}):", job.settings.system_type.display_name());
        println!("  Index:  {:.1} {}", potential.drying_index, potential.status.display_name());
        if let Some(dew_point) = potential.dew_point {
            println!("  Dew point: {:.1} °C", dew_point.0);
        }
        println!("  {}", potential.recommendation);
    }

    println!();
    println!("Equipment ({} days):", job.settings.drying_days);
    for selection in &job.equipment.selections {
        let name = catalog
            .get(&selection.group_id)
            .map(|g| g.display_name())
            .unwrap_or_else(|| selection.group_id.clone());
        println!("  {:>3} × {:<36} ${:.2}/day", selection.quantity, name, selection.daily_rate);
    }
    let summary = job.equipment.summary(catalog, &targets);
    println!(
        "  Dehumidification: {:.0} L/day {}",
        summary.total_dehumidification.0,
        status_icon(summary.water_removal_met)
    );
    println!(
        "  Air movement:     {:.1} units ({:.0} CFM) {}",
        summary.air_mover_units.0,
        summary.total_airflow.0,
        status_icon(summary.air_movement_met)
    );
    println!("  Power draw:       {:.1} A", summary.total_amps);

    let totals = &rollup.totals;
    println!();
    println!("Costs:");
    for (bucket, amount) in [
        (CostBucket::Labour, totals.labour),
        (CostBucket::Equipment, totals.equipment),
        (CostBucket::Chemicals, totals.chemicals),
        (CostBucket::Subcontractor, totals.subcontractor),
        (CostBucket::Travel, totals.travel),
        (CostBucket::Waste, totals.waste),
    ] {
        println!("  {:<16} ${:>10.2}", bucket.display_name(), amount);
    }
    println!("  {:<16} ${:>10.2}", "Base cost", totals.total_base_cost);
    println!("  {:<16} ${:>10.2}", "Overheads", totals.overheads);
    println!("  {:<16} ${:>10.2}", "Profit", totals.profit);
    println!("  {:<16} ${:>10.2}", "Contingency", totals.contingency);
    println!("  {:<16} ${:>10.2}", "Escalation", totals.escalation);
    println!("  {:<16} ${:>10.2}", "Subtotal ex GST", totals.subtotal_ex_gst);
    println!("  {:<16} ${:>10.2}", "GST", totals.gst);

    if !rollup.unattributed.is_empty() {
        println!();
        println!("  Not in any cost bucket: {}", rollup.unattributed.join(", "));
    }

    println!();
    println!("═══════════════════════════════════════");
    println!("  TOTAL inc GST: ${:.2}", totals.total_inc_gst);
    println!("═══════════════════════════════════════");
}

fn run(config: &CliConfig) -> EstimateResult<()> {
    let catalog = EquipmentCatalog::standard();

    let (mut job, prompted) = match std::env::args().nth(1) {
        Some(path) => {
            let (job, lock) = load_job_with_lock_check(Path::new(&path))?;
            if let Some(lock) = lock {
                println!("Opened read-only: locked by {} ({})", lock.user_id, lock.machine);
            }
            (job, false)
        }
        None => {
            println!("Drypoint CLI - Drying Equipment & Cost Estimator");
            println!("================================================");
            println!();
            (prompt_job(config), true)
        }
    };

    if job.equipment.is_empty() {
        job.auto_plan_equipment(catalog);
    }
    job.sync_equipment_line_items(catalog);
    let rollup = job.rollup();

    println!();
    print_report(&job, &rollup);

    println!();
    println!("JSON Output (for API use):");
    let json = serde_json::to_string_pretty(&rollup).map_err(EstimateError::serialization)?;
    println!("{}", json);

    if prompted {
        println!();
        save_prompted(&job)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    logging::init();

    let result = CliConfig::from_env().and_then(|config| run(&config));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[SHORT]"
    }
}

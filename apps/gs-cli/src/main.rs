use clap::{Parser, Subcommand};
use gs_core::constants::{self, AU, DAY_SECONDS, EARTH_MASS, G, SOLAR_MASS};
use gs_core::units::{as_seconds, years};
use gs_core::Vec3;
use gs_sim::{
    CelestialBody, ConservationReport, Method, SimOptions, SimRecord, orbital_period, run_sim,
    sun_earth,
};
use serde::Serialize;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "gs")]
#[command(about = "gravsim - Newtonian N-body integration demo", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print vector arithmetic, a sample body and the constants table
    Basics,
    /// Integrate the Sun-Earth orbit and report conservation
    Orbit {
        /// Integration method: euler, rk4 or verlet (unknown names fall back to rk4)
        #[arg(short, long, default_value = "rk4")]
        method: String,
        /// Simulated time in Julian years
        #[arg(long, default_value_t = 1.0)]
        years: f64,
        /// Fixed steps per simulated year
        #[arg(long, default_value_t = 8766)]
        steps_per_year: usize,
        /// Keep every N-th step in the record
        #[arg(long, default_value_t = 24)]
        record_every: usize,
        /// Evaluate per-body forces in parallel
        #[arg(long)]
        parallel: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the Sun-Earth orbit with every method and compare drift
    Compare {
        /// Simulated time in Julian years
        #[arg(long, default_value_t = 1.0)]
        years: f64,
        /// Fixed steps per simulated year
        #[arg(long, default_value_t = 365)]
        steps_per_year: usize,
    },
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Basics => cmd_basics(),
        Commands::Orbit {
            method,
            years,
            steps_per_year,
            record_every,
            parallel,
            json,
        } => cmd_orbit(
            Method::from_name_or_default(&method),
            years,
            steps_per_year,
            record_every,
            parallel,
            json,
        ),
        Commands::Compare {
            years,
            steps_per_year,
        } => cmd_compare(years, steps_per_year),
    }
}

fn cmd_basics() -> CliResult<()> {
    println!("=== Vectors ===");
    let v1 = Vec3::new(1.0, 2.0, 3.0);
    let v2 = Vec3::new(4.0, 5.0, 6.0);
    println!("v1: {v1}");
    println!("v2: {v2}");
    println!("v1 + v2: {}", v1 + v2);
    println!("v1 . v2: {}", v1.dot(&v2));
    println!("v1 x v2: {}", v1.cross(&v2));
    println!("|v1|: {:.6}", v1.magnitude());

    println!("\n=== Celestial body ===");
    let earth = CelestialBody::new("Earth", EARTH_MASS, 6.371e6)
        .with_position(Vec3::new(1.5e11, 0.0, 0.0))
        .with_velocity(Vec3::new(0.0, 2.98e4, 0.0));
    println!("{earth}");

    println!("\n=== Physical constants ===");
    println!("Gravitational constant G: {G:e}");
    println!("Solar mass: {SOLAR_MASS:e} kg");
    println!("1 year = {} s", constants::years_to_seconds(1.0));
    println!("1 AU = {AU:e} m");
    Ok(())
}

#[derive(Serialize)]
struct OrbitSummary {
    method: Method,
    dt_s: f64,
    steps: usize,
    final_time_years: f64,
    earth_position: Vec3,
    earth_velocity: Vec3,
    report: ConservationReport,
}

fn sun_earth_run(
    method: Method,
    span_years: f64,
    steps_per_year: usize,
    record_every: usize,
    parallel: bool,
) -> CliResult<(SimRecord, Vec<f64>, f64)> {
    if steps_per_year == 0 {
        return Err("steps-per-year must be positive".into());
    }
    let scenario = sun_earth();
    let (initial, masses) = scenario.state();
    tracing::info!(%method, span_years, steps_per_year, parallel, "running sun-earth orbit");
    let mut model = scenario.model()?.parallel(parallel);

    let t_end = as_seconds(years(span_years));
    let opts = SimOptions {
        dt: as_seconds(years(1.0)) / steps_per_year as f64,
        t_end,
        max_steps: usize::MAX,
        record_every,
        method,
    };

    let record = run_sim(initial, &mut model, &opts)?;
    Ok((record, masses, opts.dt))
}

fn cmd_orbit(
    method: Method,
    span_years: f64,
    steps_per_year: usize,
    record_every: usize,
    parallel: bool,
    json: bool,
) -> CliResult<()> {
    let (record, masses, dt) =
        sun_earth_run(method, span_years, steps_per_year, record_every, parallel)?;
    let report = ConservationReport::from_record(&record, &masses)?;
    let last = record.final_state().ok_or("empty record")?;

    let summary = OrbitSummary {
        method,
        dt_s: dt,
        steps: record.steps,
        final_time_years: constants::seconds_to_years(last.time),
        earth_position: last.positions[1],
        earth_velocity: last.velocities[1],
        report,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Method:        {}", summary.method);
    println!("Time step:     {:.1} s ({:.3} h)", summary.dt_s, summary.dt_s / 3600.0);
    println!("Steps:         {}", summary.steps);
    println!("Elapsed:       {:.4} yr", summary.final_time_years);
    println!("Earth pos:     {}", summary.earth_position);
    println!("Earth vel:     {}", summary.earth_velocity);
    println!("Energy E0:     {:e} J", summary.report.initial_energy);
    println!("Energy drift:  {:e} (max relative)", summary.report.max_relative_energy_drift);
    println!("Momentum p0:   {}", summary.report.initial_momentum);
    println!("Momentum drift:{:e} kg m/s (max)", summary.report.max_momentum_drift);
    Ok(())
}

fn cmd_compare(span_years: f64, steps_per_year: usize) -> CliResult<()> {
    let period_days = orbital_period(SOLAR_MASS, EARTH_MASS, AU) / DAY_SECONDS;
    println!("Sun-Earth period: {period_days:.3} days");
    println!("{:<8} {:>8} {:>16} {:>16}", "method", "steps", "energy drift", "radius err (AU)");

    for method in Method::ALL {
        let (record, masses, _) = sun_earth_run(method, span_years, steps_per_year, 1, false)?;
        let report = ConservationReport::from_record(&record, &masses)?;
        let last = record.final_state().ok_or("empty record")?;
        let radius = last.positions[0].distance_to(&last.positions[1]) / AU;

        println!(
            "{:<8} {:>8} {:>16.3e} {:>16.3e}",
            method.name(),
            record.steps,
            report.max_relative_energy_drift,
            (radius - 1.0).abs()
        );
    }
    Ok(())
}

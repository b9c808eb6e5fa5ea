use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use mesa_core::{Catalog, InMemoryRegistry, MealSlot, UserProfile, WeekComposer, WeekPlan};

mod config;
mod sample;

#[derive(Parser, Debug)]
#[command(name = "mesa", version, about = "Weekly menu composer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a seven-day menu from a catalog and a user profile
    Generate {
        /// Catalog JSON (defaults to ./catalog.json)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Profile JSON (defaults to ./profile.json)
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Registry JSON, read and updated for month-level variety across runs
        #[arg(long)]
        registry: Option<PathBuf>,

        /// First day of the plan (YYYY-MM-DD, default: today)
        #[arg(long)]
        start: Option<String>,

        /// Fixed sampling seed (overrides mesa.toml)
        #[arg(long)]
        seed: Option<u64>,

        /// Emit the plan as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Config file with scoring thresholds (default: ./mesa.toml)
        #[arg(long, default_value = "mesa.toml")]
        config: PathBuf,
    },

    /// Write sample catalog.json and profile.json into a directory
    Sample {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate { catalog, profile, registry, start, seed, json, config } => {
            generate(catalog, profile, registry, start, seed, json, &config)
        }
        Command::Sample { dir } => write_samples(&dir),
    }
}

#[allow(clippy::too_many_arguments)]
fn generate(
    catalog: Option<PathBuf>,
    profile: Option<PathBuf>,
    registry_path: Option<PathBuf>,
    start: Option<String>,
    seed: Option<u64>,
    json: bool,
    config_path: &Path,
) -> Result<()> {
    let config = config::load_config(config_path)?;

    let catalog_path = catalog.unwrap_or_else(|| PathBuf::from("catalog.json"));
    if !catalog_path.exists() {
        bail!(
            "catalog not found: {} (run `mesa sample` to create one)",
            catalog_path.display()
        );
    }
    let catalog: Catalog = read_json(&catalog_path)?;
    if catalog.is_empty() {
        bail!("catalog {} has no items", catalog_path.display());
    }

    let profile_path = profile.unwrap_or_else(|| PathBuf::from("profile.json"));
    if !profile_path.exists() {
        bail!(
            "profile not found: {} (run `mesa sample` to create one)",
            profile_path.display()
        );
    }
    let profile: UserProfile = read_json(&profile_path)?;

    let mut registry: InMemoryRegistry = match &registry_path {
        Some(p) if p.exists() => read_json(p)?,
        _ => InMemoryRegistry::new(),
    };

    let start = match start {
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .with_context(|| format!("invalid start date '{s}', expected YYYY-MM-DD"))?,
        None => chrono::Local::now().date_naive(),
    };

    let mut composer = WeekComposer::new(catalog).with_config(config.scoring_config());
    if let Some(seed) = seed.or(config.generate.seed) {
        composer = composer.with_seed(seed);
    }

    let plan = match composer.compose_week(&profile, start, &mut registry) {
        Ok(plan) => plan,
        Err(err) => bail!(
            "could not generate a plan with these constraints: {err}\n\
             Relax restrictions or retry with a different seed."
        ),
    };

    if let Some(p) = &registry_path {
        write_json(p, &registry)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan);
    }
    Ok(())
}

fn print_plan(plan: &WeekPlan) {
    const WEEKDAYS: [&str; 7] = [
        "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
    ];

    for day in &plan.days {
        println!("== {} ==", WEEKDAYS.get(day.weekday).unwrap_or(&"Day"));
        for (meal, tip) in day.meals().iter().zip(&day.tips) {
            let slot = match meal.slot {
                MealSlot::Breakfast => "Breakfast",
                MealSlot::Lunch => "Lunch",
                MealSlot::AfternoonSnack => "Snack",
                MealSlot::Dinner => "Dinner",
            };
            let items: Vec<String> = meal
                .items
                .iter()
                .map(|i| format!("{} ({})", i.name, i.quantity))
                .collect();
            println!("  {slot:<10} {}", items.join(", "));
            if !tip.is_empty() {
                println!("  {:<10} tip: {tip}", "");
            }
        }
        println!();
    }
    println!("{}", plan.notes);
}

fn write_samples(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    write_json(&dir.join("catalog.json"), &sample::sample_catalog())?;
    write_json(&dir.join("profile.json"), &sample::sample_profile())?;
    println!("Wrote catalog.json and profile.json to {}", dir.display());
    println!("Next: mesa generate --catalog catalog.json --profile profile.json");
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let raw = serde_json::to_string_pretty(value)?;
    fs::write(path, raw).with_context(|| format!("writing {}", path.display()))
}

//! Car price CLI module
//!
//! Command-line interface for serving, estimating and inspecting encodings.

use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::catalog::Catalog;
use crate::features::{CarListing, InputBounds};
use crate::inference::{EstimatorConfig, Impact, PriceEstimate, PriceEstimator};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "carprice")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Used-car price estimator for the Moroccan market")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding lookup tables and the model
    #[arg(long, global = true, env = "ARTIFACTS_DIR", default_value = "./artifacts")]
    pub artifacts: PathBuf,

    /// Year used to compute vehicle age
    #[arg(long, global = true, env = "REFERENCE_YEAR", default_value = "2025")]
    pub reference_year: i32,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Estimate the price of one car
    Predict {
        #[command(flatten)]
        listing: ListingArgs,

        /// Print the estimate as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the feature vector a car is encoded to
    Encode {
        #[command(flatten)]
        listing: ListingArgs,
    },

    /// List the options the form offers
    Options {
        /// Show the models of this brand only
        #[arg(short, long)]
        brand: Option<String>,
    },

    /// Start the web server
    Serve {
        /// Server port
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Server host
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },
}

/// Car attributes, one flag per form field
#[derive(Args, Debug, Clone)]
pub struct ListingArgs {
    /// Brand (marque)
    #[arg(long)]
    pub marque: String,

    /// Model (modèle)
    #[arg(long)]
    pub modele: String,

    /// Model year
    #[arg(long, default_value = "2015")]
    pub annee: i32,

    /// Mileage in km
    #[arg(long, default_value = "100000")]
    pub kilometrage: i64,

    /// Number of doors (3, 4 or 5)
    #[arg(long, default_value = "5")]
    pub portes: i32,

    /// Fiscal horsepower
    #[arg(long, default_value = "6")]
    pub puissance: i32,

    /// First owner
    #[arg(long)]
    pub premiere_main: bool,

    /// Transmission
    #[arg(long, default_value = "Manuelle")]
    pub boite: String,

    /// Fuel type
    #[arg(long, default_value = "Essence")]
    pub carburant: String,

    /// Origin
    #[arg(long, default_value = "Dédouanée")]
    pub origine: String,

    /// Condition
    #[arg(long, default_value = "Correct")]
    pub etat: String,

    /// City
    #[arg(long)]
    pub localisation: String,
}

impl From<ListingArgs> for CarListing {
    fn from(args: ListingArgs) -> Self {
        CarListing {
            marque: args.marque,
            modele: args.modele,
            annee_modele: args.annee,
            kilometrage: args.kilometrage,
            nombre_de_portes: args.portes,
            puissance_fiscale: args.puissance,
            premiere_main: i32::from(args.premiere_main),
            boite_vitesses: args.boite,
            type_de_carburant: args.carburant,
            origine: args.origine,
            etat_du_vehicule: args.etat,
            localisation: args.localisation,
        }
    }
}

// ─── Loading ───────────────────────────────────────────────────────────────────

fn load_estimator(artifacts: &Path, reference_year: i32) -> anyhow::Result<PriceEstimator> {
    step_run(&format!("Loading artifacts from {}", artifacts.display()));
    let start = Instant::now();
    let config = EstimatorConfig::new().with_reference_year(reference_year);
    let estimator = PriceEstimator::load(artifacts, config)?;
    step_done(&format!(
        "{} model in {:?}",
        estimator.model().kind(),
        start.elapsed()
    ));
    Ok(estimator)
}

fn print_estimate(estimate: &PriceEstimate) {
    let f = &estimate.factors;
    let impact = |i: Impact| match i {
        Impact::Low => i.label().green(),
        Impact::Medium => i.label().yellow(),
        Impact::High => i.label().red(),
    };

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", muted("Estimated Price")));
    line_box_center(&format!("{}", estimate.formatted.white().bold()));
    line_box_center(&format!("{}", dim("Based on current market conditions")));
    line_box_empty();
    line_box_bottom();

    section("Key Price Factors");
    println!("  {:<18} {} years ({})", muted("Age"), f.age_years, impact(f.age_impact));
    println!(
        "  {:<18} {} km ({})",
        muted("Mileage"),
        crate::inference::format_price(f.mileage_km as f64, ""),
        impact(f.mileage_impact)
    );
    println!("  {:<18} {:?}", muted("Brand popularity"), f.brand_popularity);
    println!("  {:<18} {}", muted("Condition"), f.condition);
    println!("  {:<18} {}", muted("Origin"), f.origin);
    println!("  {:<18} {}", muted("First owner"), if f.first_owner { "Yes" } else { "No" });
    println!();
    println!(
        "  {}",
        dim("Estimate based on historical Avito.ma listings; actual prices vary with negotiation.")
    );
    println!();
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_predict(
    artifacts: &Path,
    reference_year: i32,
    listing: CarListing,
    as_json: bool,
) -> anyhow::Result<()> {
    if as_json {
        let config = EstimatorConfig::new().with_reference_year(reference_year);
        let estimator = PriceEstimator::load(artifacts, config)?;
        let estimate = estimator.estimate(&listing)?;
        println!("{}", serde_json::to_string_pretty(&estimate)?);
        return Ok(());
    }

    section("Predict");
    let estimator = load_estimator(artifacts, reference_year)?;
    let estimate = estimator.estimate(&listing)?;
    print_estimate(&estimate);
    Ok(())
}

pub fn cmd_encode(artifacts: &Path, reference_year: i32, listing: CarListing) -> anyhow::Result<()> {
    section("Encode");
    let estimator = load_estimator(artifacts, reference_year)?;
    let features = estimator.encode(&listing)?;

    println!();
    println!("  {:<4} {:<32} {:>12}", muted("#"), muted("Column"), muted("Value"));
    println!("  {}", dim(&"─".repeat(50)));
    for (i, (name, value)) in features.iter().enumerate() {
        let value = if value == 0.0 {
            format!("{:>12}", value).truecolor(140, 140, 140)
        } else {
            format!("{:>12}", value).white()
        };
        println!("  {:<4} {:<32} {}", i, name, value);
    }
    println!();
    Ok(())
}

pub fn cmd_options(artifacts: &Path, brand: Option<&str>) -> anyhow::Result<()> {
    let catalog = Catalog::load(artifacts)?;

    if let Some(brand) = brand {
        section(&format!("Models of {}", brand));
        let models = catalog.models_for(brand);
        if models.is_empty() {
            println!("  {}", "Unknown brand or no models listed".yellow());
        }
        for model in models {
            println!("  {}", model);
        }
        println!();
        return Ok(());
    }

    let print_list = |title: &str, items: Vec<String>| {
        section(title);
        let sep = format!("{}", dim(" · "));
        println!("  {}", items.join(sep.as_str()));
    };

    print_list("Brands", catalog.brands().to_vec());
    print_list("Transmissions", catalog.gearboxes().to_vec());
    print_list("Fuel types", catalog.fuel_types().iter().map(|s| s.to_string()).collect());
    print_list("Origins", catalog.origins().iter().map(|s| s.to_string()).collect());
    print_list("Conditions", catalog.conditions().to_vec());
    print_list("Cities", catalog.locations().to_vec());
    println!();
    Ok(())
}

// ─── Serve ─────────────────────────────────────────────────────────────────────

pub async fn cmd_serve(
    host: &str,
    port: u16,
    artifacts: &Path,
    reference_year: i32,
) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "Car Price Predictor".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Web UI ", &format!("http://{}:{}", host, port)));
    line_box(&kv("API    ", &format!("http://{}:{}/api", host, port)));
    line_box(&kv("Health ", &format!("http://{}:{}/api/health", host, port)));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    let config = ServerConfig {
        host: host.to_string(),
        port,
        artifacts_dir: artifacts.display().to_string(),
        reference_year,
        ..Default::default()
    };

    run_server(config).await
}

// ─── Interactive mode ──────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("       {}", "Moroccan Car Price Predictor".truecolor(120, 170, 255).bold());
    println!("       {}", dim(&format!("Avito.ma market data  ·  v{}", env!("CARGO_PKG_VERSION"))));
    println!();
}

/// Walk the form fields with selection prompts, then estimate.
pub async fn cmd_interactive(artifacts: &Path, reference_year: i32) -> anyhow::Result<()> {
    use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

    print_banner();
    let estimator = load_estimator(artifacts, reference_year)?;
    let catalog = estimator.catalog();
    let bounds = InputBounds::default();
    let theme = ColorfulTheme::default();

    let select = |prompt: &str, items: &[String], default: usize| -> anyhow::Result<String> {
        let idx = Select::with_theme(&theme)
            .with_prompt(prompt)
            .items(items)
            .default(default.min(items.len().saturating_sub(1)))
            .interact()?;
        Ok(items[idx].clone())
    };

    loop {
        println!();
        let marque = select("Marque (Brand)", catalog.brands(), 0)?;
        let models = catalog.models_for(&marque);
        let modele = if models.is_empty() {
            Input::<String>::with_theme(&theme)
                .with_prompt("Modèle (Model)")
                .interact_text()?
        } else {
            select("Modèle (Model)", &models, 0)?
        };

        let annee_modele: i32 = Input::with_theme(&theme)
            .with_prompt(format!("Année modèle ({}-{})", bounds.year_min, bounds.year_max))
            .default(bounds.year_default)
            .validate_with(|y: &i32| {
                if (bounds.year_min..=bounds.year_max).contains(y) { Ok(()) } else { Err("year out of range") }
            })
            .interact_text()?;
        let localisation = select("Localisation (City)", catalog.locations(), 0)?;
        let kilometrage: i64 = Input::with_theme(&theme)
            .with_prompt("Kilométrage (km)")
            .default(bounds.mileage_default)
            .validate_with(|k: &i64| {
                if (0..=bounds.mileage_max).contains(k) { Ok(()) } else { Err("mileage out of range") }
            })
            .interact_text()?;
        let puissance_fiscale: i32 = Input::with_theme(&theme)
            .with_prompt("Puissance fiscale")
            .default(bounds.fiscal_power_default)
            .validate_with(|p: &i32| {
                if (bounds.fiscal_power_min..=bounds.fiscal_power_max).contains(p) { Ok(()) } else { Err("fiscal power out of range") }
            })
            .interact_text()?;
        let doors: Vec<String> = catalog.door_choices().iter().map(|d| d.to_string()).collect();
        let nombre_de_portes: i32 = select("Nombre de portes", &doors, 0)?.parse()?;
        let fuels: Vec<String> = catalog.fuel_types().iter().map(|s| s.to_string()).collect();
        let type_de_carburant = select("Type de carburant", &fuels, 0)?;
        let premiere_main = Confirm::with_theme(&theme)
            .with_prompt("Première main? (First owner?)")
            .default(false)
            .interact()?;
        let boite_vitesses = select("Boîte de vitesses", catalog.gearboxes(), 0)?;
        let origins: Vec<String> = catalog.origins().iter().map(|s| s.to_string()).collect();
        let origine = select("Origine", &origins, 0)?;
        let etat_du_vehicule = select("État du véhicule", catalog.conditions(), 0)?;

        let listing = CarListing {
            marque,
            modele,
            annee_modele,
            kilometrage,
            nombre_de_portes,
            puissance_fiscale,
            premiere_main: i32::from(premiere_main),
            boite_vitesses,
            type_de_carburant,
            origine,
            etat_du_vehicule,
            localisation,
        };

        match estimator.estimate(&listing) {
            Ok(estimate) => print_estimate(&estimate),
            Err(e) => println!("  {} {}", "Error during prediction:".red(), e),
        }

        let again = Confirm::with_theme(&theme)
            .with_prompt("Estimate another car?")
            .default(true)
            .interact()?;
        if !again {
            println!();
            println!("  {}", dim("goodbye"));
            println!();
            break;
        }
    }

    Ok(())
}

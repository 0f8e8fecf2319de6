use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sibyl::{
    get_destiny_card, longitude_to_activation, AnalyticEphemeris, AspectType, BirthMoment, Body,
    CalibrationTable, ChartEngine, EphemerisConfig, OrbTable, SwissEphemeris, Tier,
};
use sibyl_config::SibylSettings;

#[derive(Parser)]
#[command(name = "sibyl", about = "Natal charts, transits, Human Design gates and destiny cards")]
struct Cli {
    /// Path to sibyl.toml (defaults to configs/sibyl.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Natal chart for a birth moment
    Natal {
        #[command(flatten)]
        birth: BirthArgs,
    },
    /// Today's transits against a natal chart
    Transits {
        #[command(flatten)]
        birth: BirthArgs,
        /// Instant to compare against (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// Human Design gate and line for an ecliptic longitude
    Gate {
        /// Ecliptic longitude in degrees, [0, 360)
        #[arg(allow_hyphen_values = true)]
        longitude: f64,
    },
    /// Destiny card for a calendar day
    Card { month: u32, day: u32 },
}

#[derive(Args)]
struct BirthArgs {
    /// Local birth date (YYYY-MM-DD)
    #[arg(long)]
    date: String,
    /// Local birth time (HH:MM or HH:MM:SS)
    #[arg(long)]
    time: String,
    /// UTC offset in hours, e.g. -6 or 5.5
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    offset: f64,
    /// Latitude in degrees, north positive
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Longitude in degrees, east positive
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,
    /// Single-letter house system code (P = Placidus)
    #[arg(long)]
    house_system: Option<char>,
}

impl BirthArgs {
    fn moment(&self) -> anyhow::Result<BirthMoment> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .with_context(|| format!("Invalid --date {:?}, expected YYYY-MM-DD", self.date))?;
        let time = NaiveTime::parse_from_str(&self.time, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&self.time, "%H:%M"))
            .with_context(|| format!("Invalid --time {:?}, expected HH:MM[:SS]", self.time))?;

        let moment = BirthMoment::new(
            date.year(),
            date.month(),
            date.day(),
            time.hour(),
            time.minute(),
            time.second(),
            self.offset,
        );
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(moment.at(lat, lon)),
            (None, None) => Ok(moment),
            _ => anyhow::bail!("--lat and --lon must be given together"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let settings = sibyl_config::load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Natal { birth } => {
            let analytic = AnalyticEphemeris::new();
            let engine = build_engine(&settings, &analytic)?;
            let chart = engine.natal_chart(&birth.moment()?, birth.house_system)?;
            print_json(&chart)
        }
        Commands::Transits { birth, at } => {
            let now = match at {
                Some(text) => DateTime::parse_from_rfc3339(&text)
                    .with_context(|| format!("Invalid --at {text:?}, expected RFC 3339"))?
                    .with_timezone(&Utc),
                None => Utc::now(),
            };
            let analytic = AnalyticEphemeris::new();
            let engine = build_engine(&settings, &analytic)?;
            let natal = engine.natal_chart(&birth.moment()?, birth.house_system)?;
            print_json(&engine.compare_transits_at(natal, now)?)
        }
        Commands::Gate { longitude } => print_json(&longitude_to_activation(longitude)?),
        Commands::Card { month, day } => print_json(&get_destiny_card(month, day)?),
    }
}

fn build_engine<'a>(
    settings: &SibylSettings,
    analytic: &'a AnalyticEphemeris,
) -> anyhow::Result<ChartEngine<'a>> {
    let primary = SwissEphemeris::initialize(&EphemerisConfig {
        path: settings.ephemeris_path.clone(),
    })?;

    let mut engine = ChartEngine::new(primary, analytic)
        .with_house_system(settings.house_system)
        .with_orbs(orb_table(settings)?);
    if let Some(names) = &settings.bodies {
        engine = engine.with_bodies(parse_bodies(names)?);
    }
    if let Some(names) = &settings.calibration_bodies {
        engine = engine.with_calibration(CalibrationTable::from_bodies(parse_bodies(names)?));
    }
    log::debug!("Engine ready with {} bodies", engine.bodies().len());
    Ok(engine)
}

fn parse_bodies(names: &[String]) -> anyhow::Result<Vec<Body>> {
    names
        .iter()
        .map(|name| name.parse::<Body>().map_err(anyhow::Error::from))
        .collect()
}

fn orb_table(settings: &SibylSettings) -> anyhow::Result<OrbTable> {
    let mut orbs = OrbTable::standard();
    for (tier_name, aspects) in &settings.orbs {
        let tier: Tier = tier_name
            .parse()
            .with_context(|| format!("In [orbs.{tier_name}]"))?;
        for (aspect_name, orb) in aspects {
            let aspect: AspectType = aspect_name
                .parse()
                .with_context(|| format!("In [orbs.{tier_name}]"))?;
            orbs.set(tier, aspect, *orb);
        }
    }
    Ok(orbs)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

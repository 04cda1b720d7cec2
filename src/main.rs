use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use starsift::report::render_text;
use starsift::{
    search, Catalog, CatalogFormat, CatalogShape, RestApi, Rgb, SearchCriteria, TemperatureUnit,
    DEFAULT_TOP_K,
};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Search a catalog of celestial bodies
#[derive(Parser, Debug)]
#[command(name = "starsift")]
#[command(about = "Search a planet catalog by type, resources and color", long_about = None)]
struct Args {
    /// Log level
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one search against a catalog file
    Search(SearchArgs),
    /// Serve the REST API
    Serve {
        /// HTTP API port
        #[arg(long, default_value_t = 8080)]
        http_port: u16,
    },
}

#[derive(ClapArgs, Debug)]
struct SearchArgs {
    /// Path to the catalog JSON (e.g. planets.json)
    #[arg(short, long)]
    catalog: PathBuf,

    /// Criteria JSON file; flags below override its fields
    #[arg(long)]
    criteria: Option<PathBuf>,

    /// Planet type ("Any" matches everything)
    #[arg(long = "type")]
    type_name: Option<String>,

    /// Planet subtype ("Any" matches everything)
    #[arg(long)]
    sub_type: Option<String>,

    /// Subtype to exclude (repeatable)
    #[arg(long = "exclude")]
    excluded: Vec<String>,

    #[arg(long, allow_negative_numbers = true)]
    min_temp: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    max_temp: Option<f64>,

    #[arg(long)]
    min_gravity: Option<f64>,

    #[arg(long)]
    max_gravity: Option<f64>,

    /// Required resource (repeatable)
    #[arg(long = "resource")]
    resources: Vec<String>,

    #[arg(long, value_enum)]
    atmosphere: Option<FlagArg>,

    #[arg(long, value_enum)]
    tidally_locked: Option<FlagArg>,

    #[arg(long, value_enum)]
    has_rings: Option<FlagArg>,

    /// Target color as #RRGGBB
    #[arg(long, value_parser = parse_color)]
    color: Option<Rgb>,

    /// Minimum color similarity in percent
    #[arg(long)]
    min_similarity: Option<f64>,

    /// Keep only the best 5 per subtype (color searches only)
    #[arg(long)]
    top_per_group: bool,

    /// Show every field of each match
    #[arg(long)]
    details: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Field holding each record's RGB color
    #[arg(long, default_value = "PrimaryColor")]
    color_field: String,

    /// Unit the catalog stores temperatures in (c or f)
    #[arg(long, default_value = "c")]
    temperature_unit: TemperatureUnit,

    /// Catalog layout: auto, flat or nested
    #[arg(long, default_value = "auto")]
    shape: CatalogShape,
}

/// Tri-state boolean filter
#[derive(ValueEnum, Debug, Clone, Copy)]
enum FlagArg {
    Any,
    Yes,
    No,
}

impl FlagArg {
    fn as_filter(self) -> Option<bool> {
        match self {
            FlagArg::Any => None,
            FlagArg::Yes => Some(true),
            FlagArg::No => Some(false),
        }
    }
}

fn parse_color(s: &str) -> Result<Rgb, String> {
    Rgb::from_hex(s).map_err(|e| e.to_string())
}

impl SearchArgs {
    fn criteria(&self) -> anyhow::Result<SearchCriteria> {
        let mut criteria = match &self.criteria {
            Some(path) => {
                let file = std::fs::File::open(path)
                    .with_context(|| format!("opening criteria {}", path.display()))?;
                serde_json::from_reader(std::io::BufReader::new(file))
                    .with_context(|| format!("parsing criteria {}", path.display()))?
            }
            None => SearchCriteria::any(),
        };

        if let Some(t) = &self.type_name {
            criteria.type_name = Some(t.clone());
        }
        if let Some(s) = &self.sub_type {
            criteria.sub_type = Some(s.clone());
        }
        criteria.excluded_sub_types.extend(self.excluded.iter().cloned());
        if self.min_temp.is_some() {
            criteria.temperature.min = self.min_temp;
        }
        if self.max_temp.is_some() {
            criteria.temperature.max = self.max_temp;
        }
        if self.min_gravity.is_some() {
            criteria.gravity.min = self.min_gravity;
        }
        if self.max_gravity.is_some() {
            criteria.gravity.max = self.max_gravity;
        }
        criteria.resources.extend(self.resources.iter().cloned());
        if let Some(flag) = self.atmosphere {
            criteria.atmosphere = flag.as_filter();
        }
        if let Some(flag) = self.tidally_locked {
            criteria.tidally_locked = flag.as_filter();
        }
        if let Some(flag) = self.has_rings {
            criteria.has_rings = flag.as_filter();
        }
        if self.color.is_some() {
            criteria.color = self.color;
        }
        if let Some(min) = self.min_similarity {
            criteria.min_color_similarity = min;
        }

        criteria.validate()?;
        Ok(criteria)
    }

    fn format(&self) -> CatalogFormat {
        CatalogFormat {
            color_field: self.color_field.clone(),
            temperature_unit: self.temperature_unit,
            shape: self.shape,
        }
    }
}

fn run_search(args: &SearchArgs) -> anyhow::Result<()> {
    let criteria = args.criteria()?;
    let catalog = Catalog::from_path(&args.catalog, args.format())
        .with_context(|| format!("loading catalog {}", args.catalog.display()))?;
    info!(
        "Loaded {} records from {:?} ({} skipped)",
        catalog.len(),
        args.catalog,
        catalog.skipped()
    );

    let scored = criteria.color.is_some();
    let top_k = (args.top_per_group && scored).then_some(DEFAULT_TOP_K);
    let results = search(&catalog, &criteria, top_k);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!(
            "{}",
            render_text(&results, catalog.format().temperature_unit, scored, args.details)
        );
    }
    Ok(())
}

async fn run_server(http_port: u16) -> anyhow::Result<()> {
    info!("Starting Starsift v{}", env!("CARGO_PKG_VERSION"));

    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(http_port).await {
                eprintln!("HTTP server error: {}", e);
            }
        })
    });

    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Search(search_args) => run_search(&search_args),
        Command::Serve { http_port } => run_server(http_port).await,
    }
}

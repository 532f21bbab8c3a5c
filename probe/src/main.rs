use std::time::Duration;

use clap::{Parser, ValueEnum};
use probe::{ProbeConfig, parse_point};
use shared::{Criterion, GeoPoint, RequestEncoding, RouteOptions, TravelMode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Send a route query the way the map client does and print what it would display"
)]
struct Args {
    /// Base URL of the shortest-path service
    #[arg(long, env = "ROUTE_SERVICE_URL", default_value = "http://localhost:8080/")]
    service_url: String,

    /// Start point as `lat,lon`
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    start: GeoPoint,

    /// End point as `lat,lon`
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    end: GeoPoint,

    #[arg(long, value_enum, default_value_t = ModeArg::Foot)]
    travel_mode: ModeArg,

    #[arg(long, value_enum, default_value_t = CriterionArg::Time)]
    criterion: CriterionArg,

    /// Request body shape
    #[arg(long, value_enum, default_value_t = EncodingArg::Canonical)]
    encoding: EncodingArg,

    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,

    /// Send the same query this many times and check the route is stable
    #[arg(long, default_value_t = 1)]
    repeat: usize,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Car,
    Foot,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CriterionArg {
    Distance,
    Time,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EncodingArg {
    Canonical,
    FeatureCollection,
}

impl Args {
    fn config(&self) -> ProbeConfig {
        let mode = match self.travel_mode {
            ModeArg::Car => TravelMode::Car,
            ModeArg::Foot => TravelMode::Foot,
        };
        let criterion = match self.criterion {
            CriterionArg::Distance => Criterion::Distance,
            CriterionArg::Time => Criterion::Time,
        };
        ProbeConfig {
            options: RouteOptions::new(mode, criterion),
            encoding: match self.encoding {
                EncodingArg::Canonical => RequestEncoding::Canonical,
                EncodingArg::FeatureCollection => RequestEncoding::FeatureCollection,
            },
            timeout: Duration::from_secs(self.timeout_secs),
            repeat: self.repeat,
            ..ProbeConfig::new(self.service_url.clone(), self.start, self.end)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "route_probe=info,probe=info,shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = args.config();
    tracing::info!("probing {} with {:?}", config.service_url, config.options);

    let report = probe::run(&config).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }

    Ok(())
}

use crate::demo::{run_demo, sample_source, DemoArgs};
use crate::infra::{coordinates_from_parts, read_rank_request, AdvisorService};
use crate::server;
use clap::{Args, Parser, Subcommand};
use renovation_advisor::archetypes::{ArchetypeSource, CatalogError, HttpArchetypeSource};
use renovation_advisor::config::AppConfig;
use renovation_advisor::error::AppError;
use renovation_advisor::ranking::RankedScenario;
use renovation_advisor::telemetry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Renovation Advisor",
    about = "Match building archetypes and rank renovation scenarios from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Browse and match archetypes from the archetype service
    Archetypes {
        #[command(subcommand)]
        command: ArchetypesCommand,
    },
    /// Rank renovation scenarios read from a JSON file
    Rank(RankArgs),
    /// Run the full match, modify and rank flow against built-in archetypes
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ArchetypesCommand {
    /// List archetypes, optionally filtered by country and category
    List(ListArgs),
    /// Find the archetype that best fits a building
    Match(MatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    #[arg(long)]
    pub(crate) country: Option<String>,
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// Use the built-in sample archetypes instead of the archetype service
    #[arg(long)]
    pub(crate) offline: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct MatchArgs {
    #[arg(long)]
    pub(crate) category: String,
    /// Construction period (YYYY-YYYY)
    #[arg(long)]
    pub(crate) period: Option<String>,
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub(crate) lat: Option<f64>,
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub(crate) lon: Option<f64>,
    /// Use the built-in sample archetypes instead of the archetype service
    #[arg(long)]
    pub(crate) offline: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// JSON file with `scenarios`, `baseline_energy` and optional `weights`
    #[arg(long)]
    pub(crate) input: PathBuf,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Archetypes {
            command: ArchetypesCommand::List(args),
        } => {
            let output = if args.offline {
                list_archetypes(&AdvisorService::new(sample_source()), &args).await?
            } else {
                list_archetypes(&online_service()?, &args).await?
            };
            print!("{output}");
            Ok(())
        }
        Command::Archetypes {
            command: ArchetypesCommand::Match(args),
        } => {
            let output = if args.offline {
                match_archetype(&AdvisorService::new(sample_source()), &args).await?
            } else {
                match_archetype(&online_service()?, &args).await?
            };
            print!("{output}");
            Ok(())
        }
        Command::Rank(args) => {
            let request = read_rank_request(&args.input)?;
            let ranker = request.ranker().map_err(AppError::BadRequest)?;
            let ranked = ranker.rank_scenarios(&request.scenarios, request.baseline_energy);
            print!("{}", render_ranking(&ranked));
            Ok(())
        }
        Command::Demo(args) => run_demo(args).await,
    }
}

fn online_service() -> Result<AdvisorService<HttpArchetypeSource>, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let source = HttpArchetypeSource::new(&config.archetypes)
        .map_err(|err| AppError::Catalog(CatalogError::Retrieval(err)))?;
    Ok(AdvisorService::new(source))
}

pub(crate) async fn list_archetypes<S>(
    service: &AdvisorService<S>,
    args: &ListArgs,
) -> Result<String, AppError>
where
    S: ArchetypeSource,
{
    let records = service
        .catalog()
        .list_filtered(args.country.as_deref(), args.category.as_deref())
        .await?;

    let mut output = String::new();
    output.push_str(&format!("{} archetype(s)\n", records.len()));
    for record in &records {
        let period = record
            .construction_period()
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "- {:<14} {:<22} {:<10} {}\n",
            record.country, record.category, period, record.name
        ));
    }
    Ok(output)
}

pub(crate) async fn match_archetype<S>(
    service: &AdvisorService<S>,
    args: &MatchArgs,
) -> Result<String, AppError>
where
    S: ArchetypeSource,
{
    let coordinates = coordinates_from_parts(args.lat, args.lon).map_err(AppError::BadRequest)?;
    let found = service
        .matcher()
        .find_best(&args.category, args.period.as_deref(), coordinates)
        .await?;

    let Some(found) = found else {
        return Ok(format!(
            "No archetype available for category '{}'\n",
            args.category
        ));
    };

    let details = &found.details;
    let mut output = String::new();
    output.push_str(&format!(
        "{} ({}, {})\n",
        details.record.name, details.record.country, details.record.category
    ));
    output.push_str(&format!(
        "- period filter applied: {}\n",
        found.period_filter_applied
    ));
    match found.distance_km {
        Some(km) => {
            output.push_str(&format!("- distance to country reference: {km:.0} km\n"));
        }
        None => {
            output.push_str("- geographic match: not applied\n");
        }
    }
    output.push_str(&format!(
        "- floor area {:.1} m² | floors {} | height {:.1} m | windows {:.1} m²\n",
        details.floor_area,
        details.number_of_floors,
        details.building_height,
        details.total_window_area
    ));
    Ok(output)
}

pub(crate) fn render_ranking(ranked: &[RankedScenario]) -> String {
    let mut output = String::new();
    for entry in ranked {
        output.push_str(&format!(
            "{}. {} (closeness {:.3})\n",
            entry.rank, entry.scenario_id, entry.closeness
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn match_requires_both_coordinates() {
        let parsed = Cli::try_parse_from([
            "renovation-advisor-api",
            "archetypes",
            "match",
            "--category",
            "Single Family House",
            "--lat",
            "37.9",
        ]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from([
            "renovation-advisor-api",
            "archetypes",
            "match",
            "--category",
            "Apartment Block",
            "--lat",
            "40.4",
            "--lon",
            "-3.7",
        ]);
        assert!(parsed.is_ok());
    }

    #[test]
    fn demo_accepts_western_longitudes() {
        let parsed = Cli::try_parse_from([
            "renovation-advisor-api",
            "demo",
            "--lon",
            "-3.7",
            "--lat",
            "40.4",
        ])
        .expect("negative longitude parses");
        match parsed.command {
            Some(Command::Demo(args)) => {
                assert_eq!(args.lon, -3.7);
                assert_eq!(args.lat, 40.4);
            }
            other => panic!("expected demo command, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn offline_listing_renders_periods() {
        let service = AdvisorService::new(sample_source());
        let args = ListArgs {
            country: Some("Spain".to_string()),
            ..ListArgs::default()
        };
        let output = list_archetypes(&service, &args).await.expect("listing");
        assert!(output.starts_with("1 archetype(s)"));
        assert!(output.contains("1981-2000"));
        assert_eq!(output.lines().count(), 2);
        assert!(output.ends_with('\n'));
    }

    #[tokio::test]
    async fn offline_match_reports_distance() {
        let service = AdvisorService::new(sample_source());
        let args = MatchArgs {
            category: "Single Family House".to_string(),
            lat: Some(41.9),
            lon: Some(12.5),
            ..MatchArgs::default()
        };
        let output = match_archetype(&service, &args).await.expect("match");
        assert!(output.starts_with("SFH_Italy_1946_1960"));
        assert!(output.contains("distance to country reference: 0 km"));
        assert_eq!(output.lines().count(), 4);

        let args = MatchArgs {
            category: "Warehouse".to_string(),
            ..MatchArgs::default()
        };
        let output = match_archetype(&service, &args).await.expect("no match");
        assert!(output.contains("No archetype available"));
    }

    #[test]
    fn ranking_renders_one_line_per_scenario() {
        use renovation_advisor::ranking::CriteriaValues;

        let ranked = vec![RankedScenario {
            rank: 1,
            index: 0,
            scenario_id: "deep-retrofit".to_string(),
            criteria: CriteriaValues::uniform(0.5),
            closeness: 0.8126,
        }];
        assert_eq!(render_ranking(&ranked), "1. deep-retrofit (closeness 0.813)\n");
    }
}

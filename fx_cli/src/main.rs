//! Fixture engine command-line front end.
//!
//! Reads a competition file, runs the draw, schedules the matches, hands out
//! referees, applies any known results and prints the resulting competition
//! snapshot as JSON.

mod input;

use std::path::PathBuf;

use anyhow::Error;
use fixture_engine::{CompetitionManager, EngineConfig, ErrorKind};
use input::CompetitionFile;
use log::{info, warn};
use pico_args::Arguments;
use rand::SeedableRng;
use rand::rngs::StdRng;

const HELP: &str = "\
Draw, schedule and tabulate a competition

USAGE:
  fx_cli --input PATH [OPTIONS]

OPTIONS:
  --input      PATH        Competition file (JSON)
  --format     LABEL       Override the file's format, e.g. knockout, round_robin:2, swiss:7
  --seed       N           Seed the draw for a reproducible result  [default: random]
  --output     PATH        Write the snapshot here instead of stdout

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  FX_POINTS_WIN            Points for a win  [default: 3]
  FX_POINTS_DRAW           Points for a draw  [default: 1]
  FX_POINTS_LOSS           Points for a loss  [default: 0]
  FX_DEFAULT_GROUPS        Groups for group_stage without a count  [default: 4]
  FX_SWISS_ROUNDS          Rounds for swiss without a count  [default: 5]
  FX_DEFAULT_FIELD         Field used when the venue lists none  [default: Field 1]
  FX_DAY_START_HOUR        First synthesized time slot (UTC hour)  [default: 9]
  FX_DAY_SLOTS             Hourly slots synthesized per day  [default: 9]
  FX_MATCH_DURATION_MINUTES  Match length for referee conflicts  [default: 90]
  (See .env file for all configuration options)
";

struct Args {
    input: PathBuf,
    format: Option<String>,
    seed: Option<u64>,
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        input: pargs.value_from_str("--input")?,
        format: pargs.opt_value_from_str("--format")?,
        seed: pargs.opt_value_from_str("--seed")?,
        output: pargs.opt_value_from_str("--output")?,
    };

    env_logger::builder().format_target(false).init();

    let engine_config = EngineConfig::from_env();
    engine_config.validate()?;

    let file = CompetitionFile::load(&args.input)?;
    let config = file.tournament_config(args.format.as_deref(), &engine_config)?;
    info!(
        "Loaded {} ({}) with {} participants",
        config.name,
        config.format,
        file.participants.len()
    );

    let manager = CompetitionManager::new(engine_config);
    let organizer = file.organizer;
    let id = manager
        .create_competition(config, vec![organizer], file.participants.clone())
        .await?;

    let matches = match args.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            manager.conduct_draw_with_rng(id, organizer, &mut rng).await?
        }
        None => manager.conduct_draw(id, organizer).await?,
    };
    info!("Draw produced {} matches", matches.len());

    match manager.generate_schedule(id, organizer).await {
        Ok(summary) => info!(
            "Scheduled {} matches on {} field(s) across {} time slot(s)",
            summary.matches_scheduled, summary.fields, summary.time_slots_used
        ),
        Err(e) if e.kind() == ErrorKind::InvalidInput => {
            warn!("Skipping scheduling: {}", e.client_message());
        }
        Err(e) => return Err(e.into()),
    }

    if !file.referees.is_empty() {
        let assigned = manager.assign_referees(id, organizer, &file.referees).await?;
        info!("Referees assigned to {assigned} matches");
    }

    for line in &file.results {
        match manager
            .record_result(id, line.match_id, organizer, line.entry())
            .await
        {
            Ok(winner) => info!(
                "Match {} recorded, winner: {}",
                line.match_id,
                winner.map_or_else(|| "draw".to_string(), |w| w.to_string())
            ),
            Err(e) => warn!("Result for match {} not applied: {}", line.match_id, e.client_message()),
        }
    }

    for event in manager.drain_events(id).await? {
        info!("{event}");
    }

    let snapshot = manager.export(id).await?.to_json()?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, snapshot)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
            info!("Snapshot written to {}", path.display());
        }
        None => println!("{snapshot}"),
    }

    Ok(())
}

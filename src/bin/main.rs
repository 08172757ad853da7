use std::fs::File;
use std::io;
use std::path::Path;

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::info;

use takdex::importer::{import_games, ImportOptions};
use takdex::playtak::{read_games, GameQuery};
use takdex::store::sqlite::{LookupOptions, OpeningsDb};
use takdex::store::stats::StatisticsCollector;

fn main() -> Result<(), takdex::Error> {
    let matches = Command::new("takdex")
        .version("0.1")
        .about("Builds and queries a symmetry-deduplicated index of Tak opening positions")
        .subcommand_required(true)
        .arg(
            Arg::new("logfile")
                .short('l')
                .long("logfile")
                .env("TAKDEX_LOGFILE")
                .value_name("takdex.log")
                .help("Name of debug logfile")
                .global(true)
                .num_args(1),
        )
        .subcommand(
            Command::new("import")
                .about("Replays games from a playtak database into the position store")
                .arg(
                    Arg::new("games-db")
                        .long("games-db")
                        .env("TAKDEX_GAMES_DB")
                        .help("Path to the playtak games database")
                        .num_args(1)
                        .required(true),
                )
                .arg(
                    Arg::new("db")
                        .long("db")
                        .env("TAKDEX_DB")
                        .help("Path to the position store (created if missing)")
                        .num_args(1)
                        .required(true),
                )
                .arg(
                    Arg::new("size")
                        .short('s')
                        .long("size")
                        .help("Board size to import")
                        .num_args(1)
                        .default_value("6")
                        .value_parser(clap::value_parser!(u64).range(3..=8)),
                )
                .arg(
                    Arg::new("min-rating")
                        .short('r')
                        .long("min-rating")
                        .help("Minimum rating of both players")
                        .num_args(1)
                        .default_value("1200")
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(
                    Arg::new("min-plies")
                        .short('p')
                        .long("min-plies")
                        .help("Minimum number of plies in a game")
                        .num_args(1)
                        .default_value("12")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("max-games")
                        .short('n')
                        .long("max-games")
                        .help("Maximum number of games to import in one run")
                        .num_args(1)
                        .default_value("10000")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("max-plies")
                        .long("max-plies")
                        .help("Replay depth per game; only opening positions are indexed")
                        .num_args(1)
                        .default_value("24")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("include-bots")
                        .long("include-bots")
                        .help("Also import games played by known bots")
                        .action(ArgAction::SetTrue)
                        .num_args(0),
                ),
        )
        .subcommand(
            Command::new("query")
                .about("Looks up a position and prints its report as JSON")
                .arg(
                    Arg::new("db")
                        .long("db")
                        .env("TAKDEX_DB")
                        .help("Path to the position store")
                        .num_args(1)
                        .required(true),
                )
                .arg(
                    Arg::new("tps")
                        .help("Position string, in any orientation")
                        .num_args(1)
                        .required(true),
                )
                .arg(
                    Arg::new("max-moves")
                        .long("max-moves")
                        .help("Maximum number of follow-up moves to return")
                        .num_args(1)
                        .default_value("20")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("max-games")
                        .long("max-games")
                        .help("Maximum number of example games to return")
                        .num_args(1)
                        .default_value("4")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("stats")
                .about("Replays games and writes aggregate statistics as JSON")
                .arg(
                    Arg::new("games-db")
                        .long("games-db")
                        .env("TAKDEX_GAMES_DB")
                        .help("Path to the playtak games database")
                        .num_args(1)
                        .required(true),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("File the JSON report is written to")
                        .num_args(1)
                        .required(true),
                )
                .arg(
                    Arg::new("size")
                        .short('s')
                        .long("size")
                        .num_args(1)
                        .default_value("6")
                        .value_parser(clap::value_parser!(u64).range(3..=8)),
                )
                .arg(
                    Arg::new("min-rating")
                        .short('r')
                        .long("min-rating")
                        .num_args(1)
                        .default_value("1200")
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(
                    Arg::new("max-games")
                        .short('n')
                        .long("max-games")
                        .num_args(1)
                        .default_value("100000")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .get_matches();

    init_logging(matches.get_one::<String>("logfile"))?;

    match matches.subcommand() {
        Some(("import", sub_matches)) => import_command(sub_matches),
        Some(("query", sub_matches)) => query_command(sub_matches),
        Some(("stats", sub_matches)) => stats_command(sub_matches),
        _ => unreachable!(),
    }
}

fn init_logging(logfile: Option<&String>) -> io::Result<()> {
    let log_dispatcher = fern::Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "{}[{}][{}] {}",
            chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
            record.target(),
            record.level(),
            message
        ))
    });

    if let Some(log_file) = logfile {
        log_dispatcher
            .chain(
                fern::Dispatch::new()
                    .level(log::LevelFilter::Debug)
                    .chain(fern::log_file(log_file)?),
            )
            .chain(
                fern::Dispatch::new()
                    .level(log::LevelFilter::Info)
                    .chain(io::stderr()),
            )
            .apply()
            .unwrap()
    } else {
        log_dispatcher
            .level(log::LevelFilter::Info)
            .chain(io::stderr())
            .apply()
            .unwrap()
    }
    Ok(())
}

fn import_command(matches: &ArgMatches) -> Result<(), takdex::Error> {
    let mut db = OpeningsDb::open(Path::new(matches.get_one::<String>("db").unwrap()))?;

    let query = GameQuery {
        size: *matches.get_one::<u64>("size").unwrap() as usize,
        min_rating: *matches.get_one::<i64>("min-rating").unwrap(),
        min_plies: *matches.get_one::<u64>("min-plies").unwrap() as usize,
        max_games: *matches.get_one::<u64>("max-games").unwrap() as usize,
        min_playtak_id: db.max_playtak_id(),
        exclude_bots: !matches.get_flag("include-bots"),
        ..GameQuery::default()
    };
    let games = read_games(
        Path::new(matches.get_one::<String>("games-db").unwrap()),
        &query,
    )?;
    info!("extracted {} games", games.len());

    let options = ImportOptions {
        max_plies: *matches.get_one::<u64>("max-plies").unwrap() as usize,
        min_playtak_id: db.max_playtak_id(),
    };
    let summary = import_games(&mut db, &games, &options)?;
    db.close()?;

    println!(
        "imported {} games ({} skipped, {} failed), {} plies recorded",
        summary.imported, summary.skipped, summary.failed, summary.plies_recorded
    );
    Ok(())
}

fn query_command(matches: &ArgMatches) -> Result<(), takdex::Error> {
    let db = OpeningsDb::open(Path::new(matches.get_one::<String>("db").unwrap()))?;
    let options = LookupOptions {
        max_moves: *matches.get_one::<u64>("max-moves").unwrap() as usize,
        max_games: *matches.get_one::<u64>("max-games").unwrap() as usize,
    };
    let report = db.lookup(matches.get_one::<String>("tps").unwrap(), &options)?;
    db.close()?;

    serde_json::to_writer_pretty(io::stdout(), &report)?;
    println!();
    Ok(())
}

fn stats_command(matches: &ArgMatches) -> Result<(), takdex::Error> {
    let query = GameQuery {
        size: *matches.get_one::<u64>("size").unwrap() as usize,
        min_rating: *matches.get_one::<i64>("min-rating").unwrap(),
        max_games: *matches.get_one::<u64>("max-games").unwrap() as usize,
        ..GameQuery::default()
    };
    let games = read_games(
        Path::new(matches.get_one::<String>("games-db").unwrap()),
        &query,
    )?;
    info!("extracted {} games", games.len());

    let mut collector = StatisticsCollector::new();
    import_games(&mut collector, &games, &ImportOptions::default())?;

    let output = File::create(matches.get_one::<String>("output").unwrap())?;
    collector.write_json(output)?;
    Ok(())
}

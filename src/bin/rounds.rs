//! Session simulator: builds a roster and courts, then generates, scores and records rounds.
//! Run with: cargo run --bin rounds
//! Each round is printed as JSON on stdout; final player stats follow.
//!
//! Configured through env:
//! ROSTER (CSV with `name,rating` columns), PLAYERS (generated roster size when no CSV),
//! COURTS (unrated courts), RATED_COURTS (e.g. "4.0,3.5"), ROUNDS, SEED, STRATEGY
//! (fair | lottery | units), ENFORCE_PAIRS (true/false), PARTNERS (e.g. "Ann:Bob,Cy:Di").

use court_rotation::{
    Court, CourtId, EngineOptions, GameResult, Player, PlayerId, RoundEngine, Session,
    SitOutStrategy,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::error::Error;

/// One row of the roster CSV.
#[derive(Deserialize)]
struct RosterRow {
    name: String,
    #[serde(default)]
    rating: Option<f64>,
}

struct Config {
    roster_path: Option<String>,
    players: usize,
    courts: usize,
    rated_courts: Vec<f64>,
    rounds: u32,
    seed: Option<u64>,
    strategy: SitOutStrategy,
    enforce_pairs: bool,
    partners: Vec<(String, String)>,
}

impl Config {
    fn from_env() -> Result<Self, Box<dyn Error>> {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        let rated_courts = match var("RATED_COURTS") {
            Some(list) => list
                .split(',')
                .map(|r| r.trim().parse::<f64>())
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        let partners = match var("PARTNERS") {
            Some(list) => list
                .split(',')
                .map(|pair| match pair.split_once(':') {
                    Some((a, b)) => Ok((a.trim().to_owned(), b.trim().to_owned())),
                    None => Err(format!("PARTNERS entry must be name:name, got {}", pair)),
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        Ok(Self {
            roster_path: var("ROSTER"),
            players: var("PLAYERS").map(|v| v.parse::<usize>()).transpose()?.unwrap_or(10),
            courts: var("COURTS").map(|v| v.parse::<usize>()).transpose()?.unwrap_or(2),
            rated_courts,
            rounds: var("ROUNDS").map(|v| v.parse::<u32>()).transpose()?.unwrap_or(4),
            seed: var("SEED").map(|v| v.parse::<u64>()).transpose()?,
            strategy: var("STRATEGY")
                .map(|v| v.parse::<SitOutStrategy>())
                .transpose()?
                .unwrap_or_default(),
            enforce_pairs: var("ENFORCE_PAIRS")
                .map(|v| v.parse::<bool>())
                .transpose()?
                .unwrap_or(true),
            partners,
        })
    }
}

fn load_roster(config: &Config) -> Result<Vec<Player>, Box<dyn Error>> {
    let Some(path) = &config.roster_path else {
        return Ok((1..=config.players)
            .map(|i| Player::new(format!("Player {}", i)))
            .collect());
    };
    let mut reader = csv::Reader::from_path(path)?;
    let mut players = Vec::new();
    for row in reader.deserialize() {
        let row: RosterRow = row?;
        players.push(match row.rating {
            Some(rating) => Player::rated(row.name, rating),
            None => Player::new(row.name),
        });
    }
    Ok(players)
}

fn build_session(config: &Config) -> Result<Session, Box<dyn Error>> {
    let mut session = Session::new("Simulated session");
    for player in load_roster(config)? {
        session.add_player(player)?;
    }
    for (i, rating) in config.rated_courts.iter().enumerate() {
        session.add_court(Court::rated(format!("Rated {}", i + 1), *rating));
    }
    for i in 0..config.courts {
        session.add_court(Court::new(format!("Court {}", i + 1)));
    }
    session.partnerships.enforce_all_pairings = config.enforce_pairs;
    for (a, b) in &config.partners {
        let (Some(a), Some(b)) = (session.player_by_name(a), session.player_by_name(b)) else {
            log::warn!("Skipping partnership {}:{}: unknown player name", a, b);
            continue;
        };
        let (a, b) = (a.id, b.id);
        session.partnerships.add(a, b);
    }
    session.start()?;
    Ok(session)
}

#[derive(Serialize)]
struct PrintedGame<'a> {
    court: &'a str,
    serve: [&'a str; 2],
    receive: [&'a str; 2],
    score: Option<GameResult>,
}

#[derive(Serialize)]
struct PrintedRound<'a> {
    round: u32,
    games: Vec<PrintedGame<'a>>,
    sitting_out: Vec<&'a str>,
}

fn print_round(session: &Session, index: usize) -> Result<(), Box<dyn Error>> {
    let round = session.round(index)?;
    let name = |id: PlayerId| {
        session
            .players
            .iter()
            .find(|p| p.id == id)
            .map_or("?", |p| p.name.as_str())
    };
    let court_name = |id: CourtId| {
        session
            .courts
            .iter()
            .find(|c| c.id == id)
            .map_or("?", |c| c.name.as_str())
    };
    let printed = PrintedRound {
        round: round.number,
        games: round
            .games
            .iter()
            .map(|g| PrintedGame {
                court: court_name(g.court_id),
                serve: g.serve_team.ids().map(name),
                receive: g.receive_team.ids().map(name),
                score: g.result,
            })
            .collect(),
        sitting_out: round.sitting_out_ids.iter().map(|&id| name(id)).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&printed)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env()?;
    let mut session = build_session(&config)?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let options = EngineOptions {
        strategy: config.strategy,
        ..EngineOptions::default()
    };
    log::info!(
        "Simulating {} rounds: {} players, {} courts, {:?} strategy",
        config.rounds,
        session.players.len(),
        session.courts.len(),
        options.strategy
    );

    for _ in 0..config.rounds {
        let engine_rng = StdRng::seed_from_u64(rng.gen());
        let mut engine = RoundEngine::with_rng(&session, options, engine_rng)?;
        let assignment = engine.generate_round_assignment(None);
        if assignment.is_empty() {
            log::warn!("Cannot generate round {}: no court could be filled", engine.round_number());
            break;
        }

        session.record_round(assignment.into_round(engine.round_number()))?;
        let index = session.live()?.rounds.len() - 1;
        for game in &mut session.round_mut(index)?.games {
            let winner_points = 11;
            let loser_points = rng.gen_range(0..winner_points - 1);
            if rng.gen_bool(0.5) {
                game.record_score(winner_points, loser_points);
            } else {
                game.record_score(loser_points, winner_points);
            }
        }
        let stats = engine.update_stats_for_round(session.round(index)?)?;
        session.store_stats(stats)?;
        print_round(&session, index)?;
    }

    let stats = &session.live()?.player_stats;
    for player in &session.players {
        if let Some(s) = stats.iter().find(|s| s.player_id == player.id) {
            log::info!(
                "{}: played {}, sat out {}, points {}-{}",
                player.name,
                s.games_played,
                s.games_sat_out,
                s.total_score,
                s.total_score_against
            );
        }
    }
    Ok(())
}

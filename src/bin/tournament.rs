//! Command-line front end over a JSON state file holding every tournament.
//! Run with: cargo run --bin tournament -- --help
//! The state file defaults to ./tournament-state.json; override with --state or TOURNAMENT_STATE.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use football_tournament::logic::{
    add_player, create_tournament, delete_tournament, draw_groups, submit_match_report,
    tournaments_by_owner, MatchReport,
};
use football_tournament::{
    EventInput, MatchId, MemoryStore, PlayerId, Team, TeamId, TournamentConfig, TournamentData,
    TournamentError, TournamentId, TournamentStore, TournamentType,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "tournament")]
#[command(about = "Football tournament fixtures, results and tables")]
#[command(version)]
struct Cli {
    /// JSON file holding every tournament
    #[arg(long, env = "TOURNAMENT_STATE", default_value = "tournament-state.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a tournament from a JSON config and print its id
    Create {
        config: PathBuf,

        /// Seed for the group draw (only used when the config has no groups)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Add a player to a team
    Player {
        tournament: TournamentId,
        team: TeamId,
        name: String,
    },

    /// List an owner's tournaments
    List { owner: String },

    /// Print all fixtures in schedule order
    Fixtures { tournament: TournamentId },

    /// Submit the result of a match
    Report {
        tournament: TournamentId,
        match_id: MatchId,
        home: u32,
        away: u32,

        /// Goals as player-id:amount, repeatable
        #[arg(long = "goal", value_parser = parse_event)]
        goals: Vec<(PlayerId, u32)>,

        /// Assists as player-id:amount, repeatable
        #[arg(long = "assist", value_parser = parse_event)]
        assists: Vec<(PlayerId, u32)>,
    },

    /// Print the standings
    Table { tournament: TournamentId },

    /// Print the top scorers
    Scorers {
        tournament: TournamentId,

        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Delete a tournament and everything in it
    Delete { tournament: TournamentId },
}

fn parse_event(s: &str) -> Result<(PlayerId, u32), String> {
    let (player, amount) = s
        .split_once(':')
        .ok_or_else(|| format!("expected player-id:amount, got {s}"))?;
    let player = player.parse().map_err(|e| format!("bad player id: {e}"))?;
    let amount = amount.parse().map_err(|e| format!("bad amount: {e}"))?;
    Ok((player, amount))
}

/// Attach the status code the error kind maps to.
fn with_status<T>(result: Result<T, TournamentError>) -> Result<T> {
    result.map_err(|e| {
        let status = e.kind().status();
        anyhow::Error::new(e).context(format!("request failed (status {status})"))
    })
}

fn load_store(path: &Path) -> Result<MemoryStore> {
    if !path.exists() {
        log::debug!("{} not found, starting with an empty store", path.display());
        return Ok(MemoryStore::new());
    }
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading state file {}", path.display()))?;
    with_status(MemoryStore::from_json(&json))
}

fn save_store(path: &Path, store: &MemoryStore) -> Result<()> {
    let json = with_status(store.to_json())?;
    fs::write(path, json).with_context(|| format!("writing state file {}", path.display()))?;
    log::debug!("saved {} tournaments to {}", store.len(), path.display());
    Ok(())
}

fn read_config(path: &Path, seed: Option<u64>) -> Result<TournamentConfig> {
    let json =
        fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    let mut config: TournamentConfig =
        serde_json::from_str(&json).with_context(|| format!("parsing config {}", path.display()))?;

    if config.kind == TournamentType::GroupAndKnockout
        && config.groups.is_empty()
        && !config.selected_teams.is_empty()
    {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let teams = std::mem::take(&mut config.selected_teams);
        config.groups = with_status(draw_groups(&teams, config.groups_count as usize, &mut rng))?;
        log::info!("Drew {} teams into {} groups", teams.len(), config.groups.len());
    }
    Ok(config)
}

#[derive(Serialize)]
struct FixtureRow<'a> {
    match_id: MatchId,
    match_day: u32,
    stage: String,
    round: String,
    leg: Option<u8>,
    home: &'a str,
    away: &'a str,
    home_score: Option<u32>,
    away_score: Option<u32>,
}

#[derive(Serialize)]
struct TableRow<'a> {
    position: Option<u32>,
    team_id: TeamId,
    team: &'a str,
    group: &'a str,
    played: u32,
    won: u32,
    drawn: u32,
    lost: u32,
    goals_for: u32,
    goals_against: u32,
    goal_difference: i64,
    points: u32,
}

#[derive(Serialize)]
struct ScorerRow<'a> {
    player_id: PlayerId,
    player: &'a str,
    team: &'a str,
    goals: u32,
    assists: u32,
}

fn team_name(data: &TournamentData, id: TeamId) -> &str {
    data.team(id).map(|t| t.name.as_str()).unwrap_or("?")
}

fn print_rows<R: Serialize>(rows: impl IntoIterator<Item = R>) -> Result<()> {
    let mut out = csv::Writer::from_writer(io::stdout());
    for row in rows {
        out.serialize(row)?;
    }
    out.flush()?;
    Ok(())
}

fn print_fixtures(data: &TournamentData) -> Result<()> {
    print_rows(data.fixtures().into_iter().map(|m| FixtureRow {
        match_id: m.id,
        match_day: m.match_day,
        stage: format!("{:?}", m.stage),
        round: m.knockout_round.map(|r| r.to_string()).unwrap_or_default(),
        leg: m.leg_number,
        home: team_name(data, m.home_team_id),
        away: team_name(data, m.away_team_id),
        home_score: m.score.map(|s| s.home),
        away_score: m.score.map(|s| s.away),
    }))
}

/// One table per group for grouped tournaments, a single table otherwise.
fn print_table(data: &TournamentData) -> Result<()> {
    let teams: Vec<&Team> = if data.groups.is_empty() {
        data.standings()
    } else {
        data.groups
            .iter()
            .flat_map(|g| data.group_standings(g.id))
            .collect()
    };
    print_rows(teams.into_iter().map(|t| TableRow {
        position: t.position,
        team_id: t.id,
        team: &t.name,
        group: t
            .group_id
            .and_then(|g| data.group(g).ok())
            .map(|g| g.name.as_str())
            .unwrap_or(""),
        played: t.stats.games_played,
        won: t.stats.wins,
        drawn: t.stats.draws,
        lost: t.stats.losses,
        goals_for: t.stats.goals_for,
        goals_against: t.stats.goals_against,
        goal_difference: t.stats.goal_difference,
        points: t.stats.points,
    }))
}

fn print_scorers(data: &TournamentData, limit: usize) -> Result<()> {
    print_rows(data.top_scorers(limit).into_iter().map(|p| ScorerRow {
        player_id: p.id,
        player: &p.name,
        team: team_name(data, p.team_id),
        goals: p.goals,
        assists: p.assists,
    }))
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let cli = Cli::parse();
    let store = load_store(&cli.state)?;

    match cli.command {
        Commands::Create { config, seed } => {
            let config = read_config(&config, seed)?;
            let data = with_status(create_tournament(&store, &config))?;
            save_store(&cli.state, &store)?;
            println!("{}", data.id());
        }
        Commands::Player {
            tournament,
            team,
            name,
        } => {
            let player = with_status(add_player(&store, tournament, team, &name))?;
            save_store(&cli.state, &store)?;
            println!("{}", player.id);
        }
        Commands::List { owner } => {
            print_rows(with_status(tournaments_by_owner(&store, &owner))?)?;
        }
        Commands::Fixtures { tournament } => {
            print_fixtures(&with_status(store.load(tournament))?)?;
        }
        Commands::Report {
            tournament,
            match_id,
            home,
            away,
            goals,
            assists,
        } => {
            let events = goals
                .into_iter()
                .map(|(p, n)| EventInput::goals(p, n))
                .chain(assists.into_iter().map(|(p, n)| EventInput::assists(p, n)))
                .collect();
            let report = MatchReport {
                match_id,
                home_score: home,
                away_score: away,
                events,
            };
            let (outcome, data) = with_status(submit_match_report(&store, tournament, &report))?;
            save_store(&cli.state, &store)?;
            log::info!("{:?} / {:?}", outcome.tie, outcome.progression);
            println!("{:?} {:?}", data.tournament.stage, data.tournament.status);
        }
        Commands::Table { tournament } => {
            print_table(&with_status(store.load(tournament))?)?;
        }
        Commands::Scorers { tournament, limit } => {
            print_scorers(&with_status(store.load(tournament))?, limit)?;
        }
        Commands::Delete { tournament } => {
            with_status(delete_tournament(&store, tournament))?;
            save_store(&cli.state, &store)?;
        }
    }
    Ok(())
}

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use salvo::cli::{coords_to_string, parse_coords, read_placement, render_own_board, render_shots};
use salvo::{init_logging, AttackOutcome, FleetSpec, Game, GameConfig, GameStatus, Strategy};

#[derive(Parser)]
#[command(author, version, about = "Naval combat against a computer opponent", long_about = None)]
struct Cli {
    /// JSON file with `difficulty` and `size`.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
    /// Fleet file of `name:length` lines.
    #[arg(long, default_value = "battleships.txt")]
    fleet: PathBuf,
    /// JSON placement for your ships; random placement when omitted.
    #[arg(long)]
    placement: Option<PathBuf>,
    /// Overrides the configured difficulty (easy, medium, hard, very-hard, extreme).
    #[arg(long)]
    difficulty: Option<String>,
    /// Overrides the configured board size.
    #[arg(long)]
    size: Option<usize>,
    /// Lay your ships out one per row from the left edge.
    #[arg(long, conflicts_with = "placement")]
    simple: bool,
    #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let fleet = FleetSpec::load(&cli.fleet);
    let mut config = GameConfig::load(&cli.config);
    if let Some(d) = cli.difficulty.as_deref() {
        config.difficulty = d.parse().map_err(|e| anyhow::anyhow!("{}", e))?;
    }
    if let Some(size) = cli.size {
        config.size = size;
    }
    let config = config.fit_fleet(&fleet);

    let placement = cli.placement.as_deref().and_then(read_placement);
    let strategy = match (&placement, cli.simple) {
        (Some(data), _) => Strategy::Custom(data.as_str()),
        (None, true) => Strategy::Simple,
        (None, false) => Strategy::Random,
    };

    let mut rng = match cli.seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    };
    let mut game = Game::new(config, &fleet, strategy, &mut rng).map_err(|e| anyhow::anyhow!(e))?;

    println!("Welcome to Battleship!");
    println!("Opponent set to {} ai.", config.difficulty);
    let size = config.size;
    let mut player_hits = Vec::new();
    let mut opponent_hits = Vec::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while game.status() == GameStatus::InProgress {
        println!("\nYour board:");
        print!(
            "{}",
            render_own_board(
                game.player_board(),
                game.player_fleet(),
                game.targeting().checked(),
                &opponent_hits,
            )
        );
        println!("\nOpponent board:");
        print!("{}", render_shots(size, game.player_shots(), &player_hits));

        print!("Please enter a pair of coordinates in the format x,y. ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            println!();
            return Ok(());
        };
        let Some(square) = parse_coords(&line?) else {
            println!("Invalid coordinates");
            continue;
        };
        let outcome = match game.player_attack(square) {
            Ok(outcome) => outcome,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        if outcome.is_hit() {
            player_hits.push(square);
        }
        report("You", square, outcome, game.opponent_fleet());
        if game.status() != GameStatus::InProgress {
            break;
        }

        let (square, outcome) = game.opponent_turn(&mut rng).map_err(|e| anyhow::anyhow!(e))?;
        if outcome.is_hit() {
            opponent_hits.push(square);
        }
        report("Opponent", square, outcome, game.player_fleet());
    }

    match game.status() {
        GameStatus::Won => println!("\nYou win! All enemy ships have been sunk."),
        GameStatus::Lost => println!("\nAI Potemkin wins! All your ships have been destroyed."),
        GameStatus::InProgress => {}
    }
    Ok(())
}

fn report(who: &str, square: salvo::Square, outcome: AttackOutcome, fleet: &salvo::FleetState) {
    match outcome {
        AttackOutcome::Miss => println!("{} fired at {}: miss!", who, coords_to_string(square)),
        AttackOutcome::Hit(_) => println!("{} fired at {}: hit!", who, coords_to_string(square)),
        AttackOutcome::Sunk(_) => println!(
            "{} fired at {}: {} sunk!",
            who,
            coords_to_string(square),
            outcome.sunk_name(fleet).unwrap_or("ship")
        ),
    }
}

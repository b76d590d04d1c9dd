use rand::{rngs::SmallRng, SeedableRng};
use salvo::{
    init_logging, place_fleet, Board, Difficulty, FleetSpec, Targeting, DEFAULT_BOARD_SIZE,
};
use serde_json::json;

/// Let the computer opponent sink randomly placed default fleets and report
/// how many shots each game took.
fn main() -> anyhow::Result<()> {
    init_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("Usage: {} <seed> <difficulty> [games]", args[0]);
        std::process::exit(1);
    }
    let seed: u64 = args[1].parse()?;
    let difficulty: Difficulty = args[2].parse().map_err(|e| anyhow::anyhow!("{}", e))?;
    let games: usize = match args.get(3) {
        Some(n) => n.parse()?,
        None => 1,
    };

    let mut rng = SmallRng::seed_from_u64(seed);
    let fleet = FleetSpec::default_fleet();
    let mut shots = Vec::with_capacity(games);

    for _ in 0..games {
        let board = Board::new(DEFAULT_BOARD_SIZE).map_err(|e| anyhow::anyhow!(e))?;
        let mut placed = place_fleet(board, &fleet, salvo::Strategy::Random, &mut rng)
            .map_err(|e| anyhow::anyhow!(e))?;
        let mut targeting =
            Targeting::new(difficulty, DEFAULT_BOARD_SIZE).map_err(|e| anyhow::anyhow!(e))?;
        while !placed.fleet.is_destroyed() {
            let square = targeting
                .next_shot(&placed.fleet, &mut rng)
                .map_err(|e| anyhow::anyhow!(e))?;
            let outcome = placed
                .board
                .attack(&mut placed.fleet, square)
                .map_err(|e| anyhow::anyhow!(e))?;
            targeting.observe(square, outcome);
        }
        shots.push(targeting.checked().len());
    }

    let mean = shots.iter().sum::<usize>() as f64 / shots.len().max(1) as f64;
    let result = json!({
        "difficulty": difficulty.as_str(),
        "games": games,
        "shots": shots,
        "mean_shots": mean,
        "min_shots": shots.iter().min(),
        "max_shots": shots.iter().max(),
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}

use rand::rngs::SmallRng;
use rand::SeedableRng;
use salvo::{
    AttackOutcome, Board, BoardError, Difficulty, FleetSpec, FleetState, Game, GameConfig,
    GameState, GameStatus, Square, Strategy,
};
use serde_json::json;

fn new_game(difficulty: Difficulty, seed: u64) -> (Game, SmallRng) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let config = GameConfig::new(difficulty, 10);
    let game = Game::new(config, &FleetSpec::default_fleet(), Strategy::Random, &mut rng).unwrap();
    (game, rng)
}

/// Player sweeps row-major while the opponent plays its own strategy.
fn play_out(game: &mut Game, rng: &mut SmallRng) -> usize {
    let mut turns = 0;
    for square in game.player_board().squares().collect::<Vec<_>>() {
        if game.status() != GameStatus::InProgress {
            break;
        }
        game.player_attack(square).unwrap();
        turns += 1;
        if game.status() != GameStatus::InProgress {
            break;
        }
        game.opponent_turn(rng).unwrap();
    }
    turns
}

#[test]
fn test_full_game_terminates_for_every_difficulty() {
    for difficulty in Difficulty::ALL {
        let (mut game, mut rng) = new_game(difficulty, 11);
        let turns = play_out(&mut game, &mut rng);
        assert!(turns <= 100);
        assert_ne!(game.status(), GameStatus::InProgress);
    }
}

#[test]
fn test_opponent_alone_sinks_fleet() {
    for difficulty in Difficulty::ALL {
        let (mut game, mut rng) = new_game(difficulty, 4);
        let mut turns = 0;
        while game.status() == GameStatus::InProgress {
            game.opponent_turn(&mut rng).unwrap();
            turns += 1;
        }
        assert_eq!(game.status(), GameStatus::Lost);
        assert!(turns <= 100);
        assert_eq!(game.targeting().checked().len(), turns);
    }
}

#[test]
fn test_player_attack_errors() {
    let (mut game, _) = new_game(Difficulty::Hard, 1);
    game.player_attack(Square::new(0, 0)).unwrap();
    assert_eq!(
        game.player_attack(Square::new(0, 0)),
        Err(BoardError::AlreadyGuessed(Square::new(0, 0)))
    );
    assert_eq!(
        game.player_attack(Square::new(10, 0)),
        Err(BoardError::OutOfBounds(Square::new(10, 0)))
    );
    assert_eq!(game.player_shots().len(), 1);
}

#[test]
fn test_player_sinks_simple_layout() {
    let mut rng = SmallRng::seed_from_u64(2);
    let config = GameConfig::new(Difficulty::Easy, 8);
    let spec = FleetSpec::new().with("A", 3).with("B", 2);
    let mut game = Game::new(config, &spec, Strategy::Simple, &mut rng).unwrap();
    // the player's own layout is simple; the opponent's is random
    let targets: Vec<Square> = game.opponent_board().occupied().map(|(sq, _)| sq).collect();
    assert_eq!(targets.len(), 5);
    let mut sunk = Vec::new();
    for sq in targets {
        if let AttackOutcome::Sunk(id) = game.player_attack(sq).unwrap() {
            sunk.push(game.opponent_fleet().name(id).unwrap().to_string());
        }
    }
    sunk.sort();
    assert_eq!(sunk, vec!["A", "B"]);
    assert_eq!(game.status(), GameStatus::Won);
    assert_eq!(game.player_board().occupant(Square::new(1, 1)), game.player_fleet().id_of("B"));
}

#[test]
fn test_easy_opponent_never_hunts() {
    let (mut game, mut rng) = new_game(Difficulty::Easy, 8);
    while game.status() == GameStatus::InProgress {
        game.opponent_turn(&mut rng).unwrap();
        assert!(!game.targeting().is_hunting());
    }
}

#[test]
fn test_hunting_ends_when_fleet_destroyed() {
    let (mut game, mut rng) = new_game(Difficulty::Hard, 8);
    while game.status() == GameStatus::InProgress {
        game.opponent_turn(&mut rng).unwrap();
    }
    assert!(!game.targeting().is_hunting());
}

#[test]
fn test_small_board_needs_fitting() {
    let mut rng = SmallRng::seed_from_u64(0);
    let fleet = FleetSpec::default_fleet();
    let config = GameConfig::new(Difficulty::Medium, 4);
    assert_eq!(
        Game::new(config, &fleet, Strategy::Random, &mut rng).unwrap_err(),
        BoardError::FleetDoesNotFit { size: 4 }
    );
    let game = Game::new(config.fit_fleet(&fleet), &fleet, Strategy::Random, &mut rng).unwrap();
    assert_eq!(game.config().size, 6);
}

#[test]
fn test_state_json_round_trip() {
    let (mut game, mut rng) = new_game(Difficulty::VeryHard, 3);
    for sq in [Square::new(0, 0), Square::new(5, 5), Square::new(9, 9)] {
        game.player_attack(sq).unwrap();
        game.opponent_turn(&mut rng).unwrap();
    }
    let state = game.state();
    let json = serde_json::to_string(&state).unwrap();
    let decoded: GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, state);

    let mut restored = Game::from_state(decoded).unwrap();
    assert_eq!(restored.state(), state);
    // a restored game continues with the same rng stream
    let mut rng2 = rng.clone();
    assert_eq!(
        restored.opponent_turn(&mut rng2).unwrap(),
        game.opponent_turn(&mut rng).unwrap()
    );
}

fn saved_json(seed: u64) -> serde_json::Value {
    let (mut game, mut rng) = new_game(Difficulty::Hard, seed);
    game.player_attack(Square::new(3, 3)).unwrap();
    game.opponent_turn(&mut rng).unwrap();
    serde_json::to_value(game.state()).unwrap()
}

#[test]
fn test_truncated_snapshot_is_rejected() {
    let mut value = saved_json(6);
    value["opponent_board"]["cells"] = json!([]);
    assert!(serde_json::from_value::<GameState>(value).is_err());

    let mut value = saved_json(6);
    value["player_shots"]["marks"] = json!([true]);
    assert!(serde_json::from_value::<GameState>(value).is_err());

    let mut value = saved_json(6);
    value["player_shots"]["order"] = json!([{"row": 3, "col": 3}, {"row": 3, "col": 3}]);
    assert!(serde_json::from_value::<GameState>(value).is_err());
}

#[test]
fn test_restore_rejects_mismatched_sizes() {
    let (game, _) = new_game(Difficulty::Hard, 6);
    let mut state = game.state();
    state.opponent_board = Board::new(8).unwrap();
    assert!(matches!(Game::from_state(state), Err(BoardError::InvalidState(_))));
}

#[test]
fn test_restore_rejects_unknown_ships() {
    let (game, _) = new_game(Difficulty::Hard, 6);
    let mut state = game.state();
    state.player_fleet = FleetState::default();
    assert!(matches!(Game::from_state(state), Err(BoardError::UnknownShip(_))));
}

#[test]
fn test_restore_rejects_hunt_off_board() {
    let mut value = saved_json(6);
    value["targeting"]["hunt"]["entries"] = json!([{
        "ship": 0,
        "left": {"row": 50, "col": 0},
        "right": {"row": 50, "col": 0},
        "orientation": "Unknown"
    }]);
    let state: GameState = serde_json::from_value(value).unwrap();
    assert!(matches!(Game::from_state(state), Err(BoardError::InvalidState(_))));
}

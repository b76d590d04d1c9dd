use proptest::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use salvo::{place_fleet, AttackOutcome, Board, FleetSpec, PlacedFleet, ShipId, Square, Strategy};

fn random_fleet(seed: u64, size: usize) -> PlacedFleet {
    let mut rng = SmallRng::seed_from_u64(seed);
    place_fleet(
        Board::new(size).unwrap(),
        &FleetSpec::default_fleet(),
        Strategy::Random,
        &mut rng,
    )
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_layout_is_valid(seed in any::<u64>(), size in 6usize..14) {
        let placed = random_fleet(seed, size);
        for (i, ship) in placed.fleet.ships().iter().enumerate() {
            let cells = placed.board.cells_of(ShipId::new(i));
            prop_assert_eq!(cells.len(), ship.length);
            let first = cells[0];
            let last = cells[cells.len() - 1];
            let straight = first.row == last.row || first.col == last.col;
            prop_assert!(straight);
            prop_assert_eq!(
                (last.row - first.row + last.col - first.col) as usize,
                ship.length - 1
            );
        }
        prop_assert_eq!(placed.board.occupied().count(), 17);
    }

    #[test]
    fn remaining_matches_occupied_cells(seed in any::<u64>(), shots in 0usize..100) {
        let PlacedFleet { mut board, mut fleet } = random_fleet(seed, 10);
        let mut rng = SmallRng::seed_from_u64(seed ^ 0x5a5a);
        for _ in 0..shots {
            let sq = Square::new(rng.random_range(0..10), rng.random_range(0..10));
            board.attack(&mut fleet, sq).unwrap();
            let afloat: usize = fleet.ships().iter().map(|s| s.remaining).sum();
            prop_assert_eq!(afloat, board.occupied().count());
        }
    }

    #[test]
    fn second_shot_at_square_misses(seed in any::<u64>(), row in 0i32..10, col in 0i32..10) {
        let PlacedFleet { mut board, mut fleet } = random_fleet(seed, 10);
        let sq = Square::new(row, col);
        board.attack(&mut fleet, sq).unwrap();
        let (board_after, fleet_after) = (board.clone(), fleet.clone());
        prop_assert_eq!(board.attack(&mut fleet, sq).unwrap(), AttackOutcome::Miss);
        prop_assert_eq!(board, board_after);
        prop_assert_eq!(fleet, fleet_after);
    }
}

use salvo::{
    place_fleet, Board, BoardError, FleetSpec, FleetState, Orientation, PlacementData,
    PlacementError, ShipId, Square, Strategy,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn assert_valid_layout(board: &Board, fleet: &FleetState) {
    for (i, ship) in fleet.ships().iter().enumerate() {
        let cells = board.cells_of(ShipId::new(i));
        assert_eq!(cells.len(), ship.length, "{} has the wrong number of cells", ship.name);
        let same_row = cells.iter().all(|c| c.row == cells[0].row);
        let same_col = cells.iter().all(|c| c.col == cells[0].col);
        assert!(same_row || same_col, "{} is not axis-aligned", ship.name);
        for pair in cells.windows(2) {
            let gap = (pair[1].row - pair[0].row) + (pair[1].col - pair[0].col);
            assert_eq!(gap, 1, "{} is not contiguous", ship.name);
        }
    }
    let total: usize = fleet.ships().iter().map(|s| s.length).sum();
    assert_eq!(board.occupied().count(), total, "ships overlap");
}

fn default_names() -> Vec<String> {
    FleetSpec::default_fleet()
        .iter()
        .map(|(_, def)| def.name().to_string())
        .collect()
}

fn names(fleet: &FleetState) -> Vec<String> {
    fleet.ships().iter().map(|s| s.name.clone()).collect()
}

#[test]
fn test_simple_placement_rows() {
    let mut rng = SmallRng::seed_from_u64(0);
    let spec = FleetSpec::new().with("A", 3).with("B", 2);
    let placed = place_fleet(Board::new(10).unwrap(), &spec, Strategy::Simple, &mut rng).unwrap();
    let a = placed.fleet.id_of("A").unwrap();
    let b = placed.fleet.id_of("B").unwrap();
    assert_eq!(
        placed.board.cells_of(a),
        vec![Square::new(0, 0), Square::new(0, 1), Square::new(0, 2)]
    );
    assert_eq!(placed.board.cells_of(b), vec![Square::new(1, 0), Square::new(1, 1)]);
    assert_valid_layout(&placed.board, &placed.fleet);
}

#[test]
fn test_simple_placement_needs_a_row_per_ship() {
    let mut rng = SmallRng::seed_from_u64(0);
    let spec = FleetSpec::new().with("A", 1).with("B", 1).with("C", 1).with("D", 1);
    let err = place_fleet(Board::new(3).unwrap(), &spec, Strategy::Simple, &mut rng).unwrap_err();
    assert_eq!(err, BoardError::TooManyShips { ships: 4, rows: 3 });
}

#[test]
fn test_random_placement_default_fleet() {
    for seed in 0..50 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let placed = place_fleet(
            Board::new(10).unwrap(),
            &FleetSpec::default_fleet(),
            Strategy::Random,
            &mut rng,
        )
        .unwrap();
        assert_valid_layout(&placed.board, &placed.fleet);
    }
}

#[test]
fn test_random_placement_is_reproducible() {
    let place = |seed| {
        let mut rng = SmallRng::seed_from_u64(seed);
        place_fleet(
            Board::new(10).unwrap(),
            &FleetSpec::default_fleet(),
            Strategy::Random,
            &mut rng,
        )
        .unwrap()
    };
    assert_eq!(place(42), place(42));
}

#[test]
fn test_random_placement_gives_up_on_overfull_board() {
    let mut rng = SmallRng::seed_from_u64(3);
    let spec = (0..5).fold(FleetSpec::new(), |f, i| f.with(format!("S{}", i), 2));
    let err = place_fleet(Board::new(3).unwrap(), &spec, Strategy::Random, &mut rng).unwrap_err();
    assert_eq!(err, BoardError::UnableToPlaceShip);
}

#[test]
fn test_ship_as_long_as_board_uses_default_fleet() {
    let mut rng = SmallRng::seed_from_u64(5);
    let spec = FleetSpec::new().with("Long", 10);
    let placed = place_fleet(Board::new(10).unwrap(), &spec, Strategy::Random, &mut rng).unwrap();
    assert_eq!(names(&placed.fleet), default_names());
    assert_valid_layout(&placed.board, &placed.fleet);
}

#[test]
fn test_zero_length_ship_uses_default_fleet() {
    let mut rng = SmallRng::seed_from_u64(5);
    let spec = FleetSpec::new().with("A", 3).with("Ghost", 0);
    let placed = place_fleet(Board::new(10).unwrap(), &spec, Strategy::Simple, &mut rng).unwrap();
    assert_eq!(names(&placed.fleet), default_names());
}

#[test]
fn test_default_fleet_too_big_for_board() {
    let mut rng = SmallRng::seed_from_u64(5);
    let spec = FleetSpec::new().with("A", 9);
    let err = place_fleet(Board::new(5).unwrap(), &spec, Strategy::Random, &mut rng).unwrap_err();
    assert_eq!(err, BoardError::FleetDoesNotFit { size: 5 });
}

#[test]
fn test_custom_placement_full_fleet() {
    let mut rng = SmallRng::seed_from_u64(0);
    let data = r#"{
        "Aircraft_Carrier": [0, 0, "h"],
        "Battleship": [2, 0, "v"],
        "Cruiser": [9, 7, "h"],
        "Submarine": ["4", "4", "v"],
        "Destroyer": [8, 1, "h"]
    }"#;
    let placed = place_fleet(
        Board::new(10).unwrap(),
        &FleetSpec::default_fleet(),
        Strategy::Custom(data),
        &mut rng,
    )
    .unwrap();
    assert_valid_layout(&placed.board, &placed.fleet);
    let battleship = placed.fleet.id_of("Battleship").unwrap();
    assert_eq!(
        placed.board.cells_of(battleship),
        (2..6).map(|r| Square::new(r, 0)).collect::<Vec<_>>()
    );
    let submarine = placed.fleet.id_of("Submarine").unwrap();
    assert_eq!(
        placed.board.cells_of(submarine),
        (4..7).map(|r| Square::new(r, 4)).collect::<Vec<_>>()
    );
}

fn assert_falls_back(spec: &FleetSpec, size: usize, data: &str) {
    for seed in 0..10 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let placed = place_fleet(Board::new(size).unwrap(), spec, Strategy::Custom(data), &mut rng)
            .unwrap();
        assert_valid_layout(&placed.board, &placed.fleet);
    }
}

#[test]
fn test_custom_out_of_range_falls_back_to_random() {
    let spec = FleetSpec::new().with("A", 5);
    assert_falls_back(&spec, 10, r#"{"A":[99,99,"h"]}"#);
}

#[test]
fn test_custom_run_leaving_board_falls_back() {
    let spec = FleetSpec::new().with("A", 5);
    assert_falls_back(&spec, 10, r#"{"A":[0,7,"h"]}"#);
    assert_falls_back(&spec, 10, r#"{"A":[-1,0,"v"]}"#);
}

#[test]
fn test_custom_malformed_data_falls_back() {
    let spec = FleetSpec::new().with("A", 3).with("B", 2);
    assert_falls_back(&spec, 8, "not json");
    assert_falls_back(&spec, 8, r#"["A", 0, 0, "h"]"#);
    assert_falls_back(&spec, 8, r#"{"A":[0,0],"B":[1,0,"h"]}"#);
    assert_falls_back(&spec, 8, r#"{"A":[0,0,"d"],"B":[1,0,"h"]}"#);
    assert_falls_back(&spec, 8, r#"{"A":[0.5,0,"h"],"B":[1,0,"h"]}"#);
    assert_falls_back(&spec, 8, r#"{"A":[null,0,"h"],"B":[1,0,"h"]}"#);
}

#[test]
fn test_custom_unknown_or_missing_ship_falls_back() {
    let spec = FleetSpec::new().with("A", 3).with("B", 2);
    assert_falls_back(&spec, 8, r#"{"A":[0,0,"h"],"Zed":[1,0,"h"]}"#);
    assert_falls_back(&spec, 8, r#"{"A":[0,0,"h"]}"#);
}

#[test]
fn test_custom_overlap_falls_back() {
    let spec = FleetSpec::new().with("A", 3).with("B", 2);
    assert_falls_back(&spec, 8, r#"{"A":[0,0,"h"],"B":[0,1,"v"]}"#);
}

#[test]
fn test_custom_fallback_discards_partial_layout() {
    // A is placed before B is rejected; it must not be placed twice.
    let spec = FleetSpec::new().with("A", 3).with("B", 4);
    let data = r#"{"A":[2,2,"h"],"B":[7,7,"v"]}"#;
    let mut rng = SmallRng::seed_from_u64(11);
    let placed =
        place_fleet(Board::new(8).unwrap(), &spec, Strategy::Custom(data), &mut rng).unwrap();
    assert_valid_layout(&placed.board, &placed.fleet);
    assert_eq!(placed.board.occupied().count(), 7);
}

#[test]
fn test_placement_data_parse() {
    let data = PlacementData::parse(r#"{"A":[1,2,"v"],"B":["3","4","H"]}"#).unwrap();
    assert_eq!(data.len(), 2);
    let a = data.get("A").unwrap();
    assert_eq!(a.anchor, Square::new(1, 2));
    assert_eq!(a.orientation, Orientation::Vertical);
    let b = data.get("B").unwrap();
    assert_eq!(b.anchor, Square::new(3, 4));
    assert_eq!(b.orientation, Orientation::Horizontal);
}

#[test]
fn test_placement_data_rejects_bad_shapes() {
    assert!(matches!(PlacementData::parse("{"), Err(PlacementError::Malformed(_))));
    assert!(matches!(PlacementData::parse("[]"), Err(PlacementError::Malformed(_))));
    assert!(matches!(
        PlacementData::parse(r#"{"A":[1,2,"v",4]}"#),
        Err(PlacementError::Malformed(_))
    ));
    assert!(matches!(
        PlacementData::parse(r#"{"A":{"row":1}}"#),
        Err(PlacementError::Malformed(_))
    ));
}

use navalbattle::{
    BoardError, GameEngine, GameStatus, Match, MatchState, MatchStore, MemoryStore, Orientation,
    Phase, PlacementError, ShipCatalog, ShipKind, ShotError, ShotResult, Side, TargetMode,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn engine(seed: u64) -> GameEngine<MemoryStore> {
    GameEngine::new_match(
        "Tester",
        ShipCatalog::standard(),
        MemoryStore::new(),
        SmallRng::seed_from_u64(seed),
    )
    .unwrap()
}

fn place_standard_fleet(engine: &mut GameEngine<MemoryStore>) {
    let layout = [
        (ShipKind::Carrier, 0, 0, Orientation::Horizontal),
        (ShipKind::Submarine, 2, 0, Orientation::Vertical),
        (ShipKind::Destroyer, 9, 8, Orientation::Horizontal),
        (ShipKind::Frigate, 5, 5, Orientation::Vertical),
    ];
    for (kind, r, c, o) in layout {
        engine.place_ship(Some(kind), r, c, o).unwrap();
    }
}

/// First cell of the computer board holding no ship.
fn computer_water(engine: &GameEngine<MemoryStore>) -> (usize, usize) {
    let board = engine.game().computer_board();
    (0..10)
        .flat_map(|r| (0..10).map(move |c| (r, c)))
        .find(|&(r, c)| board.cell_code(r, c) == 0 && board.fired().get(r, c) == Ok(false))
        .unwrap()
}

#[test]
fn test_new_match_starts_in_placement() {
    let engine = engine(1);
    assert_eq!(engine.status(), GameStatus::Placing);
    assert_eq!(engine.game().phase(), Phase::Placement);
    assert!(engine.game().computer_board().is_full());
    assert!(engine.game().player_board().footprints().is_empty());
    assert!(engine.store().exists());
    assert_eq!(engine.store().save_count(), 1);
}

#[test]
fn test_placement_without_selection_is_refused() {
    let mut engine = engine(2);
    assert_eq!(
        engine.place_ship(None, 0, 0, Orientation::Horizontal),
        Err(PlacementError::NoSelection)
    );
    assert!(engine.game().player_board().footprints().is_empty());
    assert_eq!(engine.store().save_count(), 1);
}

#[test]
fn test_no_shots_before_fleet_is_complete() {
    let mut engine = engine(3);
    engine
        .place_ship(Some(ShipKind::Carrier), 0, 0, Orientation::Horizontal)
        .unwrap();
    assert_eq!(engine.player_fire(0, 0), Err(ShotError::NotInCombat));
    assert_eq!(engine.computer_fire(), Err(ShotError::NotInCombat));
}

#[test]
fn test_combat_begins_when_fleet_is_complete() {
    let mut engine = engine(4);
    place_standard_fleet(&mut engine);
    assert_eq!(engine.game().phase(), Phase::Combat);
    assert_eq!(engine.status(), GameStatus::PlayerTurn);
    // One save for the new match, one per ship.
    assert_eq!(engine.store().save_count(), 5);
    assert_eq!(
        engine.place_ship(Some(ShipKind::Frigate), 7, 7, Orientation::Vertical),
        Err(PlacementError::PhaseClosed)
    );
}

#[test]
fn test_auto_place_finishes_partial_fleet() {
    let mut engine = engine(5);
    engine
        .place_ship(Some(ShipKind::Carrier), 9, 0, Orientation::Horizontal)
        .unwrap();
    assert_eq!(engine.auto_place_remaining().unwrap(), 3);
    assert_eq!(engine.status(), GameStatus::PlayerTurn);
    assert_eq!(engine.auto_place_remaining().unwrap(), 0);
}

#[test]
fn test_miss_passes_turn_and_hit_keeps_it() {
    let mut engine = engine(6);
    place_standard_fleet(&mut engine);

    let fp = engine.game().computer_board().footprints()[0];
    let (r, c) = fp.origin();
    let report = engine.player_fire(r, c).unwrap();
    assert_eq!(report.shooter, Side::Player);
    assert_eq!(report.result, ShotResult::Hit);
    assert_eq!(engine.status(), GameStatus::PlayerTurn);

    let (r, c) = computer_water(&engine);
    let report = engine.player_fire(r, c).unwrap();
    assert_eq!(report.result, ShotResult::Miss);
    assert_eq!(report.winner, None);
    assert_eq!(engine.status(), GameStatus::ComputerTurn);
    assert_eq!(engine.game().last_outcome(), Some(&report));

    assert_eq!(engine.player_fire(0, 0), Err(ShotError::NotYourTurn));
}

#[test]
fn test_repeat_shot_is_refused_and_keeps_turn() {
    let mut engine = engine(7);
    place_standard_fleet(&mut engine);
    let fp = engine.game().computer_board().footprints()[0];
    let (r, c) = fp.origin();
    engine.player_fire(r, c).unwrap();
    let saves = engine.store().save_count();

    assert_eq!(
        engine.player_fire(r, c),
        Err(ShotError::AlreadyFired { row: r, col: c })
    );
    assert_eq!(engine.status(), GameStatus::PlayerTurn);
    assert_eq!(engine.store().save_count(), saves);
}

#[test]
fn test_computer_turn_runs_until_a_miss() {
    let mut engine = engine(8);
    place_standard_fleet(&mut engine);
    let (r, c) = computer_water(&engine);
    engine.player_fire(r, c).unwrap();

    let reports = engine.run_computer_turn().unwrap();
    let (last, hits) = reports.split_last().unwrap();
    assert!(hits.iter().all(|rep| rep.result == ShotResult::Hit));
    assert!(last.result == ShotResult::Miss || last.winner == Some(Side::Computer));
    assert!(reports.iter().all(|rep| rep.shooter == Side::Computer));
    assert_eq!(
        engine.game().targeting().fired(),
        engine.game().player_board().fired()
    );
    if last.result == ShotResult::Miss {
        assert_eq!(engine.status(), GameStatus::PlayerTurn);
        assert_eq!(engine.computer_fire(), Err(ShotError::NotYourTurn));
    }
}

#[test]
fn test_sinking_every_ship_wins_and_clears_snapshot() {
    let mut engine = engine(9);
    engine.auto_place_remaining().unwrap();
    let footprints = engine.game().computer_board().footprints().to_vec();
    let targets: Vec<_> = footprints.iter().flat_map(|fp| fp.cells()).collect();
    assert_eq!(targets.len(), 10);

    let mut sunk = Vec::new();
    let mut last = None;
    for (r, c) in targets {
        let report = engine.player_fire(r, c).unwrap();
        assert_eq!(report.result, ShotResult::Hit);
        sunk.extend(report.sunk);
        last = Some(report);
    }
    assert_eq!(sunk, footprints);
    assert_eq!(last.unwrap().winner, Some(Side::Player));
    assert_eq!(engine.status(), GameStatus::Won);
    assert_eq!(engine.game().winner(), Some(Side::Player));
    assert!(!engine.store().exists());

    assert_eq!(engine.player_fire(0, 0), Err(ShotError::GameOver));
    assert_eq!(engine.computer_fire(), Err(ShotError::GameOver));
    assert_eq!(engine.run_computer_turn().unwrap(), vec![]);
}

#[test]
fn test_frigate_fleet_single_hit_wins() {
    let catalog = ShipCatalog::with_counts([1, 0, 0, 0]).unwrap();
    let mut rng = SmallRng::seed_from_u64(10);
    let mut game = Match::new("Solo", catalog, &mut rng).unwrap();
    game.place_ship(Some(ShipKind::Frigate), 0, 0, Orientation::Horizontal)
        .unwrap();

    let (r, c) = game.computer_board().footprints()[0].origin();
    let report = game.player_fire(r, c).unwrap();
    assert_eq!(report.result, ShotResult::Hit);
    assert_eq!(report.sunk.map(|fp| fp.kind()), Some(ShipKind::Frigate));
    assert_eq!(report.winner, Some(Side::Player));
    assert_eq!(game.phase(), Phase::GameOver);
}

#[test]
fn test_computer_hunts_only_after_unsunk_hit() {
    let mut rng = SmallRng::seed_from_u64(12);
    let mut game = Match::new("Target", ShipCatalog::classic(), &mut rng).unwrap();
    game.auto_place_remaining(&mut rng).unwrap();

    let mut player_cells = (0..10).flat_map(|r| (0..10).map(move |c| (r, c)));
    while game.winner().is_none() {
        match game.status() {
            GameStatus::PlayerTurn => {
                // The player only ever aims at water so the computer gets to play.
                let (r, c) = player_cells
                    .by_ref()
                    .find(|&(r, c)| game.computer_board().cell_code(r, c) == 0)
                    .unwrap();
                game.player_fire(r, c).unwrap();
            }
            GameStatus::ComputerTurn => {
                let report = game.computer_fire(&mut rng).unwrap();
                let hunting = report.result == ShotResult::Hit && report.sunk.is_none();
                let expected = if hunting {
                    TargetMode::Hunting
                } else {
                    TargetMode::Random
                };
                assert_eq!(game.targeting().mode(), expected);
                assert_eq!(game.targeting().last_shot(), Some((report.row, report.col)));
            }
            other => panic!("unexpected status {:?}", other),
        }
    }
    assert_eq!(game.status(), GameStatus::Lost);
    assert!(game.player_board().all_sunk());
}

#[test]
fn test_resume_restores_the_same_match() {
    let mut engine = engine(13);
    place_standard_fleet(&mut engine);
    let (r, c) = computer_water(&engine);
    engine.player_fire(r, c).unwrap();
    engine.run_computer_turn().unwrap();

    let store = engine.store().clone();
    let resumed = GameEngine::resume(store, SmallRng::seed_from_u64(99)).unwrap();
    assert_eq!(resumed.game(), engine.game());
}

#[test]
fn test_start_resumes_saved_match() {
    let engine = engine(14);
    let store = engine.store().clone();
    let started = GameEngine::start(
        "Somebody Else",
        ShipCatalog::classic(),
        store,
        SmallRng::seed_from_u64(1),
    )
    .unwrap();
    assert_eq!(started.game().nickname(), "Tester");
    assert_eq!(started.game(), engine.game());
}

#[test]
fn test_start_replaces_unreadable_snapshot() {
    let store = MemoryStore::from_bytes(b"not a snapshot".to_vec());
    let engine = GameEngine::start(
        "Fresh",
        ShipCatalog::standard(),
        store,
        SmallRng::seed_from_u64(15),
    )
    .unwrap();
    assert_eq!(engine.status(), GameStatus::Placing);
    assert_eq!(engine.game().nickname(), "Fresh");
    assert_eq!(engine.store().load().unwrap().nickname, "Fresh");
}

#[test]
fn test_start_without_snapshot_begins_new_match() {
    let engine = GameEngine::start(
        "Newcomer",
        ShipCatalog::standard(),
        MemoryStore::new(),
        SmallRng::seed_from_u64(16),
    )
    .unwrap();
    assert_eq!(engine.status(), GameStatus::Placing);
    assert!(engine.store().exists());
}

#[test]
fn test_snapshot_phase_and_winner_must_agree() {
    let mut rng = SmallRng::seed_from_u64(17);
    let mut game = Match::new("Check", ShipCatalog::standard(), &mut rng).unwrap();
    let placing = MatchState::from(&game);
    game.auto_place_remaining(&mut rng).unwrap();
    let combat = MatchState::from(&game);
    assert!(Match::try_from(placing.clone()).is_ok());
    assert!(Match::try_from(combat.clone()).is_ok());

    let rejected = |state: MatchState| {
        matches!(Match::try_from(state), Err(BoardError::CorruptState(_)))
    };

    let mut full_fleet_placing = combat.clone();
    full_fleet_placing.phase = Phase::Placement;
    assert!(rejected(full_fleet_placing));

    let mut over_without_winner = combat.clone();
    over_without_winner.phase = Phase::GameOver;
    assert!(rejected(over_without_winner));

    let mut early_winner = combat.clone();
    early_winner.winner = Some(Side::Player);
    assert!(rejected(early_winner));

    let mut unearned_win = combat;
    unearned_win.phase = Phase::GameOver;
    unearned_win.winner = Some(Side::Computer);
    assert!(rejected(unearned_win));

    let mut placing_winner = placing;
    placing_winner.winner = Some(Side::Player);
    assert!(rejected(placing_winner));
}

#[test]
fn test_finished_match_snapshot_restores() {
    let mut rng = SmallRng::seed_from_u64(18);
    let mut game = Match::new("Victor", ShipCatalog::standard(), &mut rng).unwrap();
    game.auto_place_remaining(&mut rng).unwrap();
    let targets: Vec<_> = game
        .computer_board()
        .footprints()
        .iter()
        .flat_map(|fp| fp.cells())
        .collect();
    for (r, c) in targets {
        game.player_fire(r, c).unwrap();
    }

    let restored = Match::try_from(MatchState::from(&game)).unwrap();
    assert_eq!(restored.status(), GameStatus::Won);
    assert_eq!(restored, game);
}

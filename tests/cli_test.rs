use navalbattle::cli::{
    coord_to_string, parse_command, parse_coord, parse_orientation, render_own_board,
    render_quotas, render_target_board, Command,
};
use navalbattle::{FleetBoard, Orientation, ShipCatalog, ShipKind};

#[test]
fn test_parse_coord() {
    assert_eq!(parse_coord("A1"), Ok((0, 0)));
    assert_eq!(parse_coord("j10"), Ok((9, 9)));
    assert_eq!(parse_coord(" c7 "), Ok((6, 2)));
    assert!(parse_coord("K1").is_err());
    assert!(parse_coord("A0").is_err());
    assert!(parse_coord("A11").is_err());
    assert!(parse_coord("1A").is_err());
    assert!(parse_coord("").is_err());
}

#[test]
fn test_coord_to_string() {
    assert_eq!(coord_to_string(4, 0), "A5");
    assert_eq!(coord_to_string(9, 9), "J10");
    for (r, c) in [(0, 0), (3, 7), (9, 2)] {
        assert_eq!(parse_coord(&coord_to_string(r, c)), Ok((r, c)));
    }
}

#[test]
fn test_parse_orientation() {
    assert_eq!(parse_orientation("H"), Ok(Orientation::Horizontal));
    assert_eq!(parse_orientation("vertical"), Ok(Orientation::Vertical));
    assert!(parse_orientation("diagonal").is_err());
}

#[test]
fn test_parse_commands() {
    assert_eq!(
        parse_command("place carrier B3 v"),
        Ok(Command::Place {
            kind: Some(ShipKind::Carrier),
            row: 2,
            col: 1,
            orientation: Orientation::Vertical,
        })
    );
    assert_eq!(
        parse_command("p 2 a1 h"),
        Ok(Command::Place {
            kind: Some(ShipKind::Destroyer),
            row: 0,
            col: 0,
            orientation: Orientation::Horizontal,
        })
    );
    // Unknown kinds reach the engine, which reports the missing selection.
    assert!(matches!(
        parse_command("place rowboat A1 h"),
        Ok(Command::Place { kind: None, .. })
    ));
    assert_eq!(parse_command("FIRE c7"), Ok(Command::Fire { row: 6, col: 2 }));
    assert_eq!(parse_command("auto"), Ok(Command::Auto));
    assert_eq!(parse_command("b"), Ok(Command::Board));
    assert_eq!(parse_command("?"), Ok(Command::Help));
    assert_eq!(parse_command("exit"), Ok(Command::Quit));
    assert!(parse_command("fire").is_err());
    assert!(parse_command("place carrier A1").is_err());
    assert!(parse_command("dance").is_err());
}

#[test]
fn test_render_own_board_shows_ships_and_shots() {
    let mut board = FleetBoard::new(ShipCatalog::standard());
    board
        .place_ship(ShipKind::Carrier, 0, 0, Orientation::Horizontal)
        .unwrap();
    board.record_shot(0, 1).unwrap();
    board.record_shot(1, 0).unwrap();

    let out = render_own_board(&board);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 11);
    assert!(lines[0].contains("A B C D E F G H I J"));
    assert_eq!(lines[1], "   1 4 X 4 4 . . . . . .");
    assert_eq!(lines[2], "   2 o . . . . . . . . .");
}

#[test]
fn test_render_target_board_hides_ships() {
    let mut board = FleetBoard::new(ShipCatalog::standard());
    board
        .place_ship(ShipKind::Destroyer, 0, 0, Orientation::Horizontal)
        .unwrap();
    board
        .place_ship(ShipKind::Frigate, 5, 5, Orientation::Horizontal)
        .unwrap();

    let untouched = render_target_board(&board);
    assert!(!untouched.lines().skip(1).any(|l| l[4..].contains(|ch: char| ch != ' ' && ch != '.')));

    board.record_shot(0, 0).unwrap();
    board.record_shot(5, 5).unwrap();
    board.record_shot(9, 9).unwrap();
    let out = render_target_board(&board);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[1], "   1 X . . . . . . . . .");
    assert_eq!(lines[6], "   6 . . . . . # . . . .");
    assert_eq!(lines[10], "  10 . . . . . . . . . o");
}

#[test]
fn test_render_quotas_lists_every_kind() {
    let mut board = FleetBoard::new(ShipCatalog::classic());
    board
        .place_ship(ShipKind::Frigate, 0, 0, Orientation::Horizontal)
        .unwrap();
    let out = render_quotas(&board);
    assert_eq!(out.lines().count(), 4);
    assert!(out.lines().next().unwrap().contains("Carrier"));
    assert!(out.contains("Frigate"));
    assert!(out.contains("left 3"));
}

//! Text front-end helpers: coordinate parsing, command parsing and plain
//! board rendering for the terminal binary.

use std::fmt::Write;

use crate::board::FleetBoard;
use crate::common::ShotMark;
use crate::config::BOARD_SIZE;
use crate::ship::{Orientation, ShipKind};

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `kind` is `None` when the named ship kind is not recognised.
    Place {
        kind: Option<ShipKind>,
        row: usize,
        col: usize,
        orientation: Orientation,
    },
    Auto,
    Fire { row: usize, col: usize },
    Board,
    Help,
    Quit,
}

/// `(row, col)` as shown to the player, e.g. `(4, 0)` is `A5`.
pub fn coord_to_string(row: usize, col: usize) -> String {
    let letter = (b'A' + col as u8) as char;
    format!("{}{}", letter, row + 1)
}

/// Parse `A5`-style coordinates into `(row, col)`.
pub fn parse_coord(input: &str) -> Result<(usize, usize), String> {
    let input = input.trim();
    if input.len() < 2 {
        return Err("need a column letter and a row number (e.g. A5)".to_string());
    }
    let mut chars = input.chars();
    let col_ch = chars
        .next()
        .ok_or("no column letter")?
        .to_ascii_uppercase();
    if !col_ch.is_ascii_alphabetic() {
        return Err(format!("invalid column '{}', must be a letter A-J", col_ch));
    }
    let col = (col_ch as u8 - b'A') as usize;
    if col >= BOARD_SIZE {
        return Err(format!("column '{}' out of bounds, must be A-J", col_ch));
    }
    let row_str: String = chars.collect();
    let row: usize = row_str
        .parse()
        .map_err(|_| format!("invalid row '{}', must be a number 1-10", row_str))?;
    if row == 0 || row > BOARD_SIZE {
        return Err(format!("row {} out of bounds, must be 1-10", row));
    }
    Ok((row - 1, col))
}

/// `h`/`horizontal` or `v`/`vertical`, any case.
pub fn parse_orientation(input: &str) -> Result<Orientation, String> {
    match input.to_ascii_lowercase().as_str() {
        "h" | "horizontal" => Ok(Orientation::Horizontal),
        "v" | "vertical" => Ok(Orientation::Vertical),
        other => Err(format!("unknown orientation '{}', use h or v", other)),
    }
}

/// A ship kind by name or by numeric code.
fn parse_kind(input: &str) -> Option<ShipKind> {
    ShipKind::from_name(input).or_else(|| input.parse().ok().and_then(ShipKind::from_code))
}

/// Parse one command line.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().ok_or("empty command")?.to_ascii_lowercase();
    let args: Vec<&str> = parts.collect();
    match (verb.as_str(), args.as_slice()) {
        ("place" | "p", [kind, coord, orient]) => {
            let (row, col) = parse_coord(coord)?;
            Ok(Command::Place {
                kind: parse_kind(kind),
                row,
                col,
                orientation: parse_orientation(orient)?,
            })
        }
        ("place" | "p", _) => Err("usage: place <ship> <A1> <h|v>".to_string()),
        ("fire" | "f", [coord]) => {
            let (row, col) = parse_coord(coord)?;
            Ok(Command::Fire { row, col })
        }
        ("fire" | "f", _) => Err("usage: fire <A1>".to_string()),
        ("auto", []) => Ok(Command::Auto),
        ("board" | "b", []) => Ok(Command::Board),
        ("help" | "?", _) => Ok(Command::Help),
        ("quit" | "q" | "exit", _) => Ok(Command::Quit),
        (other, _) => Err(format!("unknown command '{}', try 'help'", other)),
    }
}

fn header(out: &mut String) {
    out.push_str("    ");
    for c in 0..BOARD_SIZE {
        let _ = write!(out, " {}", (b'A' + c as u8) as char);
    }
    out.push('\n');
}

/// The player's own fleet: kind codes for ships, `X` hit, `o` miss.
pub fn render_own_board(board: &FleetBoard) -> String {
    let mut out = String::new();
    header(&mut out);
    for r in 0..BOARD_SIZE {
        let _ = write!(out, "  {:2}", r + 1);
        for c in 0..BOARD_SIZE {
            let ch = match board.shot_mark(r, c) {
                ShotMark::Hit => 'X',
                ShotMark::Miss => 'o',
                ShotMark::None => match board.cell_code(r, c) {
                    0 => '.',
                    code => (b'0' + code) as char,
                },
            };
            let _ = write!(out, " {}", ch);
        }
        out.push('\n');
    }
    out
}

/// The opponent's board as the shooter sees it: `#` sunk, `X` hit, `o` miss.
pub fn render_target_board(board: &FleetBoard) -> String {
    let mut out = String::new();
    header(&mut out);
    for r in 0..BOARD_SIZE {
        let _ = write!(out, "  {:2}", r + 1);
        for c in 0..BOARD_SIZE {
            let ch = match board.shot_mark(r, c) {
                ShotMark::Hit if board.footprint_at(r, c).is_some_and(|fp| board.is_sunk(fp)) => '#',
                ShotMark::Hit => 'X',
                ShotMark::Miss => 'o',
                ShotMark::None => '.',
            };
            let _ = write!(out, " {}", ch);
        }
        out.push('\n');
    }
    out
}

/// One line per kind with the ships left to place.
pub fn render_quotas(board: &FleetBoard) -> String {
    let mut out = String::new();
    for quota in board.quotas().iter().rev() {
        let _ = writeln!(
            out,
            "  {:<10} size {}  left {}",
            quota.kind().name(),
            quota.size(),
            quota.remaining()
        );
    }
    out
}

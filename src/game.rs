use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    ai::{TargetMode, TargetingState},
    board::{BoardState, FleetBoard},
    catalog::ShipCatalog,
    common::{BoardError, PlacementError, ShotError, ShotResult},
    persistence::{MatchStore, PersistenceError},
    ship::{Orientation, ShipFootprint, ShipKind},
};

/// The two sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Computer,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Computer,
            Side::Computer => Side::Player,
        }
    }
}

/// Lifecycle of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// The player is still placing ships.
    Placement,
    /// Both fleets are afloat and shots alternate.
    Combat,
    /// One fleet is sunk; nothing else is accepted.
    GameOver,
}

/// Current status of a match from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Placing,
    PlayerTurn,
    ComputerTurn,
    Won,
    Lost,
}

/// Everything the caller needs to render a resolved shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotReport {
    pub shooter: Side,
    pub row: usize,
    pub col: usize,
    pub result: ShotResult,
    /// The ship this shot finished off, if any.
    pub sunk: Option<ShipFootprint>,
    /// Set when this shot won the match.
    pub winner: Option<Side>,
}

/// Serializable snapshot of a whole match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub nickname: String,
    pub player_board: BoardState,
    pub computer_board: BoardState,
    pub phase: Phase,
    pub turn: Side,
    pub winner: Option<Side>,
    pub last_outcome: Option<ShotReport>,
    pub targeting: TargetingState,
}

/// Both fleet boards plus turn bookkeeping. Pure state machine, no I/O.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    nickname: String,
    player_board: FleetBoard,
    computer_board: FleetBoard,
    phase: Phase,
    turn: Side,
    winner: Option<Side>,
    last_outcome: Option<ShotReport>,
    targeting: TargetingState,
}

impl Match {
    /// New match in the placement phase. The computer fleet is laid out at
    /// random straight away.
    pub fn new<R: Rng + ?Sized>(
        nickname: impl Into<String>,
        catalog: ShipCatalog,
        rng: &mut R,
    ) -> Result<Self, BoardError> {
        let mut computer_board = FleetBoard::new(catalog);
        computer_board.auto_populate(rng)?;
        Ok(Match {
            nickname: nickname.into(),
            player_board: FleetBoard::new(catalog),
            computer_board,
            phase: Phase::Placement,
            turn: Side::Player,
            winner: None,
            last_outcome: None,
            targeting: TargetingState::new(),
        })
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn player_board(&self) -> &FleetBoard {
        &self.player_board
    }

    pub fn computer_board(&self) -> &FleetBoard {
        &self.computer_board
    }

    /// Board owned by `side`.
    pub fn board(&self, side: Side) -> &FleetBoard {
        match side {
            Side::Player => &self.player_board,
            Side::Computer => &self.computer_board,
        }
    }

    fn board_mut(&mut self, side: Side) -> &mut FleetBoard {
        match side {
            Side::Player => &mut self.player_board,
            Side::Computer => &mut self.computer_board,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Side holding the turn. Meaningless outside combat.
    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn last_outcome(&self) -> Option<&ShotReport> {
        self.last_outcome.as_ref()
    }

    pub fn targeting(&self) -> &TargetingState {
        &self.targeting
    }

    pub fn status(&self) -> GameStatus {
        match (self.phase, self.winner, self.turn) {
            (Phase::Placement, _, _) => GameStatus::Placing,
            (Phase::GameOver, Some(Side::Player), _) => GameStatus::Won,
            (Phase::GameOver, _, _) => GameStatus::Lost,
            (Phase::Combat, _, Side::Player) => GameStatus::PlayerTurn,
            (Phase::Combat, _, Side::Computer) => GameStatus::ComputerTurn,
        }
    }

    /// Place one of the player's ships. `selection` is `None` when the
    /// caller has no ship kind chosen. Combat starts as soon as the player's
    /// fleet is complete.
    pub fn place_ship(
        &mut self,
        selection: Option<ShipKind>,
        row: usize,
        col: usize,
        orientation: Orientation,
    ) -> Result<ShipFootprint, PlacementError> {
        if self.phase != Phase::Placement {
            return Err(PlacementError::PhaseClosed);
        }
        let kind = selection.ok_or(PlacementError::NoSelection)?;
        let footprint = self.player_board.place_ship(kind, row, col, orientation)?;
        self.enter_combat_if_ready();
        Ok(footprint)
    }

    /// Randomly place whatever the player has not placed yet. Returns how
    /// many ships were added.
    pub fn auto_place_remaining<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<usize, BoardError> {
        if self.phase != Phase::Placement {
            return Ok(0);
        }
        let before = self.player_board.footprints().len();
        self.player_board.auto_populate(rng)?;
        self.enter_combat_if_ready();
        Ok(self.player_board.footprints().len() - before)
    }

    fn enter_combat_if_ready(&mut self) {
        if self.player_board.is_full() {
            self.phase = Phase::Combat;
            self.turn = Side::Player;
        }
    }

    fn ensure_turn(&self, shooter: Side) -> Result<(), ShotError> {
        match self.phase {
            Phase::Placement => Err(ShotError::NotInCombat),
            Phase::GameOver => Err(ShotError::GameOver),
            Phase::Combat if self.turn != shooter => Err(ShotError::NotYourTurn),
            Phase::Combat => Ok(()),
        }
    }

    /// The player fires at (row, col) on the computer's board.
    pub fn player_fire(&mut self, row: usize, col: usize) -> Result<ShotReport, ShotError> {
        self.resolve(Side::Player, row, col)
    }

    /// The computer picks a cell on the player's board and fires at it.
    pub fn computer_fire<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<ShotReport, ShotError> {
        self.ensure_turn(Side::Computer)?;
        let (row, col) = self
            .targeting
            .next_shot(rng)
            .ok_or(ShotError::NoTargetsLeft)?;
        let report = self.resolve(Side::Computer, row, col)?;
        let mode = if report.result == ShotResult::Hit && report.sunk.is_none() {
            TargetMode::Hunting
        } else {
            TargetMode::Random
        };
        self.targeting.set_mode(mode);
        Ok(report)
    }

    fn resolve(&mut self, shooter: Side, row: usize, col: usize) -> Result<ShotReport, ShotError> {
        self.ensure_turn(shooter)?;
        let target = self.board_mut(shooter.opponent());
        let result = target.record_shot(row, col)?;

        let target = self.board(shooter.opponent());
        let sunk = match result {
            ShotResult::Hit => target
                .footprints()
                .iter()
                .find(|fp| fp.contains(row, col) && target.is_sunk(fp))
                .copied(),
            ShotResult::Miss => None,
        };
        let winner = target.all_sunk().then_some(shooter);

        if winner.is_some() {
            self.phase = Phase::GameOver;
            self.winner = winner;
        } else if result == ShotResult::Miss {
            self.turn = shooter.opponent();
        }

        let report = ShotReport {
            shooter,
            row,
            col,
            result,
            sunk,
            winner,
        };
        self.last_outcome = Some(report);
        Ok(report)
    }
}

impl From<&Match> for MatchState {
    fn from(m: &Match) -> Self {
        MatchState {
            nickname: m.nickname.clone(),
            player_board: BoardState::from(&m.player_board),
            computer_board: BoardState::from(&m.computer_board),
            phase: m.phase,
            turn: m.turn,
            winner: m.winner,
            last_outcome: m.last_outcome,
            targeting: m.targeting.clone(),
        }
    }
}

impl TryFrom<MatchState> for Match {
    type Error = BoardError;

    fn try_from(state: MatchState) -> Result<Self, Self::Error> {
        let player_board = FleetBoard::try_from(state.player_board)?;
        let computer_board = FleetBoard::try_from(state.computer_board)?;
        if !computer_board.is_full() {
            return Err(BoardError::CorruptState("computer fleet is incomplete"));
        }
        match state.phase {
            Phase::Placement if player_board.is_full() => {
                return Err(BoardError::CorruptState("placement continues with a complete fleet"));
            }
            Phase::Combat | Phase::GameOver if !player_board.is_full() => {
                return Err(BoardError::CorruptState("combat started with an incomplete fleet"));
            }
            _ => {}
        }
        match (state.phase, state.winner) {
            (Phase::GameOver, None) => {
                return Err(BoardError::CorruptState("finished match has no winner"));
            }
            (Phase::GameOver, Some(side)) => {
                let beaten = match side {
                    Side::Player => &computer_board,
                    Side::Computer => &player_board,
                };
                if !beaten.all_sunk() {
                    return Err(BoardError::CorruptState("winner has not sunk the other fleet"));
                }
            }
            (_, Some(_)) => {
                return Err(BoardError::CorruptState("winner recorded before the match ended"));
            }
            (_, None) => {}
        }
        if state.targeting.fired() != player_board.fired() {
            return Err(BoardError::CorruptState("targeting memory disagrees with the player board"));
        }
        Ok(Match {
            nickname: state.nickname,
            player_board,
            computer_board,
            phase: state.phase,
            turn: state.turn,
            winner: state.winner,
            last_outcome: state.last_outcome,
            targeting: state.targeting,
        })
    }
}

/// A match wired to its snapshot store and random source. Every accepted
/// action is saved; the snapshot is deleted once somebody wins.
pub struct GameEngine<S: MatchStore, R: Rng = SmallRng> {
    game: Match,
    store: S,
    rng: R,
}

impl<S: MatchStore, R: Rng> GameEngine<S, R> {
    /// Start a fresh match and record it in `store`, replacing any
    /// previous snapshot.
    pub fn new_match(
        nickname: impl Into<String>,
        catalog: ShipCatalog,
        store: S,
        mut rng: R,
    ) -> Result<Self, BoardError> {
        let game = Match::new(nickname, catalog, &mut rng)?;
        info!(
            "new match for {} with {} ships per side",
            game.nickname(),
            catalog.total_ships()
        );
        let mut engine = Self { game, store, rng };
        engine.save();
        Ok(engine)
    }

    /// Continue the match saved in `store`.
    pub fn resume(store: S, rng: R) -> Result<Self, PersistenceError> {
        let game = Match::try_from(store.load()?)?;
        info!("resumed match for {} ({:?})", game.nickname(), game.phase());
        Ok(Self { game, store, rng })
    }

    /// Resume the saved match if there is a readable one, otherwise start a
    /// new one. An unreadable snapshot is logged and replaced.
    pub fn start(
        nickname: impl Into<String>,
        catalog: ShipCatalog,
        store: S,
        rng: R,
    ) -> Result<Self, BoardError> {
        match store.load().and_then(|s| Ok(Match::try_from(s)?)) {
            Ok(game) => {
                info!("resumed match for {} ({:?})", game.nickname(), game.phase());
                return Ok(Self { game, store, rng });
            }
            Err(PersistenceError::NotFound) => debug!("no saved match"),
            Err(e) => warn!("saved match unavailable, starting over: {}", e),
        }
        Self::new_match(nickname, catalog, store, rng)
    }

    pub fn game(&self) -> &Match {
        &self.game
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn status(&self) -> GameStatus {
        self.game.status()
    }

    /// See [`Match::place_ship`].
    pub fn place_ship(
        &mut self,
        selection: Option<ShipKind>,
        row: usize,
        col: usize,
        orientation: Orientation,
    ) -> Result<ShipFootprint, PlacementError> {
        let placed = self.game.place_ship(selection, row, col, orientation);
        match &placed {
            Ok(fp) => {
                debug!("{} placed at {:?} {:?}", fp.kind(), fp.origin(), fp.orientation());
                self.after_placement();
            }
            Err(e) => debug!("placement refused: {}", e),
        }
        placed
    }

    /// See [`Match::auto_place_remaining`].
    pub fn auto_place_remaining(&mut self) -> Result<usize, BoardError> {
        let placed = self.game.auto_place_remaining(&mut self.rng)?;
        if placed > 0 {
            debug!("randomly placed {} ships", placed);
            self.after_placement();
        }
        Ok(placed)
    }

    fn after_placement(&mut self) {
        if self.game.phase() == Phase::Combat {
            info!("fleet complete, combat begins");
        }
        self.save();
    }

    /// See [`Match::player_fire`].
    pub fn player_fire(&mut self, row: usize, col: usize) -> Result<ShotReport, ShotError> {
        let report = self.game.player_fire(row, col)?;
        self.after_shot(&report);
        Ok(report)
    }

    /// See [`Match::computer_fire`].
    pub fn computer_fire(&mut self) -> Result<ShotReport, ShotError> {
        let report = self.game.computer_fire(&mut self.rng)?;
        self.after_shot(&report);
        Ok(report)
    }

    /// Let the computer fire until the turn passes back or the match ends.
    pub fn run_computer_turn(&mut self) -> Result<Vec<ShotReport>, ShotError> {
        let mut reports = Vec::new();
        while self.status() == GameStatus::ComputerTurn {
            reports.push(self.computer_fire()?);
        }
        Ok(reports)
    }

    fn after_shot(&mut self, report: &ShotReport) {
        debug!(
            "{:?} fired at ({}, {}): {:?}",
            report.shooter, report.row, report.col, report.result
        );
        if let Some(fp) = report.sunk {
            info!("{:?} sank a {}", report.shooter, fp.kind());
        }
        match report.winner {
            Some(winner) => {
                info!("{:?} wins the match", winner);
                if let Err(e) = self.store.delete() {
                    warn!("could not delete finished match: {}", e);
                }
            }
            None => self.save(),
        }
    }

    fn save(&mut self) {
        if let Err(e) = self.store.save(&MatchState::from(&self.game)) {
            warn!("could not save match: {}", e);
        }
    }
}

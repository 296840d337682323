//! Room state machine.
//!
//! Owns the single room and applies every request to it. Each operation checks
//! all of its guards before touching the room, so a rejected request leaves the
//! room exactly as it was.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use super::card::{BingoCard, CardGenerator, Position};
use super::config::RoomConfig;
use super::draw::{BingoNumber, DrawEngine};
use super::error::RoomError;
use super::pattern;
use super::random::{self, BoxedRng, IdGenerator, UuidIds};
use super::room::{PhaseEvent, Player, PublicRoomState, Room, RoomPhase};
use super::validate::WinValidator;

/// Acknowledgement for the new host. The secret goes to the host only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostCreated {
    pub room: PublicRoomState,
    pub host_secret: String,
}

/// Acknowledgement for a new player. Secret and card go to the player only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerJoined {
    pub room: PublicRoomState,
    pub player_id: String,
    pub player_secret: String,
    #[serde(skip)]
    pub card: BingoCard,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberDrawn {
    pub room: PublicRoomState,
    pub number: BingoNumber,
}

/// Outcome of a bingo claim. A rejected claim is `valid: false`, not an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BingoClaim {
    pub room: PublicRoomState,
    pub valid: bool,
    pub player_id: String,
    pub player_name: String,
    /// Letter the claim was checked against
    pub letter: Option<char>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellMarked {
    pub room: PublicRoomState,
    pub card: BingoCard,
    pub marked: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerReclaimed {
    pub room: PublicRoomState,
    pub player_id: String,
    #[serde(skip)]
    pub card: BingoCard,
}

/// Single-room game engine.
pub struct RoomStateMachine {
    config: RoomConfig,
    initial_letter: Option<char>,
    room: Room,
    cards: CardGenerator,
    draws: DrawEngine,
    validator: WinValidator,
    rng: BoxedRng,
    ids: Box<dyn IdGenerator>,
}

impl RoomStateMachine {
    /// Create a machine with OS randomness and UUID identifiers.
    pub fn new(config: RoomConfig) -> Result<Self, RoomError> {
        Self::with_sources(config, random::os_rng(), Box::new(UuidIds))
    }

    /// Create a machine with explicit randomness and identifier sources.
    pub fn with_sources(
        config: RoomConfig,
        rng: BoxedRng,
        ids: Box<dyn IdGenerator>,
    ) -> Result<Self, RoomError> {
        let initial_letter = config.initial_letter()?;
        let room = Room::new(config.room_id.clone(), initial_letter);
        Ok(Self {
            config,
            initial_letter,
            room,
            cards: CardGenerator::new(),
            draws: DrawEngine::new(),
            validator: WinValidator::new(),
            rng,
            ids,
        })
    }

    /// Read-only access to the full room.
    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn room_state(&self) -> PublicRoomState {
        self.room.to_public()
    }

    pub fn players(&self) -> &[Player] {
        self.room.players()
    }

    /// The card of the player bound to `session`.
    pub fn card_for_session(&self, session: &str) -> Option<&BingoCard> {
        self.room.player_by_session(session).map(|p| &p.card)
    }

    /// Open the room under a new host.
    ///
    /// Replaces the whole room, players included, unless a game is running
    /// under a connected host.
    pub fn create_host(&mut self, name: &str, session: &str) -> Result<HostCreated, RoomError> {
        let name = validate_name(name)?;
        if self.room.has_host() && self.room.phase == RoomPhase::Playing {
            return Err(RoomError::RoomInUse);
        }

        let host_secret = self.ids.next_id();
        let created_at = self.room.created_at;
        self.room = Room::hosted(
            self.config.room_id.clone(),
            self.initial_letter,
            name,
            session.to_string(),
            host_secret.clone(),
        );
        self.room.created_at = created_at;

        info!(room = %self.room.id, session, "Host created room");
        Ok(HostCreated {
            room: self.room.to_public(),
            host_secret,
        })
    }

    pub fn join_as_player(&mut self, name: &str, session: &str) -> Result<PlayerJoined, RoomError> {
        let name = validate_name(name)?;
        if !self.room.has_host() {
            return Err(RoomError::NoHost);
        }
        self.room.phase.require(RoomPhase::Waiting, "join")?;
        if self.room.is_host(session) {
            return Err(RoomError::SessionInUse);
        }
        if self.room.is_taken(session, &name) {
            return Err(RoomError::AlreadyJoined);
        }

        let card = self.cards.generate(self.rng.as_mut(), self.ids.as_mut());
        let player_id = self.ids.next_id();
        let player_secret = self.ids.next_id();
        self.room.add_player(Player::new(
            player_id.clone(),
            name,
            session.to_string(),
            player_secret.clone(),
            card.clone(),
        ));
        self.room.touch();

        info!(player = %player_id, session, players = self.room.player_count(), "Player joined");
        Ok(PlayerJoined {
            room: self.room.to_public(),
            player_id,
            player_secret,
            card,
        })
    }

    pub fn start_game(&mut self, session: &str) -> Result<PublicRoomState, RoomError> {
        self.ensure_host(session)?;
        let next = self.room.phase.apply(PhaseEvent::Start)?;

        self.room.phase = next;
        self.room.drawn_numbers.clear();
        self.room.winner_id = None;
        self.room.touch();

        info!(players = self.room.player_count(), "Game started");
        Ok(self.room.to_public())
    }

    pub fn draw_number(&mut self, session: &str) -> Result<NumberDrawn, RoomError> {
        self.ensure_host(session)?;
        self.room.phase.require(RoomPhase::Playing, "draw a number")?;

        let number = self.draws.draw(&self.room.drawn_numbers, self.rng.as_mut())?;
        self.room.drawn_numbers.push(number.clone());
        self.room.touch();

        debug!(
            number = %number.label(),
            remaining = self.draws.remaining(&self.room.drawn_numbers),
            "Number drawn"
        );
        Ok(NumberDrawn {
            room: self.room.to_public(),
            number,
        })
    }

    /// Back to waiting with the same players and fresh cards.
    pub fn restart_game(&mut self, session: &str) -> Result<PublicRoomState, RoomError> {
        self.ensure_host(session)?;
        let next = self.room.phase.apply(PhaseEvent::Restart)?;

        for player in self.room.players_mut() {
            player.card = self.cards.generate(self.rng.as_mut(), self.ids.as_mut());
        }
        self.room.phase = next;
        self.room.drawn_numbers.clear();
        self.room.winner_id = None;
        self.room.touch();

        info!(players = self.room.player_count(), "Game restarted");
        Ok(self.room.to_public())
    }

    /// Wipe everything, host and players included.
    pub fn end_game(&mut self, session: &str) -> Result<PublicRoomState, RoomError> {
        self.ensure_host(session)?;
        self.room = Room::new(self.config.room_id.clone(), self.initial_letter);

        info!("Game ended, room reset");
        Ok(self.room.to_public())
    }

    /// Choose the pattern for the next game.
    pub fn select_letter(&mut self, session: &str, letter: &str) -> Result<PublicRoomState, RoomError> {
        self.ensure_host(session)?;
        self.room.phase.require(RoomPhase::Waiting, "select a letter")?;
        let letter =
            pattern::parse_letter(letter).ok_or_else(|| RoomError::InvalidLetter(letter.to_string()))?;

        self.room.selected_letter = Some(letter);
        self.room.touch();

        info!(%letter, "Pattern selected");
        Ok(self.room.to_public())
    }

    /// Check the caller's card against the pattern in play.
    pub fn claim_bingo(
        &mut self,
        session: &str,
        letter: Option<&str>,
    ) -> Result<BingoClaim, RoomError> {
        let player = self
            .room
            .player_by_session(session)
            .ok_or(RoomError::PlayerNotFound)?;
        self.room.phase.require(RoomPhase::Playing, "claim bingo")?;
        let letter = self.effective_letter(letter)?;

        let letter_text = letter.map(String::from);
        let valid = self
            .validator
            .validate(&player.card, &self.room.drawn_numbers, letter_text.as_deref());
        let player_id = player.id.clone();
        let player_name = player.name.clone();

        if valid {
            self.room.phase = self.room.phase.apply(PhaseEvent::Win)?;
            self.room.winner_id = Some(player_id.clone());
            self.room.touch();
            info!(player = %player_id, ?letter, "Bingo confirmed");
        } else {
            debug!(player = %player_id, ?letter, "Bingo claim rejected");
        }

        Ok(BingoClaim {
            room: self.room.to_public(),
            valid,
            player_id,
            player_name,
            letter,
        })
    }

    /// Toggle a cell on the caller's card. The free centre stays marked.
    pub fn mark_cell(&mut self, session: &str, row: i64, col: i64) -> Result<CellMarked, RoomError> {
        let player = self
            .room
            .player_by_session_mut(session)
            .ok_or(RoomError::PlayerNotFound)?;
        let pos = to_position(row, col)?;

        let marked = player.card.toggle(pos);
        let card = player.card.clone();
        self.room.touch();

        Ok(CellMarked {
            room: self.room.to_public(),
            card,
            marked,
        })
    }

    /// Rebind the host role to a new session.
    pub fn reclaim_host(&mut self, host_secret: &str, session: &str) -> Result<PublicRoomState, RoomError> {
        if !self.room.host_secret_matches(host_secret) {
            return Err(RoomError::InvalidHostToken);
        }

        self.room.host_id = Some(session.to_string());
        self.room.touch();

        info!(session, "Host reclaimed");
        Ok(self.room.to_public())
    }

    /// Rebind a player to a new session, keeping identity and card.
    pub fn reclaim_player(
        &mut self,
        player_secret: &str,
        session: &str,
    ) -> Result<PlayerReclaimed, RoomError> {
        let holder = self.room.player_by_session(session).map(|p| p.id.clone());
        let player = self
            .room
            .player_by_secret_mut(player_secret)
            .ok_or(RoomError::InvalidPlayerToken)?;
        if holder.is_some_and(|id| id != player.id) {
            return Err(RoomError::SessionInUse);
        }

        player.socket_id = session.to_string();
        let player_id = player.id.clone();
        let card = player.card.clone();
        self.room.touch();

        info!(player = %player_id, session, "Player reclaimed");
        Ok(PlayerReclaimed {
            room: self.room.to_public(),
            player_id,
            card,
        })
    }

    /// Handle a session going away.
    ///
    /// Players are kept so they can reclaim later; a departing host only loses
    /// the host binding.
    pub fn leave(&mut self, session: &str) -> PublicRoomState {
        if let Some(player_id) = self.room.player_by_session(session).map(|p| p.id.clone()) {
            debug!(player = %player_id, session, "Player disconnected");
            self.room.touch();
        }
        if self.room.is_host(session) {
            self.room.host_id = None;
            self.room.touch();
            info!(session, "Host disconnected");
        }
        self.room.to_public()
    }

    fn ensure_host(&self, session: &str) -> Result<(), RoomError> {
        if self.room.is_host(session) {
            Ok(())
        } else {
            Err(RoomError::NotHost)
        }
    }

    /// Resolve the letter a claim is checked against.
    fn effective_letter(&self, claimed: Option<&str>) -> Result<Option<char>, RoomError> {
        let claimed = match claimed.filter(|l| !l.trim().is_empty()) {
            None => None,
            Some(l) => Some(
                pattern::parse_letter(l).ok_or_else(|| RoomError::InvalidLetter(l.to_string()))?,
            ),
        };
        match (self.room.selected_letter, claimed) {
            (Some(selected), Some(claimed)) if selected != claimed => {
                Err(RoomError::LetterMismatch {
                    claimed: claimed.to_string(),
                    selected: selected.to_string(),
                })
            }
            (Some(selected), _) => Ok(Some(selected)),
            (None, claimed) => Ok(claimed),
        }
    }
}

impl Default for RoomStateMachine {
    fn default() -> Self {
        let config = RoomConfig::default();
        let room = Room::new(config.room_id.clone(), None);
        Self {
            config,
            initial_letter: None,
            room,
            cards: CardGenerator::new(),
            draws: DrawEngine::new(),
            validator: WinValidator::new(),
            rng: random::os_rng(),
            ids: Box::new(UuidIds),
        }
    }
}

impl fmt::Debug for RoomStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomStateMachine")
            .field("config", &self.config)
            .field("room", &self.room)
            .finish_non_exhaustive()
    }
}

fn validate_name(name: &str) -> Result<String, RoomError> {
    let name = name.trim();
    if name.is_empty() {
        Err(RoomError::BlankName)
    } else {
        Ok(name.to_string())
    }
}

fn to_position(row: i64, col: i64) -> Result<Position, RoomError> {
    let invalid = || RoomError::InvalidCell { row, col };
    let pos = Position::new(
        usize::try_from(row).map_err(|_| invalid())?,
        usize::try_from(col).map_err(|_| invalid())?,
    );
    if pos.is_valid() {
        Ok(pos)
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::card::CENTER;
    use crate::state::draw::MAX_NUMBER;
    use crate::state::error::ErrorKind;
    use crate::state::random::{seeded_rng, SequentialIds};
    use pretty_assertions::assert_eq;

    fn make_machine() -> RoomStateMachine {
        make_machine_with(RoomConfig::default())
    }

    fn make_machine_with(config: RoomConfig) -> RoomStateMachine {
        RoomStateMachine::with_sources(config, seeded_rng(7), Box::new(SequentialIds::default()))
            .unwrap()
    }

    /// Host "Ana" on `s-ana`, player "Luis" on `s-luis`. Returns the host secret.
    fn setup(machine: &mut RoomStateMachine) -> String {
        let host = machine.create_host("Ana", "s-ana").unwrap();
        machine.join_as_player("Luis", "s-luis").unwrap();
        host.host_secret
    }

    /// Draw until every number `letter` needs on the card at `session` is out,
    /// marking each needed cell.
    fn complete_letter(machine: &mut RoomStateMachine, session: &str, letter: &str) {
        let card = machine.card_for_session(session).unwrap().clone();
        let needed: Vec<Position> = pattern::get_pattern(letter)
            .unwrap()
            .required_cells()
            .filter(|p| !p.is_center())
            .collect();
        for pos in &needed {
            machine
                .mark_cell(session, pos.row as i64, pos.col as i64)
                .unwrap();
        }
        while !needed.iter().all(|p| {
            let value = card.number_at(*p).unwrap();
            machine.room().drawn_values().any(|v| v == value)
        }) {
            machine.draw_number("s-ana").unwrap();
        }
    }

    #[test]
    fn test_new_machine() {
        let machine = make_machine();
        let state = machine.room_state();
        assert_eq!(state.id, "BINGO-ROOM");
        assert_eq!(state.phase, RoomPhase::Waiting);
        assert_eq!(state.host_name, None);
        assert!(state.players.is_empty());
    }

    #[test]
    fn test_rejects_bad_default_letter() {
        let result = RoomStateMachine::new(RoomConfig::default().with_default_letter("??"));
        assert!(matches!(result, Err(RoomError::InvalidLetter(_))));
    }

    #[test]
    fn test_create_host() {
        let mut machine = make_machine();
        let created = machine.create_host("Ana", "s-ana").unwrap();

        assert_eq!(created.room.phase, RoomPhase::Waiting);
        assert_eq!(created.room.host_name.as_deref(), Some("Ana"));
        assert_eq!(created.host_secret, "id-1");
        assert!(machine.room().is_host("s-ana"));
    }

    #[test]
    fn test_create_host_blank_name() {
        let mut machine = make_machine();
        let err = machine.create_host("   ", "s-ana").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(!machine.room().has_host());
    }

    #[test]
    fn test_create_host_while_playing() {
        let mut machine = make_machine();
        setup(&mut machine);
        machine.start_game("s-ana").unwrap();

        let err = machine.create_host("Eve", "s-eve").unwrap_err();
        assert_eq!(err, RoomError::RoomInUse);
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(machine.room().is_host("s-ana"));
        assert_eq!(machine.players().len(), 1);
    }

    #[test]
    fn test_create_host_replaces_waiting_room() {
        let mut machine = make_machine();
        setup(&mut machine);

        machine.create_host("Eve", "s-eve").unwrap();
        assert!(machine.room().is_host("s-eve"));
        assert!(machine.players().is_empty());
    }

    #[test]
    fn test_join_requires_host() {
        let mut machine = make_machine();
        let err = machine.join_as_player("Luis", "s-luis").unwrap_err();
        assert_eq!(err, RoomError::NoHost);
    }

    #[test]
    fn test_join() {
        let mut machine = make_machine();
        machine.create_host("Ana", "s-ana").unwrap();
        let joined = machine.join_as_player("Luis", "s-luis").unwrap();

        assert_eq!(joined.room.players.len(), 1);
        assert_eq!(joined.room.players[0].name, "Luis");
        assert_eq!(joined.room.players[0].id, joined.player_id);
        assert_ne!(joined.player_id, joined.player_secret);
        assert_eq!(machine.card_for_session("s-luis"), Some(&joined.card));
    }

    #[test]
    fn test_join_duplicates() {
        let mut machine = make_machine();
        setup(&mut machine);

        let same_name = machine.join_as_player("Luis", "s-other").unwrap_err();
        assert_eq!(same_name, RoomError::AlreadyJoined);
        assert_eq!(same_name.kind(), ErrorKind::Conflict);

        let same_session = machine.join_as_player("Marta", "s-luis").unwrap_err();
        assert_eq!(same_session.kind(), ErrorKind::Conflict);
        assert_eq!(machine.players().len(), 1);
    }

    #[test]
    fn test_host_session_cannot_join() {
        let mut machine = make_machine();
        machine.create_host("Ana", "s-ana").unwrap();

        let err = machine.join_as_player("Ana2", "s-ana").unwrap_err();
        assert_eq!(err, RoomError::SessionInUse);
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(machine.players().is_empty());

        machine.leave("s-ana");
        assert_eq!(machine.room().host_id, None);
    }

    #[test]
    fn test_join_after_start() {
        let mut machine = make_machine();
        setup(&mut machine);
        machine.start_game("s-ana").unwrap();

        let err = machine.join_as_player("Marta", "s-marta").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PhaseViolation);
    }

    #[test]
    fn test_start_game_guards() {
        let mut machine = make_machine();
        setup(&mut machine);

        assert_eq!(machine.start_game("s-luis").unwrap_err(), RoomError::NotHost);
        let state = machine.start_game("s-ana").unwrap();
        assert_eq!(state.phase, RoomPhase::Playing);
        assert!(state.drawn_numbers.is_empty());

        let err = machine.start_game("s-ana").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PhaseViolation);
    }

    #[test]
    fn test_draw_requires_playing() {
        let mut machine = make_machine();
        setup(&mut machine);
        let err = machine.draw_number("s-ana").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PhaseViolation);
    }

    #[test]
    fn test_draw_by_non_host() {
        let mut machine = make_machine();
        setup(&mut machine);
        machine.start_game("s-ana").unwrap();
        machine.draw_number("s-ana").unwrap();

        let err = machine.draw_number("s-luis").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert_eq!(machine.room().drawn_numbers.len(), 1);
    }

    #[test]
    fn test_draw_until_exhausted() {
        let mut machine = make_machine();
        setup(&mut machine);
        machine.start_game("s-ana").unwrap();

        for _ in 0..MAX_NUMBER {
            machine.draw_number("s-ana").unwrap();
        }
        let mut values: Vec<u8> = machine.room().drawn_values().collect();
        values.sort_unstable();
        assert_eq!(values, (1..=MAX_NUMBER).collect::<Vec<_>>());

        let err = machine.draw_number("s-ana").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Exhausted);
        assert_eq!(machine.room().drawn_numbers.len(), MAX_NUMBER as usize);
        assert_eq!(machine.room().phase, RoomPhase::Playing);
    }

    #[test]
    fn test_mark_cell() {
        let mut machine = make_machine();
        setup(&mut machine);

        let marked = machine.mark_cell("s-luis", 0, 4).unwrap();
        assert!(marked.marked);
        assert!(marked.card.is_marked(Position::new(0, 4)));

        let unmarked = machine.mark_cell("s-luis", 0, 4).unwrap();
        assert!(!unmarked.marked);
    }

    #[test]
    fn test_mark_center_is_pinned() {
        let mut machine = make_machine();
        setup(&mut machine);

        for _ in 0..3 {
            let result = machine.mark_cell("s-luis", 2, 2).unwrap();
            assert!(result.marked);
        }
        assert!(machine.card_for_session("s-luis").unwrap().is_marked(CENTER));
    }

    #[test]
    fn test_mark_cell_errors() {
        let mut machine = make_machine();
        setup(&mut machine);

        assert_eq!(
            machine.mark_cell("s-luis", 5, 0).unwrap_err(),
            RoomError::InvalidCell { row: 5, col: 0 }
        );
        assert_eq!(
            machine.mark_cell("s-luis", 0, -1).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            machine.mark_cell("s-nobody", 0, 0).unwrap_err(),
            RoomError::PlayerNotFound
        );
    }

    #[test]
    fn test_claim_requires_player_and_phase() {
        let mut machine = make_machine();
        setup(&mut machine);

        assert_eq!(
            machine.claim_bingo("s-ana", Some("X")).unwrap_err(),
            RoomError::PlayerNotFound
        );
        assert_eq!(
            machine.claim_bingo("s-luis", Some("X")).unwrap_err().kind(),
            ErrorKind::PhaseViolation
        );
    }

    #[test]
    fn test_failed_claim_changes_nothing() {
        let mut machine = make_machine();
        setup(&mut machine);
        machine.start_game("s-ana").unwrap();
        machine.draw_number("s-ana").unwrap();

        let before = machine.room_state();
        let claim = machine.claim_bingo("s-luis", Some("X")).unwrap();
        assert!(!claim.valid);
        assert_eq!(claim.room, before);
        assert_eq!(machine.room().winner_id, None);
    }

    #[test]
    fn test_claim_without_letter_fails_closed() {
        let mut machine = make_machine();
        setup(&mut machine);
        machine.start_game("s-ana").unwrap();
        complete_letter(&mut machine, "s-luis", "X");

        let claim = machine.claim_bingo("s-luis", None).unwrap();
        assert!(!claim.valid);
        assert_eq!(claim.letter, None);
        assert_eq!(machine.room().phase, RoomPhase::Playing);
    }

    #[test]
    fn test_claim_invalid_letter() {
        let mut machine = make_machine();
        setup(&mut machine);
        machine.start_game("s-ana").unwrap();

        let err = machine.claim_bingo("s-luis", Some("9")).unwrap_err();
        assert_eq!(err, RoomError::InvalidLetter("9".to_string()));
    }

    #[test]
    fn test_selected_letter_is_authoritative() {
        let mut machine = make_machine();
        setup(&mut machine);
        machine.select_letter("s-ana", "x").unwrap();
        assert_eq!(machine.room_state().selected_letter.as_deref(), Some("X"));
        machine.start_game("s-ana").unwrap();

        let err = machine.claim_bingo("s-luis", Some("O")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        complete_letter(&mut machine, "s-luis", "X");
        let claim = machine.claim_bingo("s-luis", None).unwrap();
        assert!(claim.valid);
        assert_eq!(claim.letter, Some('X'));
    }

    #[test]
    fn test_select_letter_guards() {
        let mut machine = make_machine();
        setup(&mut machine);

        assert_eq!(machine.select_letter("s-luis", "X").unwrap_err(), RoomError::NotHost);
        assert_eq!(
            machine.select_letter("s-ana", "XX").unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
        machine.start_game("s-ana").unwrap();
        assert_eq!(
            machine.select_letter("s-ana", "X").unwrap_err().kind(),
            ErrorKind::PhaseViolation
        );
    }

    #[test]
    fn test_default_letter_from_config() {
        let mut machine = make_machine_with(RoomConfig::default().with_default_letter("t"));
        assert_eq!(machine.room_state().selected_letter.as_deref(), Some("T"));

        machine.create_host("Ana", "s-ana").unwrap();
        assert_eq!(machine.room_state().selected_letter.as_deref(), Some("T"));
    }

    #[test]
    fn test_full_game() {
        let mut machine = make_machine();
        let created = machine.create_host("Ana", "s-ana").unwrap();
        assert_eq!(created.room.phase, RoomPhase::Waiting);
        assert_eq!(created.room.host_name.as_deref(), Some("Ana"));

        let joined = machine.join_as_player("Luis", "s-luis").unwrap();
        assert_eq!(joined.room.players.len(), 1);
        assert_eq!(joined.room.players[0].name, "Luis");

        let started = machine.start_game("s-ana").unwrap();
        assert_eq!(started.phase, RoomPhase::Playing);
        assert!(started.drawn_numbers.is_empty());

        complete_letter(&mut machine, "s-luis", "X");
        let claim = machine.claim_bingo("s-luis", Some("X")).unwrap();

        assert!(claim.valid);
        assert_eq!(claim.player_id, joined.player_id);
        assert_eq!(claim.player_name, "Luis");
        assert_eq!(claim.room.phase, RoomPhase::Finished);
        assert_eq!(claim.room.winner_id.as_deref(), Some(joined.player_id.as_str()));

        // No more draws once someone has won
        let err = machine.draw_number("s-ana").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PhaseViolation);
    }

    #[test]
    fn test_restart_game() {
        let mut machine = make_machine();
        setup(&mut machine);
        let old_card = machine.card_for_session("s-luis").unwrap().clone();
        let player_id = machine.players()[0].id.clone();

        assert_eq!(
            machine.restart_game("s-ana").unwrap_err().kind(),
            ErrorKind::PhaseViolation
        );

        machine.start_game("s-ana").unwrap();
        complete_letter(&mut machine, "s-luis", "X");
        machine.claim_bingo("s-luis", Some("X")).unwrap();

        assert_eq!(machine.restart_game("s-luis").unwrap_err(), RoomError::NotHost);
        let state = machine.restart_game("s-ana").unwrap();
        assert_eq!(state.phase, RoomPhase::Waiting);
        assert!(state.drawn_numbers.is_empty());
        assert_eq!(state.winner_id, None);
        assert_eq!(state.players.len(), 1);
        assert_eq!(machine.players()[0].id, player_id);

        let new_card = machine.card_for_session("s-luis").unwrap();
        assert_ne!(new_card.id, old_card.id);
        assert!(new_card.is_marked(CENTER));
        assert!(!new_card.is_marked(Position::new(0, 0)));
    }

    #[test]
    fn test_end_game() {
        let mut machine = make_machine();
        setup(&mut machine);
        machine.start_game("s-ana").unwrap();

        assert_eq!(machine.end_game("s-luis").unwrap_err(), RoomError::NotHost);
        let state = machine.end_game("s-ana").unwrap();
        assert_eq!(state.phase, RoomPhase::Waiting);
        assert_eq!(state.host_name, None);
        assert!(state.players.is_empty());
        assert!(!machine.room().has_host());
    }

    #[test]
    fn test_host_disconnect_and_reclaim() {
        let mut machine = make_machine();
        let secret = setup(&mut machine);
        machine.start_game("s-ana").unwrap();
        machine.draw_number("s-ana").unwrap();
        let before = machine.room_state();

        let after_leave = machine.leave("s-ana");
        assert_eq!(machine.room().host_id, None);
        assert_eq!(after_leave, before);

        let err = machine.reclaim_host("wrong", "s-ana-2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidToken);
        assert_eq!(machine.room().host_id, None);

        machine.reclaim_host(&secret, "s-ana-2").unwrap();
        assert_eq!(machine.room().host_id.as_deref(), Some("s-ana-2"));
        assert_eq!(machine.room_state(), before);
        machine.draw_number("s-ana-2").unwrap();
    }

    #[test]
    fn test_new_host_allowed_after_host_left_mid_game() {
        let mut machine = make_machine();
        setup(&mut machine);
        machine.start_game("s-ana").unwrap();
        machine.leave("s-ana");

        machine.create_host("Eve", "s-eve").unwrap();
        assert_eq!(machine.room().phase, RoomPhase::Waiting);
        assert!(machine.players().is_empty());
    }

    #[test]
    fn test_player_disconnect_and_reclaim() {
        let mut machine = make_machine();
        machine.create_host("Ana", "s-ana").unwrap();
        let joined = machine.join_as_player("Luis", "s-luis").unwrap();
        machine.mark_cell("s-luis", 1, 1).unwrap();

        machine.leave("s-luis");
        assert_eq!(machine.players().len(), 1);

        assert_eq!(
            machine.reclaim_player("wrong", "s-luis-2").unwrap_err(),
            RoomError::InvalidPlayerToken
        );

        let reclaimed = machine
            .reclaim_player(&joined.player_secret, "s-luis-2")
            .unwrap();
        assert_eq!(reclaimed.player_id, joined.player_id);
        assert_eq!(reclaimed.card.id, joined.card.id);
        assert!(reclaimed.card.is_marked(Position::new(1, 1)));
        assert!(machine.card_for_session("s-luis-2").is_some());
    }

    #[test]
    fn test_reclaim_player_onto_taken_session() {
        let mut machine = make_machine();
        setup(&mut machine);
        let marta = machine.join_as_player("Marta", "s-marta").unwrap();

        let err = machine
            .reclaim_player(&marta.player_secret, "s-luis")
            .unwrap_err();
        assert_eq!(err, RoomError::SessionInUse);
        let sessions: Vec<&str> = machine.players().iter().map(|p| p.socket_id.as_str()).collect();
        assert_eq!(sessions, vec!["s-luis", "s-marta"]);

        // Rebinding onto the player's own session is fine
        machine.reclaim_player(&marta.player_secret, "s-marta").unwrap();
    }

    #[test]
    fn test_leave_unknown_session() {
        let mut machine = make_machine();
        setup(&mut machine);
        let before = machine.room_state();
        assert_eq!(machine.leave("s-ghost"), before);
        assert!(machine.room().is_host("s-ana"));
    }
}

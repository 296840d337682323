//! Request/response surface.
//!
//! Requests and server messages are JSON objects of the form
//! `{"event": "...", "data": ...}`. [`handle`] applies one request to the state
//! machine and returns what the transport must deliver, in order. Secrets and
//! cards only ever go out as unicast deliveries.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::card::BingoCard;
use super::draw::BingoNumber;
use super::error::{ErrorKind, RoomError};
use super::machine::{HostCreated, PlayerJoined, PlayerReclaimed, RoomStateMachine};
use super::room::PublicRoomState;

/// Incoming requests.
///
/// Events without a payload ignore whatever `data` carries, and `claimBingo`
/// accepts a missing or `null` `data` as "no letter".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawRequest")]
pub enum ClientRequest {
    CreateHost { name: String },
    JoinAsPlayer { name: String },
    StartGame,
    DrawNumber,
    RestartGame,
    EndGame,
    ClaimBingo { selected_letter: Option<String> },
    MarkCell { row: i64, col: i64 },
    ReclaimHost { host_secret: String },
    ReclaimPlayer { player_secret: String },
    SelectLetter { letter: String },
    Leave,
}

/// Wire envelope before the payload is checked against the event.
#[derive(Deserialize)]
struct RawRequest {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Deserialize)]
struct NamePayload {
    name: String,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClaimPayload {
    #[serde(default)]
    selected_letter: Option<String>,
}

#[derive(Deserialize)]
struct CellPayload {
    row: i64,
    col: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HostSecretPayload {
    host_secret: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerSecretPayload {
    player_secret: String,
}

#[derive(Deserialize)]
struct LetterPayload {
    letter: String,
}

impl TryFrom<RawRequest> for ClientRequest {
    type Error = serde_json::Error;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        let RawRequest { event, data } = raw;
        let request = match event.as_str() {
            "createHost" => {
                let NamePayload { name } = serde_json::from_value(data)?;
                Self::CreateHost { name }
            }
            "joinAsPlayer" => {
                let NamePayload { name } = serde_json::from_value(data)?;
                Self::JoinAsPlayer { name }
            }
            "startGame" => Self::StartGame,
            "drawNumber" => Self::DrawNumber,
            "restartGame" => Self::RestartGame,
            "endGame" => Self::EndGame,
            "claimBingo" => {
                let payload = if data.is_null() {
                    ClaimPayload::default()
                } else {
                    serde_json::from_value(data)?
                };
                Self::ClaimBingo {
                    selected_letter: payload.selected_letter,
                }
            }
            "markCell" => {
                let CellPayload { row, col } = serde_json::from_value(data)?;
                Self::MarkCell { row, col }
            }
            "reclaimHost" => {
                let HostSecretPayload { host_secret } = serde_json::from_value(data)?;
                Self::ReclaimHost { host_secret }
            }
            "reclaimPlayer" => {
                let PlayerSecretPayload { player_secret } = serde_json::from_value(data)?;
                Self::ReclaimPlayer { player_secret }
            }
            "selectLetter" => {
                let LetterPayload { letter } = serde_json::from_value(data)?;
                Self::SelectLetter { letter }
            }
            "leave" => Self::Leave,
            other => {
                return Err(serde::de::Error::custom(format!("unknown event `{}`", other)));
            }
        };
        Ok(request)
    }
}

/// Broadcast notice of a claim attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimNotice {
    pub player_socket_id: String,
    pub player_id: String,
    pub player_name: String,
    pub valid: bool,
}

/// Broadcast result of a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResult {
    pub valid: bool,
    pub winner_id: Option<String>,
    pub player_id: String,
    pub player_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorMessage {
    pub message: String,
    pub kind: &'static str,
}

impl From<&RoomError> for ErrorMessage {
    fn from(err: &RoomError) -> Self {
        Self {
            message: err.to_string(),
            kind: err.kind().as_str(),
        }
    }
}

/// Outgoing messages.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    RoomState(PublicRoomState),
    HostCreated(HostCreated),
    PlayerJoined(PlayerJoined),
    MyCard(BingoCard),
    GameStarted(PublicRoomState),
    GameRestarted(PublicRoomState),
    GameEnded(PublicRoomState),
    NumberDrawn(BingoNumber),
    BingoClaimed(ClaimNotice),
    BingoResult(ClaimResult),
    HostReclaimed(PublicRoomState),
    PlayerReclaimed(PlayerReclaimed),
    Error(ErrorMessage),
}

impl ServerMessage {
    pub fn event(&self) -> &'static str {
        match self {
            Self::RoomState(_) => "roomState",
            Self::HostCreated(_) => "hostCreated",
            Self::PlayerJoined(_) => "playerJoined",
            Self::MyCard(_) => "myCard",
            Self::GameStarted(_) => "gameStarted",
            Self::GameRestarted(_) => "gameRestarted",
            Self::GameEnded(_) => "gameEnded",
            Self::NumberDrawn(_) => "numberDrawn",
            Self::BingoClaimed(_) => "bingoClaimed",
            Self::BingoResult(_) => "bingoResult",
            Self::HostReclaimed(_) => "hostReclaimed",
            Self::PlayerReclaimed(_) => "playerReclaimed",
            Self::Error(_) => "error",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}

/// Who receives a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// One session
    Session(String),
    /// Every connected session
    Everyone,
}

/// A message and its audience.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub target: Target,
    pub message: ServerMessage,
}

impl Delivery {
    pub fn unicast(session: &str, message: ServerMessage) -> Self {
        Self {
            target: Target::Session(session.to_string()),
            message,
        }
    }

    pub fn broadcast(message: ServerMessage) -> Self {
        Self {
            target: Target::Everyone,
            message,
        }
    }

    pub fn is_broadcast(&self) -> bool {
        self.target == Target::Everyone
    }
}

/// Messages for a freshly connected session.
pub fn connected(machine: &RoomStateMachine, session: &str) -> Vec<Delivery> {
    vec![Delivery::unicast(
        session,
        ServerMessage::RoomState(machine.room_state()),
    )]
}

/// Messages after a session dropped.
pub fn disconnected(machine: &mut RoomStateMachine, session: &str) -> Vec<Delivery> {
    let room = machine.leave(session);
    vec![Delivery::broadcast(ServerMessage::RoomState(room))]
}

/// Parse a raw JSON request and apply it.
pub fn handle_json(machine: &mut RoomStateMachine, session: &str, text: &str) -> Vec<Delivery> {
    match serde_json::from_str::<ClientRequest>(text) {
        Ok(request) => handle(machine, session, request),
        Err(e) => {
            warn!(session, error = %e, "Malformed request");
            vec![Delivery::unicast(
                session,
                ServerMessage::Error(ErrorMessage {
                    message: format!("Malformed request: {}", e),
                    kind: ErrorKind::InvalidInput.as_str(),
                }),
            )]
        }
    }
}

/// Apply one request. Failures turn into a single unicast `error`.
pub fn handle(machine: &mut RoomStateMachine, session: &str, request: ClientRequest) -> Vec<Delivery> {
    match apply(machine, session, request) {
        Ok(deliveries) => deliveries,
        Err(err) => {
            warn!(session, kind = err.kind().as_str(), "{}", err);
            vec![Delivery::unicast(
                session,
                ServerMessage::Error(ErrorMessage::from(&err)),
            )]
        }
    }
}

fn apply(
    machine: &mut RoomStateMachine,
    session: &str,
    request: ClientRequest,
) -> Result<Vec<Delivery>, RoomError> {
    use ServerMessage as M;

    let out = match request {
        ClientRequest::CreateHost { name } => {
            let created = machine.create_host(&name, session)?;
            let room = created.room.clone();
            vec![
                Delivery::unicast(session, M::HostCreated(created)),
                Delivery::broadcast(M::RoomState(room)),
            ]
        }
        ClientRequest::JoinAsPlayer { name } => {
            let joined = machine.join_as_player(&name, session)?;
            let room = joined.room.clone();
            let card = joined.card.clone();
            vec![
                Delivery::broadcast(M::RoomState(room)),
                Delivery::unicast(session, M::PlayerJoined(joined)),
                Delivery::unicast(session, M::MyCard(card)),
            ]
        }
        ClientRequest::StartGame => {
            let room = machine.start_game(session)?;
            let mut out = vec![Delivery::broadcast(M::GameStarted(room.clone()))];
            out.extend(cards_for_everyone(machine));
            out.push(Delivery::broadcast(M::RoomState(room)));
            out
        }
        ClientRequest::DrawNumber => {
            let drawn = machine.draw_number(session)?;
            vec![
                Delivery::broadcast(M::NumberDrawn(drawn.number)),
                Delivery::broadcast(M::RoomState(drawn.room)),
            ]
        }
        ClientRequest::RestartGame => {
            let room = machine.restart_game(session)?;
            let mut out = vec![Delivery::broadcast(M::GameRestarted(room.clone()))];
            out.extend(cards_for_everyone(machine));
            out.push(Delivery::broadcast(M::RoomState(room)));
            out
        }
        ClientRequest::EndGame => {
            let room = machine.end_game(session)?;
            vec![Delivery::broadcast(M::GameEnded(room))]
        }
        ClientRequest::ClaimBingo { selected_letter } => {
            let claim = machine.claim_bingo(session, selected_letter.as_deref())?;
            vec![
                Delivery::broadcast(M::BingoClaimed(ClaimNotice {
                    player_socket_id: session.to_string(),
                    player_id: claim.player_id.clone(),
                    player_name: claim.player_name.clone(),
                    valid: claim.valid,
                })),
                Delivery::broadcast(M::BingoResult(ClaimResult {
                    valid: claim.valid,
                    winner_id: claim.room.winner_id.clone(),
                    player_id: claim.player_id,
                    player_name: claim.player_name,
                })),
                Delivery::broadcast(M::RoomState(claim.room)),
            ]
        }
        ClientRequest::MarkCell { row, col } => {
            let marked = machine.mark_cell(session, row, col)?;
            vec![
                Delivery::unicast(session, M::MyCard(marked.card)),
                Delivery::broadcast(M::RoomState(marked.room)),
            ]
        }
        ClientRequest::ReclaimHost { host_secret } => {
            let room = machine.reclaim_host(&host_secret, session)?;
            vec![
                Delivery::unicast(session, M::HostReclaimed(room.clone())),
                Delivery::broadcast(M::RoomState(room)),
            ]
        }
        ClientRequest::ReclaimPlayer { player_secret } => {
            let reclaimed = machine.reclaim_player(&player_secret, session)?;
            let room = reclaimed.room.clone();
            let card = reclaimed.card.clone();
            vec![
                Delivery::unicast(session, M::PlayerReclaimed(reclaimed)),
                Delivery::unicast(session, M::MyCard(card)),
                Delivery::broadcast(M::RoomState(room)),
            ]
        }
        ClientRequest::SelectLetter { letter } => {
            let room = machine.select_letter(session, &letter)?;
            vec![Delivery::broadcast(M::RoomState(room))]
        }
        ClientRequest::Leave => disconnected(machine, session),
    };
    Ok(out)
}

/// Each player's own card, addressed to their current session.
fn cards_for_everyone(machine: &RoomStateMachine) -> Vec<Delivery> {
    machine
        .players()
        .iter()
        .map(|p| Delivery::unicast(&p.socket_id, ServerMessage::MyCard(p.card.clone())))
        .collect()
}

// Headball relay protocol definition
// JSON text frames of the form {"type": ..., "payload": ...}

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::input::InputState;
use crate::game::powerups::PowerUpType;
use crate::game::state::{Ball, Phase, Player, PlayerId};

/// Sent by the relay to a third connection before closing it
pub const ROOM_FULL_MESSAGE: &str = "Room is full";

pub const ROOM_CODE_LEN: usize = 6;

/// Authoritative match snapshot (host -> guest, every tick)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatePayload {
    pub seq: u64,
    pub player1: Player,
    pub player2: Player,
    pub ball: Ball,
    pub time_left: u32,
    pub phase: Phase,
    pub last_scorer: Option<PlayerId>,
    pub goal_celebration_ms: Option<u64>,
    pub clock_ms: u64,
}

/// Guest controls (guest -> host, on every key transition)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputPayload {
    pub seq: u64,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_up: Option<PowerUpType>,
}

impl InputPayload {
    pub fn new(seq: u64, input: &InputState) -> Self {
        Self {
            seq,
            left: input.left,
            right: input.right,
            up: input.up,
            power_up: input.power_up,
        }
    }

    pub fn input_state(&self) -> InputState {
        InputState {
            left: self.left,
            right: self.right,
            up: self.up,
            power_up: self.power_up,
        }
    }
}

/// Messages exchanged through a relay room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelayMessage {
    /// Relay -> first connector; the room is open and waiting
    RoomCreated { code: String },

    /// Relay -> both once the guest joins; player1 is the host
    GameStart { role: PlayerId },

    /// Relay -> host, informational
    PlayerJoined,

    GameState(GameStatePayload),

    PlayerInput(InputPayload),

    /// Relay -> surviving peer when the other side closes
    PlayerDisconnected,

    /// Relay -> connector on a protocol violation (e.g. room full)
    Error { message: String },
}

impl RelayMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RelayMessage::RoomCreated { .. } => "ROOM_CREATED",
            RelayMessage::GameStart { .. } => "GAME_START",
            RelayMessage::PlayerJoined => "PLAYER_JOINED",
            RelayMessage::GameState(_) => "GAME_STATE",
            RelayMessage::PlayerInput(_) => "PLAYER_INPUT",
            RelayMessage::PlayerDisconnected => "PLAYER_DISCONNECTED",
            RelayMessage::Error { .. } => "ERROR",
        }
    }
}

/// Room codes are exactly six ASCII letters or digits
pub fn is_valid_room_code(code: &str) -> bool {
    code.len() == ROOM_CODE_LEN && code.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Trim and upper-case a code typed by a player
pub fn normalize_room_code(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}

/// Random six-digit code for a new host
pub fn generate_room_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Versioned room endpoint: `<relay>/v1/room/<code>`
pub fn room_url(relay_url: &str, code: &str) -> String {
    format!("{}/v1/room/{}", relay_url.trim_end_matches('/'), code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{MatchState, KICKOFF_POSITION};
    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    #[test]
    fn test_wire_shape_of_control_messages() {
        let start = RelayMessage::GameStart {
            role: PlayerId::Player2,
        };
        assert_eq!(
            serde_json::to_value(&start).unwrap(),
            json!({"type": "GAME_START", "payload": {"role": "player2"}})
        );

        assert_eq!(
            serde_json::to_value(&RelayMessage::PlayerJoined).unwrap(),
            json!({"type": "PLAYER_JOINED"})
        );

        let full = RelayMessage::Error {
            message: ROOM_FULL_MESSAGE.to_string(),
        };
        assert_eq!(
            serde_json::to_value(&full).unwrap(),
            json!({"type": "ERROR", "payload": {"message": "Room is full"}})
        );
    }

    #[test]
    fn test_parse_input_without_power_up() {
        let msg = RelayMessage::parse(
            r#"{"type":"PLAYER_INPUT","payload":{"seq":4,"left":true,"right":false,"up":true}}"#,
        )
        .unwrap();

        match msg {
            RelayMessage::PlayerInput(payload) => {
                assert_eq!(payload.seq, 4);
                let input = payload.input_state();
                assert!(input.left && input.up && !input.right);
                assert_eq!(input.power_up, None);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_game_state_uses_camel_case_fields() {
        let state = MatchState::new(90, Ball::new(KICKOFF_POSITION, Vec2::new(1.0, 2.0)));
        let value = serde_json::to_value(RelayMessage::GameState(state.snapshot(9))).unwrap();

        assert_eq!(value["type"], "GAME_STATE");
        assert_eq!(value["payload"]["timeLeft"], 90);
        assert_eq!(value["payload"]["phase"], "MENU");
        assert_eq!(value["payload"]["ball"]["position"], json!({"x": 400.0, "y": 150.0}));
        assert_eq!(value["payload"]["ball"]["velocity"], json!({"x": 1.0, "y": 2.0}));
        assert_eq!(value["payload"]["player1"]["velocity"], json!({"x": 0.0, "y": 0.0}));

        let back = RelayMessage::parse(&value.to_string()).unwrap();
        match back {
            RelayMessage::GameState(payload) => {
                assert_eq!(payload.ball.position, KICKOFF_POSITION);
                assert_eq!(payload.ball.velocity, Vec2::new(1.0, 2.0));
            }
            other => panic!("unexpected message: {:?}", other),
        }
        assert!(value["payload"]["player1"]["onGround"].as_bool().unwrap());
    }

    #[test]
    fn test_malformed_messages_are_errors() {
        assert!(RelayMessage::parse("not json").is_err());
        assert!(RelayMessage::parse(r#"{"type":"TELEPORT"}"#).is_err());
        assert!(RelayMessage::parse(r#"{"type":"GAME_START","payload":{}}"#).is_err());
    }

    #[test]
    fn test_room_codes() {
        let mut rng = StdRng::seed_from_u64(3);
        let code = generate_room_code(&mut rng);

        assert!(is_valid_room_code(&code));
        assert!(code.chars().all(|c| c.is_ascii_digit()));
        assert!(is_valid_room_code("AB12CD"));
        assert!(!is_valid_room_code("AB12C"));
        assert!(!is_valid_room_code("AB-2CD"));
        assert_eq!(normalize_room_code("  ab12cd "), "AB12CD");
        assert_eq!(
            room_url("ws://localhost:8080/", "123456"),
            "ws://localhost:8080/v1/room/123456"
        );
    }
}

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::physics::{BALL_RADIUS, FIELD_WIDTH, GOAL_WIDTH, GROUND_Y, PLAYER_RADIUS};
use super::powerups::PowerUpType;
use crate::network::protocol::GameStatePayload;

/// Position/velocity vector in virtual field units (px, px per tick)
pub type Vector2 = Vec2;

/// Vectors go over the wire as `{"x": .., "y": ..}` objects
pub mod vec2_xy {
    use glam::Vec2;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Xy {
        x: f32,
        y: f32,
    }

    pub fn serialize<S: Serializer>(v: &Vec2, serializer: S) -> Result<S::Ok, S::Error> {
        Xy { x: v.x, y: v.y }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec2, D::Error> {
        let Xy { x, y } = Xy::deserialize(deserializer)?;
        Ok(Vec2::new(x, y))
    }
}

/// Kickoff spot for a freshly spawned ball
pub const KICKOFF_POSITION: Vec2 = Vec2::new(FIELD_WIDTH / 2.0, 150.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerId {
    Player1,
    Player2,
}

impl PlayerId {
    pub fn opponent(self) -> Self {
        match self {
            PlayerId::Player1 => PlayerId::Player2,
            PlayerId::Player2 => PlayerId::Player1,
        }
    }

    /// Player 1 always defends the left goal
    pub fn side(self) -> Side {
        match self {
            PlayerId::Player1 => Side::Left,
            PlayerId::Player2 => Side::Right,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayerId::Player1 => "P1",
            PlayerId::Player2 => "P2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Horizontal direction pointing at the opponent's goal
    pub fn attack_direction(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    /// x-coordinate of this side's goal line
    pub fn goal_line_x(self) -> f32 {
        match self {
            Side::Left => GOAL_WIDTH,
            Side::Right => FIELD_WIDTH - GOAL_WIDTH,
        }
    }
}

/// A timed self-buff (speed or enlarge-ball)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePowerUp {
    pub kind: PowerUpType,
    pub expires_at: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(with = "vec2_xy")]
    pub position: Vector2,
    #[serde(with = "vec2_xy")]
    pub velocity: Vector2,
    pub radius: f32,
    pub on_ground: bool,
    pub score: u32,
    pub side: Side,
    pub active_power_up: Option<ActivePowerUp>,
    /// Frozen state is independent of `active_power_up`
    pub frozen_until: Option<u64>,
}

impl Player {
    pub fn new(side: Side) -> Self {
        let x = match side {
            Side::Left => FIELD_WIDTH / 4.0,
            Side::Right => FIELD_WIDTH * 3.0 / 4.0,
        };

        Self {
            position: Vec2::new(x, GROUND_Y - PLAYER_RADIUS),
            velocity: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            on_ground: true,
            score: 0,
            side,
            active_power_up: None,
            frozen_until: None,
        }
    }

    pub fn is_frozen(&self, now: u64) -> bool {
        self.frozen_until.map_or(false, |until| until > now)
    }

    pub fn has_power_up(&self, kind: PowerUpType, now: u64) -> bool {
        self.active_power_up
            .map_or(false, |active| active.kind == kind && active.expires_at > now)
    }

    /// Legal range for the player's centre: own goal mouth edge to midfield
    pub fn horizontal_bounds(&self) -> (f32, f32) {
        let midfield = FIELD_WIDTH / 2.0;
        match self.side {
            Side::Left => (GOAL_WIDTH + self.radius, midfield - self.radius),
            Side::Right => (midfield + self.radius, FIELD_WIDTH - GOAL_WIDTH - self.radius),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ball {
    #[serde(with = "vec2_xy")]
    pub position: Vector2,
    #[serde(with = "vec2_xy")]
    pub velocity: Vector2,
    pub radius: f32,
    pub last_touched_by: Option<PlayerId>,
    pub fireball_until: Option<u64>,
}

impl Ball {
    pub fn new(position: Vector2, velocity: Vector2) -> Self {
        Self {
            position,
            velocity,
            radius: BALL_RADIUS,
            last_touched_by: None,
            fireball_until: None,
        }
    }

    /// Fresh ball at the kickoff spot with a randomised drift
    pub fn kickoff<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let velocity = Vec2::new(rng.gen_range(-4.0..=4.0), rng.gen_range(-2.0..=0.0));
        Self::new(KICKOFF_POSITION, velocity)
    }

    pub fn is_fireball(&self, now: u64) -> bool {
        self.fireball_until.map_or(false, |until| until > now)
    }
}

/// Match phases.
///
/// MENU -> PLAYING for local/AI play, MENU -> LOBBY -> PLAYING online.
/// PLAYING <-> PAUSED toggles, PLAYING -> GAME_OVER when the clock runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Menu,
    Lobby,
    Playing,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    pub player1: Player,
    pub player2: Player,
    pub ball: Ball,
    pub time_remaining: u32,
    pub match_duration: u32,
    pub phase: Phase,
    pub last_scorer: Option<PlayerId>,
    /// Remaining celebration time in ms; goals are ignored while set
    pub goal_celebration_ms: Option<u64>,
    /// Simulation clock in ms, advanced only while PLAYING
    pub clock_ms: u64,
}

impl MatchState {
    pub fn new(match_duration: u32, ball: Ball) -> Self {
        Self {
            player1: Player::new(Side::Left),
            player2: Player::new(Side::Right),
            ball,
            time_remaining: match_duration,
            match_duration,
            phase: Phase::Menu,
            last_scorer: None,
            goal_celebration_ms: None,
            clock_ms: 0,
        }
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        match id {
            PlayerId::Player1 => &self.player1,
            PlayerId::Player2 => &self.player2,
        }
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        match id {
            PlayerId::Player1 => &mut self.player1,
            PlayerId::Player2 => &mut self.player2,
        }
    }

    /// Ball radius is derived from both players' flags every step, never latched
    pub fn any_enlarge_active(&self, now: u64) -> bool {
        self.player1.has_power_up(PowerUpType::EnlargeBall, now)
            || self.player2.has_power_up(PowerUpType::EnlargeBall, now)
    }

    pub fn is_celebrating(&self) -> bool {
        self.goal_celebration_ms.is_some()
    }

    /// Leading player, `None` on a draw
    pub fn winner(&self) -> Option<PlayerId> {
        use std::cmp::Ordering;
        match self.player1.score.cmp(&self.player2.score) {
            Ordering::Greater => Some(PlayerId::Player1),
            Ordering::Less => Some(PlayerId::Player2),
            Ordering::Equal => None,
        }
    }

    pub fn snapshot(&self, seq: u64) -> GameStatePayload {
        GameStatePayload {
            seq,
            player1: self.player1.clone(),
            player2: self.player2.clone(),
            ball: self.ball.clone(),
            time_left: self.time_remaining,
            phase: self.phase,
            last_scorer: self.last_scorer,
            goal_celebration_ms: self.goal_celebration_ms,
            clock_ms: self.clock_ms,
        }
    }

    /// Overwrite the local mirror with host state. No merging, no prediction.
    pub fn apply_snapshot(&mut self, payload: &GameStatePayload) {
        self.player1 = payload.player1.clone();
        self.player2 = payload.player2.clone();
        self.ball = payload.ball.clone();
        self.time_remaining = payload.time_left;
        self.phase = payload.phase;
        self.last_scorer = payload.last_scorer;
        self.goal_celebration_ms = payload.goal_celebration_ms;
        self.clock_ms = payload.clock_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_players_spawn_on_own_half() {
        let state = MatchState::new(90, Ball::new(KICKOFF_POSITION, Vec2::ZERO));

        assert!(state.player1.position.x < FIELD_WIDTH / 2.0);
        assert!(state.player2.position.x > FIELD_WIDTH / 2.0);
        assert!(state.player1.on_ground);
        assert_eq!(state.phase, Phase::Menu);
        assert_eq!(state.time_remaining, 90);
    }

    #[test]
    fn test_kickoff_is_seeded() {
        let a = Ball::kickoff(&mut StdRng::seed_from_u64(7));
        let b = Ball::kickoff(&mut StdRng::seed_from_u64(7));

        assert_eq!(a, b);
        assert_eq!(a.position, KICKOFF_POSITION);
        assert!(a.velocity.x.abs() <= 4.0);
        assert!(a.velocity.y <= 0.0);
    }

    #[test]
    fn test_snapshot_round_trip_overwrites_mirror() {
        let mut host = MatchState::new(90, Ball::new(KICKOFF_POSITION, Vec2::new(3.0, -1.0)));
        host.player2.score = 2;
        host.phase = Phase::Playing;
        host.clock_ms = 4800;

        let mut guest = MatchState::new(90, Ball::new(Vec2::ZERO, Vec2::ZERO));
        guest.apply_snapshot(&host.snapshot(1));

        assert_eq!(guest, host);
    }

    #[test]
    fn test_frozen_expiry_is_exclusive() {
        let mut player = Player::new(Side::Left);
        player.frozen_until = Some(3000);

        assert!(player.is_frozen(2999));
        assert!(!player.is_frozen(3000));
    }
}

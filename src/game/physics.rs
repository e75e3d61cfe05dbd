use glam::Vec2;

use super::input::InputState;
use super::powerups::PowerUpType;
use super::state::{Ball, Player, PlayerId, Side};

// Virtual field, one step = one ~16ms frame, velocities in px per tick
pub const FIELD_WIDTH: f32 = 800.0;
pub const FIELD_HEIGHT: f32 = 600.0;
pub const GROUND_Y: f32 = 550.0;
pub const GOAL_WIDTH: f32 = 60.0;
pub const GOAL_HEIGHT: f32 = 150.0;
pub const GOAL_TOP: f32 = GROUND_Y - GOAL_HEIGHT;
pub const GOAL_POST_RADIUS: f32 = 6.0;

pub const PLAYER_RADIUS: f32 = 25.0;
pub const PLAYER_ACCELERATION: f32 = 0.8;
pub const PLAYER_MAX_SPEED: f32 = 6.0;
pub const SPEED_BOOST: f32 = 1.6;
pub const GROUND_FRICTION: f32 = 0.85;
pub const AIR_FRICTION: f32 = 0.95;
pub const PLAYER_GRAVITY: f32 = 0.6;
pub const JUMP_IMPULSE: f32 = -12.0;
const CEILING_DAMPING: f32 = 0.5;

pub const BALL_RADIUS: f32 = 15.0;
pub const ENLARGED_BALL_RADIUS: f32 = BALL_RADIUS * 2.0;
pub const BALL_GRAVITY: f32 = 0.3;
pub const AIR_RESISTANCE: f32 = 0.99;
pub const MAX_BALL_SPEED: f32 = 20.0;
pub const BALL_BOUNCE: f32 = 0.7;
pub const WALL_BOUNCE: f32 = 0.8;
const BOUNCE_FRICTION: f32 = 0.95;
const REST_THRESHOLD: f32 = 1.0; // vertical bounce speed below which the ball settles

pub const KICK_FORCE: f32 = 8.0;
pub const FIREBALL_FORCE_MULTIPLIER: f32 = 2.0;
pub const MOMENTUM_TRANSFER: f32 = 0.5;
pub const ACTIVE_HIT_BONUS: f32 = 3.0;
pub const MIN_HEADER_LIFT: f32 = 6.0;
const STEEP_NORMAL_Y: f32 = -0.5;
const SEPARATION_MARGIN: f32 = 0.1;

/// What happened to the ball during a step (drives logging and HUD flashes)
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PhysicsEvents {
    pub player_contact: bool,
    pub wall_collision: bool,
    pub post_collision: bool,
    pub ground_bounce: bool,
}

impl PhysicsEvents {
    pub fn any(&self) -> bool {
        self.player_contact || self.wall_collision || self.post_collision || self.ground_bounce
    }

    pub fn merge(&mut self, other: PhysicsEvents) {
        self.player_contact |= other.player_contact;
        self.wall_collision |= other.wall_collision;
        self.post_collision |= other.post_collision;
        self.ground_bounce |= other.ground_bounce;
    }
}

/// Advance one player by a tick.
///
/// A frozen player is skipped entirely, gravity included: it hangs in the
/// air until the freeze expires.
pub fn update_player(player: &mut Player, input: &InputState, now: u64) {
    if player.is_frozen(now) {
        return;
    }

    let boost = if player.has_power_up(PowerUpType::Speed, now) {
        SPEED_BOOST
    } else {
        1.0
    };

    if input.left {
        player.velocity.x -= PLAYER_ACCELERATION * boost;
    }
    if input.right {
        player.velocity.x += PLAYER_ACCELERATION * boost;
    }

    let friction = if player.on_ground {
        GROUND_FRICTION
    } else {
        AIR_FRICTION
    };
    player.velocity.x *= friction;

    let max_speed = PLAYER_MAX_SPEED * boost;
    player.velocity.x = player.velocity.x.clamp(-max_speed, max_speed);

    if input.up && player.on_ground {
        player.velocity.y = JUMP_IMPULSE;
        player.on_ground = false;
    }

    player.velocity.y += PLAYER_GRAVITY;
    player.position += player.velocity;

    let floor = GROUND_Y - player.radius;
    if player.position.y >= floor {
        player.position.y = floor;
        player.velocity.y = 0.0;
        player.on_ground = true;
    } else {
        player.on_ground = false;
    }

    if player.position.y - player.radius < 0.0 {
        player.position.y = player.radius;
        player.velocity.y = player.velocity.y.abs() * CEILING_DAMPING;
    }

    // Hard constraint: own half only, never inside own goal mouth
    let (min_x, max_x) = player.horizontal_bounds();
    if player.position.x < min_x {
        player.position.x = min_x;
        player.velocity.x = 0.0;
    } else if player.position.x > max_x {
        player.position.x = max_x;
        player.velocity.x = 0.0;
    }
}

/// Advance the ball by a tick and resolve ground, ceiling and goal structures
pub fn update_ball(ball: &mut Ball, enlarged: bool) -> PhysicsEvents {
    let mut events = PhysicsEvents::default();

    ball.radius = if enlarged {
        ENLARGED_BALL_RADIUS
    } else {
        BALL_RADIUS
    };

    ball.velocity.y += BALL_GRAVITY;
    ball.velocity *= AIR_RESISTANCE;
    ball.velocity = ball.velocity.clamp_length_max(MAX_BALL_SPEED);
    ball.position += ball.velocity;

    if ball.position.y + ball.radius > GROUND_Y {
        ball.position.y = GROUND_Y - ball.radius;
        ball.velocity.y = -ball.velocity.y.abs() * BALL_BOUNCE;
        ball.velocity.x *= BOUNCE_FRICTION;
        if ball.velocity.y.abs() < REST_THRESHOLD {
            ball.velocity.y = 0.0;
        }
        events.ground_bounce = true;
    }

    if ball.position.y - ball.radius < 0.0 {
        ball.position.y = ball.radius;
        ball.velocity.y = ball.velocity.y.abs() * BALL_BOUNCE;
        events.wall_collision = true;
    }

    for side in [Side::Left, Side::Right] {
        events.merge(resolve_goal_structure(ball, side));
    }

    events
}

/// Goal box collisions, computed in a frame where the goal line sits at
/// `x = GOAL_WIDTH` and the back wall at `x = 0` (the right goal is mirrored).
fn resolve_goal_structure(ball: &mut Ball, side: Side) -> PhysicsEvents {
    let mut events = PhysicsEvents::default();
    let mirror = side == Side::Right;

    let mut position = ball.position;
    let mut velocity = ball.velocity;
    if mirror {
        position.x = FIELD_WIDTH - position.x;
        velocity.x = -velocity.x;
    }
    let radius = ball.radius;

    if position.y < GOAL_TOP {
        // Above the mouth the goal column is solid
        if position.x - radius < GOAL_WIDTH {
            position.x = GOAL_WIDTH + radius;
            velocity.x = velocity.x.abs() * WALL_BOUNCE;
            events.wall_collision = true;
        }
    } else if position.x < GOAL_WIDTH {
        // Inside the mouth: crossbar underside and back wall
        if position.y - radius < GOAL_TOP {
            position.y = GOAL_TOP + radius;
            velocity.y = velocity.y.abs() * WALL_BOUNCE;
            events.wall_collision = true;
        }
        if position.x - radius < 0.0 {
            position.x = radius;
            velocity.x = velocity.x.abs() * WALL_BOUNCE;
            events.wall_collision = true;
        }
    }

    let post = Vec2::new(GOAL_WIDTH, GOAL_TOP);
    let offset = position - post;
    let distance = offset.length();
    let min_distance = radius + GOAL_POST_RADIUS;
    if distance < min_distance {
        let normal = if distance > f32::EPSILON {
            offset / distance
        } else {
            Vec2::new(1.0, -1.0).normalize()
        };
        position = post + normal * min_distance;
        velocity = normal * velocity.length() * WALL_BOUNCE;
        events.post_collision = true;
    }

    if mirror {
        position.x = FIELD_WIDTH - position.x;
        velocity.x = -velocity.x;
    }
    ball.position = position;
    ball.velocity = velocity;

    events
}

/// Circle-circle contact between a player and the ball.
///
/// Returns true when the ball was hit. The ball always ends strictly outside
/// the player's reach and never faster than `MAX_BALL_SPEED`.
pub fn handle_player_ball_collision(
    player: &Player,
    player_id: PlayerId,
    ball: &mut Ball,
    fireball_active: bool,
) -> bool {
    let offset = ball.position - player.position;
    let distance = offset.length();
    let min_distance = player.radius + ball.radius;

    if distance >= min_distance {
        return false;
    }

    let normal = if distance > f32::EPSILON {
        offset / distance
    } else {
        Vec2::NEG_Y
    };

    ball.position = player.position + normal * (min_distance + SEPARATION_MARGIN);

    let force = if fireball_active {
        KICK_FORCE * FIREBALL_FORCE_MULTIPLIER
    } else {
        KICK_FORCE
    };
    let mut velocity = normal * force + player.velocity * MOMENTUM_TRANSFER;

    // Moving into the ball rewards an intentional header
    if player.velocity.dot(normal) > 0.0 {
        velocity += normal * ACTIVE_HIT_BONUS;
    }

    if normal.y < STEEP_NORMAL_Y && velocity.y > -MIN_HEADER_LIFT {
        velocity.y = -MIN_HEADER_LIFT;
    }

    ball.velocity = velocity.clamp_length_max(MAX_BALL_SPEED);
    ball.last_touched_by = Some(player_id);
    true
}

/// Which player (if any) the ball is scoring for right now.
///
/// Crossing the left goal line scores for player 2, the right one for player 1,
/// and only while the ball's centre is inside `[GOAL_TOP, GROUND_Y]`.
pub fn check_goal(ball: &Ball) -> Option<PlayerId> {
    let y = ball.position.y;
    if !(GOAL_TOP..=GROUND_Y).contains(&y) {
        return None;
    }

    if ball.position.x < Side::Left.goal_line_x() {
        Some(PlayerId::Player2)
    } else if ball.position.x > Side::Right.goal_line_x() {
        Some(PlayerId::Player1)
    } else {
        None
    }
}

// Ball extrapolation for the AI

use glam::Vec2;

use crate::game::physics::{FIELD_WIDTH, GROUND_Y};
use crate::game::state::{Ball, Side};

/// Linear extrapolation `position + velocity * lookahead`, kept on the field.
/// Gravity and bounces are ignored.
pub fn predict_ball_position(ball: &Ball, lookahead_ticks: f32) -> Vec2 {
    let predicted = ball.position + ball.velocity * lookahead_ticks;
    Vec2::new(
        predicted.x.clamp(ball.radius, FIELD_WIDTH - ball.radius),
        predicted.y.clamp(ball.radius, GROUND_Y - ball.radius),
    )
}

/// Ball is travelling toward the goal that `side` defends
pub fn is_heading_toward(ball: &Ball, side: Side) -> bool {
    ball.velocity.x * side.attack_direction() < 0.0
}

/// Ball centre is on the half that `side` defends
pub fn is_on_side(ball: &Ball, side: Side) -> bool {
    let midfield = FIELD_WIDTH / 2.0;
    match side {
        Side::Left => ball.position.x < midfield,
        Side::Right => ball.position.x > midfield,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_extrapolation() {
        let ball = Ball::new(Vec2::new(300.0, 200.0), Vec2::new(2.0, -1.0));
        assert_eq!(predict_ball_position(&ball, 12.0), Vec2::new(324.0, 188.0));
    }

    #[test]
    fn test_prediction_stays_on_field() {
        let ball = Ball::new(Vec2::new(50.0, 500.0), Vec2::new(-20.0, 20.0));
        let predicted = predict_ball_position(&ball, 12.0);

        assert_eq!(predicted.x, ball.radius);
        assert_eq!(predicted.y, GROUND_Y - ball.radius);
    }

    #[test]
    fn test_heading_and_half() {
        let ball = Ball::new(Vec2::new(600.0, 300.0), Vec2::new(5.0, 0.0));

        assert!(is_heading_toward(&ball, Side::Right));
        assert!(!is_heading_toward(&ball, Side::Left));
        assert!(is_on_side(&ball, Side::Right));
        assert!(!is_on_side(&ball, Side::Left));
    }
}

//! Collision tests between the actor and obstacles or field bounds
//!
//! Every test is a pure function of its arguments, so the same actor and
//! obstacle always produce the same verdict.

use super::state::{Actor, CollisionCause, Field, Obstacle};

/// Gap-pair hit: horizontal overlap and the actor pokes out of the gap
#[inline]
pub fn gap_pair_hit(actor: &Actor, x: f32, width: f32, gap_top: f32, gap_bottom: f32) -> bool {
    let overlaps_x = actor.right() > x && actor.left() < x + width;
    overlaps_x && (actor.top() < gap_top || actor.bottom() > gap_bottom)
}

/// Spike hit: actor center inside the base span and its lower half below the apex
#[inline]
pub fn spike_hit(actor: &Actor, x: f32, y: f32, width: f32) -> bool {
    let center = actor.center();
    center.x > x && center.x < x + width && center.y + actor.height / 2.0 > y
}

/// Floating hazard hit: circle test against a circle of the actor's half width
#[inline]
pub fn floating_hit(actor: &Actor, x: f32, y: f32, size: f32) -> bool {
    let radius = size / 2.0;
    let hazard_center = glam::Vec2::new(x + radius, y + radius);
    actor.center().distance(hazard_center) < radius + actor.width / 2.0
}

/// Shape-specific test for one obstacle
pub fn obstacle_hit(actor: &Actor, obstacle: &Obstacle) -> bool {
    match *obstacle {
        Obstacle::GapPair {
            x,
            width,
            gap_top,
            gap_bottom,
            ..
        } => gap_pair_hit(actor, x, width, gap_top, gap_bottom),
        Obstacle::Spike { x, y, width, .. } => spike_hit(actor, x, y, width),
        Obstacle::Floating { x, y, size } => floating_hit(actor, x, y, size),
    }
}

/// Ground or ceiling contact
pub fn bounds_hit(actor: &Actor, field: Field) -> Option<CollisionCause> {
    if actor.bottom() > field.ground_y() {
        Some(CollisionCause::Ground)
    } else if actor.top() < 0.0 {
        Some(CollisionCause::Ceiling)
    } else {
        None
    }
}

/// First obstacle the actor touches, in list order
pub fn first_obstacle_hit(actor: &Actor, obstacles: &[Obstacle]) -> Option<CollisionCause> {
    obstacles
        .iter()
        .find(|obstacle| obstacle_hit(actor, obstacle))
        .map(|obstacle| obstacle.kind().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use glam::Vec2;

    const H: f32 = 600.0;

    fn actor_at(x: f32, y: f32) -> Actor {
        Actor::new(Vec2::new(x, y), &Tuning::default())
    }

    fn pipe_at(x: f32) -> Obstacle {
        Obstacle::GapPair {
            x,
            width: 64.0,
            gap_top: 0.3 * H,
            gap_bottom: 0.55 * H,
            passed: false,
        }
    }

    #[test]
    fn test_gap_pair_inside_gap_is_safe() {
        // Actor at vertical center, pipe overlapping horizontally
        let actor = actor_at(120.0, H / 2.0);
        assert!(actor.top() >= 0.3 * H && actor.bottom() <= 0.55 * H);
        assert!(!obstacle_hit(&actor, &pipe_at(100.0)));
    }

    #[test]
    fn test_gap_pair_above_or_below_gap_hits() {
        let pipe = pipe_at(100.0);
        assert!(obstacle_hit(&actor_at(120.0, 0.3 * H - 1.0), &pipe));
        assert!(obstacle_hit(&actor_at(120.0, -1.0), &pipe));
        // Bottom edge 1px past the gap's lower bound
        assert!(obstacle_hit(&actor_at(120.0, 0.55 * H - 23.0), &pipe));
    }

    #[test]
    fn test_gap_pair_without_overlap_never_hits() {
        let actor = actor_at(120.0, 0.0);
        // Pipe entirely to the right
        assert!(!obstacle_hit(&actor, &pipe_at(154.0)));
        // Pipe entirely to the left
        assert!(!obstacle_hit(&actor, &pipe_at(120.0 - 64.0)));
    }

    #[test]
    fn test_spike_requires_center_inside_span() {
        let spike = Obstacle::Spike { x: 130.0, y: 472.0, width: 30.0, height: 50.0 };
        // Center x = 137, bottom = 472 + 1
        let low = actor_at(120.0, 449.0);
        assert!(obstacle_hit(&low, &spike));
        // Same height but center left of the spike
        let beside = actor_at(90.0, 449.0);
        assert!(!obstacle_hit(&beside, &spike));
        // Over the spike but above its apex
        let high = actor_at(120.0, 440.0);
        assert!(!obstacle_hit(&high, &spike));
    }

    #[test]
    fn test_floating_circle_test() {
        let hazard = Obstacle::Floating { x: 200.0, y: 200.0, size: 30.0 };
        // Hazard center (215, 215), hit radius 15 + 17 = 32
        let near = actor_at(215.0 - 17.0 + 31.0, 215.0 - 12.0);
        assert!(obstacle_hit(&near, &hazard));
        let far = actor_at(215.0 - 17.0 + 32.5, 215.0 - 12.0);
        assert!(!obstacle_hit(&far, &hazard));
    }

    #[test]
    fn test_bounds() {
        let field = Field::new(800.0, H);
        assert_eq!(bounds_hit(&actor_at(120.0, 300.0), field), None);
        assert_eq!(bounds_hit(&actor_at(120.0, -0.1), field), Some(CollisionCause::Ceiling));
        assert_eq!(
            bounds_hit(&actor_at(120.0, field.ground_y() - 23.0), field),
            Some(CollisionCause::Ground)
        );
        assert_eq!(bounds_hit(&actor_at(120.0, field.ground_y() - 24.0), field), None);
    }

    #[test]
    fn test_verdict_is_pure() {
        let actor = actor_at(120.0, 100.0);
        let obstacles = vec![pipe_at(100.0), Obstacle::Floating { x: 0.0, y: 0.0, size: 30.0 }];
        let first = first_obstacle_hit(&actor, &obstacles);
        for _ in 0..10 {
            assert_eq!(first_obstacle_hit(&actor, &obstacles), first);
        }
        assert_eq!(first, Some(CollisionCause::GapPair));
    }
}

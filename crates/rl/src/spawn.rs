//! Episode placement: spawn resolution, goal re-placement and the per
//! episode dynamics scale draws.

use rand::rngs::StdRng;
use rand::Rng;

use arena::collision::closest_point_on_rect;
use arena::{Goal, Vec2, World};

const SPAWN_TRIES: usize = 32;
const GOAL_TRIES: usize = 64;

/// Draw a scale factor from a half-open range. Degenerate ranges collapse
/// to the lower bound without consuming a draw.
pub(crate) fn draw_scale(rng: &mut StdRng, (min, max): (f32, f32)) -> f32 {
    if min < max {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Resolve the episode start position: a fixed spawn point wins, then the
/// random-spawn flag, then the arena centre with an overlap nudge.
pub(crate) fn place_robot(
    world: &mut World,
    rng: &mut StdRng,
    fixed_spawn: Option<Vec2>,
    randomize: bool,
    force_randomize: bool,
) {
    if force_randomize {
        random_spawn(world, rng);
    } else if let Some(spawn) = fixed_spawn {
        world.robot.place(spawn);
    } else if randomize {
        random_spawn(world, rng);
    } else if overlaps_any(world, world.robot.pos, world.robot.radius + 4.0) {
        random_spawn(world, rng);
    }
}

/// Rejection-sample a clear position inside the walls. The robot keeps its
/// current position when every try overlaps an obstacle.
pub(crate) fn random_spawn(world: &mut World, rng: &mut StdRng) {
    let margin = world.wall_margin() + world.robot.radius + 4.0;
    let clearance = world.robot.radius + 2.0;
    for _ in 0..SPAWN_TRIES {
        let x = rng.gen_range(margin..world.width() - margin);
        let y = rng.gen_range(margin..world.height() - margin);
        let candidate = Vec2::new(x, y);
        if !overlaps_any(world, candidate, clearance) {
            world.robot.place(candidate);
            return;
        }
    }
    tracing::debug!(
        tries = SPAWN_TRIES,
        "no clear spawn found, keeping current position"
    );
}

fn overlaps_any(world: &World, point: Vec2, clearance: f32) -> bool {
    world.obstacles().iter().any(|rect| {
        let closest = closest_point_on_rect(point, rect);
        (point - closest).length_squared() <= clearance * clearance
    })
}

/// Re-place the goal at a random spot clear of obstacles and away from the
/// robot. Falls back to the far corner when sampling fails.
pub(crate) fn random_goal(world: &mut World, rng: &mut StdRng) {
    let Some(goal_radius) = world.goal.as_ref().map(|goal| goal.radius) else {
        return;
    };
    let clearance = goal_radius + world.robot.radius + 30.0;
    let margin = world.wall_margin() + goal_radius + 10.0;
    let robot_pos = world.robot.pos;

    for _ in 0..GOAL_TRIES {
        let x = rng.gen_range(margin..world.width() - margin);
        let y = rng.gen_range(margin..world.height() - margin);
        let blocked = world.obstacles().iter().any(|rect| {
            x >= rect.x - goal_radius
                && x <= rect.x + rect.width + goal_radius
                && y >= rect.y - goal_radius
                && y <= rect.y + rect.height + goal_radius
        });
        let candidate = Vec2::new(x, y);
        if !blocked && (candidate - robot_pos).length_squared() >= clearance * clearance {
            world.goal = Some(Goal::new(candidate, goal_radius));
            return;
        }
    }
    world.goal = Some(Goal::new(
        Vec2::new(world.width() - margin, world.height() - margin),
        goal_radius,
    ));
}

use profile::EnvProfile;
use rl::{DiscreteAction, Env, ResetOptions, RobotEnv};

fn pinned(heading: f32) -> Option<ResetOptions> {
    Some(ResetOptions {
        heading_degrees: Some(heading),
    })
}

fn walled_arena(extra: &str) -> EnvProfile {
    let json = format!(
        r#"{{
            "label": "Wall Lab",
            "world": {{"width": 640.0, "height": 480.0, "obstacles": []}},
            "sensor": {{"ray_count": 8, "ray_length": 160.0, "ray_fov_degrees": 90.0}}{extra}
        }}"#
    );
    EnvProfile::from_str(&json).unwrap()
}

fn drive_until_collision(env: &mut RobotEnv, cap: usize) -> rl::Step {
    for _ in 0..cap {
        let step = env.step(DiscreteAction::Forward);
        if step.info.collision {
            return step;
        }
    }
    panic!("no collision within {cap} steps");
}

#[test]
fn two_consecutive_collisions_terminate() {
    let profile = walled_arena("");
    let mut env = RobotEnv::new("wall_lab", &profile).unwrap();
    env.reset(Some(1), pinned(0.0));

    let first = drive_until_collision(&mut env, 80);
    assert!(first.reward <= -40.0);
    assert!(!first.terminated, "one hit must not end the episode");

    let second = env.step(DiscreteAction::Forward);
    assert!(second.info.collision);
    assert!(second.terminated);
}

#[test]
fn clean_step_resets_the_collision_streak() {
    let profile = walled_arena("");
    let mut env = RobotEnv::new("wall_lab", &profile).unwrap();
    env.reset(Some(1), pinned(0.0));

    let first = drive_until_collision(&mut env, 80);
    assert!(!first.terminated);

    // Turning in place leaves the robot resting against the wall without
    // registering a fresh hit.
    let turn = env.step(DiscreteAction::TurnLeft);
    assert!(!turn.info.collision);
    assert!(!turn.terminated);

    // The next wall hit starts a new streak instead of ending the episode.
    let again = env.step(DiscreteAction::TurnRight);
    assert!(!again.info.collision);
    let hit = drive_until_collision(&mut env, 10);
    assert!(!hit.terminated);
}

#[test]
fn collision_penalty_replaces_shaping() {
    let profile = walled_arena("");
    let mut env = RobotEnv::new("wall_lab", &profile).unwrap();
    env.reset(Some(1), pinned(0.0));

    let hit = drive_until_collision(&mut env, 80);
    assert!((hit.reward + 40.0).abs() < 1e-3, "reward was {}", hit.reward);
}

#[test]
fn wall_proximity_turns_shaping_negative() {
    // Spawned 50 units short of the east wall the closest ray reads ~0.31,
    // inside the warning band.
    let near = walled_arena(r#", "dynamics": {"spawn_x": 570.0, "spawn_y": 240.0}"#);
    let mut env = RobotEnv::new("near_wall", &near).unwrap();
    env.reset(Some(1), pinned(0.0));
    let cramped = env.step(DiscreteAction::Forward).reward;

    let open = walled_arena("");
    let mut env = RobotEnv::new("open", &open).unwrap();
    env.reset(Some(1), pinned(0.0));
    let clear = env.step(DiscreteAction::Forward).reward;

    assert!(cramped < 0.0, "warning band reward was {cramped}");
    assert!(clear > 0.1, "open-space reward was {clear}");
}

#[test]
fn danger_band_penalizes_forward_pressure() {
    // 25 units from the wall: the forward rays dip under the danger
    // threshold and the head-on coupling penalty stacks on top.
    let profile = walled_arena(r#", "dynamics": {"spawn_x": 595.0, "spawn_y": 240.0}"#);
    let mut env = RobotEnv::new("danger", &profile).unwrap();
    env.reset(Some(1), pinned(0.0));

    let step = env.step(DiscreteAction::Forward);
    assert!(!step.info.collision);
    assert!(step.reward < -0.4, "danger reward was {}", step.reward);
}

#[test]
fn reverse_backs_away_from_the_wall() {
    let profile = walled_arena(r#", "dynamics": {"reverse_enabled": true}"#);
    let mut env = RobotEnv::new("reversing", &profile).unwrap();
    env.reset(Some(1), pinned(0.0));

    drive_until_collision(&mut env, 80);
    let x_at_wall = env.state().x;

    let back = env.step(DiscreteAction::Reverse);
    assert!(!back.info.collision);
    assert!(back.info.x < x_at_wall - 1.0, "expected retreat");
}

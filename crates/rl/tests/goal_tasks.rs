use profile::EnvProfile;
use rl::{DiscreteAction, Env, ResetOptions, RobotEnv};

fn pinned(heading: f32) -> Option<ResetOptions> {
    Some(ResetOptions {
        heading_degrees: Some(heading),
    })
}

fn goal_lane() -> EnvProfile {
    EnvProfile::from_str(
        r#"{
            "label": "Goal Lane",
            "world": {
                "width": 640.0,
                "height": 480.0,
                "obstacles": [],
                "goal": {"x": 400.0, "y": 240.0}
            },
            "sensor": {"ray_count": 8, "ray_length": 160.0, "ray_fov_degrees": 90.0}
        }"#,
    )
    .unwrap()
}

#[test]
fn reaching_the_goal_truncates_with_the_arrival_bonus() {
    let profile = goal_lane();
    let mut env = RobotEnv::new("goal_lane", &profile).unwrap();
    env.reset(Some(1), pinned(0.0));

    let mut arrived = None;
    for step_no in 1..=20 {
        let step = env.step(DiscreteAction::Forward);
        if step.info.goal_reached {
            arrived = Some((step_no, step));
            break;
        }
    }
    let (step_no, step) = arrived.expect("goal never reached");
    assert!((8..=14).contains(&step_no), "arrived at step {step_no}");
    assert!(step.reward > 90.0, "arrival reward was {}", step.reward);
    assert!(step.truncated);
    assert!(!step.terminated, "arrival is a success, not a failure");
}

#[test]
fn approach_earns_more_than_retreat() {
    let profile = goal_lane();

    let mut env = RobotEnv::new("goal_lane", &profile).unwrap();
    env.reset(Some(1), pinned(0.0));
    let toward = env.step(DiscreteAction::Forward).reward;

    let mut env = RobotEnv::new("goal_lane", &profile).unwrap();
    env.reset(Some(1), pinned(180.0));
    let away = env.step(DiscreteAction::Forward).reward;

    assert!(toward > 3.0, "approach reward was {toward}");
    assert!(away < -3.0, "retreat reward was {away}");
}

#[test]
fn best_goal_distance_tracks_the_closest_point_so_far() {
    let profile = goal_lane();
    let mut env = RobotEnv::new("goal_lane", &profile).unwrap();
    env.reset(Some(1), pinned(0.0));
    assert!((env.best_goal_distance() - 80.0).abs() < 1.0);

    for _ in 0..3 {
        env.step(DiscreteAction::Forward);
    }
    let close = env.best_goal_distance();
    assert!(close < 70.0, "best distance was {close}");

    // Walking back out does not undo the record.
    for _ in 0..30 {
        let step = env.step(DiscreteAction::TurnLeft);
        if step.is_done() {
            break;
        }
    }
    assert!((env.best_goal_distance() - close).abs() < 1e-3);
}

#[test]
fn goal_observation_carries_distance_and_bearing() {
    let profile = goal_lane();
    let mut env = RobotEnv::new("goal_lane", &profile).unwrap();
    let (obs, _) = env.reset(Some(1), pinned(0.0));
    assert_eq!(obs.len(), 8 + 2 + 3);

    let diag = (640.0_f32 * 640.0 + 480.0 * 480.0).sqrt();
    let dist = obs[10];
    assert!((dist - 80.0 / diag).abs() < 1e-3);

    // Facing the goal head on, the relative bearing collapses to zero.
    let (sin_rel, cos_rel) = (obs[11], obs[12]);
    assert!(sin_rel.abs() < 1e-3);
    assert!((cos_rel - 1.0).abs() < 1e-3);
}

#[test]
fn goalless_profiles_report_unbounded_best_distance() {
    let profile = EnvProfile::from_str(
        r#"{
            "label": "No Goal",
            "world": {"width": 640.0, "height": 480.0, "obstacles": []},
            "sensor": {"ray_count": 8, "ray_length": 160.0, "ray_fov_degrees": 90.0}
        }"#,
    )
    .unwrap();
    let mut env = RobotEnv::new("no_goal", &profile).unwrap();
    env.reset(Some(1), None);
    env.step(DiscreteAction::Forward);
    assert!(env.best_goal_distance().is_infinite());
}

use profile::EnvProfile;
use rl::{ContinuousRobotEnv, Env, ResetOptions, Space};

fn pinned(heading: f32) -> Option<ResetOptions> {
    Some(ResetOptions {
        heading_degrees: Some(heading),
    })
}

fn open_field(extra: &str) -> EnvProfile {
    let json = format!(
        r#"{{
            "label": "Open Field",
            "world": {{"width": 640.0, "height": 480.0, "obstacles": []}},
            "sensor": {{"ray_count": 8, "ray_length": 160.0, "ray_fov_degrees": 90.0}}{extra}
        }}"#
    );
    EnvProfile::from_str(&json).unwrap()
}

#[test]
fn action_space_is_a_unit_box() {
    let profile = open_field("");
    let env = ContinuousRobotEnv::new("open_field", &profile).unwrap();
    match env.action_space() {
        Space::Box { low, high } => {
            assert_eq!(low, vec![-1.0, -1.0]);
            assert_eq!(high, vec![1.0, 1.0]);
        }
        other => panic!("unexpected action space {other:?}"),
    }
}

#[test]
fn fan_ray_count_wins_over_fixed_angle_lists() {
    // A profile can carry both a fixed angle list and a fan count. The
    // continuous env always scans with the fan.
    let narrow = EnvProfile::from_str(
        r#"{
            "label": "Narrow Fan",
            "world": {"width": 640.0, "height": 480.0, "obstacles": []},
            "sensor": {
                "ray_count": 6,
                "ray_length": 160.0,
                "ray_fov_degrees": 90.0,
                "sensor_angles": [0.0, 90.0, 180.0, 270.0]
            }
        }"#,
    )
    .unwrap();
    assert_eq!(narrow.ray_count(), 4);

    let mut env = ContinuousRobotEnv::new("narrow", &narrow).unwrap();
    let (obs, _) = env.reset(Some(1), None);
    assert_eq!(obs.len(), 6 + 2);
}

#[test]
fn full_throttle_drives_straight() {
    let profile = open_field("");
    let mut env = ContinuousRobotEnv::new("open_field", &profile).unwrap();
    env.reset(Some(1), pinned(0.0));

    let step = env.step([1.0, 0.0]);
    assert!(step.info.x > 321.0);
    assert!((step.info.y - 240.0).abs() < 1e-3);
    assert!((step.info.angle_degrees).abs() < 1e-3);
    assert!((0.05..0.15).contains(&step.reward), "reward was {}", step.reward);
}

#[test]
fn steering_sign_matches_the_heading_convention() {
    let profile = open_field("");
    let mut env = ContinuousRobotEnv::new("open_field", &profile).unwrap();
    env.reset(Some(1), pinned(0.0));
    let step = env.step([0.0, 1.0]);
    assert!((step.info.angle_degrees - 12.0).abs() < 1e-3);

    env.reset(Some(1), pinned(0.0));
    let step = env.step([0.0, -1.0]);
    assert!((step.info.angle_degrees - 348.0).abs() < 1e-3);
}

#[test]
fn commands_clip_to_the_unit_range() {
    let profile = open_field("");

    let mut wild = ContinuousRobotEnv::new("open_field", &profile).unwrap();
    wild.reset(Some(3), pinned(0.0));
    let a = wild.step([7.5, 0.0]);

    let mut tame = ContinuousRobotEnv::new("open_field", &profile).unwrap();
    tame.reset(Some(3), pinned(0.0));
    let b = tame.step([1.0, 0.0]);

    assert_eq!(a.info.x, b.info.x);
    assert_eq!(a.reward, b.reward);
}

#[test]
fn first_collision_ends_the_episode() {
    let profile = open_field("");
    let mut env = ContinuousRobotEnv::new("open_field", &profile).unwrap();
    env.reset(Some(1), pinned(0.0));

    let mut ended = None;
    for step_no in 1..=80 {
        let step = env.step([1.0, 0.0]);
        if step.terminated {
            ended = Some((step_no, step));
            break;
        }
    }
    let (step_no, step) = ended.expect("never hit the wall");
    assert!((55..=75).contains(&step_no), "collided at step {step_no}");
    assert!(step.info.collision);
    assert!((step.reward + 50.0).abs() < 1e-3, "reward was {}", step.reward);
}

#[test]
fn idle_episode_truncates_without_completion_bonus() {
    let profile = open_field(r#", "dynamics": {"max_steps": 5}"#);
    let mut env = ContinuousRobotEnv::new("idle", &profile).unwrap();
    env.reset(Some(1), pinned(0.0));

    for _ in 0..4 {
        let step = env.step([0.0, 0.0]);
        assert!(!step.is_done());
    }
    let last = env.step([0.0, 0.0]);
    assert!(last.truncated);
    assert!(!last.terminated);
    assert!(last.reward < 1.0, "no completion bonus expected, got {}", last.reward);
}

#[test]
fn goal_bearing_is_absolute_in_continuous_mode() {
    let profile = EnvProfile::from_str(
        r#"{
            "label": "Goal North",
            "world": {
                "width": 640.0,
                "height": 480.0,
                "obstacles": [],
                "goal": {"x": 320.0, "y": 160.0}
            },
            "sensor": {"ray_count": 8, "ray_length": 160.0, "ray_fov_degrees": 90.0}
        }"#,
    )
    .unwrap();
    let mut env = ContinuousRobotEnv::new("goal_north", &profile).unwrap();

    // The goal sits straight up in world coordinates. However the robot is
    // facing, the bearing channels stay the same.
    let (obs_east, _) = env.reset(Some(1), pinned(0.0));
    let (obs_south, _) = env.reset(Some(1), pinned(90.0));
    assert!((obs_east[11] - obs_south[11]).abs() < 1e-6);
    assert!((obs_east[12] - obs_south[12]).abs() < 1e-6);
    assert!((obs_east[11] - (-1.0)).abs() < 1e-3, "sin of straight-up bearing");
    assert!(obs_east[12].abs() < 1e-3, "cos of straight-up bearing");
}

#[test]
fn seeded_continuous_episodes_replay_exactly() {
    let profile = open_field(
        r#", "dynamics": {"sensor_noise_std": 0.02, "heading_drift_std": 0.3, "speed_noise_std": 0.05}"#,
    );
    let mut a = ContinuousRobotEnv::new("noisy", &profile).unwrap();
    let mut b = ContinuousRobotEnv::new("noisy", &profile).unwrap();

    let (obs_a, _) = a.reset(Some(11), None);
    let (obs_b, _) = b.reset(Some(11), None);
    assert_eq!(obs_a, obs_b);

    for i in 0..30 {
        let action = [0.6, if i % 3 == 0 { 0.4 } else { -0.2 }];
        let sa = a.step(action);
        let sb = b.step(action);
        assert_eq!(sa.observation, sb.observation, "diverged at step {i}");
        assert_eq!(sa.reward, sb.reward);
        if sa.is_done() {
            assert!(sb.is_done());
            break;
        }
    }
}

use profile::EnvProfile;
use rl::{DiscreteAction, Env, ResetOptions, RobotEnv, Space, VisitedGridWrapper};

fn pinned(heading: f32) -> Option<ResetOptions> {
    Some(ResetOptions {
        heading_degrees: Some(heading),
    })
}

fn open_field() -> EnvProfile {
    EnvProfile::from_str(
        r#"{
            "label": "Open Field",
            "world": {"width": 640.0, "height": 480.0, "obstacles": []},
            "sensor": {"ray_count": 8, "ray_length": 160.0, "ray_fov_degrees": 90.0}
        }"#,
    )
    .unwrap()
}

fn wrapped() -> VisitedGridWrapper<RobotEnv> {
    let profile = open_field();
    let env = RobotEnv::new("open_field", &profile).unwrap();
    VisitedGridWrapper::new(env)
}

#[test]
fn observation_gains_one_channel_per_grid_cell() {
    let mut env = wrapped();
    assert_eq!(env.grid_size(), 6);

    let (obs, _) = env.reset(Some(1), None);
    assert_eq!(obs.len(), 8 + 2 + 36);
    assert_eq!(env.observation_space().len(), obs.len());

    match env.observation_space() {
        Space::Box { low, high } => {
            assert_eq!(low.len(), obs.len());
            assert_eq!(high.len(), obs.len());
            assert!(high.iter().all(|&h| (h - 1.0).abs() < 1e-6));
        }
        other => panic!("unexpected observation space {other:?}"),
    }
}

#[test]
fn grid_size_clamps_to_a_usable_minimum() {
    let profile = open_field();
    let env = RobotEnv::new("open_field", &profile).unwrap();
    let wrapper = VisitedGridWrapper::with_grid(env, 1);
    assert_eq!(wrapper.grid_size(), 3);
}

#[test]
fn reset_marks_only_the_start_cell() {
    let mut env = wrapped();
    let (obs, _) = env.reset(Some(1), pinned(0.0));

    let cells = &obs[10..];
    let marked: Vec<usize> = cells
        .iter()
        .enumerate()
        .filter(|(_, &v)| v > 0.5)
        .map(|(i, _)| i)
        .collect();
    // Centre of a 640x480 world falls in cell (3, 3) of the 6x6 grid.
    assert_eq!(marked, vec![3 * 6 + 3]);
}

#[test]
fn new_cells_pay_a_bonus_and_revisits_cost() {
    let profile = open_field();

    let mut plain = RobotEnv::new("open_field", &profile).unwrap();
    plain.reset(Some(1), pinned(0.0));

    let mut wrapped = VisitedGridWrapper::new(RobotEnv::new("open_field", &profile).unwrap());
    wrapped.reset(Some(1), pinned(0.0));

    let mut bonuses = 0;
    let mut penalties = 0;
    for _ in 0..30 {
        let base = plain.step(DiscreteAction::Forward);
        let wide = wrapped.step(DiscreteAction::Forward);
        let diff = wide.reward - base.reward;
        if (diff - 0.02).abs() < 1e-4 {
            bonuses += 1;
        } else if (diff + 0.003).abs() < 1e-4 {
            penalties += 1;
        } else {
            panic!("unexpected reward delta {diff}");
        }
    }
    assert!(bonuses >= 1, "never crossed into a new wrapper cell");
    assert!(penalties >= 20, "revisit cost missing");
}

#[test]
fn second_reset_clears_the_coverage_map() {
    let mut env = wrapped();
    env.reset(Some(1), pinned(0.0));
    for _ in 0..30 {
        env.step(DiscreteAction::Forward);
    }

    let (obs, _) = env.reset(Some(2), pinned(0.0));
    let visited: f32 = obs[10..].iter().sum();
    assert!((visited - 1.0).abs() < 1e-6, "stale coverage survived the reset");
}

#[test]
fn snapshot_passes_through_the_wrapper() {
    let mut env = wrapped();
    env.reset(Some(1), None);
    env.step(DiscreteAction::Forward);

    let snap = env.state();
    assert_eq!(snap.profile, "open_field");
    assert_eq!(snap.current_step, 1);
}

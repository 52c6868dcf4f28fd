use profile::{ControlMode, DriveModel, EnvProfile};
use std::fs;

#[test]
fn parse_office_example() {
    let json = fs::read_to_string("tests/data/office_lite.json").unwrap();
    let p = EnvProfile::from_str(&json).unwrap();
    assert_eq!(p.label, "Office Lite");
    assert_eq!(p.world.obstacles.len(), 2);
    assert_eq!(p.dynamics.max_steps, 400);
    assert_eq!(p.metadata.flat_ground_model, Some(DriveModel::Differential));
    assert!(p.supports(ControlMode::Discrete));
    assert!(!p.supports(ControlMode::Continuous));
}

#[test]
fn world_from_office_example() {
    let json = fs::read_to_string("tests/data/office_lite.json").unwrap();
    let p = EnvProfile::from_str(&json).unwrap();
    let world = p.build_world();
    assert_eq!(world.obstacles().len(), 2);
    assert!((world.robot.speed - 110.0).abs() < 1e-6);
    let goal = world.goal.expect("office profile has a goal");
    assert!((goal.radius - 16.0).abs() < 1e-6);
}

#[test]
fn parse_ring_sensor_angles() {
    let json = fs::read_to_string("tests/data/ring_sensors.json").unwrap();
    let p = EnvProfile::from_str(&json).unwrap();
    assert_eq!(p.ray_count(), 8);
    let angles = p.sensor.sensor_angles.as_ref().unwrap();
    assert!((angles[4] - 180.0).abs() < 1e-6);
    // Defaults kick in for the omitted sections.
    assert!(p.world.obstacles.is_empty());
    assert!((p.robot.radius - 15.0).abs() < 1e-6);
    assert!(!p.dynamics.reverse_enabled);
}

#[test]
fn parse_curriculum_layout_pool() {
    let json = fs::read_to_string("tests/data/curriculum_rooms.json").unwrap();
    let p = EnvProfile::from_str(&json).unwrap();
    let pool = p.layout_pool();
    assert_eq!(pool.len(), 2);
    assert_eq!(pool[0].len(), 1);
    assert_eq!(pool[1].len(), 2);
}

use arena::{cast_rays_at_angles, Goal, Rect, Vec2, World, TICK, WALL_RADIUS};

#[test]
fn robot_crosses_open_arena_without_contact() {
    let mut world = World::new(640.0, 480.0, 20.0, Vec::new(), None);
    world.robot.place(Vec2::new(120.0, 240.0));
    world.robot.heading_degrees = 0.0;

    let mut last_x = world.robot.pos.x;
    for _ in 0..40 {
        world.robot.drive_forward();
        let collided = world.step(TICK);
        assert!(!collided, "open corridor along the center line");
        assert!(world.robot.pos.x > last_x, "forward drive moves +x");
        assert!((world.robot.pos.y - 240.0).abs() < 1e-3);
        last_x = world.robot.pos.x;
    }
}

#[test]
fn wall_stops_the_robot_at_combined_radius() {
    let mut world = World::new(640.0, 480.0, 20.0, Vec::new(), None);
    world.robot.place(Vec2::new(560.0, 240.0));
    world.robot.heading_degrees = 0.0;

    let mut collisions = 0;
    for _ in 0..60 {
        world.robot.drive_forward();
        if world.step(TICK) {
            collisions += 1;
        }
    }
    assert!(collisions > 0, "driving into the right wall must collide");
    let limit = 620.0 - world.robot.radius - WALL_RADIUS;
    assert!(
        world.robot.pos.x <= limit + 1e-3,
        "push-out holds the body at the wall, x = {}",
        world.robot.pos.x
    );
}

#[test]
fn obstacle_blocks_the_lane() {
    let obstacles = vec![Rect::new(440.0, 260.0, 60.0, 140.0)];
    let mut world = World::new(640.0, 480.0, 20.0, obstacles, None);
    world.robot.place(Vec2::new(320.0, 330.0));
    world.robot.heading_degrees = 0.0;

    let mut collided = false;
    for _ in 0..60 {
        world.robot.drive_forward();
        if world.step(TICK) {
            collided = true;
            break;
        }
    }
    assert!(collided, "lane at y = 330 runs into the obstacle");
    assert!(
        world.robot.pos.x <= 440.0 - world.robot.radius + 1e-3,
        "robot held at the obstacle face"
    );
}

#[test]
fn forward_ray_shrinks_while_approaching_a_wall() {
    let mut world = World::new(640.0, 480.0, 20.0, Vec::new(), None);
    world.robot.place(Vec2::new(320.0, 240.0));
    world.robot.heading_degrees = 0.0;

    let mut previous = cast_rays_at_angles(&world, &[0.0], 140.0)[0];
    assert!((previous - 1.0).abs() < 1e-6, "wall starts out of range");

    let mut saw_wall = false;
    for _ in 0..60 {
        world.robot.drive_forward();
        world.step(TICK);
        let reading = cast_rays_at_angles(&world, &[0.0], 140.0)[0];
        assert!(reading <= previous + 1e-6, "approach never increases range");
        if reading < 1.0 {
            saw_wall = true;
        }
        previous = reading;
    }
    assert!(saw_wall, "wall enters sensor range during the approach");
    assert!(previous < 0.5, "final reading well inside the ray length");
}

#[test]
fn straight_drive_reaches_a_goal_eighty_units_out() {
    let goal = Goal::new(Vec2::new(400.0, 240.0), 18.0);
    let mut world = World::new(640.0, 480.0, 20.0, Vec::new(), Some(goal));
    world.robot.place(Vec2::new(320.0, 240.0));
    world.robot.heading_degrees = 0.0;
    assert!(!world.check_goal_reached());

    let mut reached_at = None;
    for step in 0..30 {
        world.robot.drive_forward();
        world.step(TICK);
        if world.check_goal_reached() {
            reached_at = Some(step);
            break;
        }
    }
    let reached_at = reached_at.expect("88 units of travel covers the 47 unit gap");
    assert!(reached_at >= 5, "overlap needs several ticks of travel");
    assert!(reached_at <= 15, "reached within a handful of ticks");
}

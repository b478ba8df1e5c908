//! Mechanical networks driven through the `System` API.

use tlm_components::Severity;
use tlm_sim::{SimError, System};

const DT: f64 = 1e-3;

#[test]
fn force_on_anchored_mass() {
    let mut sys = System::new();
    let push = sys.add_component("ForceSource", "push").unwrap();
    let body = sys.add_component("TranslationalMass", "body").unwrap();
    let wall = sys.add_component("FixedAnchor", "wall").unwrap();
    sys.connect(push, "P1", body, "P1").unwrap();
    sys.connect(body, "P2", wall, "P1").unwrap();

    sys.set_parameter(push, "F", 50.0).unwrap();
    sys.set_parameter(body, "m", 100.0).unwrap();
    sys.set_parameter(body, "B", 10.0).unwrap();
    sys.set_parameter(body, "x_min", 0.0).unwrap();
    sys.set_parameter(body, "x_max", 1.0).unwrap();
    sys.set_node_value(body, "P2", "Position", 0.25).unwrap();

    sys.initialize(DT, 0.0).expect("network should initialize");
    assert_eq!(sys.node_value(body, "P2", "Velocity").unwrap(), 0.0);
    assert_eq!(sys.node_value(body, "P2", "Position").unwrap(), 0.25);

    sys.step_all().unwrap();
    let v = sys.node_value(body, "P2", "Velocity").unwrap();
    let expected = 50.0 / 100.0 * DT;
    assert!(v > 0.0, "mass should move away from the anchor");
    assert!((v - expected).abs() < 1e-3 * expected, "v = {v}");
    assert_eq!(sys.node_value(body, "P1", "Velocity").unwrap(), -v);
    assert!(sys.diagnostics().is_empty());
}

#[test]
fn anchor_force_follows_its_wave() {
    let mut sys = System::new();
    let push = sys.add_component("ForceSource", "push").unwrap();
    let body = sys.add_component("TranslationalMass", "body").unwrap();
    let spring = sys.add_component("TranslationalSpring", "spring").unwrap();
    let mass2 = sys.add_component("TranslationalMass", "mass2").unwrap();
    let wall = sys.add_component("FixedAnchor", "wall").unwrap();
    sys.connect(push, "P1", body, "P1").unwrap();
    sys.connect(body, "P2", spring, "P1").unwrap();
    sys.connect(spring, "P2", mass2, "P1").unwrap();
    sys.connect(mass2, "P2", wall, "P1").unwrap();
    let speed = sys.add_component("Gain", "anchor_speed").unwrap();
    let reaction = sys.add_component("Gain", "anchor_reaction").unwrap();
    sys.connect(wall, "v", speed, "in").unwrap();
    sys.connect(wall, "F", reaction, "in").unwrap();
    sys.set_parameter(push, "F", 10.0).unwrap();
    sys.set_node_value(wall, "P1", "Force", 5.0).unwrap();

    sys.initialize(DT, 0.0).unwrap();
    for _ in 0..200 {
        sys.step_all().unwrap();
        let force = sys.node_value(wall, "P1", "Force").unwrap();
        let wave = sys.node_value(wall, "P1", "WaveVariable").unwrap();
        assert_eq!(force, 5.0);
        assert_eq!(force, wave);
        // The anchor point never moves, while the body next to it does.
        assert_eq!(sys.node_value(wall, "v", "Value").unwrap(), 0.0);
        assert_eq!(sys.node_value(wall, "F", "Value").unwrap(), force);
    }
    assert_ne!(sys.node_value(mass2, "P2", "Velocity").unwrap(), 0.0);
}

#[test]
fn spring_between_masses_transmits_force() {
    let mut sys = System::new();
    let push = sys.add_component("ForceSource", "push").unwrap();
    let first = sys.add_component("TranslationalMass", "first").unwrap();
    let spring = sys.add_component("TranslationalSpring", "spring").unwrap();
    let second = sys.add_component("TranslationalMass", "second").unwrap();
    let free = sys.add_component("ForceSource", "free").unwrap();
    sys.connect(push, "P1", first, "P1").unwrap();
    sys.connect(first, "P2", spring, "P1").unwrap();
    sys.connect(spring, "P2", second, "P1").unwrap();
    sys.connect(second, "P2", free, "P1").unwrap();
    sys.set_parameter(push, "F", 100.0).unwrap();
    for body in [first, second] {
        sys.set_parameter(body, "m", 1.0).unwrap();
    }

    sys.initialize(DT, 0.0).unwrap();
    let report = sys.step_range(500).unwrap();
    assert!(report.is_complete());

    // The trailing mass is only reached through the spring.
    assert!(sys.node_value(second, "P2", "Velocity").unwrap() > 0.0);
    assert!(sys.node_value(spring, "P1", "Force").unwrap() > 0.0);
}

fn hub_system() -> (System, tlm_core::CompId) {
    let mut sys = System::new();
    let hub = sys.add_component("MultiPortTranslationalMass", "hub").unwrap();
    let push = sys.add_component("ForceSource", "push").unwrap();
    sys.connect(push, "P1", hub, "P1").unwrap();
    for i in 0..2 {
        let spring = sys
            .add_component("TranslationalSpring", &format!("spring{i}"))
            .unwrap();
        let wall = sys.add_component("FixedAnchor", &format!("wall{i}")).unwrap();
        sys.connect(hub, "P2", spring, "P1").unwrap();
        sys.connect(spring, "P2", wall, "P1").unwrap();
    }
    sys.set_parameter(push, "F", 20.0).unwrap();
    (sys, hub)
}

#[test]
fn multiport_velocity_mismatch_only_warns() {
    let (mut sys, hub) = hub_system();
    sys.set_node_value_at(hub, "P1", 0, "Velocity", -1.0).unwrap();
    sys.set_node_value_at(hub, "P2", 0, "Velocity", 1.0).unwrap();
    sys.set_node_value_at(hub, "P2", 1, "Velocity", 1.5).unwrap();

    sys.initialize(DT, 0.0).expect("mismatch on P2 is not fatal");
    let warnings: Vec<_> = sys
        .diagnostics()
        .into_iter()
        .filter(|d| d.severity == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].component, "hub");

    let report = sys.step_range(100).unwrap();
    assert!(report.is_complete());
    // Both connections now carry the single body velocity.
    let a = sys.node_value_at(hub, "P2", 0, "Velocity").unwrap();
    let b = sys.node_value_at(hub, "P2", 1, "Velocity").unwrap();
    assert_eq!(a, b);
}

#[test]
fn multiport_opposite_side_mismatch_only_warns() {
    let (mut sys, hub) = hub_system();
    sys.set_node_value_at(hub, "P1", 0, "Velocity", 0.5).unwrap();
    sys.set_node_value_at(hub, "P2", 0, "Velocity", 1.0).unwrap();
    sys.set_node_value_at(hub, "P2", 1, "Velocity", 1.0).unwrap();

    sys.initialize(DT, 0.0).unwrap();
    assert!(
        sys.diagnostics()
            .iter()
            .all(|d| d.severity <= Severity::Warning)
    );
    assert!(sys.step_range(10).unwrap().is_complete());
}

#[test]
fn multiport_mismatch_on_driven_side_fails_initialize() {
    let mut sys = System::new();
    let hub = sys.add_component("MultiPortTranslationalMass", "hub").unwrap();
    let wall = sys.add_component("FixedAnchor", "wall").unwrap();
    sys.connect(hub, "P2", wall, "P1").unwrap();
    for i in 0..2 {
        let push = sys.add_component("ForceSource", &format!("push{i}")).unwrap();
        sys.connect(push, "P1", hub, "P1").unwrap();
    }
    sys.set_node_value_at(hub, "P1", 0, "Velocity", -1.0).unwrap();
    sys.set_node_value_at(hub, "P1", 1, "Velocity", -1.5).unwrap();

    match sys.initialize(DT, 0.0) {
        Err(SimError::InitializationFailed { component, .. }) => assert_eq!(component, "hub"),
        other => panic!("expected initialization failure, got {other:?}"),
    }
    assert!(!sys.is_initialized());
}

#[test]
fn wall_clamps_on_crossing_step() {
    let mut sys = System::new();
    let push = sys.add_component("ForceSource", "push").unwrap();
    let stop = sys.add_component("FreeLengthWall", "stop").unwrap();
    sys.connect(push, "P1", stop, "P1").unwrap();
    sys.set_parameter(stop, "B", 0.001).unwrap();
    sys.set_parameter(push, "F", 100.0).unwrap();
    sys.set_node_value(stop, "P1", "Position", 0.01).unwrap();

    sys.initialize(DT, 0.0).unwrap();
    let mut crossed = false;
    for _ in 0..1000 {
        sys.step_all().unwrap();
        let x = sys.node_value(stop, "P1", "Position").unwrap();
        let v = sys.node_value(stop, "P1", "Velocity").unwrap();
        assert!(x >= 0.0, "position went through the wall: {x}");
        if x == 0.0 && !crossed {
            crossed = true;
            assert_eq!(v, 0.0);
        }
        // Zero source impedance leaves no correction term.
        assert_eq!(sys.node_value(stop, "P1", "Force").unwrap(), 100.0);
    }
    assert!(crossed);
    assert_eq!(sys.node_value(stop, "P1", "Position").unwrap(), 0.0);
    assert_eq!(sys.node_value(stop, "P1", "Velocity").unwrap(), 0.0);
}

#[test]
fn velocity_source_moves_mass_at_imposed_speed() {
    let mut sys = System::new();
    let drive = sys.add_component("VelocitySource", "drive").unwrap();
    let spring = sys.add_component("TranslationalSpring", "spring").unwrap();
    let body = sys.add_component("TranslationalMass", "body").unwrap();
    let wall = sys.add_component("FixedAnchor", "wall").unwrap();
    sys.connect(drive, "P1", spring, "P1").unwrap();
    sys.connect(spring, "P2", body, "P1").unwrap();
    sys.connect(body, "P2", wall, "P1").unwrap();
    sys.set_parameter(drive, "v", 0.1).unwrap();

    sys.initialize(DT, 0.0).unwrap();
    sys.step_range(100).unwrap();
    let x = sys.node_value(drive, "P1", "Position").unwrap();
    assert!((x - 0.01).abs() < 1e-9, "x = {x}");
    assert_eq!(sys.node_value(drive, "P1", "Velocity").unwrap(), 0.1);
    // Spring impedance k·dt = 1 N s/m.
    let wave = sys.node_value(drive, "P1", "WaveVariable").unwrap();
    assert!((wave - 0.1).abs() < 1e-12, "c = {wave}");
}

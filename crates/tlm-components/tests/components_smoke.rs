//! Integration tests for tlm-components driving models through the public API.

use tlm_components::{Clock, ComponentError, ComponentRegistry, NullSink, ParameterKind};
use tlm_core::{TlmError, Unit};
use tlm_core::units::{bar, kg, n};
use tlm_graph::{NodeArena, NodeType, PortBinding, mechanical};
use uom::si::{force::newton, mass::kilogram, pressure::pascal};

#[test]
fn parameters_carry_units() {
    let reg = ComponentRegistry::with_standard_library();
    let mass = reg.create("TranslationalMass", "m").unwrap();
    assert_eq!(mass.parameter("m").unwrap().unit, Unit::Kilogram);
    assert_eq!(mass.parameter("B").unwrap().unit.symbol(), "Ns/m");

    let source = reg.create("ForceSource", "f").unwrap();
    let force = source.parameter("F").unwrap();
    assert!(matches!(force.kind, ParameterKind::Input { .. }));
    // The input variable brings its own optional signal port.
    let port = &source.port_specs()[source.port_index("F").unwrap()];
    assert_eq!(port.node_type, NodeType::Signal);
    assert!(!port.is_required());
}

#[test]
fn typed_quantities_set_parameters() {
    let reg = ComponentRegistry::with_standard_library();
    let mut mass = reg.create("TranslationalMass", "m").unwrap();
    mass.set_parameter("m", kg(2.5).get::<kilogram>()).unwrap();
    mass.set_parameter("f_s", n(12.0).get::<newton>()).unwrap();
    assert_eq!(mass.parameter("m").unwrap().value, 2.5);

    let mut source = reg.create("PressureSource", "p").unwrap();
    source.set_parameter("p", bar(200.0).get::<pascal>()).unwrap();
    assert!((source.parameter("p").unwrap().value - 2e7).abs() < 1e-6);

    source.set_quantity("p", bar(50.0)).unwrap();
    assert!((source.parameter("p").unwrap().value - 5e6).abs() < 1e-6);
    mass.set_quantity("m", kg(4.0)).unwrap();
    assert_eq!(mass.parameter("m").unwrap().value, 4.0);
}

#[test]
fn quantity_in_the_wrong_unit_is_rejected() {
    let reg = ComponentRegistry::with_standard_library();
    let mut mass = reg.create("TranslationalMass", "m").unwrap();
    let err = mass.set_quantity("m", n(3.0)).unwrap_err();
    assert!(matches!(err, ComponentError::Core(TlmError::UnitMismatch { .. })));
    assert_eq!(mass.parameter("m").unwrap().value, 100.0);
    assert!(matches!(
        mass.set_quantity("mass", kg(1.0)),
        Err(ComponentError::UnknownParameter { .. })
    ));
}

#[test]
fn force_source_drives_mass_through_shared_node() {
    let reg = ComponentRegistry::with_standard_library();
    let mut source = reg.create("ForceSource", "push").unwrap();
    let mut mass = reg.create("TranslationalMass", "body").unwrap();
    let mut anchor = reg.create("FixedAnchor", "wall").unwrap();
    source.set_parameter("F", 50.0).unwrap();

    let mut arena = NodeArena::new();
    let left = arena.allocate(NodeType::Mechanical);
    let right = arena.allocate(NodeType::Mechanical);
    let bound = |node| PortBinding {
        node_type: NodeType::Mechanical,
        nodes: vec![node],
    };
    source
        .bind(vec![bound(left), PortBinding::unbound(NodeType::Signal)])
        .unwrap();
    mass.bind(vec![bound(left), bound(right)]).unwrap();
    anchor
        .bind(vec![
            bound(right),
            PortBinding::unbound(NodeType::Signal),
            PortBinding::unbound(NodeType::Signal),
        ])
        .unwrap();

    let dt = 1e-3;
    let sink = NullSink;
    for c in [&mut source, &mut anchor, &mut mass] {
        c.initialize(&arena, Clock::new(0.0, dt, 0), &sink);
    }
    assert_eq!(arena.value(right, mechanical::VELOCITY), Some(0.0));

    for step in 0..100u64 {
        let clock = Clock::new((step + 1) as f64 * dt, dt, step);
        source.simulate(&arena, clock, &sink);
        anchor.simulate(&arena, clock, &sink);
        mass.simulate(&arena, clock, &sink);
        // The anchor presents no impedance, so its force is its wave variable.
        assert_eq!(
            arena.value(right, mechanical::FORCE),
            arena.value(right, mechanical::WAVE_VARIABLE)
        );
    }
    let v = arena.value(right, mechanical::VELOCITY).unwrap();
    // 50 N on 100 kg with 10 N·s/m damping for 0.1 s.
    let exact = 5.0 * (1.0 - (-0.1_f64 * 0.1).exp());
    assert!((v - exact).abs() < 1e-6, "v = {v}, expected {exact}");
    assert_eq!(arena.value(left, mechanical::VELOCITY), Some(-v));
}

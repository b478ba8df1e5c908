//! Built-in demonstration models.

use clap::ValueEnum;
use tlm_core::ProbeId;
use tlm_core::units::{kg, m, m3};
use tlm_sim::{SimResult, System};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DemoKind {
    /// Two masses and a spring pushed by a stepped force against an anchor
    MassSpring,
    /// Pressure step through a line of orifices and volumes into a tank
    HydraulicLine,
}

/// A ready-to-run system with the probes to print.
pub struct Demo {
    pub system: System,
    pub columns: Vec<(String, ProbeId)>,
}

impl Demo {
    fn probe(&mut self, label: &str, comp: &str, port: &str, slot: &str) -> SimResult<()> {
        let id = self.system.component_id(comp)?;
        let probe = self.system.add_probe(id, port, slot)?;
        self.columns.push((label.to_string(), probe));
        Ok(())
    }
}

pub fn build(kind: DemoKind) -> SimResult<Demo> {
    let mut demo = Demo {
        system: System::new(),
        columns: Vec::new(),
    };
    match kind {
        DemoKind::MassSpring => mass_spring(&mut demo)?,
        DemoKind::HydraulicLine => hydraulic_line(&mut demo)?,
    }
    Ok(demo)
}

fn mass_spring(demo: &mut Demo) -> SimResult<()> {
    let sys = &mut demo.system;
    let step = sys.add_component("Step", "force_step")?;
    let push = sys.add_component("ForceSource", "push")?;
    let cart = sys.add_component("TranslationalMass", "cart")?;
    let spring = sys.add_component("TranslationalSpring", "spring")?;
    let load = sys.add_component("TranslationalMass", "load")?;
    let wall = sys.add_component("FixedAnchor", "wall")?;

    sys.connect(step, "out", push, "F")?;
    sys.connect(push, "P1", cart, "P1")?;
    sys.connect(cart, "P2", spring, "P1")?;
    sys.connect(spring, "P2", load, "P1")?;
    sys.connect(load, "P2", wall, "P1")?;

    sys.set_parameter(step, "y_A", 200.0)?;
    sys.set_parameter(step, "t_step", 0.1)?;
    sys.set_quantity(cart, "m", kg(10.0))?;
    sys.set_parameter(cart, "B", 5.0)?;
    sys.set_quantity(load, "m", kg(20.0))?;
    sys.set_quantity(load, "x_max", m(0.05))?;
    sys.set_parameter(spring, "k", 5e3)?;

    demo.probe("cart_v", "cart", "P2", "Velocity")?;
    demo.probe("cart_x", "cart", "P2", "Position")?;
    demo.probe("spring_f", "spring", "P1", "Force")?;
    demo.probe("load_v", "load", "P2", "Velocity")?;
    demo.probe("load_x", "load", "P2", "Position")?;
    Ok(())
}

fn hydraulic_line(demo: &mut Demo) -> SimResult<()> {
    const SEGMENTS: usize = 3;

    let sys = &mut demo.system;
    let step = sys.add_component("Step", "pressure_step")?;
    let supply = sys.add_component("PressureSource", "supply")?;
    sys.connect(step, "out", supply, "p")?;
    sys.set_parameter(step, "y_0", 1e5)?;
    sys.set_parameter(step, "y_A", 1e7)?;
    sys.set_parameter(step, "t_step", 0.01)?;

    let (mut upstream, mut port) = (supply, "P1");
    for i in 0..SEGMENTS {
        let orifice = sys.add_component("LaminarOrifice", &format!("orifice{i}"))?;
        let volume = sys.add_component("HydraulicVolume", &format!("volume{i}"))?;
        sys.connect(upstream, port, orifice, "P1")?;
        sys.connect(orifice, "P2", volume, "P1")?;
        sys.set_quantity(volume, "V", m3(1e-6))?;
        (upstream, port) = (volume, "P2");
    }
    let drain = sys.add_component("LaminarOrifice", "drain")?;
    let tank = sys.add_component("PressureSource", "tank")?;
    sys.connect(upstream, port, drain, "P1")?;
    sys.connect(drain, "P2", tank, "P1")?;

    for i in 0..SEGMENTS {
        let volume = format!("volume{i}");
        demo.probe(&format!("p{i}"), &volume, "P1", "Pressure")?;
    }
    demo.probe("q_drain", "drain", "P2", "Flow")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlm_sim::SimConfig;

    #[test]
    fn every_demo_runs() {
        for kind in DemoKind::value_variants() {
            let mut demo = build(*kind).unwrap();
            demo.system
                .initialize_with(SimConfig::new(1e-4).with_log_every(10))
                .unwrap();
            let report = demo.system.step_range(2000).unwrap();
            assert!(report.is_complete(), "{kind:?}: {:?}", report.outcome);
            for (label, probe) in &demo.columns {
                let trace = demo.system.trace(*probe).unwrap();
                assert_eq!(trace.len(), 201, "{label}");
                assert!(trace.iter().all(|v| v.is_finite()), "{label}");
            }
        }
    }

    #[test]
    fn mass_spring_respects_load_limit() {
        let mut demo = build(DemoKind::MassSpring).unwrap();
        demo.system.initialize(1e-3, 0.0).unwrap();
        demo.system.step_range(2000).unwrap();
        let load = demo.system.component_id("load").unwrap();
        let x = demo.system.node_value(load, "P2", "Position").unwrap();
        assert!(x <= 0.05);
    }
}

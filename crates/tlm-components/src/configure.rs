//! Declaration of ports and parameters.

use tlm_core::Unit;
use tlm_graph::{NodeType, PortSpec};

use crate::parameter::{ParamIdx, Parameter, ParameterKind, ParameterSet};

/// Handle to a port, returned by the configurator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PortIdx(pub(crate) usize);

impl PortIdx {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Collects the ports and parameters a component declares in `configure`.
#[derive(Debug, Default)]
pub struct Configurator {
    ports: Vec<PortSpec>,
    params: ParameterSet,
}

impl Configurator {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_port(&mut self, spec: PortSpec) -> PortIdx {
        self.ports.push(spec);
        PortIdx(self.ports.len() - 1)
    }

    /// Required power port with exactly one connection.
    pub fn power_port(&mut self, name: &'static str, node_type: NodeType) -> PortIdx {
        self.add_port(PortSpec::power(name, node_type))
    }

    /// Required power port accepting any number of connections.
    pub fn multi_power_port(&mut self, name: &'static str, node_type: NodeType) -> PortIdx {
        self.add_port(PortSpec::power(name, node_type).multi())
    }

    /// Required read port.
    pub fn read_port(&mut self, name: &'static str, node_type: NodeType) -> PortIdx {
        self.add_port(PortSpec::read(name, node_type))
    }

    pub fn constant(
        &mut self,
        name: &'static str,
        description: &'static str,
        unit: Unit,
        default: f64,
    ) -> ParamIdx {
        self.params.push(Parameter {
            name,
            description,
            unit,
            default,
            value: default,
            kind: ParameterKind::Constant,
        })
    }

    /// Value taken from an optional signal port of the same name, falling
    /// back to the parameter when the port is left open.
    pub fn input_variable(
        &mut self,
        name: &'static str,
        description: &'static str,
        unit: Unit,
        default: f64,
    ) -> ParamIdx {
        let port = self.add_port(
            PortSpec::read(name, NodeType::Signal)
                .optional()
                .with_description(description),
        );
        self.params.push(Parameter {
            name,
            description,
            unit,
            default,
            value: default,
            kind: ParameterKind::Input { port: port.0 },
        })
    }

    /// Value written every step to an optional signal port of the same name.
    pub fn output_variable(
        &mut self,
        name: &'static str,
        description: &'static str,
        unit: Unit,
    ) -> ParamIdx {
        let port = self.add_port(PortSpec::write(name).with_description(description));
        self.params.push(Parameter {
            name,
            description,
            unit,
            default: 0.0,
            value: 0.0,
            kind: ParameterKind::Output { port: port.0 },
        })
    }

    pub fn finish(self) -> (Vec<PortSpec>, ParameterSet) {
        (self.ports, self.params)
    }
}

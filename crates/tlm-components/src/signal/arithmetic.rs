use tlm_core::Unit;
use tlm_graph::Role;

use crate::behavior::Behavior;
use crate::configure::Configurator;
use crate::context::SimContext;
use crate::parameter::ParamIdx;

#[derive(Clone, Debug, Default)]
pub struct Gain {
    input: ParamIdx,
    gain: ParamIdx,
    out: ParamIdx,
}

impl Behavior for Gain {
    fn role(&self) -> Role {
        Role::Signal
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.input = cfg.input_variable("in", "Input", Unit::Dimensionless, 0.0);
        self.gain = cfg.constant("k", "Gain", Unit::Dimensionless, 1.0);
        self.out = cfg.output_variable("out", "Output", Unit::Dimensionless);
    }

    fn initialize(&mut self, ctx: &SimContext<'_>) {
        self.simulate_one_timestep(ctx);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        ctx.set_output(self.out, ctx.value(self.gain) * ctx.value(self.input));
    }
}

/// Two-input block; `sign` selects sum or difference.
#[derive(Clone, Debug)]
struct Binary {
    in1: ParamIdx,
    in2: ParamIdx,
    out: ParamIdx,
    sign: f64,
}

impl Binary {
    fn new(sign: f64) -> Self {
        Self {
            in1: ParamIdx::default(),
            in2: ParamIdx::default(),
            out: ParamIdx::default(),
            sign,
        }
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.in1 = cfg.input_variable("in1", "First input", Unit::Dimensionless, 0.0);
        self.in2 = cfg.input_variable("in2", "Second input", Unit::Dimensionless, 0.0);
        self.out = cfg.output_variable("out", "Output", Unit::Dimensionless);
    }

    fn simulate(&self, ctx: &SimContext<'_>) {
        let y = ctx.value(self.in1) + self.sign * ctx.value(self.in2);
        ctx.set_output(self.out, y);
    }
}

/// `in1 + in2`.
#[derive(Clone, Debug)]
pub struct Add(Binary);

impl Default for Add {
    fn default() -> Self {
        Self(Binary::new(1.0))
    }
}

impl Behavior for Add {
    fn role(&self) -> Role {
        Role::Signal
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.0.configure(cfg);
    }

    fn initialize(&mut self, ctx: &SimContext<'_>) {
        self.0.simulate(ctx);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        self.0.simulate(ctx);
    }
}

/// `in1 - in2`.
#[derive(Clone, Debug)]
pub struct Subtract(Binary);

impl Default for Subtract {
    fn default() -> Self {
        Self(Binary::new(-1.0))
    }
}

impl Behavior for Subtract {
    fn role(&self) -> Role {
        Role::Signal
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.0.configure(cfg);
    }

    fn initialize(&mut self, ctx: &SimContext<'_>) {
        self.0.simulate(ctx);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        self.0.simulate(ctx);
    }
}

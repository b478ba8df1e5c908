use core::f64::consts::TAU;

use tlm_core::Unit;
use tlm_graph::Role;

use crate::behavior::Behavior;
use crate::configure::Configurator;
use crate::context::SimContext;
use crate::parameter::ParamIdx;

#[derive(Clone, Debug, Default)]
pub struct Constant {
    value: ParamIdx,
    out: ParamIdx,
}

impl Behavior for Constant {
    fn role(&self) -> Role {
        Role::Signal
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.value = cfg.constant("y", "Value", Unit::Dimensionless, 1.0);
        self.out = cfg.output_variable("out", "Output", Unit::Dimensionless);
    }

    fn initialize(&mut self, ctx: &SimContext<'_>) {
        self.simulate_one_timestep(ctx);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        ctx.set_output(self.out, ctx.value(self.value));
    }
}

/// `y_0` before `t_step`, `y_0 + y_A` from then on.
#[derive(Clone, Debug, Default)]
pub struct Step {
    base: ParamIdx,
    amplitude: ParamIdx,
    step_time: ParamIdx,
    out: ParamIdx,
}

impl Behavior for Step {
    fn role(&self) -> Role {
        Role::Signal
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.base = cfg.constant("y_0", "Base value", Unit::Dimensionless, 0.0);
        self.amplitude = cfg.constant("y_A", "Step height", Unit::Dimensionless, 1.0);
        self.step_time = cfg.constant("t_step", "Step time", Unit::Second, 1.0);
        self.out = cfg.output_variable("out", "Output", Unit::Dimensionless);
    }

    fn initialize(&mut self, ctx: &SimContext<'_>) {
        self.simulate_one_timestep(ctx);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        let mut y = ctx.value(self.base);
        if ctx.time() >= ctx.value(self.step_time) {
            y += ctx.value(self.amplitude);
        }
        ctx.set_output(self.out, y);
    }
}

/// `y_offset + y_A·sin(2π·f·t + phi)`.
#[derive(Clone, Debug, Default)]
pub struct Sine {
    frequency: ParamIdx,
    amplitude: ParamIdx,
    offset: ParamIdx,
    phase: ParamIdx,
    out: ParamIdx,
}

impl Behavior for Sine {
    fn role(&self) -> Role {
        Role::Signal
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.frequency = cfg.input_variable("f", "Frequency", Unit::Hertz, 1.0);
        self.amplitude = cfg.input_variable("y_A", "Amplitude", Unit::Dimensionless, 1.0);
        self.offset = cfg.constant("y_offset", "Offset", Unit::Dimensionless, 0.0);
        self.phase = cfg.constant("phi", "Phase", Unit::Dimensionless, 0.0);
        self.out = cfg.output_variable("out", "Output", Unit::Dimensionless);
    }

    fn initialize(&mut self, ctx: &SimContext<'_>) {
        self.simulate_one_timestep(ctx);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        let angle = TAU * ctx.value(self.frequency) * ctx.time() + ctx.value(self.phase);
        let y = ctx.value(self.offset) + ctx.value(self.amplitude) * angle.sin();
        ctx.set_output(self.out, y);
    }
}

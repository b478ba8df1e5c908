use tlm_core::Unit;
use tlm_graph::Role;
use tlm_numerics::FirstOrderTransferFunction;

use crate::behavior::Behavior;
use crate::configure::Configurator;
use crate::context::SimContext;
use crate::parameter::ParamIdx;

/// Low-pass `1 / (s/w_c + 1)` with output limits.
#[derive(Clone, Debug, Default)]
pub struct FirstOrderFilter {
    input: ParamIdx,
    cutoff: ParamIdx,
    y_min: ParamIdx,
    y_max: ParamIdx,
    out: ParamIdx,
    filter: Option<FirstOrderTransferFunction>,
}

impl Behavior for FirstOrderFilter {
    fn role(&self) -> Role {
        Role::Signal
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.input = cfg.input_variable("in", "Input", Unit::Dimensionless, 0.0);
        self.cutoff = cfg.constant("w_c", "Break frequency", Unit::RadianPerSecond, 100.0);
        self.y_min = cfg.constant("y_min", "Lower output limit", Unit::Dimensionless, -1e300);
        self.y_max = cfg.constant("y_max", "Upper output limit", Unit::Dimensionless, 1e300);
        self.out = cfg.output_variable("out", "Output", Unit::Dimensionless);
    }

    fn initialize(&mut self, ctx: &SimContext<'_>) {
        let w_c = ctx.value(self.cutoff);
        if w_c <= 0.0 {
            ctx.stop_simulation(format!("Break frequency must be positive, got {w_c}"));
            return;
        }
        let filter = FirstOrderTransferFunction::new([0.0, 1.0], [1.0 / w_c, 1.0], ctx.timestep())
            .with_limits(ctx.value(self.y_min), ctx.value(self.y_max));
        let mut filter = match filter {
            Ok(f) => f,
            Err(e) => {
                ctx.stop_simulation(e.to_string());
                return;
            }
        };
        let u = ctx.value(self.input);
        filter.initialize_values(u, u);
        ctx.set_output(self.out, filter.value());
        self.filter = Some(filter);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        let u = ctx.value(self.input);
        if let Some(filter) = self.filter.as_mut() {
            ctx.set_output(self.out, filter.update(u));
        }
    }
}

//! The contract every component model implements.

use tlm_graph::Role;

use crate::configure::Configurator;
use crate::context::SimContext;

/// Lifecycle hooks of a component model.
///
/// `configure` runs once when the component is created. `initialize` runs in
/// schedule order before the first step and must leave every owned output
/// slot consistent with the start values. `simulate_one_timestep` must read
/// only its own ports and the clock; retained state is restored by the next
/// `initialize`.
pub trait Behavior: Send {
    fn role(&self) -> Role;

    fn configure(&mut self, cfg: &mut Configurator);

    fn initialize(&mut self, ctx: &SimContext<'_>);

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>);

    fn finalize(&mut self) {}
}

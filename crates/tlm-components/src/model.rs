//! Closed set of built-in component models.

use tlm_graph::Role;

use crate::behavior::Behavior;
use crate::configure::Configurator;
use crate::context::SimContext;
use crate::hydraulic::{FlowSource, HydraulicVolume, LaminarOrifice, PressureSource};
use crate::mechanical::{
    FixedAnchor, ForceSource, FreeLengthWall, MultiPortTranslationalMass, TranslationalMass,
    TranslationalSpring, VelocitySource,
};
use crate::signal::{
    Add, Constant, FirstOrderFilter, Gain, NodeSensor, Sine, Step, Subtract,
};

macro_rules! component_models {
    ($($variant:ident($ty:ty) = $ctor:expr => $type_name:literal, $description:literal;)*) => {
        /// Every built-in model. Dispatch is a plain `match`, so the step
        /// loop never goes through a vtable.
        #[derive(Debug, Clone)]
        pub enum ComponentModel {
            $($variant($ty),)*
        }

        impl ComponentModel {
            pub fn type_name(&self) -> &'static str {
                match self {
                    $(ComponentModel::$variant(_) => $type_name,)*
                }
            }
        }

        impl Behavior for ComponentModel {
            fn role(&self) -> Role {
                match self {
                    $(ComponentModel::$variant(m) => m.role(),)*
                }
            }

            fn configure(&mut self, cfg: &mut Configurator) {
                match self {
                    $(ComponentModel::$variant(m) => m.configure(cfg),)*
                }
            }

            fn initialize(&mut self, ctx: &SimContext<'_>) {
                match self {
                    $(ComponentModel::$variant(m) => m.initialize(ctx),)*
                }
            }

            #[inline]
            fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
                match self {
                    $(ComponentModel::$variant(m) => m.simulate_one_timestep(ctx),)*
                }
            }

            fn finalize(&mut self) {
                match self {
                    $(ComponentModel::$variant(m) => m.finalize(),)*
                }
            }
        }

        /// Type name, description and constructor of every built-in model.
        pub(crate) const STANDARD_LIBRARY: &[(&str, &str, fn() -> ComponentModel)] = &[
            $(($type_name, $description, || ComponentModel::$variant($ctor)),)*
        ];
    };
}

component_models! {
    TranslationalMass(TranslationalMass) = TranslationalMass::default()
        => "TranslationalMass", "Mass with viscous and Coulomb friction and end stops";
    MultiPortTranslationalMass(MultiPortTranslationalMass) = MultiPortTranslationalMass::default()
        => "MultiPortTranslationalMass", "Mass with any number of connections on each side";
    TranslationalSpring(TranslationalSpring) = TranslationalSpring::default()
        => "TranslationalSpring", "Linear spring modelled as a transmission line";
    ForceSource(ForceSource) = ForceSource::default()
        => "ForceSource", "Ideal force source";
    VelocitySource(VelocitySource) = VelocitySource::default()
        => "VelocitySource", "Ideal velocity source";
    FixedAnchor(FixedAnchor) = FixedAnchor::default()
        => "FixedAnchor", "Rigid attachment point";
    FreeLengthWall(FreeLengthWall) = FreeLengthWall::default()
        => "FreeLengthWall", "Free body that stops against a wall at x_stop";
    HydraulicVolume(HydraulicVolume) = HydraulicVolume::default()
        => "HydraulicVolume", "Compressible fluid volume";
    LaminarOrifice(LaminarOrifice) = LaminarOrifice::default()
        => "LaminarOrifice", "Orifice with flow proportional to pressure drop";
    PressureSource(PressureSource) = PressureSource::default()
        => "PressureSource", "Ideal pressure source";
    FlowSource(FlowSource) = FlowSource::default()
        => "FlowSource", "Ideal flow source";
    Constant(Constant) = Constant::default()
        => "Constant", "Constant signal";
    Step(Step) = Step::default()
        => "Step", "Step signal";
    Sine(Sine) = Sine::default()
        => "Sine", "Sine wave signal";
    Gain(Gain) = Gain::default()
        => "Gain", "Multiplies a signal by a factor";
    Add(Add) = Add::default()
        => "Add", "Sum of two signals";
    Subtract(Subtract) = Subtract::default()
        => "Subtract", "Difference of two signals";
    FirstOrderFilter(FirstOrderFilter) = FirstOrderFilter::default()
        => "FirstOrderFilter", "Saturated first-order low-pass filter";
    PositionSensor(NodeSensor) = NodeSensor::position()
        => "PositionSensor", "Reads the position of a mechanical node";
    VelocitySensor(NodeSensor) = NodeSensor::velocity()
        => "VelocitySensor", "Reads the velocity of a mechanical node";
    ForceSensor(NodeSensor) = NodeSensor::force()
        => "ForceSensor", "Reads the force of a mechanical node";
    PressureSensor(NodeSensor) = NodeSensor::pressure()
        => "PressureSensor", "Reads the pressure of a hydraulic node";
    FlowSensor(NodeSensor) = NodeSensor::flow()
        => "FlowSensor", "Reads the flow of a hydraulic node";
}

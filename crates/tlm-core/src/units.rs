// tlm-core/src/units.rs

use core::fmt;

use crate::error::{TlmError, TlmResult};

use uom::si::f64::{
    Force as UomForce, Frequency as UomFrequency, Length as UomLength, Mass as UomMass,
    Pressure as UomPressure, Time as UomTime, Velocity as UomVelocity, Volume as UomVolume,
    VolumeRate as UomVolumeRate,
};

// Canonical SI quantity types (f64)
pub type Force = UomForce;
pub type Frequency = UomFrequency;
pub type Length = UomLength;
pub type Mass = UomMass;
pub type Pressure = UomPressure;
pub type Time = UomTime;
pub type Velocity = UomVelocity;
pub type Volume = UomVolume;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn n(v: f64) -> Force {
    use uom::si::force::newton;
    Force::new::<newton>(v)
}

#[inline]
pub fn hz(v: f64) -> Frequency {
    use uom::si::frequency::hertz;
    Frequency::new::<hertz>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn bar(v: f64) -> Pressure {
    use uom::si::pressure::bar;
    Pressure::new::<bar>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn m3(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

#[inline]
pub fn m3ps(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_second;
    VolumeRate::new::<cubic_meter_per_second>(v)
}

/// Unit tag carried by parameters and node slots. Values are always stored in
/// the SI unit named here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Unit {
    Dimensionless,
    Second,
    Hertz,
    RadianPerSecond,
    Meter,
    MeterPerSecond,
    Kilogram,
    Newton,
    NewtonPerMeter,
    NewtonSecondPerMeter,
    Pascal,
    CubicMeter,
    CubicMeterPerSecond,
    CubicMeterPerSecondPascal,
    PascalSecondPerCubicMeter,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Dimensionless => "-",
            Unit::Second => "s",
            Unit::Hertz => "Hz",
            Unit::RadianPerSecond => "rad/s",
            Unit::Meter => "m",
            Unit::MeterPerSecond => "m/s",
            Unit::Kilogram => "kg",
            Unit::Newton => "N",
            Unit::NewtonPerMeter => "N/m",
            Unit::NewtonSecondPerMeter => "Ns/m",
            Unit::Pascal => "Pa",
            Unit::CubicMeter => "m^3",
            Unit::CubicMeterPerSecond => "m^3/s",
            Unit::CubicMeterPerSecondPascal => "m^3/(s Pa)",
            Unit::PascalSecondPerCubicMeter => "Pa s/m^3",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A uom quantity that corresponds to one parameter [`Unit`].
pub trait SiQuantity: Copy {
    const UNIT: Unit;

    /// Magnitude in the SI unit named by `UNIT`.
    fn si_value(self) -> f64;
}

macro_rules! si_quantities {
    ($($quantity:ty => $unit:ident),* $(,)?) => {
        $(
            impl SiQuantity for $quantity {
                const UNIT: Unit = Unit::$unit;

                #[inline]
                fn si_value(self) -> f64 {
                    self.value
                }
            }
        )*
    };
}

si_quantities! {
    Force => Newton,
    Frequency => Hertz,
    Length => Meter,
    Mass => Kilogram,
    Pressure => Pascal,
    Time => Second,
    Velocity => MeterPerSecond,
    Volume => CubicMeter,
    VolumeRate => CubicMeterPerSecond,
}

/// SI magnitude of `quantity` for a slot declared in `expected`.
pub fn si_value_as<Q: SiQuantity>(quantity: Q, expected: Unit, what: &str) -> TlmResult<f64> {
    if Q::UNIT != expected {
        return Err(TlmError::UnitMismatch {
            what: what.to_string(),
            expected,
            found: Q::UNIT,
        });
    }
    Ok(quantity.si_value())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_store_si_values() {
        assert_eq!(n(50.0).value, 50.0);
        assert_eq!(kg(100.0).value, 100.0);
        assert_eq!(mps(-1.5).value, -1.5);
        assert_eq!(m3(1e-3).value, 1e-3);
        assert_eq!(m3ps(2e-4).value, 2e-4);
        assert_eq!(s(0.25).value, 0.25);
        assert_eq!(hz(3.0).value, 3.0);
        assert_eq!(m(2.0).value, 2.0);
        assert_eq!(pa(101_325.0).value, 101_325.0);
    }

    #[test]
    fn bar_converts_to_pascal() {
        assert!((bar(1.0).value - 1e5).abs() < 1e-9);
    }

    #[test]
    fn quantities_convert_only_to_their_own_unit() {
        assert_eq!(si_value_as(bar(2.0), Unit::Pascal, "p").unwrap(), 2e5);
        assert_eq!(si_value_as(m3ps(1e-5), Unit::CubicMeterPerSecond, "q").unwrap(), 1e-5);
        match si_value_as(kg(1.0), Unit::Newton, "F") {
            Err(TlmError::UnitMismatch { what, expected, found }) => {
                assert_eq!(what, "F");
                assert_eq!(expected, Unit::Newton);
                assert_eq!(found, Unit::Kilogram);
            }
            other => panic!("expected a unit mismatch, got {other:?}"),
        }
    }

    #[test]
    fn unit_symbols() {
        assert_eq!(Unit::NewtonSecondPerMeter.to_string(), "Ns/m");
        assert_eq!(Unit::Pascal.symbol(), "Pa");
    }
}

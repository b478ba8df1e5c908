//! Named component parameters.

use tlm_core::{Unit, ensure_finite};

use crate::error::{ComponentError, ComponentResult};

/// Handle to a parameter, returned by the configurator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ParamIdx(pub(crate) usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterKind {
    /// Fixed for the run.
    Constant,
    /// Replaced every step by the signal on the port with the same name,
    /// when that port is connected.
    Input { port: usize },
    /// Written every step to the port with the same name.
    Output { port: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: &'static str,
    pub description: &'static str,
    pub unit: Unit,
    pub default: f64,
    pub value: f64,
    pub kind: ParameterKind,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterSet {
    params: Vec<Parameter>,
}

impl ParameterSet {
    pub(crate) fn push(&mut self, param: Parameter) -> ParamIdx {
        self.params.push(param);
        ParamIdx(self.params.len() - 1)
    }

    #[inline]
    pub fn get(&self, idx: ParamIdx) -> Option<&Parameter> {
        self.params.get(idx.0)
    }

    pub fn find(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Override a constant or the fallback value of an input variable.
    pub fn set(&mut self, component: &str, name: &str, value: f64) -> ComponentResult<()> {
        let param = self
            .params
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| ComponentError::UnknownParameter {
                component: component.to_string(),
                name: name.to_string(),
            })?;
        if let ParameterKind::Output { .. } = param.kind {
            return Err(ComponentError::ReadOnlyParameter {
                component: component.to_string(),
                name: name.to_string(),
            });
        }
        param.value = ensure_finite(value, name)?;
        Ok(())
    }

    /// Restore every parameter to its declared default.
    pub fn reset_to_defaults(&mut self) {
        for p in &mut self.params {
            p.value = p.default;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_with(kind: ParameterKind) -> ParameterSet {
        let mut set = ParameterSet::default();
        set.push(Parameter {
            name: "m",
            description: "Mass",
            unit: Unit::Kilogram,
            default: 100.0,
            value: 100.0,
            kind,
        });
        set
    }

    #[test]
    fn set_and_reset() {
        let mut set = set_with(ParameterKind::Constant);
        set.set("mass", "m", 42.0).unwrap();
        assert_eq!(set.find("m").unwrap().value, 42.0);
        set.reset_to_defaults();
        assert_eq!(set.find("m").unwrap().value, 100.0);
    }

    #[test]
    fn rejects_unknown_nonfinite_and_outputs() {
        let mut set = set_with(ParameterKind::Constant);
        assert!(matches!(
            set.set("mass", "x", 1.0),
            Err(ComponentError::UnknownParameter { .. })
        ));
        assert!(matches!(
            set.set("mass", "m", f64::INFINITY),
            Err(ComponentError::Core(_))
        ));
        assert_eq!(set.find("m").unwrap().value, 100.0);

        let mut out = set_with(ParameterKind::Output { port: 0 });
        assert!(matches!(
            out.set("sensor", "m", 1.0),
            Err(ComponentError::ReadOnlyParameter { .. })
        ));
    }
}

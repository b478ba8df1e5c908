//! Connection validation rules.

use crate::error::GraphError;
use crate::port::{PortKind, Role};

/// Whether two port kinds may share a node.
pub(crate) fn kinds_compatible(a: PortKind, b: PortKind) -> bool {
    use PortKind::*;
    matches!(
        (a, b),
        (Power, Power) | (Power, Read) | (Read, Power) | (Read, Write) | (Write, Read) | (Read, Read)
    )
}

/// One prospective member of a node, described by its label, kind and the
/// role of its component.
pub(crate) struct Member<'a> {
    pub label: &'a str,
    pub kind: PortKind,
    pub role: Role,
}

/// A node holds at most one C power port, one Q power port and one writer.
pub(crate) fn check_membership(members: &[Member<'_>]) -> Result<(), GraphError> {
    let mut c_port: Option<&str> = None;
    let mut q_port: Option<&str> = None;
    let mut writer: Option<&str> = None;

    for m in members {
        match m.kind {
            PortKind::Power => {
                let slot = match m.role {
                    Role::C => &mut c_port,
                    Role::Q => &mut q_port,
                    Role::Signal => continue,
                };
                if let Some(first) = slot {
                    return Err(GraphError::RoleConflict {
                        role: m.role,
                        first: first.to_string(),
                        second: m.label.to_string(),
                    });
                }
                *slot = Some(m.label);
            }
            PortKind::Write => {
                if let Some(first) = writer {
                    return Err(GraphError::MultipleWriters {
                        first: first.to_string(),
                        second: m.label.to_string(),
                    });
                }
                writer = Some(m.label);
            }
            PortKind::Read => {}
        }
    }
    Ok(())
}

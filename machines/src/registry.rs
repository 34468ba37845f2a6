//! Machine registry for automatic front-end discovery.
//!
//! Each front-end-capable board self-registers via [`inventory::submit!`]
//! with a [`MachineEntry`] containing its CLI name, a one-line
//! description, and a factory function. The front-end discovers
//! available machines at runtime without any central list.

use gigatron_core::core::machine::Machine;

/// Describes a front-end-capable board variant.
pub struct MachineEntry {
    /// CLI name used to select this machine (e.g., "gigatron64k").
    pub name: &'static str,
    /// One-line description for listings.
    pub description: &'static str,
    /// Factory: construct a powered-on machine.
    pub create: fn() -> Box<dyn Machine>,
}

impl MachineEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        create: fn() -> Box<dyn Machine>,
    ) -> Self {
        Self { name, description, create }
    }
}

inventory::collect!(MachineEntry);

/// Return all registered machines, sorted by name.
pub fn all() -> Vec<&'static MachineEntry> {
    let mut entries: Vec<_> = inventory::iter::<MachineEntry>.into_iter().collect();
    entries.sort_by_key(|e| e.name);
    entries
}

/// Look up a machine by its CLI name.
pub fn find(name: &str) -> Option<&'static MachineEntry> {
    inventory::iter::<MachineEntry>
        .into_iter()
        .find(|e| e.name == name)
}

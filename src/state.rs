// src/state.rs

use crate::core::registry::Registry;
use std::ops::{Deref, DerefMut};

/// Journal of the registry loaded for an integration run.
/// Holds a snapshot of the loaded document once the first mutation is requested.
#[derive(Debug)]
enum RegistryState {
    /// No mutable access has been handed out yet.
    Pristine(Registry),
    /// Mutable access was requested; `original` is the document as loaded.
    Dirty { original: Registry, current: Registry },
}

/// A registry that knows whether it changed since it was loaded, so an untouched
/// `tool_conf.xml` is not rewritten.
///
/// Reads go through `Deref`; the first `DerefMut` takes the snapshot.
#[derive(Debug)]
pub struct TrackedRegistry {
    state: RegistryState,
    /// Set for fresh documents, which must always be written.
    fresh: bool,
}

impl TrackedRegistry {
    /// Wraps a registry read from disk.
    pub fn loaded(registry: Registry) -> Self {
        Self {
            state: RegistryState::Pristine(registry),
            fresh: false,
        }
    }

    /// Wraps a newly created registry.
    pub fn fresh(registry: Registry) -> Self {
        Self {
            state: RegistryState::Pristine(registry),
            fresh: true,
        }
    }

    /// True when the document differs from what was loaded, or was never on disk.
    pub fn needs_saving(&self) -> bool {
        if self.fresh {
            return true;
        }
        match &self.state {
            RegistryState::Pristine(_) => false,
            RegistryState::Dirty { original, current } => original != current,
        }
    }

    pub fn registry(&self) -> &Registry {
        match &self.state {
            RegistryState::Pristine(registry) => registry,
            RegistryState::Dirty { current, .. } => current,
        }
    }

    pub fn into_inner(self) -> Registry {
        match self.state {
            RegistryState::Pristine(registry) => registry,
            RegistryState::Dirty { current, .. } => current,
        }
    }
}

impl Deref for TrackedRegistry {
    type Target = Registry;

    fn deref(&self) -> &Self::Target {
        self.registry()
    }
}

impl DerefMut for TrackedRegistry {
    fn deref_mut(&mut self) -> &mut Registry {
        if let RegistryState::Pristine(_) = self.state {
            let previous =
                std::mem::replace(&mut self.state, RegistryState::Pristine(Registry::default()));
            self.state = match previous {
                RegistryState::Pristine(registry) => RegistryState::Dirty {
                    original: registry.clone(),
                    current: registry,
                },
                dirty => dirty,
            };
        }

        match &mut self.state {
            RegistryState::Dirty { current, .. } => current,
            RegistryState::Pristine(registry) => registry,
        }
    }
}

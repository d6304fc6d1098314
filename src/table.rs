//! Storage for resolved entry points.

use std::collections::HashMap;

use crate::resolver::ProcAddress;

/// Resolved entry points keyed by command name.
///
/// Every command a sub-loader attempted is recorded, with `None` for the ones
/// the driver did not provide. Re-running a cascade overwrites entries.
#[derive(Debug, Clone, Default)]
pub struct ProcTable {
    entries: HashMap<String, Option<ProcAddress>>,
}

impl ProcTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of resolving `name`.
    pub fn insert(&mut self, name: impl Into<String>, address: Option<ProcAddress>) {
        self.entries.insert(name.into(), address);
    }

    /// Address of `name`, if it was attempted and resolved.
    pub fn get(&self, name: &str) -> Option<ProcAddress> {
        self.entries.get(name).copied().flatten()
    }

    /// Whether `name` was attempted, resolved or not.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Reinterpret the address of `name` as a function pointer.
    ///
    /// `F` must be pointer-sized; anything else fails to compile:
    ///
    /// ```compile_fail
    /// let table = gll::ProcTable::new();
    /// let _ = unsafe { table.get_fn::<[usize; 2]>("glClear") };
    /// ```
    ///
    /// # Safety
    /// `F` must be a function pointer type matching the entry point's real
    /// signature and calling convention, and the context it was resolved in
    /// must still be current when it is called.
    pub unsafe fn get_fn<F: Copy>(&self, name: &str) -> Option<F> {
        const {
            assert!(
                std::mem::size_of::<F>() == std::mem::size_of::<*const std::ffi::c_void>(),
                "get_fn requires a pointer-sized function type"
            );
        }
        let address = self.get(name)?;
        let ptr = address.as_ptr();
        Some(std::mem::transmute_copy::<*const std::ffi::c_void, F>(&ptr))
    }

    /// Number of attempted entry points that resolved.
    pub fn resolved_count(&self) -> usize {
        self.entries.values().filter(|a| a.is_some()).count()
    }

    /// Names of attempted entry points that did not resolve.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, address)| address.is_none())
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

//! Cascade dispatch.
//!
//! A cascade invokes the sub-loader of every module in
//! [`cascade`](crate::cascade::cascade) order and sums their failure counts.
//! It never stops early: a module that fails completely still lets every
//! later module report its own failures.

use std::collections::HashMap;
use std::ffi::CString;

use crate::cascade::{cascade, ModuleId};
use crate::resolver::Resolve;
use crate::table::ProcTable;
use crate::telemetry::CascadeSpan;
use crate::version::VersionTag;

/// Resolves and stores one module's entry points.
pub trait SubLoader: Send {
    /// Resolve this module's entry points into `table`, returning the number
    /// that did not resolve. Must be safe to call repeatedly.
    fn load(&mut self, resolver: &dyn Resolve, table: &mut ProcTable) -> u32;
}

impl<F> SubLoader for F
where
    F: FnMut(&dyn Resolve, &mut ProcTable) -> u32 + Send,
{
    fn load(&mut self, resolver: &dyn Resolve, table: &mut ProcTable) -> u32 {
        self(resolver, table)
    }
}

/// Sub-loader over a fixed list of command names.
#[derive(Debug, Clone, Default)]
pub struct CommandModule {
    commands: Vec<String>,
}

impl CommandModule {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: commands.into_iter().map(Into::into).collect(),
        }
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

impl SubLoader for CommandModule {
    fn load(&mut self, resolver: &dyn Resolve, table: &mut ProcTable) -> u32 {
        let mut fail = 0;
        for name in &self.commands {
            // Names with interior NULs can never resolve.
            let address = CString::new(name.as_str())
                .ok()
                .and_then(|c_name| resolver.resolve(&c_name));
            if address.is_none() {
                fail += 1;
            }
            table.insert(name.as_str(), address);
        }
        fail
    }
}

/// Sub-loaders keyed by module.
///
/// A module without a registered sub-loader is an empty command group and
/// contributes no failures.
#[derive(Default)]
pub struct ModuleSet {
    loaders: HashMap<ModuleId, Box<dyn SubLoader>>,
}

impl ModuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `loader` for `module`, returning the one it replaces.
    pub fn insert(
        &mut self,
        module: ModuleId,
        loader: impl SubLoader + 'static,
    ) -> Option<Box<dyn SubLoader>> {
        if !module.is_known() {
            tracing::warn!(module = %module, "registered sub-loader is outside every cascade");
        }
        self.loaders.insert(module, Box::new(loader))
    }

    /// Builder form of [`ModuleSet::insert`].
    pub fn with(mut self, module: ModuleId, loader: impl SubLoader + 'static) -> Self {
        self.insert(module, loader);
        self
    }

    pub fn remove(&mut self, module: ModuleId) -> Option<Box<dyn SubLoader>> {
        self.loaders.remove(&module)
    }

    pub fn contains(&self, module: ModuleId) -> bool {
        self.loaders.contains_key(&module)
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    fn load_module(
        &mut self,
        module: ModuleId,
        resolver: &dyn Resolve,
        table: &mut ProcTable,
    ) -> u32 {
        match self.loaders.get_mut(&module) {
            Some(loader) => loader.load(resolver, table),
            None => {
                tracing::debug!(module = %module, "no sub-loader registered; treated as empty");
                0
            }
        }
    }
}

impl std::fmt::Debug for ModuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut modules: Vec<_> = self.loaders.keys().collect();
        modules.sort();
        f.debug_struct("ModuleSet").field("modules", &modules).finish()
    }
}

/// Per-module outcome of one cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeReport {
    pub tag: VersionTag,
    pub modules: Vec<(ModuleId, u32)>,
}

impl CascadeReport {
    /// Total failures, saturating at `u32::MAX`; equals what
    /// [`load_version`] returns.
    pub fn failures(&self) -> u32 {
        self.modules
            .iter()
            .fold(0u32, |total, (_, fail)| total.saturating_add(*fail))
    }

    /// Modules that reported at least one failure.
    pub fn failed_modules(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.modules
            .iter()
            .filter(|(_, fail)| *fail > 0)
            .map(|(module, _)| *module)
    }

    pub fn is_complete(&self) -> bool {
        self.failures() == 0
    }
}

/// Run the cascade for `tag` and report each module's failures.
pub fn load_version_report(
    tag: VersionTag,
    resolver: &dyn Resolve,
    modules: &mut ModuleSet,
    table: &mut ProcTable,
) -> CascadeReport {
    let span = CascadeSpan::new(tag);
    let _enter = span.enter();

    let report = CascadeReport {
        tag,
        modules: cascade(tag)
            .map(|module| {
                let fail = modules.load_module(module, resolver, table);
                if fail > 0 {
                    tracing::debug!(module = %module, failures = fail, "module incomplete");
                }
                (module, fail)
            })
            .collect(),
    };

    CascadeSpan::record_report(&span, &report);
    report
}

/// Run the cascade for `tag`, returning the number of unresolved entry points.
pub fn load_version(
    tag: VersionTag,
    resolver: &dyn Resolve,
    modules: &mut ModuleSet,
    table: &mut ProcTable,
) -> u32 {
    load_version_report(tag, resolver, modules, table).failures()
}

/// Run the full 4.6 compatibility cascade.
///
/// This does not check the version of the current context. Entry points
/// above that version may resolve anyway and must not be called.
pub fn load(resolver: &dyn Resolve, modules: &mut ModuleSet, table: &mut ProcTable) -> u32 {
    load_version(VersionTag::MAX, resolver, modules, table)
}

/// Resolver, sub-loaders and the table they fill, kept together.
pub struct Loader<R> {
    resolver: R,
    modules: ModuleSet,
    table: ProcTable,
}

impl<R: Resolve> Loader<R> {
    pub fn new(resolver: R, modules: ModuleSet) -> Self {
        Self {
            resolver,
            modules,
            table: ProcTable::new(),
        }
    }

    /// Run the full 4.6 compatibility cascade. See [`load`].
    pub fn load(&mut self) -> u32 {
        self.load_version(VersionTag::MAX)
    }

    /// Run the cascade for `tag`. See [`load_version`].
    pub fn load_version(&mut self, tag: VersionTag) -> u32 {
        self.load_version_report(tag).failures()
    }

    pub fn load_version_report(&mut self, tag: VersionTag) -> CascadeReport {
        load_version_report(tag, &self.resolver, &mut self.modules, &mut self.table)
    }

    /// Address stored for `name` by the last cascade that attempted it.
    pub fn get_proc(&self, name: &str) -> Option<crate::resolver::ProcAddress> {
        self.table.get(name)
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn modules_mut(&mut self) -> &mut ModuleSet {
        &mut self.modules
    }

    pub fn table(&self) -> &ProcTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut ProcTable {
        &mut self.table
    }

    pub fn into_table(self) -> ProcTable {
        self.table
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for Loader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("resolver", &self.resolver)
            .field("modules", &self.modules)
            .field("entries", &self.table.len())
            .finish()
    }
}

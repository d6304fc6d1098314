//! GLL: runtime OpenGL entry point loader.
//!
//! Resolves driver entry points for OpenGL 1.0 through 4.6, in core and
//! compatibility profiles, and stores them as callable addresses.
//!
//! # Structure
//!
//! - [`resolver`]: platform symbol lookup (WGL on Windows, GLX on Unix),
//!   picked at compile time
//! - [`cascade`]: the ordered module table and per-version prefixes
//! - [`loader`]: sub-loaders and the fold-sum dispatch over a cascade
//! - [`table`]: owned storage of resolved addresses
//!
//! # Usage
//!
//! ```no_run
//! use gll::{CommandModule, Loader, ModuleId, ModuleSet, Version};
//!
//! let resolver = gll::resolver::platform_resolver(&gll::config::load())?;
//! let modules = ModuleSet::new()
//!     .with(ModuleId::core(Version::V1_0), CommandModule::new(["glClear", "glViewport"]));
//! let mut loader = Loader::new(resolver, modules);
//!
//! // Must run on the thread owning a current GL context.
//! let failures = loader.load();
//! if failures > 0 {
//!     eprintln!("{failures} entry points missing");
//! }
//! # Ok::<(), gll::LoaderError>(())
//! ```
//!
//! # Threading
//!
//! Resolution depends on the context current on the calling thread, so
//! cascades must run on that thread. Nothing here synchronizes concurrent
//! cascades over shared storage.

pub mod cascade;
pub mod config;
pub mod error;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod loader;
pub mod resolver;
pub mod table;
pub mod telemetry;
pub mod version;

pub use cascade::{cascade, ModuleId, MODULES};
pub use config::LoaderConfig;
pub use error::LoaderError;
pub use loader::{
    load, load_version, load_version_report, CascadeReport, CommandModule, Loader, ModuleSet,
    SubLoader,
};
pub use resolver::{NullResolver, PlatformResolver, ProcAddress, Resolve};
pub use table::ProcTable;
pub use version::{Profile, Version, VersionTag};

//! Symbol resolution for OpenGL entry points.
//!
//! The resolver asks the driver for the address of a named entry point. The
//! strategy is picked per target at compile time:
//!
//! - Windows: [`WglResolver`] (`wglGetProcAddress`, failure sentinels filtered,
//!   `opengl32.dll` exports as fallback)
//! - Unix: [`GlxResolver`] (`glXGetProcAddress` from the system libGL)
//! - Anything else: [`NullResolver`]
//!
//! Resolution needs a rendering context current on the calling thread. A
//! failed lookup is reported as `None`; resolvers never panic or log.

#[cfg(unix)]
mod glx;
#[cfg(windows)]
mod wgl;

#[cfg(unix)]
pub use glx::GlxResolver;
#[cfg(windows)]
pub use wgl::WglResolver;

use std::ffi::{c_void, CStr};
use std::fmt;
use std::ptr::NonNull;

use crate::config::LoaderConfig;
use crate::error::LoaderError;

/// Non-null address of a resolved driver entry point.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcAddress(NonNull<c_void>);

// Entry point addresses are process-wide and immutable once handed out.
unsafe impl Send for ProcAddress {}
unsafe impl Sync for ProcAddress {}

impl ProcAddress {
    /// Wrap a raw address; `None` for null.
    pub fn new(ptr: *const c_void) -> Option<Self> {
        NonNull::new(ptr as *mut c_void).map(Self)
    }

    pub fn as_ptr(self) -> *const c_void {
        self.0.as_ptr()
    }

    pub fn addr(self) -> usize {
        self.0.as_ptr() as usize
    }
}

impl fmt::Debug for ProcAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProcAddress({:p})", self.0)
    }
}

/// Resolves entry point names to addresses.
pub trait Resolve {
    /// Look up `name` in the current context. `None` if unresolved.
    fn resolve(&self, name: &CStr) -> Option<ProcAddress>;
}

impl<R: Resolve + ?Sized> Resolve for &R {
    fn resolve(&self, name: &CStr) -> Option<ProcAddress> {
        (**self).resolve(name)
    }
}

impl<R: Resolve + ?Sized> Resolve for Box<R> {
    fn resolve(&self, name: &CStr) -> Option<ProcAddress> {
        (**self).resolve(name)
    }
}

/// Resolver backed by a closure, mostly for mocks.
pub struct FnResolver<F>(F);

impl<F> Resolve for FnResolver<F>
where
    F: Fn(&CStr) -> Option<ProcAddress>,
{
    fn resolve(&self, name: &CStr) -> Option<ProcAddress> {
        (self.0)(name)
    }
}

/// Build a resolver from a closure.
pub fn from_fn<F>(f: F) -> FnResolver<F>
where
    F: Fn(&CStr) -> Option<ProcAddress>,
{
    FnResolver(f)
}

/// Resolver that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl Resolve for NullResolver {
    fn resolve(&self, _name: &CStr) -> Option<ProcAddress> {
        None
    }
}

/// Some WGL implementations return 1, 2, 3 or -1 instead of null for a
/// missing entry point.
pub fn is_failure_sentinel(value: isize) -> bool {
    (-1..=3).contains(&value)
}

/// Convert a raw WGL-style result into an address, treating the failure
/// sentinels (0, 1, 2, 3, -1) as not found.
pub fn filter_sentinel(ptr: *const c_void) -> Option<ProcAddress> {
    if is_failure_sentinel(ptr as isize) {
        None
    } else {
        ProcAddress::new(ptr)
    }
}

#[cfg(windows)]
pub type PlatformResolver = WglResolver;
#[cfg(unix)]
pub type PlatformResolver = GlxResolver;
#[cfg(not(any(windows, unix)))]
pub type PlatformResolver = NullResolver;

/// Create the resolver for the current platform.
pub fn platform_resolver(config: &LoaderConfig) -> Result<PlatformResolver, LoaderError> {
    #[cfg(windows)]
    {
        WglResolver::new(config)
    }
    #[cfg(unix)]
    {
        GlxResolver::new(config)
    }
    #[cfg(not(any(windows, unix)))]
    {
        let _ = config;
        Ok(NullResolver)
    }
}

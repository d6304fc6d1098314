//! WGL resolver for Windows.
//!
//! `wglGetProcAddress` only knows entry points beyond GL 1.1, and some
//! implementations signal failure with small integers instead of null. GL
//! 1.0/1.1 entry points are exported directly by `opengl32.dll`, which is
//! used as a fallback.

use std::ffi::{c_void, CStr};

use libloading::Library;
use windows_sys::Win32::Graphics::OpenGL::{wglGetCurrentContext, wglGetProcAddress};

use super::{filter_sentinel, ProcAddress, Resolve};
use crate::config::LoaderConfig;
use crate::error::LoaderError;

const SYSTEM_LIBRARY: &str = "opengl32.dll";

/// Windows resolver built on `wglGetProcAddress`.
pub struct WglResolver {
    system: Option<Library>,
}

impl WglResolver {
    /// Create the resolver. The fallback library is optional; failing to
    /// open it only disables the fallback.
    pub fn new(config: &LoaderConfig) -> Result<Self, LoaderError> {
        let system = if config.system_fallback {
            let name = config
                .gl_library
                .clone()
                .unwrap_or_else(|| SYSTEM_LIBRARY.into());
            // SAFETY: opengl32.dll is a trusted system library.
            match unsafe { Library::new(&name) } {
                Ok(library) => Some(library),
                Err(e) => {
                    tracing::warn!(library = %name.display(), error = %e, "fallback GL library not opened");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self { system })
    }

    /// Whether a WGL context is current on this thread.
    pub fn has_current_context(&self) -> bool {
        // SAFETY: no preconditions.
        unsafe { wglGetCurrentContext() != 0 }
    }

    fn system_export(&self, name: &CStr) -> Option<ProcAddress> {
        let library = self.system.as_ref()?;
        // SAFETY: the symbol is only read as an address, never called here.
        let sym = unsafe { library.get::<*const c_void>(name.to_bytes_with_nul()) }.ok()?;
        ProcAddress::new(*sym)
    }
}

impl Resolve for WglResolver {
    fn resolve(&self, name: &CStr) -> Option<ProcAddress> {
        if !self.has_current_context() {
            return None;
        }
        // SAFETY: `name` is NUL-terminated and a context is current.
        let proc = unsafe { wglGetProcAddress(name.as_ptr().cast()) };
        let ptr = proc.map_or(std::ptr::null(), |f| f as *const c_void);
        filter_sentinel(ptr).or_else(|| self.system_export(name))
    }
}

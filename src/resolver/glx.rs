//! GLX resolver for Unix.
//!
//! Opens the system libGL at runtime and resolves through
//! `glXGetProcAddress`. Only a null result counts as failure.

use std::ffi::{c_void, CStr, OsStr};

use libloading::Library;

use super::{ProcAddress, Resolve};
use crate::config::LoaderConfig;
use crate::error::LoaderError;

type GetProcAddressFn = unsafe extern "C" fn(*const u8) -> *const c_void;
type GetCurrentContextFn = unsafe extern "C" fn() -> *mut c_void;

const DEFAULT_LIBRARIES: &[&str] = &["libGL.so.1", "libGL.so"];

/// Unix resolver built on `glXGetProcAddress`.
pub struct GlxResolver {
    get_proc_address: GetProcAddressFn,
    get_current_context: GetCurrentContextFn,
    // Keeps the function pointers above valid.
    _library: Library,
}

impl GlxResolver {
    /// Open libGL (or `config.gl_library`) and look up the GLX entry points.
    pub fn new(config: &LoaderConfig) -> Result<Self, LoaderError> {
        let library = match &config.gl_library {
            Some(path) => open(path.as_os_str())?,
            None => open_default()?,
        };

        // SAFETY: the symbol types match the GLX 1.4 prototypes, and the
        // library is stored next to the copied pointers.
        let (get_proc_address, get_current_context) = unsafe {
            let get_proc_address = symbol::<GetProcAddressFn>(
                &library,
                &[b"glXGetProcAddress\0", b"glXGetProcAddressARB\0"],
            )?;
            let get_current_context =
                symbol::<GetCurrentContextFn>(&library, &[b"glXGetCurrentContext\0"])?;
            (get_proc_address, get_current_context)
        };

        tracing::debug!("GLX resolver ready");
        Ok(Self {
            get_proc_address,
            get_current_context,
            _library: library,
        })
    }

    /// Whether a GLX context is current on this thread.
    pub fn has_current_context(&self) -> bool {
        // SAFETY: pointer obtained from the library owned by `self`.
        unsafe { !(self.get_current_context)().is_null() }
    }
}

impl Resolve for GlxResolver {
    fn resolve(&self, name: &CStr) -> Option<ProcAddress> {
        if !self.has_current_context() {
            return None;
        }
        // SAFETY: `name` is NUL-terminated; the pointer is owned by `self`.
        let ptr = unsafe { (self.get_proc_address)(name.as_ptr().cast()) };
        ProcAddress::new(ptr)
    }
}

fn open(name: &OsStr) -> Result<Library, LoaderError> {
    // SAFETY: libGL initializers are trusted system code.
    unsafe { Library::new(name) }.map_err(|e| LoaderError::LibraryUnavailable {
        name: name.to_string_lossy().into_owned(),
        reason: e.to_string(),
    })
}

fn open_default() -> Result<Library, LoaderError> {
    let mut last = None;
    for name in DEFAULT_LIBRARIES {
        match open(OsStr::new(name)) {
            Ok(library) => return Ok(library),
            Err(e) => {
                tracing::debug!(library = *name, error = %e, "GL library not opened");
                last = Some(e);
            }
        }
    }
    Err(last.unwrap_or_else(|| LoaderError::LibraryUnavailable {
        name: DEFAULT_LIBRARIES.join(", "),
        reason: "no candidates".into(),
    }))
}

/// First of `names` exported by `library`.
unsafe fn symbol<T: Copy>(library: &Library, names: &[&[u8]]) -> Result<T, LoaderError> {
    for name in names {
        if let Ok(sym) = library.get::<T>(name) {
            return Ok(*sym);
        }
    }
    let wanted = names
        .iter()
        .map(|n| String::from_utf8_lossy(n.strip_suffix(b"\0").unwrap_or(*n)).into_owned())
        .collect::<Vec<_>>()
        .join(" / ");
    Err(LoaderError::SymbolUnavailable(wanted))
}

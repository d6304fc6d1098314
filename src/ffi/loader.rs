// Copyright 2024-2026 GLL Contributors
// SPDX-License-Identifier: Apache-2.0

//! Process-wide loader behind the C ABI.
//!
//! C callers register one `int (*)(void)` sub-loader per module and run
//! cascades through `gll_load` / `gll_load_version`. Sub-loaders typically
//! call `gll_get_proc_address`, which does not take the cascade lock. They
//! must not call back into `gll_load*`, `gll_set_module`, `gll_set_resolver`
//! or `gll_reset`.
//!
//! The platform resolver is created on first use and setup is retried on
//! every call until it succeeds.

use std::ffi::{c_char, c_int, c_void, CStr};
use std::sync::Arc;

use parking_lot::{const_mutex, const_rwlock, Mutex, RwLock};

use super::error::{set_last_error, GllErrorCode};
use crate::cascade::ModuleId;
use crate::config;
use crate::error::LoaderError;
use crate::loader::{self, ModuleSet, SubLoader};
use crate::resolver::{self, ProcAddress, Resolve};
use crate::table::ProcTable;
use crate::telemetry::{CascadeSpan, SpanExt};
use crate::version::{Profile, Version, VersionTag};

/// C sub-loader: returns the number of entry points it failed to resolve.
pub type GllModuleLoadFn = extern "C" fn() -> c_int;

/// C resolver: returns the address of `name`, or null.
pub type GllResolveFn = extern "C" fn(name: *const c_char) -> *const c_void;

struct CModule(GllModuleLoadFn);

impl SubLoader for CModule {
    fn load(&mut self, _resolver: &dyn Resolve, _table: &mut ProcTable) -> u32 {
        // Negative counts are meaningless; treat them as success.
        u32::try_from((self.0)()).unwrap_or(0)
    }
}

struct CResolver(GllResolveFn);

impl Resolve for CResolver {
    fn resolve(&self, name: &CStr) -> Option<ProcAddress> {
        ProcAddress::new((self.0)(name.as_ptr()))
    }
}

type SharedResolver = Arc<dyn Resolve + Send + Sync>;

struct State {
    modules: ModuleSet,
    table: ProcTable,
}

static STATE: Mutex<Option<State>> = const_mutex(None);
static RESOLVER: RwLock<Option<SharedResolver>> = const_rwlock(None);

fn platform() -> Result<SharedResolver, LoaderError> {
    let span = CascadeSpan::resolver_setup();
    let _enter = span.enter();
    let result = resolver::platform_resolver(&config::load());
    span.record_result(&result);
    let resolver: SharedResolver = Arc::new(result?);
    Ok(resolver)
}

/// The installed resolver, setting up the platform one if none is installed.
/// On failure the error is stored for `gll_get_last_error` on this thread.
fn resolver() -> Option<SharedResolver> {
    if let Some(resolver) = RESOLVER.read().as_ref() {
        return Some(Arc::clone(resolver));
    }

    let mut slot = RESOLVER.write();
    if let Some(resolver) = slot.as_ref() {
        return Some(Arc::clone(resolver));
    }
    match platform() {
        Ok(resolver) => {
            *slot = Some(Arc::clone(&resolver));
            Some(resolver)
        }
        Err(e) => {
            tracing::warn!(error = %e, "platform resolver unavailable");
            set_last_error(e.to_string());
            None
        }
    }
}

fn with_state<T>(f: impl FnOnce(&mut State) -> T) -> T {
    let mut guard = STATE.lock();
    let state = guard.get_or_insert_with(|| State {
        modules: ModuleSet::new(),
        table: ProcTable::new(),
    });
    f(state)
}

fn to_c_int(failures: u32) -> c_int {
    c_int::try_from(failures).unwrap_or(c_int::MAX)
}

fn run(tag: VersionTag) -> c_int {
    let Some(resolver) = resolver() else {
        return -1;
    };
    let failures = with_state(|state| {
        loader::load_version(tag, resolver.as_ref(), &mut state.modules, &mut state.table)
    });
    to_c_int(failures)
}

/// Run the full 4.6 compatibility cascade. Returns the number of
/// unresolved entry points, or -1 if no resolver could be set up.
#[no_mangle]
pub extern "C" fn gll_load() -> c_int {
    run(VersionTag::MAX)
}

/// Run the cascade for one version. Returns the number of unresolved entry
/// points, or -1 for an unsupported version or when no resolver could be
/// set up.
#[no_mangle]
pub extern "C" fn gll_load_version(major: u32, minor: u32, compatibility: bool) -> c_int {
    let profile = if compatibility {
        Profile::Compatibility
    } else {
        Profile::Core
    };
    match VersionTag::new(Version::new(major, minor), profile) {
        Ok(tag) => run(tag),
        Err(e) => {
            set_last_error(e.to_string());
            -1
        }
    }
}

/// Register the sub-loader for a module, replacing any previous one.
/// Passing a null `load` unregisters the module.
#[no_mangle]
pub extern "C" fn gll_set_module(
    major: u32,
    minor: u32,
    removed: bool,
    load: Option<GllModuleLoadFn>,
) -> GllErrorCode {
    let module = ModuleId {
        version: Version::new(major, minor),
        removed,
    };
    if !module.is_known() {
        set_last_error(format!("unknown module: {module}"));
        return GllErrorCode::UnknownVersion;
    }

    with_state(|state| match load {
        Some(load) => {
            state.modules.insert(module, CModule(load));
        }
        None => {
            state.modules.remove(module);
        }
    });
    GllErrorCode::Ok
}

/// Parse a version selector such as `"4.6-compat"` or `"3.3"`.
///
/// # Safety
/// `text` must be null or a valid NUL-terminated string; the out pointers
/// must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn gll_parse_version(
    text: *const c_char,
    out_major: *mut u32,
    out_minor: *mut u32,
    out_compatibility: *mut bool,
) -> GllErrorCode {
    if text.is_null() || out_major.is_null() || out_minor.is_null() || out_compatibility.is_null() {
        set_last_error("null pointer argument");
        return GllErrorCode::NullPointer;
    }
    let text = match CStr::from_ptr(text).to_str() {
        Ok(s) => s,
        Err(_) => {
            set_last_error("invalid UTF-8 in version text");
            return GllErrorCode::InvalidParams;
        }
    };
    match text.parse::<VersionTag>() {
        Ok(tag) => {
            *out_major = tag.version().major;
            *out_minor = tag.version().minor;
            *out_compatibility = tag.includes_removed();
            GllErrorCode::Ok
        }
        Err(e) => e.into(),
    }
}

/// Install `resolve` for every later lookup. Passing null drops the
/// installed resolver; the platform one is set up again on next use.
#[no_mangle]
pub extern "C" fn gll_set_resolver(resolve: Option<GllResolveFn>) {
    *RESOLVER.write() = resolve.map(|f| Arc::new(CResolver(f)) as SharedResolver);
}

/// Unregister every module, forget every resolved entry point and drop the
/// installed resolver.
#[no_mangle]
pub extern "C" fn gll_reset() {
    *STATE.lock() = None;
    *RESOLVER.write() = None;
}

/// Resolve a single entry point in the current context. Null on failure.
///
/// # Safety
/// `name` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn gll_get_proc_address(name: *const c_char) -> *const c_void {
    if name.is_null() {
        set_last_error("null pointer argument");
        return std::ptr::null();
    }
    let name = CStr::from_ptr(name);
    resolver()
        .and_then(|resolver| resolver.resolve(name))
        .map_or(std::ptr::null(), |address| address.as_ptr())
}

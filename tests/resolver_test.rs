//! Symbol resolver tests.

use std::ffi::c_void;
use std::path::PathBuf;

use gll::resolver::{filter_sentinel, is_failure_sentinel, platform_resolver};
use gll::{LoaderConfig, LoaderError, NullResolver, ProcAddress, Resolve};

#[test]
fn wgl_failure_sentinels_are_not_found() {
    for sentinel in [0isize, 1, 2, 3, -1] {
        assert!(is_failure_sentinel(sentinel));
        assert_eq!(filter_sentinel(sentinel as *const c_void), None);
    }
}

#[test]
fn other_nonzero_addresses_are_found() {
    for value in [4isize, 5, 0x7fff_0000, -2, -4096] {
        assert!(!is_failure_sentinel(value));
        let address = filter_sentinel(value as *const c_void).expect("address should be found");
        assert_eq!(address.as_ptr(), value as *const c_void);
    }
}

#[test]
fn proc_address_rejects_null_only() {
    assert!(ProcAddress::new(std::ptr::null()).is_none());
    assert_eq!(ProcAddress::new(1 as *const c_void).unwrap().addr(), 1);
}

#[test]
fn null_resolver_never_resolves() {
    assert!(NullResolver.resolve(c"glGetString").is_none());
}

#[test]
fn resolver_without_context_reports_not_found() {
    // Either the GL library is missing (setup error) or it is present and no
    // context is current on the test thread; neither may crash.
    match platform_resolver(&LoaderConfig::default()) {
        Ok(resolver) => {
            assert!(resolver.resolve(c"glClear").is_none());
            assert!(resolver.resolve(c"glCreateShader").is_none());
        }
        Err(e) => assert!(e.is_platform(), "unexpected error: {e}"),
    }
}

#[cfg(unix)]
#[test]
fn missing_gl_library_is_a_setup_error() {
    let config = LoaderConfig {
        gl_library: Some(PathBuf::from("/nonexistent/libGL-gll-test.so")),
        ..Default::default()
    };
    match platform_resolver(&config) {
        Err(LoaderError::LibraryUnavailable { name, .. }) => {
            assert!(name.contains("libGL-gll-test"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("resolver created from a missing library"),
    }
}

#[cfg(windows)]
#[test]
fn missing_fallback_library_only_disables_fallback() {
    let config = LoaderConfig {
        gl_library: Some(PathBuf::from("C:\\nonexistent\\gll-test.dll")),
        ..Default::default()
    };
    let resolver = platform_resolver(&config).expect("WGL resolver needs no library");
    assert!(resolver.resolve(c"glClear").is_none());
}

// Copyright 2024-2026 GLL Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error codes and last-error storage for the C ABI.

use std::cell::RefCell;
use std::ffi::{c_char, CString};

use crate::error::LoaderError;

/// Result codes returned across the C boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GllErrorCode {
    Ok = 0,
    NullPointer = -1,
    InvalidParams = -2,
    UnknownVersion = -3,
    ResolverUnavailable = -4,
    Internal = -99,
}

impl From<LoaderError> for GllErrorCode {
    fn from(err: LoaderError) -> Self {
        let code = match &err {
            LoaderError::InvalidVersion(_) | LoaderError::InvalidProfile(_) => {
                GllErrorCode::InvalidParams
            }
            LoaderError::UnknownVersion(_) => GllErrorCode::UnknownVersion,
            LoaderError::LibraryUnavailable { .. } | LoaderError::SymbolUnavailable(_) => {
                GllErrorCode::ResolverUnavailable
            }
        };
        set_last_error(err.to_string());
        code
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Store a message for `gll_get_last_error` on this thread.
pub(crate) fn set_last_error(msg: impl Into<String>) {
    let msg = msg.into().replace('\0', " ");
    let msg = CString::new(msg).ok();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = msg);
}

/// Last error message set on this thread, or null.
///
/// The pointer stays valid until the next failing call or
/// `gll_clear_last_error` on the same thread.
#[no_mangle]
pub extern "C" fn gll_get_last_error() -> *const c_char {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(std::ptr::null(), |msg| msg.as_ptr())
    })
}

#[no_mangle]
pub extern "C" fn gll_clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

// Copyright 2024-2026 GLL Contributors
// SPDX-License-Identifier: Apache-2.0

//! C ABI.
//!
//! ```c
//! int         gll_load(void);
//! int         gll_load_version(uint32_t major, uint32_t minor, bool compatibility);
//! int         gll_set_module(uint32_t major, uint32_t minor, bool removed, int (*load)(void));
//! void        gll_set_resolver(const void* (*resolve)(const char* name));
//! int         gll_parse_version(const char* text, uint32_t* major, uint32_t* minor, bool* compatibility);
//! void        gll_reset(void);
//! const void* gll_get_proc_address(const char* name);
//! const char* gll_get_last_error(void);
//! void        gll_clear_last_error(void);
//! ```
//!
//! All calls must happen on the thread owning the current GL context.

mod error;
mod loader;

pub use error::{gll_clear_last_error, gll_get_last_error, GllErrorCode};
pub use loader::{
    gll_get_proc_address, gll_load, gll_load_version, gll_parse_version, gll_reset,
    gll_set_module, gll_set_resolver, GllModuleLoadFn, GllResolveFn,
};

//! Cascade dispatch tests with mock sub-loaders.

use std::ffi::c_void;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use gll::resolver::from_fn;
use gll::{
    load, load_version, CommandModule, Loader, ModuleId, ModuleSet, NullResolver, ProcAddress,
    ProcTable, Profile, Resolve, SubLoader, Version, VersionTag, MODULES,
};

fn fixed(n: u32) -> impl SubLoader {
    move |_: &dyn Resolve, _: &mut ProcTable| n
}

/// Every module registered, each returning 0 except the overrides.
fn modules_with(overrides: &[(ModuleId, u32)]) -> ModuleSet {
    let mut set = ModuleSet::new();
    for module in MODULES {
        let fail = overrides
            .iter()
            .find(|(m, _)| *m == module)
            .map_or(0, |(_, n)| *n);
        set.insert(module, fixed(fail));
    }
    set
}

fn tag(version: Version, profile: Profile) -> VersionTag {
    VersionTag::new(version, profile).unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn load_with_all_modules_succeeding_returns_zero() {
    let mut modules = modules_with(&[]);
    let mut table = ProcTable::new();
    assert_eq!(load(&NullResolver, &mut modules, &mut table), 0);
}

#[test]
fn single_failing_gl_2_0_module() {
    let mut loader = Loader::new(
        NullResolver,
        modules_with(&[(ModuleId::core(Version::V2_0), 3)]),
    );
    assert_eq!(loader.load(), 3);
    assert_eq!(loader.load_version(tag(Version::V1_5, Profile::Core)), 0);
    assert_eq!(loader.load_version(tag(Version::V2_0, Profile::Core)), 3);
}

#[test]
fn additivity_of_three_mocks() {
    let mut modules = ModuleSet::new()
        .with(ModuleId::core(Version::V1_0), fixed(0))
        .with(ModuleId::removed(Version::V1_0), fixed(2))
        .with(ModuleId::core(Version::V4_6), fixed(5));
    let mut table = ProcTable::new();
    assert_eq!(load(&NullResolver, &mut modules, &mut table), 7);
}

#[test]
fn core_profile_ignores_removed_module_failures() {
    let mut loader = Loader::new(
        NullResolver,
        modules_with(&[(ModuleId::removed(Version::V1_3), 4)]),
    );
    assert_eq!(loader.load_version(tag(Version::V3_1, Profile::Core)), 0);
    assert_eq!(loader.load_version(tag(Version::V3_1, Profile::Compatibility)), 4);
    assert_eq!(loader.load_version(tag(Version::V3_0, Profile::Core)), 4);
    assert_eq!(loader.load(), 4);
}

#[test]
fn huge_failure_counts_saturate() {
    let big = i32::MAX as u32;
    let mut modules = ModuleSet::new()
        .with(ModuleId::core(Version::V1_0), fixed(big))
        .with(ModuleId::core(Version::V2_0), fixed(big))
        .with(ModuleId::core(Version::V4_6), fixed(big));
    let mut table = ProcTable::new();
    assert_eq!(load(&NullResolver, &mut modules, &mut table), u32::MAX);
    assert_eq!(
        load_version(
            tag(Version::V2_0, Profile::Core),
            &NullResolver,
            &mut modules,
            &mut table
        ),
        u32::MAX - 1
    );
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn load_version_is_idempotent() {
    let mut loader = Loader::new(
        NullResolver,
        modules_with(&[
            (ModuleId::core(Version::V1_1), 1),
            (ModuleId::core(Version::V3_3), 6),
        ]),
    );
    for t in VersionTag::all() {
        let first = loader.load_version(t);
        let second = loader.load_version(t);
        assert_eq!(first, second, "{t}");
    }
}

#[test]
fn failure_counts_are_monotonic_within_a_profile() {
    let overrides: Vec<_> = MODULES.iter().map(|m| (*m, 1)).collect();
    let mut loader = Loader::new(NullResolver, modules_with(&overrides));

    for profile in [Profile::Core, Profile::Compatibility] {
        let mut previous = 0;
        for version in Version::ALL {
            let t = tag(version, profile);
            if t.profile() != profile {
                continue;
            }
            let count = loader.load_version(t);
            assert!(count >= previous, "{t}: {count} < {previous}");
            previous = count;
        }
    }
}

#[test]
fn sum_matches_report_for_every_tag() {
    let overrides: Vec<_> = MODULES
        .iter()
        .enumerate()
        .map(|(i, m)| (*m, i as u32))
        .collect();
    let mut loader = Loader::new(NullResolver, modules_with(&overrides));

    for t in VersionTag::all() {
        let report = loader.load_version_report(t);
        let expected: u32 = report
            .modules
            .iter()
            .map(|(m, _)| MODULES.iter().position(|x| x == m).unwrap() as u32)
            .sum();
        assert_eq!(report.failures(), expected, "{t}");
        assert_eq!(loader.load_version(t), expected, "{t}");
    }
}

#[test]
fn cascade_never_short_circuits() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut modules = ModuleSet::new();
    for module in MODULES {
        let calls = Arc::clone(&calls);
        let fail = if module == ModuleId::core(Version::V1_0) { 500u32 } else { 0 };
        modules.insert(module, move |_: &dyn Resolve, _: &mut ProcTable| {
            calls.fetch_add(1, Ordering::SeqCst);
            fail
        });
    }

    let mut table = ProcTable::new();
    assert_eq!(load(&NullResolver, &mut modules, &mut table), 500);
    assert_eq!(calls.load(Ordering::SeqCst), MODULES.len());
}

#[test]
fn modules_run_in_cascade_order() {
    let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let mut modules = ModuleSet::new();
    for module in MODULES {
        let order = Arc::clone(&order);
        modules.insert(module, move |_: &dyn Resolve, _: &mut ProcTable| {
            order.lock().push(module);
            0u32
        });
    }

    let t = tag(Version::V3_2, Profile::Compatibility);
    let mut table = ProcTable::new();
    load_version(t, &NullResolver, &mut modules, &mut table);
    assert_eq!(*order.lock(), gll::cascade(t).collect::<Vec<_>>());
}

#[test]
fn unregistered_modules_count_as_empty() {
    let mut modules = ModuleSet::new().with(ModuleId::core(Version::V4_0), fixed(2));
    let mut table = ProcTable::new();
    assert_eq!(load(&NullResolver, &mut modules, &mut table), 2);
    assert_eq!(
        load_version(
            tag(Version::V3_3, Profile::Compatibility),
            &NullResolver,
            &mut modules,
            &mut table
        ),
        0
    );
}

#[test]
fn replacing_a_module_returns_the_previous_loader() {
    let mut modules = ModuleSet::new();
    assert!(modules.insert(ModuleId::core(Version::V1_5), fixed(1)).is_none());
    assert!(modules.insert(ModuleId::core(Version::V1_5), fixed(2)).is_some());
    assert_eq!(modules.len(), 1);
    assert!(modules.remove(ModuleId::core(Version::V1_5)).is_some());
    assert!(modules.is_empty());
}

// =============================================================================
// Command modules
// =============================================================================

fn fake_driver() -> impl Resolve {
    from_fn(|name| match name.to_bytes() {
        b"glClear" => ProcAddress::new(0x1000 as *const c_void),
        b"glViewport" => ProcAddress::new(0x2000 as *const c_void),
        b"glDrawArrays" => ProcAddress::new(0x3000 as *const c_void),
        _ => None,
    })
}

#[test]
fn command_modules_fill_the_table() {
    let modules = ModuleSet::new()
        .with(
            ModuleId::core(Version::V1_0),
            CommandModule::new(["glClear", "glViewport"]),
        )
        .with(
            ModuleId::removed(Version::V1_0),
            CommandModule::new(["glBegin", "glEnd"]),
        )
        .with(
            ModuleId::core(Version::V1_1),
            CommandModule::new(["glDrawArrays"]),
        );
    let mut loader = Loader::new(fake_driver(), modules);

    assert_eq!(loader.load(), 2);
    assert_eq!(loader.get_proc("glClear").unwrap().addr(), 0x1000);
    assert_eq!(loader.get_proc("glDrawArrays").unwrap().addr(), 0x3000);
    assert!(loader.get_proc("glBegin").is_none());

    let mut missing: Vec<_> = loader.table().missing().collect();
    missing.sort();
    assert_eq!(missing, vec!["glBegin", "glEnd"]);

    let core = tag(Version::V3_1, Profile::Core);
    assert_eq!(loader.load_version(core), 0);
    assert_eq!(loader.table().resolved_count(), 3);
}

#[test]
fn resolution_is_fresh_on_every_call() {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&hits);
    let resolver = from_fn(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        ProcAddress::new(0x10 as *const c_void)
    });
    let modules = ModuleSet::new().with(
        ModuleId::core(Version::V2_0),
        CommandModule::new(["glCreateShader", "glCreateProgram"]),
    );
    let mut loader = Loader::new(resolver, modules);

    assert_eq!(loader.load(), 0);
    assert_eq!(loader.load(), 0);
    assert_eq!(hits.load(Ordering::SeqCst), 4);
    assert_eq!(loader.into_table().len(), 2);
}

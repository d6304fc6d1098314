//! Generates `gll.h` into `OUT_DIR` when the `ffi` feature is enabled.

fn main() {
    println!("cargo:rerun-if-changed=src/ffi");

    #[cfg(feature = "ffi")]
    generate_header();
}

#[cfg(feature = "ffi")]
fn generate_header() {
    let (Ok(crate_dir), Ok(out_dir)) = (
        std::env::var("CARGO_MANIFEST_DIR"),
        std::env::var("OUT_DIR"),
    ) else {
        println!("cargo:warning=gll.h not generated: cargo environment missing");
        return;
    };

    let header = std::path::Path::new(&out_dir).join("gll.h");
    let result = cbindgen::Builder::new()
        .with_crate(crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("GLL_H")
        .generate();

    match result {
        Ok(bindings) => {
            bindings.write_to_file(&header);
        }
        Err(e) => println!("cargo:warning=gll.h not generated: {e}"),
    }
}

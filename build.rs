use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=BPG_LIB_DIR");
    println!("cargo:rerun-if-env-changed=BPG_LIB_NAME");

    if env::var_os("CARGO_FEATURE_NATIVE").is_none() {
        return;
    }

    if let Some(dir) = env::var_os("BPG_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir.to_string_lossy());
    }

    let name = env::var("BPG_LIB_NAME").unwrap_or_else(|_| "bpg_load_save_lib".to_string());
    println!("cargo:rustc-link-lib=dylib={name}");
}

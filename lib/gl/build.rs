extern crate gl_generator;

use gl_generator::{Api, DebugStructGenerator, Fallbacks, Profile, Registry, StructGenerator};
use std::env;
use std::fs::File;
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let mut file_gl = File::create(&Path::new(&out_dir).join("bindings.rs")).unwrap();

    let extensions: [&str; 0] = [];
    // 4.1 core is the newest profile macOS hands out
    let registry = Registry::new(Api::Gl, (4, 1), Profile::Core, Fallbacks::All, extensions);

    if env::var("CARGO_FEATURE_DEBUG").is_ok() {
        registry
            .write_bindings(DebugStructGenerator, &mut file_gl)
            .unwrap();
    } else {
        registry.write_bindings(StructGenerator, &mut file_gl).unwrap();
    }
}

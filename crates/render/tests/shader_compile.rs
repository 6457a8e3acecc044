use std::fs;
use std::path::{Path, PathBuf};

fn shader_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(name)
}

fn validate_shader(path: &Path) -> naga::Module {
    let src = fs::read_to_string(path).expect("read shader");
    let module = match naga::front::wgsl::parse_str(&src) {
        Ok(m) => m,
        Err(e) => panic!("WGSL parsing error in {path:?}:\n{}", e.emit_to_string(&src)),
    };
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    if let Err(e) = validator.validate(&module) {
        panic!("WGSL validation error in {path:?}:\n{}", e.emit_to_string(&src));
    }
    module
}

fn entry_points(module: &naga::Module) -> Vec<&str> {
    module.entry_points.iter().map(|e| e.name.as_str()).collect()
}

fn uniform_bindings(module: &naga::Module) -> Vec<(u32, u32)> {
    let mut bindings: Vec<(u32, u32)> = module
        .global_variables
        .iter()
        .filter(|(_, var)| var.space == naga::AddressSpace::Uniform)
        .filter_map(|(_, var)| var.binding.as_ref().map(|b| (b.group, b.binding)))
        .collect();
    bindings.sort_unstable();
    bindings
}

#[test]
fn mesh_shader_compiles() {
    let module = validate_shader(&shader_path("mesh.wgsl"));
    let entries = entry_points(&module);
    assert!(entries.contains(&"vs_main"));
    assert!(entries.contains(&"fs_main"));
    assert_eq!(uniform_bindings(&module), vec![(0, 0), (0, 1), (1, 0)]);
}

#[test]
fn line_shader_compiles() {
    let module = validate_shader(&shader_path("line.wgsl"));
    let entries = entry_points(&module);
    assert!(entries.contains(&"vs_main"));
    assert!(entries.contains(&"fs_main"));
    // line systems take the same per-mesh model transform as solids
    assert_eq!(uniform_bindings(&module), vec![(0, 0), (1, 0)]);
}

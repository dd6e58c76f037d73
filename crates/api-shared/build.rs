//! Build script for the `api-shared` crate.
//!
//! Generates the `dme.v1` message types and client stubs from `dme.proto`. Only clients are
//! built; the naming and record services are provided by the remote runtime.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let proto_file = std::path::Path::new(manifest_dir).join("dme.proto");
    let proto_include_root = std::path::Path::new(manifest_dir);

    println!("cargo:rerun-if-changed={}", proto_file.display());
    tonic_build::configure()
        .build_server(false)
        .build_client(true)
        .compile_protos(std::slice::from_ref(&proto_file), &[proto_include_root])?;

    Ok(())
}

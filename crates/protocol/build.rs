fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use the vendored protoc binary so no system installation is required.
    let protoc = protoc_bin_vendored::protoc_bin_path()?;
    std::env::set_var("PROTOC", protoc);

    let out_dir = std::path::PathBuf::from(std::env::var("OUT_DIR")?);
    tonic_build::configure()
        .file_descriptor_set_path(out_dir.join("geovision_descriptor.bin"))
        .compile_protos(&["proto/geovision.proto"], &["proto/"])?;

    println!("cargo:rerun-if-changed=proto/geovision.proto");
    Ok(())
}

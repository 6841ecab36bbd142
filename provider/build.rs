fn main() -> Result<(), Box<dyn std::error::Error>> {
  println!("cargo:rerun-if-changed=../proto/route_guide.proto");
  tonic_build::compile_protos("../proto/route_guide.proto")?;
  Ok(())
}

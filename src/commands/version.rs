use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("sysgather version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}

use anyhow::Result;

use crate::core::registry::InputRegistry;

pub fn execute() -> Result<()> {
    let registry = InputRegistry::with_builtin();
    for name in registry.names() {
        println!("{}", name);
    }
    Ok(())
}

// Command handlers module
pub mod inputs;
pub mod run;
pub mod version;

// Re-exports for cleaner imports
pub use inputs::execute as inputs;
pub use run::execute as run;
pub use version::execute as version;

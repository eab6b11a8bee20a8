mod builder;
mod constants;
mod keypair;

pub use builder::BuilderNamespace;
pub use keypair::WasmKeypair;

// Re-export constants functions
pub use constants::*;

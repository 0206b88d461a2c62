//! Schema metadata: table descriptors discovered from the store at startup.

mod descriptor;
mod introspect;

pub use descriptor::*;
pub use introspect::discover;

//! Safe SQL builder: identifiers from discovered descriptors only, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;

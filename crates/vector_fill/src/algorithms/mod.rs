pub mod boundary;
pub mod containment;
pub mod sections;
pub mod reconstruction;

pub use boundary::*;
pub use containment::*;
pub use sections::*;
pub use reconstruction::*;

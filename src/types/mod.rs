//! Data types shared by the layout engine.

mod column;
mod record;
mod scroll;

pub use column::*;
pub use record::*;
pub use scroll::*;

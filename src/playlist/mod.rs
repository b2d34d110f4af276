pub mod interleave;
pub mod listing;
pub mod merge;
pub mod reference;

pub use interleave::*;
pub use listing::*;
pub use merge::*;
pub use reference::*;

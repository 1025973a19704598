mod attachment;
pub use attachment::*;

pub mod encoder;
pub mod segmenter;
pub mod types;

pub use encoder::*;
pub use segmenter::*;
pub use types::*;

// Codec proptesting
//------------------------------------------------------------------------------

mod block;
mod galois;

pub use block::*;
pub use galois::*;

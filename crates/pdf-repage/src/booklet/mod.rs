//! 2-up saddle-stitch booklet imposition
//!
//! Pages are laid two to a face, four to a folded sheet. Sheets are nested
//! into signatures; stacking the sheets of a signature, folding the stack
//! once and stapling along the fold yields pages in reading order.

mod imposer;
mod types;

pub use imposer::{BookletImposer, padded_len};
pub(crate) use imposer::chunk_len;
pub use types::*;

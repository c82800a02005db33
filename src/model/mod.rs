//! Data model shared by the extraction, outline, segmentation and ranking
//! stages.
//!
//! Runs are produced once per extraction pass and consumed read-only by
//! every later stage; the derived types below never point back into the PDF.

mod outline;
mod ranking;
mod run;
mod section;

pub use outline::{DocumentOutline, Heading, HeadingCandidate, HeadingLevel, OutlineNode};
pub use ranking::{PersonaQuery, RankedResult};
pub use run::{BoundingBox, FontWeight, TextRun};
pub(crate) use run::size_key;
pub use section::{PageRange, Section, PREAMBLE_TITLE};

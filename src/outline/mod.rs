//! Heading classification and title resolution.
//!
//! Works purely on layout cues: font size and weight relative to the body
//! text of the same document, position on the page, and alignment with
//! neighbouring runs. Tag trees and bookmarks are never consulted.
//!
//! ```
//! use docsift::model::{FontWeight, HeadingLevel, TextRun};
//! use docsift::outline::{classify, HeadingConfig};
//!
//! let mut runs = vec![TextRun::at(1, "Introduction", 24.0, FontWeight::Bold, 72.0, 60.0)];
//! for i in 0..5 {
//!     let y = 120.0 + i as f32 * 14.0;
//!     runs.push(TextRun::at(1, "Body text.", 11.0, FontWeight::Regular, 72.0, y));
//! }
//!
//! let outline = classify(&runs, &HeadingConfig::default()).unwrap();
//! assert_eq!(outline.headings[0].level, HeadingLevel::H1);
//! assert_eq!(outline.headings[0].text, "Introduction");
//! ```

mod baseline;
mod classify;
mod config;
mod filter;
mod lines;
mod tables;
mod title;
mod tree;

pub use baseline::{BodyBaseline, FontStatistics};
pub use classify::{classify, select_candidates};
pub use config::{HeadingConfig, MAX_LEVELS};
pub use filter::{is_valid_title, HeadingFilter};
pub use lines::{fragments_per_line, merge_fragments, Fragment};
pub use tables::{TableDetector, TableDetectorConfig, TableRegion};
pub use title::{resolve_title, TitleBlock};
pub use tree::build_tree;

//! Metadata about the selected source file.
//!
//! [`info`] defines the [`VideoInfo`] record filled in while probing;
//! [`selection`] validates a candidate file before anything is staged.

pub mod info;
pub mod selection;

pub use info::VideoInfo;
pub use selection::{FileSelection, FileWarning, select_video_file};

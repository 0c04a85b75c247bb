pub mod hit_testing;

pub use hit_testing::{rects_overlap, topmost_at};

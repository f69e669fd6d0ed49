pub mod progress;
pub mod summary;

pub use progress::progress_bar;
pub use summary::{print_report_summary, print_scan, print_synthesis_summary};

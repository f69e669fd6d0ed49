pub mod aggregator;
pub mod layout;
pub mod parser;
pub mod workbook;

pub use aggregator::{
    format_temperature, Report, ReportAggregator, ReportRow, StatCategory, FAILED, UNKNOWN,
};
pub use layout::{PathInfo, SegmentLayout};
pub use parser::{CommandTagParser, TagFields, TagParser, Temperatures};
pub use workbook::{ReportFormat, Sheet, Workbook, MAX_COLUMN_WIDTH};

//! Export surfaces for generated test cases: CSV, templated plain text,
//! and a spreadsheet workbook model. All three render the same
//! [`caseforge_engine::types::TestCase`] list; the engine's title-sorted
//! order is preserved as the row/block order.

mod csv;
mod text_template;
mod workbook;

pub use csv::{parse_csv_export, to_csv};
pub use text_template::{render_cases_txt, DEFAULT_TXT_TEMPLATE};
pub use workbook::{build_workbook, safe_sheet_name, Sheet, Workbook};

//! Query orchestration: the `read_survey` entry point and its output.

mod reader;
mod request;
mod result;

pub use reader::{SurveyReader, MARGIN_SUFFIX, RAW_SUFFIX};
pub use request::SurveyQuery;
pub use result::{ResultTable, Value};

pub mod enums;
pub mod error;
pub mod jmdict;
pub mod priority;

pub use error::IngestError;
pub use jmdict::{parse_json, parse_xml};

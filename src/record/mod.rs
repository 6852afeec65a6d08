//! Log records and severity classification.

mod severity;
mod types;

pub use severity::{classify, SeverityLevel, ERROR_TOKENS, WARNING_TOKENS};
pub use types::LogRecord;

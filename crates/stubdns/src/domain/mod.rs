mod label;
mod name;

pub use label::{DomainLabel, DomainLabelValidationError, MAX_LABEL_LENGTH};
pub use name::{DomainName, DomainNameValidationError};

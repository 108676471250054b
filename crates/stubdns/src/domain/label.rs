use ascii::{AsciiStr, AsciiString};
use thiserror::Error;

use crate::{parse_utils::byte_parser, BytesSerializable, MessageError};

pub const MAX_LABEL_LENGTH: usize = 63;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainLabelValidationError {
    #[error("Domain label '{0}' is {1} chars long, exceeding max length of {MAX_LABEL_LENGTH}")]
    LabelTooLong(String, usize),
    #[error("Domain label cannot be empty")]
    EmptyLabel,
}

/// Represents a label within a domain name. According to RFC 1035 Section 3.1,
/// "Domain names in messages are expressed in terms of a sequence of labels.
/// Each label is represented as a one octet length field followed by that
/// number of octets. Since every domain name ends with the null label of
/// the root, a domain name is terminated by a length byte of zero."
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainLabel {
    char_str: AsciiString,
}

impl TryFrom<&AsciiStr> for DomainLabel {
    type Error = DomainLabelValidationError;

    fn try_from(value: &AsciiStr) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(DomainLabelValidationError::EmptyLabel);
        }
        if value.len() > MAX_LABEL_LENGTH {
            return Err(DomainLabelValidationError::LabelTooLong(
                value.to_string(),
                value.len(),
            ));
        }
        Ok(Self {
            char_str: value.to_owned(),
        })
    }
}

impl DomainLabel {
    /// Creates a new empty `DomainLabel` instance, the null label that
    /// terminates every domain name on the wire
    pub fn new_empty() -> Self {
        Self {
            char_str: AsciiString::new(),
        }
    }

    /// Returns the length of the label text, not the total serialized
    /// length (which includes the leading length byte)
    pub fn len(&self) -> usize {
        self.char_str.len()
    }

    /// The serialized length of the label: the length byte plus the text
    pub fn len_bytes(&self) -> usize {
        self.char_str.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.char_str.is_empty()
    }

    pub fn as_str(&self) -> &str {
        self.char_str.as_str()
    }
}

impl BytesSerializable for DomainLabel {
    fn to_bytes(&self) -> Vec<u8> {
        match self.char_str.len() {
            0 => vec![0],
            len => [&[len as u8], self.char_str.as_bytes()].concat(),
        }
    }

    /// Parse a single length-prefixed label. The length byte is validated
    /// against the RFC range (0-63) before any of the text is read, so a
    /// corrupt length can never cause a read past the intended bounds
    fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), MessageError> {
        let (remaining, parsed) =
            byte_parser(bytes, 1).map_err(|_| MessageError::InvalidByteStructure)?;
        let len = parsed[0];
        if len as usize > MAX_LABEL_LENGTH {
            return Err(MessageError::MalformedLabelLength(len));
        }
        let (remaining, parsed) =
            byte_parser(remaining, len as usize).map_err(|_| MessageError::InvalidByteStructure)?;
        let char_str =
            AsciiStr::from_ascii(parsed).map_err(|_| MessageError::InvalidByteStructure)?;
        Ok((
            Self {
                char_str: char_str.to_owned(),
            },
            remaining,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_label_validation() {
        let too_long = AsciiString::from_str(&"s".repeat(64)).unwrap();
        assert_eq!(
            DomainLabel::try_from(too_long.as_ref()),
            Err(DomainLabelValidationError::LabelTooLong(
                too_long.to_string(),
                64
            ))
        );
        let empty = AsciiString::new();
        assert_eq!(
            DomainLabel::try_from(empty.as_ref()),
            Err(DomainLabelValidationError::EmptyLabel)
        );
        let max = AsciiString::from_str(&"s".repeat(63)).unwrap();
        assert!(DomainLabel::try_from(max.as_ref()).is_ok());
    }

    #[test]
    fn test_label_to_bytes() {
        let ascii_str = AsciiString::from_str("google").unwrap();
        let label = DomainLabel::try_from(ascii_str.as_ref()).unwrap();
        assert_eq!(label.to_bytes(), vec![6, 103, 111, 111, 103, 108, 101]);
        assert_eq!(DomainLabel::new_empty().to_bytes(), vec![0]);
    }

    #[test]
    fn test_label_parse() {
        let bytes = [3, b'c', b'o', b'm', 0xFF];
        let (label, remaining) = DomainLabel::parse(&bytes).unwrap();
        assert_eq!(label.as_str(), "com");
        assert_eq!(label.len_bytes(), 4);
        assert_eq!(remaining, &[0xFF]);
    }

    #[test]
    fn test_label_parse_rejects_out_of_range_length() {
        // 64 is one past the RFC limit but not a pointer prefix
        let bytes = [64, b'a', b'b'];
        assert_eq!(
            DomainLabel::parse(&bytes),
            Err(MessageError::MalformedLabelLength(64))
        );
    }

    #[test]
    fn test_label_parse_rejects_short_input() {
        let bytes = [6, b'g', b'o'];
        assert_eq!(
            DomainLabel::parse(&bytes),
            Err(MessageError::InvalidByteStructure)
        );
    }
}

use std::{fmt, str::FromStr};

use ascii::{AsciiChar, AsciiString};
use itertools::Itertools;
use thiserror::Error;

use crate::{
    is_jump_directive, BytesSerializable, CompressedBytesSerializable, MessageError,
    MessageOffset, UnsupportedFeature, MAX_MESSAGE_BYTES, POINTER_PREFIX,
};

use super::{DomainLabel, DomainLabelValidationError};

const DOMAIN_NAME_LENGTH_LIMIT: usize = 255;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainNameValidationError {
    #[error("Validation error on '{domain_label}' of '{domain_name}': {validation_error}")]
    LabelValidationError {
        domain_name: String,
        domain_label: String,
        validation_error: DomainLabelValidationError,
    },
    #[error("Domain name '{0}' is too long ({1} bytes, max {DOMAIN_NAME_LENGTH_LIMIT})")]
    NameTooLong(String, usize),
    #[error("Domain name '{0}' contains invalid ASCII")]
    InvalidAscii(String),
}

/// A domain name as a sequence of labels, e.g. "google.com" as
/// ["google", "com"]. The terminating null label of the wire form is not
/// stored; it is emitted by `to_bytes` and consumed by the parsers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainName {
    domain_labels: Vec<DomainLabel>,
}

impl DomainName {
    pub fn labels(&self) -> &[DomainLabel] {
        &self.domain_labels
    }

    /// Read length-prefixed labels starting at `cursor` until the null
    /// label, returning the labels and the offset of the first byte after
    /// the terminator. A compression pointer encountered here is a nested
    /// jump: pointers are only honored at the very start of a sequence,
    /// and that case is handled before this loop is entered.
    fn read_labels(
        full_message: &[u8],
        mut cursor: MessageOffset,
    ) -> Result<(Vec<DomainLabel>, MessageOffset), MessageError> {
        let mut domain_labels = Vec::new();
        loop {
            if cursor > MAX_MESSAGE_BYTES {
                return Err(MessageError::ScanLimitExceeded);
            }
            let len_byte = *full_message
                .get(cursor)
                .ok_or(MessageError::InvalidByteStructure)?;
            if len_byte == 0 {
                return Ok((domain_labels, cursor + 1));
            }
            if is_jump_directive(len_byte) {
                return Err(UnsupportedFeature::NestedJump(cursor).into());
            }
            let (label, _) = DomainLabel::parse(&full_message[cursor..])?;
            cursor += label.len_bytes();
            domain_labels.push(label);
        }
    }
}

impl TryFrom<&str> for DomainName {
    type Error = DomainNameValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let ascii_str = AsciiString::from_str(value)
            .map_err(|_| DomainNameValidationError::InvalidAscii(value.to_string()))?;
        let domain_labels: Vec<DomainLabel> = ascii_str
            .split(AsciiChar::Dot)
            .map(|domain_part| {
                DomainLabel::try_from(domain_part).map_err(|e| {
                    DomainNameValidationError::LabelValidationError {
                        domain_name: value.to_string(),
                        domain_label: domain_part.to_string(),
                        validation_error: e,
                    }
                })
            })
            .try_collect()?;

        let total_label_len: usize = domain_labels.iter().map(DomainLabel::len_bytes).sum();
        if total_label_len + 1 > DOMAIN_NAME_LENGTH_LIMIT {
            return Err(DomainNameValidationError::NameTooLong(
                value.to_string(),
                total_label_len + 1,
            ));
        }

        Ok(Self { domain_labels })
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.domain_labels.iter().map(DomainLabel::as_str).join(".")
        )
    }
}

impl BytesSerializable for DomainName {
    fn to_bytes(&self) -> Vec<u8> {
        self.domain_labels
            .iter()
            .chain(&[DomainLabel::new_empty()])
            .flat_map(|label| label.to_bytes())
            .collect_vec()
    }

    /// Parse a standalone, uncompressed label sequence
    fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), MessageError> {
        let (name, next) = Self::parse_compressed(bytes, 0)?;
        Ok((name, &bytes[next..]))
    }
}

impl CompressedBytesSerializable for DomainName {
    /// The label-sequence parser, including RFC 1035 Section 4.1.4
    /// message compression. A length byte with its top two bits set is a
    /// 2-byte jump directive: the low 14 bits are the absolute offset in
    /// the message where the real label sequence lives. Exactly one jump
    /// is supported, and only at the start of the sequence; a pointer
    /// reached after ordinary labels fails with
    /// [`UnsupportedFeature::NestedJump`].
    fn parse_compressed(
        full_message: &[u8],
        offset: MessageOffset,
    ) -> Result<(Self, MessageOffset), MessageError> {
        let first = *full_message
            .get(offset)
            .ok_or(MessageError::InvalidByteStructure)?;
        let jump_target = if is_jump_directive(first) {
            let second = *full_message
                .get(offset + 1)
                .ok_or(MessageError::InvalidByteStructure)?;
            let target = (u16::from_be_bytes([first, second]) & !POINTER_PREFIX) as MessageOffset;
            if target >= full_message.len() {
                return Err(MessageError::InvalidByteStructure);
            }
            Some(target)
        } else {
            None
        };

        match jump_target {
            Some(target) => {
                let (domain_labels, _) = Self::read_labels(full_message, target)?;
                // A pointer is a terminal, 2-byte field: the original
                // section resumes right after it, not after the target
                Ok((Self { domain_labels }, offset + 2))
            }
            None => {
                let (domain_labels, next) = Self::read_labels(full_message, offset)?;
                Ok((Self { domain_labels }, next))
            }
        }
    }
}

use thiserror::Error;

pub mod domain;
pub mod message;
pub mod parse_utils;
pub mod rr;

/// An absolute byte offset into a full DNS message buffer. Compressed
/// names can only be resolved against the whole message, so parsing of
/// the variable-length sections works with absolute offsets rather than
/// plain sub-slices.
pub type MessageOffset = usize;

// All compression pointers must have `11` as the first two bits
pub const POINTER_PREFIX: u16 = 0xC000;

/// The safety bound on label-sequence scanning. A UDP DNS message never
/// exceeds 512 bytes, so a cursor that wanders past this point means the
/// input is malformed (or adversarial).
pub const MAX_MESSAGE_BYTES: usize = 512;

/// Returns whether `byte`, read as a label length byte, starts a 2-byte
/// compression pointer (RFC 1035 Section 4.1.4): both of its most
/// significant bits are set.
pub fn is_jump_directive(byte: u8) -> bool {
    byte & 0xC0 == 0xC0
}

/// DNS features this codec knowingly rejects instead of implementing.
/// These are permanent, non-retryable rejections of the input, as
/// opposed to the malformed-input variants of [`MessageError`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnsupportedFeature {
    #[error("message is truncated (TC=1); messages over 512 bytes are not supported")]
    TruncatedMessage,
    #[error("serializing response messages is not supported")]
    ResponseSerialization,
    #[error("answer RDATA is {0} bytes; only 4-byte A record data is supported")]
    AnswerRdataLength(u16),
    #[error("nested compression pointer at offset {0}; only one jump per name is supported")]
    NestedJump(MessageOffset),
}

/// A generic error enum used when parsing of a certain item from its
/// byte-serialized data fails, or when serialization is refused. The
/// intention is to allow for easy propagation with the `?` operator: a
/// message either fully decodes or the whole call fails with one of
/// these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageError {
    #[error(transparent)]
    Unsupported(#[from] UnsupportedFeature),
    #[error("invalid byte structure")]
    InvalidByteStructure,
    #[error("label length byte {0} is out of range (1-63)")]
    MalformedLabelLength(u8),
    #[error("label sequence ran past byte {MAX_MESSAGE_BYTES} without terminating")]
    ScanLimitExceeded,
}

/// A trait for types that can serialize and parse their data with bytes
pub trait BytesSerializable {
    fn to_bytes(&self) -> Vec<u8>;
    fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), MessageError>
    where
        Self: std::marker::Sized;
}

/// A trait for types whose wire representation may contain compressed
/// domain names (RFC 1035 Section 4.1.4). For this to work, we need the
/// full message retrieved from the socket and loaded into memory; all
/// calls then read from the same buffer, which is safe as parsing is
/// read only. Only decoding understands compression: this codec never
/// produces pointers when serializing.
pub trait CompressedBytesSerializable {
    /// Parse one value starting at `offset` in `full_message`. On
    /// success, returns the value together with the offset of the first
    /// byte after it in the *original* section, so the caller can keep
    /// parsing linearly. When a name was a pointer, that offset is the
    /// original offset plus two, not an offset inside the jump target.
    fn parse_compressed(
        full_message: &[u8],
        offset: MessageOffset,
    ) -> Result<(Self, MessageOffset), MessageError>
    where
        Self: std::marker::Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_directive_detection() {
        assert!(is_jump_directive(0xC0));
        assert!(is_jump_directive(0xFF));
        // Both of the top two bits must be set
        assert!(!is_jump_directive(0x80));
        assert!(!is_jump_directive(0x40));
        // Ordinary label lengths
        assert!(!is_jump_directive(0));
        assert!(!is_jump_directive(63));
    }
}

use itertools::Itertools;

use crate::{
    domain::DomainName,
    parse_utils::parse_u16,
    rr::{RecordClass, RecordType},
    BytesSerializable, CompressedBytesSerializable, MessageError, MessageOffset,
};

/// The question section of a DNS message. This codec handles exactly one
/// question per message, always the first entry after the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    qname: DomainName,
    qtype: RecordType,
    qclass: RecordClass,
}

impl Question {
    pub fn new(qname: DomainName, qtype: RecordType, qclass: RecordClass) -> Self {
        Self {
            qname,
            qtype,
            qclass,
        }
    }

    /// The question every query built by this codec asks: the A record of
    /// `qname` in the Internet class
    pub fn new_a_question(qname: DomainName) -> Self {
        Self::new(qname, RecordType::A, RecordClass::In)
    }

    pub fn qname(&self) -> &DomainName {
        &self.qname
    }

    pub fn qtype(&self) -> RecordType {
        self.qtype
    }

    pub fn qclass(&self) -> RecordClass {
        self.qclass
    }

    /// Serialize the question to its wire form: the encoded name followed
    /// by the big-endian type and class words
    pub fn to_bytes(&self) -> Vec<u8> {
        let qname = self.qname.to_bytes();
        let qtype = (self.qtype as u16).to_be_bytes();
        let qclass = (self.qclass as u16).to_be_bytes();
        qname
            .into_iter()
            .chain(qtype)
            .chain(qclass)
            .collect_vec()
    }
}

impl CompressedBytesSerializable for Question {
    fn parse_compressed(
        full_message: &[u8],
        offset: MessageOffset,
    ) -> Result<(Self, MessageOffset), MessageError> {
        let (qname, name_end) = DomainName::parse_compressed(full_message, offset)?;

        let fixed_fields = full_message
            .get(name_end..)
            .ok_or(MessageError::InvalidByteStructure)?;
        let (fixed_fields, qtype) =
            parse_u16(fixed_fields).map_err(|_| MessageError::InvalidByteStructure)?;
        let qtype = RecordType::try_from(qtype).map_err(|_| MessageError::InvalidByteStructure)?;
        let (_, qclass) =
            parse_u16(fixed_fields).map_err(|_| MessageError::InvalidByteStructure)?;
        let qclass =
            RecordClass::try_from(qclass).map_err(|_| MessageError::InvalidByteStructure)?;

        Ok((
            Self {
                qname,
                qtype,
                qclass,
            },
            name_end + 4,
        ))
    }
}

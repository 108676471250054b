use std::net::Ipv4Addr;

use crate::{
    domain::DomainName,
    parse_utils::{parse_u16, parse_u32},
    rr::{RecordClass, RecordType},
    CompressedBytesSerializable, MessageError, MessageOffset, UnsupportedFeature,
};

/// The length every supported answer's RDATA must have: the four octets
/// of an IPv4 address
const A_RDATA_LEN: u16 = 4;

/// A single resource record from the answer section of a response. Only
/// A records are supported, so the RDATA is always an IPv4 address; any
/// other RDLENGTH is rejected during parsing. In practice the record's
/// name is a compression pointer back to the question name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    name: DomainName,
    rtype: RecordType,
    class: RecordClass,
    ttl: u32,
    rdlength: u16,
    address: Ipv4Addr,
}

impl ResourceRecord {
    pub fn name(&self) -> &DomainName {
        &self.name
    }

    pub fn rtype(&self) -> RecordType {
        self.rtype
    }

    pub fn class(&self) -> RecordClass {
        self.class
    }

    /// Time-to-live of the answer, in seconds
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn rdlength(&self) -> u16 {
        self.rdlength
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }
}

impl CompressedBytesSerializable for ResourceRecord {
    fn parse_compressed(
        full_message: &[u8],
        offset: MessageOffset,
    ) -> Result<(Self, MessageOffset), MessageError> {
        let (name, name_end) = DomainName::parse_compressed(full_message, offset)?;

        let fixed_fields = full_message
            .get(name_end..)
            .ok_or(MessageError::InvalidByteStructure)?;
        let (fixed_fields, rtype) =
            parse_u16(fixed_fields).map_err(|_| MessageError::InvalidByteStructure)?;
        let rtype = RecordType::try_from(rtype).map_err(|_| MessageError::InvalidByteStructure)?;
        let (fixed_fields, class) =
            parse_u16(fixed_fields).map_err(|_| MessageError::InvalidByteStructure)?;
        let class =
            RecordClass::try_from(class).map_err(|_| MessageError::InvalidByteStructure)?;
        let (fixed_fields, ttl) =
            parse_u32(fixed_fields).map_err(|_| MessageError::InvalidByteStructure)?;
        let (fixed_fields, rdlength) =
            parse_u16(fixed_fields).map_err(|_| MessageError::InvalidByteStructure)?;
        if rdlength != A_RDATA_LEN {
            return Err(UnsupportedFeature::AnswerRdataLength(rdlength).into());
        }
        let rdata = fixed_fields
            .get(..A_RDATA_LEN as usize)
            .ok_or(MessageError::InvalidByteStructure)?;
        let address = Ipv4Addr::new(rdata[0], rdata[1], rdata[2], rdata[3]);

        // name + type(2) + class(2) + ttl(4) + rdlength(2) + rdata(4)
        Ok((
            Self {
                name,
                rtype,
                class,
                ttl,
                rdlength,
                address,
            },
            name_end + 14,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A message fragment: 12 zeroed header bytes, the question name
    /// "google.com" at offset 12, and an answer at offset 28 pointing
    /// back to it
    fn answer_fixture(rdlength_bytes: [u8; 2]) -> Vec<u8> {
        let mut message = vec![0u8; 12];
        message.extend_from_slice(&[
            6, b'g', b'o', b'o', b'g', b'l', b'e', 3, b'c', b'o', b'm', 0, 0x00, 0x01, 0x00, 0x01,
        ]);
        message.extend_from_slice(&[0xC0, 0x0C, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x13]);
        message.extend_from_slice(&rdlength_bytes);
        message.extend_from_slice(&[0x8E, 0xFB, 0x29, 0x2E]);
        message
    }

    #[test]
    fn test_answer_parse_with_pointer_name() {
        let message = answer_fixture([0x00, 0x04]);
        let (record, next) = ResourceRecord::parse_compressed(&message, 28).unwrap();
        assert_eq!(record.name().to_string(), "google.com");
        assert_eq!(record.rtype(), RecordType::A);
        assert_eq!(record.class(), RecordClass::In);
        assert_eq!(record.ttl(), 19);
        assert_eq!(record.rdlength(), 4);
        assert_eq!(record.address(), Ipv4Addr::new(142, 251, 41, 46));
        assert_eq!(next, message.len());
    }

    #[test]
    fn test_answer_parse_rejects_non_a_rdata() {
        let message = answer_fixture([0x00, 0x10]);
        assert_eq!(
            ResourceRecord::parse_compressed(&message, 28).unwrap_err(),
            MessageError::Unsupported(UnsupportedFeature::AnswerRdataLength(16))
        );
    }

    #[test]
    fn test_answer_parse_rejects_truncated_rdata() {
        let mut message = answer_fixture([0x00, 0x04]);
        message.truncate(message.len() - 2);
        assert_eq!(
            ResourceRecord::parse_compressed(&message, 28).unwrap_err(),
            MessageError::InvalidByteStructure
        );
    }
}

use std::net::Ipv4Addr;

use itertools::Itertools;

use crate::{
    domain::DomainName, BytesSerializable, CompressedBytesSerializable, MessageError,
    UnsupportedFeature,
};

pub mod header;
pub mod question;
pub mod resource_record;

pub use header::{Header, HeaderBuilder, HEADER_SIZE};
pub use question::Question;
pub use resource_record::ResourceRecord;

/// The QR bit: whether a message is a query or a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Query = 0,
    Response = 1,
}

impl TryFrom<u8> for MessageType {
    // Use an empty error, because it's pretty clear what's the issue if this fails
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MessageType::Query),
            1 => Ok(MessageType::Response),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOpcode {
    /// A standard query (QUERY)
    Query = 0,
    /// An inverse query (IQUERY)
    Iquery = 1,
    /// A server status request (STATUS)
    Status = 2,
    /// Numbers 3-15 are reserved for future use; any such value is
    /// carried as `Reserved` and never acted upon
    Reserved = 3,
}

impl TryFrom<u8> for QueryOpcode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Query),
            1 => Ok(Self::Iquery),
            2 => Ok(Self::Status),
            3..=15 => Ok(Self::Reserved),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    /// No error condition
    NoError = 0,
    /// Format error - the name server was unable to interpret the query
    FormatError = 1,
    /// Server failure - the name server was unable to process this query
    /// due to a problem with the name server
    ServerFailure = 2,
    /// Name error - meaningful only for responses from an authoritative
    /// name server, this code signifies that the domain name referenced
    /// in the query does not exist
    NameError = 3,
    /// Not implemented - the name server does not support the requested
    /// kind of query
    NotImplemented = 4,
    /// Refused - the name server refuses to perform the specified
    /// operation for policy reasons
    Refused = 5,
    /// Numbers 6-15 are reserved for future use
    Reserved = 6,
}

impl TryFrom<u8> for ResponseCode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NoError),
            1 => Ok(Self::FormatError),
            2 => Ok(Self::ServerFailure),
            3 => Ok(Self::NameError),
            4 => Ok(Self::NotImplemented),
            5 => Ok(Self::Refused),
            6..=15 => Ok(Self::Reserved),
            _ => Err(()),
        }
    }
}

/// A whole DNS message: one header, exactly one question, and (for
/// responses carrying an answer) a single A record. The presence of the
/// answer is fully determined by the header: a message parses with an
/// answer iff it is a response whose ANCOUNT is non-zero. There is no
/// separate validity flag, and no partially decoded message ever escapes
/// `parse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    header: Header,
    question: Question,
    answer: Option<ResourceRecord>,
}

impl Message {
    /// Build a fresh recursive query for the A record of `name`: random
    /// ID, RD=1, QDCOUNT=1 and all other counts zero.
    pub fn new_query(name: DomainName) -> Self {
        let header = Header::builder(MessageType::Query)
            .set_recursion_desired(true)
            .set_qdcount(1)
            .finalize();
        Self {
            header,
            question: Question::new_a_question(name),
            answer: None,
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn answer(&self) -> Option<&ResourceRecord> {
        self.answer.as_ref()
    }

    /// The resolved IPv4 address, when this message is a response
    /// carrying an answer
    pub fn answer_address(&self) -> Option<Ipv4Addr> {
        self.answer.as_ref().map(ResourceRecord::address)
    }

    /// Decode a complete message from one UDP payload. The header is
    /// parsed from the first 12 bytes, the question from offset 12, and
    /// the answer (responses only) from wherever the question ended.
    pub fn parse(bytes: &[u8]) -> Result<Self, MessageError> {
        let (header, _) = Header::parse(bytes)?;
        let (question, question_end) = Question::parse_compressed(bytes, HEADER_SIZE)?;

        let answer = if header.is_query() || header.ancount() == 0 {
            None
        } else {
            let (record, _) = ResourceRecord::parse_compressed(bytes, question_end)?;
            Some(record)
        };

        Ok(Self {
            header,
            question,
            answer,
        })
    }

    /// Serialize a query message to its wire form. Only queries can be
    /// serialized: a header announcing answers is refused outright rather
    /// than silently emitting a query-shaped buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MessageError> {
        if self.header.ancount() > 0 || self.answer.is_some() {
            return Err(UnsupportedFeature::ResponseSerialization.into());
        }
        let bytes = self
            .header
            .to_bytes()
            .into_iter()
            .chain(self.question.to_bytes())
            .collect_vec();
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rr::{RecordClass, RecordType};

    // The worked example: a response for "google.com" whose answer name
    // is a compression pointer (c0 0c) back to the question name at
    // offset 12
    const RESPONSE_FIXTURE: [u8; 44] = [
        // Header
        0x95, 0xE5, 0x81, 0x80, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        // Question: google.com, type A, class IN
        0x06, 0x67, 0x6F, 0x6F, 0x67, 0x6C, 0x65, 0x03, 0x63, 0x6F, 0x6D, 0x00, 0x00, 0x01, 0x00,
        0x01,
        // Answer: pointer to offset 12, type A, class IN, TTL 19, 4-byte
        // RDATA 142.251.41.46
        0xC0, 0x0C, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x13, 0x00, 0x04, 0x8E, 0xFB, 0x29,
        0x2E,
    ];

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn test_parse_full_response() {
        let message = Message::parse(&RESPONSE_FIXTURE).unwrap();

        assert_eq!(message.header().id(), 0x95E5);
        assert_eq!(message.header().message_type(), MessageType::Response);
        assert!(message.header().recursion_desired());
        assert!(message.header().recursion_available());
        assert_eq!(message.header().qdcount(), 1);
        assert_eq!(message.header().ancount(), 1);

        assert_eq!(message.question().qname().to_string(), "google.com");
        assert_eq!(message.question().qtype(), RecordType::A);
        assert_eq!(message.question().qclass(), RecordClass::In);

        let answer = message.answer().unwrap();
        assert_eq!(answer.name().to_string(), "google.com");
        assert_eq!(answer.rtype(), RecordType::A);
        assert_eq!(answer.class(), RecordClass::In);
        assert_eq!(answer.ttl(), 19);
        assert_eq!(answer.rdlength(), 4);
        assert_eq!(answer.address(), Ipv4Addr::new(142, 251, 41, 46));
        assert_eq!(
            message.answer_address(),
            Some(Ipv4Addr::new(142, 251, 41, 46))
        );
    }

    #[test]
    fn test_parse_request_has_no_answer() {
        let mut request = RESPONSE_FIXTURE[..28].to_vec();
        // Flip the header back to a plain recursive query (QR=0, RA=0,
        // Z=2 as captured off the wire, ANCOUNT=0)
        request[2] = 0x01;
        request[3] = 0x20;
        request[7] = 0x00;

        let message = Message::parse(&request).unwrap();
        assert!(message.header().is_query());
        assert_eq!(message.header().z(), 2);
        assert_eq!(message.question().qname().to_string(), "google.com");
        assert_eq!(message.answer(), None);
        assert_eq!(message.answer_address(), None);
    }

    #[test]
    fn test_reencode_parsed_request() {
        let mut request = RESPONSE_FIXTURE[..28].to_vec();
        request[2] = 0x01;
        request[3] = 0x20;
        request[7] = 0x00;

        let message = Message::parse(&request).unwrap();
        let encoded = message.to_bytes().unwrap();
        assert_eq!(
            hex(&encoded),
            concat!(
                "95e501200001000000000000",
                "06676f6f676c6503636f6d0000010001",
            )
        );
    }

    #[test]
    fn test_query_round_trip() {
        let name = DomainName::try_from("google.com").unwrap();
        let query = Message::new_query(name);
        let encoded = query.to_bytes().unwrap();

        let decoded = Message::parse(&encoded).unwrap();
        assert_eq!(decoded.header().id(), query.header().id());
        assert!(decoded.header().is_query());
        assert!(decoded.header().recursion_desired());
        assert_eq!(decoded.header().qdcount(), 1);
        assert_eq!(decoded.header().ancount(), 0);
        assert_eq!(decoded.header().nscount(), 0);
        assert_eq!(decoded.header().arcount(), 0);
        assert_eq!(decoded.question().qname().to_string(), "google.com");
        assert_eq!(decoded.question().qtype(), RecordType::A);
        assert_eq!(decoded.question().qclass(), RecordClass::In);
        assert_eq!(decoded.answer(), None);
    }

    #[test]
    fn test_to_bytes_rejects_responses() {
        let message = Message::parse(&RESPONSE_FIXTURE).unwrap();
        assert_eq!(
            message.to_bytes().unwrap_err(),
            MessageError::Unsupported(UnsupportedFeature::ResponseSerialization)
        );
    }

    #[test]
    fn test_parse_rejects_short_rdata() {
        let mut bytes = RESPONSE_FIXTURE.to_vec();
        // Corrupt RDLENGTH (offset 38-39) to 16, as an AAAA answer would
        // carry
        bytes[39] = 16;
        assert_eq!(
            Message::parse(&bytes).unwrap_err(),
            MessageError::Unsupported(UnsupportedFeature::AnswerRdataLength(16))
        );
    }
}

use itertools::Itertools;
use rand::Rng;

use crate::{
    parse_utils::{bit_parser, parse_u16},
    BytesSerializable, MessageError, UnsupportedFeature,
};

use super::{MessageType, QueryOpcode, ResponseCode};

/// The fixed size of a DNS message header in bytes
pub const HEADER_SIZE: usize = 12;

/// A DNS message header. The header contains the following fields:
///                               1  1  1  1  1  1
/// 0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      ID                       |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |QR|   Opcode  |AA|TC|RD|RA|   Z    |   RCODE   |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    QDCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    ANCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    NSCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    ARCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///
/// Immutable once constructed: instances come out of either the builder
/// (for fresh queries) or `parse` (for received messages), never from
/// field-by-field mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// ID: a 16 bit identifier assigned by the program that generates any
    /// kind of query. The identifier is copied into the corresponding
    /// reply so the requester can match replies to outstanding queries
    /// over the stateless transport.
    id: u16,
    /// QR: whether this message is a query (0) or a response (1)
    qr: MessageType,
    /// OPCODE: the kind of query in this message. Always `Query` for
    /// anything this codec produces.
    opcode: QueryOpcode,
    /// AA: set in responses when the responding name server is an
    /// authority for the domain name in the question section
    authoritative_ans: bool,
    /// TC: set when the message was truncated because it exceeded the
    /// 512-byte limit of the transport. Truncated messages are rejected
    /// outright by `parse`.
    truncation: bool,
    /// RD: set in a query to direct the name server to pursue the query
    /// recursively; copied into the response
    recursion_desired: bool,
    /// RA: set in a response to denote whether the name server supports
    /// recursive queries
    recursion_available: bool,
    /// Z: 3 bits originally reserved for later use, now carrying DNSSEC
    /// signalling. Preserved verbatim through a decode/encode cycle.
    z: u8,
    /// RCODE: the response status set by the server
    response_code: ResponseCode,
    /// The number of entries in the question section
    qdcount: u16,
    /// The number of resource records in the answer section
    ancount: u16,
    /// The number of name server records in the authority section
    nscount: u16,
    /// The number of resource records in the additional section
    arcount: u16,
}

impl Header {
    pub fn builder(qr: MessageType) -> HeaderBuilder {
        HeaderBuilder::new(qr)
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn message_type(&self) -> MessageType {
        self.qr
    }

    pub fn is_query(&self) -> bool {
        self.qr == MessageType::Query
    }

    pub fn opcode(&self) -> QueryOpcode {
        self.opcode
    }

    pub fn authoritative_ans(&self) -> bool {
        self.authoritative_ans
    }

    pub fn truncation(&self) -> bool {
        self.truncation
    }

    pub fn recursion_desired(&self) -> bool {
        self.recursion_desired
    }

    pub fn recursion_available(&self) -> bool {
        self.recursion_available
    }

    pub fn z(&self) -> u8 {
        self.z
    }

    pub fn response_code(&self) -> ResponseCode {
        self.response_code
    }

    pub fn qdcount(&self) -> u16 {
        self.qdcount
    }

    pub fn ancount(&self) -> u16 {
        self.ancount
    }

    pub fn nscount(&self) -> u16 {
        self.nscount
    }

    pub fn arcount(&self) -> u16 {
        self.arcount
    }

    /// Pack the flag fields into the big-endian word occupying header
    /// bytes 2-3. Each field is shifted to the bit position the RFC 1035
    /// layout gives it: QR(1), OPCODE(4), AA(1), TC(1), RD(1) in the high
    /// byte; RA(1), Z(3), RCODE(4) in the low byte.
    fn pack_flags(&self) -> u16 {
        let qr = (self.qr as u16) << 15;
        let opcode = (self.opcode as u16) << 11;
        let aa = (self.authoritative_ans as u16) << 10;
        let tc = (self.truncation as u16) << 9;
        let rd = (self.recursion_desired as u16) << 8;
        let ra = (self.recursion_available as u16) << 7;
        let z = (self.z as u16) << 4;
        let rcode = self.response_code as u16;
        qr | opcode | aa | tc | rd | ra | z | rcode
    }

    // Bit-level parsing functions. Each one masks exactly the bit width
    // the RFC layout gives its field.

    /// Parse the `qr` bit from the given bytes. The returned bit should be
    /// casted to `MessageType` by the caller. As the first bit-level
    /// parsing function to be called, the offset should always be `0`.
    fn parse_qr(bytes_with_offset: (&[u8], usize)) -> nom::IResult<(&[u8], usize), u8> {
        bit_parser(bytes_with_offset, 1)
    }

    /// Parse the 4-bit `opcode` from the given bytes. The returned value
    /// should be casted to `QueryOpcode` by the caller
    fn parse_opcode(bytes_with_offset: (&[u8], usize)) -> nom::IResult<(&[u8], usize), u8> {
        bit_parser(bytes_with_offset, 4)
    }

    fn parse_bool_bit(bytes_with_offset: (&[u8], usize)) -> nom::IResult<(&[u8], usize), bool> {
        let (remaining_input, parsed) = bit_parser(bytes_with_offset, 1)?;
        Ok((remaining_input, parsed == 1))
    }

    /// Parse the 3-bit `z` field from the given bytes
    fn parse_z(bytes_with_offset: (&[u8], usize)) -> nom::IResult<(&[u8], usize), u8> {
        bit_parser(bytes_with_offset, 3)
    }

    /// Parse the 4-bit `rcode` from the given bytes. The returned value
    /// should be casted to `ResponseCode` by the caller
    fn parse_rcode(bytes_with_offset: (&[u8], usize)) -> nom::IResult<(&[u8], usize), u8> {
        bit_parser(bytes_with_offset, 4)
    }
}

impl BytesSerializable for Header {
    fn to_bytes(&self) -> Vec<u8> {
        [
            self.id,
            self.pack_flags(),
            self.qdcount,
            self.ancount,
            self.nscount,
            self.arcount,
        ]
        .iter()
        .flat_map(|val| val.to_be_bytes())
        .collect_vec()
    }

    fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), MessageError> {
        let (bytes, id) = parse_u16(bytes).map_err(|_| MessageError::InvalidByteStructure)?;

        let (bytes_with_offset, qr) =
            Self::parse_qr((bytes, 0)).map_err(|_| MessageError::InvalidByteStructure)?;
        let qr = MessageType::try_from(qr).map_err(|_| MessageError::InvalidByteStructure)?;

        let (bytes_with_offset, opcode) = Self::parse_opcode(bytes_with_offset)
            .map_err(|_| MessageError::InvalidByteStructure)?;
        let opcode =
            QueryOpcode::try_from(opcode).map_err(|_| MessageError::InvalidByteStructure)?;

        let (bytes_with_offset, aa) = Self::parse_bool_bit(bytes_with_offset)
            .map_err(|_| MessageError::InvalidByteStructure)?;
        let (bytes_with_offset, tc) = Self::parse_bool_bit(bytes_with_offset)
            .map_err(|_| MessageError::InvalidByteStructure)?;
        // Truncated messages would need a TCP retry to read in full;
        // rejecting them here guarantees no partial header escapes
        if tc {
            return Err(UnsupportedFeature::TruncatedMessage.into());
        }
        let (bytes_with_offset, rd) = Self::parse_bool_bit(bytes_with_offset)
            .map_err(|_| MessageError::InvalidByteStructure)?;
        let (bytes_with_offset, ra) = Self::parse_bool_bit(bytes_with_offset)
            .map_err(|_| MessageError::InvalidByteStructure)?;
        let (bytes_with_offset, z) =
            Self::parse_z(bytes_with_offset).map_err(|_| MessageError::InvalidByteStructure)?;

        // The bit offset is byte-aligned again after the last flag field
        let ((bytes, _), rcode) =
            Self::parse_rcode(bytes_with_offset).map_err(|_| MessageError::InvalidByteStructure)?;
        let rcode =
            ResponseCode::try_from(rcode).map_err(|_| MessageError::InvalidByteStructure)?;

        let (bytes, qdcount) = parse_u16(bytes).map_err(|_| MessageError::InvalidByteStructure)?;
        let (bytes, ancount) = parse_u16(bytes).map_err(|_| MessageError::InvalidByteStructure)?;
        let (bytes, nscount) = parse_u16(bytes).map_err(|_| MessageError::InvalidByteStructure)?;
        let (bytes, arcount) = parse_u16(bytes).map_err(|_| MessageError::InvalidByteStructure)?;
        Ok((
            Self {
                id,
                qr,
                opcode,
                authoritative_ans: aa,
                truncation: tc,
                recursion_desired: rd,
                recursion_available: ra,
                z,
                response_code: rcode,
                qdcount,
                ancount,
                nscount,
                arcount,
            },
            bytes,
        ))
    }
}

/// A builder type to construct `Header` instances. The only field that is
/// required upfront is the `qr` field; every other field defaults to the
/// zero value of its wire representation, except the ID which defaults to
/// a freshly generated query ID.
pub struct HeaderBuilder {
    /// Defaults to generating a random ID if not set, for new DNS
    /// queries. Set the ID when building a response to an existing query.
    id: Option<u16>,
    qr: MessageType,
    recursion_desired: bool,
    recursion_available: bool,
    response_code: ResponseCode,
    qdcount: u16,
    ancount: u16,
}

impl HeaderBuilder {
    /// Generate an ID for an outgoing query. This uses a non-cryptographic
    /// PRNG in a fixed range: correctness only relies on matching the
    /// echoed ID in the response, not on unguessability. Spoofing
    /// resistance would need a crypto-grade source and the full 16-bit
    /// space.
    fn generate_id() -> u16 {
        rand::thread_rng().gen_range(10_000..60_000)
    }

    pub fn new(qr: MessageType) -> Self {
        Self {
            id: None,
            qr,
            recursion_desired: false,
            recursion_available: false,
            response_code: ResponseCode::NoError,
            qdcount: 0,
            ancount: 0,
        }
    }

    pub fn set_id(mut self, id: u16) -> Self {
        self.id = Some(id);
        self
    }

    pub fn set_recursion_desired(mut self, recursion_desired: bool) -> Self {
        self.recursion_desired = recursion_desired;
        self
    }

    pub fn set_recursion_available(mut self, recursion_available: bool) -> Self {
        self.recursion_available = recursion_available;
        self
    }

    pub fn set_response_code(mut self, response_code: ResponseCode) -> Self {
        self.response_code = response_code;
        self
    }

    pub fn set_qdcount(mut self, qdcount: u16) -> Self {
        self.qdcount = qdcount;
        self
    }

    pub fn set_ancount(mut self, ancount: u16) -> Self {
        self.ancount = ancount;
        self
    }

    pub fn finalize(self) -> Header {
        let id = match self.id {
            Some(id) => id,
            None => Self::generate_id(),
        };
        Header {
            id,
            qr: self.qr,
            opcode: QueryOpcode::Query,
            authoritative_ans: false,
            truncation: false,
            recursion_desired: self.recursion_desired,
            recursion_available: self.recursion_available,
            z: 0,
            response_code: self.response_code,
            qdcount: self.qdcount,
            ancount: self.ancount,
            nscount: 0,
            arcount: 0,
        }
    }
}

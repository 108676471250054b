/// An enum of the common resource record TYPE values defined in RFC
/// 1035. Only A records are fully decoded by this codec (the RDATA gate
/// lives in the resource-record parser), but the TYPE field of other
/// records still parses to its proper variant.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    /// A host address
    A = 1,
    /// An authoritative name server
    Ns = 2,
    /// The canonical name for an alias
    Cname = 5,
    /// Marks the start of a zone of authority
    Soa = 6,
    /// A null RR (EXPERIMENTAL)
    Null = 10,
    /// A well known service description
    Wks = 11,
    /// A domain name pointer
    Ptr = 12,
    /// Host information
    Hinfo = 13,
    /// Mailbox or mail list information
    Minfo = 14,
    /// Mail exchange
    Mx = 15,
    /// Text strings
    Txt = 16,
}

impl TryFrom<u16> for RecordType {
    type Error = ();

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(RecordType::A),
            2 => Ok(RecordType::Ns),
            5 => Ok(RecordType::Cname),
            6 => Ok(RecordType::Soa),
            10 => Ok(RecordType::Null),
            11 => Ok(RecordType::Wks),
            12 => Ok(RecordType::Ptr),
            13 => Ok(RecordType::Hinfo),
            14 => Ok(RecordType::Minfo),
            15 => Ok(RecordType::Mx),
            16 => Ok(RecordType::Txt),
            _ => Err(()),
        }
    }
}

/// An enum of the record CLASS values defined in RFC 1035. Everything in
/// practice is `In`
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordClass {
    /// The Internet
    In = 1,
    /// The CSNET class (obsolete)
    Cs = 2,
    /// The CHAOS class
    Ch = 3,
    /// Hesiod
    Hs = 4,
}

impl TryFrom<u16> for RecordClass {
    type Error = ();

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(RecordClass::In),
            2 => Ok(RecordClass::Cs),
            3 => Ok(RecordClass::Ch),
            4 => Ok(RecordClass::Hs),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values_round_trip() {
        assert_eq!(RecordType::try_from(1), Ok(RecordType::A));
        assert_eq!(RecordType::A as u16, 1);
        assert_eq!(RecordClass::try_from(1), Ok(RecordClass::In));
        assert_eq!(RecordClass::In as u16, 1);
        assert!(RecordType::try_from(0).is_err());
        assert!(RecordClass::try_from(5).is_err());
    }
}

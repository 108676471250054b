use nom::{
    bits::complete::take,
    number::complete::{be_u16, be_u32},
    IResult,
};

/// Parse `count` bits from the input. The input should be a tuple containing the
/// input byte slice, and the bit offset of the slice to parse from. The returned
/// value is a tuple containing a tuple of the remaining input and the new offset,
/// and the parsed bit value as a `u8`
pub fn bit_parser(input: (&[u8], usize), count: usize) -> IResult<(&[u8], usize), u8> {
    take(count)(input)
}

pub fn byte_parser(input: &[u8], count: usize) -> IResult<&[u8], &[u8]> {
    nom::bytes::complete::take(count)(input)
}

/// Parse a big-endian 16-bit word, the unit of all multi-byte integer
/// fields in a DNS header and of the type/class/RDLENGTH fields
pub fn parse_u16(input: &[u8]) -> IResult<&[u8], u16> {
    be_u16(input)
}

/// Parse a big-endian 32-bit integer (the TTL field of a resource record)
pub fn parse_u32(input: &[u8]) -> IResult<&[u8], u32> {
    be_u32(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_parser() {
        let bytes = [0b1011_0110, 0xFF];
        let ((_, offset), first_bit) = bit_parser((&bytes, 0), 1).unwrap();
        assert_eq!(first_bit, 1);
        assert_eq!(offset, 1);
        let ((_, offset), next_four) = bit_parser((&bytes, 1), 4).unwrap();
        assert_eq!(next_four, 0b0110);
        assert_eq!(offset, 5);
    }

    #[test]
    fn test_word_parsers() {
        let bytes = [0x95, 0xE5, 0x00, 0x00, 0x00, 0x13];
        let (remaining, word) = parse_u16(&bytes).unwrap();
        assert_eq!(word, 0x95E5);
        let (remaining, ttl) = parse_u32(remaining).unwrap();
        assert_eq!(ttl, 19);
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_word_parser_short_input() {
        assert!(parse_u16(&[0x95]).is_err());
        assert!(parse_u32(&[0x00, 0x00, 0x13]).is_err());
    }
}

//! The subset of ASN.1 BER needed by SPNEGO tokens: one-octet tags and definite-length determinants.

mod cursor;

use byteorder::{BigEndian, ByteOrder};

pub use self::cursor::ReadCursor;
use crate::{Error, Result};

#[repr(u8)]
#[allow(unused)]
pub(crate) enum Pc {
    Primitive = 0x00,
    Construct = 0x20,
}

#[repr(u8)]
#[allow(unused)]
enum Class {
    Universal = 0x00,
    Application = 0x40,
    ContextSpecific = 0x80,
    Private = 0xC0,
}

#[repr(u8)]
enum Tag {
    OctetString = 0x04,
    ObjectIdentifier = 0x06,
    Enumerated = 0x0A,
    Sequence = 0x10,
}

const TAG_MASK: u8 = 0x1F;

const fn universal_tag(tag: Tag, pc: Pc) -> u8 {
    Class::Universal as u8 | pc as u8 | (TAG_MASK & tag as u8)
}

const fn contextual_tag(tagnum: u8) -> u8 {
    Class::ContextSpecific as u8 | Pc::Construct as u8 | (TAG_MASK & tagnum)
}

/// `[APPLICATION 0]` constructed, the outer tag of a GSS-API initial context token.
pub const APPLICATION_TAG: u8 = Class::Application as u8 | Pc::Construct as u8;
pub const OBJECT_IDENTIFIER_TAG: u8 = universal_tag(Tag::ObjectIdentifier, Pc::Primitive);
pub const OCTET_STRING_TAG: u8 = universal_tag(Tag::OctetString, Pc::Primitive);
pub const ENUMERATED_TAG: u8 = universal_tag(Tag::Enumerated, Pc::Primitive);
pub const SEQUENCE_TAG: u8 = universal_tag(Tag::Sequence, Pc::Construct);

pub const CONTEXT_TAG_0: u8 = contextual_tag(0);
pub const CONTEXT_TAG_1: u8 = contextual_tag(1);
pub const CONTEXT_TAG_2: u8 = contextual_tag(2);
pub const CONTEXT_TAG_3: u8 = contextual_tag(3);

const LONG_FORM: u8 = 0x80;
const MAX_LENGTH_OCTETS: usize = 4;

/// Returns the number of octets the length determinant of `length` occupies.
pub fn sizeof_length(length: usize) -> usize {
    if length > 0xFF_FFFF {
        5
    } else if length > 0xFFFF {
        4
    } else if length > 0xFF {
        3
    } else if length > 0x7F {
        2
    } else {
        1
    }
}

/// Encodes `length` as the minimal BER definite-length determinant.
pub fn encode_length(length: usize) -> Result<Vec<u8>> {
    let mut dst = Vec::with_capacity(MAX_LENGTH_OCTETS + 1);
    write_length(&mut dst, length)?;

    Ok(dst)
}

pub fn write_length(dst: &mut Vec<u8>, length: usize) -> Result<()> {
    let length = u32::try_from(length).map_err(|_| Error::UnsupportedLength(length as u64))?;

    if length > 0x7F {
        let octets = length.to_be_bytes();
        let skip = octets.iter().take_while(|octet| **octet == 0).count();
        let significant = &octets[skip..];

        dst.push(LONG_FORM | significant.len() as u8);
        dst.extend_from_slice(significant);
    } else {
        dst.push(length as u8);
    }

    Ok(())
}

/// Decodes the length determinant at the start of `src`.
///
/// Returns the decoded length and the number of octets the determinant itself occupies.
pub fn decode_length(src: &[u8]) -> Result<(usize, usize)> {
    let mut cursor = ReadCursor::new(src);
    let length = read_length(&mut cursor)?;

    Ok((length, cursor.position()))
}

pub fn read_length(src: &mut ReadCursor<'_>) -> Result<usize> {
    let position = src.position();
    let first = src.read_u8("length determinant")?;

    if first & LONG_FORM == 0 {
        return Ok(usize::from(first));
    }

    // 0x80 is the indefinite form, which SPNEGO never uses.
    let count = usize::from(first & !LONG_FORM);
    if count == 0 || count > MAX_LENGTH_OCTETS {
        return Err(Error::UnsupportedLengthForm { octet: first, position });
    }

    let octets = src.read_slice("length determinant", count)?;
    let length = match count {
        1 => u32::from(octets[0]),
        2 => u32::from(BigEndian::read_u16(octets)),
        3 => (u32::from(octets[0]) << 16) + u32::from(BigEndian::read_u16(&octets[1..])),
        _ => BigEndian::read_u32(octets),
    };

    usize::try_from(length).map_err(|_| Error::UnsupportedLength(u64::from(length)))
}

/// Writes `tag ‖ length ‖ value`.
pub fn write_tlv(dst: &mut Vec<u8>, tag: u8, value: &[u8]) -> Result<()> {
    dst.push(tag);
    write_length(dst, value.len())?;
    dst.extend_from_slice(value);

    Ok(())
}

/// Returns the next tag without consuming it.
pub fn peek_tag(src: &ReadCursor<'_>, name: &'static str) -> Result<u8> {
    src.peek_u8(name)
}

/// Consumes `tag ‖ length` and returns a cursor over exactly `length` value octets.
pub fn read_tag<'a>(src: &mut ReadCursor<'a>, tag: u8, name: &'static str) -> Result<ReadCursor<'a>> {
    let position = src.position();
    let found = src.read_u8(name)?;

    if found != tag {
        return Err(Error::UnexpectedTag {
            expected: vec![tag],
            found,
            position,
        });
    }

    let length = read_length(src)?;

    src.sub_cursor(name, length)
}

/// Reads a primitive `tag ‖ length ‖ value` and returns the value octets.
pub fn read_primitive<'a>(src: &mut ReadCursor<'a>, tag: u8, name: &'static str) -> Result<&'a [u8]> {
    let mut value = read_tag(src, tag, name)?;

    Ok(value.read_remaining())
}

/// Writes `[tag] OCTET STRING`, the shape of every opaque token field in SPNEGO.
pub(crate) fn write_sequence_octet_string(dst: &mut Vec<u8>, tag: u8, value: &[u8]) -> Result<()> {
    let mut octet_string = Vec::with_capacity(1 + sizeof_length(value.len()) + value.len());
    write_tlv(&mut octet_string, OCTET_STRING_TAG, value)?;

    write_tlv(dst, tag, &octet_string)
}

pub(crate) fn read_sequence_octet_string<'a>(
    src: &mut ReadCursor<'a>,
    tag: u8,
    name: &'static str,
) -> Result<&'a [u8]> {
    let mut field = read_tag(src, tag, name)?;

    read_primitive(&mut field, OCTET_STRING_TAG, name)
}

/// Skips over one complete `tag ‖ length ‖ value` whatever the tag is.
pub(crate) fn skip_tlv(src: &mut ReadCursor<'_>, name: &'static str) -> Result<()> {
    src.read_u8(name)?;
    let length = read_length(src)?;
    src.read_slice(name, length)?;

    Ok(())
}

pub(crate) fn unexpected_tag(expected: &[u8], found: u8, position: usize) -> Error {
    Error::UnexpectedTag {
        expected: expected.to_vec(),
        found,
        position,
    }
}

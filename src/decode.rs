use crate::ber::ReadCursor;
use crate::Result;

/// Token that can be decoded from a binary input.
pub trait Decode: Sized {
    /// Decodes a token from a binary input.
    fn decode(src: &[u8]) -> Result<Self> {
        let mut cursor = ReadCursor::new(src);
        Self::decode_cursor(&mut cursor)
    }

    /// Decodes a token from a cursor.
    fn decode_cursor(src: &mut ReadCursor<'_>) -> Result<Self>;
}

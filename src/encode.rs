use crate::Result;

/// Token that can be encoded into its wire representation.
pub trait Encode {
    /// Appends the encoded token to `dst`.
    fn encode_buf(&self, dst: &mut Vec<u8>) -> Result<()>;

    fn encode(&self) -> Result<Vec<u8>> {
        let mut dst = Vec::new();
        self.encode_buf(&mut dst)?;

        Ok(dst)
    }
}

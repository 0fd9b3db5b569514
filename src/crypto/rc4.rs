use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

const STATE_SIZE: usize = 256;

/// RC4 keystream.
///
/// Encryption and decryption are the same operation. Every call to [`Rc4::process`] consumes keystream, so both peers
/// have to process their messages in the same order to stay synchronized.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Rc4 {
    i: u8,
    j: u8,
    state: [u8; STATE_SIZE],
}

impl Rc4 {
    pub fn new(key: &[u8]) -> Self {
        let mut state = [0; STATE_SIZE];
        for (i, byte) in state.iter_mut().enumerate() {
            *byte = i as u8;
        }

        let mut j = 0u8;
        for (i, key_byte) in (0..STATE_SIZE).zip(key.iter().cycle()) {
            j = j.wrapping_add(state[i]).wrapping_add(*key_byte);
            state.swap(i, usize::from(j));
        }

        Self { i: 0, j: 0, state }
    }

    pub fn process(&mut self, data: &[u8]) -> Vec<u8> {
        data.iter().map(|byte| byte ^ self.next_byte()).collect()
    }

    fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.state[usize::from(self.i)]);
        self.state.swap(usize::from(self.i), usize::from(self.j));

        let index = self.state[usize::from(self.i)].wrapping_add(self.state[usize::from(self.j)]);

        self.state[usize::from(index)]
    }
}

impl fmt::Debug for Rc4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rc4").finish_non_exhaustive()
    }
}

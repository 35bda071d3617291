//! Implementation of the string hash functions used to
//! derive stable identifiers from declared names.

/// Offset basis of the 64-bit FNV-1a variant.
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// Multiplier of the 64-bit FNV-1a variant.
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Implementation of the 64-bit [FNV-1a] hash function.
///
/// This is the hash behind every type identifier and
/// can be evaluated in `const` context.
///
/// [FNV-1a]: http://www.isthe.com/chongo/tech/comp/fnv/
#[inline(always)]
pub const fn fnv1a(data: &str) -> u64 {
    Fnv1aBuilder::new().feed(data).finish()
}

/// A builder for FNV-1a hashes which repeatedly accepts
/// data and produces the final hash.
///
/// Feeding `"a"` and `"b"` separately yields the same
/// hash as feeding `"ab"` at once.
pub struct Fnv1aBuilder {
    state: u64,
}

impl Fnv1aBuilder {
    /// Produces a new builder with default configuration.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }

    /// Consumes the previous builder object and returns a
    /// new one, with `data` hashed into the state.
    ///
    /// This may be called repeatedly to add more substrings
    /// to the final hash.
    pub const fn feed(mut self, data: &str) -> Self {
        let bytes = data.as_bytes();

        let mut i = 0;
        while i < bytes.len() {
            self.state ^= bytes[i] as u64;
            self.state = self.state.wrapping_mul(FNV_PRIME);

            i += 1;
        }

        self
    }

    /// Consumes the builder and returns the final hash.
    #[inline(always)]
    pub const fn finish(self) -> u64 {
        self.state
    }
}

impl Default for Fnv1aBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Implementation of the [DJB2] hash function.
///
/// Used for the dictionary hashes of reflected fields,
/// which only need to be unique within their type.
///
/// [DJB2]: https://theartincode.stanis.me/008-djb2/
#[inline(always)]
pub const fn djb2(input: &str) -> u32 {
    let bytes = input.as_bytes();
    let mut state: u32 = 5381;

    let mut i = 0;
    while i < bytes.len() {
        // state * 33 + bytes[i]
        state = (state << 5)
            .wrapping_add(state)
            .wrapping_add(bytes[i] as u32);

        i += 1;
    }

    // Strip the MSB so the value stays positive as an i32.
    state & (u32::MAX >> 1)
}

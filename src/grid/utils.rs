use serde::{Deserialize, Serialize};
use crate::grid::layouts::AttemptError;

/// Byte order of markers and values. Fortran unformatted files carry no
/// byte-order information, so this always comes from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::native()
    }
}

pub(crate) trait Endian: Sized + Copy {
    const SIZE: usize;

    /// `bytes` must be exactly `SIZE` long.
    fn from_bytes(bytes: &[u8], order: ByteOrder) -> Self;

    fn write_bytes(self, out: &mut Vec<u8>, order: ByteOrder);
}

macro_rules! endian_impl {
    ($ty:ty) => {
        impl Endian for $ty {
            const SIZE: usize = std::mem::size_of::<$ty>();

            fn from_bytes(bytes: &[u8], order: ByteOrder) -> Self {
                let mut buf = [0; std::mem::size_of::<$ty>()];
                buf.copy_from_slice(bytes);
                match order {
                    ByteOrder::LittleEndian => <$ty>::from_le_bytes(buf),
                    ByteOrder::BigEndian => <$ty>::from_be_bytes(buf),
                }
            }

            fn write_bytes(self, out: &mut Vec<u8>, order: ByteOrder) {
                match order {
                    ByteOrder::LittleEndian => out.extend_from_slice(&self.to_le_bytes()),
                    ByteOrder::BigEndian => out.extend_from_slice(&self.to_be_bytes()),
                }
            }
        }
    }
}

endian_impl! { i32 }
endian_impl! { f32 }

/// Forward-only cursor over a borrowed byte slice. Every read is bounds
/// checked up front, so a short input never yields a partial value.
pub(crate) struct Buffer<'a> {
    bytes: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> Buffer<'a> {
    pub(crate) fn new(bytes: &'a [u8], order: ByteOrder) -> Self {
        Self {
            bytes,
            pos: 0,
            order,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], AttemptError> {
        if len > self.remaining() {
            return Err(AttemptError::TruncatedInput {
                offset: self.pos,
                needed: len,
                available: self.remaining(),
            });
        }

        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;

        Ok(slice)
    }

    pub(crate) fn read<T: Endian>(&mut self) -> Result<T, AttemptError> {
        let order = self.order;
        Ok(T::from_bytes(self.take(T::SIZE)?, order))
    }

    pub(crate) fn read_n<T: Endian>(&mut self, count: usize) -> Result<Vec<T>, AttemptError> {
        let order = self.order;
        let len = count.checked_mul(T::SIZE).ok_or(AttemptError::TruncatedInput {
            offset: self.pos,
            needed: usize::MAX,
            available: self.remaining(),
        })?;

        Ok(self.take(len)?
            .chunks_exact(T::SIZE)
            .map(|chunk| T::from_bytes(chunk, order))
            .collect())
    }

    pub(crate) fn skip(&mut self, len: usize) -> Result<(), AttemptError> {
        self.take(len).map(|_| ())
    }
}

use std::cmp::Ordering;

pub use tokio_modbus::{Address, Quantity};

/// 16-bit value stored in Modbus register.
pub type Word = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BytesCountError {
    pub expected: usize,
    pub actual: usize,
}

/// Reinterpret an integer whose in-memory bytes are the big-endian wire bytes
/// as the numeric value the device meant.
///
/// The swap is explicit, so the result does not depend on the host byte order,
/// and applying it twice gives back the input.
pub trait Normalize: Sized {
    fn normalize(self) -> Self;
}

macro_rules! impl_normalize {
    ($num_type:ty) => {
        impl Normalize for $num_type {
            fn normalize(self) -> Self {
                <$num_type>::from_be(self)
            }
        }
    };
}

impl_normalize!(u16);
impl_normalize!(u32);

pub fn normalize16(raw: u16) -> u16 {
    raw.normalize()
}

pub fn normalize32(raw: u32) -> u32 {
    raw.normalize()
}

/// Decode a value from wire-ordered bytes.
pub trait Decode: Sized {
    const SIZE: usize;

    fn from_wire_bytes(bytes: &[u8]) -> Result<Self, BytesCountError>;
}

macro_rules! impl_decode {
    ($num_type:ty) => {
        impl Decode for $num_type {
            const SIZE: usize = std::mem::size_of::<$num_type>();

            fn from_wire_bytes(bytes: &[u8]) -> Result<Self, BytesCountError> {
                let array = bytes.try_into().or(Err(BytesCountError {
                    expected: Self::SIZE,
                    actual: bytes.len(),
                }))?;
                // Raw copy first, then normalize, as the register block arrives.
                Ok(<$num_type>::from_ne_bytes(array).normalize())
            }
        }
    };
}

impl_decode!(u16);
impl_decode!(u32);

/// Encode a value into big-endian ordered `Word`s.
pub trait Encode {
    fn to_be_words(self) -> Vec<Word>;
}

macro_rules! impl_encode {
    ($num_type:ty) => {
        impl Encode for $num_type {
            fn to_be_words(self) -> Vec<Word> {
                bytes_to_words(&self.to_be_bytes())
            }
        }
    };
}

impl_encode!(u16);
impl_encode!(u32);

/// Flatten register words into the byte sequence seen on the wire.
pub fn words_to_bytes(words: &[Word]) -> Vec<u8> {
    words.iter().copied().flat_map(u16::to_be_bytes).collect()
}

/// Pack wire bytes into register words. An odd trailing byte is padded with zero.
pub fn bytes_to_words(bytes: &[u8]) -> Vec<Word> {
    bytes
        .chunks(2)
        .map(|chunk| match *chunk {
            [hi, lo] => u16::from_be_bytes([hi, lo]),
            [hi] => u16::from_be_bytes([hi, 0]),
            _ => unreachable!("chunks(2) yields one or two bytes"),
        })
        .collect()
}

/// Apply a power-of-ten scaler to a raw register value.
///
/// Non-negative exponents multiply by `10^s`, negative ones divide by `10^-s`.
/// Both powers are exact in `f64` for `|s| <= 22`, so each branch rounds once.
pub fn scale(raw: f64, scaler: i8) -> f64 {
    match scaler.cmp(&0) {
        Ordering::Equal => raw,
        Ordering::Greater => raw * 10f64.powi(i32::from(scaler)),
        Ordering::Less => raw / 10f64.powi(-i32::from(scaler)),
    }
}

/// Positional reader over a fixed-layout byte block.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], BytesCountError> {
        let end = self.pos + n;
        let slice = self.bytes.get(self.pos..end).ok_or(BytesCountError {
            expected: end,
            actual: self.bytes.len(),
        })?;
        self.pos = end;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, BytesCountError> {
        Ok(self.take(1)?[0])
    }

    pub fn read<T: Decode>(&mut self) -> Result<T, BytesCountError> {
        T::from_wire_bytes(self.take(T::SIZE)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize16_is_self_inverse() {
        for v in 0..=u16::MAX {
            assert_eq!(normalize16(normalize16(v)), v);
        }
    }

    #[test]
    fn normalize32_is_self_inverse() {
        let samples = (0..=u32::MAX).step_by(65_521).chain([u32::MAX, 1, 0x0102_0304]);
        for v in samples {
            assert_eq!(normalize32(normalize32(v)), v);
        }
    }

    #[test]
    fn normalize_reads_wire_order() {
        assert_eq!(normalize16(u16::from_ne_bytes([0x00, 0x64])), 100);
        assert_eq!(normalize16(u16::from_ne_bytes([0x07, 0xE8])), 2024);
        assert_eq!(
            normalize32(u32::from_ne_bytes([0x00, 0x00, 0x03, 0xE8])),
            1000
        );
        assert_eq!(
            normalize32(u32::from_ne_bytes([0x12, 0x34, 0x56, 0x78])),
            0x1234_5678
        );
    }

    #[test]
    fn decode_rejects_wrong_size() {
        assert_eq!(
            u32::from_wire_bytes(&[0x00, 0x01]),
            Err(BytesCountError {
                expected: 4,
                actual: 2
            })
        );
        assert_eq!(u16::from_wire_bytes(&[0xFF, 0xFE]), Ok(0xFFFE));
    }

    #[test]
    fn words_and_bytes() {
        assert_eq!(words_to_bytes(&[0x07E8, 0x0A0F]), vec![0x07, 0xE8, 0x0A, 0x0F]);
        assert_eq!(bytes_to_words(&[0x41, 0x42, 0x43]), vec![0x4142, 0x4300]);
        assert_eq!(0x0001_0002u32.to_be_words(), vec![0x0001, 0x0002]);
        assert_eq!(7u16.to_be_words(), vec![7]);
    }

    #[test]
    fn scale_by_powers_of_ten() {
        assert_eq!(scale(123.0, 0), 123.0);
        assert_eq!(scale(100.0, -1), 10.0);
        assert_eq!(scale(98.0, -2), 0.98);
        assert_eq!(scale(1000.0, 2), 100_000.0);
        assert_eq!(scale(12_345.0, -3), 12.345);
        assert_eq!(scale(0.0, -5), 0.0);
    }

    #[test]
    fn cursor_reads_positionally() {
        let bytes = [0x07, 0xE8, 0x0A, 0x00, 0x00, 0x03, 0xE8];
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read::<u16>(), Ok(2024));
        assert_eq!(cursor.read_u8(), Ok(10));
        assert_eq!(cursor.read::<u32>(), Ok(1000));
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(
            cursor.read_u8(),
            Err(BytesCountError {
                expected: 8,
                actual: 7
            })
        );
        assert_eq!(cursor.position(), 7);
    }
}

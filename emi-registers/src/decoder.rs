//! Decoders turning raw register blocks into values.
//!
//! Every decoder issues exactly one transport read and decodes only when the
//! read succeeded with enough bytes. Nothing is kept between calls.

use tracing::trace;

use crate::clock::ClockRecord;
use crate::codec::{scale, Address, BytesCountError, Decode, Quantity};
use crate::error::{DecodeError, DecodeResult};
use crate::octet_string::OctetString;
use crate::transport::RegisterTransport;

/// Register address of the device clock object.
pub const CLOCK_ADDRESS: Address = 0x0001;

fn short_read(address: Address, err: BytesCountError) -> DecodeError {
    DecodeError::PartialRead {
        address,
        expected: err.expected,
        actual: err.actual,
    }
}

/// Read the registers covering `byte_count` bytes and return exactly that many bytes.
async fn read_block<T>(
    transport: &mut T,
    address: Address,
    byte_count: usize,
) -> DecodeResult<Vec<u8>>
where
    T: RegisterTransport + ?Sized,
{
    let register_count = byte_count.div_ceil(2) as Quantity;
    let mut bytes = transport
        .read_registers(address, register_count, byte_count as u16)
        .await?;
    if bytes.len() < byte_count {
        return Err(DecodeError::PartialRead {
            address,
            expected: byte_count,
            actual: bytes.len(),
        });
    }
    bytes.truncate(byte_count);
    Ok(bytes)
}

async fn decode_scaled<N, T>(
    transport: &mut T,
    address: Address,
    scaler: i8,
) -> DecodeResult<f64>
where
    N: Decode + Into<f64> + std::fmt::Debug,
    T: RegisterTransport + ?Sized,
{
    let bytes = read_block(transport, address, N::SIZE).await?;
    let raw = N::from_wire_bytes(&bytes).map_err(|err| short_read(address, err))?;
    trace!(address, ?raw, scaler, "decoded raw register value");
    Ok(scale(raw.into(), scaler))
}

/// Read one register holding an unsigned 16-bit value and scale it by `10^scaler`.
pub async fn decode_scaled_u16<T>(
    transport: &mut T,
    address: Address,
    scaler: i8,
) -> DecodeResult<f64>
where
    T: RegisterTransport + ?Sized,
{
    decode_scaled::<u16, T>(transport, address, scaler).await
}

/// Read two registers holding an unsigned 32-bit value and scale it by `10^scaler`.
pub async fn decode_scaled_u32<T>(
    transport: &mut T,
    address: Address,
    scaler: i8,
) -> DecodeResult<f64>
where
    T: RegisterTransport + ?Sized,
{
    decode_scaled::<u32, T>(transport, address, scaler).await
}

/// Read the device clock at [`CLOCK_ADDRESS`].
pub async fn decode_clock<T>(transport: &mut T) -> DecodeResult<ClockRecord>
where
    T: RegisterTransport + ?Sized,
{
    decode_clock_at(transport, CLOCK_ADDRESS).await
}

pub async fn decode_clock_at<T>(
    transport: &mut T,
    address: Address,
) -> DecodeResult<ClockRecord>
where
    T: RegisterTransport + ?Sized,
{
    let bytes = read_block(transport, address, ClockRecord::WIRE_SIZE).await?;
    let clock = ClockRecord::from_wire(&bytes).map_err(|err| short_read(address, err))?;
    trace!(address, ?clock, "decoded clock");
    Ok(clock)
}

/// Read `length` octets starting at `address`.
///
/// A zero length yields an empty string without a transport read.
pub async fn decode_octet_string<T>(
    transport: &mut T,
    address: Address,
    length: u8,
) -> DecodeResult<OctetString>
where
    T: RegisterTransport + ?Sized,
{
    if length == 0 {
        return Ok(OctetString::default());
    }
    let bytes = read_block(transport, address, length.into()).await?;
    trace!(address, length, "decoded octet string");
    Ok(OctetString::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{TransportError, TransportResult};
    use async_trait::async_trait;

    /// Answers every read with the same bytes, or fails, and records requests.
    #[derive(Debug, Default)]
    struct Scripted {
        reply: Option<Vec<u8>>,
        requests: Vec<(Address, Quantity, u16)>,
    }

    impl Scripted {
        fn answering(bytes: &[u8]) -> Self {
            Self {
                reply: Some(bytes.to_vec()),
                requests: Vec::new(),
            }
        }

        fn failing() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl RegisterTransport for Scripted {
        async fn read_registers(
            &mut self,
            address: Address,
            register_count: Quantity,
            byte_count: u16,
        ) -> TransportResult<Vec<u8>> {
            self.requests.push((address, register_count, byte_count));
            self.reply
                .clone()
                .ok_or_else(|| TransportError::Unavailable("link down".to_string()))
        }
    }

    #[tokio::test]
    async fn u16_with_negative_scaler() {
        let mut transport = Scripted::answering(&[0x00, 0x64]);
        let value = decode_scaled_u16(&mut transport, 0x0010, -1)
            .await
            .unwrap();
        assert_eq!(value, 10.0);
        assert_eq!(transport.requests, vec![(0x0010, 1, 2)]);
    }

    #[tokio::test]
    async fn u16_without_scaler_is_raw() {
        let mut transport = Scripted::answering(&[0xFF, 0xFE]);
        let value = decode_scaled_u16(&mut transport, 0x0010, 0).await.unwrap();
        assert_eq!(value, 65_534.0);
    }

    #[tokio::test]
    async fn u32_with_positive_scaler() {
        let mut transport = Scripted::answering(&[0x00, 0x00, 0x03, 0xE8]);
        let value = decode_scaled_u32(&mut transport, 0x0020, 2)
            .await
            .unwrap();
        assert_eq!(value, 100_000.0);
        assert_eq!(transport.requests, vec![(0x0020, 2, 4)]);
    }

    #[tokio::test]
    async fn u32_short_read() {
        let mut transport = Scripted::answering(&[0x00, 0x00]);
        let err = decode_scaled_u32(&mut transport, 0x0020, 0)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::PartialRead {
                address: 0x0020,
                expected: 4,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn clock_fields() {
        let mut transport = Scripted::answering(&[
            0x07, 0xE8, 0x0A, 0x0F, 0x02, 0x0E, 0x1E, 0x05, 0x00, 0x00, 0x00, 0x01,
        ]);
        let clock = decode_clock(&mut transport).await.unwrap();
        assert_eq!(clock.year, 2024);
        assert_eq!(clock.month, 10);
        assert_eq!(clock.day, 15);
        assert_eq!(clock.weekday, 2);
        assert_eq!(clock.hour, 14);
        assert_eq!(clock.minute, 30);
        assert_eq!(clock.second, 5);
        assert_eq!(clock.hundredths, 0);
        assert_eq!(clock.deviation, 0);
        assert_eq!(clock.clock_status, 1);
        assert_eq!(transport.requests, vec![(CLOCK_ADDRESS, 6, 12)]);
    }

    #[tokio::test]
    async fn clock_short_read() {
        let mut transport =
            Scripted::answering(&[0x07, 0xE8, 0x0A, 0x0F, 0x02, 0x0E, 0x1E, 0x05, 0x00, 0x00]);
        let err = decode_clock(&mut transport).await.unwrap_err();
        assert!(matches!(
            err,
            DecodeError::PartialRead {
                expected: 12,
                actual: 10,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn failures_carry_no_value() {
        let mut transport = Scripted::failing();
        let u16_result = decode_scaled_u16(&mut transport, 1, 0).await;
        let u32_result = decode_scaled_u32(&mut transport, 1, 0).await;
        let clock_result = decode_clock(&mut transport).await;
        let octets_result = decode_octet_string(&mut transport, 1, 4).await;

        assert!(u16_result.unwrap_err().is_transport());
        assert!(u32_result.unwrap_err().is_transport());
        assert!(clock_result.unwrap_err().is_transport());
        assert!(octets_result.unwrap_err().is_transport());
        assert_eq!(transport.requests.len(), 4);
    }

    #[tokio::test]
    async fn octet_string_has_requested_length() {
        let block: Vec<u8> = (b'A'..=b'Z').collect();
        for length in 0..=block.len() as u8 {
            let mut transport = Scripted::answering(&block);
            let octets = decode_octet_string(&mut transport, 0x0040, length)
                .await
                .unwrap();
            assert_eq!(octets.len(), usize::from(length));
            assert_eq!(octets.as_bytes(), &block[..usize::from(length)]);
        }
    }

    #[tokio::test]
    async fn octet_string_odd_length_reads_whole_registers() {
        let mut transport = Scripted::answering(b"ABCDEF");
        let octets = decode_octet_string(&mut transport, 0x0040, 5)
            .await
            .unwrap();
        assert_eq!(octets.as_bytes(), b"ABCDE");
        assert_eq!(transport.requests, vec![(0x0040, 3, 5)]);
    }

    #[tokio::test]
    async fn empty_octet_string_skips_transport() {
        let mut transport = Scripted::failing();
        let octets = decode_octet_string(&mut transport, 0x0040, 0)
            .await
            .unwrap();
        assert!(octets.is_empty());
        assert!(transport.requests.is_empty());
    }
}

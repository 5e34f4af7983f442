use async_trait::async_trait;
use tokio_modbus::client::Reader;

use crate::codec::{words_to_bytes, Address, Quantity, Word};
use crate::error::{TransportError, TransportResult};

#[async_trait]
/// Narrow read access to the device registers.
///
/// Implementations return the raw bytes of `register_count` consecutive
/// registers starting at `address`, in wire order, or the failure reported by
/// the link. `byte_count` is the number of bytes the caller is going to decode.
pub trait RegisterTransport: Send {
    async fn read_registers(
        &mut self,
        address: Address,
        register_count: Quantity,
        byte_count: u16,
    ) -> TransportResult<Vec<u8>>;
}

/// [`RegisterTransport`] over a [tokio-modbus](https://github.com/slowtec/tokio-modbus) client.
///
/// EMI devices publish their objects as input registers, so every read is a
/// "read input registers" request.
#[derive(Debug)]
pub struct ModbusTransport<C> {
    client: C,
}

impl<C: Reader> ModbusTransport<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn into_inner(self) -> C {
        self.client
    }
}

#[async_trait]
impl<C: Reader> RegisterTransport for ModbusTransport<C> {
    async fn read_registers(
        &mut self,
        address: Address,
        register_count: Quantity,
        byte_count: u16,
    ) -> TransportResult<Vec<u8>> {
        let response = self
            .client
            .read_input_registers(address, register_count)
            .await;
        response_to_bytes(response, byte_count)
    }
}

fn response_to_bytes(
    response: tokio_modbus::Result<Vec<Word>>,
    byte_count: u16,
) -> TransportResult<Vec<u8>> {
    let words = response?.map_err(TransportError::Exception)?;
    let mut bytes = words_to_bytes(&words);
    bytes.truncate(byte_count.into());
    Ok(bytes)
}

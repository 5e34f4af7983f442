use std::collections::HashMap;

use async_trait::async_trait;

use crate::codec::{bytes_to_words, words_to_bytes, Address, Quantity, Word};
use crate::error::{TransportError, TransportResult};
use crate::transport::RegisterTransport;

#[derive(Debug, Clone, Default)]
/// In-memory EMI input registers, usable wherever a [`RegisterTransport`] is expected.
pub struct Registers(HashMap<Address, Word>);

impl Registers {
    /// Insert new consecutive registers with `words` values starting at `addr` address.
    pub fn insert(&mut self, addr: Address, words: Vec<Word>) {
        for (i, value) in words.into_iter().enumerate() {
            let reg_addr = addr + i as Address;
            self.0.insert(reg_addr, value);
        }
    }

    /// Insert wire bytes starting at `addr`. An odd trailing byte is padded with zero.
    pub fn insert_bytes(&mut self, addr: Address, bytes: &[u8]) {
        self.insert(addr, bytes_to_words(bytes));
    }

    /// Drop the register at `addr`, making reads that cover it fail.
    pub fn remove(&mut self, addr: Address) -> Option<Word> {
        self.0.remove(&addr)
    }

    /// Read `cnt` consecutive registers starting at `addr`.
    pub fn read(&self, addr: Address, cnt: Quantity) -> TransportResult<Vec<Word>> {
        (0..cnt)
            .map(|i| {
                let reg_addr = addr.wrapping_add(i);
                self.0
                    .get(&reg_addr)
                    .copied()
                    .ok_or(TransportError::Exception(
                        tokio_modbus::Exception::IllegalDataAddress,
                    ))
            })
            .collect()
    }
}

#[async_trait]
impl RegisterTransport for Registers {
    async fn read_registers(
        &mut self,
        address: Address,
        register_count: Quantity,
        byte_count: u16,
    ) -> TransportResult<Vec<u8>> {
        let words = self.read(address, register_count)?;
        let mut bytes = words_to_bytes(&words);
        bytes.truncate(byte_count.into());
        Ok(bytes)
    }
}

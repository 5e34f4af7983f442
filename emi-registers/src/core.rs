use async_trait::async_trait;

use crate::error::DecodeError;
use crate::transport::RegisterTransport;

#[async_trait]
/// Define mapping between EMI input registers and the Self type
/// to create and update the type instance by decoding values directly from the device registers.
///
/// An update stops at the first field that fails to decode and returns that error;
/// fields decoded before it keep their new values.
pub trait InputRegisterMap
where
    Self: Sized + Default,
{
    async fn update_from_input_registers(
        &mut self,
        transport: &mut dyn RegisterTransport,
    ) -> Result<(), DecodeError>;

    async fn from_input_registers(
        transport: &mut dyn RegisterTransport,
    ) -> Result<Self, DecodeError> {
        let mut new = Self::default();
        new.update_from_input_registers(transport).await?;

        Ok(new)
    }
}

/// RTU client reading the EMI clock and the configured data loads.
///
/// Usage: `cargo run --example rtu-client --features serial -- [config.json] [device]`
use emi_registers::config::EmiConfig;
use emi_registers::{decode_clock, ModbusTransport};
use tokio_modbus::{client::rtu::attach_slave, slave::Slave};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "appsettings.json".to_string());
    let path = args.next().unwrap_or_else(|| "/dev/ttyUSB0".to_string());
    let baud_rate = 9600;

    let config = EmiConfig::from_path(&config_path)?;
    let builder = tokio_serial::new(&path, baud_rate);
    let serial_stream = tokio_serial::SerialStream::open(&builder)?;
    // EMI devices answer on slave id 1 unless reconfigured.
    let slave = Slave(1);
    let mut transport = ModbusTransport::new(attach_slave(serial_stream, slave));

    match decode_clock(&mut transport).await {
        Ok(clock) => info!(?clock, datetime = ?clock.to_naive_datetime(), "device clock"),
        Err(err) => error!(%err, "cannot read device clock"),
    }

    for load in &config.data_loads {
        match load.read(&mut transport).await {
            Ok(reading) => info!(name = %load.name, unit = %load.unit, ?reading, "data load"),
            Err(err) => error!(name = %load.name, %err, "cannot read data load"),
        }
    }

    Ok(())
}

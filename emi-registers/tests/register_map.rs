use emi_registers::codec::Encode;
use emi_registers::core::InputRegisterMap;
use emi_registers::derive::{emi_doc, InputRegisterMap};
use emi_registers::simulator::Registers;
use emi_registers::{ClockRecord, DecodeError, OctetString, TransportError};

#[emi_doc]
#[derive(Debug, Clone, Default, InputRegisterMap)]
pub struct MeterReadings {
    #[emi(addr = 0x0001, ty = "clock")]
    pub clock: ClockRecord,
    #[emi(addr = 0x0010, ty = "octets(6)")]
    pub device_id: OctetString,
    #[emi(addr = 0x0020, ty = "u16", scaler = -1, unit = "V")]
    pub voltage_l1: f64,
    #[emi(addr = 0x0021, ty = "u16", scaler = -2, unit = "A")]
    pub current_l1: f64,
    #[emi(addr = 0x0030, ty = "u32", scaler = 2, unit = "Wh")]
    pub active_energy_import: f64,
    #[emi(addr = 0x0032, ty = "u32")]
    pub active_power: f64,
    // Not mapped to any register.
    pub label: String,
}

fn device() -> Registers {
    let mut registers = Registers::default();
    registers.insert_bytes(
        0x0001,
        &[
            0x07, 0xE8, 0x0A, 0x0F, 0x02, 0x0E, 0x1E, 0x05, 0x00, 0xFF, 0xC4, 0x80,
        ],
    );
    registers.insert_bytes(0x0010, b"EMI-01");
    registers.insert(0x0020, 2301u16.to_be_words());
    registers.insert(0x0021, 512u16.to_be_words());
    registers.insert(0x0030, 1000u32.to_be_words());
    registers.insert(0x0032, 70_000u32.to_be_words());
    registers
}

#[tokio::test]
async fn reads_all_mapped_fields() {
    let mut registers = device();
    let readings = MeterReadings::from_input_registers(&mut registers)
        .await
        .unwrap();

    assert_eq!(readings.clock.year, 2024);
    assert_eq!(readings.clock.hundredths, 0);
    assert_eq!(readings.clock.deviation, -60);
    assert_eq!(readings.clock.clock_status, 0x80);
    assert_eq!(readings.device_id.as_bytes(), b"EMI-01");
    assert_eq!(readings.voltage_l1, 230.1);
    assert_eq!(readings.current_l1, 5.12);
    assert_eq!(readings.active_energy_import, 100_000.0);
    assert_eq!(readings.active_power, 70_000.0);
    assert!(readings.label.is_empty());
}

#[tokio::test]
async fn missing_register_fails_the_update() {
    let mut registers = device();
    registers.remove(0x0031);

    let mut readings = MeterReadings {
        label: "kept".to_string(),
        ..Default::default()
    };
    let err = readings
        .update_from_input_registers(&mut registers)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DecodeError::Transport(TransportError::Exception(_))
    ));
    // Fields at lower addresses were decoded before the failure.
    assert_eq!(readings.voltage_l1, 230.1);
    assert_eq!(readings.active_energy_import, 0.0);
    assert_eq!(readings.label, "kept");
}

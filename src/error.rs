use failure::Fail;

use crate::gpio::{
	Pin,
	PinRole,
};

/// Contract violations on the EEPROM bus.
///
/// All of them are detected before the offending pin access happens.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Fail)]
pub enum BusError {
	#[fail(display = "EEPROM address 0x{:04x} out of range (max 0x07ff)", address)]
	AddressOutOfRange {
		address: u16,
	},
	#[fail(display = "invalid address range 0x{:03x}..=0x{:03x}", from, to)]
	InvalidRange {
		from: u16,
		to: u16,
	},
	#[fail(display = "{} has role {:?}, expected {}", pin, actual, expected)]
	WrongPinRole {
		pin: Pin,
		expected: PinRole,
		actual: Option<PinRole>,
	},
	#[fail(display = "refusing to drive data bus while EEPROM output is enabled")]
	BusContention,
}

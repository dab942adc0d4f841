use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use super::{
	Hardware,
	Pin,
	PinMode,
};
use crate::BusError;

/// What a claimed pin is currently used for
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum PinRole {
	// shift register SER / SRCLK / RCLK
	SerialOut,
	// EEPROM write-enable
	ControlOut,
	EepromDataOut,
	EepromDataIn,
}

impl PinRole {
	pub fn mode(self) -> PinMode {
		match self {
			PinRole::EepromDataIn => PinMode::Input,
			PinRole::SerialOut | PinRole::ControlOut | PinRole::EepromDataOut => PinMode::Output,
		}
	}
}

impl fmt::Display for PinRole {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let name = match self {
			PinRole::SerialOut => "serial output",
			PinRole::ControlOut => "control output",
			PinRole::EepromDataOut => "data output",
			PinRole::EepromDataIn => "data input",
		};
		f.write_str(name)
	}
}

pub struct PinBank<H: Hardware> {
	hardware: H,
	roles: HashMap<Pin, PinRole>,
}

impl<H: Hardware> PinBank<H> {
	pub fn new(hardware: H) -> Self {
		PinBank {
			hardware,
			roles: HashMap::new(),
		}
	}

	pub fn hardware(&self) -> &H {
		&self.hardware
	}

	pub fn role(&self, pin: Pin) -> Option<PinRole> {
		self.roles.get(&pin).cloned()
	}

	/// Switch `pin` to `role`, changing its direction if needed.
	pub fn assign(&mut self, pin: Pin, role: PinRole) {
		let previous = self.role(pin);
		if previous == Some(role) {
			return;
		}
		trace!("{}: {:?} -> {}", pin, previous, role);
		if previous.map(PinRole::mode) != Some(role.mode()) {
			self.hardware.set_mode(pin, role.mode());
		}
		self.roles.insert(pin, role);
	}

	/// Like `assign`, but presets the output level before the direction
	/// changes, so the pin never shows a different level first.
	pub fn assign_with_level(&mut self, pin: Pin, role: PinRole, high: bool) {
		assert!(role.mode() == PinMode::Output, "{} is not an output role", role);
		self.hardware.write_pin(pin, high);
		self.assign(pin, role);
	}

	fn expect(&self, pin: Pin, expected: PinRole) -> crate::AResult<()> {
		let actual = self.role(pin);
		if actual != Some(expected) {
			return Err(BusError::WrongPinRole { pin, expected, actual }.into());
		}
		Ok(())
	}

	pub fn drive(&mut self, pin: Pin, expected: PinRole, high: bool) -> crate::AResult<()> {
		assert!(expected.mode() == PinMode::Output, "{} is not an output role", expected);
		self.expect(pin, expected)?;
		self.hardware.write_pin(pin, high);
		Ok(())
	}

	pub fn sample(&mut self, pin: Pin) -> crate::AResult<bool> {
		self.expect(pin, PinRole::EepromDataIn)?;
		Ok(self.hardware.read_pin(pin))
	}

	pub fn delay(&mut self, duration: Duration) {
		self.hardware.delay(duration);
	}
}

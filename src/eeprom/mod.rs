/// Byte level access to an AT28C16 (2K x 8 parallel EEPROM)
///
/// Address and /OE come from the shift register chain, the data bus and /WE
/// are host pins.
///
/// Write: latch address with /OE high, drive data, pulse /WE low (the chip
/// latches data on the rising edge), then wait for the internal write cycle.
///
/// Read: release the data bus, latch address with /OE low, sample the bus.
///
/// The chip can't tell us anything (no DATA polling wired, no status), so
/// every timing is a fixed worst case delay.

use std::ops::{
	Deref,
	DerefMut,
};
use std::time::Duration;

use crate::BusError;
use crate::gpio::{
	Hardware,
	Pin,
	PinBank,
	PinRole,
};
use crate::shift_register::ShiftRegister;
use crate::wiring::{
	PINS,
	PinAssignment,
};

mod dump;
mod word;

pub use self::dump::DumpFormat;
pub use self::word::{
	MAX_ADDRESS,
	ShiftWord,
	check_address,
};

// t_WP: 100ns min
pub const WRITE_PULSE: Duration = Duration::from_micros(1);
// t_WC: 1ms max for the AT28C16, but the slower clones need more
pub const WRITE_CYCLE: Duration = Duration::from_millis(10);
// t_ACC: 200ns max
pub const OUTPUT_SETTLE: Duration = Duration::from_micros(1);

/// Waits for the internal write cycle when dropped, so nothing can touch the
/// bus before the chip finished committing the byte.
struct WriteCycle<'a, H: Hardware + 'a>(&'a mut PinBank<H>);

impl<'a, H: Hardware> Drop for WriteCycle<'a, H> {
	fn drop(&mut self) {
		self.0.delay(WRITE_CYCLE);
	}
}

impl<'a, H: Hardware> Deref for WriteCycle<'a, H> {
	type Target = PinBank<H>;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl<'a, H: Hardware> DerefMut for WriteCycle<'a, H> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

pub struct Eeprom<H: Hardware> {
	bank: PinBank<H>,
	shift_register: ShiftRegister,
	pins: PinAssignment,
	output_enabled: bool,
}

impl<H: Hardware> Eeprom<H> {
	pub fn new(hardware: H, pins: &PinAssignment) -> crate::AResult<Self> {
		let mut bank = PinBank::new(hardware);

		// /WE must never glitch low, that would start a write
		bank.assign_with_level(pins.write_enable, PinRole::ControlOut, true);

		let shift_register = ShiftRegister::new(pins);
		shift_register.claim(&mut bank);

		for &pin in &pins.data {
			bank.assign(pin, PinRole::EepromDataIn);
		}

		let mut eeprom = Eeprom {
			bank,
			shift_register,
			pins: *pins,
			// unknown until the first latch; assume the worst
			output_enabled: true,
		};
		eeprom.park()?;
		Ok(eeprom)
	}

	pub fn hardware(&self) -> &H {
		self.bank.hardware()
	}

	pub fn is_output_enabled(&self) -> bool {
		self.output_enabled
	}

	// data pins back to input; only valid while /OE is high or about to be
	// driven low by the caller
	fn release_data_bus(&mut self) {
		for &pin in &self.pins.data {
			self.bank.assign(pin, PinRole::EepromDataIn);
		}
	}

	/// Disable the EEPROM output, release the data bus, address 0.
	pub fn park(&mut self) -> crate::AResult<()> {
		self.select_address(0, false)?;
		self.release_data_bus();
		Ok(())
	}

	/// Latch `address` and /OE into the shift registers.
	///
	/// Enabling the output releases the data bus first, so the chip never
	/// drives against us.
	pub fn select_address(&mut self, address: u16, output_enable: bool) -> crate::AResult<()> {
		let word = ShiftWord::new(address, output_enable)?;
		if output_enable {
			self.release_data_bus();
		}
		trace!("select {:?}", word);
		self.shift_register.send(&mut self.bank, word.bits())?;
		self.output_enabled = output_enable;
		Ok(())
	}

	fn drive_data(&mut self, value: u8) -> crate::AResult<()> {
		if self.output_enabled {
			return Err(BusError::BusContention.into());
		}
		for &(pin, high) in self.pins.data_levels(value).iter() {
			self.bank.assign(pin, PinRole::EepromDataOut);
			self.bank.drive(pin, PinRole::EepromDataOut, high)?;
		}
		Ok(())
	}

	fn sample_data(&mut self) -> crate::AResult<u8> {
		let mut levels = [(Pin(0), false); 8];
		for (slot, &pin) in levels.iter_mut().zip(self.pins.data.iter()) {
			*slot = (pin, self.bank.sample(pin)?);
		}
		Ok(self.pins.data_value(&levels))
	}

	// /WE low for `WRITE_PULSE`, then back up; blocks for the write cycle
	// afterwards, even on error
	fn strobe_write_enable(&mut self) -> crate::AResult<()> {
		let write_enable = self.pins.write_enable;
		let mut cycle = WriteCycle(&mut self.bank);
		cycle.drive(write_enable, PinRole::ControlOut, false)?;
		cycle.delay(WRITE_PULSE);
		cycle.drive(write_enable, PinRole::ControlOut, true)?;
		Ok(())
	}

	pub fn write_byte(&mut self, address: u16, value: u8) -> crate::AResult<()> {
		self.select_address(address, false)?;
		self.drive_data(value)?;
		trace!("write 0x{:03x} <- 0x{:02x}", address, value);
		self.strobe_write_enable()
	}

	pub fn read_byte(&mut self, address: u16) -> crate::AResult<u8> {
		self.select_address(address, true)?;
		self.bank.delay(OUTPUT_SETTLE);
		let value = self.sample_data()?;
		trace!("read 0x{:03x} -> 0x{:02x}", address, value);
		Ok(value)
	}

	/// Read `from..=to`
	pub fn dump_range(&mut self, from: u16, to: u16) -> crate::AResult<Vec<(u16, u8)>> {
		check_address(from)?;
		check_address(to)?;
		if from > to {
			return Err(BusError::InvalidRange { from, to }.into());
		}

		let mut result = Vec::with_capacity((to - from) as usize + 1);
		for address in from..=to {
			result.push((address, self.read_byte(address)?));
		}
		Ok(result)
	}

	/// Write all entries in order; returns number of bytes written
	pub fn program<I>(&mut self, entries: I) -> crate::AResult<usize>
	where
		I: IntoIterator<Item = (u16, u8)>,
	{
		let mut count = 0;
		for (address, value) in entries {
			self.write_byte(address, value)?;
			count += 1;
			if 0 == count % 256 {
				debug!("written {} bytes", count);
			}
		}
		Ok(count)
	}

	pub fn verify<I>(&mut self, entries: I) -> crate::AResult<()>
	where
		I: IntoIterator<Item = (u16, u8)>,
	{
		for (address, expected) in entries {
			let actual = self.read_byte(address)?;
			ensure!(actual == expected,
				"Verify failed at 0x{:03x}: expected 0x{:02x}, EEPROM has 0x{:02x}", address, expected, actual
			);
		}
		Ok(())
	}

	pub fn program_and_verify(&mut self, entries: &[(u16, u8)]) -> crate::AResult<()> {
		let count = self.program(entries.iter().cloned())?;
		info!("written {} bytes, verifying", count);
		self.verify(entries.iter().cloned())
	}
}

impl<H: Hardware> Drop for Eeprom<H> {
	fn drop(&mut self) {
		let _ = self.park();
	}
}

/// Programmer on the default board wiring
pub fn open_eeprom<H: Hardware>(hardware: H) -> crate::AResult<Eeprom<H>> {
	Eeprom::new(hardware, &PINS)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::gpio::sim::Simulator;

	fn simulated() -> Eeprom<Simulator> {
		open_eeprom(Simulator::new(&PINS)).unwrap()
	}

	#[test]
	fn starts_parked() {
		let ee = simulated();
		assert!(!ee.is_output_enabled());
		let word = ee.hardware().presented_word();
		assert_eq!(word.address(), 0);
		assert!(!word.is_output_enabled());
		assert!(ee.hardware().memory().iter().all(|&b| b == 0xff));
	}

	#[test]
	fn read_leaves_output_enabled_and_bus_released() {
		let mut ee = simulated();
		ee.write_byte(0x10, 0x5a).unwrap();
		assert_eq!(ee.read_byte(0x10).unwrap(), 0x5a);
		assert!(ee.is_output_enabled());
		for &pin in &PINS.data {
			assert_eq!(ee.bank.role(pin), Some(PinRole::EepromDataIn));
		}
	}

	#[test]
	fn driving_with_output_enabled_is_refused() {
		let mut ee = simulated();
		ee.select_address(3, true).unwrap();
		let err = ee.drive_data(0x00).unwrap_err();
		assert_eq!(err.downcast_ref::<BusError>(), Some(&BusError::BusContention));
		assert!(ee.hardware().violations().is_empty());
	}

	#[test]
	fn out_of_range_touches_nothing() {
		let mut ee = simulated();
		let before = ee.hardware().events().len();

		let err = ee.write_byte(2048, 0x00).unwrap_err();
		assert_eq!(err.downcast_ref::<BusError>(), Some(&BusError::AddressOutOfRange { address: 2048 }));
		let err = ee.select_address(4000, false).unwrap_err();
		assert_eq!(err.downcast_ref::<BusError>(), Some(&BusError::AddressOutOfRange { address: 4000 }));
		assert!(ee.read_byte(0x800).is_err());

		assert_eq!(ee.hardware().events().len(), before);
	}

	#[test]
	fn dump_range_checks_bounds() {
		let mut ee = simulated();
		ee.program(vec![(5, 1), (6, 2), (7, 3)]).unwrap();
		assert_eq!(ee.dump_range(5, 7).unwrap(), vec![(5, 1), (6, 2), (7, 3)]);
		assert_eq!(ee.dump_range(2047, 2047).unwrap(), vec![(2047, 0xff)]);

		let err = ee.dump_range(7, 5).unwrap_err();
		assert_eq!(err.downcast_ref::<BusError>(), Some(&BusError::InvalidRange { from: 7, to: 5 }));
		assert!(ee.dump_range(0, 2048).is_err());
	}

	#[test]
	fn verify_reports_mismatch() {
		let mut ee = simulated();
		ee.program(vec![(0, 0x7e), (1, 0x12)]).unwrap();
		assert!(ee.verify(vec![(0, 0x7e), (1, 0x12)]).is_ok());
		let err = ee.verify(vec![(0, 0x7e), (1, 0x13)]).unwrap_err();
		assert_eq!(err.to_string(), "Verify failed at 0x001: expected 0x13, EEPROM has 0x12");
	}
}

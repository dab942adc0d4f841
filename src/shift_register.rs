/// Two chained 74HC595 serial-in / parallel-out shift registers
///
/// Bits are presented on SER and clocked in on the rising SRCLK edge; the
/// shift stage is copied to the output stage on the rising RCLK edge, so the
/// parallel outputs only ever change once per `send`.

use std::time::Duration;

use crate::gpio::{
	Hardware,
	Pin,
	PinBank,
	PinRole,
};
use crate::wiring::PinAssignment;

// 74HC595 needs ~25ns setup / pulse width at 2V; generous
pub const CLOCK_EDGE: Duration = Duration::from_nanos(250);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ShiftRegister {
	serial_data: Pin,
	shift_clock: Pin,
	latch_clock: Pin,
}

impl ShiftRegister {
	pub fn new(pins: &PinAssignment) -> Self {
		ShiftRegister {
			serial_data: pins.serial_data,
			shift_clock: pins.shift_clock,
			latch_clock: pins.latch_clock,
		}
	}

	/// Claim SER / SRCLK / RCLK as outputs, all low.
	pub fn claim<H: Hardware>(&self, bank: &mut PinBank<H>) {
		for &pin in &[self.serial_data, self.shift_clock, self.latch_clock] {
			bank.assign_with_level(pin, PinRole::SerialOut, false);
		}
	}

	// rising edge does the work; back to low afterwards
	fn pulse<H: Hardware>(&self, bank: &mut PinBank<H>, pin: Pin) -> crate::AResult<()> {
		bank.drive(pin, PinRole::SerialOut, true)?;
		bank.delay(CLOCK_EDGE);
		bank.drive(pin, PinRole::SerialOut, false)?;
		bank.delay(CLOCK_EDGE);
		Ok(())
	}

	// highest bit first
	fn shift_byte<H: Hardware>(&self, bank: &mut PinBank<H>, byte: u8) -> crate::AResult<()> {
		for bit in (0..8).rev() {
			let bit_mask = 1u8 << bit;
			bank.drive(self.serial_data, PinRole::SerialOut, 0 != byte & bit_mask)?;
			bank.delay(CLOCK_EDGE); // wait for SER to be stable
			self.pulse(bank, self.shift_clock)?;
		}
		Ok(())
	}

	/// Shift `bits` into the chain and latch it.
	///
	/// The high byte is shifted first and so ends up in the last register of
	/// the chain.
	pub fn send<H: Hardware>(&self, bank: &mut PinBank<H>, bits: u16) -> crate::AResult<()> {
		let msb = (bits >> 8) as u8;
		let lsb = bits as u8;

		self.shift_byte(bank, msb)?;
		self.shift_byte(bank, lsb)?;
		self.pulse(bank, self.latch_clock)
	}
}

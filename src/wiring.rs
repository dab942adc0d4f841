/// Physical wiring of the programmer board
///
/// - 74HC595 #1 (first in chain, fed by SER) holds A0..A7
/// - 74HC595 #2 (fed by #1's QH') holds A8..A10 on QA..QC and /OE on QD
/// - the EEPROM I/O lines go straight to host pins, see `PIN_FOR_BIT`
/// - /WE goes straight to a host pin
///
/// Fixed at build time.

use crate::gpio::Pin;

/// Host pin wired to EEPROM I/O line `k`.
///
/// The data header is wired in reverse: I/O0 sits on the highest pin.
pub const PIN_FOR_BIT: [Pin; 8] = [
	Pin(12), Pin(11), Pin(10), Pin(9),
	Pin(8), Pin(7), Pin(6), Pin(5),
];

pub const PINS: PinAssignment = PinAssignment {
	serial_data: Pin(2),
	latch_clock: Pin(3),
	shift_clock: Pin(4),
	write_enable: Pin(13),
	data: PIN_FOR_BIT,
};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PinAssignment {
	pub serial_data: Pin,  // SER
	pub shift_clock: Pin,  // SRCLK
	pub latch_clock: Pin,  // RCLK
	pub write_enable: Pin, // /WE, active low
	pub data: [Pin; 8],    // indexed by EEPROM I/O line
}

impl PinAssignment {
	pub fn bit_for_pin(&self, pin: Pin) -> Option<usize> {
		self.data.iter().position(|&p| p == pin)
	}

	/// Pin levels presenting `value` on the data bus
	pub fn data_levels(&self, value: u8) -> [(Pin, bool); 8] {
		let mut levels = [(Pin(0), false); 8];
		for (bit, slot) in levels.iter_mut().enumerate() {
			*slot = (self.data[bit], 0 != value & (1 << bit));
		}
		levels
	}

	/// Inverse of `data_levels`; order of `levels` doesn't matter, pins not
	/// on the data bus are ignored.
	pub fn data_value(&self, levels: &[(Pin, bool)]) -> u8 {
		let mut value = 0u8;
		for &(pin, high) in levels {
			if let (Some(bit), true) = (self.bit_for_pin(pin), high) {
				value |= 1 << bit;
			}
		}
		value
	}
}

/// Simulated programmer board
///
/// Models what the host pins are wired to:
/// - two chained 74HC595: SER sampled on rising SRCLK into a 16-bit shift
///   stage (first bit in ends up in the MSB), copied to the output stage on
///   rising RCLK
/// - an AT28C16 behind the output stage: A0..A10 from bits 0..10, /OE from
///   bit 11; data latched on rising /WE, then busy for `WRITE_CYCLE_TIME`
///
/// Time only advances through `Hardware::delay`. Every pin access is logged
/// with its timestamp, and protocol violations (bus contention, bus activity
/// during a write cycle, write strobe with output enabled) are collected
/// instead of corrupting state silently.

use std::time::Duration;

use super::{
	Hardware,
	Pin,
	PinMode,
};
use crate::eeprom::ShiftWord;
use crate::wiring::{
	PINS,
	PinAssignment,
};

pub const WRITE_CYCLE_TIME: Duration = Duration::from_millis(10);

const EEPROM_SIZE: usize = 2048;
const PIN_COUNT: usize = 64;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum EventKind {
	Mode { pin: Pin, mode: PinMode },
	Drive { pin: Pin, high: bool },
	Sample { pin: Pin, high: bool },
	// derived from the pin activity above
	Shift { bit: bool },
	Latch { word: ShiftWord },
	WriteStrobe { address: u16, value: u8 },
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Event {
	pub at: Duration,
	pub kind: EventKind,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Violation {
	// EEPROM output enabled while host drives a data pin
	Contention { at: Duration, address: u16 },
	// any pin activity before the write cycle completed
	WriteCycleAccess { at: Duration },
	// /WE strobed while /OE low; the chip ignores the write
	WriteInhibited { at: Duration, address: u16 },
}

pub struct Simulator {
	pins: PinAssignment,
	now: Duration,
	modes: [PinMode; PIN_COUNT],
	levels: [bool; PIN_COUNT],
	shift_stage: u16,
	output_stage: u16,
	memory: Vec<u8>,
	busy_until: Option<Duration>,
	events: Vec<Event>,
	violations: Vec<Violation>,
}

impl Default for Simulator {
	fn default() -> Self {
		Simulator::new(&PINS)
	}
}

impl Simulator {
	/// Erased chip (all 0xff), all pins input; the output stage powers up
	/// as zero, i.e. with the EEPROM output enabled.
	pub fn new(pins: &PinAssignment) -> Self {
		Simulator {
			pins: *pins,
			now: Duration::from_secs(0),
			modes: [PinMode::Input; PIN_COUNT],
			levels: [false; PIN_COUNT],
			shift_stage: 0,
			output_stage: 0,
			memory: vec![0xff; EEPROM_SIZE],
			busy_until: None,
			events: Vec::new(),
			violations: Vec::new(),
		}
	}

	pub fn now(&self) -> Duration {
		self.now
	}

	pub fn memory(&self) -> &[u8] {
		&self.memory
	}

	pub fn memory_mut(&mut self) -> &mut [u8] {
		&mut self.memory
	}

	pub fn events(&self) -> &[Event] {
		&self.events
	}

	pub fn clear_events(&mut self) {
		self.events.clear();
	}

	pub fn violations(&self) -> &[Violation] {
		&self.violations
	}

	/// What the shift registers currently present to the EEPROM
	pub fn presented_word(&self) -> ShiftWord {
		ShiftWord::from_bits(self.output_stage)
	}

	fn log(&mut self, kind: EventKind) {
		self.events.push(Event { at: self.now, kind });
	}

	fn is_busy(&self) -> bool {
		match self.busy_until {
			Some(until) => self.now < until,
			None => false,
		}
	}

	fn check_activity(&mut self) {
		if self.is_busy() {
			self.violations.push(Violation::WriteCycleAccess { at: self.now });
		}
	}

	fn check_contention(&mut self) {
		let word = self.presented_word();
		if !word.is_output_enabled() {
			return;
		}
		let driven = self.pins.data.iter().any(|pin| self.modes[pin.0 as usize] == PinMode::Output);
		if driven {
			self.violations.push(Violation::Contention { at: self.now, address: word.address() });
		}
	}

	fn is_output(&self, pin: Pin) -> bool {
		self.modes[pin.0 as usize] == PinMode::Output
	}

	fn level(&self, pin: Pin) -> bool {
		self.levels[pin.0 as usize]
	}

	// what the EEPROM sees on its I/O lines; undriven lines float high
	fn bus_value(&self) -> u8 {
		let mut value = 0u8;
		for (bit, &pin) in self.pins.data.iter().enumerate() {
			if !self.is_output(pin) || self.level(pin) {
				value |= 1 << bit;
			}
		}
		value
	}

	fn rising_edge(&mut self, pin: Pin) {
		if pin == self.pins.shift_clock {
			let bit = self.level(self.pins.serial_data);
			self.shift_stage = (self.shift_stage << 1) | (bit as u16);
			self.log(EventKind::Shift { bit });
		} else if pin == self.pins.latch_clock {
			self.output_stage = self.shift_stage;
			let word = self.presented_word();
			self.log(EventKind::Latch { word });
			self.check_contention();
		} else if pin == self.pins.write_enable {
			self.write_strobe();
		}
	}

	fn write_strobe(&mut self) {
		let word = self.presented_word();
		let address = word.address();
		if word.is_output_enabled() {
			self.violations.push(Violation::WriteInhibited { at: self.now, address });
			return;
		}
		let value = self.bus_value();
		self.memory[address as usize] = value;
		self.busy_until = Some(self.now + WRITE_CYCLE_TIME);
		self.log(EventKind::WriteStrobe { address, value });
	}
}

impl Hardware for Simulator {
	fn set_mode(&mut self, pin: Pin, mode: PinMode) {
		self.check_activity();
		self.modes[pin.0 as usize] = mode;
		self.log(EventKind::Mode { pin, mode });
		if self.pins.bit_for_pin(pin).is_some() {
			self.check_contention();
		}
	}

	fn write_pin(&mut self, pin: Pin, high: bool) {
		self.check_activity();
		let rising = high && !self.level(pin) && self.is_output(pin);
		self.levels[pin.0 as usize] = high;
		self.log(EventKind::Drive { pin, high });
		if rising {
			self.rising_edge(pin);
		}
	}

	fn read_pin(&mut self, pin: Pin) -> bool {
		self.check_activity();
		let high = match self.pins.bit_for_pin(pin) {
			Some(_) if self.is_output(pin) => self.level(pin),
			Some(bit) => {
				let word = self.presented_word();
				if word.is_output_enabled() && !self.is_busy() {
					0 != self.memory[word.address() as usize] & (1 << bit)
				} else {
					// floating
					true
				}
			},
			None => self.level(pin),
		};
		self.log(EventKind::Sample { pin, high });
		high
	}

	fn delay(&mut self, duration: Duration) {
		self.now += duration;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn clock_in(sim: &mut Simulator, word: u16) {
		for bit in (0..16).rev() {
			sim.write_pin(PINS.serial_data, 0 != word & (1 << bit));
			sim.write_pin(PINS.shift_clock, true);
			sim.write_pin(PINS.shift_clock, false);
		}
	}

	fn outputs(sim: &mut Simulator) {
		for &pin in &[PINS.serial_data, PINS.shift_clock, PINS.latch_clock] {
			sim.set_mode(pin, PinMode::Output);
		}
	}

	#[test]
	fn outputs_only_change_on_latch() {
		let mut sim = Simulator::default();
		outputs(&mut sim);
		clock_in(&mut sim, 0x0abc);
		assert_eq!(sim.presented_word().bits(), 0x0000);
		sim.write_pin(PINS.latch_clock, true);
		assert_eq!(sim.presented_word().bits(), 0x0abc);
	}

	#[test]
	fn edges_on_input_pins_are_ignored() {
		let mut sim = Simulator::default();
		clock_in(&mut sim, 0xffff);
		sim.write_pin(PINS.latch_clock, true);
		assert_eq!(sim.presented_word().bits(), 0x0000);
	}

	#[test]
	fn contention_is_recorded() {
		let mut sim = Simulator::default();
		// output stage powers up with /OE low
		sim.set_mode(PINS.data[3], PinMode::Output);
		assert_eq!(sim.violations(), &[Violation::Contention { at: Duration::from_secs(0), address: 0 }]);
	}

	#[test]
	fn write_cycle_blocks_bus() {
		let mut sim = Simulator::default();
		outputs(&mut sim);
		clock_in(&mut sim, 0x0805);
		sim.write_pin(PINS.latch_clock, true);
		sim.write_pin(PINS.write_enable, true);
		sim.set_mode(PINS.write_enable, PinMode::Output);
		sim.write_pin(PINS.write_enable, false);
		sim.write_pin(PINS.write_enable, true);
		// nothing driven: floating bus reads as 0xff
		assert_eq!(sim.memory()[5], 0xff);
		assert!(sim.violations().is_empty());

		sim.delay(Duration::from_millis(9));
		sim.write_pin(PINS.write_enable, true);
		assert_eq!(sim.violations(), &[Violation::WriteCycleAccess { at: Duration::from_millis(9) }]);

		sim.delay(Duration::from_millis(1));
		sim.write_pin(PINS.write_enable, true);
		assert_eq!(sim.violations().len(), 1);
	}
}

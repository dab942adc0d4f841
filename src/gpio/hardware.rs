use std::fmt;
use std::thread;
use std::time::{
	Duration,
	Instant,
};

pub fn reliable_sleep(mut duration: Duration) {
	loop {
		let now = Instant::now();
		thread::sleep(duration);
		let elapsed = now.elapsed();
		if elapsed >= duration {
			return;
		}
		duration -= elapsed;
	}
}

/// Host GPIO number
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pin(pub u8);

impl fmt::Display for Pin {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "GPIO{}", self.0)
	}
}

impl fmt::Debug for Pin {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "GPIO{}", self.0)
	}
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum PinMode {
	Input,
	Output,
}

pub trait Hardware {
	fn set_mode(&mut self, pin: Pin, mode: PinMode);

	// output level; on input pins this only presets the level used once the
	// pin becomes an output
	fn write_pin(&mut self, pin: Pin, high: bool);

	fn read_pin(&mut self, pin: Pin) -> bool;

	// block for (at least) `duration`
	fn delay(&mut self, duration: Duration) {
		reliable_sleep(duration);
	}
}

impl<'a, H: ?Sized + Hardware> Hardware for &'a mut H {
	fn set_mode(&mut self, pin: Pin, mode: PinMode) {
		H::set_mode(*self, pin, mode)
	}

	fn write_pin(&mut self, pin: Pin, high: bool) {
		H::write_pin(*self, pin, high)
	}

	fn read_pin(&mut self, pin: Pin) -> bool {
		H::read_pin(*self, pin)
	}

	fn delay(&mut self, duration: Duration) {
		H::delay(*self, duration)
	}
}

/// Host GPIO access
///
/// `Hardware` is the minimal set of pin primitives the programmer needs:
/// pin direction, drive, sample and a blocking delay. `PinBank` wraps a
/// `Hardware` and remembers which role every claimed pin currently has, so
/// the data bus can't be sampled while driven (or driven while claimed as
/// input).
///
/// Backends:
/// - `linux::open_gpiomem`: BCM283x GPIO block mapped from `/dev/gpiomem`
/// - `sim::Simulator`: two chained 74HC595 plus an AT28C16, on a virtual clock

mod bank;
mod hardware;
pub mod linux;
pub mod sim;

pub use self::bank::{
	PinBank,
	PinRole,
};

pub use self::hardware::{
	Hardware,
	Pin,
	PinMode,
	reliable_sleep,
};

use std::fmt;

use crate::BusError;

// shift register word layout
const ADDRESS_MASK:   u16 = 0x07ff; // A0..A10
const OUTPUT_DISABLE: u16 = 0x0800; // /OE, active low at the chip
const UNUSED_MASK:    u16 = 0xf000; // QE..QH of the second register, always zero

pub const MAX_ADDRESS: u16 = ADDRESS_MASK;

pub fn check_address(address: u16) -> crate::AResult<()> {
	if address > MAX_ADDRESS {
		return Err(BusError::AddressOutOfRange { address }.into());
	}
	Ok(())
}

/// Value latched into the shift register chain: address plus /OE
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShiftWord(u16);

impl ShiftWord {
	/// Addresses above `MAX_ADDRESS` are rejected, never masked.
	pub fn new(address: u16, output_enable: bool) -> crate::AResult<Self> {
		check_address(address)?;
		let oe_bit = if output_enable { 0 } else { OUTPUT_DISABLE };
		Ok(ShiftWord(oe_bit | address))
	}

	/// Wrap whatever the chain currently presents (unchecked).
	pub fn from_bits(bits: u16) -> Self {
		ShiftWord(bits)
	}

	pub fn bits(&self) -> u16 {
		self.0
	}

	pub fn address(&self) -> u16 {
		self.0 & ADDRESS_MASK
	}

	pub fn is_output_enabled(&self) -> bool {
		0 == self.0 & OUTPUT_DISABLE
	}

	pub fn is_well_formed(&self) -> bool {
		0 == self.0 & UNUSED_MASK
	}
}

impl fmt::Display for ShiftWord {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:04x}", self.0)
	}
}

impl fmt::Debug for ShiftWord {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:04x} (address: 0x{:03x}", self.0, self.address())?;
		if self.is_output_enabled() { write!(f, " [OE]")?; }
		if !self.is_well_formed() { write!(f, " [GARBAGE]")?; }
		write!(f, ")")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn output_enable_is_active_low() {
		for a in 0..=MAX_ADDRESS {
			let on = ShiftWord::new(a, true).unwrap();
			assert_eq!(on.bits() & 0x0800, 0);
			assert_eq!(on.bits() & 0x07ff, a);
			assert!(on.is_output_enabled());

			let off = ShiftWord::new(a, false).unwrap();
			assert_eq!(off.bits() & 0x0800, 0x0800);
			assert_eq!(off.bits() & 0x07ff, a);
			assert!(!off.is_output_enabled());

			assert!(on.is_well_formed() && off.is_well_formed());
		}
	}

	#[test]
	fn out_of_range_address_is_rejected() {
		for &address in &[2048u16, 4000, 0xffff] {
			let err = ShiftWord::new(address, false).unwrap_err();
			assert_eq!(err.downcast_ref::<BusError>(), Some(&BusError::AddressOutOfRange { address }));
		}
	}

	#[test]
	fn debug_shows_flags() {
		let word = ShiftWord::new(0x123, true).unwrap();
		assert_eq!(format!("{:?}", word), "0x0123 (address: 0x123 [OE])");
		assert_eq!(format!("{}", ShiftWord::new(0x7ff, false).unwrap()), "0x0fff");
		assert_eq!(format!("{:?}", ShiftWord::from_bits(0xf800)), "0xf800 (address: 0x000 [GARBAGE])");
	}
}

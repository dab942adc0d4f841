/// Lookup tables to burn
///
/// Pure data: every table is a list of `(address, value)` pairs, handed to
/// `Eeprom::program` / `Eeprom::verify`.

use std::fmt;
use std::str;

pub mod microcode;
pub mod segment;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Table {
	/// 3-bit input to 7-segment digit
	Segment3,
	/// signed 8-bit input to 4 multiplexed 7-segment digits
	Segment8,
	MicrocodeFirst,
	MicrocodeSecond,
}

pub const ALL_TABLES: [Table; 4] = [
	Table::Segment3,
	Table::Segment8,
	Table::MicrocodeFirst,
	Table::MicrocodeSecond,
];

impl Table {
	pub fn name(self) -> &'static str {
		match self {
			Table::Segment3 => "segment3",
			Table::Segment8 => "segment8",
			Table::MicrocodeFirst => "microcode-first",
			Table::MicrocodeSecond => "microcode-second",
		}
	}

	pub fn entries(self) -> Vec<(u16, u8)> {
		match self {
			Table::Segment3 => segment::three_bit_decoder(),
			Table::Segment8 => segment::signed_decimal_decoder(),
			Table::MicrocodeFirst => microcode::table(microcode::Chip::First),
			Table::MicrocodeSecond => microcode::table(microcode::Chip::Second),
		}
	}
}

impl fmt::Display for Table {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl str::FromStr for Table {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		for &table in ALL_TABLES.iter() {
			if table.name() == s {
				return Ok(table);
			}
		}
		bail!("unknown table {:?}", s)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::eeprom::MAX_ADDRESS;

	#[test]
	fn names_round_trip() {
		for &table in ALL_TABLES.iter() {
			assert_eq!(table.to_string().parse::<Table>().unwrap(), table);
		}
		assert!("segment4".parse::<Table>().is_err());
	}

	#[test]
	fn addresses_fit_and_are_unique() {
		for &table in ALL_TABLES.iter() {
			let mut addresses: Vec<u16> = table.entries().iter().map(|&(a, _)| a).collect();
			assert!(addresses.iter().all(|&a| a <= MAX_ADDRESS), "{}", table);
			let count = addresses.len();
			addresses.sort();
			addresses.dedup();
			assert_eq!(addresses.len(), count, "{}", table);
		}
	}
}

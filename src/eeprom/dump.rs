use std::str;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum DumpFormat {
	Binary,
	Decimal,
	Hex,
}

impl DumpFormat {
	pub fn format_entry(self, address: u16, value: u8) -> String {
		match self {
			DumpFormat::Binary => {
				let bits: Vec<&str> = (0..8).rev()
					.map(|bit| if 0 != value & (1u8 << bit) { "1" } else { "0" })
					.collect();
				format!("Address: {} Value: {}", address, bits.join(" "))
			},
			DumpFormat::Decimal => format!("Address: {} Value: {}", address, value),
			DumpFormat::Hex => format!("Address: {} Value: {:X}", address, value),
		}
	}
}

impl str::FromStr for DumpFormat {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"bin" | "binary" => Ok(DumpFormat::Binary),
			"dec" | "decimal" => Ok(DumpFormat::Decimal),
			"hex" => Ok(DumpFormat::Hex),
			_ => bail!("unknown dump format {:?} (expected bin, dec or hex)", s),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn formats() {
		assert_eq!(DumpFormat::Binary.format_entry(2, 0xBC), "Address: 2 Value: 1 0 1 1 1 1 0 0");
		assert_eq!(DumpFormat::Decimal.format_entry(2047, 0x7E), "Address: 2047 Value: 126");
		assert_eq!(DumpFormat::Hex.format_entry(10, 0x0e), "Address: 10 Value: E");
	}

	#[test]
	fn parse() {
		assert_eq!("bin".parse::<DumpFormat>().unwrap(), DumpFormat::Binary);
		assert_eq!("decimal".parse::<DumpFormat>().unwrap(), DumpFormat::Decimal);
		assert_eq!("hex".parse::<DumpFormat>().unwrap(), DumpFormat::Hex);
		assert!("octal".parse::<DumpFormat>().is_err());
	}
}

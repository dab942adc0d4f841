/// 7-segment patterns, as wired on the display board:
///
/// bit 7: G, 6: F, 5: A, 4: B, 3: E, 2: D, 1: C, 0: unused
///
/// Index is the digit.
pub const DIGITS: [u8; 10] = [
	0b0111_1110, 0b0001_0010, 0b1011_1100, 0b1011_0110, 0b1101_0010,
	0b1110_0110, 0b1110_1110, 0b0011_0010, 0b1111_1110, 0b1111_0010,
];

pub const BLANK: u8 = 0b0000_0000;
pub const MINUS: u8 = 0b1000_0000;

// A8/A9 select which display of the multiplexed output gets driven
const HUNDREDS: u16 = 0b00 << 8;
const TENS:     u16 = 0b10 << 8;
const ONES:     u16 = 0b01 << 8;
const SIGN:     u16 = 0b11 << 8;

/// 3 input bits (A0..A2) to a single digit 0..7
pub fn three_bit_decoder() -> Vec<(u16, u8)> {
	(0..8u16).map(|address| (address, DIGITS[address as usize])).collect()
}

/// Two's complement byte on A0..A7 shown as sign plus three decimal digits.
pub fn signed_decimal_decoder() -> Vec<(u16, u8)> {
	let mut entries = Vec::with_capacity(4 * 256);
	for number in -128i16..=127 {
		let bits = (number as i8 as u8) as u16;
		let magnitude = number.abs() as usize;

		entries.push((HUNDREDS | bits, DIGITS[(magnitude / 100) % 10]));
		entries.push((TENS | bits, DIGITS[(magnitude / 10) % 10]));
		entries.push((ONES | bits, DIGITS[magnitude % 10]));
		entries.push((SIGN | bits, if number < 0 { MINUS } else { BLANK }));
	}
	entries
}

#[cfg(test)]
mod tests {
	use super::*;

	fn lookup(entries: &[(u16, u8)], address: u16) -> u8 {
		entries.iter().find(|&&(a, _)| a == address).map(|&(_, v)| v).unwrap()
	}

	#[test]
	fn three_bit() {
		let entries = three_bit_decoder();
		assert_eq!(entries.len(), 8);
		assert_eq!(&entries[..3], &[(0, 0x7e), (1, 0x12), (2, 0xbc)]);
		assert_eq!(entries[7], (7, 0x32));
	}

	#[test]
	fn signed_decimal() {
		let entries = signed_decimal_decoder();
		assert_eq!(entries.len(), 1024);

		// -103 = 0b1001_1001
		assert_eq!(lookup(&entries, 0x000 | 0x99), DIGITS[1]);
		assert_eq!(lookup(&entries, 0x200 | 0x99), DIGITS[0]);
		assert_eq!(lookup(&entries, 0x100 | 0x99), DIGITS[3]);
		assert_eq!(lookup(&entries, 0x300 | 0x99), MINUS);

		// 127
		assert_eq!(lookup(&entries, 0x000 | 0x7f), DIGITS[1]);
		assert_eq!(lookup(&entries, 0x200 | 0x7f), DIGITS[2]);
		assert_eq!(lookup(&entries, 0x100 | 0x7f), DIGITS[7]);
		assert_eq!(lookup(&entries, 0x300 | 0x7f), BLANK);

		// -128 has no positive i8 counterpart
		assert_eq!(lookup(&entries, 0x000 | 0x80), DIGITS[1]);
		assert_eq!(lookup(&entries, 0x200 | 0x80), DIGITS[2]);
		assert_eq!(lookup(&entries, 0x100 | 0x80), DIGITS[8]);
		assert_eq!(lookup(&entries, 0x300 | 0x80), MINUS);

		assert_eq!(lookup(&entries, 0x300), BLANK);
		assert_eq!(lookup(&entries, 0x100), DIGITS[0]);
	}
}

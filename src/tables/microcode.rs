/// Control ROM for an 8-bit breadboard CPU
///
/// 16 control signals don't fit one EEPROM, so the control word is split:
/// the high byte goes into the first EEPROM, the low byte into the second.
/// Both are addressed the same way:
///
/// - A0..A3: instruction opcode
/// - A4..A6: microinstruction step
/// - A7..A10: zero
use std::fmt;
use std::ops::{
	BitOr,
	BitOrAssign,
};

// first EEPROM
pub const HLT: ControlWord = ControlWord(0x8000); // halt clock
pub const MI:  ControlWord = ControlWord(0x4000); // memory address register in
pub const RI:  ControlWord = ControlWord(0x2000); // RAM in
pub const RO:  ControlWord = ControlWord(0x1000); // RAM out
pub const IO:  ControlWord = ControlWord(0x0800); // instruction register out
pub const II:  ControlWord = ControlWord(0x0400); // instruction register in
pub const AI:  ControlWord = ControlWord(0x0200); // A register in
pub const AO:  ControlWord = ControlWord(0x0100); // A register out
// second EEPROM
pub const EO:  ControlWord = ControlWord(0x0080); // sum out
pub const SU:  ControlWord = ControlWord(0x0040); // subtract
pub const BI:  ControlWord = ControlWord(0x0020); // B register in
pub const OI:  ControlWord = ControlWord(0x0010); // output register in
pub const CE:  ControlWord = ControlWord(0x0008); // program counter enable
pub const CO:  ControlWord = ControlWord(0x0004); // program counter out
pub const J:   ControlWord = ControlWord(0x0002); // jump

const SIGNALS: [(ControlWord, &str); 15] = [
	(HLT, "HLT"), (MI, "MI"), (RI, "RI"), (RO, "RO"),
	(IO, "IO"), (II, "II"), (AI, "AI"), (AO, "AO"),
	(EO, "EO"), (SU, "SU"), (BI, "BI"), (OI, "OI"),
	(CE, "CE"), (CO, "CO"), (J, "J"),
];

pub const STEPS: usize = 5;

const STEP_SHIFT: u16 = 4;
const STEP_LIMIT: u8 = 8;
const OPCODE_LIMIT: u8 = 16;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Chip {
	First,
	Second,
}

/// Set of control signals active during one microinstruction step
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ControlWord(pub u16);

impl ControlWord {
	pub fn empty() -> Self {
		ControlWord(0)
	}

	pub fn contains(&self, other: ControlWord) -> bool {
		other.0 == self.0 & other.0
	}

	/// The byte burnt into `chip`
	pub fn byte(&self, chip: Chip) -> u8 {
		match chip {
			Chip::First => (self.0 >> 8) as u8,
			Chip::Second => self.0 as u8,
		}
	}
}

impl BitOr for ControlWord {
	type Output = ControlWord;

	fn bitor(self, other: ControlWord) -> ControlWord {
		ControlWord(self.0 | other.0)
	}
}

impl BitOrAssign for ControlWord {
	fn bitor_assign(&mut self, other: ControlWord) {
		self.0 |= other.0;
	}
}

impl fmt::Debug for ControlWord {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:04x} (", self.0)?;
		let mut first = true;
		for &(signal, name) in SIGNALS.iter() {
			if self.contains(signal) {
				if !first { write!(f, " | ")?; }
				write!(f, "{}", name)?;
				first = false;
			}
		}
		write!(f, ")")
	}
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Instruction {
	Lda = 0b0000,
	Ldb = 0b0001,
	Add = 0b0010,
	Sub = 0b0011,
	Sta = 0b0100,
	Ldi = 0b0101,
	Jmp = 0b0110,
	Out = 0b0111,
	Hlt = 0b1000,
}

pub const INSTRUCTIONS: [Instruction; 9] = [
	Instruction::Lda,
	Instruction::Ldb,
	Instruction::Add,
	Instruction::Sub,
	Instruction::Sta,
	Instruction::Ldi,
	Instruction::Jmp,
	Instruction::Out,
	Instruction::Hlt,
];

impl Instruction {
	pub fn opcode(self) -> u8 {
		self as u8
	}

	pub fn steps(self) -> [ControlWord; STEPS] {
		let none = ControlWord::empty();
		// every instruction starts with the fetch cycle
		let fetch = [MI | CO, RO | II | CE];
		let rest = match self {
			Instruction::Lda => [MI | IO, RO | AI, none],
			Instruction::Ldb => [MI | IO, RO | BI, none],
			Instruction::Add => [MI | IO, RI | EO, none],
			Instruction::Sub => [MI | IO, RO | EO | SU, AI],
			Instruction::Sta => [MI | IO, RI | AO, none],
			Instruction::Ldi => [IO | AI, none, none],
			Instruction::Jmp => [IO | J, none, none],
			Instruction::Out => [AO | OI, none, none],
			Instruction::Hlt => [HLT, none, none],
		};
		[fetch[0], fetch[1], rest[0], rest[1], rest[2]]
	}
}

/// EEPROM address for microinstruction `step` of instruction `opcode`
pub fn microinstruction_address(step: u8, opcode: u8) -> crate::AResult<u16> {
	ensure!(step < STEP_LIMIT, "microinstruction step {} out of range (max {})", step, STEP_LIMIT - 1);
	ensure!(opcode < OPCODE_LIMIT, "opcode 0x{:x} out of range (max 0x{:x})", opcode, OPCODE_LIMIT - 1);
	Ok(((step as u16) << STEP_SHIFT) | opcode as u16)
}

pub fn table(chip: Chip) -> Vec<(u16, u8)> {
	let mut entries = Vec::with_capacity(INSTRUCTIONS.len() * STEPS);
	for &instruction in INSTRUCTIONS.iter() {
		for (step, word) in instruction.steps().iter().enumerate() {
			let address = (step as u16) << STEP_SHIFT | instruction.opcode() as u16;
			entries.push((address, word.byte(chip)));
		}
	}
	entries
}

#[cfg(test)]
mod tests {
	use super::*;

	fn lookup(entries: &[(u16, u8)], step: u8, instruction: Instruction) -> u8 {
		let address = microinstruction_address(step, instruction.opcode()).unwrap();
		entries.iter().find(|&&(a, _)| a == address).map(|&(_, v)| v).unwrap()
	}

	#[test]
	fn addresses() {
		assert_eq!(microinstruction_address(0, 0b0110).unwrap(), 0b0000_0110);
		assert_eq!(microinstruction_address(4, 0b0110).unwrap(), 0b0100_0110);
		assert_eq!(microinstruction_address(7, 0b1111).unwrap(), 0b0111_1111);
		assert!(microinstruction_address(8, 0).is_err());
		assert!(microinstruction_address(0, 16).is_err());
	}

	#[test]
	fn split_across_chips() {
		let word = MI | CO;
		assert_eq!(word.byte(Chip::First), 0b0100_0000);
		assert_eq!(word.byte(Chip::Second), 0b0000_0100);
		assert_eq!(format!("{:?}", word), "0x4004 (MI | CO)");
	}

	#[test]
	fn first_chip() {
		let entries = table(Chip::First);
		assert_eq!(entries.len(), 45);
		assert_eq!(lookup(&entries, 0, Instruction::Lda), 0b0100_0000);
		assert_eq!(lookup(&entries, 1, Instruction::Lda), 0b0001_0100);
		assert_eq!(lookup(&entries, 3, Instruction::Sta), 0b0010_0001);
		assert_eq!(lookup(&entries, 4, Instruction::Sub), 0b0000_0010);
		assert_eq!(lookup(&entries, 2, Instruction::Out), 0b0000_0001);
		assert_eq!(lookup(&entries, 2, Instruction::Hlt), 0b1000_0000);
	}

	#[test]
	fn second_chip() {
		let entries = table(Chip::Second);
		assert_eq!(entries.len(), 45);
		assert_eq!(lookup(&entries, 0, Instruction::Jmp), 0b0000_0100);
		assert_eq!(lookup(&entries, 1, Instruction::Jmp), 0b0000_1000);
		assert_eq!(lookup(&entries, 2, Instruction::Jmp), 0b0000_0010);
		assert_eq!(lookup(&entries, 3, Instruction::Sub), 0b1100_0000);
		assert_eq!(lookup(&entries, 3, Instruction::Ldb), 0b0010_0000);
		assert_eq!(lookup(&entries, 2, Instruction::Out), 0b0001_0000);
		assert_eq!(lookup(&entries, 4, Instruction::Hlt), 0);
	}
}

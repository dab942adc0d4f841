#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

extern crate at28c16_shift_flash;
use at28c16_shift_flash::*;

use std::process::exit;

use at28c16_shift_flash::eeprom::{
	DumpFormat,
	Eeprom,
};
use at28c16_shift_flash::gpio::Hardware;
use at28c16_shift_flash::tables::Table;

fn get_param<T>(matches: &clap::ArgMatches, name: &str) -> AResult<T>
where
	T: std::str::FromStr,
	failure::Error: From<<T as std::str::FromStr>::Err>,
{
	let param = match matches.value_of(name) {
		Some(p) => p,
		None => bail!("missing parameter {}", name),
	};
	param.parse::<T>().map_err(|e| {
		let e = failure::Error::from(e);
		let msg = format!("invalid parameter {}: {}", name, e);
		e.context(msg).into()
	})
}

// decimal, 0x hex or 0b binary
fn parse_number(s: &str) -> AResult<u32> {
	let (digits, radix) = if s.starts_with("0x") || s.starts_with("0X") {
		(&s[2..], 16)
	} else if s.starts_with("0b") || s.starts_with("0B") {
		(&s[2..], 2)
	} else {
		(s, 10)
	};
	Ok(u32::from_str_radix(digits, radix)?)
}

fn get_number(matches: &clap::ArgMatches, name: &str) -> AResult<u32> {
	let param = match matches.value_of(name) {
		Some(p) => p,
		None => bail!("missing parameter {}", name),
	};
	parse_number(param).map_err(|e| {
		let msg = format!("invalid parameter {}: {:?}", name, param);
		e.context(msg).into()
	})
}

// range is checked by the EEPROM layer; only reject what doesn't fit u16
fn get_address(matches: &clap::ArgMatches, name: &str) -> AResult<u16> {
	let n = get_number(matches, name)?;
	ensure!(n <= u16::max_value() as u32, "invalid parameter {}: {} too big", name, n);
	Ok(n as u16)
}

fn get_byte(matches: &clap::ArgMatches, name: &str) -> AResult<u8> {
	let n = get_number(matches, name)?;
	ensure!(n <= 0xff, "invalid parameter {}: {} doesn't fit a byte", name, n);
	Ok(n as u8)
}

fn read<H: Hardware>(ee: &mut Eeprom<H>, sub_m: &clap::ArgMatches) -> AResult<()> {
	let address = get_address(sub_m, "ADDRESS")?;
	let value = ee.read_byte(address)?;
	println!("{}", DumpFormat::Hex.format_entry(address, value));
	Ok(())
}

fn write<H: Hardware>(ee: &mut Eeprom<H>, sub_m: &clap::ArgMatches) -> AResult<()> {
	let address = get_address(sub_m, "ADDRESS")?;
	let value = get_byte(sub_m, "VALUE")?;
	ee.write_byte(address, value)?;
	if sub_m.is_present("verify") {
		ee.verify(Some((address, value)))?;
	}
	Ok(())
}

fn dump<H: Hardware>(ee: &mut Eeprom<H>, sub_m: &clap::ArgMatches) -> AResult<()> {
	let from = get_address(sub_m, "FROM")?;
	let to = get_address(sub_m, "TO")?;
	let format: DumpFormat = match sub_m.value_of("format") {
		None => DumpFormat::Hex,
		Some(_) => get_param(sub_m, "format")?,
	};

	for (address, value) in ee.dump_range(from, to)? {
		println!("{}", format.format_entry(address, value));
	}
	Ok(())
}

fn program<H: Hardware>(ee: &mut Eeprom<H>, sub_m: &clap::ArgMatches) -> AResult<()> {
	let table: Table = get_param(sub_m, "TABLE")?;
	let entries = table.entries();

	info!("Programming {} ({} bytes)", table, entries.len());
	if sub_m.is_present("verify") {
		ee.program_and_verify(&entries)?;
		info!("Programmed and verified {}", table);
	} else {
		ee.program(entries)?;
		info!("Programmed {}", table);
	}
	Ok(())
}

fn verify<H: Hardware>(ee: &mut Eeprom<H>, sub_m: &clap::ArgMatches) -> AResult<()> {
	let table: Table = get_param(sub_m, "TABLE")?;
	ee.verify(table.entries())?;
	println!("{} verified successfully", table);
	Ok(())
}

fn run<H: Hardware>(ee: &mut Eeprom<H>, matches: &clap::ArgMatches) -> AResult<()> {
	match matches.subcommand() {
		("read", Some(sub_m)) => read(ee, sub_m),
		("write", Some(sub_m)) => write(ee, sub_m),
		("dump", Some(sub_m)) => dump(ee, sub_m),
		("program", Some(sub_m)) => program(ee, sub_m),
		("verify", Some(sub_m)) => verify(ee, sub_m),
		("", _) => bail!("no subcommand"),
		(cmd, _) => bail!("not implemented subcommand {:?}", cmd),
	}
}

fn main_app() -> AResult<()> {
	let matches = clap_app!(@app (app_from_crate!())
		(@setting SubcommandRequiredElseHelp)
		(global_setting: clap::AppSettings::VersionlessSubcommands)
		(@arg simulate: -s --simulate "use a simulated EEPROM instead of /dev/gpiomem")
		(@subcommand read =>
			(about: "read a single byte")
			(@arg ADDRESS: +required "EEPROM address (0..=2047; decimal, 0x.. or 0b..)")
		)
		(@subcommand write =>
			(about: "write a single byte")
			(@arg verify: --verify "read byte back after writing")
			(@arg ADDRESS: +required "EEPROM address (0..=2047; decimal, 0x.. or 0b..)")
			(@arg VALUE: +required "byte to write (decimal, 0x.. or 0b..)")
		)
		(@subcommand dump =>
			(about: "print EEPROM contents")
			(@arg format: -f --format +takes_value "output format: bin, dec or hex (default)")
			(@arg FROM: +required "first address")
			(@arg TO: +required "last address (inclusive)")
		)
		(@subcommand program =>
			(about: "burn a lookup table")
			(@arg verify: --verify "read everything back after programming")
			(@arg TABLE: +required "segment3, segment8, microcode-first or microcode-second")
		)
		(@subcommand verify =>
			(about: "compare EEPROM contents with a lookup table")
			(@arg TABLE: +required "segment3, segment8, microcode-first or microcode-second")
		)
	).get_matches();

	if matches.is_present("simulate") {
		let mut ee = eeprom::open_eeprom(gpio::sim::Simulator::default())?;
		let result = run(&mut ee, &matches);
		let violations = ee.hardware().violations();
		if !violations.is_empty() {
			warn!("simulator recorded {} protocol violations, first: {:?}", violations.len(), violations[0]);
		}
		result
	} else {
		let hardware = gpio::linux::open_gpiomem()?;
		let mut ee = eeprom::open_eeprom(hardware)?;
		run(&mut ee, &matches)
	}
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		error!("Error: {}", e);
		exit(1);
	}
}

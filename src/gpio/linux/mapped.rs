use std::ffi::CString;
use std::fs;
use std::io;
use std::os::unix::io::{
	FromRawFd,
};
use std::ptr;

use libc::{
	MAP_SHARED,
	O_CLOEXEC,
	O_RDWR,
	O_SYNC,
	PROT_READ,
	PROT_WRITE,
	c_void,
	mmap,
	munmap,
	open,
};

use crate::gpio::{
	Hardware,
	Pin,
	PinMode,
};

// character device, metadata reports no length
const GPIO_BLOCK_SIZE: usize = 4096;

// register offsets (bytes)
const GPFSEL0: usize = 0x00; // function select, 3 bits per pin, 10 pins per register
const GPSET0: usize = 0x1c; // write 1 to drive high
const GPCLR0: usize = 0x28; // write 1 to drive low
const GPLEV0: usize = 0x34; // pin level, read only

const FSEL_INPUT: u32 = 0b000;
const FSEL_OUTPUT: u32 = 0b001;

const MAX_PIN: u8 = 53;

#[derive(Debug)]
pub struct GpioMem {
	ptr: ptr::NonNull<u32>,
	len: usize,
	// keep the mapping's file open for as long as the mapping lives
	_file: fs::File,
}

impl Drop for GpioMem {
	fn drop(&mut self) {
		unsafe {
			let res = munmap(
				self.ptr.as_ptr() as *mut c_void,
				self.len,
			);
			if 0 != res {
				panic!("munmap failed: {}", io::Error::last_os_error());
			}
		}
	}
}

impl GpioMem {
	fn read_register(&self, offset: usize) -> u32 {
		assert!(offset & 3 == 0);
		assert!(offset + 3 < self.len);
		unsafe { ptr::read_volatile(self.ptr.as_ptr().add(offset / 4)) }
	}

	fn write_register(&mut self, offset: usize, data: u32) {
		assert!(offset & 3 == 0);
		assert!(offset + 3 < self.len);
		unsafe { ptr::write_volatile(self.ptr.as_ptr().add(offset / 4), data) }
	}

	// (bank register offset, bit mask) for GPSET/GPCLR/GPLEV
	fn bank_bit(pin: Pin) -> (usize, u32) {
		assert!(pin.0 <= MAX_PIN, "no such GPIO: {}", pin);
		(4 * (pin.0 as usize / 32), 1u32 << (pin.0 % 32))
	}
}

impl Hardware for GpioMem {
	fn set_mode(&mut self, pin: Pin, mode: PinMode) {
		assert!(pin.0 <= MAX_PIN, "no such GPIO: {}", pin);
		let register = GPFSEL0 + 4 * (pin.0 as usize / 10);
		let shift = 3 * (pin.0 as u32 % 10);
		let fsel = match mode {
			PinMode::Input => FSEL_INPUT,
			PinMode::Output => FSEL_OUTPUT,
		};
		let current = self.read_register(register);
		self.write_register(register, (current & !(0b111 << shift)) | (fsel << shift));
	}

	fn write_pin(&mut self, pin: Pin, high: bool) {
		let (bank, mask) = GpioMem::bank_bit(pin);
		let register = if high { GPSET0 } else { GPCLR0 };
		self.write_register(register + bank, mask);
	}

	fn read_pin(&mut self, pin: Pin) -> bool {
		let (bank, mask) = GpioMem::bank_bit(pin);
		0 != self.read_register(GPLEV0 + bank) & mask
	}
}

// TODO: exclusive open / file locking?
pub fn inner_open(path: &str) -> io::Result<GpioMem> {
	let open_flags = O_RDWR | O_CLOEXEC | O_SYNC;
	let mmap_prot_flags = PROT_READ | PROT_WRITE;

	let path = CString::new(path)?;

	let fd = unsafe { open(path.as_ptr(), open_flags) };
	if -1 == fd {
		return Err(io::Error::last_os_error());
	}
	// now get fd managed to prevent resource leak
	let file = unsafe { fs::File::from_raw_fd(fd) };

	let area = unsafe {
		mmap(
			ptr::null_mut(),
			GPIO_BLOCK_SIZE,
			mmap_prot_flags,
			MAP_SHARED,
			fd,
			0,
		)
	};

	if area as usize == !0usize {
		return Err(io::Error::last_os_error());
	}
	match ptr::NonNull::new(area as *mut u32) {
		None => panic!("mmap shouldn't return NULL ever"),
		Some(area) => Ok(GpioMem {
			ptr: area,
			len: GPIO_BLOCK_SIZE,
			_file: file,
		}),
	}
}

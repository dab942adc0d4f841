mod mapped;

pub use self::mapped::GpioMem;

const GPIOMEM_PATH: &str = "/dev/gpiomem";

/// Map the BCM283x GPIO register block (Raspberry Pi).
///
/// `/dev/gpiomem` only exposes the GPIO block, so this doesn't need root,
/// only membership in the `gpio` group.
pub fn open_gpiomem() -> crate::AResult<GpioMem> {
	with_context!(("couldn't map GPIO registers from {}", GPIOMEM_PATH),
		Ok(mapped::inner_open(GPIOMEM_PATH)?)
	)
}

use bitflags::bitflags;

bitflags! {
	/// Where a metadata value may be written.
	///
	/// An empty set keeps the value in-process only. Header and extension-attribute
	/// placements are limited to primitive values and arrays of primitives.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct Annotation: u8 {
		/// Top-level `metadata` member of HTTP response bodies.
		const HTTP_BODY = 0b0000_0001;
		/// HTTP response header.
		const HTTP_HEADER = 0b0000_0010;
		/// `metadata` member of CloudEvents `data`.
		const EVENT_DATA = 0b0000_0100;
		/// CloudEvents extension attribute.
		const EVENT_EXTENSION = 0b0000_1000;

		/// Both body placements; the default for plain conversions.
		const BODIES = Self::HTTP_BODY.bits() | Self::EVENT_DATA.bits();
		/// Placements that only accept primitives.
		const PRIMITIVE_ONLY = Self::HTTP_HEADER.bits() | Self::EVENT_EXTENSION.bits();
	}
}

impl Default for Annotation {
	fn default() -> Self {
		Self::BODIES
	}
}

impl Annotation {
	/// Whether this set includes a placement that only accepts primitives.
	pub fn requires_primitive(self) -> bool {
		self.intersects(Self::PRIMITIVE_ONLY)
	}
}

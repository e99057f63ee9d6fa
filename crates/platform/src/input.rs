//! Input collaborator contracts: key matrix and infrared decoder.

/// Multiplexed key matrix.
pub trait KeyMatrix {
    /// Scan every line once and return the set of asserted lines as a bitmask.
    ///
    /// Scanning has no error path; a line that cannot be read counts as
    /// not asserted.
    fn read_raw(&mut self) -> u8;
}

impl<M: KeyMatrix + ?Sized> KeyMatrix for &mut M {
    fn read_raw(&mut self) -> u8 {
        (**self).read_raw()
    }
}

/// Infrared protocol family reported by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrProtocol {
    /// Burst could not be matched to a known protocol.
    Unknown,
    /// NEC (and its extended-address variant)
    Nec,
    /// Samsung
    Samsung,
    /// Sony SIRC
    Sony,
    /// Philips RC5
    Rc5,
    /// Philips RC6
    Rc6,
}

impl IrProtocol {
    /// Short display name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Nec => "NEC",
            Self::Samsung => "SAMSUNG",
            Self::Sony => "SONY",
            Self::Rc5 => "RC5",
            Self::Rc6 => "RC6",
        }
    }
}

/// One decoded infrared frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrFrame {
    /// Protocol family
    pub protocol: IrProtocol,
    /// Device address
    pub address: u16,
    /// Command code
    pub command: u16,
    /// Raw frame bits as received
    pub raw: u32,
}

/// Infrared frame decoder.
pub trait IrDecoder {
    /// Return the next fully decoded frame, if one is waiting.
    ///
    /// Returning a frame also re-arms the decoder for the next burst.
    fn poll(&mut self) -> Option<IrFrame>;
}

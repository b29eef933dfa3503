use crate::errors::{ExecutionError, LoadImageError};
use crate::hardware::keyboard::Keyboard;
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Read};
use std::ops::Index;

/// Number of 16-bit cells in the address space.
pub const MEMORY_SIZE: usize = 1 << 16;
/// Address where execution starts and where programs are conventionally placed.
pub const PC_START: u16 = 0x3000;

/// Addresses with device semantics on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryMappedIo {
    /// Keyboard status register: bit 15 set iff a keystroke is pending.
    Kbsr = 0xFE00,
    /// Keyboard data register: holds the pending character code.
    Kbdr = 0xFE02,
}

/// The LC-3 memory: a flat array of [`MEMORY_SIZE`] 16-bit cells.
///
/// All reads go through [`Memory::read`] so that the keyboard device
/// registers are refreshed on access. Writes are plain stores, including
/// writes to the device addresses.
pub struct Memory {
    /// Index equals memory address
    data: Vec<u16>,
}
impl Memory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: vec![0x0u16; MEMORY_SIZE],
        }
    }

    /// Reads the cell at `address`, refreshing the keyboard device registers first.
    ///
    /// A read of the status register polls the keyboard: if a byte is
    /// pending, the status register is set to `0x8000` and the data register
    /// receives the byte; otherwise the status register is cleared. Polling
    /// never blocks.
    ///
    /// # Errors
    /// - Keyboard polling failed on the host side
    pub fn read(
        &mut self,
        address: u16,
        keyboard: &mut impl Keyboard,
    ) -> Result<u16, ExecutionError> {
        if address == MemoryMappedIo::Kbsr as u16 {
            let pending = keyboard
                .poll_key()
                .map_err(|e| ExecutionError::InputOutput(e.to_string()))?;
            match pending {
                Some(byte) => {
                    self.data[MemoryMappedIo::Kbsr as usize] = 1 << 15;
                    self.data[MemoryMappedIo::Kbdr as usize] = u16::from(byte);
                }
                None => self.data[MemoryMappedIo::Kbsr as usize] = 0,
            }
        }
        Ok(self.data[usize::from(address)])
    }

    /// Stores `value` at `address`. No device side effects.
    pub fn write(&mut self, address: u16, value: u16) {
        self.data[usize::from(address)] = value;
    }

    /// Loads a program image from a stream of big-endian 16-bit words.
    ///
    /// The first word is the origin; the remaining words are copied to
    /// consecutive cells starting there. Copying stops at end of input or
    /// once address `0xFFFF` has been filled; an odd trailing byte is
    /// dropped. Returns the origin.
    ///
    /// # Errors
    /// - The origin word cannot be read (empty or unreadable input)
    /// - The underlying reader fails mid-stream
    pub fn load_image(&mut self, mut reader: impl Read) -> io::Result<u16> {
        let origin = reader.read_u16::<BigEndian>()?;
        let mut address = origin;
        loop {
            match reader.read_u16::<BigEndian>() {
                Ok(word) => {
                    self.data[usize::from(address)] = word;
                    if address == u16::MAX {
                        // image longer than memory is cut off here
                        break;
                    }
                    address += 1;
                }
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            }
        }
        Ok(origin)
    }

    /// Loads a program image given as host-order words, `image[0]` being the origin.
    ///
    /// Convenience counterpart of [`Memory::load_image`] for callers that
    /// assemble images in code. Returns the origin.
    ///
    /// # Errors
    /// - Image has no origin word
    /// - Image payload runs past the end of memory
    pub fn load_words(&mut self, image: &[u16]) -> Result<u16, LoadImageError> {
        let Some((origin, payload)) = image.split_first() else {
            return Err(LoadImageError::ImageMissingOrigin);
        };
        let start = usize::from(*origin);
        if start + payload.len() > MEMORY_SIZE {
            return Err(LoadImageError::ImageTooLong {
                origin: *origin,
                words: payload.len(),
            });
        }
        self.data[start..start + payload.len()].copy_from_slice(payload);
        Ok(*origin)
    }
}
impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
impl Index<u16> for Memory {
    type Output = u16;

    /// Raw cell access without device semantics.
    fn index(&self, address: u16) -> &u16 {
        &self.data[usize::from(address)]
    }
}

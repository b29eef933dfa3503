use crate::emulator::Emulator;
use crate::hardware::keyboard::ChannelKeyboard;
use crate::hardware::memory::{Memory, PC_START};
use crate::hardware::registers::Registers;
use std::io;
use std::io::Write;
use std::sync::mpsc;

pub struct StringWriter {
    vec: Vec<u8>,
}
impl Write for StringWriter {
    fn write(&mut self, data: &[u8]) -> Result<usize, io::Error> {
        self.vec.write(data)
    }
    fn flush(&mut self) -> Result<(), io::Error> {
        Ok(())
    }
}
impl StringWriter {
    pub fn new() -> Self {
        let vec = Vec::<u8>::with_capacity(120);
        Self { vec }
    }
    pub fn get_string(&self) -> String {
        String::from_utf8(self.vec.clone()).unwrap()
    }
}

/// An emulator over in-memory parts: a channel-fed keyboard and a string output.
///
/// `program_no_header` is placed at the start address.
pub struct FakeEmulator {
    inner: Emulator<ChannelKeyboard, StringWriter>,
    keyboard_input_sender: mpsc::Sender<u8>,
}
impl FakeEmulator {
    pub fn new(program_no_header: &[u16]) -> Self {
        let mut image = Vec::with_capacity(program_no_header.len() + 1);
        image.push(PC_START);
        image.extend_from_slice(program_no_header);
        let (keyboard_input_sender, receiver) = mpsc::channel();
        let inner = crate::emulator::from_words(
            &image,
            ChannelKeyboard::new(receiver),
            StringWriter::new(),
        )
        .unwrap();
        Self {
            inner,
            keyboard_input_sender,
        }
    }
    /// Queues bytes as pending keyboard input.
    pub fn add_stdin_input(&mut self, input: &[u8]) -> &mut Self {
        for b in input {
            self.keyboard_input_sender
                .send(*b)
                .expect("keyboard channel closed");
        }
        self
    }
    pub fn parts(
        &mut self,
    ) -> (
        &mut Registers,
        &mut Memory,
        &mut ChannelKeyboard,
        &mut StringWriter,
    ) {
        (
            &mut self.inner.registers,
            &mut self.inner.memory,
            &mut self.inner.keyboard,
            &mut self.inner.output,
        )
    }
    pub fn emulator(&mut self) -> &mut Emulator<ChannelKeyboard, StringWriter> {
        &mut self.inner
    }
    pub fn output(&self) -> String {
        self.inner.output.get_string()
    }
}

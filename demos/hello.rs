use lc3_vm::emulator;
use lc3_vm::hardware::keyboard::TerminalKeyboard;
use std::error::Error;
use std::io::stdout;

/// Builds and runs a hello-world image in code:
/// LEA R0, +2; PUTS; HALT; the string one character per word behind it.
fn main() -> Result<(), Box<dyn Error>> {
    let mut image = vec![0x3000u16, 0xE002, 0xF022, 0xF025];
    image.extend("hello world".chars().map(|c| c as u16));
    image.push(0);

    let mut emu = emulator::from_words(&image, TerminalKeyboard::new(), stdout())?;
    emu.execute()?;
    Ok(())
}

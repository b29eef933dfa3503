use lc3_vm::emulator;
use lc3_vm::terminal::{self, EchoOptions};
use std::env;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // no image given is not an error, there is just nothing to run
    let Some(image_path) = env::args().nth(1) else {
        return Ok(());
    };
    let mut emu = emulator::from_image_file(&image_path)?;

    let raw_lock = terminal::set_terminal_raw(EchoOptions::EchoOff)?;
    terminal::install_interrupt_handler(raw_lock.restorer())?;

    emu.execute()?;
    Ok(())
}

use clap::Subcommand;
use stageclock_core::Database;

#[derive(Subcommand)]
pub enum RepeatAction {
    /// Restart the countdown automatically when it ends
    On,
    /// Stop at the end of the countdown
    Off,
    /// Print the saved setting
    Status,
}

pub fn run(action: RepeatAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let repeat = match action {
        RepeatAction::On => {
            db.save_repeat(true)?;
            true
        }
        RepeatAction::Off => {
            db.save_repeat(false)?;
            false
        }
        RepeatAction::Status => db.load_repeat(),
    };
    println!("repeat: {}", if repeat { "on" } else { "off" });
    Ok(())
}

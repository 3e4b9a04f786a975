mod bootstrap;
mod commands;
mod session;

use std::io::{self, BufRead, Write};

use commands::{handle_command, help_text, parse_command, CommandOutcome};
use session::ViewSession;

pub fn run() -> Result<(), String> {
    let wiring = bootstrap::build_app()?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    writeln!(stdout, "{}", help_text()).map_err(|error| error.to_string())?;

    let mut session: Option<ViewSession> = None;
    for line in stdin.lock().lines() {
        let line = line.map_err(|error| format!("failed to read input: {error}"))?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        match handle_command(
            &mut session,
            &wiring.store,
            &wiring.settings,
            command,
            &mut stdout,
        ) {
            Ok(CommandOutcome::Continue) => {}
            Ok(CommandOutcome::Quit) => break,
            Err(message) => eprintln!("{message}"),
        }
    }
    Ok(())
}

use std::env;
use std::process::ExitCode;

use atlas::SideId;
use teleport_cli::{dispatch, DispatchError, TeleportCommand, DEFAULT_PORT, DEFAULT_TIMEOUT_MS};

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}

fn run_cli() -> Result<(), String> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() {
        return Err(usage_text());
    }
    if args[0] == "-h" || args[0] == "--help" {
        print_usage();
        return Ok(());
    }

    let mut port = DEFAULT_PORT;
    let mut timeout_ms = DEFAULT_TIMEOUT_MS;
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "--port" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --port".to_string())?;
                port = value
                    .parse::<u16>()
                    .map_err(|_| format!("invalid --port value '{value}' (expected u16)"))?;
                index += 2;
            }
            "--timeout-ms" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --timeout-ms".to_string())?;
                timeout_ms = value
                    .parse::<u64>()
                    .map_err(|_| format!("invalid --timeout-ms value '{value}' (expected u64)"))?;
                index += 2;
            }
            _ => break,
        }
    }

    let command = args
        .get(index)
        .ok_or_else(|| "missing subcommand".to_string())?
        .as_str();
    let command_args = &args[(index + 1)..];

    match command {
        "send" => {
            let command = parse_send(command_args, port, timeout_ms)?;
            run_send(&command)
        }
        other => Err(format!("unknown subcommand '{other}'")),
    }
}

fn parse_send(args: &[String], port: u16, timeout_ms: u64) -> Result<TeleportCommand, String> {
    let mut area: Option<String> = None;
    let mut side: Option<SideId> = None;
    let mut level: Option<String> = None;
    let mut x: Option<f32> = None;
    let mut y: Option<f32> = None;

    let mut index = 0usize;
    while index < args.len() {
        let flag = args[index].as_str();
        let value = args
            .get(index + 1)
            .ok_or_else(|| format!("missing value for {flag}"))?;
        match flag {
            "--area" => area = Some(value.clone()),
            "--side" => {
                side = Some(
                    SideId::parse(value)
                        .ok_or_else(|| format!("invalid --side value '{value}' (expected a, b, or c)"))?,
                );
            }
            "--level" => level = Some(value.clone()),
            "--x" => {
                x = Some(
                    value
                        .parse::<f32>()
                        .map_err(|_| format!("invalid --x value '{value}' (expected f32)"))?,
                );
            }
            "--y" => {
                y = Some(
                    value
                        .parse::<f32>()
                        .map_err(|_| format!("invalid --y value '{value}' (expected f32)"))?,
                );
            }
            other => return Err(format!("unknown send argument '{other}'")),
        }
        index += 2;
    }

    let area = area.ok_or_else(|| "send requires --area <gameId/chapterGameId>".to_string())?;
    let (area_game_id, chapter_game_id) = area
        .split_once('/')
        .ok_or_else(|| format!("invalid --area value '{area}' (expected gameId/chapterGameId)"))?;

    Ok(TeleportCommand {
        port,
        timeout_ms,
        area_game_id: area_game_id.to_string(),
        chapter_game_id: chapter_game_id.to_string(),
        side: side.ok_or_else(|| "send requires --side <a|b|c>".to_string())?,
        room_id: level.ok_or_else(|| "send requires --level <roomId>".to_string())?,
        x: x.ok_or_else(|| "send requires --x <f32>".to_string())?,
        y: y.ok_or_else(|| "send requires --y <f32>".to_string())?,
    })
}

fn run_send(command: &TeleportCommand) -> Result<(), String> {
    match dispatch(command) {
        Ok(()) => {
            println!("teleport dispatched: {}", command.url());
            Ok(())
        }
        // Not an error from the user's point of view: the game is not up.
        Err(DispatchError::NoListener { port }) => {
            println!("no teleport listener on localhost:{port}; is the game running?");
            Ok(())
        }
        Err(error) => Err(error.to_string()),
    }
}

fn print_usage() {
    println!("{}", usage_text());
}

fn usage_text() -> String {
    [
        "teleport_cli - room teleport client",
        "",
        "Usage:",
        "  teleport_cli [--port <u16>] [--timeout-ms <u64>] send --area <gameId/chapterGameId> --side <a|b|c> --level <roomId> --x <f32> --y <f32>",
        "",
        "Defaults:",
        "  --port 32270",
        "  --timeout-ms 1000",
    ]
    .join("\n")
}

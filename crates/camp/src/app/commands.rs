use std::io::Write;
use std::thread;

use atlas::{
    page_addresses, parse, resolve, CatalogStore, Room, SideId, ViewMode,
};
use teleport_cli::{DispatchError, TeleportCommand, DEFAULT_TIMEOUT_MS};
use tracing::{info, warn};

use super::bootstrap::CampSettings;
use super::session::{SessionEffect, ViewSession};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CampCommand {
    Open { address: String },
    Pages,
    Rooms,
    Room { room_id: String },
    Subroom { index: u32 },
    Side { side: SideId },
    Mode { view: ViewMode },
    Toggle { checkpoint: String },
    Url,
    Teleport,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommandOutcome {
    Continue,
    Quit,
}

pub(crate) fn parse_command(line: &str) -> Result<Option<CampCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let command = match word {
        "open" => {
            if rest.is_empty() {
                return Err("open requires an address, e.g. open /celeste/city?side=a".to_string());
            }
            CampCommand::Open {
                address: rest.to_string(),
            }
        }
        "pages" => CampCommand::Pages,
        "rooms" => CampCommand::Rooms,
        "room" => {
            if rest.is_empty() {
                return Err("room requires a room id".to_string());
            }
            CampCommand::Room {
                room_id: rest.to_string(),
            }
        }
        "subroom" => {
            let index = rest
                .parse::<u32>()
                .map_err(|_| format!("invalid subroom index '{rest}' (expected u32)"))?;
            CampCommand::Subroom { index }
        }
        "side" => {
            let side = SideId::parse(rest)
                .ok_or_else(|| format!("invalid side '{rest}' (expected a, b, or c)"))?;
            CampCommand::Side { side }
        }
        "mode" => {
            let view = ViewMode::parse(rest)
                .ok_or_else(|| format!("invalid mode '{rest}' (expected grid or list)"))?;
            CampCommand::Mode { view }
        }
        "toggle" => {
            if rest.is_empty() {
                return Err("toggle requires a checkpoint name".to_string());
            }
            CampCommand::Toggle {
                checkpoint: rest.to_string(),
            }
        }
        "url" => CampCommand::Url,
        "teleport" | "tp" => CampCommand::Teleport,
        "help" => CampCommand::Help,
        "quit" | "exit" => CampCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try help)")),
    };
    Ok(Some(command))
}

pub(crate) fn handle_command(
    session: &mut Option<ViewSession>,
    store: &CatalogStore,
    settings: &CampSettings,
    command: CampCommand,
    out: &mut impl Write,
) -> Result<CommandOutcome, String> {
    match command {
        CampCommand::Open { address } => {
            let raw = parse(&address).map_err(|error| error.to_string())?;
            let fields = resolve(store, &raw, settings.view_mode).map_err(|error| error.to_string())?;
            let opened = ViewSession::from_fields(store, &fields);
            print_page_header(&opened, store, out)?;
            write_line(out, &format!("address: {}", opened.address(store)))?;
            *session = Some(opened);
        }
        CampCommand::Pages => {
            for page in page_addresses(store) {
                write_line(out, &page.path())?;
            }
        }
        CampCommand::Rooms => {
            let session = current(session)?;
            print_rooms(session, store, out)?;
        }
        CampCommand::Room { room_id } => {
            let session = current(session)?;
            let effects = session.select_room(store, &room_id);
            print_effects(&effects, out)?;
        }
        CampCommand::Subroom { index } => {
            let session = current(session)?;
            let effects = session.select_subroom(store, index);
            print_effects(&effects, out)?;
        }
        CampCommand::Side { side } => {
            let session = current(session)?;
            let effects = session.set_side(store, side);
            print_effects(&effects, out)?;
        }
        CampCommand::Mode { view } => {
            let session = current(session)?;
            let effects = session.set_view_mode(store, view);
            print_effects(&effects, out)?;
        }
        CampCommand::Toggle { checkpoint } => {
            let session = current(session)?;
            let effects = session.toggle_checkpoint(store, &checkpoint);
            print_effects(&effects, out)?;
        }
        CampCommand::Url => {
            let session = current(session)?;
            write_line(out, &session.address(store))?;
        }
        CampCommand::Teleport => {
            let session = current(session)?;
            let command = build_teleport_command(session, store, settings)
                .ok_or_else(|| "teleport requires a selected room".to_string())?;
            write_line(out, &format!("teleport: {}", command.url()))?;
            dispatch_detached(command);
        }
        CampCommand::Help => {
            write_line(out, help_text())?;
        }
        CampCommand::Quit => return Ok(CommandOutcome::Quit),
    }
    Ok(CommandOutcome::Continue)
}

fn current<'a>(session: &'a mut Option<ViewSession>) -> Result<&'a mut ViewSession, String> {
    session
        .as_mut()
        .ok_or_else(|| "no page open (use open <address>)".to_string())
}

/// Builds the teleport request for the selected room's default spawn using
/// the game-native ids. Returns None if no room is selected or the selection
/// no longer resolves.
pub(crate) fn build_teleport_command(
    session: &ViewSession,
    store: &CatalogStore,
    settings: &CampSettings,
) -> Option<TeleportCommand> {
    let (area, chapter) = store.chapter_entry(&session.area_id, &session.chapter_id)?;
    let room_id = session.selected_room.as_deref()?;
    let room = store.room(
        &session.area_id,
        &session.chapter_id,
        session.selected_side,
        room_id,
    )?;
    Some(TeleportCommand {
        port: settings.port,
        timeout_ms: DEFAULT_TIMEOUT_MS,
        area_game_id: area.game_id.clone(),
        chapter_game_id: chapter.game_id.clone(),
        side: session.selected_side,
        room_id: room.id.clone(),
        x: room.default_spawn.x,
        y: room.default_spawn.y,
    })
}

// Fire and forget. The command loop never blocks on the game; the outcome is
// only logged.
fn dispatch_detached(command: TeleportCommand) {
    thread::spawn(move || match teleport_cli::dispatch(&command) {
        Ok(()) => info!(url = %command.url(), "teleport_dispatched"),
        Err(DispatchError::NoListener { port }) => {
            info!(port, "teleport_no_listener")
        }
        Err(error) => warn!(error = %error, "teleport_failed"),
    });
}

fn print_page_header(
    session: &ViewSession,
    store: &CatalogStore,
    out: &mut impl Write,
) -> Result<(), String> {
    let Some(chapter) = store.chapter(&session.area_id, &session.chapter_id) else {
        return Ok(());
    };
    match chapter.chapter_no {
        Some(number) => write_line(out, &format!("{} (chapter {number})", chapter.name))?,
        None => write_line(out, &chapter.name)?,
    }
    write_line(out, &chapter.desc)?;
    let (previous, next) = store.adjacent_chapters(&session.area_id, &session.chapter_id);
    if let Some(previous) = previous {
        write_line(out, &format!("prev: /{}/{}", session.area_id, previous.id))?;
    }
    if let Some(next) = next {
        write_line(out, &format!("next: /{}/{}", session.area_id, next.id))?;
    }
    Ok(())
}

fn print_rooms(
    session: &ViewSession,
    store: &CatalogStore,
    out: &mut impl Write,
) -> Result<(), String> {
    let Some(side) = store.side(&session.area_id, &session.chapter_id, session.selected_side) else {
        return Ok(());
    };
    write_line(
        out,
        &format!(
            "{} [{}] ({} rooms, {} view)",
            side.name,
            session.selected_side,
            CatalogStore::reachable_view_count(side),
            session.view_mode
        ),
    )?;
    for checkpoint in &side.checkpoints {
        let closed = session.closed_checkpoints.contains(&checkpoint.name);
        let marker = if closed { "+" } else { "-" };
        write_line(out, &format!("{marker} {}", checkpoint.name))?;
        if closed {
            continue;
        }
        for room_id in &checkpoint.room_order {
            // Dangling room ids in the ordering are skipped, not rendered.
            let Some(room) = side.rooms.get(room_id) else {
                continue;
            };
            write_line(out, &room_line(session, room))?;
        }
    }
    Ok(())
}

fn room_line(session: &ViewSession, room: &Room) -> String {
    let selected = session.selected_room.as_deref() == Some(room.id.as_str());
    let marker = if selected { "*" } else { " " };
    let label = room.name.as_deref().unwrap_or(&room.id);
    let mut line = format!("  {marker} {} {label}", room.id);
    if !room.subrooms.is_empty() {
        line.push_str(&format!(" ({} subrooms)", room.subrooms.len()));
        if selected {
            if let Some(index) = session.selected_subroom {
                if let Some(subroom) = room.subrooms.get(index as usize - 1) {
                    line.push_str(&format!(" [{}: {}]", index, subroom.name));
                }
            }
        }
    }
    line
}

fn print_effects(effects: &[SessionEffect], out: &mut impl Write) -> Result<(), String> {
    for effect in effects {
        match effect {
            SessionEffect::AddressChanged { address } => {
                write_line(out, &format!("address: {address}"))?;
            }
            SessionEffect::ScrollToRoom { room_id } => {
                write_line(out, &format!("scroll to room {room_id}"))?;
            }
        }
    }
    Ok(())
}

fn write_line(out: &mut impl Write, line: &str) -> Result<(), String> {
    writeln!(out, "{line}").map_err(|error| format!("failed to write output: {error}"))
}

pub(crate) fn help_text() -> &'static str {
    "commands:\n  \
     open <address>      open a chapter page, e.g. open /celeste/city?side=a\n  \
     pages               list every chapter page address\n  \
     rooms               list rooms of the current side by checkpoint\n  \
     room <id>           select a room\n  \
     subroom <n>         select a subroom of the selected room (1-based)\n  \
     side <a|b|c>        switch side\n  \
     mode <grid|list>    switch room list view\n  \
     toggle <name>       collapse or expand a checkpoint\n  \
     url                 print the current address\n  \
     teleport            send the selected room's spawn to the game\n  \
     quit                exit"
}

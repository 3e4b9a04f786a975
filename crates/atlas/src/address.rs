//! Canonical external address scheme for catalog views, plus the separate
//! teleport query encoding consumed by the game itself.
//!
//! The scheme is `/{areaId}/{chapterId}` with query parameters in the fixed
//! order `side`, `room`, `subroom`, `checkpoint`, `view`. The `checkpoint`
//! parameter carries the ascending 1-based indexes of collapsed checkpoints
//! (absent when all are open). Once released the scheme is frozen; shared
//! links depend on it.

use thiserror::Error;

use crate::catalog::{CatalogStore, SideId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Grid,
    List,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "grid" => Some(Self::Grid),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved address: every field is valid against the catalog that
/// resolved it. Encoding is total; ids are slug-safe by catalog construction.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressFields {
    pub area_id: String,
    pub chapter_id: String,
    pub side: SideId,
    pub room: Option<String>,
    pub subroom: Option<u32>,
    /// Ascending, distinct, 1-based indexes into the side's checkpoint list.
    pub closed_checkpoints: Vec<u32>,
    pub view: ViewMode,
}

pub fn encode(fields: &AddressFields) -> String {
    let mut address = format!(
        "/{}/{}?side={}",
        fields.area_id, fields.chapter_id, fields.side
    );
    if let Some(room) = &fields.room {
        address.push_str("&room=");
        address.push_str(room);
    }
    if let Some(subroom) = fields.subroom {
        address.push_str(&format!("&subroom={subroom}"));
    }
    if !fields.closed_checkpoints.is_empty() {
        let joined = fields
            .closed_checkpoints
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        address.push_str("&checkpoint=");
        address.push_str(&joined);
    }
    address.push_str(&format!("&view={}", fields.view));
    address
}

/// Syntactic form of an incoming address, before catalog resolution. Query
/// values are kept raw; malformed values degrade during resolution instead of
/// failing the whole address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAddress {
    pub area_id: String,
    pub chapter_id: String,
    pub side: Option<String>,
    pub room: Option<String>,
    pub subroom: Option<String>,
    pub checkpoint: Option<String>,
    pub view: Option<String>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("address must start with '/'")]
    MissingLeadingSlash,
    #[error("address is missing the area segment")]
    MissingArea,
    #[error("address is missing the chapter segment")]
    MissingChapter,
    #[error("address has trailing path segments: '{rest}'")]
    TrailingSegments { rest: String },
}

pub fn parse(address: &str) -> Result<RawAddress, AddressParseError> {
    let (path, query) = match address.split_once('?') {
        Some((path, query)) => (path, query),
        None => (address, ""),
    };

    let stripped = path
        .strip_prefix('/')
        .ok_or(AddressParseError::MissingLeadingSlash)?;
    let mut segments = stripped.split('/');
    let area_id = match segments.next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => return Err(AddressParseError::MissingArea),
    };
    let chapter_id = match segments.next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => return Err(AddressParseError::MissingChapter),
    };
    let rest = segments.collect::<Vec<_>>().join("/");
    if !rest.is_empty() {
        return Err(AddressParseError::TrailingSegments { rest });
    }

    let mut raw = RawAddress {
        area_id,
        chapter_id,
        ..RawAddress::default()
    };
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        };
        let slot = match key {
            "side" => &mut raw.side,
            "room" => &mut raw.room,
            "subroom" => &mut raw.subroom,
            "checkpoint" => &mut raw.checkpoint,
            "view" => &mut raw.view,
            // Unknown parameters are not ours to reject.
            _ => continue,
        };
        // First occurrence wins.
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }
    Ok(raw)
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("area not found: {area_id}")]
    AreaNotFound { area_id: String },
    #[error("chapter not found: {area_id}/{chapter_id}")]
    ChapterNotFound {
        area_id: String,
        chapter_id: String,
    },
}

/// Resolve a parsed address against the catalog. Unknown area or chapter is
/// terminal; every other segment degrades to a documented default: unknown
/// side falls back to the chapter's first side, unknown room or out-of-range
/// subroom resolve to no selection, out-of-range checkpoint indexes are
/// dropped, and a missing view falls back to `default_view`.
pub fn resolve(
    store: &CatalogStore,
    raw: &RawAddress,
    default_view: ViewMode,
) -> Result<AddressFields, ResolveError> {
    let area = store
        .area(&raw.area_id)
        .ok_or_else(|| ResolveError::AreaNotFound {
            area_id: raw.area_id.clone(),
        })?;
    let chapter = area
        .chapter(&raw.chapter_id)
        .ok_or_else(|| ResolveError::ChapterNotFound {
            area_id: raw.area_id.clone(),
            chapter_id: raw.chapter_id.clone(),
        })?;

    let side = raw
        .side
        .as_deref()
        .and_then(SideId::parse)
        .filter(|side_id| chapter.side(*side_id).is_some())
        .unwrap_or(chapter.first_side().id);
    // Loader guarantees the side exists after the fallback above.
    let side_data = chapter.side(side).unwrap_or_else(|| chapter.first_side());

    let room = raw
        .room
        .as_deref()
        .filter(|room_id| side_data.rooms.contains_key(*room_id))
        .map(str::to_string);

    let subroom = match &room {
        Some(room_id) => {
            let subroom_count = side_data
                .rooms
                .get(room_id)
                .map(|room| room.subrooms.len() as u32)
                .unwrap_or(0);
            raw.subroom
                .as_deref()
                .and_then(|value| value.parse::<u32>().ok())
                .filter(|index| *index >= 1 && *index <= subroom_count)
        }
        None => None,
    };

    let checkpoint_count = side_data.checkpoints.len() as u32;
    let mut closed_checkpoints = raw
        .checkpoint
        .as_deref()
        .map(|value| {
            value
                .split(',')
                .filter_map(|index| index.parse::<u32>().ok())
                .filter(|index| *index >= 1 && *index <= checkpoint_count)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    closed_checkpoints.sort_unstable();
    closed_checkpoints.dedup();

    let view = raw
        .view
        .as_deref()
        .and_then(ViewMode::parse)
        .unwrap_or(default_view);

    Ok(AddressFields {
        area_id: area.id.clone(),
        chapter_id: chapter.id.clone(),
        side,
        room,
        subroom,
        closed_checkpoints,
        view,
    })
}

/// Query string for the game's local control endpoint. This is a distinct
/// address space from the catalog scheme: it uses the game-native ids, never
/// the catalog slugs.
pub fn teleport_query(
    area_game_id: &str,
    chapter_game_id: &str,
    side: SideId,
    room_id: &str,
    x: f32,
    y: f32,
) -> String {
    format!("area={area_game_id}/{chapter_game_id}&side={side}&level={room_id}&x={x}&y={y}")
}

#[cfg(test)]
mod tests {
    use crate::catalog::load_catalog_str;
    use crate::catalog::test_fixtures::FIXTURE_CATALOG_JSON;

    use super::*;

    fn store() -> CatalogStore {
        load_catalog_str(FIXTURE_CATALOG_JSON).expect("fixture catalog")
    }

    fn decode(store: &CatalogStore, address: &str) -> AddressFields {
        let raw = parse(address).expect("parse");
        resolve(store, &raw, ViewMode::Grid).expect("resolve")
    }

    #[test]
    fn known_room_address_selects_side_and_room() {
        let store = store();
        let fields = decode(&store, "/celeste/city?side=a&room=1a");
        assert_eq!(fields.side, SideId::A);
        assert_eq!(fields.room.as_deref(), Some("1a"));
        assert_eq!(fields.subroom, None);
        assert!(fields.closed_checkpoints.is_empty());
    }

    #[test]
    fn unknown_room_degrades_to_no_selection() {
        let store = store();
        let fields = decode(&store, "/celeste/city?side=a&room=zzz");
        assert_eq!(fields.room, None);
        assert_eq!(fields.side, SideId::A);
    }

    #[test]
    fn unknown_side_falls_back_to_first_side() {
        let store = store();
        let fields = decode(&store, "/celeste/city?side=z");
        assert_eq!(fields.side, SideId::A);

        // A side that exists in the scheme but not in this chapter also
        // falls back.
        let fields = decode(&store, "/celeste/prologue?side=b");
        assert_eq!(fields.side, SideId::A);
    }

    #[test]
    fn unknown_area_or_chapter_is_terminal() {
        let store = store();
        let raw = parse("/nowhere/city").expect("parse");
        assert_eq!(
            resolve(&store, &raw, ViewMode::Grid),
            Err(ResolveError::AreaNotFound {
                area_id: "nowhere".to_string()
            })
        );

        let raw = parse("/celeste/nowhere").expect("parse");
        assert_eq!(
            resolve(&store, &raw, ViewMode::Grid),
            Err(ResolveError::ChapterNotFound {
                area_id: "celeste".to_string(),
                chapter_id: "nowhere".to_string()
            })
        );
    }

    #[test]
    fn subroom_is_kept_only_when_in_range() {
        let store = store();
        let fields = decode(&store, "/celeste/city?side=a&room=2&subroom=2");
        assert_eq!(fields.subroom, Some(2));

        let fields = decode(&store, "/celeste/city?side=a&room=2&subroom=3");
        assert_eq!(fields.subroom, None);

        let fields = decode(&store, "/celeste/city?side=a&room=2&subroom=0");
        assert_eq!(fields.subroom, None);

        // Rooms without subrooms accept no subroom index.
        let fields = decode(&store, "/celeste/city?side=a&room=1a&subroom=1");
        assert_eq!(fields.subroom, None);

        let fields = decode(&store, "/celeste/city?side=a&room=2&subroom=abc");
        assert_eq!(fields.subroom, None);
    }

    #[test]
    fn closed_checkpoints_are_clamped_sorted_and_deduped() {
        let store = store();
        let fields = decode(&store, "/celeste/city?checkpoint=2,9,1,2,x");
        assert_eq!(fields.closed_checkpoints, vec![1, 2]);
    }

    #[test]
    fn view_parameter_overrides_default() {
        let store = store();
        let fields = decode(&store, "/celeste/city?view=list");
        assert_eq!(fields.view, ViewMode::List);

        let fields = decode(&store, "/celeste/city?view=diagonal");
        assert_eq!(fields.view, ViewMode::Grid);
    }

    #[test]
    fn parse_rejects_malformed_paths() {
        assert_eq!(parse("celeste/city"), Err(AddressParseError::MissingLeadingSlash));
        assert_eq!(parse("/"), Err(AddressParseError::MissingArea));
        assert_eq!(parse("/celeste"), Err(AddressParseError::MissingChapter));
        assert!(matches!(
            parse("/celeste/city/extra"),
            Err(AddressParseError::TrailingSegments { .. })
        ));
    }

    #[test]
    fn parse_ignores_unknown_params_and_keeps_first_occurrence() {
        let raw = parse("/celeste/city?theme=dark&room=1a&room=1b").expect("parse");
        assert_eq!(raw.room.as_deref(), Some("1a"));
    }

    #[test]
    fn encode_then_decode_round_trips() {
        let store = store();
        let fields = AddressFields {
            area_id: "celeste".to_string(),
            chapter_id: "city".to_string(),
            side: SideId::A,
            room: Some("2".to_string()),
            subroom: Some(1),
            closed_checkpoints: vec![2],
            view: ViewMode::List,
        };
        let address = encode(&fields);
        assert_eq!(
            address,
            "/celeste/city?side=a&room=2&subroom=1&checkpoint=2&view=list"
        );
        assert_eq!(decode(&store, &address), fields);
    }

    #[test]
    fn decoded_address_re_encodes_byte_for_byte() {
        let store = store();
        for address in [
            "/celeste/city?side=a&view=grid",
            "/celeste/city?side=b&room=1a&view=list",
            "/celeste/city?side=a&room=2&subroom=2&checkpoint=1,2&view=grid",
            "/celeste/prologue?side=a&view=grid",
        ] {
            let fields = decode(&store, address);
            assert_eq!(encode(&fields), address);
        }
    }

    #[test]
    fn teleport_query_uses_game_native_ids() {
        assert_eq!(
            teleport_query("Celeste", "1", SideId::A, "1a", 104.0, 120.0),
            "area=Celeste/1&side=a&level=1a&x=104&y=120"
        );
        assert_eq!(
            teleport_query("Celeste", "0", SideId::B, "0", 88.5, -16.0),
            "area=Celeste/0&side=b&level=0&x=88.5&y=-16"
        );
    }
}

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use super::store::CatalogStore;
use super::types::{Area, Chapter, Checkpoint, Room, Side, SideId, SpawnPoint, Subroom};

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog json at {json_path}: {source}")]
    Parse {
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {kind} id '{id}' (ids must be non-empty ascii slugs)")]
    InvalidId { kind: &'static str, id: String },
    #[error("duplicate area id: {area_id}")]
    DuplicateArea { area_id: String },
    #[error("duplicate chapter id {chapter_id} in area {area_id}")]
    DuplicateChapter { area_id: String, chapter_id: String },
    #[error("chapter {area_id}/{chapter_id} has no sides")]
    NoSides { area_id: String, chapter_id: String },
    #[error("unknown side id '{side_id}' in chapter {area_id}/{chapter_id} (expected a, b or c)")]
    UnknownSide {
        area_id: String,
        chapter_id: String,
        side_id: String,
    },
    #[error("duplicate side id {side_id} in chapter {area_id}/{chapter_id}")]
    DuplicateSide {
        area_id: String,
        chapter_id: String,
        side_id: String,
    },
    #[error("duplicate checkpoint name '{name}' in side {area_id}/{chapter_id}/{side_id}")]
    DuplicateCheckpointName {
        area_id: String,
        chapter_id: String,
        side_id: SideId,
        name: String,
    },
    #[error("checkpoint with empty name in side {area_id}/{chapter_id}/{side_id}")]
    EmptyCheckpointName {
        area_id: String,
        chapter_id: String,
        side_id: SideId,
    },
    #[error("duplicate room id {room_id} in side {area_id}/{chapter_id}/{side_id}")]
    DuplicateRoom {
        area_id: String,
        chapter_id: String,
        side_id: SideId,
        room_id: String,
    },
    #[error(
        "room {room_id} appears in more than one checkpoint of side {area_id}/{chapter_id}/{side_id}"
    )]
    RoomInMultipleCheckpoints {
        area_id: String,
        chapter_id: String,
        side_id: SideId,
        room_id: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawCatalog {
    areas: Vec<RawArea>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawArea {
    id: String,
    game_id: String,
    name: String,
    desc: String,
    chapters: Vec<RawChapter>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawChapter {
    id: String,
    game_id: String,
    name: String,
    desc: String,
    #[serde(default)]
    chapter_no: Option<u32>,
    image: String,
    sides: Vec<RawSide>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawSide {
    id: String,
    name: String,
    room_count: u32,
    checkpoints: Vec<RawCheckpoint>,
    rooms: Vec<RawRoom>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawCheckpoint {
    name: String,
    room_order: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawRoom {
    id: String,
    #[serde(default)]
    name: Option<String>,
    image: String,
    default_spawn: RawSpawnPoint,
    #[serde(default)]
    subrooms: Vec<RawSubroom>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSpawnPoint {
    x: f32,
    y: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawSubroom {
    name: String,
    image: String,
}

/// Load and validate the static catalog dataset from a file. Any violation is
/// fatal; this is build-time data, not user input.
pub fn load_catalog(path: &Path) -> Result<CatalogStore, CatalogLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogLoadError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    load_catalog_str(&raw)
}

pub fn load_catalog_str(raw: &str) -> Result<CatalogStore, CatalogLoadError> {
    let parsed = parse_catalog_json(raw)?;
    store_from_raw(parsed)
}

fn parse_catalog_json(raw: &str) -> Result<RawCatalog, CatalogLoadError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, RawCatalog>(&mut deserializer) {
        Ok(catalog) => Ok(catalog),
        Err(error) => {
            let path = error.path().to_string();
            let json_path = if path.is_empty() || path == "." {
                "$".to_string()
            } else {
                path
            };
            Err(CatalogLoadError::Parse {
                json_path,
                source: error.into_inner(),
            })
        }
    }
}

fn store_from_raw(raw: RawCatalog) -> Result<CatalogStore, CatalogLoadError> {
    let mut areas = Vec::with_capacity(raw.areas.len());
    let mut seen_area_ids = HashSet::new();

    for raw_area in raw.areas {
        check_slug("area", &raw_area.id)?;
        if !seen_area_ids.insert(raw_area.id.clone()) {
            return Err(CatalogLoadError::DuplicateArea {
                area_id: raw_area.id,
            });
        }
        areas.push(area_from_raw(raw_area)?);
    }

    Ok(CatalogStore::from_areas(areas))
}

fn area_from_raw(raw: RawArea) -> Result<Area, CatalogLoadError> {
    let mut chapters = Vec::with_capacity(raw.chapters.len());
    let mut seen_chapter_ids = HashSet::new();

    for raw_chapter in raw.chapters {
        check_slug("chapter", &raw_chapter.id)?;
        if !seen_chapter_ids.insert(raw_chapter.id.clone()) {
            return Err(CatalogLoadError::DuplicateChapter {
                area_id: raw.id,
                chapter_id: raw_chapter.id,
            });
        }
        chapters.push(chapter_from_raw(&raw.id, raw_chapter)?);
    }

    Ok(Area {
        id: raw.id,
        game_id: raw.game_id,
        name: raw.name,
        desc: raw.desc,
        chapters,
    })
}

fn chapter_from_raw(area_id: &str, raw: RawChapter) -> Result<Chapter, CatalogLoadError> {
    if raw.sides.is_empty() {
        return Err(CatalogLoadError::NoSides {
            area_id: area_id.to_string(),
            chapter_id: raw.id,
        });
    }

    let mut sides = Vec::with_capacity(raw.sides.len());
    let mut seen_side_ids = HashSet::new();

    for raw_side in raw.sides {
        let Some(side_id) = SideId::parse(&raw_side.id) else {
            return Err(CatalogLoadError::UnknownSide {
                area_id: area_id.to_string(),
                chapter_id: raw.id,
                side_id: raw_side.id,
            });
        };
        if !seen_side_ids.insert(side_id) {
            return Err(CatalogLoadError::DuplicateSide {
                area_id: area_id.to_string(),
                chapter_id: raw.id,
                side_id: raw_side.id,
            });
        }
        sides.push(side_from_raw(area_id, &raw.id, side_id, raw_side)?);
    }

    Ok(Chapter {
        id: raw.id,
        game_id: raw.game_id,
        name: raw.name,
        desc: raw.desc,
        chapter_no: raw.chapter_no,
        image: raw.image,
        sides,
    })
}

fn side_from_raw(
    area_id: &str,
    chapter_id: &str,
    side_id: SideId,
    raw: RawSide,
) -> Result<Side, CatalogLoadError> {
    let mut rooms = HashMap::with_capacity(raw.rooms.len());
    for raw_room in raw.rooms {
        check_slug("room", &raw_room.id)?;
        let room = Room {
            id: raw_room.id.clone(),
            name: raw_room.name,
            image: raw_room.image,
            default_spawn: SpawnPoint {
                x: raw_room.default_spawn.x,
                y: raw_room.default_spawn.y,
            },
            subrooms: raw_room
                .subrooms
                .into_iter()
                .map(|subroom| Subroom {
                    name: subroom.name,
                    image: subroom.image,
                })
                .collect(),
        };
        if rooms.insert(raw_room.id.clone(), room).is_some() {
            return Err(CatalogLoadError::DuplicateRoom {
                area_id: area_id.to_string(),
                chapter_id: chapter_id.to_string(),
                side_id,
                room_id: raw_room.id,
            });
        }
    }

    let mut checkpoints = Vec::with_capacity(raw.checkpoints.len());
    let mut seen_checkpoint_names = HashSet::new();
    let mut ordered_room_ids = HashSet::new();
    for raw_checkpoint in raw.checkpoints {
        if raw_checkpoint.name.trim().is_empty() {
            return Err(CatalogLoadError::EmptyCheckpointName {
                area_id: area_id.to_string(),
                chapter_id: chapter_id.to_string(),
                side_id,
            });
        }
        if !seen_checkpoint_names.insert(raw_checkpoint.name.clone()) {
            return Err(CatalogLoadError::DuplicateCheckpointName {
                area_id: area_id.to_string(),
                chapter_id: chapter_id.to_string(),
                side_id,
                name: raw_checkpoint.name,
            });
        }
        for room_id in &raw_checkpoint.room_order {
            if !ordered_room_ids.insert(room_id.clone()) {
                return Err(CatalogLoadError::RoomInMultipleCheckpoints {
                    area_id: area_id.to_string(),
                    chapter_id: chapter_id.to_string(),
                    side_id,
                    room_id: room_id.clone(),
                });
            }
            if !rooms.contains_key(room_id) {
                // Tolerated: partial datasets may order rooms that are not
                // captured yet. Iteration skips these as a no-op.
                warn!(
                    area_id,
                    chapter_id,
                    side_id = %side_id,
                    room_id = %room_id,
                    "catalog_dangling_room_order_entry"
                );
            }
        }
        checkpoints.push(Checkpoint {
            name: raw_checkpoint.name,
            room_order: raw_checkpoint.room_order,
        });
    }

    let side = Side {
        id: side_id,
        name: raw.name,
        room_count: raw.room_count,
        checkpoints,
        rooms,
    };

    let reachable = CatalogStore::reachable_view_count(&side);
    if reachable != side.room_count {
        // room_count is a pre-computed display value in the dataset; treat a
        // mismatch as stale data, not corruption.
        warn!(
            area_id,
            chapter_id,
            side_id = %side.id,
            room_count = side.room_count,
            reachable,
            "catalog_room_count_mismatch"
        );
    }

    Ok(side)
}

fn check_slug(kind: &'static str, id: &str) -> Result<(), CatalogLoadError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(CatalogLoadError::InvalidId {
            kind,
            id: id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::catalog::test_fixtures::FIXTURE_CATALOG_JSON;

    use super::*;

    #[test]
    fn fixture_catalog_loads_and_resolves() {
        let store = load_catalog_str(FIXTURE_CATALOG_JSON).expect("load fixture");
        let area = store.area("celeste").expect("area");
        assert_eq!(area.game_id, "Celeste");
        assert_eq!(area.chapters.len(), 2);

        let city = store.chapter("celeste", "city").expect("chapter");
        assert_eq!(city.game_id, "1");
        assert_eq!(city.chapter_no, Some(1));
        assert_eq!(city.sides.len(), 2);

        let side_a = city.side(SideId::A).expect("side a");
        assert_eq!(side_a.checkpoints.len(), 2);
        let room = side_a.rooms.get("2").expect("room 2");
        assert_eq!(room.subrooms.len(), 2);
    }

    #[test]
    fn load_from_file_round_trips_through_the_filesystem() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("catalog.json");
        fs::write(&path, FIXTURE_CATALOG_JSON).expect("write catalog");

        let store = load_catalog(&path).expect("load");
        assert!(store.area("celeste").is_some());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let temp = TempDir::new().expect("tempdir");
        let error = load_catalog(&temp.path().join("absent.json")).expect_err("error");
        assert!(matches!(error, CatalogLoadError::ReadFile { .. }));
    }

    #[test]
    fn schema_violation_reports_json_path() {
        // defaultSpawn is required on every room.
        let raw = r#"{"areas":[{"id":"a","gameId":"A","name":"A","desc":"","chapters":[
            {"id":"c","gameId":"1","name":"C","desc":"","image":"c",
             "sides":[{"id":"a","name":"A","roomCount":1,
                       "checkpoints":[{"name":"Start","roomOrder":["1"]}],
                       "rooms":[{"id":"1","image":"1"}]}]}]}]}"#;
        let error = load_catalog_str(raw).expect_err("error");
        let CatalogLoadError::Parse { json_path, .. } = error else {
            panic!("expected parse error");
        };
        assert!(json_path.contains("rooms"), "path was {json_path}");
    }

    #[test]
    fn duplicate_room_id_is_fatal() {
        let raw = fixture_with_side(
            r#"{"id":"a","name":"A","roomCount":2,
                "checkpoints":[{"name":"Start","roomOrder":["1"]}],
                "rooms":[{"id":"1","image":"1","defaultSpawn":{"x":0,"y":0}},
                         {"id":"1","image":"1","defaultSpawn":{"x":0,"y":0}}]}"#,
        );
        let error = load_catalog_str(&raw).expect_err("error");
        assert!(matches!(error, CatalogLoadError::DuplicateRoom { .. }));
    }

    #[test]
    fn room_shared_across_checkpoints_is_fatal() {
        let raw = fixture_with_side(
            r#"{"id":"a","name":"A","roomCount":1,
                "checkpoints":[{"name":"Start","roomOrder":["1"]},
                               {"name":"End","roomOrder":["1"]}],
                "rooms":[{"id":"1","image":"1","defaultSpawn":{"x":0,"y":0}}]}"#,
        );
        let error = load_catalog_str(&raw).expect_err("error");
        assert!(matches!(
            error,
            CatalogLoadError::RoomInMultipleCheckpoints { .. }
        ));
    }

    #[test]
    fn unknown_side_id_is_fatal() {
        let raw = fixture_with_side(
            r#"{"id":"d","name":"D","roomCount":0,"checkpoints":[],"rooms":[]}"#,
        );
        let error = load_catalog_str(&raw).expect_err("error");
        assert!(matches!(error, CatalogLoadError::UnknownSide { .. }));
    }

    #[test]
    fn non_slug_room_id_is_fatal() {
        let raw = fixture_with_side(
            r#"{"id":"a","name":"A","roomCount":1,
                "checkpoints":[{"name":"Start","roomOrder":["bad id"]}],
                "rooms":[{"id":"bad id","image":"1","defaultSpawn":{"x":0,"y":0}}]}"#,
        );
        let error = load_catalog_str(&raw).expect_err("error");
        assert!(matches!(
            error,
            CatalogLoadError::InvalidId { kind: "room", .. }
        ));
    }

    #[test]
    fn dangling_room_order_entry_is_tolerated() {
        let raw = fixture_with_side(
            r#"{"id":"a","name":"A","roomCount":1,
                "checkpoints":[{"name":"Start","roomOrder":["1","missing"]}],
                "rooms":[{"id":"1","image":"1","defaultSpawn":{"x":0,"y":0}}]}"#,
        );
        let store = load_catalog_str(&raw).expect("load");
        let side = store.side("area", "chapter", SideId::A).expect("side");
        assert!(side.rooms.get("missing").is_none());
        assert_eq!(CatalogStore::reachable_view_count(side), 1);
    }

    #[test]
    fn stale_room_count_is_tolerated() {
        let raw = fixture_with_side(
            r#"{"id":"a","name":"A","roomCount":99,
                "checkpoints":[{"name":"Start","roomOrder":["1"]}],
                "rooms":[{"id":"1","image":"1","defaultSpawn":{"x":0,"y":0}}]}"#,
        );
        let store = load_catalog_str(&raw).expect("load");
        let side = store.side("area", "chapter", SideId::A).expect("side");
        assert_eq!(side.room_count, 99);
        assert_eq!(CatalogStore::reachable_view_count(side), 1);
    }

    #[test]
    fn duplicate_area_and_chapter_ids_are_fatal() {
        let dup_area = r#"{"areas":[
            {"id":"a","gameId":"A","name":"A","desc":"","chapters":[]},
            {"id":"a","gameId":"A","name":"A","desc":"","chapters":[]}]}"#;
        assert!(matches!(
            load_catalog_str(dup_area).expect_err("error"),
            CatalogLoadError::DuplicateArea { .. }
        ));

        let chapter = r#"{"id":"c","gameId":"1","name":"C","desc":"","image":"c",
            "sides":[{"id":"a","name":"A","roomCount":0,"checkpoints":[],"rooms":[]}]}"#;
        let dup_chapter = format!(
            r#"{{"areas":[{{"id":"a","gameId":"A","name":"A","desc":"","chapters":[{chapter},{chapter}]}}]}}"#
        );
        assert!(matches!(
            load_catalog_str(&dup_chapter).expect_err("error"),
            CatalogLoadError::DuplicateChapter { .. }
        ));
    }

    fn fixture_with_side(side_json: &str) -> String {
        format!(
            r#"{{"areas":[{{"id":"area","gameId":"Area","name":"Area","desc":"","chapters":[
                {{"id":"chapter","gameId":"1","name":"Chapter","desc":"","image":"c",
                  "sides":[{side_json}]}}]}}]}}"#
        )
    }
}

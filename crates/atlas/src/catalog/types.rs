use std::collections::HashMap;

/// One of the up-to-three difficulty tracks of a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SideId {
    A,
    B,
    C,
}

impl SideId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "a" => Some(Self::A),
            "b" => Some(Self::B),
            "c" => Some(Self::C),
            _ => None,
        }
    }
}

impl std::fmt::Display for SideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

/// Positionally addressed sub-view of a room. The 1-based position within the
/// parent room's `subrooms` is its only identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Subroom {
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: String,
    pub name: Option<String>,
    pub image: String,
    pub default_spawn: SpawnPoint,
    pub subrooms: Vec<Subroom>,
}

impl Room {
    /// Number of addressable views this room contributes to a listing.
    pub fn display_count(&self) -> u32 {
        (self.subrooms.len() as u32).max(1)
    }
}

/// Ordered named segment of a side. Entries in `room_order` that name a room
/// absent from the side's room set are skipped at iteration time, never an
/// error.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub name: String,
    pub room_order: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Side {
    pub id: SideId,
    pub name: String,
    pub room_count: u32,
    pub checkpoints: Vec<Checkpoint>,
    pub rooms: HashMap<String, Room>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub id: String,
    pub game_id: String,
    pub name: String,
    pub desc: String,
    pub chapter_no: Option<u32>,
    pub image: String,
    pub sides: Vec<Side>,
}

impl Chapter {
    pub fn side(&self, side_id: SideId) -> Option<&Side> {
        self.sides.iter().find(|side| side.id == side_id)
    }

    /// Loader guarantees every chapter has at least one side.
    pub fn first_side(&self) -> &Side {
        &self.sides[0]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub id: String,
    pub game_id: String,
    pub name: String,
    pub desc: String,
    pub chapters: Vec<Chapter>,
}

impl Area {
    pub fn chapter(&self, chapter_id: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|chapter| chapter.id == chapter_id)
    }
}

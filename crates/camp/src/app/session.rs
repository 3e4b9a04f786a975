//! In-memory view state for one open chapter page, kept in lockstep with the
//! page's address. Every mutation that changes what the address would encode
//! emits an `AddressChanged` effect carrying the re-encoded address.

use std::collections::BTreeSet;

use atlas::{encode, AddressFields, CatalogStore, Side, SideId, ViewMode};
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SessionEffect {
    AddressChanged { address: String },
    ScrollToRoom { room_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ViewSession {
    pub(crate) area_id: String,
    pub(crate) chapter_id: String,
    pub(crate) selected_side: SideId,
    pub(crate) selected_room: Option<String>,
    pub(crate) selected_subroom: Option<u32>,
    pub(crate) view_mode: ViewMode,
    // Checkpoint names collapsed in the room list. Names, not indexes, so the
    // set survives re-resolution against the same side.
    pub(crate) closed_checkpoints: BTreeSet<String>,
}

impl ViewSession {
    /// Builds session state from a resolved address. Checkpoint indexes are
    /// mapped to names against the resolved side.
    pub(crate) fn from_fields(store: &CatalogStore, fields: &AddressFields) -> Self {
        let closed_checkpoints = match store.side(&fields.area_id, &fields.chapter_id, fields.side)
        {
            Some(side) => fields
                .closed_checkpoints
                .iter()
                .filter_map(|index| (*index as usize).checked_sub(1))
                .filter_map(|index| side.checkpoints.get(index))
                .map(|checkpoint| checkpoint.name.clone())
                .collect(),
            None => BTreeSet::new(),
        };
        Self {
            area_id: fields.area_id.clone(),
            chapter_id: fields.chapter_id.clone(),
            selected_side: fields.side,
            selected_room: fields.room.clone(),
            selected_subroom: fields.subroom,
            view_mode: fields.view,
            closed_checkpoints,
        }
    }

    pub(crate) fn fields(&self, store: &CatalogStore) -> AddressFields {
        let closed_checkpoints = match self.side(store) {
            Some(side) => self
                .closed_checkpoints
                .iter()
                .filter_map(|name| {
                    side.checkpoints
                        .iter()
                        .position(|checkpoint| &checkpoint.name == name)
                        .map(|index| index as u32 + 1)
                })
                .collect(),
            None => Vec::new(),
        };
        let mut closed_checkpoints: Vec<u32> = closed_checkpoints;
        closed_checkpoints.sort_unstable();
        AddressFields {
            area_id: self.area_id.clone(),
            chapter_id: self.chapter_id.clone(),
            side: self.selected_side,
            room: self.selected_room.clone(),
            subroom: self.selected_subroom,
            closed_checkpoints,
            view: self.view_mode,
        }
    }

    pub(crate) fn address(&self, store: &CatalogStore) -> String {
        encode(&self.fields(store))
    }

    fn side<'a>(&self, store: &'a CatalogStore) -> Option<&'a Side> {
        store.side(&self.area_id, &self.chapter_id, self.selected_side)
    }

    /// Selecting a room clears any subroom selection. An unknown room id
    /// clears the selection instead of failing.
    pub(crate) fn select_room(&mut self, store: &CatalogStore, room_id: &str) -> Vec<SessionEffect> {
        let known = self
            .side(store)
            .is_some_and(|side| side.rooms.contains_key(room_id));
        if known {
            self.selected_room = Some(room_id.to_string());
            self.selected_subroom = None;
            vec![
                SessionEffect::AddressChanged {
                    address: self.address(store),
                },
                SessionEffect::ScrollToRoom {
                    room_id: room_id.to_string(),
                },
            ]
        } else {
            warn!(room_id, "session_unknown_room_cleared_selection");
            self.selected_room = None;
            self.selected_subroom = None;
            vec![SessionEffect::AddressChanged {
                address: self.address(store),
            }]
        }
    }

    /// Subroom indexes are 1-based; out-of-range or applied to a room without
    /// subrooms, the subroom selection is cleared.
    pub(crate) fn select_subroom(&mut self, store: &CatalogStore, index: u32) -> Vec<SessionEffect> {
        let in_range = self
            .side(store)
            .zip(self.selected_room.as_deref())
            .and_then(|(side, room_id)| side.rooms.get(room_id))
            .is_some_and(|room| index >= 1 && (index as usize) <= room.subrooms.len());
        if in_range {
            self.selected_subroom = Some(index);
        } else {
            warn!(index, "session_subroom_out_of_range_cleared");
            self.selected_subroom = None;
        }
        vec![SessionEffect::AddressChanged {
            address: self.address(store),
        }]
    }

    /// Switching side keeps the selected room only if the new side has a room
    /// with the same id. Subroom selection and collapsed checkpoints reset.
    pub(crate) fn set_side(&mut self, store: &CatalogStore, side_id: SideId) -> Vec<SessionEffect> {
        let Some(side) = store.side(&self.area_id, &self.chapter_id, side_id) else {
            warn!(side = %side_id, "session_unknown_side_ignored");
            return Vec::new();
        };
        let keep_room = self
            .selected_room
            .as_deref()
            .is_some_and(|room_id| side.rooms.contains_key(room_id));
        self.selected_side = side_id;
        if !keep_room {
            self.selected_room = None;
        }
        self.selected_subroom = None;
        self.closed_checkpoints.clear();
        vec![SessionEffect::AddressChanged {
            address: self.address(store),
        }]
    }

    pub(crate) fn set_view_mode(&mut self, store: &CatalogStore, mode: ViewMode) -> Vec<SessionEffect> {
        self.view_mode = mode;
        vec![SessionEffect::AddressChanged {
            address: self.address(store),
        }]
    }

    /// Collapses or expands a checkpoint by name. Unknown names are ignored.
    pub(crate) fn toggle_checkpoint(&mut self, store: &CatalogStore, name: &str) -> Vec<SessionEffect> {
        let known = self
            .side(store)
            .is_some_and(|side| side.checkpoints.iter().any(|c| c.name == name));
        if !known {
            warn!(name, "session_unknown_checkpoint_ignored");
            return Vec::new();
        }
        if !self.closed_checkpoints.remove(name) {
            self.closed_checkpoints.insert(name.to_string());
        }
        vec![SessionEffect::AddressChanged {
            address: self.address(store),
        }]
    }
}

use std::collections::HashMap;

use super::types::{Area, Chapter, Room, Side, SideId};

/// Immutable catalog tree. Built once by the loader and shared read-only for
/// the lifetime of the process; lookups never panic on unknown ids.
#[derive(Debug, Default, Clone)]
pub struct CatalogStore {
    areas: Vec<Area>,
    area_index_by_id: HashMap<String, usize>,
}

impl CatalogStore {
    pub(crate) fn from_areas(areas: Vec<Area>) -> Self {
        let mut area_index_by_id = HashMap::with_capacity(areas.len());
        for (idx, area) in areas.iter().enumerate() {
            area_index_by_id.insert(area.id.clone(), idx);
        }
        Self {
            areas,
            area_index_by_id,
        }
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn area(&self, area_id: &str) -> Option<&Area> {
        let index = self.area_index_by_id.get(area_id)?;
        self.areas.get(*index)
    }

    pub fn chapter(&self, area_id: &str, chapter_id: &str) -> Option<&Chapter> {
        self.area(area_id)?.chapter(chapter_id)
    }

    pub fn side(&self, area_id: &str, chapter_id: &str, side_id: SideId) -> Option<&Side> {
        self.chapter(area_id, chapter_id)?.side(side_id)
    }

    pub fn room(
        &self,
        area_id: &str,
        chapter_id: &str,
        side_id: SideId,
        room_id: &str,
    ) -> Option<&Room> {
        self.side(area_id, chapter_id, side_id)?.rooms.get(room_id)
    }

    /// Area and chapter in one lookup, for callers that need both (the
    /// chapter page header, teleport commands).
    pub fn chapter_entry(&self, area_id: &str, chapter_id: &str) -> Option<(&Area, &Chapter)> {
        let area = self.area(area_id)?;
        let chapter = area.chapter(chapter_id)?;
        Some((area, chapter))
    }

    /// Previous and next chapter ids around `chapter_id`, in dataset order.
    pub fn adjacent_chapters(
        &self,
        area_id: &str,
        chapter_id: &str,
    ) -> (Option<&Chapter>, Option<&Chapter>) {
        let Some(area) = self.area(area_id) else {
            return (None, None);
        };
        let Some(position) = area
            .chapters
            .iter()
            .position(|chapter| chapter.id == chapter_id)
        else {
            return (None, None);
        };
        let previous = position.checked_sub(1).and_then(|idx| area.chapters.get(idx));
        let next = area.chapters.get(position + 1);
        (previous, next)
    }

    /// Rooms reachable through a side's checkpoints, counting each subroom as
    /// its own view. Dangling `room_order` entries contribute nothing.
    pub fn reachable_view_count(side: &Side) -> u32 {
        side.checkpoints
            .iter()
            .flat_map(|checkpoint| checkpoint.room_order.iter())
            .filter_map(|room_id| side.rooms.get(room_id))
            .map(Room::display_count)
            .sum()
    }
}

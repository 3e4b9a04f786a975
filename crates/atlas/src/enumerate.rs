//! Enumeration of every navigable page address. Only area/chapter pairs are
//! pre-declared; room and subroom views resolve dynamically against the same
//! pages.

use crate::catalog::CatalogStore;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageAddress {
    pub area_id: String,
    pub chapter_id: String,
}

impl PageAddress {
    pub fn path(&self) -> String {
        format!("/{}/{}", self.area_id, self.chapter_id)
    }
}

/// Every `(area, chapter)` pair in catalog order, each exactly once. Pure over
/// the store: calling it again yields an identical sequence.
pub fn page_addresses(store: &CatalogStore) -> impl Iterator<Item = PageAddress> + '_ {
    store.areas().iter().flat_map(|area| {
        area.chapters.iter().map(|chapter| PageAddress {
            area_id: area.id.clone(),
            chapter_id: chapter.id.clone(),
        })
    })
}

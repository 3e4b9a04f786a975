mod loader;
mod store;
#[cfg(test)]
pub(crate) mod test_fixtures;
mod types;

pub use loader::{load_catalog, load_catalog_str, CatalogLoadError};
pub use store::CatalogStore;
pub use types::{Area, Chapter, Checkpoint, Room, Side, SideId, SpawnPoint, Subroom};

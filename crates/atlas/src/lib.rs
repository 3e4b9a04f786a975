use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod address;
pub mod catalog;
pub mod enumerate;

pub use address::{
    encode, parse, resolve, teleport_query, AddressFields, AddressParseError, RawAddress,
    ResolveError, ViewMode,
};
pub use catalog::{
    load_catalog, load_catalog_str, Area, CatalogLoadError, CatalogStore, Chapter, Checkpoint,
    Room, Side, SideId, SpawnPoint, Subroom,
};
pub use enumerate::{page_addresses, PageAddress};

pub const ROOT_ENV_VAR: &str = "CAMP_ROOT";
const CATALOG_FILE: &str = "catalog.json";

#[derive(Debug, Clone)]
pub struct AtlasPaths {
    pub root: PathBuf,
    pub catalog_path: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "CAMP_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and an assets/ directory."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and assets/.\n\
Set {env_var} explicitly, for example:\n\
export {env_var}=\"/path/to/camp\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

pub fn resolve_atlas_paths() -> Result<AtlasPaths, StartupError> {
    let root = resolve_root()?;
    let catalog_path = root.join("assets").join(CATALOG_FILE);
    Ok(AtlasPaths { root, catalog_path })
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let raw = PathBuf::from(value);
            let normalized = normalize_path(&raw);
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            for candidate in exe_dir.ancestors() {
                if is_repo_marker(candidate) {
                    return Ok(normalize_path(candidate));
                }
            }

            Err(StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn is_repo_marker(path: &Path) -> bool {
    path.join("Cargo.toml").is_file() && path.join("assets").is_dir()
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

use serde::{Deserialize, Serialize};

use crate::constants::MANDATORY_CLEANUP;

/// The caller-toggleable cache entries, each a known path under the
/// installation root. Disabled by default; the GUI collaborator resets them
/// to disabled at every launch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalCache {
    /// TMDbHelper `database_07` directory (rebuilds itself).
    TmdbDatabase,
    /// Umbrella `cache.db`.
    UmbrellaCache,
    /// Umbrella `search.db`.
    UmbrellaSearch,
    /// Cocoscrapers `cache.db`.
    CocoscrapersCache,
}

impl OptionalCache {
    pub const ALL: [Self; 4] = [
        Self::TmdbDatabase,
        Self::UmbrellaCache,
        Self::UmbrellaSearch,
        Self::CocoscrapersCache,
    ];

    /// Path of this cache relative to the installation root.
    #[must_use]
    pub fn rel_path(self) -> &'static str {
        match self {
            Self::TmdbDatabase => {
                "userdata/addon_data/plugin.video.themoviedb.helper/database_07"
            }
            Self::UmbrellaCache => "userdata/addon_data/plugin.video.umbrella/cache.db",
            Self::UmbrellaSearch => "userdata/addon_data/plugin.video.umbrella/search.db",
            Self::CocoscrapersCache => "userdata/addon_data/script.module.cocoscrapers/cache.db",
        }
    }
}

/// Cleanup policy for one backup run.
///
/// The mandatory set is a crate constant and is always applied; only the
/// optional caches are represented here, all disabled by default. The engine
/// never persists a policy; the caller supplies one per operation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CleanupPolicy {
    #[serde(default)]
    pub tmdb_database: bool,
    #[serde(default)]
    pub umbrella_cache: bool,
    #[serde(default)]
    pub umbrella_search: bool,
    #[serde(default)]
    pub cocoscrapers_cache: bool,
}

impl CleanupPolicy {
    /// Policy with every optional cache enabled, for the smallest archive.
    #[must_use]
    pub fn aggressive_preset() -> Self {
        Self {
            tmdb_database: true,
            umbrella_cache: true,
            umbrella_search: true,
            cocoscrapers_cache: true,
        }
    }

    #[must_use]
    pub fn with_enabled(mut self, which: OptionalCache, enabled: bool) -> Self {
        self.set_enabled(which, enabled);
        self
    }

    pub fn set_enabled(&mut self, which: OptionalCache, enabled: bool) {
        match which {
            OptionalCache::TmdbDatabase => self.tmdb_database = enabled,
            OptionalCache::UmbrellaCache => self.umbrella_cache = enabled,
            OptionalCache::UmbrellaSearch => self.umbrella_search = enabled,
            OptionalCache::CocoscrapersCache => self.cocoscrapers_cache = enabled,
        }
    }

    #[must_use]
    pub fn enabled(&self, which: OptionalCache) -> bool {
        match which {
            OptionalCache::TmdbDatabase => self.tmdb_database,
            OptionalCache::UmbrellaCache => self.umbrella_cache,
            OptionalCache::UmbrellaSearch => self.umbrella_search,
            OptionalCache::CocoscrapersCache => self.cocoscrapers_cache,
        }
    }

    /// Relative paths to remove, mandatory set first, then enabled optional
    /// caches in declaration order.
    #[must_use]
    pub fn targets(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = MANDATORY_CLEANUP.to_vec();
        for which in OptionalCache::ALL {
            if self.enabled(which) {
                out.push(which.rel_path());
            }
        }
        out
    }
}

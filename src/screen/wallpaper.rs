use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::backend::ResourceCatalog;
use crate::config::LoadingScreenConfig;
use crate::error::{LoadingError, LoadingResult};

/// Picks loading wallpapers from the resource catalog
pub struct WallpaperSelector {
    /// Lowercased name prefix
    prefix: String,
    group: String,
    rng: StdRng,
}

impl WallpaperSelector {
    pub fn new(prefix: &str, group: &str, rng: StdRng) -> Self {
        Self {
            prefix: prefix.to_lowercase(),
            group: group.to_string(),
            rng,
        }
    }

    /// Seeded from `rng_seed` when set, from entropy otherwise
    pub fn from_config(config: &LoadingScreenConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(&config.wallpaper_prefix, &config.resource_group, rng)
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn set_rng(&mut self, rng: StdRng) {
        self.rng = rng;
    }

    /// Resource names starting with the prefix, ignoring case
    pub fn candidates<C: ResourceCatalog + ?Sized>(&self, catalog: &C) -> Vec<String> {
        catalog
            .list_resource_names(&self.group)
            .into_iter()
            .filter(|name| name.to_lowercase().starts_with(&self.prefix))
            .collect()
    }

    /// Pick one candidate at random
    pub fn choose<C: ResourceCatalog + ?Sized>(&mut self, catalog: &C) -> LoadingResult<String> {
        let candidates = self.candidates(catalog);
        candidates
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| LoadingError::NoWallpaperAvailable {
                prefix: self.prefix.clone(),
                group: self.group.clone(),
            })
    }
}

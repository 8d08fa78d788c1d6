//! Component configuration

use fos_dom::{ShadowRootInit, ShadowRootMode};

use crate::assets::AssetResolver;

/// Environment variable holding the asset base URL
pub const ASSET_BASE_ENV: &str = "FOS_ASSET_BASE";

/// Environment variable switching `increased` events to bubble
pub const EVENTS_BUBBLE_ENV: &str = "FOS_EVENTS_BUBBLE";

/// Settings shared by every component definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentConfig {
    /// Base URL the counter icon is resolved against
    pub asset_base: Option<String>,
    /// Mode of the shadow roots components attach
    pub shadow_mode: ShadowRootMode,
    /// Whether `increased` events bubble
    pub bubbling_events: bool,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            asset_base: None,
            shadow_mode: ShadowRootMode::Open,
            bubbling_events: false,
        }
    }
}

impl ComponentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `FOS_ASSET_BASE` and `FOS_EVENTS_BUBBLE`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base) = std::env::var(ASSET_BASE_ENV) {
            config.asset_base = Some(base);
        }
        if let Ok(flag) = std::env::var(EVENTS_BUBBLE_ENV) {
            config.bubbling_events = parse_flag(&flag);
        }
        config
    }

    pub fn with_asset_base(mut self, base: impl Into<String>) -> Self {
        self.asset_base = Some(base.into());
        self
    }

    pub fn with_shadow_mode(mut self, mode: ShadowRootMode) -> Self {
        self.shadow_mode = mode;
        self
    }

    pub fn with_bubbling_events(mut self, bubbles: bool) -> Self {
        self.bubbling_events = bubbles;
        self
    }

    /// Options for `attach_shadow`
    pub fn shadow_init(&self) -> ShadowRootInit {
        ShadowRootInit::new(self.shadow_mode)
    }

    /// Resolver for component assets
    pub fn assets(&self) -> AssetResolver {
        AssetResolver::new(self.asset_base.as_deref())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "on" | "yes")
}

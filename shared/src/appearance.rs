use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_HAIR: u32 = 30000;
pub const DEFAULT_FACE: u32 = 20000;
pub const DEFAULT_RENDER_BASE: &str = "https://maplestory.io/api";
pub const DEFAULT_RENDER_REGION: &str = "GMS";
pub const DEFAULT_RENDER_VERSION: &str = "83";

/// Look of a character as stored by the game server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CharacterAppearance {
    pub gender: u8,
    /// Database skin index (0..=3).
    pub skin_color: u8,
    pub hair: u32,
    pub face: u32,
    /// Equipped item ids keyed by slot name.
    pub equipment: BTreeMap<String, u32>,
}

impl Default for CharacterAppearance {
    fn default() -> Self {
        Self {
            gender: 0,
            skin_color: 0,
            hair: DEFAULT_HAIR,
            face: DEFAULT_FACE,
            equipment: BTreeMap::new(),
        }
    }
}

impl CharacterAppearance {
    /// Skin id understood by the renderer. Unknown indices fall back to light skin.
    pub fn render_skin(&self) -> u32 {
        match self.skin_color {
            0 => 2000,
            1 => 2001,
            2 => 2002,
            3 => 2003,
            _ => 2000,
        }
    }

    /// Item ids in render order: face, hair, then equipment sorted by slot name.
    pub fn render_items(&self) -> Vec<u32> {
        let mut items = Vec::with_capacity(self.equipment.len() + 2);
        items.push(self.face);
        items.push(self.hair);
        items.extend(self.equipment.values().copied().filter(|id| *id > 0));
        items
    }
}

/// Turns an appearance into an image location. Implementations must not block.
pub trait AvatarRenderer {
    fn render_url(&self, appearance: &CharacterAppearance, scale: f32) -> Option<String>;
}

/// Renderer backed by a maplestory.io compatible character endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterApiRenderer {
    pub base_url: String,
    pub region: String,
    pub version: String,
}

impl Default for CharacterApiRenderer {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RENDER_BASE.to_string(),
            region: DEFAULT_RENDER_REGION.to_string(),
            version: DEFAULT_RENDER_VERSION.to_string(),
        }
    }
}

impl AvatarRenderer for CharacterApiRenderer {
    fn render_url(&self, appearance: &CharacterAppearance, scale: f32) -> Option<String> {
        if !scale.is_finite() || scale <= 0.0 {
            return None;
        }
        let items = appearance
            .render_items()
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        Some(format!(
            "{}/{}/{}/character/{}/{}/stand1/0?resize={}&renderMode=default&flipX=false",
            self.base_url.trim_end_matches('/'),
            self.region,
            self.version,
            appearance.render_skin(),
            items,
            scale,
        ))
    }
}

/// Avatar display state. Settles exactly once: later results are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AvatarState {
    #[default]
    Loading,
    Ready(String),
    Fallback,
}

impl AvatarState {
    /// Start for `appearance`; goes straight to `Fallback` when no URL can be built.
    pub fn request(renderer: &impl AvatarRenderer, appearance: &CharacterAppearance, scale: f32) -> (Self, Option<String>) {
        match renderer.render_url(appearance, scale) {
            Some(url) => (Self::Loading, Some(url)),
            None => (Self::Fallback, None),
        }
    }

    /// Resolve a pending load. Returns `false` if the state had already settled.
    pub fn settle(&mut self, outcome: Result<String, ()>) -> bool {
        if !matches!(self, Self::Loading) {
            return false;
        }
        *self = match outcome {
            Ok(url) => Self::Ready(url),
            Err(()) => Self::Fallback,
        };
        true
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

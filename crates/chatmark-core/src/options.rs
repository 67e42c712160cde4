use crate::autolink::DEFAULT_LINK_DISPLAY_LIMIT;

/// Knobs for a render call.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct RenderOptions {
    /// Bare links longer than this are displayed as `host/...`.
    pub link_display_limit: usize,
    /// When false, math spans are never handed to a renderer.
    pub math: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            link_display_limit: DEFAULT_LINK_DISPLAY_LIMIT,
            math: true,
        }
    }
}

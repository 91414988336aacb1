use crate::imports::*;

/// Name of the Khronos validation layer requested by the debug preset.
pub const KHRONOS_VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// Creation parameters for [RendererContext](crate::init::RendererContext).
///
/// Windowing extensions are provided by the [WindowProvider](crate::window::WindowProvider)
/// and never listed here.
#[derive(Debug, Clone)]
pub struct RendererCreateInfo {
    pub app_name: String,
    pub vk_version: u32,

    //Instance
    pub enable_validation: bool,
    pub validation_layers: Vec<String>,
}

impl RendererCreateInfo {
    /// Suitable for debug builds:
    /// - validation enabled with the Khronos validation layer
    /// - debug messenger forwarding verbose, warning and error messages
    pub fn debug() -> Self {
        Self {
            app_name: String::from("vkguide"),
            vk_version: API_VERSION_1_0,
            enable_validation: true,
            validation_layers: vec![String::from(KHRONOS_VALIDATION_LAYER)],
        }
    }

    /// Suitable for release builds:
    /// - no validation
    /// - no debug messenger
    pub fn release() -> Self {
        Self {
            app_name: String::from("vkguide"),
            vk_version: API_VERSION_1_0,
            enable_validation: false,
            validation_layers: vec![],
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }
}

impl Default for RendererCreateInfo {
    /// Validation follows the build profile: on with debug assertions, off otherwise.
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::debug()
        } else {
            Self::release()
        }
    }
}

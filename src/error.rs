use std::{ffi::NulError, str::Utf8Error};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("requested {requested} instance extensions but at most {capacity} fit the extension buffer")]
    CapacityExceeded { requested: usize, capacity: usize },
    #[error("requested validation layer is not available on this host. Layer: {0}")]
    LayerNotAvailable(String),
    #[error("vulkan instance creation failed: {0}")]
    InstanceCreationFailed(ash::vk::Result),
    #[error("entry point could not be resolved through the instance: {0}")]
    ExtensionNotPresent(&'static str),
    #[error("debug messenger creation failed: {0}")]
    DebugMessengerCreationFailed(ash::vk::Result),
    #[error("presentation surface creation failed: {0}")]
    SurfaceCreationFailed(ash::vk::Result),
    #[error("no GPU with vulkan support was found")]
    NoVulkanCapableDevice,
    #[error("no GPU offers both a graphics queue family and a family that can present to the surface")]
    NoSuitableDevice,
    #[error("logical device creation failed: {0}")]
    LogicalDeviceCreationFailed(ash::vk::Result),

    #[error("incorrect usage of the vulkan API: {0}")]
    Vk(#[from] ash::vk::Result),

    #[cfg(feature = "loaded")]
    #[error("vulkan entry could not be loaded: {0}")]
    Loading(#[from] ash::LoadingError),

    #[error("utf8 error: {0}")]
    Utf8(#[from] Utf8Error),

    #[error("cstring convert error: {0}")]
    CStringConvert(#[from] NulError),
}

impl Error {
    /// Whether init recovers from this error locally instead of rolling back.
    ///
    /// Only the diagnostic hook is best-effort.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::ExtensionNotPresent(_) | Error::DebugMessengerCreationFailed(_)
        )
    }
}

use crate::backend::Backend;
use crate::imports::*;

/// Platform window the renderer presents to.
pub trait WindowProvider<B: Backend> {
    /// Instance extensions the platform needs to create a surface for this window.
    fn required_extensions(&self) -> Result<Vec<CString>, Error>;

    fn create_surface(&self, backend: &B, instance: &B::Instance)
        -> Result<B::Surface, vk::Result>;
}

/// Raw display and window handles of a platform window.
///
/// The window must outlive every surface created from these handles.
#[derive(Debug, Clone, Copy)]
pub struct WindowHandles {
    pub display: RawDisplayHandle,
    pub window: RawWindowHandle,
}

impl WindowHandles {
    pub fn new(display: RawDisplayHandle, window: RawWindowHandle) -> Self {
        Self { display, window }
    }

    pub fn from_window<T>(window: &T) -> Self
    where
        T: raw_window_handle::HasRawDisplayHandle + raw_window_handle::HasRawWindowHandle,
    {
        Self {
            display: window.raw_display_handle(),
            window: window.raw_window_handle(),
        }
    }
}

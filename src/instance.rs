use crate::backend::Backend;
use crate::debug::{DiagnosticSink, MessengerDesc};
use crate::imports::*;
use crate::negotiate::{ExtensionSet, LayerSet};

/// Engine name reported in the application info.
pub const ENGINE_NAME: &str = "None";

/// Everything needed for `vkCreateInstance`.
pub struct InstanceDesc {
    pub app_name: CString,
    pub app_version: u32,
    pub engine_name: CString,
    pub engine_version: u32,
    pub api_version: u32,
    pub extensions: ExtensionSet,
    pub layers: LayerSet,
    /// Messenger chained onto instance creation, so creating and destroying the
    /// instance itself is covered by diagnostics.
    pub debug: Option<MessengerDesc>,
}

impl InstanceDesc {
    pub fn new(
        app_name: &str,
        api_version: u32,
        extensions: ExtensionSet,
        layers: LayerSet,
    ) -> Result<Self, Error> {
        Ok(Self {
            app_name: CString::new(app_name)?,
            app_version: make_api_version(0, 1, 0, 0),
            engine_name: CString::new(ENGINE_NAME)?,
            engine_version: make_api_version(0, 1, 0, 0),
            api_version,
            extensions,
            layers,
            debug: None,
        })
    }

    pub fn with_debug(mut self, debug: MessengerDesc) -> Self {
        self.debug = Some(debug);
        self
    }
}

/// Creates the instance from the negotiated extensions and layers.
///
/// Passing a `diagnostics` sink chains an unfiltered messenger onto creation.
/// Failure is fatal for the bring-up and carries the driver's status code.
pub fn create_instance<B: Backend>(
    backend: &B,
    app_name: &str,
    api_version: u32,
    extensions: ExtensionSet,
    layers: LayerSet,
    diagnostics: Option<&Arc<dyn DiagnosticSink>>,
) -> Result<B::Instance, Error> {
    let mut desc = InstanceDesc::new(app_name, api_version, extensions, layers)?;
    if let Some(sink) = diagnostics {
        desc = desc.with_debug(MessengerDesc::forward_all(sink.clone()));
    }

    let instance = backend.create_instance(&desc).map_err(|code| {
        error!("Vulkan instance creation failed, VkResult={code}");
        Error::InstanceCreationFailed(code)
    })?;

    if desc.debug.is_some() {
        trace!("Created instance with validation enabled");
    } else {
        trace!("Created instance with no validation enabled");
    }

    Ok(instance)
}

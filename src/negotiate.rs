use crate::backend::Backend;
use crate::imports::*;

/// Upper bound on the number of instance extensions requested at once.
pub const MAX_EXTENSION_COUNT: usize = 256;

/// Extension enabled on top of the platform's when diagnostics are requested.
pub fn diagnostic_extension() -> &'static CStr {
    DebugUtils::name()
}

/// Ordered, bounded list of instance extension names.
///
/// Duplicates are kept as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet {
    names: Vec<CString>,
}

impl ExtensionSet {
    pub fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Appends `extensions` in order, or fails without modifying the set when the
    /// result would exceed [MAX_EXTENSION_COUNT].
    pub fn extend_bounded<I>(&mut self, extensions: I) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: Into<CString>,
    {
        let extensions: Vec<CString> = extensions.into_iter().map(Into::into).collect();
        let requested = self.names.len() + extensions.len();
        if requested > MAX_EXTENSION_COUNT {
            return Err(Error::CapacityExceeded {
                requested,
                capacity: MAX_EXTENSION_COUNT,
            });
        }
        self.names.extend(extensions);
        Ok(())
    }

    pub fn names(&self) -> &[CString] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &CStr) -> bool {
        self.names.iter().any(|n| n.as_c_str() == name)
    }

    /// Pointers borrowed from the set, as `ppEnabledExtensionNames` expects them.
    pub fn as_ptrs(&self) -> Vec<*const c_char> {
        self.names.iter().map(|n| n.as_ptr()).collect()
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Validation layers confirmed to be installed on the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerSet {
    names: Vec<CString>,
}

impl LayerSet {
    pub fn names(&self) -> &[CString] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn as_ptrs(&self) -> Vec<*const c_char> {
        self.names.iter().map(|n| n.as_ptr()).collect()
    }
}

/// Builds the instance extension and layer lists.
///
/// Host layers are only queried when `want_diagnostics` is set. Nothing is created.
pub fn negotiate<B: Backend>(
    backend: &B,
    platform_extensions: &[CString],
    want_diagnostics: bool,
    requested_layers: &[String],
) -> Result<(ExtensionSet, LayerSet), Error> {
    let extensions = build_extension_set(platform_extensions, want_diagnostics)?;

    let layers = if want_diagnostics {
        let available = backend.available_layers()?;
        check_layers(requested_layers, &available)?
    } else {
        LayerSet::default()
    };

    trace!("Negotiated instance extensions count: {}", extensions.len());
    for ext in extensions.names() {
        trace!("{:#?}", ext);
    }
    trace!("Negotiated validation layer count: {}", layers.names().len());
    for layer in layers.names() {
        trace!("{:#?}", layer);
    }

    Ok((extensions, layers))
}

pub(crate) fn build_extension_set(
    platform_extensions: &[CString],
    want_diagnostics: bool,
) -> Result<ExtensionSet, Error> {
    let mut extensions = ExtensionSet::new();
    extensions.extend_bounded(platform_extensions.iter().cloned())?;
    if want_diagnostics {
        extensions.extend_bounded([diagnostic_extension().to_owned()])?;
    }
    Ok(extensions)
}

pub(crate) fn check_layers(requested: &[String], available: &[CString]) -> Result<LayerSet, Error> {
    let mut names = Vec::with_capacity(requested.len());
    for layer in requested {
        let wanted = CString::new(layer.as_str())?;
        if !available.contains(&wanted) {
            warn!("Not all requested layers are available. Missing: {layer}");
            return Err(Error::LayerNotAvailable(layer.clone()));
        }
        names.push(wanted);
    }
    Ok(LayerSet { names })
}

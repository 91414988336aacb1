use crate::backend::Backend;
use crate::imports::*;

/// Severities forwarded by the debug messenger.
pub const MESSAGE_SEVERITY: DebugUtilsMessageSeverityFlagsEXT =
    DebugUtilsMessageSeverityFlagsEXT::from_raw(
        DebugUtilsMessageSeverityFlagsEXT::VERBOSE.as_raw()
            | DebugUtilsMessageSeverityFlagsEXT::WARNING.as_raw()
            | DebugUtilsMessageSeverityFlagsEXT::ERROR.as_raw(),
    );

/// Message categories forwarded by the debug messenger.
pub const MESSAGE_TYPE: DebugUtilsMessageTypeFlagsEXT = DebugUtilsMessageTypeFlagsEXT::from_raw(
    DebugUtilsMessageTypeFlagsEXT::GENERAL.as_raw()
        | DebugUtilsMessageTypeFlagsEXT::VALIDATION.as_raw()
        | DebugUtilsMessageTypeFlagsEXT::PERFORMANCE.as_raw(),
);

/// Receiver of driver and validation messages.
///
/// Reporting is fire-and-forget and never influences control flow. The driver may
/// call into the sink from any thread.
pub trait DiagnosticSink: Send + Sync {
    fn report(
        &self,
        severity: DebugUtilsMessageSeverityFlagsEXT,
        category: DebugUtilsMessageTypeFlagsEXT,
        message: &str,
    );
}

/// Routes diagnostics to the `log` facade under the `vulkan` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(
        &self,
        severity: DebugUtilsMessageSeverityFlagsEXT,
        category: DebugUtilsMessageTypeFlagsEXT,
        message: &str,
    ) {
        let category = category_name(category);
        match severity {
            DebugUtilsMessageSeverityFlagsEXT::VERBOSE => {
                trace!(target: "vulkan", "[{category}] {message}")
            }
            DebugUtilsMessageSeverityFlagsEXT::INFO => info!(target: "vulkan", "[{category}] {message}"),
            DebugUtilsMessageSeverityFlagsEXT::WARNING => {
                warn!(target: "vulkan", "[{category}] {message}")
            }
            DebugUtilsMessageSeverityFlagsEXT::ERROR => {
                error!(target: "vulkan", "[{category}] {message}")
            }
            _ => (),
        };
    }
}

fn category_name(category: DebugUtilsMessageTypeFlagsEXT) -> &'static str {
    match category {
        DebugUtilsMessageTypeFlagsEXT::GENERAL => "general",
        DebugUtilsMessageTypeFlagsEXT::VALIDATION => "validation",
        DebugUtilsMessageTypeFlagsEXT::PERFORMANCE => "performance",
        _ => "unknown",
    }
}

/// Everything a backend needs to install a debug messenger.
#[derive(Clone)]
pub struct MessengerDesc {
    pub severity: DebugUtilsMessageSeverityFlagsEXT,
    pub message_type: DebugUtilsMessageTypeFlagsEXT,
    pub sink: Arc<dyn DiagnosticSink>,
}

impl MessengerDesc {
    /// Unfiltered messenger: every severity and category in [MESSAGE_SEVERITY]
    /// and [MESSAGE_TYPE] reaches `sink`.
    pub fn forward_all(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            severity: MESSAGE_SEVERITY,
            message_type: MESSAGE_TYPE,
            sink,
        }
    }

    pub(crate) fn create_info(&self, forwarder: &Forwarder) -> DebugUtilsMessengerCreateInfoEXT {
        DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(self.severity)
            .message_type(self.message_type)
            .pfn_user_callback(Some(vulkan_debug_callback))
            .user_data(forwarder.as_user_data())
            .build()
    }
}

/// Thin, address-stable wrapper handed to the driver as callback user data.
///
/// Must stay alive as long as the messenger (or the instance, for the
/// messenger chained onto instance creation) it was registered with.
pub(crate) struct Forwarder {
    sink: Arc<dyn DiagnosticSink>,
}

impl Forwarder {
    pub(crate) fn new(sink: Arc<dyn DiagnosticSink>) -> Arc<Self> {
        Arc::new(Self { sink })
    }

    fn as_user_data(&self) -> *mut c_void {
        self as *const Self as *mut c_void
    }
}

/// Installs the debug messenger on `instance`.
///
/// Callers treat failure as recoverable: the renderer keeps working, only
/// without diagnostics.
pub fn install_debug_messenger<B: Backend>(
    backend: &B,
    instance: &B::Instance,
    sink: &Arc<dyn DiagnosticSink>,
) -> Result<B::Messenger, Error> {
    let desc = MessengerDesc::forward_all(sink.clone());
    let messenger = backend.create_debug_messenger(instance, &desc)?;
    trace!("Installed debug messenger");
    Ok(messenger)
}

/// Always returns `FALSE`: messages are advisory and never abort the triggering call.
pub(crate) unsafe extern "system" fn vulkan_debug_callback(
    message_severity: DebugUtilsMessageSeverityFlagsEXT,
    message_type: DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const DebugUtilsMessengerCallbackDataEXT,
    p_user_data: *mut c_void,
) -> Bool32 {
    let message = if p_callback_data.is_null() || (*p_callback_data).p_message.is_null() {
        Cow::from("")
    } else {
        CStr::from_ptr((*p_callback_data).p_message).to_string_lossy()
    };

    if p_user_data.is_null() {
        LogSink.report(message_severity, message_type, &message);
    } else {
        let forwarder = &*(p_user_data as *const Forwarder);
        forwarder
            .sink
            .report(message_severity, message_type, &message);
    }

    FALSE
}

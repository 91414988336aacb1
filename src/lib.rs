#![doc = include_str!("../README.md")]

#[cfg(not(any(feature = "linked", feature = "loaded")))]
compile_error!("enable either the `linked` or the `loaded` feature to reach a Vulkan loader");

mod ash_backend;
mod backend;
mod create_info;
mod debug;
mod device;
mod error;
mod imports;
mod init;
mod instance;
mod logger;
mod negotiate;
mod physical_device;
mod window;

pub use ash;
pub use ash_backend::{AshBackend, AshInstance, AshMessenger};
pub use backend::Backend;
pub use create_info::{RendererCreateInfo, KHRONOS_VALIDATION_LAYER};
pub use debug::{
    install_debug_messenger, DiagnosticSink, LogSink, MessengerDesc, MESSAGE_SEVERITY,
    MESSAGE_TYPE,
};
pub use device::{create_logical_device, QueueFamilySet, QUEUE_PRIORITY};
pub use error::Error;
pub use init::{InitState, RendererContext};
pub use instance::{create_instance, InstanceDesc, ENGINE_NAME};
pub use logger::init_logger;
pub use negotiate::{diagnostic_extension, negotiate, ExtensionSet, LayerSet, MAX_EXTENSION_COUNT};
pub use physical_device::{
    create_surface_and_pick_device, find_queue_families, pick_physical_device,
    select_first_suitable, QueueFamilies, QueueFamilyRequirement, SelectedDevice,
};
pub use window::{WindowHandles, WindowProvider};

use crate::debug::MessengerDesc;
use crate::device::QueueFamilySet;
use crate::imports::*;
use crate::instance::InstanceDesc;

/// The graphics API as seen by the bring-up sequence.
///
/// Every handle passed back into a method must have been produced by the same
/// backend value. Creation methods hand out ownership; the matching `destroy_*`
/// method takes it back and is called at most once per handle.
/// Physical devices and queues are never destroyed.
///
/// [AshBackend](crate::ash_backend::AshBackend) drives a real Vulkan driver.
pub trait Backend {
    type Instance: Clone;
    type Messenger;
    type Surface: Copy;
    type PhysicalDevice: Copy;
    type Device: Clone;
    type Queue: Copy;

    /// Names of the instance layers installed on the host.
    fn available_layers(&self) -> Result<Vec<CString>, vk::Result>;

    fn create_instance(&self, desc: &InstanceDesc) -> Result<Self::Instance, vk::Result>;

    fn destroy_instance(&self, instance: Self::Instance);

    /// Resolves the messenger entry points through the instance and installs a messenger.
    ///
    /// Returns [Error::ExtensionNotPresent] when either entry point is missing.
    fn create_debug_messenger(
        &self,
        instance: &Self::Instance,
        desc: &MessengerDesc,
    ) -> Result<Self::Messenger, Error>;

    fn destroy_debug_messenger(&self, instance: &Self::Instance, messenger: Self::Messenger);

    fn destroy_surface(&self, instance: &Self::Instance, surface: Self::Surface);

    /// Physical devices in host enumeration order.
    fn enumerate_physical_devices(
        &self,
        instance: &Self::Instance,
    ) -> Result<Vec<Self::PhysicalDevice>, vk::Result>;

    /// Capability flags of every queue family, indexed by family.
    fn queue_family_flags(
        &self,
        instance: &Self::Instance,
        physical_device: Self::PhysicalDevice,
    ) -> Vec<QueueFlags>;

    fn surface_support(
        &self,
        instance: &Self::Instance,
        physical_device: Self::PhysicalDevice,
        queue_family_index: u32,
        surface: Self::Surface,
    ) -> Result<bool, vk::Result>;

    fn device_name(
        &self,
        instance: &Self::Instance,
        physical_device: Self::PhysicalDevice,
    ) -> Result<String, Error>;

    /// Creates a logical device with one queue per family in `queue_families`
    /// and no extensions or features enabled.
    fn create_device(
        &self,
        instance: &Self::Instance,
        physical_device: Self::PhysicalDevice,
        queue_families: &QueueFamilySet,
    ) -> Result<Self::Device, vk::Result>;

    fn destroy_device(&self, device: Self::Device);

    fn device_queue(&self, device: &Self::Device, queue_family_index: u32, queue_index: u32)
        -> Self::Queue;
}

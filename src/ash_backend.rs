use crate::backend::Backend;
use crate::debug::{Forwarder, MessengerDesc};
use crate::device::{QueueFamilySet, QUEUE_PRIORITY};
use crate::imports::*;
use crate::instance::InstanceDesc;
use crate::window::{WindowHandles, WindowProvider};

const CREATE_DEBUG_UTILS_MESSENGER: &str = "vkCreateDebugUtilsMessengerEXT";
const DESTROY_DEBUG_UTILS_MESSENGER: &str = "vkDestroyDebugUtilsMessengerEXT";

/// [Backend] over a real Vulkan driver.
///
/// With the `linked` feature Vulkan is linked at build time, with `loaded` the
/// loader library is opened at run time.
pub struct AshBackend {
    entry: Entry,
}

/// Instance plus the surface loader derived from it.
#[derive(Clone)]
pub struct AshInstance {
    instance: Instance,
    surface_loader: Surface,
    /// Keeps the sink of the messenger chained onto instance creation alive
    /// until the instance is destroyed.
    _forwarder: Option<Arc<Forwarder>>,
}

impl AshInstance {
    pub fn handle(&self) -> &Instance {
        &self.instance
    }

    pub fn surface_loader(&self) -> &Surface {
        &self.surface_loader
    }
}

pub struct AshMessenger {
    handle: DebugUtilsMessengerEXT,
    loader: DebugUtils,
    _forwarder: Arc<Forwarder>,
}

impl AshMessenger {
    pub fn handle(&self) -> DebugUtilsMessengerEXT {
        self.handle
    }
}

impl AshBackend {
    pub fn new() -> Result<Self, Error> {
        #[cfg(feature = "linked")]
        let entry = Entry::linked();

        #[cfg(all(feature = "loaded", not(feature = "linked")))]
        let entry = unsafe { Entry::load()? };

        Ok(Self { entry })
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// Looks both messenger entry points up through the instance before building
    /// the loader, so a missing extension surfaces as an error instead of a call
    /// through a missing function pointer.
    fn resolve_debug_utils(&self, instance: &Instance) -> Result<DebugUtils, Error> {
        for name in [CREATE_DEBUG_UTILS_MESSENGER, DESTROY_DEBUG_UTILS_MESSENGER] {
            let c_name = CString::new(name)?;
            let proc_addr = unsafe {
                (self.entry.static_fn().get_instance_proc_addr)(instance.handle(), c_name.as_ptr())
            };
            if proc_addr.is_none() {
                warn!("Could not resolve {name} through the instance");
                return Err(Error::ExtensionNotPresent(name));
            }
        }
        Ok(DebugUtils::new(&self.entry, instance))
    }
}

impl Backend for AshBackend {
    type Instance = AshInstance;
    type Messenger = AshMessenger;
    type Surface = SurfaceKHR;
    type PhysicalDevice = PhysicalDevice;
    type Device = Device;
    type Queue = Queue;

    fn available_layers(&self) -> Result<Vec<CString>, vk::Result> {
        #[allow(unused_unsafe)]
        let layers = unsafe { self.entry.enumerate_instance_layer_properties()? };
        Ok(layers
            .iter()
            .map(|layer| unsafe { CStr::from_ptr(layer.layer_name.as_ptr()) }.to_owned())
            .collect())
    }

    fn create_instance(&self, desc: &InstanceDesc) -> Result<AshInstance, vk::Result> {
        let app_info = ApplicationInfo::builder()
            .application_name(&desc.app_name)
            .application_version(desc.app_version)
            .engine_name(&desc.engine_name)
            .engine_version(desc.engine_version)
            .api_version(desc.api_version);

        let extension_names = desc.extensions.as_ptrs();
        let layer_names = desc.layers.as_ptrs();
        let forwarder = desc
            .debug
            .as_ref()
            .map(|debug| Forwarder::new(debug.sink.clone()));

        let mut instance_create_info = InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extension_names)
            .enabled_layer_names(&layer_names);

        let mut debug_messenger_info;
        if let (Some(debug), Some(forwarder)) = (&desc.debug, &forwarder) {
            debug_messenger_info = debug.create_info(forwarder);
            instance_create_info = instance_create_info.push_next(&mut debug_messenger_info);
        }

        let instance = unsafe { self.entry.create_instance(&instance_create_info, None)? };
        let surface_loader = Surface::new(&self.entry, &instance);

        Ok(AshInstance {
            instance,
            surface_loader,
            _forwarder: forwarder,
        })
    }

    fn destroy_instance(&self, instance: AshInstance) {
        unsafe { instance.instance.destroy_instance(None) };
    }

    fn create_debug_messenger(
        &self,
        instance: &AshInstance,
        desc: &MessengerDesc,
    ) -> Result<AshMessenger, Error> {
        let loader = self.resolve_debug_utils(&instance.instance)?;
        let forwarder = Forwarder::new(desc.sink.clone());
        let debug_messenger_info = desc.create_info(&forwarder);
        let handle = unsafe { loader.create_debug_utils_messenger(&debug_messenger_info, None) }
            .map_err(Error::DebugMessengerCreationFailed)?;

        Ok(AshMessenger {
            handle,
            loader,
            _forwarder: forwarder,
        })
    }

    fn destroy_debug_messenger(&self, _instance: &AshInstance, messenger: AshMessenger) {
        unsafe {
            messenger
                .loader
                .destroy_debug_utils_messenger(messenger.handle, None)
        };
    }

    fn destroy_surface(&self, instance: &AshInstance, surface: SurfaceKHR) {
        unsafe { instance.surface_loader.destroy_surface(surface, None) };
    }

    fn enumerate_physical_devices(
        &self,
        instance: &AshInstance,
    ) -> Result<Vec<PhysicalDevice>, vk::Result> {
        unsafe { instance.instance.enumerate_physical_devices() }
    }

    fn queue_family_flags(
        &self,
        instance: &AshInstance,
        physical_device: PhysicalDevice,
    ) -> Vec<QueueFlags> {
        let pdevice_queue_props = unsafe {
            instance
                .instance
                .get_physical_device_queue_family_properties(physical_device)
        };
        pdevice_queue_props
            .iter()
            .map(|queue_family_prop| queue_family_prop.queue_flags)
            .collect()
    }

    fn surface_support(
        &self,
        instance: &AshInstance,
        physical_device: PhysicalDevice,
        queue_family_index: u32,
        surface: SurfaceKHR,
    ) -> Result<bool, vk::Result> {
        unsafe {
            instance.surface_loader.get_physical_device_surface_support(
                physical_device,
                queue_family_index,
                surface,
            )
        }
    }

    fn device_name(
        &self,
        instance: &AshInstance,
        physical_device: PhysicalDevice,
    ) -> Result<String, Error> {
        let pdevice_prop = unsafe {
            instance
                .instance
                .get_physical_device_properties(physical_device)
        };
        c_chars_to_string(&pdevice_prop.device_name)
    }

    fn create_device(
        &self,
        instance: &AshInstance,
        physical_device: PhysicalDevice,
        queue_families: &QueueFamilySet,
    ) -> Result<Device, vk::Result> {
        let queue_priorities = [QUEUE_PRIORITY];

        let queue_create_infos: Vec<DeviceQueueCreateInfo> = queue_families
            .iter()
            .map(|queue_family_index| {
                DeviceQueueCreateInfo::builder()
                    .queue_family_index(queue_family_index)
                    .queue_priorities(&queue_priorities)
                    .build()
            })
            .collect();

        let device_create_info =
            DeviceCreateInfo::builder().queue_create_infos(&queue_create_infos);

        unsafe {
            instance
                .instance
                .create_device(physical_device, &device_create_info, None)
        }
    }

    fn destroy_device(&self, device: Device) {
        unsafe { device.destroy_device(None) };
    }

    fn device_queue(&self, device: &Device, queue_family_index: u32, queue_index: u32) -> Queue {
        unsafe { device.get_device_queue(queue_family_index, queue_index) }
    }
}

impl WindowProvider<AshBackend> for WindowHandles {
    fn required_extensions(&self) -> Result<Vec<CString>, Error> {
        let extension_names = ash_window::enumerate_required_extensions(self.display)?;
        Ok(extension_names
            .iter()
            .map(|&name| unsafe { CStr::from_ptr(name) }.to_owned())
            .collect())
    }

    fn create_surface(
        &self,
        backend: &AshBackend,
        instance: &AshInstance,
    ) -> Result<SurfaceKHR, vk::Result> {
        unsafe {
            ash_window::create_surface(
                backend.entry(),
                instance.handle(),
                self.display,
                self.window,
                None,
            )
        }
    }
}

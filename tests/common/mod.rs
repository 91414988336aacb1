#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::ffi::CString;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use ash::vk::{self, DebugUtilsMessageSeverityFlagsEXT, DebugUtilsMessageTypeFlagsEXT, QueueFlags};
use vkb::{
    Backend, DiagnosticSink, Error, InstanceDesc, MessengerDesc, QueueFamilySet, WindowProvider,
};

/// One API call observed by [MockBackend].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateInstance(u64),
    DestroyInstance(u64),
    CreateMessenger(u64),
    DestroyMessenger(u64),
    CreateSurface(u64),
    DestroySurface(u64),
    CreateDevice { device: u64, families: Vec<u32> },
    DestroyDevice(u64),
}

impl Call {
    pub fn is_create(&self) -> bool {
        matches!(
            self,
            Call::CreateInstance(_)
                | Call::CreateMessenger(_)
                | Call::CreateSurface(_)
                | Call::CreateDevice { .. }
        )
    }

    /// Handle of the object this call creates or destroys.
    pub fn handle(&self) -> u64 {
        match self {
            Call::CreateInstance(h)
            | Call::DestroyInstance(h)
            | Call::CreateMessenger(h)
            | Call::DestroyMessenger(h)
            | Call::CreateSurface(h)
            | Call::DestroySurface(h)
            | Call::DestroyDevice(h) => *h,
            Call::CreateDevice { device, .. } => *device,
        }
    }
}

/// Synthetic GPU: one `(flags, can_present)` pair per queue family.
#[derive(Debug, Clone)]
pub struct MockGpu {
    pub families: Vec<(QueueFlags, bool)>,
}

impl MockGpu {
    pub fn new(families: &[(QueueFlags, bool)]) -> Self {
        Self {
            families: families.to_vec(),
        }
    }

    pub fn unified() -> Self {
        Self::new(&[(QueueFlags::GRAPHICS | QueueFlags::COMPUTE, true)])
    }

    pub fn split() -> Self {
        Self::new(&[(QueueFlags::GRAPHICS, false), (QueueFlags::TRANSFER, true)])
    }

    pub fn headless() -> Self {
        Self::new(&[(QueueFlags::GRAPHICS | QueueFlags::COMPUTE, false)])
    }
}

/// Details of the last `create_instance` call.
#[derive(Debug, Clone, Default)]
pub struct InstanceRecord {
    pub app_name: CString,
    pub engine_name: CString,
    pub app_version: u32,
    pub extensions: Vec<CString>,
    pub layers: Vec<CString>,
    pub chained_debug: bool,
}

/// Recording [Backend] with injectable failures. Handles are unique integers.
#[derive(Default)]
pub struct MockBackend {
    pub layers: Vec<&'static str>,
    pub gpus: Vec<MockGpu>,
    pub fail_instance: Option<vk::Result>,
    pub messenger_missing: bool,
    pub fail_device: Option<vk::Result>,
    pub calls: Rc<RefCell<Vec<Call>>>,
    pub instance_record: Rc<RefCell<Option<InstanceRecord>>>,
    next_handle: Cell<u64>,
}

impl MockBackend {
    pub fn new(gpus: Vec<MockGpu>) -> Self {
        Self {
            layers: vec!["VK_LAYER_KHRONOS_validation"],
            gpus,
            ..Default::default()
        }
    }

    pub fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    pub fn next_handle(&self) -> u64 {
        let handle = self.next_handle.get() + 1;
        self.next_handle.set(handle);
        handle
    }
}

impl Backend for MockBackend {
    type Instance = u64;
    type Messenger = u64;
    type Surface = u64;
    type PhysicalDevice = usize;
    type Device = u64;
    /// (device, family, index)
    type Queue = (u64, u32, u32);

    fn available_layers(&self) -> Result<Vec<CString>, vk::Result> {
        Ok(self
            .layers
            .iter()
            .map(|l| CString::new(*l).unwrap())
            .collect())
    }

    fn create_instance(&self, desc: &InstanceDesc) -> Result<u64, vk::Result> {
        *self.instance_record.borrow_mut() = Some(InstanceRecord {
            app_name: desc.app_name.clone(),
            engine_name: desc.engine_name.clone(),
            app_version: desc.app_version,
            extensions: desc.extensions.names().to_vec(),
            layers: desc.layers.names().to_vec(),
            chained_debug: desc.debug.is_some(),
        });
        if let Some(code) = self.fail_instance {
            return Err(code);
        }
        let handle = self.next_handle();
        self.record(Call::CreateInstance(handle));
        Ok(handle)
    }

    fn destroy_instance(&self, instance: u64) {
        self.record(Call::DestroyInstance(instance));
    }

    fn create_debug_messenger(&self, _instance: &u64, _desc: &MessengerDesc) -> Result<u64, Error> {
        if self.messenger_missing {
            return Err(Error::ExtensionNotPresent("vkCreateDebugUtilsMessengerEXT"));
        }
        let handle = self.next_handle();
        self.record(Call::CreateMessenger(handle));
        Ok(handle)
    }

    fn destroy_debug_messenger(&self, _instance: &u64, messenger: u64) {
        self.record(Call::DestroyMessenger(messenger));
    }

    fn destroy_surface(&self, _instance: &u64, surface: u64) {
        self.record(Call::DestroySurface(surface));
    }

    fn enumerate_physical_devices(&self, _instance: &u64) -> Result<Vec<usize>, vk::Result> {
        Ok((0..self.gpus.len()).collect())
    }

    fn queue_family_flags(&self, _instance: &u64, physical_device: usize) -> Vec<QueueFlags> {
        self.gpus[physical_device]
            .families
            .iter()
            .map(|(flags, _)| *flags)
            .collect()
    }

    fn surface_support(
        &self,
        _instance: &u64,
        physical_device: usize,
        queue_family_index: u32,
        _surface: u64,
    ) -> Result<bool, vk::Result> {
        Ok(self.gpus[physical_device].families[queue_family_index as usize].1)
    }

    fn device_name(&self, _instance: &u64, physical_device: usize) -> Result<String, Error> {
        Ok(format!("Mock GPU {physical_device}"))
    }

    fn create_device(
        &self,
        _instance: &u64,
        _physical_device: usize,
        queue_families: &QueueFamilySet,
    ) -> Result<u64, vk::Result> {
        if let Some(code) = self.fail_device {
            return Err(code);
        }
        let device = self.next_handle();
        self.record(Call::CreateDevice {
            device,
            families: queue_families.as_slice().to_vec(),
        });
        Ok(device)
    }

    fn destroy_device(&self, device: u64) {
        self.record(Call::DestroyDevice(device));
    }

    fn device_queue(&self, device: &u64, queue_family_index: u32, queue_index: u32) -> (u64, u32, u32) {
        (*device, queue_family_index, queue_index)
    }
}

pub struct MockWindow {
    pub extensions: Vec<&'static str>,
    pub fail_surface: Option<vk::Result>,
}

impl Default for MockWindow {
    fn default() -> Self {
        Self {
            extensions: vec!["VK_KHR_surface", "VK_KHR_xcb_surface"],
            fail_surface: None,
        }
    }
}

impl WindowProvider<MockBackend> for MockWindow {
    fn required_extensions(&self) -> Result<Vec<CString>, Error> {
        Ok(self
            .extensions
            .iter()
            .map(|e| CString::new(*e).unwrap())
            .collect())
    }

    fn create_surface(&self, backend: &MockBackend, _instance: &u64) -> Result<u64, vk::Result> {
        if let Some(code) = self.fail_surface {
            return Err(code);
        }
        let surface = backend.next_handle();
        backend.record(Call::CreateSurface(surface));
        Ok(surface)
    }
}

/// Sink remembering every report.
#[derive(Default)]
pub struct RecordingSink {
    pub reports: Mutex<Vec<(DebugUtilsMessageSeverityFlagsEXT, DebugUtilsMessageTypeFlagsEXT, String)>>,
}

impl DiagnosticSink for RecordingSink {
    fn report(
        &self,
        severity: DebugUtilsMessageSeverityFlagsEXT,
        category: DebugUtilsMessageTypeFlagsEXT,
        message: &str,
    ) {
        self.reports
            .lock()
            .unwrap()
            .push((severity, category, message.to_string()));
    }
}

pub fn sink() -> (Arc<RecordingSink>, Arc<dyn DiagnosticSink>) {
    let recording = Arc::new(RecordingSink::default());
    let sink: Arc<dyn DiagnosticSink> = recording.clone();
    (recording, sink)
}

pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Asserts every destroy undoes an earlier create, most recent first, and nothing is left over.
pub fn assert_balanced(calls: &[Call]) {
    let mut live: Vec<u64> = Vec::new();
    for call in calls {
        if call.is_create() {
            live.push(call.handle());
        } else {
            assert_eq!(
                live.pop(),
                Some(call.handle()),
                "out of order release in {calls:?}"
            );
        }
    }
    assert!(live.is_empty(), "leaked handles {live:?} in {calls:?}");
}

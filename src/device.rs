use crate::backend::Backend;
use crate::imports::*;
use crate::physical_device::QueueFamilies;

/// Priority of every queue the renderer requests.
pub const QUEUE_PRIORITY: f32 = 1.0;

/// Distinct queue families that each get exactly one queue.
///
/// Graphics is always first; present follows only if it is a different family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueFamilySet {
    families: Vec<u32>,
}

impl QueueFamilySet {
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.families.iter().copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.families
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn contains(&self, family: u32) -> bool {
        self.families.contains(&family)
    }

    fn insert(&mut self, family: u32) {
        if !self.contains(family) {
            self.families.push(family);
        }
    }
}

impl From<QueueFamilies> for QueueFamilySet {
    fn from(queue_families: QueueFamilies) -> Self {
        let mut set = Self {
            families: Vec::with_capacity(2),
        };
        set.insert(queue_families.graphics);
        set.insert(queue_families.present);
        set
    }
}

/// Creates the logical device and fetches queue 0 of the graphics and present families.
///
/// When both families are the same, the two returned queues are the same queue.
pub fn create_logical_device<B: Backend>(
    backend: &B,
    instance: &B::Instance,
    physical_device: B::PhysicalDevice,
    queue_families: QueueFamilies,
) -> Result<(B::Device, B::Queue, B::Queue), Error> {
    let unique = QueueFamilySet::from(queue_families);
    trace!("Requesting one queue for each of {} queue families", unique.len());

    let device = backend
        .create_device(instance, physical_device, &unique)
        .map_err(|code| {
            error!("Logical device creation failed, VkResult={code}");
            Error::LogicalDeviceCreationFailed(code)
        })?;

    let graphics_queue = backend.device_queue(&device, queue_families.graphics, 0);
    let present_queue = backend.device_queue(&device, queue_families.present, 0);

    Ok((device, graphics_queue, present_queue))
}

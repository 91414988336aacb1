use crate::backend::Backend;
use crate::imports::*;
use crate::window::WindowProvider;

/// Queue families found on one physical device.
///
/// Graphics and present may name the same family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueFamilyRequirement {
    pub graphics_family: Option<u32>,
    pub present_family: Option<u32>,
}

/// A complete [QueueFamilyRequirement].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilies {
    pub graphics: u32,
    pub present: u32,
}

impl QueueFamilyRequirement {
    pub fn is_complete(&self) -> bool {
        self.complete().is_some()
    }

    pub fn complete(&self) -> Option<QueueFamilies> {
        match (self.graphics_family, self.present_family) {
            (Some(graphics), Some(present)) => Some(QueueFamilies { graphics, present }),
            _ => None,
        }
    }
}

/// Physical device picked for the renderer.
#[derive(Debug, Clone, Copy)]
pub struct SelectedDevice<P> {
    pub physical_device: P,
    /// Position in the host's enumeration order.
    pub index: usize,
    pub queue_families: QueueFamilies,
}

/// Scans families in index order for the first graphics family and, independently,
/// the first family that can present.
///
/// A failing presentation query counts as "cannot present" for that family.
pub fn find_queue_families<F>(families: &[QueueFlags], mut supports_present: F) -> QueueFamilyRequirement
where
    F: FnMut(u32) -> Result<bool, vk::Result>,
{
    let mut requirement = QueueFamilyRequirement::default();

    for (index, flags) in families.iter().enumerate() {
        let index = index as u32;

        if requirement.graphics_family.is_none() && flags.contains(QueueFlags::GRAPHICS) {
            requirement.graphics_family = Some(index);
        }

        if requirement.present_family.is_none() {
            match supports_present(index) {
                Ok(true) => requirement.present_family = Some(index),
                Ok(false) => (),
                Err(err) => warn!("Presentation support query failed for queue family {index}: {err}"),
            }
        }

        if requirement.is_complete() {
            break;
        }
    }

    requirement
}

/// First-fit selection: the lowest-index device whose requirement is complete.
///
/// There is no scoring; a later device never wins over an earlier suitable one.
pub fn select_first_suitable<P, F>(devices: &[P], mut requirement_of: F) -> Result<SelectedDevice<P>, Error>
where
    P: Copy,
    F: FnMut(P) -> QueueFamilyRequirement,
{
    if devices.is_empty() {
        return Err(Error::NoVulkanCapableDevice);
    }

    for (index, &physical_device) in devices.iter().enumerate() {
        if let Some(queue_families) = requirement_of(physical_device).complete() {
            return Ok(SelectedDevice {
                physical_device,
                index,
                queue_families,
            });
        }
    }

    Err(Error::NoSuitableDevice)
}

/// Picks the physical device for `surface`.
pub fn pick_physical_device<B: Backend>(
    backend: &B,
    instance: &B::Instance,
    surface: B::Surface,
) -> Result<SelectedDevice<B::PhysicalDevice>, Error> {
    let devices = backend.enumerate_physical_devices(instance)?;
    if devices.is_empty() {
        warn!("No GPU with Vulkan support found");
    }

    let selected = select_first_suitable(&devices, |physical_device| {
        let families = backend.queue_family_flags(instance, physical_device);
        find_queue_families(&families, |family| {
            backend.surface_support(instance, physical_device, family, surface)
        })
    })?;

    let name = backend
        .device_name(instance, selected.physical_device)
        .unwrap_or_else(|err| format!("<unreadable name: {err}>"));
    info!("Picked suitable device: {:#?}", name);
    trace!(
        "Graphics queue family: {}, present queue family: {}",
        selected.queue_families.graphics,
        selected.queue_families.present
    );

    Ok(selected)
}

/// Creates the presentation surface and picks a device that can present to it.
///
/// If no device qualifies the surface is destroyed again before the error is returned;
/// the instance stays with the caller.
pub fn create_surface_and_pick_device<B, W>(
    backend: &B,
    instance: &B::Instance,
    window: &W,
) -> Result<(B::Surface, SelectedDevice<B::PhysicalDevice>), Error>
where
    B: Backend,
    W: WindowProvider<B>,
{
    let surface = window.create_surface(backend, instance).map_err(|code| {
        error!("Presentation surface creation failed, VkResult={code}");
        Error::SurfaceCreationFailed(code)
    })?;

    match pick_physical_device(backend, instance, surface) {
        Ok(selected) => Ok((surface, selected)),
        Err(err) => {
            warn!("Couldn't pick the appropriate physical device: {err}");
            backend.destroy_surface(instance, surface);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAPHICS: QueueFlags = QueueFlags::GRAPHICS;
    const COMPUTE: QueueFlags = QueueFlags::COMPUTE;
    const TRANSFER: QueueFlags = QueueFlags::TRANSFER;

    /// Synthetic device: per-family flags and presentation support.
    struct Fake {
        families: Vec<(QueueFlags, bool)>,
    }

    impl Fake {
        fn new(families: &[(QueueFlags, bool)]) -> Self {
            Self {
                families: families.to_vec(),
            }
        }

        fn requirement(&self) -> QueueFamilyRequirement {
            let flags: Vec<QueueFlags> = self.families.iter().map(|(f, _)| *f).collect();
            find_queue_families(&flags, |i| Ok(self.families[i as usize].1))
        }
    }

    fn pick(devices: &[Fake]) -> Result<SelectedDevice<usize>, Error> {
        let ids: Vec<usize> = (0..devices.len()).collect();
        select_first_suitable(&ids, |id| devices[id].requirement())
    }

    #[test]
    fn same_family_for_graphics_and_present() {
        let device = Fake::new(&[(GRAPHICS | COMPUTE, true)]);
        assert_eq!(
            device.requirement().complete(),
            Some(QueueFamilies {
                graphics: 0,
                present: 0
            })
        );
    }

    #[test]
    fn split_families_are_found_independently() {
        let device = Fake::new(&[(TRANSFER, false), (GRAPHICS, false), (COMPUTE, true)]);
        assert_eq!(
            device.requirement(),
            QueueFamilyRequirement {
                graphics_family: Some(1),
                present_family: Some(2),
            }
        );
    }

    #[test]
    fn first_matching_family_wins() {
        let device = Fake::new(&[(COMPUTE, true), (GRAPHICS, true), (GRAPHICS, true)]);
        let requirement = device.requirement();
        assert_eq!(requirement.graphics_family, Some(1));
        assert_eq!(requirement.present_family, Some(0));
    }

    #[test]
    fn incomplete_without_presentation() {
        let device = Fake::new(&[(GRAPHICS, false), (COMPUTE, false)]);
        let requirement = device.requirement();
        assert_eq!(requirement.graphics_family, Some(0));
        assert_eq!(requirement.present_family, None);
        assert!(!requirement.is_complete());
    }

    #[test]
    fn failed_present_query_is_treated_as_unsupported() {
        let flags = [GRAPHICS, GRAPHICS];
        let requirement = find_queue_families(&flags, |i| {
            if i == 0 {
                Err(vk::Result::ERROR_SURFACE_LOST_KHR)
            } else {
                Ok(true)
            }
        });
        assert_eq!(requirement.graphics_family, Some(0));
        assert_eq!(requirement.present_family, Some(1));
    }

    #[test]
    fn stops_querying_once_complete() {
        let flags = [GRAPHICS, GRAPHICS, GRAPHICS];
        let mut queried = Vec::new();
        find_queue_families(&flags, |i| {
            queried.push(i);
            Ok(true)
        });
        assert_eq!(queried, vec![0]);
    }

    #[test]
    fn first_fit_not_best_fit() {
        let devices = [
            Fake::new(&[(COMPUTE, true)]),
            Fake::new(&[(GRAPHICS, false), (TRANSFER, true)]),
            Fake::new(&[(GRAPHICS | COMPUTE | TRANSFER, true)]),
        ];
        let selected = pick(&devices).unwrap();
        assert_eq!(selected.index, 1);
        assert_eq!(selected.physical_device, 1);
        assert_eq!(
            selected.queue_families,
            QueueFamilies {
                graphics: 0,
                present: 1
            }
        );
    }

    #[test]
    fn lowest_index_over_many_layouts() {
        let layouts: [&[(QueueFlags, bool)]; 4] = [
            &[(GRAPHICS, false)],
            &[(COMPUTE, true)],
            &[],
            &[(TRANSFER, false), (GRAPHICS, true)],
        ];

        // Every rotation of the list must still pick the first complete device.
        for shift in 0..layouts.len() {
            let devices: Vec<Fake> = (0..layouts.len())
                .map(|i| Fake::new(layouts[(i + shift) % layouts.len()]))
                .collect();
            let expected = devices.iter().position(|d| d.requirement().is_complete());
            assert_eq!(pick(&devices).ok().map(|s| s.index), expected);
        }
    }

    #[test]
    fn no_devices() {
        assert!(matches!(pick(&[]), Err(Error::NoVulkanCapableDevice)));
    }

    #[test]
    fn no_suitable_device() {
        let devices = [
            Fake::new(&[(GRAPHICS, false)]),
            Fake::new(&[(COMPUTE, true)]),
        ];
        assert!(matches!(pick(&devices), Err(Error::NoSuitableDevice)));
    }
}

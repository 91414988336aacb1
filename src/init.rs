use crate::ash_backend::AshBackend;
use crate::backend::Backend;
use crate::create_info::RendererCreateInfo;
use crate::debug::{install_debug_messenger, DiagnosticSink, LogSink};
use crate::device::create_logical_device;
use crate::imports::*;
use crate::instance::create_instance;
use crate::negotiate::negotiate;
use crate::physical_device::{create_surface_and_pick_device, QueueFamilies};
use crate::window::{WindowHandles, WindowProvider};

/// Progress of the bring-up sequence.
///
/// Any state can fall through to [InitState::TornDown] when a fatal stage fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Fresh,
    InstanceReady,
    /// Reached whether or not the debug messenger could be installed.
    DiagnosticsAttempted,
    SurfaceReady,
    DeviceSelected,
    DeviceReady,
    TornDown,
}

/// The foundational Vulkan objects of a renderer, fully initialized.
///
/// A context only exists in the ready state: [RendererContext::init] either returns
/// one or releases everything it acquired before returning the error. Teardown
/// happens exactly once, on [RendererContext::destroy] or drop, in reverse
/// acquisition order (device, surface, debug messenger, instance).
pub struct RendererContext<B: Backend> {
    backend: B,
    instance: B::Instance,
    /// Only installed with enabled validation, and only if the driver allowed it
    debug_messenger: Option<B::Messenger>,
    surface: B::Surface,
    /// Enumerated, not created. Lives as long as the instance.
    physical_device: B::PhysicalDevice,
    queue_families: QueueFamilies,
    device: B::Device,
    graphics_queue: B::Queue,
    /// Same queue as `graphics_queue` when both families coincide
    present_queue: B::Queue,
    diagnostics_enabled: bool,
}

impl RendererContext<AshBackend> {
    /// Loads Vulkan and brings the renderer up for `window`, logging diagnostics
    /// through the `log` facade.
    ///
    /// ```no_run
    /// # extern crate winit;
    /// use vkb::{RendererContext, RendererCreateInfo, WindowHandles};
    ///
    /// let event_loop = winit::event_loop::EventLoop::new();
    /// let window = winit::window::WindowBuilder::new().build(&event_loop).unwrap();
    ///
    /// let renderer = RendererContext::new(
    ///     &WindowHandles::from_window(&window),
    ///     &RendererCreateInfo::default(),
    /// )
    /// .unwrap();
    /// renderer.destroy();
    /// ```
    pub fn new(window: &WindowHandles, create_info: &RendererCreateInfo) -> Result<Self, Error> {
        Self::init(AshBackend::new()?, window, create_info, Arc::new(LogSink))
    }
}

impl<B: Backend> RendererContext<B> {
    /// Runs the bring-up sequence: negotiate, instance, debug messenger, surface and
    /// physical device, logical device and queues.
    ///
    /// Every stage except the debug messenger is fatal. On failure, everything acquired
    /// so far is released in reverse order before the error is returned.
    pub fn init<W: WindowProvider<B>>(
        backend: B,
        window: &W,
        create_info: &RendererCreateInfo,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, Error> {
        let acquired = bring_up(&backend, window, create_info, &sink)?;

        Ok(Self {
            backend,
            instance: acquired.instance,
            debug_messenger: acquired.debug_messenger,
            surface: acquired.surface,
            physical_device: acquired.physical_device,
            queue_families: acquired.queue_families,
            device: acquired.device,
            graphics_queue: acquired.graphics_queue,
            present_queue: acquired.present_queue,
            diagnostics_enabled: create_info.enable_validation,
        })
    }

    /// Releases every object in reverse acquisition order.
    pub fn destroy(self) {
        drop(self);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn instance(&self) -> &B::Instance {
        &self.instance
    }

    pub fn debug_messenger(&self) -> Option<&B::Messenger> {
        self.debug_messenger.as_ref()
    }

    pub fn surface(&self) -> B::Surface {
        self.surface
    }

    pub fn physical_device(&self) -> B::PhysicalDevice {
        self.physical_device
    }

    pub fn queue_families(&self) -> QueueFamilies {
        self.queue_families
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }

    pub fn graphics_queue(&self) -> B::Queue {
        self.graphics_queue
    }

    pub fn present_queue(&self) -> B::Queue {
        self.present_queue
    }

    /// Whether validation was requested. The messenger itself may still be absent.
    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics_enabled
    }
}

impl<B: Backend> Drop for RendererContext<B> {
    fn drop(&mut self) {
        info!("Tearing down renderer");
        self.backend.destroy_device(self.device.clone());
        self.backend.destroy_surface(&self.instance, self.surface);
        if let Some(debug_messenger) = self.debug_messenger.take() {
            self.backend
                .destroy_debug_messenger(&self.instance, debug_messenger);
        }
        self.backend.destroy_instance(self.instance.clone());
        trace!("Renderer: {:?}", InitState::TornDown);
    }
}

struct Acquired<B: Backend> {
    instance: B::Instance,
    debug_messenger: Option<B::Messenger>,
    surface: B::Surface,
    physical_device: B::PhysicalDevice,
    queue_families: QueueFamilies,
    device: B::Device,
    graphics_queue: B::Queue,
    present_queue: B::Queue,
}

fn bring_up<B, W>(
    backend: &B,
    window: &W,
    create_info: &RendererCreateInfo,
    sink: &Arc<dyn DiagnosticSink>,
) -> Result<Acquired<B>, Error>
where
    B: Backend,
    W: WindowProvider<B>,
{
    let want_diagnostics = create_info.enable_validation;
    let mut rollback = Rollback::new(backend);

    let platform_extensions = window.required_extensions()?;
    let (extensions, layers) = negotiate(
        backend,
        &platform_extensions,
        want_diagnostics,
        &create_info.validation_layers,
    )?;

    let instance = create_instance(
        backend,
        &create_info.app_name,
        create_info.vk_version,
        extensions,
        layers,
        want_diagnostics.then_some(sink),
    )?;
    rollback.instance = Some(instance.clone());
    rollback.advance(InitState::InstanceReady);

    if want_diagnostics {
        match install_debug_messenger(backend, &instance, sink) {
            Ok(debug_messenger) => rollback.debug_messenger = Some(debug_messenger),
            Err(err) => {
                warn!("Couldn't create Vulkan renderer debug messenger: {err}");
                sink.report(
                    DebugUtilsMessageSeverityFlagsEXT::WARNING,
                    DebugUtilsMessageTypeFlagsEXT::GENERAL,
                    &format!("debug messenger unavailable, continuing without it: {err}"),
                );
            }
        }
        rollback.advance(InitState::DiagnosticsAttempted);
    }

    let (surface, selected) = create_surface_and_pick_device(backend, &instance, window)?;
    rollback.surface = Some(surface);
    rollback.advance(InitState::SurfaceReady);
    rollback.advance(InitState::DeviceSelected);

    let (device, graphics_queue, present_queue) = create_logical_device(
        backend,
        &instance,
        selected.physical_device,
        selected.queue_families,
    )?;
    rollback.advance(InitState::DeviceReady);

    let debug_messenger = rollback.commit();

    Ok(Acquired {
        instance,
        debug_messenger,
        surface,
        physical_device: selected.physical_device,
        queue_families: selected.queue_families,
        device,
        graphics_queue,
        present_queue,
    })
}

/// Owns every object committed so far and releases them in reverse order on drop,
/// unless the sequence completed and [Rollback::commit] disarmed it.
struct Rollback<'b, B: Backend> {
    backend: &'b B,
    state: InitState,
    instance: Option<B::Instance>,
    debug_messenger: Option<B::Messenger>,
    surface: Option<B::Surface>,
}

impl<'b, B: Backend> Rollback<'b, B> {
    fn new(backend: &'b B) -> Self {
        trace!("Renderer: {:?}", InitState::Fresh);
        Self {
            backend,
            state: InitState::Fresh,
            instance: None,
            debug_messenger: None,
            surface: None,
        }
    }

    fn advance(&mut self, state: InitState) {
        trace!("Renderer: {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    /// Hands ownership to the caller; nothing is released afterwards.
    fn commit(mut self) -> Option<B::Messenger> {
        self.instance = None;
        self.surface = None;
        self.debug_messenger.take()
    }
}

impl<'b, B: Backend> Drop for Rollback<'b, B> {
    fn drop(&mut self) {
        let Some(instance) = self.instance.take() else {
            return;
        };

        warn!("Rolling back renderer init from {:?}", self.state);
        if let Some(surface) = self.surface.take() {
            self.backend.destroy_surface(&instance, surface);
        }
        if let Some(debug_messenger) = self.debug_messenger.take() {
            self.backend.destroy_debug_messenger(&instance, debug_messenger);
        }
        self.backend.destroy_instance(instance);
        self.state = InitState::TornDown;
        trace!("Renderer: {:?}", self.state);
    }
}

use anyhow::Result;
use log::{error, info};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopBuilder};
use winit::window::WindowBuilder;

use vkb::{RendererContext, RendererCreateInfo, WindowHandles};

pub fn main() {
    let _ = vkb::init_logger();
    if let Err(err) = try_main() {
        err.chain().for_each(|cause| error!("{}", cause));
        std::process::exit(1);
    }
}

pub fn try_main() -> Result<()> {
    let event_loop: EventLoop<()> = EventLoopBuilder::default().build();
    let window = WindowBuilder::new()
        .with_title("vkguide")
        .with_inner_size(LogicalSize {
            width: 1280_u32,
            height: 720_u32,
        })
        .build(&event_loop)?;

    let create_info = RendererCreateInfo::default();
    let renderer = RendererContext::new(&WindowHandles::from_window(&window), &create_info)?;
    info!(
        "Renderer ready, validation {}",
        if renderer.diagnostics_enabled() {
            "enabled"
        } else {
            "disabled"
        }
    );

    // The surface must be released before the window goes away.
    let mut renderer = Some(renderer);

    //Polled event loop that exits on [ESC] or window close
    event_loop.run(move |new_event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        match new_event {
            Event::WindowEvent { event, window_id } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            ..
                        },
                    ..
                } => *control_flow = ControlFlow::Exit,
                _ => (),
            },

            Event::LoopDestroyed => {
                if let Some(renderer) = renderer.take() {
                    renderer.destroy();
                }
            }

            _ => (),
        }
    });
}

use std::sync::Arc;

use anyhow::{Context, Result};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

use crate::camera::CameraController;
use crate::renderer::Renderer;
use crate::scene::Scene;

/// Window created by [`run`]
#[derive(Clone, Debug)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Ball Drop".to_owned(),
            width: 1280,
            height: 720,
        }
    }
}

/// Open a window and render `scene` until the window closes.
///
/// `before_render` runs once per frame, right before the scene is drawn, with
/// exclusive access to the scene. An error from it stops the loop and is
/// returned to the caller.
pub fn run<F>(window_config: &WindowConfig, mut scene: Scene, mut before_render: F) -> Result<()>
where
    F: FnMut(&mut Scene) -> Result<()>,
{
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(&window_config.title)
            .with_inner_size(LogicalSize::new(window_config.width, window_config.height))
            .build(&event_loop)
            .context("failed to create window")?,
    );

    let mut renderer = pollster::block_on(Renderer::new(window.clone()))?;
    let size = renderer.size();
    scene.camera.resize(size.width, size.height);

    let mut controller = CameraController::default();
    let mut failure: Option<anyhow::Error> = None;

    event_loop.run(|event, elwt| match event {
        Event::WindowEvent {
            ref event,
            window_id,
        } if window_id == renderer.window().id() => {
            if controller.process_event(&mut scene.camera, event) {
                return;
            }
            match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(physical_size) => {
                    renderer.resize(*physical_size);
                    scene.camera.resize(physical_size.width, physical_size.height);
                }
                WindowEvent::RedrawRequested => {
                    if let Err(e) = before_render(&mut scene) {
                        tracing::error!("before-render hook failed: {e:#}");
                        failure = Some(e);
                        elwt.exit();
                        return;
                    }
                    match renderer.render(&scene) {
                        Ok(()) => {}
                        // Reconfigure the surface if lost
                        Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size()),
                        // The system is out of memory, we should probably quit
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            failure = Some(anyhow::anyhow!("GPU out of memory"));
                            elwt.exit();
                        }
                        // All other errors (Outdated, Timeout) should be resolved by the next frame
                        Err(e) => tracing::warn!("surface error: {e:?}"),
                    }
                }
                _ => {}
            }
        }
        Event::AboutToWait => {
            renderer.window().request_redraw();
        }
        _ => {}
    })?;

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

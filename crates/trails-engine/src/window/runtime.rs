use std::num::NonZeroU32;

use anyhow::{anyhow, Context, Result};
use glutin::config::{Api, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext, Version,
};
use glutin::display::{Display, DisplayApiPreference, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::GlWindow;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, Present};
use crate::gl::{GlowBackend, Gpu};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Sync buffer swaps to the display refresh.
    pub vsync: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "trails".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            vsync: true,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens a window with a GLES 2.0 context, builds the app with `factory`
    /// once the context is current, then drives it until the window closes.
    ///
    /// The first error from context setup or from an app callback stops the
    /// loop and is returned.
    pub fn run<A, F>(config: RuntimeConfig, factory: F) -> Result<()>
    where
        A: App,
        F: FnOnce(&Gpu, (u32, u32)) -> Result<A>,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState {
            config,
            factory: Some(factory),
            live: None,
            error: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Everything that exists while the window is up.
///
/// Fields drop in declaration order: the app releases its GL objects while
/// the context is still alive.
struct Live<A> {
    app: A,
    clock: FrameClock,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

struct AppState<A, F> {
    config: RuntimeConfig,
    factory: Option<F>,
    live: Option<Live<A>>,
    error: Option<anyhow::Error>,
}

impl<A, F> AppState<A, F>
where
    A: App,
    F: FnOnce(&Gpu, (u32, u32)) -> Result<A>,
{
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.error.is_none() {
            self.error = Some(err);
        }
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let factory = self
            .factory
            .take()
            .ok_or_else(|| anyhow!("app was already started"))?;

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let raw_window = window
            .window_handle()
            .context("failed to read window handle")?
            .as_raw();
        let raw_display = event_loop
            .display_handle()
            .context("failed to read display handle")?
            .as_raw();

        #[cfg(target_os = "windows")]
        let preference = DisplayApiPreference::Wgl(Some(raw_window));
        #[cfg(target_os = "macos")]
        let preference = DisplayApiPreference::Cgl;
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        let preference = DisplayApiPreference::Egl;

        // SAFETY: the display handle comes from the live event loop.
        let display = unsafe { Display::new(raw_display, preference) }
            .context("failed to create GL display")?;

        let template = ConfigTemplateBuilder::new()
            .with_api(Api::GLES2)
            .with_alpha_size(8)
            .with_depth_size(16)
            .compatible_with_native_window(raw_window)
            .build();
        // SAFETY: the template's native window is `window`, alive for this call.
        let gl_config = unsafe { display.find_configs(template) }
            .context("failed to query GL configs")?
            .reduce(|best, c| if c.num_samples() > best.num_samples() { c } else { best })
            .context("no GLES 2.0 config matches the window")?;

        let context_attrs = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::Gles(Some(Version::new(2, 0))))
            .build(Some(raw_window));

        // SAFETY: the raw window handle belongs to `window`, which outlives the
        // context (see `Live`).
        let context = unsafe { display.create_context(&gl_config, &context_attrs) }
            .context("failed to create GLES 2.0 context")?;

        let surface_attrs = window
            .build_surface_attributes(Default::default())
            .context("failed to read window handle")?;
        // SAFETY: as above.
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attrs) }
            .context("failed to create window surface")?;

        let context = context
            .make_current(&surface)
            .context("failed to make GL context current")?;

        let interval = if self.config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            log::warn!("failed to set swap interval: {e}");
        }

        // SAFETY: the context was just made current on this thread and `Live`
        // keeps it alive for as long as the backend.
        let backend = unsafe {
            GlowBackend::new(glow::Context::from_loader_function_cstr(|s| {
                display.get_proc_address(s)
            }))
        };
        log::info!("GL {}", backend.version());
        let gpu = Gpu::new(backend);

        let size = window.inner_size();
        let app = factory(&gpu, (size.width.max(1), size.height.max(1)))
            .context("failed to build app")?;

        window.request_redraw();
        self.live = Some(Live {
            app,
            clock: FrameClock::new(),
            surface,
            context,
            window,
        });
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        let Some(live) = self.live.as_mut() else {
            return Ok(());
        };
        let Some((width, height)) = drawable_size(size) else {
            log::debug!("skipping zero-sized resize");
            return Ok(());
        };

        live.surface.resize(&live.context, width, height);
        live.app.on_resize(width.get(), height.get())?;
        live.window.request_redraw();
        Ok(())
    }

    fn redraw(&mut self) -> Result<AppControl> {
        let Some(live) = self.live.as_mut() else {
            return Ok(AppControl::Continue);
        };
        let Live {
            app,
            clock,
            surface,
            context,
            ..
        } = live;

        let mut swap = SwapBuffers { surface, context };
        let mut ctx = FrameCtx {
            time: clock.tick(),
            surface: &mut swap,
        };
        app.on_frame(&mut ctx)
    }
}

impl<A, F> ApplicationHandler for AppState<A, F>
where
    A: App,
    F: FnOnce(&Gpu, (u32, u32)) -> Result<A>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.live.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: the simulation advances every frame.
        if let Some(live) = &self.live {
            live.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let result = match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                event_loop.exit();
                Ok(())
            }

            WindowEvent::Resized(size) => self.resize(size),

            WindowEvent::ScaleFactorChanged { .. } => {
                match self.live.as_ref().map(|live| live.window.inner_size()) {
                    Some(size) => self.resize(size),
                    None => Ok(()),
                }
            }

            WindowEvent::RedrawRequested => match self.redraw() {
                Ok(AppControl::Exit) => {
                    event_loop.exit();
                    Ok(())
                }
                Ok(AppControl::Continue) => Ok(()),
                Err(e) => Err(e),
            },

            _ => Ok(()),
        };

        if let Err(e) = result {
            self.fail(event_loop, e);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(live) = self.live.take() {
            log::info!("shutting down after {} frames", live.clock.frame_index());
        }
    }
}

/// Default-framebuffer presentation through the window surface.
struct SwapBuffers<'a> {
    surface: &'a Surface<WindowSurface>,
    context: &'a PossiblyCurrentContext,
}

impl Present for SwapBuffers<'_> {
    fn present(&mut self) -> Result<()> {
        self.surface
            .swap_buffers(self.context)
            .context("failed to swap buffers")
    }
}

/// Surface dimensions, or `None` while either side is zero (minimized).
fn drawable_size(size: PhysicalSize<u32>) -> Option<(NonZeroU32, NonZeroU32)> {
    Some((NonZeroU32::new(size.width)?, NonZeroU32::new(size.height)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimized_windows_have_no_drawable_size() {
        assert_eq!(drawable_size(PhysicalSize::new(0, 720)), None);
        assert_eq!(drawable_size(PhysicalSize::new(1280, 0)), None);
    }

    #[test]
    fn drawable_size_keeps_physical_pixels() {
        let (w, h) = drawable_size(PhysicalSize::new(1280, 720)).unwrap();
        assert_eq!((w.get(), h.get()), (1280, 720));
    }

    #[test]
    fn default_config_is_vsynced_720p() {
        let config = RuntimeConfig::default();
        assert!(config.vsync);
        assert_eq!(config.initial_size, LogicalSize::new(1280.0, 720.0));
    }
}

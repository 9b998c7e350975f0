use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::fmt::Display;
use std::num::NonZeroU32;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use gl_wrapper::renderer::SurfaceRenderer;

/// Hosts the window and GL context, and drives a [`SurfaceRenderer`]:
/// creation once the context is current, a resize per non-zero size change,
/// a draw per frame, continuously.
pub struct App<R: SurfaceRenderer> {
    event_loop: EventLoop<()>,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    renderer: R,
}

impl<R> App<R>
where
    R: SurfaceRenderer + 'static,
    R::Error: Display,
{
    pub fn new(mut renderer: R, width: u32, height: u32) -> Result<Self, AppError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(width, height)))
            .with_min_inner_size(Size::Physical(PhysicalSize::new(32, 32)))
            .with_title("quadview");
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new().with_alpha_size(8);

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |mut configs| configs.next().unwrap())
            .map_err(|_| AppError::NoConfig)?;
        let window = window.ok_or(AppError::NoConfig)?;

        let handle = Some(window.raw_window_handle());
        let gl_display = gl_config.display();

        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(handle);

        let gl_window = GlWindow::new(window, &gl_config);

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr) }
            .map_err(AppError::Context)?
            .make_current(&gl_window.surface)
            .map_err(AppError::Context)?;

        gl::load_with(|s| {
            gl_display
                .get_proc_address(CString::new(s).unwrap().as_c_str())
                .cast()
        });

        renderer
            .on_surface_created()
            .map_err(|e| AppError::Renderer(e.to_string()))?;

        log::info!("Created OpenGL 3.3 surface");

        Ok(Self {
            event_loop,
            gl_context,
            gl_window,
            renderer,
        })
    }

    pub fn run(self) -> ! {
        let Self {
            event_loop,
            gl_context,
            gl_window,
            mut renderer,
        } = self;

        event_loop.run(move |event, _window_target, control_flow| {
            *control_flow = ControlFlow::Wait;
            match event {
                Event::RedrawEventsCleared => {
                    gl_window.window.request_redraw();
                    gl_window.surface.swap_buffers(&gl_context).unwrap();
                }
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::Resized(size) => {
                        if size.width != 0 && size.height != 0 {
                            gl_window.surface.resize(
                                &gl_context,
                                NonZeroU32::new(size.width).unwrap(),
                                NonZeroU32::new(size.height).unwrap(),
                            );
                            renderer.on_surface_resized(size.width, size.height);
                        }
                    }
                    WindowEvent::CloseRequested => {
                        // the renderer drops with the context still current
                        control_flow.set_exit();
                    }
                    _ => (),
                },
                Event::RedrawRequested(_) => {
                    renderer.on_draw_frame();
                }
                _ => (),
            }
        })
    }
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Self {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).unwrap(),
            NonZeroU32::new(height).unwrap(),
        );

        let surface = unsafe {
            config
                .display()
                .create_window_surface(config, &attrs)
                .unwrap()
        };

        Self { window, surface }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no suitable display configuration, OpenGL 3.3 is required")]
    NoConfig,
    #[error("could not create OpenGL context: {0}")]
    Context(glutin::error::Error),
    #[error("could not initialize renderer: {0}")]
    Renderer(String),
}

//! Flow control and application event loop.
//!
//! A "flow" is a self-contained part of the application: it loads its
//! resources, updates its state every frame and describes what it wants drawn.
//! The engine owns the window and the GPU [`Context`], drives every flow through
//! its lifecycle and composes their renders into one frame.
//!
//! # User-facing types
//!
//! - [`GraphicsFlow<S>`] is the trait for scenes that handle events and rendering
//! - [`Out<S>`] lets lifecycle hooks configure the context, mutate the shared state or exit
//! - [`FlowConstructor<S>`] asynchronously builds a flow once the GPU is ready
//!
//! # Lifecycle Flow
//!
//! 1. `resumed` creates the window and context, then runs all constructors
//! 2. `on_init` is called once per flow
//! 3. Every `RedrawRequested`: FPS tick, `on_update`, camera upload,
//!    3D pass, overlay pass, present
//! 4. `on_window_events` receives every window event before the engine handles it,
//!    except `Resized`, which flows see after the surface was reconfigured
//! 5. On exit every flow is handed to `on_dispose` exactly once, then the context is dropped

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};

use instant::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    config,
    context::{Context, InitContext},
    data_structures::{model::DrawModel, texture::Texture},
    render::{Batches, Render},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

///
/// This is the Output Type for every lifecycle hook that is allowed to change something
/// outside of the flow itself.
///
/// `Out::Configure` modifies the Context, for instance to change the clear colour or the camera.
///
/// `Out::Mut` mutates the state shared by all flows.
///
/// `Out::Exit` closes the window and ends the event loop.
///
/// `Empty` is the default output used when nothing needs to be handled.
///
pub enum Out<S> {
    Configure(Box<dyn FnOnce(&mut Context)>),
    Mut(Box<dyn FnOnce(&mut S)>),
    Exit,
    Empty,
}

impl<S> Default for Out<S> {
    fn default() -> Self {
        Self::Empty
    }
}

/// Trait for implementing a renderable scene.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once after all flows were constructed
/// 2. `on_window_events()` is called for each winit window event
/// 3. `on_update()` is called every frame before rendering
/// 4. `on_render()` is called each frame and specifies how to render `self`
/// 5. `on_dispose()` is called once when the application shuts down
///
pub trait GraphicsFlow<S> {
    /// Initialize the flow and configure the context.
    ///
    /// This is the place to set things such as the background colour, the
    /// camera start position or the lighting environment.
    fn on_init(&mut self, ctx: &mut Context, state: &mut S) -> Out<S>;

    /// Update state every frame.
    ///
    /// `dt` is the time elapsed since the previous frame.
    fn on_update(&mut self, ctx: &Context, state: &mut S, dt: Duration) -> Out<S>;

    /// Handle window events (keyboard, window resizing, etc.).
    fn on_window_events(&mut self, ctx: &Context, state: &mut S, event: &WindowEvent) -> Out<S>;

    /// Return renderable objects for this flow.
    ///
    /// The engine batches the renders of all flows per pipeline.
    fn on_render(&self) -> Render<'_>;

    /// Release GPU resources. Called exactly once, before the context is dropped.
    fn on_dispose(self: Box<Self>, _ctx: &Context, _state: &mut S) {}
}

impl<S> Debug for dyn GraphicsFlow<S> + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GraphicsFlow")
    }
}

/// Type alias for a flow constructor (factory function).
///
/// A flow constructor takes an `InitContext` and asynchronously returns a
/// boxed `GraphicsFlow`, or the error that kept it from loading.
pub type FlowConstructor<S> = Box<
    dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsFlow<S>>>>>>,
>;

/// Application state bundle: GPU context, shared state and surface status.
pub struct AppState<State: 'static> {
    pub(crate) ctx: Context,
    state: State,
    is_surface_configured: bool,
}

impl<State: Default> AppState<State> {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let ctx = Context::new(window).await?;
        Ok(Self {
            ctx,
            state: State::default(),
            is_surface_configured: false,
        })
    }
}

impl<State> AppState<State> {
    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    fn render(
        &mut self,
        graphics_flows: &[Box<dyn GraphicsFlow<State>>],
    ) -> Result<(), wgpu::SurfaceError> {
        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let mut batches = Batches::default();
        graphics_flows
            .iter()
            .for_each(|flow| flow.on_render().set_pipelines(&mut batches));

        #[cfg(feature = "ui")]
        if let Err(e) = self.ctx.text.prepare(
            &self.ctx.device,
            &self.ctx.queue,
            &batches.labels,
            self.ctx.window_size(),
            self.ctx.scale_factor() as f32,
        ) {
            log::error!("{e:#}");
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder: wgpu::CommandEncoder =
            self.ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        {
            let mut render_pass: wgpu::RenderPass<'_> =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Scene Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        view: &self.ctx.depth_texture.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    ..Default::default()
                });

            render_pass.set_pipeline(&self.ctx.pipelines.basic);
            for instanced in &batches.basics {
                // Empty grids are valid, there is just nothing to draw.
                if instanced.amount == 0 || instanced.instance.size() == 0 {
                    continue;
                }
                render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                render_pass.draw_model_instanced(
                    instanced.model,
                    0..instanced.amount as u32,
                    &self.ctx.camera.bind_group,
                    &self.ctx.light.bind_group,
                );
            }
        }
        {
            // Sprites and text go on top of the finished scene without depth testing.
            let mut overlay_pass: wgpu::RenderPass<'_> =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Overlay Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                });

            overlay_pass.set_pipeline(&self.ctx.pipelines.gui);
            for flat in &batches.guis {
                overlay_pass.set_bind_group(0, flat.group, &[]);
                overlay_pass.set_vertex_buffer(0, flat.vertex.slice(..));
                overlay_pass.set_index_buffer(flat.index.slice(..), wgpu::IndexFormat::Uint16);
                overlay_pass.draw_indexed(0..flat.amount as u32, 0, 0..1);
            }

            #[cfg(feature = "ui")]
            if let Err(e) = self.ctx.text.render(&mut overlay_pass) {
                log::error!("{e:#}");
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();

        #[cfg(feature = "ui")]
        self.ctx.text.trim();

        Ok(())
    }
}

pub struct App<State: 'static> {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent<State>>,
    state: Option<AppState<State>>,
    // This will hold the fully initialized flows once they are ready.
    graphics_flows: Vec<Box<dyn GraphicsFlow<State>>>,
    // Taken on the first `resumed`.
    constructors: Option<Vec<FlowConstructor<State>>>,
    // The first fatal error, returned by `run`.
    error: Option<anyhow::Error>,
    last_time: Instant,
}

impl<State: 'static> App<State> {
    fn new(
        event_loop: &EventLoop<FlowEvent<State>>,
        constructors: Vec<FlowConstructor<State>>,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            state: None,
            graphics_flows: Vec::new(),
            constructors: Some(constructors),
            error: None,
            last_time: Instant::now(),
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        if self.error.is_none() {
            self.error = Some(error);
        }
        event_loop.exit();
    }

    fn start(
        &mut self,
        event_loop: &ActiveEventLoop,
        mut app_state: AppState<State>,
        flows: Vec<Box<dyn GraphicsFlow<State>>>,
    ) {
        let size = app_state.ctx.window.inner_size();
        app_state.resize(size.width, size.height);

        self.graphics_flows = flows;
        self.graphics_flows.iter_mut().for_each(|flow| {
            let out = flow.on_init(&mut app_state.ctx, &mut app_state.state);
            handle_flow_output(event_loop, &mut app_state.state, &mut app_state.ctx, out);
        });
        log::info!("{} flow(s) initialized", self.graphics_flows.len());

        app_state.ctx.window.request_redraw();
        self.last_time = Instant::now();
        self.state = Some(app_state);
    }
}

pub(crate) enum FlowEvent<State: 'static> {
    #[allow(dead_code)]
    Initialized {
        state: AppState<State>,
        flows: Vec<Box<dyn GraphicsFlow<State>>>,
    },
    #[allow(dead_code)]
    Failed(anyhow::Error),
}

impl<State> Debug for FlowEvent<State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized { state: _, flows } => {
                f.debug_struct("Initialized").field("flows", flows).finish()
            }
            Self::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
        }
    }
}

impl<State: 'static + Default> ApplicationHandler<FlowEvent<State>> for App<State> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Already initialized (or initializing) on an earlier resume.
        let Some(constructors) = self.constructors.take() else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes()
            .with_title(config::WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config::WINDOW_SIZE[0],
                config::WINDOW_SIZE[1],
            ));

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, anyhow::Error::new(e).context("Cannot create the window"));
                return;
            }
        };

        let init_future = async move {
            let app_state = AppState::new(window).await?;

            let flow_futures: Vec<_> = constructors
                .into_iter()
                // Device and queue are reference counted, so this only clones handles
                .map(|constructor| constructor((&app_state.ctx).into()))
                .collect();
            let flows = futures::future::join_all(flow_futures)
                .await
                .into_iter()
                .collect::<anyhow::Result<Vec<_>>>()?;
            Ok::<_, anyhow::Error>((app_state, flows))
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(init_future) {
                Ok((app_state, flows)) => self.start(event_loop, app_state, flows),
                Err(e) => self.fail(event_loop, e.context("App initialization failed")),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match init_future.await {
                    Ok((state, flows)) => FlowEvent::Initialized { state, flows },
                    Err(e) => FlowEvent::Failed(e.context("App initialization failed")),
                };
                assert!(proxy.send_event(event).is_ok());
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent<State>) {
        match event {
            // This is the message from our wasm `spawn_local`
            FlowEvent::Initialized { state, flows } => self.start(event_loop, state, flows),
            FlowEvent::Failed(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        // No more updates once a flow or the window asked to exit.
        if event_loop.exiting() {
            return;
        }

        // Flows see a resize after the surface already has the new size.
        if let WindowEvent::Resized(size) = event {
            resize(event_loop, state, &mut self.graphics_flows, size);
            return;
        }

        dispatch_window_event(event_loop, state, &mut self.graphics_flows, &event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                state.ctx.fps.tick();
                self.graphics_flows.iter_mut().for_each(|f| {
                    let out = f.on_update(&state.ctx, &mut state.state, dt);
                    handle_flow_output(event_loop, &mut state.state, &mut state.ctx, out);
                });
                state.ctx.camera.update(&state.ctx.queue, &state.ctx.projection);

                match state.render(&self.graphics_flows) {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        resize(event_loop, state, &mut self.graphics_flows, size);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
                // invoke main render loop
                state.ctx.window.request_redraw();
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut state) = self.state.take() {
            self.graphics_flows.drain(..).for_each(|flow| {
                flow.on_dispose(&state.ctx, &mut state.state);
            });
            log::info!("All flows disposed");
        }
    }
}

/// Reconfigure the surface for `size` and tell every flow about it.
fn resize<State>(
    event_loop: &ActiveEventLoop,
    state: &mut AppState<State>,
    flows: &mut [Box<dyn GraphicsFlow<State>>],
    size: PhysicalSize<u32>,
) {
    state.resize(size.width, size.height);
    dispatch_window_event(event_loop, state, flows, &WindowEvent::Resized(size));
}

fn dispatch_window_event<State>(
    event_loop: &ActiveEventLoop,
    state: &mut AppState<State>,
    flows: &mut [Box<dyn GraphicsFlow<State>>],
    event: &WindowEvent,
) {
    flows.iter_mut().for_each(|f| {
        let out = f.on_window_events(&state.ctx, &mut state.state, event);
        handle_flow_output(event_loop, &mut state.state, &mut state.ctx, out);
    });
}

fn handle_flow_output<State>(
    event_loop: &ActiveEventLoop,
    state: &mut State,
    ctx: &mut Context,
    out: Out<State>,
) {
    match out {
        Out::Configure(f) => f(ctx),
        Out::Mut(f) => f(state),
        Out::Exit => event_loop.exit(),
        Out::Empty => (),
    }
}

/// Open the window and run `constructors` until the window is closed or a flow exits.
///
/// Returns the first error that kept the application from starting.
pub fn run<State: 'static + Default>(constructors: Vec<FlowConstructor<State>>) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Could not initialize logger: {e}").into());
        }
    }

    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop: EventLoop<FlowEvent<State>> = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        winit::event_loop::EventLoop::with_user_event()
            .with_any_thread(true)
            .build()?
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop: EventLoop<FlowEvent<State>> = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        winit::event_loop::EventLoop::with_user_event()
            .with_any_thread(true)
            .build()?
    };

    #[cfg(any(
        not(feature = "integration-tests"),
        not(any(target_os = "linux", target_os = "windows"))
    ))]
    let event_loop: EventLoop<FlowEvent<State>> = EventLoop::with_user_event().build()?;

    let mut app: App<State> = App::new(&event_loop, constructors)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

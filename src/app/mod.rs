mod demo;
mod input;
mod timing;
mod window;

pub use timing::{Clock, FrameTiming, ManualClock, SystemClock};
pub use window::{Window, WindowId};

use crate::config::{ConfigError, ViewerConfig};
use crate::gui::{Key, KeyEventKind, ModelDescription, TickEvent};
use crate::interaction::Controls;
use crate::render::Scene;
use demo::DemoEntities;
use input::PointerState;

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowAttributes;

/// Target interval between run-loop iterations.
pub const RUNLOOP_DELAY_SECS: f64 = 0.010;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Window creation failed: {0}")]
    CreateWindow(#[from] winit::error::OsError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Continue,
    Done,
}

type PostedFn = Box<dyn FnOnce(&mut Application) + Send>;

struct Posted {
    window: Option<WindowId>,
    f: PostedFn,
}

#[derive(Default)]
struct Shared {
    queue: Mutex<Vec<Posted>>,
    waker: OnceLock<Box<dyn Fn() + Send + Sync>>,
}

fn lock_queue(queue: &Mutex<Vec<Posted>>) -> MutexGuard<'_, Vec<Posted>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cloneable handle for running code on the main thread from anywhere.
#[derive(Clone)]
pub struct Poster {
    shared: Arc<Shared>,
}

impl Poster {
    /// Queues `f` for the next run-loop iteration. When `window` is given,
    /// that window is redrawn afterwards.
    pub fn post<F>(&self, window: Option<WindowId>, f: F)
    where
        F: FnOnce(&mut Application) + Send + 'static,
    {
        lock_queue(&self.shared.queue).push(Posted {
            window,
            f: Box::new(f),
        });
        if let Some(wake) = self.shared.waker.get() {
            wake();
        }
    }
}

struct Task {
    handle: Option<JoinHandle<()>>,
}

impl Task {
    fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .map_or(true, |handle| handle.is_finished())
    }

    fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Background task panicked");
            }
        }
    }
}

/// The run-loop context: windows, background tasks and the main-thread
/// queue. One per process, created and torn down explicitly.
pub struct Application {
    clock: Rc<dyn Clock>,
    windows: BTreeMap<WindowId, Window>,
    windows_to_destroy: Vec<Window>,
    next_window_id: u64,
    tasks: Vec<Task>,
    shared: Arc<Shared>,
    last_tick: f64,
    should_quit: bool,
}

impl Application {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        let last_tick = clock.now();
        Self {
            clock,
            windows: BTreeMap::new(),
            windows_to_destroy: Vec::new(),
            next_window_id: 1,
            tasks: Vec::new(),
            shared: Arc::new(Shared::default()),
            last_tick,
            should_quit: false,
        }
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn clock(&self) -> Rc<dyn Clock> {
        Rc::clone(&self.clock)
    }

    pub fn add_window(&mut self, title: &str, width: u32, height: u32, scene: Box<dyn Scene>) -> WindowId {
        let id = WindowId(self.next_window_id);
        self.next_window_id += 1;
        let widget = crate::gui::SceneWidget::new(scene, Rc::clone(&self.clock));
        self.windows
            .insert(id, Window::new(id, title.to_string(), width, height, widget));
        log::info!("Opened window {:?} \"{}\" ({}x{})", id, title, width, height);
        id
    }

    /// Destruction is deferred to the end of the current iteration. Removing
    /// the last window ends the run-loop.
    pub fn remove_window(&mut self, id: WindowId) {
        if let Some(window) = self.windows.remove(&id) {
            self.windows_to_destroy.push(window);
        }
        if self.windows.is_empty() {
            self.should_quit = true;
        }
    }

    pub fn quit(&mut self) {
        let ids: Vec<WindowId> = self.windows.keys().copied().collect();
        for id in ids {
            self.remove_window(id);
        }
        self.should_quit = true;
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(&id)
    }

    pub fn window_ids(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    pub fn poster(&self) -> Poster {
        Poster {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn post_to_main_thread<F>(&self, window: Option<WindowId>, f: F)
    where
        F: FnOnce(&mut Application) + Send + 'static,
    {
        self.poster().post(window, f);
    }

    /// Installs the function that wakes the native event loop after a post.
    /// Only the first call has an effect.
    pub fn set_waker<F>(&self, wake: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        if self.shared.waker.set(Box::new(wake)).is_err() {
            log::warn!("Run-loop waker already installed");
        }
    }

    /// Runs `f` on a new thread. There is no cancellation; unfinished tasks
    /// are joined on shutdown.
    pub fn run_in_thread<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.tasks.push(Task {
            handle: Some(std::thread::spawn(f)),
        });
    }

    pub fn running_task_count(&self) -> usize {
        self.tasks.len()
    }

    /// One run-loop iteration, minus native event handling.
    pub fn process_queued_events(&mut self) -> RunStatus {
        let now = self.clock.now();
        let dt = now - self.last_tick;
        if dt >= 0.95 * RUNLOOP_DELAY_SECS {
            let tick = TickEvent { dt };
            for window in self.windows.values_mut() {
                if window.on_tick(&tick) {
                    window.post_redraw();
                }
            }
            self.last_tick = now;
        }

        // Swap under the lock so callbacks are free to post again.
        let posted = std::mem::take(&mut *lock_queue(&self.shared.queue));
        for Posted { window, f } in posted {
            f(self);
            if let Some(id) = window {
                if let Some(window) = self.windows.get_mut(&id) {
                    window.post_redraw();
                }
            }
        }

        let (finished, running): (Vec<Task>, Vec<Task>) =
            std::mem::take(&mut self.tasks)
                .into_iter()
                .partition(Task::is_finished);
        self.tasks = running;
        for task in finished {
            task.join();
        }

        for window in self.windows_to_destroy.drain(..) {
            log::debug!("Destroyed window {:?}", window.id());
        }

        if self.should_quit {
            RunStatus::Done
        } else {
            RunStatus::Continue
        }
    }

    /// Closes every window and waits for background tasks.
    pub fn shutdown(&mut self) {
        self.quit();
        for task in self.tasks.drain(..) {
            task.join();
        }
        self.windows_to_destroy.clear();
        lock_queue(&self.shared.queue).clear();
    }
}

#[derive(Debug, Clone, Copy)]
enum UserEvent {
    Wake,
}

struct NativeWindow {
    id: WindowId,
    window: Arc<winit::window::Window>,
    pointer: PointerState,
    timing: FrameTiming,
}

struct ViewerApp {
    app: Application,
    config: ViewerConfig,
    native: HashMap<winit::window::WindowId, NativeWindow>,
    error: Option<AppError>,
}

impl ViewerApp {
    fn new(app: Application, config: ViewerConfig) -> Self {
        Self {
            app,
            config,
            native: HashMap::new(),
            error: None,
        }
    }

    fn open_viewer_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height))
            .with_resizable(true);
        let native = Arc::new(event_loop.create_window(attrs)?);
        let size = native.inner_size();

        let (scene, demo) = demo::build_demo_scene();
        let id = self
            .app
            .add_window(&self.config.title, size.width, size.height, Box::new(scene));
        if let Some(window) = self.app.window_mut(id) {
            configure_scene_widget(window, &self.config, demo);
        }
        self.spawn_model_loader(id, demo);

        let timing = FrameTiming::new(self.config.title.clone(), self.app.now());
        self.native.insert(
            native.id(),
            NativeWindow {
                id,
                window: native,
                pointer: PointerState::default(),
                timing,
            },
        );
        Ok(())
    }

    /// Builds the point cloud off the main thread and hands the result back
    /// through the poster.
    fn spawn_model_loader(&mut self, id: WindowId, demo: DemoEntities) {
        let poster = self.app.poster();
        let count = self.config.point_count;
        let field_of_view = self.config.field_of_view;
        self.app.run_in_thread(move || {
            let points = demo::helix_points(count);
            let fast = demo::decimate(&points);
            let bounds = demo::bounds_of(&points);
            log::info!(
                "Generated {} points ({} in fast cloud)",
                points.len(),
                fast.len()
            );
            poster.post(Some(id), move |app| {
                let Some(window) = app.window_mut(id) else {
                    return;
                };
                let widget = window.scene_widget_mut();
                widget.set_model(ModelDescription {
                    axes: Some(demo.axes),
                    point_clouds: vec![demo.cloud],
                    meshes: Vec::new(),
                    fast_point_clouds: vec![demo.fast_cloud],
                });
                widget.setup_camera(field_of_view, bounds, bounds.center());
            });
        });
    }

    fn handle_window_event(&mut self, winit_id: winit::window::WindowId, event: WindowEvent) {
        let Some(native) = self.native.get_mut(&winit_id) else {
            return;
        };
        let id = native.id;

        if let WindowEvent::CloseRequested = event {
            self.app.remove_window(id);
            self.native.remove(&winit_id);
            return;
        }

        let Some(window) = self.app.window_mut(id) else {
            return;
        };
        match event {
            WindowEvent::Resized(size) => window.on_resize(size.width, size.height),
            WindowEvent::ModifiersChanged(modifiers) => {
                native.pointer.set_modifiers(modifiers.state());
            }
            WindowEvent::CursorMoved { position, .. } => {
                let e = native.pointer.cursor_moved(position.x, position.y);
                window.on_mouse(&e);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = input::map_mouse_button(button) {
                    let e = native.pointer.button(button, state);
                    window.on_mouse(&e);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let e = native.pointer.wheel(delta);
                window.on_mouse(&e);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let Some(e) = input::map_key_event(event.physical_key, event.state) else {
                    return;
                };
                match (e.kind, e.key) {
                    (KeyEventKind::Down, Key::Escape) => {
                        self.app.quit();
                    }
                    (KeyEventKind::Down, Key::Char(c @ '1'..='5')) => {
                        let index = c as usize - '1' as usize;
                        let mode = Controls::ALL[index];
                        log::info!("View controls: {:?}", mode);
                        window.scene_widget_mut().set_view_controls(mode);
                    }
                    _ => {
                        window.on_key(&e);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if window.draw() {
                    if let Some(title) = native.timing.frame(self.app.clock.now()) {
                        native.window.set_title(&title);
                    }
                }
            }
            _ => {}
        }
    }
}

fn configure_scene_widget(window: &mut Window, config: &ViewerConfig, demo: DemoEntities) {
    let widget = window.scene_widget_mut();
    widget.set_background_color(config.background_color);
    widget.set_skybox_handle(demo.skybox, false);
    widget.select_directional_light(demo.sun, |dir| {
        log::debug!("Sun direction: ({:.3}, {:.3}, {:.3})", dir.x, dir.y, dir.z);
    });
    widget.setup_camera(
        config.field_of_view,
        config.initial_bounds,
        config.initial_bounds.center(),
    );
    widget.set_view_controls(config.controls);
}

impl ApplicationHandler<UserEvent> for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.native.is_empty() {
            return;
        }
        if let Err(err) = self.open_viewer_window(event_loop) {
            log::error!("{}", err);
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            // Posted work runs in about_to_wait.
            UserEvent::Wake => {}
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        self.handle_window_event(window_id, event);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let status = self.app.process_queued_events();

        self.native.retain(|_, native| self.app.window(native.id).is_some());
        for native in self.native.values() {
            if self
                .app
                .window(native.id)
                .is_some_and(|window| window.needs_redraw())
            {
                native.window.request_redraw();
            }
        }

        if status == RunStatus::Done {
            event_loop.exit();
            return;
        }
        let next = Instant::now() + Duration::from_secs_f64(RUNLOOP_DELAY_SECS);
        event_loop.set_control_flow(ControlFlow::WaitUntil(next));
    }
}

pub fn run(config: ViewerConfig) -> Result<(), AppError> {
    log::info!("sceneview");
    log::info!("   Drag to orbit, 1-5 switch controls, ESC quits");

    let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let app = Application::new(Rc::new(SystemClock::new()));
    let proxy = Mutex::new(event_loop.create_proxy());
    app.set_waker(move || {
        if let Ok(proxy) = proxy.lock() {
            // Fails only once the loop has exited; nothing left to wake.
            let _ = proxy.send_event(UserEvent::Wake);
        }
    });

    let mut viewer = ViewerApp::new(app, config);
    let result = event_loop.run_app(&mut viewer);
    viewer.app.shutdown();
    result?;

    log::info!("Goodbye!");
    match viewer.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

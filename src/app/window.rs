use crate::gui::{DrawResult, EventResult, KeyEvent, MouseEvent, Rect, SceneWidget, TickEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub(crate) u64);

/// A top-level window holding one scene view that fills it.
pub struct Window {
    id: WindowId,
    title: String,
    width: u32,
    height: u32,
    scene_widget: SceneWidget,
    needs_redraw: bool,
}

impl Window {
    pub(crate) fn new(id: WindowId, title: String, width: u32, height: u32, scene_widget: SceneWidget) -> Self {
        let mut window = Self {
            id,
            title,
            width,
            height,
            scene_widget,
            needs_redraw: true,
        };
        window.on_resize(width, height);
        window
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn scene_widget(&self) -> &SceneWidget {
        &self.scene_widget
    }

    pub fn scene_widget_mut(&mut self) -> &mut SceneWidget {
        &mut self.scene_widget
    }

    pub fn post_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.scene_widget
            .set_frame(Rect::new(0, 0, width as i32, height as i32));
        self.post_redraw();
    }

    pub fn on_mouse(&mut self, e: &MouseEvent) -> EventResult {
        let result = self.scene_widget.mouse(e);
        if result == EventResult::Consumed {
            self.post_redraw();
        }
        result
    }

    pub fn on_key(&mut self, e: &KeyEvent) -> EventResult {
        let result = self.scene_widget.key(e);
        if result == EventResult::Consumed {
            self.post_redraw();
        }
        result
    }

    /// Returns true when the window should be redrawn.
    pub fn on_tick(&mut self, e: &TickEvent) -> bool {
        self.scene_widget.tick(e) == DrawResult::Redraw
    }

    /// Lays out the pending frame and clears the redraw flag. Returns false
    /// when nothing was pending.
    pub fn draw(&mut self) -> bool {
        if !self.needs_redraw {
            return false;
        }
        self.needs_redraw = false;
        self.scene_widget.draw(self.height as i32);
        true
    }
}

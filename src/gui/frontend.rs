use std::time::{Duration, Instant};

use eframe::egui::{self, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};
use log::{info, warn};

use crate::graph_utils::geometry::{Point, Scale, Stage};
use crate::graph_utils::graph::{ElementId, GraphState, Node};
use crate::graph_utils::reducer::{Action, Reducer};
use crate::gui::prompt::{PromptOutcome, TextPrompt};
use crate::interaction::debounce::Debouncer;
use crate::interaction::drag::DragMachine;
use crate::interaction::shortcuts::{Shortcut, shortcut_for};
use crate::persistence::persist;
use crate::persistence::settings::AppSettings;
use crate::persistence::store::KeyValueStore;

// Stage used until the canvas has been measured once
const DEFAULT_STAGE: Stage = Stage::new(500.0, 500.0);
// How close (in screen px) a click must land to an edge to pick it
const EDGE_PICK_DISTANCE: f32 = 6.0;
const ARROW_LENGTH: f32 = 10.0;
const ARROW_HALF_WIDTH: f32 = 5.0;
const INFO_TOAST: Duration = Duration::from_secs(3);

const NODE_FILL: Color32 = Color32::from_rgb(70, 130, 180);
const NODE_SELECTED: Color32 = Color32::from_rgb(255, 165, 0);
const EDGE_COLOR: Color32 = Color32::from_gray(150);
const PREVIEW_FILL: Color32 = Color32::from_rgba_premultiplied(70, 130, 180, 120);

pub struct GraphApp {
    state: GraphState,
    reducer: Reducer,
    drag: DragMachine,
    store: Box<dyn KeyValueStore>,
    settings: AppSettings,
    // Current placement region, in logical units
    stage: Option<Stage>,
    // Last measured canvas size in screen px
    measured: Option<Vec2>,
    resize: Debouncer,
    // Fill the empty document with a sample once the stage is known
    pending_sample: bool,
    prompt: Option<(ElementId, TextPrompt)>,
    last_pointer: Option<Pos2>,
    last_info: Option<String>,
    last_info_time: Option<Instant>,
    save_error: Option<String>,
}

impl GraphApp {
    pub fn new(settings: AppSettings, store: Box<dyn KeyValueStore>, loaded: Option<GraphState>) -> Self {
        let pending_sample = loaded.is_none();
        if pending_sample {
            info!("no saved graph found, starting with a sample");
        }
        Self {
            state: loaded.unwrap_or_default(),
            reducer: Reducer::new(),
            drag: DragMachine::new(settings.scale()),
            store,
            resize: Debouncer::new(settings.resize_debounce()),
            settings,
            stage: None,
            measured: None,
            pending_sample,
            prompt: None,
            last_pointer: None,
            last_info: None,
            last_info_time: None,
            save_error: None,
        }
    }

    fn stage(&self) -> Stage {
        self.stage.unwrap_or(DEFAULT_STAGE)
    }

    fn scale(&self) -> Scale {
        self.settings.scale()
    }

    fn dispatch(&mut self, action: Action) {
        let replaces_graph = matches!(action, Action::Load(_) | Action::Clear | Action::Randomize { .. });
        self.state = self.reducer.reduce(&self.state, action);
        if replaces_graph {
            self.drag.cancel();
            self.prompt = None;
        }
        if let Some(id) = self.drag.dragged_id()
            && !self.state.has_node(id)
        {
            self.drag.cancel();
        }
    }

    fn notify(&mut self, msg: impl Into<String>) {
        self.last_info = Some(msg.into());
        self.last_info_time = Some(Instant::now());
    }

    fn add_node(&mut self) {
        self.dispatch(Action::AddNode { stage: self.stage() });
    }

    fn randomize(&mut self) {
        self.dispatch(Action::Randomize { stage: self.stage() });
    }

    fn save_now(&mut self) {
        match persist::save(self.store.as_mut(), &self.state) {
            Ok(()) => {
                self.save_error = None;
                self.notify("Saved");
            }
            Err(e) => {
                warn!("save failed: {}", e);
                self.save_error = Some(format!("Save failed: {}", e));
            }
        }
    }

    fn load_saved(&mut self) {
        match persist::load(self.store.as_ref()) {
            Some(state) => {
                self.dispatch(Action::Load(state));
                self.save_error = None;
                self.notify("Loaded saved graph");
            }
            None => self.notify("Nothing saved yet"),
        }
    }

    fn apply_stage(&mut self, size: Vec2) {
        let scale = self.scale();
        let stage = Stage::new(size.x as f64 / scale.x, size.y as f64 / scale.y);
        self.stage = Some(stage);
        if self.pending_sample {
            self.pending_sample = false;
            self.randomize();
        }
    }

    // First measurement applies at once; later size changes go through the debounce.
    fn track_canvas_size(&mut self, ctx: &egui::Context, size: Vec2) {
        let now = Instant::now();
        if self.measured != Some(size) {
            self.measured = Some(size);
            if self.stage.is_none() {
                self.apply_stage(size);
            } else {
                self.resize.trigger(now);
            }
        }
        if self.resize.poll(now)
            && let Some(size) = self.measured
        {
            self.apply_stage(size);
        }
        if let Some(wait) = self.resize.remaining(now) {
            ctx.request_repaint_after(wait);
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if self.prompt.is_some() || ctx.wants_keyboard_input() {
            return;
        }
        let pressed: Vec<(egui::Key, egui::Modifiers)> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Key { key, pressed: true, modifiers, .. } => Some((*key, *modifiers)),
                    _ => None,
                })
                .collect()
        });
        for (key, modifiers) in pressed {
            let Some(shortcut) = shortcut_for(key, modifiers) else { continue };
            ctx.input_mut(|i| i.consume_key(modifiers, key));
            match shortcut {
                Shortcut::AddNode => self.add_node(),
                Shortcut::RemoveSelected => self.dispatch(Action::RemoveSelected),
                Shortcut::Deselect => self.dispatch(Action::Deselect),
                Shortcut::Save => self.save_now(),
            }
        }
    }

    fn show_prompt(&mut self, ctx: &egui::Context) {
        let Some((id, prompt)) = self.prompt.as_mut() else { return };
        let id = *id;
        match prompt.show(ctx) {
            PromptOutcome::Pending => {}
            PromptOutcome::Cancelled => self.prompt = None,
            PromptOutcome::Submitted(text) => {
                self.prompt = None;
                if let Some(node) = self.state.node(id) {
                    let updated = node.with_text(text);
                    self.dispatch(Action::UpdateNode(updated));
                }
            }
        }
    }

    // The canvas stays inert while a label is being edited.
    fn open_prompt(&mut self, id: ElementId) {
        if self.prompt.is_some() {
            return;
        }
        if let Some(node) = self.state.node(id) {
            self.prompt = Some((id, TextPrompt::new("Node label", node.text.clone())));
        }
    }

    // Ctrl/Cmd-click links the selection to `id`, a plain click selects it.
    fn click_node(&mut self, id: ElementId, command: bool) {
        if self.prompt.is_some() {
            return;
        }
        if command {
            self.dispatch(Action::AddEdge { start: self.state.selected_id, end: id });
        } else {
            self.dispatch(Action::Select(id));
        }
    }

    fn control_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("control_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Add").on_hover_text("A").clicked() {
                    self.add_node();
                }
                if ui
                    .add_enabled(self.state.can_remove(), egui::Button::new("Remove"))
                    .on_hover_text("Backspace")
                    .clicked()
                {
                    self.dispatch(Action::RemoveSelected);
                }
                if ui.button("Clear").clicked() {
                    self.dispatch(Action::Clear);
                }
                if ui.button("Randomize").clicked() {
                    self.randomize();
                }
                ui.separator();
                let save_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
                if ui
                    .add(egui::Button::new("Save").shortcut_text(ctx.format_shortcut(&save_shortcut)))
                    .clicked()
                {
                    self.save_now();
                }
                if ui.button("Load").clicked() {
                    self.load_saved();
                }
                ui.separator();
                ui.label(format!("{} nodes, {} edges", self.state.nodes.len(), self.state.edges.len()));
                if let Some(err) = &self.save_error {
                    ui.colored_label(Color32::RED, err);
                } else if let (Some(msg), Some(t)) = (&self.last_info, self.last_info_time)
                    && t.elapsed() < INFO_TOAST
                {
                    ui.label(msg);
                }
            });
        });
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let available = ui.available_rect_before_wrap();
        self.track_canvas_size(ui.ctx(), available.size());

        let bg_resp = ui.allocate_rect(available, Sense::click());
        let painter = ui.painter_at(available);
        let origin = available.min;
        let scale = self.scale();
        let to_screen = move |x: f64, y: f64| -> Pos2 {
            let p = scale.to_visual(Point::new(x, y));
            origin + Vec2::new(p.x as f32, p.y as f32)
        };
        let radius = self.settings.node_radius;

        // Edges first so nodes cover their ends
        for edge in &self.state.edges {
            let (Some(a), Some(b)) = (self.state.node(edge.start), self.state.node(edge.end)) else {
                continue;
            };
            let (pa, pb) = (to_screen(a.x, a.y), to_screen(b.x, b.y));
            let color = if self.state.is_selected(edge.id) { NODE_SELECTED } else { EDGE_COLOR };
            painter.line_segment([pa, pb], Stroke::new(2.0, color));
            if let Some(arrow) = arrowhead(pa, pb, radius) {
                painter.add(egui::Shape::convex_polygon(arrow.to_vec(), color, Stroke::NONE));
            }
        }

        let (pointer, pressed, released, modifiers) = ui.input(|i| {
            (i.pointer.latest_pos(), i.pointer.primary_pressed(), i.pointer.primary_released(), i.modifiers)
        });

        let mut clicked: Option<ElementId> = None;
        let mut double_clicked: Option<ElementId> = None;
        let mut grabbed: Option<Node> = None;
        let dragged = self.drag.dragged_id();
        let interactive = self.prompt.is_none();
        for node in &self.state.nodes {
            let center = to_screen(node.x, node.y);
            let rect = Rect::from_center_size(center, Vec2::splat(radius * 2.0));
            let resp = ui.allocate_rect(rect, Sense::click());
            if interactive && pressed && resp.hovered() {
                // Later nodes are drawn on top, so the last hit wins
                grabbed = Some(node.clone());
            }
            if resp.double_clicked() {
                double_clicked = Some(node.id);
            } else if resp.clicked() {
                clicked = Some(node.id);
            }

            let fill = if self.state.is_selected(node.id) { NODE_SELECTED } else { NODE_FILL };
            let faded = dragged == Some(node.id) && self.drag.preview().is_some();
            let fill = if faded { fill.gamma_multiply(0.4) } else { fill };
            painter.circle_filled(center, radius, fill);
            painter.text(center, egui::Align2::CENTER_CENTER, &node.text, FontId::proportional(13.0), Color32::WHITE);
        }

        // Press/move/release are read from the whole window once a drag is under way.
        if let (Some(node), Some(at)) = (grabbed, pointer) {
            self.drag.pointer_down(&node, to_point(at));
        }
        if self.drag.is_dragging() {
            if let Some(at) = pointer
                && self.last_pointer != Some(at)
            {
                self.drag.pointer_move(to_point(at));
            }
            if released {
                let at = pointer.or(self.last_pointer).unwrap_or(origin);
                if let Some(committed) = self.drag.pointer_up(to_point(at)) {
                    self.dispatch(Action::UpdateNode(committed));
                }
            }
            ui.ctx().request_repaint();
        }
        self.last_pointer = pointer;

        if let Some(preview) = self.drag.preview() {
            let center = to_screen(preview.x, preview.y);
            painter.circle_filled(center, radius, PREVIEW_FILL);
            painter.circle_stroke(center, radius, Stroke::new(1.5, NODE_FILL));
            painter.text(center, egui::Align2::CENTER_CENTER, &preview.text, FontId::proportional(13.0), Color32::WHITE);
        }

        if let Some(id) = double_clicked {
            self.open_prompt(id);
        } else if let Some(id) = clicked {
            self.click_node(id, modifiers.ctrl || modifiers.command || modifiers.mac_cmd);
        } else if interactive && bg_resp.clicked() {
            let hit = bg_resp.interact_pointer_pos().and_then(|p| self.edge_at(p, &to_screen));
            match hit {
                Some(edge) => self.dispatch(Action::Select(edge)),
                None => self.dispatch(Action::Deselect),
            }
        }
    }

    fn edge_at(&self, p: Pos2, to_screen: &dyn Fn(f64, f64) -> Pos2) -> Option<ElementId> {
        let mut best: Option<(ElementId, f32)> = None;
        for edge in &self.state.edges {
            let (Some(a), Some(b)) = (self.state.node(edge.start), self.state.node(edge.end)) else {
                continue;
            };
            let d = point_segment_distance(p, to_screen(a.x, a.y), to_screen(b.x, b.y));
            if d <= EDGE_PICK_DISTANCE && best.is_none_or(|(_, bd)| d < bd) {
                best = Some((edge.id, d));
            }
        }
        best.map(|(id, _)| id)
    }
}

impl eframe::App for GraphApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);
        self.control_panel(ctx);
        egui::CentralPanel::default().show(ctx, |ui| self.canvas(ui));
        self.show_prompt(ctx);
        if self.last_info_time.is_some_and(|t| t.elapsed() < INFO_TOAST) {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

fn to_point(p: Pos2) -> Point {
    Point::new(p.x as f64, p.y as f64)
}

// Geometry helper: distance from point P to segment AB in screen space
fn point_segment_distance(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ap = p - a;
    let ab = b - a;
    let ab_len2 = ab.length_sq();
    if ab_len2 <= f32::EPSILON {
        return ap.length();
    }
    let t = (ap.dot(ab) / ab_len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

// Triangle pointing at `to`, with its tip on the rim of the target circle.
fn arrowhead(from: Pos2, to: Pos2, radius: f32) -> Option<[Pos2; 3]> {
    let d = to - from;
    if d.length() <= radius + ARROW_LENGTH {
        return None;
    }
    let dir = d.normalized();
    let tip = to - dir * radius;
    let base = tip - dir * ARROW_LENGTH;
    let side = Vec2::new(-dir.y, dir.x) * ARROW_HALF_WIDTH;
    Some([tip, base + side, base - side])
}

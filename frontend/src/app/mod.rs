mod ui;

use std::time::Duration;

use egui::{Align2, FontId, Painter, Pos2, Rect, Stroke};
use gridsearch::{Grid, Heuristic, Phase, Point, SearchConfig, SearchEngine, VisitState};
use log::{debug, info};

use crate::event::ButtonId;

use self::ui::{camera::Camera, palette};

/// Largest grid side that can be requested from the side panel
const MAX_GRID_SIZE: usize = 256;

/// Cells smaller than this many pixels do not get distance labels
const MIN_LABEL_SCALE: f64 = 24.0;

/// We derive Deserialize/Serialize so we can persist the settings on shutdown.
/// The grid itself is never stored.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct Settings {
    pub columns: usize,
    pub rows: usize,
    pub config: SearchConfig,
    pub auto_step: bool,
    pub steps_per_frame: usize,
    pub draw_grid_lines: bool,
    pub draw_frontier: bool,
    pub draw_labels: bool,
    pub draw_path: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            columns: 42,
            rows: 17,
            config: SearchConfig::default(),
            auto_step: true,
            steps_per_frame: 1,
            draw_grid_lines: true,
            draw_frontier: true,
            draw_labels: true,
            draw_path: true,
        }
    }
}

pub struct App {
    settings: Settings,
    engine: SearchEngine,
    /// Created on the first frame, once the canvas size is known
    camera: Option<Camera>,
    output_cell: String,
}

impl App {
    /// Called once before the first frame. `seed` replaces the empty grid
    /// described by the settings.
    pub fn new(cc: &eframe::CreationContext<'_>, seed: Option<Grid>) -> Self {
        // Load previous settings (if any).
        // Note that you must enable the `persistence` feature for this to work.
        let settings: Settings = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Default::default()
        };

        Self::with_settings(settings, seed)
    }

    fn with_settings(mut settings: Settings, seed: Option<Grid>) -> Self {
        let engine = match seed {
            Some(grid) => {
                settings.columns = grid.width();
                settings.rows = grid.height();
                SearchEngine::from_grid(grid, settings.config)
            }
            None => SearchEngine::with_config(settings.columns, settings.rows, settings.config),
        };
        info!("created {}x{} grid", engine.width(), engine.height());

        Self {
            settings,
            engine,
            camera: None,
            output_cell: Default::default(),
        }
    }

    /// Replaces the grid with an empty one of the size in the settings
    fn new_grid(&mut self) {
        self.engine = SearchEngine::with_config(
            self.settings.columns,
            self.settings.rows,
            self.settings.config,
        );
        self.camera = None;
        debug!("new {}x{} grid", self.settings.columns, self.settings.rows);
    }

    fn press(&mut self, button: ButtonId) {
        let phase = button.apply(&mut self.engine);
        debug!("{} pressed, now {:?}", button.label(), phase);
    }

    fn status(&self) -> String {
        let phase = match self.engine.phase() {
            Phase::Editing => "Editing".to_string(),
            Phase::Running => "Running".to_string(),
            Phase::Completed => match self.engine.end().and_then(|p| self.engine.cell_at(p)) {
                Some(cell) => format!(
                    "Path found, distance {}",
                    cell.distance.unwrap_or_default()
                ),
                None => "Path found".to_string(),
            },
            Phase::Exhausted => "No path found".to_string(),
        };

        format!(
            "{}\nExpanded: {}\nFrontier: {}",
            phase,
            self.engine.expansions(),
            self.engine.frontier().len()
        )
    }

    fn side_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Grid Search");
        ui.label("Left drag: draw walls (shift erases)");
        ui.label("Right click: place start / end");
        ui.label("Middle drag: pan, scroll: zoom");
        ui.separator();

        ui.horizontal(|ui| {
            for button in ButtonId::iterate() {
                let enabled = button.is_enabled(&self.engine);
                if ui
                    .add_enabled(enabled, egui::Button::new(button.label()))
                    .on_hover_text(format!("Key: {:?}", button.key()))
                    .clicked()
                {
                    self.press(button);
                }
            }
        });

        ui.checkbox(&mut self.settings.auto_step, "Auto Step");
        ui.add(
            egui::Slider::new(&mut self.settings.steps_per_frame, 1..=64).text("steps per frame"),
        );

        let mut heuristic = self.settings.config.heuristic;
        ui.add_enabled_ui(!self.engine.is_running(), |ui| {
            egui::ComboBox::from_label("Heuristic")
                .selected_text(heuristic.to_string())
                .show_ui(ui, |ui| {
                    for h in Heuristic::iterate() {
                        ui.selectable_value(&mut heuristic, h, h.to_string());
                    }
                });
        });
        if heuristic != self.settings.config.heuristic {
            self.settings.config.heuristic = heuristic;
            self.engine.set_config(self.settings.config);
        }

        ui.separator();
        ui.label(self.status());

        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Columns");
            ui.add(
                egui::DragValue::new(&mut self.settings.columns).clamp_range(1..=MAX_GRID_SIZE),
            );
            ui.label("Rows");
            ui.add(egui::DragValue::new(&mut self.settings.rows).clamp_range(1..=MAX_GRID_SIZE));
        });
        ui.horizontal(|ui| {
            if ui.button("New grid").clicked() {
                self.new_grid();
            }
            if ui.button("Fit view").clicked() {
                self.camera = None;
            }
        });

        ui.separator();
        ui.checkbox(&mut self.settings.draw_grid_lines, "Draw grid lines");
        ui.checkbox(&mut self.settings.draw_frontier, "Draw frontier");
        ui.checkbox(&mut self.settings.draw_labels, "Draw distances");
        ui.checkbox(&mut self.settings.draw_path, "Draw path");

        ui.separator();
        ui.label(&self.output_cell);
    }

    /// Forwards pointer input over the canvas to the engine
    fn handle_pointer(&mut self, ui: &egui::Ui, response: &egui::Response, camera: &mut Camera) {
        let origin = response.rect.min;

        let hovered = response.hover_pos().and_then(|pos| {
            camera.pixel_to_point(
                (pos - origin).to_pos2(),
                self.engine.width(),
                self.engine.height(),
            )
        });
        self.engine.set_hovered_cell(hovered);

        let (primary_down, primary_released, erase, scroll) = ui.input(|i| {
            (
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.modifiers.shift,
                i.smooth_scroll_delta.y,
            )
        });

        if primary_down && hovered.is_some() {
            match (erase, hovered) {
                (true, Some(point)) => self.engine.set_obstacle(point, false),
                _ => self.engine.on_click_left(true),
            }
        }
        if primary_released {
            self.engine.on_click_left(false);
        }
        if response.secondary_clicked() {
            self.engine.on_click_right();
        }

        if response.dragged_by(egui::PointerButton::Middle) {
            camera.pan_pixels(response.drag_delta());
        }
        if let Some(pos) = response.hover_pos() {
            if scroll != 0.0 {
                let factor = (1.0 + scroll as f64 / 200.0).max(0.1);
                camera.zoom_at((pos - origin).to_pos2(), factor);
            }
        }

        self.output_cell = match hovered.and_then(|p| self.engine.cell_at(p).map(|c| (p, c))) {
            Some((point, cell)) => format!("Cell {}\n{:#?}", point, cell),
            None => String::new(),
        };
    }

    fn paint(&self, painter: &Painter, camera: &Camera, origin: Pos2) {
        let engine = &self.engine;
        let to_screen = |p: Point| camera.cell_rect(p).translate(origin.to_vec2());
        let clip = painter.clip_rect();
        let labels = self.settings.draw_labels && camera.scale() >= MIN_LABEL_SCALE;

        for point in engine.grid().points() {
            let rect = to_screen(point);
            if !clip.intersects(rect) {
                continue;
            }
            let Some(cell) = engine.cell_at(point) else {
                continue;
            };

            let color = if !cell.passable {
                palette::BLOCKED
            } else if engine.start() == Some(point) {
                palette::START
            } else if engine.end() == Some(point) {
                palette::END
            } else if cell.visit_state == VisitState::Visited {
                palette::VISITED
            } else {
                palette::EMPTY
            };
            painter.rect_filled(rect, 0.0, color);

            if self.settings.draw_grid_lines {
                painter.rect_stroke(rect, 0.0, Stroke::new(1.0, palette::GRID_LINE));
            }

            if labels && cell.visit_state == VisitState::Visited {
                self.paint_labels(painter, rect, cell.distance, cell.expansion_order);
            }
        }

        if self.settings.draw_frontier {
            let stroke = Stroke::new(3.0, palette::FRONTIER);
            for (point, _) in engine.frontier_snapshot() {
                painter.rect_stroke(to_screen(point).shrink(1.5), 0.0, stroke);
            }
        }

        if self.settings.draw_path {
            if let Some(path) = engine.path() {
                let stroke = Stroke::new((camera.scale() / 6.0).max(1.0) as f32, palette::PATH);
                for p in path.windows(2) {
                    painter.line_segment(
                        [to_screen(p[0]).center(), to_screen(p[1]).center()],
                        stroke,
                    );
                }
            }
        }

        if let Some(point) = engine.hovered_cell() {
            painter.rect_stroke(to_screen(point), 0.0, Stroke::new(3.0, palette::HOVER));
        }
    }

    fn paint_labels(
        &self,
        painter: &Painter,
        rect: Rect,
        distance: Option<usize>,
        expansion_order: Option<usize>,
    ) {
        let size = rect.height() / 3.0;
        if let Some(distance) = distance {
            painter.text(
                rect.center_top() + egui::vec2(0.0, size * 0.6),
                Align2::CENTER_CENTER,
                distance.to_string(),
                FontId::proportional(size),
                palette::DISTANCE_TEXT,
            );
        }
        if let Some(order) = expansion_order {
            painter.text(
                rect.left_bottom() + egui::vec2(size * 0.2, -size * 0.6),
                Align2::LEFT_CENTER,
                order.to_string(),
                FontId::proportional(size * 0.8),
                palette::ORDER_TEXT,
            );
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

        let mut camera = self.camera.take().unwrap_or_else(|| {
            Camera::fit(
                response.rect.size(),
                self.engine.width(),
                self.engine.height(),
            )
        });

        self.handle_pointer(ui, &response, &mut camera);
        self.paint(&painter, &camera, response.rect.min);

        self.camera = Some(camera);
    }
}

impl eframe::App for App {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let pressed: Vec<ButtonId> = ctx.input(|i| {
            ButtonId::iterate()
                .filter(|b| i.key_pressed(b.key()))
                .collect()
        });
        for button in pressed {
            self.press(button);
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            // The top panel is often a good place for a menu bar:

            egui::menu::bar(ui, |ui| {
                // NOTE: no File->Quit on web pages!
                let is_web = cfg!(target_arch = "wasm32");
                if !is_web {
                    ui.menu_button("File", |ui| {
                        if ui.button("Quit").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                    ui.add_space(16.0);
                }

                egui::widgets::global_dark_light_mode_buttons(ui);
            });
        });

        egui::SidePanel::left("side_panel").show(ctx, |ui| {
            self.side_panel(ui);

            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                egui::warn_if_debug_build(ui);
            });
        });

        if self.engine.is_running() && self.settings.auto_step {
            for _ in 0..self.settings.steps_per_frame {
                if self.engine.step_simulation() != Phase::Running {
                    break;
                }
            }
            ctx.request_repaint_after(Duration::from_millis(20));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas(ui);
        });
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_settings_defaults_fill_missing_fields() {
        let settings: Settings = serde_json::from_str(r#"{"columns": 10}"#).unwrap();
        assert_eq!(settings.columns, 10);
        assert_eq!(settings.rows, Settings::default().rows);
        assert_eq!(settings.config, SearchConfig::default());
    }

    #[test]
    fn test_seed_grid_overrides_size() {
        let grid: Grid = "S..\n.#E".parse().unwrap();
        let app = App::with_settings(Settings::default(), Some(grid));

        assert_eq!(app.settings.columns, 3);
        assert_eq!(app.settings.rows, 2);
        assert_eq!(app.engine.start(), Some(Point::new(0, 0)));
        assert_eq!(app.engine.end(), Some(Point::new(2, 1)));
    }

    #[test]
    fn test_new_grid_uses_settings() {
        let mut app = App::with_settings(Settings::default(), None);
        assert_eq!(app.engine.width(), 42);
        assert_eq!(app.engine.height(), 17);

        app.settings.columns = 5;
        app.settings.rows = 4;
        app.settings.config.heuristic = Heuristic::Manhattan;
        app.new_grid();

        assert_eq!(app.engine.width(), 5);
        assert_eq!(app.engine.height(), 4);
        assert_eq!(app.engine.config().heuristic, Heuristic::Manhattan);
    }

    #[test]
    fn test_status() {
        let grid: Grid = "S#E".parse().unwrap();
        let mut app = App::with_settings(Settings::default(), Some(grid));
        app.press(ButtonId::Start);
        app.press(ButtonId::Finish);

        assert!(app.status().starts_with("No path found"));

        let grid: Grid = "S.E".parse().unwrap();
        let mut app = App::with_settings(Settings::default(), Some(grid));
        app.press(ButtonId::Start);
        app.press(ButtonId::Finish);

        assert!(app.status().starts_with("Path found, distance 2"));
    }
}

//! Interactive cloth viewer.
//!
//! Draws the link list with an orthographic camera orbiting the origin and
//! rebuilds the cloth whenever the watched config file is modified.

use clothsim_core::{build_simulation_context, step_simulation, ClothConfig, SimulationContext};
use eframe::egui;
use glam::Vec3;
use notify::{Event, RecommendedWatcher, Watcher};
use std::f32::consts::PI;
use std::path::PathBuf;
use std::sync::mpsc;

pub fn run_viewer(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "clothsim",
        options,
        Box::new(|cc| Ok(Box::new(ViewerApp::new(config_path, cc)))),
    )?;
    Ok(())
}

pub struct ViewerApp {
    config_path: Option<PathBuf>,
    ctx_opt: Option<SimulationContext>,
    last_load_error: Option<String>,
    playing: bool,
    steps_per_frame: usize,
    yaw: f32,
    pitch: f32,
    #[allow(dead_code)] // Kept alive to maintain file watching
    file_watcher: Option<RecommendedWatcher>,
    file_receiver: mpsc::Receiver<notify::Result<Event>>,
}

impl ViewerApp {
    pub fn new(config_path: Option<PathBuf>, _cc: &eframe::CreationContext<'_>) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })
        .ok();

        if let (Some(w), Some(path)) = (watcher.as_mut(), config_path.as_ref()) {
            if let Err(e) = w.watch(path, notify::RecursiveMode::NonRecursive) {
                log::warn!("not watching {}: {}", path.display(), e);
            }
        }

        let mut app = Self {
            config_path,
            ctx_opt: None,
            last_load_error: None,
            playing: false,
            steps_per_frame: 1,
            yaw: 0.6,
            pitch: 0.4,
            file_watcher: watcher,
            file_receiver: rx,
        };
        app.reload_context();
        app
    }

    fn reload_context(&mut self) {
        let config = match &self.config_path {
            Some(path) => ClothConfig::load(path),
            None => Ok(ClothConfig::default()),
        };
        match config.and_then(|config| build_simulation_context(&config)) {
            Ok(ctx) => {
                self.ctx_opt = Some(ctx);
                self.last_load_error = None;
            }
            Err(e) => {
                log::error!("failed to load scene: {}", e);
                self.last_load_error = Some(e.to_string());
                self.ctx_opt = None;
                self.playing = false;
            }
        }
    }

    fn check_file_changes(&mut self) {
        let mut needs_reload = false;
        while let Ok(event) = self.file_receiver.try_recv() {
            match event {
                Ok(Event {
                    kind: notify::EventKind::Modify(_),
                    ..
                }) => needs_reload = true,
                Ok(_) => {}
                Err(e) => log::warn!("file watcher error: {}", e),
            }
        }
        if needs_reload {
            log::info!("config changed, rebuilding cloth");
            self.reload_context();
        }
    }

    fn step(&mut self) {
        let Some(ctx) = self.ctx_opt.as_mut() else {
            return;
        };
        match step_simulation(ctx) {
            Ok(finished) => {
                if finished {
                    self.playing = false;
                }
            }
            Err(e) => {
                self.last_load_error = Some(e.to_string());
                self.playing = false;
            }
        }
    }

    /// Orthographic projection after rotating by yaw (about Y) and pitch (about X)
    fn project(&self, p: Vec3, center: egui::Pos2, scale: f32) -> egui::Pos2 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        let x = p.x * cy - p.z * sy;
        let z = p.x * sy + p.z * cy;
        let y = p.y * cp - z * sp;
        center + egui::vec2(x * scale, -y * scale)
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_file_changes();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(if self.playing { "⏸ Pause" } else { "▶ Play" }).clicked() {
                    self.playing = !self.playing;
                }
                if ui.button("⏮ Reset").clicked() {
                    self.reload_context();
                    self.playing = false;
                }
                if ui.button("⏭ Step").clicked() {
                    self.step();
                }

                ui.separator();
                ui.label("Steps/frame:");
                ui.add(egui::Slider::new(&mut self.steps_per_frame, 1..=10));
                ui.label("Yaw:");
                ui.add(egui::Slider::new(&mut self.yaw, -PI..=PI));
                ui.label("Pitch:");
                ui.add(egui::Slider::new(&mut self.pitch, -1.5..=1.5));

                ui.separator();
                if let Some(ref sim) = self.ctx_opt {
                    ui.label(format!(
                        "Frame: {} / {}  strain: {:.4}",
                        sim.current_frame,
                        sim.max_frames,
                        sim.cloth.max_strain()
                    ));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.max_rect();
            let painter = ui.painter();
            let center = rect.center();
            // Scene spans roughly [-1, 1]
            let scale = rect.width().min(rect.height()) / 2.0 * 0.9;

            if let Some(ref sim) = self.ctx_opt {
                let sphere = sim.cloth.solver().sphere;
                painter.circle_stroke(
                    self.project(sphere.center, center, scale),
                    sphere.radius * scale,
                    egui::Stroke::new(1.5, egui::Color32::LIGHT_RED),
                );

                let positions = sim.cloth.positions();
                for link in sim.cloth.links() {
                    let a = self.project(positions[link.a], center, scale);
                    let b = self.project(positions[link.b], center, scale);
                    painter.line_segment([a, b], egui::Stroke::new(1.0, egui::Color32::LIGHT_BLUE));
                }
                for pin in sim.cloth.pins() {
                    let p = self.project(pin.anchor, center, scale);
                    painter.circle_filled(p, 3.0, egui::Color32::YELLOW);
                }
            }

            if let Some(ref error) = self.last_load_error {
                ui.vertical_centered(|ui| {
                    ui.add_space(rect.height() * 0.4);
                    ui.label(
                        egui::RichText::new(format!("Error: {}", error))
                            .color(egui::Color32::RED)
                            .size(16.0),
                    );
                });
            }
        });

        if self.playing {
            for _ in 0..self.steps_per_frame {
                self.step();
                if !self.playing {
                    break;
                }
            }
            ctx.request_repaint();
        }
    }
}

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use ledger_bubbles::chart::QuadtreeCell;
use ledger_bubbles::ledger::load_sources;
use ledger_bubbles::{BubbleChart, ChartConfig, LoadFilter, LoadReport};
use tracing::{error, info};

mod canvas;
mod render_utils;
mod ui;

#[derive(Clone, Debug)]
pub struct LoadRequest {
    pub sources: Vec<PathBuf>,
    pub filter: LoadFilter,
    pub config: ChartConfig,
    pub initial_mode: String,
}

pub struct BubbleChartApp {
    request: LoadRequest,
    state: AppState,
    reload_rx: Option<Receiver<Result<LoadReport, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<LoadReport, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    chart: BubbleChart,
    report: LoadReport,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    live_physics: bool,
    show_quadtree_overlay: bool,
    show_records: bool,
    quadtree_cells: Vec<QuadtreeCell>,
    record_rows_visible: usize,
}

struct SearchMatchCache {
    query: String,
    matches: Arc<HashSet<usize>>,
}

impl BubbleChartApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, request: LoadRequest) -> Self {
        let state = Self::start_load(&request);
        Self {
            request,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(request: &LoadRequest) -> Receiver<Result<LoadReport, String>> {
        let (tx, rx) = mpsc::channel();
        let sources = request.sources.clone();
        let filter = request.filter.clone();

        thread::spawn(move || {
            let result = load_sources(&sources, &filter).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(request: &LoadRequest) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(request),
        }
    }

    fn finish_load(&self, result: Result<LoadReport, String>) -> AppState {
        match result {
            Ok(report) => {
                info!(
                    accepted = report.records.len(),
                    rejected = report.rejected.len(),
                    filtered_out = report.filtered_out,
                    "ledger loaded"
                );
                AppState::Ready(Box::new(ViewModel::new(
                    report,
                    self.request.config.clone(),
                    &self.request.initial_mode,
                )))
            }
            Err(message) => {
                error!(%message, "ledger load failed");
                AppState::Error(message)
            }
        }
    }
}

impl eframe::App for BubbleChartApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(result),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading ledger records...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(message) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load ledger records");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
                if retry {
                    self.state = Self::start_load(&self.request);
                    return;
                }
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(&self.request));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = self.finish_load(result);
        }
    }
}

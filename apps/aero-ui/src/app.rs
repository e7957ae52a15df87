use std::path::{Path, PathBuf};
use std::sync::Arc;

use aero_app::{
    AppResult, ClientConfig, DisplayHandle, Orchestrator, RunOutcome, SessionState, SessionStore,
    StartPolicy, load_geometry,
};
use aero_client::HttpSimulationService;
use aero_geometry::NormalizedMesh;
use egui_file_dialog::{DialogMode, FileDialog};
use tokio::runtime::Runtime;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::scene::{SceneMesh, SceneView};
use crate::views::{ControlAction, ControlsView, StatusView};

/// A mesh parse in progress for one display handle.
struct GeometryTask {
    handle: DisplayHandle,
    join: JoinHandle<AppResult<NormalizedMesh>>,
}

/// A parsed mesh and the handle it was loaded from.
struct LoadedGeometry {
    handle: DisplayHandle,
    scene_mesh: SceneMesh,
}

pub struct AeroSprintApp {
    runtime: Runtime,
    store: SessionStore,
    state_rx: watch::Receiver<SessionState>,
    orchestrator: Option<Arc<Orchestrator<HttpSimulationService>>>,
    server_url: String,
    file_dialog: FileDialog,
    last_directory: Option<PathBuf>,
    run_task: Option<JoinHandle<AppResult<RunOutcome>>>,
    geometry_task: Option<GeometryTask>,
    geometry: Option<LoadedGeometry>,
    scene: SceneView,
    controls: ControlsView,
    status: StatusView,
    message: Option<String>,
}

impl AeroSprintApp {
    pub fn new(cc: &eframe::CreationContext<'_>, runtime: Runtime, config: ClientConfig) -> Self {
        let store = SessionStore::new(config.parameters);
        let mut message = None;

        let orchestrator = match config.connect() {
            Ok(service) => Some(Arc::new(Orchestrator::new(store.clone(), service))),
            Err(e) => {
                warn!(error = %e, "simulation service unavailable");
                message = Some(format!("Service setup failed: {}", e));
                None
            }
        };

        // Repaint whenever the session changes, so run progress shows up
        // without user input.
        let mut repaint_rx = store.subscribe();
        let ctx = cc.egui_ctx.clone();
        runtime.spawn(async move {
            while repaint_rx.changed().await.is_ok() {
                ctx.request_repaint();
            }
        });

        Self {
            state_rx: store.subscribe(),
            store,
            runtime,
            orchestrator,
            server_url: config.server_url,
            file_dialog: FileDialog::new(),
            last_directory: None,
            run_task: None,
            geometry_task: None,
            geometry: None,
            scene: SceneView::default(),
            controls: ControlsView,
            status: StatusView::default(),
            message,
        }
    }

    fn open_file(&mut self, path: &Path, ctx: &egui::Context) {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.message = Some(format!("Failed to read {}: {}", path.display(), e));
                return;
            }
        };
        if let Some(parent) = path.parent() {
            self.last_directory = Some(parent.to_path_buf());
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mesh.stl".to_string());

        info!(file = %name, bytes = bytes.len(), "input selected");
        let handle = self.store.select_input(name, bytes);
        self.message = None;

        // Any parse still running belongs to the released handle; its
        // result is discarded when it lands.
        let task_handle = handle.clone();
        let ctx = ctx.clone();
        let join = self.runtime.spawn(async move {
            let loaded = load_geometry(&task_handle).await;
            ctx.request_repaint();
            loaded
        });
        self.geometry_task = Some(GeometryTask { handle, join });
    }

    fn start_run(&mut self, policy: StartPolicy) {
        let Some(orchestrator) = &self.orchestrator else {
            return;
        };
        let task = orchestrator.spawn(self.runtime.handle(), policy);
        // A superseded run keeps going in the background; only the newest
        // task is awaited for its outcome.
        self.run_task = Some(task);
    }

    fn apply(&mut self, action: ControlAction, ctx: &egui::Context) {
        match action {
            ControlAction::OpenFile => {
                let initial_dir = self.last_directory.as_ref().and_then(|p| p.to_str());
                let _ = self
                    .file_dialog
                    .open(DialogMode::SelectFile, true, initial_dir);
            }
            ControlAction::SetParameters(delta) => {
                if let Err(e) = self.store.set_parameters(delta) {
                    self.message = Some(format!("Invalid parameters: {}", e));
                }
            }
            ControlAction::Run => self.start_run(StartPolicy::IfIdle),
            ControlAction::Restart => self.start_run(StartPolicy::Supersede),
        }
        ctx.request_repaint();
    }

    fn poll_tasks(&mut self) {
        if self.run_task.as_ref().is_some_and(|t| t.is_finished()) {
            if let Some(task) = self.run_task.take() {
                match self.runtime.block_on(task) {
                    Ok(Ok(outcome)) => debug!(?outcome, "run task finished"),
                    Ok(Err(e)) => self.message = Some(e.to_string()),
                    Err(e) => self.message = Some(format!("Run task failed: {}", e)),
                }
            }
        }

        if self
            .geometry_task
            .as_ref()
            .is_some_and(|t| t.join.is_finished())
        {
            if let Some(GeometryTask { handle, join }) = self.geometry_task.take() {
                match self.runtime.block_on(join) {
                    Ok(Ok(mesh)) if handle.is_live() => {
                        self.geometry = Some(LoadedGeometry {
                            handle,
                            scene_mesh: SceneMesh::new(mesh),
                        });
                    }
                    Ok(Ok(_)) => debug!(handle = %handle.id(), "dropping geometry for released input"),
                    Ok(Err(e)) => {
                        if handle.is_live() {
                            self.message = Some(e.to_string());
                        }
                    }
                    Err(e) => self.message = Some(format!("Geometry task failed: {}", e)),
                }
            }
        }

        // The composer never draws geometry whose input has been replaced.
        if self.geometry.as_ref().is_some_and(|g| !g.handle.is_live()) {
            self.geometry = None;
        }
    }
}

impl eframe::App for AeroSprintApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_tasks();
        let state = self.state_rx.borrow_and_update().clone();
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open").clicked() {
                    actions.push(ControlAction::OpenFile);
                }
                ui.separator();
                ui.checkbox(&mut self.scene.show_mesh, "Mesh");
                ui.checkbox(&mut self.scene.show_streamlines, "Streamlines");
                ui.checkbox(&mut self.scene.show_grid_box, "Grid box");
                if ui.button("Reset view").clicked() {
                    self.scene.reset_camera();
                }
                ui.separator();
                ui.weak(format!("Server: {}", self.server_url));
            });
        });

        self.file_dialog.update(ctx);
        if let Some(path) = self.file_dialog.take_selected() {
            self.open_file(&path, ctx);
        }

        egui::SidePanel::left("controls")
            .default_width(260.0)
            .show(ctx, |ui| {
                let service_ready = self.orchestrator.is_some();
                actions.extend(self.controls.show(ui, &state, service_ready));

                ui.separator();
                self.status.show(ui, &state);

                if self.geometry_task.is_some() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading geometry…");
                    });
                }
                if let Some(message) = &self.message {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, message);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let mesh = self.geometry.as_ref().map(|g| &g.scene_mesh);
            let streamlines = state.last_result.as_ref().map(|run| &run.mapped);
            self.scene.show(ui, mesh, streamlines);
        });

        for action in actions {
            self.apply(action, ctx);
        }
    }
}

use aero_app::SessionState;
use aero_core::{CONTROL_BOUNDS, ParameterDelta};

/// Requests raised by the controls panel, applied by the app after drawing.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    OpenFile,
    SetParameters(ParameterDelta),
    Run,
    Restart,
}

#[derive(Default)]
pub struct ControlsView;

impl ControlsView {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        state: &SessionState,
        service_ready: bool,
    ) -> Vec<ControlAction> {
        let mut actions = Vec::new();
        let bounds = &CONTROL_BOUNDS;

        ui.heading("Input");
        if ui.button("📂 Open STL…").clicked() {
            actions.push(ControlAction::OpenFile);
        }
        match &state.input {
            Some(input) => {
                ui.label(format!("{} ({} bytes)", input.name, input.bytes.len()));
            }
            None => {
                ui.weak("No file selected");
            }
        }

        ui.separator();
        ui.heading("Parameters");

        let mut resolution = state.parameters.resolution;
        let response = ui.add(
            egui::Slider::new(
                &mut resolution,
                bounds.resolution_min..=bounds.resolution_max,
            )
            .step_by(f64::from(bounds.resolution_step))
            .text("Resolution"),
        );
        if response.changed() {
            let resolution = bounds.clamp_resolution(resolution);
            if resolution != state.parameters.resolution {
                actions.push(ControlAction::SetParameters(ParameterDelta::resolution(
                    resolution,
                )));
            }
        }

        let mut wind_speed = state.parameters.wind_speed;
        let response = ui.add(
            egui::Slider::new(
                &mut wind_speed,
                bounds.wind_speed_min..=bounds.wind_speed_max,
            )
            .suffix(" m/s")
            .text("Wind speed"),
        );
        if response.changed() {
            actions.push(ControlAction::SetParameters(ParameterDelta::wind_speed(
                bounds.clamp_wind_speed(wind_speed),
            )));
        }

        ui.separator();

        ui.horizontal(|ui| {
            let can_run = service_ready && state.can_start_run();
            if ui
                .add_enabled(can_run, egui::Button::new("▶ Run simulation"))
                .clicked()
            {
                actions.push(ControlAction::Run);
            }
            if state.status.is_in_flight()
                && state.input.is_some()
                && ui
                    .button("⟲ Restart")
                    .on_hover_text("Start over with the current file and parameters")
                    .clicked()
            {
                actions.push(ControlAction::Restart);
            }
        });

        if !service_ready {
            ui.colored_label(egui::Color32::YELLOW, "Simulation service not configured");
        }

        actions
    }
}

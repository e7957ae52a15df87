use aero_app::{RunStatus, SessionState};

#[derive(Default)]
pub struct StatusView {
    show_details: bool,
}

impl StatusView {
    pub fn show(&mut self, ui: &mut egui::Ui, state: &SessionState) {
        ui.heading("Run Status");

        match &state.status {
            RunStatus::Uploading | RunStatus::Simulating => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(state.status.label());
                });
            }
            RunStatus::Failed { kind, message } => {
                ui.colored_label(egui::Color32::RED, format!("{}: {}", kind.label(), message));
            }
            status => {
                ui.label(status.label());
            }
        }
        if let Some(token) = state.latest_token {
            ui.weak(format!("Latest request: {}", token));
        }

        ui.separator();

        let Some(run) = &state.last_result else {
            ui.label("No results yet");
            return;
        };

        ui.label(format!("Result {} for {}", run.token, run.input_name));
        ui.label(format!(
            "Resolution {} · wind {:.1} m/s",
            run.result.resolution_used, run.parameters.wind_speed
        ));
        ui.label(format!(
            "{} streamlines, {} points",
            run.mapped.len(),
            run.mapped.point_count()
        ));
        if run.parameters != state.parameters {
            ui.weak("Parameters changed since this result");
        }

        if ui
            .small_button(if self.show_details {
                "Hide Details"
            } else {
                "Show Details"
            })
            .clicked()
        {
            self.show_details = !self.show_details;
        }
        if self.show_details {
            if let Some(status) = run.result.service_status() {
                ui.label(format!("Service status: {}", status));
            }
            for (key, value) in &run.result.extra {
                ui.monospace(format!("{key}: {value}"));
            }
        }
    }
}

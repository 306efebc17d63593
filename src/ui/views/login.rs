use egui::{Color32, Context, TextEdit};

use crate::app::EcoApp;
use crate::model::AppState;
use crate::ui::layout::centered_panel;

pub fn ui_login(app: &mut EcoApp, ctx: &Context) {
    centered_panel(ctx, 340.0, 420.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("🌿 EcoTerra");
            ui.label("Aprende sobre el medio ambiente con tu clase");
            ui.add_space(20.0);

            ui.add(
                TextEdit::singleline(&mut app.inputs.email)
                    .hint_text("Email")
                    .desired_width(280.0),
            );
            ui.add_space(6.0);
            ui.add(
                TextEdit::singleline(&mut app.inputs.password)
                    .password(true)
                    .hint_text("Contraseña")
                    .desired_width(280.0),
            );
            ui.add_space(12.0);

            let entrar = ui.add_enabled(
                !app.auth.is_loading,
                egui::Button::new("Entrar").min_size(egui::vec2(280.0, 36.0)),
            );
            if entrar.clicked() {
                app.iniciar_sesion();
            }

            if app.auth.is_loading {
                ui.add_space(8.0);
                ui.spinner();
                ui.label("Conectando...");
            }

            if let Some(err) = &app.auth.error {
                ui.add_space(8.0);
                ui.colored_label(Color32::LIGHT_RED, format!("⚠ {err}"));
            }

            ui.add_space(12.0);
            if ui.link("¿No tienes cuenta? Regístrate").clicked() {
                app.auth.error = None;
                app.state = AppState::Register;
            }
        });
    });
}

use egui::{Color32, Context, TextEdit};

use crate::app::EcoApp;
use crate::model::AppState;
use crate::ui::layout::centered_panel;

pub fn ui_register(app: &mut EcoApp, ctx: &Context) {
    centered_panel(ctx, 380.0, 420.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("Crear cuenta");
            ui.label("Las cuentas nuevas entran como estudiante");
            ui.add_space(20.0);

            ui.add(
                TextEdit::singleline(&mut app.inputs.full_name)
                    .hint_text("Nombre completo")
                    .desired_width(280.0),
            );
            ui.add_space(6.0);
            ui.add(
                TextEdit::singleline(&mut app.inputs.email)
                    .hint_text("Email")
                    .desired_width(280.0),
            );
            ui.add_space(6.0);
            ui.add(
                TextEdit::singleline(&mut app.inputs.password)
                    .password(true)
                    .hint_text("Contraseña (mínimo 6 caracteres)")
                    .desired_width(280.0),
            );
            ui.add_space(12.0);

            let crear = ui.add_enabled(
                !app.auth.is_loading,
                egui::Button::new("Registrarme").min_size(egui::vec2(280.0, 36.0)),
            );
            if crear.clicked() {
                app.registrarse();
            }

            if app.auth.is_loading {
                ui.add_space(8.0);
                ui.spinner();
            }

            if let Some(err) = &app.auth.error {
                ui.add_space(8.0);
                ui.colored_label(Color32::LIGHT_RED, format!("⚠ {err}"));
            }

            ui.add_space(12.0);
            if ui.link("Ya tengo cuenta").clicked() {
                app.auth.error = None;
                app.state = AppState::Login;
            }
        });
    });
}

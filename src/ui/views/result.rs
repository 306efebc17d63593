use egui::{Context, RichText};

use crate::app::EcoApp;
use crate::ui::layout::centered_panel;

pub fn ui_quiz_result(app: &mut EcoApp, ctx: &Context) {
    let Some(session) = &app.session else {
        app.volver_a_inicio();
        return;
    };

    let title = session.title().to_owned();
    let score = session.total_score().unwrap_or(0);
    let total = session.total_possible();
    let percentage = session.percentage().unwrap_or(0);

    centered_panel(ctx, 360.0, 480.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("Quiz completado");
            ui.label(&title);
            ui.add_space(16.0);

            ui.label(
                RichText::new(format!("{percentage}%"))
                    .size(56.0)
                    .strong(),
            );
            ui.add_space(8.0);
            ui.label(format!("Puntuación: {score} / {total}"));

            if app.hay_desarrollo_pendiente() {
                ui.add_space(8.0);
                ui.label("✍ Las preguntas de desarrollo las corregirá tu profesor.");
            }

            if app.attempt_pending {
                ui.add_space(8.0);
                ui.spinner();
                ui.label("Guardando el intento...");
            }

            if !app.message.is_empty() {
                ui.add_space(8.0);
                ui.label(&app.message);
            }

            ui.add_space(20.0);
            if ui
                .add_sized([200.0, 36.0], egui::Button::new("Finalizar"))
                .clicked()
            {
                app.cerrar_resultado();
            }
        });
    });
}

use egui::{CentralPanel, Color32, Context, ProgressBar, RichText, ScrollArea};

use crate::app::EcoApp;
use crate::model::{AnswerValue, QuestionKind};
use crate::timer::format_mm_ss;
use crate::ui::layout::two_button_row;

/// Verde mientras sobra tiempo, ámbar por debajo de la mitad, rojo al
/// agotarse.
fn color_tiempo(fraccion: f32) -> Color32 {
    if fraccion > 0.5 {
        Color32::from_rgb(46, 160, 67)
    } else if fraccion > 0.2 {
        Color32::from_rgb(219, 154, 4)
    } else {
        Color32::from_rgb(207, 56, 44)
    }
}

pub fn ui_quiz(app: &mut EcoApp, ctx: &Context) {
    // Sin sesión no hay nada que pintar: volvemos al inicio
    let Some(session) = &app.session else {
        app.state = crate::model::AppState::Home;
        return;
    };

    // Copia de lo que se pinta este frame, para soltar el préstamo antes de
    // despachar clics
    let title = session.title().to_owned();
    let question = session.current_question().clone();
    let idx = session.current_index();
    let total = session.questions().len();
    let remaining = session.remaining_seconds();
    let answer_value = session
        .answer_for(&question.id)
        .and_then(|a| a.value.clone());

    CentralPanel::default().show(ctx, |ui| {
        let max_width = 650.0;
        let panel_width = (ui.available_width() * 0.97).min(max_width);

        ui.vertical_centered(|ui| {
            ui.set_width(panel_width);

            ui.heading(&title);
            ui.add_space(6.0);

            // Temporizador
            let fraccion = app.fraccion_tiempo();
            let color = color_tiempo(fraccion);
            ui.add(ProgressBar::new(fraccion).fill(color).desired_width(panel_width));
            ui.colored_label(color, RichText::new(format_mm_ss(remaining)).strong().size(18.0));
            ui.add_space(8.0);

            // Progreso de preguntas
            ui.add(
                ProgressBar::new((idx + 1) as f32 / total as f32).desired_width(panel_width),
            );
            ui.label(format!("Pregunta {} de {}", idx + 1, total));
            ui.add_space(10.0);

            // Enunciado
            ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                ui.label(RichText::new(&question.prompt).size(17.0).strong());
                ui.label(format!("Puntos: {}", question.points));
                ui.add_space(10.0);

                match question.kind {
                    QuestionKind::SingleChoice => {
                        for (i, option) in question.options.iter().enumerate() {
                            let selected =
                                answer_value == Some(AnswerValue::Choice(i));
                            if ui
                                .add_sized(
                                    [panel_width - 16.0, 32.0],
                                    egui::SelectableLabel::new(selected, option.as_str()),
                                )
                                .clicked()
                            {
                                app.seleccionar_opcion(&question.id, i);
                            }
                            ui.add_space(4.0);
                        }
                    }
                    QuestionKind::FreeText => {
                        let mut text = match &answer_value {
                            Some(AnswerValue::Text(t)) => t.clone(),
                            _ => String::new(),
                        };
                        let response = ui.add(
                            egui::TextEdit::multiline(&mut text)
                                .desired_rows(8)
                                .desired_width(panel_width - 16.0)
                                .hint_text("Escribe aquí tu respuesta..."),
                        );
                        if response.changed() {
                            app.escribir_respuesta(&question.id, text);
                        }
                    }
                }
            });

            ui.add_space(10.0);

            // Navegación; en la última pregunta el botón derecho entrega
            let ultima = idx + 1 == total;
            let right_label = if ultima { "Entregar ✔" } else { "Siguiente →" };
            let (anterior, derecha) =
                two_button_row(ui, panel_width, "← Anterior", right_label);
            if anterior {
                app.pregunta_anterior();
            }
            if derecha {
                if ultima {
                    app.pedir_entrega();
                } else {
                    app.pregunta_siguiente();
                }
            }

            ui.add_space(6.0);
            if ui.small_button("Salir sin entregar").clicked() {
                app.abandonar_quiz();
            }

            if !app.message.is_empty() {
                ui.add_space(8.0);
                ui.label(&app.message);
            }
        });
    });
}

use egui::{Color32, Context, ScrollArea, TextEdit};

use crate::app::EcoApp;
use crate::ui::helpers::big_list_button;
use crate::ui::layout::simple_panel;

pub fn ui_home(app: &mut EcoApp, ctx: &Context) {
    simple_panel(ctx, 700.0, egui::Margin::symmetric(24, 16), |ui| {
        let panel_width = ui.available_width();

        ui.horizontal(|ui| {
            ui.heading("Mis clases");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🔄 Actualizar").clicked() {
                    app.fetch_classes();
                }
                if app.classes.is_loading {
                    ui.spinner();
                }
            });
        });
        ui.add_space(8.0);

        if !app.message.is_empty() {
            ui.label(&app.message);
            ui.add_space(4.0);
        }
        if let Some(err) = &app.classes.error {
            ui.colored_label(Color32::LIGHT_RED, format!("⚠ {err}"));
            ui.add_space(4.0);
        }

        // Lista de clases
        let clases = app.classes.classes.clone();
        ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
            if clases.is_empty() && !app.classes.is_loading {
                ui.label("Todavía no estás en ninguna clase. Pide el código a tu profesor.");
            }
            for class in clases {
                let label = if class.description.is_empty() {
                    format!("📚 {}", class.name)
                } else {
                    format!("📚 {} — {}", class.name, class.description)
                };
                if big_list_button(ui, label, panel_width - 16.0, 40.0, true) {
                    app.abrir_clase(class);
                }
                ui.add_space(6.0);
            }
        });

        ui.separator();

        // Unirse con código
        ui.label("Unirse a una clase con código:");
        ui.horizontal(|ui| {
            ui.add(
                TextEdit::singleline(&mut app.inputs.join_code)
                    .hint_text("Código de 8 caracteres")
                    .desired_width(220.0),
            );
            if ui.button("Unirse").clicked() {
                app.unirse_a_clase();
            }
        });

        // Alta de clase, solo para profesorado
        if app.es_profesor() {
            ui.add_space(8.0);
            ui.collapsing("➕ Crear una clase nueva", |ui| {
                ui.add(
                    TextEdit::singleline(&mut app.inputs.new_class_name)
                        .hint_text("Nombre de la clase")
                        .desired_width(280.0),
                );
                ui.add_space(4.0);
                ui.add(
                    TextEdit::singleline(&mut app.inputs.new_class_description)
                        .hint_text("Descripción")
                        .desired_width(280.0),
                );
                ui.add_space(6.0);
                if ui.button("Crear clase").clicked() {
                    app.crear_clase();
                }
            });
        }

        ui.separator();

        // Quiz local de prueba, sin backend
        if ui.button("🧪 Probar el quiz de demostración").clicked() {
            app.empezar_quiz_demo();
        }
    });
}

use egui::{Color32, Context, Grid, ScrollArea};

use crate::app::{ClassTab, EcoApp};
use crate::model::MaterialKind;
use crate::ui::helpers::big_list_button;
use crate::ui::layout::simple_panel;
use crate::view_models::standings;

pub fn ui_class_detail(app: &mut EcoApp, ctx: &Context) {
    let Some(class) = app.classes.current_class.clone() else {
        app.volver_a_inicio();
        return;
    };

    simple_panel(ctx, 700.0, egui::Margin::symmetric(24, 16), |ui| {
        let panel_width = ui.available_width();

        ui.horizontal(|ui| {
            if ui.button("← Volver").clicked() {
                app.volver_a_inicio();
            }
            ui.heading(&class.name);
            if app.classes.is_loading {
                ui.spinner();
            }
        });
        if !class.description.is_empty() {
            ui.label(&class.description);
        }
        ui.label(format!("Código de la clase: {}", class.code));
        ui.add_space(8.0);

        // Pestañas
        ui.horizontal(|ui| {
            for (tab, label) in [
                (ClassTab::Materials, "📄 Materiales"),
                (ClassTab::Quizzes, "📝 Quizzes"),
                (ClassTab::Leaderboard, "🏆 Ranking"),
            ] {
                if ui
                    .selectable_label(app.class_tab == tab, label)
                    .clicked()
                {
                    app.seleccionar_tab(tab);
                }
            }
        });
        ui.separator();

        if !app.message.is_empty() {
            ui.label(&app.message);
        }
        if let Some(err) = &app.classes.error {
            ui.colored_label(Color32::LIGHT_RED, format!("⚠ {err}"));
        }

        match app.class_tab {
            ClassTab::Materials => materials_tab(app, ui, panel_width),
            ClassTab::Quizzes => quizzes_tab(app, ui, panel_width),
            ClassTab::Leaderboard => leaderboard_tab(app, ui),
        }
    });
}

fn materials_tab(app: &mut EcoApp, ui: &mut egui::Ui, panel_width: f32) {
    let materials = app.classes.materials.clone();
    ScrollArea::vertical().show(ui, |ui| {
        if materials.is_empty() && !app.classes.is_loading {
            ui.label("Esta clase aún no tiene materiales.");
        }
        for material in materials {
            let icon = match material.kind {
                MaterialKind::Pdf => "📄",
                MaterialKind::Image => "🖼",
                MaterialKind::Video => "🎬",
                MaterialKind::Embed => "🌐",
            };
            if big_list_button(
                ui,
                format!("{icon} {}", material.title),
                panel_width - 16.0,
                40.0,
                true,
            ) {
                app.abrir_material(material);
            }
            ui.add_space(6.0);
        }
    });
}

fn quizzes_tab(app: &mut EcoApp, ui: &mut egui::Ui, panel_width: f32) {
    let quizzes = app.classes.quizzes.clone();
    ScrollArea::vertical().show(ui, |ui| {
        if quizzes.is_empty() && !app.classes.is_loading {
            ui.label("Esta clase aún no tiene quizzes.");
        }
        for quiz in quizzes {
            let label = format!("📝 {}  ·  ⏱ {} min", quiz.title, quiz.duration);
            if big_list_button(ui, label, panel_width - 16.0, 40.0, true) {
                app.empezar_quiz(quiz.clone());
            }
            if !quiz.description.is_empty() {
                ui.label(&quiz.description);
            }
            ui.add_space(6.0);
        }
    });
}

fn leaderboard_tab(app: &mut EcoApp, ui: &mut egui::Ui) {
    if ui.button("🔄 Actualizar ranking").clicked() {
        app.fetch_scores();
    }
    ui.add_space(6.0);

    let entries = standings(&app.classes.scores);
    if entries.is_empty() {
        ui.label("Todavía no hay puntuaciones en esta clase.");
        return;
    }

    ScrollArea::vertical().show(ui, |ui| {
        Grid::new("leaderboard_grid")
            .striped(true)
            .spacing([16.0, 4.0])
            .show(ui, |ui| {
                ui.label("#");
                ui.label("Alumno");
                ui.label("Puntos");
                ui.end_row();

                for (pos, entry) in entries.iter().enumerate() {
                    let medal = match pos {
                        0 => "🥇",
                        1 => "🥈",
                        2 => "🥉",
                        _ => "",
                    };
                    ui.label(format!("{medal} {}", pos + 1));
                    if entry.full_name.is_empty() {
                        ui.label(&entry.student_id);
                    } else {
                        ui.label(&entry.full_name);
                    }
                    ui.label(entry.total_score.to_string());
                    ui.end_row();
                }
            });
    });
}

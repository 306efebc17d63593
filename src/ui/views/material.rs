use egui::{Context, ScrollArea};
use egui_commonmark::CommonMarkViewer;

use crate::app::EcoApp;
use crate::model::MaterialKind;
use crate::ui::layout::simple_panel;

pub fn ui_material(app: &mut EcoApp, ctx: &Context) {
    let Some(material) = app.current_material.clone() else {
        app.volver_a_clase();
        return;
    };

    simple_panel(ctx, 700.0, egui::Margin::symmetric(24, 16), |ui| {
        ui.horizontal(|ui| {
            if ui.button("← Volver").clicked() {
                app.volver_a_clase();
            }
            ui.heading(&material.title);
        });

        let kind_label = match material.kind {
            MaterialKind::Pdf => "Documento PDF",
            MaterialKind::Image => "Imagen",
            MaterialKind::Video => "Vídeo",
            MaterialKind::Embed => "Contenido enlazado",
        };
        ui.label(kind_label);
        ui.separator();

        ScrollArea::vertical().show(ui, |ui| {
            if !material.description.is_empty() {
                // La descripción admite markdown
                CommonMarkViewer::new().show(ui, &mut app.cm_cache, &material.description);
                ui.add_space(8.0);
            }
            if !material.content_url.is_empty() {
                ui.hyperlink_to("🔗 Abrir el recurso", &material.content_url);
            }
        });
    });
}

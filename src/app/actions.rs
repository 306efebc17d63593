use eframe::egui;

use super::*;
use crate::model::AnswerValue;

impl EcoApp {
    pub fn seleccionar_opcion(&mut self, question_id: &str, option_idx: usize) {
        if let Some(session) = &mut self.session {
            session.select_answer(question_id, AnswerValue::Choice(option_idx));
        }
    }

    pub fn escribir_respuesta(&mut self, question_id: &str, text: String) {
        if let Some(session) = &mut self.session {
            session.select_answer(question_id, AnswerValue::Text(text));
        }
    }

    pub fn pregunta_anterior(&mut self) {
        if let Some(session) = &mut self.session {
            let idx = session.current_index();
            session.go_to(idx.saturating_sub(1));
        }
    }

    pub fn pregunta_siguiente(&mut self) {
        if let Some(session) = &mut self.session {
            let idx = session.current_index();
            session.go_to(idx + 1);
        }
    }

    /// Entrega pedida por el usuario. Con preguntas en blanco pasa primero
    /// por el diálogo de confirmación; si está todo respondido entrega
    /// directamente.
    pub fn pedir_entrega(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        if session.unanswered_count() > 0 {
            self.confirm_submit = true;
        } else {
            self.entregar_quiz();
        }
    }

    /// Diálogo modal de confirmación de entrega con preguntas sin responder.
    pub fn confirmar_entrega(&mut self, ctx: &egui::Context) {
        let sin_responder = self
            .session
            .as_ref()
            .map(|s| s.unanswered_count())
            .unwrap_or(0);

        egui::Window::new("Confirmar entrega")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Te quedan {sin_responder} preguntas sin responder. ¿Entregar igualmente?"
                ));
                ui.horizontal(|ui| {
                    if ui.button("Sí, entregar").clicked() {
                        self.entregar_quiz();
                    }
                    if ui.button("Seguir respondiendo").clicked() {
                        self.confirm_submit = false;
                    }
                });
            });
    }
}

use chrono::Utc;

use super::*;
use crate::backend::attempt_rows;

impl EcoApp {
    /// Entrega confirmada (o sin nada pendiente): corrige y cierra.
    pub fn entregar_quiz(&mut self) {
        self.confirm_submit = false;
        self.finalizar_sesion();
    }

    /// La cuenta atrás llegó a cero: entrega forzosa, sin confirmación.
    pub fn tiempo_agotado(&mut self) {
        self.confirm_submit = false;
        self.message = "⏰ Tiempo agotado: el quiz se ha entregado automáticamente".to_owned();
        self.finalizar_sesion();
    }

    /// Única salida del estado activo. `submit` solo devuelve informe la
    /// primera vez, así que aunque la entrega manual y la expiración
    /// coincidan el intento se notifica al backend una sola vez.
    fn finalizar_sesion(&mut self) {
        let Some(session) = &mut self.session else {
            self.timer.stop();
            return;
        };

        let Some(report) = session.submit() else {
            // Ya estaba completada: no hay segundo informe que enviar
            self.timer.stop();
            return;
        };

        self.timer.stop();
        self.state = AppState::QuizResult;

        if self.session_is_demo {
            self.message = "ℹ Quiz de demostración: el resultado no se guarda".to_owned();
            return;
        }

        let rows = attempt_rows(&report, Utc::now());
        self.guardar_intento(rows);
    }
}

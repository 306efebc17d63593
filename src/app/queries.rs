use super::*;

impl EcoApp {
    pub fn es_profesor(&self) -> bool {
        self.auth.user.as_ref().map(|u| u.is_teacher()).unwrap_or(false)
    }

    /// `(actual_1based, total)` para la barra de progreso del quiz.
    pub fn progreso_quiz(&self) -> Option<(usize, usize)> {
        let session = self.session.as_ref()?;
        Some((session.current_index() + 1, session.questions().len()))
    }

    /// Fracción de tiempo restante, para la barra del temporizador.
    pub fn fraccion_tiempo(&self) -> f32 {
        let Some(session) = &self.session else {
            return 0.0;
        };
        let total = session.duration_seconds().max(1);
        session.remaining_seconds() as f32 / total as f32
    }

    /// El quiz tiene alguna pregunta de desarrollo pendiente de corrección
    /// manual; la pantalla de resultado lo avisa.
    pub fn hay_desarrollo_pendiente(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| s.questions().iter().any(|q| !q.is_single_choice()))
            .unwrap_or(false)
    }
}

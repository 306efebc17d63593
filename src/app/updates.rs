use std::time::Instant;

use super::*;
use crate::timer::TimerEvent;

impl EcoApp {
    /// Drena el canal del backend y aplica cada evento. Se llama una vez
    /// por frame desde `update`.
    pub fn poll_backend(&mut self) {
        let mut events = Vec::new();
        if let Some(rx) = &self.backend_rx {
            while let Ok(ev) = rx.try_recv() {
                events.push(ev);
            }
        }
        for ev in events {
            self.apply_backend_event(ev);
        }
    }

    fn apply_backend_event(&mut self, ev: BackendEvent) {
        match ev {
            BackendEvent::LoggedIn(result) | BackendEvent::Registered(result) => {
                self.auth.is_loading = false;
                match result {
                    Ok(session) => self.entrar_con_sesion(session),
                    Err(e) => {
                        log::warn!("fallo de autenticación: {e}");
                        self.auth.error = Some(e.to_string());
                    }
                }
            }

            BackendEvent::Classes(result) => {
                self.classes.is_loading = false;
                match result {
                    Ok(list) => self.classes.classes = list,
                    Err(e) => self.classes.error = Some(e.to_string()),
                }
            }

            BackendEvent::ClassJoined(result) => {
                self.classes.is_loading = false;
                match result {
                    Ok(class) => {
                        self.inputs.join_code.clear();
                        self.message = format!("✅ Te has unido a {}", class.name);
                        if !self.classes.classes.iter().any(|c| c.id == class.id) {
                            self.classes.classes.push(class);
                        }
                    }
                    Err(e) => self.classes.error = Some(e.to_string()),
                }
            }

            BackendEvent::ClassCreated(result) => {
                self.classes.is_loading = false;
                match result {
                    Ok(class) => {
                        self.inputs.new_class_name.clear();
                        self.inputs.new_class_description.clear();
                        self.message = format!(
                            "✅ Clase «{}» creada. Código para tus alumnos: {}",
                            class.name, class.code
                        );
                        self.classes.classes.push(class);
                    }
                    Err(e) => self.classes.error = Some(e.to_string()),
                }
            }

            BackendEvent::ClassContent(result) => {
                self.classes.is_loading = false;
                match result {
                    Ok((materials, quizzes)) => {
                        self.classes.materials = materials;
                        self.classes.quizzes = quizzes;
                    }
                    Err(e) => self.classes.error = Some(e.to_string()),
                }
            }

            BackendEvent::Scores(result) => match result {
                Ok(rows) => self.classes.scores = rows,
                Err(e) => self.classes.error = Some(e.to_string()),
            },

            BackendEvent::Questions { quiz, result } => {
                self.classes.is_loading = false;
                match result {
                    Ok(questions) => self.crear_sesion(quiz, questions, false),
                    Err(e) => {
                        // Sin preguntas no hay sesión a medias: nos quedamos
                        // donde estábamos.
                        log::error!("no se pudieron cargar las preguntas: {e}");
                        self.message =
                            "⚠ No se pudieron cargar las preguntas del quiz".to_owned();
                    }
                }
            }

            BackendEvent::AttemptSaved(result) => {
                self.attempt_pending = false;
                match result {
                    Ok(()) => self.message = "💾 Intento guardado en tu clase".to_owned(),
                    Err(e) => {
                        // La puntuación local no se revierte; el registro
                        // oficial queda sin guardar y no se reintenta.
                        log::error!("no se pudo guardar el intento: {e}");
                        self.message = format!(
                            "⚠ No se pudo guardar el intento ({e}). Tu resultado local no cambia."
                        );
                    }
                }
            }
        }
    }

    fn entrar_con_sesion(&mut self, session: AuthSession) {
        self.client.set_token(Some(session.access_token.clone()));
        self.message = format!("👋 Hola, {}", session.user.full_name);
        self.auth.access_token = Some(session.access_token);
        self.auth.user = Some(session.user);
        self.auth.error = None;
        self.inputs.password.clear();
        self.state = AppState::Home;
        self.fetch_classes();
    }

    /// Sondea la cuenta atrás y aplica sus eventos a la sesión: cada `Tick`
    /// descuenta un segundo y `Expired` fuerza la entrega.
    pub fn tick_quiz(&mut self, now: Instant) {
        if self.session.is_none() {
            // Nadie es dueño de la cuenta: no debe seguir viva
            self.timer.stop();
            return;
        }

        for ev in self.timer.poll(now) {
            match ev {
                TimerEvent::Tick(_) => {
                    if let Some(session) = &mut self.session {
                        session.tick();
                    }
                }
                TimerEvent::Expired => self.tiempo_agotado(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::model::{QuestionKind, Role};

    fn app_con_sesion() -> EcoApp {
        let mut app = EcoApp::default();
        app.auth.user = Some(UserData {
            id: "s1".into(),
            email: "ana@example.com".into(),
            role: Role::Student,
            full_name: "Ana".into(),
        });

        let quiz = QuizData {
            id: "z1".into(),
            title: "Ecosistemas".into(),
            description: String::new(),
            class_id: "c1".into(),
            duration: 1,
        };
        let questions = vec![Question {
            id: "q1".into(),
            prompt: "¿...?".into(),
            kind: QuestionKind::SingleChoice,
            options: vec!["a".into(), "b".into()],
            correct_option: Some(0),
            points: 1,
        }];

        app.crear_sesion(quiz, questions, true);
        app
    }

    #[test]
    fn al_agotarse_el_tiempo_la_sesion_se_entrega_sola() {
        let mut app = app_con_sesion();
        assert_eq!(app.state, AppState::Quiz);
        assert!(app.timer.is_running());

        // Un minuto y pico sin tocar nada
        app.tick_quiz(Instant::now() + Duration::from_secs(61));

        assert_eq!(app.state, AppState::QuizResult);
        assert!(app.session.as_ref().unwrap().is_completed());
        assert!(!app.timer.is_running());
    }

    #[test]
    fn salir_del_quiz_descarta_la_sesion_y_para_el_reloj() {
        let mut app = app_con_sesion();
        app.abandonar_quiz();

        assert!(app.session.is_none());
        assert!(!app.timer.is_running());
        assert_eq!(app.state, AppState::Home);
    }

    #[test]
    fn con_la_sesion_activa_no_arranca_otra() {
        let mut app = app_con_sesion();
        let titulo = app.session.as_ref().unwrap().title().to_owned();

        let otro = QuizData {
            id: "z2".into(),
            title: "Otro quiz".into(),
            description: String::new(),
            class_id: "c1".into(),
            duration: 2,
        };
        app.crear_sesion(otro, vec![], true);

        assert_eq!(app.session.as_ref().unwrap().title(), titulo);
    }
}

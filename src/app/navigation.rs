use std::time::Instant;

use super::*;
use crate::data::read_demo_bank;
use crate::model::SessionInit;

impl EcoApp {
    pub fn abrir_clase(&mut self, class: ClassData) {
        let class_id = class.id.clone();
        self.classes.current_class = Some(class);
        self.classes.materials.clear();
        self.classes.quizzes.clear();
        self.classes.scores.clear();
        self.class_tab = ClassTab::Materials;
        self.state = AppState::ClassDetail;
        self.message.clear();
        self.fetch_class_content(class_id);
    }

    pub fn seleccionar_tab(&mut self, tab: ClassTab) {
        self.class_tab = tab;
        if tab == ClassTab::Leaderboard {
            self.fetch_scores();
        }
    }

    pub fn abrir_material(&mut self, material: MaterialData) {
        self.current_material = Some(material);
        self.state = AppState::Material;
        self.message.clear();
    }

    pub fn volver_a_clase(&mut self) {
        self.current_material = None;
        self.state = AppState::ClassDetail;
    }

    pub fn volver_a_inicio(&mut self) {
        self.classes.current_class = None;
        self.state = AppState::Home;
        self.message.clear();
    }

    /// Pide las preguntas del quiz; la sesión se crea cuando llegan. Si la
    /// descarga falla no arranca ninguna sesión a medias.
    pub fn empezar_quiz(&mut self, quiz: QuizData) {
        if self.session.is_some() {
            return;
        }
        self.fetch_quiz_questions(quiz);
    }

    /// Variante local: quiz de demostración embebido, sin red.
    pub fn empezar_quiz_demo(&mut self) {
        if self.session.is_some() {
            return;
        }
        let bank = read_demo_bank();
        let questions = bank.questions.clone();
        self.crear_sesion(bank.quiz, questions, true);
    }

    /// Construye la sesión con estado propio (nada de globals) y arranca la
    /// cuenta atrás. Una sola validación, aquí.
    pub fn crear_sesion(&mut self, quiz: QuizData, questions: Vec<Question>, demo: bool) {
        // Un intento activo es dueño exclusivo de su temporizador: nunca se
        // pisa con otro.
        if self.session.as_ref().is_some_and(|s| !s.is_completed()) {
            return;
        }
        let Some(user) = self.auth.user.as_ref() else {
            self.message = "⚠ Inicia sesión para hacer el quiz".to_owned();
            return;
        };

        let init = SessionInit {
            quiz_id: quiz.id.clone(),
            title: quiz.title.clone(),
            duration_minutes: quiz.duration,
            student_id: user.id.clone(),
        };

        match QuizSession::new(init, questions) {
            Ok(session) => {
                self.timer.start(session.duration_seconds(), Instant::now());
                self.session = Some(session);
                self.session_is_demo = demo;
                self.confirm_submit = false;
                self.state = AppState::Quiz;
                self.message.clear();
            }
            Err(e) => {
                log::warn!("el quiz {} no pudo arrancar: {e}", quiz.id);
                self.message = format!("⚠ No se pudo iniciar el quiz: {e}");
            }
        }
    }

    /// Salir de la pantalla con la sesión activa la descarta: no hay
    /// reanudación, volver a entrar crea una sesión nueva.
    pub fn abandonar_quiz(&mut self) {
        self.timer.stop();
        self.session = None;
        self.confirm_submit = false;
        self.state = if self.session_is_demo || self.classes.current_class.is_none() {
            AppState::Home
        } else {
            AppState::ClassDetail
        };
        self.session_is_demo = false;
        self.message.clear();
    }

    /// Cierra la pantalla de resultado y suelta la sesión terminada.
    pub fn cerrar_resultado(&mut self) {
        self.session = None;
        let was_demo = self.session_is_demo;
        self.session_is_demo = false;
        self.state = if was_demo || self.classes.current_class.is_none() {
            AppState::Home
        } else {
            AppState::ClassDetail
        };
    }

    pub fn cerrar_sesion(&mut self) {
        self.timer.stop();
        self.session = None;
        self.session_is_demo = false;
        self.auth = AuthStore::default();
        self.client.set_token(None);
        self.classes = ClassStore::default();
        self.current_material = None;
        self.inputs = UiInputs::default();
        self.state = AppState::Login;
        self.message.clear();
    }
}

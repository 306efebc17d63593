use super::*;

/// Estado de autenticación. El token y el perfil se conservan entre
/// arranques; los flags de carga y error son efímeros.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthStore {
    pub user: Option<UserData>,
    pub access_token: Option<String>,
    #[serde(skip)]
    pub is_loading: bool,
    #[serde(skip)]
    pub error: Option<String>,
}

/// Datos de clases descargados, con sus flags de carga y error. Antes
/// vivían en un store global; aquí son un campo más de la app.
#[derive(Default)]
pub struct ClassStore {
    pub classes: Vec<ClassData>,
    pub current_class: Option<ClassData>,
    pub materials: Vec<MaterialData>,
    pub quizzes: Vec<QuizData>,
    pub scores: Vec<ScoreRow>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl EcoApp {
    /// Lanza un trabajo contra el backend en un hilo aparte; el resultado
    /// vuelve como evento por el canal y se aplica en `poll_backend`.
    fn spawn_backend(
        &self,
        job: impl FnOnce(BackendClient) -> BackendEvent + Send + 'static,
    ) {
        let Some(tx) = self.backend_tx.clone() else {
            return;
        };
        let client = self.client.clone();
        std::thread::spawn(move || {
            let _ = tx.send(job(client));
        });
    }

    pub fn iniciar_sesion(&mut self) {
        if self.auth.is_loading {
            return;
        }
        let email = self.inputs.email.trim().to_owned();
        let password = self.inputs.password.clone();
        if email.is_empty() || password.is_empty() {
            self.auth.error = Some("Escribe tu email y tu contraseña".into());
            return;
        }

        self.auth.is_loading = true;
        self.auth.error = None;
        self.spawn_backend(move |client| BackendEvent::LoggedIn(client.login(&email, &password)));
    }

    pub fn registrarse(&mut self) {
        if self.auth.is_loading {
            return;
        }
        let email = self.inputs.email.trim().to_owned();
        let password = self.inputs.password.clone();
        let full_name = self.inputs.full_name.trim().to_owned();
        if email.is_empty() || password.is_empty() || full_name.is_empty() {
            self.auth.error = Some("Rellena todos los campos".into());
            return;
        }
        if password.len() < 6 {
            self.auth.error = Some("La contraseña debe tener al menos 6 caracteres".into());
            return;
        }

        self.auth.is_loading = true;
        self.auth.error = None;
        self.spawn_backend(move |client| {
            BackendEvent::Registered(client.register(&email, &password, &full_name))
        });
    }

    pub fn fetch_classes(&mut self) {
        if self.classes.is_loading {
            return;
        }
        self.classes.is_loading = true;
        self.classes.error = None;
        self.spawn_backend(|client| BackendEvent::Classes(client.fetch_classes()));
    }

    pub fn unirse_a_clase(&mut self) {
        if self.classes.is_loading {
            return;
        }
        let code = self.inputs.join_code.trim().to_owned();
        let Some(user_id) = self.auth.user.as_ref().map(|u| u.id.clone()) else {
            return;
        };
        if code.len() != 8 {
            self.classes.error = Some("El código de clase tiene 8 caracteres".into());
            return;
        }

        self.classes.is_loading = true;
        self.classes.error = None;
        self.spawn_backend(move |client| {
            BackendEvent::ClassJoined(client.join_class(&code, &user_id))
        });
    }

    pub fn crear_clase(&mut self) {
        if self.classes.is_loading {
            return;
        }
        let name = self.inputs.new_class_name.trim().to_owned();
        let description = self.inputs.new_class_description.trim().to_owned();
        let Some(teacher_id) = self.auth.user.as_ref().map(|u| u.id.clone()) else {
            return;
        };
        if name.is_empty() {
            self.classes.error = Some("La clase necesita un nombre".into());
            return;
        }

        self.classes.is_loading = true;
        self.classes.error = None;
        self.spawn_backend(move |client| {
            BackendEvent::ClassCreated(client.create_class(&name, &description, &teacher_id))
        });
    }

    /// Materiales y quizzes de la clase, en una sola petición encadenada.
    pub fn fetch_class_content(&mut self, class_id: String) {
        if self.classes.is_loading {
            return;
        }
        self.classes.is_loading = true;
        self.classes.error = None;
        self.spawn_backend(move |client| {
            let result = client
                .fetch_materials(&class_id)
                .and_then(|materials| {
                    client
                        .fetch_quizzes(&class_id)
                        .map(|quizzes| (materials, quizzes))
                });
            BackendEvent::ClassContent(result)
        });
    }

    pub fn fetch_scores(&mut self) {
        let quiz_ids: Vec<String> = self.classes.quizzes.iter().map(|q| q.id.clone()).collect();
        self.spawn_backend(move |client| BackendEvent::Scores(client.fetch_scores(&quiz_ids)));
    }

    pub fn fetch_quiz_questions(&mut self, quiz: QuizData) {
        if self.classes.is_loading {
            return;
        }
        self.classes.is_loading = true;
        self.classes.error = None;
        self.spawn_backend(move |client| {
            use crate::backend::QuestionSource;
            let result = client.fetch_questions(&quiz.id);
            BackendEvent::Questions { quiz, result }
        });
    }

    pub fn guardar_intento(&mut self, rows: Vec<crate::model::AttemptRow>) {
        self.attempt_pending = true;
        self.spawn_backend(move |client| {
            use crate::backend::AttemptSink;
            BackendEvent::AttemptSaved(client.save_attempt(&rows))
        });
    }
}

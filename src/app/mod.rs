use std::sync::mpsc::{self, Receiver, Sender};

use egui_commonmark::CommonMarkCache;
use serde::{Deserialize, Serialize};

use crate::backend::{AuthSession, BackendClient, BackendError, ScoreRow};
use crate::model::{
    AppState, ClassData, MaterialData, Question, QuizData, UserData,
};
use crate::session::QuizSession;
use crate::timer::CountdownTimer;

// Submódulos
pub mod actions;
pub mod completion;
pub mod navigation;
pub mod queries;
pub mod stores;
pub mod updates;

pub use stores::{AuthStore, ClassStore};

/// Pestañas de la pantalla de clase.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ClassTab {
    #[default]
    Materials,
    Quizzes,
    Leaderboard,
}

/// Respuestas de los hilos de trabajo del backend. Cada petición lanza un
/// hilo que envía exactamente un evento por el canal; el hilo de UI los
/// drena una vez por frame.
pub enum BackendEvent {
    LoggedIn(Result<AuthSession, BackendError>),
    Registered(Result<AuthSession, BackendError>),
    Classes(Result<Vec<ClassData>, BackendError>),
    ClassJoined(Result<ClassData, BackendError>),
    ClassCreated(Result<ClassData, BackendError>),
    ClassContent(Result<(Vec<MaterialData>, Vec<QuizData>), BackendError>),
    Scores(Result<Vec<ScoreRow>, BackendError>),
    Questions {
        quiz: QuizData,
        result: Result<Vec<Question>, BackendError>,
    },
    AttemptSaved(Result<(), BackendError>),
}

/// Campos de texto de las distintas pantallas.
#[derive(Default)]
pub struct UiInputs {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub join_code: String,
    pub new_class_name: String,
    pub new_class_description: String,
}

#[derive(Default, Serialize, Deserialize)]
pub struct EcoApp {
    /// Sesión de usuario; se conserva entre arranques (eframe storage).
    pub auth: AuthStore,
    #[serde(skip)]
    pub client: BackendClient,
    #[serde(skip)]
    pub classes: ClassStore,
    #[serde(skip)]
    pub state: AppState,
    #[serde(skip)]
    pub class_tab: ClassTab,
    #[serde(skip)]
    pub current_material: Option<MaterialData>,
    /// Intento en curso. Efímero a propósito: nunca se persiste y salir de
    /// la pantalla lo descarta.
    #[serde(skip)]
    pub session: Option<QuizSession>,
    #[serde(skip)]
    pub session_is_demo: bool,
    #[serde(skip)]
    pub timer: CountdownTimer,
    #[serde(skip)]
    pub confirm_submit: bool,
    /// Guardado del intento en vuelo hacia el backend.
    #[serde(skip)]
    pub attempt_pending: bool,
    #[serde(skip)]
    pub message: String,
    #[serde(skip)]
    pub inputs: UiInputs,
    #[serde(skip)]
    pub cm_cache: CommonMarkCache,
    #[serde(skip)]
    pub backend_tx: Option<Sender<BackendEvent>>,
    #[serde(skip)]
    pub backend_rx: Option<Receiver<BackendEvent>>,
}

impl EcoApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app: EcoApp = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        let (tx, rx) = mpsc::channel();
        app.backend_tx = Some(tx);
        app.backend_rx = Some(rx);

        app.client = BackendClient::default();
        app.client.set_token(app.auth.access_token.clone());

        // Con sesión guardada entramos directos al inicio
        if app.auth.user.is_some() {
            app.state = AppState::Home;
            app.fetch_classes();
        } else {
            app.state = AppState::Login;
        }

        app
    }

    pub fn usuario(&self) -> Option<&UserData> {
        self.auth.user.as_ref()
    }
}

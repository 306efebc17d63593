use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tipo de pregunta dentro de un quiz.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    SingleChoice,
    FreeText,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub kind: QuestionKind,
    /// Opciones candidatas; presente (y no vacío) solo en `SingleChoice`.
    #[serde(default)]
    pub options: Vec<String>,
    /// Índice de la opción correcta dentro de `options`; solo en `SingleChoice`.
    #[serde(default)]
    pub correct_option: Option<usize>,
    pub points: u32,
}

impl Question {
    pub fn is_single_choice(&self) -> bool {
        self.kind == QuestionKind::SingleChoice
    }
}

/// Valor introducido por el estudiante para una pregunta.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AnswerValue {
    /// Índice de la opción elegida (elección única).
    Choice(usize),
    /// Texto libre (corrección manual por el profesor).
    Text(String),
}

/// Respuesta a una pregunta. Como máximo una por pregunta; `value == None`
/// es el estado legítimo de "sin responder". `is_correct` y `score` solo se
/// rellenan al corregir, y en preguntas de texto libre pueden quedar sin
/// rellenar incluso después de entregar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub value: Option<AnswerValue>,
    pub is_correct: Option<bool>,
    pub score: Option<u32>,
}

impl Answer {
    pub fn empty(question_id: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            value: None,
            is_correct: None,
            score: None,
        }
    }

    /// Una opción marcada siempre cuenta; un texto solo si no está en blanco.
    pub fn is_answered(&self) -> bool {
        match &self.value {
            None => false,
            Some(AnswerValue::Choice(_)) => true,
            Some(AnswerValue::Text(t)) => !t.trim().is_empty(),
        }
    }

    /// Texto tal y como se guarda en el backend (la opción elegida se
    /// traduce a su literal; sin responder queda vacío).
    pub fn text_for(&self, question: &Question) -> String {
        match &self.value {
            None => String::new(),
            Some(AnswerValue::Text(t)) => t.clone(),
            Some(AnswerValue::Choice(i)) => {
                question.options.get(*i).cloned().unwrap_or_default()
            }
        }
    }
}

/// Parámetros de arranque de una sesión de quiz, validados una única vez al
/// crearla.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionInit {
    pub quiz_id: String,
    pub title: String,
    pub duration_minutes: u32,
    pub student_id: String,
}

/// Pantallas de la aplicación.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    #[default]
    Login,
    Register,
    Home,
    ClassDetail,
    Material,
    Quiz,
    QuizResult,
}

// ---------------------------------------------------------------------------
// Registros que espeja el backend (tablas de la API REST)
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Teacher,
    Student,
    Public,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub full_name: String,
}

impl UserData {
    pub fn is_teacher(&self) -> bool {
        matches!(self.role, Role::Teacher | Role::SuperAdmin)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClassData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Código único de 8 caracteres para unirse a la clase.
    pub code: String,
    pub teacher_id: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    Pdf,
    Image,
    Video,
    Embed,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MaterialData {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    pub content_url: String,
    pub class_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuizData {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub class_id: String,
    /// Duración en minutos.
    pub duration: u32,
}

/// Fila que se inserta en `quiz_answers` al entregar: una por pregunta.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AttemptRow {
    pub student_id: String,
    pub quiz_id: String,
    pub question_id: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    pub submitted_at: DateTime<Utc>,
}

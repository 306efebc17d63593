use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::model::{
    AttemptRow, ClassData, MaterialData, Question, QuestionKind, QuizData, Role, UserData,
};
use crate::session::AttemptReport;

// ---------------------------------------------------------------------------
// Configuración y errores
// ---------------------------------------------------------------------------

const DEFAULT_BASE_URL: &str = "https://ecoterra.supabase.co";
const DEFAULT_ANON_KEY: &str = "anon-dev-key";

#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: String,
    pub anon_key: String,
}

impl BackendConfig {
    /// Lee la configuración del entorno (cargado antes con dotenv), con
    /// valores de desarrollo si faltan las variables.
    pub fn from_env() -> Self {
        let base_url = std::env::var("ECO_TERRA_BACKEND_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let anon_key =
            std::env::var("ECO_TERRA_ANON_KEY").unwrap_or_else(|_| DEFAULT_ANON_KEY.to_owned());
        Self { base_url, anon_key }
    }
}

/// Errores del límite con el backend. Se resuelven en el borde: la UI los
/// convierte en un aviso y la sesión local sigue tal cual.
#[derive(Debug)]
pub enum BackendError {
    /// Fallo de transporte (red caída, timeout...).
    Http(String),
    /// El servidor contestó con un estado de error.
    Api { status: u16, message: String },
    /// La respuesta no se pudo decodificar.
    Decode(String),
    /// Credenciales o sesión inválidas.
    Auth(String),
    /// El recurso pedido no existe.
    NotFound(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Http(msg) => write!(f, "error de red: {msg}"),
            BackendError::Api { status, message } => {
                write!(f, "el servidor respondió {status}: {message}")
            }
            BackendError::Decode(msg) => write!(f, "respuesta ilegible: {msg}"),
            BackendError::Auth(msg) => write!(f, "{msg}"),
            BackendError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Http(err.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Límites que consume el núcleo
// ---------------------------------------------------------------------------

/// Origen de preguntas: una descarga única al crear la sesión. Si falla, la
/// sesión no llega a arrancar.
pub trait QuestionSource {
    fn fetch_questions(&self, quiz_id: &str) -> Result<Vec<Question>, BackendError>;
}

/// Destino del intento completado: se invoca exactamente una vez por
/// sesión. Si falla no hay reintento automático; el aviso sube a la UI.
pub trait AttemptSink {
    fn save_attempt(&self, rows: &[AttemptRow]) -> Result<(), BackendError>;
}

// ---------------------------------------------------------------------------
// Cliente HTTP
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    pub user: UserData,
}

/// Respuesta del endpoint de autenticación; el perfil completo se lee
/// después de la tabla `users`.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUserStub,
}

#[derive(Debug, Deserialize)]
struct AuthUserStub {
    id: String,
    email: String,
}

/// Fila del ranking: puntuación por pregunta con el nombre del alumno
/// incrustado por la API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub student_id: String,
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default)]
    pub users: Option<ScoreUser>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreUser {
    pub full_name: String,
}

/// Cliente bloqueante contra la API del backend (auth + tablas estilo
/// PostgREST). Se clona barato para llevarlo a un hilo de trabajo.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    config: BackendConfig,
    token: Option<String>,
}

impl Default for BackendClient {
    fn default() -> Self {
        Self::new(BackendConfig::from_env())
    }
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            http: Client::new(),
            config,
            token: None,
        }
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.base_url, table)
    }

    fn auth_headers(&self, req: RequestBuilder) -> RequestBuilder {
        let bearer = self.token.as_deref().unwrap_or(&self.config.anon_key);
        req.header("apikey", &self.config.anon_key)
            .header(AUTHORIZATION, format!("Bearer {bearer}"))
    }

    fn check<T: DeserializeOwned>(resp: reqwest::blocking::Response) -> Result<T, BackendError> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp.json::<T>()?)
    }

    fn check_empty(resp: reqwest::blocking::Response) -> Result<(), BackendError> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, BackendError> {
        let req = self.http.get(self.rest_url(table)).query(query);
        let resp = self.auth_headers(req).send()?;
        Self::check(resp)
    }

    fn insert_returning<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<Vec<T>, BackendError> {
        let req = self
            .http
            .post(self.rest_url(table))
            .header("Prefer", "return=representation")
            .json(body);
        let resp = self.auth_headers(req).send()?;
        Self::check(resp)
    }

    fn insert_only<B: Serialize>(&self, table: &str, body: &B) -> Result<(), BackendError> {
        let req = self
            .http
            .post(self.rest_url(table))
            .header("Prefer", "return=minimal")
            .json(body);
        let resp = self.auth_headers(req).send()?;
        Self::check_empty(resp)
    }

    // ------------------------------------------------------------------ //
    // Autenticación
    // ------------------------------------------------------------------ //

    pub fn login(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let url = format!(
            "{}/auth/v1/token?grant_type=password",
            self.config.base_url
        );
        let req = self.http.post(url).json(&serde_json::json!({
            "email": email,
            "password": password,
        }));
        let resp = self.auth_headers(req).send()?;
        if resp.status().as_u16() == 400 {
            return Err(BackendError::Auth("Email o contraseña incorrectos".into()));
        }
        let token: TokenResponse = Self::check(resp)?;
        let user = self.fetch_profile(&token.access_token, &token.user.id, &token.user.email)?;
        Ok(AuthSession {
            access_token: token.access_token,
            user,
        })
    }

    pub fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<AuthSession, BackendError> {
        let url = format!("{}/auth/v1/signup", self.config.base_url);
        let req = self.http.post(url).json(&serde_json::json!({
            "email": email,
            "password": password,
        }));
        let resp = self.auth_headers(req).send()?;
        let token: TokenResponse = Self::check(resp)?;

        // Alta del perfil en la tabla `users`; todo registro nuevo entra
        // como estudiante.
        let profile = UserData {
            id: token.user.id.clone(),
            email: email.to_owned(),
            role: Role::Student,
            full_name: full_name.to_owned(),
        };
        let mut authed = self.clone();
        authed.set_token(Some(token.access_token.clone()));
        authed.insert_only("users", &vec![profile.clone()])?;

        Ok(AuthSession {
            access_token: token.access_token,
            user: profile,
        })
    }

    fn fetch_profile(
        &self,
        token: &str,
        user_id: &str,
        email: &str,
    ) -> Result<UserData, BackendError> {
        let mut authed = self.clone();
        authed.set_token(Some(token.to_owned()));
        let rows: Vec<UserData> = authed.get_rows(
            "users",
            &[
                ("id", format!("eq.{user_id}")),
                ("select", "*".to_owned()),
            ],
        )?;
        rows.into_iter().next().ok_or_else(|| {
            BackendError::Auth(format!("No existe perfil para la cuenta {email}"))
        })
    }

    // ------------------------------------------------------------------ //
    // Clases y materiales
    // ------------------------------------------------------------------ //

    pub fn fetch_classes(&self) -> Result<Vec<ClassData>, BackendError> {
        self.get_rows(
            "classes",
            &[("select", "*".to_owned()), ("order", "name".to_owned())],
        )
    }

    /// Busca la clase por su código de 8 caracteres y apunta al alumno.
    pub fn join_class(&self, code: &str, user_id: &str) -> Result<ClassData, BackendError> {
        let code = code.trim().to_uppercase();
        let rows: Vec<ClassData> = self.get_rows(
            "classes",
            &[("code", format!("eq.{code}")), ("select", "*".to_owned())],
        )?;
        let class = rows
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound("Código de clase no válido".into()))?;

        self.insert_only(
            "class_members",
            &serde_json::json!([{
                "class_id": class.id,
                "user_id": user_id,
                "role": "student",
                "joined_at": Utc::now(),
            }]),
        )?;
        Ok(class)
    }

    /// Crea una clase con un código aleatorio nuevo (solo profesores).
    pub fn create_class(
        &self,
        name: &str,
        description: &str,
        teacher_id: &str,
    ) -> Result<ClassData, BackendError> {
        let code = generate_class_code(&mut rand::thread_rng());
        let rows: Vec<ClassData> = self.insert_returning(
            "classes",
            &serde_json::json!([{
                "name": name,
                "description": description,
                "code": code,
                "teacher_id": teacher_id,
                "created_at": Utc::now(),
            }]),
        )?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::Decode("el alta de la clase no devolvió fila".into()))
    }

    pub fn fetch_materials(&self, class_id: &str) -> Result<Vec<MaterialData>, BackendError> {
        self.get_rows(
            "materials",
            &[
                ("class_id", format!("eq.{class_id}")),
                ("select", "*".to_owned()),
                ("order", "title".to_owned()),
            ],
        )
    }

    pub fn fetch_quizzes(&self, class_id: &str) -> Result<Vec<QuizData>, BackendError> {
        self.get_rows(
            "quizzes",
            &[
                ("class_id", format!("eq.{class_id}")),
                ("select", "*".to_owned()),
                ("order", "title".to_owned()),
            ],
        )
    }

    /// Puntuaciones guardadas de los quizzes indicados, con el nombre del
    /// alumno incrustado, para montar el ranking de la clase.
    pub fn fetch_scores(&self, quiz_ids: &[String]) -> Result<Vec<ScoreRow>, BackendError> {
        if quiz_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.get_rows(
            "quiz_answers",
            &[
                ("quiz_id", format!("in.({})", quiz_ids.join(","))),
                (
                    "select",
                    "student_id,score,users(full_name)".to_owned(),
                ),
            ],
        )
    }
}

impl QuestionSource for BackendClient {
    fn fetch_questions(&self, quiz_id: &str) -> Result<Vec<Question>, BackendError> {
        let rows: Vec<RemoteQuestion> = self.get_rows(
            "quiz_questions",
            &[
                ("quiz_id", format!("eq.{quiz_id}")),
                ("select", "*".to_owned()),
                // Orden estable: la secuencia queda fijada al crear la sesión
                ("order", "id".to_owned()),
            ],
        )?;
        Ok(rows.into_iter().map(RemoteQuestion::into_question).collect())
    }
}

impl AttemptSink for BackendClient {
    fn save_attempt(&self, rows: &[AttemptRow]) -> Result<(), BackendError> {
        self.insert_only("quiz_answers", &rows)
    }
}

// ---------------------------------------------------------------------------
// Formato de la tabla remota de preguntas
// ---------------------------------------------------------------------------

/// Fila de `quiz_questions` tal y como la sirve la API: el tipo se llama
/// `multiple_choice`/`essay` y la respuesta correcta viene como literal de
/// la opción, no como índice.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteQuestion {
    pub id: String,
    pub question: String,
    #[serde(rename = "type")]
    pub kind: RemoteKind,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub correct_answer: Option<String>,
    pub points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteKind {
    MultipleChoice,
    Essay,
}

impl RemoteQuestion {
    /// Traduce la fila remota al modelo del núcleo: el literal correcto se
    /// resuelve a su índice dentro de las opciones.
    pub fn into_question(self) -> Question {
        let options = self.options.unwrap_or_default();
        match self.kind {
            RemoteKind::MultipleChoice => {
                let correct_option = self
                    .correct_answer
                    .as_ref()
                    .and_then(|text| options.iter().position(|o| o == text));
                if correct_option.is_none() {
                    log::warn!(
                        "pregunta {}: la respuesta correcta no está entre las opciones",
                        self.id
                    );
                }
                Question {
                    id: self.id,
                    prompt: self.question,
                    kind: QuestionKind::SingleChoice,
                    options,
                    correct_option,
                    points: self.points,
                }
            }
            RemoteKind::Essay => Question {
                id: self.id,
                prompt: self.question,
                kind: QuestionKind::FreeText,
                options: Vec::new(),
                correct_option: None,
                points: self.points,
            },
        }
    }
}

/// Convierte el informe de la sesión en las filas de `quiz_answers`, una
/// por pregunta, todas con la misma marca de tiempo de entrega.
pub fn attempt_rows(report: &AttemptReport, submitted_at: DateTime<Utc>) -> Vec<AttemptRow> {
    report
        .answers
        .iter()
        .map(|a| AttemptRow {
            student_id: report.student_id.clone(),
            quiz_id: report.quiz_id.clone(),
            question_id: a.question_id.clone(),
            answer: a.answer_text.clone(),
            is_correct: a.is_correct,
            score: a.score,
            submitted_at,
        })
        .collect()
}

/// Código de clase: 8 caracteres alfanuméricos en mayúscula.
pub fn generate_class_code(rng: &mut impl Rng) -> String {
    const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    (0..8)
        .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ReportedAnswer;

    #[test]
    fn la_fila_remota_resuelve_el_literal_a_indice() {
        let row = RemoteQuestion {
            id: "q1".into(),
            question: "¿Qué capa absorbe la radiación ultravioleta?".into(),
            kind: RemoteKind::MultipleChoice,
            options: Some(vec!["Troposfera".into(), "Ozonosfera".into()]),
            correct_answer: Some("Ozonosfera".into()),
            points: 2,
        };
        let q = row.into_question();
        assert_eq!(q.kind, QuestionKind::SingleChoice);
        assert_eq!(q.correct_option, Some(1));
        assert_eq!(q.points, 2);
    }

    #[test]
    fn un_literal_desconocido_deja_la_clave_sin_resolver() {
        let row = RemoteQuestion {
            id: "q1".into(),
            question: "...".into(),
            kind: RemoteKind::MultipleChoice,
            options: Some(vec!["a".into(), "b".into()]),
            correct_answer: Some("c".into()),
            points: 1,
        };
        assert_eq!(row.into_question().correct_option, None);
    }

    #[test]
    fn los_ensayos_llegan_sin_opciones_ni_clave() {
        let row = RemoteQuestion {
            id: "q2".into(),
            question: "Explica el efecto invernadero".into(),
            kind: RemoteKind::Essay,
            options: None,
            correct_answer: None,
            points: 10,
        };
        let q = row.into_question();
        assert_eq!(q.kind, QuestionKind::FreeText);
        assert!(q.options.is_empty());
        assert_eq!(q.correct_option, None);
    }

    #[test]
    fn el_informe_se_traduce_a_una_fila_por_pregunta() {
        let report = AttemptReport {
            quiz_id: "z1".into(),
            student_id: "s1".into(),
            answers: vec![
                ReportedAnswer {
                    question_id: "q1".into(),
                    answer_text: "Ozonosfera".into(),
                    is_correct: Some(true),
                    score: Some(2),
                },
                ReportedAnswer {
                    question_id: "q2".into(),
                    answer_text: "porque retiene calor".into(),
                    is_correct: None,
                    score: None,
                },
            ],
            total_score: 2,
            total_possible: 12,
        };

        let now = Utc::now();
        let rows = attempt_rows(&report, now);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].quiz_id, "z1");
        assert_eq!(rows[0].score, Some(2));
        assert_eq!(rows[1].is_correct, None);
        assert!(rows.iter().all(|r| r.submitted_at == now));
    }

    #[test]
    fn el_codigo_de_clase_tiene_ocho_mayusculas_o_digitos() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let code = generate_class_code(&mut rng);
            assert_eq!(code.len(), 8);
            assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }
}

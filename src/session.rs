use std::collections::HashMap;
use std::fmt;

use crate::model::{Answer, AnswerValue, Question, SessionInit};
use crate::scorer;

/// Estados de una sesión: `Active` al crearla, `Completed` al entregar o al
/// agotarse el tiempo. `Completed` es terminal: no hay transición de vuelta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// El quiz llegó sin preguntas: la sesión no puede arrancar.
    EmptyQuiz,
    /// Dos preguntas comparten id; el mapa de respuestas sería ambiguo.
    DuplicateQuestionId(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::EmptyQuiz => write!(f, "el quiz no tiene preguntas"),
            SessionError::DuplicateQuestionId(id) => {
                write!(f, "id de pregunta duplicado: {id}")
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// Respuesta ya corregida tal y como se comunica al backend, con el literal
/// de la opción elegida resuelto.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportedAnswer {
    pub question_id: String,
    pub answer_text: String,
    pub is_correct: Option<bool>,
    pub score: Option<u32>,
}

/// Informe del intento completado. `submit`/`expire` lo devuelven UNA sola
/// vez: la primera transición fuera de `Active` se lo lleva y las llamadas
/// posteriores no producen nada, de modo que el mismo intento no puede
/// notificarse dos veces.
#[derive(Clone, Debug, PartialEq)]
pub struct AttemptReport {
    pub quiz_id: String,
    pub student_id: String,
    pub answers: Vec<ReportedAnswer>,
    pub total_score: u32,
    pub total_possible: u32,
}

/// Estado de un intento de quiz en curso. Vive solo en memoria mientras
/// dura el intento; salir de la pantalla lo descarta y volver a entrar crea
/// una sesión nueva.
#[derive(Clone, Debug)]
pub struct QuizSession {
    init: SessionInit,
    questions: Vec<Question>,
    answers: HashMap<String, Answer>,
    current_index: usize,
    remaining_seconds: u32,
    status: SessionStatus,
    total_score: Option<u32>,
    total_possible: u32,
}

impl QuizSession {
    /// Construye la sesión a partir de los parámetros validados y el banco
    /// de preguntas ya descargado. El orden de `questions` queda fijado
    /// aquí y no se toca después; el mapa de respuestas nace con una
    /// entrada vacía por pregunta y nunca gana ni pierde claves.
    pub fn new(init: SessionInit, questions: Vec<Question>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyQuiz);
        }

        let mut answers = HashMap::with_capacity(questions.len());
        for q in &questions {
            if answers
                .insert(q.id.clone(), Answer::empty(q.id.clone()))
                .is_some()
            {
                return Err(SessionError::DuplicateQuestionId(q.id.clone()));
            }
        }

        let total_possible = questions.iter().map(|q| q.points).sum();
        let remaining_seconds = init.duration_minutes * 60;

        Ok(Self {
            init,
            questions,
            answers,
            current_index: 0,
            remaining_seconds,
            status: SessionStatus::Active,
            total_score: None,
            total_possible,
        })
    }

    // ----------------------------------------------------------------- //
    // Transiciones
    // ----------------------------------------------------------------- //

    /// Sobrescribe el valor de la respuesta de `question_id`. Solo en
    /// `Active` y solo para ids que ya existen en el mapa: un id
    /// desconocido se rechaza sin crear hueco nuevo. Devuelve si el valor
    /// quedó registrado.
    pub fn select_answer(&mut self, question_id: &str, value: AnswerValue) -> bool {
        if self.status != SessionStatus::Active {
            return false;
        }
        match self.answers.get_mut(question_id) {
            Some(answer) => {
                answer.value = Some(value);
                true
            }
            None => {
                log::warn!("respuesta para pregunta desconocida ignorada: {question_id}");
                false
            }
        }
    }

    /// Cambia la pregunta visible. Un índice fuera de rango se recorta al
    /// más cercano válido; nunca entra en pánico.
    pub fn go_to(&mut self, index: usize) {
        if self.status != SessionStatus::Active {
            return;
        }
        self.current_index = index.min(self.questions.len() - 1);
    }

    /// Un segundo menos en el reloj. Lo invoca el `Tick` del temporizador;
    /// no tiene ningún otro efecto mientras quede tiempo.
    pub fn tick(&mut self) {
        if self.status != SessionStatus::Active {
            return;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
    }

    /// Tiempo agotado: entrega forzosa sobre lo que haya respondido, sin
    /// confirmación.
    pub fn expire(&mut self) -> Option<AttemptReport> {
        self.submit()
    }

    /// Corrige y cierra la sesión. Idempotente: la primera llamada corrige,
    /// fija los totales, pasa a `Completed` y devuelve el informe; las
    /// siguientes no cambian nada y devuelven `None`. Si `submit` y
    /// `expire` coinciden en el tiempo, gana el que se procese primero
    /// (orden total del hilo de eventos) y el otro queda en no-op.
    pub fn submit(&mut self) -> Option<AttemptReport> {
        if self.status != SessionStatus::Active {
            return None;
        }

        let summary = scorer::score(&self.questions, &self.answers);

        let reported = self
            .questions
            .iter()
            .map(|q| {
                let graded = &summary.graded[&q.id];
                ReportedAnswer {
                    question_id: q.id.clone(),
                    answer_text: graded.text_for(q),
                    is_correct: graded.is_correct,
                    score: graded.score,
                }
            })
            .collect();

        self.answers = summary.graded;
        self.total_score = Some(summary.total_score);
        self.status = SessionStatus::Completed;

        Some(AttemptReport {
            quiz_id: self.init.quiz_id.clone(),
            student_id: self.init.student_id.clone(),
            answers: reported,
            total_score: summary.total_score,
            total_possible: summary.total_possible,
        })
    }

    // ----------------------------------------------------------------- //
    // Consultas
    // ----------------------------------------------------------------- //

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    pub fn title(&self) -> &str {
        &self.init.title
    }

    pub fn quiz_id(&self) -> &str {
        &self.init.quiz_id
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        // current_index se mantiene dentro de rango por construcción
        &self.questions[self.current_index]
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn duration_seconds(&self) -> u32 {
        self.init.duration_minutes * 60
    }

    pub fn unanswered_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| {
                self.answers
                    .get(&q.id)
                    .map(|a| !a.is_answered())
                    .unwrap_or(true)
            })
            .count()
    }

    pub fn total_possible(&self) -> u32 {
        self.total_possible
    }

    /// Solo tras completar.
    pub fn total_score(&self) -> Option<u32> {
        self.total_score
    }

    /// Porcentaje redondeado para la pantalla de resultado.
    pub fn percentage(&self) -> Option<u32> {
        let score = self.total_score?;
        if self.total_possible == 0 {
            return Some(0);
        }
        Some((score as f64 / self.total_possible as f64 * 100.0).round() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionKind;

    fn choice(id: &str, correct: usize) -> Question {
        Question {
            id: id.into(),
            prompt: format!("pregunta {id}"),
            kind: QuestionKind::SingleChoice,
            options: vec!["a".into(), "b".into(), "c".into()],
            correct_option: Some(correct),
            points: 1,
        }
    }

    fn essay(id: &str) -> Question {
        Question {
            id: id.into(),
            prompt: format!("pregunta {id}"),
            kind: QuestionKind::FreeText,
            options: vec![],
            correct_option: None,
            points: 5,
        }
    }

    fn init(duration_minutes: u32) -> SessionInit {
        SessionInit {
            quiz_id: "quiz-1".into(),
            title: "Ecosistemas".into(),
            duration_minutes,
            student_id: "student-1".into(),
        }
    }

    fn cinco_preguntas() -> QuizSession {
        let questions = (0..5).map(|i| choice(&format!("q{i}"), 0)).collect();
        QuizSession::new(init(1), questions).unwrap()
    }

    #[test]
    fn arranca_activa_en_la_primera_pregunta_con_todo_sin_responder() {
        let s = cinco_preguntas();
        assert_eq!(s.status(), SessionStatus::Active);
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.remaining_seconds(), 60);
        assert_eq!(s.unanswered_count(), 5);
        assert_eq!(s.total_possible(), 5);
        assert_eq!(s.total_score(), None);
    }

    #[test]
    fn un_quiz_sin_preguntas_no_arranca() {
        assert_eq!(
            QuizSession::new(init(1), vec![]).unwrap_err(),
            SessionError::EmptyQuiz
        );
    }

    #[test]
    fn ids_duplicados_se_rechazan_al_crear() {
        let questions = vec![choice("q0", 0), choice("q0", 1)];
        assert_eq!(
            QuizSession::new(init(1), questions).unwrap_err(),
            SessionError::DuplicateQuestionId("q0".into())
        );
    }

    #[test]
    fn la_ultima_respuesta_gana_sin_duplicar_entradas() {
        let mut s = cinco_preguntas();
        assert!(s.select_answer("q1", AnswerValue::Choice(2)));
        assert!(s.select_answer("q1", AnswerValue::Choice(0)));

        let a = s.answer_for("q1").unwrap();
        assert_eq!(a.value, Some(AnswerValue::Choice(0)));
        assert_eq!(s.unanswered_count(), 4);
    }

    #[test]
    fn un_id_desconocido_se_ignora_sin_crear_hueco() {
        let mut s = cinco_preguntas();
        assert!(!s.select_answer("fantasma", AnswerValue::Choice(0)));
        assert!(s.answer_for("fantasma").is_none());
        assert_eq!(s.unanswered_count(), 5);
    }

    #[test]
    fn go_to_recorta_los_indices_fuera_de_rango() {
        let mut s = cinco_preguntas();
        s.go_to(3);
        assert_eq!(s.current_index(), 3);
        s.go_to(999);
        assert_eq!(s.current_index(), 4);
        s.go_to(0);
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn tick_descuenta_y_satura_en_cero() {
        let mut s = QuizSession::new(init(0), vec![choice("q0", 0)]).unwrap();
        assert_eq!(s.remaining_seconds(), 0);
        s.tick();
        assert_eq!(s.remaining_seconds(), 0);
    }

    #[test]
    fn escenario_tres_de_cinco() {
        // 5 preguntas de 1 punto: 0,1,2 bien, 3 mal, 4 sin responder.
        let mut s = cinco_preguntas();
        s.select_answer("q0", AnswerValue::Choice(0));
        s.select_answer("q1", AnswerValue::Choice(0));
        s.select_answer("q2", AnswerValue::Choice(0));
        s.select_answer("q3", AnswerValue::Choice(1));

        let report = s.submit().expect("primer submit devuelve informe");
        assert_eq!(s.status(), SessionStatus::Completed);
        assert_eq!(s.total_score(), Some(3));
        assert_eq!(s.total_possible(), 5);
        assert_eq!(s.percentage(), Some(60));
        assert_eq!(report.total_score, 3);
        assert_eq!(report.answers.len(), 5);

        // La sin responder queda marcada incorrecta con 0 puntos
        let q4 = report.answers.iter().find(|r| r.question_id == "q4").unwrap();
        assert_eq!(q4.is_correct, Some(false));
        assert_eq!(q4.score, Some(0));
        assert_eq!(q4.answer_text, "");
    }

    #[test]
    fn submit_es_idempotente_y_solo_hay_un_informe() {
        let mut s = cinco_preguntas();
        s.select_answer("q0", AnswerValue::Choice(0));

        let primero = s.submit();
        assert!(primero.is_some());
        let score_tras_entrega = s.total_score();

        // Segunda entrega (o expiración tardía): no cambia nada y no hay
        // segundo informe.
        assert!(s.submit().is_none());
        assert!(s.expire().is_none());
        assert_eq!(s.total_score(), score_tras_entrega);
    }

    #[test]
    fn tras_completar_todas_las_operaciones_son_no_op() {
        let mut s = cinco_preguntas();
        s.select_answer("q0", AnswerValue::Choice(0));
        s.go_to(2);
        s.submit();

        let remaining = s.remaining_seconds();
        s.select_answer("q1", AnswerValue::Choice(0));
        s.go_to(4);
        s.tick();

        assert_eq!(s.current_index(), 2);
        assert_eq!(s.remaining_seconds(), remaining);
        assert_eq!(s.answer_for("q1").unwrap().value, None);
    }

    #[test]
    fn expirar_equivale_a_entregar_lo_que_haya() {
        let mut con_expire = cinco_preguntas();
        con_expire.select_answer("q0", AnswerValue::Choice(0));
        con_expire.select_answer("q1", AnswerValue::Choice(2));

        let mut con_submit = con_expire.clone();

        // Tres ticks de reloj y expiración automática, sin acción del usuario
        con_expire.tick();
        con_expire.tick();
        con_expire.tick();
        let informe_expire = con_expire.expire().unwrap();
        let informe_submit = con_submit.submit().unwrap();

        assert_eq!(con_expire.status(), SessionStatus::Completed);
        assert_eq!(informe_expire.total_score, informe_submit.total_score);
        assert_eq!(informe_expire.answers, informe_submit.answers);
    }

    #[test]
    fn el_texto_libre_queda_pendiente_tambien_en_el_informe() {
        let questions = vec![choice("q0", 0), essay("q1")];
        let mut s = QuizSession::new(init(2), questions).unwrap();
        s.select_answer("q0", AnswerValue::Choice(0));
        s.select_answer("q1", AnswerValue::Text("porque el suelo retiene agua".into()));

        let report = s.submit().unwrap();
        let ensayo = report.answers.iter().find(|r| r.question_id == "q1").unwrap();
        assert_eq!(ensayo.is_correct, None);
        assert_eq!(ensayo.score, None);
        assert_eq!(ensayo.answer_text, "porque el suelo retiene agua");
        // El máximo posible cuenta el ensayo aunque no puntúe automático
        assert_eq!(report.total_possible, 6);
        assert_eq!(report.total_score, 1);
    }
}

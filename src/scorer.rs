use std::collections::HashMap;

use crate::model::{Answer, AnswerValue, Question};

/// Resultado de corregir una entrega: respuestas corregidas (indexadas por
/// pregunta) más los totales.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreSummary {
    pub graded: HashMap<String, Answer>,
    pub total_score: u32,
    pub total_possible: u32,
}

/// Corrige `answers` contra la clave de respuestas de `questions`.
///
/// - Elección única: correcta si y solo si el índice elegido coincide
///   exactamente con `correct_option`; sin crédito parcial; sin responder
///   cuenta como incorrecta.
/// - Texto libre: no se corrige aquí; `is_correct` y `score` quedan sin
///   rellenar a la espera del profesor.
///
/// Determinista y sin efectos: no muta sus entradas.
pub fn score(questions: &[Question], answers: &HashMap<String, Answer>) -> ScoreSummary {
    let total_possible = questions.iter().map(|q| q.points).sum();

    let mut graded = HashMap::with_capacity(questions.len());
    let mut total_score = 0;

    for q in questions {
        let mut answer = answers
            .get(&q.id)
            .cloned()
            .unwrap_or_else(|| Answer::empty(q.id.clone()));

        if q.is_single_choice() {
            let correct = match &answer.value {
                Some(AnswerValue::Choice(i)) => Some(*i) == q.correct_option,
                _ => false,
            };
            let awarded = if correct { q.points } else { 0 };
            answer.is_correct = Some(correct);
            answer.score = Some(awarded);
            total_score += awarded;
        }
        // Texto libre: se deja tal cual (corrección manual pendiente).

        graded.insert(q.id.clone(), answer);
    }

    ScoreSummary {
        graded,
        total_score,
        total_possible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionKind;

    fn choice(id: &str, correct: usize, points: u32) -> Question {
        Question {
            id: id.into(),
            prompt: format!("pregunta {id}"),
            kind: QuestionKind::SingleChoice,
            options: vec!["a".into(), "b".into(), "c".into()],
            correct_option: Some(correct),
            points,
        }
    }

    fn essay(id: &str, points: u32) -> Question {
        Question {
            id: id.into(),
            prompt: format!("pregunta {id}"),
            kind: QuestionKind::FreeText,
            options: vec![],
            correct_option: None,
            points,
        }
    }

    fn answered(id: &str, value: AnswerValue) -> Answer {
        Answer {
            question_id: id.into(),
            value: Some(value),
            is_correct: None,
            score: None,
        }
    }

    #[test]
    fn acierto_exacto_da_los_puntos_y_fallo_cero() {
        let questions = vec![choice("q1", 2, 5)];

        let mut answers = HashMap::new();
        answers.insert("q1".into(), answered("q1", AnswerValue::Choice(2)));
        let out = score(&questions, &answers);
        assert_eq!(out.graded["q1"].score, Some(5));
        assert_eq!(out.graded["q1"].is_correct, Some(true));
        assert_eq!(out.total_score, 5);

        answers.insert("q1".into(), answered("q1", AnswerValue::Choice(0)));
        let out = score(&questions, &answers);
        assert_eq!(out.graded["q1"].score, Some(0));
        assert_eq!(out.graded["q1"].is_correct, Some(false));
        assert_eq!(out.total_score, 0);
    }

    #[test]
    fn sin_responder_es_incorrecta_y_no_rompe() {
        let questions = vec![choice("q1", 0, 3)];
        let answers = HashMap::new();

        let out = score(&questions, &answers);
        assert_eq!(out.graded["q1"].is_correct, Some(false));
        assert_eq!(out.graded["q1"].score, Some(0));
        assert_eq!(out.total_possible, 3);
    }

    #[test]
    fn texto_libre_nunca_se_autocorrige() {
        let questions = vec![essay("q1", 10)];
        let mut answers = HashMap::new();
        answers.insert(
            "q1".into(),
            answered("q1", AnswerValue::Text("el ciclo del agua".into())),
        );

        let out = score(&questions, &answers);
        assert_eq!(out.graded["q1"].is_correct, None);
        assert_eq!(out.graded["q1"].score, None);
        // Pendiente de corrección manual: no aporta al total automático,
        // pero sí al máximo posible.
        assert_eq!(out.total_score, 0);
        assert_eq!(out.total_possible, 10);
    }

    #[test]
    fn no_muta_las_entradas_y_es_determinista() {
        let questions = vec![choice("q1", 1, 2), essay("q2", 4)];
        let mut answers = HashMap::new();
        answers.insert("q1".into(), answered("q1", AnswerValue::Choice(1)));
        let before = answers.clone();

        let primera = score(&questions, &answers);
        let segunda = score(&questions, &answers);
        assert_eq!(answers, before);
        assert_eq!(primera, segunda);
    }

    #[test]
    fn total_posible_suma_todas_las_preguntas() {
        let questions = vec![choice("q1", 0, 1), choice("q2", 0, 2), essay("q3", 7)];
        let out = score(&questions, &HashMap::new());
        assert_eq!(out.total_possible, 10);
    }
}

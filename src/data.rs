// src/data.rs

use serde::Deserialize;

use crate::backend::{BackendError, QuestionSource};
use crate::model::{Question, QuizData};

/// Quiz de demostración embebido en el binario. Permite probar la pantalla
/// de quiz sin red; sirve las preguntas por el mismo contrato que la
/// variante remota.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoBank {
    pub quiz: QuizData,
    pub questions: Vec<Question>,
}

/// Carga el banco de demostración desde el YAML embebido.
pub fn read_demo_bank() -> DemoBank {
    let file_content = include_str!("data/demo_quiz.yaml");
    serde_yaml::from_str(file_content).expect("No se pudo parsear el quiz de demostración YAML")
}

impl QuestionSource for DemoBank {
    fn fetch_questions(&self, quiz_id: &str) -> Result<Vec<Question>, BackendError> {
        if quiz_id == self.quiz.id {
            Ok(self.questions.clone())
        } else {
            Err(BackendError::NotFound(format!(
                "el banco de demostración no contiene el quiz {quiz_id}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionKind;

    #[test]
    fn el_banco_embebido_parsea_y_cumple_los_invariantes() {
        let bank = read_demo_bank();
        assert!(!bank.questions.is_empty());
        assert!(bank.quiz.duration > 0);

        for q in &bank.questions {
            match q.kind {
                QuestionKind::SingleChoice => {
                    assert!(!q.options.is_empty(), "{} sin opciones", q.id);
                    let correct = q.correct_option.expect("clave ausente");
                    assert!(correct < q.options.len(), "{} clave fuera de rango", q.id);
                }
                QuestionKind::FreeText => {
                    assert!(q.options.is_empty());
                    assert!(q.correct_option.is_none());
                }
            }
        }

        // Ids únicos: el mapa de respuestas tendrá una entrada por pregunta
        let mut ids: Vec<_> = bank.questions.iter().map(|q| &q.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), bank.questions.len());
    }

    #[test]
    fn el_banco_sirve_su_quiz_y_rechaza_otros() {
        let bank = read_demo_bank();
        let quiz_id = bank.quiz.id.clone();
        assert!(bank.fetch_questions(&quiz_id).is_ok());
        assert!(bank.fetch_questions("otro-quiz").is_err());
    }
}

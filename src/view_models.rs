use std::collections::HashMap;

use crate::backend::ScoreRow;

/// Fila del ranking de la clase, ya agregada y lista para pintar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub student_id: String,
    pub full_name: String,
    pub total_score: u32,
}

/// Agrega las puntuaciones guardadas por alumno y las ordena de mayor a
/// menor (a igual puntuación, por nombre). Las filas sin corregir
/// (`score == None`, ensayos pendientes) no suman.
pub fn standings(rows: &[ScoreRow]) -> Vec<LeaderboardEntry> {
    let mut by_student: HashMap<&str, LeaderboardEntry> = HashMap::new();

    for row in rows {
        let entry = by_student
            .entry(row.student_id.as_str())
            .or_insert_with(|| LeaderboardEntry {
                student_id: row.student_id.clone(),
                full_name: String::new(),
                total_score: 0,
            });
        entry.total_score += row.score.unwrap_or(0);
        if entry.full_name.is_empty() {
            if let Some(user) = &row.users {
                entry.full_name = user.full_name.clone();
            }
        }
    }

    let mut entries: Vec<_> = by_student.into_values().collect();
    entries.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then_with(|| a.full_name.cmp(&b.full_name))
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ScoreUser;

    fn row(student: &str, name: &str, score: Option<u32>) -> ScoreRow {
        ScoreRow {
            student_id: student.into(),
            score,
            users: Some(ScoreUser {
                full_name: name.into(),
            }),
        }
    }

    #[test]
    fn suma_por_alumno_y_ordena_descendente() {
        let rows = vec![
            row("s1", "Ana", Some(2)),
            row("s2", "Blas", Some(1)),
            row("s1", "Ana", Some(3)),
            row("s2", "Blas", Some(1)),
        ];

        let entries = standings(&rows);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].full_name, "Ana");
        assert_eq!(entries[0].total_score, 5);
        assert_eq!(entries[1].total_score, 2);
    }

    #[test]
    fn los_ensayos_sin_corregir_no_suman() {
        let rows = vec![row("s1", "Ana", Some(4)), row("s1", "Ana", None)];
        let entries = standings(&rows);
        assert_eq!(entries[0].total_score, 4);
    }

    #[test]
    fn empates_ordenados_por_nombre() {
        let rows = vec![
            row("s1", "Carmen", Some(3)),
            row("s2", "Andrés", Some(3)),
        ];
        let entries = standings(&rows);
        assert_eq!(entries[0].full_name, "Andrés");
        assert_eq!(entries[1].full_name, "Carmen");
    }
}

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grading::{Component, Score, StudentRecord};

/// Column group shared by every student: one maximum score per item and the
/// weight of the whole group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeadComponent {
    #[serde(default)]
    pub label: Option<String>,
    pub scores: Vec<Score>,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudentRow {
    #[serde(default)]
    pub name: Option<String>,
    /// One score list per head component, same order.
    pub components: Vec<Vec<Score>>,
}

/// A class sheet as exchanged with the outside world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassSheet {
    #[serde(default)]
    pub name: Option<String>,
    pub head_components: Vec<HeadComponent>,
    #[serde(default)]
    pub students: Vec<StudentRow>,
}

impl ClassSheet {
    /// Reference components: each head's maximum scores as a component whose
    /// highest total is their sum.
    pub fn head_components(&self) -> Result<Vec<Component>> {
        self.head_components
            .iter()
            .map(|head| Component::new(head.scores.clone(), head.weight, None, head.label.clone()))
            .collect()
    }

    /// Build every student's record. Weight and ceiling come from the head
    /// component at the same position; a student's score list is cut or
    /// padded with `Missing` to the head's length.
    pub fn student_records(&self) -> Result<Vec<StudentRecord>> {
        let heads = self.head_components()?;
        self.students
            .iter()
            .map(|student| {
                let components = heads
                    .iter()
                    .enumerate()
                    .map(|(i, head)| {
                        let mut scores = student.components.get(i).cloned().unwrap_or_default();
                        scores.resize(head.scores().len(), Score::Missing);
                        Component::new(
                            scores,
                            head.weight(),
                            Some(head.highest_total_score()),
                            head.label().map(str::to_string),
                        )
                    })
                    .collect::<Result<Vec<_>>>()?;
                StudentRecord::new(student.name.clone(), components)
            })
            .collect()
    }

    /// Write each record's scores back into the matching student row.
    pub fn apply_records(&mut self, records: &[StudentRecord]) {
        for (row, record) in self.students.iter_mut().zip(records) {
            row.components = record
                .components()
                .iter()
                .map(|c| c.scores().to_vec())
                .collect();
        }
    }

    /// Index of the first student whose name matches, ignoring case.
    pub fn find_student(&self, name: &str) -> Option<usize> {
        self.students.iter().position(|s| {
            s.name
                .as_deref()
                .is_some_and(|n| n.trim().eq_ignore_ascii_case(name.trim()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GradeError;

    fn sample_sheet() -> ClassSheet {
        let json = r#"{
            "name": "MTB",
            "head_components": [
                { "label": "Written Works", "scores": [20, 20, 20, 20], "weight": 0.3 },
                { "label": "Performance Tasks", "scores": [5, 5, 5, 5], "weight": 0.7 }
            ],
            "students": [
                { "name": "DELA CRUZ, JUAN", "components": [[18, 18, null], [5, 4, 5, 4]] },
                { "name": "SANTOS, MARIA", "components": [[20, 20, 20, 20]] }
            ]
        }"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_head_components() {
        let heads = sample_sheet().head_components().unwrap();
        assert_eq!(heads.len(), 2);
        assert_eq!(heads[0].highest_total_score(), 80);
        assert_eq!(heads[0].label(), Some("Written Works"));
        assert_eq!(heads[1].highest_total_score(), 20);
        assert_eq!(heads[1].weight(), 0.7);
    }

    #[test]
    fn test_student_records_align_with_heads() {
        let records = sample_sheet().student_records().unwrap();
        assert_eq!(records.len(), 2);

        let juan = &records[0];
        assert_eq!(juan.name(), Some("DELA CRUZ, JUAN"));
        assert_eq!(juan.components()[0].scores().len(), 4);
        assert_eq!(juan.components()[0].scores()[2], Score::Missing);
        assert_eq!(juan.components()[0].scores()[3], Score::Missing);
        assert_eq!(juan.components()[0].highest_total_score(), 80);

        // Missing performance tasks become four missing cells.
        let maria = &records[1];
        assert!(maria.components()[1].scores().iter().all(Score::is_missing));
        assert_eq!(maria.components()[1].highest_total_score(), 20);
    }

    #[test]
    fn test_student_over_ceiling_is_rejected() {
        let mut sheet = sample_sheet();
        sheet.students[0].components[1] = vec![Score::Present(21)];
        let err = sheet.student_records().unwrap_err();
        assert!(matches!(err, GradeError::InvalidScore { .. }));
    }

    #[test]
    fn test_apply_records_writes_scores_back() {
        let mut sheet = sample_sheet();
        let mut records = sheet.student_records().unwrap();
        let replacement = records[1].components()[1].clone();
        let fixed = Component::new(
            vec![Score::Present(5); 4],
            replacement.weight(),
            Some(replacement.highest_total_score()),
            None,
        )
        .unwrap();
        records[1] = StudentRecord::new(
            records[1].name().map(str::to_string),
            vec![records[1].components()[0].clone(), fixed],
        )
        .unwrap();

        sheet.apply_records(&records);
        assert_eq!(sheet.students[1].components[1], vec![Score::Present(5); 4]);
        assert_eq!(sheet.students[0].components[0].len(), 4);
    }

    #[test]
    fn test_find_student() {
        let sheet = sample_sheet();
        assert_eq!(sheet.find_student("santos, maria"), Some(1));
        assert_eq!(sheet.find_student("nobody"), None);
    }
}

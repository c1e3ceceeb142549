use std::collections::HashMap;

use entity::sea_orm_active_enums::ExercisesExerciseType;
use itertools::Itertools;
use schemas::exercises::content::FormStructure;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub completion_percentage: i32,
    /// `None` if the submission needs to be graded by a trainer.
    pub score: Option<i32>,
}

impl Grade {
    pub fn auto_graded(&self) -> bool {
        self.score.is_some()
    }
}

/// Grades a fresh submission.
///
/// Forms are scored only if every question carries a `correct_answer`. All
/// other exercise types are completed by submitting.
pub fn grade(
    exercise_type: ExercisesExerciseType,
    form: &FormStructure,
    answers: &HashMap<String, Value>,
    points: i32,
) -> Grade {
    match exercise_type {
        ExercisesExerciseType::Form => grade_form(form, answers, points),
        _ => Grade {
            completion_percentage: 100,
            score: Some(points),
        },
    }
}

pub fn grade_form(form: &FormStructure, answers: &HashMap<String, Value>, points: i32) -> Grade {
    let questions = form
        .questions
        .iter()
        .filter_map(|question| Some((question_id(question)?, question)))
        .collect::<Vec<_>>();
    if questions.is_empty() {
        return Grade {
            completion_percentage: 100,
            score: None,
        };
    }
    let total = questions.len();

    let answered = questions
        .iter()
        .filter(|(id, _)| answers.get(id).is_some_and(is_answered))
        .count();
    let completion_percentage = (answered * 100 / total) as i32;

    let keys = questions
        .iter()
        .map(|(id, question)| Some((id, question.get("correct_answer")?)))
        .collect::<Option<Vec<_>>>();
    let score = keys.map(|keys| {
        let correct = keys
            .into_iter()
            .filter(|(id, key)| answers.get(*id).is_some_and(|answer| matches(answer, key)))
            .count();
        (points as f64 * correct as f64 / total as f64).round() as i32
    });

    Grade {
        completion_percentage,
        score,
    }
}

fn question_id(question: &Value) -> Option<String> {
    match question.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn is_answered(answer: &Value) -> bool {
    match answer {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Text answers are compared case-insensitively and without surrounding
/// whitespace, lists without regard to order. Every item of a key list can
/// only be matched once.
fn matches(answer: &Value, key: &Value) -> bool {
    match (answer, key) {
        (Value::String(a), Value::String(k)) => a.trim().eq_ignore_ascii_case(k.trim()),
        (Value::Array(a), Value::Array(k)) => {
            let mut unmatched = k.iter().collect_vec();
            a.len() == k.len()
                && a.iter().all(|x| {
                    match unmatched.iter().position(|y| matches(x, y)) {
                        Some(i) => {
                            unmatched.swap_remove(i);
                            true
                        }
                        None => false,
                    }
                })
        }
        (Value::Number(a), Value::String(k)) | (Value::String(k), Value::Number(a)) => {
            a.to_string() == k.trim()
        }
        _ => answer == key,
    }
}

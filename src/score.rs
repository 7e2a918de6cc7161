//! Mark classification against calibrated grid boundaries.
//!
//! Each detected mark is mapped to a (question, choice) cell by a linear
//! scan over the bound sequences. A question with one classified mark gets
//! that choice; a second mark makes it ambiguous, and ambiguity is sticky
//! for the rest of the run. Marks whose row or column lookup misses fall
//! outside the grid and are ignored without affecting other questions.

use crate::geometry::MarkCentroid;
use crate::grid::GridBoundaries;
use log::debug;
use serde::{Deserialize, Serialize};

/// Scoring outcome for one question.
///
/// The legacy report format collapses [`Answer::Unanswered`] and
/// [`Answer::Ambiguous`] to the same `-1`; keep them distinct everywhere
/// else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Unanswered,
    Answered(usize),
    Ambiguous,
}

impl Answer {
    /// Legacy integer encoding used by the report file: the choice index,
    /// or -1 for both unanswered and ambiguous questions.
    pub fn report_value(&self) -> i32 {
        match self {
            Answer::Answered(choice) => *choice as i32,
            Answer::Unanswered | Answer::Ambiguous => -1,
        }
    }
}

/// Scores detected marks against the grid, one [`Answer`] per question.
///
/// Marks are processed in reading order (ascending y); the order changes
/// nothing semantically but keeps runs reproducible.
pub fn score_marks(marks: &[MarkCentroid], boundaries: &GridBoundaries) -> Vec<Answer> {
    let mut answers = vec![Answer::Unanswered; boundaries.question_count()];

    let mut ordered: Vec<&MarkCentroid> = marks.iter().collect();
    ordered.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal));

    let mut outside = 0usize;
    for mark in ordered {
        let (Some(question), Some(choice)) = (
            boundaries.row_index(mark.y),
            boundaries.column_index(mark.x),
        ) else {
            outside += 1;
            continue;
        };
        answers[question] = match answers[question] {
            Answer::Unanswered => Answer::Answered(choice),
            // Two or more marks: invalid, and it stays invalid.
            Answer::Answered(_) | Answer::Ambiguous => Answer::Ambiguous,
        };
    }
    if outside > 0 {
        debug!("score: ignored {outside} mark(s) outside the grid");
    }
    answers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CropRect;

    fn boundaries() -> GridBoundaries {
        GridBoundaries {
            crop: CropRect::new(0.0, 0.0, 150.0, 160.0),
            column_bounds: vec![30.0, 60.0, 90.0, 120.0],
            row_bounds: vec![50.0, 100.0, 150.0],
        }
    }

    fn mark(x: f32, y: f32) -> MarkCentroid {
        MarkCentroid { x, y }
    }

    #[test]
    fn single_mark_scores_its_cell() {
        let answers = score_marks(&[mark(45.0, 20.0)], &boundaries());
        assert_eq!(
            answers,
            vec![Answer::Answered(1), Answer::Unanswered, Answer::Unanswered]
        );
    }

    #[test]
    fn first_column_and_first_row() {
        let answers = score_marks(&[mark(10.0, 20.0)], &boundaries());
        assert_eq!(answers[0], Answer::Answered(0));
    }

    #[test]
    fn two_marks_on_one_question_are_ambiguous() {
        let answers = score_marks(&[mark(45.0, 20.0), mark(75.0, 20.0)], &boundaries());
        assert_eq!(
            answers,
            vec![Answer::Ambiguous, Answer::Unanswered, Answer::Unanswered]
        );
    }

    #[test]
    fn ambiguity_is_sticky_and_order_independent() {
        let marks = [mark(45.0, 20.0), mark(75.0, 20.0), mark(45.0, 22.0)];
        let forward = score_marks(&marks, &boundaries());
        assert_eq!(forward[0], Answer::Ambiguous);

        let mut shuffled = marks;
        shuffled.swap(0, 2);
        shuffled.swap(1, 2);
        let reordered = score_marks(&shuffled, &boundaries());
        assert_eq!(reordered[0], Answer::Ambiguous);
    }

    #[test]
    fn mark_outside_all_bounds_is_ignored() {
        let answers = score_marks(&[mark(200.0, 200.0)], &boundaries());
        assert_eq!(answers, vec![Answer::Unanswered; 3]);
    }

    #[test]
    fn mark_with_valid_row_but_no_column_is_ignored() {
        let keep = score_marks(&[mark(45.0, 20.0), mark(140.0, 22.0)], &boundaries());
        assert_eq!(keep[0], Answer::Answered(1), "stray x must not clobber");
    }

    #[test]
    fn mark_on_a_row_bound_goes_to_the_next_row() {
        let answers = score_marks(&[mark(45.0, 50.0)], &boundaries());
        assert_eq!(
            answers,
            vec![Answer::Unanswered, Answer::Answered(1), Answer::Unanswered]
        );
    }

    #[test]
    fn report_values_collapse_to_legacy_integers() {
        assert_eq!(Answer::Answered(3).report_value(), 3);
        assert_eq!(Answer::Answered(0).report_value(), 0);
        assert_eq!(Answer::Unanswered.report_value(), -1);
        assert_eq!(Answer::Ambiguous.report_value(), -1);
    }
}

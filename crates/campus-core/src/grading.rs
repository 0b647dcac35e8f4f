//! Final-grade calculation.

use crate::model::{GradeItem, StudentGrade};

/// Score as a percentage of the item's maximum, rounded to a whole number.
pub fn percentage(score: f64, item: &GradeItem) -> f64 {
    (score / item.max_score * 100.0).round()
}

/// Weighted average of one student's percentages over the scored items.
///
/// Items without a recorded score count toward neither the weighted sum nor
/// the total weight. With nothing scored the result is `None`, not zero.
/// `grades` should hold a single student's grades for the course.
pub fn final_grade(items: &[GradeItem], grades: &[StudentGrade]) -> Option<f64> {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for item in items {
        let score = grades
            .iter()
            .find(|g| g.grade_item_id == item.id)
            .and_then(|g| g.score);

        if let Some(score) = score {
            weighted_sum += score / item.max_score * 100.0 * item.weight;
            total_weight += item.weight;
        }
    }

    (total_weight > 0.0).then(|| (weighted_sum / total_weight).round())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GradeItemId, StudentId};

    fn item(id: u64, max_score: f64, weight: f64) -> GradeItem {
        GradeItem {
            id: GradeItemId(id),
            name: format!("item {id}"),
            max_score,
            weight,
        }
    }

    fn grade(item: u64, score: Option<f64>) -> StudentGrade {
        StudentGrade {
            student_id: StudentId(1),
            grade_item_id: GradeItemId(item),
            score,
        }
    }

    #[test]
    fn unscored_items_are_excluded_from_both_sums() {
        let items = [item(1, 20.0, 20.0), item(2, 100.0, 30.0), item(3, 100.0, 50.0)];
        let grades = [grade(1, Some(18.0)), grade(2, None), grade(3, Some(90.0))];

        assert_eq!(final_grade(&items, &grades), Some(90.0));
    }

    #[test]
    fn missing_grade_rows_count_as_unscored() {
        let items = [item(1, 20.0, 20.0), item(2, 100.0, 30.0)];
        let grades = [grade(2, Some(85.0))];

        assert_eq!(final_grade(&items, &grades), Some(85.0));
    }

    #[test]
    fn nothing_scored_is_no_grade() {
        let items = [item(1, 20.0, 20.0), item(2, 100.0, 30.0)];
        assert_eq!(final_grade(&items, &[grade(1, None)]), None);
        assert_eq!(final_grade(&items, &[]), None);
        assert_eq!(final_grade(&[], &[]), None);
    }

    #[test]
    fn zero_score_is_a_grade() {
        let items = [item(1, 10.0, 1.0)];
        assert_eq!(final_grade(&items, &[grade(1, Some(0.0))]), Some(0.0));
    }

    #[test]
    fn result_is_rounded() {
        // (90 * 20 + 85 * 30) / 50 = 87
        let items = [item(1, 20.0, 20.0), item(2, 100.0, 30.0)];
        let grades = [grade(1, Some(18.0)), grade(2, Some(85.0))];
        assert_eq!(final_grade(&items, &grades), Some(87.0));

        let thirds = [item(1, 3.0, 1.0)];
        assert_eq!(final_grade(&thirds, &[grade(1, Some(2.0))]), Some(67.0));
    }

    #[test]
    fn percentage_rounds_to_whole_number() {
        assert_eq!(percentage(18.0, &item(1, 20.0, 1.0)), 90.0);
        assert_eq!(percentage(1.0, &item(1, 3.0, 1.0)), 33.0);
    }
}

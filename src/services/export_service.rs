use crate::models::evaluation::{MAX_CRITERION_SCORE, MAX_TOTAL_SCORE};
use crate::models::session::InterviewSession;
use std::fmt::Write;

pub struct ExportService;

impl ExportService {
    /// Plain-text summary of a finished interview.
    pub fn generate_report(session: &InterviewSession) -> String {
        let count = session.question_count();
        let mut report = String::new();

        let _ = writeln!(report, "Final Scores:");
        let _ = writeln!(
            report,
            "Rubric: {}/{}",
            session.total_rubric(),
            count as u32 * MAX_TOTAL_SCORE
        );
        let _ = writeln!(report, "Passed Questions: {}/{}", session.total_passed(), count);
        report.push('\n');

        let rows = session
            .questions()
            .iter()
            .zip(session.answers())
            .zip(session.evaluations());

        for (i, ((question, answer), evaluation)) in rows.enumerate() {
            let _ = writeln!(report, "Question {}:\n{}\n", i + 1, question);
            let _ = writeln!(report, "Answer:\n{}\n", answer);
            match evaluation {
                Some(evaluation) => {
                    for (name, criterion) in evaluation.rubric.criteria() {
                        let _ = writeln!(report, "{}: {}/{}", name, criterion.score, MAX_CRITERION_SCORE);
                    }
                }
                None => {
                    let _ = writeln!(report, "Not evaluated");
                }
            }
            report.push('\n');
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::difficulty::Difficulty;
    use crate::models::evaluation::{CriterionScore, Evaluation, RubricScores};
    use crate::models::session::SessionConfig;
    use chrono::Utc;

    #[test]
    fn report_lists_totals_and_each_question() {
        let now = Utc::now();
        let mut session = InterviewSession::new(
            SessionConfig {
                question_count: 2,
                ..SessionConfig::default()
            },
            Difficulty::Easy,
            now,
        );
        session.push_question("What is 2+2?".into(), now).unwrap();
        session
            .record_evaluation(
                "4".into(),
                Evaluation::from_rubric(
                    RubricScores {
                        correctness: CriterionScore { score: 4, reason: "right".into() },
                        depth: CriterionScore { score: 2, reason: "thin".into() },
                        relevance: CriterionScore { score: 4, reason: "direct".into() },
                    },
                    vec![],
                    vec![],
                ),
            )
            .unwrap();
        session.advance(now).unwrap();
        session.push_question("What is 3+3?".into(), now).unwrap();

        let report = ExportService::generate_report(&session);

        assert!(report.starts_with("Final Scores:\nRubric: 10/24\nPassed Questions: 1/2\n\n"));
        assert!(report.contains("Question 1:\nWhat is 2+2?\n\nAnswer:\n4\n\nCorrectness: 4/4\nDepth: 2/4\nRelevance: 4/4\n"));
        assert!(report.contains("Question 2:\nWhat is 3+3?\n\nAnswer:\n\n\nNot evaluated\n"));
    }
}

use crate::models::stage::Stage;
use crate::services::ai_service::ChatMessage;

const OUTPUT_CONTRACT: &str = "**Output Rules**:
- Exactly one question per output.
- The question must end with '?'.
- No markdown formatting and no `**` around the question.
- Do not include the answer.";

const APTITUDE_SYSTEM: &str = "You are an expert in aptitude and logical reasoning questions.

**Rules**:
1. Build every question on a verified mathematical or logical principle.
2. There must be exactly one correct answer.
3. Avoid ambiguous phrasing, subjective interpretation and convoluted scenarios.
4. Rotate across topics instead of defaulting to one: simple interest, clocks, calendars, \
blood relations, time and work, speed and distance, percentages, syllogisms, seating \
arrangements, logical deductions.

**Example**:
Question: A can finish a task in 10 days and B in 15 days. How long do they need working together?
Answer: 6 days";

const CODING_SYSTEM: &str = "You are an expert programmer who writes coding interview problems about {skill}.

**Process**:
1. Pick a core concept of {skill} the problem should exercise.
2. Place it in a concrete real-world or abstract scenario.
3. State the inputs, the expected output and the constraints or edge cases.
4. Give one example with input and output.

**Rules**:
- Use clear, concise language.
- The problem must be solvable in an interview time slot.

**Example**:
Skill: Arrays
Problem: Given an array of integers and a target, which two indices hold numbers that add up to the target?
Example: [2, 7, 11, 15], target = 9 -> [0, 1]";

const TECHNICAL_SYSTEM: &str = "You are a technical interviewer for {role} positions.

Examine {skill} through these lenses:
1. Core theory: fundamental principles and foundations.
2. System dynamics: component interactions, failure cascades, feedback loops.
3. Implementation reality: trade-offs, debugging pain, environment gaps.
4. Evolution: historical solutions, current practice, emerging alternatives.
5. Paradoxes: where standard patterns contradict each other.

**Question design**:
1. Pick two lenses and find the tension between them.
2. Frame it as a concrete scenario that forces a prioritisation.
3. Ask for the second-order consequences of the choice.

**Example**:
Skill: Database Engineering
Question: When would you prioritise ACID compliance over horizontal scalability in a payments system, and how does that choice shape disaster recovery?

Keep the question under two sentences.";

const BEHAVIORAL_SYSTEM: &str = "You are a behavioral interviewer.

**Process**:
1. Start from the core skill ({skill}) and find a realistic workplace challenge.
2. Frame the challenge as a past experience the candidate can describe.
3. Tailor the depth to the role ({role}), junior or senior.

**Example**:
Core skill: Communication
Role: Junior Developer
Question: Describe a time you had to explain a technical concept to a non-technical colleague. How did you make sure they understood?

**Rules**:
- No hypotheticals such as \"Imagine...\".
- Use the \"Describe a time...\" or \"Tell me about...\" form.
- Keep it under two sentences.";

const EVALUATION_TEMPLATE: &str = r#"Evaluate the interview answer strictly against this rubric (each criterion scored 0-4):
1. Correctness:
   - 4: fully accurate, no technical errors, covers every aspect
   - 3: mostly correct, minor details missing
   - 2: partially correct with significant gaps
   - 0: fundamentally incorrect
2. Depth:
   - 4: advanced concepts, examples, trade-offs and edge cases
   - 3: good detail, some aspects missing
   - 2: basic explanation only
   - 1: superficial
3. Relevance:
   - 4: addresses every part of the question
   - 3: mostly relevant, minor tangents
   - 2: partially relevant
   - 1: off-topic

Depth checklist:
- concrete examples or code
- performance implications
- trade-offs and limitations
- edge cases

Question: {question}
Answer: {answer}

Reply with a single JSON object of this shape:
{
  "rubric": {
    "correctness": {"score": 0-4, "reason": "technical evaluation"},
    "depth": {"score": 0-4, "reason": "depth analysis against the checklist"},
    "relevance": {"score": 0-4, "reason": "relevance check"}
  },
  "strengths": ["key strengths"],
  "suggestions": ["specific improvements"],
  "total_score": "sum of the three scores"
}"#;

/// Numbered list of the five most recent questions, for context only.
pub fn existing_questions_context(existing: &[String]) -> String {
    if existing.is_empty() {
        return "No existing questions".to_string();
    }
    let start = existing.len().saturating_sub(5);
    let list = existing[start..]
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Existing questions:\n{}", list)
}

pub fn question_messages(
    stage: Stage,
    role: &str,
    skill: &str,
    hint: &str,
    existing_context: &str,
) -> Vec<ChatMessage> {
    let (system, request) = match stage {
        Stage::Aptitude => (
            APTITUDE_SYSTEM.to_string(),
            "Generate one aptitude or logical reasoning question.".to_string(),
        ),
        Stage::Coding => (
            CODING_SYSTEM.replace("{skill}", skill),
            format!("Generate a coding problem about {}.", skill),
        ),
        Stage::Technical => (
            TECHNICAL_SYSTEM.replace("{role}", role).replace("{skill}", skill),
            format!("Create a {} question using the knowledge lenses.", skill),
        ),
        Stage::Behavioral => (
            BEHAVIORAL_SYSTEM.replace("{role}", role).replace("{skill}", skill),
            format!("Create a behavioral question about {} for {}.", skill, role),
        ),
    };

    let mut user = request;
    if !hint.is_empty() {
        user.push(' ');
        user.push_str(hint);
    }
    user.push_str("\n\n");
    user.push_str(existing_context);

    vec![
        ChatMessage::system(format!("{}\n\n{}", system, OUTPUT_CONTRACT)),
        ChatMessage::user(user),
    ]
}

pub fn evaluation_messages(question: &str, answer: &str) -> Vec<ChatMessage> {
    let prompt = EVALUATION_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer);
    vec![ChatMessage::user(prompt)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_keeps_last_five_questions() {
        let existing: Vec<String> = (1..=7).map(|i| format!("Q{}?", i)).collect();
        let context = existing_questions_context(&existing);
        assert!(context.starts_with("Existing questions:\n1. Q3?"));
        assert!(context.ends_with("5. Q7?"));
        assert!(!context.contains("Q2?"));
        assert_eq!(existing_questions_context(&[]), "No existing questions");
    }

    #[test]
    fn templates_interpolate_role_and_skill_per_stage() {
        let technical = question_messages(Stage::Technical, "Cloud Engineer", "AWS", "", "ctx");
        assert!(technical[0].content.contains("Cloud Engineer positions"));
        assert!(technical[1].content.contains("AWS"));

        let coding = question_messages(Stage::Coding, "Cloud Engineer", "Go", "", "ctx");
        assert!(coding[0].content.contains("about Go"));
        assert!(!coding[0].content.contains("Cloud Engineer"));

        let aptitude = question_messages(Stage::Aptitude, "Select", "Aptitude", "", "ctx");
        assert!(!aptitude[0].content.contains("{"));
        for messages in [&technical, &coding, &aptitude] {
            assert!(messages[0].content.contains("must end with '?'"));
        }
    }

    #[test]
    fn hint_and_context_land_in_user_message() {
        let messages = question_messages(
            Stage::Behavioral,
            "Game Developer",
            "Unity",
            "(Focus on basic concepts)",
            "No existing questions",
        );
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.contains("(Focus on basic concepts)"));
        assert!(messages[1].content.ends_with("No existing questions"));
    }

    #[test]
    fn evaluation_prompt_embeds_question_and_answer() {
        let messages = evaluation_messages("What is TCP?", "A transport protocol");
        assert!(messages[0].content.contains("Question: What is TCP?"));
        assert!(messages[0].content.contains("Answer: A transport protocol"));
        assert!(messages[0].content.contains("\"rubric\""));
    }
}

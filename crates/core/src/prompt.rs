//! Prompt construction for interview question generation.

use crate::form::InterviewForm;

/// Number of questions requested when not configured otherwise.
pub const DEFAULT_QUESTION_COUNT: u32 = 5;

/// Build the generation prompt for `form`, asking for `count` questions.
pub fn build_question_prompt(form: &InterviewForm, count: u32) -> String {
    format!(
        "As an experienced prompt engineer, generate a JSON array containing {count} technical \
         interview questions along with detailed answers based on the following job information. \
         Each object in the array should have the fields \"question\" and \"answer\".\n\
         \n\
         Job Information:\n\
         - Job Position: {position}\n\
         - Job Description: {description}\n\
         - Years of Experience Required: {experience}\n\
         - Tech Stacks: {tech_stack}\n\
         \n\
         The questions should assess skills in {tech_stack} development and best practices, \
         problem-solving, and experience handling complex requirements. Return only the JSON array.",
        position = form.position,
        description = form.description,
        experience = form.experience,
        tech_stack = form.tech_stack,
    )
}

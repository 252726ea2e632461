//! Prompt templates sent to the model.
//!
//! Each renderer is a pure function of its inputs; the orchestrator owns the
//! network call.

/// Phrase the model is told to use when the course material does not contain
/// the answer.
pub const NOT_SURE_ANSWER: &str = "I'm not sure, please provide more information.";

/// Keys the syllabus analysis prompt asks for, in prompt order.
pub const ANALYSIS_FIELDS: [&str; 4] = [
    "course_name",
    "course_objectives",
    "main_topics",
    "grading_breakdown",
];

pub fn syllabus_analysis(syllabus: &str) -> String {
    let fields: String = ANALYSIS_FIELDS.iter().map(|f| format!("- {f}:\n")).collect();
    format!(
        "You are a helpful AI study assistant. Here is the syllabus for a course:\n\
         ```\n\
         {syllabus}\n\
         ```\n\
         Please analyze the syllabus and provide the following information in a JSON format:\n\
         {fields}"
    )
}

/// `analysis_json` is the syllabus analysis already rendered as JSON.
pub fn roadmap(analysis_json: &str, content: &str) -> String {
    format!(
        "You are a helpful AI study assistant.\n\
         Given this course syllabus analysis:\n\
         ```json\n\
         {analysis_json}\n\
         ```\n\
         and the course content:\n\
         ```\n\
         {content}\n\
         ```\n\
         Please create a detailed study roadmap to help students succeed in the course.\n\
         The roadmap should include:\n\
         - A week-by-week or topic-by-topic breakdown of material.\n\
         - Suggestions for readings, practice problems, and other resources.\n\
         - Tips for effective studying and time management.\n"
    )
}

pub fn question_answer(question: &str, context: &str) -> String {
    format!(
        "You are a helpful AI study assistant. Answer the question based on the context provided.\n\
         If the answer cannot be found in the context, say \"{NOT_SURE_ANSWER}\"\n\
         \n\
         Context:\n\
         {context}\n\
         Question: {question}\n\
         Answer:\n"
    )
}

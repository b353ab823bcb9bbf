//! Prompt assembly.
//!
//! Every request to the model is two messages: the fixed tutor instruction
//! and one user turn built here. Nothing is truncated; the history slice is
//! the only bound.

use std::fmt::Write;
use tutorly_core::message::Message;
use tutorly_core::profile::Profile;
use tutorly_core::session::Session;

/// The fixed system instruction sent with every request.
pub const SYSTEM_PROMPT: &str = "You are an intelligent, friendly, and highly adaptable teaching assistant. \
Your mission is to help learners of all ages and skill levels, from complete beginners to seasoned professionals, \
learn Python, Data Science, and Artificial Intelligence. \
Explain concepts clearly using real-world analogies, worked examples, and short exercises. \
Adapt to the learner's level and pace, and suggest next steps that fit their goals. \
Keep responses structured, engaging, and supportive, and format them as Markdown. \
You can explain code snippets, write exercises and quizzes, and recommend projects. \
Avoid unnecessary jargon; build up complex ideas in small, digestible steps.";

fn profile_block(out: &mut String, profile: &Profile) {
    let _ = writeln!(out, "Learner profile:");
    let _ = writeln!(out, "- Age: {}", profile.age.trim());
    let _ = writeln!(out, "- Goals: {}", profile.goals.trim());
    let _ = writeln!(out, "- Knowledge level: {}", profile.knowledge_level);
    if !profile.interests.trim().is_empty() {
        let _ = writeln!(out, "- Interests: {}", profile.interests.trim());
    }
    let _ = writeln!(out, "- Study time per day: {}", profile.study_time);
    let _ = writeln!(out, "- Learning style: {}", profile.learning_style);
    out.push('\n');
}

/// The user turn for a chat message.
///
/// Profile summary (when the session has one), then up to `history_window`
/// earlier exchanges most recent first, then the new message.
pub fn chat_turn(session: &Session, message: &str, history_window: usize) -> String {
    let mut out = String::new();

    if let Some(profile) = &session.profile {
        profile_block(&mut out, profile);
    }

    let mut recent = session.recent_history(history_window).peekable();
    if recent.peek().is_some() {
        let _ = writeln!(out, "Recent conversation (most recent first):");
        for exchange in recent {
            let _ = writeln!(out, "Q: {}", exchange.question.trim());
            let _ = writeln!(out, "A: {}", exchange.answer.trim());
        }
        out.push('\n');
    }

    let _ = write!(out, "Current question: {}", message.trim());
    out
}

/// The user turn for a Practice tab quiz.
pub fn quiz_turn(profile: &Profile, topic: &str, difficulty: &str, questions: u8) -> String {
    let difficulty = match difficulty.trim() {
        "" => profile.knowledge_level.label().to_lowercase(),
        d => d.to_lowercase(),
    };

    format!(
        "Create a {difficulty} quiz with {questions} questions on \"{topic}\" for a learner whose \
knowledge level is {level}.\n\
Mix multiple-choice and short coding questions. Number each question.\n\
After all the questions, add an \"Answers\" section with the correct answer and a one-sentence \
explanation for each.",
        topic = topic.trim(),
        level = profile.knowledge_level,
    )
}

/// The user turn for a Study Plan tab request.
pub fn plan_turn(profile: &Profile, topic: &str, duration: &str) -> String {
    let duration = match duration.trim() {
        "" => "4 weeks",
        d => d,
    };

    format!(
        "Create a {duration} study plan for learning \"{topic}\".\n\
The learner's goal: {goals}\n\
Knowledge level: {level}\n\
Available study time per day: {time}\n\
Preferred learning style: {style}\n\n\
Break the plan into weeks with daily tasks, include a small hands-on project, and end with a short \
checklist to measure progress.",
        topic = topic.trim(),
        goals = profile.goals.trim(),
        level = profile.knowledge_level,
        time = profile.study_time,
        style = profile.learning_style,
    )
}

/// The two-message exchange sent to the model.
pub fn messages(user_turn: String) -> Vec<Message> {
    vec![Message::system(SYSTEM_PROMPT), Message::user(user_turn)]
}

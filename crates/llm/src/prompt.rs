//! Persona system-prompt building
//!
//! Assembles the generation backend's system instruction from a persona,
//! an interview stage and recent transcript context. Section order is
//! fixed and the builder is a pure function of its inputs: two calls with
//! identical arguments produce byte-identical strings, which keeps prompt
//! output testable and cacheable.

use std::fmt::Write;

use interview_sim_core::{Persona, Stage, Transcript, Turn};

/// How many trailing transcript turns are included as grounding context.
pub const HISTORY_WINDOW: usize = 6;

/// Fixed instruction utterance sent on the approved-question path.
pub const QUESTION_INSTRUCTION: &str = "Ask your one short question now.";

/// Builder for the persona system instruction.
pub struct PromptBuilder<'a> {
    persona: &'a Persona,
    stage: Stage,
    history: &'a [Turn],
    permission_granted: bool,
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder for one persona and stage.
    pub fn new(persona: &'a Persona, stage: Stage) -> Self {
        Self {
            persona,
            stage,
            history: &[],
            permission_granted: false,
        }
    }

    /// Ground the prompt in the last [`HISTORY_WINDOW`] turns.
    pub fn with_history(mut self, transcript: &'a Transcript) -> Self {
        self.history = transcript.recent(HISTORY_WINDOW);
        self
    }

    /// Append the permission-granted directive for the approved-question
    /// call.
    pub fn with_permission_granted(mut self) -> Self {
        self.permission_granted = true;
        self
    }

    /// Render the system instruction.
    pub fn build(self) -> String {
        let persona = self.persona;
        let mut prompt = String::with_capacity(2048);

        let _ = writeln!(
            prompt,
            "You are {}, a {}-year-old {} patient with {}.",
            persona.name, persona.age, persona.gender, persona.diagnosis
        );

        let _ = writeln!(prompt, "\nCURRENT SITUATION: {}", persona.situation(self.stage));

        prompt.push_str("\nCLINICAL STATE:\n");
        let _ = writeln!(prompt, "- Mood: {}", persona.mood);
        let _ = writeln!(prompt, "- Affect: {}", persona.affect);
        let _ = writeln!(prompt, "- Thought Content: {}", persona.thought_content);
        let _ = writeln!(prompt, "- Perceptions: {}", persona.perceptions);
        if let Some(ref delusions) = persona.delusions {
            let _ = writeln!(prompt, "- Delusions: {delusions}");
        }
        if let Some(ref substance_use) = persona.substance_use {
            let _ = writeln!(prompt, "- Substance Use: {substance_use}");
        }
        let _ = writeln!(prompt, "- Sleep: {}", persona.sleep);
        let _ = writeln!(prompt, "- Appetite: {}", persona.appetite);

        prompt.push_str("\nYOUR BACKGROUND:\n");
        let _ = writeln!(prompt, "- {}", persona.background);
        let _ = writeln!(prompt, "- Social: {}", persona.social_history);

        prompt.push_str("\nCOMMUNICATION STYLE:\n");
        for (index, directive) in persona.style_directives(self.stage).iter().enumerate() {
            let _ = writeln!(prompt, "{}. {directive}", index + 1);
        }

        prompt.push_str(
            "\nRESPONSE GUIDELINES:\n\
             - Answer ONLY what is asked; do not elaborate unless prompted\n\
             - If asked about specific symptoms, draw on your clinical state\n\
             - If the student shows empathy, be slightly more forthcoming\n\
             - Maintain consistency with your backstory and symptoms\n\
             - Keep responses realistic in length, usually 1-3 sentences\n",
        );

        prompt.push_str("\nQUESTIONS YOU MIGHT ASK:\n");
        for question in &persona.example_questions {
            let _ = writeln!(prompt, "- {question}");
        }

        prompt.push_str(
            "\nCRITICAL SAFETY RULES:\n\
             - NEVER provide specific methods of self-harm or suicide\n\
             - If the student asks for methods, respond with \"I don't want to talk about that\"\n\
             - If asked whether you have a plan, acknowledge thoughts but never give detail\n",
        );

        prompt.push_str(
            "\nASK-PERMISSION PROTOCOL:\n\
             - Before asking YOUR own question, first ask respectfully: \"Can I ask a question?\" \
             or \"Can I ask you something?\"\n\
             - Wait for approval. Only after approval, ask exactly one short, on-topic question.\n",
        );

        if !self.history.is_empty() {
            prompt.push_str("\nPREVIOUS CONVERSATION CONTEXT:\n");
            for turn in self.history {
                let _ = writeln!(prompt, "{}: {}", turn.speaker, turn.text);
            }
            prompt.push_str("Maintain consistency with what you've already said.\n");
        }

        if self.permission_granted {
            prompt.push_str(
                "\nPERMISSION GRANTED TO ASK A QUESTION:\n\
                 - Ask exactly ONE short, natural question, consistent with your state and stage.\n\
                 - Stay on topic (symptoms, safety, treatment, discharge, family).\n\
                 - Do NOT give advice or reveal self-harm methods.\n\
                 - Keep it to one sentence ending with a question mark.\n",
            );
        }

        prompt.push_str(
            "\nFINAL INSTRUCTIONS:\n\
             - Speak naturally in first person as the patient\n\
             - Show your symptoms through your communication style\n\
             - Never break character, mention that you are an AI, or give medical advice\n",
        );

        prompt
    }
}

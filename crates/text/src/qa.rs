//! Standardized response table and fuzzy lookup
//!
//! Each persona carries a hand-authored, stage-partitioned list of
//! (prompt, reply) pairs taken from the course's training materials. Lookup
//! scores the student's utterance against every prompt for the session's
//! persona and stage and returns the canned reply only when the best score
//! clears the match threshold.

use once_cell::sync::Lazy;
use serde::Serialize;

use interview_sim_core::{PersonaId, Stage};

use crate::similarity::similarity;

/// Minimum similarity for a table answer to be used. Fixed design constant;
/// utterances scoring below this fall through to the generation backend.
pub const MATCH_THRESHOLD: f64 = 0.70;

/// One standardized (prompt, reply) pair, scoped to an interview stage.
#[derive(Debug, Clone, Serialize)]
pub struct QaEntry {
    pub prompt: String,
    pub reply: String,
    pub stage: Stage,
}

impl QaEntry {
    pub fn new(stage: Stage, prompt: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            reply: reply.into(),
            stage,
        }
    }
}

/// A winning table lookup.
#[derive(Debug, Clone)]
pub struct TableMatch {
    /// Canned reply, returned verbatim
    pub reply: String,
    /// The table prompt that won
    pub matched_prompt: String,
    /// Its similarity score
    pub score: f64,
}

/// The compiled-in standardized table for a persona.
pub fn standardized_table(persona: PersonaId) -> &'static [QaEntry] {
    match persona {
        PersonaId::Mdd => &MDD_TABLE,
        PersonaId::Schizophrenia => &SCHIZOPHRENIA_TABLE,
    }
}

/// Fuzzy lookup against the compiled-in table for `persona`.
pub fn lookup(utterance: &str, persona: PersonaId, stage: Stage) -> Option<TableMatch> {
    lookup_in(standardized_table(persona), utterance, stage)
}

/// Fuzzy lookup against an explicit entry list.
///
/// Only entries tagged with `stage` are considered. The best score wins;
/// ties go to the entry that appears first in table order (strictly-greater
/// comparison), so results are stable across calls. Returns `None` when the
/// best score is below [`MATCH_THRESHOLD`], signalling generative fallback.
pub fn lookup_in(entries: &[QaEntry], utterance: &str, stage: Stage) -> Option<TableMatch> {
    let mut best: Option<(&QaEntry, f64)> = None;

    for entry in entries.iter().filter(|e| e.stage == stage) {
        let score = similarity(utterance, &entry.prompt);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((entry, score));
        }
    }

    match best {
        Some((entry, score)) if score >= MATCH_THRESHOLD => {
            tracing::debug!(score, prompt = %entry.prompt, "standardized response matched");
            Some(TableMatch {
                reply: entry.reply.clone(),
                matched_prompt: entry.prompt.clone(),
                score,
            })
        }
        Some((_, score)) => {
            tracing::debug!(score, "no standardized response above threshold");
            None
        }
        None => None,
    }
}

fn entry(stage: Stage, prompt: &str, reply: &str) -> QaEntry {
    QaEntry::new(stage, prompt, reply)
}

static MDD_TABLE: Lazy<Vec<QaEntry>> = Lazy::new(|| {
    use Stage::*;
    vec![
        entry(Acute, "Hi! My name is -----. I'm a student nurse from Pace and I've been assigned to this unit for several weeks.", "Why are you here? I don't feel like talking right now."),
        entry(Acute, "How're you feeling today?", "I feel like I am in a dark hole with no way out. Life is hopeless."),
        entry(Acute, "How would you describe your mood.", "I feel depressed, and I don't care about anything. It is making me very irritated and sad."),
        entry(Acute, "Have there been any changes in your life; any stress?", "Since we moved from my home country to here, I have not been feeling well. I miss my family and friends."),
        entry(Acute, "What are your interests?", "I usually like to spending time with my kids, but I lost my interest lately."),
        entry(Acute, "How's your appetite?", "Not too good; food just isn't appealing."),
        entry(Acute, "Have you lost weight?", "I guess so, all my clothes are loose. My wife also tells me that I lost too much weight."),
        entry(Acute, "Do you have thoughts of harming yourself?", "I think the world would be better without me."),
        entry(Acute, "Do you have a plan?", "I have had some ideas."),
        entry(Acute, "Do you have any specific plan?", "I thought of cutting myself. I tried getting all the pills in my medicine cabinet, but here I am, that did not work."),
        entry(Acute, "Who is your source of support?", "My wife and kids. I have no one here, my whole family is in Syria."),
        entry(Acute, "Do you have a family history of depression?", "No."),
        entry(Acute, "Do you have any medical problems?", "No."),
        entry(Acute, "Do you smoke?", "No."),
        entry(Acute, "Do you use any drugs?", "No."),
        entry(Acute, "Do you take your medications?", "I was started on medication, I really don't think it will help, I have tried it before."),
        entry(Acute, "How many hours do you sleep?", "I wake up every morning at 3am and can't go back to sleep."),
        entry(Acute, "What are you thinking about?", "I miss my kids."),
        entry(Reassessment, "How are you feeling today?", "I am not feeling any better, I feel like my life is worthless."),
        entry(Reassessment, "Do you feel the medications you're taking are working?", "I don't know, it has been 7 days almost that I am in the hospital, I feel no different. I don't want to take medications anymore. I don't think they're working. They increased the dose, but I don't know if that was necessary."),
        entry(Reassessment, "Why are you staying in your room?", "I don't want to be around anyone."),
        entry(Reassessment, "Do you think of harming yourself?", "The world would be better without me."),
        entry(Reassessment, "Has your family been coming to visit you?", "No, my wife has been taking care of the kids and can't really visit. I have no one in this city anyway."),
        entry(Reassessment, "What do you like to do?", "I missed spending time with my kids."),
    ]
});

static SCHIZOPHRENIA_TABLE: Lazy<Vec<QaEntry>> = Lazy::new(|| {
    use Stage::*;
    vec![
        entry(Acute, "Can you tell me a little about why you are here?", "Because of mom. He kept asking me take those poisonous medications. He should be the one who should take these meds."),
        entry(Acute, "Are you close to your mother?", "Yes, but sometimes he does not understand me. He made me come here."),
        entry(Acute, "Can you tell me why you stopped taking your medication?", "The medications are poison. The angels told me not to take them anymore. I saw a bright light; a crashing sound and I just knew that they are trying to poison me. I am the chosen one. Don't you know who I am?"),
        entry(Acute, "Does the voice tell you to do things ever?", "Don't worry, I won't tell them who you are. You are good people I can tell. You're nice, kind of like a spy. Did you know the government is spying on your basement? Oh yeah, it's true. Ever since 1968, they've had little radar machines down there that smell and taste like bananas and they put listening device in them."),
        entry(Acute, "How often do you hear the voice?", "Only when I am awake, my angels sing to me and speak to me. Sometimes God also speaks to me."),
        entry(Acute, "How are you feeling?", "I feel fine. I have God on my side."),
        entry(Acute, "Do the voices ever tell you to do bad things?", "Never! They only tell me positive things. It's my coworkers."),
        entry(Acute, "Do you see things that no one else in the room sees?", "No. My angels and God only speak to me every day. I am not that worthy to see them."),
        entry(Acute, "Have you ever tried to hurt yourself in the past?", "No never."),
        entry(Acute, "Have you ever had the feelings of hurting others?", "I don't want to hurt anyone. You're silly."),
        entry(Acute, "Have you ever been physically violent?", "I had to wrestle my cat once. Meow. I won. I put a spell on him and told him to be nice. Silly cat."),
        entry(Acute, "What kind of work do you do?", "I work as a film director at a large company."),
        entry(Acute, "How is your work going?", "Work is great. Some people there may not go to heaven though. I try to talk to them, save them but they don't want to hear me. So, I put my hands up and can I get a bismillah!"),
        entry(Acute, "How is your level concentration and memory?", "My memory? What's the matter with my memory? The government gave me a memory device when I was young. They micro chipped me. God said he talks to me through this chip. That's why I'm the chosen one and I am going to make a difference."),
        entry(Acute, "Do you use drugs or alcohol?", "I use drugs and alcohol. I have no choice. I have to calm my mind. The voices will not stop. They will not leave me alone. They want me to listen but I don't have a choice!"),
        entry(Acute, "Are you experiencing any side effects from your medication?", "These poisons are making me anxious. I can't stay still. Can't you see I can't stop moving? Its like I got marching ants. I keep fidgeting, moving my legs shaking, my hands and fingers moving. I feel strange like I should be moving or something. Why can't I just sit still?"),
        entry(Acute, "Do you have homicidal ideation?", "Never I would never hurt anyone. People need to be protected. Angels protect us. That's what I do."),
        entry(Acute, "Do you have suicidal ideation?", "No, God has chosen me. I am not going anywhere. I am the chosen one."),
        entry(Reassessment, "Hi there! My name is…. I am a nursing student from…. I would like to talk to you. Is that okay with you?", "I am okay. I am not as anxious as I was a week ago. I am starting to feel better."),
        entry(Reassessment, "Can you tell me why you think you are here?", "I am here because sometimes my mother does not understand me. I hear the voices, which sometimes it is louder, and it makes me do things that I usually don't do. When my mother doesn't let me do the things that the voices tells me to do, I get angry at her and then she makes me come here. This time I got angry with her and I may have thrown the TV remote at her."),
        entry(Reassessment, "How are you feeling today?", "I am doing better."),
        entry(Reassessment, "How are the medicines you're taking, how do they make you feel?", "They changed my medications. The doctors said my medications made me fidgety. These new ones are not making me as anxious. I don't shake as much anymore. Maybe these are not poison."),
        entry(Reassessment, "Are the voices you described to me before still present? Do you still hear them?", "Sometime I still hear them but not as often. The doctors and nurses here have been very kind and helpful."),
        entry(Reassessment, "Have you taken any drugs or alcohol since you've been here?", "No, I don't need them as much anymore. I feel calmer now."),
        entry(Reassessment, "What do you think will happen when you go home?", "I will go to my outpatient clinic and see the doctors. I am also going to follow up with therapy sessions. I want to be better. I don't want to upset my mother."),
        entry(Reassessment, "Do you think you will take your medications?", "Yes, I will try to. I mean they are helping me. At least I think they are now."),
        entry(Reassessment, "Are you hopeful for your future?", "Yes, I am going to get better. I want a job. A real job. I want to help people."),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Vec<QaEntry> {
        vec![
            QaEntry::new(
                Stage::Acute,
                "How are you feeling today?",
                "I still feel like I'm in a dark hole.",
            ),
            QaEntry::new(Stage::Acute, "Do you have a plan?", "I have had some ideas."),
            QaEntry::new(
                Stage::Reassessment,
                "How are you feeling today?",
                "A little better, I think.",
            ),
        ]
    }

    #[test]
    fn test_exact_prompt_matches_at_one() {
        let table = sample_table();
        let hit = lookup_in(&table, "How are you feeling today?", Stage::Acute).unwrap();
        assert_eq!(hit.score, 1.0);
        assert_eq!(hit.reply, "I still feel like I'm in a dark hole.");
    }

    #[test]
    fn test_fuzzy_utterance_clears_threshold() {
        let table = sample_table();
        let hit = lookup_in(&table, "how r u feeling today", Stage::Acute).unwrap();
        assert!(hit.score >= MATCH_THRESHOLD);
        assert_eq!(hit.matched_prompt, "How are you feeling today?");
    }

    #[test]
    fn test_unrelated_utterance_falls_through() {
        let table = sample_table();
        assert!(lookup_in(&table, "What time is dinner?", Stage::Acute).is_none());
    }

    #[test]
    fn test_stage_isolation() {
        let table = sample_table();
        let hit = lookup_in(&table, "How are you feeling today?", Stage::Reassessment).unwrap();
        // Must be the reassessment entry, never the acute one
        assert_eq!(hit.reply, "A little better, I think.");

        let only_acute = vec![QaEntry::new(
            Stage::Acute,
            "Do you have a plan?",
            "I have had some ideas.",
        )];
        assert!(lookup_in(&only_acute, "Do you have a plan?", Stage::Reassessment).is_none());
    }

    #[test]
    fn test_tie_break_prefers_first_entry() {
        let table = vec![
            QaEntry::new(Stage::Acute, "Do you sleep well?", "first reply"),
            QaEntry::new(Stage::Acute, "Do you sleep well?", "second reply"),
        ];
        let hit = lookup_in(&table, "Do you sleep well?", Stage::Acute).unwrap();
        assert_eq!(hit.reply, "first reply");
    }

    #[test]
    fn test_lookup_is_deterministic() {
        let table = sample_table();
        let a = lookup_in(&table, "how are you feeling", Stage::Acute).map(|m| (m.reply, m.score));
        let b = lookup_in(&table, "how are you feeling", Stage::Acute).map(|m| (m.reply, m.score));
        assert_eq!(a, b);
    }

    #[test]
    fn test_compiled_tables_are_stage_partitioned() {
        for persona in PersonaId::all() {
            let table = standardized_table(persona);
            assert!(table.iter().any(|e| e.stage == Stage::Acute));
            assert!(table.iter().any(|e| e.stage == Stage::Reassessment));
        }
    }
}

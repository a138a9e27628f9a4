//! Word session report
//!
//! Builds a .docx debrief document at session end: session information,
//! the full transcript with per-turn provenance tags, response statistics
//! and the student's self-evaluation.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use docx_rs::{Docx, Paragraph, Run, Style, StyleType};

use interview_sim_core::{ResponseSource, Speaker, Stage, Turn};

use crate::{PersistenceError, Result};

/// Session metadata rendered into the report header.
pub struct ReportMeta<'a> {
    pub session_id: &'a str,
    pub username: &'a str,
    pub persona_name: &'a str,
    pub stage: Stage,
    pub vas_score: f64,
    pub reflection: &'a str,
}

/// Label for a VAS-CSC self-confidence score.
pub fn confidence_level(score: f64) -> &'static str {
    if score >= 9.0 {
        "Very High Confidence"
    } else if score >= 7.0 {
        "High Confidence"
    } else if score >= 5.0 {
        "Moderate Confidence"
    } else if score >= 3.0 {
        "Low Confidence"
    } else {
        "Very Low Confidence"
    }
}

/// Write the session report into `dir`, returning the file path.
pub fn write_session_report(dir: &Path, meta: &ReportMeta, turns: &[Turn]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let filename = format!(
        "Interview_Report_{}_{}_{}.docx",
        meta.username,
        meta.session_id,
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(filename);

    let docx = build_report(meta, turns);
    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| PersistenceError::Docx(e.to_string()))?;
    fs::write(&path, buf.into_inner())?;

    tracing::info!(path = %path.display(), "session report written");
    Ok(path)
}

fn build_report(meta: &ReportMeta, turns: &[Turn]) -> Docx {
    let mut docx = Docx::new()
        .add_style(heading_style("Heading1", "heading 1", 32))
        .add_style(heading_style("Heading2", "heading 2", 26));

    docx = docx.add_paragraph(heading("Psychiatric Interview Session Report", "Heading1"));

    docx = docx.add_paragraph(heading("Session Information", "Heading2"));
    for (label, value) in [
        ("Session ID", meta.session_id.to_string()),
        ("Student", meta.username.to_string()),
        ("Patient", meta.persona_name.to_string()),
        ("Interview Stage", meta.stage.display_name().to_string()),
        ("VAS-CSC Score", format!("{}/10", meta.vas_score)),
        (
            "Self-Confidence Level",
            confidence_level(meta.vas_score).to_string(),
        ),
    ] {
        docx = docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(format!("{label}: ")).bold())
                .add_run(Run::new().add_text(value)),
        );
    }

    docx = docx.add_paragraph(heading("Interview Transcript", "Heading2"));
    for turn in turns {
        docx = docx.add_paragraph(transcript_paragraph(meta, turn));
    }

    let standardized = count_source(turns, ResponseSource::Table);
    let generated = count_source(turns, ResponseSource::Generated);
    let student_turns = turns.iter().filter(|t| t.speaker == Speaker::Student).count();

    docx = docx.add_paragraph(heading("Session Statistics", "Heading2"));
    for line in [
        format!("Student questions/statements: {student_turns}"),
        format!("Patient responses: {}", standardized + generated),
        format!("Standardized responses used: {standardized}"),
        format!("Generated responses: {generated}"),
    ] {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }

    docx = docx.add_paragraph(heading("Self-Reflection Notes", "Heading2"));
    let reflection = if meta.reflection.trim().is_empty() {
        "No reflection notes provided."
    } else {
        meta.reflection
    };
    docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(reflection)))
}

fn transcript_paragraph(meta: &ReportMeta, turn: &Turn) -> Paragraph {
    let speaker = match turn.speaker {
        Speaker::Student => format!("{}: ", meta.username),
        Speaker::Patient => format!("{}: ", meta.persona_name),
    };

    let mut paragraph = Paragraph::new().add_run(Run::new().add_text(speaker).bold());

    if let Some(source) = turn.source {
        let tag = match source {
            ResponseSource::Table => "[standardized] ",
            ResponseSource::Generated => "[generated] ",
        };
        paragraph = paragraph.add_run(Run::new().add_text(tag).size(16));
    }

    paragraph.add_run(Run::new().add_text(turn.text.as_str()))
}

fn count_source(turns: &[Turn], source: ResponseSource) -> usize {
    turns.iter().filter(|t| t.source == Some(source)).count()
}

fn heading_style(style_id: &str, name: &str, size_half_points: usize) -> Style {
    Style::new(style_id, StyleType::Paragraph)
        .name(name)
        .size(size_half_points)
}

fn heading(text: &str, style_id: &str) -> Paragraph {
    Paragraph::new()
        .style(style_id)
        .add_run(Run::new().add_text(text))
}

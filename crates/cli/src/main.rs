//! Terminal driver for the interview simulator
//!
//! Presentation glue only: registration, persona/stage selection, the
//! submit/approve/decline loop, and the end-of-session artifacts. All
//! decision logic lives in the library crates.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use interview_sim_agent::{AgentError, InterviewAgent, ResponseResolver, Session};
use interview_sim_config::{load_settings, Settings};
use interview_sim_core::{PersonaId, ResponseSource, Stage};
use interview_sim_llm::{BackoffPolicy, GeminiBackend, GeminiConfig};
use interview_sim_persistence::{
    write_session_report, ProfileStore, ReportMeta, SessionLogger, SessionSummary, UserProfile,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config_path = std::env::var_os("INTERVIEW_SIM_CONFIG").map(PathBuf::from);
    let settings = load_settings(config_path.as_deref()).context("loading settings")?;

    let backend = GeminiBackend::new(GeminiConfig {
        model: settings.llm.model.clone(),
        endpoint: settings.llm.endpoint.clone(),
        api_key: settings.llm.api_key.clone(),
        timeout: Duration::from_secs(settings.llm.timeout_seconds),
    })
    .context("creating generation backend")?;

    let resolver = ResponseResolver::new(backend).with_policy(BackoffPolicy {
        max_attempts: settings.llm.max_attempts,
        base_delay: Duration::from_secs(settings.llm.base_backoff_seconds),
    });
    let agent = InterviewAgent::with_resolver(resolver);

    let profiles = ProfileStore::new(&settings.storage.users_dir)?;
    let profile = login_or_register(&profiles)?;
    println!("Welcome, {}!", profile.nickname);

    let persona_id = choose_persona()?;
    let stage = choose_stage()?;

    let mut session = Session::new(&profile.username, persona_id, stage);
    let persona = session.persona();
    println!(
        "\nInterview with {} ({}), stage: {}. Session {}.",
        persona.name,
        persona.diagnosis,
        stage.display_name(),
        session.id()
    );
    println!("Type your questions. Commands: /approve, /decline, /end\n");

    let logger = SessionLogger::create(
        &settings.storage.log_dir,
        session.id(),
        session.username(),
        &persona.name,
        stage,
    )?;

    run_interview(&agent, &mut session, &logger).await?;
    finish_session(&settings, &profiles, &profile, &session, &logger)?;
    Ok(())
}

async fn run_interview(
    agent: &InterviewAgent<GeminiBackend>,
    session: &mut Session,
    logger: &SessionLogger,
) -> Result<()> {
    let stdin = io::stdin();
    loop {
        prompt_marker(session)?;
        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        match input {
            "" => continue,
            "/end" => break,
            "/approve" => match agent.approve(session).await {
                Ok(turn) => {
                    logger.log_turn(&turn)?;
                    print_patient_turn(session, &turn.text, turn.source);
                }
                Err(AgentError::NoPendingPermission) => {
                    println!("(no permission request is pending)");
                }
                Err(err) => println!("({err})"),
            },
            "/decline" => match agent.decline(session) {
                Ok(turn) => {
                    logger.log_turn(&turn)?;
                    print_patient_turn(session, &turn.text, turn.source);
                }
                Err(AgentError::NoPendingPermission) => {
                    println!("(no permission request is pending)");
                }
                Err(err) => println!("({err})"),
            },
            utterance => match agent.submit(session, utterance).await {
                Ok(outcome) => {
                    // The student turn precedes the patient turn in the
                    // transcript; log both in order.
                    let turns = session.transcript().turns();
                    logger.log_turn(&turns[turns.len() - 2])?;
                    logger.log_turn(&turns[turns.len() - 1])?;

                    if outcome.crisis_detected {
                        println!("!! Crisis language detected. In a real setting, assess immediate risk and do not leave the patient alone.");
                    }
                    print_patient_turn(session, &outcome.turn.text, outcome.turn.source);
                    if outcome.permission_requested {
                        println!("(the patient asked for permission - /approve or /decline)");
                    }
                }
                Err(AgentError::AwaitingApproval) => {
                    println!("(answer the patient's request first: /approve or /decline)");
                }
                Err(err) => println!("({err})"),
            },
        }
    }

    session.end();
    Ok(())
}

fn finish_session(
    settings: &Settings,
    profiles: &ProfileStore,
    profile: &UserProfile,
    session: &Session,
    logger: &SessionLogger,
) -> Result<()> {
    println!("\nInterview finished.");
    let vas_score = loop {
        let raw = read_line("Your confidence score for this interview (0-10): ")?;
        match raw.parse::<f64>() {
            Ok(score) if (0.0..=10.0).contains(&score) => break score,
            _ => println!("Please enter a number between 0 and 10."),
        }
    };
    let reflection = read_line("Reflection notes (what went well, what to improve): ")?;

    logger.archive(vas_score, &reflection)?;

    let turns = session.transcript().turns();
    let meta = ReportMeta {
        session_id: session.id(),
        username: session.username(),
        persona_name: &session.persona().name,
        stage: session.stage(),
        vas_score,
        reflection: &reflection,
    };
    let report_path = write_session_report(&settings.storage.reports_dir, &meta, turns)?;
    println!("Report written to {}", report_path.display());

    let standardized = session.transcript().count_by_source(ResponseSource::Table);
    let generated = session.transcript().count_by_source(ResponseSource::Generated);
    profiles.append_session(
        &profile.username,
        SessionSummary {
            session_id: session.id().to_string(),
            date: chrono::Utc::now(),
            persona: session.persona().name.clone(),
            stage: session.stage().display_name().to_string(),
            vas_score,
            exchanges: turns.len() / 2,
            standardized_responses: standardized,
            generated_responses: generated,
        },
    )?;
    println!("Session archived. {standardized} standardized / {generated} generated responses.");
    Ok(())
}

fn login_or_register(profiles: &ProfileStore) -> Result<UserProfile> {
    let username = read_line("Username: ")?.to_lowercase().replace(' ', "_");
    if let Some(profile) = profiles.load(&username)? {
        return Ok(profile);
    }

    println!("No profile found; registering a new student.");
    let first_name = read_line("First name: ")?;
    let last_name = read_line("Last name: ")?;
    let email = read_line("Email (optional): ")?;
    let email = if email.is_empty() { None } else { Some(email.as_str()) };
    Ok(profiles.register(&first_name, &last_name, &username, email)?)
}

fn choose_persona() -> Result<PersonaId> {
    println!("\nSelect a patient:");
    println!("  1) Ali Seker - Major Depressive Disorder");
    println!("  2) Ferdi Demir - Schizophrenia, Paranoid Type");
    loop {
        match read_line("Patient [1/2]: ")?.as_str() {
            "1" => return Ok(PersonaId::Mdd),
            "2" => return Ok(PersonaId::Schizophrenia),
            _ => println!("Please enter 1 or 2."),
        }
    }
}

fn choose_stage() -> Result<Stage> {
    println!("\nSelect the interview stage:");
    println!("  1) Acute phase");
    println!("  2) Reassessment");
    loop {
        match read_line("Stage [1/2]: ")?.as_str() {
            "1" => return Ok(Stage::Acute),
            "2" => return Ok(Stage::Reassessment),
            _ => println!("Please enter 1 or 2."),
        }
    }
}

fn print_patient_turn(session: &Session, text: &str, source: Option<ResponseSource>) {
    let tag = match source {
        Some(ResponseSource::Table) => " [standardized]",
        Some(ResponseSource::Generated) => " [generated]",
        None => "",
    };
    println!("{}{tag}: {text}", session.persona().name);
}

fn prompt_marker(session: &Session) -> Result<()> {
    if session.is_awaiting_approval() {
        print!("[approve/decline] > ");
    } else {
        print!("> ");
    }
    io::stdout().flush()?;
    Ok(())
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

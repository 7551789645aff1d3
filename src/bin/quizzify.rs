use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal,
};
use quizzify::clients::flexible::ModelKind;
use quizzify::config::QuizConfig;
use quizzify::retrieval::PlainTextStore;
use quizzify::{AnswerOutcome, ChoiceKey, Direction, QuizGenerator, QuizNavigator, QuizSession};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Generate a multiple-choice quiz from your documents", long_about = None)]
#[command(after_help = "ENVIRONMENT VARIABLES:
    QUIZZIFY_MODEL            gemini|deepseek|openai|mock [default: first with an API key]
    GEMINI_API_KEY            API key for Gemini
    DEEPSEEK_API_KEY          API key for DeepSeek
    OPENAI_API_KEY            API key for OpenAI
    QUIZZIFY_PARSE_MODE       strict|lenient [default: strict]
    QUIZZIFY_VALIDATION       presence|strict [default: presence]
    QUIZZIFY_SCHEMA_GUIDANCE  true|false [default: false]
    QUIZZIFY_TRANSCRIPT_DIR   save every prompt/response pair under this directory
    QUIZZIFY_TOP_K            passages retrieved per question [default: 4]

CONTROLS:
    a-d  answer    n  next    p  previous    q  quit")]
struct Args {
    /// Topic for the generated quiz
    #[arg(short, long)]
    topic: String,

    /// Number of questions to generate (1-10)
    #[arg(short = 'n', long, default_value_t = 4)]
    count: usize,

    /// Text documents to ingest; pages are separated by form feeds
    #[arg(short, long, required = true, num_args = 1..)]
    docs: Vec<PathBuf>,

    /// Override QUIZZIFY_MODEL
    #[arg(short, long)]
    model: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Answer(ChoiceKey),
    Move(Direction),
    Quit,
}

impl Command {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'n' => Some(Self::Move(Direction::Forward)),
            'p' => Some(Self::Move(Direction::Backward)),
            'q' => Some(Self::Quit),
            other => other.to_string().parse().ok().map(Self::Answer),
        }
    }
}

/// Leaves raw mode when dropped, including on early error returns.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Attempt to read a single keystroke
fn read_single_key() -> io::Result<Option<char>> {
    let _raw = RawModeGuard::enable()?;

    let result = loop {
        if !event::poll(Duration::from_secs(300))? {
            break None;
        }
        if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
            if kind != KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Char(c) => break Some(c),
                KeyCode::Right => break Some('n'),
                KeyCode::Left => break Some('p'),
                KeyCode::Esc => break Some('q'),
                _ => continue,
            }
        }
    };

    Ok(result)
}

fn read_command() -> io::Result<Option<Command>> {
    print!("> ");
    io::stdout().flush()?;

    let key = match read_single_key() {
        Ok(key) => {
            println!("{}", key.map(String::from).unwrap_or_default());
            key
        }
        // Fallback to readline when stdin is not a terminal
        Err(_) => {
            let mut input = String::new();
            if io::stdin().read_line(&mut input)? == 0 {
                return Ok(Some(Command::Quit));
            }
            input.trim().chars().next()
        }
    };

    Ok(key.and_then(Command::from_char))
}

fn print_question(session: &mut QuizSession) -> Result<()> {
    let index = session.current_index();
    let total = session.total();
    let card = session.score_card();
    let nav = QuizNavigator::new(session);
    let question = nav.current_question()?;

    println!();
    println!("Question {}/{}: {}", index + 1, total, question.text);
    for choice in question.rendered_choices() {
        println!("  {}", choice);
    }
    println!("{}", card);
    Ok(())
}

fn run_quiz(session: &mut QuizSession) -> Result<()> {
    print_question(session)?;

    loop {
        let Some(command) = read_command()? else {
            println!("Use a-d to answer, n/p to move, q to quit.");
            continue;
        };

        let mut nav = QuizNavigator::new(session);
        match command {
            Command::Quit => break,
            Command::Move(direction) => {
                nav.advance(direction)?;
                print_question(session)?;
            }
            Command::Answer(key) => {
                let outcome = nav.submit_answer(key)?;
                let question = nav.current_question()?;
                match outcome {
                    AnswerOutcome::Correct => println!("Correct!"),
                    AnswerOutcome::Incorrect => println!("Incorrect! The answer is {}.", question.answer_key),
                }
                if !question.explanation.is_empty() {
                    println!("{}", question.explanation);
                }
                println!("{}", session.score_card());
            }
        }
    }

    println!("Final {}", session.score_card());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quizzify=info")))
        .with_writer(io::stderr)
        .try_init();

    let args = Args::parse();

    let mut config = QuizConfig::from_env()?;
    if let Some(model) = &args.model {
        config.model = Some(ModelKind::from_str(model).map_err(anyhow::Error::msg)?);
    }

    let mut session = QuizSession::new();
    let pages = session
        .documents_mut()
        .ingest(&PlainTextStore, &args.docs)
        .await
        .context("failed to ingest documents")?;
    println!("Ingested {} pages from {} file(s)", pages, args.docs.len());

    let model = config.model_client()?;
    let generator = QuizGenerator::for_topic(&args.topic, args.count, model)?
        .with_retriever(session.documents().retriever(config.top_k))
        .configured(&config);

    let report = generator.generate_with_report().await?;
    println!(
        "Generated {} of {} questions ({} rejected, {} unparseable, {} model errors)",
        report.bank.len(),
        args.count,
        report.rejected(),
        report.parse_failures(),
        report.model_failures()
    );

    if report.bank.is_empty() {
        bail!("no questions could be generated for '{}'", args.topic);
    }

    session.install(report.bank);
    run_quiz(&mut session)
}

//! Mathswipe entry point
//!
//! Native builds play in the terminal; the web build is driven from the
//! page through `mathswipe::platform::web::WebSession`.

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::io::{self, BufRead, Write};
    use std::time::Duration;

    use clap::error::ErrorKind;
    use clap::{CommandFactory, Parser};

    use mathswipe::consts::TIME_LIMIT_MS;
    use mathswipe::generator::{Problem, QuestionType};
    use mathswipe::platform::{now_ms, today};
    use mathswipe::session::{
        Direction, Effect, SessionDriver, SessionEvent, SessionRecorder, SessionSummary,
        StepLevel,
    };
    use mathswipe::share::{challenge_url, mint_token, share_card, token_from_url, validate_token};
    use mathswipe::{SessionRecords, Settings};

    /// Swipe-to-answer arithmetic practice in the terminal
    #[derive(Parser)]
    #[command(name = "mathswipe")]
    #[command(author, version, about, long_about = None)]
    struct Cli {
        /// Question type (add, subtract, multiply, divide, square, sqrt,
        /// fraction, decimal, percent, linear, mix-basic, mix-all)
        #[arg(short = 't', long = "type", default_value = "mix-basic")]
        question_type: QuestionType,

        /// Wide operand ranges from the first question
        #[arg(long)]
        hard: bool,

        /// 10 second limit per question
        #[arg(long)]
        timed: bool,

        /// Fixed set of 20 questions
        #[arg(long)]
        speedrun: bool,

        /// Play today's daily set
        #[arg(long, conflicts_with = "challenge")]
        daily: bool,

        /// Join a challenge by token or shared link
        #[arg(short, long)]
        challenge: Option<String>,

        /// Start a new challenge and print its link
        #[arg(long, conflicts_with_all = ["challenge", "daily"])]
        new_challenge: bool,

        /// Base URL for printed challenge links
        #[arg(long, default_value = "https://mathswipe.app/")]
        base_url: String,
    }

    impl Cli {
        /// Challenge token from `--challenge` or `--new-challenge`
        fn token(&self) -> Option<String> {
            if self.new_challenge {
                let token = mint_token(now_ms());
                println!("Challenge link: {}", challenge_url(&self.base_url, &token));
                return Some(token);
            }
            let raw = self.challenge.as_deref()?;
            let parsed = if raw.contains('=') {
                token_from_url(raw)
            } else {
                validate_token(raw)
            };
            match parsed {
                Ok(token) => Some(token),
                Err(e) => Cli::command().error(ErrorKind::InvalidValue, e).exit(),
            }
        }

        fn settings(&self) -> Settings {
            let question_type = if self.daily {
                QuestionType::Daily
            } else {
                self.question_type
            };
            Settings {
                question_type,
                hard_mode: self.hard,
                timed_mode: self.timed,
                speedrun: self.speedrun,
            }
        }
    }

    fn show(problem: &Problem, timed: bool) {
        println!();
        println!("  {} = ?", problem.expression);
        println!(
            "  [a] {:<10} [w] {:<10} [d] {:<10} [s] skip",
            problem.label(0),
            problem.label(1),
            problem.label(2)
        );
        if timed {
            println!("  ({} s)", TIME_LIMIT_MS / 1000.0);
        }
        print!("> ");
        let _ = io::stdout().flush();
    }

    /// Print feedback for a batch of effects; returns a finished summary
    fn report(effects: &[Effect]) -> Option<SessionSummary> {
        let mut finished = None;
        let answered = effects
            .iter()
            .any(|e| matches!(e, Effect::RecordAnswer { .. }));
        for effect in effects {
            match effect {
                Effect::RecordAnswer {
                    time_to_solve_ms,
                    correct: true,
                } => println!("  correct ({:.1} s)", time_to_solve_ms / 1000.0),
                Effect::RecordAnswer {
                    time_to_solve_ms,
                    correct: false,
                } if *time_to_solve_ms >= TIME_LIMIT_MS => println!("  time's up"),
                Effect::RecordAnswer { correct: false, .. } => println!("  wrong"),
                Effect::Shake if !answered => println!("  not quite, try again"),
                Effect::Schedule {
                    event: SessionEvent::ClearMilestone(milestone),
                    ..
                } => println!("  {} {} in a row!", milestone.symbol(), milestone.streak()),
                Effect::Schedule {
                    event: SessionEvent::ClearSpeedBonus(_),
                    ..
                } => println!("  speed bonus!"),
                Effect::Completed(summary) => finished = Some(summary.clone()),
                _ => {}
            }
        }
        finished
    }

    /// Let the feedback delay run out so the next problem is showing
    fn settle(driver: &mut SessionDriver<StepLevel>) -> Option<SessionSummary> {
        let mut finished = None;
        while driver.game().state().frozen && driver.is_active() {
            let Some(due) = driver.next_due() else { break };
            let wait = (due - now_ms()).max(0.0);
            std::thread::sleep(Duration::from_millis(wait.ceil() as u64));
            finished = report(&driver.advance_to(now_ms())).or(finished);
        }
        finished
    }

    fn finish(driver: &SessionDriver<StepLevel>, summary: &SessionSummary) {
        let game = driver.game();
        let title = game
            .label()
            .map(|l| format!("Daily {l}"))
            .unwrap_or_else(|| game.mode().to_string());
        println!();
        println!("{}", share_card(&title, summary));

        let mut records = SessionRecords::load();
        let new_best = records.beats_best(&summary.mode, summary.score);
        records.record_session(summary, now_ms());
        if new_best {
            println!("New best for {}!", summary.mode);
        }
    }

    pub fn run() {
        let cli = Cli::parse();
        let token = cli.token();
        let config = cli.settings().session_config(today(), token);
        let timed = config.timed_mode;
        log::info!("Starting {} session", config.mode());

        let mut driver = SessionDriver::new(config, StepLevel::default(), now_ms());
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        let finished = loop {
            if let Some(summary) = report(&driver.advance_to(now_ms())) {
                break Some(summary);
            }
            if let Some(summary) = settle(&mut driver) {
                break Some(summary);
            }
            let Some(problem) = driver.game().current() else {
                break None;
            };
            show(problem, timed);

            let line = match lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    log::error!("Failed to read input: {e}");
                    break None;
                }
                None => break None,
            };
            if matches!(line.trim(), "q" | "quit") {
                break None;
            }
            let direction: Direction = match line.parse() {
                Ok(d) => d,
                Err(e) => {
                    println!("  {e} (a/w/d to answer, s to skip, q to quit)");
                    continue;
                }
            };
            if let Some(summary) = report(&driver.swipe(direction, now_ms())) {
                break Some(summary);
            }
        };

        // Endless play has no natural end; record whatever was played
        let summary = finished.or_else(|| {
            let summary = driver.game().summary();
            (summary.total_answered > 0).then_some(summary)
        });
        driver.teardown();
        if let Some(summary) = summary {
            finish(&driver, &summary);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    terminal::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `platform::web::start`, this is just to satisfy the compiler
}

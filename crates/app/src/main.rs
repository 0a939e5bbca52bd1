use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use academy_core::model::{
    DecisionOption, Difficulty, InteractiveElement, Locale, Localized, Module, ModuleId, Step,
    StepId, StepKind,
};
use academy_core::navigator::NavigatorState;
use academy_core::time::Clock;
use services::{CompletionHooks, ContentResolver, ModuleSession};
use storage::repository::Storage;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidLocale { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLocale { raw } => write!(f, "invalid --locale value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct Args {
    db_url: String,
    locale: Locale,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("ACADEMY_DB_URL").unwrap_or_else(|_| "sqlite:academy.sqlite3".into());
        let mut locale = std::env::var("ACADEMY_LOCALE")
            .ok()
            .and_then(|raw| raw.parse::<Locale>().ok())
            .unwrap_or(Locale::En);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => db_url = require_value(args, "--db")?,
                "--locale" => {
                    let raw = require_value(args, "--locale")?;
                    locale = raw
                        .parse()
                        .map_err(|_| ArgsError::InvalidLocale { raw })?;
                }
                other => return Err(ArgsError::UnknownArg(other.to_string())),
            }
        }

        Ok(Self { db_url, locale })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--locale en|pt]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:academy.sqlite3");
    eprintln!("  --locale en");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ACADEMY_DB_URL, ACADEMY_LOCALE");
    eprintln!();
    eprintln!("Session commands: next, back, jump <n>, check <n>, choose <n>,");
    eprintln!("review, status, quit");
}

fn sample_module() -> Module {
    let step = |id: &str, title: Localized, kind, minutes, content: Localized| {
        Step::new(StepId::new(id).expect("authored slug"), title, kind, minutes, content)
    };

    Module::new(
        ModuleId::new("business-networking").expect("authored slug"),
        Localized::new("Business Networking", "Networking Empresarial"),
        Localized::new(
            "Master professional networking within the Portuguese business community in London",
            "Domine o networking profissional dentro da comunidade empresarial portuguesa em Londres",
        ),
        Difficulty::Intermediate,
        Localized::new("Professional", "Profissional"),
        vec![
            Localized::new(
                "Build meaningful professional connections",
                "Construir conexões profissionais significativas",
            ),
            Localized::new(
                "Leverage cultural heritage for business advantages",
                "Aproveitar herança cultural para vantagens empresariais",
            ),
        ],
        vec![
            step(
                "introduction-portuguese-business",
                Localized::new(
                    "Portuguese Business Landscape in London",
                    "Panorama Empresarial Português em Londres",
                ),
                StepKind::Introduction,
                4,
                Localized::new(
                    "Welcome to the Portuguese business community in London.",
                    "Bem-vindo à comunidade empresarial portuguesa em Londres.",
                ),
            ),
            step(
                "making-connections",
                Localized::new("Making Your First Connections", "Fazendo as Suas Primeiras Conexões"),
                StepKind::Checklist,
                6,
                Localized::new(
                    "Prepare for your first networking conversations.",
                    "Prepare-se para as suas primeiras conversas de networking.",
                ),
            )
            .with_interactive(InteractiveElement::Checklist {
                items: vec![
                    Localized::new(
                        "Prepare your Portuguese heritage story",
                        "Prepare a sua história de herança portuguesa",
                    ),
                    Localized::new(
                        "Research 3 Portuguese business leaders in London",
                        "Pesquise 3 líderes empresariais portugueses em Londres",
                    ),
                ],
            }),
            step(
                "choosing-your-approach",
                Localized::new("Choosing Your Approach", "Escolhendo a Sua Abordagem"),
                StepKind::DecisionTree,
                5,
                Localized::new(
                    "Different events call for different introductions.",
                    "Eventos diferentes pedem apresentações diferentes.",
                ),
            )
            .with_interactive(InteractiveElement::DecisionTree {
                question: Localized::new(
                    "What kind of event are you attending?",
                    "A que tipo de evento vai?",
                ),
                options: vec![
                    DecisionOption::new(
                        Localized::new("A formal business dinner", "Um jantar de negócios formal"),
                        Localized::new(
                            "Lead with your profession and follow up on LinkedIn within 48 hours.",
                            "Comece pela sua profissão e faça seguimento no LinkedIn dentro de 48 horas.",
                        ),
                    ),
                    DecisionOption::new(
                        Localized::new("A community festa", "Uma festa comunitária"),
                        Localized::new(
                            "Lead with your story; business follows the relationship.",
                            "Comece pela sua história; o negócio segue a relação.",
                        ),
                    ),
                ],
            }),
            step(
                "networking-summary",
                Localized::new("Your Networking Plan", "O Seu Plano de Networking"),
                StepKind::Summary,
                3,
                Localized::new(
                    "Review your plan and commit to one event this month.",
                    "Reveja o seu plano e comprometa-se com um evento este mês.",
                ),
            ),
        ],
    )
    .expect("sample module is valid")
}

fn print_state(session: &ModuleSession, resolver: &ContentResolver) {
    match session.state() {
        NavigatorState::Viewing(index) => {
            let step = session.current_step().expect("viewing state has a step");
            let view = resolver.resolve_step(step);
            let progress = session.progress();
            println!();
            println!(
                "[{}/{}] {} ({} min)",
                index + 1,
                progress.total,
                view.title,
                step.estimated_minutes()
            );
            println!("{}", view.content);
            match step.interactive() {
                Some(InteractiveElement::Checklist { items }) => {
                    let checked = session.checklist_state();
                    for (i, item) in items.iter().enumerate() {
                        let mark = if checked.get(i).copied().unwrap_or(false) {
                            "x"
                        } else {
                            " "
                        };
                        println!("  [{mark}] {i}: {}", item.resolve(resolver.locale()));
                    }
                }
                Some(InteractiveElement::DecisionTree { question, options }) => {
                    println!("  ? {}", question.resolve(resolver.locale()));
                    for (i, option) in options.iter().enumerate() {
                        println!("    {i}: {}", option.text().resolve(resolver.locale()));
                    }
                }
                None => {}
            }
            println!(
                "progress: {}% ({} of {} steps complete)",
                progress.percent, progress.completed, progress.total
            );
        }
        NavigatorState::Summary => {
            let progress = session.progress();
            println!();
            println!(
                "Module complete: {} of {} steps. Type `review` to revisit.",
                progress.completed, progress.total
            );
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let storage = Storage::sqlite(&args.db_url).await?;
    let resolver = ContentResolver::new(args.locale);
    let module = sample_module();

    println!(
        "{} — {}",
        module.title().resolve(args.locale),
        module.description().resolve(args.locale)
    );
    println!(
        "difficulty: {:?}, estimated: {} min",
        module.difficulty(),
        module.estimated_minutes()
    );

    let hooks = CompletionHooks::new()
        .on_step_complete(|step_id| println!("  * step complete: {step_id}"))
        .on_module_complete(|| println!("  * module complete!"));

    let mut session = ModuleSession::open(
        module,
        Arc::clone(&storage.progress),
        Clock::default_clock(),
        hooks,
    )
    .await?;

    print_state(&session, &resolver);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("next"), _) => {
                session.advance().await;
            }
            (Some("back"), _) => {
                session.retreat().await;
            }
            (Some("jump"), Some(raw)) => match raw.parse::<usize>() {
                Ok(target) => {
                    session.jump_to(target.saturating_sub(1)).await;
                }
                Err(_) => eprintln!("jump needs a step number"),
            },
            (Some("check"), Some(raw)) => match raw.parse::<usize>() {
                Ok(index) => {
                    session.toggle_checklist_item(index).await;
                }
                Err(_) => eprintln!("check needs an item number"),
            },
            (Some("choose"), Some(raw)) => match raw.parse::<usize>() {
                Ok(index) => match session.select_decision_option(index).await {
                    Some(option) => {
                        println!("  -> {}", option.result().resolve(args.locale));
                    }
                    None => eprintln!("no such option here"),
                },
                Err(_) => eprintln!("choose needs an option number"),
            },
            (Some("review"), _) => {
                session.review_from_summary().await;
            }
            (Some("status"), _) => {}
            (Some("quit" | "exit"), _) => break,
            (Some(other), _) => {
                eprintln!("unknown command: {other}");
                continue;
            }
            (None, _) => continue,
        }
        print_state(&session, &resolver);
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let args = match Args::parse(&mut args) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {err}");
            print_usage();
            std::process::exit(2);
        }
    };

    if let Err(err) = run(args).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

use clap::Parser;
use std::path::PathBuf;
use std::process;
use stillness::{
    App, Backend, Command, MemoryStore, Settings, StillnessError, SupabaseStore, TableStore,
    Update,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Browse the Stillness catalog of calm series and short films.
#[derive(Debug, Parser)]
#[command(name = "stillness", version, about)]
struct Cli {
    /// Supabase project URL
    #[arg(long, env = "STILLNESS_SUPABASE_URL")]
    supabase_url: Option<String>,

    /// Supabase anon key
    #[arg(long, env = "STILLNESS_SUPABASE_KEY", hide_env_values = true)]
    supabase_key: Option<String>,

    /// Read the catalog from a local JSON document instead of Supabase
    #[arg(long)]
    catalog_file: Option<PathBuf>,

    /// Screen to start on, e.g. "/", "/?tab=SERIES" or "/series/<id>"
    #[arg(long, default_value = "/")]
    start: String,

    /// Milliseconds between two automatic carousel advances
    #[arg(long, default_value_t = 5000)]
    autoplay_ms: u64,

    /// Print the start screen once the catalog is loaded and exit
    #[arg(long)]
    once: bool,
}

/// Input of the terminal loop: a typed line or background work finishing
enum Input {
    Line(Option<String>),
    Event(stillness::AppEvent),
}

/// Prints the whole screen, clearing the terminal first when scroll resets
fn print_screen<S: TableStore>(app: &App<S>, reset_scroll: bool) {
    if reset_scroll {
        print!("\x1b[2J\x1b[H");
    }
    println!("{}", app.render());
}

async fn run<S: TableStore>(store: S, settings: &Settings, once: bool) -> Result<(), StillnessError> {
    let mut app = App::new(store, settings.start.clone(), settings.autoplay_interval);
    app.start();

    if once {
        while !app.is_settled() {
            match app.next_event().await {
                Some(event) => {
                    app.handle_event(event);
                }
                None => break,
            }
        }
        println!("{}", app.render());
        return Ok(());
    }

    print_screen(&app, true);
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let input = tokio::select! {
            line = lines.next_line() => Input::Line(line?),
            Some(event) = app.next_event() => Input::Event(event),
        };

        let update = match input {
            // stdin closed
            Input::Line(None) => break,
            Input::Line(Some(line)) => match Command::parse(&line) {
                Ok(Some(command)) => app.handle_command(command),
                Ok(None) => Update::Nothing,
                Err(e) => Update::Message(e.to_string().trim_end().to_string()),
            },
            Input::Event(event) => app.handle_event(event),
        };

        match update {
            Update::Quit => break,
            Update::Screen { reset_scroll } => print_screen(&app, reset_scroll),
            Update::Carousel => print!("{}", app.render_carousel()),
            Update::Message(message) => println!("{}", message),
            Update::Nothing => {}
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with the screen on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stillness=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = match Settings::from_options(
        cli.supabase_url,
        cli.supabase_key,
        cli.catalog_file,
        &cli.start,
        cli.autoplay_ms,
    ) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let result = match &settings.backend {
        Backend::Supabase { url, key } => {
            tracing::info!(%url, "browsing Supabase catalog");
            run(SupabaseStore::new(url, key), &settings, cli.once).await
        }
        Backend::File(path) => match MemoryStore::from_json_file(path) {
            Ok(store) => {
                tracing::info!(path = %path.display(), "browsing local catalog");
                run(store, &settings, cli.once).await
            }
            Err(e) => Err(e.into()),
        },
    };

    if let Err(e) = result {
        eprintln!("\nError: {}", e);
        process::exit(1);
    }
}

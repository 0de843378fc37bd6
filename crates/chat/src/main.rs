use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use advisor_core::app::AdvisorApp;
use advisor_core::scene::Scene;

mod render;

#[derive(Debug, Parser)]
#[command(name = "advisor_chat")]
struct Args {
    /// Chat endpoint of the advisory service. Overrides ADVISOR_API_URL.
    #[arg(long)]
    endpoint: Option<String>,

    /// Give up on a reply after this many seconds. Overrides ADVISOR_TIMEOUT_SECS.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = advisor_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    // Logs go to stderr so they don't interleave with the conversation.
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    if let Some(endpoint) = args.endpoint {
        settings.api_url = Some(endpoint);
    }
    if let Some(secs) = args.timeout_secs {
        anyhow::ensure!(secs > 0, "--timeout-secs must be greater than 0");
        settings.timeout = Some(Duration::from_secs(secs));
    }

    let app = Arc::new(AdvisorApp::from_settings(&settings).map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        e
    })?);
    tracing::info!(session_id = %app.session_id(), "chat session started");

    let renderer = tokio::spawn(render_loop(app.clone()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "/quit" {
            break;
        }

        match app.scene() {
            Scene::Welcome => match line {
                "" | "start" => app.enter_chat(),
                _ => println!("Press Enter (or type `start`) to begin."),
            },
            Scene::Chat => match line {
                "/back" => app.go_back(),
                "" => {}
                text => {
                    if app.pending() {
                        println!("(still waiting for the previous reply)");
                    } else {
                        app.submit_user_message(text);
                    }
                }
            },
        }
    }

    renderer.abort();
    Ok(())
}

/// Re-renders whenever the scene or the conversation changes.
async fn render_loop(app: Arc<AdvisorApp>) {
    let mut scene_rx = app.subscribe_scene();
    let mut conv_rx = app.subscribe_conversation();
    let mut printed = 0usize;
    let mut typing_shown = false;

    println!("{}", render::WELCOME);

    loop {
        tokio::select! {
            changed = scene_rx.changed() => {
                if changed.is_err() {
                    return;
                }
                let scene = *scene_rx.borrow_and_update();
                match scene {
                    Scene::Welcome => println!("\n{}", render::WELCOME),
                    Scene::Chat => {
                        println!("\n{}", render::CHAT_HEADER);
                        let state = conv_rx.borrow_and_update().clone();
                        for msg in &state.messages {
                            println!("{}", render::message(msg));
                        }
                        printed = state.messages.len();
                        typing_shown = state.pending();
                        if typing_shown {
                            println!("{}", render::TYPING);
                        }
                    }
                }
            }
            changed = conv_rx.changed() => {
                if changed.is_err() {
                    return;
                }
                let state = conv_rx.borrow_and_update().clone();
                if app.scene() != Scene::Chat {
                    continue;
                }
                for msg in state.messages.iter().skip(printed) {
                    println!("{}", render::message(msg));
                }
                printed = state.messages.len();
                if state.pending() && !typing_shown {
                    println!("{}", render::TYPING);
                }
                typing_shown = state.pending();
            }
        }
    }
}

fn init_sentry(settings: &advisor_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

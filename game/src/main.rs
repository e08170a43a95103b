use color_eyre::eyre::Context as _;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use twist_ladders::channels::{SessionChannels, SessionEvent};
use twist_ladders::cli::config::CliConfig;
use twist_ladders::engine::{RandomSource, Rules, SeededRandom, ThreadRandom};
use twist_ladders::runner::GameRunner;
use twist_ladders::session::Session;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "twist_ladders=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CliConfig::load().wrap_err("Failed to load config")?;

    let random: Box<dyn RandomSource + Send> = match config.seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    };
    let mut session = Session::new(Rules::for_mode(config.mode()), random);

    let channels = SessionChannels::new();
    let mut events = channels.subscribe(session.id()).await;
    session.add_observer(channels.observer(session.id()).await);

    // Stand-in for a renderer: log what a viewer would be shown
    let listener = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(notification) => match notification.event {
                    SessionEvent::MoveResolved(record) => {
                        tracing::debug!(
                            session_id = %notification.session_id,
                            roll = record.roll,
                            "Viewer received move"
                        );
                    }
                    SessionEvent::PowerUpOffered(snapshot) => {
                        tracing::debug!(
                            session_id = %notification.session_id,
                            player = snapshot.current_player.number(),
                            "Viewer shows the power-up wheel"
                        );
                    }
                    SessionEvent::StateChanged(_) => {}
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Viewer fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl-C, stopping game");
            ctrl_c.cancel();
        }
    });

    let runner = GameRunner::new()
        .with_roll_delay(config.roll_delay())
        .with_max_rolls(config.max_rolls());
    let result = runner.run_game(&mut session, &cancel).await;

    // Dropping the session drops the last sender, which ends the listener
    let session_id = session.id();
    drop(session);
    channels.remove(session_id).await;
    listener.await.wrap_err("Event listener task failed")?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

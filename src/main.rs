use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flashdeck::audio::{AudioCache, GoogleTts};
use flashdeck::config::Settings;
use flashdeck::content::Deck;
use flashdeck::handlers;
use flashdeck::state::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "flashdeck=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let settings = Settings::load();

  let deck_path = settings.deck_path();
  let deck = Deck::load(&deck_path).unwrap_or_else(|e| {
    tracing::error!("Failed to load deck from {}: {}", deck_path.display(), e);
    panic!("{}", e.user_message())
  });

  let tts = GoogleTts::new(settings.audio.endpoint.clone(), settings.tts_timeout())
    .expect("Failed to initialize speech client");
  let audio = AudioCache::new(Arc::new(tts));

  let bind_addr = settings.bind_addr();
  let port = settings.server.port;
  let app = handlers::router(AppState::new(deck, audio, settings));

  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", port);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}

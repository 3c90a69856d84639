// storefront_app/src/main.rs

use std::sync::Arc;

use anyhow::{bail, Context};
use aquashop::{
  ApiClient, ApiConfig, AuthGateway, CartBus, CartController, CartScope, CatalogGateway,
  HttpCartGateway, MemoryCredentialStore, Product, SessionContext,
};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

// A small end-to-end walk of the cart consistency model against a live API:
// three independently mounted controllers (two product cards and a header
// badge) converge onto the same remote cart through the broadcast bus.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  dotenvy::dotenv().ok();

  tracing::info!("Starting storefront demo...");

  let config = ApiConfig::from_env().context("loading API configuration")?;
  tracing::info!(base_url = %config.base_url(), "Using API");

  let store = Arc::new(MemoryCredentialStore::new());
  let session = SessionContext::restore(store.as_ref());
  let client = Arc::new(ApiClient::new(config, session.clone()));

  // The cart endpoints require an authenticated session.
  let auth = AuthGateway::new(Arc::clone(&client), store);
  let email = std::env::var("AQUASHOP_DEMO_EMAIL").context("AQUASHOP_DEMO_EMAIL not set")?;
  let password =
    std::env::var("AQUASHOP_DEMO_PASSWORD").context("AQUASHOP_DEMO_PASSWORD not set")?;
  auth.login(&email, &password).await.context("login failed")?;
  let user_display = session
    .current()
    .map(|s| s.display_name)
    .unwrap_or_default();
  tracing::info!(user = %user_display, "Logged in");

  // Pick two catalog products to stand in for two rendered product cards.
  let catalog = CatalogGateway::new(Arc::clone(&client));
  let featured = catalog.featured_products(2).await.context("fetching products")?;
  let [first, second] = featured.as_slice() else {
    bail!("demo needs at least two products in the catalog");
  };
  tracing::info!(first = %first.name, second = %second.name, "Selected products");

  let api: Arc<dyn aquashop::CartApi> = Arc::new(HttpCartGateway::new(Arc::clone(&client)));
  let bus = CartBus::new();

  let mut badge = CartController::new(
    Arc::clone(&api),
    session.clone(),
    bus.clone(),
    CartScope::FullCart,
  );
  let mut card_a = CartController::new(
    Arc::clone(&api),
    session.clone(),
    bus.clone(),
    CartScope::Product(first.id.clone()),
  );
  let mut card_b = CartController::new(
    Arc::clone(&api),
    session.clone(),
    bus.clone(),
    CartScope::Product(second.id.clone()),
  );

  badge.mount().await?;
  card_a.mount().await?;
  card_b.mount().await?;
  tracing::info!(count = badge.badge_count(), "Initial badge count");

  // Two adds from one card, one from the other. Each publish marks the
  // sibling controllers stale; sync() is their re-render point.
  card_a.increment(&first.id).await?;
  card_a.increment(&first.id).await?;
  card_b.increment(&second.id).await?;

  card_a.sync().await?;
  card_b.sync().await?;
  badge.sync().await?;
  report(&badge, first, second, &card_a, &card_b);

  // Backing one unit out from a card propagates to the badge the same way.
  card_a.decrement(&first.id).await?;
  badge.sync().await?;
  card_b.sync().await?;
  report(&badge, first, second, &card_a, &card_b);

  badge.unmount();
  card_a.unmount();
  card_b.unmount();
  auth.logout();
  tracing::info!("Done");
  Ok(())
}

fn report(
  badge: &CartController,
  first: &Product,
  second: &Product,
  card_a: &CartController,
  card_b: &CartController,
) {
  tracing::info!(
    badge = badge.badge_count(),
    first = %first.name,
    first_qty = card_a.quantity_of(&first.id),
    second = %second.name,
    second_qty = card_b.quantity_of(&second.id),
    "Converged state"
  );
}

//! Drives the engine the way a key-driven host shell would: apply settings,
//! toggle once, then render the title for a few ticks.

use std::env;
use std::error::Error;
use std::time::Duration as StdDuration;

use clockify_deck::display::{render_title, DisplayState};
use clockify_deck::{PluginSettings, TrackerContext};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::from_filename("./clockify-deck/.env.local").ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = PluginSettings {
        api_key: env::var("CLOCKIFY_API_KEY").expect("CLOCKIFY_API_KEY must be set"),
        server_url: env::var("CLOCKIFY_SERVER_URL")
            .unwrap_or_else(|_| "https://api.clockify.me/api/v1".to_string()),
        workspace_name: env::var("CLOCKIFY_WORKSPACE").expect("CLOCKIFY_WORKSPACE must be set"),
        project_name: env::var("CLOCKIFY_PROJECT").unwrap_or_default(),
        timer_name: env::var("CLOCKIFY_TIMER_NAME").unwrap_or_default(),
        ..PluginSettings::default()
    };

    let mut context = TrackerContext::new();
    context.update_settings(&settings).await;
    if !context.is_valid() {
        return Err("connection could not be established, check key and URL".into());
    }

    let outcome = context.toggle_timer().await;
    println!("toggle: {:?}", outcome);

    let mut display = DisplayState::new();
    for _ in 0..15 {
        let elapsed = if display.needs_refresh() {
            let elapsed = context.running_timer().await.map(|entry| entry.elapsed());
            display.refreshed(elapsed);
            display.elapsed()
        } else {
            display.tick()
        };

        println!("{}", render_title(context.settings(), elapsed));
        tokio::time::sleep(StdDuration::from_secs(1)).await;
    }

    Ok(())
}

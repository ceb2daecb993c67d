use clockify::ClockifyClient;
use std::env;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::from_filename("./clockify/.env.local").ok();
    let api_key = env::var("CLOCKIFY_API_KEY").expect("CLOCKIFY_API_KEY must be set");
    let server_url = env::var("CLOCKIFY_SERVER_URL")
        .unwrap_or_else(|_| "https://api.clockify.me/api/v1".to_string());

    let client = ClockifyClient::new(api_key, server_url);

    let user = client.fetch_current_user().await?;
    println!("Authenticated as {} ({})", user.name, user.id);

    for workspace in client.fetch_workspaces().await? {
        let entries = client
            .fetch_in_progress_entries(&workspace.id, &user.id)
            .await?;

        match entries.first() {
            Some(entry) => {
                let elapsed = entry.elapsed();
                println!(
                    "{}: running \"{}\" for {:02}:{:02}:{:02}",
                    workspace.name,
                    entry.description,
                    elapsed.whole_hours(),
                    elapsed.whole_minutes() % 60,
                    elapsed.whole_seconds() % 60,
                );
            }
            None => println!("{}: no running timer", workspace.name),
        }
    }

    Ok(())
}

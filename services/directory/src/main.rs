use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use common::config::LmsConfig;
use directory::models::FilterField;
use directory::{Directory, DirectoryClient, NotificationLevel, Notifier};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting directory snapshot");

    let config = LmsConfig::from_env()?;
    let client = DirectoryClient::new(&config)?;
    let (notifier, mut notifications) = Notifier::channel();
    let directory = Directory::new(client, notifier);

    directory.load_all().await;

    // Optional search term as the first argument
    if let Some(term) = std::env::args().nth(1) {
        directory
            .store()
            .set_filter(FilterField::SearchTerm, term)
            .await;
    }

    while let Ok(notification) = notifications.try_recv() {
        match notification.level {
            NotificationLevel::Error | NotificationLevel::Warning => {
                warn!("{}", notification.message)
            }
            _ => info!("{}", notification.message),
        }
    }

    let store = directory.store();
    info!(
        "Directory state: {:?}, {} organizations, {} cohorts",
        store.phase().await,
        store.organizations().await.len(),
        store.cohorts().await.len()
    );

    let view = store.visible().await;
    info!("{}", view.summary());
    for user in &view.users {
        info!(
            "{:>6}  {:<28} {:<8} {:<10} {:<30} last access {}",
            user.id,
            user.fullname,
            user.role,
            user.status.label(),
            user.school,
            user.last_access_label()
        );
    }

    Ok(())
}

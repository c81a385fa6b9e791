use anyhow::{Context, Result};
use gradewatch::config::Config;
use gradewatch::utils::storage::SnapshotStore;
use gradewatch::utils::telegram::{render_message, send};
use gradewatch::{diff, removals, run};
use log::{info, warn};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

// Captures the current grades, reports changes since the last run and stores the new baseline.
#[tokio::main]
async fn main() -> Result<()> {
    // Loads credentials and endpoints from the environment and `.env`
    let config = Config::from_env()?;

    TermLogger::init(
        config.log_level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialise logging")?;

    // Logs in and captures every course
    let snapshot = run(&config.credentials, &config.site)
        .await
        .context("Failed to capture grades")?;

    let store = SnapshotStore::new(&config.store_path);
    let previous = store.load().context("Failed to read previous grades")?;

    match previous {
        // First run only records the baseline.
        None => info!("Recorded baseline of {} courses", snapshot.len()),
        Some(previous) => {
            for (class_name, messages) in removals(&previous, &snapshot).iter() {
                for message in messages {
                    info!("{class_name}: {message}");
                }
            }

            let changes = diff(&previous, &snapshot);
            if changes.is_empty() {
                info!("No grade changes found");
            } else {
                for (class_name, messages) in changes.iter() {
                    for message in messages {
                        info!("{class_name}: {message}");
                    }
                }
                match &config.telegram {
                    Some(telegram) => {
                        send(&telegram.bot_token, telegram.chat_id, &render_message(&changes))
                            .await
                            .context("Failed to send notification")?;
                    }
                    None => warn!("BOT_TOKEN/CHAT_ID not set, changes were only logged"),
                }
            }
        }
    }

    // The new snapshot is the baseline for the next run
    store.save(&snapshot).context("Failed to store grades")?;
    Ok(())
}

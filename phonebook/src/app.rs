use anyhow::Context;
use phonebook_core::DirectoryClient;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::config::PhonebookConfig;
use crate::console::{Command, CommandError, HELP, parse_command, render};
use crate::sync::{AddOutcome, Resolution, SyncController, UpdateOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct PhonebookApp {
    config: PhonebookConfig,
    controller: SyncController,
}

impl PhonebookApp {
    pub fn bootstrap(config: PhonebookConfig) -> anyhow::Result<Self> {
        let client = DirectoryClient::with_base_url(config.base_url.as_str())
            .context("failed to create directory client")?;
        let controller = SyncController::new(client, config.notification_ttl);
        Ok(Self { config, controller })
    }

    /// Reads commands from stdin and redraws the view whenever it changes,
    /// including when a notification expires on its own.
    pub async fn run(self) -> anyhow::Result<()> {
        info!(
            base_url = %self.config.base_url,
            notification_secs = self.config.notification_ttl.as_secs(),
            "phonebook started"
        );
        let mut view_rx = self.controller.subscribe();
        self.controller.initialize().await;
        let initial = render(&view_rx.borrow_and_update());
        print_block(&initial).await?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("failed to read stdin")? else {
                        break;
                    };
                    match parse_command(&line) {
                        Ok(command) => {
                            if self.dispatch(command).await? == Flow::Quit {
                                break;
                            }
                            if view_rx.has_changed().unwrap_or(false) {
                                let text = render(&view_rx.borrow_and_update());
                                print_block(&text).await?;
                            }
                        }
                        Err(CommandError::Empty) => {}
                        Err(err) => print_block(&format!("{err} (try `help`)\n")).await?,
                    }
                }
                changed = view_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let text = render(&view_rx.borrow_and_update());
                    print_block(&text).await?;
                }
            }
        }
        info!("phonebook stopped");
        Ok(())
    }

    async fn dispatch(&self, command: Command) -> anyhow::Result<Flow> {
        let controller = &self.controller;
        let result = match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => {
                print_block(&format!("{HELP}\n")).await?;
                Ok(())
            }
            Command::List => {
                print_block(&render(&controller.view())).await?;
                Ok(())
            }
            Command::Name(name) => {
                controller.set_draft_name(name);
                Ok(())
            }
            Command::Number(number) => {
                controller.set_draft_number(number);
                Ok(())
            }
            Command::Filter(text) => {
                controller.set_filter(text);
                Ok(())
            }
            Command::Add { name, number } => {
                controller.set_draft_name(name);
                controller.set_draft_number(number);
                controller.submit_add().await.map(log_add)
            }
            Command::Submit => controller.submit_add().await.map(log_add),
            Command::Update(id) => controller.submit_update(&id).await.map(log_update),
            Command::Delete(id) => controller.submit_delete(&id).map(|_| ()),
            Command::Refresh => controller.refresh().await,
            Command::Answer(decision) => {
                controller
                    .resolve_confirmation(decision)
                    .await
                    .map(|resolution| match resolution {
                        Resolution::Updated(outcome) => log_update(outcome),
                        Resolution::Deleted(record) => {
                            info!(id = %record.id, "delete confirmed");
                        }
                        Resolution::Declined => {}
                    })
            }
        };
        if let Err(err) = result {
            warn!(error = %err, "command failed");
            print_block(&format!("error: {err}\n")).await?;
        }
        Ok(Flow::Continue)
    }
}

fn log_add(outcome: AddOutcome) {
    match outcome {
        AddOutcome::Created(record) => info!(id = %record.id, "contact added"),
        AddOutcome::NeedsConfirmation(pending) => info!(prompt = %pending.prompt(), "asking"),
    }
}

fn log_update(outcome: UpdateOutcome) {
    match outcome {
        UpdateOutcome::Applied(record) => info!(id = %record.id, "contact updated"),
        UpdateOutcome::Gone => warn!("contact vanished before update"),
    }
}

async fn print_block(text: &str) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(text.as_bytes())
        .await
        .context("failed to write to stdout")?;
    stdout.flush().await.context("failed to flush stdout")?;
    Ok(())
}

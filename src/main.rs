use std::sync::Arc;

use merchant_signup::cli::{self, Command};
use merchant_signup::config::SignupConfig;
use merchant_signup::services::{PlaceholderDocuments, SimulatedSubmission, TemplateSuggester};
use merchant_signup::signup::guidance;
use merchant_signup::signup::{WizardController, WizardDeps};
use merchant_signup::store::{FormStore, KeyValueStore, LibSqlStore, MemoryStore};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = SignupConfig::from_env()?;

    let backend: Arc<dyn KeyValueStore> = match &config.db_path {
        Some(path) => match LibSqlStore::new_local(path).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Falling back to in-memory form storage");
                Arc::new(MemoryStore::new())
            }
        },
        None => Arc::new(MemoryStore::new()),
    };

    let deps = WizardDeps {
        store: FormStore::new(backend),
        submission: Arc::new(SimulatedSubmission::new(config.submit_delay)),
        documents: Arc::new(PlaceholderDocuments::new()),
        suggester: Arc::new(TemplateSuggester::new()),
    };
    let mut controller = WizardController::open(deps, &config).await;

    eprintln!("Merchant signup v{}", env!("CARGO_PKG_VERSION"));
    match &config.db_path {
        Some(path) => eprintln!("   Progress saved to {}", path.display()),
        None => eprintln!("   Progress kept in memory (set SIGNUP_DB_PATH to save it)"),
    }
    eprintln!("   Type 'help' for commands, 'quit' to exit.\n");
    println!("{}\n", guidance::render(controller.step()));
    println!("{}", cli::status_line(&controller));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        eprint!("> ");
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let output = match Command::parse(&line) {
            Command::Quit => break,
            Command::Next if controller.step().is_final() => submit(&mut controller).await,
            command => cli::execute(&mut controller, command).await,
        };
        if !output.is_empty() {
            println!("{output}");
        }
    }

    eprintln!("Goodbye.");
    Ok(())
}

/// Submit from the final step; Ctrl-C abandons the attempt and keeps the form.
async fn submit(controller: &mut WizardController) -> String {
    eprintln!("Submitting application... (Ctrl-C to cancel)");
    let cancel = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    match controller.submit_until(cancel).await {
        Ok(receipt) => format!(
            "Application submitted (reference {}). The form has been reset.\n\n{}",
            receipt.reference,
            cli::status_line(controller)
        ),
        Err(e) if e.is_retryable() => format!("{e}. Type 'next' to try again."),
        Err(e) => e.to_string(),
    }
}

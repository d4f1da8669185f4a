//! Custodian: retention and garbage-collection service.

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use custodian::{Args, Config, RetentionServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug {
        Level::DEBUG
    } else if args.silent {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    // Create configuration from arguments
    let config = Config::from(args);
    let autostart = config.autostart;

    // Create and run the server
    let server = RetentionServer::new(config)?;

    println!(
        r#"
Custodian admin service is starting at {}

Scheduler: {}
Endpoints: /admin/retention/{{start,stop,status,trigger,settings}}

Press Ctrl+C to stop the server.
"#,
        server.base_url(),
        if autostart {
            "armed at startup"
        } else {
            "stopped until POST /admin/retention/start"
        },
    );

    server.run().await
}

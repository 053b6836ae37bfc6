use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

use gatecheck::config::config;
use gatecheck::scanner::FileScanSource;
use gatecheck::screen::{EntryDisplay, ScreenController, ScreenSnapshot, ScreenState};
use gatecheck::server::{Reachability, ServerClient};
use gatecheck::telemetry::{create_scan_span, generate_correlation_id, init_telemetry};
use gatecheck::{checkin_metrics, extract_enrollment, OperationTimer};
use tracing::Instrument;

#[derive(Parser)]
#[command(name = "gatecheck")]
#[command(about = "QR check-in console for event entry scanning")]
#[command(long_about = "Gatecheck drives the scan-to-check-in workflow of an event entry \
                       scanner: it extracts enrollment identifiers from QR payloads, submits \
                       them to the check-in server, and reports granted/denied results with a \
                       running entry count. Start with 'gatecheck watch' for the operator console.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the enrollment identifier from a payload without calling the server
    Extract {
        /// Payload text; reads stdin when neither --payload nor --file is given
        #[arg(long, help = "Scanned payload text")]
        payload: Option<String>,
        /// Read the payload from a file
        #[arg(long, help = "Read the payload from a file")]
        file: Option<PathBuf>,
    },
    /// One-shot check-in: extract the identifier from a payload and submit it
    Scan {
        #[arg(long, help = "Scanned payload text")]
        payload: Option<String>,
        #[arg(long, help = "Read the payload from a file")]
        file: Option<PathBuf>,
        /// Override the configured server address for this call
        #[arg(long, help = "Server base address to use instead of the configured one")]
        server: Option<String>,
    },
    /// Probe the server base address and report reachability
    Probe {
        #[arg(long, help = "Server base address to probe instead of the configured one")]
        server: Option<String>,
    },
    /// Operator console: feed payloads interactively or from a file
    Watch {
        /// Batch mode: read blank-line-delimited payloads from a file
        #[arg(long, help = "Read blank-line-delimited payloads from a file instead of stdin")]
        input: Option<PathBuf>,
        #[arg(long, help = "Server base address to use instead of the configured one")]
        server: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Default behavior: no subcommand - explain how to run a check-in
        None => {
            show_usage();
            Ok(())
        }
        Some(Commands::Extract { payload, file }) => tokio::runtime::Runtime::new()?
            .block_on(async { extract_command(payload, file).await }),
        Some(Commands::Scan {
            payload,
            file,
            server,
        }) => tokio::runtime::Runtime::new()?
            .block_on(async { scan_command(payload, file, server).await }),
        Some(Commands::Probe { server }) => {
            tokio::runtime::Runtime::new()?.block_on(async { probe_command(server).await })
        }
        Some(Commands::Watch { input, server }) => tokio::runtime::Runtime::new()?
            .block_on(async { watch_command(input, server).await }),
    }
}

fn show_usage() {
    println!("🎫 GATECHECK - Event Entry Console");
    println!();
    println!("Scan a QR payload and record the entry:");
    println!("  gatecheck scan --payload \"Enrollment: 12AB34\"");
    println!();
    println!("Run the interactive operator console (payloads end with a blank line):");
    println!("  gatecheck watch");
    println!();
    println!("Check whether the server is up:");
    println!("  gatecheck probe");
    println!();
    println!("📊 Quick start: gatecheck watch --input payloads.txt");
}

fn setup(server_override: Option<String>) -> Result<(ServerClient, String)> {
    let cfg = config()?;
    init_telemetry(&cfg.observability)?;
    let server_url = server_override.unwrap_or_else(|| cfg.server.base_url.clone());
    let client = ServerClient::new(Duration::from_secs(cfg.server.request_timeout_seconds))?;
    Ok((client, server_url))
}

async fn read_payload(payload: Option<String>, file: Option<PathBuf>) -> Result<String> {
    if let Some(text) = payload {
        return Ok(text);
    }
    if let Some(path) = file {
        return Ok(tokio::fs::read_to_string(path).await?);
    }
    let mut text = String::new();
    tokio::io::stdin().read_to_string(&mut text).await?;
    Ok(text)
}

async fn extract_command(payload: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let text = read_payload(payload, file).await?;
    println!("{}", extract_enrollment(&text));
    Ok(())
}

async fn scan_command(
    payload: Option<String>,
    file: Option<PathBuf>,
    server: Option<String>,
) -> Result<()> {
    let (client, server_url) = setup(server)?;
    let text = read_payload(payload, file).await?;

    let mut controller = ScreenController::new(server_url);
    let correlation_id = generate_correlation_id();
    let timer = OperationTimer::new("scan_checkin");
    controller
        .submit_scan(&client, &text)
        .instrument(create_scan_span("scan", Some(&correlation_id)))
        .await;
    timer.finish();
    let snapshot = controller.snapshot();
    render_snapshot(&snapshot);
    checkin_metrics().log_stats();

    // Exit code mirrors the result: 0 for a grant, 1 for anything else.
    if snapshot.entry != Some(EntryDisplay::Granted) {
        std::process::exit(1);
    }
    Ok(())
}

async fn probe_command(server: Option<String>) -> Result<()> {
    let (client, server_url) = setup(server)?;
    match client.probe(&server_url).await {
        Reachability::Reachable => println!("✓ server reachable: {server_url}"),
        _ => println!("✗ server unreachable: {server_url}"),
    }
    Ok(())
}

async fn watch_command(input: Option<PathBuf>, server: Option<String>) -> Result<()> {
    let (client, server_url) = setup(server)?;
    let cfg = config()?;

    let mut controller = ScreenController::new(server_url);
    if cfg.scanner.torch_on_start {
        controller.toggle_torch();
    }

    if let Some(path) = input {
        let mut source = FileScanSource::open(&path).await?;
        controller
            .drain_source(&client, &mut source, |snapshot| render_snapshot(snapshot))
            .await;
        checkin_metrics().log_stats();
        return Ok(());
    }

    println!("🎫 Operator console. End each payload with a blank line.");
    println!("   Commands: /restart /torch /probe /panel /server <url> /reset-server /quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Vec<String> = Vec::new();

    while let Some(line) = lines.next_line().await? {
        if let Some(command) = line.strip_prefix('/') {
            handle_console_command(command, &mut controller, &client).await;
            if command.trim() == "quit" {
                break;
            }
            render_snapshot(&controller.snapshot());
            continue;
        }

        if line.trim().is_empty() {
            if pending.is_empty() {
                continue;
            }
            let payload = pending.join("\n");
            pending.clear();

            // Result view appears immediately; fields fill in on resolve.
            if let Some(enrollment) = controller.accept_scan(&payload) {
                render_snapshot(&controller.snapshot());
                let correlation_id = generate_correlation_id();
                let outcome = client
                    .check_in(controller.server_url(), &enrollment)
                    .instrument(create_scan_span("watch_checkin", Some(&correlation_id)))
                    .await;
                controller.apply_checkin(outcome);
            } else {
                println!("Scan ignored; /restart to scan again");
            }
            render_snapshot(&controller.snapshot());
            continue;
        }

        pending.push(line);
    }

    checkin_metrics().log_stats();
    Ok(())
}

async fn handle_console_command(
    command: &str,
    controller: &mut ScreenController,
    client: &ServerClient,
) {
    let mut parts = command.trim().splitn(2, ' ');
    match (parts.next().unwrap_or(""), parts.next()) {
        ("restart", _) => controller.restart_scanning(),
        ("torch", _) => {
            controller.toggle_torch();
        }
        ("probe", _) => {
            controller.probe_server(client).await;
        }
        ("panel", _) => {
            controller.toggle_settings();
        }
        ("server", Some(url)) => controller.set_server_url(url.trim()),
        ("server", None) => println!("Usage: /server <url>"),
        ("reset-server", _) => controller.reset_server_url(),
        ("quit", _) => {}
        (other, _) => println!("Unknown command: /{other}"),
    }
}

/// Render the operator view. Presentation is a pure function of the
/// snapshot; nothing here mutates workflow state.
fn render_snapshot(snapshot: &ScreenSnapshot) {
    match &snapshot.entry {
        Some(EntryDisplay::Granted) => println!("✅ Entry Granted"),
        Some(EntryDisplay::Denied { reason }) => println!("⛔ {reason}"),
        Some(EntryDisplay::Pending) => println!("⏳ Awaiting server response..."),
        None => println!("📷 Scanning..."),
    }
    if snapshot.state == ScreenState::ResultDisplayed {
        if let Some(text) = &snapshot.scanned_text {
            for line in text.lines() {
                println!("   {line}");
            }
        }
    }
    println!("Total entries: {}", snapshot.count);

    let reachability = match snapshot.reachability {
        Reachability::Unknown => "· server unprobed",
        Reachability::Reachable => "✓ server reachable",
        Reachability::Unreachable => "✗ server unreachable",
    };
    let torch = if snapshot.torch_on { " 🔦" } else { "" };
    println!("{} [{}]{}", reachability, snapshot.server_url, torch);
    if snapshot.settings_visible {
        println!("⚙ settings panel open");
    }
    println!();
}

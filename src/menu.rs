use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::runner::{Module, PortList, Toolkit};
use recon_kit::output::Tone;

struct Entry {
    key: &'static str,
    label: &'static str,
    prompt: &'static str,
    module: Module,
}

fn entries() -> Vec<Entry> {
    vec![
        Entry { key: "1", label: "WHOIS Lookup", prompt: "Enter domain: ", module: Module::Whois },
        Entry { key: "2", label: "DNS Lookup", prompt: "Enter domain: ", module: Module::Dns },
        Entry { key: "3", label: "IP Geolocation", prompt: "Enter IP address: ", module: Module::Geo },
        Entry {
            key: "4",
            label: "Port Scanner",
            prompt: "Enter IP address: ",
            module: Module::Ports(PortList::Extended),
        },
        Entry { key: "5", label: "Subdomain Finder", prompt: "Enter domain: ", module: Module::Subdomains },
        Entry { key: "6", label: "Directory Brute Forcer", prompt: "Enter target URL: ", module: Module::Dirs },
        Entry { key: "7", label: "Technology Detector", prompt: "Enter website URL: ", module: Module::Tech },
    ]
}

fn prompt(text: &str) {
    print!("{}", text);
    let _ = std::io::stdout().flush();
}

fn print_modules(toolkit: &Toolkit, entries: &[Entry]) {
    let console = toolkit.console();
    println!();
    println!("{}", console.paint(Tone::Heading, "Information Gathering Toolkit"));
    println!("{}", "─".repeat(40));
    for entry in entries {
        println!("{}", console.paint(Tone::Good, &format!("{}. {}", entry.key, entry.label)));
    }
    println!("{}", "─".repeat(40));
    println!("{}", console.paint(Tone::Bad, "0. Exit"));
    println!();
}

/// Numeric menu loop. A module failure is reported and the loop continues;
/// `0` or end of input exits.
pub async fn run_menu(toolkit: &Toolkit) -> anyhow::Result<()> {
    let entries = entries();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print_modules(toolkit, &entries);
        prompt("recon> ");
        let Some(choice) = lines.next_line().await? else {
            break;
        };
        let choice = choice.trim();

        if choice == "0" {
            println!("\n{}\n", toolkit.console().paint(Tone::Good, "Exiting. Stay safe!"));
            return Ok(());
        }

        let Some(entry) = entries.iter().find(|e| e.key == choice) else {
            toolkit.console().notice("Invalid choice. Please try again.");
            continue;
        };

        prompt(entry.prompt);
        let Some(raw) = lines.next_line().await? else {
            break;
        };
        if raw.trim().is_empty() {
            continue;
        }

        tracing::info!(module = entry.label, target = raw.trim(), "Running module");
        toolkit.run_reported(&entry.module, &raw).await;
    }

    println!();
    Ok(())
}

use colored::Colorize;

pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {:#}", "Error:".red().bold(), err);

    let msg = format!("{err:#}").to_lowercase();

    if msg.contains("dify host is required") || msg.contains("dify api key is required") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Pass --host/--api-key, set DIFY_HOST/DIFY_API_KEY, or add them to the [dify] section of:");
        eprintln!("  {} flowdesk config path", "$".dimmed());
    }

    if msg.contains("not available for this resource") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  List the actions this resource offers with:");
        eprintln!("  {} flowdesk menu show --record <file>", "$".dimmed());
    }

    if msg.contains("no space id") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Pass --space-id or set user.space_id in the config file.");
    }

    if msg.contains("connection refused") || msg.contains("network") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Check that the backend is running and FLOWDESK_BACKEND_URL is correct.");
    }

    std::process::exit(1);
}

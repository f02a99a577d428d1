use anyhow::Result;

use crate::db::Database;
use crate::models::{BudgetDraft, ClientDraft};

pub(crate) fn as_cli(args: &[String], db: &Database) -> Result<()> {
    match args[1].as_str() {
        "clients" | "c" => cli_clients(&args[2..], db),
        "show-client" => cli_show_client(&args[2..], db),
        "add-client" => cli_add_client(&args[2..], db),
        "delete-client" => cli_delete_client(&args[2..], db),
        "budgets" | "b" => cli_budgets(db),
        "add-budget" => cli_add_budget(&args[2..], db),
        "delete-budget" => cli_delete_budget(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("cervus {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Cervus - client and service budget records");
    println!();
    println!("Usage: cervus [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  clients [term]                List clients, optionally filtered");
    println!("  show-client <id>              Show one client and their budgets");
    println!("  add-client <name>             Register a client");
    println!("    --email <address>");
    println!("    --phone <number>");
    println!("    --obs <text>");
    println!("  delete-client <id>            Delete a client (budgets are kept)");
    println!("  budgets                       List budgets");
    println!("  add-budget <client>           Create a budget for a client name or id");
    println!("    --type <text>");
    println!("    --completion <text>");
    println!("    --deadline <text>");
    println!("    --service <text>");
    println!("  delete-budget <id>            Delete a budget");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

/// Leading words up to the first `--flag`, joined with spaces.
fn positional(args: &[String]) -> String {
    args.iter()
        .take_while(|a| !a.starts_with("--"))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

fn flag<'a>(args: &'a [String], name: &str) -> &'a str {
    args.windows(2)
        .find(|w| w[0] == name)
        .map_or("", |w| w[1].as_str())
}

fn cli_clients(args: &[String], db: &Database) -> Result<()> {
    let term = positional(args);
    let clients = db.list_clients(Some(term.as_str()))?;
    if clients.is_empty() {
        if term.is_empty() {
            println!("No clients");
        } else {
            println!("No clients matching '{term}'");
        }
        return Ok(());
    }

    println!(
        "{:<9} {:<24} {:<28} {:<17} Added",
        "ID", "Name", "Email", "Phone"
    );
    println!("{}", "─".repeat(90));
    for client in &clients {
        println!(
            "{:<9} {:<24} {:<28} {:<17} {}",
            client.client_id, client.name, client.email, client.phone, client.date_added,
        );
    }
    Ok(())
}

fn cli_show_client(args: &[String], db: &Database) -> Result<()> {
    let Some(client_id) = args.first() else {
        anyhow::bail!("Usage: cervus show-client <id>");
    };
    let client = db
        .get_client(client_id)?
        .ok_or_else(|| anyhow::anyhow!("Client {client_id} not found"))?;

    println!("{client}");
    println!("{}", "─".repeat(40));
    println!("  Email:       {}", client.email);
    println!("  Phone:       {}", client.phone);
    println!("  Observation: {}", client.observation);
    println!("  Added:       {}", client.date_added);

    let budgets: Vec<_> = db
        .list_budgets()?
        .into_iter()
        .filter(|b| b.client_id == client.client_id)
        .collect();
    if !budgets.is_empty() {
        println!();
        println!("Budgets:");
        for budget in &budgets {
            println!(
                "  {} {}  {}  {}",
                budget.budget_id, budget.date, budget.kind, budget.service
            );
        }
    }
    Ok(())
}

fn cli_add_client(args: &[String], db: &Database) -> Result<()> {
    let name = positional(args);
    if name.is_empty() {
        anyhow::bail!("Usage: cervus add-client <name> [--email E] [--phone P] [--obs TEXT]");
    }
    let draft = ClientDraft::new(name)
        .with_email(flag(args, "--email"))
        .with_phone(flag(args, "--phone"))
        .with_observation(flag(args, "--obs"));

    let client_id = db.add_client(&draft)?;
    println!("Added client {client_id}");
    Ok(())
}

fn cli_delete_client(args: &[String], db: &Database) -> Result<()> {
    let Some(client_id) = args.first() else {
        anyhow::bail!("Usage: cervus delete-client <id>");
    };
    match db.delete_client(client_id)? {
        0 => println!("No client {client_id}"),
        _ => println!("Deleted client {client_id}"),
    }
    Ok(())
}

fn cli_budgets(db: &Database) -> Result<()> {
    let budgets = db.list_budgets()?;
    if budgets.is_empty() {
        println!("No budgets");
        return Ok(());
    }

    println!(
        "{:<9} {:<24} {:<11} {:<16} {:<12} Service",
        "ID", "Client", "Date", "Type", "Deadline"
    );
    println!("{}", "─".repeat(90));
    for budget in &budgets {
        println!(
            "{:<9} {:<24} {:<11} {:<16} {:<12} {}",
            budget.budget_id,
            budget.client_label(),
            budget.date,
            budget.kind,
            budget.deadline,
            budget.service,
        );
    }
    Ok(())
}

fn cli_add_budget(args: &[String], db: &Database) -> Result<()> {
    let client_ref = positional(args);
    if client_ref.is_empty() {
        anyhow::bail!(
            "Usage: cervus add-budget <client> [--type T] [--completion C] [--deadline D] [--service S]"
        );
    }
    let draft = BudgetDraft::new(client_ref)
        .with_kind(flag(args, "--type"))
        .with_completion(flag(args, "--completion"))
        .with_deadline(flag(args, "--deadline"))
        .with_service(flag(args, "--service"));

    let budget_id = db.add_budget(&draft)?;
    println!("Added budget {budget_id}");
    Ok(())
}

fn cli_delete_budget(args: &[String], db: &Database) -> Result<()> {
    let Some(budget_id) = args.first() else {
        anyhow::bail!("Usage: cervus delete-budget <id>");
    };
    match db.delete_budget(budget_id)? {
        0 => println!("No budget {budget_id}"),
        _ => println!("Deleted budget {budget_id}"),
    }
    Ok(())
}

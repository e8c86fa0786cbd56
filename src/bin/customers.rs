//! Terminal front end for the Customer Registry API.
//!
//! Every command goes through the same screen controller the operator UI uses, so mutations
//! are followed by a refetch and failures are reported as notification text.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use customer_registry::{
    client::CustomerClient,
    models::{CustomerPatch, CustomerResponse, VerificationStatus},
    ui::{CustomerScreen, NotificationKind, SortDirection, SortKey, status_menu_options},
};

#[derive(Debug, Parser)]
#[command(name = "customers", about = "Manage customer records", version)]
struct Cli {
    /// Base URL of the Customer Registry API
    #[arg(
        long,
        env = "CUSTOMERS_API_URL",
        default_value = "http://localhost:8080",
        global = true
    )]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List customers, optionally filtered and sorted
    List {
        /// Case-insensitive text matched against name, email, phone and address
        #[arg(long)]
        search: Option<String>,
        /// Column to sort by: id, name, email, phone, address or status
        #[arg(long)]
        sort: Option<SortKey>,
        /// Sort in descending order
        #[arg(long, requires = "sort")]
        desc: bool,
    },
    /// Show a single customer
    Show { id: i32 },
    /// Add a customer
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: String,
    },
    /// Replace a customer's details; fields not given keep their current value
    Edit {
        id: i32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Update only the given fields
    Patch {
        id: i32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Change a customer's verification status
    Status {
        id: i32,
        /// One of: Not Verified, Verified, Fraud, Suspicious, Black Listed
        status: VerificationStatus,
    },
    /// List the statuses a customer can be moved to
    StatusOptions { id: i32 },
    /// Delete a customer
    Delete { id: i32 },
}

fn print_table(customers: &[&CustomerResponse]) {
    println!(
        "{:>5}  {:<24} {:<28} {:<16} {:<30} {}",
        "ID", "NAME", "EMAIL", "PHONE", "ADDRESS", "STATUS"
    );
    for customer in customers {
        println!(
            "{:>5}  {:<24} {:<28} {:<16} {:<30} {}",
            customer.id,
            customer.name,
            customer.email,
            customer.phone_no,
            customer.address,
            customer.verification_status
        );
    }
}

fn print_customer(customer: &CustomerResponse) {
    println!("ID:       {}", customer.id);
    println!("Name:     {}", customer.name);
    println!("Address:  {}", customer.address);
    println!("Phone:    {}", customer.phone_no);
    println!("Email:    {}", customer.email);
    println!("Status:   {}", customer.verification_status);
}

/// Print the pending notification; error notifications fail the command.
fn report(screen: &mut CustomerScreen<CustomerClient>) -> Result<()> {
    match screen.take_notification() {
        Some(notification) if notification.kind == NotificationKind::Error => {
            bail!("{}", notification.text)
        }
        Some(notification) => {
            println!("{}", notification.text);
            Ok(())
        }
        None => Ok(()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = CustomerClient::new(&cli.api_url).context("creating API client")?;
    let mut screen = CustomerScreen::new(client);

    match cli.command {
        Command::List { search, sort, desc } => {
            screen.refresh().await;
            report(&mut screen)?;

            if let Some(query) = search {
                screen.set_search(query);
            }
            if let Some(key) = sort {
                let direction = if desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                screen.set_sort(key, direction);
            }

            let visible = screen.visible_customers();
            if visible.is_empty() {
                println!("No customers found");
            } else {
                print_table(&visible);
            }
        }
        Command::Show { id } => {
            let customer = screen.load_customer(id).await;
            report(&mut screen)?;
            if let Some(customer) = customer {
                print_customer(&customer);
            }
        }
        Command::Create {
            name,
            address,
            phone,
            email,
        } => {
            let form = screen.open_create_form();
            form.name = name;
            form.address = address;
            form.phone_no = phone;
            form.email = email;

            let created = screen.submit_form().await;
            report(&mut screen)?;
            if let Some(customer) = created {
                print_customer(&customer);
            }
        }
        Command::Edit {
            id,
            name,
            address,
            phone,
            email,
        } => {
            screen.refresh().await;
            report(&mut screen)?;

            let Some(form) = screen.open_edit_form(id) else {
                bail!("Customer {} not found", id);
            };
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(address) = address {
                form.address = address;
            }
            if let Some(phone) = phone {
                form.phone_no = phone;
            }
            if let Some(email) = email {
                form.email = email;
            }

            let updated = screen.submit_form().await;
            report(&mut screen)?;
            if let Some(customer) = updated {
                print_customer(&customer);
            }
        }
        Command::Patch {
            id,
            name,
            address,
            phone,
            email,
        } => {
            let patch = CustomerPatch {
                name,
                address,
                phone_no: phone,
                email,
            };
            if patch.is_empty() {
                bail!("Nothing to update: pass at least one of --name, --address, --phone, --email");
            }

            let patched = screen.patch_customer(id, patch).await;
            report(&mut screen)?;
            if let Some(customer) = patched {
                print_customer(&customer);
            }
        }
        Command::Status { id, status } => {
            let updated = screen.change_status(id, status).await;
            report(&mut screen)?;
            if let Some(customer) = updated {
                print_customer(&customer);
            }
        }
        Command::StatusOptions { id } => {
            let customer = screen.load_customer(id).await;
            report(&mut screen)?;
            if let Some(customer) = customer {
                for status in status_menu_options(customer.verification_status) {
                    println!("{}", status);
                }
            }
        }
        Command::Delete { id } => {
            screen.delete_customer(id).await;
            report(&mut screen)?;
        }
    }

    Ok(())
}

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use createsend_core::{
    ApiClient, ApiError, ClientConfig, ListSubscribersOptions, NewSubscriber, PageOptions,
    SubscriberGroup, Transport,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod output;

#[derive(Parser)]
#[command(name = "createsend")]
#[command(about = "Query a Campaign Monitor account", long_about = None)]
#[command(after_help = "Reads the API key from CREATESEND_API_KEY; CREATESEND_BASE_URL overrides the endpoint.")]
struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the account's clients
    ListClients,

    /// List a client's subscriber lists
    ListLists {
        #[arg(value_name = "CLIENT")]
        client_id: String,
    },

    /// Show which of a client's lists an address is on
    ListsForEmail {
        #[arg(value_name = "CLIENT")]
        client_id: String,
        email: String,
    },

    /// Show one page of a list's subscribers in a state group
    ListSubscribers {
        #[arg(value_name = "LIST")]
        list_id: String,
        /// active, unconfirmed, unsubscribed, bounced or deleted
        group: SubscriberGroup,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Show a subscriber's details
    GetSubscriber {
        #[arg(value_name = "LIST")]
        list_id: String,
        email: String,
    },

    /// Add a subscriber to a list
    AddSubscriber {
        #[arg(value_name = "LIST")]
        list_id: String,
        email: String,
        #[arg(long)]
        name: Option<String>,
        /// Reactivate an address that previously unsubscribed
        #[arg(long)]
        resubscribe: bool,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let client: ApiClient = match ClientConfig::from_env().and_then(ApiClient::new) {
        Ok(client) => client,
        Err(error) => {
            eprintln!("createsend: {error}");
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    match run(&client, cli.command, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("createsend: {error}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "createsend_core=debug,info",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();
}

fn run<T: Transport>(client: &ApiClient<T>, command: Command, out: &mut impl Write) -> Result<(), CliError> {
    debug!(?command, "running command");
    match command {
        Command::ListClients => output::clients(out, &client.list_clients()?)?,
        Command::ListLists { client_id } => output::lists(out, &client.list_lists(&client_id)?)?,
        Command::ListsForEmail { client_id, email } => {
            output::memberships(out, &client.lists_for_email(&client_id, &email)?)?
        }
        Command::ListSubscribers {
            list_id,
            group,
            page,
            page_size,
        } => {
            let options = ListSubscribersOptions {
                date: None,
                page: PageOptions {
                    page: Some(page),
                    page_size,
                    ..Default::default()
                },
            };
            let page = client.list_subscribers(&list_id, group, Some(&options))?;
            output::subscriber_page(out, &page)?
        }
        Command::GetSubscriber { list_id, email } => {
            output::subscriber(out, &client.get_subscriber(&list_id, &email)?)?
        }
        Command::AddSubscriber {
            list_id,
            email,
            name,
            resubscribe,
        } => {
            let subscriber = NewSubscriber {
                name: name.unwrap_or_default(),
                resubscribe,
                ..NewSubscriber::new(email)
            };
            client.add_subscriber(&list_id, &subscriber)?;
            writeln!(out, "Added {} to {list_id}.", subscriber.email_address)?
        }
    }
    Ok(())
}

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::Level;

use isitlive::config::AppConfig;
use isitlive::navigation::Location;
use isitlive::net::transport::TransportError;
use isitlive::net::types::{DomainInput, SiteInput, UserUpdate};
use isitlive::net::{ApiClient, ApiError, HttpTransport};
use isitlive::router::{Router, RouterError};
use isitlive::state::{AuthStore, DomainsStore, Session, SitesStore};
use isitlive::storage::{FileStorage, Storage};
use isitlive::toast::{ToastContainer, ToastDispatcher, ToastId, ToastOptions};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Router(#[from] RouterError),
    #[error("not logged in; run `isitlive login` first")]
    NotLoggedIn,
    #[error("nothing to update; pass --username, --email or --password")]
    EmptyUpdate,
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "isitlive", about = "Is It Live uptime monitor client")]
struct Cli {
    /// API base URL.
    #[arg(long, env = "ISITLIVE_API_URL")]
    api_url: Option<String>,

    /// Session storage file.
    #[arg(long, env = "ISITLIVE_STORAGE_PATH")]
    storage: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "ISITLIVE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Login {
        username: String,
        #[arg(long, env = "ISITLIVE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Confirm the stored session with the server.
    Whoami,
    Account(AccountCommand),
    Sites(SitesCommand),
    Domains(DomainsCommand),
    /// Public profile of a user.
    Profile {
        username: String,
    },
    /// Run the router guard against an in-app path.
    Open {
        path: String,
    },
}

#[derive(Args, Debug)]
struct AccountCommand {
    #[command(subcommand)]
    command: AccountSubcommand,
}

#[derive(Subcommand, Debug)]
enum AccountSubcommand {
    Update {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Args, Debug)]
struct SitesCommand {
    #[command(subcommand)]
    command: SitesSubcommand,
}

#[derive(Subcommand, Debug)]
enum SitesSubcommand {
    List,
    Show {
        id: i64,
    },
    Stats {
        id: i64,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct DomainsCommand {
    #[command(subcommand)]
    command: DomainsSubcommand,
}

#[derive(Subcommand, Debug)]
enum DomainsSubcommand {
    List,
    Create {
        domain: String,
    },
    Verify {
        id: i64,
    },
    Delete {
        id: i64,
    },
    /// Public status dashboard served for a custom domain.
    Dashboard {
        domain: String,
    },
}

/// Prints toasts to stderr; they are gone as soon as they are shown.
struct TerminalToasts;

impl ToastContainer for TerminalToasts {
    fn add_toast(&self, options: ToastOptions) -> ToastId {
        if options.message.is_empty() {
            eprintln!("[{}] {}", options.kind.as_str(), options.title);
        } else {
            eprintln!("[{}] {}: {}", options.kind.as_str(), options.title, options.message);
        }
        ToastId::new()
    }

    fn remove_toast(&self, _id: ToastId) {}
}

struct App {
    api: ApiClient,
    auth: AuthStore,
    sites: SitesStore,
    domains: DomainsStore,
    location: Location,
    session: Session,
    toasts: ToastDispatcher,
}

impl App {
    fn build(config: &AppConfig) -> Result<Self, CliError> {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(config.storage_path.clone()));
        let session = Session::restore(storage);
        let location = Location::default();
        let transport = Arc::new(HttpTransport::new(&config.api_url)?);
        let api = ApiClient::new(transport, session.clone(), Arc::new(location.clone()));

        let toasts = ToastDispatcher::new();
        toasts.register(Arc::new(TerminalToasts));

        Ok(Self {
            auth: AuthStore::new(api.clone()),
            sites: SitesStore::new(api.clone()),
            domains: DomainsStore::new(api.clone()),
            api,
            location,
            session,
            toasts,
        })
    }

    /// Toast the outcome of an action and hand the result back.
    fn report<T>(&self, result: Result<T, ApiError>, success: Option<&str>, failure: &str) -> Result<T, CliError> {
        match result {
            Ok(value) => {
                if let Some(title) = success {
                    self.toasts.success(title);
                }
                Ok(value)
            }
            Err(e) => {
                self.toasts.show(ToastOptions::error(failure).with_message(e.display_message(failure)));
                if self.location.hard_navigations() > 0 {
                    self.toasts
                        .show(ToastOptions::warning("Session expired").with_message("log in again with `isitlive login`"));
                }
                Err(e.into())
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::from_env();
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url);
    }
    if let Some(path) = cli.storage {
        config = config.with_storage_path(path);
    }
    tracing::debug!(api_url = %config.api_url, storage = %config.storage_path.display(), "config resolved");

    let app = App::build(&config)?;
    match cli.command {
        Command::Register { username, email, password } => {
            let user = app.report(
                app.auth.register(&username, &password, &email).await,
                Some("Account created"),
                "Registration failed",
            )?;
            print_json(&user)
        }
        Command::Login { username, password } => {
            let user = app.report(app.auth.login(&username, &password).await, Some("Logged in"), "Login failed")?;
            print_json(&user)
        }
        Command::Logout => {
            app.auth.logout();
            app.toasts.info("Logged out");
            Ok(())
        }
        Command::Whoami => match app.auth.check_auth().await {
            Some(user) => print_json(&user),
            None => Err(CliError::NotLoggedIn),
        },
        Command::Account(account) => run_account(&app, account).await,
        Command::Sites(sites) => run_sites(&app, sites).await,
        Command::Domains(domains) => run_domains(&app, domains).await,
        Command::Profile { username } => {
            let profile = app.report(app.api.public().get_user_profile(&username).await, None, "Failed to load profile")?;
            print_json(&profile)
        }
        Command::Open { path } => run_open(&app, &path),
    }
}

async fn run_account(app: &App, account: AccountCommand) -> Result<(), CliError> {
    match account.command {
        AccountSubcommand::Update { username, email, password } => {
            let update = UserUpdate { username, email, password };
            if update == UserUpdate::default() {
                return Err(CliError::EmptyUpdate);
            }
            let user =
                app.report(app.auth.update_user(&update).await, Some("Account updated"), "Failed to update user")?;
            print_json(&user)
        }
    }
}

async fn run_sites(app: &App, sites: SitesCommand) -> Result<(), CliError> {
    match sites.command {
        SitesSubcommand::List => {
            let list = app.report(app.sites.fetch_sites().await, None, "Failed to fetch sites")?;
            print_json(&list)
        }
        SitesSubcommand::Show { id } => {
            let site = app.report(app.sites.fetch_site(id).await, None, "Failed to fetch site")?;
            print_json(&site)
        }
        SitesSubcommand::Stats { id } => {
            let stats = app.report(app.sites.fetch_site_stats(id).await, None, "Failed to fetch site stats")?;
            print_json(&stats)
        }
        SitesSubcommand::Create { name, url } => {
            let input = SiteInput { name, url };
            let site = app.report(app.sites.create_site(&input).await, Some("Site created"), "Failed to create site")?;
            print_json(&site)
        }
        SitesSubcommand::Update { id, name, url } => {
            let input = SiteInput { name, url };
            let site =
                app.report(app.sites.update_site(id, &input).await, Some("Site updated"), "Failed to update site")?;
            print_json(&site)
        }
        SitesSubcommand::Delete { id } => {
            app.report(app.sites.delete_site(id).await, Some("Site deleted"), "Failed to delete site")
        }
    }
}

async fn run_domains(app: &App, domains: DomainsCommand) -> Result<(), CliError> {
    match domains.command {
        DomainsSubcommand::List => {
            let list = app.report(app.domains.fetch_domains().await, None, "Failed to fetch domains")?;
            print_json(&list)
        }
        DomainsSubcommand::Create { domain } => {
            let input = DomainInput { domain };
            let created =
                app.report(app.domains.create_domain(&input).await, Some("Domain added"), "Failed to create domain")?;
            print_json(&created)
        }
        DomainsSubcommand::Verify { id } => {
            let result = app.report(app.domains.verify_domain(id).await, None, "Failed to verify domain")?;
            if result.verified {
                app.toasts.success("Domain verified");
            } else {
                let status = result.verification_status.clone().unwrap_or_default();
                app.toasts.show(ToastOptions::warning("Domain not verified yet").with_message(status));
            }
            print_json(&result)
        }
        DomainsSubcommand::Delete { id } => {
            app.report(app.domains.delete_domain(id).await, Some("Domain deleted"), "Failed to delete domain")
        }
        DomainsSubcommand::Dashboard { domain } => {
            let dashboard =
                app.report(app.api.domains().get_domain_dashboard(&domain).await, None, "Failed to load dashboard")?;
            print_json(&dashboard)
        }
    }
}

#[derive(Serialize)]
struct OpenOutcome<'a> {
    route: &'a str,
    path: &'a str,
    title: &'a str,
    redirected_from: Option<&'a str>,
    authenticated: bool,
}

fn run_open(app: &App, path: &str) -> Result<(), CliError> {
    let router = Router::new(app.session.clone(), app.location.clone());
    let nav = router.push(path)?;
    print_json(&OpenOutcome {
        route: nav.route.name.as_str(),
        path: &nav.route.full_path,
        title: &nav.title,
        redirected_from: nav.redirected_from.as_deref(),
        authenticated: app.session.is_authenticated(),
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

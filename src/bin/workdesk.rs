use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use workdesk::client::rest::SettingsService;
use workdesk::core::auth::{FileTokenStore, MemoryTokenStore, TokenStore};
use workdesk::core::notify::{NotificationCenter, NotificationLevel};
use workdesk::core::query::SortState;
use workdesk::prelude::*;

/// Workdesk - company task and project management from the terminal
#[derive(Parser)]
#[command(name = "workdesk", version)]
#[command(about = "Command-line client for the company task and project CMS", long_about = None)]
struct Cli {
    /// Configuration file; repeat to layer several, later files win
    #[arg(short, long, env = "WORKDESK_CONFIG")]
    config: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and persist the session token
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "WORKDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the persisted session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List tasks, optionally scoped to one project
    Tasks {
        /// Only tasks of this project (fetched from the project's task endpoint)
        #[arg(long)]
        project: Option<String>,

        /// Only tasks assigned to this user id
        #[arg(long)]
        assignee: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// List employees
    Employees {
        #[command(flatten)]
        list: ListArgs,
    },

    /// List projects
    Projects {
        #[command(flatten)]
        list: ListArgs,
    },

    /// List announcements
    Announcements {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Show a dashboard breakdown as a bar chart
    Chart {
        #[arg(value_enum)]
        kind: ChartKind,

        /// Width of the longest bar
        #[arg(long, default_value = "40")]
        width: usize,

        /// Hide categories without items
        #[arg(long)]
        omit_empty: bool,
    },

    /// Show company settings
    Settings,
}

#[derive(Args)]
struct ListArgs {
    /// Case-insensitive text search
    #[arg(short, long)]
    search: Option<String>,

    /// Enum filter as field=value, e.g. status=done (repeatable)
    #[arg(short, long = "filter", value_parser = parse_key_value)]
    filters: Vec<(String, String)>,

    /// Sort as field, field:asc or field:desc
    #[arg(long)]
    sort: Option<String>,

    #[arg(long, default_value = "1")]
    page: usize,

    /// Rows per page (defaults to list.page_size from the config)
    #[arg(long)]
    page_size: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ChartKind {
    TaskStatus,
    TaskPriority,
    ProjectStatus,
    EmployeeRole,
    EmployeeStatus,
    AnnouncementCategory,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{}'", raw))?;
    if key.trim().is_empty() {
        return Err(format!("missing field name in '{}'", raw));
    }
    Ok((key.trim().to_string(), value.trim().to_string()))
}

/// Everything the commands share
struct App {
    config: WorkdeskConfig,
    client: ApiClient,
    auth: AuthFlow,
    notifications: Arc<NotificationCenter>,
}

impl App {
    fn new(config: WorkdeskConfig) -> Result<Self> {
        let store: Arc<dyn TokenStore> = match &config.session.token_path {
            Some(path) => Arc::new(FileTokenStore::new(path)),
            None => Arc::new(MemoryTokenStore::new()),
        };
        let client = ApiClient::new(&config, SessionContext::new())?;
        let auth = AuthFlow::new(client.clone(), store)
            .with_cookie_name(config.session.cookie_name.clone());
        auth.restore().context("Failed to restore the saved session")?;

        Ok(Self {
            config,
            client,
            auth,
            notifications: Arc::new(NotificationCenter::default()),
        })
    }

    fn list_view<T: TableRow + DeserializeOwned>(&self, service: RestService<T>) -> ListView<T> {
        ListView::new(Arc::new(service), self.notifications.clone())
            .with_page_size(self.config.list.page_size)
    }

    /// Print pending notifications to stderr
    fn flush_notifications(&self) {
        for notification in self.notifications.drain() {
            let prefix = match notification.level {
                NotificationLevel::Success => "ok",
                NotificationLevel::Info => "info",
                NotificationLevel::Error => "error",
            };
            eprintln!("{}: {}", prefix, notification.message);
        }
    }
}

fn load_config(paths: &[PathBuf]) -> Result<WorkdeskConfig> {
    let configs = paths
        .iter()
        .map(|path| {
            WorkdeskConfig::from_yaml_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut config = WorkdeskConfig::merge(configs);
    config.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.logging.filter))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = App::new(config)?;
    let result = run(&app, cli.command).await;
    app.flush_notifications();
    result
}

async fn run(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => handle_login(app, email, password).await,
        Commands::Logout => handle_logout(app),
        Commands::Whoami => handle_whoami(app).await,
        Commands::Tasks {
            project,
            assignee,
            list,
        } => handle_tasks(app, project, assignee, &list).await,
        Commands::Employees { list } => {
            let view = app.list_view(RestService::<Employee>::new(app.client.clone()));
            show_list(app, view, &list).await
        }
        Commands::Projects { list } => {
            let view = app.list_view(RestService::<Project>::new(app.client.clone()));
            show_list(app, view, &list).await
        }
        Commands::Announcements { list } => {
            let view = app.list_view(RestService::<Announcement>::new(app.client.clone()));
            show_list(app, view, &list).await
        }
        Commands::Chart {
            kind,
            width,
            omit_empty,
        } => handle_chart(app, kind, width, omit_empty).await,
        Commands::Settings => handle_settings(app).await,
    }
}

async fn handle_login(app: &App, email: String, password: String) -> Result<()> {
    if app.config.session.token_path.is_none() {
        tracing::warn!("session.token_path is not set, the session will not outlive this command");
    }

    match app.auth.login(LoginForm { email, password }).await {
        Ok(session) => {
            match session.user {
                Some(user) => println!("Signed in as {} <{}>", user.name, user.email),
                None => println!("Signed in"),
            }
            Ok(())
        }
        Err(err) if !err.field_errors().is_empty() => {
            for field in err.field_errors() {
                eprintln!("{}: {}", field.field, field.message);
            }
            bail!("login form is invalid")
        }
        Err(err) => Err(anyhow!(err.user_message())),
    }
}

fn handle_logout(app: &App) -> Result<()> {
    app.auth.logout()?;
    println!("Signed out");
    Ok(())
}

async fn handle_whoami(app: &App) -> Result<()> {
    let user = app.auth.current_user().await.map_err(|e| anyhow!(e.user_message()))?;
    println!("{} <{}>", user.name, user.email);
    println!("role: {}", user.role.badge().label);
    Ok(())
}

async fn handle_tasks(
    app: &App,
    project: Option<String>,
    assignee: Option<String>,
    list: &ListArgs,
) -> Result<()> {
    let mut service = RestService::<Task>::new(app.client.clone());
    if project.is_some() {
        service = service.with_endpoint(Endpoint::new("/projects/{project_id}/tasks"));
    }

    let mut view = app.list_view(service);
    if let Some(project) = project {
        view.set_param("project_id", project);
    }
    if assignee.is_some() {
        view.set_relation_filter("assigned_to", assignee);
    }
    show_list(app, view, list).await
}

async fn show_list<T: TableRow>(app: &App, mut view: ListView<T>, args: &ListArgs) -> Result<()> {
    if let Some(size) = args.page_size {
        view = view.with_page_size(size);
    }
    if let Some(search) = &args.search {
        view.set_search(search.as_str());
    }
    for (field, value) in &args.filters {
        view.set_enum_filter(field.as_str(), value.as_str());
    }
    if let Some(raw) = &args.sort {
        let sort = SortState::parse(raw).ok_or_else(|| anyhow!("invalid sort '{}'", raw))?;
        if let (Some(field), Some(direction)) = (sort.field(), sort.direction()) {
            if !T::sortable_fields().contains(&field) {
                bail!(
                    "cannot sort {} by '{}', expected one of: {}",
                    T::resource_name(),
                    field,
                    T::sortable_fields().join(", ")
                );
            }
            view.set_sort(field, direction);
        }
    }

    view.refresh().await;
    view.set_page(args.page);

    print!("{}", TableModel::build(&view).render_text());
    if view.state() == LoadState::Failed {
        app.flush_notifications();
        bail!("could not load {}", T::resource_name());
    }
    Ok(())
}

async fn fetch_all<T: TableRow + DeserializeOwned>(app: &App) -> Result<ListView<T>> {
    let mut view = app.list_view(RestService::<T>::new(app.client.clone()));
    if !view.refresh().await {
        app.flush_notifications();
        bail!("could not load {}", T::resource_name());
    }
    Ok(view)
}

async fn handle_chart(app: &App, kind: ChartKind, width: usize, omit_empty: bool) -> Result<()> {
    let chart = match kind {
        ChartKind::TaskStatus => {
            let view = fetch_all::<Task>(app).await?;
            PieChart::from_items("Tasks by status", view.items(), |t: &Task| t.status)
        }
        ChartKind::TaskPriority => {
            let view = fetch_all::<Task>(app).await?;
            PieChart::from_items("Tasks by priority", view.items(), |t: &Task| t.priority)
        }
        ChartKind::ProjectStatus => {
            let view = fetch_all::<Project>(app).await?;
            PieChart::from_items("Projects by status", view.items(), |p: &Project| p.status)
        }
        ChartKind::EmployeeRole => {
            let view = fetch_all::<Employee>(app).await?;
            PieChart::from_items("Employees by role", view.items(), |e: &Employee| e.role)
        }
        ChartKind::EmployeeStatus => {
            let view = fetch_all::<Employee>(app).await?;
            PieChart::from_items("Employees by status", view.items(), |e: &Employee| e.status)
        }
        ChartKind::AnnouncementCategory => {
            let view = fetch_all::<Announcement>(app).await?;
            PieChart::from_items("Announcements by category", view.items(), |a: &Announcement| {
                a.category
            })
        }
    };

    let chart = if omit_empty { chart.omit_empty() } else { chart };
    print!("{}", chart.render_text(width));
    Ok(())
}

async fn handle_settings(app: &App) -> Result<()> {
    let settings = SettingsService::new(app.client.clone())
        .load()
        .await
        .map_err(|e| anyhow!(e.user_message()))?;

    println!("company:       {}", settings.company_name);
    println!("contact:       {}", settings.contact_email.as_deref().unwrap_or("-"));
    println!("timezone:      {}", settings.timezone);
    let days: Vec<String> = settings.working_days.iter().map(u8::to_string).collect();
    println!("working days:  {}", days.join(","));
    println!(
        "notifications: {}",
        if settings.email_notifications { "on" } else { "off" }
    );
    Ok(())
}

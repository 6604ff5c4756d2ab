//! `rosterd` - student records API server and command-line client.

#![deny(unsafe_code)]

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use rosterd::cli::{render, Cli, Command, ConfigCommand, ListCommand, UpdateCommand};
use rosterd::http::{self, AppState};
use rosterd::prefs::{self, JsonFilePreferences};
use rosterd::{
    init_logging, view, Config, HttpStudentsApi, LocalStudentsApi, QueryState, StudentCache,
    StudentForm, StudentStore, StudentsApi,
};

type Cache = StudentCache<Box<dyn StudentsApi>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());

    let Cli {
        config: config_path,
        local,
        command,
        ..
    } = cli;
    let config = Config::load_from(config_path.clone())?;

    match command {
        Command::Serve => serve(&config).await,
        Command::Config(cmd) => handle_config(&config, config_path, cmd),
        Command::Dashboard(cmd) => {
            let mut cache = open_cache(&config, local)?;
            cache.refresh().await?;
            let stats = cache.view(&QueryState::default()).stats;
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", render::dashboard(&stats));
            }
            Ok(())
        }
        Command::List(cmd) => handle_list(&config, open_cache(&config, local)?, &cmd).await,
        Command::Show(cmd) => {
            let cache = open_cache(&config, local)?;
            let record = cache.fetch(&cmd.id).await?;
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print!("{}", render::record(&record));
            }
            Ok(())
        }
        Command::Add(cmd) => {
            let mut cache = open_cache(&config, local)?;
            let created = cache.create(&cmd.to_form()).await?;
            println!("Student Added Successfully !!");
            print!("{}", render::record(&created));
            Ok(())
        }
        Command::Update(cmd) => handle_update(open_cache(&config, local)?, &cmd).await,
        Command::Delete(cmd) => {
            let mut cache = open_cache(&config, local)?;
            let deleted = cache.delete(&cmd.id).await?;
            println!("Student deleted successfully: {} ({})", deleted.name, deleted.st_id);
            Ok(())
        }
    }
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    let db_path = config.database_path();
    let store = StudentStore::open(&db_path)?;

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, db = %db_path.display(), "rosterd listening");

    // Supervisors read this line to learn the bound port.
    {
        let mut stdout = std::io::stdout().lock();
        writeln!(
            stdout,
            "{}",
            serde_json::json!({ "listening": addr.to_string() })
        )?;
        stdout.flush()?;
    }

    http::serve(listener, AppState::new(store)).await?;
    Ok(())
}

fn open_cache(config: &Config, local: bool) -> anyhow::Result<Cache> {
    let api: Box<dyn StudentsApi> = if local {
        let store = StudentStore::open(&config.database_path())?;
        Box::new(LocalStudentsApi::new(Arc::new(store)))
    } else {
        Box::new(HttpStudentsApi::new(&config.api_base_url())?)
    };
    Ok(StudentCache::new(api))
}

async fn handle_list(config: &Config, mut cache: Cache, cmd: &ListCommand) -> anyhow::Result<()> {
    let mut store = JsonFilePreferences::new(config.prefs_path());
    let mut query = prefs::load_query_state(&store);
    cmd.apply(&mut query);
    if cmd.touches_query() {
        prefs::save_query_state(&mut store, &query)
            .with_context(|| format!("failed to save {}", store.path().display()))?;
    }

    cache.refresh().await?;
    let derived = cache.view(&query);
    let options = view::class_options(cache.records());

    if cmd.json {
        let body = serde_json::json!({
            "query": query,
            "classOptions": options,
            "rows": derived.rows,
            "stats": derived.stats,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", render::table(&derived, &query));
        println!("classes: {}", options.join(" | "));
    }
    Ok(())
}

async fn handle_update(mut cache: Cache, cmd: &UpdateCommand) -> anyhow::Result<()> {
    let current = cache.fetch(&cmd.id).await?;
    let mut form = StudentForm::from_record(&current);
    cmd.apply(&mut form);
    let updated = cache.update(&cmd.id, &form).await?;
    println!("Updated Successfully !!");
    print!("{}", render::record(&updated));
    Ok(())
}

fn handle_config(
    config: &Config,
    config_path: Option<PathBuf>,
    cmd: ConfigCommand,
) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Server:    {}", config.bind_addr());
                println!("Database:  {}", config.database_path().display());
                println!("API:       {}", config.api_base_url());
                println!("Prefs:     {}", config.prefs_path().display());
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
    }
    Ok(())
}

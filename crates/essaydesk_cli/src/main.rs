//! CLI smoke entry point.
//!
//! Opens the configured database (in-memory when `ESSAYDESK_DB_PATH` is
//! unset) and prints active entity counts plus the newest users as JSON.

use essaydesk_core::db::{open_db, open_db_in_memory};
use essaydesk_core::{
    init_logging, CoreConfig, Essay, EssayService, ListQuery, Planning, PlanningService,
    Repository, SqliteStore, User, UserService,
};
use log::error;
use serde_json::json;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("essaydesk: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<String, String> {
    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(log_dir) = config.log_dir.as_ref().and_then(|dir| dir.to_str()) {
        init_logging(config.log_level, log_dir)?;
    }

    let conn = match &config.db_path {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    }
    .map_err(|err| err.to_string())?;

    let users = UserService::new(Repository::new(SqliteStore::<User>::new(&conn)));
    let essays = EssayService::new(Repository::new(SqliteStore::<Essay>::new(&conn)));
    let plannings = PlanningService::new(Repository::new(SqliteStore::<Planning>::new(&conn)));

    let newest_users = users
        .list(&ListQuery {
            page: config.page_request(None, None),
            ..ListQuery::default()
        })
        .map_err(|err| err.to_string())?;

    let report = json!({
        "version": essaydesk_core::core_version(),
        "counts": {
            "users": users.count(None).map_err(|err| err.to_string())?,
            "essays": essays.count(None).map_err(|err| err.to_string())?,
            "plannings": plannings.count(None).map_err(|err| err.to_string())?,
        },
        "users": newest_users,
    });
    serde_json::to_string_pretty(&report).map_err(|err| err.to_string())
}

//! Background worker sending due mailings through the emailer service.

use std::thread;
use std::time::Duration;

use chrono::Utc;
use pushkind_common::db::establish_connection_pool;
use pushkind_common::zmq::{ZmqSender, ZmqSenderOptions};

use pushkind_mailing::models::config::load_server_config;
use pushkind_mailing::repository::DieselRepository;
use pushkind_mailing::services::dispatch::run_due_mailings;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let server_config = match load_server_config() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    // Background ZeroMQ publisher feeding the emailer service.
    let sender = match ZmqSender::start(ZmqSenderOptions::pub_default(
        &server_config.zmq_emailer_pub,
    )) {
        Ok(sender) => sender,
        Err(e) => {
            log::error!("Failed to start ZMQ sender: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let repo = DieselRepository::new(pool);
    let interval = Duration::from_secs(server_config.worker_interval_secs.max(1));

    log::info!("Starting mailing worker, polling every {}s", interval.as_secs());

    loop {
        match run_due_mailings(&repo, &sender, server_config.hub_id, Utc::now().naive_utc()) {
            Ok(summary) if summary.processed > 0 || summary.errors > 0 => log::info!(
                "Processed {} mailings: {} sent, {} failed, {} unlogged, {} finished, {} errors",
                summary.processed,
                summary.sent,
                summary.failed,
                summary.log_errors,
                summary.finished,
                summary.errors
            ),
            Ok(_) => {}
            Err(e) => log::error!("Error reading due mailings: {e}"),
        }

        thread::sleep(interval);
    }
}

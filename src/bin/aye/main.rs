use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};

use aye::AyeConfig;

mod cli;
mod util;
mod cmd_history;
mod cmd_show;
mod cmd_restore;
mod cmd_keep;
mod cmd_apply;
mod cmd_collect;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт — info.
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();

    let mut cfg = AyeConfig::from_env();
    if let Some(root) = cli.root {
        cfg = cfg.with_project_root(root);
    }
    if let Some(store) = cli.store {
        cfg = cfg.with_store_dir(Some(store));
    }
    let cfg = cfg.build();

    match cli.cmd {
        cli::Cmd::History { file, json } =>
            cmd_history::exec(&cfg, file, json),

        cli::Cmd::Show { file, batch } =>
            cmd_show::exec(&cfg, file, batch),

        cli::Cmd::Restore { batch, file } =>
            cmd_restore::exec(&cfg, batch, file),

        cli::Cmd::Keep { count } =>
            cmd_keep::exec(&cfg, count),

        cli::Cmd::Apply { edits_file, edits_json } =>
            cmd_apply::exec(&cfg, edits_file, edits_json),

        cli::Cmd::Collect { mask, no_recursive, json } =>
            cmd_collect::exec(&cfg, mask, !no_recursive, json),

        cli::Cmd::Config => {
            println!("{cfg}");
            Ok(())
        }
    }
}

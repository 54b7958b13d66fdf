//! Точка входа `stock-cli`.
//!
//! Терминальная замена окна ведения склада:
//! - парсинг CLI и выбор пары файлов данные/архив
//! - одна операция хранилища на запуск
//! - вывод результата в stdout, ошибки в stderr с ненулевым кодом выхода

mod cli;
mod render;

use std::io::{self, Write};

use anyhow::{Context, bail};
use clap::Parser;
use log::info;
use stock_core::{Stock, StockRepository};

use crate::cli::Command;

fn main() -> anyhow::Result<()> {
    // Логи через RUST_LOG=info/debug
    env_logger::init();

    let args = cli::Args::parse();
    args.validate()?;

    info!(
        "Starting stock-cli: data={:?}, archive={:?}",
        args.data, args.archive
    );

    let repo = StockRepository::new(args.store_paths());
    let stdout = io::stdout();
    run(&repo, args.command, &mut stdout.lock())
}

fn run<W: Write>(repo: &StockRepository, command: Command, out: &mut W) -> anyhow::Result<()> {
    match command {
        Command::List { by_id } => {
            let mut stocks = repo.list_all().context("failed to load stocks")?;
            if !by_id {
                stocks.sort_by_cached_key(|s| s.name.to_lowercase());
            }
            render::write_list(out, &stocks)?;
        }
        Command::Get { id } => {
            let stock = repo
                .get_by_id(id)
                .with_context(|| format!("failed to get stock {id}"))?;
            match stock {
                Some(s) => render::write_detail(out, &s)?,
                None => bail!("stock not found: {id}"),
            }
        }
        Command::Search { keyword } => {
            let stocks = repo
                .search(&keyword)
                .with_context(|| format!("failed to search stocks for {keyword:?}"))?;
            render::write_list(out, &stocks)?;
        }
        Command::Add(fields) => {
            let saved = repo
                .add(fields.into_stock(Stock::UNASSIGNED_ID))
                .context("failed to save the stock")?;
            writeln!(out, "A new record has been added: {}", saved.stock)?;
        }
        Command::Update { id, fields } => {
            let saved = repo
                .update(fields.into_stock(id))
                .context("failed to save the stock")?;
            writeln!(out, "The record has been updated: {}", saved.stock)?;
        }
        Command::Delete { id } => {
            let deleted = repo
                .delete(id)
                .with_context(|| format!("failed to delete stock {id}"))?;
            if !deleted.removed {
                bail!("stock not found: {id}");
            }
            writeln!(out, "The stock has been deleted")?;
        }
        Command::Restore => {
            repo.restore_snapshot()
                .context("failed to restore the last snapshot")?;
            writeln!(out, "The previous operation was canceled")?;
        }
    }

    Ok(())
}
